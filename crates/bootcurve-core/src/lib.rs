//! # Bootcurve Core
//!
//! Calendar building blocks for the bootcurve rate curve bootstrapper.
//!
//! - **Types**: [`Date`] and coupon [`Frequency`]
//! - **Day Count Conventions**: ACT/365, ACT/360, ACT/ACT and 30/360 year fractions
//! - **Tenors**: parsing of market tenor tokens (`"1D"`, `"3M"`, `"2Y"`) and
//!   maturity date arithmetic
//!
//! ## Example
//!
//! ```rust
//! use bootcurve_core::prelude::*;
//!
//! let as_of = Date::from_ymd(2026, 1, 8).unwrap();
//! let tenor: Tenor = "3M".parse().unwrap();
//! let maturity = tenor.maturity_date(as_of).unwrap();
//!
//! let yf = DayCountConvention::Act365.year_fraction(as_of, maturity);
//! assert!((yf - 90.0 / 365.0).abs() < 1e-12);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::similar_names)]
#![allow(clippy::unreadable_literal)]
#![allow(clippy::uninlined_format_args)]

pub mod daycounts;
pub mod error;
pub mod tenor;
pub mod types;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::daycounts::{DayCount, DayCountConvention};
    pub use crate::error::{CoreError, CoreResult};
    pub use crate::tenor::{Tenor, TenorUnit};
    pub use crate::types::{Date, Frequency};
}

// Re-export commonly used types at crate root
pub use daycounts::DayCountConvention;
pub use error::{CoreError, CoreResult};
pub use tenor::Tenor;
pub use types::{Date, Frequency};

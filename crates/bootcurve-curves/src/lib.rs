//! # Bootcurve Curves
//!
//! Sequential bootstrapping of a discount curve from cash deposits and par
//! swaps, using piecewise-constant instantaneous forward rates.
//!
//! This crate provides:
//!
//! - **Nodes**: [`CurveNodeIndex`], the knot dates that partition the timeline
//! - **Discounting**: the single log-linear discount function and the
//!   queryable [`DiscountCurve`]
//! - **Pricing**: [`InstrumentPricer`](pricing::InstrumentPricer), the
//!   pricing error of one instrument as a function of its trial forward
//! - **Bootstrap**: [`BootstrapEngine`](bootstrap::BootstrapEngine), the
//!   sequential solve driven by any [`RootFinder`](bootcurve_math::solvers::RootFinder)
//! - **Repricing**: par checks of every input against the final curve
//! - **Batch**: independent runs across valuation dates on the rayon pool
//!
//! ## Quick Start
//!
//! ```rust
//! use bootcurve_curves::prelude::*;
//!
//! let context = ValuationContext::new(
//!     Date::from_ymd(2026, 1, 8).unwrap(),
//!     DayCountConvention::Act365,
//!     Frequency::Quarterly,
//! );
//! let quotes = vec![
//!     MarketQuote::new("1D", InstrumentKind::Deposit, 0.025),
//!     MarketQuote::new("3M", InstrumentKind::Deposit, 0.027),
//!     MarketQuote::new("1Y", InstrumentKind::Swap, 0.028),
//! ];
//!
//! let instruments = Instrument::resolve_all(&quotes, &context).unwrap();
//! let nodes = CurveNodeIndex::from_maturities(&instruments).unwrap();
//! let mut engine =
//!     BootstrapEngine::new(context, instruments, &nodes, BootstrapConfig::default()).unwrap();
//!
//! let curve = engine.run().into_result().unwrap();
//! let df = curve.discount_factor(Date::from_ymd(2026, 7, 8).unwrap());
//! assert!(df < 1.0 && df > 0.98);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::uninlined_format_args)]

pub mod batch;
pub mod bootstrap;
pub mod discount;
pub mod error;
pub mod instruments;
pub mod nodes;
pub mod pricing;
pub mod repricing;
pub mod traits;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::batch::{BatchEntry, BatchRunner};
    pub use crate::bootstrap::{
        BootstrapConfig, BootstrapEngine, BootstrapFailure, BootstrapOutcome, BootstrapState,
        CancellationToken, RateBounds, SolvedStep, TracePoint,
    };
    pub use crate::discount::{discount_factor, DiscountCurve, ForwardStep};
    pub use crate::error::{CurveError, CurveResult};
    pub use crate::instruments::{Instrument, InstrumentKind, MarketQuote, ValuationContext};
    pub use crate::nodes::{CurveNode, CurveNodeIndex};
    pub use crate::pricing::{pricing_error, CashflowKind, CashflowRow, InstrumentPricer};
    pub use crate::repricing::{reprice, RepricingCheck, RepricingReport};
    pub use crate::traits::CurveQuery;
    pub use bootcurve_core::{Date, DayCountConvention, Frequency};
    pub use bootcurve_math::solvers::SolverMethod;
}

pub use discount::DiscountCurve;
pub use error::{CurveError, CurveResult};
pub use nodes::CurveNodeIndex;
pub use traits::CurveQuery;

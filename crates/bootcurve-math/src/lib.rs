//! # Bootcurve Math
//!
//! Scalar root-finding for the bootcurve rate curve bootstrapper.
//!
//! - **Solvers**: Newton-Raphson with a numerical derivative, secant,
//!   Brent and bisection, all behind the [`RootFinder`](solvers::RootFinder)
//!   trait so the bootstrap engine can be run with any of them
//! - **Selection**: [`SolverMethod`](solvers::SolverMethod) picks a solver
//!   at runtime from configuration

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::similar_names)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::unreadable_literal)]
#![allow(clippy::uninlined_format_args)]

pub mod error;
pub mod solvers;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{MathError, MathResult};
    pub use crate::solvers::{
        bisection, brent, newton_raphson, newton_raphson_numerical, secant, BisectionSolver,
        BrentSolver, NewtonSolver, RootFinder, SecantSolver, SolverConfig, SolverMethod,
        SolverResult,
    };
}

pub use error::{MathError, MathResult};

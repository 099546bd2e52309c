//! Sequential curve bootstrap.
//!
//! Instruments are solved one at a time, in maturity order. Step `i` finds
//! the constant forward on the segment ending at instrument `i`'s knot that
//! prices it to par, holding the forwards of steps `0..i` fixed. A failed
//! step halts the run, since every later segment depends on it.
//!
//! ```text
//! Idle -> Solving(0) -> Solving(1) -> ... -> Done
//!              \             \
//!               Failed(0)     Failed(1)        (or Cancelled between steps)
//! ```

mod config;
mod engine;
mod outcome;
mod solved;

pub use config::{BootstrapConfig, RateBounds, ZERO_RATE_SEED};
pub use engine::{BootstrapEngine, CancellationToken};
pub use outcome::{BootstrapFailure, BootstrapOutcome, BootstrapState, SolvedStep, TracePoint};
pub use solved::SolvedForwards;

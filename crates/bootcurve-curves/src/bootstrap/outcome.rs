//! Run results.

use bootcurve_core::{Date, Tenor};
use serde::{Deserialize, Serialize};

use crate::discount::DiscountCurve;
use crate::error::{CurveError, CurveResult};
use crate::instruments::InstrumentKind;

/// Engine state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BootstrapState {
    /// Not started.
    #[default]
    Idle,
    /// Solving the instrument at this index.
    Solving(usize),
    /// Every instrument solved.
    Done,
    /// Stopped at the instrument at this index.
    Failed(usize),
    /// Stopped by a cancellation request between steps.
    Cancelled,
}

impl BootstrapState {
    /// True once the run has stopped, successfully or not.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Failed(_) | Self::Cancelled)
    }
}

/// One solved instrument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolvedStep {
    /// Instrument index.
    pub index: usize,
    /// Instrument tenor.
    pub tenor: Tenor,
    /// Instrument kind.
    pub kind: InstrumentKind,
    /// Quoted rate.
    pub rate: f64,
    /// Instrument maturity.
    pub maturity: Date,
    /// Knot closing the solved segment.
    pub knot: Date,
    /// Solved forward rate.
    pub forward: f64,
    /// Root-finder iterations.
    pub iterations: u32,
    /// Pricing error at the root.
    pub residual: f64,
}

/// One evaluation of the pricing error during a solve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TracePoint {
    /// Instrument index.
    pub step: usize,
    /// Evaluation number within the step, from zero.
    pub evaluation: usize,
    /// Trial forward.
    pub trial: f64,
    /// Pricing error at the trial.
    pub error: f64,
}

/// Details of a failed run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BootstrapFailure {
    /// Index of the instrument that could not be solved.
    pub at_instrument_index: usize,
    /// Its tenor token.
    pub tenor: String,
    /// Pricing error at the last trial (NaN if never evaluated).
    pub last_error: f64,
    /// Last trial forward (NaN if never evaluated).
    pub last_trial: f64,
    /// Root-finder iterations spent.
    pub iterations: u32,
    /// Solver message.
    pub reason: String,
    /// Forwards solved before the failure.
    pub solved: Vec<f64>,
}

/// Result of [`BootstrapEngine::run`](super::BootstrapEngine::run).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BootstrapOutcome {
    /// Every instrument solved.
    Solved {
        /// The solved curve.
        curve: DiscountCurve,
        /// Per-instrument details.
        steps: Vec<SolvedStep>,
    },
    /// The run stopped at an instrument.
    Failed(BootstrapFailure),
    /// The run was cancelled between steps.
    Cancelled {
        /// Number of instruments solved.
        completed: usize,
        /// Their forwards.
        solved: Vec<f64>,
    },
}

impl BootstrapOutcome {
    /// True for [`BootstrapOutcome::Solved`].
    #[must_use]
    pub fn is_solved(&self) -> bool {
        matches!(self, Self::Solved { .. })
    }

    /// The curve, when solved.
    #[must_use]
    pub fn curve(&self) -> Option<&DiscountCurve> {
        match self {
            Self::Solved { curve, .. } => Some(curve),
            _ => None,
        }
    }

    /// Forwards solved by the run, complete or partial.
    #[must_use]
    pub fn solved_forwards(&self) -> &[f64] {
        match self {
            Self::Solved { curve, .. } => curve.forwards(),
            Self::Failed(failure) => &failure.solved,
            Self::Cancelled { solved, .. } => solved,
        }
    }

    /// Converts into the curve or an error naming where the run stopped.
    pub fn into_result(self) -> CurveResult<DiscountCurve> {
        match self {
            Self::Solved { curve, .. } => Ok(curve),
            Self::Failed(failure) => Err(CurveError::BootstrapFailed {
                index: failure.at_instrument_index,
                tenor: failure.tenor,
                reason: failure.reason,
            }),
            Self::Cancelled { completed, .. } => Err(CurveError::Cancelled { completed }),
        }
    }
}

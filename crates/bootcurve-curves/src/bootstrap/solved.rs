//! Append-only vector of solved forwards.

use serde::Serialize;

/// Forward rates solved so far, one per completed instrument.
///
/// Only the engine appends; everything else sees a slice.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SolvedForwards(Vec<f64>);

impl SolvedForwards {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self(Vec::with_capacity(capacity))
    }

    pub(crate) fn push(&mut self, forward: f64) {
        self.0.push(forward);
    }

    pub(crate) fn clear(&mut self) {
        self.0.clear();
    }

    /// The solved forwards.
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Number of solved segments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True before the first segment is solved.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consumes the wrapper.
    #[must_use]
    pub fn into_vec(self) -> Vec<f64> {
        self.0
    }
}

impl AsRef<[f64]> for SolvedForwards {
    fn as_ref(&self) -> &[f64] {
        &self.0
    }
}

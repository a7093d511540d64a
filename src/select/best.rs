//! Running best-candidate tracking under an acceptance threshold.

/// Tracks the best-scoring candidate that strictly exceeds a threshold.
///
/// The running best starts at `0.0`, and a candidate replaces it only on
/// strict improvement, so among equal scores the first one offered wins.
/// NaN scores never qualify.
#[derive(Clone, Copy, Debug)]
pub struct BestTracker {
    threshold: f64,
    best_index: Option<usize>,
    best_score: f64,
}

impl BestTracker {
    /// Creates a tracker with the given acceptance threshold.
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            best_index: None,
            best_score: 0.0,
        }
    }

    /// Offers a scored candidate; returns true if it became the new best.
    pub fn offer(&mut self, index: usize, score: f64) -> bool {
        if score > self.threshold && score > self.best_score {
            self.best_index = Some(index);
            self.best_score = score;
            return true;
        }
        false
    }

    /// Returns `(index, score)` of the current best, if any.
    pub fn best(&self) -> Option<(usize, f64)> {
        self.best_index.map(|index| (index, self.best_score))
    }
}

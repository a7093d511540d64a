//! Best-match selection over a batch of candidate images.
//!
//! The query is canonicalized once; a query failure aborts the whole call.
//! Each candidate is then canonicalized and scored independently. A candidate
//! that fails is recorded in the report's `failures` side channel and skipped,
//! so one bad input never aborts the batch.

use crate::canon::{CanonicalImage, Canonicalizer, ImageDescriptor};
use crate::kernel::scalar::SsimScalar;
use crate::kernel::{Kernel, SsimParams};
use crate::trace::{trace_event, trace_span, trace_warn};
use crate::util::{PrintMatchError, PrintMatchResult};

mod best;
#[cfg(feature = "rayon")]
mod parallel;

pub use best::BestTracker;

/// Minimum score a candidate must strictly exceed to be accepted.
pub const DEFAULT_THRESHOLD: f64 = 0.7;

/// Configuration for candidate selection.
#[derive(Clone, Debug, PartialEq)]
pub struct MatchConfig {
    /// Acceptance threshold; scores must be strictly greater.
    pub threshold: f64,
    /// Evaluate candidates in parallel (requires the `rayon` feature).
    pub parallel: bool,
    /// SSIM parameters used for scoring.
    pub ssim: SsimParams,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            parallel: false,
            ssim: SsimParams::default(),
        }
    }
}

/// Outcome of a selection run.
#[derive(Clone, Debug, PartialEq)]
pub enum MatchResult {
    /// A candidate exceeded the threshold; `percentage` is its score times 100.
    Matched { index: usize, percentage: f64 },
    /// No candidate exceeded the threshold.
    NoMatch,
    /// The query could not be canonicalized; no candidate was inspected.
    Failure { message: String },
}

impl MatchResult {
    /// Index of the matched candidate, if any.
    pub fn index(&self) -> Option<usize> {
        match self {
            MatchResult::Matched { index, .. } => Some(*index),
            _ => None,
        }
    }

    /// Match percentage, if any.
    pub fn percentage(&self) -> Option<f64> {
        match self {
            MatchResult::Matched { percentage, .. } => Some(*percentage),
            _ => None,
        }
    }
}

/// A candidate that could not be canonicalized or scored.
#[derive(Clone, Debug, PartialEq)]
pub struct CandidateFailure {
    /// Position in the original candidate sequence.
    pub index: usize,
    /// What went wrong.
    pub error: PrintMatchError,
}

/// Selection result plus per-candidate diagnostics.
#[derive(Clone, Debug, PartialEq)]
pub struct MatchReport {
    /// The final decision.
    pub result: MatchResult,
    /// Candidates skipped because of an error, in index order.
    pub failures: Vec<CandidateFailure>,
    /// Number of candidates inspected; zero when the query failed.
    pub evaluated: usize,
}

/// Matcher that canonicalizes inputs and picks the best candidate.
#[derive(Clone, Debug, Default)]
pub struct Matcher {
    canonicalizer: Canonicalizer,
    cfg: MatchConfig,
}

impl Matcher {
    /// Creates a matcher with the given canonicalizer and default config.
    pub fn new(canonicalizer: Canonicalizer) -> Self {
        Self {
            canonicalizer,
            cfg: MatchConfig::default(),
        }
    }

    /// Replaces the selection configuration.
    pub fn with_config(mut self, cfg: MatchConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Returns the selection configuration.
    pub fn config(&self) -> &MatchConfig {
        &self.cfg
    }

    /// Returns the canonicalizer used for the query and every candidate.
    pub fn canonicalizer(&self) -> &Canonicalizer {
        &self.canonicalizer
    }

    /// Canonicalizes the query, then selects the best candidate.
    pub fn select_best(
        &self,
        query: &ImageDescriptor,
        candidates: &[ImageDescriptor],
    ) -> MatchReport {
        let _span = trace_span!("select_best", candidates = candidates.len()).entered();

        let query = match self.canonicalizer.canonicalize(query) {
            Ok(query) => query,
            Err(err) => {
                let message = err.to_string();
                trace_warn!("query_failed", error = message.as_str());
                return MatchReport {
                    result: MatchResult::Failure { message },
                    failures: Vec::new(),
                    evaluated: 0,
                };
            }
        };

        self.select_best_canonical(&query, candidates)
    }

    /// Selects the best candidate for an already canonical query.
    pub fn select_best_canonical(
        &self,
        query: &CanonicalImage,
        candidates: &[ImageDescriptor],
    ) -> MatchReport {
        let outcomes = self.evaluate_all(query, candidates);

        let mut tracker = BestTracker::new(self.cfg.threshold);
        let mut failures = Vec::new();
        for (index, outcome) in outcomes.into_iter().enumerate() {
            match outcome {
                Ok(score) => {
                    trace_event!("candidate_scored", index = index, score = score);
                    tracker.offer(index, score);
                }
                Err(error) => {
                    let message = error.to_string();
                    trace_warn!("candidate_failed", index = index, error = message.as_str());
                    failures.push(CandidateFailure { index, error });
                }
            }
        }

        let result = match tracker.best() {
            Some((index, score)) => {
                trace_event!("best_match", index = index, score = score);
                MatchResult::Matched {
                    index,
                    percentage: score * 100.0,
                }
            }
            None => MatchResult::NoMatch,
        };

        MatchReport {
            result,
            failures,
            evaluated: candidates.len(),
        }
    }

    /// Canonicalizes one candidate and scores it against the query.
    pub fn evaluate(
        &self,
        query: &CanonicalImage,
        candidate: &ImageDescriptor,
    ) -> PrintMatchResult<f64> {
        self.evaluate_with::<SsimScalar>(query, candidate)
    }

    /// Like [`Matcher::evaluate`], scoring with the kernel `K`.
    pub fn evaluate_with<K: Kernel>(
        &self,
        query: &CanonicalImage,
        candidate: &ImageDescriptor,
    ) -> PrintMatchResult<f64> {
        let candidate = self.canonicalizer.canonicalize(candidate)?;
        K::score(query.view(), candidate.view(), &self.cfg.ssim)
    }

    fn evaluate_all(
        &self,
        query: &CanonicalImage,
        candidates: &[ImageDescriptor],
    ) -> Vec<PrintMatchResult<f64>> {
        #[cfg(feature = "rayon")]
        if self.cfg.parallel {
            return parallel::evaluate_all_par(self, query, candidates);
        }

        candidates
            .iter()
            .map(|candidate| self.evaluate(query, candidate))
            .collect()
    }
}

/// Selects the best candidate using the default 300x300 geometry and the 0.7
/// threshold.
pub fn select_best(query: &ImageDescriptor, candidates: &[ImageDescriptor]) -> MatchResult {
    Matcher::default().select_best(query, candidates).result
}

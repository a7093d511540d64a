//! Rayon-parallel candidate evaluation (feature-gated).
//!
//! Candidates are canonicalized and scored concurrently, but outcomes are
//! collected in input order and reduced sequentially by the caller, so the
//! strict first-seen tie-break is unchanged. A single candidate leaves no
//! batch to spread, so its SSIM rows are scored in parallel instead.

use crate::canon::{CanonicalImage, ImageDescriptor};
use crate::kernel::rayon::SsimRayon;
use crate::select::Matcher;
use crate::util::PrintMatchResult;
use rayon::prelude::*;

pub(crate) fn evaluate_all_par(
    matcher: &Matcher,
    query: &CanonicalImage,
    candidates: &[ImageDescriptor],
) -> Vec<PrintMatchResult<f64>> {
    if let [candidate] = candidates {
        return vec![matcher.evaluate_with::<SsimRayon>(query, candidate)];
    }

    candidates
        .par_iter()
        .map(|candidate| matcher.evaluate(query, candidate))
        .collect()
}

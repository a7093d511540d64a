//! PrintMatch finds the stored fingerprint image most similar to a query.
//!
//! Inputs arrive as file paths, base64 text or raw bytes and are normalized to
//! a fixed-size grayscale raster. Candidates are scored against the query with
//! the structural similarity index (SSIM) and the best one strictly above the
//! acceptance threshold is reported. Candidate evaluation can run in parallel
//! via the `rayon` feature.

pub mod canon;
pub mod image;
pub mod kernel;
pub mod select;
mod trace;
pub mod util;

pub use canon::{
    canonicalize, CanonicalConfig, CanonicalImage, Canonicalizer, ImageDescriptor, CANONICAL_SIZE,
};
pub use crate::image::{ImageView, OwnedImage};
pub use kernel::{score, score_with, Kernel, SsimParams};
pub use select::{
    select_best, BestTracker, CandidateFailure, MatchConfig, MatchReport, MatchResult, Matcher,
    DEFAULT_THRESHOLD,
};
pub use util::{DecodeError, PrintMatchError, PrintMatchResult};

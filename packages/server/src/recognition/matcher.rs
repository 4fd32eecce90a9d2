use std::path::Path;

use async_trait::async_trait;
use serde::Deserialize;

use super::options::RecognitionConfig;

/// One row of a matcher result table.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Candidate {
    /// Stored path of the matched reference photo.
    pub identity: String,
    #[serde(default)]
    pub distance: Option<f64>,
}

/// Raw answer of the external matcher.
///
/// Different matcher front-ends answer in different shapes; all of them are
/// accepted here and interpreted by [`super::interpret`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum FindOutput {
    /// One candidate table per detected face, each ordered by distance.
    Tables(Vec<Vec<Candidate>>),
    /// A single candidate table.
    Table(Vec<Candidate>),
    /// Liveness verdict with an optional best candidate.
    Flagged {
        is_real: bool,
        #[serde(default)]
        candidate: Option<Candidate>,
    },
    /// Only the closest row.
    Row(Candidate),
    Empty,
}

#[derive(Debug, thiserror::Error)]
pub enum MatcherError {
    /// The input was judged not to be a live face.
    #[error("spoof detected: {0}")]
    Spoof(String),
    #[error("matcher backend failed: {0}")]
    Backend(String),
    #[error("failed to decode matcher output: {0}")]
    Decode(String),
}

/// External face matching capability.
#[async_trait]
pub trait FaceMatcher: Send + Sync {
    /// Match the image at `image_path` against `config.reference_dir`.
    async fn find(
        &self,
        image_path: &Path,
        config: &RecognitionConfig,
    ) -> Result<FindOutput, MatcherError>;
}

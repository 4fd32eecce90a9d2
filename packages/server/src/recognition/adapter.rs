use std::path::Path;
use std::sync::Arc;

use tracing::{error, info, instrument, warn};

use super::matcher::{FaceMatcher, FindOutput, MatcherError};
use super::options::RecognitionConfig;

/// User-facing message returned when the matcher rejects a non-live face.
pub const SPOOF_MESSAGE: &str =
    "Система обнаружила возможную подделку (фото/видео вместо реального лица)";

/// Normalized outcome of one recognition attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchResult {
    NoMatch,
    /// `reference` is the stored path of the closest reference photo.
    Matched { reference: String },
    SpoofRejected { message: String },
    Failed { cause: String },
}

/// Turn any raw matcher answer into a [`MatchResult`].
///
/// Only the first (closest) candidate is considered.
pub fn interpret(output: FindOutput) -> MatchResult {
    let candidate = match output {
        FindOutput::Tables(tables) => tables.into_iter().next().and_then(|t| t.into_iter().next()),
        FindOutput::Table(rows) => rows.into_iter().next(),
        FindOutput::Row(candidate) => Some(candidate),
        FindOutput::Flagged { is_real: false, .. } => {
            return MatchResult::SpoofRejected {
                message: SPOOF_MESSAGE.to_string(),
            };
        }
        FindOutput::Flagged { candidate, .. } => candidate,
        FindOutput::Empty => None,
    };

    match candidate {
        Some(candidate) => MatchResult::Matched {
            reference: candidate.identity,
        },
        None => MatchResult::NoMatch,
    }
}

/// Runs the configured matcher and interprets its answer.
pub struct Recognizer {
    matcher: Arc<dyn FaceMatcher>,
    config: RecognitionConfig,
}

impl Recognizer {
    pub fn new(matcher: Arc<dyn FaceMatcher>, config: RecognitionConfig) -> Self {
        Self { matcher, config }
    }

    pub fn config(&self) -> &RecognitionConfig {
        &self.config
    }

    /// Match one image. Matcher errors never escape; they become
    /// [`MatchResult::SpoofRejected`] or [`MatchResult::Failed`].
    #[instrument(skip(self), fields(image = %image_path.display()))]
    pub async fn identify(&self, image_path: &Path) -> MatchResult {
        let result = match self.matcher.find(image_path, &self.config).await {
            Ok(output) => interpret(output),
            Err(MatcherError::Spoof(detail)) => {
                warn!(detail = %detail, "Matcher reported spoof");
                MatchResult::SpoofRejected {
                    message: SPOOF_MESSAGE.to_string(),
                }
            }
            Err(e) => {
                error!(error = %e, "Face recognition error");
                return MatchResult::Failed {
                    cause: e.to_string(),
                };
            }
        };

        match &result {
            MatchResult::Matched { reference } => info!(reference = %reference, "Face matched"),
            MatchResult::NoMatch => info!("No matching reference face"),
            MatchResult::SpoofRejected { .. } => warn!("Spoof rejected"),
            MatchResult::Failed { .. } => {}
        }

        result
    }
}

//! Face recognition boundary.
//!
//! The external matcher is reached through [`FaceMatcher`]. Whatever shape it
//! answers with is normalized by [`Recognizer`] into a single [`MatchResult`],
//! so nothing past this module looks at raw matcher output.

mod adapter;
mod command;
mod matcher;
mod options;

pub use adapter::{MatchResult, Recognizer, SPOOF_MESSAGE, interpret};
pub use command::{CommandMatcher, LEGACY_SPOOF_ERROR, decode_output};
pub use matcher::{Candidate, FaceMatcher, FindOutput, MatcherError};
pub use options::{DetectorBackend, DistanceMetric, FaceModel, RecognitionConfig};

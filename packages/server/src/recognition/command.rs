use std::ffi::OsString;
use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::process::Command;
use tracing::debug;

use super::matcher::{FaceMatcher, FindOutput, MatcherError};
use super::options::RecognitionConfig;

/// Error text the matcher library raises when anti-spoofing rejects an image.
pub const LEGACY_SPOOF_ERROR: &str = "Spoof detected in the given image.";

/// Failure payload a matcher program may print instead of a result.
#[derive(Debug, Deserialize)]
struct FailurePayload {
    error: String,
    #[serde(default)]
    kind: Option<String>,
}

impl From<FailurePayload> for MatcherError {
    fn from(payload: FailurePayload) -> Self {
        if payload.kind.as_deref() == Some("spoof") || payload.error.trim() == LEGACY_SPOOF_ERROR {
            MatcherError::Spoof(payload.error)
        } else {
            MatcherError::Backend(payload.error)
        }
    }
}

/// Decode the JSON a matcher program printed on stdout.
pub fn decode_output(stdout: &[u8]) -> Result<FindOutput, MatcherError> {
    let value: serde_json::Value =
        serde_json::from_slice(stdout).map_err(|e| MatcherError::Decode(e.to_string()))?;

    if value.get("error").is_some() {
        let payload: FailurePayload =
            serde_json::from_value(value).map_err(|e| MatcherError::Decode(e.to_string()))?;
        return Err(payload.into());
    }

    serde_json::from_value(value).map_err(|e| MatcherError::Decode(e.to_string()))
}

/// Matcher backed by an external program.
///
/// The program is invoked as
/// `<command> <args..> find --img-path P --db-path D --model-name M
/// --detector-backend B --distance-metric C [--threshold T] [--anti-spoofing]`
/// and must print a JSON [`FindOutput`] on success, or
/// `{"error": "...", "kind": "spoof"}` style payloads on failure.
pub struct CommandMatcher {
    program: String,
    base_args: Vec<String>,
}

impl CommandMatcher {
    pub fn new(program: impl Into<String>, base_args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            base_args,
        }
    }

    pub fn from_config(config: &RecognitionConfig) -> Self {
        Self::new(config.command.clone(), config.args.clone())
    }

    fn build_args(&self, image_path: &Path, config: &RecognitionConfig) -> Vec<OsString> {
        let mut args: Vec<OsString> = self.base_args.iter().map(OsString::from).collect();
        args.push("find".into());
        args.push("--img-path".into());
        args.push(image_path.as_os_str().to_owned());
        args.push("--db-path".into());
        args.push(config.reference_dir.as_os_str().to_owned());
        args.push("--model-name".into());
        args.push(config.model.as_str().into());
        args.push("--detector-backend".into());
        args.push(config.detector.as_str().into());
        args.push("--distance-metric".into());
        args.push(config.distance_metric.as_str().into());
        if let Some(threshold) = config.threshold {
            args.push("--threshold".into());
            args.push(threshold.to_string().into());
        }
        if config.anti_spoofing {
            args.push("--anti-spoofing".into());
        }
        args
    }
}

#[async_trait]
impl FaceMatcher for CommandMatcher {
    async fn find(
        &self,
        image_path: &Path,
        config: &RecognitionConfig,
    ) -> Result<FindOutput, MatcherError> {
        let args = self.build_args(image_path, config);
        debug!(program = %self.program, ?args, "Invoking matcher");

        let output = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| MatcherError::Backend(format!("failed to launch {}: {e}", self.program)))?;

        if output.status.success() {
            return decode_output(&output.stdout);
        }

        // A failing program may still describe the failure on stdout.
        match decode_output(&output.stdout) {
            Err(e @ (MatcherError::Spoof(_) | MatcherError::Backend(_))) => Err(e),
            _ => Err(MatcherError::Backend(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            ))),
        }
    }
}

//! Collaborators backed by external programs
//!
//! The configured program is spawned once per call. Its stdout is the
//! collaborator's answer: any JSON value for OCR, and either a bare number
//! or a JSON object with a numeric `score` field for the scoring
//! collaborators. A non-zero exit status is a failure.

use std::process::Stdio;

use async_trait::async_trait;
use serde_json::Value;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, trace};
use vaultiq_config::constants::DOCUMENT_PLACEHOLDER;
use vaultiq_config::CommandSpec;
use vaultiq_errors::{Collaborator, CollaboratorError};
use vaultiq_types::{Document, ExtractedData, Metadata};

use crate::collaborator::{ForgeryDetector, MarketValidator, TextExtractor};

/// Longest stderr excerpt carried in an error
const STDERR_EXCERPT_LEN: usize = 512;

/// Placeholder value used when the document is streamed over stdin
const STDIN_MARKER: &str = "-";

/// Runs a [`CommandSpec`] on behalf of one collaborator role
#[derive(Debug, Clone)]
pub struct CommandCollaborator {
    collaborator: Collaborator,
    spec: CommandSpec,
}

impl CommandCollaborator {
    #[must_use]
    pub fn new(collaborator: Collaborator, spec: CommandSpec) -> Self {
        Self { collaborator, spec }
    }

    #[must_use]
    pub fn collaborator(&self) -> Collaborator {
        self.collaborator
    }

    #[must_use]
    pub fn spec(&self) -> &CommandSpec {
        &self.spec
    }

    /// Arguments with the document placeholder substituted, plus any bytes
    /// that must be written to the child's stdin.
    fn document_invocation(&self, document: &Document) -> (Vec<String>, Option<Vec<u8>>) {
        let (value, stdin) = match document {
            Document::Path(path) => (path.display().to_string(), None),
            Document::Identifier(id) => (id.clone(), None),
            Document::Bytes(bytes) => (STDIN_MARKER.to_string(), Some(bytes.clone())),
        };
        let args = self
            .spec
            .args
            .iter()
            .map(|arg| arg.replace(DOCUMENT_PLACEHOLDER, &value))
            .collect();
        (args, stdin)
    }

    async fn run(&self, args: &[String], stdin: Option<Vec<u8>>) -> Result<String, CollaboratorError> {
        let program = &self.spec.program;
        debug!(collaborator = %self.collaborator, %program, ?args, "spawning collaborator command");

        let mut child = Command::new(program)
            .args(args)
            .envs(&self.spec.env)
            .stdin(if stdin.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                CollaboratorError::failed(self.collaborator, format!("failed to spawn `{program}`: {e}"))
            })?;

        // stdin is fed while stdout and stderr drain, otherwise a child that
        // fills its output pipe before reading all input never finishes.
        let pipe = child.stdin.take();
        let feed = async move {
            let (Some(mut pipe), Some(input)) = (pipe, stdin) else {
                return Ok(());
            };
            // Dropping the pipe afterwards signals EOF to the child.
            match pipe.write_all(&input).await {
                Err(e) if e.kind() == std::io::ErrorKind::BrokenPipe => {
                    trace!("collaborator closed stdin early");
                    Ok(())
                }
                result => result,
            }
        };

        let (written, output) = tokio::join!(feed, child.wait_with_output());
        let output = output.map_err(|e| {
            CollaboratorError::failed(self.collaborator, format!("failed to wait on `{program}`: {e}"))
        })?;
        written.map_err(|e| {
            CollaboratorError::failed(self.collaborator, format!("failed to write to `{program}`: {e}"))
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(CollaboratorError::CommandFailed {
                collaborator: self.collaborator,
                program: program.clone(),
                status: output.status.to_string(),
                stderr: excerpt(stderr.trim()),
            });
        }

        String::from_utf8(output.stdout).map_err(|_| CollaboratorError::InvalidOutput {
            collaborator: self.collaborator,
            message: "stdout is not valid UTF-8".to_string(),
        })
    }

    fn parse_score(&self, stdout: &str) -> Result<f64, CollaboratorError> {
        let trimmed = stdout.trim();
        if let Ok(score) = trimmed.parse::<f64>() {
            return Ok(score);
        }

        let invalid = |message: String| CollaboratorError::InvalidOutput {
            collaborator: self.collaborator,
            message,
        };
        let value: Value =
            serde_json::from_str(trimmed).map_err(|e| invalid(format!("expected a score: {e}")))?;
        match &value {
            Value::Number(n) => n.as_f64(),
            Value::Object(map) => map.get("score").and_then(Value::as_f64),
            _ => None,
        }
        .ok_or_else(|| invalid(format!("expected a number or {{\"score\": <number>}}, got {value}")))
    }
}

fn parse_extracted(stdout: &str) -> ExtractedData {
    let trimmed = stdout.trim();
    serde_json::from_str::<Value>(trimmed)
        .map_or_else(|_| ExtractedData::from_text(trimmed), ExtractedData::new)
}

fn excerpt(text: &str) -> String {
    match text.char_indices().nth(STDERR_EXCERPT_LEN) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

#[async_trait]
impl TextExtractor for CommandCollaborator {
    async fn extract_text(&self, document: &Document) -> Result<ExtractedData, CollaboratorError> {
        let (args, stdin) = self.document_invocation(document);
        let stdout = self.run(&args, stdin).await?;
        Ok(parse_extracted(&stdout))
    }
}

#[async_trait]
impl ForgeryDetector for CommandCollaborator {
    async fn check_forgery(&self, document: &Document) -> Result<f64, CollaboratorError> {
        let (args, stdin) = self.document_invocation(document);
        let stdout = self.run(&args, stdin).await?;
        self.parse_score(&stdout)
    }
}

/// Metadata is written to stdin as JSON and the args are passed unchanged;
/// configuration validation rejects a `{document}` placeholder here.
#[async_trait]
impl MarketValidator for CommandCollaborator {
    async fn validate_market_value(&self, metadata: &Metadata) -> Result<f64, CollaboratorError> {
        let stdout = self
            .run(&self.spec.args, Some(metadata.to_json_string().into_bytes()))
            .await?;
        self.parse_score(&stdout)
    }
}

//! CLI provider: runs a local program per call.
//!
//! The system prompt and the user prompt are written to the program's stdin;
//! its stdout is the answer. The child is killed if the call is dropped, so a
//! dispatcher timeout never leaves a process behind.

use super::{ProviderAdapter, ProviderKind};
use async_trait::async_trait;
use council_application::ports::llm_gateway::GatewayError;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, warn};

pub struct CommandProvider {
    program: String,
    args: Vec<String>,
}

impl CommandProvider {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }
}

/// Text sent on stdin
fn stdin_text(system_prompt: &str, prompt: &str) -> String {
    if system_prompt.trim().is_empty() {
        prompt.to_string()
    } else {
        format!("{}\n\n{}", system_prompt.trim_end(), prompt)
    }
}

#[async_trait]
impl ProviderAdapter for CommandProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Command
    }

    fn is_available(&self) -> bool {
        which::which(&self.program).is_ok()
    }

    async fn complete(&self, system_prompt: &str, prompt: &str) -> Result<String, GatewayError> {
        if !self.is_available() {
            return Err(GatewayError::ProviderUnavailable(format!(
                "{} not found on PATH",
                self.program
            )));
        }

        debug!(program = %self.program, "Spawning provider command");
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                GatewayError::ProviderUnavailable(format!("failed to start {}: {}", self.program, e))
            })?;

        // Feed stdin concurrently so a chatty child cannot block on a full stdout pipe
        let writer = child.stdin.take().map(|mut stdin| {
            let input = stdin_text(system_prompt, prompt);
            tokio::spawn(async move {
                stdin.write_all(input.as_bytes()).await?;
                stdin.shutdown().await
            })
        });

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| GatewayError::RequestFailed(format!("{}: {}", self.program, e)))?;

        if let Some(writer) = writer
            && let Ok(Err(e)) = writer.await
        {
            // The child may legitimately exit without reading all of stdin
            debug!(program = %self.program, error = %e, "stdin write incomplete");
        }

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            warn!(program = %self.program, status = %output.status, "Provider command failed");
            return Err(GatewayError::RequestFailed(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if stdout.is_empty() {
            return Err(GatewayError::EmptyResponse);
        }
        Ok(stdout)
    }
}

//! Text extraction backends
//!
//! The relay never parses PDFs itself. Text comes from an external tool
//! (`pdftotext` by default) when one is installed; otherwise the
//! [`UnavailableExtractor`] stands in and the placeholder text is used.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::config::RelayConfig;
use crate::errors::{Result, ShortifyError};

use super::latex::PLACEHOLDER_TEXT;

#[async_trait]
pub trait TextExtractor: Send + Sync {
    /// Extract plain text from the file at `input`.
    async fn extract(&self, input: &Path) -> Result<String>;

    /// Short description for logs and the health endpoint
    fn name(&self) -> String;

    fn is_available(&self) -> bool {
        true
    }
}

/// Runs `{program} {args...} {input} -` and captures stdout.
pub struct ExternalToolExtractor {
    program: PathBuf,
    args: Vec<String>,
    timeout: Duration,
}

impl ExternalToolExtractor {
    pub fn new(program: impl Into<PathBuf>, args: Vec<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            args,
            timeout,
        }
    }
}

#[async_trait]
impl TextExtractor for ExternalToolExtractor {
    async fn extract(&self, input: &Path) -> Result<String> {
        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .arg(input)
            .arg("-")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        debug!("Running extractor: {:?}", command.as_std());

        let child = command.spawn().map_err(|e| {
            ShortifyError::extraction(format!(
                "Failed to spawn {}: {}",
                self.program.display(),
                e
            ))
        })?;

        // 超时后 future 被丢弃，kill_on_drop 负责结束子进程
        let output = match timeout(self.timeout, child.wait_with_output()).await {
            Ok(result) => result.map_err(|e| {
                ShortifyError::extraction(format!("Failed to wait for extractor: {}", e))
            })?,
            Err(_) => {
                return Err(ShortifyError::extraction(format!(
                    "{} timed out after {}s",
                    self.program.display(),
                    self.timeout.as_secs_f32()
                )));
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ShortifyError::extraction(format!(
                "{} exited with {}: {}",
                self.program.display(),
                output.status,
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn name(&self) -> String {
        self.program.display().to_string()
    }
}

/// Used when no extraction tool was found at startup.
pub struct UnavailableExtractor;

#[async_trait]
impl TextExtractor for UnavailableExtractor {
    async fn extract(&self, _input: &Path) -> Result<String> {
        Ok(PLACEHOLDER_TEXT.to_string())
    }

    fn name(&self) -> String {
        "unavailable".to_string()
    }

    fn is_available(&self) -> bool {
        false
    }
}

/// Locate `program` the way a shell would.
///
/// Names containing a path separator are checked directly; bare names are
/// searched in `PATH`.
pub fn find_program(program: &str) -> Option<PathBuf> {
    if program.is_empty() {
        return None;
    }

    let candidate = Path::new(program);
    if candidate.components().count() > 1 {
        return is_executable(candidate).then(|| candidate.to_path_buf());
    }

    let path_var = std::env::var_os("PATH")?;
    std::env::split_paths(&path_var)
        .map(|dir| dir.join(program))
        .find(|path| is_executable(path))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    std::fs::metadata(path)
        .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file() || path.with_extension("exe").is_file()
}

/// Pick the extractor once at startup by probing the host.
pub fn probe(config: &RelayConfig) -> Arc<dyn TextExtractor> {
    match find_program(&config.extractor_program) {
        Some(path) => {
            info!("Text extractor found: {}", path.display());
            Arc::new(ExternalToolExtractor::new(
                path,
                config.extractor_args.clone(),
                Duration::from_secs(config.extract_timeout_secs.max(1)),
            ))
        }
        None => {
            warn!(
                "Text extractor '{}' not found, uploads will receive placeholder text",
                config.extractor_program
            );
            Arc::new(UnavailableExtractor)
        }
    }
}

//! Where raw inventory bytes come from.

use crate::error::FindError;
use futures::FutureExt;
use futures::future::BoxFuture;
use std::fmt;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::Command;

/// A one-shot provider of raw inventory bytes.
///
/// Called only when the index cache is empty. Implementations make a single
/// attempt and report any failure as [`FindError::CorpusUnavailable`].
pub trait InventorySource: Send + Sync + fmt::Debug {
    fn fetch(&self) -> BoxFuture<'_, Result<Vec<u8>, FindError>>;

    /// Short human-readable description for logs and status output.
    fn describe(&self) -> String;
}

/// Runs an external program and takes its stdout as the inventory.
///
/// The default configuration invokes a Sphinx inventory converter that
/// downloads `objects.inv` and prints the plain-text form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSource {
    program: String,
    args: Vec<String>,
}

impl CommandSource {
    pub fn new(
        program: impl Into<String>,
        args: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    async fn run(&self) -> Result<Vec<u8>, FindError> {
        let output = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| FindError::unavailable(format!("failed to run {}: {}", self.program, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(FindError::unavailable(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            )));
        }

        if output.stdout.is_empty() {
            return Err(FindError::unavailable(format!(
                "{} produced no output",
                self.program
            )));
        }

        Ok(output.stdout)
    }
}

impl InventorySource for CommandSource {
    fn fetch(&self) -> BoxFuture<'_, Result<Vec<u8>, FindError>> {
        self.run().boxed()
    }

    fn describe(&self) -> String {
        if self.args.is_empty() {
            self.program.clone()
        } else {
            format!("{} {}", self.program, self.args.join(" "))
        }
    }
}

/// Reads a previously converted plain-text inventory from disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl InventorySource for FileSource {
    fn fetch(&self) -> BoxFuture<'_, Result<Vec<u8>, FindError>> {
        async move {
            let raw = tokio::fs::read(&self.path).await.map_err(|e| {
                FindError::unavailable(format!("failed to read {}: {}", self.path.display(), e))
            })?;

            if raw.is_empty() {
                return Err(FindError::unavailable(format!(
                    "{} is empty",
                    self.path.display()
                )));
            }

            Ok(raw)
        }
        .boxed()
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

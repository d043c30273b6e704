use std::path::PathBuf;
use std::process::Stdio;

use compio::{io::compat::AsyncStream, process::Command};
use derive_more::Constructor;
use futures::AsyncReadExt;
use snafu::{ResultExt, Snafu};
use tracing::debug;

use crate::ext::BestEffortPathExt;

/// Collects changed-file listings from a git repository.
///
/// Every operation spawns a single `git` process with stdout piped and
/// stderr inherited, so git's own diagnostics still reach the terminal.
#[derive(Debug, Clone, Constructor)]
pub struct GitRepo {
    root: PathBuf,
}

impl GitRepo {
    /// Diff between two revisions, the second defaulting to `HEAD`.
    pub async fn revision_diff(
        &self,
        from: &str,
        to: Option<&str>,
        status_mode: bool,
    ) -> Result<String, GitCommandError> {
        let from = self.resolve(from).await?;
        let to = self.resolve(to.unwrap_or("HEAD")).await?;

        let range = diff_range(&from, &to);
        self.run(&["diff", file_mode(status_mode), &range]).await
    }

    /// Diff of the changes a branch carries on top of its merge base.
    ///
    /// Walks `git rev-list --boundary <from>...<base>` for the first
    /// boundary commit; when the two revisions have no boundary between
    /// them there is nothing to show and `None` is returned.
    pub async fn ancestor_diff(
        &self,
        base: &str,
        from: &str,
        status_mode: bool,
    ) -> Result<Option<String>, GitCommandError> {
        let from = self.resolve(from).await?;

        let listing = self
            .run(&["rev-list", "--boundary", &format!("{from}...{base}")])
            .await?;
        let Some(boundary) = boundary_commit(&listing) else {
            return Ok(None);
        };
        debug!("Found boundary commit {}", boundary);

        let anchor = if boundary.contains(&from) {
            format!("{boundary}~")
        } else {
            boundary.to_string()
        };
        let diff = self
            .run(&["diff", file_mode(status_mode), &format!("{anchor}..{from}")])
            .await?;

        Ok(Some(diff))
    }

    /// Resolves the symbolic `HEAD` to a commit id; anything else is
    /// passed to git verbatim.
    async fn resolve(&self, revision: &str) -> Result<String, GitCommandError> {
        if revision == "HEAD" {
            let output = self.run(&["rev-parse", "HEAD"]).await?;
            Ok(output.trim().to_string())
        } else {
            Ok(revision.to_string())
        }
    }

    async fn run(&self, args: &[&str]) -> Result<String, GitCommandError> {
        let command_line = format!("git {}", args.join(" "));
        debug!(
            "Running '{}' in {}",
            command_line,
            self.root.best_effort_path_display()
        );

        let mut cmd = Command::new("git");
        cmd.args(args);
        cmd.current_dir(&self.root);
        let _ = cmd.stdout(Stdio::piped());

        let mut handle = cmd.spawn().context(SpawnSnafu {
            command: command_line.clone(),
        })?;

        let mut output = String::new();
        if let Some(stdout) = handle.stdout.take() {
            let mut stream = AsyncStream::new(stdout);
            stream
                .read_to_string(&mut output)
                .await
                .context(OutputSnafu {
                    command: command_line.clone(),
                })?;
        }

        let status = handle.wait().await.context(WaitSnafu {
            command: command_line.clone(),
        })?;

        if status.success() {
            Ok(output)
        } else {
            UnsuccessfulExecutionSnafu {
                command: command_line,
                status: status.code().unwrap_or(-1),
            }
            .fail()
        }
    }
}

fn file_mode(status_mode: bool) -> &'static str {
    if status_mode {
        "--name-status"
    } else {
        "--name-only"
    }
}

/// First boundary commit of a `rev-list --boundary` listing, with the
/// leading `-` stripped.
fn boundary_commit(listing: &str) -> Option<&str> {
    listing
        .lines()
        .find_map(|line| line.strip_prefix('-'))
        .filter(|id| !id.is_empty())
}

/// When one endpoint is an abbreviation of the other the plain range is
/// empty, so the diff is anchored one commit further back.
fn diff_range(from: &str, to: &str) -> String {
    if from.contains(to) || to.contains(from) {
        format!("{from}~..{to}")
    } else {
        format!("{from}..{to}")
    }
}

#[derive(Debug, Snafu)]
pub enum GitCommandError {
    #[snafu(display("Failed to spawn '{}'", command))]
    SpawnError {
        command: String,
        source: std::io::Error,
    },
    #[snafu(display("Failed to read the output of '{}'", command))]
    OutputError {
        command: String,
        source: std::io::Error,
    },
    #[snafu(display("Failed to wait for '{}'", command))]
    WaitError {
        command: String,
        source: std::io::Error,
    },
    #[snafu(display("'{}' exited with status {}", command, status))]
    UnsuccessfulExecution { command: String, status: i32 },
}

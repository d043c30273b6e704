use std::num::NonZeroUsize;
use std::path::PathBuf;

use crate::cli::Cli;

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub status: bool,
    pub unicode: bool,
    pub indent_width: Option<NonZeroUsize>,
    pub target: DiffTarget,
    pub root: PathBuf,
}

/// Which pair of revisions the diff is taken between.
#[derive(Debug, Clone)]
pub enum DiffTarget {
    /// Changes the current branch carries on top of a base branch.
    Ancestor { base: String, from: String },
    /// Changes between two arbitrary revisions.
    Range { from: String, to: Option<String> },
}

impl From<Cli> for RuntimeConfig {
    fn from(cli: Cli) -> Self {
        let target = match (cli.rev, cli.branch) {
            (Some(revisions), _) => {
                let mut revisions = revisions.into_iter();
                let from = revisions.next().unwrap_or_else(|| "HEAD".to_string());
                DiffTarget::Range {
                    from,
                    to: revisions.next(),
                }
            }
            (None, Some(base)) => DiffTarget::Ancestor {
                base,
                from: cli.from,
            },
            // The CLI argument group requires one of the two
            (None, None) => unreachable!("either --branch or --rev is required"),
        };

        Self {
            status: cli.status,
            unicode: cli.utf8,
            indent_width: cli.nspaces,
            target,
            root: cli.root,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser as _;

    #[test]
    fn single_revision_ranges_to_head() {
        let cli = Cli::parse_from(["treediff", "-r", "abc123"]);
        let config = RuntimeConfig::from(cli);

        match config.target {
            DiffTarget::Range { from, to } => {
                assert_eq!(from, "abc123");
                assert_eq!(to, None);
            }
            other => panic!("Expected a revision range, got {other:?}"),
        }
    }

    #[test]
    fn branch_without_from_defaults_to_head() {
        let cli = Cli::parse_from(["treediff", "--branch", "main"]);
        let config = RuntimeConfig::from(cli);

        match config.target {
            DiffTarget::Ancestor { base, from } => {
                assert_eq!(base, "main");
                assert_eq!(from, "HEAD");
            }
            other => panic!("Expected ancestor mode, got {other:?}"),
        }
    }

    #[test]
    fn render_flags_carry_over() {
        let cli = Cli::parse_from(["treediff", "-r", "HEAD~2", "-s", "-u", "-n", "2"]);
        let config = RuntimeConfig::from(cli);

        assert!(config.status);
        assert!(config.unicode);
        assert_eq!(config.indent_width, NonZeroUsize::new(2));
    }
}

use std::num::NonZeroUsize;
use std::path::PathBuf;

use clap::{ArgGroup, Parser};

use crate::application::data::LogLevel;

/// Shows a tree-form view of the files modified in a branch or between
/// two revisions.
#[derive(Parser, Debug, Clone)]
#[command(version, about)]
#[clap(group(ArgGroup::new("mode").required(true).args(["branch", "rev"])))]
pub struct Cli {
    /// Annotate each file with its status letter from the diff
    #[clap(long, short)]
    pub status: bool,

    /// Use utf8 characters for tree nodes
    #[clap(long, short)]
    pub utf8: bool,

    /// Number of spaces in each depth level
    #[clap(long, short, value_name = "num")]
    pub nspaces: Option<NonZeroUsize>,

    /// Base branch or revision, must be an ancestor of the <from> revision
    #[clap(long, short, help_heading = "Ancestor mode")]
    pub branch: Option<String>,

    /// Revision from which to obtain the changes
    #[clap(
        long,
        short = 'f',
        value_name = "rev",
        default_value = "HEAD",
        help_heading = "Ancestor mode"
    )]
    pub from: String,

    /// One or two revisions to compare; with one, the other end is HEAD
    #[clap(
        long,
        short,
        value_name = "rev",
        num_args = 1..=2,
        help_heading = "Revision diff"
    )]
    pub rev: Option<Vec<String>>,

    /// The root directory of the repository
    #[clap(long, default_value = ".")]
    pub root: PathBuf,

    #[clap(long, short, default_value = "warn", value_enum)]
    pub log_level: LogLevel,
}

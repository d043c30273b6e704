use std::num::NonZeroUsize;

use snafu::Snafu;
use snafu::prelude::*;
use tracing::debug;

use crate::application::{DiffTarget, RuntimeConfig};
use crate::config::RenderDefaults;
use crate::config::RenderDefaultsError;
use crate::git::GitCommandError;
use crate::git::GitRepo;
use crate::tree::NormalizeError;
use crate::tree::TreeBuildError;
use crate::tree::TreeNode;
use crate::tree::TreeRenderer;
use crate::tree::canonicalize_records;

/// Per-level indent width when neither the command line nor the defaults
/// file sets one.
const DEFAULT_INDENT_WIDTH: usize = 4;

pub struct Application;

impl Application {
    pub async fn run(app_config: impl Into<RuntimeConfig>) -> Result<(), ApplicationError> {
        let app_config: RuntimeConfig = app_config.into();
        let defaults = RenderDefaults::read(&app_config.root)
            .await
            .context(RenderDefaultsSnafu)?;
        debug!("Loaded render defaults: {:?}", defaults);

        let status_mode = app_config.status || defaults.status.unwrap_or(false);
        let unicode = app_config.unicode || defaults.unicode.unwrap_or(false);
        let indent_width = app_config
            .indent_width
            .or(defaults.indent)
            .map(NonZeroUsize::get)
            .unwrap_or(DEFAULT_INDENT_WIDTH);

        let repo = GitRepo::new(app_config.root.clone());
        let raw = match &app_config.target {
            DiffTarget::Ancestor { base, from } => {
                let diff = repo
                    .ancestor_diff(base, from, status_mode)
                    .await
                    .context(DiffCollectionSnafu)?;
                let Some(diff) = diff else {
                    debug!("No boundary commit between the revisions; nothing to show");
                    return Ok(());
                };
                diff
            }
            DiffTarget::Range { from, to } => repo
                .revision_diff(from, to.as_deref(), status_mode)
                .await
                .context(DiffCollectionSnafu)?,
        };

        let records = canonicalize_records(&raw, status_mode).context(NormalizeSnafu)?;
        debug!("Collected {} changed file records", records.len());

        let tree = TreeNode::try_from_records(records, status_mode).context(TreeBuildSnafu)?;
        for line in TreeRenderer::new(indent_width, unicode).render(&tree) {
            println!("{line}");
        }

        Ok(())
    }
}

#[derive(Debug, Snafu)]
pub enum ApplicationError {
    #[snafu(display("Critical failure encountered during configuration stage"))]
    RenderDefaultsError { source: RenderDefaultsError },
    #[snafu(display("Critical failure encountered while collecting the diff"))]
    DiffCollectionError { source: GitCommandError },
    #[snafu(display("Failed to normalize the changed file records"))]
    NormalizeError { source: NormalizeError },
    #[snafu(display("Failed to assemble the changed file tree"))]
    TreeBuildError { source: TreeBuildError },
}

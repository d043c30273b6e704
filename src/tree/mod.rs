//! Tree assembly and rendering for changed-file listings.
//!
//! This module turns the flat path list produced by a diff into a nested
//! tree, where nodes are either directories (that can contain other nodes)
//! or changed files, and renders that tree as indented text lines.

mod node;
mod normalize;
mod render;

pub use node::{TreeBuildError, TreeNode};
pub use normalize::{NormalizeError, canonicalize_records, decode_rename};
pub use render::TreeRenderer;

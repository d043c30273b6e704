use hashlink::LinkedHashMap;
use snafu::Snafu;

use crate::tree::normalize::decode_rename;

/// A node in the changed-file tree.
///
/// Directories keep their children in insertion order, which after the
/// sorted fold in [`TreeNode::try_from_records`] is also the final render
/// order. Nothing may re-sort them later.
#[derive(Debug, Clone, PartialEq)]
pub enum TreeNode {
    Directory {
        children: LinkedHashMap<String, TreeNode>,
    },
    Leaf,
}

impl TreeNode {
    /// Folds canonical path records into a tree rooted at a directory.
    ///
    /// Records are sorted lexicographically first; the sort fixes both the
    /// grouping of shared prefixes and the final output order. With
    /// `decode_renames` the last segment of each record is run through
    /// [`decode_rename`] before it becomes a leaf name.
    pub fn try_from_records(
        mut records: Vec<String>,
        decode_renames: bool,
    ) -> Result<Self, TreeBuildError> {
        records.sort();

        let mut root = Self::root();
        for record in &records {
            root.try_insert_path(record, decode_renames)?;
        }

        Ok(root)
    }

    pub fn try_insert_path(
        &mut self,
        path: &str,
        decode_renames: bool,
    ) -> Result<(), TreeBuildError> {
        let segments: Vec<&str> = path.split('/').collect();
        let last = segments.len() - 1;

        let mut current = self;
        for (depth, segment) in segments[..last].iter().enumerate() {
            let TreeNode::Directory { children } = current else {
                return LeafPrefixConflictSnafu {
                    leaf: segments[..depth].join("/"),
                    path,
                }
                .fail();
            };

            current = children
                .entry((*segment).to_string())
                .or_insert_with(Self::root);
        }

        let TreeNode::Directory { children } = current else {
            return LeafPrefixConflictSnafu {
                leaf: segments[..last].join("/"),
                path,
            }
            .fail();
        };

        let segment = segments[last];
        let name = if decode_renames {
            decode_rename(segment)
        } else {
            segment.to_string()
        };
        match children.get(&name) {
            Some(TreeNode::Directory { .. }) => {
                return DirectoryLeafConflictSnafu { path }.fail();
            }
            // A repeated record collapses into the existing leaf
            Some(TreeNode::Leaf) => {}
            None => {
                children.insert(name, TreeNode::Leaf);
            }
        }

        Ok(())
    }

    pub fn root() -> Self {
        TreeNode::Directory {
            children: LinkedHashMap::new(),
        }
    }
}

#[derive(Debug, Snafu)]
pub enum TreeBuildError {
    #[snafu(display(
        "Path '{}' is already a changed file but '{}' uses it as a directory",
        leaf,
        path
    ))]
    LeafPrefixConflict { leaf: String, path: String },
    #[snafu(display("Path '{}' is already a directory but also appears as a changed file", path))]
    DirectoryLeafConflict { path: String },
}

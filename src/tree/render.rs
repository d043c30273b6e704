use derive_more::Constructor;

use crate::tree::TreeNode;

/// Renders a [`TreeNode`] as indented text lines, one line per node.
///
/// Top-level entries are printed flush-left with no connector; deeper
/// entries get a branch glyph and accumulate a continuation column for
/// every ancestor that is not the last child at its own level.
#[derive(Debug, Clone, Constructor)]
pub struct TreeRenderer {
    indent_width: usize,
    unicode: bool,
}

impl TreeRenderer {
    /// Depth-first pre-order walk over the tree. Directories get a
    /// trailing `/`; children render in their stored insertion order.
    pub fn render(&self, tree: &TreeNode) -> Vec<String> {
        let mut lines = Vec::new();
        if let TreeNode::Directory { children } = tree {
            for (name, node) in children.iter() {
                self.render_node(node, name, 0, "", true, &mut lines);
            }
        }
        lines
    }

    fn render_node(
        &self,
        node: &TreeNode,
        name: &str,
        depth: usize,
        indent: &str,
        last: bool,
        lines: &mut Vec<String>,
    ) {
        let mut line = indent.to_string();
        let mut child_indent = indent.to_string();
        if depth > 0 {
            line.push_str(&self.line_symbol(last));
            child_indent.push_str(&self.indent_symbol(last));
        }
        line.push_str(name);

        match node {
            TreeNode::Directory { children } => {
                line.push('/');
                lines.push(line);

                let child_count = children.len();
                for (position, (child_name, child)) in children.iter().enumerate() {
                    self.render_node(
                        child,
                        child_name,
                        depth + 1,
                        &child_indent,
                        position + 1 == child_count,
                        lines,
                    );
                }
            }
            TreeNode::Leaf => lines.push(line),
        }
    }

    // The ascii glyphs carry a trailing space before the name, the
    // unicode ones do not.
    fn line_symbol(&self, last: bool) -> String {
        let glyph = match (self.unicode, last) {
            (true, true) => "└─",
            (true, false) => "├─",
            (false, true) => r"\- ",
            (false, false) => "|- ",
        };
        format!("{}{}", " ".repeat(self.indent_width), glyph)
    }

    fn indent_symbol(&self, last: bool) -> String {
        let glyph = match (self.unicode, last) {
            (_, true) => "",
            (true, false) => "│ ",
            (false, false) => "| ",
        };
        format!("{}{}", " ".repeat(self.indent_width), glyph)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::canonicalize_records;
    use rstest::*;

    fn build(paths: &[&str]) -> TreeNode {
        TreeNode::try_from_records(paths.iter().map(|p| (*p).to_string()).collect(), false)
            .expect("test paths have no conflicts")
    }

    #[test]
    fn renders_ascii_tree() {
        let tree = build(&["a/b.txt", "a/c.txt", "d.txt"]);
        let lines = TreeRenderer::new(4, false).render(&tree);

        assert_eq!(
            lines,
            vec![
                "a/",
                "    |- b.txt",
                r"    \- c.txt",
                "d.txt",
            ]
        );
    }

    #[test]
    fn renders_unicode_tree() {
        let tree = build(&["a/b.txt", "a/c.txt", "d.txt"]);
        let lines = TreeRenderer::new(4, true).render(&tree);

        assert_eq!(
            lines,
            vec![
                "a/",
                "    ├─b.txt",
                "    └─c.txt",
                "d.txt",
            ]
        );
    }

    #[test]
    fn continuation_bars_track_non_last_ancestors() {
        let tree = build(&["a/b/c.txt", "a/b/d.txt", "a/e.txt", "f.txt"]);
        let lines = TreeRenderer::new(4, false).render(&tree);

        assert_eq!(
            lines,
            vec![
                "a/",
                "    |- b/",
                "    |     |- c.txt",
                r"    |     \- d.txt",
                r"    \- e.txt",
                "f.txt",
            ]
        );
    }

    #[test]
    fn last_ancestors_leave_plain_indentation() {
        let tree = build(&["a/b/c.txt", "d.txt"]);
        let lines = TreeRenderer::new(4, false).render(&tree);

        assert_eq!(
            lines,
            vec![
                "a/",
                r"    \- b/",
                r"        \- c.txt",
                "d.txt",
            ]
        );
    }

    #[rstest]
    #[case(2, "  |- b.txt")]
    #[case(8, "        |- b.txt")]
    fn indent_width_scales_each_level(#[case] width: usize, #[case] expected_first_child: &str) {
        let tree = build(&["a/b.txt"]);
        let lines = TreeRenderer::new(width, false).render(&tree);

        assert_eq!(lines[1], expected_first_child);
    }

    #[test]
    fn empty_tree_renders_no_lines() {
        let lines = TreeRenderer::new(4, false).render(&TreeNode::root());
        assert!(lines.is_empty());
    }

    #[test]
    fn status_records_render_annotated_leaves() {
        let raw = "A\tsrc/main.rs\nM\tREADME.md\n\nR095\tsrc/old.rs\tsrc/new.rs\n";
        let records = canonicalize_records(raw, true).unwrap();
        let tree = TreeNode::try_from_records(records, true).unwrap();
        let lines = TreeRenderer::new(4, false).render(&tree);

        assert_eq!(
            lines,
            vec![
                "README.md[M]",
                "src/",
                "    |- main.rs[A]",
                r"    \- old.rs -> src/new.rs[R]",
            ]
        );
    }
}

//! Tree rendering for debugging and visualization.
//!
//! Shrink trees are lazy and can be very large, so every renderer takes a
//! depth limit and only realizes the nodes it prints.

use super::Tree;
use std::fmt::{Debug, Write};

impl<T: Debug + 'static> Tree<T> {
    /// Render the tree as an indented outline, down to `max_depth` levels.
    pub fn render(&self, max_depth: usize) -> String {
        let mut result = String::new();
        self.render_recursive(&mut result, "", true, max_depth);
        result
    }

    fn render_recursive(&self, result: &mut String, prefix: &str, is_last: bool, depth: usize) {
        let branch = if is_last { "└── " } else { "├── " };
        let _ = writeln!(result, "{prefix}{branch}{:?}", self.root());

        if depth == 0 {
            return;
        }

        let child_prefix = if is_last {
            format!("{prefix}    ")
        } else {
            format!("{prefix}│   ")
        };

        let children = self.children();
        for (i, child) in children.iter().enumerate() {
            child.render_recursive(result, &child_prefix, i + 1 == children.len(), depth - 1);
        }
    }

    /// Render the tree on one line, e.g. `10[5[2], 0]`.
    pub fn render_compact(&self, max_depth: usize) -> String {
        if max_depth == 0 || self.children().is_empty() {
            return format!("{:?}", self.root());
        }
        let children: Vec<String> = self
            .children()
            .iter()
            .map(|child| child.render_compact(max_depth - 1))
            .collect();
        format!("{:?}[{}]", self.root(), children.join(", "))
    }

    /// Render the root followed by its immediate shrinks.
    pub fn render_shrinks(&self) -> String {
        if self.children().is_empty() {
            return format!("{:?} (no shrinks)", self.root());
        }
        let shrinks: Vec<String> = self
            .children()
            .iter()
            .map(|child| format!("{:?}", child.root()))
            .collect();
        format!("{:?} → [{}]", self.root(), shrinks.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::Tree;
    use crate::shrink::int_tree;

    fn sample_tree() -> Tree<i64> {
        Tree::with_children(
            10,
            vec![Tree::with_children(5, vec![Tree::leaf(2)]), Tree::leaf(0)],
        )
    }

    #[test]
    fn test_tree_rendering() {
        let rendered = sample_tree().render(5);
        assert_eq!(rendered, "└── 10\n    ├── 5\n    │   └── 2\n    └── 0\n");
    }

    #[test]
    fn test_compact_rendering() {
        assert_eq!(sample_tree().render_compact(5), "10[5[2], 0]");
        assert_eq!(sample_tree().render_compact(1), "10[5, 0]");
        assert_eq!(Tree::leaf(42).render_compact(3), "42");
    }

    #[test]
    fn test_shrink_rendering() {
        assert_eq!(sample_tree().render_shrinks(), "10 → [5, 0]");
        assert_eq!(Tree::leaf(42).render_shrinks(), "42 (no shrinks)");
        assert_eq!(int_tree(10, 0).render_shrinks(), "10 → [0, 5, 8, 9]");
    }

    #[test]
    fn test_render_depth_limit_keeps_children_lazy() {
        let tree = int_tree(100, 0);
        let rendered = tree.render(0);
        assert_eq!(rendered, "└── 100\n");
        assert!(!tree.is_expanded());
    }
}

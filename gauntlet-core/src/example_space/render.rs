//! Example space rendering for debugging and visualization.

use super::ExampleSpace;
use std::fmt::{Display, Write};

impl<T> ExampleSpace<T>
where
    T: Display + Clone + 'static,
{
    /// Render the space as an indented tree, `depth` levels below the root and
    /// at most `width` children per node.
    pub fn render(&self, depth: usize, width: usize) -> String {
        let mut result = String::new();
        self.render_recursive(&mut result, "", true, depth, width);
        result
    }

    fn render_recursive(
        &self,
        result: &mut String,
        prefix: &str,
        is_last: bool,
        depth: usize,
        width: usize,
    ) {
        result.push_str(prefix);
        result.push_str(if is_last { "└── " } else { "├── " });
        let _ = writeln!(result, "{} ({:.1})", self.value(), self.distance());

        if depth == 0 {
            return;
        }

        let child_prefix = if is_last {
            format!("{prefix}    ")
        } else {
            format!("{prefix}│   ")
        };

        let children: Vec<ExampleSpace<T>> = self.subspace().take(width).collect();
        for (i, child) in children.iter().enumerate() {
            let child_is_last = i == children.len() - 1;
            child.render_recursive(result, &child_prefix, child_is_last, depth - 1, width);
        }
    }

    /// Render the space compactly, showing only values.
    pub fn render_compact(&self, depth: usize) -> String {
        if depth == 0 || !self.has_shrinks() {
            return format!("{}", self.value());
        }

        let children: Vec<String> = self
            .subspace()
            .map(|child| child.render_compact(depth - 1))
            .collect();
        format!("{}[{}]", self.value(), children.join(", "))
    }
}

//! Configuration options for rendering a tree outline.
//!
//! This module provides the `RenderOptions` struct which controls how
//! `TreeQuery::render_tree` lays out its output.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::tree::Depth;

/// Configuration options for rendering a tree as text.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RenderOptions {
    /// Whether to append the type name to each line (`- name : Type`).
    pub include_types: bool,

    /// Spaces before the first line.
    pub base_indent: usize,

    /// Extra spaces for each level below the first.
    pub indent_step: usize,

    /// Levels to print before collapsing a subtree into `- <...>`.
    pub depth: Depth,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            include_types: false,
            base_indent: 0,
            indent_step: 2,
            depth: Depth::Unbounded,
        }
    }
}

impl RenderOptions {
    /// Create new render options with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether type names are printed.
    pub fn include_types(mut self, include_types: bool) -> Self {
        self.include_types = include_types;
        self
    }

    /// Set the indentation of the first line.
    pub fn base_indent(mut self, base_indent: usize) -> Self {
        self.base_indent = base_indent;
        self
    }

    /// Set the indentation added per level.
    pub fn indent_step(mut self, indent_step: usize) -> Self {
        self.indent_step = indent_step;
        self
    }

    /// Set how many levels are printed.
    pub fn depth(mut self, depth: impl Into<Depth>) -> Self {
        self.depth = depth.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = RenderOptions::new();
        assert!(!options.include_types);
        assert_eq!(options.base_indent, 0);
        assert_eq!(options.indent_step, 2);
        assert_eq!(options.depth, Depth::Unbounded);
    }

    #[test]
    fn test_builder() {
        let options = RenderOptions::new()
            .include_types(true)
            .base_indent(4)
            .indent_step(3)
            .depth(2);
        assert!(options.include_types);
        assert_eq!(options.base_indent, 4);
        assert_eq!(options.indent_step, 3);
        assert_eq!(options.depth, Depth::Limited(2));
    }
}

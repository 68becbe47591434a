//! Logging and debugging facilities.
//!
//! Menu Mirror uses the `tracing` crate for instrumentation. To see logs,
//! install a subscriber in the application:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("menu_mirror=trace,menu_mirror_core=debug")
//!     .init();
//! ```
//!
//! Use [`MenuTreeDebug`] to render a model tree:
//!
//! ```ignore
//! use menu_mirror_core::logging::MenuTreeDebug;
//!
//! let root = client.root().unwrap();
//! println!("{}", MenuTreeDebug::new().format_subtree(&root));
//! ```

use crate::model::MenuItem;
use crate::property::props;

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Core crate target.
    pub const CORE: &str = "menu_mirror_core";
    /// Signal/slot system target.
    pub const SIGNAL: &str = "menu_mirror_core::signal";
    /// Abstract menu tree target.
    pub const MODEL: &str = "menu_mirror_core::model";
    /// Model client and type-handler dispatch target.
    pub const CLIENT: &str = "menu_mirror_core::client";
    /// Synchronization engine target.
    pub const SYNC: &str = "menu_mirror::sync";
    /// Icon normalization target.
    pub const ICON: &str = "menu_mirror::icon";
    /// Visual toolkit target.
    pub const TOOLKIT: &str = "menu_mirror::toolkit";
}

/// Style options for tree visualization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TreeStyle {
    /// ASCII characters for tree branches.
    Ascii,
    /// Unicode box-drawing characters.
    #[default]
    Unicode,
    /// Compact representation.
    Compact,
}

/// Configuration for tree debug output.
#[derive(Debug, Clone)]
pub struct TreeFormatOptions {
    /// The style of tree visualization.
    pub style: TreeStyle,
    /// Whether to show item IDs.
    pub show_ids: bool,
    /// Whether to show item kinds.
    pub show_kinds: bool,
    /// Whether to show property names and values.
    pub show_properties: bool,
    /// Maximum depth to traverse (None for unlimited).
    pub max_depth: Option<usize>,
    /// Indent size for each level.
    pub indent_size: usize,
}

impl Default for TreeFormatOptions {
    fn default() -> Self {
        Self {
            style: TreeStyle::default(),
            show_ids: true,
            show_kinds: true,
            show_properties: false,
            max_depth: None,
            indent_size: 2,
        }
    }
}

impl TreeFormatOptions {
    /// Options for detailed debugging output.
    pub fn detailed() -> Self {
        Self {
            show_properties: true,
            ..Default::default()
        }
    }

    /// Options for minimal output: labels only.
    pub fn minimal() -> Self {
        Self {
            show_ids: false,
            show_kinds: false,
            show_properties: false,
            ..Default::default()
        }
    }
}

/// Debug utility for visualizing menu trees.
#[derive(Debug, Clone, Default)]
pub struct MenuTreeDebug {
    options: TreeFormatOptions,
}

impl MenuTreeDebug {
    /// Create a visualizer with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a visualizer with custom options.
    pub fn with_options(options: TreeFormatOptions) -> Self {
        Self { options }
    }

    /// Format the subtree rooted at `root`.
    pub fn format_subtree(&self, root: &MenuItem) -> String {
        let mut output = String::new();
        self.format_subtree_into(root, 0, true, &mut output);
        output
    }

    fn format_subtree_into(&self, item: &MenuItem, depth: usize, is_last: bool, output: &mut String) {
        if self.options.max_depth.is_some_and(|max| depth > max) {
            return;
        }

        output.push_str(&self.build_prefix(depth, is_last));

        let label = item.property_string(props::LABEL).unwrap_or_default();
        let display_name = if item.is_root() {
            "(root)"
        } else if label.is_empty() {
            "(unlabeled)"
        } else {
            &label
        };
        output.push_str(display_name);

        if self.options.show_ids {
            output.push_str(&format!(" [{}]", item.id()));
        }
        if self.options.show_kinds && !item.is_root() {
            output.push_str(&format!(" ({})", item.kind()));
        }
        output.push('\n');

        if self.options.show_properties {
            let prop_prefix = self.build_property_prefix(depth);
            for name in item.property_names() {
                if let Some(value) = item.property(&name) {
                    output.push_str(&format!("{prop_prefix}  .{name} = {value:?}\n"));
                }
            }
        }

        let children = item.children();
        let child_count = children.len();
        for (i, child) in children.iter().enumerate() {
            self.format_subtree_into(child, depth + 1, i + 1 == child_count, output);
        }
    }

    fn build_prefix(&self, depth: usize, is_last: bool) -> String {
        if depth == 0 {
            return String::new();
        }

        let (branch, tee, corner) = match self.options.style {
            TreeStyle::Ascii => ("|", "+--", "`--"),
            TreeStyle::Unicode => ("\u{2502}", "\u{251c}\u{2500}\u{2500}", "\u{2514}\u{2500}\u{2500}"),
            TreeStyle::Compact => ("", "-", "-"),
        };

        let mut prefix = String::new();
        for _ in 0..(depth - 1) {
            prefix.push_str(branch);
            prefix.push_str(&" ".repeat(self.options.indent_size));
        }
        prefix.push_str(if is_last { corner } else { tee });
        prefix.push(' ');
        prefix
    }

    fn build_property_prefix(&self, depth: usize) -> String {
        let branch = match self.options.style {
            TreeStyle::Ascii => "|",
            TreeStyle::Unicode => "\u{2502}",
            TreeStyle::Compact => "",
        };

        let mut prefix = String::new();
        for _ in 0..depth {
            prefix.push_str(branch);
            prefix.push_str(&" ".repeat(self.options.indent_size));
        }
        prefix
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::PropertyValue;

    fn sample_tree() -> std::sync::Arc<MenuItem> {
        let root = MenuItem::new(0);
        root.set_root(true);
        let file = MenuItem::with_properties(1, [(props::LABEL, PropertyValue::from("_File"))]);
        let sep = MenuItem::with_properties(2, [(props::TYPE, PropertyValue::from("separator"))]);
        root.child_append(file.clone()).unwrap();
        root.child_append(sep).unwrap();
        file.child_append(MenuItem::with_properties(3, [(props::LABEL, PropertyValue::from("Quit"))]))
            .unwrap();
        root
    }

    #[test]
    fn test_tree_format_hierarchy() {
        let root = sample_tree();
        let output = MenuTreeDebug::with_options(TreeFormatOptions {
            style: TreeStyle::Ascii,
            ..Default::default()
        })
        .format_subtree(&root);

        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines[0], "(root) [#0]");
        assert_eq!(lines[1], "+-- _File [#1] (standard)");
        assert_eq!(lines[2], "|  `-- Quit [#3] (standard)");
        assert_eq!(lines[3], "`-- (unlabeled) [#2] (separator)");
    }

    #[test]
    fn test_tree_format_minimal_with_depth_limit() {
        let root = sample_tree();
        let output = MenuTreeDebug::with_options(TreeFormatOptions {
            max_depth: Some(1),
            ..TreeFormatOptions::minimal()
        })
        .format_subtree(&root);

        assert!(output.contains("_File"));
        assert!(!output.contains("Quit"));
        assert!(!output.contains("[#"));
    }

    #[test]
    fn test_tree_format_properties() {
        let root = sample_tree();
        let output = MenuTreeDebug::with_options(TreeFormatOptions::detailed()).format_subtree(&root);
        assert!(output.contains(".label = String(\"_File\")"));
    }
}

//! Pairing a model item with its visual item.

use std::sync::Arc;

use menu_mirror_core::logging::targets;
use menu_mirror_core::MenuItem;

use super::{Binding, Synchronizer};
use crate::toolkit::MenuToolkit;

impl<T: MenuToolkit> Synchronizer<T> {
    /// Record `visual` as the visual item of `node` and start following it.
    ///
    /// Subscribes to the node's property, child and lifetime signals, routes
    /// clicks on `visual` back to [`MenuItem::activate`], applies the current
    /// visibility and sensitivity, and finally inserts `visual` into the
    /// parent's submenu if a parent is given.
    pub(crate) fn bind(self: &Arc<Self>, node: &Arc<MenuItem>, visual: T::Item, parent: Option<&Arc<MenuItem>>) {
        let id = node.id();
        tracing::trace!(target: targets::SYNC, %id, ?visual, "binding visual item");

        let previous = self.bindings.write().insert(
            id,
            Binding {
                item: visual.clone(),
                menu: None,
            },
        );
        if let Some(previous) = previous {
            tracing::warn!(target: targets::SYNC, %id, previous = ?previous.item, "menu item bound twice, replacing visual item");
        }

        let sync = Arc::clone(self);
        let weak = Arc::downgrade(node);
        node.property_changed.connect(move |(name, value)| {
            if let Some(node) = weak.upgrade() {
                sync.project_property(&node, name, value.as_ref());
            }
        });

        let sync = Arc::clone(self);
        let weak = Arc::downgrade(node);
        node.child_removed.connect(move |child| {
            if let Some(node) = weak.upgrade() {
                sync.remove_child(&node, child);
            }
        });

        let sync = Arc::clone(self);
        let weak = Arc::downgrade(node);
        node.child_moved.connect(move |(child, new_position, old_position)| {
            if let Some(node) = weak.upgrade() {
                sync.move_child(&node, child, *new_position, *old_position);
            }
        });

        // Fresh children are placed by their own type handler once they are
        // bound; this only re-attaches children that already have a visual.
        let sync = Arc::clone(self);
        let weak = Arc::downgrade(node);
        node.child_added.connect(move |(child, position)| {
            if !sync.is_bound(child.id()) {
                tracing::trace!(target: targets::SYNC, child = %child.id(), "child not rendered yet");
                return;
            }
            if let Some(node) = weak.upgrade() {
                sync.insert_child(&node, child, *position);
            }
        });

        let weak = Arc::downgrade(node);
        self.toolkit.connect_activate(&visual, move || {
            if let Some(node) = weak.upgrade() {
                node.activate();
            }
        });

        let sync = Arc::clone(self);
        node.destroyed.connect(move |id| sync.release(*id));

        self.apply_visible(&visual, node);
        self.apply_sensitive(&visual, node);

        if let Some(parent) = parent {
            match node.position_in(parent) {
                Some(position) => self.insert_child(parent, node, position),
                None => tracing::warn!(
                    target: targets::SYNC,
                    %id,
                    parent = %parent.id(),
                    "menu item is not a child of its parent, not inserting"
                ),
            }
        }
    }
}

//! Mirroring child insertion, removal and reordering.
//!
//! The root's children belong to the application's own top-level menu, so
//! every operation here ignores a root parent.

use menu_mirror_core::logging::targets;
use menu_mirror_core::MenuItem;

use super::Synchronizer;
use crate::error::{MirrorError, MirrorResult};
use crate::toolkit::MenuToolkit;

impl<T: MenuToolkit> Synchronizer<T> {
    /// Put the visual item of `child` at `position` in the submenu of `parent`,
    /// creating the submenu on first use.
    pub(crate) fn insert_child(&self, parent: &MenuItem, child: &MenuItem, position: usize) {
        if parent.is_root() {
            return;
        }

        let child_item = match self.visual_item(child.id()) {
            Ok(item) => item,
            Err(err) => {
                tracing::warn!(target: targets::SYNC, parent = %parent.id(), %err, "cannot insert child");
                return;
            }
        };
        let menu = match self.ensure_menu(parent) {
            Ok(menu) => menu,
            Err(err) => {
                tracing::warn!(target: targets::SYNC, child = %child.id(), %err, "cannot insert child");
                return;
            }
        };

        if self.toolkit.position(&menu, &child_item).is_some() {
            self.toolkit.reorder(&menu, &child_item, position);
        } else {
            self.toolkit.insert(&menu, &child_item, position);
        }
        self.toolkit.show_menu(&menu);

        tracing::trace!(target: targets::SYNC, parent = %parent.id(), child = %child.id(), position, "child inserted");
    }

    /// Take the visual item of `child` out of the submenu of `parent`, and drop
    /// the submenu once `parent` has no children left.
    ///
    /// The child's visual item itself is destroyed when the child dies.
    pub(crate) fn remove_child(&self, parent: &MenuItem, child: &MenuItem) {
        if parent.is_root() {
            return;
        }

        let Some(menu) = self.visual_menu(parent.id()) else {
            tracing::trace!(target: targets::SYNC, parent = %parent.id(), "no submenu to remove from");
            return;
        };
        if let Ok(child_item) = self.visual_item(child.id()) {
            self.toolkit.remove(&menu, &child_item);
        }

        if parent.child_count() > 0 {
            return;
        }
        let menu = self
            .bindings
            .write()
            .get_mut(&parent.id())
            .and_then(|binding| binding.menu.take());
        if let Some(menu) = menu {
            tracing::trace!(target: targets::SYNC, parent = %parent.id(), "last child removed, destroying submenu");
            self.toolkit.destroy_menu(&menu);
        }
    }

    /// Move the visual item of `child` to `new_position` in the submenu of
    /// `parent`.
    pub(crate) fn move_child(&self, parent: &MenuItem, child: &MenuItem, new_position: usize, old_position: usize) {
        if parent.is_root() {
            return;
        }

        let Some(menu) = self.visual_menu(parent.id()) else {
            let err = MirrorError::MissingContainer { id: parent.id() };
            tracing::warn!(target: targets::SYNC, child = %child.id(), %err, "cannot move child");
            return;
        };
        match self.visual_item(child.id()) {
            Ok(child_item) => {
                tracing::trace!(target: targets::SYNC, child = %child.id(), old_position, new_position, "moving child");
                self.toolkit.reorder(&menu, &child_item, new_position);
            }
            Err(err) => tracing::warn!(target: targets::SYNC, parent = %parent.id(), %err, "cannot move child"),
        }
    }

    /// The submenu of `parent`, created, attached and recorded if missing.
    fn ensure_menu(&self, parent: &MenuItem) -> MirrorResult<T::Menu> {
        let id = parent.id();
        let parent_item = {
            let bindings = self.bindings.read();
            let binding = bindings.get(&id).ok_or(MirrorError::MissingBinding { id })?;
            if let Some(menu) = &binding.menu {
                return Ok(menu.clone());
            }
            binding.item.clone()
        };

        let menu = self.toolkit.new_menu();
        tracing::trace!(target: targets::SYNC, %id, ?menu, "creating submenu");
        if let Some(binding) = self.bindings.write().get_mut(&id) {
            binding.menu = Some(menu.clone());
        }
        self.toolkit.set_submenu(&parent_item, Some(&menu));
        self.toolkit.show_menu(&menu);
        Ok(menu)
    }
}

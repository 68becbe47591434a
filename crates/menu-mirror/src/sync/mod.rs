//! The synchronization engine.
//!
//! A [`Synchronizer`] keeps one visual item per rendered model item and
//! follows the model from then on:
//!
//! - `factory` builds the visual item for a new model item
//! - `binder` records the pairing and subscribes to the model item
//! - `structure` mirrors child insertion, removal and reordering
//! - `projector` copies label, visibility, sensitivity and icons across
//! - `lifecycle` releases the visual item when the model item dies
//!
//! The pairing lives in a side table keyed by [`ItemId`]. Model items are
//! never owned by the engine: slots hold them weakly and the table holds
//! only toolkit handles, so dropping the model tree tears down the widgets
//! and never the other way around.

mod binder;
mod factory;
mod lifecycle;
mod projector;
mod structure;

use std::collections::HashMap;

use menu_mirror_core::logging::targets;
use menu_mirror_core::{ItemId, MenuItem};
use parking_lot::RwLock;

use crate::config::MirrorConfig;
use crate::error::{MirrorError, MirrorResult};
use crate::toolkit::MenuToolkit;

/// The visual side of one model item.
struct Binding<T: MenuToolkit> {
    item: T::Item,
    /// Submenu holding the visual items of the model item's children.
    /// Created on first child insertion, destroyed when the last child goes.
    menu: Option<T::Menu>,
}

/// Shared engine state. Cloned into slots as `Arc<Synchronizer<T>>`.
pub(crate) struct Synchronizer<T: MenuToolkit> {
    toolkit: T,
    config: MirrorConfig,
    bindings: RwLock<HashMap<ItemId, Binding<T>>>,
}

impl<T: MenuToolkit> Synchronizer<T> {
    pub(crate) fn new(toolkit: T, config: MirrorConfig) -> Self {
        Self {
            toolkit,
            config,
            bindings: RwLock::new(HashMap::new()),
        }
    }

    pub(crate) fn toolkit(&self) -> &T {
        &self.toolkit
    }

    pub(crate) fn config(&self) -> &MirrorConfig {
        &self.config
    }

    pub(crate) fn is_bound(&self, id: ItemId) -> bool {
        self.bindings.read().contains_key(&id)
    }

    pub(crate) fn bound_count(&self) -> usize {
        self.bindings.read().len()
    }

    /// The visual item bound to `id`.
    pub(crate) fn visual_item(&self, id: ItemId) -> MirrorResult<T::Item> {
        self.bindings
            .read()
            .get(&id)
            .map(|binding| binding.item.clone())
            .ok_or(MirrorError::MissingBinding { id })
    }

    /// Like [`visual_item`](Self::visual_item), logging a miss instead of
    /// returning it.
    pub(crate) fn find_visual_item(&self, node: &MenuItem) -> Option<T::Item> {
        match self.visual_item(node.id()) {
            Ok(item) => Some(item),
            Err(err) => {
                tracing::warn!(target: targets::SYNC, %err, "no visual item for menu item");
                None
            }
        }
    }

    /// The submenu holding the children of `id`, if one exists.
    pub(crate) fn visual_menu(&self, id: ItemId) -> Option<T::Menu> {
        self.bindings.read().get(&id).and_then(|binding| binding.menu.clone())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use menu_mirror_core::{props, MenuItem, PropertyValue};

    use super::*;
    use crate::toolkit::RetainedToolkit;

    fn setup() -> (RetainedToolkit, Arc<Synchronizer<RetainedToolkit>>) {
        let toolkit = RetainedToolkit::new();
        let sync = Arc::new(Synchronizer::new(toolkit.clone(), MirrorConfig::default()));
        (toolkit, sync)
    }

    fn labeled(id: i32, text: &str) -> Arc<MenuItem> {
        MenuItem::with_properties(id, [(props::LABEL, PropertyValue::from(text))])
    }

    #[test]
    fn test_release_is_idempotent() {
        let (toolkit, sync) = setup();
        let node = labeled(1, "Open");
        let item = sync.create(&node, None).unwrap();
        assert!(sync.is_bound(node.id()));

        sync.release(node.id());
        sync.release(node.id());
        assert!(!toolkit.contains_item(&item));
        assert!(!sync.is_bound(node.id()));

        // The destruction hook finds nothing left to do.
        drop(node);
        assert_eq!(toolkit.item_count(), 0);
    }

    #[test]
    fn test_unknown_kind_creates_nothing() {
        let (toolkit, sync) = setup();
        let node = MenuItem::with_properties(1, [(props::TYPE, PropertyValue::from("x-slider"))]);
        let err = sync.create(&node, None).unwrap_err();
        assert!(matches!(err, MirrorError::UnsupportedType { ref kind } if kind == "x-slider"));
        assert_eq!(toolkit.item_count(), 0);
        assert_eq!(sync.bound_count(), 0);
    }

    #[test]
    fn test_root_parent_never_gets_a_container() {
        let (toolkit, sync) = setup();
        let root = MenuItem::new(0);
        root.set_root(true);
        let child = labeled(1, "File");
        root.child_append(child.clone()).unwrap();
        sync.create(&root, None).unwrap();
        sync.create(&child, Some(&root)).unwrap();

        sync.insert_child(&root, &child, 0);
        sync.move_child(&root, &child, 0, 0);
        sync.remove_child(&root, &child);
        assert!(sync.visual_menu(root.id()).is_none());
        assert_eq!(toolkit.menu_count(), 0);
    }

    #[test]
    fn test_move_without_container_is_skipped() {
        let (toolkit, sync) = setup();
        let parent = labeled(1, "Edit");
        let child = labeled(2, "Copy");
        sync.create(&parent, None).unwrap();
        sync.create(&child, None).unwrap();

        sync.move_child(&parent, &child, 0, 1);
        assert!(sync.visual_menu(parent.id()).is_none());
        assert_eq!(toolkit.menu_count(), 0);
    }

    #[test]
    fn test_insert_unbound_child_is_skipped() {
        let (toolkit, sync) = setup();
        let parent = labeled(1, "Edit");
        let child = labeled(2, "Copy");
        sync.create(&parent, None).unwrap();

        sync.insert_child(&parent, &child, 0);
        assert!(sync.visual_menu(parent.id()).is_none());
        assert_eq!(toolkit.menu_count(), 0);
    }

    #[test]
    fn test_visual_item_lookup() {
        let (_toolkit, sync) = setup();
        let node = labeled(4, "Help");
        assert!(matches!(
            sync.visual_item(node.id()),
            Err(MirrorError::MissingBinding { id }) if id == node.id()
        ));
        assert!(sync.find_visual_item(&node).is_none());

        let item = sync.create(&node, None).unwrap();
        assert_eq!(sync.visual_item(node.id()).unwrap(), item);
    }
}

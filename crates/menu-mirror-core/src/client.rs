//! The model-client side of a remote menu connection.
//!
//! [`MenuModelClient`] owns the abstract tree received from one remote menu
//! object, addressed by bus name and object path. The transport layer (not
//! part of this crate) feeds layout and property updates in through
//! [`add_item`](MenuModelClient::add_item),
//! [`remove_item`](MenuModelClient::remove_item),
//! [`move_item`](MenuModelClient::move_item) and the property setters, and
//! listens on [`item_activated`](MenuModelClient::item_activated) to send
//! click events back.
//!
//! Every new non-root item is handed to the type handler registered for its
//! kind. Items whose kind has no handler are reported on
//! [`new_menuitem`](MenuModelClient::new_menuitem) and stay unrendered.

use std::collections::HashMap;
use std::sync::{Arc, Weak};

use parking_lot::RwLock;

use crate::error::{MenuError, MenuResult};
use crate::logging::targets;
use crate::model::{ItemId, MenuItem};
use crate::property::PropertyValue;
use crate::signal::Signal;

/// Builds the visual side of a freshly created item.
///
/// Called with the new item and its parent (absent for detached items).
pub type TypeHandler = Arc<dyn Fn(&Arc<MenuItem>, Option<&Arc<MenuItem>>) -> MenuResult<()> + Send + Sync>;

/// Owner of one remote menu tree and dispatcher of per-kind type handlers.
pub struct MenuModelClient {
    bus_name: String,
    object_path: String,
    root: RwLock<Option<Arc<MenuItem>>>,
    index: RwLock<HashMap<ItemId, Weak<MenuItem>>>,
    type_handlers: RwLock<HashMap<String, TypeHandler>>,

    /// Emitted for new items whose kind has no registered type handler.
    pub new_menuitem: Signal<Arc<MenuItem>>,
    /// Emitted when the root is installed (`Some`) or cleared (`None`).
    pub root_changed: Signal<Option<ItemId>>,
    /// Emitted whenever any item of this tree is activated.
    pub item_activated: Arc<Signal<ItemId>>,
}

impl MenuModelClient {
    /// Create a client for the menu at `object_path` on `bus_name`.
    pub fn new(bus_name: impl Into<String>, object_path: impl Into<String>) -> Self {
        let bus_name = bus_name.into();
        let object_path = object_path.into();
        tracing::debug!(target: targets::CLIENT, %bus_name, %object_path, "creating menu model client");
        Self {
            bus_name,
            object_path,
            root: RwLock::new(None),
            index: RwLock::new(HashMap::new()),
            type_handlers: RwLock::new(HashMap::new()),
            new_menuitem: Signal::new(),
            root_changed: Signal::new(),
            item_activated: Arc::new(Signal::new()),
        }
    }

    /// The remote bus name.
    pub fn bus_name(&self) -> &str {
        &self.bus_name
    }

    /// The remote object path.
    pub fn object_path(&self) -> &str {
        &self.object_path
    }

    // =========================================================================
    // Type handlers
    // =========================================================================

    /// Register the handler for items of `kind`.
    ///
    /// Returns `false` and keeps the existing handler if one is already
    /// registered for this kind.
    pub fn add_type_handler<F>(&self, kind: impl Into<String>, handler: F) -> bool
    where
        F: Fn(&Arc<MenuItem>, Option<&Arc<MenuItem>>) -> MenuResult<()> + Send + Sync + 'static,
    {
        let kind = kind.into();
        let mut handlers = self.type_handlers.write();
        if handlers.contains_key(&kind) {
            tracing::warn!(target: targets::CLIENT, %kind, "type handler already registered");
            return false;
        }
        tracing::debug!(target: targets::CLIENT, %kind, "registered type handler");
        handlers.insert(kind, Arc::new(handler));
        true
    }

    /// Check whether a handler is registered for `kind`.
    pub fn has_type_handler(&self, kind: &str) -> bool {
        self.type_handlers.read().contains_key(kind)
    }

    /// Hand `item` to the handler for its kind.
    ///
    /// Failures are logged and contained; the item then simply stays
    /// unrendered.
    pub fn dispatch(&self, item: &Arc<MenuItem>, parent: Option<&Arc<MenuItem>>) {
        let kind = item.kind();
        let handler = self.type_handlers.read().get(kind.as_str()).cloned();

        match handler {
            Some(handler) => {
                if let Err(err) = handler(item, parent) {
                    tracing::warn!(target: targets::CLIENT, id = %item.id(), %kind, %err, "type handler failed");
                }
            }
            None => {
                tracing::debug!(target: targets::CLIENT, id = %item.id(), %kind, "no type handler for menu item kind");
                self.new_menuitem.emit(item.clone());
            }
        }
    }

    // =========================================================================
    // Tree
    // =========================================================================

    /// The root item, if installed.
    pub fn root(&self) -> Option<Arc<MenuItem>> {
        self.root.read().clone()
    }

    /// Install the root item.
    ///
    /// The root is never handed to a type handler; it is represented by the
    /// application's own top-level menu.
    pub fn set_root<I, K>(&self, id: impl Into<ItemId>, properties: I) -> MenuResult<Arc<MenuItem>>
    where
        I: IntoIterator<Item = (K, PropertyValue)>,
        K: Into<String>,
    {
        let id = id.into();
        if self.root.read().is_some() {
            return Err(MenuError::RootAlreadySet);
        }
        self.ensure_unused(id)?;

        let root = MenuItem::with_properties(id, properties);
        root.set_root(true);
        self.track(&root);
        *self.root.write() = Some(root.clone());

        tracing::debug!(target: targets::CLIENT, %id, "root installed");
        self.root_changed.emit(Some(id));
        Ok(root)
    }

    /// Drop the root and, with it, every item of the tree.
    pub fn clear_root(&self) {
        let root = self.root.write().take();
        if let Some(root) = root {
            tracing::debug!(target: targets::CLIENT, id = %root.id(), "clearing root");
            drop(root);
            self.prune_index();
            self.root_changed.emit(None);
        }
    }

    /// Look up a live item by ID.
    pub fn item(&self, id: impl Into<ItemId>) -> Option<Arc<MenuItem>> {
        self.index.read().get(&id.into()).and_then(Weak::upgrade)
    }

    /// Number of live items, root included.
    pub fn item_count(&self) -> usize {
        self.index
            .read()
            .values()
            .filter(|item| item.strong_count() > 0)
            .count()
    }

    /// Create an item under `parent` and dispatch it to its type handler.
    ///
    /// `position` defaults to appending. The item is attached to its parent
    /// (emitting `child_added`) before the type handler runs, so the handler
    /// sees the final position.
    pub fn add_item<I, K>(
        &self,
        parent: impl Into<ItemId>,
        id: impl Into<ItemId>,
        position: Option<usize>,
        properties: I,
    ) -> MenuResult<Arc<MenuItem>>
    where
        I: IntoIterator<Item = (K, PropertyValue)>,
        K: Into<String>,
    {
        let parent_id = parent.into();
        let id = id.into();
        if self.root.read().is_none() {
            return Err(MenuError::NoRoot);
        }
        self.ensure_unused(id)?;
        let parent = self.item(parent_id).ok_or(MenuError::ItemNotFound(parent_id))?;

        let item = MenuItem::with_properties(id, properties);
        let position = position.unwrap_or_else(|| parent.child_count());
        parent.child_add_position(item.clone(), position)?;
        self.track(&item);

        tracing::trace!(target: targets::CLIENT, %id, parent = %parent_id, position, kind = %item.kind(), "item added");
        self.dispatch(&item, Some(&parent));
        Ok(item)
    }

    /// Detach an item from its parent.
    ///
    /// The item and its subtree are destroyed as soon as no caller holds a
    /// reference to them any more.
    pub fn remove_item(&self, id: impl Into<ItemId>) -> MenuResult<()> {
        let id = id.into();
        let item = self.item(id).ok_or(MenuError::ItemNotFound(id))?;
        let parent = item.parent().ok_or(MenuError::NoParent(id))?;
        drop(item);

        let removed = parent.child_remove(id)?;
        drop(removed);
        self.prune_index();
        tracing::trace!(target: targets::CLIENT, %id, "item removed");
        Ok(())
    }

    /// Move an item to `new_position` among its siblings.
    pub fn move_item(&self, id: impl Into<ItemId>, new_position: usize) -> MenuResult<()> {
        let id = id.into();
        let item = self.item(id).ok_or(MenuError::ItemNotFound(id))?;
        let parent = item.parent().ok_or(MenuError::NoParent(id))?;
        parent.child_reorder(id, new_position)
    }

    /// Set a property on a live item.
    pub fn set_property(
        &self,
        id: impl Into<ItemId>,
        name: &str,
        value: impl Into<PropertyValue>,
    ) -> MenuResult<bool> {
        let id = id.into();
        let item = self.item(id).ok_or(MenuError::ItemNotFound(id))?;
        Ok(item.set_property(name, value))
    }

    /// Remove a property from a live item.
    pub fn remove_property(&self, id: impl Into<ItemId>, name: &str) -> MenuResult<bool> {
        let id = id.into();
        let item = self.item(id).ok_or(MenuError::ItemNotFound(id))?;
        Ok(item.remove_property(name))
    }

    fn ensure_unused(&self, id: ItemId) -> MenuResult<()> {
        if self.item(id).is_some() {
            return Err(MenuError::DuplicateItem(id));
        }
        Ok(())
    }

    fn track(&self, item: &Arc<MenuItem>) {
        let activated = self.item_activated.clone();
        item.activated.connect(move |id| activated.emit(*id));
        self.index.write().insert(item.id(), Arc::downgrade(item));
    }

    fn prune_index(&self) {
        self.index.write().retain(|_, item| item.strong_count() > 0);
    }
}

impl Drop for MenuModelClient {
    fn drop(&mut self) {
        tracing::debug!(target: targets::CLIENT, bus_name = %self.bus_name, object_path = %self.object_path, "menu model client dropped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::props;
    use parking_lot::Mutex;

    fn no_props() -> Vec<(String, PropertyValue)> {
        Vec::new()
    }

    fn setup() -> MenuModelClient {
        let client = MenuModelClient::new("org.example.App", "/MenuBar");
        client.set_root(0, no_props()).unwrap();
        client
    }

    #[test]
    fn test_root_is_flagged_and_unique() {
        let client = setup();
        let root = client.root().unwrap();
        assert!(root.is_root());
        assert_eq!(client.set_root(9, no_props()).unwrap_err(), MenuError::RootAlreadySet);
    }

    #[test]
    fn test_dispatch_to_registered_handler() {
        let client = setup();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let seen_clone = seen.clone();
        assert!(client.add_type_handler("standard", move |item, parent| {
            seen_clone
                .lock()
                .push((item.id(), parent.map(|p| p.id()), item.position_in(parent.unwrap())));
            Ok(())
        }));
        assert!(!client.add_type_handler("standard", |_, _| Ok(())));

        client
            .add_item(0, 1, None, [(props::LABEL, PropertyValue::from("_File"))])
            .unwrap();

        assert_eq!(
            *seen.lock(),
            vec![(ItemId::new(1), Some(ItemId::new(0)), Some(0))]
        );
    }

    #[test]
    fn test_unhandled_kind_goes_to_fallback() {
        let client = setup();
        let unhandled = Arc::new(Mutex::new(Vec::new()));

        let unhandled_clone = unhandled.clone();
        client.new_menuitem.connect(move |item| unhandled_clone.lock().push(item.id()));

        client
            .add_item(0, 5, None, [(props::TYPE, PropertyValue::from("x-slider"))])
            .unwrap();

        assert_eq!(*unhandled.lock(), vec![ItemId::new(5)]);
    }

    #[test]
    fn test_duplicate_and_missing_items() {
        let client = setup();
        client.add_item(0, 1, None, no_props()).unwrap();

        assert_eq!(
            client.add_item(0, 1, None, no_props()).unwrap_err(),
            MenuError::DuplicateItem(ItemId::new(1))
        );
        assert_eq!(
            client.add_item(42, 2, None, no_props()).unwrap_err(),
            MenuError::ItemNotFound(ItemId::new(42))
        );
    }

    #[test]
    fn test_add_before_root() {
        let client = MenuModelClient::new("org.example.App", "/MenuBar");
        assert_eq!(client.add_item(0, 1, None, no_props()).unwrap_err(), MenuError::NoRoot);
        assert_eq!(client.item_count(), 0);
    }

    #[test]
    fn test_root_and_detached_items_have_no_parent() {
        let client = setup();
        assert_eq!(client.remove_item(0).unwrap_err(), MenuError::NoParent(ItemId::new(0)));
        assert_eq!(client.move_item(0, 0).unwrap_err(), MenuError::NoParent(ItemId::new(0)));

        let held = client.add_item(0, 1, None, no_props()).unwrap();
        client.remove_item(1).unwrap();
        assert!(client.item(1).is_some());
        assert_eq!(client.remove_item(1).unwrap_err(), MenuError::NoParent(ItemId::new(1)));
        assert_eq!(client.move_item(1, 0).unwrap_err(), MenuError::NoParent(ItemId::new(1)));
        drop(held);
        assert_eq!(client.move_item(1, 0).unwrap_err(), MenuError::ItemNotFound(ItemId::new(1)));
    }

    #[test]
    fn test_has_type_handler() {
        let client = setup();
        assert!(!client.has_type_handler("standard"));
        client.add_type_handler("standard", |_, _| Ok(()));
        assert!(client.has_type_handler("standard"));
        assert!(!client.has_type_handler("separator"));
    }

    #[test]
    fn test_remove_item_destroys_subtree() {
        let client = setup();
        client.add_item(0, 1, None, no_props()).unwrap();
        client.add_item(1, 2, None, no_props()).unwrap();
        assert_eq!(client.item_count(), 3);

        client.remove_item(1).unwrap();

        assert!(client.item(1).is_none());
        assert!(client.item(2).is_none());
        assert_eq!(client.item_count(), 1);
    }

    #[test]
    fn test_activation_is_forwarded() {
        let client = setup();
        let item = client.add_item(0, 3, None, no_props()).unwrap();
        let activated = Arc::new(Mutex::new(Vec::new()));

        let activated_clone = activated.clone();
        client.item_activated.connect(move |id| activated_clone.lock().push(*id));

        item.activate();
        assert_eq!(*activated.lock(), vec![ItemId::new(3)]);
    }

    #[test]
    fn test_clear_root() {
        let client = setup();
        client.add_item(0, 1, None, no_props()).unwrap();
        let changes = Arc::new(Mutex::new(Vec::new()));

        let changes_clone = changes.clone();
        client.root_changed.connect(move |root| changes_clone.lock().push(*root));

        client.clear_root();
        assert!(client.root().is_none());
        assert_eq!(client.item_count(), 0);
        assert_eq!(*changes.lock(), vec![None]);
    }
}

//! The abstract menu-item tree.
//!
//! A [`MenuItem`] is one node of the remote menu: a stable [`ItemId`], a map of
//! typed properties, and an ordered list of children. Items are shared through
//! `Arc`; a parent owns its children and the [`MenuModelClient`] owns the
//! root, so dropping the root tears the whole tree down.
//!
//! Every mutation is announced through the item's public signals:
//!
//! - [`property_changed`](MenuItem::property_changed): `(name, Some(value))` on
//!   set, `(name, None)` on removal
//! - [`child_added`](MenuItem::child_added): `(child, position)`
//! - [`child_removed`](MenuItem::child_removed): `child`
//! - [`child_moved`](MenuItem::child_moved): `(child, new_position, old_position)`
//! - [`activated`](MenuItem::activated): the user triggered the item
//! - [`destroyed`](MenuItem::destroyed): emitted from `Drop`, exactly once
//!
//! Locks are never held while a signal is emitted.
//!
//! [`MenuModelClient`]: crate::MenuModelClient

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::RwLock;

use crate::error::{MenuError, MenuResult};
use crate::logging::targets;
use crate::property::{props, IconImage, ItemKind, PropertyValue};
use crate::signal::Signal;

/// The identifier the remote side assigned to a menu item.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(i32);

impl ItemId {
    /// Create an ID from the raw protocol value.
    pub const fn new(raw: i32) -> Self {
        Self(raw)
    }

    /// The raw protocol value.
    pub const fn as_raw(self) -> i32 {
        self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<i32> for ItemId {
    fn from(raw: i32) -> Self {
        Self(raw)
    }
}

/// One node of the abstract menu tree.
pub struct MenuItem {
    id: ItemId,
    root: AtomicBool,
    parent: RwLock<Weak<MenuItem>>,
    properties: RwLock<HashMap<String, PropertyValue>>,
    children: RwLock<Vec<Arc<MenuItem>>>,

    /// Emitted when a property is set or removed.
    pub property_changed: Signal<(String, Option<PropertyValue>)>,
    /// Emitted after a child was inserted.
    pub child_added: Signal<(Arc<MenuItem>, usize)>,
    /// Emitted after a child was taken out of the child list.
    pub child_removed: Signal<Arc<MenuItem>>,
    /// Emitted after a child changed position.
    pub child_moved: Signal<(Arc<MenuItem>, usize, usize)>,
    /// Emitted when the item is activated from the visual side.
    pub activated: Signal<ItemId>,
    /// Emitted once, while the item is being dropped.
    pub destroyed: Signal<ItemId>,
}

impl MenuItem {
    /// Create a detached, non-root item with no properties.
    pub fn new(id: impl Into<ItemId>) -> Arc<Self> {
        Self::with_properties(id, std::iter::empty::<(String, PropertyValue)>())
    }

    /// Create a detached, non-root item with initial properties.
    ///
    /// Initial properties are stored silently; no `property_changed` is emitted.
    pub fn with_properties<I, K>(id: impl Into<ItemId>, properties: I) -> Arc<Self>
    where
        I: IntoIterator<Item = (K, PropertyValue)>,
        K: Into<String>,
    {
        let properties = properties
            .into_iter()
            .map(|(name, value)| (name.into(), value))
            .collect();
        Arc::new(Self {
            id: id.into(),
            root: AtomicBool::new(false),
            parent: RwLock::new(Weak::new()),
            properties: RwLock::new(properties),
            children: RwLock::new(Vec::new()),
            property_changed: Signal::new(),
            child_added: Signal::new(),
            child_removed: Signal::new(),
            child_moved: Signal::new(),
            activated: Signal::new(),
            destroyed: Signal::new(),
        })
    }

    /// The item's identifier.
    pub fn id(&self) -> ItemId {
        self.id
    }

    /// Whether this item is the root of its tree.
    pub fn is_root(&self) -> bool {
        self.root.load(Ordering::SeqCst)
    }

    /// Mark or unmark this item as the root.
    pub fn set_root(&self, root: bool) {
        self.root.store(root, Ordering::SeqCst);
    }

    /// The item's parent, if it is attached and the parent is alive.
    pub fn parent(&self) -> Option<Arc<MenuItem>> {
        self.parent.read().upgrade()
    }

    /// The declared kind, read from the `type` property.
    pub fn kind(&self) -> ItemKind {
        ItemKind::from_property(self.properties.read().get(props::TYPE))
    }

    // =========================================================================
    // Properties
    // =========================================================================

    /// Get a copy of a property value.
    pub fn property(&self, name: &str) -> Option<PropertyValue> {
        self.properties.read().get(name).cloned()
    }

    /// Get a string property.
    pub fn property_string(&self, name: &str) -> Option<String> {
        self.properties
            .read()
            .get(name)
            .and_then(PropertyValue::as_str)
            .map(str::to_string)
    }

    /// Get a boolean property, coercing strings and integers.
    pub fn property_bool(&self, name: &str) -> Option<bool> {
        self.properties.read().get(name).and_then(PropertyValue::as_bool)
    }

    /// Get an image property.
    ///
    /// Image values are returned as-is; string values are decoded as base64
    /// encoded image data. Undecodable data yields `None` with a warning.
    pub fn property_image(&self, name: &str) -> Option<IconImage> {
        let value = self.property(name)?;
        if let Some(image) = value.as_image() {
            return Some(image.clone());
        }
        match value {
            PropertyValue::String(encoded) if encoded.is_empty() => None,
            PropertyValue::String(encoded) => match IconImage::from_base64(&encoded) {
                Ok(image) => Some(image),
                Err(err) => {
                    tracing::warn!(target: targets::MODEL, id = %self.id, property = name, %err, "could not decode image property");
                    None
                }
            },
            _ => None,
        }
    }

    /// Names of all properties currently set, sorted.
    pub fn property_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.properties.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Set a property, emitting `property_changed` if the value changed.
    ///
    /// Returns `true` if the value changed.
    pub fn set_property(&self, name: &str, value: impl Into<PropertyValue>) -> bool {
        let value = value.into();
        {
            let mut properties = self.properties.write();
            if properties.get(name) == Some(&value) {
                return false;
            }
            properties.insert(name.to_string(), value.clone());
        }
        tracing::trace!(target: targets::MODEL, id = %self.id, property = name, "property set");
        self.property_changed.emit((name.to_string(), Some(value)));
        true
    }

    /// Remove a property, emitting `property_changed` with no value.
    ///
    /// Returns `true` if the property existed.
    pub fn remove_property(&self, name: &str) -> bool {
        if self.properties.write().remove(name).is_none() {
            return false;
        }
        tracing::trace!(target: targets::MODEL, id = %self.id, property = name, "property removed");
        self.property_changed.emit((name.to_string(), None));
        true
    }

    // =========================================================================
    // Children
    // =========================================================================

    /// A snapshot of the children, in order.
    pub fn children(&self) -> Vec<Arc<MenuItem>> {
        self.children.read().clone()
    }

    /// Number of children.
    pub fn child_count(&self) -> usize {
        self.children.read().len()
    }

    /// Position of the child with the given ID.
    pub fn child_position(&self, child: ItemId) -> Option<usize> {
        self.children.read().iter().position(|c| c.id == child)
    }

    /// Position of this item under `parent`.
    pub fn position_in(&self, parent: &MenuItem) -> Option<usize> {
        parent.child_position(self.id)
    }

    /// Find a direct child by ID.
    pub fn child(&self, child: ItemId) -> Option<Arc<MenuItem>> {
        self.children.read().iter().find(|c| c.id == child).cloned()
    }

    /// Insert `child` at `position`, emitting `child_added`.
    pub fn child_add_position(self: &Arc<Self>, child: Arc<MenuItem>, position: usize) -> MenuResult<()> {
        {
            let mut children = self.children.write();
            if position > children.len() {
                return Err(MenuError::PositionOutOfRange {
                    position,
                    len: children.len(),
                });
            }
            if children.iter().any(|c| c.id == child.id) {
                return Err(MenuError::DuplicateItem(child.id));
            }
            children.insert(position, child.clone());
        }
        *child.parent.write() = Arc::downgrade(self);

        tracing::trace!(target: targets::MODEL, parent = %self.id, child = %child.id, position, "child added");
        self.child_added.emit((child, position));
        Ok(())
    }

    /// Append `child`, emitting `child_added`.
    pub fn child_append(self: &Arc<Self>, child: Arc<MenuItem>) -> MenuResult<()> {
        let position = self.child_count();
        self.child_add_position(child, position)
    }

    /// Take a child out of the list, emitting `child_removed`.
    ///
    /// The removed child is returned; it is destroyed once the last reference
    /// to it goes away.
    pub fn child_remove(&self, child: ItemId) -> MenuResult<Arc<MenuItem>> {
        let removed = {
            let mut children = self.children.write();
            let index = children
                .iter()
                .position(|c| c.id == child)
                .ok_or(MenuError::NotAChild {
                    parent: self.id,
                    child,
                })?;
            children.remove(index)
        };
        *removed.parent.write() = Weak::new();

        tracing::trace!(target: targets::MODEL, parent = %self.id, child = %child, "child removed");
        self.child_removed.emit(removed.clone());
        Ok(removed)
    }

    /// Move a child to `new_position`, emitting `child_moved`.
    pub fn child_reorder(&self, child: ItemId, new_position: usize) -> MenuResult<()> {
        let (moved, old_position) = {
            let mut children = self.children.write();
            let old_position = children
                .iter()
                .position(|c| c.id == child)
                .ok_or(MenuError::NotAChild {
                    parent: self.id,
                    child,
                })?;
            if new_position >= children.len() {
                return Err(MenuError::PositionOutOfRange {
                    position: new_position,
                    len: children.len(),
                });
            }
            let moved = children.remove(old_position);
            children.insert(new_position, moved.clone());
            (moved, old_position)
        };

        if new_position != old_position {
            tracing::trace!(target: targets::MODEL, parent = %self.id, child = %child, new_position, old_position, "child moved");
            self.child_moved.emit((moved, new_position, old_position));
        }
        Ok(())
    }

    /// Forward an activation to the remote side. Fire and forget.
    pub fn activate(&self) {
        tracing::debug!(target: targets::MODEL, id = %self.id, "item activated");
        self.activated.emit(self.id);
    }
}

impl fmt::Debug for MenuItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MenuItem")
            .field("id", &self.id)
            .field("root", &self.is_root())
            .field("kind", &self.kind())
            .field("children", &self.child_count())
            .finish()
    }
}

impl Drop for MenuItem {
    fn drop(&mut self) {
        tracing::trace!(target: targets::MODEL, id = %self.id, "menu item destroyed");
        self.destroyed.emit(self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    fn item_with_label(id: i32, label: &str) -> Arc<MenuItem> {
        MenuItem::with_properties(id, [(props::LABEL, PropertyValue::from(label))])
    }

    #[test]
    fn test_properties_and_notifications() {
        let item = item_with_label(1, "_Open");
        let changes = Arc::new(Mutex::new(Vec::new()));

        let changes_clone = changes.clone();
        item.property_changed.connect(move |(name, value)| {
            changes_clone.lock().push((name.clone(), value.clone()));
        });

        assert_eq!(item.property_string(props::LABEL).as_deref(), Some("_Open"));
        assert!(!item.set_property(props::LABEL, "_Open"));
        assert!(item.set_property(props::VISIBLE, false));
        assert!(item.remove_property(props::VISIBLE));
        assert!(!item.remove_property(props::VISIBLE));

        assert_eq!(
            *changes.lock(),
            vec![
                (props::VISIBLE.to_string(), Some(PropertyValue::Bool(false))),
                (props::VISIBLE.to_string(), None),
            ]
        );
    }

    #[test]
    fn test_typed_property_getters() {
        let icon = IconImage::new(image::RgbaImage::new(4, 4));
        let item = MenuItem::with_properties(
            1,
            [
                (props::VISIBLE, PropertyValue::from("false")),
                (props::SENSITIVE, PropertyValue::Int(1)),
                (props::ICON_DATA, PropertyValue::Image(icon.clone())),
                (props::ICON_NAME, PropertyValue::from("not base64 !")),
            ],
        );

        assert_eq!(item.property_bool(props::VISIBLE), Some(false));
        assert_eq!(item.property_bool(props::SENSITIVE), Some(true));
        assert_eq!(item.property_bool(props::LABEL), None);
        assert!(item.property_image(props::ICON_DATA).is_some_and(|image| image.ptr_eq(&icon)));
        assert!(item.property_image(props::ICON_NAME).is_none());
        assert!(item.property_image(props::LABEL).is_none());
    }

    #[test]
    fn test_child_ordering() {
        let parent = MenuItem::new(1);
        for id in [2, 3, 4] {
            parent.child_append(MenuItem::new(id)).unwrap();
        }

        parent.child_reorder(ItemId::new(4), 0).unwrap();
        let order: Vec<i32> = parent.children().iter().map(|c| c.id().as_raw()).collect();
        assert_eq!(order, vec![4, 2, 3]);

        let child = parent.child(ItemId::new(2)).unwrap();
        assert_eq!(child.position_in(&parent), Some(1));
        assert_eq!(child.parent().map(|p| p.id()), Some(ItemId::new(1)));
    }

    #[test]
    fn test_child_add_out_of_range() {
        let parent = MenuItem::new(1);
        let err = parent.child_add_position(MenuItem::new(2), 1).unwrap_err();
        assert_eq!(err, MenuError::PositionOutOfRange { position: 1, len: 0 });
    }

    #[test]
    fn test_destroyed_emitted_on_drop() {
        let destroyed = Arc::new(Mutex::new(Vec::new()));
        let parent = MenuItem::new(1);
        let child = MenuItem::new(2);

        for item in [&parent, &child] {
            let destroyed = destroyed.clone();
            item.destroyed.connect(move |id| destroyed.lock().push(*id));
        }

        parent.child_append(child).unwrap();
        drop(parent);

        assert_eq!(*destroyed.lock(), vec![ItemId::new(1), ItemId::new(2)]);
    }

    #[test]
    fn test_removed_child_outlives_notification() {
        let parent = MenuItem::new(1);
        parent.child_append(MenuItem::new(2)).unwrap();

        let seen = Arc::new(Mutex::new(None));
        let seen_clone = seen.clone();
        parent.child_removed.connect(move |child| {
            *seen_clone.lock() = Some(child.id());
        });

        let removed = parent.child_remove(ItemId::new(2)).unwrap();
        assert_eq!(*seen.lock(), Some(ItemId::new(2)));
        assert_eq!(parent.child_count(), 0);
        assert!(removed.parent().is_none());
    }
}

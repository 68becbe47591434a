//! The visual toolkit seam.
//!
//! The engine never draws anything itself. It drives a [`MenuToolkit`],
//! which owns the actual widgets and hands out cheap, cloneable handles for
//! them. [`RetainedToolkit`] is an in-memory implementation that keeps the
//! whole widget tree inspectable; native backends implement the same trait.
//!
//! # Ownership
//!
//! Inserting an item into a menu transfers it to that menu. Destroying a
//! menu destroys the items in it, and destroying an item destroys its
//! submenu. Destroying a handle that is already gone is a no-op.

mod mnemonic;
mod retained;

pub use mnemonic::{parse_mnemonic, MnemonicText};
pub use retained::{ItemHandle, MenuHandle, RetainedToolkit};

use std::fmt;

use menu_mirror_core::ConnectionId;

use crate::icon::IconSource;

/// Operations the engine needs from a widget toolkit.
///
/// Handles must stay valid as keys after their widget is destroyed; every
/// operation on a dead handle is ignored.
pub trait MenuToolkit: Send + Sync + 'static {
    /// Handle to a menu item widget.
    type Item: Clone + PartialEq + fmt::Debug + Send + Sync + 'static;
    /// Handle to a menu container (a popup holding items).
    type Menu: Clone + PartialEq + fmt::Debug + Send + Sync + 'static;

    // Items

    /// Create a labeled item.
    fn new_item(&self, label: &str) -> Self::Item;
    /// Create a separator item.
    fn new_separator(&self) -> Self::Item;
    /// Choose whether `_` in the label marks a mnemonic.
    fn set_use_underline(&self, item: &Self::Item, use_underline: bool);
    /// Replace the label text.
    fn set_label(&self, item: &Self::Item, label: &str);
    /// Show or hide the item.
    fn set_visible(&self, item: &Self::Item, visible: bool);
    /// Enable or disable the item.
    fn set_sensitive(&self, item: &Self::Item, sensitive: bool);
    /// The icon currently shown on the item.
    fn icon(&self, item: &Self::Item) -> Option<IconSource>;
    /// Replace or clear the item's icon.
    fn set_icon(&self, item: &Self::Item, icon: Option<IconSource>);
    /// Run `slot` whenever the user activates the item.
    fn connect_activate<F>(&self, item: &Self::Item, slot: F) -> Option<ConnectionId>
    where
        F: Fn() + Send + Sync + 'static;
    /// Destroy the item and its submenu, detaching it from its menu.
    fn destroy_item(&self, item: &Self::Item);

    // Menus

    /// Create an empty, hidden menu.
    fn new_menu(&self) -> Self::Menu;
    /// Attach `menu` as the submenu of `item`, or detach with `None`.
    fn set_submenu(&self, item: &Self::Item, menu: Option<&Self::Menu>);
    /// Make the menu visible.
    fn show_menu(&self, menu: &Self::Menu);
    /// Destroy the menu and every item in it.
    fn destroy_menu(&self, menu: &Self::Menu);
    /// Insert `item` at `position`; positions past the end append.
    fn insert(&self, menu: &Self::Menu, item: &Self::Item, position: usize);
    /// Take `item` out of `menu` without destroying it.
    fn remove(&self, menu: &Self::Menu, item: &Self::Item);
    /// Move an item already in `menu` to `position`.
    fn reorder(&self, menu: &Self::Menu, item: &Self::Item, position: usize);
    /// Index of `item` in `menu`, if it is there.
    fn position(&self, menu: &Self::Menu, item: &Self::Item) -> Option<usize>;
}

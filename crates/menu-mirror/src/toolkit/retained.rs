//! An in-memory widget tree implementing [`MenuToolkit`].
//!
//! [`RetainedToolkit`] keeps every item and menu in a slot map and exposes
//! the resulting tree for inspection. It is the toolkit used by the tests,
//! and a convenient backend for headless consumers that render the menu
//! themselves.
//!
//! # Example
//!
//! ```ignore
//! use menu_mirror::toolkit::{MenuToolkit, RetainedToolkit};
//!
//! let toolkit = RetainedToolkit::new();
//! let menu = toolkit.new_menu();
//! let open = toolkit.new_item("_Open");
//! toolkit.insert(&menu, &open, 0);
//! toolkit.activate(&open);
//! println!("{}", toolkit.dump_menu(&menu));
//! ```

use std::sync::Arc;

use menu_mirror_core::logging::targets;
use menu_mirror_core::{ConnectionId, Signal};
use parking_lot::RwLock;
use slotmap::{new_key_type, SlotMap};

use super::mnemonic::{parse_mnemonic, MnemonicText};
use super::MenuToolkit;
use crate::icon::IconSource;

new_key_type! {
    /// Arena key shared by items and menus.
    struct WidgetId;
}

/// Handle to an item widget of a [`RetainedToolkit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ItemHandle(WidgetId);

/// Handle to a menu widget of a [`RetainedToolkit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MenuHandle(WidgetId);

struct ItemState {
    label: String,
    mnemonic: MnemonicText,
    use_underline: bool,
    separator: bool,
    visible: bool,
    sensitive: bool,
    icon: Option<IconSource>,
    submenu: Option<WidgetId>,
    menu: Option<WidgetId>,
    activated: Arc<Signal<()>>,
}

impl ItemState {
    fn new(label: &str, separator: bool) -> Self {
        Self {
            label: label.to_string(),
            mnemonic: MnemonicText::plain(label),
            use_underline: false,
            separator,
            visible: true,
            sensitive: true,
            icon: None,
            submenu: None,
            menu: None,
            activated: Arc::new(Signal::new()),
        }
    }

    fn refresh_mnemonic(&mut self) {
        self.mnemonic = if self.use_underline {
            parse_mnemonic(&self.label)
        } else {
            MnemonicText::plain(&self.label)
        };
    }
}

#[derive(Default)]
struct MenuState {
    items: Vec<WidgetId>,
    visible: bool,
    attached_to: Option<WidgetId>,
}

enum Widget {
    Item(ItemState),
    Menu(MenuState),
}

type WidgetMap = SlotMap<WidgetId, Widget>;

fn item_ref(widgets: &WidgetMap, id: WidgetId) -> Option<&ItemState> {
    match widgets.get(id) {
        Some(Widget::Item(state)) => Some(state),
        _ => None,
    }
}

fn item_mut(widgets: &mut WidgetMap, id: WidgetId) -> Option<&mut ItemState> {
    match widgets.get_mut(id) {
        Some(Widget::Item(state)) => Some(state),
        _ => None,
    }
}

fn menu_ref(widgets: &WidgetMap, id: WidgetId) -> Option<&MenuState> {
    match widgets.get(id) {
        Some(Widget::Menu(state)) => Some(state),
        _ => None,
    }
}

fn menu_mut(widgets: &mut WidgetMap, id: WidgetId) -> Option<&mut MenuState> {
    match widgets.get_mut(id) {
        Some(Widget::Menu(state)) => Some(state),
        _ => None,
    }
}

/// Widgets removed by one destroy call, reported after the lock is released.
#[derive(Default)]
struct Destroyed {
    items: Vec<ItemHandle>,
    menus: Vec<MenuHandle>,
}

fn destroy_item_in(widgets: &mut WidgetMap, id: WidgetId, out: &mut Destroyed) {
    if item_ref(widgets, id).is_none() {
        return;
    }
    let Some(Widget::Item(state)) = widgets.remove(id) else {
        return;
    };
    if let Some(menu) = state.menu {
        if let Some(menu) = menu_mut(widgets, menu) {
            menu.items.retain(|item| *item != id);
        }
    }
    if let Some(submenu) = state.submenu {
        destroy_menu_in(widgets, submenu, out);
    }
    out.items.push(ItemHandle(id));
}

fn destroy_menu_in(widgets: &mut WidgetMap, id: WidgetId, out: &mut Destroyed) {
    if menu_ref(widgets, id).is_none() {
        return;
    }
    let Some(Widget::Menu(state)) = widgets.remove(id) else {
        return;
    };
    if let Some(owner) = state.attached_to {
        if let Some(owner) = item_mut(widgets, owner) {
            if owner.submenu == Some(id) {
                owner.submenu = None;
            }
        }
    }
    for item in state.items {
        destroy_item_in(widgets, item, out);
    }
    out.menus.push(MenuHandle(id));
}

struct Shared {
    widgets: RwLock<WidgetMap>,
    item_destroyed: Signal<ItemHandle>,
    menu_destroyed: Signal<MenuHandle>,
}

/// A headless, inspectable widget toolkit.
///
/// Cloning yields another handle to the same widget tree.
#[derive(Clone)]
pub struct RetainedToolkit {
    shared: Arc<Shared>,
}

impl Default for RetainedToolkit {
    fn default() -> Self {
        Self::new()
    }
}

impl RetainedToolkit {
    /// Create an empty toolkit.
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Shared {
                widgets: RwLock::new(SlotMap::with_key()),
                item_destroyed: Signal::new(),
                menu_destroyed: Signal::new(),
            }),
        }
    }

    /// Signal emitted for every item widget that is destroyed.
    pub fn item_destroyed(&self) -> &Signal<ItemHandle> {
        &self.shared.item_destroyed
    }

    /// Signal emitted for every menu widget that is destroyed.
    pub fn menu_destroyed(&self) -> &Signal<MenuHandle> {
        &self.shared.menu_destroyed
    }

    fn add_widget(&self, widget: Widget) -> WidgetId {
        self.shared.widgets.write().insert(widget)
    }

    fn read_item<R>(&self, item: &ItemHandle, f: impl FnOnce(&ItemState) -> R) -> Option<R> {
        item_ref(&self.shared.widgets.read(), item.0).map(f)
    }

    fn write_item(&self, item: &ItemHandle, f: impl FnOnce(&mut ItemState)) {
        match item_mut(&mut self.shared.widgets.write(), item.0) {
            Some(state) => f(state),
            None => tracing::trace!(target: targets::TOOLKIT, ?item, "ignoring update of destroyed item"),
        }
    }

    fn report(&self, destroyed: Destroyed) {
        for menu in destroyed.menus {
            tracing::trace!(target: targets::TOOLKIT, ?menu, "menu destroyed");
            self.shared.menu_destroyed.emit(menu);
        }
        for item in destroyed.items {
            tracing::trace!(target: targets::TOOLKIT, ?item, "item destroyed");
            self.shared.item_destroyed.emit(item);
        }
    }

    // =========================================================================
    // Inspection
    // =========================================================================

    /// Check whether the item widget is still alive.
    pub fn contains_item(&self, item: &ItemHandle) -> bool {
        self.read_item(item, |_| ()).is_some()
    }

    /// Check whether the menu widget is still alive.
    pub fn contains_menu(&self, menu: &MenuHandle) -> bool {
        menu_ref(&self.shared.widgets.read(), menu.0).is_some()
    }

    /// Number of live item widgets.
    pub fn item_count(&self) -> usize {
        self.shared
            .widgets
            .read()
            .values()
            .filter(|widget| matches!(widget, Widget::Item(_)))
            .count()
    }

    /// Number of live menu widgets.
    pub fn menu_count(&self) -> usize {
        self.shared
            .widgets
            .read()
            .values()
            .filter(|widget| matches!(widget, Widget::Menu(_)))
            .count()
    }

    /// The raw label text.
    pub fn label(&self, item: &ItemHandle) -> Option<String> {
        self.read_item(item, |state| state.label.clone())
    }

    /// The label as displayed, with mnemonic markers processed.
    pub fn display_text(&self, item: &ItemHandle) -> Option<String> {
        self.read_item(item, |state| state.mnemonic.display_text.clone())
    }

    /// The mnemonic character, if the label has one and underlines are on.
    pub fn mnemonic(&self, item: &ItemHandle) -> Option<char> {
        self.read_item(item, |state| state.mnemonic.mnemonic).flatten()
    }

    /// Whether `_` marks mnemonics in this item's label.
    pub fn uses_underline(&self, item: &ItemHandle) -> Option<bool> {
        self.read_item(item, |state| state.use_underline)
    }

    /// Whether the item is a separator.
    pub fn is_separator(&self, item: &ItemHandle) -> Option<bool> {
        self.read_item(item, |state| state.separator)
    }

    /// Whether the item is shown.
    pub fn is_visible(&self, item: &ItemHandle) -> Option<bool> {
        self.read_item(item, |state| state.visible)
    }

    /// Whether the item can be activated.
    pub fn is_sensitive(&self, item: &ItemHandle) -> Option<bool> {
        self.read_item(item, |state| state.sensitive)
    }

    /// The submenu attached to the item.
    pub fn submenu(&self, item: &ItemHandle) -> Option<MenuHandle> {
        self.read_item(item, |state| state.submenu.map(MenuHandle)).flatten()
    }

    /// The menu the item currently sits in.
    pub fn parent_menu(&self, item: &ItemHandle) -> Option<MenuHandle> {
        self.read_item(item, |state| state.menu.map(MenuHandle)).flatten()
    }

    /// Items of `menu`, in display order. Empty for dead menus.
    pub fn menu_items(&self, menu: &MenuHandle) -> Vec<ItemHandle> {
        menu_ref(&self.shared.widgets.read(), menu.0)
            .map(|state| state.items.iter().copied().map(ItemHandle).collect())
            .unwrap_or_default()
    }

    /// Whether the menu has been shown.
    pub fn is_menu_visible(&self, menu: &MenuHandle) -> bool {
        menu_ref(&self.shared.widgets.read(), menu.0).is_some_and(|state| state.visible)
    }

    /// The item a menu is attached to as a submenu.
    pub fn attached_to(&self, menu: &MenuHandle) -> Option<ItemHandle> {
        menu_ref(&self.shared.widgets.read(), menu.0)
            .and_then(|state| state.attached_to)
            .map(ItemHandle)
    }

    /// Simulate a click on the item.
    ///
    /// Returns `false` without emitting if the item is gone, hidden or
    /// insensitive, or is a separator.
    pub fn activate(&self, item: &ItemHandle) -> bool {
        let signal = self
            .read_item(item, |state| {
                (state.visible && state.sensitive && !state.separator)
                    .then(|| state.activated.clone())
            })
            .flatten();
        match signal {
            Some(signal) => {
                tracing::trace!(target: targets::TOOLKIT, ?item, "item activated");
                signal.emit(());
                true
            }
            None => false,
        }
    }

    /// Render `menu` and its submenus as indented text.
    pub fn dump_menu(&self, menu: &MenuHandle) -> String {
        let widgets = self.shared.widgets.read();
        let mut output = String::new();
        dump_into(&widgets, menu.0, 0, &mut output);
        output
    }
}

fn dump_into(widgets: &WidgetMap, menu: WidgetId, depth: usize, output: &mut String) {
    let Some(state) = menu_ref(widgets, menu) else {
        return;
    };
    for id in &state.items {
        let Some(item) = item_ref(widgets, *id) else {
            continue;
        };
        output.push_str(&"  ".repeat(depth));
        if item.separator {
            output.push_str("----");
        } else {
            output.push_str(&item.mnemonic.display_text);
        }
        if let Some(icon) = &item.icon {
            match icon {
                IconSource::Named { name, .. } => output.push_str(&format!(" [icon: {name}]")),
                IconSource::Pixels(image) => {
                    output.push_str(&format!(" [icon: {}x{}]", image.width(), image.height()))
                }
            }
        }
        if !item.visible {
            output.push_str(" (hidden)");
        }
        if !item.sensitive {
            output.push_str(" (insensitive)");
        }
        output.push('\n');
        if let Some(submenu) = item.submenu {
            dump_into(widgets, submenu, depth + 1, output);
        }
    }
}

impl MenuToolkit for RetainedToolkit {
    type Item = ItemHandle;
    type Menu = MenuHandle;

    fn new_item(&self, label: &str) -> ItemHandle {
        ItemHandle(self.add_widget(Widget::Item(ItemState::new(label, false))))
    }

    fn new_separator(&self) -> ItemHandle {
        ItemHandle(self.add_widget(Widget::Item(ItemState::new("", true))))
    }

    fn set_use_underline(&self, item: &ItemHandle, use_underline: bool) {
        self.write_item(item, |state| {
            state.use_underline = use_underline;
            state.refresh_mnemonic();
        });
    }

    fn set_label(&self, item: &ItemHandle, label: &str) {
        self.write_item(item, |state| {
            state.label = label.to_string();
            state.refresh_mnemonic();
        });
    }

    fn set_visible(&self, item: &ItemHandle, visible: bool) {
        self.write_item(item, |state| state.visible = visible);
    }

    fn set_sensitive(&self, item: &ItemHandle, sensitive: bool) {
        self.write_item(item, |state| state.sensitive = sensitive);
    }

    fn icon(&self, item: &ItemHandle) -> Option<IconSource> {
        self.read_item(item, |state| state.icon.clone()).flatten()
    }

    fn set_icon(&self, item: &ItemHandle, icon: Option<IconSource>) {
        self.write_item(item, |state| state.icon = icon);
    }

    fn connect_activate<F>(&self, item: &ItemHandle, slot: F) -> Option<ConnectionId>
    where
        F: Fn() + Send + Sync + 'static,
    {
        let signal = self.read_item(item, |state| state.activated.clone())?;
        Some(signal.connect(move |_| slot()))
    }

    fn destroy_item(&self, item: &ItemHandle) {
        let mut destroyed = Destroyed::default();
        destroy_item_in(&mut self.shared.widgets.write(), item.0, &mut destroyed);
        self.report(destroyed);
    }

    fn new_menu(&self) -> MenuHandle {
        MenuHandle(self.add_widget(Widget::Menu(MenuState::default())))
    }

    fn set_submenu(&self, item: &ItemHandle, menu: Option<&MenuHandle>) {
        let mut widgets = self.shared.widgets.write();
        if let Some(menu) = menu {
            if menu_ref(&widgets, menu.0).is_none() {
                return;
            }
        }
        let Some(state) = item_mut(&mut widgets, item.0) else {
            return;
        };
        let previous = std::mem::replace(&mut state.submenu, menu.map(|menu| menu.0));
        if let Some(previous) = previous {
            if let Some(previous) = menu_mut(&mut widgets, previous) {
                previous.attached_to = None;
            }
        }
        if let Some(menu) = menu {
            if let Some(menu) = menu_mut(&mut widgets, menu.0) {
                menu.attached_to = Some(item.0);
            }
        }
    }

    fn show_menu(&self, menu: &MenuHandle) {
        if let Some(state) = menu_mut(&mut self.shared.widgets.write(), menu.0) {
            state.visible = true;
        }
    }

    fn destroy_menu(&self, menu: &MenuHandle) {
        let mut destroyed = Destroyed::default();
        destroy_menu_in(&mut self.shared.widgets.write(), menu.0, &mut destroyed);
        self.report(destroyed);
    }

    fn insert(&self, menu: &MenuHandle, item: &ItemHandle, position: usize) {
        let mut widgets = self.shared.widgets.write();
        if menu_ref(&widgets, menu.0).is_none() {
            return;
        }
        let Some(state) = item_mut(&mut widgets, item.0) else {
            return;
        };
        let previous = state.menu.replace(menu.0);
        if let Some(previous) = previous {
            if let Some(previous) = menu_mut(&mut widgets, previous) {
                previous.items.retain(|id| *id != item.0);
            }
        }
        if let Some(state) = menu_mut(&mut widgets, menu.0) {
            let position = position.min(state.items.len());
            state.items.insert(position, item.0);
        }
    }

    fn remove(&self, menu: &MenuHandle, item: &ItemHandle) {
        let mut widgets = self.shared.widgets.write();
        let Some(state) = menu_mut(&mut widgets, menu.0) else {
            return;
        };
        let before = state.items.len();
        state.items.retain(|id| *id != item.0);
        if state.items.len() != before {
            if let Some(item) = item_mut(&mut widgets, item.0) {
                item.menu = None;
            }
        }
    }

    fn reorder(&self, menu: &MenuHandle, item: &ItemHandle, position: usize) {
        let mut widgets = self.shared.widgets.write();
        let Some(state) = menu_mut(&mut widgets, menu.0) else {
            return;
        };
        let Some(current) = state.items.iter().position(|id| *id == item.0) else {
            return;
        };
        let id = state.items.remove(current);
        let position = position.min(state.items.len());
        state.items.insert(position, id);
    }

    fn position(&self, menu: &MenuHandle, item: &ItemHandle) -> Option<usize> {
        menu_ref(&self.shared.widgets.read(), menu.0)?
            .items
            .iter()
            .position(|id| *id == item.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn labels(toolkit: &RetainedToolkit, menu: &MenuHandle) -> Vec<String> {
        toolkit
            .menu_items(menu)
            .iter()
            .filter_map(|item| toolkit.label(item))
            .collect()
    }

    #[test]
    fn test_insert_and_reorder() {
        let toolkit = RetainedToolkit::new();
        let menu = toolkit.new_menu();
        let a = toolkit.new_item("A");
        let b = toolkit.new_item("B");
        let c = toolkit.new_item("C");
        toolkit.insert(&menu, &a, 0);
        toolkit.insert(&menu, &b, 1);
        toolkit.insert(&menu, &c, 99);
        assert_eq!(labels(&toolkit, &menu), ["A", "B", "C"]);

        toolkit.reorder(&menu, &c, 0);
        assert_eq!(labels(&toolkit, &menu), ["C", "A", "B"]);
        assert_eq!(toolkit.position(&menu, &b), Some(2));
        assert_eq!(toolkit.parent_menu(&b), Some(menu));
    }

    #[test]
    fn test_insert_moves_between_menus() {
        let toolkit = RetainedToolkit::new();
        let first = toolkit.new_menu();
        let second = toolkit.new_menu();
        let item = toolkit.new_item("Item");
        toolkit.insert(&first, &item, 0);
        toolkit.insert(&second, &item, 0);
        assert!(toolkit.menu_items(&first).is_empty());
        assert_eq!(toolkit.menu_items(&second), vec![item]);
    }

    #[test]
    fn test_remove_keeps_item_alive() {
        let toolkit = RetainedToolkit::new();
        let menu = toolkit.new_menu();
        let item = toolkit.new_item("Item");
        toolkit.insert(&menu, &item, 0);
        toolkit.remove(&menu, &item);
        assert!(toolkit.menu_items(&menu).is_empty());
        assert!(toolkit.contains_item(&item));
        assert_eq!(toolkit.parent_menu(&item), None);
    }

    #[test]
    fn test_destroy_item_cascades_to_submenu() {
        let toolkit = RetainedToolkit::new();
        let top = toolkit.new_menu();
        let file = toolkit.new_item("File");
        let sub = toolkit.new_menu();
        let open = toolkit.new_item("Open");
        toolkit.insert(&top, &file, 0);
        toolkit.set_submenu(&file, Some(&sub));
        toolkit.insert(&sub, &open, 0);
        assert_eq!(toolkit.attached_to(&sub), Some(file));

        let destroyed = Arc::new(AtomicUsize::new(0));
        let counter = destroyed.clone();
        toolkit.item_destroyed().connect(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        toolkit.destroy_item(&file);
        assert!(!toolkit.contains_item(&file));
        assert!(!toolkit.contains_item(&open));
        assert!(!toolkit.contains_menu(&sub));
        assert!(toolkit.menu_items(&top).is_empty());
        assert_eq!(destroyed.load(Ordering::SeqCst), 2);

        // Dead handles are ignored.
        toolkit.destroy_item(&file);
        toolkit.set_label(&file, "gone");
        assert_eq!(destroyed.load(Ordering::SeqCst), 2);
        assert_eq!(toolkit.label(&file), None);
    }

    #[test]
    fn test_destroy_menu_detaches_from_owner() {
        let toolkit = RetainedToolkit::new();
        let item = toolkit.new_item("Owner");
        let sub = toolkit.new_menu();
        toolkit.set_submenu(&item, Some(&sub));
        toolkit.destroy_menu(&sub);
        assert_eq!(toolkit.submenu(&item), None);
        assert_eq!(toolkit.menu_count(), 0);
    }

    #[test]
    fn test_activation() {
        let toolkit = RetainedToolkit::new();
        let item = toolkit.new_item("Go");
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        toolkit.connect_activate(&item, move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        assert!(toolkit.activate(&item));
        toolkit.set_sensitive(&item, false);
        assert!(!toolkit.activate(&item));
        assert_eq!(hits.load(Ordering::SeqCst), 1);

        let separator = toolkit.new_separator();
        assert!(!toolkit.activate(&separator));
    }

    #[test]
    fn test_mnemonic_follows_use_underline() {
        let toolkit = RetainedToolkit::new();
        let item = toolkit.new_item("_File");
        assert_eq!(toolkit.display_text(&item).as_deref(), Some("_File"));
        toolkit.set_use_underline(&item, true);
        assert_eq!(toolkit.display_text(&item).as_deref(), Some("File"));
        assert_eq!(toolkit.mnemonic(&item), Some('f'));
        toolkit.set_label(&item, "E_xit");
        assert_eq!(toolkit.mnemonic(&item), Some('x'));
    }

    #[test]
    fn test_dump_menu() {
        let toolkit = RetainedToolkit::new();
        let top = toolkit.new_menu();
        let file = toolkit.new_item("_File");
        toolkit.set_use_underline(&file, true);
        let sub = toolkit.new_menu();
        let quit = toolkit.new_item("Quit");
        toolkit.set_sensitive(&quit, false);
        toolkit.set_icon(
            &quit,
            Some(IconSource::named("application-exit", crate::IconSize::MENU)),
        );
        toolkit.insert(&top, &file, 0);
        toolkit.insert(&top, &toolkit.new_separator(), 1);
        toolkit.set_submenu(&file, Some(&sub));
        toolkit.insert(&sub, &quit, 0);

        assert_eq!(
            toolkit.dump_menu(&top),
            "File\n  Quit [icon: application-exit] (insensitive)\n----\n"
        );
    }
}

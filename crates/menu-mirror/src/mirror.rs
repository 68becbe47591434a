//! The public entry point: a model client wired to a synchronizer.

use std::sync::Arc;

use menu_mirror_core::logging::targets;
use menu_mirror_core::{kinds, MenuError, MenuItem, MenuModelClient};

use crate::config::MirrorConfig;
use crate::sync::Synchronizer;
use crate::toolkit::MenuToolkit;

/// A remote menu mirrored into widgets of toolkit `T`.
///
/// Creating a mirror registers type handlers for standard items and
/// separators on a fresh [`MenuModelClient`]. From then on every item the
/// transport adds to the model gets a visual item, and every change to the
/// model is reflected on it.
///
/// The root item is never rendered. Its children are placed by the
/// application, typically into a menu bar, using [`visual_item`].
///
/// [`visual_item`]: MenuMirror::visual_item
pub struct MenuMirror<T: MenuToolkit> {
    // Dropped first so that model teardown still reaches the synchronizer.
    model: MenuModelClient,
    sync: Arc<Synchronizer<T>>,
}

impl<T: MenuToolkit> MenuMirror<T> {
    /// Mirror the menu at `object_path` on `bus_name` with the default
    /// configuration.
    pub fn new(bus_name: impl Into<String>, object_path: impl Into<String>, toolkit: T) -> Self {
        Self::with_config(bus_name, object_path, toolkit, MirrorConfig::default())
    }

    /// Mirror the menu at `object_path` on `bus_name`.
    pub fn with_config(
        bus_name: impl Into<String>,
        object_path: impl Into<String>,
        toolkit: T,
        config: MirrorConfig,
    ) -> Self {
        let model = MenuModelClient::new(bus_name, object_path);
        let sync = Arc::new(Synchronizer::new(toolkit, config));

        for kind in [kinds::STANDARD, kinds::SEPARATOR] {
            let sync = Arc::clone(&sync);
            model.add_type_handler(kind, move |item, parent| {
                sync.create(item, parent).map(|_| ()).map_err(|err| MenuError::TypeHandler {
                    kind: item.kind().to_string(),
                    message: err.to_string(),
                })
            });
        }

        model.new_menuitem.connect(|item| {
            tracing::warn!(
                target: targets::SYNC,
                id = %item.id(),
                kind = %item.kind(),
                "new menu item of a type with no visual representation"
            );
        });

        tracing::debug!(
            target: targets::SYNC,
            bus_name = model.bus_name(),
            object_path = model.object_path(),
            "menu mirror created"
        );
        Self { model, sync }
    }

    /// The model client. The transport feeds layout and property updates
    /// into it.
    pub fn model(&self) -> &MenuModelClient {
        &self.model
    }

    /// The toolkit the visual items live in.
    pub fn toolkit(&self) -> &T {
        self.sync.toolkit()
    }

    /// The active configuration.
    pub fn config(&self) -> &MirrorConfig {
        self.sync.config()
    }

    /// A cloneable handle for use inside custom type handlers.
    pub fn handle(&self) -> MirrorHandle<T> {
        MirrorHandle {
            sync: Arc::clone(&self.sync),
        }
    }

    /// The visual item of `node`. Logs a warning and returns `None` if the
    /// node was never rendered.
    pub fn visual_item(&self, node: &MenuItem) -> Option<T::Item> {
        self.sync.find_visual_item(node)
    }

    /// The submenu holding the children of `node`, if it has one.
    pub fn visual_menu(&self, node: &MenuItem) -> Option<T::Menu> {
        self.sync.visual_menu(node.id())
    }

    /// Adopt a visual item built by a custom type handler.
    ///
    /// See [`MirrorHandle::bind_new_item`].
    pub fn bind_new_item(&self, node: &Arc<MenuItem>, item: T::Item, parent: Option<&Arc<MenuItem>>) {
        self.sync.bind(node, item, parent);
    }

    /// Number of model items currently rendered.
    pub fn rendered_count(&self) -> usize {
        self.sync.bound_count()
    }
}

impl<T: MenuToolkit> Drop for MenuMirror<T> {
    fn drop(&mut self) {
        tracing::debug!(target: targets::SYNC, rendered = self.sync.bound_count(), "dropping menu mirror");
    }
}

/// Shared access to a mirror's engine, for custom type handlers.
///
/// ```ignore
/// let handle = mirror.handle();
/// mirror.model().add_type_handler("x-slider", move |node, parent| {
///     let item = handle.toolkit().new_item("Volume");
///     handle.bind_new_item(node, item, parent);
///     Ok(())
/// });
/// ```
pub struct MirrorHandle<T: MenuToolkit> {
    sync: Arc<Synchronizer<T>>,
}

impl<T: MenuToolkit> Clone for MirrorHandle<T> {
    fn clone(&self) -> Self {
        Self {
            sync: Arc::clone(&self.sync),
        }
    }
}

impl<T: MenuToolkit> MirrorHandle<T> {
    /// The toolkit the visual items live in.
    pub fn toolkit(&self) -> &T {
        self.sync.toolkit()
    }

    /// The active configuration.
    pub fn config(&self) -> &MirrorConfig {
        self.sync.config()
    }

    /// The visual item of `node`, if it was rendered.
    pub fn visual_item(&self, node: &MenuItem) -> Option<T::Item> {
        self.sync.find_visual_item(node)
    }

    /// Adopt `item` as the visual item of `node`.
    ///
    /// The item gets the same treatment as built-in ones: label, visibility
    /// and sensitivity follow the model, clicks are forwarded, children are
    /// placed in its submenu, and it is destroyed with `node`. If `parent` is
    /// given the item is also inserted into the parent's submenu.
    pub fn bind_new_item(&self, node: &Arc<MenuItem>, item: T::Item, parent: Option<&Arc<MenuItem>>) {
        self.sync.bind(node, item, parent);
    }
}

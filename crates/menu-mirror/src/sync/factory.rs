//! Building visual items for new model items.

use std::sync::Arc;

use menu_mirror_core::logging::targets;
use menu_mirror_core::{props, ItemKind, MenuItem};

use super::Synchronizer;
use crate::error::{MirrorError, MirrorResult};
use crate::toolkit::MenuToolkit;

impl<T: MenuToolkit> Synchronizer<T> {
    /// Build, bind and place the visual item for `node`.
    ///
    /// Fails only for kinds without a visual representation; nothing is
    /// created in that case.
    pub(crate) fn create(self: &Arc<Self>, node: &Arc<MenuItem>, parent: Option<&Arc<MenuItem>>) -> MirrorResult<T::Item> {
        match node.kind() {
            ItemKind::Normal => Ok(self.create_normal(node, parent)),
            ItemKind::Separator => Ok(self.create_separator(node, parent)),
            ItemKind::Unknown(kind) => Err(MirrorError::UnsupportedType { kind }),
        }
    }

    fn create_normal(self: &Arc<Self>, node: &Arc<MenuItem>, parent: Option<&Arc<MenuItem>>) -> T::Item {
        let label = node.property_string(props::LABEL).unwrap_or_default();
        tracing::debug!(target: targets::SYNC, id = %node.id(), %label, "creating menu item");

        let visual = self.toolkit.new_item(&label);
        self.toolkit.set_use_underline(&visual, self.config.use_underline);
        self.bind(node, visual.clone(), parent);

        self.update_icon(node, props::ICON_NAME, node.property(props::ICON_NAME).as_ref());
        self.update_icon(node, props::ICON_DATA, node.property(props::ICON_DATA).as_ref());

        let sync = Arc::clone(self);
        let weak = Arc::downgrade(node);
        node.property_changed.connect(move |(name, value)| {
            if name != props::ICON_NAME && name != props::ICON_DATA {
                return;
            }
            if let Some(node) = weak.upgrade() {
                sync.update_icon(&node, name, value.as_ref());
            }
        });

        visual
    }

    fn create_separator(self: &Arc<Self>, node: &Arc<MenuItem>, parent: Option<&Arc<MenuItem>>) -> T::Item {
        tracing::debug!(target: targets::SYNC, id = %node.id(), "creating separator");

        let visual = self.toolkit.new_separator();
        self.toolkit.set_use_underline(&visual, self.config.use_underline);
        self.bind(node, visual.clone(), parent);
        visual
    }
}

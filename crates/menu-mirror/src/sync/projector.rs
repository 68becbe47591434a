//! Copying model properties onto visual items.

use menu_mirror_core::logging::targets;
use menu_mirror_core::{props, MenuItem, PropertyValue};

use super::Synchronizer;
use crate::icon::{fit_to_bounds, IconSource};
use crate::toolkit::MenuToolkit;

/// The two properties an icon can come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum IconProperty {
    Name,
    Data,
}

impl IconProperty {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            props::ICON_NAME => Some(IconProperty::Name),
            props::ICON_DATA => Some(IconProperty::Data),
            _ => None,
        }
    }

    fn other(self) -> Self {
        match self {
            IconProperty::Name => IconProperty::Data,
            IconProperty::Data => IconProperty::Name,
        }
    }
}

/// Absent means `true`; values that are not booleans mean `false`.
fn flag_or_default(node: &MenuItem, name: &str) -> bool {
    node.property(name).is_none() || node.property_bool(name).unwrap_or(false)
}

impl<T: MenuToolkit> Synchronizer<T> {
    /// Apply a label, visibility or sensitivity change. Other properties are
    /// ignored here.
    pub(crate) fn project_property(&self, node: &MenuItem, name: &str, value: Option<&PropertyValue>) {
        let item = match self.visual_item(node.id()) {
            Ok(item) => item,
            Err(err) => {
                tracing::warn!(target: targets::SYNC, property = name, %err, "dropping property update");
                return;
            }
        };

        match name {
            props::LABEL => {
                let label = value.and_then(PropertyValue::as_str).unwrap_or("");
                self.toolkit.set_label(&item, label);
            }
            props::VISIBLE => self.apply_visible(&item, node),
            props::SENSITIVE => self.apply_sensitive(&item, node),
            _ => {}
        }
    }

    /// Show or hide `item` from the current `visible` property of `node`.
    pub(crate) fn apply_visible(&self, item: &T::Item, node: &MenuItem) {
        self.toolkit.set_visible(item, flag_or_default(node, props::VISIBLE));
    }

    /// Enable or disable `item` from the current `sensitive` property of `node`.
    pub(crate) fn apply_sensitive(&self, item: &T::Item, node: &MenuItem) {
        self.toolkit.set_sensitive(item, flag_or_default(node, props::SENSITIVE));
    }

    /// Recompute the icon of `node` after `property` changed to `value`.
    ///
    /// A named icon wins over pixels: pixel updates are ignored while a named
    /// icon is shown. An emptied property falls back to the other one.
    pub(crate) fn update_icon(&self, node: &MenuItem, property: &str, value: Option<&PropertyValue>) {
        let Some(incoming) = IconProperty::from_name(property) else {
            return;
        };
        let item = match self.visual_item(node.id()) {
            Ok(item) => item,
            Err(err) => {
                tracing::warn!(target: targets::ICON, property, %err, "handling icon properties on an unrendered item");
                return;
            }
        };

        if incoming == IconProperty::Data && self.toolkit.icon(&item).is_some_and(|icon| icon.is_named()) {
            tracing::trace!(target: targets::ICON, id = %node.id(), "keeping named icon over icon data");
            return;
        }

        let source = if value.is_none_or(PropertyValue::is_empty) {
            incoming.other()
        } else {
            incoming
        };

        let icon = match source {
            IconProperty::Name => node
                .property_string(props::ICON_NAME)
                .filter(|name| !name.is_empty())
                .map(|name| IconSource::named(name, self.config.icon_size)),
            IconProperty::Data => node.property_image(props::ICON_DATA).map(|image| {
                IconSource::Pixels(fit_to_bounds(&image, self.config.icon_size, self.config.resize_filter))
            }),
        };

        tracing::trace!(target: targets::ICON, id = %node.id(), ?source, has_icon = icon.is_some(), "updating icon");
        self.toolkit.set_icon(&item, icon);
    }
}

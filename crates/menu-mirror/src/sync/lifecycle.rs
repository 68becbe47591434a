//! Destroying visual items once their model items are gone.

use menu_mirror_core::logging::targets;
use menu_mirror_core::ItemId;

use super::Synchronizer;
use crate::toolkit::MenuToolkit;

impl<T: MenuToolkit> Synchronizer<T> {
    /// Destroy the visual item of a model item that is going away.
    ///
    /// Safe to call any number of times; only the first call finds a binding.
    pub(crate) fn release(&self, id: ItemId) {
        let binding = self.bindings.write().remove(&id);
        match binding {
            Some(binding) => {
                tracing::trace!(target: targets::SYNC, %id, item = ?binding.item, "releasing visual item");
                self.toolkit.destroy_item(&binding.item);
            }
            None => tracing::trace!(target: targets::SYNC, %id, "nothing bound to release"),
        }
    }
}

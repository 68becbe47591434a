//! Error types for the mirror engine.

use menu_mirror_core::ItemId;
use thiserror::Error;

/// Errors raised while mirroring a menu model into visual widgets.
///
/// None of these are fatal. The engine logs them and leaves the affected
/// item unchanged.
#[derive(Error, Debug)]
pub enum MirrorError {
    /// The item's `type` has no visual representation.
    #[error("unsupported menu item type '{kind}'")]
    UnsupportedType { kind: String },

    /// An operation needed the visual item of a model item that has none.
    #[error("menu item {id} has no visual item bound")]
    MissingBinding { id: ItemId },

    /// A child was moved under an item that never got a submenu.
    #[error("menu item {id} has no submenu to reorder")]
    MissingContainer { id: ItemId },

    /// Icon bounds must be at least one pixel in each direction.
    #[error("icon size {width}x{height} has a zero dimension")]
    InvalidIconSize { width: u32, height: u32 },

    /// The configuration text could not be parsed.
    #[error("invalid mirror configuration: {0}")]
    Config(#[from] toml::de::Error),

    /// The configuration could not be written out.
    #[error("failed to serialize mirror configuration: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),
}

/// Result type for mirror operations.
pub type MirrorResult<T> = Result<T, MirrorError>;

//! Error types for the menu model library.

use std::fmt;

use crate::model::ItemId;

/// Errors raised by the menu model and its type-handler dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuError {
    /// No item with this ID is alive in the model.
    ItemNotFound(ItemId),
    /// An item with this ID already exists.
    DuplicateItem(ItemId),
    /// The model has no root item yet.
    NoRoot,
    /// A root item has already been installed.
    RootAlreadySet,
    /// The item is the root or has already been detached, so it has no
    /// siblings to move among or parent to leave.
    NoParent(ItemId),
    /// A child position was past the end of the parent's child list.
    PositionOutOfRange {
        /// The requested position.
        position: usize,
        /// The number of children at the time of the request.
        len: usize,
    },
    /// The item is not a child of the given parent.
    NotAChild {
        /// The parent that was searched.
        parent: ItemId,
        /// The item that was expected under it.
        child: ItemId,
    },
    /// A registered type handler refused to build an item.
    TypeHandler {
        /// The item kind the handler was registered for.
        kind: String,
        /// The handler's own description of the failure.
        message: String,
    },
}

impl fmt::Display for MenuError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ItemNotFound(id) => write!(f, "Menu item {id} not found"),
            Self::DuplicateItem(id) => write!(f, "Menu item {id} already exists"),
            Self::NoRoot => write!(f, "The menu model has no root item"),
            Self::RootAlreadySet => write!(f, "The menu model already has a root item"),
            Self::NoParent(id) => write!(f, "Menu item {id} has no parent"),
            Self::PositionOutOfRange { position, len } => {
                write!(f, "Child position {position} is out of range (len {len})")
            }
            Self::NotAChild { parent, child } => {
                write!(f, "Menu item {child} is not a child of {parent}")
            }
            Self::TypeHandler { kind, message } => {
                write!(f, "Type handler for '{kind}' failed: {message}")
            }
        }
    }
}

impl std::error::Error for MenuError {}

/// A specialized Result type for menu model operations.
pub type MenuResult<T> = std::result::Result<T, MenuError>;

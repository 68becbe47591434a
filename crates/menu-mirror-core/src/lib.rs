//! Core systems for Menu Mirror.
//!
//! This crate provides the model-client side of a mirrored remote menu:
//!
//! - **Signal/Slot System**: Typed, ordered observer registration
//! - **Menu Model**: The abstract menu-item tree with change notifications
//! - **Properties**: Typed property values and well-known property names
//! - **Model Client**: Root ownership, item lookup and per-kind type handlers
//! - **Logging**: Tracing targets and tree debug output
//!
//! # Example
//!
//! ```
//! use menu_mirror_core::{props, MenuModelClient, PropertyValue};
//!
//! let client = MenuModelClient::new("org.example.App", "/MenuBar");
//! client.add_type_handler("standard", |item, _parent| {
//!     println!("new item {}", item.id());
//!     Ok(())
//! });
//!
//! client.set_root(0, Vec::<(String, PropertyValue)>::new()).unwrap();
//! let file = client
//!     .add_item(0, 1, None, [(props::LABEL, PropertyValue::from("_File"))])
//!     .unwrap();
//!
//! file.property_changed.connect(|(name, value)| {
//!     println!("{name} is now {value:?}");
//! });
//! file.set_property(props::VISIBLE, false);
//! ```

pub mod client;
mod error;
pub mod logging;
pub mod model;
pub mod property;
pub mod signal;

pub use client::{MenuModelClient, TypeHandler};
pub use error::{MenuError, MenuResult};
pub use logging::{MenuTreeDebug, TreeFormatOptions, TreeStyle};
pub use model::{ItemId, MenuItem};
pub use property::{kinds, props, IconDataError, IconImage, ItemKind, PropertyValue};
pub use signal::{ConnectionId, Signal};

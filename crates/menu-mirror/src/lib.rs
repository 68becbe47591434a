//! Menu Mirror - keep a native menu in sync with a remote menu model.
//!
//! This is the main crate. It re-exports the model side from
//! `menu_mirror_core` and adds the engine that mirrors it into a widget
//! toolkit.
//!
//! # Example
//!
//! ```
//! use menu_mirror::toolkit::{MenuToolkit, RetainedToolkit};
//! use menu_mirror::{props, MenuMirror, PropertyValue};
//!
//! let toolkit = RetainedToolkit::new();
//! let mirror = MenuMirror::new("org.example.App", "/MenuBar", toolkit.clone());
//!
//! // The transport layer feeds the model.
//! let model = mirror.model();
//! model.set_root(0, Vec::<(String, PropertyValue)>::new()).unwrap();
//! let file = model
//!     .add_item(0, 1, None, [(props::LABEL, PropertyValue::from("_File"))])
//!     .unwrap();
//! model
//!     .add_item(1, 2, None, [(props::LABEL, PropertyValue::from("_Quit"))])
//!     .unwrap();
//!
//! // The application places the root's children itself.
//! let menu_bar = toolkit.new_menu();
//! let file_item = mirror.visual_item(&file).unwrap();
//! toolkit.insert(&menu_bar, &file_item, 0);
//!
//! assert_eq!(toolkit.dump_menu(&menu_bar), "File\n  Quit\n");
//! ```

pub mod config;
pub mod error;
pub mod icon;
mod mirror;
mod sync;
pub mod toolkit;

pub use menu_mirror_core::*;

pub use config::{IconSize, MirrorConfig, ResizeFilter};
pub use error::{MirrorError, MirrorResult};
pub use icon::IconSource;
pub use mirror::{MenuMirror, MirrorHandle};
pub use toolkit::MenuToolkit;

//! Typed property values carried by menu items.
//!
//! A menu item stores its state as a map from property name to
//! [`PropertyValue`]. The well-known names live in [`props`]; anything else is
//! kept and forwarded but carries no meaning for the mirror.

use std::fmt;
use std::sync::Arc;

use base64::Engine;
use image::RgbaImage;

/// Well-known property names.
pub mod props {
    /// Item kind, see [`ItemKind`](super::ItemKind).
    pub const TYPE: &str = "type";
    /// Label text. May contain `_` mnemonics.
    pub const LABEL: &str = "label";
    /// Whether the item is shown. Defaults to `true` when absent.
    pub const VISIBLE: &str = "visible";
    /// Whether the item can be activated. Defaults to `true` when absent.
    pub const SENSITIVE: &str = "sensitive";
    /// Themed icon name.
    pub const ICON_NAME: &str = "icon-name";
    /// Icon pixels, either an image value or a base64 encoded PNG string.
    pub const ICON_DATA: &str = "icon-data";
}

/// Values of the [`props::TYPE`] property.
pub mod kinds {
    /// A regular, labeled item. Also used when the type is absent.
    pub const STANDARD: &str = "standard";
    /// A separator line.
    pub const SEPARATOR: &str = "separator";
}

/// Decoded icon pixels shared between the model and the visual layer.
///
/// Cloning is cheap; the pixel buffer is reference counted.
#[derive(Clone)]
pub struct IconImage(Arc<RgbaImage>);

impl IconImage {
    /// Wrap an RGBA buffer.
    pub fn new(image: RgbaImage) -> Self {
        Self(Arc::new(image))
    }

    /// Decode a base64 encoded PNG (or any format `image` recognizes).
    pub fn from_base64(encoded: &str) -> Result<Self, IconDataError> {
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(encoded.trim())
            .map_err(IconDataError::Base64)?;
        let decoded = image::load_from_memory(&bytes).map_err(IconDataError::Image)?;
        Ok(Self::new(decoded.to_rgba8()))
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.0.width()
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.0.height()
    }

    /// Borrow the pixel buffer.
    pub fn pixels(&self) -> &RgbaImage {
        &self.0
    }

    /// Check whether two handles share the same pixel buffer.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for IconImage {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || *self.0 == *other.0
    }
}

impl fmt::Debug for IconImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "IconImage({}x{})", self.width(), self.height())
    }
}

/// Failure to turn an `icon-data` string into pixels.
#[derive(Debug)]
pub enum IconDataError {
    /// The string was not valid base64.
    Base64(base64::DecodeError),
    /// The bytes were not a decodable image.
    Image(image::ImageError),
}

impl fmt::Display for IconDataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Base64(err) => write!(f, "invalid base64 icon data: {err}"),
            Self::Image(err) => write!(f, "undecodable icon data: {err}"),
        }
    }
}

impl std::error::Error for IconDataError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Base64(err) => Some(err),
            Self::Image(err) => Some(err),
        }
    }
}

/// A typed property value.
#[derive(Clone, Debug, PartialEq)]
pub enum PropertyValue {
    /// A string value.
    String(String),
    /// A boolean value.
    Bool(bool),
    /// A 32-bit signed integer.
    Int(i32),
    /// Decoded icon pixels.
    Image(IconImage),
}

impl PropertyValue {
    /// Returns this value as a string slice, if it is one.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Interpret this value as a boolean.
    ///
    /// Strings `"true"`/`"false"` and integers are accepted as well, since the
    /// wire protocol does not always preserve the original type.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PropertyValue::Bool(b) => Some(*b),
            PropertyValue::String(s) if s == "true" => Some(true),
            PropertyValue::String(s) if s == "false" => Some(false),
            PropertyValue::Int(i) => Some(*i != 0),
            _ => None,
        }
    }

    /// Returns the icon pixels, if this is an image value.
    pub fn as_image(&self) -> Option<&IconImage> {
        match self {
            PropertyValue::Image(image) => Some(image),
            _ => None,
        }
    }

    /// Whether this value counts as "unset" for fallback purposes.
    ///
    /// Only empty strings are empty; images, booleans and integers never are.
    pub fn is_empty(&self) -> bool {
        matches!(self, PropertyValue::String(s) if s.is_empty())
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::String(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        PropertyValue::String(value)
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        PropertyValue::Bool(value)
    }
}

impl From<i32> for PropertyValue {
    fn from(value: i32) -> Self {
        PropertyValue::Int(value)
    }
}

impl From<IconImage> for PropertyValue {
    fn from(value: IconImage) -> Self {
        PropertyValue::Image(value)
    }
}

impl From<RgbaImage> for PropertyValue {
    fn from(value: RgbaImage) -> Self {
        PropertyValue::Image(IconImage::new(value))
    }
}

/// The declared kind of a menu item, read from its `type` property.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ItemKind {
    /// A regular labeled item.
    Normal,
    /// A separator.
    Separator,
    /// A kind this library does not know about.
    Unknown(String),
}

impl ItemKind {
    /// Derive the kind from the value of the `type` property.
    pub fn from_property(value: Option<&PropertyValue>) -> Self {
        match value.and_then(PropertyValue::as_str) {
            None | Some("") | Some(kinds::STANDARD) => ItemKind::Normal,
            Some(kinds::SEPARATOR) => ItemKind::Separator,
            Some(other) => ItemKind::Unknown(other.to_string()),
        }
    }

    /// The type-handler key for this kind.
    pub fn as_str(&self) -> &str {
        match self {
            ItemKind::Normal => kinds::STANDARD,
            ItemKind::Separator => kinds::SEPARATOR,
            ItemKind::Unknown(kind) => kind,
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

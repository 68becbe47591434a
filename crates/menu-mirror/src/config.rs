//! Engine configuration.
//!
//! [`MirrorConfig`] collects the few knobs the engine has. It can be built in
//! code or loaded from TOML:
//!
//! ```ignore
//! use menu_mirror::MirrorConfig;
//!
//! let config = MirrorConfig::from_toml_str(r#"
//! use-underline = true
//! resize-filter = "lanczos3"
//!
//! [icon-size]
//! width = 24
//! height = 24
//! "#)?;
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{MirrorError, MirrorResult};

/// Pixel bounds for menu icons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IconSize {
    /// Maximum width in pixels.
    pub width: u32,
    /// Maximum height in pixels.
    pub height: u32,
}

impl IconSize {
    /// The standard menu icon size, 16x16.
    pub const MENU: IconSize = IconSize::new(16, 16);

    /// Create a size from width and height.
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Check whether an image of the given dimensions exceeds these bounds
    /// in either direction.
    pub fn is_exceeded_by(&self, width: u32, height: u32) -> bool {
        width > self.width || height > self.height
    }

    fn validate(self) -> MirrorResult<Self> {
        if self.width == 0 || self.height == 0 {
            return Err(MirrorError::InvalidIconSize {
                width: self.width,
                height: self.height,
            });
        }
        Ok(self)
    }
}

impl Default for IconSize {
    fn default() -> Self {
        Self::MENU
    }
}

/// Resampling filter used when shrinking oversized icons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResizeFilter {
    /// Nearest neighbor interpolation. Fast but pixelated.
    Nearest,
    /// Bilinear interpolation. Balanced speed and quality.
    #[default]
    Triangle,
    /// Catmull-Rom bicubic interpolation.
    CatmullRom,
    /// Gaussian interpolation. Smooth results.
    Gaussian,
    /// Lanczos interpolation with window size 3. High quality.
    Lanczos3,
}

impl ResizeFilter {
    pub(crate) fn to_image_filter(self) -> image::imageops::FilterType {
        match self {
            ResizeFilter::Nearest => image::imageops::FilterType::Nearest,
            ResizeFilter::Triangle => image::imageops::FilterType::Triangle,
            ResizeFilter::CatmullRom => image::imageops::FilterType::CatmullRom,
            ResizeFilter::Gaussian => image::imageops::FilterType::Gaussian,
            ResizeFilter::Lanczos3 => image::imageops::FilterType::Lanczos3,
        }
    }
}

/// Configuration for a [`MenuMirror`](crate::MenuMirror).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct MirrorConfig {
    /// Bounds that pixel icons are shrunk to, and the size requested for
    /// named icons.
    pub icon_size: IconSize,
    /// Filter used when shrinking pixel icons.
    pub resize_filter: ResizeFilter,
    /// Whether `_` in labels marks a mnemonic.
    pub use_underline: bool,
}

impl Default for MirrorConfig {
    fn default() -> Self {
        Self {
            icon_size: IconSize::MENU,
            resize_filter: ResizeFilter::Triangle,
            use_underline: true,
        }
    }
}

impl MirrorConfig {
    /// Create the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set the icon bounds. Fails if either bound is zero.
    pub fn with_icon_size(mut self, width: u32, height: u32) -> MirrorResult<Self> {
        self.icon_size = IconSize::new(width, height).validate()?;
        Ok(self)
    }

    /// Builder: set the resize filter.
    pub fn with_resize_filter(mut self, filter: ResizeFilter) -> Self {
        self.resize_filter = filter;
        self
    }

    /// Builder: enable or disable mnemonic underlines.
    pub fn with_use_underline(mut self, use_underline: bool) -> Self {
        self.use_underline = use_underline;
        self
    }

    /// Parse a configuration from TOML. Missing keys keep their defaults.
    pub fn from_toml_str(text: &str) -> MirrorResult<Self> {
        let config: Self = toml::from_str(text)?;
        config.icon_size.validate()?;
        Ok(config)
    }

    /// Serialize this configuration to TOML.
    pub fn to_toml_string(&self) -> MirrorResult<String> {
        Ok(toml::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = MirrorConfig::default();
        assert_eq!(config.icon_size, IconSize::new(16, 16));
        assert_eq!(config.resize_filter, ResizeFilter::Triangle);
        assert!(config.use_underline);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = MirrorConfig::from_toml_str("resize-filter = \"lanczos3\"").unwrap();
        assert_eq!(config.resize_filter, ResizeFilter::Lanczos3);
        assert_eq!(config.icon_size, IconSize::MENU);
        assert!(config.use_underline);
    }

    #[test]
    fn test_full_toml() {
        let config = MirrorConfig::from_toml_str(
            r#"
            use-underline = false
            resize-filter = "catmull-rom"

            [icon-size]
            width = 24
            height = 22
            "#,
        )
        .unwrap();
        assert_eq!(
            config,
            MirrorConfig::new()
                .with_use_underline(false)
                .with_resize_filter(ResizeFilter::CatmullRom)
                .with_icon_size(24, 22)
                .unwrap()
        );
    }

    #[test]
    fn test_invalid_toml() {
        let err = MirrorConfig::from_toml_str("resize-filter = \"bicubic\"").unwrap_err();
        assert!(matches!(err, crate::MirrorError::Config(_)));
    }

    #[test]
    fn test_toml_written_back_parses() {
        let config = MirrorConfig::new().with_icon_size(32, 32).unwrap();
        let text = config.to_toml_string().unwrap();
        assert!(text.contains("[icon-size]"));
        assert_eq!(MirrorConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_zero_icon_size_rejected() {
        let err = MirrorConfig::new().with_icon_size(0, 16).unwrap_err();
        assert!(matches!(err, MirrorError::InvalidIconSize { width: 0, height: 16 }));

        let err = MirrorConfig::from_toml_str("[icon-size]\nwidth = 24\nheight = 0").unwrap_err();
        assert!(matches!(err, MirrorError::InvalidIconSize { width: 24, height: 0 }));
        assert_eq!(err.to_string(), "icon size 24x0 has a zero dimension");
    }

    #[test]
    fn test_icon_size_bounds() {
        let size = IconSize::MENU;
        assert!(!size.is_exceeded_by(16, 16));
        assert!(size.is_exceeded_by(17, 4));
        assert!(size.is_exceeded_by(4, 17));
    }
}

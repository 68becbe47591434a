//! Menu icon sources and pixel normalization.

use menu_mirror_core::IconImage;
use menu_mirror_core::logging::targets;

use crate::config::{IconSize, ResizeFilter};

/// The icon shown on a visual menu item.
#[derive(Debug, Clone, PartialEq)]
pub enum IconSource {
    /// A themed icon, looked up by name at the given size.
    Named {
        /// Theme icon name.
        name: String,
        /// Requested size.
        size: IconSize,
    },
    /// Raw pixels, already within the menu icon bounds.
    Pixels(IconImage),
}

impl IconSource {
    /// Create a named icon source.
    pub fn named(name: impl Into<String>, size: IconSize) -> Self {
        IconSource::Named {
            name: name.into(),
            size,
        }
    }

    /// Check if this is a themed icon.
    pub fn is_named(&self) -> bool {
        matches!(self, IconSource::Named { .. })
    }

    /// The icon name, if this is a themed icon.
    pub fn name(&self) -> Option<&str> {
        match self {
            IconSource::Named { name, .. } => Some(name),
            IconSource::Pixels(_) => None,
        }
    }

    /// The pixels, if this is a pixel icon.
    pub fn pixels(&self) -> Option<&IconImage> {
        match self {
            IconSource::Pixels(image) => Some(image),
            IconSource::Named { .. } => None,
        }
    }
}

/// Shrink `image` to exactly `bounds` if it exceeds them in either
/// dimension.
///
/// Images already within bounds are returned as-is, sharing the same pixel
/// buffer. Aspect ratio is not preserved.
pub fn fit_to_bounds(image: &IconImage, bounds: IconSize, filter: ResizeFilter) -> IconImage {
    if !bounds.is_exceeded_by(image.width(), image.height()) {
        return image.clone();
    }

    tracing::trace!(
        target: targets::ICON,
        from_width = image.width(),
        from_height = image.height(),
        to_width = bounds.width,
        to_height = bounds.height,
        ?filter,
        "scaling icon"
    );
    let scaled = image::imageops::resize(
        image.pixels(),
        bounds.width,
        bounds.height,
        filter.to_image_filter(),
    );
    IconImage::new(scaled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn solid(width: u32, height: u32) -> IconImage {
        IconImage::new(RgbaImage::from_pixel(width, height, Rgba([10, 20, 30, 255])))
    }

    #[test]
    fn test_small_image_untouched() {
        let image = solid(12, 16);
        let fitted = fit_to_bounds(&image, IconSize::MENU, ResizeFilter::Triangle);
        assert!(fitted.ptr_eq(&image));
    }

    #[test]
    fn test_wide_image_scaled_to_exact_bounds() {
        let fitted = fit_to_bounds(&solid(48, 10), IconSize::MENU, ResizeFilter::Triangle);
        assert_eq!((fitted.width(), fitted.height()), (16, 16));
    }

    #[test]
    fn test_tall_image_scaled() {
        let fitted = fit_to_bounds(&solid(8, 40), IconSize::new(24, 24), ResizeFilter::Nearest);
        assert_eq!((fitted.width(), fitted.height()), (24, 24));
        assert_eq!(*fitted.pixels().get_pixel(0, 0), Rgba([10, 20, 30, 255]));
    }

    #[test]
    fn test_source_accessors() {
        let named = IconSource::named("edit-copy", IconSize::MENU);
        assert!(named.is_named());
        assert_eq!(named.name(), Some("edit-copy"));
        assert!(named.pixels().is_none());

        let pixels = IconSource::Pixels(solid(4, 4));
        assert!(!pixels.is_named());
        assert_eq!(pixels.pixels().map(IconImage::width), Some(4));
    }
}

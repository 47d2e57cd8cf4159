//! Colour modes for asset pixel buffers.

use std::fmt;

use image::{ColorType, DynamicImage};

/// Pixel format tag of an asset buffer.
///
/// Higher bit depths collapse onto their 8-bit counterpart; conversion always
/// produces an 8-bit buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorMode {
    /// Greyscale.
    L,
    /// Greyscale with alpha.
    La,
    /// Opaque colour.
    Rgb,
    /// Colour with alpha.
    Rgba,
}

impl ColorMode {
    /// Mode of an existing buffer.
    pub fn of(image: &DynamicImage) -> Self {
        Self::from_color_type(image.color())
    }

    pub fn from_color_type(color: ColorType) -> Self {
        match color {
            ColorType::L8 | ColorType::L16 => ColorMode::L,
            ColorType::La8 | ColorType::La16 => ColorMode::La,
            ColorType::Rgb8 | ColorType::Rgb16 | ColorType::Rgb32F => ColorMode::Rgb,
            // Anything else (RGBA variants and future colour types) keeps alpha.
            _ => ColorMode::Rgba,
        }
    }

    /// Opaque or alpha-capable colour mode for an output.
    pub fn for_alpha(alpha: bool) -> Self {
        if alpha {
            ColorMode::Rgba
        } else {
            ColorMode::Rgb
        }
    }

    pub fn has_alpha(self) -> bool {
        matches!(self, ColorMode::La | ColorMode::Rgba)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ColorMode::L => "L",
            ColorMode::La => "LA",
            ColorMode::Rgb => "RGB",
            ColorMode::Rgba => "RGBA",
        }
    }

    /// Convert a buffer into this mode, always returning a fresh copy.
    pub fn convert(self, image: &DynamicImage) -> DynamicImage {
        match self {
            ColorMode::L => DynamicImage::ImageLuma8(image.to_luma8()),
            ColorMode::La => DynamicImage::ImageLumaA8(image.to_luma_alpha8()),
            ColorMode::Rgb => DynamicImage::ImageRgb8(image.to_rgb8()),
            ColorMode::Rgba => DynamicImage::ImageRgba8(image.to_rgba8()),
        }
    }
}

impl fmt::Display for ColorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, RgbImage, Rgba, RgbaImage};

    #[test]
    fn test_mode_of_buffers() {
        let rgb = DynamicImage::ImageRgb8(RgbImage::new(1, 1));
        let rgba = DynamicImage::ImageRgba8(RgbaImage::new(1, 1));
        let luma = DynamicImage::ImageLuma8(GrayImage::new(1, 1));

        assert_eq!(ColorMode::of(&rgb), ColorMode::Rgb);
        assert_eq!(ColorMode::of(&rgba), ColorMode::Rgba);
        assert_eq!(ColorMode::of(&luma), ColorMode::L);
    }

    #[test]
    fn test_sixteen_bit_collapses() {
        assert_eq!(ColorMode::from_color_type(ColorType::Rgba16), ColorMode::Rgba);
        assert_eq!(ColorMode::from_color_type(ColorType::L16), ColorMode::L);
    }

    #[test]
    fn test_has_alpha() {
        assert!(ColorMode::Rgba.has_alpha());
        assert!(ColorMode::La.has_alpha());
        assert!(!ColorMode::Rgb.has_alpha());
        assert!(!ColorMode::L.has_alpha());
    }

    #[test]
    fn test_convert_drops_alpha() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(2, 2, Rgba([10, 20, 30, 40])));
        let converted = ColorMode::Rgb.convert(&img);

        assert_eq!(ColorMode::of(&converted), ColorMode::Rgb);
        assert_eq!(converted.to_rgb8().get_pixel(0, 0).0, [10, 20, 30]);
        // Source buffer is untouched
        assert_eq!(ColorMode::of(&img), ColorMode::Rgba);
    }

    #[test]
    fn test_display() {
        assert_eq!(ColorMode::Rgb.to_string(), "RGB");
        assert_eq!(ColorMode::La.to_string(), "LA");
    }
}

//! Icon generation - fit the visible part of an image into a fixed box.

use image::{imageops, imageops::FilterType, DynamicImage, RgbaImage};

use crate::asset::Asset;
use crate::error::{CraftError, Result};

/// Resampling used when an icon is resized.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Resampling {
    /// Bicubic interpolation.
    #[default]
    Smooth,
    /// Nearest neighbour, keeps hard pixel edges.
    Nearest,
}

impl Resampling {
    pub fn from_smooth(smooth: bool) -> Self {
        if smooth {
            Resampling::Smooth
        } else {
            Resampling::Nearest
        }
    }

    fn filter(self) -> FilterType {
        match self {
            Resampling::Smooth => FilterType::CatmullRom,
            Resampling::Nearest => FilterType::Nearest,
        }
    }
}

/// Build a `width` x `height` RGBA icon from `source`.
///
/// The source is cropped to its visible pixels, scaled uniformly to fit the
/// box, and centred on a transparent canvas. Odd leftover space goes to the
/// right and bottom.
pub fn create_icon(
    source: &Asset,
    width: u32,
    height: u32,
    resampling: Resampling,
) -> Result<Asset> {
    if width == 0 || height == 0 {
        return Err(CraftError::InvalidIconSize { width, height });
    }

    let (x, y, content_w, content_h) =
        visible_bounds(source.image()).ok_or(CraftError::EmptySource)?;
    let content = source
        .image()
        .crop_imm(x, y, content_w, content_h)
        .to_rgba8();

    let scale = f64::min(
        width as f64 / content_w as f64,
        height as f64 / content_h as f64,
    );
    let new_w = ((content_w as f64 * scale) as u32).clamp(1, width);
    let new_h = ((content_h as f64 * scale) as u32).clamp(1, height);

    let resized = imageops::resize(&content, new_w, new_h, resampling.filter());

    let mut canvas = RgbaImage::new(width, height);
    let offset_x = (width - new_w) / 2;
    let offset_y = (height - new_h) / 2;
    imageops::replace(&mut canvas, &resized, offset_x as i64, offset_y as i64);

    Ok(Asset::Plain(DynamicImage::ImageRgba8(canvas)))
}

/// Bounding box `(x, y, width, height)` of pixels that are not fully
/// transparent. Images without alpha are visible everywhere.
///
/// Returns `None` when nothing is visible.
pub fn visible_bounds(image: &DynamicImage) -> Option<(u32, u32, u32, u32)> {
    if image.width() == 0 || image.height() == 0 {
        return None;
    }
    if !image.color().has_alpha() {
        return Some((0, 0, image.width(), image.height()));
    }

    let rgba = image.to_rgba8();
    let mut min_x = u32::MAX;
    let mut min_y = u32::MAX;
    let mut max_x = 0;
    let mut max_y = 0;
    let mut any = false;

    for (x, y, pixel) in rgba.enumerate_pixels() {
        if pixel[3] == 0 {
            continue;
        }
        any = true;
        min_x = min_x.min(x);
        min_y = min_y.min(y);
        max_x = max_x.max(x);
        max_y = max_y.max(y);
    }

    any.then(|| (min_x, min_y, max_x - min_x + 1, max_y - min_y + 1))
}

//! In-memory assets: plain images and tile maps.
//!
//! An [`Asset`] owns exactly one pixel buffer. Size and colour mode are always
//! read from that buffer. A [`TileMap`] additionally splits the buffer into a
//! fixed grid of equally sized tiles, addressed zero-based as `(row, col)`.
//!
//! Tile sizes use floor division, so when the image is not evenly divisible
//! the remainder pixels on the right and bottom edges belong to no tile.

mod mode;

use std::fs;
use std::num::NonZeroU32;
use std::path::{Path, PathBuf};

use image::DynamicImage;

use crate::error::{CraftError, Result};

pub use mode::ColorMode;

/// Directory (under the project root) holding source images.
pub const SOURCE_DIR: &str = "src";

/// Directory (under the project root) receiving outputs.
pub const OUTPUT_DIR: &str = "out";

/// Extension of every source and output file.
pub const IMAGE_EXTENSION: &str = "png";

/// Row/column layout of a tile map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid {
    pub rows: NonZeroU32,
    pub cols: NonZeroU32,
}

impl Grid {
    /// Grid of `rows` by `cols` tiles.
    pub fn new(rows: NonZeroU32, cols: NonZeroU32) -> Self {
        Self { rows, cols }
    }

    /// Build a grid from raw counts, `None` if either is zero.
    pub fn from_counts(rows: u32, cols: u32) -> Option<Self> {
        Some(Self {
            rows: NonZeroU32::new(rows)?,
            cols: NonZeroU32::new(cols)?,
        })
    }

    /// Number of tile rows.
    pub fn rows(&self) -> u32 {
        self.rows.get()
    }

    /// Number of tile columns.
    pub fn cols(&self) -> u32 {
        self.cols.get()
    }
}

/// An image subdivided into a fixed grid of tiles.
#[derive(Debug, Clone)]
pub struct TileMap {
    image: DynamicImage,
    grid: Grid,
}

impl TileMap {
    /// Wrap a buffer as a tile map.
    ///
    /// Fails when the grid has more columns than the image has pixels across
    /// (or rows than pixels down), since every tile would be empty.
    pub fn new(image: DynamicImage, grid: Grid) -> Result<Self> {
        if grid.cols() > image.width() || grid.rows() > image.height() {
            return Err(CraftError::GridExceedsImage {
                rows: grid.rows(),
                cols: grid.cols(),
                width: image.width(),
                height: image.height(),
            });
        }
        Ok(Self { image, grid })
    }

    /// The whole sheet, all tiles included.
    pub fn image(&self) -> &DynamicImage {
        &self.image
    }

    pub fn grid(&self) -> Grid {
        self.grid
    }

    pub fn rows(&self) -> u32 {
        self.grid.rows()
    }

    pub fn cols(&self) -> u32 {
        self.grid.cols()
    }

    /// Size of one tile as (width, height).
    pub fn tile_size(&self) -> (u32, u32) {
        (
            self.image.width() / self.grid.cols(),
            self.image.height() / self.grid.rows(),
        )
    }

    /// Extract one tile as a new plain asset.
    pub fn select(&self, row: u32, col: u32) -> Result<Asset> {
        if row >= self.rows() || col >= self.cols() {
            return Err(CraftError::TileOutOfBounds {
                row,
                col,
                rows: self.rows(),
                cols: self.cols(),
            });
        }

        let (width, height) = self.tile_size();
        let tile = self.image.crop_imm(col * width, row * height, width, height);
        Ok(Asset::Plain(tile))
    }
}

/// A named image held in memory by the build.
#[derive(Debug, Clone)]
pub enum Asset {
    /// A single image, used whole.
    Plain(DynamicImage),
    /// An image addressed tile by tile.
    Tiled(TileMap),
}

impl Asset {
    /// Load `<src_dir>/<path>.png`, optionally as a tile map.
    pub fn load(src_dir: &Path, path: &str, grid: Option<Grid>) -> Result<Self> {
        let file = source_path(src_dir, path);
        if !file.exists() {
            return Err(CraftError::MissingSourceFile { path: file });
        }

        let image = image::open(&file).map_err(|e| CraftError::Image {
            path: file.clone(),
            message: format!("Failed to load image: {}", e),
        })?;

        match grid {
            Some(grid) => Ok(Asset::Tiled(TileMap::new(image, grid)?)),
            None => Ok(Asset::Plain(image)),
        }
    }

    /// The underlying pixel buffer.
    pub fn image(&self) -> &DynamicImage {
        match self {
            Asset::Plain(image) => image,
            Asset::Tiled(map) => map.image(),
        }
    }

    /// Take the pixel buffer, discarding any grid.
    pub fn into_image(self) -> DynamicImage {
        match self {
            Asset::Plain(image) => image,
            Asset::Tiled(map) => map.image,
        }
    }

    /// Pixel size as (width, height).
    pub fn size(&self) -> (u32, u32) {
        let image = self.image();
        (image.width(), image.height())
    }

    /// Colour mode of the pixel buffer.
    pub fn mode(&self) -> ColorMode {
        ColorMode::of(self.image())
    }

    /// The size this asset contributes to a composition grid: one tile for a
    /// tile map, the whole image otherwise.
    pub fn tile_size(&self) -> (u32, u32) {
        match self {
            Asset::Plain(_) => self.size(),
            Asset::Tiled(map) => map.tile_size(),
        }
    }

    /// The tile map, if this asset has a grid.
    pub fn as_tiled(&self) -> Option<&TileMap> {
        match self {
            Asset::Plain(_) => None,
            Asset::Tiled(map) => Some(map),
        }
    }

    /// A copy of this asset converted to `mode`, keeping any grid.
    pub fn with_mode(&self, mode: ColorMode) -> Asset {
        let image = mode.convert(self.image());
        match self {
            Asset::Plain(_) => Asset::Plain(image),
            // Conversion keeps dimensions, so the grid still fits.
            Asset::Tiled(map) => Asset::Tiled(TileMap {
                image,
                grid: map.grid,
            }),
        }
    }

    /// Write a copy converted to `mode` as `<out_dir>/<name>.png`.
    pub fn store(&self, out_dir: &Path, name: &str, mode: ColorMode) -> Result<PathBuf> {
        let path = out_dir.join(format!("{}.{}", name, IMAGE_EXTENSION));

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| CraftError::Io {
                path: parent.to_path_buf(),
                message: format!("Failed to create output directory: {}", e),
            })?;
        }

        mode.convert(self.image())
            .save(&path)
            .map_err(|e| CraftError::Image {
                path: path.clone(),
                message: format!("Failed to write PNG: {}", e),
            })?;

        Ok(path)
    }
}

/// Location of a source image named in the manifest.
pub fn source_path(src_dir: &Path, path: &str) -> PathBuf {
    src_dir.join(format!("{}.{}", path, IMAGE_EXTENSION))
}

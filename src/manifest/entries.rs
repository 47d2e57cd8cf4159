//! Manifest entries: sources, processing steps and outputs.

use std::num::NonZeroU32;

use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::asset::{ColorMode, Grid};
use crate::compose::{Resampling, TileRef, TileSizePolicy};
use crate::error::{CraftError, Result};

/// Tile index convention. Only zero-based indices are supported; declaring
/// anything else fails to load rather than being silently reinterpreted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Indexing {
    #[default]
    ZeroBased,
}

/// A source image, optionally split into a tile grid.
#[derive(Debug, Clone, Deserialize)]
pub struct SourceEntry {
    pub name: String,

    /// Path under `src/`, without the `.png` extension.
    pub path: String,

    #[serde(default)]
    pub rows: Option<NonZeroU32>,

    #[serde(default)]
    pub cols: Option<NonZeroU32>,
}

impl SourceEntry {
    /// Grid for this source. Declaring either `rows` or `cols` makes it a
    /// tile map; the other count defaults to 1.
    pub fn grid(&self) -> Option<Grid> {
        if self.rows.is_none() && self.cols.is_none() {
            return None;
        }
        let one = NonZeroU32::MIN;
        Some(Grid::new(
            self.rows.unwrap_or(one),
            self.cols.unwrap_or(one),
        ))
    }
}

/// A processing step producing a new named asset.
#[derive(Debug, Clone, Deserialize)]
pub struct StepEntry {
    pub name: String,

    #[serde(default)]
    pub sources: Vec<String>,

    /// Operation kind, `map` or `icon`. Kept as text so an unknown kind is
    /// reported when the step runs.
    #[serde(rename = "type")]
    pub kind: String,

    /// Operation parameters, decoded per kind.
    #[serde(default)]
    pub attributes: serde_json::Value,

    /// Tile of the first source to use (icon steps).
    #[serde(default)]
    pub row: Option<u32>,

    #[serde(default)]
    pub col: Option<u32>,
}

impl StepEntry {
    /// Decode `attributes` for this step's kind.
    pub fn attributes<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_value(self.attributes.clone()).map_err(|e| CraftError::Manifest {
            message: format!(
                "Invalid attributes for {} step '{}': {}",
                self.kind, self.name, e
            ),
            help: None,
        })
    }

    pub fn selection(&self) -> Result<Option<(u32, u32)>> {
        tile_selection(&format!("step '{}'", self.name), self.row, self.col)
    }
}

/// Parameters of a `map` step.
#[derive(Debug, Clone, Deserialize)]
pub struct MapAttributes {
    /// Rows of `[source, row?, col?]` references.
    pub content: Vec<Vec<TileRef>>,

    #[serde(default)]
    pub tile_size: TileSizePolicy,
}

/// Parameters of an `icon` step.
#[derive(Debug, Clone, Deserialize)]
pub struct IconAttributes {
    pub width: NonZeroU32,
    pub height: NonZeroU32,

    #[serde(default)]
    pub scaling: Scaling,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Scaling {
    #[serde(default = "default_smooth")]
    pub smooth: bool,
}

fn default_smooth() -> bool {
    true
}

impl Default for Scaling {
    fn default() -> Self {
        Self {
            smooth: default_smooth(),
        }
    }
}

impl Scaling {
    pub fn resampling(&self) -> Resampling {
        Resampling::from_smooth(self.smooth)
    }
}

/// A file written to `out/`.
#[derive(Debug, Clone, Deserialize)]
pub struct OutputEntry {
    /// File name under `out/`, without the `.png` extension.
    pub name: String,

    /// Asset to write.
    pub source: String,

    #[serde(default)]
    pub row: Option<u32>,

    #[serde(default)]
    pub col: Option<u32>,

    /// Keep the alpha channel (RGBA) instead of writing RGB.
    #[serde(default)]
    pub alpha: bool,
}

impl OutputEntry {
    pub fn mode(&self) -> ColorMode {
        ColorMode::for_alpha(self.alpha)
    }

    pub fn selection(&self) -> Result<Option<(u32, u32)>> {
        tile_selection(&format!("output '{}'", self.name), self.row, self.col)
    }
}

fn tile_selection(owner: &str, row: Option<u32>, col: Option<u32>) -> Result<Option<(u32, u32)>> {
    match (row, col) {
        (Some(row), Some(col)) => Ok(Some((row, col))),
        (None, None) => Ok(None),
        _ => Err(CraftError::Manifest {
            message: format!("{} gives only one of `row` and `col`", owner),
            help: Some("Tile selection needs both `row` and `col`".to_string()),
        }),
    }
}

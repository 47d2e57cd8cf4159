//! assetcrafter - sprite asset pipeline
//!
//! A library for composing tile maps and icons from source images, driven by
//! a declarative build manifest.

pub mod asset;
pub mod build;
pub mod cli;
pub mod compose;
pub mod error;
pub mod manifest;
pub mod output;
pub mod validation;

pub use asset::{Asset, ColorMode, Grid, TileMap};
pub use build::{AssetTable, Build, BuildReport};
pub use compose::{compose, create_icon, Resampling, TileRef, TileSizePolicy};
pub use error::{CraftError, Result};
pub use manifest::Manifest;
pub use validation::{validate_manifest, Diagnostic, Entry, Severity, ValidationResult};

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// Main error type for assetcrafter operations
#[derive(Error, Diagnostic, Debug)]
pub enum CraftError {
    #[error("IO error with {path}: {message}")]
    #[diagnostic(code(assetcrafter::io))]
    Io { path: PathBuf, message: String },

    #[error("Image error with {path}: {message}")]
    #[diagnostic(code(assetcrafter::image))]
    Image { path: PathBuf, message: String },

    #[error("Asset config \"{path}\" not found")]
    #[diagnostic(
        code(assetcrafter::config::not_found),
        help("Create assets.json (or assets.yaml) in the project directory")
    )]
    ConfigNotFound { path: PathBuf },

    #[error("Asset config \"{path}\" is a directory")]
    #[diagnostic(code(assetcrafter::config::is_directory))]
    ConfigIsDirectory { path: PathBuf },

    #[error("Manifest error: {message}")]
    #[diagnostic(code(assetcrafter::manifest))]
    Manifest {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Cannot write output because \"{path}\" is not a directory")]
    #[diagnostic(
        code(assetcrafter::output::blocked),
        help("Move or delete the file so the output directory can be created")
    )]
    OutputPathBlocked { path: PathBuf },

    #[error("Missing source file \"{path}\"")]
    #[diagnostic(code(assetcrafter::source::missing))]
    MissingSourceFile { path: PathBuf },

    #[error("Source \"{name}\" undefined (referenced by {referenced_by})")]
    #[diagnostic(
        code(assetcrafter::reference::undefined),
        help("Declare the asset under `sources` or as an earlier step")
    )]
    UndefinedAssetReference { name: String, referenced_by: String },

    #[error("Unknown artifact type \"{kind}\" in step '{step}'")]
    #[diagnostic(code(assetcrafter::step::unknown), help("Supported types are `map` and `icon`"))]
    UnknownStepType { step: String, kind: String },

    #[error("Tile sizes differ across composition sources: {sizes}")]
    #[diagnostic(
        code(assetcrafter::compose::size_mismatch),
        help("Use sources with equal tile sizes, or set \"tile_size\": \"largest\"")
    )]
    SizeMismatch { sizes: String },

    #[error("Icon source has no visible pixels")]
    #[diagnostic(code(assetcrafter::icon::empty_source))]
    EmptySource,

    #[error("Icon size must be non-zero, got {width}x{height}")]
    #[diagnostic(code(assetcrafter::icon::invalid_size))]
    InvalidIconSize { width: u32, height: u32 },

    #[error("Malformed map content: {message}")]
    #[diagnostic(code(assetcrafter::compose::malformed_grid))]
    MalformedGrid { message: String },

    #[error("Source index {index} is out of range ({count} source(s) given)")]
    #[diagnostic(code(assetcrafter::compose::source_index))]
    SourceIndexOutOfRange { index: usize, count: usize },

    #[error("Tile ({row}, {col}) is outside the {rows}x{cols} grid")]
    #[diagnostic(
        code(assetcrafter::tile::out_of_bounds),
        help("Tile indices are zero-based")
    )]
    TileOutOfBounds {
        row: u32,
        col: u32,
        rows: u32,
        cols: u32,
    },

    #[error("Cannot select a tile from '{name}': it has no rows/cols grid")]
    #[diagnostic(
        code(assetcrafter::tile::not_tiled),
        help("Give the source `rows` and `cols`, or drop `row`/`col`")
    )]
    NotTiled { name: String },

    #[error("A {rows}x{cols} grid does not fit a {width}x{height} image")]
    #[diagnostic(code(assetcrafter::tile::grid_exceeds_image))]
    GridExceedsImage {
        rows: u32,
        cols: u32,
        width: u32,
        height: u32,
    },
}

impl CraftError {
    /// Whether the build can skip the offending entry and continue.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, CraftError::MissingSourceFile { .. })
    }
}

pub type Result<T> = std::result::Result<T, CraftError>;

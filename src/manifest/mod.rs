//! Build manifest (assets.json / assets.yaml) loading.
//!
//! The manifest lists source images, processing steps that derive new
//! assets from them, and the outputs to write.
//!
//! # Example
//!
//! ```json
//! {
//!   "sources": [
//!     { "name": "tiles", "path": "tiles", "rows": 2, "cols": 2 },
//!     { "name": "hero", "path": "chars/hero" }
//!   ],
//!   "artifacts": [
//!     {
//!       "name": "level",
//!       "sources": ["tiles"],
//!       "type": "map",
//!       "attributes": { "content": [[[0, 0, 0], [0, 0, 1]]] }
//!     },
//!     {
//!       "name": "hero-icon",
//!       "sources": ["hero"],
//!       "type": "icon",
//!       "attributes": { "width": 32, "height": 32, "scaling": { "smooth": false } }
//!     }
//!   ],
//!   "output": [
//!     { "name": "level", "source": "level" },
//!     { "name": "grass", "source": "tiles", "row": 0, "col": 1, "alpha": true }
//!   ]
//! }
//! ```

mod entries;

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{CraftError, Result};

pub use entries::{
    IconAttributes, Indexing, MapAttributes, OutputEntry, Scaling, SourceEntry, StepEntry,
};

/// Manifest file names tried in order when none is given explicitly.
pub const MANIFEST_FILENAMES: [&str; 3] = ["assets.json", "assets.yaml", "assets.yml"];

/// A parsed build manifest.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub indexing: Indexing,

    #[serde(default)]
    pub sources: Vec<SourceEntry>,

    /// Processing steps, run in order.
    #[serde(default, alias = "process")]
    pub artifacts: Vec<StepEntry>,

    #[serde(default)]
    pub output: Vec<OutputEntry>,
}

impl Manifest {
    /// Find the manifest in a project root.
    pub fn locate(root: &Path) -> Result<PathBuf> {
        MANIFEST_FILENAMES
            .iter()
            .map(|name| root.join(name))
            .find(|path| path.exists())
            .ok_or_else(|| CraftError::ConfigNotFound {
                path: root.join(MANIFEST_FILENAMES[0]),
            })
    }

    /// Load a manifest file, choosing the format by extension.
    pub fn load(path: &Path) -> Result<Self> {
        if path.is_dir() {
            return Err(CraftError::ConfigIsDirectory {
                path: path.to_path_buf(),
            });
        }
        if !path.exists() {
            return Err(CraftError::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CraftError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to read manifest: {}", e),
        })?;

        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::parse_yaml(&content),
            _ => Self::parse_json(&content),
        }
    }

    pub fn parse_json(content: &str) -> Result<Self> {
        serde_json::from_str(content).map_err(|e| CraftError::Manifest {
            message: format!("Invalid manifest: {}", e),
            help: Some("Check assets.json syntax; tile indices are zero-based".to_string()),
        })
    }

    pub fn parse_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|e| CraftError::Manifest {
            message: format!("Invalid manifest: {}", e),
            help: Some("Check assets.yaml syntax; tile indices are zero-based".to_string()),
        })
    }
}

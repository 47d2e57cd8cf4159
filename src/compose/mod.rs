//! Image composition: tile maps assembled from sources, and icons.

mod icon;
mod map;

pub use icon::{create_icon, visible_bounds, Resampling};
pub use map::{compose, content_shape, unify_mode, unify_tile_size, TileRef, TileSizePolicy};

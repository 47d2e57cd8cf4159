//! Map composition - assembles a grid of tiles drawn from several sources.
//!
//! Each cell of the content grid names a source by index and, for tile-map
//! sources, the tile to take from it. All sources must agree on one tile
//! size; the canvas is that size times the grid dimensions.

use std::borrow::Cow;
use std::collections::BTreeSet;

use image::{imageops, DynamicImage, RgbImage, RgbaImage};
use serde::Deserialize;

use crate::asset::{Asset, ColorMode, Grid, TileMap};
use crate::error::{CraftError, Result};

/// One content cell: `[source]`, `[source, row]` or `[source, row, col]`.
///
/// Missing tile indices default to 0. Plain sources ignore them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "Vec<u32>")]
pub struct TileRef {
    pub source: usize,
    pub row: Option<u32>,
    pub col: Option<u32>,
}

impl TileRef {
    /// Reference a whole source.
    pub fn whole(source: usize) -> Self {
        Self {
            source,
            row: None,
            col: None,
        }
    }

    /// Reference one tile of a tile-map source.
    pub fn tile(source: usize, row: u32, col: u32) -> Self {
        Self {
            source,
            row: Some(row),
            col: Some(col),
        }
    }
}

impl TryFrom<Vec<u32>> for TileRef {
    type Error = String;

    fn try_from(value: Vec<u32>) -> std::result::Result<Self, Self::Error> {
        match value.as_slice() {
            [source] => Ok(Self::whole(*source as usize)),
            [source, row] => Ok(Self {
                source: *source as usize,
                row: Some(*row),
                col: None,
            }),
            [source, row, col] => Ok(Self::tile(*source as usize, *row, *col)),
            _ => Err(format!(
                "tile reference must be [source, row?, col?], got {} value(s)",
                value.len()
            )),
        }
    }
}

/// How differing tile sizes across sources are reconciled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TileSizePolicy {
    /// Every source must have the same tile size.
    #[default]
    Strict,
    /// Cells take the largest width and height; smaller tiles sit top-left.
    Largest,
}

/// Compose `content` from `sources` into a new tile map.
///
/// The result has one tile per content cell, so it can itself be selected
/// from or fed into another composition.
pub fn compose(
    sources: &[&Asset],
    content: &[Vec<TileRef>],
    policy: TileSizePolicy,
) -> Result<Asset> {
    let (rows, cols) = content_shape(content)?;
    if sources.is_empty() {
        return Err(CraftError::MalformedGrid {
            message: "map has no sources".to_string(),
        });
    }
    for cell in content.iter().flatten() {
        if cell.source >= sources.len() {
            return Err(CraftError::SourceIndexOutOfRange {
                index: cell.source,
                count: sources.len(),
            });
        }
    }

    let (tile_w, tile_h) = unify_tile_size(sources, policy)?;
    let mode = unify_mode(sources);

    let (Some(width), Some(height)) = (tile_w.checked_mul(cols), tile_h.checked_mul(rows)) else {
        return Err(CraftError::MalformedGrid {
            message: format!(
                "{}x{} cells of {}x{} px do not fit in one image",
                cols, rows, tile_w, tile_h
            ),
        });
    };

    let mut placed = Vec::with_capacity(rows as usize * cols as usize);
    for (row, cells) in content.iter().enumerate() {
        for (col, cell) in cells.iter().enumerate() {
            let tile = resolve_tile(sources[cell.source], cell)?;
            let x = col as i64 * tile_w as i64;
            let y = row as i64 * tile_h as i64;
            placed.push((tile, x, y));
        }
    }

    let canvas = match mode {
        ColorMode::Rgba => {
            let mut canvas = RgbaImage::new(width, height);
            for (tile, x, y) in &placed {
                imageops::replace(&mut canvas, &tile.to_rgba8(), *x, *y);
            }
            DynamicImage::ImageRgba8(canvas)
        }
        _ => {
            let mut canvas = RgbImage::new(width, height);
            for (tile, x, y) in &placed {
                imageops::replace(&mut canvas, &tile.to_rgb8(), *x, *y);
            }
            DynamicImage::ImageRgb8(canvas)
        }
    };

    let grid = Grid::from_counts(rows, cols).ok_or_else(|| CraftError::MalformedGrid {
        message: "map content is empty".to_string(),
    })?;
    Ok(Asset::Tiled(TileMap::new(canvas, grid)?))
}

/// Validate the content grid and return its (rows, cols).
pub fn content_shape(content: &[Vec<TileRef>]) -> Result<(u32, u32)> {
    let Some(first) = content.first() else {
        return Err(CraftError::MalformedGrid {
            message: "map content has no rows".to_string(),
        });
    };

    let cols = first.len();
    if cols == 0 {
        return Err(CraftError::MalformedGrid {
            message: "first row of map content is empty".to_string(),
        });
    }

    if let Some((index, row)) = content
        .iter()
        .enumerate()
        .find(|(_, row)| row.len() != cols)
    {
        return Err(CraftError::MalformedGrid {
            message: format!(
                "row {} has {} cell(s) but row 0 has {}",
                index,
                row.len(),
                cols
            ),
        });
    }

    Ok((content.len() as u32, cols as u32))
}

/// Tile size shared by all sources.
pub fn unify_tile_size(sources: &[&Asset], policy: TileSizePolicy) -> Result<(u32, u32)> {
    let sizes: BTreeSet<(u32, u32)> = sources.iter().map(|s| s.tile_size()).collect();

    let (w, h) = match policy {
        TileSizePolicy::Strict => {
            if sizes.len() > 1 {
                let listed: Vec<String> =
                    sizes.iter().map(|(w, h)| format!("{}x{}", w, h)).collect();
                return Err(CraftError::SizeMismatch {
                    sizes: listed.join(", "),
                });
            }
            sizes.into_iter().next().unwrap_or((0, 0))
        }
        TileSizePolicy::Largest => sizes
            .iter()
            .fold((0, 0), |(mw, mh), &(w, h)| (mw.max(w), mh.max(h))),
    };

    if w == 0 || h == 0 {
        return Err(CraftError::MalformedGrid {
            message: format!("sources have a zero-sized tile ({}x{})", w, h),
        });
    }

    Ok((w, h))
}

/// Canvas mode: alpha-capable if any source carries alpha, opaque otherwise.
pub fn unify_mode(sources: &[&Asset]) -> ColorMode {
    if sources.iter().any(|s| s.mode().has_alpha()) {
        ColorMode::Rgba
    } else {
        ColorMode::Rgb
    }
}

fn resolve_tile<'a>(source: &'a Asset, cell: &TileRef) -> Result<Cow<'a, DynamicImage>> {
    match source {
        Asset::Plain(image) => Ok(Cow::Borrowed(image)),
        Asset::Tiled(map) => {
            let tile = map.select(cell.row.unwrap_or(0), cell.col.unwrap_or(0))?;
            Ok(Cow::Owned(tile.into_image()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayAlphaImage, LumaA, Rgb, Rgba};
    use pretty_assertions::assert_eq;

    const RED: Rgb<u8> = Rgb([255, 0, 0]);
    const GREEN: Rgb<u8> = Rgb([0, 255, 0]);
    const BLUE: Rgb<u8> = Rgb([0, 0, 255]);
    const YELLOW: Rgb<u8> = Rgb([255, 255, 0]);

    fn solid(w: u32, h: u32, colour: Rgb<u8>) -> Asset {
        Asset::Plain(DynamicImage::ImageRgb8(RgbImage::from_pixel(w, h, colour)))
    }

    /// 2x2 tile map of 2x2 tiles: red, green / blue, yellow.
    fn sheet() -> Asset {
        let mut img = RgbImage::new(4, 4);
        for (x, y, pixel) in img.enumerate_pixels_mut() {
            *pixel = match (x / 2, y / 2) {
                (0, 0) => RED,
                (1, 0) => GREEN,
                (0, 1) => BLUE,
                _ => YELLOW,
            };
        }
        let grid = Grid::from_counts(2, 2).unwrap();
        Asset::Tiled(TileMap::new(DynamicImage::ImageRgb8(img), grid).unwrap())
    }

    fn pixel(asset: &Asset, x: u32, y: u32) -> [u8; 3] {
        asset.image().to_rgb8().get_pixel(x, y).0
    }

    #[test]
    fn test_compose_plain_sources() {
        let red = solid(2, 2, RED);
        let blue = solid(2, 2, BLUE);
        let content = vec![
            vec![TileRef::whole(0), TileRef::whole(1)],
            vec![TileRef::whole(1), TileRef::whole(0)],
        ];

        let result = compose(&[&red, &blue], &content, TileSizePolicy::Strict).unwrap();

        assert_eq!(result.size(), (4, 4));
        assert_eq!(pixel(&result, 0, 0), RED.0);
        assert_eq!(pixel(&result, 3, 1), BLUE.0);
        assert_eq!(pixel(&result, 1, 3), BLUE.0);
        assert_eq!(pixel(&result, 2, 2), RED.0);
    }

    #[test]
    fn test_compose_selects_tiles() {
        let sheet = sheet();
        // Flip the sheet horizontally by tile.
        let content = vec![
            vec![TileRef::tile(0, 0, 1), TileRef::tile(0, 0, 0)],
            vec![TileRef::tile(0, 1, 1), TileRef::tile(0, 1, 0)],
        ];

        let result = compose(&[&sheet], &content, TileSizePolicy::Strict).unwrap();

        assert_eq!(pixel(&result, 0, 0), GREEN.0);
        assert_eq!(pixel(&result, 2, 0), RED.0);
        assert_eq!(pixel(&result, 0, 2), YELLOW.0);
        assert_eq!(pixel(&result, 3, 3), BLUE.0);
    }

    #[test]
    fn test_compose_result_is_tiled_by_content() {
        let sheet = sheet();
        let content = vec![vec![
            TileRef::tile(0, 0, 0),
            TileRef::tile(0, 1, 1),
            TileRef::tile(0, 0, 1),
        ]];

        let result = compose(&[&sheet], &content, TileSizePolicy::Strict).unwrap();
        let map = result.as_tiled().unwrap();

        assert_eq!((map.rows(), map.cols()), (1, 3));
        assert_eq!(map.tile_size(), (2, 2));
        assert_eq!(map.select(0, 1).unwrap().image().to_rgb8().get_pixel(0, 0).0, YELLOW.0);
    }

    #[test]
    fn test_compose_mixes_plain_and_tiled() {
        let sheet = sheet();
        let plain = solid(2, 2, BLUE);
        // Indices on the plain source are ignored.
        let content = vec![vec![TileRef::tile(1, 5, 5), TileRef::tile(0, 0, 1)]];

        let result = compose(&[&sheet, &plain], &content, TileSizePolicy::Strict).unwrap();

        assert_eq!(pixel(&result, 0, 0), BLUE.0);
        assert_eq!(pixel(&result, 2, 0), GREEN.0);
    }

    #[test]
    fn test_compose_size_mismatch() {
        let small = solid(2, 2, RED);
        let big = solid(4, 4, BLUE);
        let content = vec![vec![TileRef::whole(0), TileRef::whole(1)]];

        let err = compose(&[&small, &big], &content, TileSizePolicy::Strict).unwrap_err();

        match err {
            CraftError::SizeMismatch { sizes } => assert_eq!(sizes, "2x2, 4x4"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_compose_size_mismatch_counts_unused_sources() {
        let small = solid(2, 2, RED);
        let big = solid(4, 4, BLUE);
        let content = vec![vec![TileRef::whole(0)]];

        assert!(compose(&[&small, &big], &content, TileSizePolicy::Strict).is_err());
    }

    #[test]
    fn test_compose_largest_policy() {
        let small = solid(2, 2, RED);
        let wide = solid(4, 1, BLUE);
        let content = vec![vec![TileRef::whole(0), TileRef::whole(1)]];

        let result = compose(&[&small, &wide], &content, TileSizePolicy::Largest).unwrap();

        // Cells are 4x2
        assert_eq!(result.size(), (8, 2));
        assert_eq!(pixel(&result, 0, 0), RED.0);
        assert_eq!(pixel(&result, 3, 0), [0, 0, 0]);
        assert_eq!(pixel(&result, 7, 0), BLUE.0);
        assert_eq!(pixel(&result, 4, 1), [0, 0, 0]);
    }

    #[test]
    fn test_compose_opaque_sources_give_rgb() {
        let red = solid(1, 1, RED);
        let content = vec![vec![TileRef::whole(0)]];

        let result = compose(&[&red], &content, TileSizePolicy::Strict).unwrap();
        assert_eq!(result.mode(), ColorMode::Rgb);
    }

    #[test]
    fn test_compose_alpha_source_gives_rgba() {
        let red = solid(1, 1, RED);
        let ghost = Asset::Plain(DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            1,
            1,
            Rgba([0, 0, 255, 64]),
        )));
        let content = vec![vec![TileRef::whole(0), TileRef::whole(1)]];

        let result = compose(&[&red, &ghost], &content, TileSizePolicy::Strict).unwrap();

        assert_eq!(result.mode(), ColorMode::Rgba);
        let rgba = result.image().to_rgba8();
        assert_eq!(rgba.get_pixel(0, 0).0, [255, 0, 0, 255]);
        // Pasting replaces, it does not blend.
        assert_eq!(rgba.get_pixel(1, 0).0, [0, 0, 255, 64]);
    }

    #[test]
    fn test_compose_luma_alpha_source_gives_rgba() {
        let red = solid(1, 1, RED);
        let shade = Asset::Plain(DynamicImage::ImageLumaA8(GrayAlphaImage::from_pixel(
            1,
            1,
            LumaA([200, 128]),
        )));
        let content = vec![vec![TileRef::whole(0), TileRef::whole(1)]];

        let result = compose(&[&red, &shade], &content, TileSizePolicy::Strict).unwrap();

        assert_eq!(result.mode(), ColorMode::Rgba);
        let rgba = result.image().to_rgba8();
        assert_eq!(rgba.get_pixel(1, 0).0, [200, 200, 200, 128]);
    }

    #[test]
    fn test_compose_canvas_too_large() {
        let wide = solid(65536, 1, RED);
        let content = vec![vec![TileRef::whole(0); 65536]];

        let err = compose(&[&wide], &content, TileSizePolicy::Strict).unwrap_err();
        assert!(matches!(
            err,
            CraftError::MalformedGrid { message } if message.contains("65536x1")
        ));
    }

    #[test]
    fn test_compose_permuted_sources_match() {
        let sheet = sheet();
        let plain = solid(2, 2, BLUE);

        let content = vec![vec![TileRef::tile(0, 1, 1), TileRef::whole(1)]];
        let permuted = vec![vec![TileRef::tile(1, 1, 1), TileRef::whole(0)]];

        let a = compose(&[&sheet, &plain], &content, TileSizePolicy::Strict).unwrap();
        let b = compose(&[&plain, &sheet], &permuted, TileSizePolicy::Strict).unwrap();

        assert_eq!(a.image().to_rgb8().into_raw(), b.image().to_rgb8().into_raw());
    }

    #[test]
    fn test_compose_empty_content() {
        let red = solid(1, 1, RED);

        let err = compose(&[&red], &[], TileSizePolicy::Strict).unwrap_err();
        assert!(matches!(err, CraftError::MalformedGrid { .. }));

        let err = compose(&[&red], &[vec![]], TileSizePolicy::Strict).unwrap_err();
        assert!(matches!(err, CraftError::MalformedGrid { .. }));
    }

    #[test]
    fn test_compose_jagged_content() {
        let red = solid(1, 1, RED);
        let content = vec![
            vec![TileRef::whole(0), TileRef::whole(0)],
            vec![TileRef::whole(0)],
        ];

        let err = compose(&[&red], &content, TileSizePolicy::Strict).unwrap_err();
        match err {
            CraftError::MalformedGrid { message } => {
                assert_eq!(message, "row 1 has 1 cell(s) but row 0 has 2")
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_compose_source_index_out_of_range() {
        let red = solid(1, 1, RED);
        let content = vec![vec![TileRef::whole(3)]];

        let err = compose(&[&red], &content, TileSizePolicy::Strict).unwrap_err();
        assert!(matches!(
            err,
            CraftError::SourceIndexOutOfRange { index: 3, count: 1 }
        ));
    }

    #[test]
    fn test_compose_tile_out_of_bounds() {
        let sheet = sheet();
        let content = vec![vec![TileRef::tile(0, 2, 0)]];

        let err = compose(&[&sheet], &content, TileSizePolicy::Strict).unwrap_err();
        assert!(matches!(err, CraftError::TileOutOfBounds { .. }));
    }

    #[test]
    fn test_compose_no_sources() {
        let content = vec![vec![TileRef::whole(0)]];
        let err = compose(&[], &content, TileSizePolicy::Strict).unwrap_err();
        assert!(matches!(err, CraftError::MalformedGrid { .. }));
    }

    #[test]
    fn test_tile_ref_from_json() {
        let refs: Vec<TileRef> = serde_json::from_str("[[0], [1, 2], [3, 4, 5]]").unwrap();

        assert_eq!(refs[0], TileRef::whole(0));
        assert_eq!(
            refs[1],
            TileRef {
                source: 1,
                row: Some(2),
                col: None
            }
        );
        assert_eq!(refs[2], TileRef::tile(3, 4, 5));
    }

    #[test]
    fn test_tile_ref_rejects_bad_arity() {
        assert!(serde_json::from_str::<TileRef>("[]").is_err());
        assert!(serde_json::from_str::<TileRef>("[0, 1, 2, 3]").is_err());
    }

    #[test]
    fn test_policy_from_json() {
        let policy: TileSizePolicy = serde_json::from_str("\"largest\"").unwrap();
        assert_eq!(policy, TileSizePolicy::Largest);
        assert_eq!(TileSizePolicy::default(), TileSizePolicy::Strict);
    }
}

//! Processing steps: each turns named assets into one new asset.

use crate::asset::Asset;
use crate::compose::{compose, create_icon};
use crate::error::{CraftError, Result};
use crate::manifest::{IconAttributes, MapAttributes, StepEntry};
use crate::output::{dimensions, Printer};

use super::AssetTable;

/// Step types understood by [`run_step`].
pub const STEP_KINDS: [&str; 2] = ["map", "icon"];

/// Run one step against the assets built so far.
pub fn run_step(step: &StepEntry, assets: &AssetTable, printer: &Printer) -> Result<Asset> {
    let referenced_by = format!("step '{}'", step.name);
    let sources = step
        .sources
        .iter()
        .map(|name| assets.get(name, &referenced_by))
        .collect::<Result<Vec<&Asset>>>()?;

    match step.kind.as_str() {
        "map" => run_map(step, &sources, printer),
        "icon" => run_icon(step, &sources, printer),
        other => Err(CraftError::UnknownStepType {
            step: step.name.clone(),
            kind: other.to_string(),
        }),
    }
}

fn run_map(step: &StepEntry, sources: &[&Asset], printer: &Printer) -> Result<Asset> {
    if step.row.is_some() || step.col.is_some() {
        return Err(CraftError::Manifest {
            message: format!("Map step '{}' does not take `row`/`col`", step.name),
            help: Some("Select tiles per cell in `content`, or on the output".to_string()),
        });
    }
    let attrs: MapAttributes = step.attributes()?;
    let result = compose(sources, &attrs.content, attrs.tile_size)?;

    let (rows, cols) = result
        .as_tiled()
        .map(|map| (map.rows(), map.cols()))
        .unwrap_or((1, 1));
    printer.status(
        "Composing",
        &format!(
            "{} ({}x{} tiles, {} {})",
            step.name,
            cols,
            rows,
            dimensions(result.size()),
            result.mode()
        ),
    );

    Ok(result)
}

fn run_icon(step: &StepEntry, sources: &[&Asset], printer: &Printer) -> Result<Asset> {
    let attrs: IconAttributes = step.attributes()?;

    let Some(first) = sources.first() else {
        return Err(CraftError::Manifest {
            message: format!("Icon step '{}' has no sources", step.name),
            help: Some("List the image to build the icon from under `sources`".to_string()),
        });
    };
    if sources.len() > 1 {
        printer.warning(
            "Warning",
            &format!("icon '{}' only uses its first source", step.name),
        );
    }

    let selected;
    let source = match step.selection()? {
        Some((row, col)) => {
            let map = first.as_tiled().ok_or_else(|| CraftError::NotTiled {
                name: step.sources[0].clone(),
            })?;
            selected = map.select(row, col)?;
            &selected
        }
        None => *first,
    };

    let result = create_icon(
        source,
        attrs.width.get(),
        attrs.height.get(),
        attrs.scaling.resampling(),
    )?;
    printer.status(
        "Composing",
        &format!("{} (icon {})", step.name, dimensions(result.size())),
    );

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::{ColorMode, Grid, TileMap};
    use image::{DynamicImage, Rgba, RgbaImage};
    use serde_json::json;

    fn step(value: serde_json::Value) -> StepEntry {
        serde_json::from_value(value).unwrap()
    }

    fn table() -> AssetTable {
        let mut assets = AssetTable::new();
        let mut sheet = RgbaImage::from_pixel(4, 2, Rgba([255, 0, 0, 255]));
        for y in 0..2 {
            for x in 2..4 {
                sheet.put_pixel(x, y, Rgba([0, 0, 255, 255]));
            }
        }
        let grid = Grid::from_counts(1, 2).unwrap();
        assets.insert(
            "sheet",
            Asset::Tiled(TileMap::new(DynamicImage::ImageRgba8(sheet), grid).unwrap()),
        );
        assets.insert(
            "dot",
            Asset::Plain(DynamicImage::ImageRgba8(RgbaImage::from_pixel(
                2,
                2,
                Rgba([0, 255, 0, 255]),
            ))),
        );
        assets
    }

    #[test]
    fn test_run_map_step() {
        let step = step(json!({
            "name": "strip",
            "sources": ["sheet", "dot"],
            "type": "map",
            "attributes": {"content": [[[0, 0, 1], [1], [0, 0, 0]]]}
        }));

        let result = run_step(&step, &table(), &Printer::quiet()).unwrap();

        assert_eq!(result.size(), (6, 2));
        assert_eq!(result.mode(), ColorMode::Rgba);
        let rgba = result.image().to_rgba8();
        assert_eq!(rgba.get_pixel(0, 0).0, [0, 0, 255, 255]);
        assert_eq!(rgba.get_pixel(2, 0).0, [0, 255, 0, 255]);
        assert_eq!(rgba.get_pixel(4, 0).0, [255, 0, 0, 255]);
    }

    #[test]
    fn test_run_map_rejects_selection() {
        let step = step(json!({
            "name": "strip",
            "sources": ["sheet"],
            "type": "map",
            "row": 0,
            "col": 1,
            "attributes": {"content": [[[0, 0, 0]]]}
        }));

        let err = run_step(&step, &table(), &Printer::quiet()).unwrap_err();
        assert!(matches!(err, CraftError::Manifest { message, .. } if message.contains("strip")));
    }

    #[test]
    fn test_run_icon_step_with_selection() {
        let step = step(json!({
            "name": "blue-icon",
            "sources": ["sheet"],
            "type": "icon",
            "row": 0,
            "col": 1,
            "attributes": {"width": 4, "height": 4, "scaling": {"smooth": false}}
        }));

        let result = run_step(&step, &table(), &Printer::quiet()).unwrap();

        assert_eq!(result.size(), (4, 4));
        assert!(result
            .image()
            .to_rgba8()
            .pixels()
            .all(|p| p.0 == [0, 0, 255, 255]));
    }

    #[test]
    fn test_run_icon_uses_first_source() {
        let step = step(json!({
            "name": "icon",
            "sources": ["dot", "sheet"],
            "type": "icon",
            "attributes": {"width": 2, "height": 2}
        }));

        let result = run_step(&step, &table(), &Printer::quiet()).unwrap();
        assert_eq!(result.image().to_rgba8().get_pixel(0, 0).0, [0, 255, 0, 255]);
    }

    #[test]
    fn test_run_icon_without_sources() {
        let step = step(json!({
            "name": "icon",
            "type": "icon",
            "attributes": {"width": 2, "height": 2}
        }));

        let err = run_step(&step, &table(), &Printer::quiet()).unwrap_err();
        assert!(matches!(err, CraftError::Manifest { .. }));
    }

    #[test]
    fn test_run_icon_selection_on_plain_source() {
        let step = step(json!({
            "name": "icon",
            "sources": ["dot"],
            "type": "icon",
            "row": 0,
            "col": 0,
            "attributes": {"width": 2, "height": 2}
        }));

        let err = run_step(&step, &table(), &Printer::quiet()).unwrap_err();
        assert!(matches!(err, CraftError::NotTiled { name } if name == "dot"));
    }

    #[test]
    fn test_unknown_step_type() {
        let step = step(json!({"name": "blur", "sources": ["dot"], "type": "blur"}));

        let err = run_step(&step, &table(), &Printer::quiet()).unwrap_err();
        assert!(matches!(err, CraftError::UnknownStepType { kind, .. } if kind == "blur"));
    }

    #[test]
    fn test_undefined_source() {
        let step = step(json!({
            "name": "m",
            "sources": ["ghost"],
            "type": "map",
            "attributes": {"content": [[[0]]]}
        }));

        let err = run_step(&step, &table(), &Printer::quiet()).unwrap_err();
        assert!(matches!(
            err,
            CraftError::UndefinedAssetReference { name, .. } if name == "ghost"
        ));
    }
}

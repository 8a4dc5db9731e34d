//! Island debug renderers: classified layers, raw heights, tilemaps, ASCII.

use super::image::DebugImage;
use crate::config::TerrainLayer;
use crate::sink::TilemapSink;
use crate::tile::TileField;

const GLYPHS: &[char] = &['~', '.', ',', '"', '^', '#', '%', '&', '@'];

/// Return an RGB color for terrain layer `index` of `layer_count`.
///
/// Well-known rule keys get a fixed palette; anything else falls back to a
/// blue-to-white ramp by index.
pub fn layer_color(rule: &str, index: usize, layer_count: usize) -> (u8, u8, u8) {
    match rule {
        "deep_water" => (0, 0, 128),
        "water" | "ocean" => (30, 80, 200),
        "shallow" | "shallow_water" => (70, 140, 220),
        "sand" | "beach" => (220, 200, 130),
        "grass" | "plains" => (90, 170, 60),
        "forest" => (30, 110, 40),
        "hills" | "rock" => (130, 110, 90),
        "mountain" | "mountains" => (110, 100, 100),
        "snow" => (240, 240, 250),
        _ => {
            let t = if layer_count > 1 {
                index as f64 / (layer_count - 1) as f64
            } else {
                0.0
            };
            height_to_color(t)
        }
    }
}

/// Glyph used by [`ascii_preview`] for layer `index`.
pub fn layer_glyph(index: usize) -> char {
    GLYPHS[index.min(GLYPHS.len() - 1)]
}

/// Map a normalized height `[0, 1]` to an RGB color.
///
/// Dark blue at 0, through green, to white at 1.
pub fn height_to_color(normalized: f64) -> (u8, u8, u8) {
    let t = normalized.clamp(0.0, 1.0);
    if t < 0.5 {
        let s = t / 0.5;
        (
            (10.0 + s * 40.0) as u8,
            (30.0 + s * 130.0) as u8,
            (120.0 - s * 70.0) as u8,
        )
    } else {
        let s = (t - 0.5) / 0.5;
        (
            (50.0 + s * 200.0) as u8,
            (160.0 + s * 90.0) as u8,
            (50.0 + s * 200.0) as u8,
        )
    }
}

fn opaque((r, g, b): (u8, u8, u8)) -> [u8; 4] {
    [r, g, b, 255]
}

/// One pixel per cell, colored by the cell's layer. North (high `y`) is up.
pub fn render_field_debug(field: &TileField, layers: &[TerrainLayer]) -> DebugImage {
    let (width, height) = (field.width() as u32, field.height() as u32);
    let mut image = DebugImage::new(width, height);

    for cell in field.cells() {
        let rule = layers.get(cell.z_layer).map_or("", |layer| layer.rule.as_str());
        let color = layer_color(rule, cell.z_layer, layers.len());
        image.set_pixel(cell.x as u32, height - 1 - cell.y as u32, opaque(color));
    }

    image
}

/// One pixel per cell, colored by the cell's normalized height.
pub fn render_height_debug(field: &TileField) -> DebugImage {
    let (width, height) = (field.width() as u32, field.height() as u32);
    let mut image = DebugImage::new(width, height);

    for cell in field.cells() {
        let color = height_to_color(cell.z);
        image.set_pixel(cell.x as u32, height - 1 - cell.y as u32, opaque(color));
    }

    image
}

/// Render what a tilemap stack would show, water border included.
///
/// Each position takes the color of its visible (lowest painted) layer.
/// Unpainted positions stay transparent. Returns `None` for an empty sink.
pub fn render_tilemap_debug(sink: &TilemapSink) -> Option<DebugImage> {
    let (min, max) = sink.bounds()?;
    let size = max - min + 1;
    let (width, height) = (size.x as u32, size.y as u32);
    let mut image = DebugImage::new(width, height);

    // Higher layers first so lower ones overwrite them.
    for index in (0..sink.layer_count()).rev() {
        let rule = sink.rule(index).unwrap_or("");
        let color = opaque(layer_color(rule, index, sink.layer_count()));
        for &pos in sink.layer(index).into_iter().flatten() {
            let local = pos - min;
            image.set_pixel(local.x as u32, height - 1 - local.y as u32, color);
        }
    }

    Some(image)
}

/// Text rendering of a field's layers, north up, at most `max_columns` wide.
///
/// Larger fields are sampled every `ceil(width / max_columns)` cells in both
/// directions.
pub fn ascii_preview(field: &TileField, max_columns: usize) -> String {
    let (width, height) = (field.width(), field.height());
    let step = width.div_ceil(max_columns.max(1)).max(1);

    let mut out = String::with_capacity((width / step + 1) * (height / step));
    for y in (0..height).rev().step_by(step) {
        for x in (0..width).step_by(step) {
            let glyph = field.get(x, y).map_or(' ', |cell| layer_glyph(cell.z_layer));
            out.push(glyph);
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use glam::IVec2;

    use super::*;
    use crate::sink::TileSink;

    fn layers() -> Vec<TerrainLayer> {
        vec![
            TerrainLayer::new("water", 1.0),
            TerrainLayer::new("sand", 1.0),
            TerrainLayer::new("grass", 1.0),
        ]
    }

    #[test]
    fn test_field_render_flips_north_up() {
        // Bottom row water, top row grass.
        let field = TileField::from_layers(2, 2, &[0, 0, 2, 2]);
        let image = render_field_debug(&field, &layers());
        assert_eq!(image.dimensions(), (2, 2));
        assert_eq!(image.get_pixel(0, 1), Some(opaque(layer_color("water", 0, 3))));
        assert_eq!(image.get_pixel(0, 0), Some(opaque(layer_color("grass", 2, 3))));
    }

    #[test]
    fn test_unknown_rules_get_distinct_ramp_colors() {
        let low = layer_color("custom_a", 0, 4);
        let high = layer_color("custom_b", 3, 4);
        assert_ne!(low, high);
        assert_eq!(layer_color("anything", 0, 1), height_to_color(0.0));
    }

    #[test]
    fn test_height_colors_clamped() {
        assert_eq!(height_to_color(-1.0), height_to_color(0.0));
        assert_eq!(height_to_color(2.0), height_to_color(1.0));
        assert_eq!(height_to_color(1.0), (250, 250, 250));
    }

    #[test]
    fn test_height_render_covers_every_cell() {
        let mut field = TileField::from_layers(3, 2, &[0; 6]);
        for i in 0..6 {
            field.cell_mut(i).z = i as f64 / 5.0;
        }
        let image = render_height_debug(&field);
        assert!(image.pixels.chunks_exact(4).all(|px| px[3] == 255));
        assert!(image.unique_color_count() > 1);
    }

    #[test]
    fn test_tilemap_render_uses_visible_layer() {
        let mut sink = TilemapSink::new();
        sink.prepare(&layers());
        sink.emit(2, IVec2::new(-1, -1));
        sink.emit(1, IVec2::new(-1, -1));
        sink.emit(0, IVec2::new(1, 0));

        let image = render_tilemap_debug(&sink).unwrap();
        assert_eq!(image.dimensions(), (3, 2));
        // (-1, -1) is the bottom-left pixel.
        assert_eq!(image.get_pixel(0, 1), Some(opaque(layer_color("sand", 1, 3))));
        assert_eq!(image.get_pixel(2, 0), Some(opaque(layer_color("water", 0, 3))));
        assert_eq!(image.get_pixel(1, 0), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_empty_tilemap_renders_nothing() {
        assert!(render_tilemap_debug(&TilemapSink::new()).is_none());
    }

    #[test]
    fn test_ascii_preview_rows_and_glyphs() {
        let field = TileField::from_layers(3, 2, &[0, 1, 2, 0, 0, 20]);
        let preview = ascii_preview(&field, 80);
        assert_eq!(preview, "~~@\n~.,\n");
    }

    #[test]
    fn test_ascii_preview_downsamples_wide_fields() {
        let field = TileField::from_layers(100, 10, &[1; 1000]);
        let preview = ascii_preview(&field, 40);
        let first = preview.lines().next().unwrap();
        assert_eq!(first.len(), 34);
        assert!(preview.lines().count() <= 4);
    }
}

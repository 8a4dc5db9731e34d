//! Island debug visualization: 2D image and text rendering of generated data.
//!
//! Provides [`DebugImage`] and renderers for classified fields, raw heights,
//! painted tilemaps, and a terminal-friendly ASCII preview. Hosts use these to
//! inspect a run without a real tile renderer.

mod image;
mod renderers;

pub use self::image::DebugImage;
pub use renderers::{
    ascii_preview, height_to_color, layer_color, layer_glyph, render_field_debug,
    render_height_debug, render_tilemap_debug,
};

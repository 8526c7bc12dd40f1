//! Projects the catalogue's stops onto a 2-D canvas and emits a
//! deterministic vector drawing. See `spec.md` §4.3.

mod projector;
mod renderer;
pub mod svg;

pub use projector::SphereProjector;
pub use renderer::render_map;

/// A color as it can appear in `render_settings`: a CSS-style name
/// passed through verbatim, or an RGB/RGBA triple/quad.
#[derive(Debug, Clone, PartialEq)]
pub enum Color {
    Named(String),
    Rgb(u8, u8, u8),
    Rgba(u8, u8, u8, f64),
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Color::Named(name) => write!(f, "{name}"),
            Color::Rgb(r, g, b) => write!(f, "rgb({r},{g},{b})"),
            Color::Rgba(r, g, b, a) => write!(f, "rgba({r},{g},{b},{a})"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Offset {
    pub dx: f64,
    pub dy: f64,
}

/// Rendering options, decoded from the `render_settings` object of
/// `spec.md` §6.
#[derive(Debug, Clone)]
pub struct RenderSettings {
    pub width: f64,
    pub height: f64,
    pub padding: f64,

    pub line_width: f64,
    pub stop_radius: f64,

    pub bus_label_font_size: u32,
    pub bus_label_offset: Offset,

    pub stop_label_font_size: u32,
    pub stop_label_offset: Offset,

    pub underlayer_color: Color,
    pub underlayer_width: f64,

    pub color_palette: Vec<Color>,
}

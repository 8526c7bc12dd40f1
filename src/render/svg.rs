//! A minimal vector-drawing element tree, mirroring the shape (not the
//! byte format, which is an external collaborator's concern per
//! `spec.md` §1) of the source project's `svg::Document`: a closed set
//! of element kinds rendered in insertion order.

use std::fmt::Write as _;

use super::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineCap {
    Round,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineJoin {
    Round,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Polyline {
    pub points: Vec<(f64, f64)>,
    pub stroke: Color,
    pub stroke_width: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Circle {
    pub center: (f64, f64),
    pub radius: f64,
    pub fill: Color,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Text {
    pub position: (f64, f64),
    pub offset: (f64, f64),
    pub font_size: u32,
    pub font_family: &'static str,
    pub font_weight: Option<&'static str>,
    pub fill: Color,
    pub stroke: Option<Color>,
    pub stroke_width: Option<f64>,
    pub data: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Polyline(Polyline),
    Circle(Circle),
    Text(Text),
}

/// An ordered sequence of drawing primitives. Rendering is append-only
/// and purely sequential — exactly the property `spec.md` §8's
/// "renderer determinism" invariant is stated against.
#[derive(Debug, Default, Clone)]
pub struct Document {
    elements: Vec<Element>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, element: Element) {
        self.elements.push(element);
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\" ?>\n");
        out.push_str("<svg xmlns=\"http://www.w3.org/2000/svg\" version=\"1.1\">\n");
        for element in &self.elements {
            render_element(&mut out, element);
        }
        out.push_str("</svg>");
        out
    }
}

fn render_element(out: &mut String, element: &Element) {
    match element {
        Element::Polyline(polyline) => render_polyline(out, polyline),
        Element::Circle(circle) => render_circle(out, circle),
        Element::Text(text) => render_text(out, text),
    }
}

fn render_polyline(out: &mut String, polyline: &Polyline) {
    let _ = write!(out, "  <polyline points=\"");
    for (i, (x, y)) in polyline.points.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        let _ = write!(out, "{x},{y}");
    }
    let _ = write!(
        out,
        "\" fill=\"none\" stroke=\"{}\" stroke-width=\"{}\" stroke-linecap=\"round\" stroke-linejoin=\"round\"/>\n",
        polyline.stroke, polyline.stroke_width
    );
}

fn render_circle(out: &mut String, circle: &Circle) {
    let _ = write!(
        out,
        "  <circle cx=\"{}\" cy=\"{}\" r=\"{}\" fill=\"{}\"/>\n",
        circle.center.0, circle.center.1, circle.radius, circle.fill
    );
}

fn render_text(out: &mut String, text: &Text) {
    let _ = write!(
        out,
        "  <text x=\"{}\" y=\"{}\" dx=\"{}\" dy=\"{}\" font-size=\"{}\" font-family=\"{}\"",
        text.position.0, text.position.1, text.offset.0, text.offset.1, text.font_size, text.font_family
    );
    if let Some(weight) = text.font_weight {
        let _ = write!(out, " font-weight=\"{weight}\"");
    }
    let _ = write!(out, " fill=\"{}\"", text.fill);
    if let Some(stroke) = &text.stroke {
        let _ = write!(out, " stroke=\"{stroke}\"");
    }
    if let Some(width) = text.stroke_width {
        let _ = write!(
            out,
            " stroke-width=\"{width}\" stroke-linecap=\"round\" stroke-linejoin=\"round\""
        );
    }
    out.push('>');
    escape_text(out, &text.data);
    out.push_str("</text>\n");
}

fn escape_text(out: &mut String, data: &str) {
    for c in data.chars() {
        match c {
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            c => out.push(c),
        }
    }
}

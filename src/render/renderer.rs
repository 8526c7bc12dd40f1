use crate::catalogue::{Bus, Catalogue, RouteKind, StopId};

use super::projector::SphereProjector;
use super::svg::{Circle, Document, Element, Polyline, Text};
use super::{Color, RenderSettings};

/// Renders the catalogue's non-empty buses and their stops into a
/// vector drawing, in the four-pass order of `spec.md` §4.3: bus
/// polylines, bus labels, stop circles, stop labels. Buses and stops
/// are both visited in lexicographic name order so the output is
/// deterministic across runs (`spec.md` §8 "Renderer determinism").
///
/// Assumes `settings.color_palette` is non-empty — the `io` layer
/// rejects an empty palette at ingest, since that is a boundary
/// validation concern, not a core one.
pub fn render_map(catalogue: &Catalogue, settings: &RenderSettings) -> String {
    let mut buses: Vec<&Bus> = catalogue
        .buses()
        .map(|(_, bus)| bus)
        .filter(|bus| !bus.stops.is_empty())
        .collect();
    buses.sort_by(|a, b| a.name.cmp(&b.name));

    let mut stop_ids: Vec<StopId> = buses
        .iter()
        .flat_map(|bus| bus.stops.iter().copied())
        .collect();
    stop_ids.sort_by_key(|id| catalogue.stop(*id).name.clone());
    stop_ids.dedup();

    let coordinates: Vec<_> = stop_ids
        .iter()
        .map(|id| catalogue.stop(*id).coordinate)
        .collect();
    let projector = SphereProjector::new(
        coordinates.iter(),
        settings.width,
        settings.height,
        settings.padding,
    );

    let mut document = Document::new();
    render_bus_lines(&mut document, &buses, catalogue, &projector, settings);
    render_bus_labels(&mut document, &buses, catalogue, &projector, settings);
    render_stop_circles(&mut document, &stop_ids, catalogue, &projector, settings);
    render_stop_labels(&mut document, &stop_ids, catalogue, &projector, settings);

    document.render()
}

fn palette_color(settings: &RenderSettings, index: usize) -> Color {
    settings.color_palette[index % settings.color_palette.len()].clone()
}

fn render_bus_lines(
    document: &mut Document,
    buses: &[&Bus],
    catalogue: &Catalogue,
    projector: &SphereProjector,
    settings: &RenderSettings,
) {
    for (i, bus) in buses.iter().enumerate() {
        let points = bus
            .logical_traversal()
            .iter()
            .map(|&stop_id| projector.project(&catalogue.stop(stop_id).coordinate))
            .collect();
        document.add(Element::Polyline(Polyline {
            points,
            stroke: palette_color(settings, i),
            stroke_width: settings.line_width,
        }));
    }
}

fn render_bus_labels(
    document: &mut Document,
    buses: &[&Bus],
    catalogue: &Catalogue,
    projector: &SphereProjector,
    settings: &RenderSettings,
) {
    for (i, bus) in buses.iter().enumerate() {
        let color = palette_color(settings, i);
        let first = bus.stops[0];
        add_bus_label_pair(document, catalogue, projector, settings, &color, first, &bus.name);

        let last = *bus.stops.last().unwrap();
        if bus.kind == RouteKind::Direct && first != last {
            add_bus_label_pair(document, catalogue, projector, settings, &color, last, &bus.name);
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn add_bus_label_pair(
    document: &mut Document,
    catalogue: &Catalogue,
    projector: &SphereProjector,
    settings: &RenderSettings,
    color: &Color,
    stop: StopId,
    label: &str,
) {
    let position = projector.project(&catalogue.stop(stop).coordinate);
    document.add(Element::Text(Text {
        position,
        offset: (settings.bus_label_offset.dx, settings.bus_label_offset.dy),
        font_size: settings.bus_label_font_size,
        font_family: "Verdana",
        font_weight: Some("bold"),
        fill: settings.underlayer_color.clone(),
        stroke: Some(settings.underlayer_color.clone()),
        stroke_width: Some(settings.underlayer_width),
        data: label.to_string(),
    }));
    document.add(Element::Text(Text {
        position,
        offset: (settings.bus_label_offset.dx, settings.bus_label_offset.dy),
        font_size: settings.bus_label_font_size,
        font_family: "Verdana",
        font_weight: Some("bold"),
        fill: color.clone(),
        stroke: None,
        stroke_width: None,
        data: label.to_string(),
    }));
}

fn render_stop_circles(
    document: &mut Document,
    stop_ids: &[StopId],
    catalogue: &Catalogue,
    projector: &SphereProjector,
    settings: &RenderSettings,
) {
    for &stop_id in stop_ids {
        let stop = catalogue.stop(stop_id);
        let (cx, cy) = projector.project(&stop.coordinate);
        document.add(Element::Circle(Circle {
            center: (cx, cy),
            radius: settings.stop_radius,
            fill: Color::Named("white".to_string()),
        }));
    }
}

fn render_stop_labels(
    document: &mut Document,
    stop_ids: &[StopId],
    catalogue: &Catalogue,
    projector: &SphereProjector,
    settings: &RenderSettings,
) {
    for &stop_id in stop_ids {
        let stop = catalogue.stop(stop_id);
        let position = projector.project(&stop.coordinate);
        document.add(Element::Text(Text {
            position,
            offset: (settings.stop_label_offset.dx, settings.stop_label_offset.dy),
            font_size: settings.stop_label_font_size,
            font_family: "Verdana",
            font_weight: None,
            fill: settings.underlayer_color.clone(),
            stroke: Some(settings.underlayer_color.clone()),
            stroke_width: Some(settings.underlayer_width),
            data: stop.name.to_string(),
        }));
        document.add(Element::Text(Text {
            position,
            offset: (settings.stop_label_offset.dx, settings.stop_label_offset.dy),
            font_size: settings.stop_label_font_size,
            font_family: "Verdana",
            font_weight: None,
            fill: Color::Named("black".to_string()),
            stroke: None,
            stroke_width: None,
            data: stop.name.to_string(),
        }));
    }
}

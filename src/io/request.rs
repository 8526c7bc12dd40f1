//! Deserialization of the JSON request envelope. See `spec.md` §6.

use std::collections::HashMap;

use serde::Deserialize;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::graph::RoutingSettings;
use crate::render::{Color, Offset, RenderSettings};

#[derive(Debug, Deserialize)]
pub struct Envelope {
    pub base_requests: Vec<BaseRequest>,
    #[serde(default)]
    pub render_settings: RenderSettingsDto,
    #[serde(default)]
    pub routing_settings: RoutingSettingsDto,
    pub stat_requests: Vec<StatRequest>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
pub enum BaseRequest {
    Stop {
        name: String,
        latitude: f64,
        longitude: f64,
        #[serde(default)]
        road_distances: HashMap<String, f64>,
    },
    Bus {
        name: String,
        is_roundtrip: bool,
        stops: Vec<String>,
    },
}

impl BaseRequest {
    /// Checks the essential-attribute invariants `spec.md` §3 states
    /// for a stop: a non-empty name and a finite coordinate within
    /// `latitude ∈ [-90, 90]`, `longitude ∈ [-180, 180]`. A no-op for
    /// `Bus` requests.
    pub fn validate(&self) -> Result<()> {
        let BaseRequest::Stop {
            name,
            latitude,
            longitude,
            ..
        } = self
        else {
            return Ok(());
        };
        if name.is_empty() {
            return Err(Error::InputMalformed("stop name must not be empty".to_string()));
        }
        if !(-90.0..=90.0).contains(latitude) {
            return Err(Error::InputMalformed(format!(
                "stop {name:?}: latitude {latitude} out of range [-90, 90]"
            )));
        }
        if !(-180.0..=180.0).contains(longitude) {
            return Err(Error::InputMalformed(format!(
                "stop {name:?}: longitude {longitude} out of range [-180, 180]"
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum StatRequest {
    Stop { id: u64, name: String },
    Bus { id: u64, name: String },
    Map { id: u64 },
    Route { id: u64, from: String, to: String },
}

impl StatRequest {
    pub fn id(&self) -> u64 {
        match self {
            StatRequest::Stop { id, .. }
            | StatRequest::Bus { id, .. }
            | StatRequest::Map { id }
            | StatRequest::Route { id, .. } => *id,
        }
    }
}

/// Decoded `render_settings` object, with unset keys defaulted to the
/// source project's own reference values. Colors arrive as a `Value`
/// since the JSON shape is polymorphic (name string, 3-array, or
/// 4-array) and are parsed by [`parse_color`].
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RenderSettingsDto {
    pub width: f64,
    pub height: f64,
    pub padding: f64,
    pub line_width: f64,
    pub stop_radius: f64,
    pub bus_label_font_size: u32,
    pub bus_label_offset: [f64; 2],
    pub stop_label_font_size: u32,
    pub stop_label_offset: [f64; 2],
    pub underlayer_color: Value,
    pub underlayer_width: f64,
    pub color_palette: Vec<Value>,
}

impl Default for RenderSettingsDto {
    fn default() -> Self {
        Self {
            width: 600.0,
            height: 400.0,
            padding: 50.0,
            line_width: 14.0,
            stop_radius: 5.0,
            bus_label_font_size: 20,
            bus_label_offset: [7.0, 15.0],
            stop_label_font_size: 20,
            stop_label_offset: [7.0, -3.0],
            underlayer_color: Value::String("white".to_string()),
            underlayer_width: 3.0,
            color_palette: vec![Value::String("black".to_string())],
        }
    }
}

impl RenderSettingsDto {
    pub fn into_settings(self) -> Result<RenderSettings> {
        let color_palette = self
            .color_palette
            .iter()
            .map(parse_color)
            .collect::<Result<Vec<_>>>()?;
        if color_palette.is_empty() {
            return Err(Error::InputMalformed(
                "color_palette must not be empty".to_string(),
            ));
        }
        Ok(RenderSettings {
            width: self.width,
            height: self.height,
            padding: self.padding,
            line_width: self.line_width,
            stop_radius: self.stop_radius,
            bus_label_font_size: self.bus_label_font_size,
            bus_label_offset: Offset {
                dx: self.bus_label_offset[0],
                dy: self.bus_label_offset[1],
            },
            stop_label_font_size: self.stop_label_font_size,
            stop_label_offset: Offset {
                dx: self.stop_label_offset[0],
                dy: self.stop_label_offset[1],
            },
            underlayer_color: parse_color(&self.underlayer_color)?,
            underlayer_width: self.underlayer_width,
            color_palette,
        })
    }
}

/// Parses a polymorphic color value: a CSS-style name string, a
/// 3-element `[r, g, b]` array, or a 4-element `[r, g, b, a]` array.
pub fn parse_color(value: &Value) -> Result<Color> {
    match value {
        Value::String(name) => Ok(Color::Named(name.clone())),
        Value::Array(items) => {
            let channel = |i: usize| -> Result<u8> {
                items
                    .get(i)
                    .and_then(Value::as_u64)
                    .and_then(|n| u8::try_from(n).ok())
                    .ok_or_else(|| Error::InputMalformed(format!("bad color channel at index {i}")))
            };
            match items.len() {
                3 => Ok(Color::Rgb(channel(0)?, channel(1)?, channel(2)?)),
                4 => {
                    let alpha = items
                        .get(3)
                        .and_then(Value::as_f64)
                        .ok_or_else(|| Error::InputMalformed("bad color alpha".to_string()))?;
                    Ok(Color::Rgba(channel(0)?, channel(1)?, channel(2)?, alpha))
                }
                n => Err(Error::InputMalformed(format!(
                    "color array must have 3 or 4 elements, got {n}"
                ))),
            }
        }
        other => Err(Error::InputMalformed(format!(
            "color must be a string or array, got {other}"
        ))),
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RoutingSettingsDto {
    pub bus_wait_time: f64,
    pub bus_velocity: f64,
}

impl Default for RoutingSettingsDto {
    fn default() -> Self {
        Self {
            bus_wait_time: 6.0,
            bus_velocity: 40.0,
        }
    }
}

impl RoutingSettingsDto {
    pub fn into_settings(self) -> Result<RoutingSettings> {
        if self.bus_wait_time <= 0.0 || self.bus_velocity <= 0.0 {
            return Err(Error::InputMalformed(
                "bus_wait_time and bus_velocity must be positive".to_string(),
            ));
        }
        Ok(RoutingSettings {
            bus_wait_time: self.bus_wait_time,
            bus_velocity: self.bus_velocity,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_named_color() {
        let value = Value::String("red".to_string());
        assert_eq!(parse_color(&value).unwrap(), Color::Named("red".to_string()));
    }

    #[test]
    fn parses_rgb_array() {
        let value = serde_json::json!([255, 0, 0]);
        assert_eq!(parse_color(&value).unwrap(), Color::Rgb(255, 0, 0));
    }

    #[test]
    fn parses_rgba_array() {
        let value = serde_json::json!([255, 0, 0, 0.5]);
        assert_eq!(parse_color(&value).unwrap(), Color::Rgba(255, 0, 0, 0.5));
    }

    #[test]
    fn rejects_wrong_size_array() {
        let value = serde_json::json!([1, 2]);
        assert!(parse_color(&value).is_err());
    }

    #[test]
    fn stop_validate_accepts_in_range_coordinates() {
        let request = BaseRequest::Stop {
            name: "A".to_string(),
            latitude: 55.0,
            longitude: 37.0,
            road_distances: HashMap::new(),
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn stop_validate_rejects_empty_name() {
        let request = BaseRequest::Stop {
            name: String::new(),
            latitude: 0.0,
            longitude: 0.0,
            road_distances: HashMap::new(),
        };
        assert!(matches!(request.validate(), Err(Error::InputMalformed(_))));
    }

    #[test]
    fn stop_validate_rejects_out_of_range_latitude() {
        let request = BaseRequest::Stop {
            name: "A".to_string(),
            latitude: 999.0,
            longitude: 0.0,
            road_distances: HashMap::new(),
        };
        assert!(matches!(request.validate(), Err(Error::InputMalformed(_))));
    }

    #[test]
    fn stop_validate_rejects_out_of_range_longitude() {
        let request = BaseRequest::Stop {
            name: "A".to_string(),
            latitude: 0.0,
            longitude: -200.0,
            road_distances: HashMap::new(),
        };
        assert!(matches!(request.validate(), Err(Error::InputMalformed(_))));
    }

    #[test]
    fn bus_validate_is_always_ok() {
        let request = BaseRequest::Bus {
            name: "1".to_string(),
            is_roundtrip: true,
            stops: vec![],
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn envelope_round_trips_from_json() {
        let json = serde_json::json!({
            "base_requests": [
                {"type": "Stop", "name": "A", "latitude": 1.0, "longitude": 2.0, "road_distances": {"B": 100.0}},
                {"type": "Bus", "name": "1", "is_roundtrip": true, "stops": ["A", "B"]}
            ],
            "render_settings": {},
            "routing_settings": {},
            "stat_requests": [
                {"id": 1, "type": "Stop", "name": "A"}
            ]
        });
        let envelope: Envelope = serde_json::from_value(json).unwrap();
        assert_eq!(envelope.base_requests.len(), 2);
        assert_eq!(envelope.stat_requests.len(), 1);
    }
}

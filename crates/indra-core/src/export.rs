//! JSON wire format for traced point sequences.
//!
//! Points are `[re, im]` arrays and the point at infinity is `null`, so the
//! output can be read back by plotting tools without knowing about `Point`.

use serde::{Deserialize, Serialize};

use crate::geometry::Point;
use crate::limit::LimitCurve;

pub const FORMAT_VERSION: &str = "1";

#[derive(Serialize, Deserialize, Debug)]
pub struct WireCurve {
    pub version: String,
    /// Whether the last point joins back to the first.
    #[serde(default)]
    pub closed: bool,
    pub points: Vec<Point>,
}

impl WireCurve {
    pub fn from_curve(curve: &LimitCurve) -> Self {
        WireCurve {
            version: FORMAT_VERSION.to_string(),
            closed: curve.closed,
            points: curve.points.clone(),
        }
    }

    pub fn into_curve(self) -> LimitCurve {
        LimitCurve {
            points: self.points,
            closed: self.closed,
        }
    }
}

/// Deserialize a point sequence written by [`export_json`].
pub fn import_json(json: &str) -> Result<LimitCurve, serde_json::Error> {
    let wire: WireCurve = serde_json::from_str(json)?;
    if wire.version != FORMAT_VERSION {
        tracing::warn!(version = %wire.version, "unexpected curve format version");
    }
    Ok(wire.into_curve())
}

/// Serialize a point sequence to the JSON wire format.
pub fn export_json(curve: &LimitCurve) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&WireCurve::from_curve(curve))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::limit::TraversalConfig;
    use crate::recipes::kissing_schottky;

    fn traced() -> LimitCurve {
        let gens = kissing_schottky(1.0, 0.5).unwrap().generators;
        let config = TraversalConfig {
            max_level: 8,
            eps: 1e-2,
        };
        LimitCurve::trace(&gens, config).unwrap()
    }

    #[test]
    fn test_roundtrip() {
        let curve = traced();
        let json = export_json(&curve).unwrap();
        let back = import_json(&json).unwrap();
        assert_eq!(back.len(), curve.len());
        assert!(back.closed);
        for (p, q) in curve.points.iter().zip(&back.points) {
            assert!(p.approx_eq(*q, 1e-12));
        }
    }

    #[test]
    fn test_version_field() {
        let json = export_json(&traced()).unwrap();
        let wire: WireCurve = serde_json::from_str(&json).unwrap();
        assert_eq!(wire.version, FORMAT_VERSION);
    }

    #[test]
    fn test_infinity_is_null() {
        let curve = LimitCurve {
            points: vec![Point::new(1.0, -2.0), Point::Infinity],
            closed: false,
        };
        let value: serde_json::Value = serde_json::from_str(&export_json(&curve).unwrap()).unwrap();
        assert_eq!(value["points"][0], serde_json::json!([1.0, -2.0]));
        assert!(value["points"][1].is_null());
        assert_eq!(value["closed"], serde_json::json!(false));
    }

    #[test]
    fn test_closed_defaults_to_open() {
        let json = r#"{"version": "1", "points": [[0.5, 0.25], null]}"#;
        let curve = import_json(json).unwrap();
        assert!(!curve.closed);
        assert_eq!(curve.points[0], Point::new(0.5, 0.25));
        assert!(curve.points[1].is_infinite());
    }

    #[test]
    fn test_rejects_malformed_points() {
        let json = r#"{"version": "1", "points": [[0.5]]}"#;
        assert!(import_json(json).is_err());
    }
}

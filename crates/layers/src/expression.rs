//! Builders for the renderer's JSON style expressions.
//!
//! Only the handful of operators the sighting layers need are covered:
//! property lookup, zoom, heatmap density and linear interpolation.

use serde_json::{Value, json};

pub fn get(property: &str) -> Value {
    json!(["get", property])
}

pub fn zoom() -> Value {
    json!(["zoom"])
}

pub fn heatmap_density() -> Value {
    json!(["heatmap-density"])
}

/// `["interpolate", ["linear"], input, stop0, out0, stop1, out1, ...]`
///
/// Stops must be strictly ascending; callers validate their parameters first.
pub fn interpolate_linear<I>(input: Value, stops: I) -> Value
where
    I: IntoIterator<Item = (f64, Value)>,
{
    let mut out = vec![json!("interpolate"), json!(["linear"]), input];
    for (stop, output) in stops {
        out.push(json!(stop));
        out.push(output);
    }
    Value::Array(out)
}

/// Linear ramp between two numeric outputs.
pub fn ramp(input: Value, (x0, y0): (f64, f64), (x1, y1): (f64, f64)) -> Value {
    interpolate_linear(input, [(x0, json!(y0)), (x1, json!(y1))])
}

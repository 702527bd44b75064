use serde_json::json;

use crate::WEIGHT_PROPERTY;
use crate::expression::{get, interpolate_linear, ramp, zoom};
use crate::layer::{LayerKind, LayerSpec};
use crate::params::{CIRCLE_FULL_RADIUS_ZOOM, LayerParams};
use crate::symbology::ColorRamp;

/// Circle radius (px) at the lowest circle zoom, for weight 0 and max magnitude.
const RADIUS_NEAR: (f64, f64) = (1.0, 4.0);
/// Circle radius (px) at full zoom, for weight 0 and max magnitude.
const RADIUS_FAR: (f64, f64) = (5.0, 50.0);
const STROKE_COLOR: &str = "white";
const STROKE_WIDTH_PX: f64 = 1.0;

/// Individual markers. Assumes `params` has been validated.
pub fn circle_layer(params: &LayerParams, colors: &ColorRamp) -> LayerSpec {
    let max = params.max_magnitude;
    let (fade_start, fade_end) = params.handoff_band();

    // Radius interpolates over zoom, and each zoom stop interpolates over weight.
    let by_weight = |(low, high): (f64, f64)| ramp(get(WEIGHT_PROPERTY), (0.0, low), (max, high));
    let radius = interpolate_linear(
        zoom(),
        [
            (params.min_zoom_for_circles, by_weight(RADIUS_NEAR)),
            (CIRCLE_FULL_RADIUS_ZOOM, by_weight(RADIUS_FAR)),
        ],
    );

    LayerSpec::new(
        params.circle_layer_id(),
        LayerKind::Circle,
        &params.source_name,
    )
    .with_minzoom(params.min_zoom_for_circles)
    .with_paint("circle-radius", radius)
    .with_paint("circle-color", colors.expression(get(WEIGHT_PROPERTY), max))
    .with_paint("circle-stroke-color", json!(STROKE_COLOR))
    .with_paint(
        "circle-stroke-width",
        ramp(zoom(), (fade_start, 0.0), (fade_end, STROKE_WIDTH_PX)),
    )
    .with_paint(
        "circle-opacity",
        ramp(zoom(), (fade_start, 0.0), (fade_end, 1.0)),
    )
}

#[cfg(test)]
mod tests {
    use super::circle_layer;
    use crate::params::LayerParams;
    use crate::symbology::SIGHTINGS_RAMP;
    use serde_json::json;

    #[test]
    fn radius_is_nested_over_zoom_then_weight() {
        let layer = circle_layer(&LayerParams::default(), &SIGHTINGS_RAMP);
        assert_eq!(layer.minzoom, Some(7.0));
        assert_eq!(
            layer.paint("circle-radius"),
            Some(&json!([
                "interpolate", ["linear"], ["zoom"],
                7.0, ["interpolate", ["linear"], ["get", "weight"], 0.0, 1.0, 5.0, 4.0],
                16.0, ["interpolate", ["linear"], ["get", "weight"], 0.0, 5.0, 5.0, 50.0]
            ]))
        );
    }

    #[test]
    fn fades_in_over_handoff_band() {
        let layer = circle_layer(&LayerParams::default(), &SIGHTINGS_RAMP);
        assert_eq!(
            layer.paint("circle-opacity"),
            Some(&json!(["interpolate", ["linear"], ["zoom"], 11.0, 0.0, 13.0, 1.0]))
        );
        assert_eq!(
            layer.paint("circle-stroke-width"),
            Some(&json!(["interpolate", ["linear"], ["zoom"], 11.0, 0.0, 13.0, 1.0]))
        );
    }

    #[test]
    fn colors_follow_the_heatmap_ramp_over_weight() {
        let params = LayerParams {
            max_magnitude: 10.0,
            ..LayerParams::default()
        };
        let layer = circle_layer(&params, &SIGHTINGS_RAMP);
        let color = layer.paint("circle-color").unwrap();
        assert_eq!(color[2], json!(["get", "weight"]));
        assert_eq!(color[11], json!(10.0));
        assert_eq!(color[12], json!("rgb(178,24,43)"));
    }
}

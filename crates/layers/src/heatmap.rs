use crate::WEIGHT_PROPERTY;
use crate::expression::{get, heatmap_density, ramp, zoom};
use crate::layer::{LayerKind, LayerSpec};
use crate::params::{INTENSITY_SPAN, LayerParams};
use crate::symbology::ColorRamp;

const INTENSITY_LOW: f64 = 1.0;
const INTENSITY_HIGH: f64 = 3.0;
const RADIUS_MIN_PX: f64 = 2.0;
const RADIUS_MAX_PX: f64 = 20.0;

/// Density layer. Assumes `params` has been validated.
pub fn heatmap_layer(params: &LayerParams, colors: &ColorRamp) -> LayerSpec {
    let reference = params.reference_zoom;
    let (fade_start, fade_end) = params.handoff_band();

    LayerSpec::new(
        params.heatmap_layer_id(),
        LayerKind::Heatmap,
        &params.source_name,
    )
    .with_maxzoom(fade_end)
    .with_paint(
        "heatmap-weight",
        ramp(get(WEIGHT_PROPERTY), (0.0, 0.0), (params.max_magnitude, 1.0)),
    )
    .with_paint(
        "heatmap-intensity",
        ramp(
            zoom(),
            (reference, INTENSITY_LOW),
            (reference + INTENSITY_SPAN, INTENSITY_HIGH),
        ),
    )
    .with_paint("heatmap-color", colors.expression(heatmap_density(), 1.0))
    .with_paint(
        "heatmap-radius",
        ramp(zoom(), (0.0, RADIUS_MIN_PX), (reference, RADIUS_MAX_PX)),
    )
    .with_paint(
        "heatmap-opacity",
        ramp(zoom(), (fade_start, 1.0), (fade_end, 0.0)),
    )
}

//! Layer specifications for the sightings map.
//!
//! Everything here is pure: the same [`LayerParams`] always produce the same
//! [`LayerSet`], down to the serialized bytes.

pub mod circle;
pub mod expression;
pub mod heatmap;
pub mod layer;
pub mod params;
pub mod symbology;

pub use layer::*;
pub use params::*;
pub use symbology::{ColorRamp, Rgba, SIGHTINGS_RAMP};

/// Feature property read by both layers.
pub const WEIGHT_PROPERTY: &str = "weight";

/// Build the heatmap and circle layers for `params`.
pub fn build_layers(params: &LayerParams) -> Result<LayerSet, LayerParamsError> {
    build_layers_with_ramp(params, &SIGHTINGS_RAMP)
}

pub fn build_layers_with_ramp(
    params: &LayerParams,
    colors: &ColorRamp,
) -> Result<LayerSet, LayerParamsError> {
    params.validate()?;
    Ok(LayerSet {
        heatmap: heatmap::heatmap_layer(params, colors),
        circle: circle::circle_layer(params, colors),
    })
}

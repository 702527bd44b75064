use thiserror::Error;

/// Highest zoom the renderer supports.
pub const MAX_ZOOM: f64 = 24.0;
/// Zoom at which circles reach their largest radius.
pub const CIRCLE_FULL_RADIUS_ZOOM: f64 = 16.0;
/// Zoom span over which heatmap intensity ramps up.
pub const INTENSITY_SPAN: f64 = 4.0;
/// Offset from the reference zoom where the heatmap starts handing over to circles.
pub const HANDOFF_START: f64 = 2.0;
/// Offset from the reference zoom where the handover is complete.
pub const HANDOFF_END: f64 = 4.0;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayerParamsError {
    #[error("source name must not be empty")]
    EmptySource,
    #[error("max magnitude must be finite and > 0, got {0}")]
    MaxMagnitude(f64),
    #[error("reference zoom must be in (0, {max}], got {got}")]
    ReferenceZoom { got: f64, max: f64 },
    #[error("circle min zoom must be in [0, {max}), got {got}")]
    CircleMinZoom { got: f64, max: f64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct LayerParams {
    pub source_name: String,
    /// Weight that maps to full heatmap density and the largest circles.
    pub max_magnitude: f64,
    pub reference_zoom: f64,
    pub min_zoom_for_circles: f64,
}

impl Default for LayerParams {
    fn default() -> Self {
        Self {
            source_name: "sightings".to_string(),
            max_magnitude: 5.0,
            reference_zoom: 9.0,
            min_zoom_for_circles: 7.0,
        }
    }
}

impl LayerParams {
    /// Degenerate parameters are rejected rather than clamped.
    pub fn validate(&self) -> Result<(), LayerParamsError> {
        if self.source_name.trim().is_empty() {
            return Err(LayerParamsError::EmptySource);
        }
        if !self.max_magnitude.is_finite() || self.max_magnitude <= 0.0 {
            return Err(LayerParamsError::MaxMagnitude(self.max_magnitude));
        }
        let max_ref = MAX_ZOOM - INTENSITY_SPAN;
        if !self.reference_zoom.is_finite()
            || self.reference_zoom <= 0.0
            || self.reference_zoom > max_ref
        {
            return Err(LayerParamsError::ReferenceZoom {
                got: self.reference_zoom,
                max: max_ref,
            });
        }
        if !self.min_zoom_for_circles.is_finite()
            || self.min_zoom_for_circles < 0.0
            || self.min_zoom_for_circles >= CIRCLE_FULL_RADIUS_ZOOM
        {
            return Err(LayerParamsError::CircleMinZoom {
                got: self.min_zoom_for_circles,
                max: CIRCLE_FULL_RADIUS_ZOOM,
            });
        }
        Ok(())
    }

    pub fn heatmap_layer_id(&self) -> String {
        format!("{}-heat", self.source_name)
    }

    pub fn circle_layer_id(&self) -> String {
        format!("{}-point", self.source_name)
    }

    /// `(start, end)` zoom band of the heatmap-to-circle handover.
    pub fn handoff_band(&self) -> (f64, f64) {
        (
            self.reference_zoom + HANDOFF_START,
            self.reference_zoom + HANDOFF_END,
        )
    }
}

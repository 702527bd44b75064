use std::env;
use std::time::Duration;

use layers::{LayerParams, LayerParamsError};
use streaming::{DecayParams, DecayParamsError};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("bounds threshold must be finite and >= 0, got {0}")]
    Threshold(f64),
    #[error(transparent)]
    Decay(#[from] DecayParamsError),
    #[error(transparent)]
    Layers(#[from] LayerParamsError),
}

/// Startup parameters. Not mutable once the engine is built.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Quiet period after the last viewport change before a refresh is considered.
    pub debounce: Duration,
    /// Per-edge tolerance (degrees) under which two viewports count as equal.
    pub bounds_threshold_deg: f64,
    pub decay: DecayParams,
    pub layers: LayerParams,
    /// Drop fetch responses that resolve after a newer one was applied.
    /// Off by default: overlapping fetches are last-write-wins.
    pub discard_stale_responses: bool,
    /// Maximum number of trace events kept in memory.
    pub trace_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(300),
            bounds_threshold_deg: 0.001,
            decay: DecayParams::default(),
            layers: LayerParams::default(),
            discard_stale_responses: false,
            trace_capacity: 1024,
        }
    }
}

impl EngineConfig {
    /// Defaults overlaid with `SIGHTINGS_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Like [`EngineConfig::from_env`] with an explicit variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let d = Self::default();
        let lookup = &lookup;

        Self {
            debounce: Duration::from_millis(env_var_u64(
                lookup,
                "SIGHTINGS_DEBOUNCE_MS",
                d.debounce.as_millis() as u64,
            )),
            bounds_threshold_deg: env_var_f64(
                lookup,
                "SIGHTINGS_BOUNDS_THRESHOLD",
                d.bounds_threshold_deg,
            ),
            decay: DecayParams {
                max_weight: env_var_f64(lookup, "SIGHTINGS_MAX_WEIGHT", d.decay.max_weight),
                min_weight: env_var_f64(lookup, "SIGHTINGS_MIN_WEIGHT", d.decay.min_weight),
                decay_constant_days: env_var_f64(
                    lookup,
                    "SIGHTINGS_DECAY_DAYS",
                    d.decay.decay_constant_days,
                ),
            },
            layers: LayerParams {
                source_name: lookup("SIGHTINGS_SOURCE").unwrap_or(d.layers.source_name),
                max_magnitude: env_var_f64(
                    lookup,
                    "SIGHTINGS_MAX_MAGNITUDE",
                    d.layers.max_magnitude,
                ),
                reference_zoom: env_var_f64(
                    lookup,
                    "SIGHTINGS_REFERENCE_ZOOM",
                    d.layers.reference_zoom,
                ),
                min_zoom_for_circles: env_var_f64(
                    lookup,
                    "SIGHTINGS_CIRCLE_MIN_ZOOM",
                    d.layers.min_zoom_for_circles,
                ),
            },
            discard_stale_responses: env_var_bool(
                lookup,
                "SIGHTINGS_DISCARD_STALE",
                d.discard_stale_responses,
            ),
            trace_capacity: env_var_u64(
                lookup,
                "SIGHTINGS_TRACE_CAPACITY",
                d.trace_capacity as u64,
            ) as usize,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.bounds_threshold_deg.is_finite() || self.bounds_threshold_deg < 0.0 {
            return Err(ConfigError::Threshold(self.bounds_threshold_deg));
        }
        self.decay.validate()?;
        self.layers.validate()?;
        Ok(())
    }
}

fn env_var_u64(lookup: &dyn Fn(&str) -> Option<String>, key: &str, default: u64) -> u64 {
    lookup(key)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn env_var_f64(lookup: &dyn Fn(&str) -> Option<String>, key: &str, default: f64) -> f64 {
    lookup(key)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn env_var_bool(lookup: &dyn Fn(&str) -> Option<String>, key: &str, default: bool) -> bool {
    lookup(key)
        .map(|v| matches!(v.trim(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}

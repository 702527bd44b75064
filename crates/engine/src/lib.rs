//! Viewport-synchronized sightings engine.
//!
//! Wires the point store, the decay transform and the layer builder to a map
//! renderer: debounced viewport refreshes, atomic source replacement, and a
//! mark mode that turns clicks into new points.

pub mod config;
pub mod engine;
pub mod error;
pub mod mark_mode;
pub mod renderer;
pub mod viewport;

pub use config::*;
pub use engine::*;
pub use error::*;
pub use mark_mode::*;
pub use renderer::*;
pub use viewport::*;

//! Helpers shared by the `sightings` command line tool.

use foundation::{BoundsError, GeoBounds};
use thiserror::Error;

#[derive(Debug, PartialEq, Error)]
pub enum BoundsArgError {
    #[error("bounds must be west,south,east,north (got {0} values)")]
    Arity(usize),
    #[error("not a number: {0:?}")]
    Number(String),
    #[error(transparent)]
    Invalid(BoundsError),
}

/// Parse `west,south,east,north` into validated bounds.
pub fn parse_bounds(s: &str) -> Result<GeoBounds, BoundsArgError> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    if parts.len() != 4 {
        return Err(BoundsArgError::Arity(parts.len()));
    }

    let mut edges = [0.0f64; 4];
    for (edge, part) in edges.iter_mut().zip(&parts) {
        *edge = part
            .parse()
            .map_err(|_| BoundsArgError::Number(part.to_string()))?;
    }

    let bounds = GeoBounds::new(edges[0], edges[1], edges[2], edges[3]);
    bounds.validate().map_err(BoundsArgError::Invalid)?;
    Ok(bounds)
}

use std::fmt;

use serde_json::{Value, json};

use crate::expression::interpolate_linear;

/// sRGB color with a CSS-style alpha in `[0, 1]`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a >= 1.0 {
            write!(f, "rgb({},{},{})", self.r, self.g, self.b)
        } else {
            write!(f, "rgba({},{},{},{})", self.r, self.g, self.b, self.a)
        }
    }
}

/// Fixed color ramp over a normalized `[0, 1]` domain.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ColorRamp {
    pub stops: [(f64, Rgba); 5],
}

/// Blue to red, fully transparent at zero so heatmap edges blur out.
pub const SIGHTINGS_RAMP: ColorRamp = ColorRamp {
    stops: [
        (0.0, Rgba::rgb(33, 102, 172).with_alpha(0.0)),
        (0.25, Rgba::rgb(103, 169, 207)),
        (0.5, Rgba::rgb(209, 229, 240)),
        (0.75, Rgba::rgb(239, 138, 98)),
        (1.0, Rgba::rgb(178, 24, 43)),
    ],
};

impl ColorRamp {
    /// Interpolate `input` over the ramp with its domain stretched to `[0, domain_max]`.
    pub fn expression(&self, input: Value, domain_max: f64) -> Value {
        interpolate_linear(
            input,
            self.stops
                .iter()
                .map(|(t, color)| (t * domain_max, json!(color.to_string()))),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::{Rgba, SIGHTINGS_RAMP};
    use crate::expression::heatmap_density;
    use serde_json::json;

    #[test]
    fn formats_css_colors() {
        assert_eq!(Rgba::rgb(1, 2, 3).to_string(), "rgb(1,2,3)");
        assert_eq!(Rgba::rgb(1, 2, 3).with_alpha(0.0).to_string(), "rgba(1,2,3,0)");
    }

    #[test]
    fn ramp_starts_transparent() {
        assert_eq!(SIGHTINGS_RAMP.stops[0].1.a, 0.0);
        assert!(SIGHTINGS_RAMP.stops[1..].iter().all(|(_, c)| c.a == 1.0));
    }

    #[test]
    fn expression_scales_domain() {
        let e = SIGHTINGS_RAMP.expression(heatmap_density(), 1.0);
        assert_eq!(e[3], json!(0.0));
        assert_eq!(e[4], json!("rgba(33,102,172,0)"));

        let e = SIGHTINGS_RAMP.expression(heatmap_density(), 5.0);
        assert_eq!(e[11], json!(5.0));
        assert_eq!(e[12], json!("rgb(178,24,43)"));
    }
}

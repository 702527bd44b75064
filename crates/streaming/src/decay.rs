use foundation::TimestampMs;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecayParamsError {
    #[error("decay weights must be finite with 0 < min ({min}) <= max ({max})")]
    Weights { min: f64, max: f64 },
    #[error("decay constant must be finite and > 0 days, got {0}")]
    DecayConstant(f64),
}

/// Exponential age decay with a visibility floor.
///
/// `weight = max(min_weight, max_weight * exp(-age_days / decay_constant_days))`
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DecayParams {
    pub max_weight: f64,
    pub min_weight: f64,
    pub decay_constant_days: f64,
}

impl Default for DecayParams {
    fn default() -> Self {
        Self {
            max_weight: 5.0,
            min_weight: 0.1,
            decay_constant_days: 30.0,
        }
    }
}

impl DecayParams {
    pub fn validate(&self) -> Result<(), DecayParamsError> {
        let (min, max) = (self.min_weight, self.max_weight);
        if !min.is_finite() || !max.is_finite() || min <= 0.0 || min > max {
            return Err(DecayParamsError::Weights { min, max });
        }
        if !self.decay_constant_days.is_finite() || self.decay_constant_days <= 0.0 {
            return Err(DecayParamsError::DecayConstant(self.decay_constant_days));
        }
        Ok(())
    }

    /// Negative or NaN ages count as brand new.
    pub fn weight(&self, age_days: f64) -> f64 {
        let age = if age_days.is_nan() { 0.0 } else { age_days.max(0.0) };
        let decayed = self.max_weight * (-age / self.decay_constant_days).exp();
        decayed.max(self.min_weight)
    }

    pub fn weight_at(&self, created_at: TimestampMs, now: TimestampMs) -> f64 {
        self.weight(created_at.age_days(now))
    }
}

#[cfg(test)]
mod tests {
    use super::{DecayParams, DecayParamsError};
    use foundation::TimestampMs;

    #[test]
    fn fresh_points_render_at_max_weight() {
        let d = DecayParams::default();
        assert_eq!(d.weight(0.0), 5.0);
        assert_eq!(d.weight(-3.0), 5.0);
    }

    #[test]
    fn one_decay_constant_divides_by_e() {
        let d = DecayParams::default();
        let w = d.weight(30.0);
        assert!((w - 5.0 * (-1.0f64).exp()).abs() < 1e-12);
        assert!((w - 1.839).abs() < 1e-3);
    }

    #[test]
    fn monotonic_and_bounded() {
        let d = DecayParams::default();
        let mut prev = f64::INFINITY;
        for i in 0..5_000 {
            let age = i as f64 * 0.25;
            let w = d.weight(age);
            assert!(w <= prev, "weight increased at age {age}");
            assert!((d.min_weight..=d.max_weight).contains(&w));
            prev = w;
        }
        assert_eq!(d.weight(1e9), d.min_weight);
    }

    #[test]
    fn weight_at_uses_timestamps() {
        let d = DecayParams::default();
        let now = TimestampMs::from_days(100.0);
        let created = now.saturating_sub_days(30.0);
        assert!((d.weight_at(created, now) - d.weight(30.0)).abs() < 1e-9);
    }

    #[test]
    fn rejects_inverted_or_degenerate_params() {
        let bad = DecayParams {
            min_weight: 6.0,
            ..DecayParams::default()
        };
        assert!(matches!(bad.validate(), Err(DecayParamsError::Weights { .. })));

        // A zero floor would let old points fade out entirely.
        let bad = DecayParams {
            min_weight: 0.0,
            ..DecayParams::default()
        };
        assert_eq!(
            bad.validate(),
            Err(DecayParamsError::Weights { min: 0.0, max: 5.0 })
        );

        let bad = DecayParams {
            decay_constant_days: 0.0,
            ..DecayParams::default()
        };
        assert_eq!(bad.validate(), Err(DecayParamsError::DecayConstant(0.0)));
        assert!(DecayParams::default().validate().is_ok());
    }
}

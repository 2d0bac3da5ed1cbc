//! Timing and geometry of the reel motion profile

use serde::{Deserialize, Serialize};

use super::MotionError;
use crate::symbols::{REEL_COUNT, ROW_COUNT};

/// All durations in milliseconds, all distances in surface units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    pub canvas_width: f64,
    pub canvas_height: f64,
    /// Vertical offset of every reel inside the canvas
    pub reel_top_offset: f64,
    /// Slots per strip, visible or not
    pub symbols_per_reel: usize,
    pub symbol_height: f64,

    /// Spin phase length, measured from the reel's own start
    pub spin_duration_ms: f64,
    /// Start delay added per reel index
    pub start_stagger_ms: f64,
    /// Fraction of the spin phase after which the strip fades out
    pub fade_start_fraction: f64,
    pub fade_duration_ms: f64,

    /// Displacement per frame at easing factor 1.0
    pub speed_scale: f64,
    /// Easing factor during the anticipation nudge (negative = upward)
    pub anticipation_ease: f64,
    /// Progress below which the anticipation nudge applies
    pub anticipation_until: f64,
    /// Gain of the cubic ease-in
    pub ease_gain: f64,

    pub settle_duration_ms: f64,
    pub settle_overshoot: f64,

    /// Added to the spin duration to get the completion deadline
    pub completion_margin_ms: f64,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            canvas_width: 620.0,
            canvas_height: 458.0,
            reel_top_offset: 20.0,
            symbols_per_reel: 9,
            symbol_height: 150.0,
            spin_duration_ms: 4000.0,
            start_stagger_ms: 200.0,
            fade_start_fraction: 0.97,
            fade_duration_ms: 100.0,
            speed_scale: 20.0,
            anticipation_ease: -0.025,
            anticipation_until: 0.08,
            ease_gain: 15.0,
            settle_duration_ms: 500.0,
            settle_overshoot: 50.0,
            completion_margin_ms: 1000.0,
        }
    }
}

impl MotionConfig {
    pub fn reel_width(&self) -> f64 {
        self.canvas_width / REEL_COUNT as f64
    }

    /// Height of the whole strip; positions wrap at this value.
    pub fn strip_height(&self) -> f64 {
        self.symbols_per_reel as f64 * self.symbol_height
    }

    pub fn start_delay_ms(&self, reel: usize) -> f64 {
        reel as f64 * self.start_stagger_ms
    }

    pub fn fade_start_ms(&self) -> f64 {
        self.spin_duration_ms * self.fade_start_fraction
    }

    /// Easing factor at `progress` in [0, 1].
    pub fn ease(&self, progress: f64) -> f64 {
        if progress < self.anticipation_until {
            self.anticipation_ease
        } else {
            self.ease_gain * progress.powi(3)
        }
    }

    /// Time from spin start until the last reel has finished settling.
    pub fn slowest_reel_end_ms(&self) -> f64 {
        self.start_delay_ms(REEL_COUNT - 1) + self.spin_duration_ms + self.settle_duration_ms
    }

    /// Fixed upper bound on a spin's length.
    pub fn completion_deadline_ms(&self) -> f64 {
        self.spin_duration_ms + self.completion_margin_ms
    }

    pub fn validate(&self) -> Result<(), MotionError> {
        let invalid = |msg: String| Err(MotionError::InvalidConfig(msg));
        if self.symbols_per_reel < ROW_COUNT {
            return invalid(format!(
                "symbols_per_reel must be at least {ROW_COUNT}, got {}",
                self.symbols_per_reel
            ));
        }
        let positive = [
            ("canvas_width", self.canvas_width),
            ("canvas_height", self.canvas_height),
            ("symbol_height", self.symbol_height),
            ("spin_duration_ms", self.spin_duration_ms),
            ("settle_duration_ms", self.settle_duration_ms),
            ("fade_duration_ms", self.fade_duration_ms),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return invalid(format!("{name} must be positive, got {value}"));
            }
        }
        if !(0.0..=1.0).contains(&self.fade_start_fraction) {
            return invalid(format!(
                "fade_start_fraction must be within [0, 1], got {}",
                self.fade_start_fraction
            ));
        }
        if self.start_stagger_ms < 0.0 || self.completion_margin_ms < 0.0 {
            return invalid("stagger and completion margin must not be negative".into());
        }
        if self.completion_deadline_ms() <= self.slowest_reel_end_ms() {
            return invalid(format!(
                "completion deadline {}ms does not exceed slowest reel end {}ms",
                self.completion_deadline_ms(),
                self.slowest_reel_end_ms()
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_values_are_valid() {
        let cfg = MotionConfig::default();
        cfg.validate().unwrap();
        assert_eq!(cfg.strip_height(), 1350.0);
        assert!((cfg.fade_start_ms() - 3880.0).abs() < 1e-9);
        assert_eq!(cfg.slowest_reel_end_ms(), 4900.0);
        assert_eq!(cfg.completion_deadline_ms(), 5000.0);
    }

    #[test]
    fn ease_has_anticipation_then_cubic() {
        let cfg = MotionConfig::default();
        assert_eq!(cfg.ease(0.0), -0.025);
        assert_eq!(cfg.ease(0.079), -0.025);
        assert!((cfg.ease(1.0) - 15.0).abs() < 1e-12);
        assert!(cfg.ease(0.5) < cfg.ease(0.9));
    }

    #[test]
    fn deadline_must_cover_slowest_reel() {
        let cfg = MotionConfig {
            completion_margin_ms: 800.0,
            ..MotionConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(MotionError::InvalidConfig(_))));
    }

    #[test]
    fn strip_must_hold_result() {
        let cfg = MotionConfig {
            symbols_per_reel: 2,
            ..MotionConfig::default()
        };
        assert!(cfg.validate().is_err());
    }
}

//! Phase cycle - the repeating stable / transition timeline of the auto mix
//!
//! The cycle position is `(elapsed mod period) / period`, always in [0, 1).
//! Fixed thresholds split it into three phases:
//!
//! ```text
//! 0.0      stable_a_start     stable_a_end   transition_start   transition_end    1.0
//!  |  StableB  |  StableA (targets set) | StableA (hold) | Transitioning | StableB |
//! ```

use thiserror::Error;

/// Invalid phase configuration
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PhaseConfigError {
    #[error("cycle period must be positive")]
    ZeroPeriod,
    #[error("thresholds must be strictly increasing within (0, 1): {0:?}")]
    Thresholds([f64; 4]),
}

/// Mixing phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Phase {
    /// Deck A dominates the mix
    #[default]
    StableA,
    /// Crossfade from A to B in progress
    Transitioning,
    /// Deck B dominates after a completed transition
    StableB,
}

impl Phase {
    /// Classify a cycle position
    pub fn classify(cycle: f64, thresholds: &PhaseThresholds) -> Self {
        if cycle >= thresholds.transition_start && cycle < thresholds.transition_end {
            Phase::Transitioning
        } else if cycle >= thresholds.transition_end || cycle < thresholds.stable_a_start {
            Phase::StableB
        } else {
            Phase::StableA
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Phase::StableA => "DECK A",
            Phase::Transitioning => "TRANSITION",
            Phase::StableB => "DECK B",
        }
    }
}

/// Cycle boundaries, as fractions of the period
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseThresholds {
    pub stable_a_start: f64,
    /// End of the window in which stable-A targets are (re)assigned
    pub stable_a_end: f64,
    pub transition_start: f64,
    pub transition_end: f64,
}

impl Default for PhaseThresholds {
    fn default() -> Self {
        Self {
            stable_a_start: 0.2,
            stable_a_end: 0.55,
            transition_start: 0.7,
            transition_end: 0.88,
        }
    }
}

impl PhaseThresholds {
    /// Check ordering: 0 < a_start < a_end <= t_start < t_end < 1
    pub fn validate(&self) -> Result<(), PhaseConfigError> {
        let ordered = 0.0 < self.stable_a_start
            && self.stable_a_start < self.stable_a_end
            && self.stable_a_end <= self.transition_start
            && self.transition_start < self.transition_end
            && self.transition_end < 1.0;
        if ordered {
            Ok(())
        } else {
            Err(PhaseConfigError::Thresholds([
                self.stable_a_start,
                self.stable_a_end,
                self.transition_start,
                self.transition_end,
            ]))
        }
    }

    /// Whether stable-A targets are assigned at this position
    pub fn in_stable_a_window(&self, cycle: f64) -> bool {
        cycle >= self.stable_a_start && cycle < self.stable_a_end
    }
}

/// Normalized position within the cycle, in [0, 1)
pub fn cycle_position(elapsed_ms: u64, period_ms: u64) -> f64 {
    if period_ms == 0 {
        return 0.0;
    }
    (elapsed_ms % period_ms) as f64 / period_ms as f64
}

/// Phase at an elapsed time
pub fn phase_at(elapsed_ms: u64, period_ms: u64, thresholds: &PhaseThresholds) -> Phase {
    Phase::classify(cycle_position(elapsed_ms, period_ms), thresholds)
}

/// Slow "human" micro-adjustment superimposed on targets
///
/// A pure sinusoid of wall-clock time. `channel` shifts the phase so
/// different knobs do not move in lockstep.
pub fn human_offset(elapsed_ms: u64, period_ms: u64, amplitude: f32, channel: u32) -> f32 {
    if period_ms == 0 {
        return 0.0;
    }
    let t = cycle_position(elapsed_ms, period_ms);
    let shift = channel as f64 * 1.3;
    (amplitude as f64 * (t * std::f64::consts::TAU + shift).sin()) as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_position_wraps() {
        assert_eq!(cycle_position(0, 18_000), 0.0);
        assert_eq!(cycle_position(9_000, 18_000), 0.5);
        assert_eq!(cycle_position(18_000, 18_000), 0.0);
        assert_eq!(cycle_position(27_000, 18_000), 0.5);
        assert_eq!(cycle_position(5, 0), 0.0);
    }

    #[test]
    fn test_classify_boundaries() {
        let th = PhaseThresholds::default();
        assert_eq!(Phase::classify(0.0, &th), Phase::StableB);
        assert_eq!(Phase::classify(0.19, &th), Phase::StableB);
        assert_eq!(Phase::classify(0.2, &th), Phase::StableA);
        assert_eq!(Phase::classify(0.6, &th), Phase::StableA);
        assert_eq!(Phase::classify(0.7, &th), Phase::Transitioning);
        assert_eq!(Phase::classify(0.87, &th), Phase::Transitioning);
        assert_eq!(Phase::classify(0.88, &th), Phase::StableB);
        assert_eq!(Phase::classify(0.99, &th), Phase::StableB);
    }

    #[test]
    fn test_phase_is_periodic() {
        let th = PhaseThresholds::default();
        let period = 18_000;
        for t in (0..period * 2).step_by(97) {
            assert_eq!(
                phase_at(t, period, &th),
                phase_at(t + period, period, &th),
                "t = {}",
                t
            );
        }
    }

    #[test]
    fn test_stable_a_window() {
        let th = PhaseThresholds::default();
        assert!(th.in_stable_a_window(0.3));
        assert!(!th.in_stable_a_window(0.6));
        assert!(!th.in_stable_a_window(0.1));
    }

    #[test]
    fn test_validate_thresholds() {
        assert!(PhaseThresholds::default().validate().is_ok());
        let bad = PhaseThresholds {
            transition_start: 0.5,
            ..Default::default()
        };
        assert!(matches!(bad.validate(), Err(PhaseConfigError::Thresholds(_))));
        let bad = PhaseThresholds {
            transition_end: 1.0,
            ..Default::default()
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_human_offset_bounded_and_periodic() {
        for t in (0..60_000).step_by(113) {
            for channel in 0..6 {
                let v = human_offset(t, 13_000, 4.0, channel);
                assert!(v.abs() <= 4.0 + 1e-4);
                let w = human_offset(t + 13_000, 13_000, 4.0, channel);
                assert!((v - w).abs() < 1e-4);
            }
        }
        assert_eq!(human_offset(100, 0, 4.0, 0), 0.0);
    }
}

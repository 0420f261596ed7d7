//! Knob and fader model - a displayed value easing toward a target

/// Lower bound of every control
pub const CONTROL_MIN: f32 = 0.0;
/// Upper bound of every control
pub const CONTROL_MAX: f32 = 100.0;
/// Distance at which a control counts as settled and stops moving
pub const SNAP_EPSILON: f32 = 0.1;

/// One knob or fader: the value shown and the value it is heading to
///
/// Both fields stay within [0, 100]. Each [`step`](Self::step) moves the
/// value a fixed fraction of the remaining distance, an exponential
/// approach that cannot overshoot while `speed` is in (0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlValue {
    value: f32,
    target: f32,
}

impl Default for ControlValue {
    fn default() -> Self {
        Self::new(50.0)
    }
}

impl ControlValue {
    /// Create a settled control at `value`
    pub fn new(value: f32) -> Self {
        let value = value.clamp(CONTROL_MIN, CONTROL_MAX);
        Self {
            value,
            target: value,
        }
    }

    /// Current displayed value
    pub fn value(&self) -> f32 {
        self.value
    }

    /// Value the control is easing toward
    pub fn target(&self) -> f32 {
        self.target
    }

    /// Assign a new target, clamped into range
    pub fn set_target(&mut self, target: f32) {
        self.target = target.clamp(CONTROL_MIN, CONTROL_MAX);
    }

    /// Jump straight to `value` and stay there
    pub fn snap_to(&mut self, value: f32) {
        *self = Self::new(value);
    }

    /// Whether the value is within [`SNAP_EPSILON`] of the target
    pub fn is_settled(&self) -> bool {
        (self.target - self.value).abs() < SNAP_EPSILON
    }

    /// Advance one easing tick
    ///
    /// Returns true if the value moved.
    pub fn step(&mut self, speed: f32) -> bool {
        let diff = self.target - self.value;
        if diff.abs() < SNAP_EPSILON {
            return false;
        }
        let speed = speed.clamp(f32::MIN_POSITIVE, 1.0);
        self.value = (self.value + diff * speed).clamp(CONTROL_MIN, CONTROL_MAX);
        true
    }

    /// Value normalized to 0.0-1.0 for meters
    pub fn normalized(&self) -> f32 {
        self.value / CONTROL_MAX
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_targets_clamped() {
        let mut c = ControlValue::new(150.0);
        assert_eq!(c.value(), 100.0);
        c.set_target(-20.0);
        assert_eq!(c.target(), 0.0);
    }

    #[test]
    fn test_fixed_point_is_idempotent() {
        let mut c = ControlValue::new(42.0);
        for _ in 0..100 {
            assert!(!c.step(0.02));
        }
        assert_eq!(c.value(), 42.0);
    }

    #[test]
    fn test_monotonic_approach_then_hold() {
        let mut c = ControlValue::new(10.0);
        c.set_target(90.0);
        let mut prev = c.value();
        let mut ticks = 0;
        while c.step(0.02) {
            assert!(c.value() > prev, "value must strictly increase");
            assert!(c.value() <= 90.0, "no overshoot");
            prev = c.value();
            ticks += 1;
            assert!(ticks < 10_000);
        }
        assert!(c.is_settled());
        let held = c.value();
        c.step(0.02);
        assert_eq!(c.value(), held);
    }

    #[test]
    fn test_decreasing_target() {
        let mut c = ControlValue::new(80.0);
        c.set_target(20.0);
        let mut prev = c.value();
        while c.step(0.5) {
            assert!(c.value() < prev);
            assert!(c.value() >= 20.0);
            prev = c.value();
        }
        assert!((c.value() - 20.0).abs() < SNAP_EPSILON);
    }

    #[test]
    fn test_stays_in_range_for_any_speed() {
        let speeds = [0.0, 0.008, 0.02, 0.5, 1.0, 3.0, -1.0];
        let targets = [0.0, 100.0, 37.5, 99.9, 0.05];
        for &speed in &speeds {
            for &target in &targets {
                let mut c = ControlValue::new(50.0);
                c.set_target(target);
                for _ in 0..500 {
                    c.step(speed);
                    assert!((CONTROL_MIN..=CONTROL_MAX).contains(&c.value()));
                }
            }
        }
    }

    #[test]
    fn test_full_speed_lands_on_target() {
        let mut c = ControlValue::new(0.0);
        c.set_target(64.0);
        assert!(c.step(1.0));
        assert_eq!(c.value(), 64.0);
        assert!(c.is_settled());
    }
}

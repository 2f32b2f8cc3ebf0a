use glam::DVec3;

/// Angle-dependent gain of a loudspeaker.
///
/// Keys are `(angle_deg, gain)` pairs sorted by angle; evaluation is
/// piecewise-linear and clamps to the first/last key outside their range.
/// Gains are clamped to [0, 1].
#[derive(Debug, Clone, PartialEq)]
pub struct DirectivityCurve {
    keys: Vec<(f64, f64)>,
}

impl DirectivityCurve {
    pub fn new(keys: impl Into<Vec<(f64, f64)>>) -> Self {
        let mut keys: Vec<(f64, f64)> = keys
            .into()
            .into_iter()
            .map(|(angle, gain)| (angle, gain.clamp(0.0, 1.0)))
            .collect();
        keys.sort_by(|a, b| a.0.total_cmp(&b.0));
        Self { keys }
    }

    /// Straight line from `on_axis` at 0° to `rear` at 180°.
    pub fn linear(on_axis: f64, rear: f64) -> Self {
        Self::new([(0.0, on_axis), (180.0, rear)])
    }

    /// Same gain in every direction.
    pub fn omni() -> Self {
        Self::new([(0.0, 1.0)])
    }

    pub fn evaluate(&self, angle_deg: f64) -> f64 {
        let (Some(&first), Some(&last)) = (self.keys.first(), self.keys.last()) else {
            return 1.0;
        };
        if angle_deg <= first.0 {
            return first.1;
        }
        if angle_deg >= last.0 {
            return last.1;
        }
        for pair in self.keys.windows(2) {
            let ((a0, g0), (a1, g1)) = (pair[0], pair[1]);
            if angle_deg <= a1 {
                if a1 - a0 <= f64::EPSILON {
                    return g1;
                }
                let t = (angle_deg - a0) / (a1 - a0);
                return g0 + (g1 - g0) * t;
            }
        }
        last.1
    }
}

impl Default for DirectivityCurve {
    fn default() -> Self {
        Self::linear(1.0, 0.1)
    }
}

/// A loudspeaker in the room.
#[derive(Debug, Clone)]
pub struct Speaker {
    /// Channel identifier, unique within a layout (L, R, C, LS, ...).
    pub channel: String,
    pub position: DVec3,
    /// Facing direction; does not need to be normalised.
    pub forward: DVec3,
    pub directivity: DirectivityCurve,
    /// Linear output level multiplier.
    pub base_level: f64,
    /// Optional reference test signal s(t).
    pub test_signal: Option<Vec<f64>>,
}

impl Speaker {
    /// Speaker with unit level facing +Z and the default directivity.
    pub fn new(channel: impl Into<String>, position: DVec3) -> Self {
        Self {
            channel: channel.into(),
            position,
            forward: DVec3::Z,
            directivity: DirectivityCurve::default(),
            base_level: 1.0,
            test_signal: None,
        }
    }

    pub fn facing(mut self, forward: DVec3) -> Self {
        self.forward = forward;
        self
    }

    /// Point the speaker at `target`. A target at the speaker position keeps
    /// the current direction.
    pub fn looking_at(mut self, target: DVec3) -> Self {
        if let Some(dir) = (target - self.position).try_normalize() {
            self.forward = dir;
        }
        self
    }

    pub fn with_directivity(mut self, directivity: DirectivityCurve) -> Self {
        self.directivity = directivity;
        self
    }

    pub fn with_base_level(mut self, base_level: f64) -> Self {
        self.base_level = base_level;
        self
    }

    pub fn with_test_signal(mut self, signal: Vec<f64>) -> Self {
        self.test_signal = Some(signal);
        self
    }

    /// Angle in degrees between the forward axis and the direction to
    /// `target`. Degenerate directions count as on-axis.
    pub fn off_axis_angle(&self, target: DVec3) -> f64 {
        let to_target = target - self.position;
        match (self.forward.try_normalize(), to_target.try_normalize()) {
            (Some(f), Some(t)) => f.cross(t).length().atan2(f.dot(t)).to_degrees(),
            _ => 0.0,
        }
    }

    /// Directivity gain towards `target`.
    pub fn directivity_gain(&self, target: DVec3) -> f64 {
        self.directivity.evaluate(self.off_axis_angle(target))
    }
}

/// The listening position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Listener {
    pub position: DVec3,
}

impl Listener {
    pub fn new(position: DVec3) -> Self {
        Self { position }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_curve_is_linear_one_to_point_one() {
        let curve = DirectivityCurve::default();
        assert_eq!(curve.evaluate(0.0), 1.0);
        assert!((curve.evaluate(90.0) - 0.55).abs() < 1e-12);
        assert!((curve.evaluate(180.0) - 0.1).abs() < 1e-12);
        assert!((curve.evaluate(270.0) - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_curve_keys_are_sorted_and_clamped() {
        let curve = DirectivityCurve::new([(180.0, -1.0), (0.0, 2.0), (90.0, 0.5)]);
        assert_eq!(curve.evaluate(0.0), 1.0);
        assert!((curve.evaluate(45.0) - 0.75).abs() < 1e-12);
        assert_eq!(curve.evaluate(180.0), 0.0);
    }

    #[test]
    fn test_gain_follows_angle_to_listener() {
        let sp = Speaker::new("C", DVec3::ZERO).facing(DVec3::Z);
        assert_eq!(sp.directivity_gain(DVec3::new(0.0, 0.0, 3.0)), 1.0);
        assert!((sp.off_axis_angle(DVec3::new(3.0, 0.0, 0.0)) - 90.0).abs() < 1e-9);
        assert!((sp.directivity_gain(DVec3::new(0.0, 0.0, -3.0)) - 0.1).abs() < 1e-9);
    }

    #[test]
    fn test_coincident_listener_counts_as_on_axis() {
        let sp = Speaker::new("C", DVec3::ONE);
        assert_eq!(sp.off_axis_angle(DVec3::ONE), 0.0);
        assert_eq!(sp.directivity_gain(DVec3::ONE), 1.0);
    }

    #[test]
    fn test_looking_at_points_forward_to_target() {
        let sp = Speaker::new("L", DVec3::new(-2.0, 1.0, 3.0)).looking_at(DVec3::new(0.0, 1.0, 0.0));
        assert!(sp.off_axis_angle(DVec3::new(0.0, 1.0, 0.0)) < 1e-6);
    }
}

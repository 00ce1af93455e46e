//! Time-based easing for scripted scrolling.

/// Ease-in-out cubic curve.
///
/// For normalized progress `t` in `[0, 1]`: `4t³` below the midpoint,
/// `1 - (-2t + 2)³ / 2` above it. Both pieces meet at exactly `0.5`.
pub fn ease_in_out_cubic(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

/// One scripted scroll from a start offset across a signed distance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollAnimation {
    start: f64,
    distance: f64,
    duration_ms: u64,
}

impl ScrollAnimation {
    pub fn new(start: f64, distance: f64, duration_ms: u64) -> Self {
        Self {
            start,
            distance,
            duration_ms,
        }
    }

    /// Scroll position at `elapsed_ms`, clamped to the end position once the
    /// duration is exhausted.
    pub fn position_at(&self, elapsed_ms: u64) -> f64 {
        let progress = if self.duration_ms == 0 {
            1.0
        } else {
            (elapsed_ms as f64 / self.duration_ms as f64).min(1.0)
        };
        self.start + self.distance * ease_in_out_cubic(progress)
    }

    /// Whether the animation has run its full duration.
    pub fn is_complete(&self, elapsed_ms: u64) -> bool {
        elapsed_ms >= self.duration_ms
    }
}

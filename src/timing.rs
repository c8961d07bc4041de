use std::time::Instant;

/// Monotonic frame timer.
///
/// Times are seconds since the timer was created, mirroring a windowing
/// clock that starts at zero. The first tick measures from that origin.
#[derive(Debug, Clone)]
pub struct FrameTimer {
    origin: Instant,
    last_frame_time: f64,
}

impl Default for FrameTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameTimer {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            last_frame_time: 0.0,
        }
    }

    /// Samples the clock and advances the timer.
    pub fn tick(&mut self) -> f32 {
        let now = self.origin.elapsed().as_secs_f64();
        self.advance_to(now)
    }

    /// Advances the timer to an explicit clock reading and returns the delta.
    ///
    /// A reading earlier than the previous one produces a zero delta and does
    /// not move the timer backwards.
    pub fn advance_to(&mut self, now: f64) -> f32 {
        let current = now.max(self.last_frame_time);
        let delta = current - self.last_frame_time;
        self.last_frame_time = current;
        delta as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deltas_sum_to_elapsed_time() {
        let mut timer = FrameTimer::new();
        let readings = [0.25, 0.266, 0.3, 0.3, 0.9, 1.0001, 2.5];
        assert!((timer.advance_to(readings[0]) - 0.25).abs() < 1e-6);
        let sum: f32 = readings[1..].iter().map(|&now| timer.advance_to(now)).sum();
        assert!((sum - 2.25).abs() < 1e-5);
    }

    #[test]
    fn delta_is_never_negative() {
        let mut timer = FrameTimer::new();
        timer.advance_to(1.0);
        assert_eq!(timer.advance_to(0.5), 0.0);
        assert!((timer.advance_to(1.5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn real_clock_is_monotonic() {
        let mut timer = FrameTimer::new();
        let a = timer.tick();
        let b = timer.tick();
        assert!(a >= 0.0 && b >= 0.0);
    }
}

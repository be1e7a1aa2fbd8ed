//! Frame timing

use std::time::Instant;

/// Measures the time between frames
///
/// Frame drivers feed [`FrameClock::delta_seconds`] into timed camera movement.
/// Scripted runs use [`FrameClock::advance`] to step a fixed amount instead.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last_frame: Instant,
    delta_seconds: f32,
    total_seconds: f32,
    frame_count: u64,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock {
    /// Start a clock at the current instant
    pub fn new() -> Self {
        Self {
            last_frame: Instant::now(),
            delta_seconds: 0.0,
            total_seconds: 0.0,
            frame_count: 0,
        }
    }

    /// Mark a frame boundary using wall-clock time
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;
        self.advance(elapsed)
    }

    /// Mark a frame boundary `delta_seconds` after the previous one
    pub fn advance(&mut self, delta_seconds: f32) -> f32 {
        self.delta_seconds = delta_seconds.max(0.0);
        self.total_seconds += self.delta_seconds;
        self.frame_count += 1;
        self.delta_seconds
    }

    /// Seconds covered by the last frame
    pub fn delta_seconds(&self) -> f32 {
        self.delta_seconds
    }

    /// Seconds accumulated over all frames
    pub fn total_seconds(&self) -> f32 {
        self.total_seconds
    }

    /// Frames marked so far
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Average frames per second
    pub fn average_fps(&self) -> f32 {
        if self.total_seconds > 0.0 {
            self.frame_count as f32 / self.total_seconds
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn fixed_steps_accumulate() {
        let mut clock = FrameClock::new();
        clock.advance(0.5);
        clock.advance(0.25);

        assert_eq!(clock.frame_count(), 2);
        assert_relative_eq!(clock.delta_seconds(), 0.25);
        assert_relative_eq!(clock.total_seconds(), 0.75);
        assert_relative_eq!(clock.average_fps(), 2.0 / 0.75);
    }

    #[test]
    fn negative_step_is_clamped() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.advance(-1.0), 0.0);
    }
}

//! Countdown ticked by the host with a frame delta

/// Result of advancing the timer by one step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerTick {
    /// Not running (stopped or already expired)
    Idle,
    Running,
    /// Reached zero on this tick
    Expired,
}

#[derive(Debug, Clone, PartialEq)]
pub struct QuestionTimer {
    duration: f32,
    remaining: f32,
    running: bool,
}

impl QuestionTimer {
    /// Stopped timer; call `reset` to start it
    pub fn new(duration: f32) -> Self {
        let duration = if duration.is_finite() { duration.max(0.0) } else { 0.0 };
        Self {
            duration,
            remaining: duration,
            running: false,
        }
    }

    /// Refill and start
    pub fn reset(&mut self) {
        self.remaining = self.duration;
        self.running = true;
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    pub fn remaining(&self) -> f32 {
        self.remaining
    }

    pub fn tick(&mut self, dt: f32) -> TimerTick {
        if !self.running {
            return TimerTick::Idle;
        }
        if dt.is_finite() && dt > 0.0 {
            self.remaining = (self.remaining - dt).max(0.0);
        }
        if self.remaining <= 0.0 {
            self.running = false;
            TimerTick::Expired
        } else {
            TimerTick::Running
        }
    }

    /// 1.0 when full, 0.0 when expired (progress bar fill)
    pub fn fraction_remaining(&self) -> f32 {
        if self.duration <= 0.0 {
            return 0.0;
        }
        (self.remaining / self.duration).clamp(0.0, 1.0)
    }

    /// Whole seconds left, rounded up for the countdown label
    pub fn seconds_display(&self) -> u32 {
        self.remaining.ceil() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_timer_is_idle_until_reset() {
        let mut timer = QuestionTimer::new(15.0);
        assert_eq!(timer.tick(1.0), TimerTick::Idle);
        assert_eq!(timer.remaining(), 15.0);

        timer.reset();
        assert_eq!(timer.tick(1.0), TimerTick::Running);
        assert_eq!(timer.remaining(), 14.0);
    }

    #[test]
    fn test_expires_once() {
        let mut timer = QuestionTimer::new(1.0);
        timer.reset();
        assert_eq!(timer.tick(0.6), TimerTick::Running);
        assert_eq!(timer.tick(0.6), TimerTick::Expired);
        assert_eq!(timer.remaining(), 0.0);
        assert_eq!(timer.tick(0.6), TimerTick::Idle);
    }

    #[test]
    fn test_stop_freezes_remaining() {
        let mut timer = QuestionTimer::new(10.0);
        timer.reset();
        timer.tick(2.5);
        timer.stop();
        assert_eq!(timer.tick(5.0), TimerTick::Idle);
        assert_eq!(timer.remaining(), 7.5);
    }

    #[test]
    fn test_display_helpers() {
        let mut timer = QuestionTimer::new(15.0);
        timer.reset();
        timer.tick(0.1);
        assert_eq!(timer.seconds_display(), 15);
        timer.tick(7.4);
        assert_eq!(timer.seconds_display(), 8);
        assert!((timer.fraction_remaining() - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_bad_input_is_ignored() {
        let mut timer = QuestionTimer::new(f32::NAN);
        assert_eq!(timer.duration(), 0.0);
        assert_eq!(timer.fraction_remaining(), 0.0);
        timer.reset();
        assert_eq!(timer.tick(0.0), TimerTick::Expired);

        let mut timer = QuestionTimer::new(3.0);
        timer.reset();
        assert_eq!(timer.tick(-1.0), TimerTick::Running);
        assert_eq!(timer.tick(f32::INFINITY), TimerTick::Running);
        assert_eq!(timer.remaining(), 3.0);
    }
}

//! Millisecond countdown that reports once when its duration is exceeded.

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Timer {
    pub duration: f32,
    pub elapsed: f32,
    done: bool,
}

impl Timer {
    pub fn new(duration: f32) -> Self {
        Timer {
            duration,
            elapsed: 0.0,
            done: false,
        }
    }

    /// Returns `true` on the tick where elapsed time first goes strictly past
    /// the duration. Later ticks are ignored until [`Timer::reset`].
    pub fn tick(&mut self, dt: f32) -> bool {
        if self.done {
            return false;
        }
        self.elapsed += dt;
        if self.elapsed > self.duration {
            self.done = true;
            return true;
        }
        false
    }

    pub fn reset(&mut self) {
        self.elapsed = 0.0;
        self.done = false;
    }

    pub fn is_done(&self) -> bool {
        self.done
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_strictly_after_duration() {
        let mut t = Timer::new(100.0);
        assert!(!t.tick(50.0));
        assert!(!t.tick(50.0));
        assert!(t.tick(1.0));
        assert!(t.is_done());
    }

    #[test]
    fn test_fires_once_until_reset() {
        let mut t = Timer::new(10.0);
        assert!(t.tick(20.0));
        assert!(!t.tick(20.0));
        t.reset();
        assert!(!t.is_done());
        assert!(t.tick(11.0));
    }
}

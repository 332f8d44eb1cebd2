//! Per-vehicle reference speed

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Reference speed handed to the planner, ramped up by a fixed step each
/// cycle until it reaches a ceiling.
///
/// Each vehicle owns its own reference speed and threads it through its
/// planning cycles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RefSpeed {
    speed_ms: f64,
    step_ms: f64,
    ceiling_ms: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl RefSpeed {
    /// Start from rest.
    pub fn new(step_ms: f64, ceiling_ms: f64) -> Self {
        Self {
            speed_ms: 0.0,
            step_ms,
            ceiling_ms,
        }
    }

    /// Increase the speed by one step, without exceeding the ceiling, and
    /// return the new speed.
    pub fn step(&mut self) -> f64 {
        self.speed_ms = (self.speed_ms + self.step_ms).min(self.ceiling_ms);
        self.speed_ms
    }

    pub fn speed_ms(&self) -> f64 {
        self.speed_ms
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_ref_speed() {
        let mut ref_speed = RefSpeed::new(0.25, 1.0);
        assert_eq!(ref_speed.speed_ms(), 0.0);

        assert_eq!(ref_speed.step(), 0.25);
        assert_eq!(ref_speed.step(), 0.5);
        assert_eq!(ref_speed.step(), 0.75);
        assert_eq!(ref_speed.step(), 1.0);
        assert_eq!(ref_speed.step(), 1.0);

        // Two vehicles don't share a speed
        let other = RefSpeed::new(0.25, 1.0);
        assert_eq!(other.speed_ms(), 0.0);
    }
}

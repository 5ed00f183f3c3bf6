//! Countdown and closing distance, advanced one tick per second while the
//! player is deciding.

/// Countdown plus the simulated distance between asteroid and Earth
#[derive(Debug, Clone, PartialEq)]
pub struct GameClock {
    budget: u32,
    countdown: u32,
    initial_distance_km: f64,
    distance_km: f64,
    step_km: f64,
    floor_km: f64,
}

impl GameClock {
    /// The distance starts at `miss_distance_km` (raised to the floor if
    /// closer) and closes by an equal share of it on every tick.
    pub fn new(budget: u32, miss_distance_km: f64, floor_km: f64) -> Self {
        let initial_distance_km = miss_distance_km.max(floor_km);
        Self {
            budget,
            countdown: budget,
            initial_distance_km,
            distance_km: initial_distance_km,
            step_km: initial_distance_km / f64::from(budget.max(1)),
            floor_km,
        }
    }

    /// Advance one second. Returns true once the countdown is exhausted.
    pub fn tick(&mut self) -> bool {
        self.countdown = self.countdown.saturating_sub(1);
        self.distance_km = (self.distance_km - self.step_km).max(self.floor_km);
        self.countdown == 0
    }

    pub fn reset(&mut self) {
        self.countdown = self.budget;
        self.distance_km = self.initial_distance_km;
    }

    pub fn countdown(&self) -> u32 {
        self.countdown
    }

    /// Seconds spent so far
    pub fn elapsed(&self) -> u32 {
        self.budget - self.countdown
    }

    pub fn distance_km(&self) -> f64 {
        self.distance_km
    }

    /// 0.0 at the start, approaching 1.0 as the asteroid closes in
    pub fn approach_progress(&self) -> f64 {
        (1.0 - self.distance_km / self.initial_distance_km).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_decrements() {
        let mut clock = GameClock::new(60, 1_000_000.0, 50_000.0);
        assert!(!clock.tick());
        assert_eq!(clock.countdown(), 59);
        assert_eq!(clock.elapsed(), 1);
        assert!((clock.distance_km() - 983_333.333).abs() < 0.01);
    }

    #[test]
    fn test_countdown_floors_at_zero() {
        let mut clock = GameClock::new(60, 1_000_000.0, 50_000.0);
        for _ in 0..59 {
            assert!(!clock.tick());
        }
        assert!(clock.tick());
        for _ in 0..25 {
            assert!(clock.tick());
            assert_eq!(clock.countdown(), 0);
        }
    }

    #[test]
    fn test_distance_monotonic_and_floored() {
        let mut clock = GameClock::new(60, 1_000_000.0, 50_000.0);
        let mut last = clock.distance_km();
        for _ in 0..120 {
            clock.tick();
            assert!(clock.distance_km() <= last);
            assert!(clock.distance_km() >= 50_000.0);
            last = clock.distance_km();
        }
        assert_eq!(clock.distance_km(), 50_000.0);
    }

    #[test]
    fn test_close_approach_starts_at_floor() {
        let clock = GameClock::new(60, 12_000.0, 50_000.0);
        assert_eq!(clock.distance_km(), 50_000.0);
        assert_eq!(clock.approach_progress(), 0.0);
    }

    #[test]
    fn test_reset_restores_budget_and_distance() {
        let mut clock = GameClock::new(60, 2_000_000.0, 50_000.0);
        for _ in 0..30 {
            clock.tick();
        }
        assert!(clock.approach_progress() > 0.4);
        clock.reset();
        assert_eq!(clock.countdown(), 60);
        assert_eq!(clock.distance_km(), 2_000_000.0);
    }
}

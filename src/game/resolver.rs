//! Outcome resolution: base rate plus a bonus for deciding early, rolled
//! against a uniform draw in [0, 100).

use crate::catalog::Strategy;
use crate::domain::{Outcome, Resolution};
use rand::Rng;

pub const MAX_TIME_BONUS: f64 = 20.0;
pub const BONUS_PER_SECOND: f64 = 0.5;

/// Percentage points awarded for the seconds left on the clock
pub fn time_bonus(countdown: u32) -> f64 {
    (f64::from(countdown) * BONUS_PER_SECOND).min(MAX_TIME_BONUS)
}

/// Not clamped to 100: a chance above 100 succeeds for every draw.
pub fn final_chance(base_rate: u8, countdown: u32) -> f64 {
    f64::from(base_rate) + time_bonus(countdown)
}

pub fn resolve_with_draw(base_rate: u8, countdown: u32, draw: f64) -> Resolution {
    let time_bonus = time_bonus(countdown);
    let final_chance = final_chance(base_rate, countdown);
    let outcome = if draw <= final_chance {
        Outcome::Success
    } else {
        Outcome::Failure
    };

    Resolution::Rolled {
        time_bonus,
        final_chance,
        draw,
        outcome,
    }
}

pub fn resolve<R: Rng + ?Sized>(strategy: &Strategy, countdown: u32, rng: &mut R) -> Resolution {
    let draw = rng.gen_range(0.0..100.0);
    resolve_with_draw(strategy.success_rate, countdown, draw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;
    use crate::domain::StrategyKey;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn success_rate(key: StrategyKey, countdown: u32, trials: u32, seed: u64) -> f64 {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let strategy = catalog::get(key);
        let wins = (0..trials)
            .filter(|_| resolve(strategy, countdown, &mut rng).outcome() == Outcome::Success)
            .count();
        wins as f64 / f64::from(trials)
    }

    #[test]
    fn test_time_bonus_caps_at_twenty() {
        assert_eq!(time_bonus(0), 0.0);
        assert_eq!(time_bonus(10), 5.0);
        assert_eq!(time_bonus(40), 20.0);
        assert_eq!(time_bonus(60), 20.0);
    }

    #[test]
    fn test_final_chance_is_unclamped() {
        assert_eq!(final_chance(85, 60), 105.0);
        assert_eq!(final_chance(70, 50), 90.0);
        assert_eq!(final_chance(0, 60), 20.0);
    }

    #[test]
    fn test_kinetic_at_fifty_always_succeeds() {
        let base = catalog::get(StrategyKey::Kinetic).success_rate;
        for draw in [0.0, 25.0, 50.0, 85.0, 99.0, 99.999_999] {
            let r = resolve_with_draw(base, 50, draw);
            assert_eq!(r.outcome(), Outcome::Success, "draw {}", draw);
        }
    }

    #[test]
    fn test_draw_equal_to_chance_succeeds() {
        assert_eq!(resolve_with_draw(40, 10, 45.0).outcome(), Outcome::Success);
        assert_eq!(resolve_with_draw(40, 10, 45.000_1).outcome(), Outcome::Failure);
    }

    #[test]
    fn test_evacuate_only_wins_inside_bonus() {
        assert_eq!(resolve_with_draw(0, 60, 19.9).outcome(), Outcome::Success);
        assert_eq!(resolve_with_draw(0, 60, 20.1).outcome(), Outcome::Failure);
        assert_eq!(resolve_with_draw(0, 0, 0.5).outcome(), Outcome::Failure);
    }

    #[test]
    fn test_resolution_reports_inputs() {
        match resolve_with_draw(70, 30, 12.5) {
            Resolution::Rolled {
                time_bonus,
                final_chance,
                draw,
                outcome,
            } => {
                assert_eq!(time_bonus, 15.0);
                assert_eq!(final_chance, 85.0);
                assert_eq!(draw, 12.5);
                assert_eq!(outcome, Outcome::Success);
            }
            Resolution::Forced => panic!("expected a rolled resolution"),
        }
    }

    #[test]
    fn test_empirical_frequency_matches_chance() {
        let trials = 20_000;
        // solar at 10s left: 40 + 5
        let solar = success_rate(StrategyKey::Solar, 10, trials, 42);
        assert!((solar - 0.45).abs() < 0.02, "solar {}", solar);

        // nuclear at 20s left: 70 + 10
        let nuclear = success_rate(StrategyKey::Nuclear, 20, trials, 7);
        assert!((nuclear - 0.80).abs() < 0.02, "nuclear {}", nuclear);

        // evacuate with a full bonus: 0 + 20
        let evacuate = success_rate(StrategyKey::Evacuate, 60, trials, 99);
        assert!((evacuate - 0.20).abs() < 0.02, "evacuate {}", evacuate);

        let kinetic = success_rate(StrategyKey::Kinetic, 60, trials, 3);
        assert_eq!(kinetic, 1.0);
    }

    #[test]
    fn test_same_seed_same_outcomes() {
        let strategy = catalog::get(StrategyKey::Solar);
        let mut a = ChaCha8Rng::seed_from_u64(11);
        let mut b = ChaCha8Rng::seed_from_u64(11);
        for _ in 0..50 {
            assert_eq!(resolve(strategy, 5, &mut a), resolve(strategy, 5, &mut b));
        }
    }
}

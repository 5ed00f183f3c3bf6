//! Decision game: countdown clock, outcome resolver, phase state machine
//! and the event loop that drives them.

pub mod clock;
pub mod resolver;
pub mod runtime;
pub mod session;

use std::time::Duration;

pub use runtime::{spawn_game, GameHandle, PlayerAction};
pub use session::GameSession;

/// Compiled-in timing and pacing of one session
#[derive(Debug, Clone)]
pub struct GameRules {
    /// Countdown budget in seconds
    pub budget_secs: u32,
    pub tick: Duration,
    pub briefing_delay: Duration,
    pub tutorial_duration: Duration,
    pub execution_delay: Duration,
    /// Distance to impact never drops below this during the decision
    pub distance_floor_km: f64,
    /// Countdown at or below which the UI flags the clock as critical
    pub critical_threshold: u32,
}

impl Default for GameRules {
    fn default() -> Self {
        Self {
            budget_secs: 60,
            tick: Duration::from_secs(1),
            briefing_delay: Duration::from_secs(4),
            tutorial_duration: Duration::from_secs(5),
            execution_delay: Duration::from_secs(3),
            distance_floor_km: 50_000.0,
            critical_threshold: 10,
        }
    }
}

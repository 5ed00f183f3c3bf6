/// Domain models for the game
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Incoming hazardous object for one game session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreatRecord {
    pub id: String,
    pub name: String,
    pub diameter_m: f64,
    pub velocity_km_s: f64,
    pub miss_distance_km: f64,
    pub hazardous: bool,
    pub approach_date: Option<NaiveDate>,
    pub absolute_magnitude: f64,
}

impl ThreatRecord {
    /// Apophis, used whenever the feed cannot supply a candidate
    pub fn fallback() -> Self {
        Self {
            id: "2029075".to_string(),
            name: "Apophis".to_string(),
            diameter_m: 370.0,
            velocity_km_s: 12.0,
            miss_distance_km: 1_000_000.0,
            hazardous: true,
            approach_date: NaiveDate::from_ymd_opt(2029, 4, 13),
            absolute_magnitude: 19.7,
        }
    }
}

/// Catalog key of a defense strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKey {
    Nuclear,
    Kinetic,
    Solar,
    Evacuate,
}

impl StrategyKey {
    pub const ALL: [StrategyKey; 4] = [
        StrategyKey::Nuclear,
        StrategyKey::Kinetic,
        StrategyKey::Solar,
        StrategyKey::Evacuate,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            StrategyKey::Nuclear => "nuclear",
            StrategyKey::Kinetic => "kinetic",
            StrategyKey::Solar => "solar",
            StrategyKey::Evacuate => "evacuate",
        }
    }
}

impl fmt::Display for StrategyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StrategyKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StrategyKey::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown strategy '{}'", s))
    }
}

/// Node of the game state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Briefing,
    Decision,
    Executing,
    Success,
    Failure,
}

impl Phase {
    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::Success | Phase::Failure)
    }

    /// Forward edges of the phase graph. Reset is handled separately.
    pub fn can_advance_to(self, next: Phase) -> bool {
        matches!(
            (self, next),
            (Phase::Briefing, Phase::Decision)
                | (Phase::Decision, Phase::Executing)
                | (Phase::Executing, Phase::Success)
                | (Phase::Executing, Phase::Failure)
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Success,
    Failure,
}

impl Outcome {
    pub fn phase(self) -> Phase {
        match self {
            Outcome::Success => Phase::Success,
            Outcome::Failure => Phase::Failure,
        }
    }
}

/// How a terminal outcome was reached
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Resolution {
    /// The resolver rolled against the adjusted chance
    Rolled {
        time_bonus: f64,
        final_chance: f64,
        draw: f64,
        outcome: Outcome,
    },
    /// Countdown ran out before any selection
    Forced,
}

impl Resolution {
    pub fn outcome(&self) -> Outcome {
        match self {
            Resolution::Rolled { outcome, .. } => *outcome,
            Resolution::Forced => Outcome::Failure,
        }
    }
}

/// After-action narrative shown on the terminal screen
#[derive(Debug, Clone, Serialize)]
pub struct Debrief {
    pub headline: &'static str,
    pub message: &'static str,
    pub strategy_name: &'static str,
    pub population_saved: u64,
    pub status: &'static str,
    pub lesson: &'static str,
}

/// Immutable view of the session published to the presentation layer
#[derive(Debug, Clone, Serialize)]
pub struct GameSnapshot {
    pub generation: u64,
    pub phase: Phase,
    pub countdown: u32,
    pub countdown_critical: bool,
    pub distance_km: f64,
    pub approach_progress: f64,
    pub selected_strategy: Option<StrategyKey>,
    pub reaction_time: Option<u32>,
    pub show_tutorial: bool,
    pub impact_fx: bool,
    pub decision_started_at: Option<DateTime<Utc>>,
    pub threat: ThreatRecord,
    pub resolution: Option<Resolution>,
    pub debrief: Option<Debrief>,
}

/// Health check response
#[derive(Serialize)]
pub struct Health {
    pub status: &'static str,
    pub now: DateTime<Utc>,
}

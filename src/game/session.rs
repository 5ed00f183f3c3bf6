//! Phase state machine for one game session.
//!
//! The session is plain data: every input arrives as a [`GameEvent`] and
//! every delayed effect leaves as a [`Directive`] for the runtime to arm.
//! Each phase entry bumps `generation`; timers carry the generation they
//! were armed in and are dropped when it no longer matches.

use super::clock::GameClock;
use super::resolver;
use super::GameRules;
use crate::catalog::{self, NO_ACTION};
use crate::domain::{GameSnapshot, Phase, Resolution, StrategyKey, ThreatRecord};
use chrono::{DateTime, Utc};
use rand::Rng;
use std::time::Duration;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    Briefing,
    Tutorial,
    Tick,
    Execution,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerFired {
    pub generation: u64,
    pub kind: TimerKind,
}

#[derive(Debug, Clone)]
pub enum GameEvent {
    Select(StrategyKey),
    Reset,
    /// Cosmetic signal from the projectile animation
    ImpactAchieved,
    Timer(TimerFired),
    ThreatLoaded {
        generation: u64,
        threat: ThreatRecord,
    },
}

/// Side effect requested from the runtime
#[derive(Debug, Clone, PartialEq)]
pub enum Directive {
    Schedule { timer: TimerFired, after: Duration },
    RefreshThreat { generation: u64 },
}

#[derive(Debug, Clone)]
pub struct GameSession {
    rules: GameRules,
    threat: ThreatRecord,
    clock: GameClock,
    phase: Phase,
    generation: u64,
    selected: Option<StrategyKey>,
    reaction_time: Option<u32>,
    resolution: Option<Resolution>,
    decision_started_at: Option<DateTime<Utc>>,
    show_tutorial: bool,
    impact_fx: bool,
}

impl GameSession {
    pub fn new(threat: ThreatRecord, rules: GameRules) -> Self {
        let clock = GameClock::new(
            rules.budget_secs,
            threat.miss_distance_km,
            rules.distance_floor_km,
        );
        Self {
            rules,
            threat,
            clock,
            phase: Phase::Briefing,
            generation: 0,
            selected: None,
            reaction_time: None,
            resolution: None,
            decision_started_at: None,
            show_tutorial: false,
            impact_fx: false,
        }
    }

    /// Arm the briefing timer of a fresh session
    pub fn start(&self) -> Vec<Directive> {
        vec![self.schedule(TimerKind::Briefing, self.rules.briefing_delay)]
    }

    pub fn handle<R: Rng + ?Sized>(&mut self, event: GameEvent, rng: &mut R) -> Vec<Directive> {
        match event {
            GameEvent::Select(key) => self.select(key),
            GameEvent::Reset => self.reset(),
            GameEvent::ImpactAchieved => {
                if matches!(self.phase, Phase::Executing | Phase::Success | Phase::Failure) {
                    self.impact_fx = true;
                }
                Vec::new()
            }
            GameEvent::Timer(fired) => self.on_timer(fired, rng),
            GameEvent::ThreatLoaded { generation, threat } => {
                if generation == self.generation && self.phase == Phase::Briefing {
                    info!("Threat refreshed: {}", threat.name);
                    self.clock = GameClock::new(
                        self.rules.budget_secs,
                        threat.miss_distance_km,
                        self.rules.distance_floor_km,
                    );
                    self.threat = threat;
                } else {
                    debug!("Discarding threat loaded for generation {}", generation);
                }
                Vec::new()
            }
        }
    }

    fn select(&mut self, key: StrategyKey) -> Vec<Directive> {
        if self.phase != Phase::Decision || self.selected.is_some() {
            debug!("Ignoring selection of {} in {:?}", key, self.phase);
            return Vec::new();
        }

        let reaction = self.clock.elapsed();
        self.selected = Some(key);
        self.reaction_time = Some(reaction);
        info!("Strategy {} selected after {}s", key, reaction);

        self.advance(Phase::Executing);
        vec![self.schedule(TimerKind::Execution, self.rules.execution_delay)]
    }

    fn reset(&mut self) -> Vec<Directive> {
        if !self.phase.is_terminal() {
            debug!("Ignoring reset in {:?}", self.phase);
            return Vec::new();
        }

        self.generation += 1;
        self.phase = Phase::Briefing;
        self.clock.reset();
        self.selected = None;
        self.reaction_time = None;
        self.resolution = None;
        self.decision_started_at = None;
        self.show_tutorial = false;
        self.impact_fx = false;
        info!("Session reset (generation {})", self.generation);

        vec![
            self.schedule(TimerKind::Briefing, self.rules.briefing_delay),
            Directive::RefreshThreat {
                generation: self.generation,
            },
        ]
    }

    fn on_timer<R: Rng + ?Sized>(&mut self, fired: TimerFired, rng: &mut R) -> Vec<Directive> {
        if fired.generation != self.generation {
            debug!(
                "Stale {:?} timer (generation {}, now {})",
                fired.kind, fired.generation, self.generation
            );
            return Vec::new();
        }

        match (fired.kind, self.phase) {
            (TimerKind::Briefing, Phase::Briefing) => {
                self.advance(Phase::Decision);
                self.decision_started_at = Some(Utc::now());
                self.show_tutorial = true;
                vec![
                    self.schedule(TimerKind::Tick, self.rules.tick),
                    self.schedule(TimerKind::Tutorial, self.rules.tutorial_duration),
                ]
            }
            (TimerKind::Tutorial, Phase::Decision) => {
                self.show_tutorial = false;
                Vec::new()
            }
            (TimerKind::Tick, Phase::Decision) => self.on_tick(),
            (TimerKind::Execution, Phase::Executing) => {
                self.finish(rng);
                Vec::new()
            }
            (kind, phase) => {
                debug!("Ignoring {:?} timer in {:?}", kind, phase);
                Vec::new()
            }
        }
    }

    fn on_tick(&mut self) -> Vec<Directive> {
        let expired = self.clock.tick();
        if expired && self.selected.is_none() {
            self.force_timeout();
            return Vec::new();
        }
        vec![self.schedule(TimerKind::Tick, self.rules.tick)]
    }

    /// Countdown exhausted with no selection: no roll, straight to failure
    fn force_timeout(&mut self) {
        info!("Countdown expired without a decision");
        self.selected = Some(NO_ACTION);
        self.reaction_time = Some(self.rules.budget_secs);
        self.advance(Phase::Executing);
        self.resolution = Some(Resolution::Forced);
        self.advance(Phase::Failure);
    }

    fn finish<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let key = self.selected.unwrap_or(NO_ACTION);
        let resolution = resolver::resolve(catalog::get(key), self.clock.countdown(), rng);
        info!("Resolved {}: {:?}", key, resolution);
        self.resolution = Some(resolution);
        self.advance(resolution.outcome().phase());
    }

    fn advance(&mut self, next: Phase) {
        debug_assert!(
            self.phase.can_advance_to(next),
            "illegal transition {:?} -> {:?}",
            self.phase,
            next
        );
        debug!("Phase {:?} -> {:?}", self.phase, next);
        if next != Phase::Decision {
            self.show_tutorial = false;
        }
        self.phase = next;
        self.generation += 1;
    }

    fn schedule(&self, kind: TimerKind, after: Duration) -> Directive {
        Directive::Schedule {
            timer: TimerFired {
                generation: self.generation,
                kind,
            },
            after,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let debrief = match (self.phase.is_terminal(), self.resolution) {
            (true, Some(resolution)) => Some(catalog::debrief(
                resolution.outcome(),
                self.selected.unwrap_or(NO_ACTION),
            )),
            _ => None,
        };

        GameSnapshot {
            generation: self.generation,
            phase: self.phase,
            countdown: self.clock.countdown(),
            countdown_critical: self.clock.countdown() <= self.rules.critical_threshold,
            distance_km: self.clock.distance_km(),
            approach_progress: self.clock.approach_progress(),
            selected_strategy: self.selected,
            reaction_time: self.reaction_time,
            show_tutorial: self.show_tutorial,
            impact_fx: self.impact_fx,
            decision_started_at: self.decision_started_at,
            threat: self.threat.clone(),
            resolution: self.resolution,
            debrief,
        }
    }
}

//! Game event loop.
//!
//! One tokio task owns the [`GameSession`]. Player commands arrive on a
//! bounded channel, timer firings and threat refreshes on an internal one,
//! and every processed event republishes a snapshot on a `watch` channel.
//! Readers only ever see cloned snapshots.

use super::session::{Directive, GameEvent, GameSession};
use crate::domain::{GameSnapshot, StrategyKey};
use crate::errors::{ApiError, ApiResult};
use crate::services::ThreatService;
use rand_chacha::ChaCha8Rng;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info};

const COMMAND_QUEUE: usize = 32;

/// Inbound signals from the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerAction {
    Select(StrategyKey),
    Reset,
    ImpactAchieved,
}

impl From<PlayerAction> for GameEvent {
    fn from(action: PlayerAction) -> Self {
        match action {
            PlayerAction::Select(key) => GameEvent::Select(key),
            PlayerAction::Reset => GameEvent::Reset,
            PlayerAction::ImpactAchieved => GameEvent::ImpactAchieved,
        }
    }
}

struct PlayerCommand {
    action: PlayerAction,
    reply: oneshot::Sender<GameSnapshot>,
}

/// Cloneable handle to a running game
#[derive(Clone)]
pub struct GameHandle {
    commands: mpsc::Sender<PlayerCommand>,
    snapshots: watch::Receiver<GameSnapshot>,
}

impl GameHandle {
    /// Queue an action and wait for the snapshot taken right after it
    pub async fn send(&self, action: PlayerAction) -> ApiResult<GameSnapshot> {
        let (reply, rx) = oneshot::channel();
        self.commands
            .send(PlayerCommand { action, reply })
            .await
            .map_err(|_| ApiError::GameUnavailable)?;
        rx.await.map_err(|_| ApiError::GameUnavailable)
    }

    /// Latest published snapshot
    pub fn snapshot(&self) -> GameSnapshot {
        self.snapshots.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<GameSnapshot> {
        self.snapshots.clone()
    }
}

/// Spawn the event loop for `session` on the current tokio runtime.
///
/// With `threats` set, every reset refetches the threat in the background.
pub fn spawn_game(
    session: GameSession,
    threats: Option<Arc<ThreatService>>,
    rng: ChaCha8Rng,
) -> GameHandle {
    let (cmd_tx, cmd_rx) = mpsc::channel(COMMAND_QUEUE);
    let (snap_tx, snap_rx) = watch::channel(session.snapshot());
    let (events_tx, events_rx) = mpsc::unbounded_channel();

    let runtime = GameRuntime {
        session,
        rng,
        threats,
        events: events_tx,
        snapshots: snap_tx,
        pending: Vec::new(),
    };
    tokio::spawn(runtime.run(cmd_rx, events_rx));

    GameHandle {
        commands: cmd_tx,
        snapshots: snap_rx,
    }
}

struct GameRuntime {
    session: GameSession,
    rng: ChaCha8Rng,
    threats: Option<Arc<ThreatService>>,
    events: mpsc::UnboundedSender<GameEvent>,
    snapshots: watch::Sender<GameSnapshot>,
    /// Armed timers tagged with the generation they belong to
    pending: Vec<(u64, JoinHandle<()>)>,
}

impl GameRuntime {
    async fn run(
        mut self,
        mut commands: mpsc::Receiver<PlayerCommand>,
        mut events: mpsc::UnboundedReceiver<GameEvent>,
    ) {
        info!("Game loop started");
        // The watch channel already holds the initial snapshot
        let directives = self.session.start();
        self.apply(directives);

        loop {
            tokio::select! {
                cmd = commands.recv() => {
                    let Some(cmd) = cmd else { break };
                    self.dispatch(cmd.action.into());
                    let _ = cmd.reply.send(self.session.snapshot());
                }
                Some(event) = events.recv() => self.dispatch(event),
            }
        }

        for (_, handle) in self.pending.drain(..) {
            handle.abort();
        }
        info!("Game loop stopped");
    }

    fn dispatch(&mut self, event: GameEvent) {
        let directives = self.session.handle(event, &mut self.rng);
        self.cancel_stale();
        self.apply(directives);
        self.publish();
    }

    /// Abort timers armed for a phase the session has already left
    fn cancel_stale(&mut self) {
        let current = self.session.generation();
        self.pending.retain(|(generation, handle)| {
            if *generation == current && !handle.is_finished() {
                true
            } else {
                if !handle.is_finished() {
                    debug!("Cancelling timer from generation {}", generation);
                }
                handle.abort();
                false
            }
        });
    }

    fn apply(&mut self, directives: Vec<Directive>) {
        for directive in directives {
            match directive {
                Directive::Schedule { timer, after } => {
                    let events = self.events.clone();
                    let handle = tokio::spawn(async move {
                        tokio::time::sleep(after).await;
                        let _ = events.send(GameEvent::Timer(timer));
                    });
                    self.pending.push((timer.generation, handle));
                }
                Directive::RefreshThreat { generation } => {
                    let Some(threats) = self.threats.clone() else {
                        continue;
                    };
                    let events = self.events.clone();
                    tokio::spawn(async move {
                        let threat = threats.fetch_threat().await;
                        let _ = events.send(GameEvent::ThreatLoaded { generation, threat });
                    });
                }
            }
        }
    }

    fn publish(&self) {
        self.snapshots.send_replace(self.session.snapshot());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::NO_ACTION;
    use crate::domain::{Outcome, Phase, ThreatRecord};
    use crate::game::GameRules;
    use rand::SeedableRng;

    fn start() -> GameHandle {
        let session = GameSession::new(ThreatRecord::fallback(), GameRules::default());
        spawn_game(session, None, ChaCha8Rng::seed_from_u64(17))
    }

    async fn wait_for_phase(handle: &GameHandle, phase: Phase) -> GameSnapshot {
        let mut rx = handle.subscribe();
        let snapshot = rx.wait_for(|s| s.phase == phase).await.unwrap().clone();
        snapshot
    }

    async fn wait_for_terminal(handle: &GameHandle) -> GameSnapshot {
        let mut rx = handle.subscribe();
        let snapshot = rx.wait_for(|s| s.phase.is_terminal()).await.unwrap().clone();
        snapshot
    }

    #[tokio::test(start_paused = true)]
    async fn test_briefing_leads_to_decision() {
        let handle = start();
        assert_eq!(handle.snapshot().phase, Phase::Briefing);

        let snapshot = wait_for_phase(&handle, Phase::Decision).await;
        assert_eq!(snapshot.countdown, 60);
        assert!(snapshot.show_tutorial);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_without_selection() {
        let handle = start();
        let snapshot = wait_for_terminal(&handle).await;

        assert_eq!(snapshot.phase, Phase::Failure);
        assert_eq!(snapshot.selected_strategy, Some(NO_ACTION));
        assert_eq!(snapshot.reaction_time, Some(60));
        assert_eq!(snapshot.countdown, 0);
        assert_eq!(snapshot.distance_km, 50_000.0);
        assert!(!snapshot.show_tutorial);
    }

    #[tokio::test(start_paused = true)]
    async fn test_double_selection_keeps_first() {
        let handle = start();
        wait_for_phase(&handle, Phase::Decision).await;

        let (first, second) = tokio::join!(
            handle.send(PlayerAction::Select(StrategyKey::Kinetic)),
            handle.send(PlayerAction::Select(StrategyKey::Nuclear)),
        );
        assert_eq!(first.unwrap().selected_strategy, Some(StrategyKey::Kinetic));
        assert_eq!(second.unwrap().selected_strategy, Some(StrategyKey::Kinetic));

        let done = wait_for_terminal(&handle).await;
        assert_eq!(done.selected_strategy, Some(StrategyKey::Kinetic));
    }

    #[tokio::test(start_paused = true)]
    async fn test_clock_stops_on_selection() {
        let handle = start();
        let mut rx = handle.subscribe();
        rx.wait_for(|s| s.phase == Phase::Decision && s.countdown == 50)
            .await
            .unwrap();

        let selected = handle
            .send(PlayerAction::Select(StrategyKey::Kinetic))
            .await
            .unwrap();
        assert_eq!(selected.phase, Phase::Executing);
        assert_eq!(selected.reaction_time, Some(60 - selected.countdown));

        let done = wait_for_terminal(&handle).await;
        assert_eq!(done.countdown, selected.countdown);
        assert_eq!(done.distance_km, selected.distance_km);
        // 85 + 20 clears every draw
        assert_eq!(done.phase, Phase::Success);
        assert_eq!(
            done.resolution.map(|r| r.outcome()),
            Some(Outcome::Success)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_starts_new_round() {
        let handle = start();
        wait_for_terminal(&handle).await;

        let impact = handle.send(PlayerAction::ImpactAchieved).await.unwrap();
        assert!(impact.impact_fx);

        let reset = handle.send(PlayerAction::Reset).await.unwrap();
        assert_eq!(reset.phase, Phase::Briefing);
        assert_eq!(reset.countdown, 60);
        assert_eq!(reset.distance_km, 1_000_000.0);
        assert_eq!(reset.selected_strategy, None);
        assert!(!reset.impact_fx);

        let decision = wait_for_phase(&handle, Phase::Decision).await;
        assert_eq!(decision.countdown, 60);

        let selected = handle
            .send(PlayerAction::Select(StrategyKey::Solar))
            .await
            .unwrap();
        assert_eq!(selected.selected_strategy, Some(StrategyKey::Solar));
    }

    #[tokio::test(start_paused = true)]
    async fn test_late_reset_and_select_are_noops() {
        let handle = start();
        let briefing = handle
            .send(PlayerAction::Select(StrategyKey::Kinetic))
            .await
            .unwrap();
        assert_eq!(briefing.selected_strategy, None);

        let reset = handle.send(PlayerAction::Reset).await.unwrap();
        assert_eq!(reset.phase, Phase::Briefing);
        assert_eq!(reset.generation, 0);
    }
}

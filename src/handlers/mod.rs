/// HTTP request handlers
use crate::catalog::{self, Advisory, SuccessTier};
use crate::domain::{GameSnapshot, Health, StrategyKey};
use crate::errors::ApiError;
use crate::game::{GameHandle, PlayerAction};
use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

/// How long a watcher waits for the next change before getting the current state
const LONG_POLL: Duration = Duration::from_secs(25);

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub game: GameHandle,
}

/// Successful response wrapper
#[derive(Serialize)]
pub struct SuccessResponse<T: Serialize> {
    pub ok: bool,
    #[serde(flatten)]
    pub data: T,
}

impl<T: Serialize> SuccessResponse<T> {
    pub fn new(data: T) -> Self {
        Self { ok: true, data }
    }
}

#[derive(Serialize)]
pub struct StrategyView {
    pub key: StrategyKey,
    pub name: &'static str,
    pub icon: &'static str,
    pub success_rate: u8,
    pub tier: SuccessTier,
    pub description: &'static str,
    pub info: &'static str,
    pub cost: Option<&'static str>,
    pub lead_time: Option<&'static str>,
    pub advisories: &'static [Advisory],
}

#[derive(Serialize)]
pub struct StrategyList {
    pub strategies: Vec<StrategyView>,
}

#[derive(Serialize)]
pub struct GameView {
    pub game: GameSnapshot,
}

/// Health check handler
pub async fn health() -> Json<Health> {
    Json(Health {
        status: "ok",
        now: Utc::now(),
    })
}

/// List defense strategies in display order
pub async fn list_strategies() -> Json<SuccessResponse<StrategyList>> {
    let strategies = catalog::list_strategies()
        .iter()
        .map(|s| StrategyView {
            key: s.key,
            name: s.name,
            icon: s.icon,
            success_rate: s.success_rate,
            tier: s.tier(),
            description: s.description,
            info: s.info,
            cost: s.cost,
            lead_time: s.lead_time,
            advisories: s.advisories,
        })
        .collect();
    Json(SuccessResponse::new(StrategyList { strategies }))
}

/// Current game snapshot
pub async fn get_game(State(state): State<AppState>) -> Json<SuccessResponse<GameView>> {
    Json(SuccessResponse::new(GameView {
        game: state.game.snapshot(),
    }))
}

/// Long-poll: respond with the next published snapshot, or the current
/// one once the poll window closes
pub async fn watch_game(State(state): State<AppState>) -> Json<SuccessResponse<GameView>> {
    let mut rx = state.game.subscribe();
    rx.borrow_and_update();
    let _ = tokio::time::timeout(LONG_POLL, rx.changed()).await;
    let game = rx.borrow().clone();
    Json(SuccessResponse::new(GameView { game }))
}

/// Lock in a strategy. Repeated selections leave the first one in place.
pub async fn select_strategy(
    Path(key): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<SuccessResponse<GameView>>, ApiError> {
    let key: StrategyKey = key.parse().map_err(ApiError::InvalidInput)?;
    debug!("Select request for {}", key);
    let game = state.game.send(PlayerAction::Select(key)).await?;
    Ok(Json(SuccessResponse::new(GameView { game })))
}

/// Start a new round from a terminal screen
pub async fn reset_game(
    State(state): State<AppState>,
) -> Result<Json<SuccessResponse<GameView>>, ApiError> {
    let game = state.game.send(PlayerAction::Reset).await?;
    Ok(Json(SuccessResponse::new(GameView { game })))
}

/// Projectile animation reached the asteroid
pub async fn impact_achieved(
    State(state): State<AppState>,
) -> Result<Json<SuccessResponse<GameView>>, ApiError> {
    let game = state.game.send(PlayerAction::ImpactAchieved).await?;
    Ok(Json(SuccessResponse::new(GameView { game })))
}

/// Planetary defense decision game served over HTTP
mod catalog;
mod clients;
mod config;
mod domain;
mod errors;
mod game;
mod handlers;
mod routes;
mod services;
mod utils;

use crate::clients::NasaClient;
use crate::config::AppConfig;
use crate::game::{spawn_game, GameRules, GameSession};
use crate::handlers::AppState;
use crate::routes::build_router;
use crate::services::ThreatService;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);

    // Load configuration
    let config = AppConfig::from_env()?;
    info!("Configuration loaded successfully");

    let (threat_rng, game_rng) = match config.game_seed {
        Some(seed) => {
            info!("Using fixed game seed {}", seed);
            (
                ChaCha8Rng::seed_from_u64(seed),
                ChaCha8Rng::seed_from_u64(seed.wrapping_add(1)),
            )
        }
        None => (ChaCha8Rng::from_entropy(), ChaCha8Rng::from_entropy()),
    };

    // Initialize threat provider
    let nasa_client = NasaClient::new(
        config.nasa_neo_url.clone(),
        config.nasa_api_key.clone(),
        config.http_timeout,
    )?;
    let threats = Arc::new(ThreatService::new(
        nasa_client,
        config.neo_window_days,
        threat_rng,
    ));

    // First threat is in hand before the briefing starts
    let threat = threats.fetch_threat().await;
    info!(
        "Incoming: {} ({} m at {} km/s)",
        threat.name, threat.diameter_m, threat.velocity_km_s
    );

    // Start the game loop
    let session = GameSession::new(threat, GameRules::default());
    let game = spawn_game(session, Some(threats), game_rng);

    // Build router
    let app = build_router(AppState { game });

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!("planetary_defense listening on {}", config.bind_addr);

    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}

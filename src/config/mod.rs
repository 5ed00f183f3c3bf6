/// Application configuration module
use std::env;
use std::time::Duration;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub bind_addr: String,
    pub nasa_neo_url: String,
    pub nasa_api_key: String,
    pub neo_window_days: u64,
    pub http_timeout: Duration,
    pub game_seed: Option<u64>,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

        let nasa_neo_url = env::var("NASA_NEO_URL")
            .unwrap_or_else(|_| "https://api.nasa.gov/neo/rest/v1/feed".to_string());

        let nasa_api_key = env::var("NASA_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())
            .unwrap_or_else(|| "DEMO_KEY".to_string());

        // NeoWs rejects windows longer than a week
        let neo_window_days = env_u64("NEO_WINDOW_DAYS", 7).clamp(1, 7);

        let http_timeout = Duration::from_secs(env_u64("HTTP_TIMEOUT_SECONDS", 30));

        let game_seed = match env::var("GAME_SEED") {
            Ok(s) => Some(
                s.trim()
                    .parse::<u64>()
                    .map_err(|e| anyhow::anyhow!("GAME_SEED must be an integer: {}", e))?,
            ),
            Err(_) => None,
        };

        Ok(Self {
            bind_addr,
            nasa_neo_url,
            nasa_api_key,
            neo_window_days,
            http_timeout,
            game_seed,
        })
    }
}

fn env_u64(key: &str, default: u64) -> u64 {
    env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_u64_default_when_missing() {
        assert_eq!(env_u64("PLANETARY_DEFENSE_TEST_UNSET_VAR", 42), 42);
    }
}

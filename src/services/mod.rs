/// Threat provider service
use crate::clients::NasaClient;
use crate::domain::ThreatRecord;
use crate::errors::{ApiError, ApiResult};
use crate::utils::{d_pick, num, s_pick};
use chrono::Utc;
use rand::seq::SliceRandom;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde_json::Value;
use std::sync::Mutex;
use tracing::{error, info, warn};

/// Candidates kept after ranking
pub const TOP_CANDIDATES: usize = 5;

/// Picks the threat for a game session from the NEO feed
pub struct ThreatService {
    client: NasaClient,
    window_days: u64,
    rng: Mutex<ChaCha8Rng>,
}

impl ThreatService {
    pub fn new(client: NasaClient, window_days: u64, rng: ChaCha8Rng) -> Self {
        Self {
            client,
            window_days,
            rng: Mutex::new(rng),
        }
    }

    /// Fetch a threat, falling back to Apophis on any failure
    pub async fn fetch_threat(&self) -> ThreatRecord {
        let candidates = match self.fetch_candidates().await {
            Ok(c) => c,
            Err(e) => {
                error!("NEO feed unavailable, using fallback threat: {:?}", e);
                return ThreatRecord::fallback();
            }
        };

        let picked = match self.rng.lock() {
            Ok(mut rng) => select_threat(&candidates, &mut *rng),
            Err(poisoned) => select_threat(&candidates, &mut *poisoned.into_inner()),
        };

        match picked {
            Some(threat) => {
                info!(
                    "Selected threat {} ({} m, {} km/s)",
                    threat.name, threat.diameter_m, threat.velocity_km_s
                );
                threat
            }
            None => ThreatRecord::fallback(),
        }
    }

    /// Fetch the feed window and return the ranked shortlist
    pub async fn fetch_candidates(&self) -> ApiResult<Vec<ThreatRecord>> {
        let start = Utc::now().date_naive();
        let end = start + chrono::Days::new(self.window_days);
        let feed = self.client.fetch_neo_feed(start, end).await?;

        let all = parse_neo_feed(&feed)?;
        let ranked = rank_candidates(all);
        if ranked.is_empty() {
            return Err(ApiError::MalformedFeed("feed contained no usable objects".into()));
        }
        Ok(ranked)
    }
}

/// Flatten `near_earth_objects` (keyed by date) into threat records.
///
/// Entries that are missing required fields, carry non-finite numbers, or a
/// non-positive diameter or velocity are skipped.
pub fn parse_neo_feed(feed: &Value) -> ApiResult<Vec<ThreatRecord>> {
    let by_date = feed
        .get("near_earth_objects")
        .and_then(|x| x.as_object())
        .ok_or_else(|| ApiError::MalformedFeed("missing near_earth_objects".into()))?;

    let mut records = Vec::new();
    for neo in by_date.values().filter_map(|day| day.as_array()).flatten() {
        match parse_neo(neo) {
            Some(record) => records.push(record),
            None => warn!(
                "Skipping malformed NEO entry {}",
                s_pick(neo, &["id", "neo_reference_id"]).unwrap_or_default()
            ),
        }
    }
    Ok(records)
}

fn parse_neo(neo: &Value) -> Option<ThreatRecord> {
    let approach = neo.get("close_approach_data")?.as_array()?.first()?;

    let diameter_m = num(&neo["estimated_diameter"]["meters"]["estimated_diameter_max"])?.round();
    let velocity_km_s = num(&approach["relative_velocity"]["kilometers_per_second"])?;
    let miss_distance_km = num(&approach["miss_distance"]["kilometers"])?.round();

    if ![diameter_m, velocity_km_s, miss_distance_km]
        .iter()
        .all(|v| v.is_finite())
        || diameter_m <= 0.0
        || velocity_km_s <= 0.0
        || miss_distance_km < 0.0
    {
        return None;
    }

    Some(ThreatRecord {
        id: s_pick(neo, &["id", "neo_reference_id"])?,
        name: s_pick(neo, &["name"])?,
        diameter_m,
        velocity_km_s,
        miss_distance_km,
        hazardous: neo
            .get("is_potentially_hazardous_asteroid")
            .and_then(|x| x.as_bool())
            .unwrap_or(false),
        approach_date: d_pick(approach, &["close_approach_date", "close_approach_date_full"]),
        absolute_magnitude: num(&neo["absolute_magnitude_h"]).unwrap_or(0.0),
    })
}

/// Hazardous objects by size, or the largest of all if none are hazardous
pub fn rank_candidates(mut all: Vec<ThreatRecord>) -> Vec<ThreatRecord> {
    all.sort_by(|a, b| b.diameter_m.total_cmp(&a.diameter_m));

    let hazardous: Vec<ThreatRecord> = all
        .iter()
        .filter(|t| t.hazardous)
        .take(TOP_CANDIDATES)
        .cloned()
        .collect();

    if hazardous.is_empty() {
        all.truncate(TOP_CANDIDATES);
        all
    } else {
        hazardous
    }
}

/// Uniform pick from the shortlist
pub fn select_threat<R: Rng + ?Sized>(candidates: &[ThreatRecord], rng: &mut R) -> Option<ThreatRecord> {
    candidates.choose(rng).cloned()
}

/// Static table of defense strategies
use crate::domain::{Debrief, Outcome, StrategyKey};
use serde::Serialize;

/// Strategy the clock forces when the countdown runs out
pub const NO_ACTION: StrategyKey = StrategyKey::Evacuate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AdvisorRole {
    Military,
    Science,
    Political,
    Economic,
}

#[derive(Debug, Serialize)]
pub struct Advisory {
    pub role: AdvisorRole,
    pub text: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SuccessTier {
    High,
    Medium,
    Low,
}

impl SuccessTier {
    pub fn for_rate(rate: u8) -> Self {
        match rate {
            70.. => SuccessTier::High,
            40..=69 => SuccessTier::Medium,
            _ => SuccessTier::Low,
        }
    }
}

/// Defense option with a fixed base success rate in percent
#[derive(Debug, Serialize)]
pub struct Strategy {
    pub key: StrategyKey,
    pub name: &'static str,
    pub icon: &'static str,
    pub success_rate: u8,
    pub description: &'static str,
    pub info: &'static str,
    pub cost: Option<&'static str>,
    pub lead_time: Option<&'static str>,
    pub advisories: &'static [Advisory],
}

impl Strategy {
    pub fn tier(&self) -> SuccessTier {
        SuccessTier::for_rate(self.success_rate)
    }
}

// Display order, not ranked by efficacy.
static STRATEGIES: [Strategy; 4] = [
    Strategy {
        key: StrategyKey::Nuclear,
        name: "Nuclear Standoff Burst",
        icon: "🚀",
        success_rate: 70,
        description: "High-energy detonation",
        info: "A nuclear device detonated at a safe standoff distance, similar to NASA proposals from the 1990s. Risk: the asteroid may fragment.",
        cost: Some("~$1B"),
        lead_time: Some("months"),
        advisories: &[
            Advisory {
                role: AdvisorRole::Military,
                text: "Delivery vehicles are ready. This is the highest-yield option we can launch today.",
            },
            Advisory {
                role: AdvisorRole::Science,
                text: "Fragmentation could turn one impactor into several. Standoff distance is critical.",
            },
            Advisory {
                role: AdvisorRole::Political,
                text: "Launching nuclear payloads requires international consent under the Outer Space Treaty.",
            },
            Advisory {
                role: AdvisorRole::Economic,
                text: "Expensive, but negligible next to the cost of a regional impact.",
            },
        ],
    },
    Strategy {
        key: StrategyKey::Kinetic,
        name: "Kinetic Impactor",
        icon: "💥",
        success_rate: 85,
        description: "Trajectory change (NASA DART)",
        info: "The DART mission (2022) successfully demonstrated this technique on the asteroid Dimorphos, shortening its orbit by 32 minutes.",
        cost: Some("~$330M"),
        lead_time: Some("years"),
        advisories: &[
            Advisory {
                role: AdvisorRole::Military,
                text: "No warhead involved. Launch logistics are routine.",
            },
            Advisory {
                role: AdvisorRole::Science,
                text: "Flight-proven by DART. Momentum transfer beat predictions.",
            },
            Advisory {
                role: AdvisorRole::Political,
                text: "The least controversial option with allies and the public.",
            },
            Advisory {
                role: AdvisorRole::Economic,
                text: "The most cost-effective deflection on record.",
            },
        ],
    },
    Strategy {
        key: StrategyKey::Solar,
        name: "Solar Sail",
        icon: "☀️",
        success_rate: 40,
        description: "Gradual deflection (needs more time)",
        info: "Uses solar radiation pressure for a gradual push. Only effective with years of warning. No fragmentation risk.",
        cost: Some("~$100M"),
        lead_time: Some("decades"),
        advisories: &[
            Advisory {
                role: AdvisorRole::Military,
                text: "Not a weapon system. We have no operational role here.",
            },
            Advisory {
                role: AdvisorRole::Science,
                text: "Elegant and safe, but the push is tiny. Warning time is everything.",
            },
            Advisory {
                role: AdvisorRole::Political,
                text: "Easy to approve, hard to defend if it is too slow.",
            },
            Advisory {
                role: AdvisorRole::Economic,
                text: "Cheapest hardware, longest mission.",
            },
        ],
    },
    Strategy {
        key: StrategyKey::Evacuate,
        name: "Evacuation",
        icon: "❌",
        success_rate: 0,
        description: "Abandon the defense",
        info: "No intervention. A 370 m asteroid would cause massive regional devastation and global climate effects.",
        cost: None,
        lead_time: None,
        advisories: &[
            Advisory {
                role: AdvisorRole::Military,
                text: "We can move people, not the asteroid.",
            },
            Advisory {
                role: AdvisorRole::Science,
                text: "Evacuation does nothing to the impact itself.",
            },
            Advisory {
                role: AdvisorRole::Political,
                text: "History will judge inaction harshly.",
            },
            Advisory {
                role: AdvisorRole::Economic,
                text: "Losses would be measured in trillions.",
            },
        ],
    },
];

const IMPACT_CONSEQUENCES: &str = "A 370 m asteroid like Apophis would cause regional devastation over thousands of square kilometres, a tsunami if it struck the ocean, an impact winter and millions of casualties. That is why NASA and ESA constantly monitor near-Earth objects.";

/// All strategies in display order
pub fn list_strategies() -> &'static [Strategy] {
    &STRATEGIES
}

/// Look up a strategy by key.
///
/// Panics if the catalog has no entry for `key`: the catalog and the key
/// type are out of sync, which no caller can recover from.
pub fn get(key: StrategyKey) -> &'static Strategy {
    STRATEGIES
        .iter()
        .find(|s| s.key == key)
        .unwrap_or_else(|| panic!("strategy '{}' missing from catalog", key))
}

/// Narrative for the terminal screen
pub fn debrief(outcome: Outcome, key: StrategyKey) -> Debrief {
    let strategy = get(key);
    match outcome {
        Outcome::Success => Debrief {
            headline: "MISSION ACCOMPLISHED",
            message: "The asteroid has been deflected. Humanity is safe.",
            strategy_name: strategy.name,
            population_saved: 7_800_000_000,
            status: "optimal",
            lesson: strategy.info,
        },
        Outcome::Failure => Debrief {
            headline: "IMPACT CONFIRMED",
            message: "The asteroid has struck Earth. Global consequences are catastrophic.",
            strategy_name: strategy.name,
            population_saved: 0,
            status: "critical",
            lesson: IMPACT_CONSEQUENCES,
        },
    }
}

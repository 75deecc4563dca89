//! Data-driven game balance
//!
//! Every field has a default matching the shipped feel of the games. A JSON
//! document only needs to name the fields it wants to change.

use serde::{Deserialize, Serialize};

/// Parkour runner physics and generator knobs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParkourTuning {
    /// Downward acceleration per tick
    pub gravity: f32,
    /// Vertical velocity applied on jump (negative is up)
    pub jump_force: f32,
    /// World scroll per tick
    pub scroll_speed: f32,
    /// Chance a generated platform carries spikes
    pub spike_chance: f32,
    /// Chance a spike-free platform carries a coin
    pub coin_chance: f32,
    /// Currency per collected coin
    pub coin_reward: u32,
    pub platform_min_width: f32,
    pub platform_width_range: f32,
    /// Horizontal gap between generated platforms is `min + r * range`
    pub spawn_gap_min: f32,
    pub spawn_gap_range: f32,
    /// Max vertical wander between consecutive generated platforms
    pub spawn_jitter: f32,
}

impl Default for ParkourTuning {
    fn default() -> Self {
        Self {
            gravity: 0.55,
            jump_force: -12.0,
            scroll_speed: 2.5,
            spike_chance: 0.2,
            coin_chance: 0.5,
            coin_reward: 3,
            platform_min_width: 60.0,
            platform_width_range: 80.0,
            spawn_gap_min: 80.0,
            spawn_gap_range: 70.0,
            spawn_jitter: 130.0,
        }
    }
}

/// Lane racer speed ramp and spawn cadence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RacerTuning {
    pub lane_count: usize,
    /// Road speed at score zero
    pub base_speed: f32,
    /// Speed added for every `speed_step_score` points
    pub speed_step: f32,
    pub speed_step_score: u64,
    /// Ticks between enemy spawns at score zero
    pub spawn_interval: u64,
    /// Spawn interval never drops below this
    pub min_spawn_interval: u64,
    /// Spawn interval shrinks by one tick per this many points
    pub spawn_shrink_score: u64,
    pub coin_reward: u32,
    /// A coin reward is paid every this many score ticks
    pub coin_every: u64,
    /// Vertical forgiveness on each edge of the collision band
    pub hit_margin: f32,
}

impl Default for RacerTuning {
    fn default() -> Self {
        Self {
            lane_count: 3,
            base_speed: 3.0,
            speed_step: 0.5,
            speed_step_score: 200,
            spawn_interval: 60,
            min_spawn_interval: 25,
            spawn_shrink_score: 300,
            coin_reward: 5,
            coin_every: 100,
            hit_margin: 10.0,
        }
    }
}

/// One row of the clicker upgrade table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpgradeSpec {
    pub id: String,
    pub name: String,
    /// Starting price
    pub cost: u64,
    /// Added to per-click income on every purchase
    pub bonus: u64,
}

impl UpgradeSpec {
    fn new(id: &str, name: &str, cost: u64, bonus: u64) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            cost,
            bonus,
        }
    }
}

/// Clicker income and effect timings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClickerTuning {
    pub upgrades: Vec<UpgradeSpec>,
    /// Price multiplier after each purchase, in tenths (22 = x2.2, floored)
    pub cost_growth_tenths: u64,
    /// Lifetime of a floating "+N" ripple
    pub effect_lifetime_ms: u32,
    /// Duration of the button shake after a click
    pub shake_ms: u32,
}

impl Default for ClickerTuning {
    fn default() -> Self {
        Self {
            upgrades: vec![
                UpgradeSpec::new("beak", "Golden Beak", 50, 2),
                UpgradeSpec::new("wings", "Lucky Wings", 200, 5),
                UpgradeSpec::new("hat", "Detective Hat", 800, 15),
                UpgradeSpec::new("rocket", "Reactor", 3000, 50),
            ],
            cost_growth_tenths: 22,
            effect_lifetime_ms: 700,
            shake_ms: 200,
        }
    }
}

/// Presentation preferences (never affect simulation)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySettings {
    /// Freeze squash/stretch, coin pulse and background drift
    pub reduced_motion: bool,
    /// Show distance and coin counters while playing
    pub show_hud: bool,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            reduced_motion: false,
            show_hud: true,
        }
    }
}

/// Complete balance document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub parkour: ParkourTuning,
    pub racer: RacerTuning,
    pub clicker: ClickerTuning,
    pub display: DisplaySettings,
}

impl Tuning {
    /// Parse a (possibly partial) tuning document
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize the full document (handy for dumping the defaults)
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Load the page-embedded tuning document (WASM only)
    ///
    /// Looks for `<script id="duck-tuning" type="application/json">`.
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        const ELEMENT_ID: &str = "duck-tuning";

        let text = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(ELEMENT_ID))
            .and_then(|el| el.text_content());

        match text {
            Some(json) if !json.trim().is_empty() => match Self::from_json(&json) {
                Ok(tuning) => {
                    log::info!("Loaded tuning from #{}", ELEMENT_ID);
                    tuning
                }
                Err(e) => {
                    log::warn!("Ignoring malformed tuning document: {}", e);
                    Self::default()
                }
            },
            _ => {
                log::info!("Using default tuning");
                Self::default()
            }
        }
    }

    /// Native stub
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}

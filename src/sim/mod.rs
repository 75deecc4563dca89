//! Game simulations
//!
//! All gameplay logic lives here. This module must stay free of rendering and
//! platform dependencies:
//! - One tick per scheduled frame, run to completion
//! - Randomness only through an injected `RandomSource`
//! - Stable iteration order (insertion order, ids are monotonic)
//! - Currency leaves the simulation only through a `CoinSink`

pub mod clicker;
pub mod collision;
pub mod driver;
pub mod input;
pub mod parkour;
pub mod racer;

pub use clicker::{ClickEffect, ClickOutcome, Clicker, EffectId, PendingRemovals, Upgrade};
pub use collision::{Aabb, lane_hit, lands_on};
pub use driver::{FrameOutcome, Game, RunSummary, Session};
pub use input::{Intent, TickInput, intent_for_key};
pub use parkour::{ParkourGame, Platform};
pub use racer::{Enemy, RacerGame};

use serde::{Deserialize, Serialize};

use crate::consts::SCORE_PER_METER;

/// Lifecycle phase of a game session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for a start command, nothing simulated
    #[default]
    Idle,
    /// Active gameplay, one tick per frame
    Playing,
    /// Run ended, awaiting restart
    Dead,
}

/// Result of a single simulation tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// State advanced, schedule the next frame
    Advanced,
    /// The run ended during this tick
    Died,
}

/// Per-run counters, zeroed at every (re)start
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStats {
    /// Simulation ticks since the run started
    pub ticks: u64,
    /// Raw score (one point per tick)
    pub score: u64,
    /// Currency earned this run
    pub coins: u32,
}

impl RunStats {
    /// Displayed distance in meters, shared by HUD and death summary
    pub fn distance(&self) -> u64 {
        self.score / SCORE_PER_METER
    }
}

/// Receives currency earned inside a tick (the host owns the wallet)
pub trait CoinSink {
    fn coins_earned(&mut self, amount: u32);
}

impl<F: FnMut(u32)> CoinSink for F {
    fn coins_earned(&mut self, amount: u32) {
        self(amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_floors() {
        let stats = RunStats {
            ticks: 129,
            score: 129,
            coins: 0,
        };
        assert_eq!(stats.distance(), 12);
        assert_eq!(RunStats::default().distance(), 0);
    }

    #[test]
    fn test_closure_is_coin_sink() {
        let mut total = 0;
        {
            let sink: &mut dyn CoinSink = &mut |n: u32| total += n;
            sink.coins_earned(3);
            sink.coins_earned(5);
        }
        assert_eq!(total, 8);
    }
}

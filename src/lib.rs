//! Duck Arcade - three casual duck mini-games
//!
//! Core modules:
//! - `sim`: Game simulations (parkour runner, lane racer, clicker) and the loop driver
//! - `renderer`: Pure scene building plus the WebGPU pipeline that draws it
//! - `rng`: Injectable random sources for obstacle generation
//! - `tuning`: Data-driven game balance
//! - `wallet`: Host-side currency aggregation

pub mod renderer;
pub mod rng;
pub mod sim;
pub mod tuning;
pub mod wallet;

pub use rng::{RandomSource, ScriptedRandom};
pub use tuning::{DisplaySettings, Tuning};
pub use wallet::Wallet;

/// Fixed playfield geometry shared by simulation and rendering
pub mod consts {
    /// Logical canvas size (both canvas games use the same playfield)
    pub const SCREEN_W: f32 = 340.0;
    pub const SCREEN_H: f32 = 480.0;

    /// Parkour duck is a square sprite
    pub const DUCK_SIZE: f32 = 38.0;
    /// Platform slab thickness
    pub const PLATFORM_H: f32 = 14.0;
    /// Ground platform sits this far above the bottom edge
    pub const GROUND_OFFSET: f32 = 40.0;
    /// How far below the screen the duck may drop before the run ends
    pub const FALL_MARGIN: f32 = 80.0;
    /// Horizontal forgiveness on each side of a platform
    pub const LANDING_INSET: f32 = 4.0;
    /// Fixed horizontal screen position of the parkour duck
    pub const DUCK_X: f32 = 60.0;

    /// Racer sprites
    pub const RACER_W: f32 = 48.0;
    pub const RACER_H: f32 = 60.0;
    pub const ENEMY_W: f32 = 44.0;
    pub const ENEMY_H: f32 = 58.0;
    /// Racer duck drives at a fixed height
    pub const RACER_Y: f32 = SCREEN_H - 90.0;

    /// Raw score ticks per displayed meter
    pub const SCORE_PER_METER: u64 = 10;
}

//! Procedural platform generation
//!
//! Platforms are spawned one at a time at the right-hand frontier whenever it
//! comes within the lookahead window, and pruned once they scroll far enough
//! behind the camera. Content is random; tests assert structure (bounds,
//! hazard/coin exclusivity, monotonic ids) unless they script the RNG.

use super::Platform;
use crate::consts::*;
use crate::rng::RandomSource;
use crate::tuning::ParkourTuning;

/// Content must exist this far past the right screen edge
pub const LOOKAHEAD: f32 = 100.0;
/// Platforms further than this behind the camera are dropped
pub const PRUNE_MARGIN: f32 = 200.0;
/// Platforms in the starting layout
pub const INITIAL_PLATFORMS: u32 = 12;

/// Vertical band for generated platforms (screen y of the slab top)
pub const SPAWN_Y_MIN: f32 = 80.0;
pub const SPAWN_Y_MAX: f32 = SCREEN_H - 80.0;
/// The opening stretch stays inside a narrower band
pub const START_Y_MIN: f32 = 100.0;
pub const START_Y_MAX: f32 = SCREEN_H - 100.0;

/// Spawns and prunes platforms; owns the id counter for a run
#[derive(Debug, Clone, Default)]
pub struct PlatformGenerator {
    next_id: u32,
}

impl PlatformGenerator {
    pub fn new() -> Self {
        Self { next_id: 0 }
    }

    fn allocate_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// The id the next spawned platform will get
    pub fn peek_next_id(&self) -> u32 {
        self.next_id
    }

    /// Ground slab under the start position plus a staircase of platforms
    pub fn initial_layout<R: RandomSource>(
        &mut self,
        rng: &mut R,
        tuning: &ParkourTuning,
    ) -> Vec<Platform> {
        self.next_id = 0;
        let mut platforms = Vec::with_capacity(INITIAL_PLATFORMS as usize + 4);

        let ground_id = self.allocate_id();
        platforms.push(Platform {
            id: ground_id,
            x: 0.0,
            y: SCREEN_H - GROUND_OFFSET,
            width: SCREEN_W,
            has_spike: false,
            has_coin: false,
            coin_collected: false,
        });

        let mut x = 180.0;
        let mut y = SCREEN_H - 130.0;
        for _ in 1..INITIAL_PLATFORMS {
            x += 80.0 + rng.next_unit() * 60.0;
            y = (y + (rng.next_unit() - 0.5) * 120.0).clamp(START_Y_MIN, START_Y_MAX);
            platforms.push(self.make_platform(x, y, rng, tuning));
        }

        platforms
    }

    /// Roll width, hazard and collectible for a platform at `(x, y)`
    ///
    /// Draw order is fixed (width, spike, coin) so scripted sources produce
    /// a predictable layout. The coin roll only happens without spikes.
    pub fn make_platform<R: RandomSource>(
        &mut self,
        x: f32,
        y: f32,
        rng: &mut R,
        tuning: &ParkourTuning,
    ) -> Platform {
        let width = tuning.platform_min_width + rng.next_unit() * tuning.platform_width_range;
        // No spikes right at ground level
        let has_spike = rng.next_unit() < tuning.spike_chance && y < SCREEN_H - GROUND_OFFSET;
        let has_coin = !has_spike && rng.next_unit() < tuning.coin_chance;

        Platform {
            id: self.allocate_id(),
            x,
            y,
            width,
            has_spike,
            has_coin,
            coin_collected: false,
        }
    }

    /// Spawn at most one platform if the frontier is inside the lookahead window
    ///
    /// Returns the id of the new platform, if any.
    pub fn top_up<R: RandomSource>(
        &mut self,
        platforms: &mut Vec<Platform>,
        world_x: f32,
        rng: &mut R,
        tuning: &ParkourTuning,
    ) -> Option<u32> {
        let frontier = frontier(platforms).unwrap_or(world_x);
        if frontier - world_x >= SCREEN_W + LOOKAHEAD {
            return None;
        }

        let last_y = platforms
            .last()
            .map(|p| p.y)
            .unwrap_or(SCREEN_H - 130.0);
        let x = frontier + tuning.spawn_gap_min + rng.next_unit() * tuning.spawn_gap_range;
        let y = (last_y + (rng.next_unit() - 0.5) * tuning.spawn_jitter)
            .clamp(SPAWN_Y_MIN, SPAWN_Y_MAX);

        let platform = self.make_platform(x, y, rng, tuning);
        log::debug!(
            "spawned platform {} at ({:.0}, {:.0}) w={:.0} spike={} coin={}",
            platform.id,
            platform.x,
            platform.y,
            platform.width,
            platform.has_spike,
            platform.has_coin
        );
        let id = platform.id;
        platforms.push(platform);
        Some(id)
    }
}

/// Furthest world x at which a platform has been generated
pub fn frontier(platforms: &[Platform]) -> Option<f32> {
    platforms.iter().map(|p| p.x).reduce(f32::max)
}

/// Drop platforms that scrolled out behind the camera
pub fn prune(platforms: &mut Vec<Platform>, world_x: f32) {
    platforms.retain(|p| p.x - world_x > -PRUNE_MARGIN);
}

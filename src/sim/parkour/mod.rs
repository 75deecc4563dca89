//! Parkour runner: a duck hopping across scrolling rooftops
//!
//! The duck stays at a fixed screen x while the world scrolls left. Landing on
//! spikes or falling off the bottom ends the run; coins float above some
//! platforms.

pub mod generator;

pub use generator::PlatformGenerator;

use glam::Vec2;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::{Aabb, lands_on};
use super::driver::Game;
use super::input::TickInput;
use super::{CoinSink, RunStats, TickOutcome};
use crate::consts::*;
use crate::rng::{RandomSource, seeded};
use crate::tuning::ParkourTuning;

/// Coin hitbox edge length
pub const COIN_SIZE: f32 = 20.0;
/// Coin hitbox top sits this far above the platform surface
pub const COIN_RISE: f32 = 28.0;

/// The runner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Top-left corner in screen space
    pub pos: Vec2,
    pub vel_y: f32,
    /// Resting on a platform this tick
    pub grounded: bool,
    pub alive: bool,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            pos: Vec2::new(DUCK_X, SCREEN_H - 80.0),
            vel_y: 0.0,
            grounded: false,
            alive: true,
        }
    }
}

impl Player {
    pub fn bounds(&self) -> Aabb {
        Aabb::from_pos_size(self.pos, Vec2::splat(DUCK_SIZE))
    }

    /// Squash/stretch factor for rendering: wide when landed, thin when rising
    pub fn squash(&self) -> f32 {
        if self.grounded {
            1.15
        } else if self.vel_y < 0.0 {
            0.85
        } else {
            1.0
        }
    }
}

/// A platform slab in world space
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    /// Monotonic within a run
    pub id: u32,
    /// World x of the left edge
    pub x: f32,
    /// Screen y of the top surface
    pub y: f32,
    pub width: f32,
    pub has_spike: bool,
    pub has_coin: bool,
    pub coin_collected: bool,
}

impl Platform {
    #[inline]
    pub fn screen_x(&self, world_x: f32) -> f32 {
        self.x - world_x
    }

    /// Slab bounds in screen space
    pub fn bounds(&self, world_x: f32) -> Aabb {
        Aabb::from_pos_size(
            Vec2::new(self.screen_x(world_x), self.y),
            Vec2::new(self.width, PLATFORM_H),
        )
    }

    /// The coin floating above the middle, while it is still up for grabs
    pub fn coin_bounds(&self, world_x: f32) -> Option<Aabb> {
        if !self.has_coin || self.coin_collected {
            return None;
        }
        let pos = Vec2::new(
            self.screen_x(world_x) + self.width / 2.0 - COIN_SIZE / 2.0,
            self.y - COIN_RISE,
        );
        Some(Aabb::from_pos_size(pos, Vec2::splat(COIN_SIZE)))
    }
}

/// Complete parkour simulation state
#[derive(Debug, Clone)]
pub struct ParkourGame<R = Pcg32> {
    pub tuning: ParkourTuning,
    pub player: Player,
    /// Active platforms in spawn order
    pub platforms: Vec<Platform>,
    pub stats: RunStats,
    /// Camera scroll position
    pub world_x: f32,
    /// Jump pressed while airborne; honored if we land this tick
    pub jump_queued: bool,
    generator: PlatformGenerator,
    rng: R,
}

impl ParkourGame<Pcg32> {
    /// Game with a PCG generator seeded from `seed`
    pub fn with_seed(tuning: ParkourTuning, seed: u64) -> Self {
        Self::new(tuning, seeded(seed))
    }
}

impl<R: RandomSource> ParkourGame<R> {
    pub fn new(tuning: ParkourTuning, rng: R) -> Self {
        let mut game = Self {
            tuning,
            player: Player::default(),
            platforms: Vec::new(),
            stats: RunStats::default(),
            world_x: 0.0,
            jump_queued: false,
            generator: PlatformGenerator::new(),
            rng,
        };
        game.reset();
        game
    }

    /// Jump now if standing, otherwise buffer it for this tick's landing
    fn request_jump(&mut self) {
        if self.player.grounded {
            self.player.vel_y = self.tuning.jump_force;
            self.player.grounded = false;
        } else {
            self.jump_queued = true;
        }
    }

    fn die(&mut self, cause: &str) -> TickOutcome {
        self.player.alive = false;
        log::debug!("parkour duck died: {} at tick {}", cause, self.stats.ticks);
        TickOutcome::Died
    }

    /// Gravity, landings and coin pickups. Returns `Died` on a spike landing.
    fn resolve_platforms(&mut self, sink: &mut dyn CoinSink) -> TickOutcome {
        let world_x = self.world_x;
        for index in 0..self.platforms.len() {
            let platform = &self.platforms[index];
            let slab = platform.bounds(world_x);
            if lands_on(&self.player.bounds(), self.player.vel_y, &slab, LANDING_INSET) {
                self.player.pos.y = platform.y - DUCK_SIZE;
                self.player.vel_y = 0.0;
                self.player.grounded = true;

                if platform.has_spike {
                    return self.die("spikes");
                }

                if self.jump_queued {
                    self.player.vel_y = self.tuning.jump_force;
                    self.player.grounded = false;
                    self.jump_queued = false;
                }
            }

            let body = self.player.bounds();
            let platform = &mut self.platforms[index];
            let grabbed = platform
                .coin_bounds(world_x)
                .is_some_and(|coin| coin.overlaps(&body));
            if grabbed {
                platform.coin_collected = true;
                let reward = self.tuning.coin_reward;
                self.stats.coins += reward;
                sink.coins_earned(reward);
                log::debug!("coin {} collected (+{})", platform.id, reward);
            }
        }
        TickOutcome::Advanced
    }
}

impl<R: RandomSource> Game for ParkourGame<R> {
    fn name(&self) -> &'static str {
        "Parkour"
    }

    fn reset(&mut self) {
        self.player = Player::default();
        self.platforms = self.generator.initial_layout(&mut self.rng, &self.tuning);
        self.stats = RunStats::default();
        self.world_x = 0.0;
        self.jump_queued = false;
    }

    fn tick(&mut self, input: &TickInput, sink: &mut dyn CoinSink) -> TickOutcome {
        if !self.player.alive {
            return TickOutcome::Died;
        }

        self.stats.ticks += 1;
        self.stats.score += 1;
        self.world_x += self.tuning.scroll_speed;

        if input.jump {
            self.request_jump();
        }

        // Integrate
        self.player.vel_y += self.tuning.gravity;
        self.player.pos.y += self.player.vel_y;
        self.player.grounded = false;

        if self.resolve_platforms(sink) == TickOutcome::Died {
            return TickOutcome::Died;
        }
        // Buffered jumps only survive until the end of the tick
        self.jump_queued = false;

        if self.player.pos.y > SCREEN_H + FALL_MARGIN {
            return self.die("fell");
        }

        self.generator
            .top_up(&mut self.platforms, self.world_x, &mut self.rng, &self.tuning);
        generator::prune(&mut self.platforms, self.world_x);

        TickOutcome::Advanced
    }

    fn stats(&self) -> &RunStats {
        &self.stats
    }

    fn is_alive(&self) -> bool {
        self.player.alive
    }

    fn entity_count(&self) -> usize {
        self.platforms.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::ScriptedRandom;
    use crate::sim::driver::{FrameOutcome, Session};
    use crate::sim::input::Intent;
    use crate::sim::GamePhase;
    use proptest::prelude::*;

    const GROUND_Y: f32 = SCREEN_H - GROUND_OFFSET;

    /// Plain platforms only (no spikes, no coins)
    fn calm_game() -> ParkourGame<ScriptedRandom> {
        ParkourGame::new(ParkourTuning::default(), ScriptedRandom::constant(0.5))
    }

    fn slab(game: &ParkourGame<ScriptedRandom>, screen_x: f32, y: f32, width: f32) -> Platform {
        Platform {
            id: 1000,
            // Account for the scroll applied at the start of the next tick
            x: game.world_x + game.tuning.scroll_speed + screen_x,
            y,
            width,
            has_spike: false,
            has_coin: false,
            coin_collected: false,
        }
    }

    /// Place the duck so that gravity alone lands it on `surface_y` next tick
    fn hover_over(game: &mut ParkourGame<ScriptedRandom>, surface_y: f32) {
        game.player.pos.y = surface_y - DUCK_SIZE - 0.3;
        game.player.vel_y = 0.0;
        game.player.grounded = false;
    }

    fn no_sink() -> impl FnMut(u32) {
        |_| {}
    }

    #[test]
    fn test_landing_grounds_and_zeroes_velocity() {
        let mut game = calm_game();
        game.platforms = vec![slab(&game, 0.0, GROUND_Y, SCREEN_W)];
        hover_over(&mut game, GROUND_Y);

        let outcome = game.tick(&TickInput::default(), &mut no_sink());
        assert_eq!(outcome, TickOutcome::Advanced);
        assert!(game.player.grounded);
        assert_eq!(game.player.vel_y, 0.0);
        assert_eq!(game.player.pos.y, GROUND_Y - DUCK_SIZE);
    }

    #[test]
    fn test_spike_landing_is_terminal() {
        let mut game = calm_game();
        let mut spikes = slab(&game, 0.0, 300.0, 200.0);
        spikes.has_spike = true;
        game.platforms = vec![spikes];
        hover_over(&mut game, 300.0);
        let count_before = game.platforms.len();

        let outcome = game.tick(&TickInput::default(), &mut no_sink());
        assert_eq!(outcome, TickOutcome::Died);
        assert!(!game.player.alive);
        // Generation is skipped on the death tick
        assert_eq!(game.platforms.len(), count_before);

        // Further ticks change nothing
        let ticks = game.stats.ticks;
        assert_eq!(game.tick(&TickInput::default(), &mut no_sink()), TickOutcome::Died);
        assert_eq!(game.stats.ticks, ticks);
    }

    #[test]
    fn test_falling_below_screen_is_terminal() {
        let mut game = calm_game();
        for x in [0.0, 150.0, 300.0] {
            game.reset();
            game.player.pos = Vec2::new(x, SCREEN_H + FALL_MARGIN + 1.0);
            assert_eq!(
                game.tick(&TickInput::default(), &mut no_sink()),
                TickOutcome::Died
            );
        }
    }

    #[test]
    fn test_buffered_jump_fires_on_landing() {
        let mut game = calm_game();
        game.platforms = vec![slab(&game, 0.0, GROUND_Y, SCREEN_W)];
        hover_over(&mut game, GROUND_Y);

        let jump = TickInput {
            jump: true,
            ..Default::default()
        };
        game.tick(&jump, &mut no_sink());
        assert_eq!(game.player.vel_y, game.tuning.jump_force);
        assert!(!game.player.grounded);
        assert!(!game.jump_queued);
    }

    #[test]
    fn test_buffered_jump_expires_after_one_tick() {
        let mut game = calm_game();
        game.platforms = vec![slab(&game, 0.0, GROUND_Y, SCREEN_W)];
        // Two ticks of falling before touching down
        game.player.pos.y = GROUND_Y - DUCK_SIZE - 1.5;
        game.player.vel_y = 0.0;

        let jump = TickInput {
            jump: true,
            ..Default::default()
        };
        game.tick(&jump, &mut no_sink());
        assert!(!game.player.grounded);
        assert!(!game.jump_queued);

        game.platforms[0].x += game.tuning.scroll_speed;
        game.tick(&TickInput::default(), &mut no_sink());
        assert!(game.player.grounded);
        assert_eq!(game.player.vel_y, 0.0);
    }

    #[test]
    fn test_grounded_jump_is_immediate() {
        let mut game = calm_game();
        game.platforms = vec![slab(&game, 0.0, GROUND_Y, SCREEN_W)];
        hover_over(&mut game, GROUND_Y);
        game.tick(&TickInput::default(), &mut no_sink());
        assert!(game.player.grounded);

        let y = game.player.pos.y;
        let jump = TickInput {
            jump: true,
            ..Default::default()
        };
        game.tick(&jump, &mut no_sink());
        assert!(game.player.pos.y < y);
        assert!(game.player.vel_y < 0.0);
    }

    #[test]
    fn test_coin_collected_exactly_once() {
        let mut game = calm_game();
        let mut coin_slab = slab(&game, 40.0, GROUND_Y, 100.0);
        coin_slab.has_coin = true;
        game.platforms = vec![coin_slab];
        // Duck box 400..438 overlaps the coin box 412..432
        game.player.pos.y = 400.0;

        let mut earned = Vec::new();
        let mut sink = |n: u32| earned.push(n);
        game.tick(&TickInput::default(), &mut sink);
        game.tick(&TickInput::default(), &mut sink);
        game.tick(&TickInput::default(), &mut sink);

        assert_eq!(earned, vec![3]);
        assert_eq!(game.stats.coins, 3);
        assert!(game.platforms.iter().any(|p| p.id == 1000 && p.coin_collected));
    }

    #[test]
    fn test_reset_restores_fresh_run() {
        let mut game = ParkourGame::with_seed(ParkourTuning::default(), 7);
        for _ in 0..50 {
            game.tick(&TickInput::default(), &mut no_sink());
        }
        game.reset();
        assert_eq!(game.stats, RunStats::default());
        assert_eq!(game.world_x, 0.0);
        assert_eq!(game.player, Player::default());
        assert_eq!(game.platforms.len(), generator::INITIAL_PLATFORMS as usize);
        assert_eq!(game.platforms[0].id, 0);
    }

    #[test]
    fn test_squash_factor() {
        let mut player = Player::default();
        assert_eq!(player.squash(), 1.0);
        player.vel_y = -3.0;
        assert_eq!(player.squash(), 0.85);
        player.grounded = true;
        player.vel_y = 0.0;
        assert_eq!(player.squash(), 1.15);
    }

    proptest! {
        #[test]
        fn prop_each_frame_advances_or_dies(
            seed in any::<u64>(),
            jumps in prop::collection::vec(any::<bool>(), 1..600),
        ) {
            let mut session = Session::new(ParkourGame::with_seed(ParkourTuning::default(), seed));
            session.start();
            let mut earned = 0u32;
            let mut died = false;

            for jump in jumps {
                if jump {
                    session.press(Intent::Jump);
                }
                let ticks_before = session.game().stats.ticks;
                let outcome = session.frame(&mut |n: u32| earned += n);
                let ticks_after = session.game().stats.ticks;

                match outcome {
                    FrameOutcome::Continue => {
                        prop_assert!(!died);
                        prop_assert_eq!(session.phase(), GamePhase::Playing);
                        prop_assert_eq!(ticks_after, ticks_before + 1);
                        let game = session.game();
                        if game.player.grounded {
                            prop_assert_eq!(game.player.vel_y, 0.0);
                        }
                        let ahead = generator::frontier(&game.platforms).unwrap() - game.world_x;
                        prop_assert!(ahead > 0.0);
                    }
                    FrameOutcome::Died(summary) => {
                        prop_assert!(!died);
                        died = true;
                        prop_assert_eq!(session.phase(), GamePhase::Dead);
                        prop_assert_eq!(ticks_after, ticks_before + 1);
                        prop_assert_eq!(summary.distance, session.game().stats.distance());
                    }
                    FrameOutcome::Halted => {
                        prop_assert!(died);
                        prop_assert_eq!(ticks_after, ticks_before);
                    }
                }
            }

            prop_assert_eq!(earned, session.game().stats.coins);
            prop_assert_eq!(earned % 3, 0);
        }
    }
}

//! Lane racer: dodge oncoming ducks by switching lanes
//!
//! The player's duck stays at a fixed height; enemies drop down the lanes at
//! the road speed plus one. Score is one point per tick and pays out coins
//! every 100 points.

pub mod spawner;

pub use spawner::{EnemySpawner, spawn_interval, speed_for};

use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::lane_hit;
use super::driver::Game;
use super::input::TickInput;
use super::{CoinSink, RunStats, TickOutcome};
use crate::consts::*;
use crate::rng::{RandomSource, seeded};
use crate::tuning::RacerTuning;

/// Left edge of a sprite of width `sprite_w` centred in `lane`
pub fn lane_x(lane: usize, lane_count: usize, sprite_w: f32) -> f32 {
    let lane_w = SCREEN_W / lane_count.max(1) as f32;
    lane as f32 * lane_w + lane_w / 2.0 - sprite_w / 2.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub lane: usize,
    /// Top edge in screen space (constant during a run)
    pub y: f32,
    pub alive: bool,
}

impl Player {
    fn new(lane_count: usize) -> Self {
        Self {
            lane: lane_count.max(1) / 2,
            y: RACER_Y,
            alive: true,
        }
    }
}

/// An oncoming duck
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub lane: usize,
    /// Top edge in screen space
    pub y: f32,
}

/// Complete racer simulation state
#[derive(Debug, Clone)]
pub struct RacerGame<R = Pcg32> {
    pub tuning: RacerTuning,
    pub player: Player,
    /// Active enemies in spawn order
    pub enemies: Vec<Enemy>,
    pub stats: RunStats,
    /// Current road speed
    pub speed: f32,
    /// Accumulated scroll for the lane dashes
    pub road_offset: f32,
    spawner: EnemySpawner,
    rng: R,
}

impl RacerGame<Pcg32> {
    pub fn with_seed(tuning: RacerTuning, seed: u64) -> Self {
        Self::new(tuning, seeded(seed))
    }
}

impl<R: RandomSource> RacerGame<R> {
    pub fn new(tuning: RacerTuning, rng: R) -> Self {
        let mut game = Self {
            player: Player::new(tuning.lane_count),
            enemies: Vec::new(),
            stats: RunStats::default(),
            speed: tuning.base_speed,
            road_offset: 0.0,
            spawner: EnemySpawner::new(),
            rng,
            tuning,
        };
        game.reset();
        game
    }

    fn lane_count(&self) -> usize {
        self.tuning.lane_count.max(1)
    }

    /// Apply this tick's lane requests; a move past the edge does nothing
    fn steer(&mut self, input: &TickInput) {
        if input.move_left && self.player.lane > 0 {
            self.player.lane -= 1;
        }
        if input.move_right && self.player.lane + 1 < self.lane_count() {
            self.player.lane += 1;
        }
    }

    fn crashed(&self) -> Option<&Enemy> {
        self.enemies.iter().find(|e| {
            lane_hit(
                self.player.lane,
                self.player.y,
                RACER_H,
                e.lane,
                e.y,
                ENEMY_H,
                self.tuning.hit_margin,
            )
        })
    }
}

impl<R: RandomSource> Game for RacerGame<R> {
    fn name(&self) -> &'static str {
        "Racer"
    }

    fn reset(&mut self) {
        self.player = Player::new(self.tuning.lane_count);
        self.stats = RunStats::default();
        self.speed = self.tuning.base_speed;
        self.road_offset = 0.0;
        self.spawner.reset();
        // Start with one enemy on the way so the road is never empty
        self.enemies = vec![self.spawner.spawn(&mut self.rng, &self.tuning)];
    }

    fn tick(&mut self, input: &TickInput, sink: &mut dyn CoinSink) -> TickOutcome {
        if !self.player.alive {
            return TickOutcome::Died;
        }

        self.stats.ticks += 1;
        self.road_offset += self.speed;
        self.stats.score += 1;
        self.speed = speed_for(self.stats.score, &self.tuning);

        let every = self.tuning.coin_every;
        if every > 0 && self.stats.score % every == 0 {
            let reward = self.tuning.coin_reward;
            self.stats.coins += reward;
            sink.coins_earned(reward);
        }

        self.steer(input);

        if self
            .spawner
            .due(self.stats.ticks, self.stats.score, self.enemies.len(), &self.tuning)
        {
            let enemy = self.spawner.spawn(&mut self.rng, &self.tuning);
            self.enemies.push(enemy);
        }

        let step = self.speed + 1.0;
        for enemy in &mut self.enemies {
            enemy.y += step;
        }
        self.enemies.retain(|e| e.y < SCREEN_H + ENEMY_H);
        if self.enemies.is_empty() {
            let enemy = self.spawner.spawn(&mut self.rng, &self.tuning);
            self.enemies.push(enemy);
        }

        if let Some(enemy) = self.crashed() {
            log::debug!(
                "racer crashed into enemy {} in lane {} at tick {}",
                enemy.id,
                enemy.lane,
                self.stats.ticks
            );
            self.player.alive = false;
            return TickOutcome::Died;
        }

        TickOutcome::Advanced
    }

    fn stats(&self) -> &RunStats {
        &self.stats
    }

    fn is_alive(&self) -> bool {
        self.player.alive
    }

    fn entity_count(&self) -> usize {
        self.enemies.len()
    }
}

//! Enemy spawning and the difficulty ramp
//!
//! Both the road speed and the spawn cadence are step functions of score, so
//! difficulty rises in plateaus rather than continuously.

use super::Enemy;
use crate::consts::ENEMY_H;
use crate::rng::RandomSource;
use crate::tuning::RacerTuning;

/// Road speed for a score: `base + floor(score / step_score) * step`
pub fn speed_for(score: u64, tuning: &RacerTuning) -> f32 {
    let steps = score / tuning.speed_step_score.max(1);
    tuning.base_speed + steps as f32 * tuning.speed_step
}

/// Ticks between spawns: shrinks by one every `spawn_shrink_score` points, floored
pub fn spawn_interval(score: u64, tuning: &RacerTuning) -> u64 {
    let shrink = score / tuning.spawn_shrink_score.max(1);
    tuning
        .spawn_interval
        .saturating_sub(shrink)
        .max(tuning.min_spawn_interval)
        .max(1)
}

/// Hands out enemies with monotonic ids
#[derive(Debug, Clone, Default)]
pub struct EnemySpawner {
    next_id: u32,
}

impl EnemySpawner {
    pub fn new() -> Self {
        Self { next_id: 0 }
    }

    /// Restart id allocation for a new run
    pub fn reset(&mut self) {
        self.next_id = 0;
    }

    /// Should an enemy appear on this tick?
    pub fn due(&self, ticks: u64, score: u64, active: usize, tuning: &RacerTuning) -> bool {
        active == 0 || ticks % spawn_interval(score, tuning) == 0
    }

    /// A new enemy just above the top edge in a random lane
    pub fn spawn<R: RandomSource>(&mut self, rng: &mut R, tuning: &RacerTuning) -> Enemy {
        let lanes = tuning.lane_count.max(1);
        let lane = ((rng.next_unit() * lanes as f32) as usize).min(lanes - 1);
        let id = self.next_id;
        self.next_id += 1;
        log::debug!("enemy {} spawned in lane {}", id, lane);
        Enemy {
            id,
            lane,
            y: -ENEMY_H,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::{ScriptedRandom, seeded};

    #[test]
    fn test_speed_steps_every_200() {
        let tuning = RacerTuning::default();
        assert_eq!(speed_for(0, &tuning), 3.0);
        assert_eq!(speed_for(199, &tuning), 3.0);
        assert_eq!(speed_for(200, &tuning), 3.5);
        assert_eq!(speed_for(450, &tuning), 4.0);
    }

    #[test]
    fn test_spawn_interval_shrinks_to_floor() {
        let tuning = RacerTuning::default();
        assert_eq!(spawn_interval(0, &tuning), 60);
        assert_eq!(spawn_interval(299, &tuning), 60);
        assert_eq!(spawn_interval(300, &tuning), 59);
        assert_eq!(spawn_interval(10_500, &tuning), 25);
        assert_eq!(spawn_interval(1_000_000, &tuning), 25);
    }

    #[test]
    fn test_due_on_interval_or_empty() {
        let tuning = RacerTuning::default();
        let spawner = EnemySpawner::new();
        assert!(spawner.due(60, 60, 3, &tuning));
        assert!(!spawner.due(61, 61, 3, &tuning));
        assert!(spawner.due(61, 61, 0, &tuning));
    }

    #[test]
    fn test_spawn_lane_in_range_and_ids_monotonic() {
        let tuning = RacerTuning::default();
        let mut rng = seeded(3);
        let mut spawner = EnemySpawner::new();
        let mut last = None;
        for _ in 0..500 {
            let enemy = spawner.spawn(&mut rng, &tuning);
            assert!(enemy.lane < tuning.lane_count);
            assert_eq!(enemy.y, -ENEMY_H);
            if let Some(prev) = last {
                assert!(enemy.id > prev);
            }
            last = Some(enemy.id);
        }
    }

    #[test]
    fn test_scripted_lane_choice() {
        let tuning = RacerTuning::default();
        let mut rng = ScriptedRandom::new(vec![0.0, 0.5, 0.99]);
        let mut spawner = EnemySpawner::new();
        let lanes: Vec<usize> = (0..3).map(|_| spawner.spawn(&mut rng, &tuning).lane).collect();
        assert_eq!(lanes, vec![0, 1, 2]);
    }
}

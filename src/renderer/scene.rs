//! Scene building: simulation state in, triangles out
//!
//! Building a frame only reads the game. Anything that looks animated (star
//! drift, window flicker, coin bob) is derived from the tick counter, so the
//! same state always produces the same frame.

use glam::Vec2;

use super::shapes::{self, ROUND_SEGMENTS};
use super::vertex::{Vertex, colors};
use crate::consts::*;
use crate::sim::RunStats;
use crate::sim::parkour::{ParkourGame, Platform, Player};
use crate::sim::racer::{RacerGame, lane_x};
use crate::tuning::DisplaySettings;

/// Platforms this far outside the screen are skipped
const CULL_MARGIN: f32 = 20.0;
const STAR_COUNT: usize = 30;
const BUILDING_COUNT: usize = 6;
const BUILDING_W: f32 = 70.0;
/// Background skyline repeats every this many pixels
const SKYLINE_SPAN: f32 = 720.0;
/// Ticks between window flicker changes
const FLICKER_TICKS: u64 = 30;
const SPIKE_PITCH: f32 = 18.0;
const DASH_LEN: f32 = 40.0;
const DASH_GAP: f32 = 30.0;
const EDGE_W: f32 = 4.0;

/// Counters shown beside the canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Hud {
    pub distance: u64,
    pub coins: u32,
}

impl From<&RunStats> for Hud {
    fn from(stats: &RunStats) -> Self {
        Self {
            distance: stats.distance(),
            coins: stats.coins,
        }
    }
}

/// Everything needed to present one frame
///
/// The HUD is returned as numbers; the host writes it into the page overlay.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Frame {
    pub vertices: Vec<Vertex>,
    pub hud: Hud,
}

/// A game that can describe itself as a frame
pub trait Scene {
    fn frame(&self, display: &DisplaySettings) -> Frame;
}

impl<R> Scene for ParkourGame<R> {
    fn frame(&self, display: &DisplaySettings) -> Frame {
        let ticks = if display.reduced_motion {
            0
        } else {
            self.stats.ticks
        };
        let drift_x = if display.reduced_motion {
            0.0
        } else {
            self.world_x
        };

        let mut vertices = shapes::rect(Vec2::ZERO, Vec2::new(SCREEN_W, SCREEN_H), colors::NIGHT_SKY);
        stars(&mut vertices, ticks);
        skyline(&mut vertices, drift_x, ticks);

        let pulse = (ticks as f32 * 0.1).sin() * 2.0;
        for platform in &self.platforms {
            let sx = platform.screen_x(self.world_x);
            if is_culled(sx, platform.width) {
                continue;
            }
            platform_sprite(&mut vertices, platform, sx, pulse);
        }

        let squash = if display.reduced_motion {
            1.0
        } else {
            self.player.squash()
        };
        vertices.extend(runner_sprite(&self.player, squash));

        Frame {
            vertices,
            hud: Hud::from(&self.stats),
        }
    }
}

impl<R> Scene for RacerGame<R> {
    fn frame(&self, display: &DisplaySettings) -> Frame {
        let lanes = self.tuning.lane_count.max(1);
        let offset = if display.reduced_motion {
            0.0
        } else {
            self.road_offset
        };
        let mut vertices = Vec::new();
        road(&mut vertices, lanes, offset);

        for enemy in &self.enemies {
            if enemy.y > SCREEN_H || enemy.y + ENEMY_H < 0.0 {
                continue;
            }
            let pos = Vec2::new(lane_x(enemy.lane, lanes, ENEMY_W), enemy.y);
            vertices.extend(enemy_sprite(pos));
        }
        let pos = Vec2::new(lane_x(self.player.lane, lanes, RACER_W), self.player.y);
        vertices.extend(racer_sprite(pos));

        Frame {
            vertices,
            hud: Hud::from(&self.stats),
        }
    }
}

/// Off-screen test for a platform starting at screen x `sx`
pub fn is_culled(sx: f32, width: f32) -> bool {
    sx > SCREEN_W + CULL_MARGIN || sx + width < -CULL_MARGIN
}

fn stars(out: &mut Vec<Vertex>, ticks: u64) {
    for i in 0..STAR_COUNT {
        let i = i as f32;
        let x = (i * 73.0 + ticks as f32 * 0.3) % SCREEN_W;
        let y = (i * 47.0) % (SCREEN_H * 0.7);
        out.extend(shapes::rect(Vec2::new(x, y), Vec2::splat(1.5), colors::STAR));
    }
}

fn skyline(out: &mut Vec<Vertex>, world_x: f32, ticks: u64) {
    let epoch = ticks / FLICKER_TICKS;
    for i in 0..BUILDING_COUNT {
        let fi = i as f32;
        let bx = ((fi * 120.0 - (world_x * 0.2) % SKYLINE_SPAN) + SKYLINE_SPAN) % SKYLINE_SPAN - 60.0;
        let bh = 80.0 + ((i * 37) % 120) as f32;
        let top = SCREEN_H - bh;
        out.extend(shapes::rect(
            Vec2::new(bx, top),
            Vec2::new(BUILDING_W, bh),
            colors::building(i),
        ));

        for row in 0..3 {
            for col in 0..2 {
                let color = if window_lit(i, row, col, epoch) {
                    colors::WINDOW_LIT
                } else {
                    colors::WINDOW_DARK
                };
                let pos = Vec2::new(bx + 8.0 + col as f32 * 26.0, top + 10.0 + row as f32 * 22.0);
                out.extend(shapes::rect(pos, Vec2::splat(14.0), color));
            }
        }
    }
}

/// Roughly 30% of windows are lit, reshuffled every flicker epoch
fn window_lit(building: usize, row: usize, col: usize, epoch: u64) -> bool {
    let mut h = (building as u64)
        .wrapping_mul(0x9e37_79b9_7f4a_7c15)
        .wrapping_add((row as u64) << 16)
        .wrapping_add((col as u64) << 8)
        ^ epoch.wrapping_mul(0xbf58_476d_1ce4_e5b9);
    h ^= h >> 31;
    h = h.wrapping_mul(0x94d0_49bb_1331_11eb);
    h ^= h >> 29;
    (h >> 40) as f32 / (1u64 << 24) as f32 > 0.7
}

fn platform_sprite(out: &mut Vec<Vertex>, platform: &Platform, sx: f32, pulse: f32) {
    let y = platform.y;
    out.extend(shapes::gradient_rect(
        Vec2::new(sx, y),
        Vec2::new(platform.width, PLATFORM_H),
        colors::PLATFORM_TOP,
        colors::PLATFORM_BOTTOM,
    ));
    out.extend(shapes::rect(
        Vec2::new(sx + 4.0, y + 0.25),
        Vec2::new((platform.width - 8.0).max(0.0), 1.5),
        colors::PLATFORM_GLOW,
    ));

    if platform.has_spike {
        let count = (platform.width / SPIKE_PITCH).floor() as usize;
        for i in 0..count {
            let x = sx + i as f32 * SPIKE_PITCH + 5.0;
            out.extend(shapes::triangle(
                Vec2::new(x, y),
                Vec2::new(x + 8.0, y - 14.0),
                Vec2::new(x + 16.0, y),
                colors::SPIKE,
            ));
        }
    }

    if platform.has_coin && !platform.coin_collected {
        let center = Vec2::new(sx + platform.width / 2.0, y - 20.0 + pulse);
        out.extend(shapes::circle(center, 10.0, colors::COIN, ROUND_SEGMENTS));
        out.extend(shapes::circle(center, 4.0, colors::COIN_MARK, ROUND_SEGMENTS));
    }
}

/// The parkour duck, squashed by `(s, 2 - s)` about its centre
pub fn runner_sprite(player: &Player, squash: f32) -> Vec<Vertex> {
    let d = DUCK_SIZE;
    let at = |x: f32, y: f32| player.pos + Vec2::new(x * d, y * d);

    let mut v = shapes::ellipse(at(0.5, 0.65), Vec2::new(0.45 * d, 0.35 * d), colors::DUCK, 24);
    v.extend(shapes::circle(at(0.5, 0.28), 0.25 * d, colors::DUCK, 20));
    v.extend(shapes::triangle(
        at(0.75, 0.28),
        at(0.95, 0.32),
        at(0.75, 0.36),
        colors::BEAK,
    ));
    v.extend(shapes::circle(at(0.62, 0.23), 2.5, colors::EYE, ROUND_SEGMENTS));

    let center = player.pos + Vec2::splat(d / 2.0);
    shapes::scale_about(&mut v, center, Vec2::new(squash, 2.0 - squash));
    v
}

fn road(out: &mut Vec<Vertex>, lanes: usize, offset: f32) {
    out.extend(shapes::rect(Vec2::ZERO, Vec2::new(SCREEN_W, SCREEN_H), colors::ROAD));

    let lane_w = SCREEN_W / lanes as f32;
    let period = DASH_LEN + DASH_GAP;
    for lane in 1..lanes {
        let x = lane as f32 * lane_w - 2.0;
        let mut y = offset.rem_euclid(period) - period;
        while y < SCREEN_H {
            out.extend(shapes::rect(Vec2::new(x, y), Vec2::new(4.0, DASH_LEN), colors::LANE_DASH));
            y += period;
        }
    }

    out.extend(shapes::rect(Vec2::ZERO, Vec2::new(EDGE_W, SCREEN_H), colors::ROAD_EDGE));
    out.extend(shapes::rect(
        Vec2::new(SCREEN_W - EDGE_W, 0.0),
        Vec2::new(EDGE_W, SCREEN_H),
        colors::ROAD_EDGE,
    ));
}

/// The racer duck (top-left at `pos`), facing right, with two wheels
pub fn racer_sprite(pos: Vec2) -> Vec<Vertex> {
    let (w, h) = (RACER_W, RACER_H);
    let at = |x: f32, y: f32| pos + Vec2::new(x, y);

    let mut v = shapes::ellipse(at(w / 2.0, h * 0.6), Vec2::new(w / 2.0, h * 0.4), colors::DUCK, 24);
    v.extend(shapes::circle(at(w / 2.0, h * 0.22), w * 0.28, colors::DUCK, 20));
    v.extend(shapes::triangle(
        at(w / 2.0 + w * 0.28, h * 0.22),
        at(w / 2.0 + w * 0.48, h * 0.26),
        at(w / 2.0 + w * 0.28, h * 0.3),
        colors::BEAK,
    ));
    v.extend(shapes::circle(at(w / 2.0 + 4.0, h * 0.18), 3.0, colors::EYE, ROUND_SEGMENTS));
    for wheel in [at(8.0, h - 8.0), at(w - 14.0, h - 8.0)] {
        v.extend(shapes::circle(wheel, 7.0, colors::WHEEL, ROUND_SEGMENTS));
        v.extend(shapes::circle(wheel, 3.0, colors::HUB, ROUND_SEGMENTS));
    }
    v
}

/// An oncoming duck (top-left at `pos`), facing left
pub fn enemy_sprite(pos: Vec2) -> Vec<Vertex> {
    let (w, h) = (ENEMY_W, ENEMY_H);
    let at = |x: f32, y: f32| pos + Vec2::new(x, y);
    let eye = at(w / 2.0 - 4.0, h * 0.19);

    let mut v = shapes::ellipse(at(w / 2.0, h * 0.6), Vec2::new(w / 2.0, h * 0.38), colors::ENEMY, 24);
    v.extend(shapes::circle(at(w / 2.0, h * 0.24), w * 0.26, colors::ENEMY, 20));
    v.extend(shapes::triangle(
        at(w / 2.0 - w * 0.28, h * 0.22),
        at(w / 2.0 - w * 0.5, h * 0.26),
        at(w / 2.0 - w * 0.28, h * 0.3),
        colors::ENEMY_BEAK,
    ));
    v.extend(shapes::circle(eye, 3.0, colors::EYE, ROUND_SEGMENTS));
    v.extend(shapes::circle(eye, 1.5, colors::ENEMY, ROUND_SEGMENTS));
    v
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::ScriptedRandom;
    use crate::sim::Game;
    use crate::sim::racer::Enemy;
    use crate::tuning::{ParkourTuning, RacerTuning};

    fn parkour() -> ParkourGame<ScriptedRandom> {
        ParkourGame::new(ParkourTuning::default(), ScriptedRandom::constant(0.5))
    }

    fn racer() -> RacerGame<ScriptedRandom> {
        RacerGame::new(RacerTuning::default(), ScriptedRandom::constant(0.0))
    }

    fn platform(id: u32, x: f32) -> Platform {
        Platform {
            id,
            x,
            y: 300.0,
            width: 90.0,
            has_spike: false,
            has_coin: true,
            coin_collected: false,
        }
    }

    #[test]
    fn test_culling_bounds() {
        assert!(!is_culled(SCREEN_W + CULL_MARGIN, 50.0));
        assert!(is_culled(SCREEN_W + CULL_MARGIN + 1.0, 50.0));
        assert!(!is_culled(-70.0, 50.0));
        assert!(is_culled(-71.0, 50.0));
    }

    #[test]
    fn test_offscreen_platform_adds_nothing() {
        let display = DisplaySettings::default();
        let mut game = parkour();
        let base = game.frame(&display).vertices.len();

        game.platforms.push(platform(100, game.world_x + SCREEN_W + 25.0));
        assert_eq!(game.frame(&display).vertices.len(), base);

        game.platforms.push(platform(101, game.world_x + 100.0));
        assert!(game.frame(&display).vertices.len() > base);
    }

    #[test]
    fn test_collected_coin_not_drawn() {
        let display = DisplaySettings::default();
        let mut game = parkour();
        game.platforms = vec![platform(1, 100.0)];
        let with_coin = game.frame(&display).vertices.len();
        game.platforms[0].coin_collected = true;
        let without = game.frame(&display).vertices.len();
        assert_eq!(with_coin - without, 2 * 3 * ROUND_SEGMENTS as usize);
    }

    #[test]
    fn test_frame_is_pure() {
        let display = DisplaySettings::default();
        let mut game = parkour();
        for _ in 0..40 {
            game.tick(&Default::default(), &mut |_: u32| {});
        }
        let platforms = game.platforms.clone();
        let stats = game.stats.clone();
        let first = game.frame(&display);
        let second = game.frame(&display);
        assert_eq!(first, second);
        assert_eq!(game.platforms, platforms);
        assert_eq!(game.stats, stats);
    }

    #[test]
    fn test_hud_tracks_stats() {
        let display = DisplaySettings::default();
        let mut game = racer();
        game.player.lane = 2;
        for _ in 0..250 {
            game.tick(&Default::default(), &mut |_: u32| {});
        }
        let hud = game.frame(&display).hud;
        assert_eq!(hud.distance, game.stats.distance());
        assert_eq!(hud, Hud { distance: 25, coins: 10 });
    }

    #[test]
    fn test_squash_about_centre() {
        let player = Player {
            grounded: true,
            ..Player::default()
        };
        let plain = shapes::extent(&runner_sprite(&player, 1.0)).unwrap();
        let squashed = shapes::extent(&runner_sprite(&player, player.squash())).unwrap();
        // Wider and shorter, centred on the same point
        assert!(squashed.1.x - squashed.0.x > plain.1.x - plain.0.x);
        assert!(squashed.1.y - squashed.0.y < plain.1.y - plain.0.y);
        let centre = player.pos + Vec2::splat(DUCK_SIZE / 2.0);
        let plain_mid = (plain.0 + plain.1) / 2.0 - centre;
        let squashed_mid = (squashed.0 + squashed.1) / 2.0 - centre;
        assert!((squashed_mid.x - plain_mid.x * 1.15).abs() < 1e-3);
    }

    #[test]
    fn test_reduced_motion_freezes_background() {
        let reduced = DisplaySettings {
            reduced_motion: true,
            ..Default::default()
        };
        let mut game = parkour();
        game.player.grounded = true;
        let before = game.frame(&reduced);
        game.stats.ticks += 100;
        let after = game.frame(&reduced);
        assert_eq!(before, after);

        let animated = game.frame(&DisplaySettings::default());
        assert_ne!(animated, after);
    }

    #[test]
    fn test_racer_enemy_sprites() {
        let display = DisplaySettings::default();
        let mut game = racer();
        game.enemies.clear();
        let base = game.frame(&display).vertices.len();
        game.enemies.push(Enemy { id: 7, lane: 0, y: 100.0 });
        let one = game.frame(&display).vertices.len();
        assert_eq!(one - base, enemy_sprite(Vec2::ZERO).len());

        let (lo, hi) = shapes::extent(&enemy_sprite(Vec2::new(10.0, 20.0))).unwrap();
        assert!(lo.x >= 10.0 - 1e-3 && hi.x <= 10.0 + ENEMY_W + 1e-3);
        assert!(lo.y >= 20.0 && hi.y <= 20.0 + ENEMY_H);
    }

    #[test]
    fn test_racer_skips_offscreen_enemies() {
        let display = DisplaySettings::default();
        let mut game = racer();
        game.enemies.clear();
        let base = game.frame(&display).vertices.len();
        game.enemies.push(Enemy { id: 1, lane: 1, y: SCREEN_H + 1.0 });
        game.enemies.push(Enemy { id: 2, lane: 2, y: -ENEMY_H - 1.0 });
        assert_eq!(game.frame(&display).vertices.len(), base);
    }

    #[test]
    fn test_reduced_motion_freezes_road() {
        let reduced = DisplaySettings {
            reduced_motion: true,
            ..Default::default()
        };
        let mut game = racer();
        game.enemies.clear();
        let before = game.frame(&reduced);
        game.road_offset += 17.0;
        assert_eq!(game.frame(&reduced), before);
        assert_ne!(game.frame(&DisplaySettings::default()), before);
    }

    #[test]
    fn test_window_flicker_is_deterministic() {
        let windows = || {
            (0..50u64).flat_map(|epoch| {
                (0..BUILDING_COUNT)
                    .flat_map(move |b| (0..6).map(move |w| window_lit(b, w / 2, w % 2, epoch)))
            })
        };
        assert!(windows().eq(windows()));
        let lit = windows().filter(|&on| on).count() as f32 / (50 * BUILDING_COUNT * 6) as f32;
        assert!((0.05..0.6).contains(&lit), "lit fraction {}", lit);
    }
}

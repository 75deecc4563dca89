//! Collision tests for screen-space boxes
//!
//! Everything here works in screen coordinates (y grows downward). World
//! positions are converted with `world_x - world_offset` before testing.

use glam::Vec2;

/// Axis-aligned box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    /// Box from its top-left corner and size
    #[inline]
    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self {
            min: pos,
            max: pos + size,
        }
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    /// Strict overlap: touching edges do not count
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }

    /// Shrink horizontally by `inset` on each side
    #[inline]
    pub fn inset_x(&self, inset: f32) -> Aabb {
        Aabb {
            min: Vec2::new(self.min.x + inset, self.min.y),
            max: Vec2::new(self.max.x - inset, self.max.y),
        }
    }
}

/// Does a falling body come to rest on top of a platform this tick?
///
/// `body` is the player box after integration, `platform` the slab in screen
/// space. The body must overlap the platform horizontally (inset by `inset`
/// on both sides) and its bottom edge must sit inside a band as deep as the
/// slab plus this tick's fall distance, so fast falls cannot tunnel through.
/// Rising bodies pass through from below.
pub fn lands_on(body: &Aabb, vel_y: f32, platform: &Aabb, inset: f32) -> bool {
    if vel_y < 0.0 {
        return false;
    }
    let top = platform.inset_x(inset);
    body.max.x > top.min.x
        && body.min.x < top.max.x
        && body.max.y > platform.min.y
        && body.max.y < platform.max.y + vel_y + 2.0
}

/// Same-lane vertical overlap with `margin` of forgiveness on each edge
pub fn lane_hit(
    player_lane: usize,
    player_top: f32,
    player_h: f32,
    enemy_lane: usize,
    enemy_top: f32,
    enemy_h: f32,
    margin: f32,
) -> bool {
    player_lane == enemy_lane
        && enemy_top + enemy_h > player_top + margin
        && enemy_top < player_top + player_h - margin
}

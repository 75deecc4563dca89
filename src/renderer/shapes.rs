//! Shape generation for 2D primitives
//!
//! Everything is emitted as a triangle list in screen space.

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::Vertex;

/// Segments used for small round things (eyes, hubs, coins)
pub const ROUND_SEGMENTS: u32 = 16;

/// Axis-aligned rectangle from its top-left corner
pub fn rect(pos: Vec2, size: Vec2, color: [f32; 4]) -> Vec<Vertex> {
    gradient_rect(pos, size, color, color)
}

/// Rectangle with a vertical gradient from `top` to `bottom`
pub fn gradient_rect(pos: Vec2, size: Vec2, top: [f32; 4], bottom: [f32; 4]) -> Vec<Vertex> {
    let (x0, y0) = (pos.x, pos.y);
    let (x1, y1) = (pos.x + size.x, pos.y + size.y);
    vec![
        Vertex::new(x0, y0, top),
        Vertex::new(x0, y1, bottom),
        Vertex::new(x1, y0, top),
        Vertex::new(x1, y0, top),
        Vertex::new(x0, y1, bottom),
        Vertex::new(x1, y1, bottom),
    ]
}

pub fn triangle(a: Vec2, b: Vec2, c: Vec2, color: [f32; 4]) -> Vec<Vertex> {
    vec![
        Vertex::new(a.x, a.y, color),
        Vertex::new(b.x, b.y, color),
        Vertex::new(c.x, c.y, color),
    ]
}

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    ellipse(center, Vec2::splat(radius), color, segments)
}

/// Filled ellipse with horizontal/vertical radii
pub fn ellipse(center: Vec2, radii: Vec2, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let segments = segments.max(3);
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        // Triangle from center to edge
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(
            center.x + radii.x * theta1.cos(),
            center.y + radii.y * theta1.sin(),
            color,
        ));
        vertices.push(Vertex::new(
            center.x + radii.x * theta2.cos(),
            center.y + radii.y * theta2.sin(),
            color,
        ));
    }

    vertices
}

/// Scale already-built vertices about `origin`
pub fn scale_about(vertices: &mut [Vertex], origin: Vec2, scale: Vec2) {
    for v in vertices {
        let p = (Vec2::from(v.position) - origin) * scale + origin;
        v.position = p.into();
    }
}

/// Bounding box of a vertex set as `(min, max)`
pub fn extent(vertices: &[Vertex]) -> Option<(Vec2, Vec2)> {
    let mut iter = vertices.iter().map(|v| Vec2::from(v.position));
    let first = iter.next()?;
    Some(iter.fold((first, first), |(lo, hi), p| (lo.min(p), hi.max(p))))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vec2, b: Vec2) -> bool {
        (a - b).abs().max_element() < 1e-3
    }

    #[test]
    fn test_rect_covers_exact_box() {
        let v = rect(Vec2::new(10.0, 20.0), Vec2::new(30.0, 5.0), [1.0; 4]);
        assert_eq!(v.len(), 6);
        let (lo, hi) = extent(&v).unwrap();
        assert_eq!(lo, Vec2::new(10.0, 20.0));
        assert_eq!(hi, Vec2::new(40.0, 25.0));
    }

    #[test]
    fn test_gradient_rect_colors_by_edge() {
        let top = [1.0, 0.0, 0.0, 1.0];
        let bottom = [0.0, 0.0, 1.0, 1.0];
        for v in gradient_rect(Vec2::ZERO, Vec2::new(4.0, 2.0), top, bottom) {
            let expected = if v.position[1] == 0.0 { top } else { bottom };
            assert_eq!(v.color, expected);
        }
    }

    #[test]
    fn test_ellipse_extent() {
        let v = ellipse(Vec2::new(50.0, 50.0), Vec2::new(20.0, 10.0), [1.0; 4], 32);
        assert_eq!(v.len(), 96);
        let (lo, hi) = extent(&v).unwrap();
        assert!(approx(lo, Vec2::new(30.0, 40.0)));
        assert!(approx(hi, Vec2::new(70.0, 60.0)));
    }

    #[test]
    fn test_scale_about_keeps_origin_fixed() {
        let mut v = rect(Vec2::new(0.0, 0.0), Vec2::new(20.0, 20.0), [1.0; 4]);
        scale_about(&mut v, Vec2::new(10.0, 10.0), Vec2::new(1.15, 0.85));
        let (lo, hi) = extent(&v).unwrap();
        assert!(approx(lo, Vec2::new(-1.5, 1.5)));
        assert!(approx(hi, Vec2::new(21.5, 18.5)));
    }

    #[test]
    fn test_extent_of_nothing() {
        assert_eq!(extent(&[]), None);
    }
}

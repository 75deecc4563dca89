//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Simple 2D vertex with position and color
///
/// Scenes emit positions in logical screen space (340x480, y down); the
/// pipeline maps them to NDC at upload time.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
            wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x4];

        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &ATTRIBUTES,
        }
    }
}

/// `0xRRGGBB` plus alpha as a linear-ish float color
pub const fn hex(rgb: u32, alpha: f32) -> [f32; 4] {
    [
        ((rgb >> 16) & 0xff) as f32 / 255.0,
        ((rgb >> 8) & 0xff) as f32 / 255.0,
        (rgb & 0xff) as f32 / 255.0,
        alpha,
    ]
}

/// Colors for game elements
pub mod colors {
    use super::hex;

    pub const NIGHT_SKY: [f32; 4] = hex(0x07070f, 1.0);
    pub const STAR: [f32; 4] = [1.0, 1.0, 1.0, 0.4];
    pub const WINDOW_LIT: [f32; 4] = hex(0xffd93d, 0.6);
    pub const WINDOW_DARK: [f32; 4] = [1.0, 1.0, 1.0, 0.08];

    pub const PLATFORM_TOP: [f32; 4] = hex(0x7b2fbe, 1.0);
    pub const PLATFORM_BOTTOM: [f32; 4] = hex(0x4a1a7a, 1.0);
    pub const PLATFORM_GLOW: [f32; 4] = hex(0x7b2fbe, 0.8);
    pub const SPIKE: [f32; 4] = hex(0xff3cac, 1.0);
    pub const COIN: [f32; 4] = hex(0xffd93d, 1.0);
    pub const COIN_MARK: [f32; 4] = hex(0xff6b35, 1.0);

    pub const DUCK: [f32; 4] = hex(0xffd93d, 1.0);
    pub const BEAK: [f32; 4] = hex(0xff6b35, 1.0);
    pub const EYE: [f32; 4] = hex(0x0d0d1a, 1.0);

    pub const ROAD: [f32; 4] = hex(0x1a1a2e, 1.0);
    pub const LANE_DASH: [f32; 4] = hex(0xffd93d, 0.25);
    pub const ROAD_EDGE: [f32; 4] = hex(0xff6b35, 1.0);
    pub const WHEEL: [f32; 4] = hex(0x333333, 1.0);
    pub const HUB: [f32; 4] = hex(0x555555, 1.0);
    pub const ENEMY: [f32; 4] = hex(0xff3cac, 1.0);
    pub const ENEMY_BEAK: [f32; 4] = hex(0x7b2fbe, 1.0);

    /// Background buildings get darker-to-lighter purples by index
    pub fn building(index: usize) -> [f32; 4] {
        let i = index as f32;
        [
            (20.0 + i * 5.0) / 255.0,
            (10.0 + i * 3.0) / 255.0,
            (40.0 + i * 4.0) / 255.0,
            0.8,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_channels() {
        assert_eq!(hex(0xff0000, 1.0), [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(hex(0x00ff00, 0.5), [0.0, 1.0, 0.0, 0.5]);
        assert_eq!(hex(0x0000ff, 0.0)[2], 1.0);
    }

    #[test]
    fn test_vertex_layout_matches_struct() {
        let desc = Vertex::desc();
        assert_eq!(desc.array_stride, 24);
        assert_eq!(desc.attributes.len(), 2);
        assert_eq!(desc.attributes[1].offset, 8);
    }
}

//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Simple 2D vertex with position and color
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
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Colors for game elements
pub mod colors {
    pub const BACKGROUND: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
    pub const ROW_SEGMENT: [f32; 4] = [0.25, 0.25, 0.25, 1.0];
    pub const PILLAR: [f32; 4] = [0.55, 0.35, 0.2, 1.0]; // Brown
    pub const PLAYER: [f32; 4] = [0.0, 0.5, 0.5, 1.0]; // Teal placeholder
    pub const GRAPPLE_LINE: [f32; 4] = [0.9, 0.9, 0.9, 1.0];
    pub const MISS_LINE: [f32; 4] = [0.6, 0.6, 0.6, 1.0];
    pub const OVERLAY_BG: [f32; 4] = [0.0, 0.0, 0.0, 0.6];
    pub const BUTTON: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    pub const DEBUG_OUTLINE: [f32; 4] = [0.2, 1.0, 0.2, 0.8];

    /// Same color with a different alpha
    pub fn with_alpha(color: [f32; 4], alpha: f32) -> [f32; 4] {
        [color[0], color[1], color[2], alpha]
    }
}

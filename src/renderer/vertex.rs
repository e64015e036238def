//! Vertex format shared by the canvas and the wgpu pipeline

use bytemuck::{Pod, Zeroable};

/// Pixel-space position plus RGBA fill
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x4];

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
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Fill colors for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub background: [f32; 4],
    pub grid_line: [f32; 4],
    pub obstacle: [f32; 4],
    pub food: [f32; 4],
    pub body: [f32; 4],
    pub head: [f32; 4],
}

impl Palette {
    pub const STANDARD: Palette = Palette {
        background: [0.0, 0.0, 0.0, 1.0],
        grid_line: [0.2, 0.2, 0.2, 1.0],
        obstacle: [0.5, 0.5, 0.5, 1.0],
        food: [1.0, 0.0, 0.0, 1.0],
        body: [0.0, 0.8, 0.0, 1.0],
        head: [0.0, 1.0, 0.0, 1.0],
    };

    pub const HIGH_CONTRAST: Palette = Palette {
        background: [0.0, 0.0, 0.0, 1.0],
        grid_line: [0.35, 0.35, 0.35, 1.0],
        obstacle: [1.0, 1.0, 1.0, 1.0],
        food: [1.0, 0.85, 0.0, 1.0],
        body: [0.0, 0.6, 1.0, 1.0],
        head: [0.0, 1.0, 1.0, 1.0],
    };

    pub fn for_contrast(high_contrast: bool) -> Self {
        if high_contrast {
            Self::HIGH_CONTRAST
        } else {
            Self::STANDARD
        }
    }
}

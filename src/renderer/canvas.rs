//! Raster surface abstraction
//!
//! `draw_frame` only talks to [`Canvas`]. The browser build paints through
//! [`VertexCanvas`], which turns every call into triangles for the wgpu
//! pipeline; tests record the calls instead.

use glam::Vec2;

use super::shapes;
use super::vertex::Vertex;

/// Drawing operations in surface pixels, origin at the top-left
pub trait Canvas {
    /// Surface size in pixels
    fn size(&self) -> (u32, u32);

    /// Discard everything and fill the whole surface
    fn clear(&mut self, color: [f32; 4]);

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: [f32; 4]);

    fn line(&mut self, from: (f32, f32), to: (f32, f32), width: f32, color: [f32; 4]);
}

/// Accumulates a frame as a triangle list
#[derive(Debug, Clone, Default)]
pub struct VertexCanvas {
    size: (u32, u32),
    clear_color: [f32; 4],
    vertices: Vec<Vertex>,
}

impl VertexCanvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            size: (width, height),
            clear_color: [0.0, 0.0, 0.0, 1.0],
            vertices: Vec::new(),
        }
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn clear_color(&self) -> [f32; 4] {
        self.clear_color
    }
}

impl Canvas for VertexCanvas {
    fn size(&self) -> (u32, u32) {
        self.size
    }

    fn clear(&mut self, color: [f32; 4]) {
        self.clear_color = color;
        self.vertices.clear();
        let (w, h) = self.size;
        self.vertices
            .extend(shapes::rect(Vec2::ZERO, Vec2::new(w as f32, h as f32), color));
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: [f32; 4]) {
        self.vertices
            .extend(shapes::rect(Vec2::new(x, y), Vec2::new(w, h), color));
    }

    fn line(&mut self, from: (f32, f32), to: (f32, f32), width: f32, color: [f32; 4]) {
        self.vertices.extend(shapes::line(
            Vec2::new(from.0, from.1),
            Vec2::new(to.0, to.1),
            width,
            color,
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clear_resets_frame() {
        let mut canvas = VertexCanvas::new(100, 50);
        canvas.fill_rect(0.0, 0.0, 10.0, 10.0, [1.0; 4]);
        canvas.clear([0.0, 0.0, 0.0, 1.0]);
        assert_eq!(canvas.vertices().len(), 6);
        canvas.fill_rect(0.0, 0.0, 10.0, 10.0, [1.0; 4]);
        canvas.line((0.0, 0.0), (100.0, 0.0), 1.0, [1.0; 4]);
        assert_eq!(canvas.vertices().len(), 18);
    }
}

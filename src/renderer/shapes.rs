//! Triangle generation for axis-aligned 2D primitives

use glam::Vec2;

use super::vertex::Vertex;

/// Two triangles covering `[min, max]`
pub fn quad(min: Vec2, max: Vec2, color: [f32; 4]) -> [Vertex; 6] {
    [
        Vertex::new(min.x, min.y, color),
        Vertex::new(max.x, min.y, color),
        Vertex::new(min.x, max.y, color),
        Vertex::new(min.x, max.y, color),
        Vertex::new(max.x, min.y, color),
        Vertex::new(max.x, max.y, color),
    ]
}

/// Filled rectangle from its top-left corner; empty for non-positive sizes
pub fn rect(origin: Vec2, size: Vec2, color: [f32; 4]) -> Vec<Vertex> {
    if size.x <= 0.0 || size.y <= 0.0 {
        return Vec::new();
    }
    quad(origin, origin + size, color).to_vec()
}

/// Line segment drawn as a quad of the given width
pub fn line(from: Vec2, to: Vec2, width: f32, color: [f32; 4]) -> Vec<Vertex> {
    let dir = (to - from).normalize_or_zero();
    if dir == Vec2::ZERO || width <= 0.0 {
        return Vec::new();
    }

    // Perpendicular for width
    let half = Vec2::new(-dir.y, dir.x) * (width * 0.5);

    let a = from + half;
    let b = from - half;
    let c = to + half;
    let d = to - half;

    vec![
        Vertex::new(a.x, a.y, color),
        Vertex::new(b.x, b.y, color),
        Vertex::new(c.x, c.y, color),
        Vertex::new(c.x, c.y, color),
        Vertex::new(b.x, b.y, color),
        Vertex::new(d.x, d.y, color),
    ]
}

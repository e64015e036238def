//! Board rendering
//!
//! `frame` paints through the `Canvas` trait; the wgpu pipeline uploads what
//! a `VertexCanvas` collected.

pub mod canvas;
pub mod frame;
pub mod pipeline;
pub mod shapes;
pub mod vertex;

pub use canvas::{Canvas, VertexCanvas};
pub use frame::draw_frame;
pub use pipeline::RenderState;
pub use vertex::{Palette, Vertex};

//! Full-frame painting
//!
//! Every call repaints the whole surface: clear, grid lines, obstacles, food,
//! snake body, then the head. Nothing is cached between frames.

use super::canvas::Canvas;
use super::vertex::Palette;
use crate::consts::CELL_GAP;
use crate::settings::Settings;
use crate::sim::{Cell, GameState, GridLayout};

const GRID_LINE_WIDTH: f32 = 1.0;

/// Paint `state` onto `canvas`
pub fn draw_frame(state: &GameState, layout: &GridLayout, settings: &Settings, canvas: &mut impl Canvas) {
    let palette = Palette::for_contrast(settings.high_contrast);

    canvas.clear(palette.background);

    if settings.show_grid_lines {
        draw_grid_lines(layout, palette.grid_line, canvas);
    }

    for &cell in &state.obstacles {
        fill_cell(layout, cell, palette.obstacle, canvas);
    }

    if let Some(food) = state.food {
        fill_cell(layout, food, palette.food, canvas);
    }

    for &cell in state.snake.body() {
        fill_cell(layout, cell, palette.body, canvas);
    }
    if !state.snake.is_empty() {
        fill_cell(layout, state.snake.head(), palette.head, canvas);
    }
}

fn draw_grid_lines(layout: &GridLayout, color: [f32; 4], canvas: &mut impl Canvas) {
    let (w, h) = layout.surface_size();
    let (w, h) = (w as f32, h as f32);
    let edge = layout.cell_size as f32;

    for col in 0..=layout.grid.cols {
        let x = col as f32 * edge;
        canvas.line((x, 0.0), (x, h), GRID_LINE_WIDTH, color);
    }
    for row in 0..=layout.grid.rows {
        let y = row as f32 * edge;
        canvas.line((0.0, y), (w, y), GRID_LINE_WIDTH, color);
    }
}

/// Cell interior, inset by half the gap on every side
fn fill_cell(layout: &GridLayout, cell: Cell, color: [f32; 4], canvas: &mut impl Canvas) {
    let (x, y) = layout.cell_origin(cell);
    let inset = CELL_GAP * 0.5;
    let side = layout.cell_size as f32 - CELL_GAP;
    canvas.fill_rect(x + inset, y + inset, side, side, color);
}

//! Game state and core simulation types
//!
//! One `GameState` lives for exactly one session. It owns the snake, the food
//! and the obstacle set, and is only mutated by `tick`, the input controller
//! and the session coordinator.

use std::collections::VecDeque;

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::grid::{Cell, Grid};
use super::spawn::{self, ObstacleSet};
use crate::consts::INITIAL_SNAKE_LENGTH;
use crate::error::SnakeError;

/// Movement direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Unit step in grid coordinates (y grows downward)
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    /// Cell one step away from `cell`
    pub fn step(self, cell: Cell) -> Cell {
        let (dx, dy) = self.delta();
        cell.offset(dx, dy)
    }
}

/// Session lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Board created, waiting for the first direction key
    Idle,
    /// Ticks advance the snake
    Running,
    /// Ticks and timer suspended, state frozen
    Paused,
    /// Terminal
    Ended,
}

/// Why a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndReason {
    WallCollision,
    SelfCollision,
    ObstacleCollision,
    /// Player quit
    Quit,
    /// A level-specific win condition fired
    LevelCleared,
    /// No free cell left for food
    BoardFull,
}

impl EndReason {
    /// Only a level clear counts as a completed session
    pub fn completed(self) -> bool {
        self == EndReason::LevelCleared
    }

    pub fn is_collision(self) -> bool {
        matches!(
            self,
            EndReason::WallCollision | EndReason::SelfCollision | EndReason::ObstacleCollision
        )
    }
}

/// Snake body, head first
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snake {
    body: VecDeque<Cell>,
}

impl Snake {
    pub fn from_cells(cells: impl IntoIterator<Item = Cell>) -> Self {
        Self {
            body: cells.into_iter().collect(),
        }
    }

    /// Horizontal snake centred on the grid, facing right
    pub fn centered(grid: &Grid) -> Result<Self, SnakeError> {
        let cx = (grid.cols / 2) as i32;
        let cy = (grid.rows / 2) as i32;
        if cx + 1 < INITIAL_SNAKE_LENGTH as i32 {
            return Err(SnakeError::GridTooSmall {
                cols: grid.cols,
                rows: grid.rows,
            });
        }
        Ok(Self::from_cells(
            (0..INITIAL_SNAKE_LENGTH as i32).map(|i| Cell::new(cx - i, cy)),
        ))
    }

    pub fn head(&self) -> Cell {
        self.body[0]
    }

    pub fn tail(&self) -> Cell {
        self.body[self.body.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.body.contains(&cell)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Cell> {
        self.body.iter()
    }

    /// Body without the head
    pub fn body(&self) -> impl Iterator<Item = &Cell> {
        self.body.iter().skip(1)
    }

    pub(crate) fn push_head(&mut self, cell: Cell) {
        self.body.push_front(cell);
    }

    pub(crate) fn pop_tail(&mut self) -> Option<Cell> {
        self.body.pop_back()
    }
}

impl<'a> IntoIterator for &'a Snake {
    type Item = &'a Cell;
    type IntoIter = std::collections::vec_deque::Iter<'a, Cell>;

    fn into_iter(self) -> Self::IntoIter {
        self.body.iter()
    }
}

/// Complete per-session game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub grid: Grid,
    pub snake: Snake,
    /// Absent only while being regenerated
    pub food: Option<Cell>,
    /// Fixed for the session
    pub obstacles: ObstacleSet,
    /// Direction applied on the last tick
    pub direction: Direction,
    /// Buffered direction for the next tick
    pub pending_direction: Direction,
    pub phase: GamePhase,
    pub end_reason: Option<EndReason>,
    pub score: u64,
    pub food_eaten: u32,
    pub elapsed_secs: u32,
    /// Simulation tick counter
    pub time_ticks: u64,
    rng: Pcg32,
}

impl GameState {
    /// New session board: centred snake, then food, then `obstacle_count` obstacles
    pub fn new(grid: Grid, obstacle_count: usize, seed: u64) -> Result<Self, SnakeError> {
        let mut rng = Pcg32::seed_from_u64(seed);
        let snake = Snake::centered(&grid)?;
        let food = spawn::place_food(&mut rng, &grid, &snake, &ObstacleSet::new())?;
        let obstacles = spawn::place_obstacles(&mut rng, &grid, &snake, Some(food), obstacle_count)?;

        Ok(Self::assemble(grid, snake, Some(food), obstacles, Direction::Right, seed, rng))
    }

    /// Build a state from explicit pieces (scenarios, replays)
    pub fn from_parts(
        grid: Grid,
        snake: Snake,
        food: Option<Cell>,
        obstacles: ObstacleSet,
        direction: Direction,
        seed: u64,
    ) -> Result<Self, SnakeError> {
        if snake.len() < INITIAL_SNAKE_LENGTH {
            return Err(SnakeError::SnakeTooShort {
                len: snake.len(),
                min: INITIAL_SNAKE_LENGTH,
            });
        }
        let rng = Pcg32::seed_from_u64(seed);
        Ok(Self::assemble(grid, snake, food, obstacles, direction, seed, rng))
    }

    fn assemble(
        grid: Grid,
        snake: Snake,
        food: Option<Cell>,
        obstacles: ObstacleSet,
        direction: Direction,
        seed: u64,
        rng: Pcg32,
    ) -> Self {
        Self {
            seed,
            grid,
            snake,
            food,
            obstacles,
            direction,
            pending_direction: direction,
            phase: GamePhase::Idle,
            end_reason: None,
            score: 0,
            food_eaten: 0,
            elapsed_secs: 0,
            time_ticks: 0,
            rng,
        }
    }

    /// Regenerate food off every occupied cell
    pub fn respawn_food(&mut self) -> Result<Cell, SnakeError> {
        self.food = None;
        let food = spawn::place_food(&mut self.rng, &self.grid, &self.snake, &self.obstacles)?;
        self.food = Some(food);
        Ok(food)
    }

    /// Buffer a direction for the next tick
    ///
    /// Rejects the exact reverse of the applied direction and of the
    /// direction already buffered this interval.
    pub fn buffer_direction(&mut self, direction: Direction) -> bool {
        if direction == self.direction.opposite() || direction == self.pending_direction.opposite() {
            return false;
        }
        self.pending_direction = direction;
        true
    }

    /// Idle -> Running
    pub fn start(&mut self) -> bool {
        if self.phase != GamePhase::Idle {
            return false;
        }
        self.phase = GamePhase::Running;
        true
    }

    /// Running <-> Paused; ignored in other phases
    pub fn toggle_pause(&mut self) -> bool {
        match self.phase {
            GamePhase::Running => self.phase = GamePhase::Paused,
            GamePhase::Paused => self.phase = GamePhase::Running,
            GamePhase::Idle | GamePhase::Ended => return false,
        }
        true
    }

    /// One-way transition to Ended; false if already ended
    pub fn end(&mut self, reason: EndReason) -> bool {
        if self.phase == GamePhase::Ended {
            return false;
        }
        self.phase = GamePhase::Ended;
        self.end_reason = Some(reason);
        true
    }

    /// One wall-clock second while running
    pub fn advance_clock(&mut self) {
        if self.phase == GamePhase::Running {
            self.elapsed_secs += 1;
        }
    }

    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::Ended
    }

    /// True if the cell holds snake, obstacle or food
    pub fn is_occupied(&self, cell: Cell) -> bool {
        self.grid.is_occupied(cell, &self.snake, &self.obstacles, self.food)
    }
}

use crate::food::{fill_cell, Food};
use crate::grid::Grid;
use crate::surface::Surface;
use rand::Rng;
use shared::{Cell, Color, Direction, GridConfig, SnakeRecord};
use std::collections::VecDeque;

/// Segments a freshly spawned snake starts with
pub const MIN_SEGMENTS: usize = 3;

/// How close to the border (in cells) a snake starts turning away
pub const EDGE_BUFFER: i32 = 2;

/// Result of one `advance`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Moved,
    /// The projected head left the grid; the body was not moved
    OutOfBounds,
    /// The new head landed on the snake's own body
    SelfCollision,
    /// Already dead, nothing happened
    Idle,
}

/// Read-only view of the world a snake steers by
#[derive(Debug, Clone, Copy)]
pub struct Neighborhood<'a> {
    pub snakes: &'a [Snake],
    pub food: &'a [Food],
    /// Position of the steering snake in `snakes`, skipped as a rival
    pub index: usize,
}

impl<'a> Neighborhood<'a> {
    /// Closest food to `cell`; the earlier item wins ties
    pub fn nearest_food(&self, cell: Cell) -> Option<&'a Food> {
        self.food
            .iter()
            .min_by_key(|food| cell.distance_squared(food.cell))
    }

    /// Snake whose head is closest to `cell`, other than the one steering
    pub fn nearest_rival(&self, cell: Cell) -> Option<&'a Snake> {
        self.snakes
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != self.index)
            .map(|(_, snake)| snake)
            .min_by_key(|snake| cell.distance_squared(snake.head()))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    pub id: u64,
    segments: VecDeque<Cell>,
    pub direction: Direction,
    pub color: Color,
    alive: bool,
}

impl Snake {
    /// Build a live snake from explicit segments, head first.
    /// Returns `None` for an empty body.
    pub fn new(
        id: u64,
        segments: impl IntoIterator<Item = Cell>,
        direction: Direction,
        color: Color,
    ) -> Option<Self> {
        let segments: VecDeque<Cell> = segments.into_iter().collect();
        if segments.is_empty() {
            return None;
        }
        Some(Self {
            id,
            segments,
            direction,
            color,
            alive: true,
        })
    }

    /// Spawn with `MIN_SEGMENTS` independently random cells. The segments are
    /// not necessarily adjacent; the body straightens out as it moves.
    pub fn random<R: Rng>(id: u64, grid: &Grid, rng: &mut R) -> Option<Self> {
        let mut segments = Vec::with_capacity(MIN_SEGMENTS);
        for _ in 0..MIN_SEGMENTS {
            segments.push(grid.random_cell(rng)?);
        }
        let direction = Direction::random(rng);
        let color = Color::random(rng);
        Snake::new(id, segments, direction, color)
    }

    pub fn from_record(id: u64, record: &SnakeRecord) -> Option<Self> {
        let mut snake = Snake::new(
            id,
            record.segments.iter().copied(),
            record.direction,
            record.color,
        )?;
        snake.alive = record.is_alive;
        Some(snake)
    }

    pub fn to_record(&self) -> SnakeRecord {
        SnakeRecord {
            segments: self.segments.iter().copied().collect(),
            direction: self.direction,
            color: self.color,
            is_alive: self.alive,
        }
    }

    pub fn head(&self) -> Cell {
        self.segments[0]
    }

    pub fn segments(&self) -> impl Iterator<Item = Cell> + '_ {
        self.segments.iter().copied()
    }

    /// Everything but the head
    pub fn body(&self) -> impl Iterator<Item = Cell> + '_ {
        self.segments.iter().skip(1).copied()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn kill(&mut self) {
        self.alive = false;
    }

    pub fn occupies(&self, cell: Cell) -> bool {
        self.segments.contains(&cell)
    }

    /// Grow by one segment: a copy of the current head joins the tail
    pub fn grow(&mut self) {
        let head = self.head();
        self.segments.push_back(head);
    }

    fn hits_self(&self) -> bool {
        let head = self.head();
        self.body().any(|segment| segment == head)
    }

    /// Decide where to go this tick. Dead snakes keep their direction.
    pub fn plan(&self, grid: &Grid, neighborhood: &Neighborhood<'_>) -> Direction {
        if !self.alive {
            return self.direction;
        }

        let direction = self.avoid_edges(grid.cols(), grid.rows());

        match neighborhood.nearest_food(self.head()) {
            Some(food) => {
                let rival = neighborhood.nearest_rival(self.head());
                self.seek(direction, food.cell, rival)
            }
            None => direction,
        }
    }

    /// Turn onto the other axis when the next cell is inside the border band
    fn avoid_edges(&self, cols: i32, rows: i32) -> Direction {
        let head = self.head();
        let next = head.step(self.direction);
        let mut direction = self.direction;

        if (next.x <= EDGE_BUFFER || next.x >= cols - EDGE_BUFFER - 1) && direction.is_horizontal() {
            direction = if head.y * 2 > rows {
                Direction::Up
            } else {
                Direction::Down
            };
        }

        if (next.y <= EDGE_BUFFER || next.y >= rows - EDGE_BUFFER - 1) && direction.is_vertical() {
            direction = if head.x * 2 > cols {
                Direction::Left
            } else {
                Direction::Right
            };
        }

        direction
    }

    /// Steer toward `target`, sidestepping the own body and the nearest
    /// rival's body. Only the single nearest rival is looked at.
    fn seek(&self, direction: Direction, target: Cell, rival: Option<&Snake>) -> Direction {
        let head = self.head();
        let dx = target.x - head.x;
        let dy = target.y - head.y;

        let next = head.step(direction);
        let blocked = self.occupies(next) || rival.is_some_and(|r| r.occupies(next));

        let turn = if blocked {
            if direction.is_horizontal() {
                Direction::from_delta(0, dy.signum())
            } else {
                Direction::from_delta(dx.signum(), 0)
            }
        } else if dx.abs() > dy.abs() {
            Direction::from_delta(dx.signum(), 0)
        } else {
            Direction::from_delta(0, dy.signum())
        };

        match turn {
            Some(turn) if !self.occupies(head.step(turn)) => turn,
            _ => direction,
        }
    }

    /// Move one cell along `direction`
    pub fn advance(&mut self, direction: Direction, grid: &Grid) -> Step {
        if !self.alive {
            return Step::Idle;
        }

        self.direction = direction;

        let projected = self.head().step(direction);
        let head = projected.clamped(grid.cols(), grid.rows());
        if head != projected {
            self.alive = false;
            return Step::OutOfBounds;
        }

        self.segments.push_front(head);
        self.segments.pop_back();

        if self.hits_self() {
            self.alive = false;
            return Step::SelfCollision;
        }

        Step::Moved
    }

    pub fn draw<S: Surface + ?Sized>(&self, surface: &mut S, grid: &GridConfig) {
        if !self.alive {
            return;
        }
        for segment in &self.segments {
            fill_cell(surface, grid, *segment, self.color);
        }
    }
}

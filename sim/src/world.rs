use crate::food::Food;
use crate::grid::Grid;
use crate::snake::{Neighborhood, Snake, Step};
use crate::storage::Storage;
use crate::surface::Surface;
use crate::SimError;
use rand::Rng;
use shared::{Cell, FoodRecord, SimConfig, Snapshot, SNAPSHOT_KEY};

/// Running totals, mostly for the status line
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorldStats {
    pub ticks: u64,
    pub snakes: usize,
    pub food: usize,
    pub deaths: u64,
    pub meals: u64,
}

/// Owns the grid and both populations, and advances them together
#[derive(Debug, Clone)]
pub struct World {
    config: SimConfig,
    grid: Grid,
    snakes: Vec<Snake>,
    food: Vec<Food>,
    next_id: u64,
    ticks: u64,
    deaths: u64,
    meals: u64,
}

impl World {
    /// Empty world over a `width x height` pixel surface
    pub fn new(config: SimConfig, width: u32, height: u32) -> Self {
        let grid = Grid::new(width, height, &config.grid);
        World {
            config,
            grid,
            snakes: Vec::new(),
            food: Vec::new(),
            next_id: 0,
            ticks: 0,
            deaths: 0,
            meals: 0,
        }
    }

    /// Rebuild a world from a snapshot. Positions are taken as-is, even if
    /// they fall outside the current grid, but must lie within `Cell::LIMIT`.
    pub fn restore(
        config: SimConfig,
        width: u32,
        height: u32,
        snapshot: &Snapshot,
    ) -> Result<Self, SimError> {
        let mut world = World::new(config, width, height);

        for (index, record) in snapshot.snake_list.iter().enumerate() {
            let id = world.allocate_id();
            let snake = Snake::from_record(id, record).ok_or(SimError::EmptySnake { index })?;
            check_range(snake.segments())?;
            world.snakes.push(snake);
        }
        check_range(snapshot.food_list.iter().map(FoodRecord::cell))?;
        world.food = snapshot.food_list.iter().map(Food::from).collect();

        Ok(world)
    }

    /// Restore the last saved world, or start empty if there is none or it
    /// cannot be read
    pub fn load<S: Storage + ?Sized>(
        config: SimConfig,
        width: u32,
        height: u32,
        storage: &S,
    ) -> Self {
        match Self::try_load(config.clone(), width, height, storage) {
            Ok(Some(world)) => {
                tracing::info!(
                    snakes = world.snakes.len(),
                    food = world.food.len(),
                    "Restored saved world"
                );
                world
            }
            Ok(None) => {
                tracing::debug!("No saved world, starting empty");
                World::new(config, width, height)
            }
            Err(err) => {
                tracing::warn!("Discarding saved world: {}", err);
                World::new(config, width, height)
            }
        }
    }

    fn try_load<S: Storage + ?Sized>(
        config: SimConfig,
        width: u32,
        height: u32,
        storage: &S,
    ) -> Result<Option<Self>, SimError> {
        let Some(json) = storage.get(SNAPSHOT_KEY)? else {
            return Ok(None);
        };
        let snapshot = Snapshot::from_json(&json)?;
        World::restore(config, width, height, &snapshot).map(Some)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            snake_list: self.snakes.iter().map(Snake::to_record).collect(),
            food_list: self.food.iter().map(Food::to_record).collect(),
        }
    }

    /// Overwrite the stored snapshot with the current state
    pub fn save<S: Storage + ?Sized>(&self, storage: &mut S) -> Result<(), SimError> {
        let json = self.snapshot().to_json()?;
        storage.set(SNAPSHOT_KEY, &json)?;
        tracing::debug!(bytes = json.len(), "Saved world");
        Ok(())
    }

    /// Recompute the lattice. Snakes and food stay where they are.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.grid.resize(width, height, self.config.grid.pitch());
        tracing::debug!(
            width,
            height,
            cols = self.grid.cols(),
            rows = self.grid.rows(),
            "Resized grid"
        );
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Swap the configuration; a new pitch rebuilds the grid
    pub fn update_config(&mut self, config: SimConfig) {
        let pitch_changed = config.grid.pitch() != self.grid.pitch();
        self.config = config;
        if pitch_changed {
            self.resize(self.grid.width(), self.grid.height());
        }
    }

    /// Drop every snake and food item
    pub fn clear(&mut self) {
        self.snakes.clear();
        self.food.clear();
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn snakes(&self) -> &[Snake] {
        &self.snakes
    }

    pub fn food(&self) -> &[Food] {
        &self.food
    }

    pub fn stats(&self) -> WorldStats {
        WorldStats {
            ticks: self.ticks,
            snakes: self.snakes.len(),
            food: self.food.len(),
            deaths: self.deaths,
            meals: self.meals,
        }
    }

    /// Add a snake built elsewhere, giving it a fresh id
    pub fn insert_snake(&mut self, mut snake: Snake) -> u64 {
        snake.id = self.allocate_id();
        let id = snake.id;
        self.snakes.push(snake);
        id
    }

    pub fn insert_food(&mut self, food: Food) {
        self.food.push(food);
    }

    /// Advance the simulation by one step
    pub fn tick<R: Rng>(&mut self, rng: &mut R) {
        // 1. Forget snakes that died last tick
        self.snakes.retain(Snake::is_alive);

        // 2-3. Top up both populations
        self.replenish(rng);

        // 4. Everyone moves, in list order
        self.move_snakes();

        // 5. Meals
        self.feed();

        // 6. At most one snake-on-snake collision per tick
        self.resolve_collisions();

        self.ticks += 1;
    }

    /// Tick, then paint the result
    pub fn frame<R: Rng, S: Surface + ?Sized>(&mut self, rng: &mut R, surface: &mut S) {
        self.tick(rng);
        self.draw(surface);
    }

    /// Clear the surface, then paint food under snakes
    pub fn draw<S: Surface + ?Sized>(&self, surface: &mut S) {
        surface.clear();
        for food in &self.food {
            food.draw(surface, &self.config.grid);
        }
        for snake in &self.snakes {
            snake.draw(surface, &self.config.grid);
        }
    }

    /// Create snakes and food in one pass until both targets are met. Stops
    /// early if the grid has no cells to place them on.
    pub fn replenish<R: Rng>(&mut self, rng: &mut R) {
        let mut spawned = 0;
        while self.snakes.len() < self.config.snake_count {
            let id = self.next_id;
            match Snake::random(id, &self.grid, rng) {
                Some(snake) => {
                    self.next_id += 1;
                    self.snakes.push(snake);
                    spawned += 1;
                }
                None => break,
            }
        }

        let mut placed = 0;
        while self.food.len() < self.config.food_count() {
            match Food::random(&self.grid, rng) {
                Some(food) => {
                    self.food.push(food);
                    placed += 1;
                }
                None => break,
            }
        }

        if spawned > 0 || placed > 0 {
            tracing::debug!(spawned, placed, "Replenished world");
        }
    }

    fn move_snakes(&mut self) {
        for index in 0..self.snakes.len() {
            let direction = {
                let neighborhood = Neighborhood {
                    snakes: &self.snakes,
                    food: &self.food,
                    index,
                };
                self.snakes[index].plan(&self.grid, &neighborhood)
            };

            let snake = &mut self.snakes[index];
            match snake.advance(direction, &self.grid) {
                Step::OutOfBounds => {
                    self.deaths += 1;
                    tracing::trace!(id = snake.id, "Snake left the grid");
                }
                Step::SelfCollision => {
                    self.deaths += 1;
                    tracing::trace!(id = snake.id, "Snake bit itself");
                }
                Step::Moved | Step::Idle => {}
            }
        }
    }

    /// Each food item goes to the first snake whose head is on it
    fn feed(&mut self) {
        for index in (0..self.food.len()).rev() {
            let cell = self.food[index].cell;
            if let Some(snake) = self.snakes.iter_mut().find(|s| s.head() == cell) {
                snake.grow();
                self.food.remove(index);
                self.meals += 1;
                tracing::trace!(id = snake.id, len = snake.len(), "Snake ate");
            }
        }
    }

    /// Check ordered pairs until one collision is found and settle it
    fn resolve_collisions(&mut self) {
        let Some(collision) = self.find_collision() else {
            return;
        };

        match collision {
            Collision::HeadOn(a, b) => {
                tracing::trace!(
                    a = self.snakes[a].id,
                    b = self.snakes[b].id,
                    "Head-on collision"
                );
                // Remove the higher index first so the lower one stays valid
                let (first, second) = if a > b { (a, b) } else { (b, a) };
                let first = self.snakes.remove(first);
                let second = self.snakes.remove(second);
                // Food order follows the pair order
                let (a, b) = if a > b { (first, second) } else { (second, first) };
                self.decompose(a);
                self.decompose(b);
            }
            Collision::Bite { biter } => {
                let snake = self.snakes.remove(biter);
                tracing::trace!(id = snake.id, "Snake ran into another");
                self.decompose(snake);
            }
        }
    }

    fn find_collision(&self) -> Option<Collision> {
        for (i, a) in self.snakes.iter().enumerate() {
            for (j, b) in self.snakes.iter().enumerate() {
                if i == j {
                    continue;
                }
                if a.head() == b.head() {
                    return Some(Collision::HeadOn(i, j));
                }
                if b.body().any(|cell| cell == a.head()) {
                    return Some(Collision::Bite { biter: i });
                }
                if a.body().any(|cell| cell == b.head()) {
                    return Some(Collision::Bite { biter: j });
                }
            }
        }
        None
    }

    /// Turn every segment of a dead snake into food. A snake that already
    /// died this tick was counted then.
    fn decompose(&mut self, mut snake: Snake) {
        if snake.is_alive() {
            self.deaths += 1;
        }
        snake.kill();
        self.food.extend(snake.segments().map(Food::at));
    }

    fn allocate_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

fn check_range(mut cells: impl Iterator<Item = Cell>) -> Result<(), SimError> {
    match cells.find(|cell| !cell.in_range()) {
        Some(cell) => Err(SimError::OutOfRange {
            x: cell.x,
            y: cell.y,
        }),
        None => Ok(()),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Collision {
    /// Heads of both snakes share a cell
    HeadOn(usize, usize),
    /// One snake's head is on the other's body
    Bite { biter: usize },
}

//! Grid snake simulation: snakes chase food, avoid each other, turn into food
//! when they die and are respawned to keep the population steady.

pub mod error;
pub mod food;
pub mod grid;
pub mod snake;
pub mod storage;
pub mod surface;
pub mod world;

pub use error::SimError;
pub use food::Food;
pub use grid::{compute_cells, Grid};
pub use snake::{Neighborhood, Snake, Step, EDGE_BUFFER, MIN_SEGMENTS};
pub use storage::{FileStorage, MemoryStorage, Storage, StorageError};
pub use surface::{PixelBuffer, Surface};
pub use world::{World, WorldStats};

use rand::Rng;
use shared::{SimConfig, Snapshot};

/// Run a headless world for `ticks` steps from an optional saved state and
/// return the final snapshot
pub fn run_simulation<R: Rng>(
    config: SimConfig,
    width: u32,
    height: u32,
    seed: Option<&Snapshot>,
    ticks: u64,
    rng: &mut R,
) -> Result<Snapshot, SimError> {
    let mut world = match seed {
        Some(snapshot) => World::restore(config, width, height, snapshot)?,
        None => World::new(config, width, height),
    };

    for _ in 0..ticks {
        world.tick(rng);
    }

    Ok(world.snapshot())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_simulation_runs() {
        let mut rng = StdRng::seed_from_u64(1);
        let snapshot = run_simulation(SimConfig::default(), 480, 360, None, 50, &mut rng).unwrap();

        assert!(!snapshot.snake_list.is_empty());
        assert!(snapshot.snake_list.len() <= 10);
    }

    #[test]
    fn test_simulation_resumes_from_snapshot() {
        let mut rng = StdRng::seed_from_u64(2);
        let first = run_simulation(SimConfig::default(), 480, 360, None, 10, &mut rng).unwrap();
        let resumed =
            run_simulation(SimConfig::default(), 480, 360, Some(&first), 0, &mut rng).unwrap();

        assert_eq!(first, resumed);
    }

    #[test]
    fn test_same_seed_same_outcome() {
        let a = run_simulation(
            SimConfig::default(),
            480,
            360,
            None,
            100,
            &mut StdRng::seed_from_u64(99),
        )
        .unwrap();
        let b = run_simulation(
            SimConfig::default(),
            480,
            360,
            None,
            100,
            &mut StdRng::seed_from_u64(99),
        )
        .unwrap();

        assert_eq!(a, b);
    }
}

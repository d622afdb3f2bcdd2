use crate::grid::Grid;
use crate::surface::Surface;
use rand::Rng;
use shared::{Cell, Color, FoodRecord, GridConfig};

/// A single-cell meal
#[derive(Debug, Clone, PartialEq)]
pub struct Food {
    pub cell: Cell,
    pub color: Color,
}

impl Food {
    /// Food on a uniformly random cell of the grid
    pub fn random<R: Rng>(grid: &Grid, rng: &mut R) -> Option<Self> {
        grid.random_cell(rng).map(Food::at)
    }

    pub fn at(cell: Cell) -> Self {
        Self {
            cell,
            color: Color::WHITE,
        }
    }

    pub fn draw<S: Surface + ?Sized>(&self, surface: &mut S, grid: &GridConfig) {
        fill_cell(surface, grid, self.cell, self.color);
    }

    pub fn to_record(&self) -> FoodRecord {
        FoodRecord {
            x: self.cell.x,
            y: self.cell.y,
            color: self.color,
        }
    }
}

impl From<&FoodRecord> for Food {
    fn from(record: &FoodRecord) -> Self {
        Self {
            cell: record.cell(),
            color: record.color,
        }
    }
}

/// Paint one lattice cell as a `size x size` square
pub(crate) fn fill_cell<S: Surface + ?Sized>(
    surface: &mut S,
    grid: &GridConfig,
    cell: Cell,
    color: Color,
) {
    let pitch = grid.pitch() as i64;
    surface.fill_rect(
        cell.x as i64 * pitch,
        cell.y as i64 * pitch,
        grid.size,
        grid.size,
        color,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::PixelBuffer;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_food_lands_on_grid() {
        let mut rng = StdRng::seed_from_u64(1);
        let grid = Grid::new(120, 120, &GridConfig::default());
        let food = Food::random(&grid, &mut rng).unwrap();
        assert!(grid.contains(food.cell));
        assert_eq!(food.color, Color::WHITE);
    }

    #[test]
    fn test_food_draws_at_pitch() {
        let config = GridConfig { size: 2, gap: 1 };
        let mut buffer = PixelBuffer::new(12, 12);
        Food::at(Cell::new(2, 1)).draw(&mut buffer, &config);

        // Cell (2, 1) starts at pixel (6, 3) and is 2x2
        assert_eq!(buffer.painted(), 4);
        assert_eq!(buffer.pixel(6, 3), Some(Color::WHITE));
        assert_eq!(buffer.pixel(7, 4), Some(Color::WHITE));
        assert_eq!(buffer.pixel(8, 3), None);
    }

    #[test]
    fn test_no_food_without_cells() {
        let mut rng = StdRng::seed_from_u64(1);
        let grid = Grid::new(3, 3, &GridConfig::default());
        assert!(Food::random(&grid, &mut rng).is_none());
    }
}

use crate::{Cell, Color, Direction};
use serde::{Deserialize, Serialize};

/// Persisted state of one snake
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnakeRecord {
    /// Head first
    pub segments: Vec<Cell>,
    pub direction: Direction,
    pub color: Color,
    pub is_alive: bool,
}

/// Persisted state of one food item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodRecord {
    pub x: i32,
    pub y: i32,
    pub color: Color,
}

/// Everything needed to bring a world back after a restart.
///
/// Each save replaces the previous snapshot as a whole.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub snake_list: Vec<SnakeRecord>,
    pub food_list: Vec<FoodRecord>,
}

impl Snapshot {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

impl FoodRecord {
    pub fn cell(&self) -> Cell {
        Cell::new(self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_wire_format() {
        let snapshot = Snapshot {
            snake_list: vec![SnakeRecord {
                segments: vec![Cell::new(1, 2), Cell::new(1, 3)],
                direction: Direction::Up,
                color: Color::new(10, 20, 30),
                is_alive: true,
            }],
            food_list: vec![FoodRecord {
                x: 4,
                y: 5,
                color: Color::WHITE,
            }],
        };

        let value: serde_json::Value = serde_json::from_str(&snapshot.to_json().unwrap()).unwrap();
        assert_eq!(value["snakeList"][0]["segments"][1]["y"], 3);
        assert_eq!(value["snakeList"][0]["direction"]["y"], -1);
        assert_eq!(value["snakeList"][0]["color"], "rgb(10, 20, 30)");
        assert_eq!(value["snakeList"][0]["isAlive"], true);
        assert_eq!(value["foodList"][0]["x"], 4);
        assert_eq!(value["foodList"][0]["color"], "rgb(255, 255, 255)");
    }

    #[test]
    fn test_snapshot_reads_saved_page_state() {
        let json = r#"{
            "snakeList": [
                {"segments": [{"x": 3, "y": 3}, {"x": 2, "y": 3}, {"x": 1, "y": 3}],
                 "direction": {"x": 1, "y": 0},
                 "color": "rgb(200, 100, 50)",
                 "isAlive": false}
            ],
            "foodList": [{"x": 7, "y": 8, "color": "rgb(255, 255, 255)"}]
        }"#;

        let snapshot = Snapshot::from_json(json).unwrap();
        assert_eq!(snapshot.snake_list.len(), 1);
        assert!(!snapshot.snake_list[0].is_alive);
        assert_eq!(snapshot.snake_list[0].direction, Direction::Right);
        assert_eq!(snapshot.food_list[0].cell(), Cell::new(7, 8));
    }

    #[test]
    fn test_empty_object_is_not_a_snapshot() {
        assert!(Snapshot::from_json("{}").is_err());
        assert!(Snapshot::from_json("null").is_err());
    }
}

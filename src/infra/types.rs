use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::PlanError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The cell one step away in `direction`. Does not check bounds.
    pub fn step(&self, direction: Direction) -> Position {
        let (dx, dy) = direction.offset();
        Position::new(self.x + dx, self.y + dy)
    }

    pub fn neighbors(&self) -> [Position; 8] {
        Direction::ALL.map(|direction| self.step(direction))
    }

    /// Chebyshev distance of at most one, diagonals included.
    pub fn is_adjacent(&self, other: &Position) -> bool {
        (self.x - other.x).abs() <= 1 && (self.y - other.y).abs() <= 1
    }

    pub fn chebyshev_distance(&self, other: &Position) -> i32 {
        (self.x - other.x).abs().max((self.y - other.y).abs())
    }

    pub fn euclidean_distance(&self, other: &Position) -> f64 {
        let dx = f64::from(self.x - other.x);
        let dy = f64::from(self.y - other.y);
        (dx * dx + dy * dy).sqrt()
    }

    /// Compass direction towards one of the eight neighbours of this cell.
    pub fn direction_to(&self, other: &Position) -> Result<Direction, PlanError> {
        Direction::ALL
            .into_iter()
            .find(|direction| self.step(*direction) == *other)
            .ok_or(PlanError::DirectionUndefined {
                from: *self,
                to: *other,
            })
    }

    /// Neighbours inside `bounds` that are not in `occupied`, in compass order.
    pub fn valid_open_neighbors(
        &self,
        bounds: &Bounds,
        occupied: &HashSet<Position>,
    ) -> Vec<Position> {
        self.neighbors()
            .into_iter()
            .filter(|candidate| bounds.contains(candidate) && !occupied.contains(candidate))
            .collect()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// The eight compass directions. The y axis grows southwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl Direction {
    /// Fixed enumeration order used for every neighbour scan.
    pub const ALL: [Direction; 8] = [
        Direction::North,
        Direction::NorthEast,
        Direction::East,
        Direction::SouthEast,
        Direction::South,
        Direction::SouthWest,
        Direction::West,
        Direction::NorthWest,
    ];

    pub fn offset(&self) -> (i32, i32) {
        match self {
            Direction::North => (0, -1),
            Direction::NorthEast => (1, -1),
            Direction::East => (1, 0),
            Direction::SouthEast => (1, 1),
            Direction::South => (0, 1),
            Direction::SouthWest => (-1, 1),
            Direction::West => (-1, 0),
            Direction::NorthWest => (-1, -1),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::North => "NORTH",
            Direction::NorthEast => "NORTHEAST",
            Direction::East => "EAST",
            Direction::SouthEast => "SOUTHEAST",
            Direction::South => "SOUTH",
            Direction::SouthWest => "SOUTHWEST",
            Direction::West => "WEST",
            Direction::NorthWest => "NORTHWEST",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Map extents. Valid cells are `0..width` by `0..height`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub width: i32,
    pub height: i32,
}

impl Bounds {
    pub fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    pub fn contains(&self, pos: &Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && pos.x < self.width && pos.y < self.height
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ResourceKind {
    #[serde(alias = "GOLD_MINE", alias = "gold")]
    Gold,
    #[serde(alias = "TREE", alias = "wood")]
    Wood,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceKind::Gold => f.write_str("GOLD"),
            ResourceKind::Wood => f.write_str("WOOD"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adjacency_includes_diagonals() {
        let center = Position::new(5, 5);
        for neighbor in center.neighbors() {
            assert!(center.is_adjacent(&neighbor), "{} should be adjacent", neighbor);
        }
        assert!(center.is_adjacent(&center));
        assert!(!center.is_adjacent(&Position::new(7, 5)));
        assert!(!center.is_adjacent(&Position::new(3, 3)));
    }

    #[test]
    fn test_direction_to_every_neighbor() {
        let center = Position::new(2, 2);
        for direction in Direction::ALL {
            let neighbor = center.step(direction);
            assert_eq!(center.direction_to(&neighbor).unwrap(), direction);
        }
        assert_eq!(
            Position::new(6, 6).direction_to(&Position::new(7, 7)).unwrap(),
            Direction::SouthEast
        );
    }

    #[test]
    fn test_direction_to_non_neighbor_fails() {
        let from = Position::new(0, 0);
        let result = from.direction_to(&Position::new(2, 0));
        assert!(matches!(result, Err(PlanError::DirectionUndefined { .. })));

        let result = from.direction_to(&from);
        assert!(result.is_err(), "a cell is not its own neighbour");
    }

    #[test]
    fn test_euclidean_distance() {
        let a = Position::new(3, 3);
        let b = Position::new(6, 7);
        assert!((a.euclidean_distance(&b) - 5.0).abs() < 1e-9);
        assert_eq!(a.chebyshev_distance(&b), 4);
    }

    #[test]
    fn test_valid_open_neighbors_filters_bounds_and_occupied() {
        let bounds = Bounds::new(10, 10);
        let corner = Position::new(0, 0);
        let occupied: HashSet<Position> = [Position::new(1, 1)].into_iter().collect();

        let open = corner.valid_open_neighbors(&bounds, &occupied);
        assert_eq!(open, vec![Position::new(1, 0), Position::new(0, 1)]);
    }

    #[test]
    fn test_valid_open_neighbors_compass_order() {
        let bounds = Bounds::new(10, 10);
        let open = Position::new(5, 5).valid_open_neighbors(&bounds, &HashSet::new());
        assert_eq!(
            open,
            vec![
                Position::new(5, 4),
                Position::new(6, 4),
                Position::new(6, 5),
                Position::new(6, 6),
                Position::new(5, 6),
                Position::new(4, 6),
                Position::new(4, 5),
                Position::new(4, 4),
            ]
        );
    }

    #[test]
    fn test_resource_kind_aliases() {
        let wood: ResourceKind = serde_json::from_str("\"TREE\"").unwrap();
        let gold: ResourceKind = serde_json::from_str("\"GOLD_MINE\"").unwrap();
        assert_eq!(wood, ResourceKind::Wood);
        assert_eq!(gold, ResourceKind::Gold);
        assert_eq!(ResourceKind::Wood.to_string(), "WOOD");
    }
}

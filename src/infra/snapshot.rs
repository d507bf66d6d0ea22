use std::collections::HashSet;
use std::path::Path;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::error::SnapshotError;
use crate::infra::{Position, ResourceKind};

pub const PEASANT_TEMPLATE: &str = "Peasant";
pub const TOWNHALL_TEMPLATE: &str = "TownHall";

/// Read-only view of the engine at the moment planning starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub width: i32,
    pub height: i32,
    pub units: Vec<UnitSnapshot>,
    #[serde(default)]
    pub resources: Vec<ResourceSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitSnapshot {
    pub id: u32,
    pub template: String,
    pub x: i32,
    pub y: i32,
    #[serde(default)]
    pub cargo_amount: u32,
    #[serde(default)]
    pub cargo_type: Option<ResourceKind>,
    #[serde(default)]
    pub supply_cap: Option<u32>,
}

impl UnitSnapshot {
    pub fn position(&self) -> Position {
        Position::new(self.x, self.y)
    }

    pub fn is_template(&self, name: &str) -> bool {
        self.template.eq_ignore_ascii_case(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceSnapshot {
    pub id: u32,
    pub kind: ResourceKind,
    pub x: i32,
    pub y: i32,
    pub amount_remaining: u32,
}

impl ResourceSnapshot {
    pub fn position(&self) -> Position {
        Position::new(self.x, self.y)
    }
}

impl Snapshot {
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SnapshotError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Builds a reproducible scenario: a townhall near the centre, one
    /// peasant beside it and a few gold mines and forests on free cells.
    pub fn generate(seed: u64, width: i32, height: i32) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let width = width.max(5);
        let height = height.max(5);

        let townhall = Position::new(width / 2, height / 2);
        let peasant = Position::new(townhall.x - 1, townhall.y);
        let mut taken: HashSet<Position> = [townhall, peasant].into_iter().collect();

        let units = vec![
            UnitSnapshot {
                id: 0,
                template: TOWNHALL_TEMPLATE.to_string(),
                x: townhall.x,
                y: townhall.y,
                cargo_amount: 0,
                cargo_type: None,
                supply_cap: Some(3),
            },
            UnitSnapshot {
                id: 1,
                template: PEASANT_TEMPLATE.to_string(),
                x: peasant.x,
                y: peasant.y,
                cargo_amount: 0,
                cargo_type: None,
                supply_cap: None,
            },
        ];

        let mut resources = Vec::new();
        let mut next_id = 2;
        for (kind, count, amount) in [(ResourceKind::Gold, 2, 500..=1500), (ResourceKind::Wood, 3, 200..=600)] {
            let mut placed = 0;
            while placed < count {
                let pos = Position::new(rng.random_range(0..width), rng.random_range(0..height));
                // Keep a ring around the townhall free so peasants can reach it.
                if pos.chebyshev_distance(&townhall) <= 1 || !taken.insert(pos) {
                    continue;
                }
                let amount_remaining = rng.random_range(amount.clone()) / 100 * 100;
                resources.push(ResourceSnapshot {
                    id: next_id,
                    kind,
                    x: pos.x,
                    y: pos.y,
                    amount_remaining,
                });
                next_id += 1;
                placed += 1;
            }
        }

        tracing::debug!(
            seed = seed,
            width = width,
            height = height,
            resources = resources.len(),
            "Generated scenario snapshot"
        );

        Self {
            width,
            height,
            units,
            resources,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SMALL_SCENARIO: &str = r#"{
        "width": 10,
        "height": 10,
        "units": [
            { "id": 0, "template": "TownHall", "x": 5, "y": 5, "supply_cap": 3 },
            { "id": 1, "template": "Peasant", "x": 4, "y": 5 }
        ],
        "resources": [
            { "id": 2, "kind": "GOLD_MINE", "x": 4, "y": 4, "amount_remaining": 500 },
            { "id": 3, "kind": "TREE", "x": 0, "y": 0, "amount_remaining": 400 }
        ]
    }"#;

    #[test]
    fn test_from_json_decodes_units_and_resources() {
        let snapshot = Snapshot::from_json(SMALL_SCENARIO).unwrap();
        assert_eq!(snapshot.width, 10);
        assert_eq!(snapshot.units.len(), 2);
        assert!(snapshot.units[0].is_template("townhall"));
        assert_eq!(snapshot.units[0].supply_cap, Some(3));
        assert_eq!(snapshot.units[1].cargo_amount, 0);
        assert_eq!(snapshot.resources[0].kind, ResourceKind::Gold);
        assert_eq!(snapshot.resources[1].kind, ResourceKind::Wood);
        assert_eq!(snapshot.resources[1].position(), Position::new(0, 0));
    }

    #[test]
    fn test_from_json_reports_decode_errors() {
        let result = Snapshot::from_json("{ \"width\": 10 }");
        assert!(matches!(result, Err(SnapshotError::Json(_))));
    }

    #[test]
    fn test_generate_is_reproducible() {
        let first = Snapshot::generate(42, 16, 12);
        let second = Snapshot::generate(42, 16, 12);
        assert_eq!(first, second);
    }

    #[test]
    fn test_generate_places_resources_on_free_cells() {
        let snapshot = Snapshot::generate(7, 12, 12);
        let townhall = snapshot.units[0].position();

        let mut cells: HashSet<Position> = snapshot.units.iter().map(|u| u.position()).collect();
        for resource in &snapshot.resources {
            assert!(cells.insert(resource.position()), "resource cells must be distinct");
            assert!(resource.position().chebyshev_distance(&townhall) > 1);
            assert!(resource.amount_remaining >= 100);
            assert_eq!(resource.amount_remaining % 100, 0);
        }
        assert_eq!(snapshot.resources.len(), 5);
    }
}

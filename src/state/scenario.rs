use crate::infra::{Bounds, PlannerParams, Position};

pub type UnitId = u32;

/// The townhall. Never mutated during planning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Depot {
    pub id: UnitId,
    pub position: Position,
    pub supply_cap: u32,
}

/// Constants shared by every state of one search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scenario {
    pub bounds: Bounds,
    pub depot: Depot,
    pub required_gold: u32,
    pub required_wood: u32,
    pub build_peasants: bool,
    /// Lowest id no snapshot unit holds. Trained peasants are numbered from here.
    pub first_free_id: UnitId,
}

impl Scenario {
    pub fn new(bounds: Bounds, depot: Depot, params: PlannerParams) -> Self {
        let first_free_id = depot.id + 1;
        Self {
            bounds,
            depot,
            required_gold: params.required_gold,
            required_wood: params.required_wood,
            build_peasants: params.build_peasants,
            first_free_id,
        }
    }

    pub fn with_first_free_id(mut self, id: UnitId) -> Self {
        self.first_free_id = self.first_free_id.max(id);
        self
    }
}

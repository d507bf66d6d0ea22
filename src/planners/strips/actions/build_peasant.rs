use crate::error::PlanError;
use crate::infra::Position;
use crate::state::{GameState, PEASANT_GOLD_COST, Peasant, PeasantId, UnitId};

use super::Operator;

/// Trains a peasant at the townhall. The new peasant appears on `spawn`
/// with the placeholder id `peasant_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildPeasantAction {
    pub depot_id: UnitId,
    pub peasant_id: PeasantId,
    pub spawn: Position,
}

impl BuildPeasantAction {
    pub fn new(depot_id: UnitId, peasant_id: PeasantId, spawn: Position) -> Self {
        Self {
            depot_id,
            peasant_id,
            spawn,
        }
    }

    /// The build available from `state`, if training is enabled and affordable.
    pub fn generate(state: &GameState) -> Option<Self> {
        if !state.scenario().build_peasants
            || state.current_gold() < PEASANT_GOLD_COST
            || state.food() == 0
        {
            return None;
        }

        let depot = state.depot();
        let spawn = state.open_neighbors(&depot.position).into_iter().next()?;
        Some(Self::new(depot.id, state.next_peasant_id(), spawn))
    }

    fn violated(&self, reason: &str) -> PlanError {
        PlanError::precondition(format!("BuildPeasant({})", self.depot_id), reason)
    }
}

impl Operator for BuildPeasantAction {
    fn check(&self, state: &GameState) -> Result<(), PlanError> {
        if state.current_gold() < PEASANT_GOLD_COST {
            return Err(self.violated("not enough gold"));
        }
        if state.food() == 0 {
            return Err(self.violated("no supply left"));
        }
        if state.peasant(self.peasant_id).is_ok() {
            return Err(self.violated("peasant id already in use"));
        }
        if !self.spawn.is_adjacent(&state.depot().position)
            || !state.scenario().bounds.contains(&self.spawn)
            || state.occupied_positions().contains(&self.spawn)
        {
            return Err(self.violated("spawn cell is not free next to the townhall"));
        }
        Ok(())
    }

    fn cost(&self, _state: &GameState) -> Result<f64, PlanError> {
        Ok(0.0)
    }

    fn effect(&self, state: &mut GameState) -> Result<(), PlanError> {
        state
            .spend_gold(PEASANT_GOLD_COST)
            .ok_or_else(|| self.violated("not enough gold"))?;
        state
            .consume_food()
            .ok_or_else(|| self.violated("no supply left"))?;
        state.add_peasant(Peasant::new(self.peasant_id, self.spawn));
        Ok(())
    }
}

use crate::error::PlanError;
use crate::infra::{Direction, ResourceKind};
use crate::state::{GameState, PeasantId, ResourceId};

use super::{HANDLING_COST, Operator};

/// Amount withdrawn from a deposit by one gather.
pub const HARVEST_QUANTUM: u32 = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarvestAction {
    pub peasant_id: PeasantId,
    /// From the peasant towards the deposit
    pub direction: Direction,
    pub kind: ResourceKind,
    pub resource_id: ResourceId,
}

impl HarvestAction {
    pub fn new(
        peasant_id: PeasantId,
        direction: Direction,
        kind: ResourceKind,
        resource_id: ResourceId,
    ) -> Self {
        Self {
            peasant_id,
            direction,
            kind,
            resource_id,
        }
    }

    fn violated(&self, reason: &str) -> PlanError {
        PlanError::precondition(
            format!("Harvest({} {} {})", self.peasant_id, self.direction, self.kind),
            reason,
        )
    }
}

impl Operator for HarvestAction {
    fn check(&self, state: &GameState) -> Result<(), PlanError> {
        let peasant = state.peasant(self.peasant_id)?;
        let resource = state.resource(self.resource_id)?;

        if resource.kind != self.kind {
            return Err(self.violated("deposit holds a different resource"));
        }
        if peasant.is_carrying() {
            return Err(self.violated("peasant is already carrying cargo"));
        }
        if !peasant.position.is_adjacent(&resource.position) {
            return Err(self.violated("peasant is not next to the deposit"));
        }
        if peasant.position.direction_to(&resource.position)? != self.direction {
            return Err(self.violated("direction does not point at the deposit"));
        }
        if !state.need_resource(self.kind) {
            return Err(self.violated("resource is no longer needed"));
        }
        Ok(())
    }

    fn cost(&self, _state: &GameState) -> Result<f64, PlanError> {
        Ok(HANDLING_COST)
    }

    fn effect(&self, state: &mut GameState) -> Result<(), PlanError> {
        let quantum = HARVEST_QUANTUM.min(state.peasant(self.peasant_id)?.free_capacity());
        let withdrawn = state
            .resource_mut(self.resource_id)?
            .reduce_amount_remaining(quantum);
        state.peasant_mut(self.peasant_id)?.load(self.kind, withdrawn);

        if state.resource(self.resource_id)?.is_exhausted() {
            tracing::trace!(resource_id = self.resource_id, "Deposit exhausted");
            state.remove_exhausted_resources();
        }
        Ok(())
    }
}

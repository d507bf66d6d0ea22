use crate::error::PlanError;
use crate::infra::{Direction, ResourceKind};
use crate::state::{GameState, PeasantId};

use super::{HANDLING_COST, Operator};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepositAction {
    pub peasant_id: PeasantId,
    /// From the peasant towards the townhall
    pub direction: Direction,
    pub kind: ResourceKind,
}

impl DepositAction {
    pub fn new(peasant_id: PeasantId, direction: Direction, kind: ResourceKind) -> Self {
        Self {
            peasant_id,
            direction,
            kind,
        }
    }

    fn violated(&self, reason: &str) -> PlanError {
        PlanError::precondition(
            format!("Deposit({} {} {})", self.peasant_id, self.direction, self.kind),
            reason,
        )
    }
}

impl Operator for DepositAction {
    fn check(&self, state: &GameState) -> Result<(), PlanError> {
        let peasant = state.peasant(self.peasant_id)?;

        if peasant.cargo_kind() != Some(self.kind) {
            return Err(self.violated("peasant is not carrying this resource"));
        }
        let depot = state.depot().position;
        if !peasant.position.is_adjacent(&depot) {
            return Err(self.violated("peasant is not next to the townhall"));
        }
        if peasant.position.direction_to(&depot)? != self.direction {
            return Err(self.violated("direction does not point at the townhall"));
        }
        Ok(())
    }

    fn cost(&self, _state: &GameState) -> Result<f64, PlanError> {
        Ok(HANDLING_COST)
    }

    fn effect(&self, state: &mut GameState) -> Result<(), PlanError> {
        let cargo = state
            .peasant_mut(self.peasant_id)?
            .unload()
            .ok_or_else(|| self.violated("cargo vanished before drop-off"))?;
        state.add_resource(cargo.kind, cargo.amount);
        Ok(())
    }
}

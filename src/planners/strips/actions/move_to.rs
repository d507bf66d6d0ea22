use crate::error::PlanError;
use crate::infra::Position;
use crate::state::{GameState, PeasantId};

use super::Operator;

/// Walks a peasant to `destination`. The engine does the path finding; the
/// planner only charges the straight-line distance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveAction {
    pub peasant_id: PeasantId,
    pub destination: Position,
}

impl MoveAction {
    pub fn new(peasant_id: PeasantId, destination: Position) -> Self {
        Self {
            peasant_id,
            destination,
        }
    }

    fn violated(&self, reason: &str) -> PlanError {
        PlanError::precondition(format!("Move({} -> {})", self.peasant_id, self.destination), reason)
    }
}

impl Operator for MoveAction {
    fn check(&self, state: &GameState) -> Result<(), PlanError> {
        state.peasant(self.peasant_id)?;

        if !state.scenario().bounds.contains(&self.destination) {
            return Err(self.violated("destination is outside the map"));
        }
        if state.occupied_positions().contains(&self.destination) {
            return Err(self.violated("destination is occupied"));
        }
        Ok(())
    }

    fn cost(&self, state: &GameState) -> Result<f64, PlanError> {
        let peasant = state.peasant(self.peasant_id)?;
        Ok(peasant.position.euclidean_distance(&self.destination))
    }

    fn effect(&self, state: &mut GameState) -> Result<(), PlanError> {
        state.peasant_mut(self.peasant_id)?.position = self.destination;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::planners::strips::StripsAction;
    use crate::state::game_state::tests::small_state;

    use super::*;

    #[test]
    fn test_move_updates_position_and_charges_distance() {
        let parent = small_state(200);
        let mut state = parent.child();
        let action = StripsAction::Move(MoveAction::new(1, Position::new(1, 1)));

        action.apply(&mut state).unwrap();

        assert_eq!(state.peasant(1).unwrap().position, Position::new(1, 1));
        assert!((state.edge_cost - 5.0).abs() < 1e-9, "(4,5) -> (1,1) is 5 cells away");
        assert!((state.g_cost - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_move_rejects_occupied_and_out_of_bounds() {
        let state = small_state(200);
        let onto_mine = StripsAction::Move(MoveAction::new(1, Position::new(4, 4)));
        let onto_depot = StripsAction::Move(MoveAction::new(1, Position::new(5, 5)));
        let off_map = StripsAction::Move(MoveAction::new(1, Position::new(10, 3)));

        assert!(!onto_mine.preconditions_met(&state));
        assert!(!onto_depot.preconditions_met(&state));
        assert!(!off_map.preconditions_met(&state));

        let mut child = state.child();
        let result = off_map.apply(&mut child);
        assert!(matches!(result, Err(PlanError::PreconditionViolated { .. })));
        assert_eq!(child.peasant(1).unwrap().position, Position::new(4, 5));
    }

    #[test]
    fn test_move_unknown_peasant() {
        let state = small_state(200);
        let action = StripsAction::Move(MoveAction::new(99, Position::new(0, 0)));
        assert!(!action.preconditions_met(&state));
    }
}

mod build_peasant;
mod deposit;
mod harvest;
mod move_to;

pub use build_peasant::BuildPeasantAction;
pub use deposit::DepositAction;
pub use harvest::{HARVEST_QUANTUM, HarvestAction};
pub use move_to::MoveAction;

use std::fmt;

use crate::error::PlanError;
use crate::state::{GameState, PeasantId};

/// Fixed cost of a gather or a drop-off at the townhall.
pub const HANDLING_COST: f64 = 2.0;

/// Behaviour shared by every STRIPS operator.
pub trait Operator {
    /// `Err` carries the first precondition that does not hold.
    fn check(&self, state: &GameState) -> Result<(), PlanError>;

    /// Edge cost, evaluated on the state before the effect.
    fn cost(&self, state: &GameState) -> Result<f64, PlanError>;

    /// Mutates `state`. Only called once `check` has passed.
    fn effect(&self, state: &mut GameState) -> Result<(), PlanError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    Move,
    Harvest,
    Deposit,
    BuildPeasant,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StripsAction {
    Move(MoveAction),
    Harvest(HarvestAction),
    Deposit(DepositAction),
    BuildPeasant(BuildPeasantAction),
}

impl StripsAction {
    fn operator(&self) -> &dyn Operator {
        match self {
            StripsAction::Move(action) => action,
            StripsAction::Harvest(action) => action,
            StripsAction::Deposit(action) => action,
            StripsAction::BuildPeasant(action) => action,
        }
    }

    pub fn kind(&self) -> ActionKind {
        match self {
            StripsAction::Move(_) => ActionKind::Move,
            StripsAction::Harvest(_) => ActionKind::Harvest,
            StripsAction::Deposit(_) => ActionKind::Deposit,
            StripsAction::BuildPeasant(_) => ActionKind::BuildPeasant,
        }
    }

    pub fn name(&self) -> &'static str {
        match self.kind() {
            ActionKind::Move => "MOVE",
            ActionKind::Harvest => "HARVEST",
            ActionKind::Deposit => "DEPOSIT",
            ActionKind::BuildPeasant => "BUILD_PEASANT",
        }
    }

    /// Peasant acting, or `None` when the townhall acts.
    pub fn peasant_id(&self) -> Option<PeasantId> {
        match self {
            StripsAction::Move(action) => Some(action.peasant_id),
            StripsAction::Harvest(action) => Some(action.peasant_id),
            StripsAction::Deposit(action) => Some(action.peasant_id),
            StripsAction::BuildPeasant(_) => None,
        }
    }

    pub fn preconditions_met(&self, state: &GameState) -> bool {
        self.operator().check(state).is_ok()
    }

    /// Checks the preconditions, applies the effect and charges the edge cost.
    pub fn apply(&self, state: &mut GameState) -> Result<(), PlanError> {
        let operator = self.operator();
        operator.check(state)?;
        let cost = operator.cost(state)?;
        operator.effect(state)?;
        state.record_edge(cost);
        Ok(())
    }
}

impl fmt::Display for StripsAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ACTION: {}( ", self.name())?;
        match self {
            StripsAction::Move(action) => write!(
                f,
                "{}, {}, {}",
                action.peasant_id, action.destination.x, action.destination.y
            )?,
            StripsAction::Harvest(action) => {
                write!(f, "{}, {}, {}", action.peasant_id, action.direction, action.kind)?
            }
            StripsAction::Deposit(action) => {
                write!(f, "{}, {}, {}", action.peasant_id, action.direction, action.kind)?
            }
            StripsAction::BuildPeasant(action) => write!(f, "{}", action.depot_id)?,
        }
        write!(f, " )")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::{Direction, Position, ResourceKind};

    #[test]
    fn test_display_forms() {
        let mv = StripsAction::Move(MoveAction::new(1, Position::new(4, 6)));
        assert_eq!(mv.to_string(), "ACTION: MOVE( 1, 4, 6 )");

        let harvest = StripsAction::Harvest(HarvestAction::new(1, Direction::North, ResourceKind::Gold, 2));
        assert_eq!(harvest.to_string(), "ACTION: HARVEST( 1, NORTH, GOLD )");

        let deposit = StripsAction::Deposit(DepositAction::new(3, Direction::SouthWest, ResourceKind::Wood));
        assert_eq!(deposit.to_string(), "ACTION: DEPOSIT( 3, SOUTHWEST, WOOD )");

        let build = StripsAction::BuildPeasant(BuildPeasantAction::new(0, 2, Position::new(5, 4)));
        assert_eq!(build.to_string(), "ACTION: BUILD_PEASANT( 0 )");
    }

    #[test]
    fn test_peasant_id_of_actions() {
        let build = StripsAction::BuildPeasant(BuildPeasantAction::new(0, 2, Position::new(5, 4)));
        assert_eq!(build.peasant_id(), None);
        let mv = StripsAction::Move(MoveAction::new(7, Position::new(0, 0)));
        assert_eq!(mv.peasant_id(), Some(7));
        assert_eq!(mv.kind(), ActionKind::Move);
    }
}

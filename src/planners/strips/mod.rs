mod actions;
mod executor;
mod heuristic;
mod planner;

pub use actions::{
    ActionKind, BuildPeasantAction, DepositAction, HANDLING_COST, HARVEST_QUANTUM, HarvestAction,
    MoveAction, Operator, StripsAction,
};
pub use executor::{ActionFeedback, EngineCommand, PlanExecutor, TickView};
pub use heuristic::Heuristic;
pub use planner::{DEFAULT_MAX_EXPANSIONS, DEFAULT_TIMEOUT_MS, Plan, Planner, PlannerConfig};

pub mod error;
pub mod infra;
pub mod planners;
pub mod state;

pub use error::{ConfigError, ExecutionError, PlanError, SnapshotError};
pub use infra::{PlannerParams, Position, Snapshot};
pub use planners::strips::{Plan, Planner, PlannerConfig};
pub use state::GameState;

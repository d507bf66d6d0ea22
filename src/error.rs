use std::time::Duration;

use thiserror::Error;

use crate::infra::Position;

#[derive(Debug, Error)]
pub enum PlanError {
    #[error("no plan found: frontier exhausted after {expanded} expansions (deepest state {max_depth})")]
    NoPlanFound { expanded: usize, max_depth: usize },

    #[error(
        "planning budget exhausted after {expanded} expansions in {elapsed:?} \
         ({frontier} states queued, deepest state {max_depth})"
    )]
    BudgetExhausted {
        expanded: usize,
        frontier: usize,
        max_depth: usize,
        elapsed: Duration,
    },

    #[error("precondition violated for {action}: {reason}")]
    PreconditionViolated { action: String, reason: String },

    #[error("no compass direction from {from} to {to}")]
    DirectionUndefined { from: Position, to: Position },

    #[error("peasant {id} does not exist in this state")]
    UnknownPeasant { id: u32 },

    #[error("resource {id} does not exist in this state")]
    UnknownResource { id: u32 },

    #[error("invalid snapshot: {0}")]
    InvalidSnapshot(String),
}

impl PlanError {
    pub(crate) fn precondition(action: impl ToString, reason: impl Into<String>) -> Self {
        PlanError::PreconditionViolated {
            action: action.to_string(),
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error(
        "expected {expected} parameters (required wood, required gold, build peasants), got {found}"
    )]
    WrongParameterCount { expected: usize, found: usize },

    #[error("parameter {name} is not a non-negative integer: {value:?}")]
    InvalidAmount { name: &'static str, value: String },

    #[error("parameter {name} is not a boolean: {value:?}")]
    InvalidFlag { name: &'static str, value: String },

    #[error("unknown heuristic {0:?}, expected \"guided\" or \"admissible\"")]
    UnknownHeuristic(String),
}

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("failed to read snapshot: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to decode snapshot: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExecutionError {
    #[error("unit {unit} failed to execute {action}")]
    ActionFailed { unit: u32, action: String },

    #[error("planned peasant {planned} was never produced by the engine")]
    UnmappedPeasant { planned: u32 },
}

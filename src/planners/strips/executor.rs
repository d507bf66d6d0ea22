use std::collections::{HashMap, HashSet, VecDeque};

use crate::error::ExecutionError;
use crate::infra::{Direction, PEASANT_TEMPLATE};
use crate::state::{PeasantId, UnitId};

use super::actions::StripsAction;
use super::planner::Plan;

/// Command handed to the engine for one unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineCommand {
    CompoundMove { unit: UnitId, x: i32, y: i32 },
    PrimitiveGather { unit: UnitId, direction: Direction },
    PrimitiveDeposit { unit: UnitId, direction: Direction },
    PrimitiveProduction { depot: UnitId, template: &'static str },
}

impl EngineCommand {
    pub fn unit(&self) -> UnitId {
        match self {
            EngineCommand::CompoundMove { unit, .. }
            | EngineCommand::PrimitiveGather { unit, .. }
            | EngineCommand::PrimitiveDeposit { unit, .. } => *unit,
            EngineCommand::PrimitiveProduction { depot, .. } => *depot,
        }
    }
}

/// Engine feedback for the command a unit received earlier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionFeedback {
    Incomplete,
    Completed,
    Failed,
}

/// What the executor needs to see of the engine each tick.
#[derive(Debug, Clone, Default)]
pub struct TickView {
    /// Engine ids of every live peasant
    pub peasants: Vec<UnitId>,
    pub feedback: HashMap<UnitId, ActionFeedback>,
}

/// Feeds a plan to the engine, one command per tick.
pub struct PlanExecutor {
    pending: VecDeque<StripsAction>,
    /// Commands issued and not yet finished, by engine unit id
    in_flight: HashMap<UnitId, StripsAction>,
    /// Planned peasant id to engine unit id
    units: HashMap<PeasantId, UnitId>,
    /// Planned ids of trained peasants the engine has not shown yet
    awaiting_spawn: VecDeque<PeasantId>,
    seen: HashSet<UnitId>,
    issued: usize,
}

impl PlanExecutor {
    /// `peasants` are the engine ids present when the snapshot was taken.
    /// They keep their ids in the plan.
    pub fn new(plan: &Plan, peasants: impl IntoIterator<Item = UnitId>) -> Self {
        let seen: HashSet<UnitId> = peasants.into_iter().collect();
        let units = seen.iter().map(|&id| (id, id)).collect();

        tracing::info!(actions = plan.len(), "Plan ready for execution");

        Self {
            pending: plan.actions.iter().cloned().collect(),
            in_flight: HashMap::new(),
            units,
            awaiting_spawn: VecDeque::new(),
            seen,
            issued: 0,
        }
    }

    pub fn remaining(&self) -> usize {
        self.pending.len()
    }

    pub fn is_finished(&self) -> bool {
        self.pending.is_empty() && self.in_flight.is_empty()
    }

    /// Engine id the plan's `planned` peasant is bound to, if any.
    pub fn unit_for(&self, planned: PeasantId) -> Option<UnitId> {
        self.units.get(&planned).copied()
    }

    fn apply_feedback(&mut self, view: &TickView) -> Result<(), ExecutionError> {
        for (&unit, &feedback) in &view.feedback {
            match feedback {
                ActionFeedback::Incomplete => {}
                ActionFeedback::Completed => {
                    if let Some(action) = self.in_flight.remove(&unit) {
                        tracing::debug!(unit = unit, "Completed {}", action);
                    }
                }
                ActionFeedback::Failed => {
                    let action = self
                        .in_flight
                        .remove(&unit)
                        .map_or_else(|| "unknown action".to_string(), |action| action.to_string());
                    tracing::warn!(unit = unit, "Failed {}", action);
                    return Err(ExecutionError::ActionFailed { unit, action });
                }
            }
        }
        Ok(())
    }

    fn bind_new_peasants(&mut self, view: &TickView) {
        for &unit in &view.peasants {
            if !self.seen.insert(unit) {
                continue;
            }
            match self.awaiting_spawn.pop_front() {
                Some(planned) => {
                    tracing::info!(planned = planned, unit = unit, "Bound trained peasant");
                    self.units.insert(planned, unit);
                }
                None => tracing::warn!(unit = unit, "Ignoring peasant the plan did not train"),
            }
        }
    }

    /// Engine unit that would run `action`, or `None` while it does not
    /// exist yet.
    fn resolve(&self, action: &StripsAction) -> Result<Option<UnitId>, ExecutionError> {
        let planned = match action {
            StripsAction::BuildPeasant(build) => return Ok(Some(build.depot_id)),
            StripsAction::Move(step) => step.peasant_id,
            StripsAction::Harvest(harvest) => harvest.peasant_id,
            StripsAction::Deposit(deposit) => deposit.peasant_id,
        };

        match self.units.get(&planned) {
            Some(&unit) => Ok(Some(unit)),
            None if self.awaiting_spawn.contains(&planned) => Ok(None),
            None => Err(ExecutionError::UnmappedPeasant { planned }),
        }
    }

    fn command(action: &StripsAction, unit: UnitId) -> EngineCommand {
        match action {
            StripsAction::Move(step) => EngineCommand::CompoundMove {
                unit,
                x: step.destination.x,
                y: step.destination.y,
            },
            StripsAction::Harvest(harvest) => EngineCommand::PrimitiveGather {
                unit,
                direction: harvest.direction,
            },
            StripsAction::Deposit(deposit) => EngineCommand::PrimitiveDeposit {
                unit,
                direction: deposit.direction,
            },
            StripsAction::BuildPeasant(_) => EngineCommand::PrimitiveProduction {
                depot: unit,
                template: PEASANT_TEMPLATE,
            },
        }
    }

    /// Processes last tick's feedback and returns the command to issue this
    /// tick, if the next action can start.
    pub fn step(&mut self, view: &TickView) -> Result<Option<EngineCommand>, ExecutionError> {
        self.apply_feedback(view)?;
        self.bind_new_peasants(view);

        let Some(action) = self.pending.front() else {
            return Ok(None);
        };

        if matches!(action, StripsAction::BuildPeasant(_)) && !self.in_flight.is_empty() {
            tracing::trace!(busy = self.in_flight.len(), "Build waits for idle units");
            return Ok(None);
        }

        let Some(unit) = self.resolve(action)? else {
            tracing::trace!("Waiting for trained peasant to appear");
            return Ok(None);
        };
        if self.in_flight.contains_key(&unit) {
            return Ok(None);
        }

        let Some(action) = self.pending.pop_front() else {
            return Ok(None);
        };
        let command = Self::command(&action, unit);
        if let StripsAction::BuildPeasant(build) = &action {
            self.awaiting_spawn.push_back(build.peasant_id);
        }

        self.issued += 1;
        tracing::info!(
            unit = unit,
            step = self.issued,
            remaining = self.pending.len(),
            "Issuing {}",
            action
        );
        self.in_flight.insert(unit, action);
        Ok(Some(command))
    }
}

use tracing::{debug, info, warn};

use crate::error::PlanError;
use crate::state::GameState;

/// Trait for observing the search as it runs.
pub trait SearchObserver {
    /// Called once with the root state, before the first expansion
    fn on_search_start(&mut self, root: &GameState);

    /// Called when a state is taken off the frontier for expansion
    fn on_expand(&mut self, state: &GameState, expanded: usize, frontier: usize);

    /// Called when a queued state is reached again through a cheaper path
    fn on_better_path(&mut self, _state: &GameState) {
        // Default implementation does nothing
    }

    /// Called with the goal state the plan is reconstructed from
    fn on_goal(&mut self, goal: &GameState, expanded: usize);

    /// Called when the search gives up
    fn on_failure(&mut self, error: &PlanError);
}

pub struct DefaultObserver;

impl SearchObserver for DefaultObserver {
    fn on_search_start(&mut self, root: &GameState) {
        info!(
            peasants = root.peasant_count(),
            resources = root.resources().len(),
            h = root.h_cost,
            "Search started"
        );
    }

    fn on_expand(&mut self, state: &GameState, expanded: usize, frontier: usize) {
        debug!(
            expanded = expanded,
            frontier = frontier,
            depth = state.depth,
            g = state.g_cost,
            h = state.h_cost,
            gold = state.current_gold(),
            wood = state.current_wood(),
            "Expanding state"
        );
    }

    fn on_goal(&mut self, goal: &GameState, expanded: usize) {
        info!(
            expanded = expanded,
            depth = goal.depth,
            cost = goal.g_cost,
            "Goal reached"
        );
    }

    fn on_failure(&mut self, error: &PlanError) {
        warn!("Search failed: {}", error);
    }
}

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};
use std::fmt;
use std::time::{Duration, Instant};

use crate::error::PlanError;
use crate::infra::{DefaultObserver, SearchObserver};
use crate::state::{GameState, StateId, StateKey};

use super::actions::StripsAction;
use super::heuristic::Heuristic;

pub const DEFAULT_MAX_EXPANSIONS: usize = 200_000;
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlannerConfig {
    pub max_expansions: usize,
    pub timeout: Duration,
    pub heuristic: Heuristic,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            max_expansions: DEFAULT_MAX_EXPANSIONS,
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            heuristic: Heuristic::default(),
        }
    }
}

/// Ordered actions from the root to a goal state.
#[derive(Debug, Clone, PartialEq)]
pub struct Plan {
    pub actions: Vec<StripsAction>,
    /// g of the goal state
    pub cost: f64,
    pub expanded: usize,
}

impl Plan {
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for action in &self.actions {
            writeln!(f, "{}", action)?;
        }
        Ok(())
    }
}

/// Frontier entry. The arena holds the state; the entry only carries what
/// the ordering needs.
#[derive(Debug, Clone, Copy)]
struct FrontierEntry {
    f: f64,
    sequence: u64,
    id: StateId,
}

impl PartialEq for FrontierEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FrontierEntry {}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed for a min-heap: lowest f first, then oldest entry
        other
            .f
            .total_cmp(&self.f)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

/// A* over [`GameState`]s. States live in an arena and refer to their
/// parent by [`StateId`].
pub struct Planner<O: SearchObserver = DefaultObserver> {
    config: PlannerConfig,
    observer: O,

    arena: Vec<GameState>,
    /// Sequence number of the live frontier entry per arena slot
    queued: Vec<u64>,
    frontier: BinaryHeap<FrontierEntry>,
    /// Queued states, not counting stale heap entries
    open: usize,
    index: HashMap<StateKey, StateId>,
    closed: HashSet<StateId>,
    next_sequence: u64,
    expanded: usize,
    max_depth: usize,
}

impl Planner<DefaultObserver> {
    pub fn new(config: PlannerConfig) -> Self {
        Self::with_observer(config, DefaultObserver)
    }
}

impl<O: SearchObserver> Planner<O> {
    pub fn with_observer(config: PlannerConfig, observer: O) -> Self {
        Self {
            config,
            observer,
            arena: Vec::new(),
            queued: Vec::new(),
            frontier: BinaryHeap::new(),
            open: 0,
            index: HashMap::new(),
            closed: HashSet::new(),
            next_sequence: 0,
            expanded: 0,
            max_depth: 0,
        }
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn into_observer(self) -> O {
        self.observer
    }

    fn reset(&mut self) {
        self.arena.clear();
        self.queued.clear();
        self.frontier.clear();
        self.open = 0;
        self.index.clear();
        self.closed.clear();
        self.next_sequence = 0;
        self.expanded = 0;
        self.max_depth = 0;
    }

    fn score(&self, state: &mut GameState) {
        state.h_cost = self.config.heuristic.estimate(state);
        state.f_cost = state.g_cost + state.h_cost;
    }

    fn enqueue(&mut self, id: StateId) {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.queued[id.0] = sequence;
        self.frontier.push(FrontierEntry {
            f: self.arena[id.0].f_cost,
            sequence,
            id,
        });
    }

    fn insert(&mut self, key: StateKey, state: GameState) -> StateId {
        let id = StateId(self.arena.len());
        self.arena.push(state);
        self.queued.push(0);
        self.index.insert(key, id);
        self.open += 1;
        self.enqueue(id);
        id
    }

    /// Adds a successor of `parent`, or improves the queued copy of the
    /// same state when `child` reached it more cheaply.
    fn relax(&mut self, parent: StateId, mut child: GameState) {
        child.parent = Some(parent);
        self.score(&mut child);
        let key = child.key();

        match self.index.get(&key).copied() {
            Some(existing) if self.closed.contains(&existing) => {}
            Some(existing) => {
                if child.g_cost < self.arena[existing.0].g_cost {
                    tracing::trace!(
                        state = existing.0,
                        old_g = self.arena[existing.0].g_cost,
                        new_g = child.g_cost,
                        "Found better path"
                    );
                    self.observer.on_better_path(&child);
                    self.arena[existing.0] = child;
                    self.enqueue(existing);
                }
            }
            None => {
                self.insert(key, child);
            }
        }
    }

    /// Walks parent handles from `goal` back to the root.
    fn reconstruct(&self, goal: StateId) -> Vec<StripsAction> {
        let mut actions = Vec::new();
        let mut cursor = Some(goal);
        while let Some(id) = cursor {
            let state = &self.arena[id.0];
            if let Some(action) = &state.action {
                actions.push(action.clone());
            }
            cursor = state.parent;
        }
        actions.reverse();
        actions
    }

    fn fail(&mut self, error: PlanError) -> Result<Plan, PlanError> {
        self.observer.on_failure(&error);
        Err(error)
    }

    /// Searches for a least-f path from `root` to a goal state.
    #[tracing::instrument(
        skip(self, root),
        fields(
            max_expansions = self.config.max_expansions,
            heuristic = %self.config.heuristic
        )
    )]
    pub fn plan(&mut self, mut root: GameState) -> Result<Plan, PlanError> {
        self.reset();
        let start_time = Instant::now();

        root.parent = None;
        root.action = None;
        self.score(&mut root);
        self.observer.on_search_start(&root);
        let key = root.key();
        self.insert(key, root);

        while let Some(entry) = self.frontier.pop() {
            if self.closed.contains(&entry.id) || self.queued[entry.id.0] != entry.sequence {
                continue;
            }
            self.open -= 1;

            if self.arena[entry.id.0].is_goal() {
                let goal = &self.arena[entry.id.0];
                self.observer.on_goal(goal, self.expanded);
                return Ok(Plan {
                    actions: self.reconstruct(entry.id),
                    cost: goal.g_cost,
                    expanded: self.expanded,
                });
            }

            let elapsed = start_time.elapsed();
            if self.expanded >= self.config.max_expansions || elapsed >= self.config.timeout {
                let error = PlanError::BudgetExhausted {
                    expanded: self.expanded,
                    frontier: self.open + 1,
                    max_depth: self.max_depth,
                    elapsed,
                };
                return self.fail(error);
            }

            self.closed.insert(entry.id);
            self.expanded += 1;

            let state = &self.arena[entry.id.0];
            self.max_depth = self.max_depth.max(state.depth);
            self.observer.on_expand(state, self.expanded, self.open);

            let children = match state.generate_children() {
                Ok(children) => children,
                Err(error) => return self.fail(error),
            };
            for child in children {
                self.relax(entry.id, child);
            }
        }

        let error = PlanError::NoPlanFound {
            expanded: self.expanded,
            max_depth: self.max_depth,
        };
        self.fail(error)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::infra::{Bounds, Direction, PlannerParams, Position, ResourceKind};
    use crate::planners::strips::{DepositAction, HarvestAction, MoveAction};
    use crate::state::game_state::tests::{scenario, small_state};
    use crate::state::{Depot, Peasant, PeasantId, ResourceDeposit, Scenario};

    #[derive(Default)]
    struct RecordingObserver {
        started: bool,
        expanded: Vec<StateKey>,
        goal_depth: Option<usize>,
        failures: usize,
    }

    impl SearchObserver for RecordingObserver {
        fn on_search_start(&mut self, _root: &GameState) {
            self.started = true;
        }

        fn on_expand(&mut self, state: &GameState, _expanded: usize, _frontier: usize) {
            self.expanded.push(state.key());
        }

        fn on_goal(&mut self, goal: &GameState, _expanded: usize) {
            self.goal_depth = Some(goal.depth);
        }

        fn on_failure(&mut self, _error: &PlanError) {
            self.failures += 1;
        }
    }

    /// Depot at (2,2), one peasant at (3,3), a gold mine of 100 at (7,7).
    fn move_state(max_food: u32) -> GameState {
        let scenario = Arc::new(Scenario::new(
            Bounds::new(10, 10),
            Depot {
                id: 0,
                position: Position::new(2, 2),
                supply_cap: 3,
            },
            PlannerParams::new(0, 100, false),
        ));
        GameState::new(
            scenario,
            [Peasant::new(1, Position::new(3, 3))],
            [ResourceDeposit::new(5, ResourceKind::Gold, Position::new(7, 7), 100)],
            max_food,
        )
    }

    fn replay(root: &GameState, plan: &Plan) -> GameState {
        plan.actions.iter().fold(root.clone(), |state, action| {
            let mut next = state.child();
            action
                .apply(&mut next)
                .unwrap_or_else(|error| panic!("{} failed on replay: {}", action, error));
            next
        })
    }

    #[test]
    fn test_frontier_orders_by_f_then_fifo() {
        let mut heap = BinaryHeap::new();
        heap.push(FrontierEntry { f: 3.0, sequence: 0, id: StateId(0) });
        heap.push(FrontierEntry { f: 1.0, sequence: 2, id: StateId(1) });
        heap.push(FrontierEntry { f: 1.0, sequence: 1, id: StateId(2) });
        heap.push(FrontierEntry { f: 2.0, sequence: 3, id: StateId(3) });

        let order: Vec<usize> = std::iter::from_fn(|| heap.pop()).map(|e| e.id.0).collect();
        assert_eq!(order, vec![2, 1, 3, 0]);
    }

    #[test]
    fn test_small_scenario_plan() {
        let root = small_state(200);
        let plan = Planner::new(PlannerConfig::default()).plan(root.clone()).unwrap();

        let harvest = StripsAction::Harvest(HarvestAction::new(1, Direction::North, ResourceKind::Gold, 2));
        let deposit = StripsAction::Deposit(DepositAction::new(1, Direction::East, ResourceKind::Gold));
        assert_eq!(
            plan.actions,
            vec![harvest.clone(), deposit.clone(), harvest, deposit]
        );
        assert_eq!(plan.cost, 8.0);

        let goal = replay(&root, &plan);
        assert!(goal.is_goal());
        assert_eq!(goal.current_gold(), 200);
        assert_eq!(goal.resource(2).unwrap().amount_remaining, 300);
    }

    #[test]
    fn test_plan_moves_between_mine_and_townhall() {
        let plan = Planner::new(PlannerConfig::default()).plan(move_state(2)).unwrap();

        let expected = vec![
            StripsAction::Move(MoveAction::new(1, Position::new(6, 6))),
            StripsAction::Harvest(HarvestAction::new(1, Direction::SouthEast, ResourceKind::Gold, 5)),
            StripsAction::Move(MoveAction::new(1, Position::new(3, 3))),
            StripsAction::Deposit(DepositAction::new(1, Direction::NorthWest, ResourceKind::Gold)),
        ];
        assert_eq!(plan.actions, expected);
        assert!((plan.cost - (2.0 * 18f64.sqrt() + 4.0)).abs() < 1e-9);

        let text = plan.to_string();
        assert_eq!(
            text.lines().collect::<Vec<_>>(),
            vec![
                "ACTION: MOVE( 1, 6, 6 )",
                "ACTION: HARVEST( 1, SOUTHEAST, GOLD )",
                "ACTION: MOVE( 1, 3, 3 )",
                "ACTION: DEPOSIT( 1, NORTHWEST, GOLD )",
            ]
        );
    }

    #[test]
    fn test_admissible_plan_is_optimal() {
        let config = PlannerConfig {
            heuristic: Heuristic::Admissible,
            ..PlannerConfig::default()
        };
        let plan = Planner::new(config).plan(move_state(2)).unwrap();
        assert_eq!(plan.len(), 4);
        assert!((plan.cost - (2.0 * 18f64.sqrt() + 4.0)).abs() < 1e-9);
    }

    #[test]
    fn test_goal_root_yields_empty_plan() {
        let plan = Planner::new(PlannerConfig::default()).plan(small_state(0)).unwrap();
        assert!(plan.is_empty());
        assert_eq!(plan.cost, 0.0);
        assert_eq!(plan.expanded, 0);
        assert_eq!(plan.to_string(), "");
    }

    #[test]
    fn test_no_plan_when_resource_missing() {
        // Wood is required but the map has none.
        let root = GameState::new(
            scenario(0, 100, false),
            [Peasant::new(1, Position::new(4, 5))],
            [ResourceDeposit::new(2, ResourceKind::Gold, Position::new(4, 4), 500)],
            2,
        );
        let mut planner = Planner::with_observer(PlannerConfig::default(), RecordingObserver::default());

        let result = planner.plan(root);

        assert!(
            matches!(result, Err(PlanError::NoPlanFound { expanded: 1, .. })),
            "got {:?}",
            result
        );
        assert_eq!(planner.observer().failures, 1);
    }

    #[test]
    fn test_budget_exhaustion_is_distinct() {
        let config = PlannerConfig {
            max_expansions: 1,
            ..PlannerConfig::default()
        };
        let result = Planner::new(config).plan(move_state(2));

        match result {
            Err(PlanError::BudgetExhausted { expanded, frontier, .. }) => {
                assert_eq!(expanded, 1);
                assert_eq!(frontier, 8, "every open cell around the mine is queued");
            }
            other => panic!("expected budget exhaustion, got {:?}", other),
        }
    }

    #[test]
    fn test_reported_frontier_excludes_stale_entries() {
        let root = GameState::new(
            scenario(300, 0, false),
            [Peasant::new(1, Position::new(0, 0)), Peasant::new(2, Position::new(9, 9))],
            [ResourceDeposit::new(2, ResourceKind::Gold, Position::new(4, 4), 500)],
            1,
        );
        let config = PlannerConfig {
            max_expansions: 5,
            ..PlannerConfig::default()
        };
        let mut planner = Planner::new(config);

        match planner.plan(root) {
            Err(PlanError::BudgetExhausted { frontier, .. }) => {
                assert_eq!(frontier, planner.index.len() - planner.closed.len());
                assert!(planner.frontier.len() + 1 >= frontier);
            }
            other => panic!("expected budget exhaustion, got {:?}", other),
        }
    }

    #[test]
    fn test_zero_timeout_exhausts_budget() {
        let config = PlannerConfig {
            timeout: Duration::ZERO,
            ..PlannerConfig::default()
        };
        let result = Planner::new(config).plan(move_state(2));
        assert!(matches!(result, Err(PlanError::BudgetExhausted { .. })));
    }

    #[test]
    fn test_search_is_deterministic() {
        let mut first = Planner::with_observer(PlannerConfig::default(), RecordingObserver::default());
        let mut second = Planner::with_observer(PlannerConfig::default(), RecordingObserver::default());

        let plan_a = first.plan(move_state(2)).unwrap();
        let plan_b = second.plan(move_state(2)).unwrap();

        assert_eq!(plan_a, plan_b);
        assert_eq!(first.observer().expanded, second.observer().expanded);
        assert!(first.observer().started);
        assert_eq!(first.observer().goal_depth, Some(4));
    }

    #[test]
    fn test_planner_is_reusable() {
        let mut planner = Planner::new(PlannerConfig::default());
        let first = planner.plan(move_state(2)).unwrap();
        let second = planner.plan(move_state(2)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_build_precedes_use_of_new_peasant() {
        let root = GameState::new(
            scenario(1000, 0, true),
            [Peasant::new(1, Position::new(4, 5))],
            [ResourceDeposit::new(2, ResourceKind::Gold, Position::new(4, 4), 3000)],
            2,
        );
        let plan = Planner::new(PlannerConfig::default()).plan(root.clone()).unwrap();

        let builds: Vec<(usize, PeasantId)> = plan
            .actions
            .iter()
            .enumerate()
            .filter_map(|(index, action)| match action {
                StripsAction::BuildPeasant(build) => Some((index, build.peasant_id)),
                _ => None,
            })
            .collect();
        assert!(!builds.is_empty(), "a large gold target should train a peasant");

        for (build_index, trained) in &builds {
            let first_use = plan
                .actions
                .iter()
                .position(|action| action.peasant_id() == Some(*trained));
            if let Some(first_use) = first_use {
                assert!(first_use > *build_index, "peasant {} used before it was trained", trained);
            }
        }

        let goal = replay(&root, &plan);
        assert!(goal.is_goal());
        assert_eq!(goal.food(), root.food() - builds.len() as u32);
        assert_eq!(goal.peasant_count(), 1 + builds.len());
    }
}

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::error::PlanError;
use crate::infra::{
    Bounds, PEASANT_TEMPLATE, PlannerParams, Position, ResourceKind, Snapshot, TOWNHALL_TEMPLATE,
};
use crate::planners::strips::{
    BuildPeasantAction, DepositAction, HarvestAction, MoveAction, StripsAction,
};
use crate::state::{CARRY_CAPACITY, Cargo, Depot, Peasant, PeasantId, ResourceDeposit, ResourceId, Scenario};

/// Gold spent by the townhall to train one peasant.
pub const PEASANT_GOLD_COST: u32 = 400;

/// Stable handle of a state inside the planner's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateId(pub usize);

/// Identity of a state for duplicate pruning. Ignores path, cost and ids;
/// units and deposits are compared as multisets.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StateKey {
    current_gold: u32,
    current_wood: u32,
    peasants: Vec<(Position, Option<Cargo>)>,
    resources: Vec<(Position, ResourceKind, u32)>,
}

/// A node of the planning graph: the simulated world plus A* bookkeeping.
#[derive(Debug, Clone)]
pub struct GameState {
    scenario: Arc<Scenario>,

    current_gold: u32,
    current_wood: u32,
    /// Lifetime totals, only read by the heuristic
    gross_gold: u32,
    gross_wood: u32,
    /// Remaining supply slots
    food: u32,

    peasants: BTreeMap<PeasantId, Peasant>,
    resources: Vec<ResourceDeposit>,

    pub depth: usize,
    /// Cost of the action that produced this state from its parent
    pub edge_cost: f64,
    pub g_cost: f64,
    pub h_cost: f64,
    pub f_cost: f64,
    /// Action that produced this state. `None` for the root.
    pub action: Option<StripsAction>,
    /// Arena handle of the parent, used for plan reconstruction only.
    pub parent: Option<StateId>,
}

impl GameState {
    pub fn new(
        scenario: Arc<Scenario>,
        peasants: impl IntoIterator<Item = Peasant>,
        resources: impl IntoIterator<Item = ResourceDeposit>,
        food: u32,
    ) -> Self {
        let peasants: BTreeMap<PeasantId, Peasant> =
            peasants.into_iter().map(|peasant| (peasant.id, peasant)).collect();
        let resources = resources
            .into_iter()
            .filter(|resource| !resource.is_exhausted())
            .collect();

        Self {
            scenario,
            current_gold: 0,
            current_wood: 0,
            gross_gold: 0,
            gross_wood: 0,
            food,
            peasants,
            resources,
            depth: 0,
            edge_cost: 0.0,
            g_cost: 0.0,
            h_cost: 0.0,
            f_cost: 0.0,
            action: None,
            parent: None,
        }
    }

    /// Builds the root state from an engine snapshot.
    pub fn from_snapshot(snapshot: &Snapshot, params: PlannerParams) -> Result<Self, PlanError> {
        let bounds = Bounds::new(snapshot.width, snapshot.height);

        let townhall = snapshot
            .units
            .iter()
            .find(|unit| unit.is_template(TOWNHALL_TEMPLATE))
            .ok_or_else(|| PlanError::InvalidSnapshot("no townhall in snapshot".to_string()))?;

        let peasants: Vec<Peasant> = snapshot
            .units
            .iter()
            .filter(|unit| unit.is_template(PEASANT_TEMPLATE))
            .map(|unit| {
                let peasant = Peasant::new(unit.id, unit.position());
                match (unit.cargo_type, unit.cargo_amount) {
                    (_, amount) if amount > CARRY_CAPACITY => Err(PlanError::InvalidSnapshot(format!(
                        "peasant {} carries {} but can hold {}",
                        unit.id, amount, CARRY_CAPACITY
                    ))),
                    (None, amount) if amount > 0 => Err(PlanError::InvalidSnapshot(format!(
                        "peasant {} carries {} of no resource type",
                        unit.id, amount
                    ))),
                    (Some(kind), amount) => Ok(peasant.with_cargo(kind, amount)),
                    (None, _) => Ok(peasant),
                }
            })
            .collect::<Result<_, _>>()?;

        if peasants.is_empty() {
            return Err(PlanError::InvalidSnapshot("no peasants in snapshot".to_string()));
        }

        let resources: Vec<ResourceDeposit> = snapshot
            .resources
            .iter()
            .map(|r| ResourceDeposit::new(r.id, r.kind, r.position(), r.amount_remaining))
            .collect();

        let outside = peasants
            .iter()
            .map(|p| p.position)
            .chain(resources.iter().map(|r| r.position))
            .chain(std::iter::once(townhall.position()))
            .find(|pos| !bounds.contains(pos));
        if let Some(pos) = outside {
            return Err(PlanError::InvalidSnapshot(format!(
                "{} lies outside the {}x{} map",
                pos, bounds.width, bounds.height
            )));
        }

        let supply_cap = townhall.supply_cap.unwrap_or(0);
        let food = supply_cap.saturating_sub(peasants.len() as u32);
        let depot = Depot {
            id: townhall.id,
            position: townhall.position(),
            supply_cap,
        };

        tracing::info!(
            peasants = peasants.len(),
            resources = resources.len(),
            depot = %depot.position,
            food = food,
            required_gold = params.required_gold,
            required_wood = params.required_wood,
            build_peasants = params.build_peasants,
            "Built root state from snapshot"
        );

        let first_free_id = snapshot.units.iter().map(|unit| unit.id + 1).max().unwrap_or(0);
        let scenario = Arc::new(Scenario::new(bounds, depot, params).with_first_free_id(first_free_id));
        Ok(Self::new(scenario, peasants, resources, food))
    }

    /// Copy of this state one level deeper, ready for exactly one action.
    pub fn child(&self) -> GameState {
        GameState {
            depth: self.depth + 1,
            edge_cost: 0.0,
            h_cost: 0.0,
            f_cost: 0.0,
            action: None,
            parent: None,
            ..self.clone()
        }
    }

    pub fn scenario(&self) -> &Scenario {
        &self.scenario
    }

    pub fn depot(&self) -> &Depot {
        &self.scenario.depot
    }

    pub fn current_gold(&self) -> u32 {
        self.current_gold
    }

    pub fn current_wood(&self) -> u32 {
        self.current_wood
    }

    pub fn gross_gold(&self) -> u32 {
        self.gross_gold
    }

    pub fn gross_wood(&self) -> u32 {
        self.gross_wood
    }

    pub fn food(&self) -> u32 {
        self.food
    }

    pub fn peasants(&self) -> impl Iterator<Item = &Peasant> {
        self.peasants.values()
    }

    pub fn peasant_count(&self) -> usize {
        self.peasants.len()
    }

    pub fn peasant(&self, id: PeasantId) -> Result<&Peasant, PlanError> {
        self.peasants.get(&id).ok_or(PlanError::UnknownPeasant { id })
    }

    pub(crate) fn peasant_mut(&mut self, id: PeasantId) -> Result<&mut Peasant, PlanError> {
        self.peasants.get_mut(&id).ok_or(PlanError::UnknownPeasant { id })
    }

    pub(crate) fn add_peasant(&mut self, peasant: Peasant) {
        self.peasants.insert(peasant.id, peasant);
    }

    pub fn resources(&self) -> &[ResourceDeposit] {
        &self.resources
    }

    pub fn resource(&self, id: ResourceId) -> Result<&ResourceDeposit, PlanError> {
        self.resources
            .iter()
            .find(|resource| resource.id == id)
            .ok_or(PlanError::UnknownResource { id })
    }

    pub(crate) fn resource_mut(&mut self, id: ResourceId) -> Result<&mut ResourceDeposit, PlanError> {
        self.resources
            .iter_mut()
            .find(|resource| resource.id == id)
            .ok_or(PlanError::UnknownResource { id })
    }

    pub(crate) fn remove_exhausted_resources(&mut self) {
        self.resources.retain(|resource| !resource.is_exhausted());
    }

    pub fn is_goal(&self) -> bool {
        self.current_gold >= self.scenario.required_gold
            && self.current_wood >= self.scenario.required_wood
    }

    /// Whether more of `kind` still has to reach the townhall.
    pub fn need_resource(&self, kind: ResourceKind) -> bool {
        match kind {
            ResourceKind::Gold => self.current_gold < self.scenario.required_gold,
            ResourceKind::Wood => self.current_wood < self.scenario.required_wood,
        }
    }

    pub(crate) fn add_resource(&mut self, kind: ResourceKind, amount: u32) {
        match kind {
            ResourceKind::Gold => {
                self.current_gold += amount;
                self.gross_gold += amount;
            }
            ResourceKind::Wood => {
                self.current_wood += amount;
                self.gross_wood += amount;
            }
        }
    }

    pub(crate) fn spend_gold(&mut self, amount: u32) -> Option<u32> {
        self.current_gold = self.current_gold.checked_sub(amount)?;
        Some(self.current_gold)
    }

    pub(crate) fn consume_food(&mut self) -> Option<u32> {
        self.food = self.food.checked_sub(1)?;
        Some(self.food)
    }

    /// Records the cost of the action just applied.
    pub(crate) fn record_edge(&mut self, cost: f64) {
        self.edge_cost = cost;
        self.g_cost += cost;
    }

    /// Cells a move or a new peasant may not take: the townhall, every
    /// peasant and every remaining deposit.
    pub fn occupied_positions(&self) -> HashSet<Position> {
        std::iter::once(self.depot().position)
            .chain(self.peasants.values().map(|peasant| peasant.position))
            .chain(self.resources.iter().map(|resource| resource.position))
            .collect()
    }

    pub fn open_neighbors(&self, pos: &Position) -> Vec<Position> {
        pos.valid_open_neighbors(&self.scenario.bounds, &self.occupied_positions())
    }

    /// Placeholder id for the next trained peasant, above every id the
    /// snapshot used and every peasant trained so far.
    pub fn next_peasant_id(&self) -> PeasantId {
        self.peasants
            .keys()
            .next_back()
            .map_or(0, |id| id + 1)
            .max(self.scenario.first_free_id)
    }

    pub fn key(&self) -> StateKey {
        let mut peasants: Vec<_> = self
            .peasants
            .values()
            .map(|peasant| (peasant.position, peasant.cargo()))
            .collect();
        peasants.sort();

        let mut resources: Vec<_> = self
            .resources
            .iter()
            .map(|resource| (resource.position, resource.kind, resource.amount_remaining))
            .collect();
        resources.sort();

        StateKey {
            current_gold: self.current_gold,
            current_wood: self.current_wood,
            peasants,
            resources,
        }
    }

    /// Every action applicable from this state, in a reproducible order.
    pub fn candidate_actions(&self) -> Result<Vec<StripsAction>, PlanError> {
        let depot_pos = self.depot().position;
        let occupied = self.occupied_positions();
        let bounds = &self.scenario.bounds;
        let mut candidates = Vec::new();

        for peasant in self.peasants.values() {
            if let Some(cargo) = peasant.cargo() {
                if peasant.position.is_adjacent(&depot_pos) {
                    let direction = peasant.position.direction_to(&depot_pos)?;
                    candidates.push(StripsAction::Deposit(DepositAction::new(
                        peasant.id,
                        direction,
                        cargo.kind,
                    )));
                } else {
                    for destination in depot_pos.valid_open_neighbors(bounds, &occupied) {
                        candidates.push(StripsAction::Move(MoveAction::new(peasant.id, destination)));
                    }
                }
                continue;
            }

            for resource in self.resources.iter().filter(|r| self.need_resource(r.kind)) {
                if peasant.position.is_adjacent(&resource.position) {
                    let direction = peasant.position.direction_to(&resource.position)?;
                    candidates.push(StripsAction::Harvest(HarvestAction::new(
                        peasant.id,
                        direction,
                        resource.kind,
                        resource.id,
                    )));
                } else {
                    for destination in resource.position.valid_open_neighbors(bounds, &occupied) {
                        candidates.push(StripsAction::Move(MoveAction::new(peasant.id, destination)));
                    }
                }
            }
        }

        if let Some(build) = BuildPeasantAction::generate(self) {
            candidates.push(StripsAction::BuildPeasant(build));
        }

        Ok(candidates)
    }

    /// Successor states, one per candidate action. Never mutates `self`.
    pub fn generate_children(&self) -> Result<Vec<GameState>, PlanError> {
        let candidates = self.candidate_actions()?;

        tracing::trace!(
            depth = self.depth,
            total = candidates.len(),
            moves = candidates.iter().filter(|a| matches!(a, StripsAction::Move(_))).count(),
            harvests = candidates.iter().filter(|a| matches!(a, StripsAction::Harvest(_))).count(),
            deposits = candidates.iter().filter(|a| matches!(a, StripsAction::Deposit(_))).count(),
            builds = candidates.iter().filter(|a| matches!(a, StripsAction::BuildPeasant(_))).count(),
            "Generated candidates"
        );

        candidates
            .into_iter()
            .map(|action| {
                let mut child = self.child();
                action.apply(&mut child)?;
                child.action = Some(action);
                Ok(child)
            })
            .collect()
    }
}

impl PartialEq for GameState {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for GameState {}

impl Hash for GameState {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "GameState depth {}", self.depth)?;
        writeln!(
            f,
            "  cost: edge {:.2} | g {:.2} | h {:.2} | f {:.2}",
            self.edge_cost, self.g_cost, self.h_cost, self.f_cost
        )?;
        writeln!(
            f,
            "  gold: {} (gross {}) | wood: {} (gross {}) | food: {}",
            self.current_gold, self.gross_gold, self.current_wood, self.gross_wood, self.food
        )?;
        write!(
            f,
            "  peasants: {} | resources: {}",
            self.peasants.len(),
            self.resources.len()
        )?;
        if let Some(action) = &self.action {
            write!(f, "\n  {}", action)?;
        }
        Ok(())
    }
}

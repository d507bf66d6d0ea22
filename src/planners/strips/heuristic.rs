use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;
use crate::infra::ResourceKind;
use crate::state::{CARRY_CAPACITY, GameState};

use super::actions::{ActionKind, HANDLING_COST};

// Per-peasant penalties keyed on the action that produced the state.
const CARRYING_AFTER_MOVE: f64 = 25.0;
const EMPTY_AFTER_HARVEST: f64 = 50.0;
const EMPTY_AFTER_MOVE: f64 = 300.0;

const PENALTY_SCALE: f64 = 10.0;
const PROGRESS_WEIGHT: f64 = 2.5;
const FOOD_WEIGHT: f64 = 400.0;
const BASE_FOOD: f64 = 2.0;
const TARGET_PEASANTS: i32 = 3;

/// Remaining-cost estimate used to order the frontier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Heuristic {
    /// Hand-tuned guidance. Finds plans fast but is not a lower bound, so
    /// plans are not guaranteed optimal. With training enabled it can pull
    /// the search towards builds the gold supply cannot fund and exhaust
    /// the budget on maps that are solvable without them.
    #[default]
    Guided,
    /// Counts the gathers and drop-offs still unavoidable. Never
    /// overestimates, so A* returns least-cost plans, at the price of a
    /// much wider search.
    Admissible,
}

impl Heuristic {
    pub fn estimate(self, state: &GameState) -> f64 {
        match self {
            Heuristic::Guided => guided(state),
            Heuristic::Admissible => admissible(state),
        }
    }
}

impl fmt::Display for Heuristic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Heuristic::Guided => write!(f, "guided"),
            Heuristic::Admissible => write!(f, "admissible"),
        }
    }
}

impl FromStr for Heuristic {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "guided" => Ok(Heuristic::Guided),
            "admissible" => Ok(Heuristic::Admissible),
            _ => Err(ConfigError::UnknownHeuristic(value.to_string())),
        }
    }
}

fn guided(state: &GameState) -> f64 {
    let generated_by = state.action.as_ref().map(|action| action.kind());

    let mut h: f64 = state
        .peasants()
        .map(|peasant| match (peasant.is_carrying(), generated_by) {
            (true, Some(ActionKind::Move)) => CARRYING_AFTER_MOVE,
            (false, Some(ActionKind::Harvest)) => EMPTY_AFTER_HARVEST,
            (false, Some(ActionKind::Move)) => EMPTY_AFTER_MOVE,
            _ => 0.0,
        })
        .sum();

    if generated_by != Some(ActionKind::BuildPeasant) {
        h *= PENALTY_SCALE;
    }

    let scenario = state.scenario();
    let required = f64::from(scenario.required_wood) + f64::from(scenario.required_gold);
    let gathered = f64::from(state.gross_wood()) + f64::from(state.gross_gold());
    let food = f64::from(state.food());
    h += PROGRESS_WEIGHT * (required + FOOD_WEIGHT * (BASE_FOOD - food)) - PROGRESS_WEIGHT * gathered;

    let peasants = state.peasant_count().max(1);
    h *= 2f64.powi(TARGET_PEASANTS - peasants as i32);
    h / peasants as f64
}

/// Every missing hundred still needs one drop-off, and every missing
/// hundred not already in a peasant's hands needs one gather.
fn admissible(state: &GameState) -> f64 {
    let scenario = state.scenario();
    [
        (ResourceKind::Gold, scenario.required_gold, state.current_gold()),
        (ResourceKind::Wood, scenario.required_wood, state.current_wood()),
    ]
    .into_iter()
    .map(|(kind, required, current)| {
        let deficit = required.saturating_sub(current);
        let carried: u32 = state
            .peasants()
            .filter(|peasant| peasant.cargo_kind() == Some(kind))
            .map(|peasant| peasant.cargo_amount())
            .sum();
        let deposits = deficit.div_ceil(CARRY_CAPACITY);
        let harvests = deficit.saturating_sub(carried).div_ceil(CARRY_CAPACITY);
        HANDLING_COST * f64::from(deposits + harvests)
    })
    .sum()
}

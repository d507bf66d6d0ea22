pub(crate) mod game_state;
mod peasant;
mod resource;
mod scenario;

pub use game_state::{GameState, PEASANT_GOLD_COST, StateId, StateKey};
pub use peasant::{CARRY_CAPACITY, Cargo, Peasant, PeasantId};
pub use resource::{ResourceDeposit, ResourceId};
pub use scenario::{Depot, Scenario, UnitId};

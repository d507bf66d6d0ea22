mod params;
mod plan_file;
mod search_observer;
mod snapshot;
mod types;

pub use params::PlannerParams;
pub use plan_file::PlanFile;
pub use search_observer::{DefaultObserver, SearchObserver};
pub use snapshot::{
    PEASANT_TEMPLATE, ResourceSnapshot, Snapshot, TOWNHALL_TEMPLATE, UnitSnapshot,
};
pub use types::{Bounds, Direction, Position, ResourceKind};

use crate::infra::{Position, ResourceKind};

pub type PeasantId = u32;

/// Most a peasant can carry in one trip.
pub const CARRY_CAPACITY: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cargo {
    pub kind: ResourceKind,
    pub amount: u32,
}

/// A worker as seen by one search node. Every derived state owns its own copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Peasant {
    pub id: PeasantId,
    pub position: Position,
    pub capacity: u32,
    /// `Some` only while the amount is non-zero.
    cargo: Option<Cargo>,
}

impl Peasant {
    pub fn new(id: PeasantId, position: Position) -> Self {
        Self {
            id,
            position,
            capacity: CARRY_CAPACITY,
            cargo: None,
        }
    }

    pub fn with_cargo(mut self, kind: ResourceKind, amount: u32) -> Self {
        self.cargo = (amount > 0).then_some(Cargo {
            kind,
            amount: amount.min(self.capacity),
        });
        self
    }

    pub fn cargo(&self) -> Option<Cargo> {
        self.cargo
    }

    pub fn cargo_kind(&self) -> Option<ResourceKind> {
        self.cargo.map(|cargo| cargo.kind)
    }

    pub fn cargo_amount(&self) -> u32 {
        self.cargo.map_or(0, |cargo| cargo.amount)
    }

    pub fn is_carrying(&self) -> bool {
        self.cargo.is_some()
    }

    pub fn free_capacity(&self) -> u32 {
        self.capacity - self.cargo_amount()
    }

    /// Adds `amount` of `kind`, clamped to the free capacity. Returns what was
    /// actually taken on. Mixing resource kinds takes nothing.
    pub fn load(&mut self, kind: ResourceKind, amount: u32) -> u32 {
        if self.cargo_kind().is_some_and(|carried| carried != kind) {
            return 0;
        }
        let taken = amount.min(self.free_capacity());
        if taken > 0 {
            self.cargo = Some(Cargo {
                kind,
                amount: self.cargo_amount() + taken,
            });
        }
        taken
    }

    pub fn unload(&mut self) -> Option<Cargo> {
        self.cargo.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_peasant_is_empty() {
        let peasant = Peasant::new(1, Position::new(3, 4));
        assert_eq!(peasant.cargo_amount(), 0);
        assert_eq!(peasant.cargo_kind(), None);
        assert_eq!(peasant.free_capacity(), CARRY_CAPACITY);
    }

    #[test]
    fn test_load_clamps_to_capacity() {
        let mut peasant = Peasant::new(1, Position::new(0, 0));
        assert_eq!(peasant.load(ResourceKind::Gold, 60), 60);
        assert_eq!(peasant.load(ResourceKind::Gold, 60), 40);
        assert_eq!(peasant.cargo_amount(), CARRY_CAPACITY);
        assert_eq!(peasant.load(ResourceKind::Gold, 10), 0);
    }

    #[test]
    fn test_load_refuses_mixed_cargo() {
        let mut peasant = Peasant::new(1, Position::new(0, 0)).with_cargo(ResourceKind::Wood, 30);
        assert_eq!(peasant.load(ResourceKind::Gold, 20), 0);
        assert_eq!(peasant.cargo_kind(), Some(ResourceKind::Wood));
        assert_eq!(peasant.cargo_amount(), 30);
    }

    #[test]
    fn test_cargo_kind_defined_iff_amount_positive() {
        let mut peasant = Peasant::new(1, Position::new(0, 0));
        assert_eq!(peasant.load(ResourceKind::Wood, 0), 0);
        assert!(peasant.cargo().is_none(), "empty load must not set a cargo kind");

        let empty = Peasant::new(2, Position::new(0, 0)).with_cargo(ResourceKind::Gold, 0);
        assert!(empty.cargo().is_none());

        peasant.load(ResourceKind::Wood, 100);
        let unloaded = peasant.unload().unwrap();
        assert_eq!(unloaded.amount, 100);
        assert_eq!(peasant.cargo_kind(), None);
        assert_eq!(peasant.cargo_amount(), 0);
    }
}

use crate::infra::{Position, ResourceKind};

pub type ResourceId = u32;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceDeposit {
    pub id: ResourceId,
    pub kind: ResourceKind,
    pub position: Position,
    pub amount_remaining: u32,
}

impl ResourceDeposit {
    pub fn new(id: ResourceId, kind: ResourceKind, position: Position, amount_remaining: u32) -> Self {
        Self {
            id,
            kind,
            position,
            amount_remaining,
        }
    }

    /// Withdraws up to `amount`, clamping at zero. Returns what was withdrawn.
    pub fn reduce_amount_remaining(&mut self, amount: u32) -> u32 {
        let withdrawn = amount.min(self.amount_remaining);
        self.amount_remaining -= withdrawn;
        withdrawn
    }

    pub fn is_exhausted(&self) -> bool {
        self.amount_remaining == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reduce_clamps_to_zero() {
        let mut deposit = ResourceDeposit::new(7, ResourceKind::Gold, Position::new(1, 1), 150);
        assert_eq!(deposit.reduce_amount_remaining(100), 100);
        assert_eq!(deposit.amount_remaining, 50);
        assert_eq!(deposit.reduce_amount_remaining(100), 50);
        assert!(deposit.is_exhausted());
        assert_eq!(deposit.reduce_amount_remaining(100), 0);
    }
}

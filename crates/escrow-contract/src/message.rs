//! Inbound messages.

use escrow_core::{Address, Cell};

/// A message delivered to the contract. Consumed once, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundMessage {
    /// Sent by another account on the network, possibly carrying value.
    Internal {
        source: Address,
        value: u128,
        body: Cell,
    },
    /// Sent from outside the network; carries a signed instruction.
    External { body: Cell },
}

impl InboundMessage {
    pub fn internal(source: Address, value: u128, body: Cell) -> Self {
        Self::Internal {
            source,
            value,
            body,
        }
    }

    pub fn external(body: Cell) -> Self {
        Self::External { body }
    }

    /// Value credited to the receiver before execution.
    pub fn value(&self) -> u128 {
        match self {
            Self::Internal { value, .. } => *value,
            Self::External { .. } => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_internal_carries_value() {
        let source = Address::new(0, [0x99; 32]);
        assert_eq!(InboundMessage::internal(source, 250, Cell::empty()).value(), 250);
        assert_eq!(InboundMessage::external(Cell::empty()).value(), 0);
    }
}

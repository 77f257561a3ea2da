//! Configuration for deploying and running a contract instance.

use escrow_core::Address;

/// Configuration for an escrow instance.
#[derive(Debug, Clone)]
pub struct ContractConfig {
    /// Workchain the contract address is derived on.
    pub workchain: i8,
    /// Whether to decode the data cell when an instance is created.
    ///
    /// When off, a bad data cell is only discovered when a message is
    /// dispatched, and surfaces as a malformed-encoding rejection.
    pub validate_storage: bool,
}

impl Default for ContractConfig {
    fn default() -> Self {
        Self {
            workchain: Address::BASECHAIN,
            validate_storage: true,
        }
    }
}

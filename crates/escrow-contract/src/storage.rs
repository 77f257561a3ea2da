//! Persistent storage of the escrow.
//!
//! Data cell layout (bit-exact, FROZEN):
//!
//! ```text
//! storage#_ seller_address:MsgAddress buyer_address:MsgAddress
//!           guarantor_pubk:uint256 = Storage;
//! ```
//!
//! The record is written once at deployment and never rewritten. The balance
//! is not part of the data cell; the environment tracks it and exposes it
//! through [`ContractInfo`].

use escrow_core::{Address, Cell, CellBuilder, CellError, Ed25519PublicKey};
use serde::{Deserialize, Serialize};

/// The identity fields fixed at deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StorageRecord {
    pub seller_address: Address,
    pub buyer_address: Address,
    pub guarantor_public_key: Ed25519PublicKey,
}

impl StorageRecord {
    pub fn new(
        seller_address: Address,
        buyer_address: Address,
        guarantor_public_key: Ed25519PublicKey,
    ) -> Self {
        Self {
            seller_address,
            buyer_address,
            guarantor_public_key,
        }
    }

    /// Build the data cell.
    pub fn to_cell(&self) -> Result<Cell, CellError> {
        let mut b = CellBuilder::new();
        b.store_address(&self.seller_address)?
            .store_address(&self.buyer_address)?
            .store_buffer(self.guarantor_public_key.as_bytes())?;
        Ok(b.build())
    }

    /// Decode a data cell. Exactly the three fields, in order, with nothing
    /// left over.
    pub fn load(cell: &Cell) -> Result<Self, CellError> {
        let mut s = cell.parse();
        let seller_address = s.load_address()?;
        let buyer_address = s.load_address()?;
        let guarantor_public_key = Ed25519PublicKey(s.load_array::<32>()?);
        s.end_parse()?;
        Ok(Self {
            seller_address,
            buyer_address,
            guarantor_public_key,
        })
    }

    /// Combine with the current balance into the `get_info` view.
    pub fn info(&self, balance: u128) -> ContractInfo {
        ContractInfo {
            balance,
            seller_address: self.seller_address,
            buyer_address: self.buyer_address,
            guarantor_public_key: self.guarantor_public_key,
        }
    }
}

/// Result of the public `get_info` query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractInfo {
    pub balance: u128,
    pub seller_address: Address,
    pub buyer_address: Address,
    pub guarantor_public_key: Ed25519PublicKey,
}

/// Read-only query: decode `data` and report it with `balance`.
pub fn get_info(data: &Cell, balance: u128) -> Result<ContractInfo, CellError> {
    Ok(StorageRecord::load(data)?.info(balance))
}

//! Error types for the contract.
//!
//! Two layers: [`Rejection`] is a protocol outcome the contract reports
//! through an exit code; [`ContractError`] is a failure of the surrounding
//! environment (compiling, building cells, talking to a destroyed instance).

use escrow_core::{Address, CellError};
use thiserror::Error;

use crate::deploy::CompileError;

/// Exit codes surfaced to the execution environment. Wire-level; FROZEN.
pub mod exit_codes {
    /// Successful execution.
    pub const SUCCESS: u32 = 0;
    /// Cell underflow, raised when a body or the storage does not decode.
    pub const CELL_UNDERFLOW: u32 = 9;
    /// Signature does not verify under the guarantor key.
    pub const INVALID_SIGNATURE: u32 = 33;
    /// Opcode is neither accept nor decline.
    pub const INVALID_OPCODE: u32 = 34;
    /// Internal messages never run contract logic.
    pub const INTERNAL_MESSAGE: u32 = 0xffff;
}

/// Why the contract refused a message.
///
/// Every rejection is terminal for that message and leaves storage untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("malformed encoding: {0}")]
    MalformedEncoding(CellError),

    #[error("signature does not verify under the guarantor key")]
    InvalidSignature,

    #[error("invalid opcode {0}")]
    InvalidOpcode(u8),

    #[error("internal messages are rejected")]
    InternalMessageRejected,
}

impl Rejection {
    /// Exit code reported to the environment.
    pub fn exit_code(&self) -> u32 {
        match self {
            Rejection::MalformedEncoding(_) => exit_codes::CELL_UNDERFLOW,
            Rejection::InvalidSignature => exit_codes::INVALID_SIGNATURE,
            Rejection::InvalidOpcode(_) => exit_codes::INVALID_OPCODE,
            Rejection::InternalMessageRejected => exit_codes::INTERNAL_MESSAGE,
        }
    }
}

impl From<CellError> for Rejection {
    fn from(e: CellError) -> Self {
        Rejection::MalformedEncoding(e)
    }
}

/// Errors from the environment around the contract.
#[derive(Debug, Error)]
pub enum ContractError {
    /// The injected compiler failed.
    #[error("compile error: {0}")]
    Compile(#[from] CompileError),

    /// Building a cell failed.
    #[error("cell error: {0}")]
    Cell(#[from] CellError),

    /// The data cell does not hold a storage record.
    #[error("invalid storage: {0}")]
    InvalidStorage(CellError),

    /// The instance already self-destructed.
    #[error("contract {0} has been destroyed")]
    Destroyed(Address),
}

/// Result type for contract operations.
pub type Result<T> = std::result::Result<T, ContractError>;

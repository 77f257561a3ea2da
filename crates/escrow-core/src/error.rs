//! Error types for the escrow core.

use thiserror::Error;

/// Errors raised while building or parsing cells.
///
/// Every parse-side variant means the input is structurally invalid. The
/// contract layer folds all of them into a single malformed-encoding outcome.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CellError {
    #[error("cell underflow: need {needed} bits, {remaining} remaining")]
    BitUnderflow { needed: usize, remaining: usize },

    #[error("cell underflow: no reference left to load")]
    RefUnderflow,

    #[error("cell overflow: cannot store {requested} more bits, {available} available")]
    BitOverflow { requested: usize, available: usize },

    #[error("cell overflow: a cell holds at most {max} references")]
    RefOverflow { max: usize },

    #[error("cell tree too deep: depth {depth} exceeds {max}")]
    DepthOverflow { depth: u32, max: u16 },

    #[error("value {value} does not fit in {bits} bits")]
    ValueOutOfRange { value: String, bits: usize },

    #[error("bit width {0} is not supported")]
    UnsupportedWidth(usize),

    #[error("unsupported address tag {0:#04b}")]
    UnsupportedAddressTag(u8),

    #[error("anycast addresses are not supported")]
    AnycastUnsupported,

    #[error("expected an address, found addr_none")]
    MissingAddress,

    #[error("{bits} bits and {refs} references left unparsed")]
    TrailingData { bits: usize, refs: usize },
}

/// Errors parsing the textual address form.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("hex decoding error: {0}")]
    Hex(#[from] hex::FromHexError),
}

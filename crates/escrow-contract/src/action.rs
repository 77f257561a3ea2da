//! Outbound actions: the one effect a successful dispatch produces.
//!
//! The action is a plain internal message to the beneficiary, sent with mode
//! `CARRY_ALL_BALANCE | DESTROY_IF_ZERO` so the whole balance leaves and the
//! account is deleted.
//!
//! Message layout (`store_uint(0x10, 6)` header, non-bounceable):
//!
//! ```text
//! int_msg_info$0 ihr_disabled:1 bounce:0 bounced:0 src:addr_none
//!   dest:MsgAddressInt value:(coins 0)
//!   extra:0 ihr_fee:(coins 0) fwd_fee:(coins 0) created_lt:0 created_at:0
//!   init:0 body:0
//! ```
//!
//! Action list (`c5`) layout:
//!
//! ```text
//! out_list$_ prev:^(out_list_empty) action_send_msg#0ec3c86d mode:uint8 out_msg:^Message
//! ```

use std::fmt;
use std::ops::BitOr;

use escrow_core::{Address, Cell, CellBuilder, CellError};
use serde::{Deserialize, Serialize};

/// Tag of `action_send_msg`.
pub const ACTION_SEND_MSG_TAG: u32 = 0x0ec3c86d;

/// First six header bits: internal, IHR disabled, not bounceable, not
/// bounced, `addr_none` source.
const MSG_HEADER: u128 = 0x10;
const MSG_HEADER_BITS: usize = 6;

/// extra currencies (1) + ihr_fee (4) + fwd_fee (4) + created_lt (64)
/// + created_at (32) + init (1) + body (1).
const MSG_TAIL_BITS: usize = 1 + 4 + 4 + 64 + 32 + 1 + 1;

/// Send-mode flags of an outbound message.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SendMode(u8);

impl SendMode {
    /// Delete the account once its balance reaches zero.
    pub const DESTROY_IF_ZERO: Self = Self(32);
    /// Carry the entire remaining balance.
    pub const CARRY_ALL_BALANCE: Self = Self(128);

    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for SendMode {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl fmt::Debug for SendMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SendMode({})", self.0)
    }
}

/// A fund transfer emitted by a successful dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundAction {
    /// Seller on accept, buyer on decline.
    pub recipient: Address,
    /// The entire balance at dispatch time.
    pub amount: u128,
    pub mode: SendMode,
}

impl OutboundAction {
    /// Send everything to `recipient` and delete the account.
    pub fn drain_to(recipient: Address, balance: u128) -> Self {
        Self {
            recipient,
            amount: balance,
            mode: SendMode::CARRY_ALL_BALANCE | SendMode::DESTROY_IF_ZERO,
        }
    }

    pub fn self_destruct(&self) -> bool {
        self.mode.contains(SendMode::DESTROY_IF_ZERO)
    }

    /// Encode the outbound message.
    ///
    /// The declared value is zero; with `CARRY_ALL_BALANCE` the environment
    /// attaches the whole balance.
    pub fn to_message_cell(&self) -> Result<Cell, CellError> {
        let mut b = CellBuilder::new();
        b.store_uint(MSG_HEADER, MSG_HEADER_BITS)?
            .store_address(&self.recipient)?
            .store_coins(0)?
            .store_uint(0, MSG_TAIL_BITS)?;
        Ok(b.build())
    }

    /// Encode the action list holding this single action.
    pub fn to_action_list(&self) -> Result<Cell, CellError> {
        let mut b = CellBuilder::new();
        b.store_ref(Cell::empty())?
            .store_uint(ACTION_SEND_MSG_TAG as u128, 32)?
            .store_uint(self.mode.bits() as u128, 8)?
            .store_ref(self.to_message_cell()?)?;
        Ok(b.build())
    }
}

/// A decoded single-entry action list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SendMsgAction {
    pub mode: SendMode,
    pub destination: Address,
    pub value: u128,
}

impl SendMsgAction {
    /// Decode an action list produced by [`OutboundAction::to_action_list`].
    pub fn parse(actions: &Cell) -> Result<Self, CellError> {
        let mut s = actions.parse();
        let prev = s.load_ref()?;
        if !prev.is_empty() {
            // Only single-action lists are produced.
            return Err(CellError::TrailingData {
                bits: prev.bit_len(),
                refs: prev.references().len(),
            });
        }
        let tag = s.load_uint(32)? as u32;
        if tag != ACTION_SEND_MSG_TAG {
            return Err(CellError::ValueOutOfRange {
                value: format!("{tag:#010x}"),
                bits: 32,
            });
        }
        let mode = SendMode::from_bits(s.load_u8()?);
        let message = s.load_ref()?;
        s.end_parse()?;

        let mut m = message.parse();
        let header = m.load_uint(MSG_HEADER_BITS)?;
        if header != MSG_HEADER {
            return Err(CellError::ValueOutOfRange {
                value: format!("{header:#04x}"),
                bits: MSG_HEADER_BITS,
            });
        }
        let destination = m.load_address()?;
        let value = m.load_coins()?;
        m.load_uint(MSG_TAIL_BITS)?;
        m.end_parse()?;

        Ok(Self {
            mode,
            destination,
            value,
        })
    }
}

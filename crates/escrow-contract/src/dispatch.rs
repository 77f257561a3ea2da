//! Message dispatch: the contract's whole decision procedure.
//!
//! ```text
//! Start ─► Classified{Internal} ─────────────────────────────► Rejected(InternalMessageRejected)
//!       └► Classified{External} ─ body/storage decode fails ─► Rejected(MalformedEncoding)
//!                               ─ signature fails ───────────► Rejected(InvalidSignature)
//!                               └► Verified ─ unknown opcode ► Rejected(InvalidOpcode)
//!                                           └ accept/decline ► Dispatched(action)
//! ```
//!
//! Dispatch is pure: it reads the data cell and the balance and returns an
//! [`Outcome`]. Applying the outcome (draining, deleting) is the
//! environment's job, see [`EscrowContract`](crate::contract::EscrowContract).

use escrow_core::Cell;
use tracing::{debug, warn};

use crate::action::OutboundAction;
use crate::error::{exit_codes, Rejection};
use crate::instruction::{Opcode, SignedInstruction};
use crate::message::InboundMessage;
use crate::storage::StorageRecord;

/// Terminal state of a dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// No action; storage untouched.
    Rejected(Rejection),
    /// Exactly one action; the contract ends.
    Dispatched(OutboundAction),
}

impl Outcome {
    pub fn exit_code(&self) -> u32 {
        match self {
            Outcome::Rejected(rejection) => rejection.exit_code(),
            Outcome::Dispatched(_) => exit_codes::SUCCESS,
        }
    }

    pub fn action(&self) -> Option<&OutboundAction> {
        match self {
            Outcome::Dispatched(action) => Some(action),
            Outcome::Rejected(_) => None,
        }
    }

    pub fn is_dispatched(&self) -> bool {
        matches!(self, Outcome::Dispatched(_))
    }
}

impl From<Result<OutboundAction, Rejection>> for Outcome {
    fn from(result: Result<OutboundAction, Rejection>) -> Self {
        match result {
            Ok(action) => Outcome::Dispatched(action),
            Err(rejection) => Outcome::Rejected(rejection),
        }
    }
}

/// Run one message against the contract state.
pub fn dispatch(data: &Cell, balance: u128, message: &InboundMessage) -> Outcome {
    let outcome: Outcome = match message {
        InboundMessage::Internal { source, value, .. } => {
            debug!(%source, value, "classified internal message");
            Outcome::Rejected(Rejection::InternalMessageRejected)
        }
        InboundMessage::External { body } => {
            debug!(body_bits = body.bit_len(), "classified external message");
            dispatch_external(data, balance, body).into()
        }
    };

    match &outcome {
        Outcome::Rejected(rejection) => {
            warn!(exit_code = rejection.exit_code(), %rejection, "message rejected");
        }
        Outcome::Dispatched(action) => {
            debug!(
                recipient = %action.recipient,
                amount = action.amount,
                mode = action.mode.bits(),
                "instruction dispatched"
            );
        }
    }
    outcome
}

fn dispatch_external(
    data: &Cell,
    balance: u128,
    body: &Cell,
) -> Result<OutboundAction, Rejection> {
    let instruction = SignedInstruction::from_body(body)?;
    let record = StorageRecord::load(data)?;

    if !instruction.verify(&record.guarantor_public_key) {
        return Err(Rejection::InvalidSignature);
    }
    debug!(opcode = instruction.opcode, "signature verified");

    let recipient = match instruction.known_opcode() {
        Some(Opcode::Accept) => record.seller_address,
        Some(Opcode::Decline) => record.buyer_address,
        None => return Err(Rejection::InvalidOpcode(instruction.opcode)),
    };

    Ok(OutboundAction::drain_to(recipient, balance))
}

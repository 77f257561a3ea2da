//! Signed instructions: the only input the contract acts on.
//!
//! External message body layout (bit-exact, FROZEN):
//!
//! ```text
//! signature:bits512 opcode:uint8
//! ```
//!
//! The signature covers the hash of a cell holding nothing but the 8-bit
//! opcode. No address, nonce or sequence number is signed, so a valid
//! `(opcode, signature)` pair can be replayed for as long as the contract
//! exists.

use escrow_core::{
    verify_signature, Cell, CellBuilder, CellError, CellHash, Ed25519PublicKey, Ed25519Signature,
    Keypair,
};
use serde::{Deserialize, Serialize};

/// Width of the opcode field.
pub const OPCODE_BITS: usize = 8;

/// Width of the signature field.
pub const SIGNATURE_BITS: usize = 512;

/// Instruction selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Opcode {
    /// Release the balance to the seller.
    Accept = 1,
    /// Return the balance to the buyer.
    Decline = 2,
}

impl Opcode {
    /// Convert to u8 for serialization.
    pub fn to_u8(self) -> u8 {
        self as u8
    }

    /// Try to parse from u8.
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            1 => Some(Self::Accept),
            2 => Some(Self::Decline),
            _ => None,
        }
    }
}

impl From<Opcode> for u8 {
    fn from(op: Opcode) -> Self {
        op.to_u8()
    }
}

/// Cell holding only the opcode; its hash is the signed payload.
pub fn opcode_cell(opcode: u8) -> Result<Cell, CellError> {
    let mut b = CellBuilder::new();
    b.store_uint(opcode as u128, OPCODE_BITS)?;
    Ok(b.build())
}

/// The payload a guarantor signs for `opcode`.
pub fn signing_payload(opcode: u8) -> Result<CellHash, CellError> {
    Ok(opcode_cell(opcode)?.hash())
}

/// An opcode together with the guarantor's signature over it.
///
/// The opcode is kept raw: a body may carry any byte, and rejecting values
/// other than accept/decline happens only after the signature checks out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignedInstruction {
    pub opcode: u8,
    pub signature: Ed25519Signature,
}

impl SignedInstruction {
    /// Sign `opcode` with the guarantor keypair.
    pub fn sign(opcode: u8, keypair: &Keypair) -> Result<Self, CellError> {
        let payload = signing_payload(opcode)?;
        Ok(Self {
            opcode,
            signature: keypair.sign(payload.as_bytes()),
        })
    }

    /// The decoded opcode, if it is one the contract knows.
    pub fn known_opcode(&self) -> Option<Opcode> {
        Opcode::from_u8(self.opcode)
    }

    /// Check the signature against `public_key`.
    pub fn verify(&self, public_key: &Ed25519PublicKey) -> bool {
        match signing_payload(self.opcode) {
            Ok(payload) => verify_signature(payload.as_bytes(), &self.signature, public_key),
            Err(_) => false,
        }
    }

    /// Encode as an external message body.
    pub fn to_body(&self) -> Result<Cell, CellError> {
        let mut b = CellBuilder::new();
        b.store_buffer(self.signature.as_bytes())?
            .store_uint(self.opcode as u128, OPCODE_BITS)?;
        Ok(b.build())
    }

    /// Decode an external message body. The body must hold exactly the two
    /// fields and nothing else.
    pub fn from_body(body: &Cell) -> Result<Self, CellError> {
        let mut s = body.parse();
        let signature = Ed25519Signature(s.load_array::<{ SIGNATURE_BITS / 8 }>()?);
        let opcode = s.load_u8()?;
        s.end_parse()?;
        Ok(Self { opcode, signature })
    }
}

/// Guarantor signature over `opcode`.
pub fn sign_opcode(opcode: u8, keypair: &Keypair) -> Result<Ed25519Signature, CellError> {
    Ok(SignedInstruction::sign(opcode, keypair)?.signature)
}

/// Build a signed external body for `opcode`, as an off-chain guarantor would.
pub fn build_external_body(opcode: u8, keypair: &Keypair) -> Result<Cell, CellError> {
    SignedInstruction::sign(opcode, keypair)?.to_body()
}

//! Golden test vectors for deterministic verification.
//!
//! Any implementation of the escrow must reproduce these hashes bit for bit:
//! a different hash means a different signed payload, data cell or address.

use escrow_contract::{
    signing_payload, CodeImage, OutboundAction, SignedInstruction, StateInit, StorageRecord,
};
use escrow_core::{Address, Cell, CellError, Keypair};
use serde::Serialize;

/// Seed of the guarantor key used by every vector.
pub const GUARANTOR_SEED: [u8; 32] = [0x42; 32];

/// Which value a vector computes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VectorKind {
    /// Hash of the cell holding only the opcode.
    OpcodePayload(u8),
    GuarantorPublicKey,
    /// Signature over the opcode payload.
    Signature(u8),
    /// Hash of the external body for an opcode.
    ExternalBody(u8),
    StorageCell,
    CodeCell,
    ContractAddress,
    /// Hash of the drain message to the seller.
    OutboundMessage,
    ActionList,
    EmptyCell,
}

/// A golden test vector.
#[derive(Debug, Clone, Serialize)]
pub struct GoldenVector {
    /// Human-readable name for the vector.
    pub name: &'static str,
    pub kind: VectorKind,
    /// Expected output (hex).
    pub expected: &'static str,
}

/// Get all golden test vectors.
pub fn all_vectors() -> Vec<GoldenVector> {
    vec![
        GoldenVector {
            name: "accept payload",
            kind: VectorKind::OpcodePayload(1),
            expected: "8d9fe7317f066deaca4fdb6c313194e5bb5d2269ecf672f1af9fc790a2205991",
        },
        GoldenVector {
            name: "decline payload",
            kind: VectorKind::OpcodePayload(2),
            expected: "65fde13cf1e4ea4206c293082657037684ee456e40041c816509b63e1b89d387",
        },
        GoldenVector {
            name: "unknown opcode 3 payload",
            kind: VectorKind::OpcodePayload(3),
            expected: "e9969bdc67747c3797d62fd1c3e4277269a0945fdb999e8ccc6c7bfb4eeb06bd",
        },
        GoldenVector {
            name: "guarantor public key",
            kind: VectorKind::GuarantorPublicKey,
            expected: "2152f8d19b791d24453242e15f2eab6cb7cffa7b6a5ed30097960e069881db12",
        },
        GoldenVector {
            name: "accept signature",
            kind: VectorKind::Signature(1),
            expected: "c34343e5ab67dc57f5e6f58adf9368c2b0ed32597e04e40e7e5cedee1d4e9286\
                       dc34f5c410eff804c5b1ff330a6c1550c0cb53cf6fd81b8b2cd4621cdaf89402",
        },
        GoldenVector {
            name: "accept external body",
            kind: VectorKind::ExternalBody(1),
            expected: "6f29b24a6d0b0b3aac209c6aee85b6b77c7ef6d2cbd94c69c5721bf663df98ea",
        },
        GoldenVector {
            name: "storage cell",
            kind: VectorKind::StorageCell,
            expected: "ef31134e18fad9ea7972f966b9581dee3ea245670f075eeb8cd2dda9504dfe16",
        },
        GoldenVector {
            name: "code cell",
            kind: VectorKind::CodeCell,
            expected: "f98e26fa75a2580140832086ebf09f85cdcbb9f08a1f5662bf65de34f842e3a9",
        },
        GoldenVector {
            name: "contract address",
            kind: VectorKind::ContractAddress,
            expected: "cbdc6a044658de13bcf4b63c79350b88ed7f8cefe4e9dc10b690326af713ce3c",
        },
        GoldenVector {
            name: "drain message to seller",
            kind: VectorKind::OutboundMessage,
            expected: "b46e906fe6ecf2de21b5a4a53009762f2f18bb5c7d4d6fc5477015d5a23a0853",
        },
        GoldenVector {
            name: "action list",
            kind: VectorKind::ActionList,
            expected: "35712d01b683d853f73cea0184ef7f6952e5789ebfdc4a47280d700e6cba0faa",
        },
        GoldenVector {
            name: "empty cell",
            kind: VectorKind::EmptyCell,
            expected: "96a296d224f285c67bee93c30f8a309157f0daa35dc5b87e410b78630a09cfc7",
        },
    ]
}

/// Seller, buyer and guarantor shared by the vectors.
pub fn vector_record() -> StorageRecord {
    StorageRecord::new(
        Address::new(0, [0x11; 32]),
        Address::new(0, [0x22; 32]),
        Keypair::from_seed(&GUARANTOR_SEED).public_key(),
    )
}

fn code_image() -> Result<CodeImage, CellError> {
    CodeImage::from_bytes(&b"escrow-code"[..])
}

fn address_hex(record: &StorageRecord) -> Result<String, CellError> {
    let state_init = StateInit::new(code_image()?, record.to_cell()?);
    Ok(hex::encode(state_init.address(Address::BASECHAIN)?.hash))
}

/// Compute the hex output of one vector.
pub fn compute(kind: VectorKind) -> String {
    let guarantor = Keypair::from_seed(&GUARANTOR_SEED);
    let record = vector_record();
    let drain = OutboundAction::drain_to(record.seller_address, 0);

    let result = match kind {
        VectorKind::OpcodePayload(op) => signing_payload(op).map(|h| h.to_hex()),
        VectorKind::GuarantorPublicKey => Ok(guarantor.public_key().to_hex()),
        VectorKind::Signature(op) => {
            SignedInstruction::sign(op, &guarantor).map(|ix| ix.signature.to_hex())
        }
        VectorKind::ExternalBody(op) => SignedInstruction::sign(op, &guarantor)
            .and_then(|ix| ix.to_body())
            .map(|body| body.hash().to_hex()),
        VectorKind::StorageCell => record.to_cell().map(|c| c.hash().to_hex()),
        VectorKind::CodeCell => code_image().map(|c| c.hash().to_hex()),
        VectorKind::ContractAddress => address_hex(&record),
        VectorKind::OutboundMessage => drain.to_message_cell().map(|c| c.hash().to_hex()),
        VectorKind::ActionList => drain.to_action_list().map(|c| c.hash().to_hex()),
        VectorKind::EmptyCell => Ok(Cell::empty().hash().to_hex()),
    };

    result.unwrap_or_else(|e| format!("error: {e}"))
}

/// Verify all golden vectors.
///
/// Returns `(name, matches, computed)` for each vector.
pub fn verify_all_vectors() -> Vec<(String, bool, String)> {
    all_vectors()
        .iter()
        .map(|v| {
            let computed = compute(v.kind);
            (v.name.to_string(), computed == v.expected, computed)
        })
        .collect()
}

/// Dump the vectors as pretty JSON, with the computed value next to each.
pub fn vectors_json() -> serde_json::Result<String> {
    #[derive(Serialize)]
    struct Entry {
        #[serde(flatten)]
        vector: GoldenVector,
        computed: String,
    }

    let entries: Vec<Entry> = all_vectors()
        .into_iter()
        .map(|vector| Entry {
            computed: compute(vector.kind),
            vector,
        })
        .collect();
    serde_json::to_string_pretty(&entries)
}

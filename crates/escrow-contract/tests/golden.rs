//! Golden test vectors for cross-implementation verification.
//!
//! Every implementation of the escrow must produce identical:
//! - signing_payload (hash of the opcode cell)
//! - signature (deterministic Ed25519)
//! - body_bits / body_hash
//! - storage_hash
//! - address

use escrow_contract::core::{Address, Cell, CellBuilder, Keypair};
use escrow_contract::{
    build_external_body, dispatch, signing_payload, CodeImage, ContractConfig, InboundMessage,
    Outcome, Rejection, SignedInstruction, StorageRecord,
};
use serde::{Deserialize, Serialize};

/// A single golden test vector.
#[derive(Debug, Serialize, Deserialize)]
pub struct GoldenVector {
    pub name: String,
    pub description: String,

    // Inputs
    pub guarantor_seed: String, // 32 bytes hex
    pub guarantor_pk: String,   // 32 bytes hex (derived)
    pub seller: String,         // raw address
    pub buyer: String,          // raw address
    pub opcode: u8,

    // Derived outputs (hex)
    pub signing_payload: String,
    pub signature: String,
    pub body_hash: String,
    pub storage_hash: String,
    pub address: String, // raw address
}

fn generate_vector(
    name: &str,
    description: &str,
    seed: [u8; 32],
    seller: Address,
    buyer: Address,
    opcode: u8,
) -> GoldenVector {
    let keypair = Keypair::from_seed(&seed);
    let record = StorageRecord::new(seller, buyer, keypair.public_key());

    let instruction = SignedInstruction::sign(opcode, &keypair).unwrap();
    let body = instruction.to_body().unwrap();
    let data = record.to_cell().unwrap();
    let code = CodeImage::from_bytes(&b"escrow-code"[..]).unwrap();
    let address = escrow_contract::deploy::contract_address(
        Address::BASECHAIN,
        &escrow_contract::StateInit::new(code, data.clone()),
    )
    .unwrap();

    GoldenVector {
        name: name.to_string(),
        description: description.to_string(),
        guarantor_seed: hex::encode(seed),
        guarantor_pk: keypair.public_key().to_hex(),
        seller: seller.to_string(),
        buyer: buyer.to_string(),
        opcode,
        signing_payload: signing_payload(opcode).unwrap().to_hex(),
        signature: instruction.signature.to_hex(),
        body_hash: body.hash().to_hex(),
        storage_hash: data.hash().to_hex(),
        address: address.to_string(),
    }
}

fn generate_all_vectors() -> Vec<GoldenVector> {
    let seller = Address::new(0, [0x11; 32]);
    let buyer = Address::new(0, [0x22; 32]);
    vec![
        generate_vector(
            "accept",
            "Guarantor releases funds to the seller",
            [0x42; 32],
            seller,
            buyer,
            1,
        ),
        generate_vector(
            "decline",
            "Guarantor returns funds to the buyer",
            [0x42; 32],
            seller,
            buyer,
            2,
        ),
        generate_vector(
            "unknown_opcode",
            "Correctly signed opcode the contract refuses",
            [0x42; 32],
            seller,
            buyer,
            3,
        ),
        generate_vector(
            "masterchain_parties",
            "Seller and buyer on the masterchain",
            [0x01; 32],
            Address::new(-1, [0xaa; 32]),
            Address::new(-1, [0xbb; 32]),
            1,
        ),
    ]
}

#[test]
fn test_reference_vector() {
    let v = &generate_all_vectors()[0];
    assert_eq!(
        v.guarantor_pk,
        "2152f8d19b791d24453242e15f2eab6cb7cffa7b6a5ed30097960e069881db12"
    );
    assert_eq!(
        v.signing_payload,
        "8d9fe7317f066deaca4fdb6c313194e5bb5d2269ecf672f1af9fc790a2205991"
    );
    assert_eq!(
        v.body_hash,
        "6f29b24a6d0b0b3aac209c6aee85b6b77c7ef6d2cbd94c69c5721bf663df98ea"
    );
    assert_eq!(
        v.storage_hash,
        "ef31134e18fad9ea7972f966b9581dee3ea245670f075eeb8cd2dda9504dfe16"
    );
    assert_eq!(
        v.address,
        "0:cbdc6a044658de13bcf4b63c79350b88ed7f8cefe4e9dc10b690326af713ce3c"
    );
}

#[test]
fn test_vectors_deterministic() {
    let v1 = generate_all_vectors();
    let v2 = generate_all_vectors();

    for (a, b) in v1.iter().zip(v2.iter()) {
        assert_eq!(a.signature, b.signature, "signature mismatch for {}", a.name);
        assert_eq!(a.body_hash, b.body_hash, "body_hash mismatch for {}", a.name);
        assert_eq!(a.storage_hash, b.storage_hash, "storage_hash mismatch for {}", a.name);
        assert_eq!(a.address, b.address, "address mismatch for {}", a.name);
    }
}

#[test]
fn test_vectors_verify() {
    // Rebuild each scenario from the serialized inputs alone.
    for v in &generate_all_vectors() {
        let seed: [u8; 32] = hex::decode(&v.guarantor_seed)
            .unwrap()
            .try_into()
            .unwrap();
        let keypair = Keypair::from_seed(&seed);
        let record = StorageRecord::new(
            v.seller.parse().unwrap(),
            v.buyer.parse().unwrap(),
            keypair.public_key(),
        );
        let data = record.to_cell().unwrap();
        assert_eq!(data.hash().to_hex(), v.storage_hash, "storage mismatch for {}", v.name);

        let body = build_external_body(v.opcode, &keypair).unwrap();
        assert_eq!(body.hash().to_hex(), v.body_hash, "body mismatch for {}", v.name);

        let outcome = dispatch(&data, 1, &InboundMessage::external(body));
        match v.opcode {
            1 => assert_eq!(outcome.action().unwrap().recipient, record.seller_address),
            2 => assert_eq!(outcome.action().unwrap().recipient, record.buyer_address),
            op => assert_eq!(outcome, Outcome::Rejected(Rejection::InvalidOpcode(op))),
        }
    }
}

#[test]
fn test_vectors_json_roundtrip() {
    let vectors = generate_all_vectors();

    #[derive(Serialize, Deserialize)]
    struct VectorFile {
        version: String,
        description: String,
        code: String,
        vectors: Vec<GoldenVector>,
    }

    let file = VectorFile {
        version: "0.1.0".to_string(),
        description: "Golden test vectors for the guarantor escrow.".to_string(),
        code: hex::encode(b"escrow-code"),
        vectors,
    };

    let json = serde_json::to_string_pretty(&file).unwrap();
    let parsed: VectorFile = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed.vectors.len(), 4);
    assert_eq!(parsed.vectors[1].opcode, 2);
}

// =============================================================================
// REJECTION TEST VECTORS
// These test that invalid inputs are properly rejected.
// =============================================================================

fn reference_data() -> (Keypair, Cell) {
    let keypair = Keypair::from_seed(&[0x42; 32]);
    let record = StorageRecord::new(
        Address::new(0, [0x11; 32]),
        Address::new(0, [0x22; 32]),
        keypair.public_key(),
    );
    (keypair, record.to_cell().unwrap())
}

#[test]
fn test_reject_tampered_signature() {
    let (keypair, data) = reference_data();
    let mut instruction = SignedInstruction::sign(1, &keypair).unwrap();
    instruction.signature.0[0] ^= 0x01;

    let body = instruction.to_body().unwrap();
    let outcome = dispatch(&data, 1, &InboundMessage::external(body));
    assert_eq!(outcome, Outcome::Rejected(Rejection::InvalidSignature));
    assert_eq!(outcome.exit_code(), 33);
}

#[test]
fn test_reject_opcode_swap() {
    let (keypair, data) = reference_data();
    let accept = SignedInstruction::sign(1, &keypair).unwrap();
    let swapped = SignedInstruction {
        opcode: 2,
        signature: accept.signature,
    };

    let outcome = dispatch(&data, 1, &InboundMessage::external(swapped.to_body().unwrap()));
    assert_eq!(outcome.exit_code(), 33);
}

#[test]
fn test_reject_truncated_body() {
    let (_, data) = reference_data();
    let mut b = CellBuilder::new();
    b.store_buffer(&[0u8; 64]).unwrap();
    let outcome = dispatch(&data, 1, &InboundMessage::external(b.build()));
    assert!(matches!(outcome, Outcome::Rejected(Rejection::MalformedEncoding(_))));
}

#[test]
fn test_reject_body_in_reference() {
    // Signature and opcode must be inline; a body split across a child cell is malformed.
    let (keypair, data) = reference_data();
    let inner = build_external_body(1, &keypair).unwrap();
    let mut b = CellBuilder::new();
    b.store_ref(inner).unwrap();
    let outcome = dispatch(&data, 1, &InboundMessage::external(b.build()));
    assert!(matches!(outcome, Outcome::Rejected(Rejection::MalformedEncoding(_))));
}

#[test]
fn test_reject_internal_with_valid_body() {
    let (keypair, data) = reference_data();
    let body = build_external_body(1, &keypair).unwrap();
    let msg = InboundMessage::internal(Address::new(0, [0x11; 32]), 1, body);
    assert_eq!(dispatch(&data, 1, &msg).exit_code(), 0xffff);
}

#[test]
fn test_reject_deploy_with_bad_storage() {
    let code = CodeImage::from_cell(Cell::empty());
    let result = escrow_contract::deploy_raw(code, Cell::empty(), &ContractConfig::default());
    assert!(matches!(
        result,
        Err(escrow_contract::ContractError::InvalidStorage(_))
    ));
}

//! Proptest generators for property-based testing.

use proptest::prelude::*;

use escrow_contract::{Opcode, StorageRecord};
use escrow_core::{Address, Ed25519PublicKey, Keypair};

/// Generate a random keypair.
pub fn keypair() -> impl Strategy<Value = Keypair> {
    any::<[u8; 32]>().prop_map(|seed| Keypair::from_seed(&seed))
}

/// Generate a random Ed25519PublicKey.
pub fn public_key() -> impl Strategy<Value = Ed25519PublicKey> {
    keypair().prop_map(|kp| kp.public_key())
}

/// Generate a standard address on any workchain.
pub fn address() -> impl Strategy<Value = Address> {
    (any::<i8>(), any::<[u8; 32]>()).prop_map(|(wc, hash)| Address::new(wc, hash))
}

/// Generate an address on the basechain.
pub fn basechain_address() -> impl Strategy<Value = Address> {
    any::<[u8; 32]>().prop_map(|hash| Address::new(Address::BASECHAIN, hash))
}

/// Generate one of the two known opcodes.
pub fn known_opcode() -> impl Strategy<Value = Opcode> {
    prop_oneof![Just(Opcode::Accept), Just(Opcode::Decline)]
}

/// Generate an opcode byte the contract does not know.
pub fn unknown_opcode() -> impl Strategy<Value = u8> {
    any::<u8>().prop_filter("known opcode", |op| Opcode::from_u8(*op).is_none())
}

/// Generate a balance.
pub fn balance() -> impl Strategy<Value = u128> {
    prop_oneof![Just(0u128), 1u128..=1_000_000_000_000u128, Just(u64::MAX as u128)]
}

/// Generate a storage record with random parties.
pub fn storage_record() -> impl Strategy<Value = StorageRecord> {
    (address(), address(), public_key())
        .prop_map(|(seller, buyer, key)| StorageRecord::new(seller, buyer, key))
}

/// Parameters for one escrow scenario.
#[derive(Debug, Clone)]
pub struct EscrowParams {
    pub guarantor: Keypair,
    pub seller: Address,
    pub buyer: Address,
    pub balance: u128,
}

impl EscrowParams {
    pub fn record(&self) -> StorageRecord {
        StorageRecord::new(self.seller, self.buyer, self.guarantor.public_key())
    }
}

impl Arbitrary for EscrowParams {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (keypair(), basechain_address(), basechain_address(), balance())
            .prop_map(|(guarantor, seller, buyer, balance)| EscrowParams {
                guarantor,
                seller,
                buyer,
                balance,
            })
            .boxed()
    }
}

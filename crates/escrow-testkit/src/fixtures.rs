//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use escrow_contract::{
    build_external_body, CodeImage, CompileError, ContractConfig, EscrowContract,
    ExecutionReport, StorageRecord,
};
use escrow_core::{Address, Cell, Ed25519PublicKey, Keypair};

/// Code image every fixture compiles to.
pub const FIXTURE_CODE: &[u8] = b"escrow-code";

/// Stand-in for the external toolchain: ignores the source and returns
/// [`FIXTURE_CODE`].
pub fn stub_compiler(_source: &str) -> Result<CodeImage, CompileError> {
    Ok(CodeImage::from_bytes(FIXTURE_CODE)?)
}

/// The parties of one escrow.
pub struct EscrowFixture {
    pub guarantor: Keypair,
    /// Holds a key the contract does not trust.
    pub intruder: Keypair,
    pub seller: Address,
    pub buyer: Address,
    pub balance: u128,
}

impl EscrowFixture {
    /// Deterministic parties, matching the golden vectors.
    pub fn new() -> Self {
        Self {
            guarantor: Keypair::from_seed(&[0x42; 32]),
            intruder: Keypair::from_seed(&[0x07; 32]),
            seller: Address::new(0, [0x11; 32]),
            buyer: Address::new(0, [0x22; 32]),
            balance: 1_000_000_000,
        }
    }

    /// Fresh random parties.
    pub fn random() -> Self {
        Self {
            guarantor: Keypair::generate(),
            intruder: Keypair::generate(),
            seller: Address::new(0, rand::random()),
            buyer: Address::new(0, rand::random()),
            balance: 1_000_000_000,
        }
    }

    pub fn with_balance(mut self, balance: u128) -> Self {
        self.balance = balance;
        self
    }

    pub fn guarantor_key(&self) -> Ed25519PublicKey {
        self.guarantor.public_key()
    }

    pub fn record(&self) -> StorageRecord {
        StorageRecord::new(self.seller, self.buyer, self.guarantor_key())
    }

    /// Deploy a funded instance.
    pub fn make_contract(&self) -> EscrowContract {
        EscrowContract::create(
            &stub_compiler,
            "",
            &self.record(),
            self.balance,
            &ContractConfig::default(),
        )
        .expect("fixture deployment")
    }

    /// External body signed by the guarantor.
    pub fn signed_body(&self, opcode: u8) -> Cell {
        build_external_body(opcode, &self.guarantor).expect("fixture body")
    }

    /// External body signed by the intruder.
    pub fn forged_body(&self, opcode: u8) -> Cell {
        build_external_body(opcode, &self.intruder).expect("fixture body")
    }

    /// Send a guarantor-signed opcode to `contract`.
    pub fn send_signed_opcode(&self, contract: &mut EscrowContract, opcode: u8) -> ExecutionReport {
        contract
            .receive_external(self.signed_body(opcode))
            .expect("contract is active")
    }
}

impl Default for EscrowFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Several independent escrows with distinct parties.
///
/// The index fills the first eight bytes of each guarantor seed and seller
/// hash, so no two fixtures share either.
pub fn multi_escrow_fixtures(count: usize) -> Vec<EscrowFixture> {
    (0..count)
        .map(|i| {
            let index = (i as u64).to_be_bytes();
            let mut seed = [0xee; 32];
            seed[..8].copy_from_slice(&index);
            let mut seller = [0x11; 32];
            seller[..8].copy_from_slice(&index);
            EscrowFixture {
                guarantor: Keypair::from_seed(&seed),
                seller: Address::new(0, seller),
                ..EscrowFixture::new()
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_deploys() {
        let fixture = EscrowFixture::new();
        let contract = fixture.make_contract();
        assert_eq!(contract.balance(), fixture.balance);
        assert_eq!(contract.get_info().unwrap().seller_address, fixture.seller);
    }

    #[test]
    fn test_fixture_accept() {
        let fixture = EscrowFixture::new().with_balance(5);
        let mut contract = fixture.make_contract();
        let report = fixture.send_signed_opcode(&mut contract, 1);
        assert_eq!(report.exit_code, 0);
        assert!(contract.is_destroyed());
    }

    #[test]
    fn test_multi_escrow() {
        let fixtures = multi_escrow_fixtures(3);
        let addresses: Vec<_> = fixtures.iter().map(|f| f.make_contract().address()).collect();
        assert_ne!(addresses[0], addresses[1]);
        assert_ne!(addresses[1], addresses[2]);
        assert_ne!(addresses[0], addresses[2]);
    }

    #[test]
    fn test_many_fixtures_stay_distinct() {
        use std::collections::HashSet;

        let fixtures = multi_escrow_fixtures(300);
        let keys: HashSet<_> = fixtures.iter().map(|f| f.guarantor_key()).collect();
        let sellers: HashSet<_> = fixtures.iter().map(|f| f.seller).collect();
        assert_eq!(keys.len(), 300);
        assert_eq!(sellers.len(), 300);

        // Past one byte of index.
        let (first, wrapped) = (&fixtures[0], &fixtures[256]);
        assert_ne!(first.guarantor_key(), wrapped.guarantor_key());
        assert_ne!(first.make_contract().address(), wrapped.make_contract().address());
    }

    #[test]
    fn test_random_parties_differ() {
        let a = EscrowFixture::random();
        let b = EscrowFixture::random();
        assert_ne!(a.guarantor_key(), b.guarantor_key());
    }
}

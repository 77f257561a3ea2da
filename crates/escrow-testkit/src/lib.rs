//! # Escrow Testkit
//!
//! Testing utilities for the guarantor escrow.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Golden vectors**: Known hashes, keys and signatures every implementation must reproduce
//! - **Generators**: Proptest strategies for property-based testing
//! - **Fixtures**: Ready-made parties and deployed instances
//!
//! ## Golden Vectors
//!
//! ```rust
//! use escrow_testkit::vectors::verify_all_vectors;
//!
//! for (name, matches, computed) in verify_all_vectors() {
//!     println!("{name}: {computed} ({})", if matches { "ok" } else { "MISMATCH" });
//! }
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use escrow_testkit::generators::EscrowParams;
//!
//! proptest! {
//!     #[test]
//!     fn address_is_deterministic(params: EscrowParams) {
//!         let a = params.record().to_cell().unwrap().hash();
//!         let b = params.record().to_cell().unwrap().hash();
//!         prop_assert_eq!(a, b);
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust
//! use escrow_testkit::fixtures::EscrowFixture;
//!
//! let fixture = EscrowFixture::new();
//! let mut escrow = fixture.make_contract();
//! let report = fixture.send_signed_opcode(&mut escrow, 2);
//! assert_eq!(report.exit_code, 0);
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{multi_escrow_fixtures, stub_compiler, EscrowFixture};
pub use generators::EscrowParams;
pub use vectors::{all_vectors, compute, verify_all_vectors, GoldenVector, VectorKind};

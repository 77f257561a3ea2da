//! # Escrow Core
//!
//! Pure primitives for the guarantor escrow: cells, addresses, hashing and
//! Ed25519 signatures.
//!
//! This crate contains no I/O and no contract logic. It is pure computation
//! over the bit-packed records the contract stores and receives.
//!
//! ## Key Types
//!
//! - [`Cell`] - Immutable bit-packed record (≤1023 bits, ≤4 child refs)
//! - [`CellBuilder`] / [`CellSlice`] - Positional writer and reader
//! - [`Address`] - Standard chain address (workchain + 256-bit hash)
//! - [`CellHash`] - Representation hash of a cell (SHA-256)
//! - [`Ed25519PublicKey`], [`Ed25519Signature`], [`Keypair`]
//!
//! ## Encoding
//!
//! Cells carry no field names or version tags. A reader must know the layout
//! it expects and read fields back in the order they were written.

pub mod address;
pub mod builder;
pub mod cell;
pub mod crypto;
pub mod error;
pub mod slice;

pub use address::Address;
pub use builder::CellBuilder;
pub use cell::{Cell, MAX_CELL_BITS, MAX_CELL_DEPTH, MAX_CELL_REFS};
pub use crypto::{verify_signature, CellHash, Ed25519PublicKey, Ed25519Signature, Keypair};
pub use error::{CellError, CoreError};
pub use slice::CellSlice;

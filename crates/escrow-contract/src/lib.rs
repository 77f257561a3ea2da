//! # Escrow Contract
//!
//! A guarantor escrow: a single-use account that holds a balance until a
//! trusted guarantor signs an instruction releasing it to the seller or
//! returning it to the buyer.
//!
//! ## Overview
//!
//! - **Storage**: seller address, buyer address and guarantor key, fixed at
//!   deployment
//! - **Instructions**: an 8-bit opcode signed by the guarantor (1 = accept,
//!   2 = decline)
//! - **Dispatch**: internal messages are refused; a verified accept or decline
//!   sends the whole balance to its beneficiary and deletes the account
//! - **Deployment**: an injected [`Compiler`] turns source into code, and the
//!   address derives from code and data
//!
//! ## Usage
//!
//! ```rust,no_run
//! use escrow_contract::{
//!     build_external_body, CodeImage, CompileError, ContractConfig, EscrowContract,
//!     StorageRecord,
//! };
//! use escrow_contract::core::{Address, Keypair};
//!
//! fn compile(_source: &str) -> Result<CodeImage, CompileError> {
//!     Ok(CodeImage::from_bytes(&b"escrow-code"[..])?)
//! }
//!
//! let guarantor = Keypair::generate();
//! let record = StorageRecord::new(
//!     Address::new(0, [0x11; 32]),
//!     Address::new(0, [0x22; 32]),
//!     guarantor.public_key(),
//! );
//!
//! let mut escrow =
//!     EscrowContract::create(&compile, "", &record, 1_000, &ContractConfig::default()).unwrap();
//!
//! // The guarantor releases the funds to the seller.
//! let report = escrow
//!     .receive_external(build_external_body(1, &guarantor).unwrap())
//!     .unwrap();
//! assert_eq!(report.exit_code, 0);
//! assert!(escrow.is_destroyed());
//! ```
//!
//! ## Re-exports
//!
//! - `escrow_contract::core` - Cells, addresses, hashes and keys

pub mod action;
pub mod config;
pub mod contract;
pub mod deploy;
pub mod dispatch;
pub mod error;
pub mod instruction;
pub mod message;
pub mod storage;

pub use escrow_core as core;

pub use action::{OutboundAction, SendMode, SendMsgAction};
pub use config::ContractConfig;
pub use contract::{ContractStatus, EscrowContract, ExecutionReport};
pub use deploy::{
    contract_address, deploy, deploy_raw, CodeImage, CompileError, Compiler, DeployableUnit,
    StateInit,
};
pub use dispatch::{dispatch, Outcome};
pub use error::{exit_codes, ContractError, Rejection, Result};
pub use instruction::{
    build_external_body, opcode_cell, sign_opcode, signing_payload, Opcode, SignedInstruction,
};
pub use message::InboundMessage;
pub use storage::{get_info, ContractInfo, StorageRecord};

//! Deployment: compiled code, state-init and contract address derivation.
//!
//! The toolchain that turns contract source into code is external. It is
//! injected through the [`Compiler`] trait so nothing here spawns a process.
//!
//! State-init layout:
//!
//! ```text
//! split_depth:(Maybe ...)=0 special:(Maybe ...)=0 code:(Maybe ^Cell)=1 data:(Maybe ^Cell)=1
//! library:(Maybe ^Cell)=0
//! ```
//!
//! The contract address is `workchain:hash(state_init)`, so the same code and
//! data always land at the same address.

use std::sync::Arc;

use bytes::{Bytes, BytesMut};
use escrow_core::{Address, Cell, CellBuilder, CellError, CellHash, MAX_CELL_BITS};
use thiserror::Error;
use tracing::debug;

use crate::config::ContractConfig;
use crate::error::{ContractError, Result};
use crate::storage::StorageRecord;

/// Bytes of code per snake cell.
pub const SNAKE_CHUNK_BYTES: usize = MAX_CELL_BITS / 8;

/// Failure reported by a [`Compiler`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    #[error("compiler failed: {0}")]
    Failed(String),

    #[error("compiler produced an unusable image: {0}")]
    InvalidImage(#[from] CellError),
}

/// Turns contract source into a code image.
pub trait Compiler {
    fn compile(&self, source: &str) -> std::result::Result<CodeImage, CompileError>;
}

impl<F> Compiler for F
where
    F: Fn(&str) -> std::result::Result<CodeImage, CompileError>,
{
    fn compile(&self, source: &str) -> std::result::Result<CodeImage, CompileError> {
        self(source)
    }
}

/// Compiled contract code, held as the root of a cell tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeImage {
    root: Arc<Cell>,
}

impl CodeImage {
    pub fn from_cell(root: impl Into<Arc<Cell>>) -> Self {
        Self { root: root.into() }
    }

    /// Pack an opaque byte image into a snake chain: each cell carries up to
    /// [`SNAKE_CHUNK_BYTES`] bytes and one reference to the continuation.
    pub fn from_bytes(image: impl Into<Bytes>) -> std::result::Result<Self, CellError> {
        let image: Bytes = image.into();
        let mut tail: Option<Cell> = None;
        let mut chunks: Vec<&[u8]> = image.chunks(SNAKE_CHUNK_BYTES).collect();
        if chunks.is_empty() {
            chunks.push(&[]);
        }
        for chunk in chunks.into_iter().rev() {
            let mut b = CellBuilder::new();
            b.store_buffer(chunk)?;
            if let Some(next) = tail.take() {
                b.store_ref(next)?;
            }
            tail = Some(b.build());
        }
        Ok(Self::from_cell(tail.unwrap_or_default()))
    }

    /// Concatenate the bytes of a snake chain back into one buffer.
    pub fn snake_bytes(&self) -> std::result::Result<Bytes, CellError> {
        let mut out = BytesMut::new();
        let mut cell: &Cell = &self.root;
        loop {
            let mut s = cell.parse();
            out.extend_from_slice(&s.load_buffer(s.remaining_bits() / 8)?);
            if s.remaining_refs() == 0 {
                s.end_parse()?;
                break;
            }
            cell = s.load_ref()?;
            s.end_parse()?;
        }
        Ok(out.freeze())
    }

    pub fn root(&self) -> &Cell {
        &self.root
    }

    pub fn hash(&self) -> CellHash {
        self.root.hash()
    }
}

/// Code and initial data of a contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateInit {
    pub code: CodeImage,
    pub data: Cell,
}

impl StateInit {
    pub fn new(code: CodeImage, data: Cell) -> Self {
        Self { code, data }
    }

    pub fn to_cell(&self) -> std::result::Result<Cell, CellError> {
        let mut b = CellBuilder::new();
        b.store_bit(false)? // split_depth
            .store_bit(false)? // special
            .store_bit(true)?
            .store_ref(self.code.root.clone())?
            .store_bit(true)?
            .store_ref(self.data.clone())?
            .store_bit(false)?; // library
        Ok(b.build())
    }

    /// Address this state-init deploys to on `workchain`.
    pub fn address(&self, workchain: i8) -> std::result::Result<Address, CellError> {
        Ok(Address::from_state_init_hash(workchain, &self.to_cell()?.hash()))
    }
}

/// Derive the contract address from its state-init.
pub fn contract_address(
    workchain: i8,
    state_init: &StateInit,
) -> std::result::Result<Address, CellError> {
    state_init.address(workchain)
}

/// Everything needed to deploy one escrow instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployableUnit {
    pub address: Address,
    pub code: CodeImage,
    pub data: Cell,
}

impl DeployableUnit {
    pub fn state_init(&self) -> StateInit {
        StateInit::new(self.code.clone(), self.data.clone())
    }
}

/// Compile `source` and pair it with the data cell for `record`.
pub fn deploy<C: Compiler + ?Sized>(
    compiler: &C,
    source: &str,
    record: &StorageRecord,
    config: &ContractConfig,
) -> Result<DeployableUnit> {
    let code = compiler.compile(source)?;
    let data = record.to_cell()?;
    let unit = assemble(code, data, config)?;

    debug!(
        address = %unit.address,
        code_hash = %unit.code.hash().to_hex(),
        "prepared deployment"
    );
    Ok(unit)
}

/// Build a unit from an already compiled image and a raw data cell.
///
/// With `validate_storage` on, the data cell must decode as a storage record.
pub fn deploy_raw(code: CodeImage, data: Cell, config: &ContractConfig) -> Result<DeployableUnit> {
    if config.validate_storage {
        StorageRecord::load(&data).map_err(ContractError::InvalidStorage)?;
    }
    assemble(code, data, config)
}

fn assemble(code: CodeImage, data: Cell, config: &ContractConfig) -> Result<DeployableUnit> {
    let state_init = StateInit::new(code, data);
    let address = contract_address(config.workchain, &state_init)?;
    let StateInit { code, data } = state_init;
    Ok(DeployableUnit {
        address,
        code,
        data,
    })
}

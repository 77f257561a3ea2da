//! A deployed escrow instance, run locally.
//!
//! `EscrowContract` plays the execution environment around [`dispatch`]: it
//! holds the balance, credits incoming value, applies the outbound action and
//! deletes the account once the balance has left.

use escrow_core::{Address, Cell};
use tracing::{debug, info};

use crate::config::ContractConfig;
use crate::deploy::{deploy, CodeImage, Compiler, DeployableUnit};
use crate::dispatch::{dispatch, Outcome};
use crate::error::{ContractError, Result};
use crate::message::InboundMessage;
use crate::storage::{ContractInfo, StorageRecord};

/// Lifecycle of an instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContractStatus {
    Active,
    /// Balance paid out and account deleted. Terminal.
    Destroyed,
}

/// What one message did to the instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionReport {
    pub exit_code: u32,
    pub outcome: Outcome,
    /// Encoded action list, present only when an action was emitted.
    pub actions: Option<Cell>,
}

impl ExecutionReport {
    pub fn is_success(&self) -> bool {
        self.outcome.is_dispatched()
    }
}

/// A single escrow account.
#[derive(Debug, Clone)]
pub struct EscrowContract {
    address: Address,
    code: CodeImage,
    data: Cell,
    balance: u128,
    status: ContractStatus,
}

impl EscrowContract {
    /// Compile, derive the address and fund the instance in one step.
    pub fn create<C: Compiler + ?Sized>(
        compiler: &C,
        source: &str,
        record: &StorageRecord,
        balance: u128,
        config: &ContractConfig,
    ) -> Result<Self> {
        let unit = deploy(compiler, source, record, config)?;
        Self::from_unit(unit, balance, config)
    }

    /// Bring up an instance from a prepared deployment.
    pub fn from_unit(unit: DeployableUnit, balance: u128, config: &ContractConfig) -> Result<Self> {
        if config.validate_storage {
            StorageRecord::load(&unit.data).map_err(ContractError::InvalidStorage)?;
        }

        info!(address = %unit.address, balance, "escrow instance deployed");

        Ok(Self {
            address: unit.address,
            code: unit.code,
            data: unit.data,
            balance,
            status: ContractStatus::Active,
        })
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn code(&self) -> &CodeImage {
        &self.code
    }

    pub fn data(&self) -> &Cell {
        &self.data
    }

    pub fn balance(&self) -> u128 {
        self.balance
    }

    pub fn status(&self) -> ContractStatus {
        self.status
    }

    pub fn is_destroyed(&self) -> bool {
        self.status == ContractStatus::Destroyed
    }

    /// Read-only query. Needs no authorization and changes nothing.
    pub fn get_info(&self) -> Result<ContractInfo> {
        self.ensure_active()?;
        let record = StorageRecord::load(&self.data).map_err(ContractError::InvalidStorage)?;
        Ok(record.info(self.balance))
    }

    /// Deliver a message from another account.
    pub fn receive_internal(
        &mut self,
        source: Address,
        value: u128,
        body: Cell,
    ) -> Result<ExecutionReport> {
        self.receive(InboundMessage::internal(source, value, body))
    }

    /// Deliver a message from outside the network.
    pub fn receive_external(&mut self, body: Cell) -> Result<ExecutionReport> {
        self.receive(InboundMessage::external(body))
    }

    pub fn receive(&mut self, message: InboundMessage) -> Result<ExecutionReport> {
        self.ensure_active()?;

        // Credit phase runs before compute, and stays even when compute fails.
        let credit = message.value();
        if credit > 0 {
            self.balance = self.balance.saturating_add(credit);
            debug!(address = %self.address, credit, balance = self.balance, "credited");
        }

        let outcome = dispatch(&self.data, self.balance, &message);
        self.apply(outcome)
    }

    fn apply(&mut self, outcome: Outcome) -> Result<ExecutionReport> {
        let exit_code = outcome.exit_code();
        let actions = match &outcome {
            Outcome::Rejected(_) => None,
            Outcome::Dispatched(action) => {
                let list = action.to_action_list()?;
                info!(
                    address = %self.address,
                    recipient = %action.recipient,
                    amount = action.amount,
                    "balance drained, account deleted"
                );
                self.balance = 0;
                self.data = Cell::empty();
                self.status = ContractStatus::Destroyed;
                Some(list)
            }
        };

        Ok(ExecutionReport {
            exit_code,
            outcome,
            actions,
        })
    }

    fn ensure_active(&self) -> Result<()> {
        match self.status {
            ContractStatus::Active => Ok(()),
            ContractStatus::Destroyed => Err(ContractError::Destroyed(self.address)),
        }
    }
}

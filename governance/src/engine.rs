//! The managed distribution engine, as seen by the controller.
//!
//! The engine owns the pool registry, the running allocation total, the
//! emission rate and the fee splits. It is an external collaborator: the
//! controller only reads it and forwards owner-gated mutations to it. Every
//! mutating method takes the caller so the engine can run its own owner
//! check.

use alb_types::Address;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Index of a pool in the engine's registry.
pub type PoolId = usize;

/// A pool record as stored by the engine.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolInfo {
    pub lp_token: Address,
    pub alloc_point: u64,
    pub deposit_fee_bps: u16,
    pub harvest_interval_secs: u64,
    /// Auxiliary reward hooks notified on deposit and withdraw.
    pub rewarders: Vec<Address>,
}

/// Arguments for creating a pool.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPool {
    pub alloc_point: u64,
    pub lp_token: Address,
    #[serde(default)]
    pub deposit_fee_bps: u16,
    #[serde(default)]
    pub harvest_interval_secs: u64,
    #[serde(default)]
    pub rewarders: Vec<Address>,
}

/// Arguments for rewriting an existing pool. The lp token never changes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolUpdate {
    pub alloc_point: u64,
    #[serde(default)]
    pub deposit_fee_bps: u16,
    #[serde(default)]
    pub harvest_interval_secs: u64,
    #[serde(default)]
    pub rewarders: Vec<Address>,
}

/// Fee split recipient.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeeRole {
    Team,
    Treasury,
    Investor,
}

/// Rejections raised by the engine itself.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("caller {caller} is not the engine owner")]
    NotOwner { caller: Address },

    #[error("pool {0} does not exist")]
    UnknownPool(PoolId),

    #[error("{0} must not be the zero address")]
    ZeroAddress(&'static str),

    #[error("deposit fee {fee_bps} bps above engine limit {max} bps")]
    DepositFeeTooHigh { fee_bps: u16, max: u16 },

    #[error("harvest interval {secs}s above engine limit {max}s")]
    HarvestIntervalTooHigh { secs: u64, max: u64 },

    #[error("{count} rewarders above engine limit {max}")]
    TooManyRewarders { count: usize, max: usize },

    #[error("fee splits would total {total}, above {max}")]
    InvalidPercent { total: u32, max: u32 },

    #[error("{0}")]
    Other(String),
}

/// Owner-gated parameter surface of the distribution engine.
pub trait ManagedEngine {
    fn owner(&self) -> Address;

    fn pool_length(&self) -> usize;
    fn pool_info(&self, pid: PoolId) -> Option<PoolInfo>;
    fn total_alloc_point(&self) -> u64;

    /// Raw reward tokens emitted per second.
    fn emission_rate(&self) -> u128;

    /// Fee split for `role`, parts per thousand.
    fn fee_percent(&self, role: FeeRole) -> u16;
    fn fee_address(&self, role: FeeRole) -> Address;

    /// Append a pool; returns its id.
    fn add_pool(&mut self, caller: &Address, pool: NewPool) -> Result<PoolId, EngineError>;
    fn set_pool(
        &mut self,
        caller: &Address,
        pid: PoolId,
        update: PoolUpdate,
    ) -> Result<(), EngineError>;
    fn update_alloc_point(
        &mut self,
        caller: &Address,
        pid: PoolId,
        alloc_point: u64,
    ) -> Result<(), EngineError>;
    fn update_emission_rate(&mut self, caller: &Address, rate: u128) -> Result<(), EngineError>;
    fn set_fee_percent(
        &mut self,
        caller: &Address,
        role: FeeRole,
        percent: u16,
    ) -> Result<(), EngineError>;
    fn set_fee_address(
        &mut self,
        caller: &Address,
        role: FeeRole,
        address: Address,
    ) -> Result<(), EngineError>;
    fn transfer_ownership(&mut self, caller: &Address, new_owner: Address)
        -> Result<(), EngineError>;
}

impl FeeRole {
    pub const ALL: [FeeRole; 3] = [FeeRole::Team, FeeRole::Treasury, FeeRole::Investor];

    pub fn name(self) -> &'static str {
        match self {
            Self::Team => "team",
            Self::Treasury => "treasury",
            Self::Investor => "investor",
        }
    }
}

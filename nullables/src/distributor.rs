//! Nullable distributor: an in-memory managed engine.
//!
//! Models only the parameter surface: owner, pool registry, running
//! allocation total, emission rate and fee splits. No accrual or payouts.

use alb_governance::{
    EngineError, FeeRole, ManagedEngine, NewPool, PoolId, PoolInfo, PoolUpdate,
};
use alb_types::{amount::raw_text, tokens, Address};
use serde::{Deserialize, Serialize};

/// Engine-side ceiling on a pool's deposit fee (4%).
pub const MAX_DEPOSIT_FEE_BPS: u16 = 400;
/// Engine-side ceiling on a pool's harvest interval (14 days).
pub const MAX_HARVEST_INTERVAL_SECS: u64 = 14 * 24 * 3600;
pub const MAX_REWARDERS: usize = 10;
/// The three fee splits together may not exceed this many parts per thousand.
pub const MAX_FEE_TOTAL: u32 = 1000;

/// Initial engine parameters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributorParams {
    #[serde(default = "default_emission_rate", with = "raw_text")]
    pub emission_rate: u128,
    #[serde(default = "default_fee_address")]
    pub team_address: Address,
    #[serde(default = "default_fee_address")]
    pub treasury_address: Address,
    #[serde(default = "default_fee_address")]
    pub investor_address: Address,
    #[serde(default = "default_team_percent")]
    pub team_percent: u16,
    #[serde(default = "default_treasury_percent")]
    pub treasury_percent: u16,
    #[serde(default)]
    pub investor_percent: u16,
}

fn default_emission_rate() -> u128 {
    tokens(15)
}

fn default_fee_address() -> Address {
    Address::from_low_u64(0xFEE)
}

fn default_team_percent() -> u16 {
    150
}

fn default_treasury_percent() -> u16 {
    150
}

impl Default for DistributorParams {
    fn default() -> Self {
        Self {
            emission_rate: default_emission_rate(),
            team_address: default_fee_address(),
            treasury_address: default_fee_address(),
            investor_address: default_fee_address(),
            team_percent: default_team_percent(),
            treasury_percent: default_treasury_percent(),
            investor_percent: 0,
        }
    }
}

/// In-memory [`ManagedEngine`].
#[derive(Clone, Debug)]
pub struct NullDistributor {
    owner: Address,
    pools: Vec<PoolInfo>,
    total_alloc_point: u64,
    emission_rate: u128,
    fee_addresses: [Address; 3],
    fee_percents: [u16; 3],
    mutations: usize,
}

impl NullDistributor {
    pub fn new(owner: Address) -> Self {
        Self::with_params(owner, DistributorParams::default())
    }

    pub fn with_params(owner: Address, params: DistributorParams) -> Self {
        Self {
            owner,
            pools: Vec::new(),
            total_alloc_point: 0,
            emission_rate: params.emission_rate,
            fee_addresses: [
                params.team_address,
                params.treasury_address,
                params.investor_address,
            ],
            fee_percents: [
                params.team_percent,
                params.treasury_percent,
                params.investor_percent,
            ],
            mutations: 0,
        }
    }

    pub fn pools(&self) -> &[PoolInfo] {
        &self.pools
    }

    /// Number of successful mutating calls accepted so far.
    pub fn mutation_count(&self) -> usize {
        self.mutations
    }

    fn only_owner(&self, caller: &Address) -> Result<(), EngineError> {
        if *caller != self.owner {
            return Err(EngineError::NotOwner { caller: *caller });
        }
        Ok(())
    }

    fn check_pool_params(
        deposit_fee_bps: u16,
        harvest_interval_secs: u64,
        rewarders: &[Address],
    ) -> Result<(), EngineError> {
        if deposit_fee_bps > MAX_DEPOSIT_FEE_BPS {
            return Err(EngineError::DepositFeeTooHigh {
                fee_bps: deposit_fee_bps,
                max: MAX_DEPOSIT_FEE_BPS,
            });
        }
        if harvest_interval_secs > MAX_HARVEST_INTERVAL_SECS {
            return Err(EngineError::HarvestIntervalTooHigh {
                secs: harvest_interval_secs,
                max: MAX_HARVEST_INTERVAL_SECS,
            });
        }
        if rewarders.len() > MAX_REWARDERS {
            return Err(EngineError::TooManyRewarders {
                count: rewarders.len(),
                max: MAX_REWARDERS,
            });
        }
        if rewarders.iter().any(Address::is_zero) {
            return Err(EngineError::ZeroAddress("rewarder"));
        }
        Ok(())
    }

    fn reweight(&mut self, pid: PoolId, alloc_point: u64) -> Result<(), EngineError> {
        let pool = self.pools.get_mut(pid).ok_or(EngineError::UnknownPool(pid))?;
        let total = self
            .total_alloc_point
            .checked_sub(pool.alloc_point)
            .and_then(|t| t.checked_add(alloc_point))
            .ok_or_else(|| EngineError::Other("allocation total overflow".into()))?;
        pool.alloc_point = alloc_point;
        self.total_alloc_point = total;
        Ok(())
    }
}

fn slot(role: FeeRole) -> usize {
    match role {
        FeeRole::Team => 0,
        FeeRole::Treasury => 1,
        FeeRole::Investor => 2,
    }
}

impl ManagedEngine for NullDistributor {
    fn owner(&self) -> Address {
        self.owner
    }

    fn pool_length(&self) -> usize {
        self.pools.len()
    }

    fn pool_info(&self, pid: PoolId) -> Option<PoolInfo> {
        self.pools.get(pid).cloned()
    }

    fn total_alloc_point(&self) -> u64 {
        self.total_alloc_point
    }

    fn emission_rate(&self) -> u128 {
        self.emission_rate
    }

    fn fee_percent(&self, role: FeeRole) -> u16 {
        self.fee_percents[slot(role)]
    }

    fn fee_address(&self, role: FeeRole) -> Address {
        self.fee_addresses[slot(role)]
    }

    fn add_pool(&mut self, caller: &Address, pool: NewPool) -> Result<PoolId, EngineError> {
        self.only_owner(caller)?;
        if pool.lp_token.is_zero() {
            return Err(EngineError::ZeroAddress("lp token"));
        }
        Self::check_pool_params(
            pool.deposit_fee_bps,
            pool.harvest_interval_secs,
            &pool.rewarders,
        )?;
        let total = self
            .total_alloc_point
            .checked_add(pool.alloc_point)
            .ok_or_else(|| EngineError::Other("allocation total overflow".into()))?;
        self.total_alloc_point = total;
        self.pools.push(PoolInfo {
            lp_token: pool.lp_token,
            alloc_point: pool.alloc_point,
            deposit_fee_bps: pool.deposit_fee_bps,
            harvest_interval_secs: pool.harvest_interval_secs,
            rewarders: pool.rewarders,
        });
        self.mutations += 1;
        tracing::trace!(pid = self.pools.len() - 1, total, "null distributor: pool added");
        Ok(self.pools.len() - 1)
    }

    fn set_pool(
        &mut self,
        caller: &Address,
        pid: PoolId,
        update: PoolUpdate,
    ) -> Result<(), EngineError> {
        self.only_owner(caller)?;
        Self::check_pool_params(
            update.deposit_fee_bps,
            update.harvest_interval_secs,
            &update.rewarders,
        )?;
        self.reweight(pid, update.alloc_point)?;
        let pool = &mut self.pools[pid];
        pool.deposit_fee_bps = update.deposit_fee_bps;
        pool.harvest_interval_secs = update.harvest_interval_secs;
        pool.rewarders = update.rewarders;
        self.mutations += 1;
        Ok(())
    }

    fn update_alloc_point(
        &mut self,
        caller: &Address,
        pid: PoolId,
        alloc_point: u64,
    ) -> Result<(), EngineError> {
        self.only_owner(caller)?;
        self.reweight(pid, alloc_point)?;
        self.mutations += 1;
        Ok(())
    }

    fn update_emission_rate(&mut self, caller: &Address, rate: u128) -> Result<(), EngineError> {
        self.only_owner(caller)?;
        self.emission_rate = rate;
        self.mutations += 1;
        Ok(())
    }

    fn set_fee_percent(
        &mut self,
        caller: &Address,
        role: FeeRole,
        percent: u16,
    ) -> Result<(), EngineError> {
        self.only_owner(caller)?;
        let total: u32 = FeeRole::ALL
            .iter()
            .map(|&r| {
                if r == role {
                    u32::from(percent)
                } else {
                    u32::from(self.fee_percent(r))
                }
            })
            .sum();
        if total > MAX_FEE_TOTAL {
            return Err(EngineError::InvalidPercent {
                total,
                max: MAX_FEE_TOTAL,
            });
        }
        self.fee_percents[slot(role)] = percent;
        self.mutations += 1;
        Ok(())
    }

    fn set_fee_address(
        &mut self,
        caller: &Address,
        role: FeeRole,
        address: Address,
    ) -> Result<(), EngineError> {
        self.only_owner(caller)?;
        if address.is_zero() {
            return Err(EngineError::ZeroAddress(role.name()));
        }
        self.fee_addresses[slot(role)] = address;
        self.mutations += 1;
        Ok(())
    }

    fn transfer_ownership(
        &mut self,
        caller: &Address,
        new_owner: Address,
    ) -> Result<(), EngineError> {
        self.only_owner(caller)?;
        if new_owner.is_zero() {
            return Err(EngineError::ZeroAddress("new owner"));
        }
        self.owner = new_owner;
        self.mutations += 1;
        Ok(())
    }
}

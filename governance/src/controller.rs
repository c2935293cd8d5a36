//! The distributor controller: sole owner of the managed engine.
//!
//! Every sensitive engine mutation goes through an owner check, then (for
//! timelocked actions) a ready timelock slot which is consumed, then bound
//! validation, then forwarding. The timelock is consumed before bounds are
//! checked, so a rejected value still burns the preparation and the owner
//! must prepare and wait again.

use crate::action::ActionId;
use crate::bounds::Bounds;
use crate::config::ControllerConfig;
use crate::engine::{EngineError, FeeRole, ManagedEngine, NewPool, PoolId, PoolUpdate};
use crate::error::GovernanceError;
use crate::timelock::{SlotState, Timelock};
use alb_types::{Address, Timestamp};
use tracing::{debug, info};

/// Timelocked governance wrapper around a [`ManagedEngine`].
pub struct DistributorController<E> {
    /// Identity the controller uses when calling the engine.
    address: Address,
    owner: Address,
    engine: E,
    timelock: Timelock,
    bounds: Bounds,
}

impl<E: ManagedEngine> DistributorController<E> {
    /// Wrap `engine`. The engine must already list `address` as its owner for
    /// forwarded calls to succeed.
    pub fn new(address: Address, owner: Address, engine: E, config: &ControllerConfig) -> Self {
        Self::from_parts(
            address,
            owner,
            engine,
            Timelock::new(config.delay_secs),
            config.bounds.clone(),
        )
    }

    pub(crate) fn from_parts(
        address: Address,
        owner: Address,
        engine: E,
        timelock: Timelock,
        bounds: Bounds,
    ) -> Self {
        Self {
            address,
            owner,
            engine,
            timelock,
            bounds,
        }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn owner(&self) -> Address {
        self.owner
    }

    /// Delay applied by the next `prepare`, in seconds.
    pub fn delay(&self) -> u64 {
        self.timelock.delay_secs()
    }

    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    pub fn pending_unlock(&self, action: ActionId) -> Option<Timestamp> {
        self.timelock.pending_unlock(action)
    }

    pub fn slot_state(&self, action: ActionId, now: Timestamp) -> SlotState {
        self.timelock.state(action, now)
    }

    pub fn is_ready(&self, action: ActionId, now: Timestamp) -> bool {
        matches!(self.timelock.state(action, now), SlotState::Ready { .. })
    }

    pub(crate) fn timelock(&self) -> &Timelock {
        &self.timelock
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn into_engine(self) -> E {
        self.engine
    }

    // ── Timelock ──────────────────────────────────────────────────────────

    /// Announce intent to run `action`; it unlocks at `now + delay`.
    ///
    /// Re-preparing a pending action restarts its countdown.
    pub fn prepare(
        &mut self,
        caller: &Address,
        action: ActionId,
        now: Timestamp,
    ) -> Result<Timestamp, GovernanceError> {
        self.only_owner(caller)?;
        let unlock_at = self.timelock.prepare(action, now);
        info!(%action, %unlock_at, "action prepared");
        Ok(unlock_at)
    }

    /// Change the delay used by later preparations.
    pub fn change_delay(
        &mut self,
        caller: &Address,
        delay_secs: u64,
        now: Timestamp,
    ) -> Result<(), GovernanceError> {
        self.unlock(caller, ActionId::ChangeDelay, now)?;
        let previous = self.timelock.delay_secs();
        self.timelock.set_delay(delay_secs);
        info!(previous, delay_secs, "timelock delay changed");
        Ok(())
    }

    // ── Pools ─────────────────────────────────────────────────────────────

    /// Create a pool. Owner only, no timelock; allocation total is bounded.
    pub fn add_pool(&mut self, caller: &Address, pool: NewPool) -> Result<PoolId, GovernanceError> {
        self.only_owner(caller)?;
        let total = self
            .bounds
            .check_total_alloc(self.engine.total_alloc_point(), 0, pool.alloc_point)?;
        let alloc_point = pool.alloc_point;
        let pid = self.engine.add_pool(&self.address, pool)?;
        info!(pid, alloc_point, total, "pool added");
        Ok(pid)
    }

    /// Rewrite a pool's weight, fee, harvest interval and rewarders.
    ///
    /// Validation order after the timelock: deposit fee, then allocation total.
    pub fn set_pool(
        &mut self,
        caller: &Address,
        pid: PoolId,
        update: PoolUpdate,
        now: Timestamp,
    ) -> Result<(), GovernanceError> {
        self.unlock(caller, ActionId::SetPool, now)?;
        self.bounds.check_deposit_fee(update.deposit_fee_bps)?;
        let total = self.check_reweight(pid, update.alloc_point)?;
        let alloc_point = update.alloc_point;
        self.engine.set_pool(&self.address, pid, update)?;
        info!(pid, alloc_point, total, "pool updated");
        Ok(())
    }

    /// Change only a pool's allocation weight. Owner only, no timelock.
    pub fn update_alloc_point(
        &mut self,
        caller: &Address,
        pid: PoolId,
        alloc_point: u64,
    ) -> Result<(), GovernanceError> {
        self.only_owner(caller)?;
        let total = self.check_reweight(pid, alloc_point)?;
        self.engine
            .update_alloc_point(&self.address, pid, alloc_point)?;
        info!(pid, alloc_point, total, "pool weight updated");
        Ok(())
    }

    fn check_reweight(&self, pid: PoolId, alloc_point: u64) -> Result<u64, GovernanceError> {
        let pool = self
            .engine
            .pool_info(pid)
            .ok_or(EngineError::UnknownPool(pid))?;
        self.bounds
            .check_total_alloc(self.engine.total_alloc_point(), pool.alloc_point, alloc_point)
    }

    // ── Emission ──────────────────────────────────────────────────────────

    pub fn update_emission_rate(
        &mut self,
        caller: &Address,
        rate: u128,
        now: Timestamp,
    ) -> Result<(), GovernanceError> {
        self.unlock(caller, ActionId::UpdateEmissionRate, now)?;
        self.bounds.check_emission_rate(rate)?;
        self.engine.update_emission_rate(&self.address, rate)?;
        info!(rate, "emission rate updated");
        Ok(())
    }

    // ── Fee splits ────────────────────────────────────────────────────────

    pub fn set_team_percent(
        &mut self,
        caller: &Address,
        percent: u16,
        now: Timestamp,
    ) -> Result<(), GovernanceError> {
        self.set_fee_percent(caller, FeeRole::Team, percent, now)
    }

    pub fn set_treasury_percent(
        &mut self,
        caller: &Address,
        percent: u16,
        now: Timestamp,
    ) -> Result<(), GovernanceError> {
        self.set_fee_percent(caller, FeeRole::Treasury, percent, now)
    }

    pub fn set_investor_percent(
        &mut self,
        caller: &Address,
        percent: u16,
        now: Timestamp,
    ) -> Result<(), GovernanceError> {
        self.set_fee_percent(caller, FeeRole::Investor, percent, now)
    }

    pub fn set_team_address(
        &mut self,
        caller: &Address,
        address: Address,
        now: Timestamp,
    ) -> Result<(), GovernanceError> {
        self.set_fee_address(caller, FeeRole::Team, address, now)
    }

    pub fn set_treasury_address(
        &mut self,
        caller: &Address,
        address: Address,
        now: Timestamp,
    ) -> Result<(), GovernanceError> {
        self.set_fee_address(caller, FeeRole::Treasury, address, now)
    }

    pub fn set_investor_address(
        &mut self,
        caller: &Address,
        address: Address,
        now: Timestamp,
    ) -> Result<(), GovernanceError> {
        self.set_fee_address(caller, FeeRole::Investor, address, now)
    }

    fn set_fee_percent(
        &mut self,
        caller: &Address,
        role: FeeRole,
        percent: u16,
        now: Timestamp,
    ) -> Result<(), GovernanceError> {
        self.unlock(caller, percent_action(role), now)?;
        self.bounds.check_fee_percent(percent)?;
        self.engine.set_fee_percent(&self.address, role, percent)?;
        info!(role = role.name(), percent, "fee percent updated");
        Ok(())
    }

    fn set_fee_address(
        &mut self,
        caller: &Address,
        role: FeeRole,
        address: Address,
        now: Timestamp,
    ) -> Result<(), GovernanceError> {
        self.unlock(caller, address_action(role), now)?;
        self.engine.set_fee_address(&self.address, role, address)?;
        info!(role = role.name(), %address, "fee address updated");
        Ok(())
    }

    // ── Ownership ─────────────────────────────────────────────────────────

    /// Hand the controller to `new_owner`. The previous owner loses access
    /// immediately.
    pub fn transfer_ownership(
        &mut self,
        caller: &Address,
        new_owner: Address,
        now: Timestamp,
    ) -> Result<(), GovernanceError> {
        self.unlock(caller, ActionId::ChangeSelfOwner, now)?;
        if new_owner.is_zero() {
            return Err(GovernanceError::InvalidOwner);
        }
        let previous = std::mem::replace(&mut self.owner, new_owner);
        info!(%previous, %new_owner, "controller ownership transferred");
        Ok(())
    }

    /// Hand the engine to `new_owner`. After this the controller can no
    /// longer mutate the engine; there is no way back through the controller.
    pub fn transfer_engine_ownership(
        &mut self,
        caller: &Address,
        new_owner: Address,
        now: Timestamp,
    ) -> Result<(), GovernanceError> {
        self.unlock(caller, ActionId::ChangeEngineOwner, now)?;
        self.engine.transfer_ownership(&self.address, new_owner)?;
        info!(%new_owner, "engine ownership transferred away from controller");
        Ok(())
    }

    // ── Guards ────────────────────────────────────────────────────────────

    fn only_owner(&self, caller: &Address) -> Result<(), GovernanceError> {
        if *caller != self.owner {
            debug!(%caller, "rejected: caller is not the owner");
            return Err(GovernanceError::NotOwner { caller: *caller });
        }
        Ok(())
    }

    /// Owner check, then consume the timelock slot for `action`.
    fn unlock(
        &mut self,
        caller: &Address,
        action: ActionId,
        now: Timestamp,
    ) -> Result<(), GovernanceError> {
        self.only_owner(caller)?;
        self.timelock.consume(action, now).inspect_err(|err| {
            debug!(%action, %now, %err, "rejected by timelock");
        })?;
        debug!(%action, %now, "timelock consumed");
        Ok(())
    }
}

fn percent_action(role: FeeRole) -> ActionId {
    match role {
        FeeRole::Team => ActionId::SetTeamPercent,
        FeeRole::Treasury => ActionId::SetTreasuryPercent,
        FeeRole::Investor => ActionId::SetInvestorPercent,
    }
}

fn address_action(role: FeeRole) -> ActionId {
    match role {
        FeeRole::Team => ActionId::SetTeamAddress,
        FeeRole::Treasury => ActionId::SetTreasuryAddress,
        FeeRole::Investor => ActionId::SetInvestorAddress,
    }
}

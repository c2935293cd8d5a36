//! Shared fixture: a controller owning an in-memory distributor.

#![allow(dead_code)]

use alb_governance::{
    ActionId, ControllerConfig, DistributorController, NewPool, PoolId, DEFAULT_DELAY_SECS,
};
use alb_nullables::{NullClock, NullDistributor};
use alb_types::{Address, Timestamp};

pub struct Fixture {
    pub controller: DistributorController<NullDistributor>,
    pub clock: NullClock,
    /// Controller owner (the administrator).
    pub owner: Address,
    /// Anyone else.
    pub rando: Address,
    /// The controller's own address, owner of the engine.
    pub controller_address: Address,
}

pub fn lp_token() -> Address {
    Address::from_low_u64(0x1b)
}

pub fn fixture() -> Fixture {
    fixture_with(&ControllerConfig::default())
}

pub fn fixture_with(config: &ControllerConfig) -> Fixture {
    let owner = Address::from_low_u64(1);
    let rando = Address::from_low_u64(2);
    let controller_address = Address::from_low_u64(0xC0);
    let engine = NullDistributor::new(controller_address);
    Fixture {
        controller: DistributorController::new(controller_address, owner, engine, config),
        clock: NullClock::default(),
        owner,
        rando,
        controller_address,
    }
}

impl Fixture {
    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }

    pub fn add(&mut self, alloc_point: u64) -> PoolId {
        let owner = self.owner;
        self.controller
            .add_pool(&owner, new_pool(alloc_point))
            .expect("add_pool should succeed")
    }

    pub fn prepare(&mut self, action: ActionId) -> Timestamp {
        let (owner, now) = (self.owner, self.now());
        self.controller
            .prepare(&owner, action, now)
            .expect("owner can always prepare")
    }

    /// Prepare `action` and advance past the default delay.
    pub fn prepare_and_wait(&mut self, action: ActionId) {
        self.prepare(action);
        self.clock.advance(DEFAULT_DELAY_SECS);
    }
}

pub fn new_pool(alloc_point: u64) -> NewPool {
    NewPool {
        alloc_point,
        lp_token: lp_token(),
        deposit_fee_bps: 0,
        harvest_interval_secs: 30,
        rewarders: Vec::new(),
    }
}

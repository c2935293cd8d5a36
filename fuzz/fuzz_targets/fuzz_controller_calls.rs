#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use alb_governance::{
    ActionId, ControllerConfig, DistributorController, ManagedEngine, NewPool, PoolUpdate,
};
use alb_nullables::{NullClock, NullDistributor};
use alb_types::Address;

#[derive(Arbitrary, Debug)]
enum Op {
    Advance(u32),
    Prepare { action: u8, stranger: bool },
    AddPool { alloc_point: u16 },
    SetPool { pid: u8, alloc_point: u16, fee: u16 },
    UpdateAlloc { pid: u8, alloc_point: u16 },
    Emission { rate: u128 },
    TeamPercent { percent: u16 },
    ChangeDelay { secs: u32 },
}

// Arbitrary call sequences must never panic. The engine's allocation total
// must stay within the bound and equal the sum of pool weights, and an
// executed timelocked call must leave its slot empty.
fuzz_target!(|ops: Vec<Op>| {
    let me = Address::from_low_u64(0xC0);
    let owner = Address::from_low_u64(1);
    let stranger = Address::from_low_u64(2);
    let config = ControllerConfig {
        delay_secs: 3600,
        ..ControllerConfig::default()
    };
    let mut controller = DistributorController::new(me, owner, NullDistributor::new(me), &config);
    let clock = NullClock::new(0);

    for op in ops {
        let now = clock.now();
        match op {
            Op::Advance(secs) => clock.advance(u64::from(secs)),
            Op::Prepare { action, stranger: s } => {
                let caller = if s { stranger } else { owner };
                if let Ok(action) = ActionId::try_from(action % ActionId::COUNT as u8) {
                    let prepared = controller.prepare(&caller, action, now);
                    assert_eq!(prepared.is_ok(), !s);
                }
            }
            Op::AddPool { alloc_point } => {
                let _ = controller.add_pool(
                    &owner,
                    NewPool {
                        alloc_point: u64::from(alloc_point),
                        lp_token: Address::from_low_u64(0x1b),
                        deposit_fee_bps: 0,
                        harvest_interval_secs: 0,
                        rewarders: Vec::new(),
                    },
                );
            }
            Op::SetPool { pid, alloc_point, fee } => {
                let update = PoolUpdate {
                    alloc_point: u64::from(alloc_point),
                    deposit_fee_bps: fee,
                    harvest_interval_secs: 0,
                    rewarders: Vec::new(),
                };
                if controller.set_pool(&owner, usize::from(pid), update, now).is_ok() {
                    assert!(controller.pending_unlock(ActionId::SetPool).is_none());
                }
            }
            Op::UpdateAlloc { pid, alloc_point } => {
                let _ = controller.update_alloc_point(&owner, usize::from(pid), u64::from(alloc_point));
            }
            Op::Emission { rate } => {
                if controller.update_emission_rate(&owner, rate, now).is_ok() {
                    assert!(controller.pending_unlock(ActionId::UpdateEmissionRate).is_none());
                    assert_eq!(controller.engine().emission_rate(), rate);
                }
            }
            Op::TeamPercent { percent } => {
                let _ = controller.set_team_percent(&owner, percent, now);
            }
            Op::ChangeDelay { secs } => {
                if controller.change_delay(&owner, u64::from(secs), now).is_ok() {
                    assert_eq!(controller.delay(), u64::from(secs));
                }
            }
        }

        let engine = controller.engine();
        let sum: u64 = (0..engine.pool_length())
            .filter_map(|pid| engine.pool_info(pid))
            .map(|pool| pool.alloc_point)
            .sum();
        assert_eq!(sum, engine.total_alloc_point());
        assert!(engine.total_alloc_point() <= controller.bounds().max_total_alloc_point);
    }
});

//! Scenario scripts: a setup block plus a list of timed calls, replayed
//! against an in-memory distributor.

use std::fmt;
use std::path::Path;

use alb_governance::{
    ActionId, ControllerConfig, DistributorController, FeeRole, GovernanceError, ManagedEngine,
    NewPool, PoolId, PoolInfo, PoolUpdate,
};
use alb_nullables::{DistributorParams, NullClock, NullDistributor};
use alb_types::{amount::raw_text, Address};
use anyhow::Context;
use serde::{Deserialize, Deserializer, Serialize};

const DAY_SECS: u64 = 24 * 3600;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Script {
    pub setup: Setup,
    /// Overrides the `--config` file when present.
    pub config: Option<ControllerConfig>,
    #[serde(default, rename = "step")]
    pub steps: Vec<Step>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Setup {
    pub owner: Address,
    #[serde(default = "default_controller")]
    pub controller: Address,
    /// Engine owner at start; defaults to the controller.
    pub engine_owner: Option<Address>,
    #[serde(default = "default_start_secs")]
    pub start_secs: u64,
    #[serde(default)]
    pub engine: DistributorParams,
}

fn default_controller() -> Address {
    Address::from_low_u64(0xC0)
}

fn default_start_secs() -> u64 {
    1_700_000_000
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Step {
    #[serde(default)]
    pub advance_secs: u64,
    #[serde(default)]
    pub advance_days: u64,
    /// Defaults to the setup owner.
    pub caller: Option<Address>,
    pub call: Call,
    /// `"ok"` or an error code such as `"not-prepared"`.
    pub expect: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Call {
    Prepare {
        #[serde(deserialize_with = "action_from_str")]
        action: ActionId,
    },
    AddPool(NewPool),
    SetPool {
        pid: PoolId,
        alloc_point: u64,
        #[serde(default)]
        deposit_fee_bps: u16,
        #[serde(default)]
        harvest_interval_secs: u64,
        #[serde(default)]
        rewarders: Vec<Address>,
    },
    UpdateAllocPoint {
        pid: PoolId,
        alloc_point: u64,
    },
    UpdateEmissionRate {
        #[serde(with = "raw_text")]
        rate: u128,
    },
    SetFeePercent {
        role: FeeRole,
        percent: u16,
    },
    SetFeeAddress {
        role: FeeRole,
        address: Address,
    },
    TransferOwnership {
        new_owner: Address,
    },
    TransferEngineOwnership {
        new_owner: Address,
    },
    ChangeDelay {
        delay_secs: u64,
    },
}

fn action_from_str<'de, D: Deserializer<'de>>(deserializer: D) -> Result<ActionId, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Ordinal(u8),
        Name(String),
    }
    match Raw::deserialize(deserializer)? {
        Raw::Ordinal(n) => ActionId::try_from(n).map_err(serde::de::Error::custom),
        Raw::Name(s) => s.parse().map_err(serde::de::Error::custom),
    }
}

impl fmt::Display for Call {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Call::Prepare { action } => write!(f, "prepare({action})"),
            Call::AddPool(pool) => write!(f, "add_pool(alloc={})", pool.alloc_point),
            Call::SetPool {
                pid,
                alloc_point,
                deposit_fee_bps,
                ..
            } => write!(f, "set_pool({pid}, alloc={alloc_point}, fee={deposit_fee_bps}bps)"),
            Call::UpdateAllocPoint { pid, alloc_point } => {
                write!(f, "update_alloc_point({pid}, {alloc_point})")
            }
            Call::UpdateEmissionRate { rate } => write!(f, "update_emission_rate({rate})"),
            Call::SetFeePercent { role, percent } => {
                write!(f, "set_{}_percent({percent})", role.name())
            }
            Call::SetFeeAddress { role, address } => {
                write!(f, "set_{}_address({address})", role.name())
            }
            Call::TransferOwnership { new_owner } => write!(f, "transfer_ownership({new_owner})"),
            Call::TransferEngineOwnership { new_owner } => {
                write!(f, "transfer_engine_ownership({new_owner})")
            }
            Call::ChangeDelay { delay_secs } => write!(f, "change_delay({delay_secs})"),
        }
    }
}

/// Outcome of one replayed step.
#[derive(Debug, Serialize)]
pub struct StepReport {
    pub index: usize,
    pub at_secs: u64,
    pub caller: Address,
    pub call: String,
    /// `"ok"` or the error code.
    pub outcome: String,
    pub detail: Option<String>,
    pub expected: Option<String>,
    pub matched: bool,
}

impl fmt::Display for StepReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mark = if self.matched { "ok " } else { "BAD" };
        write!(
            f,
            "[{mark}] #{:<3} t={} caller={} {} -> {}",
            self.index, self.at_secs, self.caller, self.call, self.outcome
        )?;
        if let Some(detail) = &self.detail {
            write!(f, " ({detail})")?;
        }
        if let Some(expected) = self.expected.as_ref().filter(|_| !self.matched) {
            write!(f, " expected {expected}")?;
        }
        Ok(())
    }
}

/// Engine and controller state after the last step.
#[derive(Debug, Serialize)]
pub struct FinalState {
    pub controller_owner: Address,
    pub engine_owner: Address,
    pub delay_secs: u64,
    #[serde(with = "raw_text")]
    pub emission_rate: u128,
    pub total_alloc_point: u64,
    pub pools: Vec<PoolInfo>,
    pub pending: Vec<(ActionId, u64)>,
}

pub struct Replay {
    pub steps: Vec<StepReport>,
    pub final_state: FinalState,
}

impl Replay {
    pub fn mismatches(&self) -> usize {
        self.steps.iter().filter(|s| !s.matched).count()
    }
}

impl Script {
    pub fn from_toml_str(s: &str) -> anyhow::Result<Self> {
        let script: Script = toml::from_str(s).context("invalid scenario script")?;
        for (i, step) in script.steps.iter().enumerate() {
            if let Some(expect) = &step.expect {
                anyhow::ensure!(
                    is_known_outcome(expect),
                    "step {i}: unknown expected outcome {expect:?}"
                );
            }
        }
        Ok(script)
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading scenario {}", path.display()))?;
        Self::from_toml_str(&content)
    }

    /// Replay every step. Failures are recorded, never fatal.
    pub fn replay(&self, fallback: &ControllerConfig) -> Replay {
        let config = self.config.as_ref().unwrap_or(fallback);
        let setup = &self.setup;
        let engine = NullDistributor::with_params(
            setup.engine_owner.unwrap_or(setup.controller),
            setup.engine.clone(),
        );
        let mut controller = DistributorController::new(setup.controller, setup.owner, engine, config);
        let clock = NullClock::new(setup.start_secs);

        let mut reports = Vec::with_capacity(self.steps.len());
        for (index, step) in self.steps.iter().enumerate() {
            clock.advance(step.advance_secs);
            clock.advance(step.advance_days.saturating_mul(DAY_SECS));
            let caller = step.caller.unwrap_or(setup.owner);
            let result = execute(&mut controller, &caller, &step.call, clock.now());
            let (outcome, detail) = match &result {
                Ok(Some(detail)) => ("ok".to_string(), Some(detail.clone())),
                Ok(None) => ("ok".to_string(), None),
                Err(err) => (err.code().to_string(), Some(err.to_string())),
            };
            let matched = step.expect.as_ref().map_or(true, |e| *e == outcome);
            if !matched {
                tracing::warn!(index, %outcome, expected = ?step.expect, "step outcome mismatch");
            }
            reports.push(StepReport {
                index,
                at_secs: clock.now().as_secs(),
                caller,
                call: step.call.to_string(),
                outcome,
                detail,
                expected: step.expect.clone(),
                matched,
            });
        }

        let engine = controller.engine();
        let final_state = FinalState {
            controller_owner: controller.owner(),
            engine_owner: engine.owner(),
            delay_secs: controller.delay(),
            emission_rate: engine.emission_rate(),
            total_alloc_point: engine.total_alloc_point(),
            pools: (0..engine.pool_length())
                .filter_map(|pid| engine.pool_info(pid))
                .collect(),
            pending: ActionId::ALL
                .iter()
                .filter_map(|&a| controller.pending_unlock(a).map(|t| (a, t.as_secs())))
                .collect(),
        };
        Replay {
            steps: reports,
            final_state,
        }
    }
}

fn execute(
    controller: &mut DistributorController<NullDistributor>,
    caller: &Address,
    call: &Call,
    now: alb_types::Timestamp,
) -> Result<Option<String>, GovernanceError> {
    match call.clone() {
        Call::Prepare { action } => controller
            .prepare(caller, action, now)
            .map(|unlock_at| Some(format!("unlocks at {}", unlock_at.as_secs()))),
        Call::AddPool(pool) => controller
            .add_pool(caller, pool)
            .map(|pid| Some(format!("pool {pid}"))),
        Call::SetPool {
            pid,
            alloc_point,
            deposit_fee_bps,
            harvest_interval_secs,
            rewarders,
        } => controller
            .set_pool(
                caller,
                pid,
                PoolUpdate {
                    alloc_point,
                    deposit_fee_bps,
                    harvest_interval_secs,
                    rewarders,
                },
                now,
            )
            .map(|_| None),
        Call::UpdateAllocPoint { pid, alloc_point } => controller
            .update_alloc_point(caller, pid, alloc_point)
            .map(|_| None),
        Call::UpdateEmissionRate { rate } => controller
            .update_emission_rate(caller, rate, now)
            .map(|_| None),
        Call::SetFeePercent { role, percent } => match role {
            FeeRole::Team => controller.set_team_percent(caller, percent, now),
            FeeRole::Treasury => controller.set_treasury_percent(caller, percent, now),
            FeeRole::Investor => controller.set_investor_percent(caller, percent, now),
        }
        .map(|_| None),
        Call::SetFeeAddress { role, address } => match role {
            FeeRole::Team => controller.set_team_address(caller, address, now),
            FeeRole::Treasury => controller.set_treasury_address(caller, address, now),
            FeeRole::Investor => controller.set_investor_address(caller, address, now),
        }
        .map(|_| None),
        Call::TransferOwnership { new_owner } => controller
            .transfer_ownership(caller, new_owner, now)
            .map(|_| None),
        Call::TransferEngineOwnership { new_owner } => controller
            .transfer_engine_ownership(caller, new_owner, now)
            .map(|_| None),
        Call::ChangeDelay { delay_secs } => controller
            .change_delay(caller, delay_secs, now)
            .map(|_| None),
    }
}

const OUTCOMES: [&str; 10] = [
    "ok",
    "not-authorized",
    "not-prepared",
    "still-locked",
    "max-allocation-exceeded",
    "max-deposit-exceeded",
    "max-emission-exceeded",
    "max-percentage-exceeded",
    "invalid-owner",
    "engine-rejected",
];

fn is_known_outcome(s: &str) -> bool {
    OUTCOMES.contains(&s)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EMISSION: &str = include_str!("../../demos/emission_rate.toml");
    const POOLS: &str = include_str!("../../demos/pool_bounds.toml");
    const OWNERSHIP: &str = include_str!("../../demos/ownership.toml");

    #[test]
    fn demo_scripts_match_their_expectations() {
        for (name, text) in [("emission", EMISSION), ("pools", POOLS), ("ownership", OWNERSHIP)] {
            let script = Script::from_toml_str(text).unwrap_or_else(|e| panic!("{name}: {e:#}"));
            let replay = script.replay(&ControllerConfig::default());
            for step in &replay.steps {
                assert!(step.matched, "{name}: {step}");
            }
            assert_eq!(replay.mismatches(), 0);
        }
    }

    #[test]
    fn emission_demo_final_state() {
        let replay = Script::from_toml_str(EMISSION)
            .unwrap()
            .replay(&ControllerConfig::default());
        assert_eq!(replay.final_state.emission_rate, alb_types::tokens(25));
        assert!(replay.final_state.pending.is_empty());
    }

    #[test]
    fn mismatch_is_reported_not_fatal() {
        let text = r#"
            [setup]
            owner = "0x0000000000000000000000000000000000000001"

            [[step]]
            call = { op = "update_emission_rate", rate = "25e18" }
            expect = "ok"

            [[step]]
            call = { op = "prepare", action = 0 }
            expect = "ok"
        "#;
        let replay = Script::from_toml_str(text)
            .unwrap()
            .replay(&ControllerConfig::default());
        assert_eq!(replay.mismatches(), 1);
        assert_eq!(replay.steps[0].outcome, "not-prepared");
        assert!(replay.steps[1].matched);
        assert_eq!(replay.final_state.pending.len(), 1);
    }

    #[test]
    fn unknown_expectation_is_rejected_at_load() {
        let text = r#"
            [setup]
            owner = "0x0000000000000000000000000000000000000001"

            [[step]]
            call = { op = "change_delay", delay_secs = 5 }
            expect = "explodes"
        "#;
        assert!(Script::from_toml_str(text).is_err());
    }

    #[test]
    fn script_config_overrides_fallback() {
        let text = r#"
            [setup]
            owner = "0x0000000000000000000000000000000000000001"

            [config]
            delay_secs = 0

            [[step]]
            call = { op = "prepare", action = "change-delay" }

            [[step]]
            call = { op = "change_delay", delay_secs = 42 }
            expect = "ok"
        "#;
        let replay = Script::from_toml_str(text)
            .unwrap()
            .replay(&ControllerConfig::default());
        assert_eq!(replay.mismatches(), 0);
        assert_eq!(replay.final_state.delay_secs, 42);
    }

    #[test]
    fn reports_serialize_as_json() {
        let replay = Script::from_toml_str(EMISSION)
            .unwrap()
            .replay(&ControllerConfig::default());
        let line = serde_json::to_string(&replay.steps[0]).unwrap();
        assert!(line.contains("\"outcome\":"));
        let state = serde_json::to_value(&replay.final_state).unwrap();
        assert_eq!(state["emission_rate"], "25000000000000000000");
    }
}

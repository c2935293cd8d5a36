//! The closed set of privileged actions, each protected by its own timelock.
//!
//! Ordinals are stable: they are what operators pass to `prepare` and what
//! snapshots store.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A privileged operation the controller can execute once its timelock is ready.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum ActionId {
    UpdateEmissionRate = 0,
    SetTeamAddress = 1,
    SetTeamPercent = 2,
    SetTreasuryAddress = 3,
    SetTreasuryPercent = 4,
    SetInvestorAddress = 5,
    SetInvestorPercent = 6,
    /// Transfer ownership of the controller itself.
    ChangeSelfOwner = 7,
    /// Transfer ownership of the managed engine away from the controller.
    ChangeEngineOwner = 8,
    ChangeDelay = 9,
    /// Shared by every `set_pool` call: the lock is per action kind, not per pool.
    SetPool = 10,
}

impl ActionId {
    pub const COUNT: usize = 11;

    /// Every action, in ordinal order.
    pub const ALL: [ActionId; Self::COUNT] = [
        Self::UpdateEmissionRate,
        Self::SetTeamAddress,
        Self::SetTeamPercent,
        Self::SetTreasuryAddress,
        Self::SetTreasuryPercent,
        Self::SetInvestorAddress,
        Self::SetInvestorPercent,
        Self::ChangeSelfOwner,
        Self::ChangeEngineOwner,
        Self::ChangeDelay,
        Self::SetPool,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Kebab-case name used in logs and on the command line.
    pub fn name(self) -> &'static str {
        match self {
            Self::UpdateEmissionRate => "update-emission-rate",
            Self::SetTeamAddress => "set-team-address",
            Self::SetTeamPercent => "set-team-percent",
            Self::SetTreasuryAddress => "set-treasury-address",
            Self::SetTreasuryPercent => "set-treasury-percent",
            Self::SetInvestorAddress => "set-investor-address",
            Self::SetInvestorPercent => "set-investor-percent",
            Self::ChangeSelfOwner => "change-self-owner",
            Self::ChangeEngineOwner => "change-engine-owner",
            Self::ChangeDelay => "change-delay",
            Self::SetPool => "set-pool",
        }
    }
}

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Ordinal outside `0..ActionId::COUNT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("unknown action ordinal {0}")]
pub struct UnknownAction(pub u8);

impl TryFrom<u8> for ActionId {
    type Error = UnknownAction;

    fn try_from(ordinal: u8) -> Result<Self, Self::Error> {
        Self::ALL
            .get(ordinal as usize)
            .copied()
            .ok_or(UnknownAction(ordinal))
    }
}

impl FromStr for ActionId {
    type Err = String;

    /// Accepts the kebab-case name, its snake_case spelling, or the ordinal.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(ordinal) = s.parse::<u8>() {
            return ActionId::try_from(ordinal).map_err(|e| e.to_string());
        }
        let wanted = s.replace('_', "-");
        Self::ALL
            .iter()
            .copied()
            .find(|a| a.name() == wanted)
            .ok_or_else(|| format!("unknown action {s:?}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordinals_match_positions() {
        for (i, action) in ActionId::ALL.iter().enumerate() {
            assert_eq!(action.index(), i);
            assert_eq!(ActionId::try_from(i as u8), Ok(*action));
        }
        assert_eq!(ActionId::UpdateEmissionRate.index(), 0);
        assert_eq!(ActionId::ChangeEngineOwner.index(), 8);
        assert_eq!(ActionId::SetPool.index(), 10);
    }

    #[test]
    fn unknown_ordinal_rejected() {
        assert_eq!(ActionId::try_from(11), Err(UnknownAction(11)));
        assert_eq!(ActionId::try_from(255), Err(UnknownAction(255)));
    }

    #[test]
    fn parse_by_name_or_ordinal() {
        assert_eq!("change-delay".parse::<ActionId>(), Ok(ActionId::ChangeDelay));
        assert_eq!("set_pool".parse::<ActionId>(), Ok(ActionId::SetPool));
        assert_eq!("0".parse::<ActionId>(), Ok(ActionId::UpdateEmissionRate));
        assert!("mint".parse::<ActionId>().is_err());
        assert!("42".parse::<ActionId>().is_err());
    }

    #[test]
    fn names_are_unique() {
        let mut names: Vec<_> = ActionId::ALL.iter().map(|a| a.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), ActionId::COUNT);
    }
}

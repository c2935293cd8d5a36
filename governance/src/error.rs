use crate::action::ActionId;
use crate::engine::EngineError;
use alb_types::{Address, Timestamp};
use thiserror::Error;

/// Everything the controller can reject a call with.
///
/// Nothing is retried or recovered locally: each variant reaches the caller
/// as-is.
#[derive(Debug, Error)]
pub enum GovernanceError {
    #[error("caller {caller} is not the controller owner")]
    NotOwner { caller: Address },

    #[error("action {0} has not been prepared")]
    NotPrepared(ActionId),

    #[error("action {action} is locked until {unlock_at} (now {now})")]
    StillLocked {
        action: ActionId,
        unlock_at: Timestamp,
        now: Timestamp,
    },

    #[error("total allocation {total} would exceed maximum {max}")]
    MaxAllocationExceeded { total: u64, max: u64 },

    #[error("deposit fee {fee_bps} bps exceeds maximum {max} bps")]
    MaxDepositExceeded { fee_bps: u16, max: u16 },

    #[error("emission rate {rate} exceeds maximum {max}")]
    MaxEmissionExceeded { rate: u128, max: u128 },

    #[error("fee percent {percent} exceeds maximum {max}")]
    MaxPercentExceeded { percent: u16, max: u16 },

    #[error("new controller owner must not be the zero address")]
    InvalidOwner,

    #[error("engine rejected call: {0}")]
    Engine(#[from] EngineError),

    #[error("config error: {0}")]
    Config(String),

    #[error("snapshot error: {0}")]
    Snapshot(String),
}

/// Coarse classification of a [`GovernanceError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Caller is not the controller owner.
    NotAuthorized,
    /// Timelock missing or not yet elapsed.
    Timelock,
    /// A value exceeded a safety ceiling.
    BoundViolation,
    /// The managed engine refused the forwarded call.
    Delegated,
    /// Configuration or persistence problem on the controller side.
    Local,
}

impl GovernanceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotOwner { .. } => ErrorKind::NotAuthorized,
            Self::NotPrepared(_) | Self::StillLocked { .. } => ErrorKind::Timelock,
            Self::MaxAllocationExceeded { .. }
            | Self::MaxDepositExceeded { .. }
            | Self::MaxEmissionExceeded { .. }
            | Self::MaxPercentExceeded { .. }
            | Self::InvalidOwner => ErrorKind::BoundViolation,
            Self::Engine(_) => ErrorKind::Delegated,
            Self::Config(_) | Self::Snapshot(_) => ErrorKind::Local,
        }
    }

    /// Stable kebab-case code, used by tooling to match expected outcomes.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotOwner { .. } => "not-authorized",
            Self::NotPrepared(_) => "not-prepared",
            Self::StillLocked { .. } => "still-locked",
            Self::MaxAllocationExceeded { .. } => "max-allocation-exceeded",
            Self::MaxDepositExceeded { .. } => "max-deposit-exceeded",
            Self::MaxEmissionExceeded { .. } => "max-emission-exceeded",
            Self::MaxPercentExceeded { .. } => "max-percentage-exceeded",
            Self::InvalidOwner => "invalid-owner",
            Self::Engine(_) => "engine-rejected",
            Self::Config(_) => "config",
            Self::Snapshot(_) => "snapshot",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_follow_taxonomy() {
        let caller = Address::from_low_u64(9);
        assert_eq!(GovernanceError::NotOwner { caller }.kind(), ErrorKind::NotAuthorized);
        assert_eq!(
            GovernanceError::NotPrepared(ActionId::SetPool).kind(),
            ErrorKind::Timelock
        );
        assert_eq!(
            GovernanceError::MaxEmissionExceeded { rate: 2, max: 1 }.kind(),
            ErrorKind::BoundViolation
        );
        assert_eq!(
            GovernanceError::from(EngineError::NotOwner { caller }).kind(),
            ErrorKind::Delegated
        );
    }

    #[test]
    fn engine_error_message_is_preserved() {
        let caller = Address::from_low_u64(3);
        let err = GovernanceError::from(EngineError::NotOwner { caller });
        assert!(err.to_string().contains(&caller.to_string()));
        assert_eq!(err.code(), "engine-rejected");
    }
}

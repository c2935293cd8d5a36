//! Hard safety ceilings on engine parameters.
//!
//! Bounds are enforced on every forwarded call regardless of timelock state.
//! They are fixed when the controller is built.

use crate::error::GovernanceError;
use alb_types::{amount::raw_text, tokens};
use serde::{Deserialize, Serialize};

/// Parameter ceilings enforced by the controller before forwarding.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounds {
    /// Ceiling on the total allocation weight across all pools after a change.
    #[serde(default = "default_max_total_alloc_point")]
    pub max_total_alloc_point: u64,

    /// Ceiling on a pool's deposit fee, in basis points.
    #[serde(default = "default_max_deposit_fee_bps")]
    pub max_deposit_fee_bps: u16,

    /// Ceiling on the emission rate, raw token units per second.
    #[serde(default = "default_max_emission_rate", with = "raw_text")]
    pub max_emission_rate: u128,

    /// Ceiling on each fee split, parts per thousand.
    #[serde(default = "default_max_fee_percent")]
    pub max_fee_percent: u16,
}

fn default_max_total_alloc_point() -> u64 {
    2500
}

fn default_max_deposit_fee_bps() -> u16 {
    5
}

fn default_max_emission_rate() -> u128 {
    tokens(100)
}

fn default_max_fee_percent() -> u16 {
    200
}

impl Bounds {
    pub fn check_deposit_fee(&self, fee_bps: u16) -> Result<(), GovernanceError> {
        if fee_bps > self.max_deposit_fee_bps {
            return Err(GovernanceError::MaxDepositExceeded {
                fee_bps,
                max: self.max_deposit_fee_bps,
            });
        }
        Ok(())
    }

    /// Check the allocation total that a change would leave behind.
    ///
    /// `current_total` includes `replaced` (the weight being overwritten, zero
    /// for a new pool); the result is `current_total - replaced + new_weight`.
    pub fn check_total_alloc(
        &self,
        current_total: u64,
        replaced: u64,
        new_weight: u64,
    ) -> Result<u64, GovernanceError> {
        let resulting = current_total
            .saturating_sub(replaced)
            .checked_add(new_weight)
            .ok_or(GovernanceError::MaxAllocationExceeded {
                total: u64::MAX,
                max: self.max_total_alloc_point,
            })?;
        if resulting > self.max_total_alloc_point {
            return Err(GovernanceError::MaxAllocationExceeded {
                total: resulting,
                max: self.max_total_alloc_point,
            });
        }
        Ok(resulting)
    }

    pub fn check_emission_rate(&self, rate: u128) -> Result<(), GovernanceError> {
        if rate > self.max_emission_rate {
            return Err(GovernanceError::MaxEmissionExceeded {
                rate,
                max: self.max_emission_rate,
            });
        }
        Ok(())
    }

    pub fn check_fee_percent(&self, percent: u16) -> Result<(), GovernanceError> {
        if percent > self.max_fee_percent {
            return Err(GovernanceError::MaxPercentExceeded {
                percent,
                max: self.max_fee_percent,
            });
        }
        Ok(())
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self {
            max_total_alloc_point: default_max_total_alloc_point(),
            max_deposit_fee_bps: default_max_deposit_fee_bps(),
            max_emission_rate: default_max_emission_rate(),
            max_fee_percent: default_max_fee_percent(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deposit_fee_ceiling_is_inclusive() {
        let bounds = Bounds::default();
        assert!(bounds.check_deposit_fee(0).is_ok());
        assert!(bounds.check_deposit_fee(5).is_ok());
        assert!(matches!(
            bounds.check_deposit_fee(10),
            Err(GovernanceError::MaxDepositExceeded { fee_bps: 10, max: 5 })
        ));
    }

    #[test]
    fn total_alloc_accounts_for_replaced_weight() {
        let bounds = Bounds::default();
        // 799 + 700 = 1499; replacing 799 by 1000 leaves 1700.
        assert_eq!(bounds.check_total_alloc(1499, 799, 1000).unwrap(), 1700);
        // Replacing 799 by 3000 leaves 3700.
        assert!(matches!(
            bounds.check_total_alloc(1499, 799, 3000),
            Err(GovernanceError::MaxAllocationExceeded { total: 3700, max: 2500 })
        ));
        // Adding a new pool of exactly the headroom is fine.
        assert_eq!(bounds.check_total_alloc(1499, 0, 1001).unwrap(), 2500);
    }

    #[test]
    fn total_alloc_overflow_is_a_bound_violation() {
        let bounds = Bounds::default();
        assert!(matches!(
            bounds.check_total_alloc(u64::MAX, 0, 1),
            Err(GovernanceError::MaxAllocationExceeded { .. })
        ));
    }

    #[test]
    fn emission_ceiling() {
        let bounds = Bounds::default();
        assert!(bounds.check_emission_rate(tokens(25)).is_ok());
        assert!(bounds.check_emission_rate(tokens(100)).is_ok());
        assert!(bounds.check_emission_rate(tokens(1000)).is_err());
        assert!(bounds.check_emission_rate(u128::MAX).is_err());
    }

    #[test]
    fn fee_percent_ceiling() {
        let bounds = Bounds::default();
        assert!(bounds.check_fee_percent(50).is_ok());
        assert!(matches!(
            bounds.check_fee_percent(500),
            Err(GovernanceError::MaxPercentExceeded { percent: 500, max: 200 })
        ));
    }
}

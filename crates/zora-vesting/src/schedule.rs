//! Release schedule of a single beneficiary.

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};
use zora_types::DAY;

use crate::error::VestingError;

/// Vesting schedule. Periods are whole days, `start_time` a timestamp.
#[derive(
    Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize,
)]
pub struct VestingInfo {
    pub vested_tokens: u128,
    pub cliff_period: u64,
    pub vesting_period: u64,
    /// `vested_tokens / vesting_period`, rounded down
    pub withdrawal_per_day: u128,
    pub start_time: u64,
    pub tokens_already_withdrawn: u128,
}

impl VestingInfo {
    pub fn new(
        amount: u128,
        cliff_period: u64,
        vesting_period: u64,
        start_time: u64,
    ) -> Result<Self, VestingError> {
        if amount == 0 {
            return Err(VestingError::ZeroAmount);
        }
        if vesting_period == 0 {
            return Err(VestingError::InvalidVestingPeriod);
        }

        Ok(Self {
            vested_tokens: amount,
            cliff_period,
            vesting_period,
            withdrawal_per_day: amount / u128::from(vesting_period),
            start_time,
            tokens_already_withdrawn: 0,
        })
    }

    /// An empty record means no schedule.
    pub fn exists(&self) -> bool {
        self.vested_tokens > 0
    }

    /// Whole days since the deposit.
    pub fn elapsed_days(&self, now: u64) -> u64 {
        now.saturating_sub(self.start_time) / DAY
    }

    pub fn cliff_passed(&self, now: u64) -> bool {
        self.elapsed_days(now) >= self.cliff_period
    }

    /// Total released by `now`, withdrawn or not.
    ///
    /// Grows by `withdrawal_per_day` per elapsed day and jumps to the full
    /// amount on the last day, which releases the rounding dust.
    pub fn entitled(&self, now: u64) -> u128 {
        if !self.cliff_passed(now) {
            return 0;
        }
        let days = self.elapsed_days(now);
        if days >= self.vesting_period {
            return self.vested_tokens;
        }
        self.withdrawal_per_day
            .saturating_mul(u128::from(days))
            .min(self.vested_tokens)
    }

    /// Released but not yet withdrawn.
    pub fn available(&self, now: u64) -> u128 {
        self.entitled(now)
            .saturating_sub(self.tokens_already_withdrawn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const START: u64 = 1_600_000_000;

    fn at_day(days: u64) -> u64 {
        START + days * DAY
    }

    #[test]
    fn test_withdrawal_per_day_rounds_down() {
        let info = VestingInfo::new(50, 5, 25, START).unwrap();
        assert_eq!(info.withdrawal_per_day, 2);

        let info = VestingInfo::new(100, 0, 3, START).unwrap();
        assert_eq!(info.withdrawal_per_day, 33);
    }

    #[test]
    fn test_rejects_empty_schedule() {
        assert_eq!(
            VestingInfo::new(0, 1, 10, START),
            Err(VestingError::ZeroAmount)
        );
        assert_eq!(
            VestingInfo::new(10, 1, 0, START),
            Err(VestingError::InvalidVestingPeriod)
        );
    }

    #[test]
    fn test_cliff_gates_release() {
        let info = VestingInfo::new(180, 60, 180, START).unwrap();
        assert_eq!(info.available(at_day(59)), 0);
        assert_eq!(info.available(at_day(60) - 1), 0);
        assert_eq!(info.available(at_day(60)), 60);
        assert_eq!(info.available(at_day(99)), 99);
    }

    #[test]
    fn test_partial_days_do_not_count() {
        let info = VestingInfo::new(180, 0, 180, START).unwrap();
        assert_eq!(info.elapsed_days(at_day(3) + DAY - 1), 3);
        assert_eq!(info.available(at_day(3) + DAY - 1), 3);
    }

    #[test]
    fn test_dust_released_at_maturity() {
        let info = VestingInfo::new(100, 0, 3, START).unwrap();
        assert_eq!(info.available(at_day(2)), 66);
        assert_eq!(info.available(at_day(3)), 100);
        assert_eq!(info.available(at_day(400)), 100);
    }

    #[test]
    fn test_withdrawn_tokens_are_subtracted() {
        let mut info = VestingInfo::new(180, 60, 180, START).unwrap();
        info.tokens_already_withdrawn = 60;
        assert_eq!(info.available(at_day(60)), 0);
        assert_eq!(info.available(at_day(61)), 1);
    }

    #[test]
    fn test_clock_before_start_is_day_zero() {
        let info = VestingInfo::new(10, 0, 10, START).unwrap();
        assert_eq!(info.elapsed_days(START - 5), 0);
        assert_eq!(info.available(START - 5), 0);
    }

    #[test]
    fn test_info_json_field_names() {
        let info = VestingInfo::new(180, 60, 180, START).unwrap();
        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json["vested_tokens"], 180);
        assert_eq!(json["cliff_period"], 60);
        assert_eq!(json["withdrawal_per_day"], 1);
        assert_eq!(json["start_time"], START);
        assert_eq!(serde_json::from_value::<VestingInfo>(json).unwrap(), info);
    }

    proptest! {
        #[test]
        fn prop_entitlement_bounded_and_monotonic(
            amount in 1u128..1_000_000_000_000,
            cliff in 0u64..400,
            period in 1u64..400,
            day in 0u64..900,
        ) {
            let info = VestingInfo::new(amount, cliff, period, START).unwrap();
            let today = info.entitled(at_day(day));
            let tomorrow = info.entitled(at_day(day + 1));
            prop_assert!(today <= tomorrow);
            prop_assert!(tomorrow <= amount);
            if day < period {
                prop_assert!(today <= info.withdrawal_per_day * u128::from(day));
            } else if day >= cliff {
                prop_assert_eq!(today, amount);
            }
        }

        #[test]
        fn prop_nothing_before_cliff(
            amount in 1u128..1_000_000_000,
            cliff in 1u64..400,
            period in 1u64..400,
            seconds in 0u64..DAY,
        ) {
            let info = VestingInfo::new(amount, cliff, period, START).unwrap();
            let before_cliff = at_day(cliff - 1) + seconds;
            prop_assert_eq!(info.available(before_cliff), 0);
        }

        #[test]
        fn prop_repeated_withdrawals_conserve_tokens(
            amount in 1u128..1_000_000_000,
            cliff in 0u64..50,
            period in 1u64..100,
            steps in proptest::collection::vec(0u64..20, 1..20),
        ) {
            let mut info = VestingInfo::new(amount, cliff, period, START).unwrap();
            let mut day = 0;
            for step in steps {
                day += step;
                let now = at_day(day);
                let before = info.tokens_already_withdrawn;
                info.tokens_already_withdrawn += info.available(now);
                prop_assert!(info.tokens_already_withdrawn >= before);
                prop_assert!(info.tokens_already_withdrawn <= info.entitled(now));
                prop_assert!(info.tokens_already_withdrawn <= amount);
            }
            let matured = at_day(cliff.max(period));
            info.tokens_already_withdrawn += info.available(matured);
            prop_assert_eq!(info.tokens_already_withdrawn, amount);
        }
    }
}

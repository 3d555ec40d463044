//! Day-by-day release table of a vesting schedule.

use tabled::Tabled;
use zora_types::DAY;
use zora_vesting::VestingInfo;

/// Rows past maturity only repeat the final balance; this bounds the table.
pub const MAX_DAYS_PAST_MATURITY: u64 = 366;

#[derive(Debug, Clone, PartialEq, Eq, Tabled)]
pub struct ReleaseRow {
    pub day: u64,
    /// Released on this day
    pub unlocked: u128,
    /// Released since the deposit
    pub cumulative: u128,
    pub locked: u128,
}

/// Rows for every day from the deposit through `until` (default: the later
/// of cliff and vesting period).
pub fn release_schedule(
    amount: u128,
    cliff_days: u64,
    vesting_days: u64,
    until: Option<u64>,
) -> anyhow::Result<(VestingInfo, Vec<ReleaseRow>)> {
    let info = VestingInfo::new(amount, cliff_days, vesting_days, 0)?;
    let maturity = cliff_days.max(vesting_days);
    let last_day = until.unwrap_or(maturity);
    anyhow::ensure!(
        last_day <= maturity.saturating_add(MAX_DAYS_PAST_MATURITY),
        "--until {} is more than {} days past maturity (day {})",
        last_day,
        MAX_DAYS_PAST_MATURITY,
        maturity
    );

    let mut rows = Vec::new();
    let mut previous = 0;
    for day in 0..=last_day {
        let cumulative = info.entitled(day.saturating_mul(DAY));
        rows.push(ReleaseRow {
            day,
            unlocked: cumulative - previous,
            cumulative,
            locked: amount - cumulative,
        });
        previous = cumulative;
    }
    Ok((info, rows))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cliff_releases_accrued_days_at_once() {
        let (info, rows) = release_schedule(180, 60, 180, Some(61)).unwrap();
        assert_eq!(info.withdrawal_per_day, 1);
        assert_eq!(rows.len(), 62);
        assert_eq!(rows[59].cumulative, 0);
        assert_eq!(rows[60].unlocked, 60);
        assert_eq!(rows[61].unlocked, 1);
        assert_eq!(rows[61].locked, 119);
    }

    #[test]
    fn test_default_horizon_reaches_maturity() {
        let (_, rows) = release_schedule(100, 0, 3, None).unwrap();
        let last = rows.last().unwrap();
        assert_eq!(last.day, 3);
        assert_eq!(last.cumulative, 100);
        assert_eq!(last.unlocked, 34);
        assert_eq!(last.locked, 0);
    }

    #[test]
    fn test_horizon_far_past_maturity_is_rejected() {
        let err = release_schedule(100, 0, 3, Some(u64::MAX)).unwrap_err();
        assert!(err.to_string().contains("past maturity"));

        let (_, rows) = release_schedule(100, 0, 3, Some(3 + MAX_DAYS_PAST_MATURITY)).unwrap();
        assert_eq!(rows.len() as u64, 4 + MAX_DAYS_PAST_MATURITY);
        assert!(release_schedule(100, 0, 3, Some(4 + MAX_DAYS_PAST_MATURITY)).is_err());
    }

    #[test]
    fn test_invalid_schedule_is_an_error() {
        assert!(release_schedule(100, 0, 0, None).is_err());
        assert!(release_schedule(0, 0, 5, None).is_err());
    }
}

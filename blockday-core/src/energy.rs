//! Energy profile: per-hour energy scores with the sleep window zeroed out.
//!
//! Preferences arrive either as six coarse four-hour blocks or as 24 hourly
//! values. Both normalize to 24 hourly values; any hour that touches the
//! sleep window is forced to 0, which the engine later reads as "sleep here".
//!
//! Scores are taken as given (the 0-5 scale is a convention, not enforced).

use anyhow::bail;
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::slot::HOURS_PER_DAY;

const COARSE_BLOCKS: usize = 6;
const HOURS_PER_COARSE_BLOCK: usize = HOURS_PER_DAY / COARSE_BLOCKS;

/// Raw energy preferences as supplied by the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<i32>", into = "Vec<i32>")]
pub enum EnergyLevels {
    /// One value per four-hour block, starting at midnight.
    Coarse([i32; COARSE_BLOCKS]),
    /// One value per hour.
    Hourly([i32; HOURS_PER_DAY]),
}

impl EnergyLevels {
    pub fn to_hourly(&self) -> [i32; HOURS_PER_DAY] {
        match self {
            Self::Hourly(h) => *h,
            Self::Coarse(c) => std::array::from_fn(|hour| c[hour / HOURS_PER_COARSE_BLOCK]),
        }
    }
}

impl TryFrom<Vec<i32>> for EnergyLevels {
    type Error = anyhow::Error;

    fn try_from(values: Vec<i32>) -> anyhow::Result<Self> {
        match values.len() {
            COARSE_BLOCKS => {
                let mut c = [0; COARSE_BLOCKS];
                c.copy_from_slice(&values);
                Ok(Self::Coarse(c))
            }
            HOURS_PER_DAY => {
                let mut h = [0; HOURS_PER_DAY];
                h.copy_from_slice(&values);
                Ok(Self::Hourly(h))
            }
            n => bail!("energy levels must have 6 or 24 values, got {n}"),
        }
    }
}

impl From<EnergyLevels> for Vec<i32> {
    fn from(levels: EnergyLevels) -> Self {
        match levels {
            EnergyLevels::Coarse(c) => c.to_vec(),
            EnergyLevels::Hourly(h) => h.to_vec(),
        }
    }
}

/// Daily sleep window. `start > end` means the window wraps past midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SleepWindow {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl SleepWindow {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self { start, end }
    }

    pub fn wraps_midnight(&self) -> bool {
        self.start > self.end
    }

    /// Closed-interval overlap test against `[hour:00:00, hour:59:59]`.
    pub fn overlaps_hour(&self, hour: usize) -> bool {
        let (Some(h_start), Some(h_end)) = (
            NaiveTime::from_hms_opt(hour as u32, 0, 0),
            NaiveTime::from_hms_opt(hour as u32, 59, 59),
        ) else {
            return false;
        };

        let overlaps = |s: NaiveTime, e: NaiveTime| s <= h_end && e >= h_start;

        if self.wraps_midnight() {
            overlaps(self.start, NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(h_end))
                || overlaps(NaiveTime::MIN, self.end)
        } else {
            overlaps(self.start, self.end)
        }
    }
}

/// Immutable 24-hour energy profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnergyProfile {
    hourly: [i32; HOURS_PER_DAY],
    sleep: SleepWindow,
}

impl EnergyProfile {
    pub fn build(levels: &EnergyLevels, sleep_start: NaiveTime, sleep_end: NaiveTime) -> Self {
        let sleep = SleepWindow::new(sleep_start, sleep_end);
        let mut hourly = levels.to_hourly();
        for (hour, value) in hourly.iter_mut().enumerate() {
            if sleep.overlaps_hour(hour) {
                *value = 0;
            }
        }
        Self { hourly, sleep }
    }

    pub fn hourly(&self) -> &[i32; HOURS_PER_DAY] {
        &self.hourly
    }

    pub fn level(&self, hour: usize) -> Option<i32> {
        self.hourly.get(hour).copied()
    }

    pub fn sleep_window(&self) -> SleepWindow {
        self.sleep
    }

    /// Hours whose score is exactly 0. These get blocked as sleep.
    pub fn sleep_hours(&self) -> impl Iterator<Item = usize> + '_ {
        self.hourly
            .iter()
            .enumerate()
            .filter(|(_, v)| **v == 0)
            .map(|(h, _)| h)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn coarse_levels_replicate_per_block() {
        let levels = EnergyLevels::Coarse([1, 2, 3, 4, 5, 0]);
        let hourly = levels.to_hourly();
        assert_eq!(&hourly[0..4], &[1, 1, 1, 1]);
        assert_eq!(&hourly[8..12], &[3, 3, 3, 3]);
        assert_eq!(&hourly[20..24], &[0, 0, 0, 0]);
    }

    #[test]
    fn vec_conversion_accepts_six_or_twenty_four() {
        assert!(matches!(EnergyLevels::try_from(vec![3; 6]), Ok(EnergyLevels::Coarse(_))));
        assert!(matches!(EnergyLevels::try_from(vec![3; 24]), Ok(EnergyLevels::Hourly(_))));
        let err = EnergyLevels::try_from(vec![3; 7]).unwrap_err();
        assert!(err.to_string().contains("6 or 24"));
    }

    #[test]
    fn sleep_through_half_past_seven_zeroes_hour_seven() {
        let p = EnergyProfile::build(&EnergyLevels::Coarse([3; 6]), t(0, 0), t(7, 30));
        for h in 0..=7 {
            assert_eq!(p.level(h), Some(0), "hour {h}");
        }
        for h in 8..24 {
            assert_eq!(p.level(h), Some(3), "hour {h}");
        }
        assert_eq!(p.sleep_hours().count(), 8);
    }

    #[test]
    fn out_of_range_values_are_kept() {
        let mut hourly = [9; 24];
        hourly[12] = -2;
        let p = EnergyProfile::build(&EnergyLevels::Hourly(hourly), t(2, 0), t(3, 0));
        assert_eq!(p.level(12), Some(-2));
        assert_eq!(p.level(20), Some(9));
    }

    #[test]
    fn window_ending_on_the_hour_touches_that_hour() {
        let p = EnergyProfile::build(&EnergyLevels::Coarse([4; 6]), t(1, 0), t(6, 0));
        assert_eq!(p.level(0), Some(4));
        assert_eq!(p.level(6), Some(0));
        assert_eq!(p.level(7), Some(4));
    }

    #[test]
    fn wrapping_window_covers_both_sides_of_midnight() {
        let p = EnergyProfile::build(&EnergyLevels::Coarse([2; 6]), t(22, 30), t(5, 45));
        let zeros: Vec<usize> = p.sleep_hours().collect();
        assert_eq!(zeros, vec![0, 1, 2, 3, 4, 5, 22, 23]);
    }

    #[test]
    fn deserializes_from_plain_list() {
        let levels: EnergyLevels = serde_json::from_str("[1,2,3,4,5,1]").unwrap();
        assert_eq!(levels, EnergyLevels::Coarse([1, 2, 3, 4, 5, 1]));
        assert!(serde_json::from_str::<EnergyLevels>("[1,2]").is_err());
    }
}

//! Reporting periods and the projection arithmetic shared by every report.
//!
//! All projections start from a per-day figure and scale by calendar
//! convention: a week is 7 days, a month is 30, a year is 365. Exposure
//! counts use saturating integer math so absurd inputs cap out instead of
//! wrapping.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const DAYS_PER_WEEK: u64 = 7;
pub const DAYS_PER_MONTH: u64 = 30;
pub const DAYS_PER_YEAR: u64 = 365;

const SECONDS_PER_DAY: i64 = 86_400;

/// Window a report projects over.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReportPeriod {
    Day,
    Week,
    Month,
    Year,
    Custom {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
}

impl ReportPeriod {
    /// Number of days this period spans. Custom ranges round partial days
    /// up and never go below one day, even when the range is inverted.
    pub fn day_multiplier(&self) -> u64 {
        match self {
            ReportPeriod::Day => 1,
            ReportPeriod::Week => DAYS_PER_WEEK,
            ReportPeriod::Month => DAYS_PER_MONTH,
            ReportPeriod::Year => DAYS_PER_YEAR,
            ReportPeriod::Custom { start, end } => {
                let seconds = (*end - *start).num_seconds();
                if seconds <= 0 {
                    1
                } else {
                    ((seconds + SECONDS_PER_DAY - 1) / SECONDS_PER_DAY) as u64
                }
            }
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ReportPeriod::Day => "day",
            ReportPeriod::Week => "week",
            ReportPeriod::Month => "month",
            ReportPeriod::Year => "year",
            ReportPeriod::Custom { .. } => "custom",
        }
    }
}

impl Default for ReportPeriod {
    fn default() -> Self {
        ReportPeriod::Month
    }
}

/// Exposure counts projected across the standard windows plus the
/// requested period. Whole plays only, so fields are integers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExposureProjection {
    pub per_day: u64,
    pub per_week: u64,
    pub per_month: u64,
    pub per_year: u64,
    pub in_period: u64,
}

impl ExposureProjection {
    pub fn from_daily(per_day: u64, period: &ReportPeriod) -> Self {
        Self {
            per_day,
            per_week: per_day.saturating_mul(DAYS_PER_WEEK),
            per_month: per_day.saturating_mul(DAYS_PER_MONTH),
            per_year: per_day.saturating_mul(DAYS_PER_YEAR),
            in_period: per_day.saturating_mul(period.day_multiplier()),
        }
    }

    pub fn accumulate(&mut self, other: &ExposureProjection) {
        self.per_day = self.per_day.saturating_add(other.per_day);
        self.per_week = self.per_week.saturating_add(other.per_week);
        self.per_month = self.per_month.saturating_add(other.per_month);
        self.per_year = self.per_year.saturating_add(other.per_year);
        self.in_period = self.in_period.saturating_add(other.in_period);
    }
}

/// On-screen playback time projected across the same windows as
/// [`ExposureProjection`], in fractional seconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScreenTimeProjection {
    pub per_day: f64,
    pub per_week: f64,
    pub per_month: f64,
    pub per_year: f64,
    pub in_period: f64,
}

impl ScreenTimeProjection {
    pub fn from_daily(per_day: f64, period: &ReportPeriod) -> Self {
        Self {
            per_day,
            per_week: per_day * DAYS_PER_WEEK as f64,
            per_month: per_day * DAYS_PER_MONTH as f64,
            per_year: per_day * DAYS_PER_YEAR as f64,
            in_period: per_day * period.day_multiplier() as f64,
        }
    }

    pub fn accumulate(&mut self, other: &ScreenTimeProjection) {
        self.per_day += other.per_day;
        self.per_week += other.per_week;
        self.per_month += other.per_month;
        self.per_year += other.per_year;
        self.in_period += other.in_period;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn standard_period_multipliers() {
        assert_eq!(ReportPeriod::Day.day_multiplier(), 1);
        assert_eq!(ReportPeriod::Week.day_multiplier(), 7);
        assert_eq!(ReportPeriod::Month.day_multiplier(), 30);
        assert_eq!(ReportPeriod::Year.day_multiplier(), 365);
    }

    #[test]
    fn custom_period_rounds_partial_days_up() {
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 3, 2, 12, 0, 0).unwrap();
        let period = ReportPeriod::Custom { start, end };
        assert_eq!(period.day_multiplier(), 2);

        let same_day = ReportPeriod::Custom {
            start,
            end: start + chrono::Duration::hours(3),
        };
        assert_eq!(same_day.day_multiplier(), 1);
    }

    #[test]
    fn inverted_custom_period_counts_as_one_day() {
        let start = Utc.with_ymd_and_hms(2024, 3, 10, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let period = ReportPeriod::Custom { start, end };
        assert_eq!(period.day_multiplier(), 1);
    }

    #[test]
    fn projection_scales_daily_figure() {
        let projection = ExposureProjection::from_daily(100, &ReportPeriod::Week);
        assert_eq!(projection.per_day, 100);
        assert_eq!(projection.per_week, 700);
        assert_eq!(projection.per_month, 3_000);
        assert_eq!(projection.per_year, 36_500);
        assert_eq!(projection.in_period, 700);
    }

    #[test]
    fn projection_saturates_instead_of_overflowing() {
        let projection = ExposureProjection::from_daily(u64::MAX, &ReportPeriod::Year);
        assert_eq!(projection.per_year, u64::MAX);
        assert_eq!(projection.in_period, u64::MAX);
    }

    #[test]
    fn accumulate_is_fieldwise_sum() {
        let mut total = ExposureProjection::from_daily(10, &ReportPeriod::Day);
        total.accumulate(&ExposureProjection::from_daily(32, &ReportPeriod::Day));
        assert_eq!(total.per_day, 42);
        assert_eq!(total.per_week, 42 * 7);
        assert_eq!(total.in_period, 42);
    }

    #[test]
    fn screen_time_projection_keeps_fractions() {
        let projection = ScreenTimeProjection::from_daily(12.5, &ReportPeriod::Month);
        assert!((projection.per_week - 87.5).abs() < 1e-9);
        assert!((projection.in_period - 375.0).abs() < 1e-9);
    }
}

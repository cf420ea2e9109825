/// UTC calendar intervals.
///
/// An interval floors an instant to a boundary, steps forward by whole
/// boundaries, and may be thinned with `every(step)` (e.g. every 3 hours,
/// every other day). These drive both the "nice" rounding of the x-scale
/// domain and axis tick generation.
///
/// Thinned intervals keep calendar alignment: "every 2 days" means days
/// of the month 1, 3, 5, ... rather than every 48 hours from an arbitrary
/// origin. The same holds for seconds, minutes, hours and months.

use chrono::{DateTime, Datelike, Duration, Months, NaiveDate, TimeZone, Timelike, Utc};

pub const DURATION_SECOND: i64 = 1_000;
pub const DURATION_MINUTE: i64 = DURATION_SECOND * 60;
pub const DURATION_HOUR: i64 = DURATION_MINUTE * 60;
pub const DURATION_DAY: i64 = DURATION_HOUR * 24;
pub const DURATION_WEEK: i64 = DURATION_DAY * 7;
pub const DURATION_MONTH: i64 = DURATION_DAY * 30;
pub const DURATION_YEAR: i64 = DURATION_DAY * 365;

/// Calendar unit of an interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUnit {
    Millisecond,
    Second,
    Minute,
    Hour,
    Day,
    /// Weeks starting on Sunday.
    Week,
    Month,
    Year,
}

/// Candidate tick intervals, ascending by approximate duration.
const TICK_INTERVALS: [(TimeUnit, i64, i64); 18] = [
    (TimeUnit::Second, 1, DURATION_SECOND),
    (TimeUnit::Second, 5, 5 * DURATION_SECOND),
    (TimeUnit::Second, 15, 15 * DURATION_SECOND),
    (TimeUnit::Second, 30, 30 * DURATION_SECOND),
    (TimeUnit::Minute, 1, DURATION_MINUTE),
    (TimeUnit::Minute, 5, 5 * DURATION_MINUTE),
    (TimeUnit::Minute, 15, 15 * DURATION_MINUTE),
    (TimeUnit::Minute, 30, 30 * DURATION_MINUTE),
    (TimeUnit::Hour, 1, DURATION_HOUR),
    (TimeUnit::Hour, 3, 3 * DURATION_HOUR),
    (TimeUnit::Hour, 6, 6 * DURATION_HOUR),
    (TimeUnit::Hour, 12, 12 * DURATION_HOUR),
    (TimeUnit::Day, 1, DURATION_DAY),
    (TimeUnit::Day, 2, 2 * DURATION_DAY),
    (TimeUnit::Week, 1, DURATION_WEEK),
    (TimeUnit::Month, 1, DURATION_MONTH),
    (TimeUnit::Month, 3, 3 * DURATION_MONTH),
    (TimeUnit::Year, 1, DURATION_YEAR),
];

/// Upper bound on boundary searches; far beyond any real step count.
const MAX_PROBES: usize = 100_000;

// ---------------------------------------------------------------------------
// Interval
// ---------------------------------------------------------------------------

/// A calendar interval in UTC, optionally thinned to every `step` units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UtcInterval {
    unit: TimeUnit,
    step: i64,
}

impl UtcInterval {
    pub fn new(unit: TimeUnit) -> Self {
        UtcInterval { unit, step: 1 }
    }

    /// Thins the interval to every `step` units.
    ///
    /// Fractional steps are floored; `None` for non-finite or non-positive
    /// steps.
    pub fn every(unit: TimeUnit, step: f64) -> Option<Self> {
        let step = step.floor();
        if !step.is_finite() || step <= 0.0 {
            return None;
        }
        Some(UtcInterval { unit, step: step as i64 })
    }

    pub fn unit(&self) -> TimeUnit {
        self.unit
    }

    pub fn step(&self) -> i64 {
        self.step
    }

    /// Latest boundary at or before `t`.
    pub fn floor(&self, t: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self.unit {
            TimeUnit::Millisecond => {
                let ms = t.timestamp_millis();
                from_millis(ms.div_euclid(self.step) * self.step)
            }
            TimeUnit::Year => {
                let year = (t.year() as i64).div_euclid(self.step) * self.step;
                year_start(year)
            }
            _ => {
                let mut d = floor_unit(self.unit, t)?;
                for _ in 0..MAX_PROBES {
                    if self.accepts(d) {
                        return Some(d);
                    }
                    d = floor_unit(self.unit, d - Duration::milliseconds(1))?;
                }
                None
            }
        }
    }

    /// Earliest boundary at or after `t`.
    pub fn ceil(&self, t: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let d = self.floor(t - Duration::milliseconds(1))?;
        let d = self.offset(d, 1)?;
        self.floor(d)
    }

    /// Steps `t` forward by `count` boundaries. `t` is expected to be on a
    /// boundary already.
    pub fn offset(&self, t: DateTime<Utc>, count: u32) -> Option<DateTime<Utc>> {
        match self.unit {
            TimeUnit::Millisecond => {
                from_millis(t.timestamp_millis() + self.step * count as i64)
            }
            TimeUnit::Year => {
                let year = t.year() as i64 + self.step * count as i64;
                year_start(year)
            }
            _ => {
                let mut d = t;
                for _ in 0..count {
                    let mut probes = 0;
                    loop {
                        d = offset_unit(self.unit, d)?;
                        probes += 1;
                        if self.accepts(d) {
                            break;
                        }
                        if probes >= MAX_PROBES {
                            return None;
                        }
                    }
                }
                Some(d)
            }
        }
    }

    /// Every boundary in `[start, stop)`.
    pub fn range(&self, start: DateTime<Utc>, stop: DateTime<Utc>) -> Vec<DateTime<Utc>> {
        let mut out = Vec::new();
        let Some(mut d) = self.ceil(start) else {
            return out;
        };
        while d < stop {
            out.push(d);
            match self.offset(d, 1).and_then(|next| self.floor(next)) {
                Some(next) if next > d => d = next,
                _ => break,
            }
        }
        out
    }

    /// Whether a unit boundary also lands on the thinned grid.
    fn accepts(&self, d: DateTime<Utc>) -> bool {
        if self.step <= 1 {
            return true;
        }
        let field = match self.unit {
            TimeUnit::Second => d.second() as i64,
            TimeUnit::Minute => d.minute() as i64,
            TimeUnit::Hour => d.hour() as i64,
            TimeUnit::Day => d.day0() as i64,
            TimeUnit::Month => d.month0() as i64,
            // No calendar field: count whole weeks since the epoch's Sunday.
            TimeUnit::Week => {
                let origin = from_millis(0).and_then(|epoch| floor_unit(TimeUnit::Week, epoch));
                match origin {
                    Some(origin) => (d - origin).num_milliseconds() / DURATION_WEEK,
                    None => return false,
                }
            }
            TimeUnit::Millisecond | TimeUnit::Year => return true,
        };
        field % self.step == 0
    }
}

fn from_millis(ms: i64) -> Option<DateTime<Utc>> {
    Utc.timestamp_millis_opt(ms).single()
}

fn year_start(year: i64) -> Option<DateTime<Utc>> {
    let year = i32::try_from(year).ok()?;
    Utc.with_ymd_and_hms(year, 1, 1, 0, 0, 0).single()
}

fn floor_unit(unit: TimeUnit, t: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let ms = t.timestamp_millis();
    match unit {
        TimeUnit::Millisecond => from_millis(ms),
        TimeUnit::Second => from_millis(ms.div_euclid(DURATION_SECOND) * DURATION_SECOND),
        TimeUnit::Minute => from_millis(ms.div_euclid(DURATION_MINUTE) * DURATION_MINUTE),
        TimeUnit::Hour => from_millis(ms.div_euclid(DURATION_HOUR) * DURATION_HOUR),
        TimeUnit::Day => from_millis(ms.div_euclid(DURATION_DAY) * DURATION_DAY),
        TimeUnit::Week => {
            let day = floor_unit(TimeUnit::Day, t)?;
            let back = day.weekday().num_days_from_sunday() as i64;
            Some(day - Duration::days(back))
        }
        TimeUnit::Month => {
            let first = NaiveDate::from_ymd_opt(t.year(), t.month(), 1)?;
            Some(Utc.from_utc_datetime(&first.and_hms_opt(0, 0, 0)?))
        }
        TimeUnit::Year => year_start(t.year() as i64),
    }
}

fn offset_unit(unit: TimeUnit, t: DateTime<Utc>) -> Option<DateTime<Utc>> {
    match unit {
        TimeUnit::Millisecond => t.checked_add_signed(Duration::milliseconds(1)),
        TimeUnit::Second => t.checked_add_signed(Duration::seconds(1)),
        TimeUnit::Minute => t.checked_add_signed(Duration::minutes(1)),
        TimeUnit::Hour => t.checked_add_signed(Duration::hours(1)),
        TimeUnit::Day => t.checked_add_signed(Duration::days(1)),
        TimeUnit::Week => t.checked_add_signed(Duration::days(7)),
        TimeUnit::Month => t.checked_add_months(Months::new(1)),
        TimeUnit::Year => t.checked_add_months(Months::new(12)),
    }
}

// ---------------------------------------------------------------------------
// Tick interval selection
// ---------------------------------------------------------------------------

/// Power-of-ten step (times 1, 2 or 5) splitting `[start, stop]` into
/// roughly `count` pieces.
pub fn tick_step(start: f64, stop: f64, count: f64) -> f64 {
    let step0 = (stop - start).abs() / count.max(0.0);
    let mut step1 = 10f64.powf((step0.ln() / std::f64::consts::LN_10).floor());
    let error = step0 / step1;
    if error >= 50f64.sqrt() {
        step1 *= 10.0;
    } else if error >= 10f64.sqrt() {
        step1 *= 5.0;
    } else if error >= 2f64.sqrt() {
        step1 *= 2.0;
    }
    if stop < start { -step1 } else { step1 }
}

/// Picks the interval whose duration is closest (by ratio) to the span
/// divided into `count` ticks.
///
/// Spans shorter than ten seconds fall back to millisecond multiples,
/// spans of ten years or more to year multiples.
pub fn tick_interval(start: DateTime<Utc>, stop: DateTime<Utc>, count: usize) -> Option<UtcInterval> {
    let start_ms = start.timestamp_millis() as f64;
    let stop_ms = stop.timestamp_millis() as f64;
    let count = count as f64;
    let target = (stop_ms - start_ms).abs() / count;

    // First candidate strictly longer than the target.
    let i = TICK_INTERVALS
        .iter()
        .position(|&(_, _, duration)| duration as f64 > target)
        .unwrap_or(TICK_INTERVALS.len());

    if i == TICK_INTERVALS.len() {
        let step = tick_step(
            start_ms / DURATION_YEAR as f64,
            stop_ms / DURATION_YEAR as f64,
            count,
        );
        UtcInterval::every(TimeUnit::Year, step)
    } else if i > 0 {
        let below = TICK_INTERVALS[i - 1];
        let above = TICK_INTERVALS[i];
        let (unit, step, _) = if target / (below.2 as f64) < (above.2 as f64) / target {
            below
        } else {
            above
        };
        UtcInterval::every(unit, step as f64)
    } else {
        let step = tick_step(start_ms, stop_ms, count).max(1.0);
        UtcInterval::every(TimeUnit::Millisecond, step)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    #[test]
    fn test_day_floor_and_ceil() {
        let day = UtcInterval::new(TimeUnit::Day);
        let t = utc(1970, 1, 1, 14, 30);
        assert_eq!(day.floor(t), Some(utc(1970, 1, 1, 0, 0)));
        assert_eq!(day.ceil(t), Some(utc(1970, 1, 2, 0, 0)));
    }

    #[test]
    fn test_ceil_of_boundary_is_itself() {
        let day = UtcInterval::new(TimeUnit::Day);
        let midnight = utc(1970, 1, 1, 0, 0);
        assert_eq!(day.ceil(midnight), Some(midnight));
        assert_eq!(day.floor(midnight), Some(midnight));
    }

    #[test]
    fn test_week_floors_to_sunday() {
        let week = UtcInterval::new(TimeUnit::Week);
        // 2011-01-05 was a Wednesday; the Sunday before is 2011-01-02.
        assert_eq!(week.floor(utc(2011, 1, 5, 9, 0)), Some(utc(2011, 1, 2, 0, 0)));
    }

    #[test]
    fn test_every_three_months_aligns_to_quarters() {
        let quarter = UtcInterval::every(TimeUnit::Month, 3.0).unwrap();
        assert_eq!(quarter.floor(utc(2011, 5, 17, 0, 0)), Some(utc(2011, 4, 1, 0, 0)));
        assert_eq!(quarter.ceil(utc(2011, 5, 17, 0, 0)), Some(utc(2011, 7, 1, 0, 0)));
    }

    #[test]
    fn test_every_two_days_uses_day_of_month() {
        let two_days = UtcInterval::every(TimeUnit::Day, 2.0).unwrap();
        // Jan 31 (day0 = 30) is on the grid; the next boundary is Feb 1.
        let jan31 = utc(2011, 1, 31, 0, 0);
        assert_eq!(two_days.offset(jan31, 1), Some(utc(2011, 2, 1, 0, 0)));
        assert_eq!(two_days.floor(utc(2011, 1, 2, 12, 0)), Some(utc(2011, 1, 1, 0, 0)));
    }

    #[test]
    fn test_every_rejects_non_positive_steps() {
        assert!(UtcInterval::every(TimeUnit::Year, 0.0).is_none());
        assert!(UtcInterval::every(TimeUnit::Year, f64::NAN).is_none());
        assert_eq!(UtcInterval::every(TimeUnit::Hour, 3.7).unwrap().step(), 3);
    }

    #[test]
    fn test_range_every_three_hours_over_a_day() {
        let three_hours = UtcInterval::every(TimeUnit::Hour, 3.0).unwrap();
        let ticks = three_hours.range(utc(1970, 1, 1, 0, 0), utc(1970, 1, 2, 0, 1));
        assert_eq!(ticks.len(), 9);
        assert_eq!(ticks[1], utc(1970, 1, 1, 3, 0));
        assert_eq!(ticks[8], utc(1970, 1, 2, 0, 0));
    }

    #[test]
    fn test_tick_interval_for_one_day_is_three_hours() {
        let interval = tick_interval(utc(1970, 1, 1, 0, 0), utc(1970, 1, 2, 0, 0), 10).unwrap();
        assert_eq!(interval.unit(), TimeUnit::Hour);
        assert_eq!(interval.step(), 3);
    }

    #[test]
    fn test_tick_interval_for_one_year_is_one_month() {
        let interval = tick_interval(utc(2011, 1, 1, 0, 0), utc(2011, 12, 31, 23, 0), 10).unwrap();
        assert_eq!(interval.unit(), TimeUnit::Month);
        assert_eq!(interval.step(), 1);
    }

    #[test]
    fn test_tick_interval_for_several_years_is_a_quarter() {
        // ~4.6 years / 10 ticks is ~169 days, closer to 3 months than a year.
        let interval = tick_interval(utc(2011, 3, 5, 0, 0), utc(2015, 10, 20, 0, 0), 10).unwrap();
        assert_eq!(interval.unit(), TimeUnit::Month);
        assert_eq!(interval.step(), 3);
    }

    #[test]
    fn test_tick_interval_for_eight_years_is_one_year() {
        let interval = tick_interval(utc(2003, 1, 1, 0, 0), utc(2011, 1, 1, 0, 0), 10).unwrap();
        assert_eq!(interval.unit(), TimeUnit::Year);
        assert_eq!(interval.step(), 1);
    }

    #[test]
    fn test_tick_interval_for_decades_uses_year_multiples() {
        let interval = tick_interval(utc(1950, 1, 1, 0, 0), utc(2010, 1, 1, 0, 0), 10).unwrap();
        assert_eq!(interval.unit(), TimeUnit::Year);
        assert_eq!(interval.step(), 5);
    }

    #[test]
    fn test_tick_interval_for_zero_span_is_millisecond() {
        let t = utc(2011, 1, 1, 0, 0);
        let interval = tick_interval(t, t, 10).unwrap();
        assert_eq!(interval.unit(), TimeUnit::Millisecond);
        assert_eq!(interval.floor(t), Some(t));
    }

    #[test]
    fn test_tick_step_powers() {
        assert_eq!(tick_step(0.0, 10.0, 10.0), 1.0);
        assert_eq!(tick_step(0.0, 60.0, 10.0), 5.0);
        assert_eq!(tick_step(0.0, 100.0, 10.0), 10.0);
    }
}

/// UTC time scale: maps instants linearly onto a rounded pixel range.
///
/// Behaviour that the charts depend on:
/// - no clamping, out-of-domain instants extrapolate past the range;
/// - outputs are rounded half-up (`rangeRound`);
/// - a zero-width domain maps every input to the range start;
/// - an invalid domain or invalid input yields an invalid position.

use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::numeric::js_round;
use crate::timeline::interval::{TimeUnit, UtcInterval, tick_interval};
use crate::timeline::zone::{AmbientZone, reference_day_start};

/// Tick count used for both `nice` and axis ticks.
pub const DEFAULT_TICK_COUNT: usize = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct UtcScale {
    /// `None` when the domain was set from invalid instants.
    domain: Option<(DateTime<Utc>, DateTime<Utc>)>,
    range: (f64, f64),
}

impl UtcScale {
    /// A scale over `domain` with output range `[r0, r1]`.
    pub fn new(domain: Option<(DateTime<Utc>, DateTime<Utc>)>, range: (f64, f64)) -> Self {
        UtcScale { domain, range }
    }

    /// The horizontal date scale, before any data has set its domain.
    ///
    /// Starts on 2000-01-01 .. 2000-01-02 UTC.
    pub fn horizontal(width: f64) -> Self {
        let start = Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).single();
        let end = Utc.with_ymd_and_hms(2000, 1, 2, 0, 0, 0).single();
        UtcScale::new(start.zip(end), (0.0, width + 10.0))
    }

    /// The vertical time-of-day scale for the reference day.
    ///
    /// The domain is the UTC day containing local midnight 1970-01-01 of
    /// the ambient zone: `[utcDay.floor(m), utcDay.ceil(m)]`. West of UTC
    /// that is 1970-01-01 itself; east of UTC it is 1969-12-31; in UTC the
    /// two ends coincide and the scale collapses.
    pub fn vertical(height: f64, zone: AmbientZone) -> Self {
        let day = UtcInterval::new(TimeUnit::Day);
        let domain = reference_day_start()
            .and_then(|start| zone.local_to_utc(start))
            .and_then(|midnight| day.floor(midnight).zip(day.ceil(midnight)));
        UtcScale::new(domain, (0.0, height - 32.0))
    }

    pub fn domain(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        self.domain
    }

    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    pub fn set_domain(&mut self, domain: Option<(DateTime<Utc>, DateTime<Utc>)>) {
        self.domain = domain;
    }

    /// Extends the domain outward to the boundaries of the tick interval
    /// that would give about ten ticks.
    pub fn nice(&mut self) {
        let Some((d0, d1)) = self.domain else {
            return;
        };
        let (lo, hi) = if d1 < d0 { (d1, d0) } else { (d0, d1) };
        let Some(interval) = tick_interval(lo, hi, DEFAULT_TICK_COUNT) else {
            return;
        };
        let (Some(lo), Some(hi)) = (interval.floor(lo), interval.ceil(hi)) else {
            return;
        };
        self.domain = Some(if d1 < d0 { (hi, lo) } else { (lo, hi) });
    }

    /// Pixel position of `t`, or `None` for an undefined position.
    pub fn apply(&self, t: Option<DateTime<Utc>>) -> Option<f64> {
        let (d0, d1) = self.domain?;
        let a = d0.timestamp_millis();
        let span = d1.timestamp_millis() - a;
        let u = if span == 0 {
            0.0
        } else {
            (t?.timestamp_millis() - a) as f64 / span as f64
        };
        let (r0, r1) = self.range;
        Some(js_round(r0 + (r1 - r0) * u))
    }

    /// About `count` evenly spaced calendar instants within the domain,
    /// in domain order.
    pub fn ticks(&self, count: usize) -> Vec<DateTime<Utc>> {
        let Some((d0, d1)) = self.domain else {
            return Vec::new();
        };
        let reversed = d1 < d0;
        let (lo, hi) = if reversed { (d1, d0) } else { (d0, d1) };
        let Some(interval) = tick_interval(lo, hi, count) else {
            return Vec::new();
        };
        let mut ticks = interval.range(lo, hi + Duration::milliseconds(1));
        if reversed {
            ticks.reverse();
        }
        ticks
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

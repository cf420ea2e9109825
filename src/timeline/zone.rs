/// Ambient time zone handling and the synthetic-day shift.
///
/// Cover and sun timestamps come from many different dates but are all
/// plotted against one reference day (1970-01-01). The shift uses the
/// *viewer's* zone offset, not the data's own zone, so positions are only
/// meaningful when the viewing zone matches the one the data was prepared
/// for. That coupling is deliberate and kept.
///
/// # Zone injection
/// Every function takes an `AmbientZone` rather than reading the system
/// zone directly. Production uses `AmbientZone::System`; tests pin a fixed
/// offset so results do not depend on where they run.

use chrono::{
    DateTime, Duration, FixedOffset, Local, LocalResult, NaiveDate, NaiveDateTime, Offset,
    TimeZone, Timelike, Utc,
};

// ---------------------------------------------------------------------------
// Ambient zone
// ---------------------------------------------------------------------------

/// The zone local wall-clock times are interpreted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmbientZone {
    /// The zone of the machine running the render.
    System,
    /// A pinned offset, east of UTC positive.
    Fixed(FixedOffset),
}

impl AmbientZone {
    /// A fixed zone `minutes` east of UTC. `None` if out of range.
    pub fn fixed_minutes(minutes: i32) -> Option<Self> {
        FixedOffset::east_opt(minutes.checked_mul(60)?).map(AmbientZone::Fixed)
    }

    /// UTC as the ambient zone.
    pub fn utc() -> Self {
        AmbientZone::Fixed(Utc.fix())
    }

    /// Resolves a local wall time to the instant it denotes.
    ///
    /// Wall times inside a DST gap take the offset in force before the
    /// transition (so they land later than written); ambiguous wall times
    /// take the earlier instant.
    pub fn local_to_utc(&self, naive: NaiveDateTime) -> Option<DateTime<Utc>> {
        match self {
            AmbientZone::System => resolve_local(&Local, naive),
            AmbientZone::Fixed(offset) => resolve_local(offset, naive),
        }
    }

    /// Local midnight of `date` as an instant.
    pub fn local_midnight(&self, date: NaiveDate) -> Option<DateTime<Utc>> {
        self.local_to_utc(date.and_hms_opt(0, 0, 0)?)
    }

    /// Minutes to add to local time to reach UTC at local wall time
    /// `naive` (positive west of Greenwich), like `getTimezoneOffset()`.
    pub fn timezone_offset_minutes(&self, naive: NaiveDateTime) -> Option<f64> {
        let instant = self.local_to_utc(naive)?;
        let east_secs = match self {
            AmbientZone::System => Local
                .offset_from_utc_datetime(&instant.naive_utc())
                .fix()
                .local_minus_utc(),
            AmbientZone::Fixed(offset) => offset.local_minus_utc(),
        };
        Some(-(east_secs as f64) / 60.0)
    }
}

fn resolve_local<Tz: TimeZone>(tz: &Tz, naive: NaiveDateTime) -> Option<DateTime<Utc>> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Some(dt.with_timezone(&Utc)),
        LocalResult::Ambiguous(earliest, _) => Some(earliest.with_timezone(&Utc)),
        LocalResult::None => {
            // An hour before the gap still carries the old offset.
            let before = naive.checked_sub_signed(Duration::hours(1))?;
            tz.from_local_datetime(&before)
                .earliest()
                .map(|dt| dt.with_timezone(&Utc) + Duration::hours(1))
        }
    }
}

// ---------------------------------------------------------------------------
// Synthetic day
// ---------------------------------------------------------------------------

/// Local midnight, 1970-01-01, as a naive wall time.
pub fn reference_day_start() -> Option<NaiveDateTime> {
    NaiveDate::from_ymd_opt(1970, 1, 1)?.and_hms_opt(0, 0, 0)
}

/// Projects the UTC time-of-day of `t` onto the reference day.
///
/// `hour = t.utc_hour + adjustment - offset/60` where `offset` is the
/// ambient `getTimezoneOffset()` at local 1970-01-01 00:00, and the result
/// is the local wall time `(1970-01-01, trunc(hour), t.utc_minute)`.
/// Hours outside 0..24 roll into the neighbouring day. Seconds are
/// dropped. An invalid `t` stays invalid.
///
/// The render path always passes `adjustment = 0`.
pub fn shift_to_utc_hours(
    t: Option<DateTime<Utc>>,
    adjustment: i32,
    zone: AmbientZone,
) -> Option<DateTime<Utc>> {
    let t = t?;
    let day_start = reference_day_start()?;
    let offset_minutes = zone.timezone_offset_minutes(day_start)?;

    let hour = (t.hour() as f64 + adjustment as f64 - offset_minutes / 60.0).trunc();
    if !hour.is_finite() {
        return None;
    }

    let wall = day_start
        .checked_add_signed(Duration::hours(hour as i64))?
        .checked_add_signed(Duration::minutes(t.minute() as i64))?;
    zone.local_to_utc(wall)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

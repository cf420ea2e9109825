/// Time handling for the charts.
///
/// Submodules:
/// - `zone`: the ambient (viewer) time zone and the synthetic-day shift.
/// - `interval`: UTC calendar intervals (floor / ceil / every / range).
/// - `scale`: the UTC time scale mapping instants to pixels.

pub mod interval;
pub mod scale;
pub mod zone;

pub use interval::{TimeUnit, UtcInterval, tick_interval};
pub use scale::UtcScale;
pub use zone::{AmbientZone, shift_to_utc_hours};

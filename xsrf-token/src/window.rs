//! Time windowing.
//!
//! A window counter is the number of whole `lifetime` intervals elapsed since
//! the Unix epoch, `floor(unix_nanos / lifetime_nanos)`.

use chrono::{DateTime, TimeZone, Utc};
use std::time::Duration;

const NANOS_PER_SEC: i128 = 1_000_000_000;

/// Nanoseconds since the Unix epoch, exact for every representable instant.
fn unix_nanos(now: &DateTime<Utc>) -> i128 {
    i128::from(now.timestamp()) * NANOS_PER_SEC + i128::from(now.timestamp_subsec_nanos())
}

fn lifetime_nanos(lifetime: Duration) -> i128 {
    // Duration::MAX is ~1.8e28 ns, well inside i128.
    lifetime.as_nanos() as i128
}

/// Window counter for `now`.
///
/// Instants before the epoch floor toward negative infinity.
///
/// # Panics
///
/// Panics if `lifetime` is zero. [`AuthenticatorConfig::validate`] rejects
/// such lifetimes.
///
/// [`AuthenticatorConfig::validate`]: crate::AuthenticatorConfig::validate
pub fn counter_at(now: DateTime<Utc>, lifetime: Duration) -> i64 {
    let counter = unix_nanos(&now).div_euclid(lifetime_nanos(lifetime));
    counter.clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64
}

/// First instant of window `counter`, if representable.
pub fn window_start(counter: i64, lifetime: Duration) -> Option<DateTime<Utc>> {
    let nanos = i128::from(counter).checked_mul(lifetime_nanos(lifetime))?;
    let secs = i64::try_from(nanos.div_euclid(NANOS_PER_SEC)).ok()?;
    let subsec = nanos.rem_euclid(NANOS_PER_SEC) as u32;
    Utc.timestamp_opt(secs, subsec).single()
}

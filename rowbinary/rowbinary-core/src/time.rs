//! Calendar arithmetic shared by the codec and the coercion layer.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, TimeZone};
use chrono_tz::Tz;

use crate::error::CodecError;

/// Days from 0001-01-01 (day 1) to 1970-01-01.
const UNIX_EPOCH_DAY_FROM_CE: i64 = 719_163;

const NANOS_PER_SECOND: i64 = 1_000_000_000;

pub fn epoch_days(date: NaiveDate) -> i64 {
    date.num_days_from_ce() as i64 - UNIX_EPOCH_DAY_FROM_CE
}

pub fn date_from_epoch_days(days: i64) -> Option<NaiveDate> {
    let ce = i32::try_from(days.checked_add(UNIX_EPOCH_DAY_FROM_CE)?).ok()?;
    NaiveDate::from_num_days_from_ce_opt(ce)
}

/// `10^scale` for a sub-second scale in `0..=9`.
pub fn scale_factor(scale: u8) -> i64 {
    10i64.pow(scale.min(9) as u32)
}

/// Ticks of `10^-scale` seconds since the epoch; sub-scale nanoseconds are dropped.
pub fn datetime64_ticks<Z: TimeZone>(dt: &DateTime<Z>, scale: u8) -> Option<i64> {
    let divisor = scale_factor(9 - scale.min(9));
    dt.timestamp()
        .checked_mul(scale_factor(scale))?
        .checked_add(dt.timestamp_subsec_nanos() as i64 / divisor)
}

/// Inverse of [`datetime64_ticks`], splitting with floor division so the
/// nanosecond part stays non-negative before the epoch.
pub fn datetime64_from_ticks(ticks: i64, scale: u8, tz: Tz) -> Option<DateTime<Tz>> {
    let factor = scale_factor(scale);
    let seconds = ticks.div_euclid(factor);
    let fraction = ticks.rem_euclid(factor);
    let nanos = fraction * (NANOS_PER_SECOND / factor);
    tz.timestamp_opt(seconds, nanos as u32).single()
}

/// Resolves a zoneless date-time in `tz`, taking the earlier instant on a fold.
pub fn localize(naive: &NaiveDateTime, tz: Tz) -> Result<DateTime<Tz>, CodecError> {
    tz.from_local_datetime(naive).earliest().ok_or_else(|| {
        CodecError::invalid(
            "DateTime",
            format!("{naive} does not exist in time zone {}", tz.name()),
        )
    })
}

pub fn parse_date(s: &str) -> Result<NaiveDate, CodecError> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|e| CodecError::parse(s, "Date", e))
}

/// Accepts RFC 3339 with an offset, or `YYYY-MM-DD[ T]hh:mm:ss[.fraction]`
/// and a bare date, both read as local time in `tz`.
pub fn parse_datetime(s: &str, tz: Tz) -> Result<DateTime<Tz>, CodecError> {
    let text = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Ok(dt.with_timezone(&tz));
    }
    let naive = NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f"))
        .or_else(|e| {
            NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .ok_or(e)
        })
        .map_err(|e| CodecError::parse(s, "DateTime", e))?;
    localize(&naive, tz)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn epoch_day_round_trip() {
        let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap();
        assert_eq!(epoch_days(epoch), 0);
        assert_eq!(date_from_epoch_days(-1), NaiveDate::from_ymd_opt(1969, 12, 31));
    }

    #[test]
    fn ticks_floor_before_epoch() {
        let dt = datetime64_from_ticks(-1, 3, Tz::UTC).unwrap();
        assert_eq!(dt.timestamp(), -1);
        assert_eq!(dt.timestamp_subsec_nanos(), 999_000_000);
        assert_eq!(datetime64_ticks(&dt, 3), Some(-1));
    }
}

use anyhow::{anyhow, Result};
use chrono::{DateTime, FixedOffset, NaiveTime, TimeZone, Timelike, Utc};
use chrono_tz::Tz;
use std::fmt;

/// Timezone reminder times are written in: an IANA zone or a fixed UTC offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReminderTimezone {
    Named(Tz),
    Fixed(FixedOffset),
}

impl ReminderTimezone {
    /// Accepts `Asia/Taipei`, `UTC`, `Z`, or an offset such as `+08:00`.
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();

        if let Ok(tz) = input.parse::<Tz>() {
            return Ok(Self::Named(tz));
        }

        parse_utc_offset(input).map(Self::Fixed)
    }

    /// Next fire time of a daily reminder, shown in this timezone.
    pub fn next_fire(&self, now: DateTime<Utc>, time: NaiveTime) -> Option<DateTime<FixedOffset>> {
        match self {
            Self::Named(tz) => next_fire(now, time, tz).map(|dt| dt.fixed_offset()),
            Self::Fixed(offset) => next_fire(now, time, offset).map(|dt| dt.fixed_offset()),
        }
    }
}

impl fmt::Display for ReminderTimezone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(tz) => f.write_str(tz.name()),
            Self::Fixed(offset) => write!(f, "{offset}"),
        }
    }
}

/// Parses `+HH:MM` style offsets, plus `Z` and `UTC`.
pub fn parse_utc_offset(input: &str) -> Result<FixedOffset> {
    let input = input.trim();

    if input.eq_ignore_ascii_case("z") || input.eq_ignore_ascii_case("utc") {
        return FixedOffset::east_opt(0).ok_or_else(|| anyhow!("Invalid UTC offset"));
    }

    input
        .parse::<FixedOffset>()
        .map_err(|e| anyhow!("Invalid timezone '{}': {}", input, e))
}

/// Next moment strictly after `now` at which the wall clock in `tz` shows `time`.
///
/// Ambiguous local times take the earlier instant; times skipped by a DST
/// jump move on to the next day that has them.
pub fn next_fire<Z: TimeZone>(now: DateTime<Utc>, time: NaiveTime, tz: &Z) -> Option<DateTime<Z>> {
    let local_now = now.with_timezone(tz);
    let mut date = local_now.date_naive();

    for _ in 0..3 {
        if let Some(candidate) = tz.from_local_datetime(&date.and_time(time)).earliest() {
            if candidate > local_now {
                return Some(candidate);
            }
        }
        date = date.succ_opt()?;
    }

    None
}

/// Cron expression (seconds first) firing daily at `time` in the job's timezone.
pub fn daily_cron(time: NaiveTime) -> String {
    format!("{} {} {} * * *", time.second(), time.minute(), time.hour())
}

pub fn format_datetime(dt: &DateTime<FixedOffset>) -> String {
    dt.format("%Y/%m/%d %H:%M:%S").to_string()
}

pub fn format_time(time: &NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hm(hour: u32, minute: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
    }

    fn utc(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    #[test]
    fn test_parse_utc_offset() {
        assert_eq!(parse_utc_offset("+08:00").unwrap().local_minus_utc(), 8 * 3600);
        assert_eq!(parse_utc_offset("-05:30").unwrap().local_minus_utc(), -(5 * 3600 + 1800));
        assert_eq!(parse_utc_offset("UTC").unwrap().local_minus_utc(), 0);
        assert_eq!(parse_utc_offset(" Z ").unwrap().local_minus_utc(), 0);
    }

    #[test]
    fn test_parse_utc_offset_rejects_garbage() {
        assert!(parse_utc_offset("").is_err());
        assert!(parse_utc_offset("08:00").is_err());
        assert!(parse_utc_offset("Asia/Taipei").is_err());
    }

    #[test]
    fn test_parse_timezone() {
        assert_eq!(
            ReminderTimezone::parse("Asia/Taipei").unwrap(),
            ReminderTimezone::Named(chrono_tz::Asia::Taipei)
        );
        assert!(matches!(ReminderTimezone::parse("+08:00").unwrap(), ReminderTimezone::Fixed(_)));
        assert!(ReminderTimezone::parse("Mars/Olympus").is_err());
        assert_eq!(ReminderTimezone::parse("Europe/Berlin").unwrap().to_string(), "Europe/Berlin");
    }

    #[test]
    fn test_next_fire_later_today() {
        let tz = ReminderTimezone::parse("+08:00").unwrap();
        // 01:00 UTC is 09:00 in +08:00
        let next = tz.next_fire(utc("2024-03-01T01:00:00Z"), hm(9, 30)).unwrap();
        assert_eq!(format_datetime(&next), "2024/03/01 09:30:00");
    }

    #[test]
    fn test_next_fire_rolls_to_tomorrow() {
        let tz = ReminderTimezone::parse("Asia/Taipei").unwrap();
        let next = tz.next_fire(utc("2024-03-01T01:30:00Z"), hm(9, 30)).unwrap();
        assert_eq!(format_datetime(&next), "2024/03/02 09:30:00");
    }

    #[test]
    fn test_next_fire_crosses_utc_date() {
        let tz = ReminderTimezone::parse("+08:00").unwrap();
        // 20:00 UTC on the 1st is already 04:00 on the 2nd locally
        let next = tz.next_fire(utc("2024-03-01T20:00:00Z"), hm(7, 0)).unwrap();
        assert_eq!(format_datetime(&next), "2024/03/02 07:00:00");
        assert_eq!(next.with_timezone(&Utc), utc("2024-03-01T23:00:00Z"));
    }

    #[test]
    fn test_next_fire_follows_daylight_saving() {
        let berlin = ReminderTimezone::parse("Europe/Berlin").unwrap();

        // Winter: 08:00 in Berlin is 07:00 UTC
        let winter = berlin.next_fire(utc("2024-01-10T00:00:00Z"), hm(8, 0)).unwrap();
        assert_eq!(winter.with_timezone(&Utc), utc("2024-01-10T07:00:00Z"));

        // Summer: 08:00 in Berlin is 06:00 UTC
        let summer = berlin.next_fire(utc("2024-07-10T00:00:00Z"), hm(8, 0)).unwrap();
        assert_eq!(summer.with_timezone(&Utc), utc("2024-07-10T06:00:00Z"));
    }

    #[test]
    fn test_next_fire_skips_missing_local_time() {
        let berlin = ReminderTimezone::parse("Europe/Berlin").unwrap();
        // 02:30 does not exist on 2024-03-31 in Berlin
        let next = berlin.next_fire(utc("2024-03-30T12:00:00Z"), hm(2, 30)).unwrap();
        assert_eq!(format_datetime(&next), "2024/04/01 02:30:00");
    }

    #[test]
    fn test_daily_cron() {
        assert_eq!(daily_cron(hm(9, 30)), "0 30 9 * * *");
        assert_eq!(daily_cron(hm(0, 0)), "0 0 0 * * *");
    }

    #[test]
    fn test_format_time_pads() {
        assert_eq!(format_time(&hm(7, 5)), "07:05");
        assert_eq!(format_time(&hm(23, 59)), "23:59");
    }
}

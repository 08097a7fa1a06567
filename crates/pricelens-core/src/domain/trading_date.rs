use std::fmt::{Display, Formatter};

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime, PrimitiveDateTime, UtcOffset};

use crate::ValidationError;

/// Calendar date of a trading session with no time-zone component.
///
/// Providers report bars as instants carrying different offset metadata for
/// the same session. Every adapter reduces those instants to the exchange-local
/// calendar date so that series from different providers join on date alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TradingDate(Date);

impl TradingDate {
    pub const fn new(date: Date) -> Self {
        Self(date)
    }

    /// Parse a strict `YYYY-MM-DD` calendar date.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        Date::parse(trimmed, format_description!("[year]-[month]-[day]"))
            .map(Self)
            .map_err(|_| ValidationError::InvalidDate {
                value: input.to_owned(),
            })
    }

    /// Parse a date or timestamp, keeping only its local calendar date.
    ///
    /// Accepts `YYYY-MM-DD`, RFC 3339, and `YYYY-MM-DD HH:MM:SS` with or
    /// without a trailing `±HH:MM` offset. Returns `None` for anything else.
    pub fn parse_lenient(input: &str) -> Option<Self> {
        let trimmed = input.trim();
        if let Ok(date) = Self::parse(trimmed) {
            return Some(date);
        }
        if let Ok(value) = OffsetDateTime::parse(trimmed, &Rfc3339) {
            return Some(Self(value.date()));
        }
        if let Ok(value) = OffsetDateTime::parse(
            trimmed,
            format_description!(
                "[year]-[month]-[day] [hour]:[minute]:[second][offset_hour sign:mandatory]:[offset_minute]"
            ),
        ) {
            return Some(Self(value.date()));
        }
        PrimitiveDateTime::parse(
            trimmed,
            format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"),
        )
        .ok()
        .map(|value| Self(value.date()))
    }

    /// Calendar date of a unix timestamp as seen from `offset_seconds` east of UTC.
    pub fn from_unix_timestamp(timestamp: i64, offset_seconds: i64) -> Option<Self> {
        let instant = OffsetDateTime::from_unix_timestamp(timestamp).ok()?;
        let offset = UtcOffset::from_whole_seconds(i32::try_from(offset_seconds).ok()?).ok()?;
        Some(Self(instant.to_offset(offset).date()))
    }

    /// Unix timestamp of 00:00 UTC on this date.
    pub fn unix_midnight_utc(self) -> i64 {
        self.0.midnight().assume_utc().unix_timestamp()
    }

    pub const fn into_inner(self) -> Date {
        self.0
    }

    pub fn format_iso(self) -> String {
        format!(
            "{:04}-{:02}-{:02}",
            self.0.year(),
            u8::from(self.0.month()),
            self.0.day()
        )
    }
}

impl Display for TradingDate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.format_iso())
    }
}

impl Serialize for TradingDate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.format_iso())
    }
}

impl<'de> Deserialize<'de> for TradingDate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Self::parse(&value).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_calendar_date() {
        let parsed = TradingDate::parse("2023-01-03").expect("must parse");
        assert_eq!(parsed.to_string(), "2023-01-03");
    }

    #[test]
    fn rejects_impossible_month() {
        let err = TradingDate::parse("2023-13-01").expect_err("must fail");
        assert!(matches!(err, ValidationError::InvalidDate { .. }));
    }

    #[test]
    fn rejects_trailing_time_in_strict_mode() {
        assert!(TradingDate::parse("2023-01-03T00:00:00Z").is_err());
    }

    #[test]
    fn lenient_parse_strips_time_zone() {
        let expected = TradingDate::parse("2023-01-03").expect("date");
        for raw in [
            "2023-01-03",
            "2023-01-03T00:00:00-05:00",
            "2023-01-03 00:00:00-05:00",
            "2023-01-03 09:30:00",
            "2023-01-03T23:30:00+09:00",
        ] {
            assert_eq!(TradingDate::parse_lenient(raw), Some(expected), "{raw}");
        }
        assert_eq!(TradingDate::parse_lenient("03/01/2023"), None);
    }

    #[test]
    fn unix_timestamp_uses_exchange_offset() {
        // 2023-01-03 14:30 UTC is the 09:30 New York open.
        let ts = 1_672_756_200;
        let new_york = TradingDate::from_unix_timestamp(ts, -18_000).expect("date");
        assert_eq!(new_york.to_string(), "2023-01-03");

        // 2023-01-03 00:00 Tokyo is still 2023-01-02 in UTC.
        let tokyo_midnight = 1_672_671_600;
        let tokyo = TradingDate::from_unix_timestamp(tokyo_midnight, 32_400).expect("date");
        assert_eq!(tokyo.to_string(), "2023-01-03");
        let utc = TradingDate::from_unix_timestamp(tokyo_midnight, 0).expect("date");
        assert_eq!(utc.to_string(), "2023-01-02");
    }

    #[test]
    fn midnight_round_trips_through_unix_timestamp() {
        let date = TradingDate::parse("2023-12-01").expect("date");
        assert_eq!(date.unix_midnight_utc(), 1_701_388_800);
        assert_eq!(
            TradingDate::from_unix_timestamp(date.unix_midnight_utc(), 0),
            Some(date)
        );
    }
}

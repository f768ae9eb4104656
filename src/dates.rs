//! Calendar-date handling. Entries and suggestions are keyed by ISO dates
//! (`YYYY-MM-DD`, no time component); timestamps stay `OffsetDateTime`.

use time::macros::format_description;
use time::{Date, OffsetDateTime, UtcOffset};

pub fn parse_date(raw: &str) -> Result<Date, time::error::Parse> {
    let format = format_description!("[year]-[month]-[day]");
    Date::parse(raw.trim(), &format)
}

pub fn format_date(date: Date) -> String {
    let format = format_description!("[year]-[month]-[day]");
    date.format(&format).expect("iso date formatting")
}

/// Calendar date of `now` under the configured day-boundary offset.
/// The suggestion quota rolls over at midnight in this offset, not in the
/// caller's locale.
pub fn civil_date(now: OffsetDateTime, offset: UtcOffset) -> Date {
    now.to_offset(offset).date()
}

pub fn age_years(birth: Date, today: Date) -> i32 {
    let mut age = today.year() - birth.year();
    if (u8::from(today.month()), today.day()) < (u8::from(birth.month()), birth.day()) {
        age -= 1;
    }
    age.max(0)
}

/// `#[serde(with = "crate::dates::iso_date")]` for `time::Date` fields.
pub mod iso_date {
    use serde::{de::Error as _, Deserialize, Deserializer, Serializer};
    use time::Date;

    pub fn serialize<S: Serializer>(date: &Date, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_date(*date))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Date, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_date(&raw).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, datetime};

    #[test]
    fn parses_and_formats_iso_dates() {
        let parsed = parse_date("2024-01-05").expect("valid date");
        assert_eq!(parsed, date!(2024 - 01 - 05));
        assert_eq!(format_date(parsed), "2024-01-05");
    }

    #[test]
    fn rejects_impossible_calendar_dates() {
        assert!(parse_date("2024-02-30").is_err());
        assert!(parse_date("2024-13-01").is_err());
        assert!(parse_date("not-a-date").is_err());
    }

    #[test]
    fn civil_date_respects_day_boundary_offset() {
        let now = datetime!(2024-06-01 23:30 UTC);
        assert_eq!(civil_date(now, UtcOffset::UTC), date!(2024 - 06 - 01));
        let plus_two = UtcOffset::from_hms(2, 0, 0).expect("offset");
        assert_eq!(civil_date(now, plus_two), date!(2024 - 06 - 02));
        let minus_five = UtcOffset::from_hms(-5, 0, 0).expect("offset");
        assert_eq!(civil_date(now, minus_five), date!(2024 - 06 - 01));
    }

    #[test]
    fn age_counts_whole_years_only() {
        assert_eq!(age_years(date!(1990 - 06 - 15), date!(2024 - 06 - 14)), 33);
        assert_eq!(age_years(date!(1990 - 06 - 15), date!(2024 - 06 - 15)), 34);
        assert_eq!(age_years(date!(2030 - 01 - 01), date!(2024 - 01 - 01)), 0);
    }
}

//! Parsing, formatting and storage conversion for expense timestamps.
//!
//! Timestamps are timezone-naive with UTC semantics: values arriving with an
//! explicit offset are converted to UTC, values without one are assumed to
//! already be UTC. The storage format is fixed-width text so that a SQL
//! `ORDER BY` on the column matches chronological order.

use time::{
    Date, OffsetDateTime, PrimitiveDateTime, UtcOffset,
    format_description::{BorrowedFormatItem, well_known::Iso8601},
    macros::format_description,
};

use crate::Error;

/// The fixed-width format used for the timestamp column.
///
/// Subseconds are always six digits so the column sorts lexicographically.
const SQL_TIMESTAMP_FORMAT: &[BorrowedFormatItem<'_>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second].[subsecond digits:6]");

/// Parse a client-supplied ISO 8601 timestamp string.
///
/// Accepts a date-time with an offset, a naive date-time (assumed UTC), or a
/// bare date (midnight UTC), mirroring the lenient parsers commonly used by
/// API clients.
///
/// # Errors
/// Returns an [Error::InvalidTimestamp] if `value` is not one of the accepted
/// ISO 8601 forms.
pub fn parse_timestamp(value: &str) -> Result<OffsetDateTime, Error> {
    if let Ok(date_time) = OffsetDateTime::parse(value, &Iso8601::DEFAULT) {
        return Ok(date_time.to_offset(UtcOffset::UTC));
    }

    if let Ok(date_time) = PrimitiveDateTime::parse(value, &Iso8601::DEFAULT) {
        return Ok(date_time.assume_utc());
    }

    Date::parse(value, &Iso8601::DEFAULT)
        .map(|date| date.midnight().assume_utc())
        .map_err(|_| Error::InvalidTimestamp)
}

/// Format a timestamp as the fixed-width naive-UTC text stored in the database.
///
/// # Errors
/// Returns an [Error::TimestampFormat] if the value cannot be written in the
/// storage format.
pub fn to_sql_text(timestamp: OffsetDateTime) -> Result<String, Error> {
    let utc = timestamp.to_offset(UtcOffset::UTC);

    PrimitiveDateTime::new(utc.date(), utc.time())
        .format(&SQL_TIMESTAMP_FORMAT)
        .map_err(|error| Error::TimestampFormat(error.to_string()))
}

/// Parse the fixed-width naive-UTC text stored in the database.
pub fn from_sql_text(value: &str) -> Result<OffsetDateTime, time::error::Parse> {
    PrimitiveDateTime::parse(value, &SQL_TIMESTAMP_FORMAT)
        .map(|date_time| date_time.assume_utc())
}

#[cfg(test)]
mod timestamp_tests {
    use time::macros::datetime;

    use crate::Error;

    use super::{from_sql_text, parse_timestamp, to_sql_text};

    #[test]
    fn parses_date_time_with_offset() {
        let got = parse_timestamp("2025-06-01T18:30:00+02:00").unwrap();

        assert_eq!(got, datetime!(2025-06-01 16:30:00 UTC));
    }

    #[test]
    fn parses_naive_date_time_as_utc() {
        let got = parse_timestamp("2025-06-01T18:30:00").unwrap();

        assert_eq!(got, datetime!(2025-06-01 18:30:00 UTC));
    }

    #[test]
    fn parses_bare_date_as_midnight_utc() {
        let got = parse_timestamp("2025-06-01").unwrap();

        assert_eq!(got, datetime!(2025-06-01 00:00:00 UTC));
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse_timestamp("not-a-date"), Err(Error::InvalidTimestamp));
        assert_eq!(parse_timestamp(""), Err(Error::InvalidTimestamp));
        assert_eq!(
            parse_timestamp("2025-13-40T99:99:99"),
            Err(Error::InvalidTimestamp)
        );
    }

    #[test]
    fn sql_text_round_trips() {
        let timestamp = datetime!(2025-06-01 16:30:00.123456 UTC);

        let text = to_sql_text(timestamp).unwrap();

        assert_eq!(text, "2025-06-01 16:30:00.123456");
        assert_eq!(from_sql_text(&text).unwrap(), timestamp);
    }

    #[test]
    fn sql_text_is_normalised_to_utc() {
        let timestamp = datetime!(2025-06-01 18:30:00 +02:00);

        let text = to_sql_text(timestamp).unwrap();

        assert_eq!(text, "2025-06-01 16:30:00.000000");
    }

    #[test]
    fn sql_text_orders_lexicographically() {
        let earlier = to_sql_text(datetime!(2025-06-01 16:30:00 UTC)).unwrap();
        let later = to_sql_text(datetime!(2025-06-01 16:30:00.5 UTC)).unwrap();

        assert!(earlier < later);
    }
}

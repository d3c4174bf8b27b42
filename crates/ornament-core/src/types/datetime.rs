use crate::{
    decorate::ConstructArgs,
    error::ConstructError,
    traits::{Any, Decorator, DecoratorType, ObjectKind},
    value::Value,
};
use std::{fmt, sync::OnceLock};
use time::{
    Date, OffsetDateTime, PrimitiveDateTime, UtcOffset,
    format_description::{BorrowedFormatItem, well_known::Rfc3339},
};

static DATE_FORMAT: OnceLock<Vec<BorrowedFormatItem<'static>>> = OnceLock::new();
static DATETIME_FORMAT: OnceLock<Vec<BorrowedFormatItem<'static>>> = OnceLock::new();
static OFFSET_FORMAT: OnceLock<Vec<BorrowedFormatItem<'static>>> = OnceLock::new();

// Descriptions are constants; an invalid one yields an empty format that
// never matches.
fn description(
    cell: &'static OnceLock<Vec<BorrowedFormatItem<'static>>>,
    desc: &'static str,
) -> &'static [BorrowedFormatItem<'static>] {
    cell.get_or_init(|| time::format_description::parse(desc).unwrap_or_default())
}

///
/// DateTime
///
/// Plain object type for timestamp fields. The first construction argument,
/// when given, is the UTC offset (`"+09:00"`) assumed for inputs that carry
/// no offset of their own; otherwise UTC is assumed.
///
/// Accepted sources: RFC 3339 text, `YYYY-MM-DD HH:MM:SS`, `YYYY-MM-DD`
/// (midnight) and integer unix timestamps.
///
/// Only fixed offsets are understood. Named zones such as `Asia/Tokyo`
/// are rejected as invalid construction arguments.
///

#[derive(Clone, Debug, PartialEq)]
pub struct DateTime {
    source: Value,
    at: OffsetDateTime,
}

impl DateTime {
    #[must_use]
    pub const fn at(&self) -> OffsetDateTime {
        self.at
    }

    #[must_use]
    pub const fn offset(&self) -> UtcOffset {
        self.at.offset()
    }

    /// Parse `text`, assuming `offset` when the text carries none.
    #[must_use]
    pub fn parse(text: &str, offset: UtcOffset) -> Option<OffsetDateTime> {
        let text = text.trim();

        if let Ok(at) = OffsetDateTime::parse(text, &Rfc3339) {
            return Some(at);
        }

        let datetime_format = description(
            &DATETIME_FORMAT,
            "[year]-[month]-[day] [hour]:[minute]:[second]",
        );
        if let Ok(at) = PrimitiveDateTime::parse(text, datetime_format) {
            return Some(at.assume_offset(offset));
        }

        let date_format = description(&DATE_FORMAT, "[year]-[month]-[day]");
        Date::parse(text, date_format)
            .ok()
            .map(|date| date.midnight().assume_offset(offset))
    }

    /// Parse an offset argument such as `"+09:00"`. `"Z"` and `"UTC"` are
    /// accepted as zero.
    #[must_use]
    pub fn parse_offset(text: &str) -> Option<UtcOffset> {
        let text = text.trim();
        if text.eq_ignore_ascii_case("z") || text.eq_ignore_ascii_case("utc") {
            return Some(UtcOffset::UTC);
        }

        let offset_format =
            description(&OFFSET_FORMAT, "[offset_hour sign:mandatory]:[offset_minute]");

        UtcOffset::parse(text, offset_format).ok()
    }

    fn offset_arg(args: &ConstructArgs) -> Result<UtcOffset, ConstructError> {
        match args.extra_arg(0) {
            None | Some(Value::Null) => Ok(UtcOffset::UTC),
            Some(Value::Text(text)) => {
                Self::parse_offset(text).ok_or_else(|| ConstructError::InvalidArgument {
                    index: 0,
                    message: format!("'{text}' is not a UTC offset"),
                })
            }
            Some(other) => Err(ConstructError::InvalidArgument {
                index: 0,
                message: format!("expected offset text, found '{other}'"),
            }),
        }
    }
}

impl Decorator for DateTime {
    fn path(&self) -> &'static str {
        Self::PATH
    }

    fn source(&self) -> &Value {
        &self.source
    }

    fn value(&self) -> Value {
        Value::Text(self.render())
    }

    fn render(&self) -> String {
        self.at.format(&Rfc3339).unwrap_or_default()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl DecoratorType for DateTime {
    const PATH: &'static str = "DateTime";
    const KIND: ObjectKind = ObjectKind::Plain;

    fn construct(args: ConstructArgs) -> Result<Self, ConstructError> {
        let offset = Self::offset_arg(&args)?;

        let at = match &args.source {
            Value::Text(text) => Self::parse(text, offset),
            Value::Int(secs) => OffsetDateTime::from_unix_timestamp(*secs)
                .ok()
                .and_then(|at| at.checked_to_offset(offset)),
            _ => None,
        }
        .ok_or_else(|| ConstructError::InvalidSource {
            expected: "date/time text or unix timestamp",
            found: args.source.to_string(),
        })?;

        Ok(Self {
            source: args.source,
            at,
        })
    }
}

impl fmt::Display for DateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render())
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use time::Month;

    fn construct(
        source: impl Into<Value>,
        offset: Option<&str>,
    ) -> Result<DateTime, ConstructError> {
        let args = ConstructArgs::new(source.into()).with_extra(offset.map(Value::from));

        DateTime::construct(args)
    }

    #[test]
    fn date_only_assumes_midnight_in_given_offset() {
        let dt = construct("1978-07-13", Some("+09:00")).expect("date should parse");

        assert_eq!(dt.at().date().year(), 1978);
        assert_eq!(dt.at().date().month(), Month::July);
        assert_eq!(dt.at().date().day(), 13);
        assert_eq!(dt.offset().whole_hours(), 9);
        assert_eq!(dt.render(), "1978-07-13T00:00:00+09:00");
    }

    #[test]
    fn explicit_offset_in_source_wins() {
        let dt = construct("2020-01-02T03:04:05Z", Some("+09:00")).expect("rfc3339 should parse");

        assert!(dt.offset().is_utc());
        assert_eq!(dt.render(), "2020-01-02T03:04:05Z");
    }

    #[test]
    fn sql_datetime_defaults_to_utc() {
        let dt = construct("2020-01-02 03:04:05", None).expect("sql datetime should parse");

        assert!(dt.offset().is_utc());
        assert_eq!(dt.at().hour(), 3);
    }

    #[test]
    fn unix_timestamp_is_converted_to_offset() {
        let dt = construct(0, Some("+01:00")).expect("timestamp should convert");

        assert_eq!(dt.render(), "1970-01-01T01:00:00+01:00");
    }

    #[test]
    fn timestamp_pushed_out_of_range_by_offset_is_rejected() {
        // 9999-12-31T23:59:59Z is the last supported instant
        let err = construct(253_402_300_799_i64, Some("+01:00")).expect_err("out of range");

        assert!(matches!(err, ConstructError::InvalidSource { .. }));
        assert!(construct(253_402_300_799_i64, Some("-01:00")).is_ok());
    }

    #[test]
    fn invalid_source_and_offset_are_rejected() {
        let err = construct("yesterday", None).expect_err("garbage should fail");
        assert!(matches!(err, ConstructError::InvalidSource { .. }));

        let err =
            construct("1978-07-13", Some("Asia/Tokyo")).expect_err("zone names are not offsets");
        assert_eq!(
            err,
            ConstructError::InvalidArgument {
                index: 0,
                message: "'Asia/Tokyo' is not a UTC offset".to_string(),
            }
        );
    }
}

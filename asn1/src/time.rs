//! UTCTime and GeneralizedTime.
//!
//! Only the UTC (`Z`) forms are accepted. A UTCTime two-digit year below 50
//! belongs to the 21st century, anything else to the 20th.

use std::cmp::Ordering;
use std::fmt::{self, Display};

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use der::{Node, Tag};
use kensa::decoder::{DecodableFrom, Decoder};

use crate::error::Error;

const UTC_TIME_LEN: usize = 13;
const GENERALIZED_TIME_MIN_LEN: usize = 15;
const UTC_TIME_PIVOT: u32 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Time {
    Utc(NaiveDateTime),
    Generalized(NaiveDateTime),
}

impl Time {
    pub fn naive(&self) -> NaiveDateTime {
        match self {
            Time::Utc(t) | Time::Generalized(t) => *t,
        }
    }

    pub fn to_utc(&self) -> DateTime<Utc> {
        self.naive().and_utc()
    }

    pub fn parse_utc_time(data: &[u8]) -> Result<Time, Error> {
        let body = strip_zulu(data, Error::UtcTimeInvalidFormat)?;
        if body.len() + 1 != UTC_TIME_LEN {
            return Err(Error::UtcTimeInvalidFormat);
        }
        let yy = digits(&body[0..2]).ok_or(Error::UtcTimeInvalidFormat)?;
        let year = if yy >= UTC_TIME_PIVOT { 1900 + yy } else { 2000 + yy };
        let datetime = calendar(year, &body[2..]).ok_or(Error::UtcTimeInvalidFormat)?;
        Ok(Time::Utc(datetime))
    }

    pub fn parse_generalized_time(data: &[u8]) -> Result<Time, Error> {
        let body = strip_zulu(data, Error::GeneralizedTimeInvalidFormat)?;
        if body.len() + 1 < GENERALIZED_TIME_MIN_LEN {
            return Err(Error::GeneralizedTimeInvalidFormat);
        }
        let (whole, fraction) = body.split_at(14);
        let year = digits(&whole[0..4]).ok_or(Error::GeneralizedTimeInvalidFormat)?;
        let datetime = calendar(year, &whole[4..]).ok_or(Error::GeneralizedTimeInvalidFormat)?;
        if fraction.is_empty() {
            return Ok(Time::Generalized(datetime));
        }
        let nanos = fraction_nanos(fraction).ok_or(Error::GeneralizedTimeInvalidFormat)?;
        let datetime = datetime
            .checked_add_signed(chrono::Duration::nanoseconds(nanos as i64))
            .ok_or(Error::GeneralizedTimeInvalidFormat)?;
        Ok(Time::Generalized(datetime))
    }
}

// Ordered by instant; the encoding only breaks ties.
impl Ord for Time {
    fn cmp(&self, other: &Self) -> Ordering {
        let generalized = |t: &Time| matches!(t, Time::Generalized(_));
        self.naive()
            .cmp(&other.naive())
            .then_with(|| generalized(self).cmp(&generalized(other)))
    }
}

impl PartialOrd for Time {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_utc().format("%Y-%m-%d %H:%M:%S UTC"))
    }
}

/// Returns everything before the trailing `Z`.
///
/// A missing `Z` means either an explicit offset or local time, neither of
/// which can be placed on the UTC timeline.
fn strip_zulu(data: &[u8], invalid: Error) -> Result<&[u8], Error> {
    match data.split_last() {
        Some((b'Z', body)) => Ok(body),
        Some(_) if data.iter().all(|b| b.is_ascii_digit() || b"+-.".contains(b)) => {
            Err(Error::UnsupportedTimeZone)
        }
        _ => Err(invalid),
    }
}

fn digits(data: &[u8]) -> Option<u32> {
    if data.is_empty() || !data.iter().all(u8::is_ascii_digit) {
        return None;
    }
    Some(data.iter().fold(0, |n, b| n * 10 + (b - b'0') as u32))
}

// MMDDHHMMSS after the year
fn calendar(year: u32, rest: &[u8]) -> Option<NaiveDateTime> {
    if rest.len() != 10 {
        return None;
    }
    let month = digits(&rest[0..2])?;
    let day = digits(&rest[2..4])?;
    let hour = digits(&rest[4..6])?;
    let minute = digits(&rest[6..8])?;
    let second = digits(&rest[8..10])?;
    NaiveDate::from_ymd_opt(year as i32, month, day)?.and_hms_opt(hour, minute, second)
}

// ".fff" with one to nine digits
fn fraction_nanos(fraction: &[u8]) -> Option<u32> {
    let (dot, frac) = fraction.split_first()?;
    if *dot != b'.' || frac.len() > 9 {
        return None;
    }
    let n = digits(frac)?;
    Some(n * 10u32.pow(9 - frac.len() as u32))
}

impl<'a> DecodableFrom<Node<'a>> for Time {}

impl<'a> Decoder<Node<'a>, Time> for Node<'a> {
    type Error = Error;

    fn decode(&self) -> Result<Time, Self::Error> {
        match self.tag() {
            Tag::UTC_TIME => Time::parse_utc_time(self.value()),
            Tag::GENERALIZED_TIME => Time::parse_generalized_time(self.value()),
            actual => Err(Error::UnexpectedTag {
                expected: "UTCTime or GeneralizedTime",
                actual,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Datelike, NaiveDate, Timelike};
    use der::Der;
    use kensa::decoder::Decoder;
    use rstest::rstest;

    use super::Time;
    use crate::error::Error;

    #[rstest(input, year,
        case("491231235959Z", 2049),
        case("500101000000Z", 1950),
        case("000101000000Z", 2000),
        case("991231235959Z", 1999),
        case("240101000000Z", 2024)
    )]
    fn test_utc_time_pivot(input: &str, year: i32) {
        let time = Time::parse_utc_time(input.as_bytes()).unwrap();
        assert_eq!(year, time.naive().year());
    }

    #[test]
    fn test_utc_time_fields() {
        let time = Time::parse_utc_time(b"491231235959Z").unwrap();
        let expected = NaiveDate::from_ymd_opt(2049, 12, 31)
            .unwrap()
            .and_hms_opt(23, 59, 59)
            .unwrap();
        assert_eq!(Time::Utc(expected), time);
        assert_eq!("2049-12-31 23:59:59 UTC", time.to_string());
    }

    #[rstest(input, expected,
        case("20550601120000Z", "2055-06-01 12:00:00"),
        case("19700101000000Z", "1970-01-01 00:00:00"),
        case("99991231235959Z", "9999-12-31 23:59:59")
    )]
    fn test_generalized_time(input: &str, expected: &str) {
        let time = Time::parse_generalized_time(input.as_bytes()).unwrap();
        assert_eq!(expected, time.naive().format("%Y-%m-%d %H:%M:%S").to_string());
    }

    #[test]
    fn test_generalized_time_fraction() {
        let time = Time::parse_generalized_time(b"20240229235959.25Z").unwrap();
        assert_eq!(29, time.naive().day());
        assert_eq!(250_000_000, time.naive().nanosecond());
    }

    #[rstest(input, expected,
        case("4912312359Z", Error::UtcTimeInvalidFormat),
        case("491331235959Z", Error::UtcTimeInvalidFormat),
        case("490230000000Z", Error::UtcTimeInvalidFormat),
        case("49123123595aZ", Error::UtcTimeInvalidFormat),
        case("", Error::UtcTimeInvalidFormat),
        case("491231235959+0900", Error::UnsupportedTimeZone),
        case("4912312359-0500", Error::UnsupportedTimeZone),
        case("491231235959", Error::UnsupportedTimeZone)
    )]
    fn test_utc_time_error(input: &str, expected: Error) {
        assert_eq!(Err(expected), Time::parse_utc_time(input.as_bytes()));
    }

    #[rstest(input, expected,
        case("2055060112Z", Error::GeneralizedTimeInvalidFormat),
        case("20550601120000.Z", Error::GeneralizedTimeInvalidFormat),
        case("20550601120000,5Z", Error::GeneralizedTimeInvalidFormat),
        case("20550601120000+0000", Error::UnsupportedTimeZone),
        case("20550601120000", Error::UnsupportedTimeZone)
    )]
    fn test_generalized_time_error(input: &str, expected: Error) {
        assert_eq!(Err(expected), Time::parse_generalized_time(input.as_bytes()));
    }

    #[rstest(earlier, later,
        case("20000101000000Z", "300101000000Z"),
        case("491231235959Z", "20491231235959.5Z"),
        case("491231235959Z", "20491231235959Z")
    )]
    fn test_time_ordering(earlier: &str, later: &str) {
        let parse = |s: &str| {
            if s.len() == 13 {
                Time::parse_utc_time(s.as_bytes()).unwrap()
            } else {
                Time::parse_generalized_time(s.as_bytes()).unwrap()
            }
        };
        assert!(parse(earlier) < parse(later));
        assert!(parse(later) > parse(earlier));
    }

    #[test]
    fn test_decode_time_from_node() {
        let mut input = vec![0x17, 0x0d];
        input.extend_from_slice(b"240101000000Z");
        let der = Der::parse(&input).unwrap();
        let time: Time = der.root().unwrap().decode().unwrap();
        assert!(matches!(time, Time::Utc(_)));
        assert_eq!(0, time.naive().hour());

        let der = Der::parse(&[0x02, 0x01, 0x00]).unwrap();
        let result: Result<Time, _> = der.root().unwrap().decode();
        assert!(matches!(result, Err(Error::UnexpectedTag { .. })));
    }
}

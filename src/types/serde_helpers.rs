//! Codec for Bittrex's quirky number and timestamp encodings.
//!
//! Bittrex sends monetary values either as JSON numbers or as strings, and
//! timestamps as `YYYY-MM-DDTHH:MM:SS[.fraction]` without a zone designator.
//! Every domain record decodes through the adapters in this module, so the
//! rest of the crate only sees [`Decimal`] and UTC [`OffsetDateTime`] values.
//!
//! Numbers are decoded from their textual form; with serde_json's
//! `arbitrary_precision` feature a JSON number never passes through `f64`.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serializer, de};
use serde_json::Value;
use serde_with::{DeserializeAs, SerializeAs};
use time::{Date, Month, OffsetDateTime, PrimitiveDateTime, Time, UtcOffset};

use crate::error::BittrexError;

const NANOS_DIGITS: usize = 9;

/// Parse a decimal token without loss of precision.
///
/// Accepts plain (`"0.00000001"`, `"-17"`) and scientific (`"1E-8"`) notation.
/// The token must be digits with an optional leading `-`, an optional
/// fraction and an optional exponent. Whitespace, `+` signs, digit
/// separators and bare `.5` / `5.` forms are rejected.
///
/// # Example
///
/// ```rust
/// use bittrex_api_client::types::serde_helpers::parse_decimal;
///
/// let volume = parse_decimal("74339.61396015").unwrap();
/// assert_eq!(volume.to_string(), "74339.61396015");
/// assert!(parse_decimal("12,5").is_err());
/// assert!(parse_decimal("1_000").is_err());
/// ```
pub fn parse_decimal(token: &str) -> Result<Decimal, BittrexError> {
    let malformed = || BittrexError::MalformedNumber(token.to_string());
    if !is_decimal_shape(token) {
        return Err(malformed());
    }
    let parsed = if token.contains(['e', 'E']) {
        Decimal::from_scientific(token)
    } else {
        Decimal::from_str_exact(token)
    };
    parsed.map_err(|_| malformed())
}

/// `-?digits(.digits)?([eE][+-]?digits)?`
fn is_decimal_shape(token: &str) -> bool {
    let unsigned = token.strip_prefix('-').unwrap_or(token);
    let (mantissa, exponent) = match unsigned.split_once(['e', 'E']) {
        Some((mantissa, exponent)) => (mantissa, Some(exponent)),
        None => (unsigned, None),
    };
    let (integer, fraction) = match mantissa.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (mantissa, None),
    };
    let exponent = exponent.map(|e| e.strip_prefix(['+', '-']).unwrap_or(e));

    all_digits(integer) && fraction.is_none_or(all_digits) && exponent.is_none_or(all_digits)
}

fn all_digits(part: &str) -> bool {
    !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit())
}

/// Decode a decimal from a JSON number or string token.
pub fn decimal_from_value(value: &Value) -> Result<Decimal, BittrexError> {
    match value {
        Value::String(s) => parse_decimal(s),
        Value::Number(n) => parse_decimal(&n.to_string()),
        other => Err(BittrexError::MalformedNumber(other.to_string())),
    }
}

/// Parse a Bittrex timestamp into a UTC instant.
///
/// Year, month, day, hour, minute and second have fixed widths (4 then 2).
/// The fractional part may have 1 to 9 digits and is right-padded to
/// nanoseconds, so `"30.15"` means 30 seconds and 150 milliseconds.
///
/// # Example
///
/// ```rust
/// use bittrex_api_client::types::serde_helpers::parse_timestamp;
///
/// let ts = parse_timestamp("2014-07-09T07:19:30.15").unwrap();
/// assert_eq!(ts.second(), 30);
/// assert_eq!(ts.millisecond(), 150);
/// ```
pub fn parse_timestamp(token: &str) -> Result<OffsetDateTime, BittrexError> {
    let malformed = || BittrexError::MalformedTimestamp(token.to_string());

    let (date, clock) = token.split_once('T').ok_or_else(malformed)?;
    let date_parts: Vec<&str> = date.split('-').collect();
    let clock_parts: Vec<&str> = clock.split(':').collect();
    if date_parts.len() != 3 || clock_parts.len() != 3 {
        return Err(malformed());
    }

    let (seconds, fraction) = match clock_parts[2].split_once('.') {
        Some((seconds, fraction)) => (seconds, Some(fraction)),
        None => (clock_parts[2], None),
    };

    let year: i32 = fixed_digits(date_parts[0], 4).ok_or_else(malformed)?;
    let month: u8 = fixed_digits(date_parts[1], 2).ok_or_else(malformed)?;
    let day: u8 = fixed_digits(date_parts[2], 2).ok_or_else(malformed)?;
    let hour: u8 = fixed_digits(clock_parts[0], 2).ok_or_else(malformed)?;
    let minute: u8 = fixed_digits(clock_parts[1], 2).ok_or_else(malformed)?;
    let second: u8 = fixed_digits(seconds, 2).ok_or_else(malformed)?;

    let nanos = match fraction {
        None => 0,
        Some(f) if f.len() <= NANOS_DIGITS => {
            let value: u32 = fixed_digits(f, f.len()).ok_or_else(malformed)?;
            value * 10u32.pow((NANOS_DIGITS - f.len()) as u32)
        }
        Some(_) => return Err(malformed()),
    };

    let month = Month::try_from(month).map_err(|_| malformed())?;
    let date = Date::from_calendar_date(year, month, day).map_err(|_| malformed())?;
    let time = Time::from_hms_nano(hour, minute, second, nanos).map_err(|_| malformed())?;

    Ok(PrimitiveDateTime::new(date, time).assume_utc())
}

/// Format a UTC instant the way Bittrex does, trimming trailing fraction zeros.
pub fn format_timestamp(ts: OffsetDateTime) -> String {
    let ts = ts.to_offset(UtcOffset::UTC);
    let mut out = format!(
        "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}",
        ts.year(),
        u8::from(ts.month()),
        ts.day(),
        ts.hour(),
        ts.minute(),
        ts.second()
    );
    if ts.nanosecond() != 0 {
        let fraction = format!("{:09}", ts.nanosecond());
        out.push('.');
        out.push_str(fraction.trim_end_matches('0'));
    }
    out
}

/// Parse an all-digit token of exactly `width` digits.
fn fixed_digits<T: std::str::FromStr>(part: &str, width: usize) -> Option<T> {
    if part.len() != width || !all_digits(part) {
        return None;
    }
    part.parse().ok()
}

/// `serde_with` adapter decoding a number-or-string token into a [`Decimal`].
///
/// # Example
///
/// ```rust
/// use rust_decimal::Decimal;
/// use serde::Deserialize;
/// use serde_with::serde_as;
/// use bittrex_api_client::types::serde_helpers::BittrexDecimal;
///
/// #[serde_as]
/// #[derive(Deserialize)]
/// struct Ticker {
///     #[serde_as(as = "BittrexDecimal")]
///     #[serde(rename = "Bid")]
///     bid: Decimal,
///     #[serde_as(as = "Option<BittrexDecimal>")]
///     #[serde(rename = "Last")]
///     last: Option<Decimal>,
/// }
///
/// let ticker: Ticker = serde_json::from_str(r#"{"Bid":"0.00000820","Last":null}"#).unwrap();
/// assert_eq!(ticker.bid.to_string(), "0.00000820");
/// assert!(ticker.last.is_none());
/// ```
pub struct BittrexDecimal;

impl<'de> DeserializeAs<'de, Decimal> for BittrexDecimal {
    fn deserialize_as<D>(deserializer: D) -> Result<Decimal, D::Error>
    where
        D: Deserializer<'de>,
    {
        let token = Value::deserialize(deserializer)?;
        decimal_from_value(&token).map_err(de::Error::custom)
    }
}

impl SerializeAs<Decimal> for BittrexDecimal {
    fn serialize_as<S>(source: &Decimal, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(source)
    }
}

/// `serde_with` adapter decoding a Bittrex timestamp string into a UTC [`OffsetDateTime`].
pub struct BittrexTimestamp;

impl<'de> DeserializeAs<'de, OffsetDateTime> for BittrexTimestamp {
    fn deserialize_as<D>(deserializer: D) -> Result<OffsetDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::String(s) => parse_timestamp(&s).map_err(de::Error::custom),
            other => Err(de::Error::custom(BittrexError::MalformedTimestamp(
                other.to_string(),
            ))),
        }
    }
}

impl SerializeAs<OffsetDateTime> for BittrexTimestamp {
    fn serialize_as<S>(source: &OffsetDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format_timestamp(*source))
    }
}

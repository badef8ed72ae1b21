//! Typed values stored in IFD entries, and how they're shown to people.

use exif_tree_types::exif::primitives::{PrimitiveTy, Rational, SRational};

use crate::{error::ExifFieldError, undefined::UndefinedValue};

/// A decoded value.
///
/// Each variant holds every unit from the entry. `Ascii` and `AsciiNoNul`
/// hold the string without any trailing NUL.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Bytes(Vec<u8>),
    Ascii(String),
    AsciiNoNul(String),
    Shorts(Vec<u16>),
    Longs(Vec<u32>),
    Rationals(Vec<Rational>),
    SLongs(Vec<i32>),
    SRationals(Vec<SRational>),
    Floats(Vec<f32>),
    Doubles(Vec<f64>),

    /// An opaque payload, decoded by a registered codec.
    Undefined(UndefinedValue),
}

impl Value {
    /// The type this value is stored as.
    pub fn ty(&self) -> PrimitiveTy {
        match self {
            Value::Bytes(_) => PrimitiveTy::Byte,
            Value::Ascii(_) => PrimitiveTy::Ascii,
            Value::AsciiNoNul(_) => PrimitiveTy::AsciiNoNul,
            Value::Shorts(_) => PrimitiveTy::Short,
            Value::Longs(_) => PrimitiveTy::Long,
            Value::Rationals(_) => PrimitiveTy::Rational,
            Value::SLongs(_) => PrimitiveTy::SLong,
            Value::SRationals(_) => PrimitiveTy::SRational,
            Value::Floats(_) => PrimitiveTy::Float,
            Value::Doubles(_) => PrimitiveTy::Double,
            Value::Undefined(_) => PrimitiveTy::Undefined,
        }
    }

    /// Renders the whole value.
    ///
    /// Numeric lists are always bracketed (`[1 2]`, `[4/1]`), bytes are
    /// uppercase hex (`02 03 00 00`), and strings are printed as-is.
    pub fn format(&self) -> String {
        match self {
            Value::Bytes(b) => dump_bytes(b),
            Value::Ascii(s) | Value::AsciiNoNul(s) => s.clone(),
            Value::Shorts(v) => bracketed(v),
            Value::Longs(v) => bracketed(v),
            Value::Rationals(v) => bracketed(v),
            Value::SLongs(v) => bracketed(v),
            Value::SRationals(v) => bracketed(v),
            Value::Floats(v) => bracketed(v),
            Value::Doubles(v) => bracketed(v),
            Value::Undefined(u) => u.to_string(),
        }
    }

    /// Renders just the first unit, with `...` if there are more.
    ///
    /// Strings and `Undefined` values are rendered whole.
    pub fn format_first(&self) -> String {
        match self {
            Value::Bytes(b) => first(b, |byte| format!("0x{byte:02x}")),
            Value::Ascii(s) | Value::AsciiNoNul(s) => s.clone(),
            Value::Shorts(v) => first(v, ToString::to_string),
            Value::Longs(v) => first(v, ToString::to_string),
            Value::Rationals(v) => first(v, ToString::to_string),
            Value::SLongs(v) => first(v, ToString::to_string),
            Value::SRationals(v) => first(v, ToString::to_string),
            Value::Floats(v) => first(v, ToString::to_string),
            Value::Doubles(v) => first(v, ToString::to_string),
            Value::Undefined(u) => u.to_string(),
        }
    }
}

impl core::fmt::Display for Value {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.format())
    }
}

fn bracketed<T: core::fmt::Display>(values: &[T]) -> String {
    let inner = values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ");
    format!("[{inner}]")
}

fn first<T>(values: &[T], show: impl Fn(&T) -> String) -> String {
    match values {
        [] => String::new(),
        [only] => show(only),
        [head, ..] => format!("{}...", show(head)),
    }
}

/// Uppercase, space-separated hex.
///
/// ```
/// assert_eq!(exif_tree::value::dump_bytes(&[0x02, 0x03, 0xab]), "02 03 AB");
/// ```
pub fn dump_bytes(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02X}"))
        .collect::<Vec<_>>()
        .join(" ")
}

macro_rules! value_from {
    ($( $variant:ident => $ty:ty ; )+) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::$variant(value)
                }
            }
        )+
    };
}

value_from! {
    Bytes => Vec<u8>;
    Ascii => String;
    Shorts => Vec<u16>;
    Longs => Vec<u32>;
    Rationals => Vec<Rational>;
    SLongs => Vec<i32>;
    SRationals => Vec<SRational>;
    Floats => Vec<f32>;
    Doubles => Vec<f64>;
    Undefined => UndefinedValue;
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Ascii(value.to_string())
    }
}

impl From<ExifTimestamp> for Value {
    fn from(value: ExifTimestamp) -> Self {
        Value::Ascii(value.to_string())
    }
}

/// A date and time, as Exif stores them: `YYYY:MM:DD HH:MM:SS`.
///
/// There's no time zone. The default value (all zeroes) stands in for "no
/// time".
#[derive(Clone, Copy, Debug, Default, Hash, PartialEq, PartialOrd, Eq, Ord)]
pub struct ExifTimestamp {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl ExifTimestamp {
    /// Whether this is the zero sentinel.
    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }
}

impl core::fmt::Display for ExifTimestamp {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "{:04}:{:02}:{:02} {:02}:{:02}:{:02}",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        )
    }
}

impl core::str::FromStr for ExifTimestamp {
    type Err = ExifFieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fail = || ExifFieldError::ParseFail {
            ty: PrimitiveTy::Ascii,
            input: s.to_string(),
        };

        let (date, time) = s.trim_end_matches('\0').split_once(' ').ok_or_else(fail)?;

        let mut date_parts = date.split(':');
        let mut time_parts = time.split(':');
        let next = |parts: &mut core::str::Split<'_, char>| -> Result<u16, ExifFieldError> {
            parts
                .next()
                .and_then(|p| p.trim().parse::<u16>().ok())
                .ok_or_else(fail)
        };

        let year = next(&mut date_parts)?;
        let month = next(&mut date_parts)?;
        let day = next(&mut date_parts)?;
        let hour = next(&mut time_parts)?;
        let minute = next(&mut time_parts)?;
        let second = next(&mut time_parts)?;

        if date_parts.next().is_some() || time_parts.next().is_some() {
            return Err(fail());
        }

        let small = |v: u16| u8::try_from(v).map_err(|_| fail());
        Ok(Self {
            year,
            month: small(month)?,
            day: small(day)?,
            hour: small(hour)?,
            minute: small(minute)?,
            second: small(second)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{ExifTimestamp, Value};
    use exif_tree_types::exif::primitives::{Rational, SRational};

    #[test]
    fn numeric_lists_are_bracketed() {
        assert_eq!(Value::Shorts(vec![1, 2]).format(), "[1 2]");
        assert_eq!(Value::Longs(vec![1600]).format(), "[1600]");
        assert_eq!(
            Value::Rationals(vec![Rational::new(4, 1)]).format(),
            "[4/1]"
        );
        assert_eq!(
            Value::SRationals(vec![SRational::new(-1, 2), SRational::new(3, 4)]).format(),
            "[-1/2 3/4]"
        );
        assert_eq!(Value::Doubles(vec![1.5, 2.0]).format(), "[1.5 2]");
    }

    #[test]
    fn bytes_are_hex() {
        assert_eq!(
            Value::Bytes(vec![1, 2, 3, 4, 5, 6, 7, 8]).format(),
            "01 02 03 04 05 06 07 08"
        );
        assert_eq!(Value::Bytes(vec![0xab]).format_first(), "0xab");
    }

    #[test]
    fn format_first_shows_only_the_head() {
        assert_eq!(Value::Shorts(vec![1, 2, 3]).format_first(), "1...");
        assert_eq!(Value::Longs(vec![7]).format_first(), "7");
        assert_eq!(Value::Longs(vec![]).format_first(), "");
        assert_eq!(Value::Ascii("abc".into()).format_first(), "abc");
    }

    #[test]
    fn timestamp_round_trip() {
        let ts: ExifTimestamp = "2018:04:29 01:22:57".parse().unwrap();
        assert_eq!(
            ts,
            ExifTimestamp {
                year: 2018,
                month: 4,
                day: 29,
                hour: 1,
                minute: 22,
                second: 57,
            }
        );
        assert_eq!(ts.to_string(), "2018:04:29 01:22:57");

        assert!(ExifTimestamp::default().is_zero());
        assert!("2018:04:29".parse::<ExifTimestamp>().is_err());
    }
}

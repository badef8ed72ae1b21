//! Turns bytes into primitive values, and back again.
//!
//! Every `parse_*` function takes the bytes, the number of units to read, and
//! the byte order. Extra bytes past the units are ignored. Too few bytes is an
//! [`ExifFieldError::InsufficientBytes`].

use winnow::{
    Parser as _,
    binary::{Endianness as WinnowEndianness, f32, f64, i32, u16, u32},
    combinator::repeat,
    error::EmptyError,
    token::any,
};

use exif_tree_types::exif::{
    Endianness,
    primitives::{PrimitiveTy, Rational, SRational},
};

use crate::{
    error::{EncodeResult, ExifFieldError, ExifFieldResult},
    undefined,
    value::Value,
};

pub(crate) const fn winnow_endianness(endianness: Endianness) -> WinnowEndianness {
    match endianness {
        Endianness::Little => WinnowEndianness::Little,
        Endianness::Big => WinnowEndianness::Big,
    }
}

/// How many bytes `unit_count` units of `ty` take up.
///
/// `Undefined` counts as one byte per unit.
pub fn byte_len(ty: PrimitiveTy, unit_count: u32) -> ExifFieldResult<u32> {
    ty.unit_size()
        .checked_mul(unit_count)
        .ok_or(ExifFieldError::UnitCountOverflow { ty, unit_count })
}

/// Cuts `bytes` down to exactly the units asked for.
fn units(bytes: &[u8], ty: PrimitiveTy, unit_count: u32) -> ExifFieldResult<&[u8]> {
    let needed = byte_len(ty, unit_count)? as usize;

    bytes
        .get(..needed)
        .ok_or(ExifFieldError::InsufficientBytes {
            ty,
            needed,
            got: bytes.len(),
        })
        .inspect_err(|e| log::debug!("Can't parse units. err: {e}"))
}

/// Runs `item` `unit_count` times over exactly the needed bytes.
fn parse_units<'i, O>(
    bytes: &'i [u8],
    ty: PrimitiveTy,
    unit_count: u32,
    item: impl winnow::Parser<&'i [u8], O, EmptyError>,
) -> ExifFieldResult<Vec<O>> {
    let mut input: &'i [u8] = units(bytes, ty, unit_count)?;
    let got = input.len();

    repeat(unit_count as usize, item)
        .parse_next(&mut input)
        .map_err(|_: EmptyError| ExifFieldError::InsufficientBytes {
            ty,
            needed: byte_len(ty, unit_count).unwrap_or(u32::MAX) as usize,
            got,
        })
}

pub fn parse_bytes(bytes: &[u8], unit_count: u32) -> ExifFieldResult<Vec<u8>> {
    parse_units(bytes, PrimitiveTy::Byte, unit_count, any)
}

/// Parses an ASCII string.
///
/// The final NUL is removed if it's there. Plenty of writers forget it, so
/// it's fine if it's missing.
pub fn parse_ascii(bytes: &[u8], unit_count: u32) -> ExifFieldResult<String> {
    let raw = units(bytes, PrimitiveTy::Ascii, unit_count)?;

    let raw = match raw.split_last() {
        Some((0, rest)) => rest,
        _ => {
            log::trace!("ASCII value has no NUL terminator. Using all bytes.");
            raw
        }
    };

    Ok(String::from_utf8_lossy(raw).into_owned())
}

/// Parses text that never had a NUL, keeping every byte.
pub fn parse_ascii_no_nul(bytes: &[u8], unit_count: u32) -> ExifFieldResult<String> {
    let raw = units(bytes, PrimitiveTy::AsciiNoNul, unit_count)?;
    Ok(String::from_utf8_lossy(raw).into_owned())
}

pub fn parse_shorts(
    bytes: &[u8],
    unit_count: u32,
    endianness: Endianness,
) -> ExifFieldResult<Vec<u16>> {
    let e = winnow_endianness(endianness);
    parse_units(bytes, PrimitiveTy::Short, unit_count, u16(e))
}

pub fn parse_longs(
    bytes: &[u8],
    unit_count: u32,
    endianness: Endianness,
) -> ExifFieldResult<Vec<u32>> {
    let e = winnow_endianness(endianness);
    parse_units(bytes, PrimitiveTy::Long, unit_count, u32(e))
}

pub fn parse_slongs(
    bytes: &[u8],
    unit_count: u32,
    endianness: Endianness,
) -> ExifFieldResult<Vec<i32>> {
    let e = winnow_endianness(endianness);
    parse_units(bytes, PrimitiveTy::SLong, unit_count, i32(e))
}

pub fn parse_rationals(
    bytes: &[u8],
    unit_count: u32,
    endianness: Endianness,
) -> ExifFieldResult<Vec<Rational>> {
    let e = winnow_endianness(endianness);
    parse_units(
        bytes,
        PrimitiveTy::Rational,
        unit_count,
        (u32(e), u32(e)).map(|(n, d)| Rational::new(n, d)),
    )
}

pub fn parse_srationals(
    bytes: &[u8],
    unit_count: u32,
    endianness: Endianness,
) -> ExifFieldResult<Vec<SRational>> {
    let e = winnow_endianness(endianness);
    parse_units(
        bytes,
        PrimitiveTy::SRational,
        unit_count,
        (i32(e), i32(e)).map(|(n, d)| SRational::new(n, d)),
    )
}

pub fn parse_floats(
    bytes: &[u8],
    unit_count: u32,
    endianness: Endianness,
) -> ExifFieldResult<Vec<f32>> {
    let e = winnow_endianness(endianness);
    parse_units(bytes, PrimitiveTy::Float, unit_count, f32(e))
}

pub fn parse_doubles(
    bytes: &[u8],
    unit_count: u32,
    endianness: Endianness,
) -> ExifFieldResult<Vec<f64>> {
    let e = winnow_endianness(endianness);
    parse_units(bytes, PrimitiveTy::Double, unit_count, f64(e))
}

/// Parses any primitive type into a [`Value`].
///
/// `Undefined` isn't accepted: its payloads are read by the codecs in
/// [`crate::undefined`].
pub fn parse_value(
    ty: PrimitiveTy,
    bytes: &[u8],
    unit_count: u32,
    endianness: Endianness,
) -> ExifFieldResult<Value> {
    Ok(match ty {
        PrimitiveTy::Byte => Value::Bytes(parse_bytes(bytes, unit_count)?),
        PrimitiveTy::Ascii => Value::Ascii(parse_ascii(bytes, unit_count)?),
        PrimitiveTy::AsciiNoNul => Value::AsciiNoNul(parse_ascii_no_nul(bytes, unit_count)?),
        PrimitiveTy::Short => Value::Shorts(parse_shorts(bytes, unit_count, endianness)?),
        PrimitiveTy::Long => Value::Longs(parse_longs(bytes, unit_count, endianness)?),
        PrimitiveTy::Rational => {
            Value::Rationals(parse_rationals(bytes, unit_count, endianness)?)
        }
        PrimitiveTy::SLong => Value::SLongs(parse_slongs(bytes, unit_count, endianness)?),
        PrimitiveTy::SRational => {
            Value::SRationals(parse_srationals(bytes, unit_count, endianness)?)
        }
        PrimitiveTy::Float => Value::Floats(parse_floats(bytes, unit_count, endianness)?),
        PrimitiveTy::Double => Value::Doubles(parse_doubles(bytes, unit_count, endianness)?),
        PrimitiveTy::Undefined => return Err(ExifFieldError::UndefinedNeedsCodec),
    })
}

/// A value in its on-disk form.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct EncodedData {
    /// The type written into the entry.
    pub ty: PrimitiveTy,

    pub bytes: Vec<u8>,

    /// The count written into the entry. For ASCII, this includes the NUL.
    pub unit_count: u32,
}

fn encode_all<T: Copy, const N: usize>(values: &[T], to: impl Fn(T) -> [u8; N]) -> Vec<u8> {
    values.iter().flat_map(|v| to(*v)).collect()
}

fn count_of(len: usize, ty: PrimitiveTy) -> ExifFieldResult<u32> {
    u32::try_from(len).map_err(|_| ExifFieldError::UnitCountOverflow {
        ty,
        unit_count: u32::MAX,
    })
}

/// Encodes a value in the given byte order.
///
/// ASCII gets exactly one trailing NUL, which is counted. `Undefined` values
/// go through the registered encoder for their kind.
pub fn encode_value(value: &Value, endianness: Endianness) -> EncodeResult<EncodedData> {
    let e = endianness;
    let ty = value.ty();

    let (bytes, unit_count) = match value {
        Value::Bytes(v) => (v.clone(), count_of(v.len(), ty)?),
        Value::Ascii(s) => {
            let mut bytes = s.as_bytes().to_vec();
            bytes.push(0);
            let count = count_of(bytes.len(), ty)?;
            (bytes, count)
        }
        Value::AsciiNoNul(s) => (s.as_bytes().to_vec(), count_of(s.len(), ty)?),
        Value::Shorts(v) => (encode_all(v, |x| e.u16_to_bytes(x)), count_of(v.len(), ty)?),
        Value::Longs(v) => (encode_all(v, |x| e.u32_to_bytes(x)), count_of(v.len(), ty)?),
        Value::SLongs(v) => (encode_all(v, |x| e.i32_to_bytes(x)), count_of(v.len(), ty)?),
        Value::Rationals(v) => (
            v.iter()
                .flat_map(|r| [e.u32_to_bytes(r.numerator), e.u32_to_bytes(r.denominator)])
                .flatten()
                .collect(),
            count_of(v.len(), ty)?,
        ),
        Value::SRationals(v) => (
            v.iter()
                .flat_map(|r| [e.i32_to_bytes(r.numerator), e.i32_to_bytes(r.denominator)])
                .flatten()
                .collect(),
            count_of(v.len(), ty)?,
        ),
        Value::Floats(v) => (encode_all(v, |x| e.f32_to_bytes(x)), count_of(v.len(), ty)?),
        Value::Doubles(v) => (encode_all(v, |x| e.f64_to_bytes(x)), count_of(v.len(), ty)?),
        Value::Undefined(u) => undefined::encode(u, endianness)
            .inspect_err(|err| log::error!("Failed to encode undefined value `{u}`. err: {err}"))?,
    };

    // the AsciiNoNul pseudo-type is stored as plain ASCII
    let ty = match ty {
        PrimitiveTy::AsciiNoNul => PrimitiveTy::Ascii,
        other => other,
    };

    Ok(EncodedData {
        ty,
        bytes,
        unit_count,
    })
}

/// Parses a person-written string into a value of the given type.
///
/// Lists are separated by whitespace or commas. Rationals are written as
/// `numerator/denominator`.
///
/// ```
/// use exif_tree::{codec::translate_string_to_value, value::Value};
/// use exif_tree_types::exif::primitives::{PrimitiveTy, Rational};
///
/// assert_eq!(
///     translate_string_to_value(PrimitiveTy::Rational, "72/1").unwrap(),
///     Value::Rationals(vec![Rational::new(72, 1)])
/// );
/// assert_eq!(
///     translate_string_to_value(PrimitiveTy::Short, "1 2").unwrap(),
///     Value::Shorts(vec![1, 2])
/// );
/// ```
pub fn translate_string_to_value(ty: PrimitiveTy, input: &str) -> ExifFieldResult<Value> {
    let fail = || ExifFieldError::ParseFail {
        ty,
        input: input.to_string(),
    };

    fn each<T>(input: &str, parse: impl Fn(&str) -> Option<T>) -> Option<Vec<T>> {
        input
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|p| !p.is_empty())
            .map(parse)
            .collect()
    }

    fn fraction<T: core::str::FromStr>(part: &str) -> Option<(T, T)> {
        let (n, d) = part.split_once('/')?;
        Some((n.trim().parse().ok()?, d.trim().parse().ok()?))
    }

    let value = match ty {
        PrimitiveTy::Ascii => Some(Value::Ascii(input.to_string())),
        PrimitiveTy::AsciiNoNul => Some(Value::AsciiNoNul(input.to_string())),
        PrimitiveTy::Byte => each(input, |p| {
            let p = p.trim_start_matches("0x");
            u8::from_str_radix(p, 16).ok()
        })
        .map(Value::Bytes),
        PrimitiveTy::Short => each(input, |p| p.parse().ok()).map(Value::Shorts),
        PrimitiveTy::Long => each(input, |p| p.parse().ok()).map(Value::Longs),
        PrimitiveTy::SLong => each(input, |p| p.parse().ok()).map(Value::SLongs),
        PrimitiveTy::Float => each(input, |p| p.parse().ok()).map(Value::Floats),
        PrimitiveTy::Double => each(input, |p| p.parse().ok()).map(Value::Doubles),
        PrimitiveTy::Rational => each(input, |p| {
            fraction::<u32>(p).map(|(n, d)| Rational::new(n, d))
        })
        .map(Value::Rationals),
        PrimitiveTy::SRational => each(input, |p| {
            fraction::<i32>(p).map(|(n, d)| SRational::new(n, d))
        })
        .map(Value::SRationals),
        PrimitiveTy::Undefined => {
            log::error!("Can't translate a string into an undefined value.");
            return Err(ExifFieldError::UndefinedNeedsCodec);
        }
    };

    value.ok_or_else(fail)
}

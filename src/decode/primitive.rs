//! Token to number conversions.
//!
//! Every function is strict and returns a `DecodeError` naming the field.
//! [`apply`] turns a failure into zero for fields decoded with
//! [`Policy::Lenient`].

use std::str::FromStr;

use super::{Policy, ValueKind};
use crate::error::DecodeError;

fn invalid(field: &'static str, kind: ValueKind, token: &str) -> DecodeError {
    DecodeError::InvalidValue {
        field,
        kind,
        token: token.to_string(),
    }
}

fn decimal<T: FromStr>(
    field: &'static str,
    kind: ValueKind,
    token: &str,
) -> Result<T, DecodeError> {
    token.parse().map_err(|_| invalid(field, kind, token))
}

/// Signed 64-bit decimal.
pub fn int(field: &'static str, token: &str) -> Result<i64, DecodeError> {
    decimal(field, ValueKind::Int, token)
}

/// One signed decimal of a whitespace separated list, as in `Groups`.
pub fn int_list_item(field: &'static str, token: &str) -> Result<i64, DecodeError> {
    decimal(field, ValueKind::IntList, token)
}

/// Unsigned 64-bit decimal.
pub fn uint(field: &'static str, token: &str) -> Result<u64, DecodeError> {
    decimal(field, ValueKind::Uint, token)
}

/// 64-bit IEEE-754 float.
pub fn float(field: &'static str, token: &str) -> Result<f64, DecodeError> {
    decimal(field, ValueKind::Float, token)
}

/// Unsigned 8-bit decimal.
pub fn byte(field: &'static str, token: &str) -> Result<u8, DecodeError> {
    decimal(field, ValueKind::Byte, token)
}

/// Unsigned 64-bit, base 16, no `0x` prefix.
pub fn hex_uint(field: &'static str, token: &str) -> Result<u64, DecodeError> {
    u64::from_str_radix(token, 16).map_err(|_| invalid(field, ValueKind::HexUint, token))
}

/// Unsigned 32-bit, base 16. Used for words of affinity masks.
pub fn hex_u32(field: &'static str, token: &str) -> Result<u32, DecodeError> {
    u32::from_str_radix(token, 16).map_err(|_| invalid(field, ValueKind::HexList, token))
}

/// Size in KB from a "N [unit]" value.
///
/// Only the first token is the magnitude. A trailing `MB` multiplies by
/// 1024; `kB`, `KB` or no unit at all mean KB already.
pub fn size_kb(field: &'static str, value: &str) -> Result<u64, DecodeError> {
    let mut tokens = value.split_whitespace();
    let magnitude = tokens
        .next()
        .ok_or_else(|| invalid(field, ValueKind::Size, value))?;
    let kb = magnitude
        .parse::<u64>()
        .map_err(|_| invalid(field, ValueKind::Size, value))?;

    if value.trim_end().ends_with("MB") {
        Ok(kb.saturating_mul(1024))
    } else {
        Ok(kb)
    }
}

/// Decimal "a/b" pair, as in `1/25` or a signal queue `0/63432`.
pub fn pair(field: &'static str, token: &str) -> Result<(u64, u64), DecodeError> {
    let half = |h: &str| decimal(field, ValueKind::Pair, h.trim());
    let mut halves = token.split('/');
    match (halves.next(), halves.next(), halves.next()) {
        (Some(a), Some(b), None) => Ok((half(a)?, half(b)?)),
        _ => Err(DecodeError::MalformedPair {
            field,
            token: token.to_string(),
        }),
    }
}

/// Applies `policy` to a strict decode result.
pub fn apply<T: Default>(
    result: Result<T, DecodeError>,
    policy: Policy,
) -> Result<T, DecodeError> {
    match policy {
        Policy::Fatal => result,
        Policy::Lenient => Ok(result.unwrap_or_default()),
    }
}

//! TTL Parsing
//!
//! Parses caller-supplied durations such as `300ms`, `1.5h` or `2h45m` and
//! decides what an unusable duration means.

use std::time::Duration;

use thiserror::Error;
use tracing::debug;

use crate::error::{CacheError, Result};

// == Parse Error ==
#[derive(Error, Debug, PartialEq, Eq)]
pub enum TtlParseError {
    #[error("empty duration")]
    Empty,

    #[error("invalid duration {0:?}")]
    Invalid(String),

    #[error("missing unit in duration {0:?}")]
    MissingUnit(String),

    #[error("unknown unit {unit:?} in duration {input:?}")]
    UnknownUnit { unit: String, input: String },

    #[error("negative duration {0:?}")]
    Negative(String),

    #[error("duration {0:?} out of range")]
    Overflow(String),
}

fn unit_nanos(unit: &str) -> Option<u128> {
    let nanos = match unit {
        "ns" => 1,
        "us" | "µs" | "μs" => 1_000,
        "ms" => 1_000_000,
        "s" => 1_000_000_000,
        "m" => 60 * 1_000_000_000,
        "h" => 3_600 * 1_000_000_000,
        _ => return None,
    };
    Some(nanos)
}

// == Parse Duration ==
/// Parses a duration made of `<decimal><unit>` segments.
///
/// Units are `ns`, `us` (or `µs`), `ms`, `s`, `m` and `h`. A bare `0` is
/// accepted. Fractions are truncated to whole nanoseconds.
pub fn parse_duration(input: &str) -> std::result::Result<Duration, TtlParseError> {
    let invalid = || TtlParseError::Invalid(input.to_string());

    let mut rest = input;
    let mut negative = false;
    if let Some(stripped) = rest.strip_prefix('-') {
        negative = true;
        rest = stripped;
    } else if let Some(stripped) = rest.strip_prefix('+') {
        rest = stripped;
    }

    if rest == "0" {
        return Ok(Duration::ZERO);
    }
    if rest.is_empty() {
        return Err(if input.is_empty() {
            TtlParseError::Empty
        } else {
            invalid()
        });
    }

    let mut total: u128 = 0;
    while !rest.is_empty() {
        let int_len = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
        let (int_part, after_int) = rest.split_at(int_len);

        let (frac_part, after_number) = match after_int.strip_prefix('.') {
            Some(after_dot) => {
                let frac_len = after_dot
                    .find(|c: char| !c.is_ascii_digit())
                    .unwrap_or(after_dot.len());
                after_dot.split_at(frac_len)
            }
            None => ("", after_int),
        };
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(invalid());
        }

        let unit_len = after_number
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(after_number.len());
        let (unit, tail) = after_number.split_at(unit_len);
        if unit.is_empty() {
            return Err(TtlParseError::MissingUnit(input.to_string()));
        }
        let scale = unit_nanos(unit).ok_or_else(|| TtlParseError::UnknownUnit {
            unit: unit.to_string(),
            input: input.to_string(),
        })?;

        let overflow = || TtlParseError::Overflow(input.to_string());
        let whole: u128 = if int_part.is_empty() {
            0
        } else {
            int_part.parse().map_err(|_| overflow())?
        };
        let mut segment = whole.checked_mul(scale).ok_or_else(overflow)?;

        // Fractional digits beyond nanosecond precision contribute nothing.
        let mut place = scale;
        for digit in frac_part.bytes() {
            place /= 10;
            if place == 0 {
                break;
            }
            segment += u128::from(digit - b'0') * place;
        }

        total = total.checked_add(segment).ok_or_else(overflow)?;
        rest = tail;
    }

    if negative && total > 0 {
        return Err(TtlParseError::Negative(input.to_string()));
    }

    let secs = u64::try_from(total / 1_000_000_000)
        .map_err(|_| TtlParseError::Overflow(input.to_string()))?;
    let nanos = (total % 1_000_000_000) as u32;
    Ok(Duration::new(secs, nanos))
}

// == TTL Policy ==
/// What to do with a TTL that cannot be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TtlPolicy {
    /// Unparsable or negative TTLs mean "no expiration"
    #[default]
    Lenient,
    /// Unparsable or negative TTLs are rejected
    Strict,
}

impl TtlPolicy {
    /// Parses a policy name, case-insensitively.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "lenient" => Some(TtlPolicy::Lenient),
            "strict" => Some(TtlPolicy::Strict),
            _ => None,
        }
    }

    /// Resolves caller text into a TTL; `None` means the entry never expires.
    pub fn resolve(&self, raw: Option<&str>) -> Result<Option<Duration>> {
        let Some(text) = raw.filter(|t| !t.is_empty()) else {
            return Ok(None);
        };

        match parse_duration(text) {
            Ok(ttl) if ttl.is_zero() => Ok(None),
            Ok(ttl) => Ok(Some(ttl)),
            Err(e) => match self {
                TtlPolicy::Lenient => {
                    debug!("Ignoring unusable ttl, entry will not expire: {}", e);
                    Ok(None)
                }
                TtlPolicy::Strict => Err(CacheError::InvalidArgument(format!("invalid ttl: {}", e))),
            },
        }
    }
}

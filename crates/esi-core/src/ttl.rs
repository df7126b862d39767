//! TTL strings with unit suffixes.

use tracing::warn;

use crate::error::{EsiError, EsiResult};

const MINUTE: u64 = 60;
const HOUR: u64 = 60 * MINUTE;
const DAY: u64 = 24 * HOUR;
const WEEK: u64 = 7 * DAY;

/// Parse a TTL string into seconds.
///
/// Accepts a decimal number with an optional single-letter unit suffix:
/// `w` (weeks), `d` (days), `h` (hours), `m` (minutes), `s` or no suffix
/// (seconds). Whitespace between number and unit is allowed. An unknown
/// lowercase letter counts as seconds with a warning; anything else is an
/// error. The result is rounded to the nearest whole second.
///
/// ```
/// use esi_core::parse_ttl;
/// assert_eq!(parse_ttl("1w").unwrap(), 604_800);
/// assert_eq!(parse_ttl("1.5h").unwrap(), 5_400);
/// assert_eq!(parse_ttl("90").unwrap(), 90);
/// ```
pub fn parse_ttl(input: &str) -> EsiResult<u64> {
    let trimmed = input.trim();
    let split = trimmed
        .find(|c: char| !c.is_ascii_digit() && c != '.')
        .unwrap_or(trimmed.len());
    let (number, unit) = trimmed.split_at(split);
    let unit = unit.trim_start();

    let value: f64 = number
        .parse()
        .map_err(|_| EsiError::InvalidTtl(input.to_string()))?;

    let multiplier = match unit {
        "" | "s" => 1,
        "m" => MINUTE,
        "h" => HOUR,
        "d" => DAY,
        "w" => WEEK,
        other if other.len() == 1 && other.as_bytes()[0].is_ascii_lowercase() => {
            warn!(unit = %other, ttl = %input, "unknown TTL unit, treating as seconds");
            1
        }
        _ => return Err(EsiError::InvalidTtl(input.to_string())),
    };

    Ok((value * multiplier as f64).round() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_seconds() {
        assert_eq!(parse_ttl("90").unwrap(), 90);
        assert_eq!(parse_ttl("90s").unwrap(), 90);
        assert_eq!(parse_ttl("0").unwrap(), 0);
    }

    #[test]
    fn test_units() {
        assert_eq!(parse_ttl("2m").unwrap(), 120);
        assert_eq!(parse_ttl("1h").unwrap(), 3_600);
        assert_eq!(parse_ttl("2d").unwrap(), 172_800);
        assert_eq!(parse_ttl("1w").unwrap(), 604_800);
    }

    #[test]
    fn test_fractions_round_to_nearest() {
        assert_eq!(parse_ttl("1.5h").unwrap(), 5_400);
        assert_eq!(parse_ttl(".5m").unwrap(), 30);
        assert_eq!(parse_ttl("0.0251m").unwrap(), 2);
        assert_eq!(parse_ttl("1.").unwrap(), 1);
    }

    #[test]
    fn test_whitespace_between_number_and_unit() {
        assert_eq!(parse_ttl("10 m").unwrap(), 600);
        assert_eq!(parse_ttl("  90  ").unwrap(), 90);
    }

    #[test]
    fn test_unknown_letter_is_seconds() {
        assert_eq!(parse_ttl("30x").unwrap(), 30);
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(parse_ttl("").is_err());
        assert!(parse_ttl(".").is_err());
        assert!(parse_ttl("abc").is_err());
        assert!(parse_ttl("-5").is_err());
        assert!(parse_ttl("1.2.3").is_err());
        assert!(parse_ttl("10 minutes").is_err());
        assert!(parse_ttl("10M").is_err());
    }
}

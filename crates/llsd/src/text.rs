//! Lenient text-to-scalar conversions used by the decoder.
//!
//! Each function accepts whatever text a remote peer put inside a scalar
//! element and always produces a value: the longest numeric prefix wins,
//! anything unparseable falls back to zero.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::constants::{FALSE_TOKEN, TRUE_TOKEN};

/// Parses a base-10 signed integer prefix. Out-of-range values saturate.
pub fn parse_integer(text: &str) -> i64 {
    let s = text.trim();
    if let Ok(n) = s.parse::<i64>() {
        return n;
    }
    let bytes = s.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }
    let digits_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    if end == digits_start {
        tracing::debug!(text, "integer text has no digits, using 0");
        return 0;
    }
    match s[..end].parse::<i64>() {
        Ok(n) => n,
        Err(_) => {
            tracing::debug!(text, "integer out of range, saturating");
            if bytes[0] == b'-' {
                i64::MIN
            } else {
                i64::MAX
            }
        }
    }
}

/// Parses a floating point prefix (`[sign] digits [. digits] [e [sign] digits]`).
///
/// Full-string forms Rust accepts (`NaN`, `inf`, `-infinity`) are honored.
pub fn parse_real(text: &str) -> f64 {
    let s = text.trim();
    if let Ok(f) = s.parse::<f64>() {
        return f;
    }
    let bytes = s.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }
    let mantissa_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    if end < bytes.len() && bytes[end] == b'.' {
        end += 1;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
        }
    }
    if !s[mantissa_start..end].bytes().any(|b| b.is_ascii_digit()) {
        tracing::debug!(text, "real text has no digits, using 0.0");
        return 0.0;
    }
    // Only take the exponent if it is complete.
    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits {
            end = exp_end;
        }
    }
    s[..end].parse::<f64>().unwrap_or_else(|_| {
        tracing::debug!(text, "unparseable real, using 0.0");
        0.0
    })
}

/// `false` for the literal `false` or empty text, `true` for anything else.
pub fn parse_boolean(text: &str) -> bool {
    !(text.is_empty() || text == FALSE_TOKEN)
}

pub fn render_boolean(b: bool) -> &'static str {
    if b {
        TRUE_TOKEN
    } else {
        FALSE_TOKEN
    }
}

/// Parses an ISO-8601 timestamp; naive forms are read as UTC and a bare
/// date as midnight. Unparseable text yields the epoch.
pub fn parse_date(text: &str) -> DateTime<Utc> {
    let s = text.trim();
    if let Ok(d) = DateTime::parse_from_rfc3339(s) {
        return d.with_timezone(&Utc);
    }
    if let Ok(d) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return d.and_utc();
    }
    if let Some(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
    {
        return d.and_utc();
    }
    tracing::debug!(text, "unparseable date, using epoch");
    DateTime::<Utc>::UNIX_EPOCH
}

/// Renders `YYYY-MM-DDTHH:MM:SSZ`.
pub fn render_date(date: &DateTime<Utc>) -> String {
    date.to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
}

/// Decodes base64 body text, ignoring embedded whitespace. Invalid input
/// yields empty bytes.
pub fn parse_binary(text: &str) -> Vec<u8> {
    let compact: String = text.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    STANDARD.decode(compact.as_bytes()).unwrap_or_else(|err| {
        tracing::debug!(%err, "invalid base64 in binary element, using empty bytes");
        Vec::new()
    })
}

pub fn render_binary(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Renders a real so that parsing it back yields the same `f64`.
pub fn render_real(f: f64) -> String {
    f.to_string()
}

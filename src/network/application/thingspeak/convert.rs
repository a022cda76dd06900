//! Lenient text-to-number conversions for values read back from a channel.
//!
//! Field values are free text on the server, so these never fail: leading
//! whitespace is skipped, the longest numeric prefix is used and anything
//! unparsable yields `0`. A stored `"0"` and a non-numeric value therefore
//! read back the same.

/// Parses a decimal integer prefix, saturating at the `i64` bounds.
pub fn parse_long(text: &str) -> i64 {
    let bytes = text.trim_start().as_bytes();
    let (negative, digits) = match bytes.first() {
        Some(b'-') => (true, &bytes[1..]),
        Some(b'+') => (false, &bytes[1..]),
        _ => (false, bytes),
    };
    let mut value: i64 = 0;
    for byte in digits.iter().take_while(|byte| byte.is_ascii_digit()) {
        let digit = i64::from(byte - b'0');
        value = if negative {
            value.saturating_mul(10).saturating_sub(digit)
        } else {
            value.saturating_mul(10).saturating_add(digit)
        };
    }
    value
}

/// Parses a decimal integer prefix, clamped to the `i32` range.
pub fn parse_int(text: &str) -> i32 {
    parse_long(text).clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

/// Parses a floating point prefix.
///
/// Accepts an optional sign, digits with an optional fraction and exponent,
/// or `inf`, `infinity` and `nan` in any case. `NaN` and both infinities are
/// valid results.
pub fn parse_float(text: &str) -> f32 {
    let text = text.trim_start();
    let bytes = text.as_bytes();
    let mut end = match bytes.first() {
        Some(b'-' | b'+') => 1,
        _ => 0,
    };
    let negative = bytes.first() == Some(&b'-');

    let rest = &text[end..];
    if starts_with_ignore_case(rest, "nan") {
        return f32::NAN;
    }
    if starts_with_ignore_case(rest, "inf") {
        return if negative {
            f32::NEG_INFINITY
        } else {
            f32::INFINITY
        };
    }

    let integer = count_digits(&bytes[end..]);
    end += integer;
    let mut fraction = 0;
    if bytes.get(end) == Some(&b'.') {
        fraction = count_digits(&bytes[end + 1..]);
        end += 1 + fraction;
    }
    if integer == 0 && fraction == 0 {
        return 0.0;
    }
    if let Some(b'e' | b'E') = bytes.get(end) {
        let mut exponent = end + 1;
        if let Some(b'-' | b'+') = bytes.get(exponent) {
            exponent += 1;
        }
        let digits = count_digits(&bytes[exponent.min(bytes.len())..]);
        if digits > 0 {
            end = exponent + digits;
        }
    }
    text[..end].parse().unwrap_or(0.0)
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|byte| byte.is_ascii_digit()).count()
}

fn starts_with_ignore_case(text: &str, prefix: &str) -> bool {
    text.len() >= prefix.len()
        && text.as_bytes()[..prefix.len()].eq_ignore_ascii_case(prefix.as_bytes())
}

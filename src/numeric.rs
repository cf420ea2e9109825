//! Number handling that has to match browser arithmetic exactly.
//!
//! Chart coordinates and colour channels are produced by rounding the way
//! `Math.round` does and are written into attributes the way a JavaScript
//! number stringifies, so the same input yields the same SVG text.

/// Rounds half toward positive infinity (`Math.round`): `2.5 -> 3`,
/// `-2.5 -> -2`. NaN and infinities pass through.
pub fn js_round(x: f64) -> f64 {
    if !x.is_finite() {
        return x;
    }
    (x + 0.5).floor()
}

/// Leading-integer parse in the manner of `parseInt(s, 10)`: optional
/// leading whitespace and sign, then as many decimal digits as present.
/// Returns `None` where `parseInt` would return NaN, and also for digit
/// runs that overflow `i64` (where `parseInt` would still give a large
/// finite number).
pub fn parse_int(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let digits: &str = {
        let end = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        &rest[..end]
    };
    if digits.is_empty() {
        return None;
    }
    let value: i64 = digits.parse().ok()?;
    Some(if negative { -value } else { value })
}

/// Formats a coordinate the way JavaScript stringifies a number.
///
/// `None` (an undefined position) is written as `NaN`.
pub fn js_number(value: Option<f64>) -> String {
    match value {
        None => "NaN".to_string(),
        Some(v) if v.is_nan() => "NaN".to_string(),
        Some(v) if v.is_infinite() => {
            if v > 0.0 { "Infinity".to_string() } else { "-Infinity".to_string() }
        }
        Some(v) if v.fract() == 0.0 && v.abs() < 1e21 => {
            // -0 prints as 0
            format!("{}", v as i64)
        }
        Some(v) => format!("{}", v),
    }
}

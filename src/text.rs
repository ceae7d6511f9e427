//! String helpers: end-quote stripping and status-code parsing.
use std::borrow::Cow;

use crate::value::Value;

/// Drop one leading `"` and then one trailing `"`, each only if present.
/// `None` and the empty string give `""`.
pub fn strip_end_quotes(s: Option<&str>) -> String {
    let Some(s) = s.filter(|s| !s.is_empty()) else {
        return String::new();
    };
    let s = s.strip_prefix('"').unwrap_or(s);
    let s = s.strip_suffix('"').unwrap_or(s);
    s.to_string()
}

/// Base-10 integer prefix of `code`, or `-1` when there is none.
///
/// Parsing stops at the first non-digit, so `"200ok"` is `200`. Numbers are
/// read from their decimal text (`404.9` is `404`); `undefined`, `null`,
/// booleans, objects and functions never parse. Out-of-range values
/// saturate at the `i64` bounds.
pub fn parse_status_code(code: &Value) -> i64 {
    parse_status_code_str(render(code).as_deref())
}

pub fn parse_status_code_str(code: Option<&str>) -> i64 {
    code.and_then(parse_int_prefix).unwrap_or(-1)
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn parse_int_prefix(text: &str) -> Option<i64> {
    let text = text.trim_start_matches(|c: char| c.is_whitespace() || c == '\u{feff}');
    let (negative, digits) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };
    let end = digits.bytes().position(|b| !b.is_ascii_digit()).unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    let value = digits[..end].bytes().fold(0i64, |acc, b| {
        let d = i64::from(b - b'0');
        if negative {
            acc.saturating_mul(10).saturating_sub(d)
        } else {
            acc.saturating_mul(10).saturating_add(d)
        }
    });
    Some(value)
}

// Text a value would stringify to, for the kinds that can start with digits.
fn render(value: &Value) -> Option<Cow<'_, str>> {
    match value {
        Value::String(s) => Some(Cow::Borrowed(s)),
        Value::Number(n) => Some(Cow::Owned(number_text(*n))),
        Value::Array(xs) => Some(Cow::Owned(
            xs.iter()
                .map(|x| render(x).unwrap_or_default())
                .collect::<Vec<_>>()
                .join(","),
        )),
        _ => None,
    }
}

fn number_text(n: f64) -> String {
    if !n.is_finite() {
        return String::new();
    }
    if n != 0.0 && (n.abs() >= 1e21 || n.abs() < 1e-6) {
        format!("{n:e}")
    } else {
        format!("{n}")
    }
}

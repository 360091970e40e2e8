//! Field access and value shaping for vendor payloads

use serde_json::Value;

/// Read-only view over a vendor JSON object.
///
/// Paths walk nested objects (`&["time_zone", "name"]`). A JSON `null` counts as absent.
pub struct Payload<'a> {
    root: &'a Value,
}

impl<'a> Payload<'a> {
    pub fn new(root: &'a Value) -> Self {
        Self { root }
    }

    pub fn get(&self, path: &[&str]) -> Option<&'a Value> {
        let mut current = self.root;
        for key in path {
            current = current.get(*key)?;
        }
        (!current.is_null()).then_some(current)
    }

    pub fn has(&self, path: &[&str]) -> bool {
        self.get(path).is_some()
    }

    /// Scalar field as a string.
    pub fn text(&self, path: &[&str]) -> Option<String> {
        self.get(path).and_then(value_text)
    }

    /// Coordinate rounded to four decimal places.
    pub fn coordinate(&self, path: &[&str]) -> Option<String> {
        self.get(path).and_then(round_coordinate)
    }
}

/// 标量转字符串；对象、数组、null 视为缺失
pub fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Parse a float (number or numeric string) and render it with four decimals.
pub fn round_coordinate(value: &Value) -> Option<String> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    parsed.is_finite().then(|| fixed4(parsed))
}

/// Four decimals, ties rounded away from zero.
///
/// `{:.4}` is exact except on ties, where it picks the even digit. A double lies exactly
/// halfway at the fifth decimal only when it is an odd multiple of 1/32.
fn fixed4(x: f64) -> String {
    let scaled = x * 32.0;
    let is_tie = scaled.fract() == 0.0 && scaled.abs() < 1e15 && (scaled as i64) % 2 != 0;
    if !is_tie {
        return format!("{:.4}", x);
    }

    let units = (x.abs() * 10_000.0).round() as u64;
    let sign = if x < 0.0 { "-" } else { "" };
    format!("{}{}.{:04}", sign, units / 10_000, units % 10_000)
}

/// Split a combined `"lat,lon"` string.
pub fn split_location(loc: &str) -> (Option<String>, Option<String>) {
    let mut parts = loc.split(',').map(str::trim).map(String::from);
    let latitude = parts.next().filter(|s| !s.is_empty());
    let longitude = parts.next().filter(|s| !s.is_empty());
    (latitude, longitude)
}

/// Bare AS number from a description such as `"AS15169 Google LLC"`.
pub fn asn_code(description: &str) -> Option<String> {
    let token = description.split_whitespace().next()?;
    let digits = token.strip_prefix("AS")?;
    (!digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())).then(|| digits.to_string())
}

/// `"<code> <name>"`, or whichever half is present.
pub fn join_asn(code: Option<&str>, name: Option<&str>) -> Option<String> {
    match (code, name) {
        (Some(code), Some(name)) => Some(format!("{} {}", code, name)),
        (Some(only), None) | (None, Some(only)) => Some(only.to_string()),
        (None, None) => None,
    }
}

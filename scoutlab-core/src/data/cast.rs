//! Safe casts from raw text cells.
//!
//! Every function here returns `None` instead of failing. Bronze models run
//! every raw cell through one of these, so a malformed value becomes a null
//! in the output rather than an aborted run.

use chrono::NaiveDate;

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y"];

/// Trimmed non-empty text.
pub fn to_text(raw: Option<&str>) -> Option<String> {
    let s = raw?.trim();
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

/// Finite float.
pub fn to_f64(raw: Option<&str>) -> Option<f64> {
    let s = raw?.trim();
    if s.is_empty() {
        return None;
    }
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Integer. Integral floats such as `12.0` are accepted.
pub fn to_i64(raw: Option<&str>) -> Option<i64> {
    let s = raw?.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(v) = s.parse::<i64>() {
        return Some(v);
    }
    let f = s.parse::<f64>().ok()?;
    if f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}

pub fn to_i32(raw: Option<&str>) -> Option<i32> {
    to_i64(raw).and_then(|v| i32::try_from(v).ok())
}

/// Money amount: `$`, `,` and spaces are stripped before parsing.
pub fn to_money(raw: Option<&str>) -> Option<f64> {
    let cleaned: String = raw?
        .chars()
        .filter(|c| !matches!(c, '$' | ',') && !c.is_whitespace())
        .collect();
    to_f64(Some(&cleaned))
}

/// Boolean from the usual spellings.
pub fn to_bool(raw: Option<&str>) -> Option<bool> {
    let s = raw?.trim().to_ascii_lowercase();
    match s.as_str() {
        "true" | "yes" | "y" | "t" | "1" => Some(true),
        "false" | "no" | "n" | "f" | "0" => Some(false),
        _ => None,
    }
}

/// Contract flag: a boolean, or an amount where any positive value means set.
pub fn to_flag(raw: Option<&str>) -> Option<bool> {
    to_bool(raw).or_else(|| to_money(raw).map(|v| v > 0.0))
}

/// Season end year. `2024` and `2023-24` both yield 2024; `2023-2024` too.
pub fn to_season(raw: Option<&str>) -> Option<i32> {
    let s = raw?.trim();
    if s.is_empty() {
        return None;
    }
    match s.split_once('-') {
        None => to_i32(Some(s)),
        Some((start, end)) => {
            let start: i32 = start.trim().parse().ok()?;
            let end = end.trim();
            if end.len() == 4 {
                end.parse().ok()
            } else {
                // two-digit suffix: the season ends the year after it starts
                end.parse::<i32>().ok()?;
                start.checked_add(1)
            }
        }
    }
}

pub fn to_date(raw: Option<&str>) -> Option<NaiveDate> {
    let s = raw?.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}

/// `num / den`, null when either side is null or the denominator is zero.
pub fn ratio(num: Option<f64>, den: Option<f64>) -> Option<f64> {
    match (num, den) {
        (Some(n), Some(d)) if d != 0.0 => Some(n / d),
        _ => None,
    }
}

/// True-shooting percentage: `pts / (2 * (fga + 0.44 * fta))`.
///
/// Null when any input is null or the denominator is zero.
pub fn true_shooting(pts: Option<f64>, fga: Option<f64>, fta: Option<f64>) -> Option<f64> {
    let denom = 2.0 * (fga? + 0.44 * fta?);
    ratio(pts, Some(denom))
}

/// Sum that ignores nulls and is null when every input is null.
pub fn sum_present<I: IntoIterator<Item = Option<f64>>>(values: I) -> Option<f64> {
    values
        .into_iter()
        .flatten()
        .fold(None, |acc, v| Some(acc.unwrap_or(0.0) + v))
}

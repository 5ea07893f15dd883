//! Header canonicalization for raw CSV sources.
//!
//! Raw exports arrive with headers like `Player`, `FG%`, ` Team ` or even a
//! bare number (`0.625`) where a spreadsheet lost its label. Every source is
//! read through [`canonical_headers`] so the typed raw records can rely on
//! lowercase snake-ish names.

use csv::StringRecord;
use std::collections::HashMap;

/// Canonical form of a single header.
///
/// - surrounding whitespace is trimmed
/// - a purely numeric header becomes `col_` + digits with `.` as `_`
/// - whitespace runs become `_`
/// - anything outside `[A-Za-z0-9_]` is dropped
/// - the result is lowercased
pub fn canonical_header(raw: &str) -> String {
    let trimmed = raw.trim();
    if is_numeric_label(trimmed) {
        return format!("col_{}", trimmed.replace('.', "_"));
    }

    let mut out = String::with_capacity(trimmed.len());
    let mut in_space = false;
    for ch in trimmed.chars() {
        if ch.is_whitespace() {
            if !in_space {
                out.push('_');
            }
            in_space = true;
            continue;
        }
        in_space = false;
        if ch.is_ascii_alphanumeric() || ch == '_' {
            out.push(ch.to_ascii_lowercase());
        }
    }
    out
}

fn is_numeric_label(s: &str) -> bool {
    let mut parts = s.splitn(2, '.');
    let int_part = parts.next().unwrap_or("");
    let frac_part = parts.next();
    let digits = |p: &str| !p.is_empty() && p.bytes().all(|b| b.is_ascii_digit());
    match frac_part {
        None => digits(int_part),
        Some(frac) => digits(int_part) && digits(frac),
    }
}

/// Canonicalize a whole header row. Repeated names get `_2`, `_3`, ...
pub fn canonical_headers(headers: &StringRecord) -> StringRecord {
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut out = StringRecord::new();
    for raw in headers.iter() {
        let base = canonical_header(raw);
        let count = seen.entry(base.clone()).or_insert(0);
        *count += 1;
        if *count == 1 {
            out.push_field(&base);
        } else {
            out.push_field(&format!("{base}_{count}"));
        }
    }
    out
}

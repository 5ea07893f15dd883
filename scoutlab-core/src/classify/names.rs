//! Player-name normalization for the contract join.
//!
//! Three keys, each more permissive than the last:
//! - exact: trimmed, case-insensitive
//! - collapsed: runs of whitespace and periods become one space
//! - folded: NFD-decomposed, combining marks and punctuation removed

use std::collections::HashMap;

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::domain::MatchLevel;

pub fn exact_key(name: &str) -> String {
    name.trim().to_lowercase()
}

pub fn collapsed_key(name: &str) -> String {
    let lowered = exact_key(name);
    let mut out = String::with_capacity(lowered.len());
    let mut pending_space = false;
    for ch in lowered.chars() {
        if ch.is_whitespace() || ch == '.' {
            pending_space = true;
            continue;
        }
        if pending_space && !out.is_empty() {
            out.push(' ');
        }
        pending_space = false;
        out.push(ch);
    }
    out
}

pub fn folded_key(name: &str) -> String {
    let collapsed = collapsed_key(name);
    let stripped: String = collapsed
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .filter(|c| !c.is_ascii_punctuation() && !is_unicode_punctuation(*c))
        .collect();
    // removing punctuation can leave doubled or edge spaces
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn is_unicode_punctuation(c: char) -> bool {
    matches!(
        c,
        '\u{2018}' | '\u{2019}' | '\u{201C}' | '\u{201D}' | '\u{2010}'..='\u{2015}' | '\u{00B4}'
    )
}

pub fn key_for(level: MatchLevel, name: &str) -> String {
    match level {
        MatchLevel::Exact => exact_key(name),
        MatchLevel::Collapsed => collapsed_key(name),
        MatchLevel::Folded => folded_key(name),
    }
}

/// Lookup over contract names at every normalization level.
///
/// Each key maps to the earliest contract index that produced it, so a name
/// matching several contracts resolves to the first one in source order.
#[derive(Debug, Default)]
pub struct NameIndex {
    exact: HashMap<String, usize>,
    collapsed: HashMap<String, usize>,
    folded: HashMap<String, usize>,
}

impl NameIndex {
    pub fn build<'a, I: IntoIterator<Item = &'a str>>(names: I) -> Self {
        let mut index = NameIndex::default();
        for (i, name) in names.into_iter().enumerate() {
            index.exact.entry(exact_key(name)).or_insert(i);
            index.collapsed.entry(collapsed_key(name)).or_insert(i);
            index.folded.entry(folded_key(name)).or_insert(i);
        }
        index
    }

    /// Most strict level with a hit wins.
    pub fn lookup(&self, name: &str) -> Option<(usize, MatchLevel)> {
        let levels = [
            (MatchLevel::Exact, &self.exact),
            (MatchLevel::Collapsed, &self.collapsed),
            (MatchLevel::Folded, &self.folded),
        ];
        levels.into_iter().find_map(|(level, map)| {
            let key = key_for(level, name);
            if key.is_empty() {
                return None;
            }
            map.get(&key).map(|&i| (i, level))
        })
    }
}

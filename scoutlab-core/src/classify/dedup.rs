//! Season filter and per-player deduplication of season lines.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::domain::PlayerSeasonStat;

/// Descending order with nulls last.
fn desc_nulls_last<T: PartialOrd>(a: Option<T>, b: Option<T>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => y.partial_cmp(&x).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Preference order between two lines of the same player: more games, then
/// higher scoring, then a real team over a traded aggregate, then team code.
pub fn preference(a: &PlayerSeasonStat, b: &PlayerSeasonStat) -> Ordering {
    desc_nulls_last(a.g, b.g)
        .then_with(|| desc_nulls_last(a.pts, b.pts))
        .then_with(|| a.is_traded_aggregate().cmp(&b.is_traded_aggregate()))
        .then_with(|| a.team.cmp(&b.team))
}

/// Keep exactly one line per player for `season`, ordered by player name.
///
/// Remaining ties after [`preference`] go to the earliest row in input order.
pub fn canonical_season_rows(rows: &[PlayerSeasonStat], season: i32) -> Vec<PlayerSeasonStat> {
    let mut best: BTreeMap<&str, &PlayerSeasonStat> = BTreeMap::new();
    for row in rows.iter().filter(|r| r.season == season) {
        best.entry(row.player.trim())
            .and_modify(|current| {
                // strictly better only, so the earlier row keeps full ties
                if preference(row, *current) == Ordering::Less {
                    *current = row;
                }
            })
            .or_insert(row);
    }
    best.into_values().cloned().collect()
}

//! Equal-frequency percentile buckets.
//!
//! Rows are sorted ascending inside each partition and split into 100
//! buckets the way SQL `NTILE(100)` does: with `n` rows, `q = n / 100` and
//! `r = n % 100`, the first `r` buckets hold `q + 1` rows and the rest `q`.
//! Null values sort first. With fewer than 100 rows the largest bucket
//! number is `n`.

use std::cmp::Ordering;
use std::collections::BTreeMap;

pub const BUCKETS: usize = 100;

/// 1-based bucket of the row at 0-based `position` among `len` sorted rows.
pub fn ntile(position: usize, len: usize, buckets: usize) -> usize {
    debug_assert!(position < len && buckets > 0);
    let q = len / buckets;
    let r = len % buckets;
    let big = r * (q + 1);
    if position < big {
        position / (q + 1) + 1
    } else {
        // q > 0 here: with q == 0, big == len and every position is < big
        r + (position - big) / q + 1
    }
}

/// Ascending with nulls first, NaN-safe.
pub fn cmp_nulls_first(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(x), Some(y)) => x.total_cmp(&y),
    }
}

/// Percentile bucket of every item, in item order.
///
/// `partition` groups items (`None` is its own group), `value` is the
/// statistic, and `tiebreak` orders equal values deterministically.
pub fn ntile_ranks<T, P, V, B>(items: &[T], partition: P, value: V, tiebreak: B) -> Vec<u8>
where
    P: Fn(&T) -> Option<&str>,
    V: Fn(&T) -> Option<f64>,
    B: Fn(&T, &T) -> Ordering,
{
    let mut groups: BTreeMap<Option<&str>, Vec<usize>> = BTreeMap::new();
    for (i, item) in items.iter().enumerate() {
        groups.entry(partition(item)).or_default().push(i);
    }

    let mut ranks = vec![0u8; items.len()];
    for members in groups.values_mut() {
        members.sort_by(|&a, &b| {
            cmp_nulls_first(value(&items[a]), value(&items[b]))
                .then_with(|| tiebreak(&items[a], &items[b]))
                .then_with(|| a.cmp(&b))
        });
        let n = members.len();
        for (pos, &idx) in members.iter().enumerate() {
            // bucket is in 1..=100 so the cast cannot truncate
            ranks[idx] = ntile(pos, n, BUCKETS) as u8;
        }
    }
    ranks
}

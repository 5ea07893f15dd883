//! Filtering, sorting and summarizing G-League target rows.
//!
//! Shared by the dashboard's player search and the targets report.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::domain::{ContractStatus, GLeagueCategory, RankedPlayer};

/// Column a target list is sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortKey {
    Player,
    Age,
    #[default]
    Points,
    Rebounds,
    Assists,
    TrueShooting,
}

impl SortKey {
    pub const ALL: [SortKey; 6] = [
        SortKey::Player,
        SortKey::Age,
        SortKey::Points,
        SortKey::Rebounds,
        SortKey::Assists,
        SortKey::TrueShooting,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SortKey::Player => "Player",
            SortKey::Age => "Age",
            SortKey::Points => "PTS",
            SortKey::Rebounds => "TRB",
            SortKey::Assists => "AST",
            SortKey::TrueShooting => "TS%",
        }
    }

    /// The next key in `ALL`, wrapping around.
    pub fn next(self) -> Self {
        let i = Self::ALL.iter().position(|k| *k == self).unwrap_or(0);
        Self::ALL[(i + 1) % Self::ALL.len()]
    }

    fn compare(self, a: &RankedPlayer, b: &RankedPlayer) -> Ordering {
        let nulls_last = |x: Option<f64>, y: Option<f64>| match (x, y) {
            (Some(x), Some(y)) => x.total_cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };
        match self {
            SortKey::Player => a.player.cmp(&b.player),
            SortKey::Age => nulls_last(a.age.map(f64::from), b.age.map(f64::from)),
            SortKey::Points => nulls_last(a.pts, b.pts),
            SortKey::Rebounds => nulls_last(a.trb, b.trb),
            SortKey::Assists => nulls_last(a.ast, b.ast),
            SortKey::TrueShooting => nulls_last(a.ts_pct, b.ts_pct),
        }
    }
}

/// Player search criteria. `None` means "any".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetFilter {
    pub category: Option<GLeagueCategory>,
    pub position: Option<String>,
    pub contract: Option<ContractStatus>,
    pub min_age: Option<i32>,
    pub max_age: Option<i32>,
    pub min_points: Option<f64>,
    pub sort: SortKey,
    pub descending: bool,
}

impl Default for TargetFilter {
    fn default() -> Self {
        Self {
            category: None,
            position: None,
            contract: None,
            min_age: None,
            max_age: None,
            min_points: None,
            sort: SortKey::Points,
            descending: true,
        }
    }
}

impl TargetFilter {
    pub fn matches(&self, row: &RankedPlayer) -> bool {
        if self.category.is_some_and(|c| c != row.g_league_category) {
            return false;
        }
        if self.contract.is_some_and(|c| c != row.contract_status) {
            return false;
        }
        if let Some(pos) = &self.position {
            if row.pos.as_deref() != Some(pos.as_str()) {
                return false;
            }
        }
        if let Some(min) = self.min_age {
            if !row.age.is_some_and(|a| a >= min) {
                return false;
            }
        }
        if let Some(max) = self.max_age {
            if !row.age.is_some_and(|a| a <= max) {
                return false;
            }
        }
        if let Some(min) = self.min_points {
            if !row.pts.is_some_and(|p| p >= min) {
                return false;
            }
        }
        true
    }

    /// Matching rows in sort order. Nulls sort last in either direction;
    /// ties fall back to player name.
    pub fn apply<'a>(&self, rows: &'a [RankedPlayer]) -> Vec<&'a RankedPlayer> {
        let mut out: Vec<&RankedPlayer> = rows.iter().filter(|r| self.matches(r)).collect();
        out.sort_by(|a, b| {
            let primary = match self.sort {
                SortKey::Player if self.descending => b.player.cmp(&a.player),
                key => match (is_null(key, a), is_null(key, b)) {
                    (true, false) => Ordering::Greater,
                    (false, true) => Ordering::Less,
                    _ if self.descending => key.compare(b, a),
                    _ => key.compare(a, b),
                },
            };
            primary.then_with(|| a.player.cmp(&b.player))
        });
        out
    }
}

fn is_null(key: SortKey, row: &RankedPlayer) -> bool {
    match key {
        SortKey::Player => false,
        SortKey::Age => row.age.is_none(),
        SortKey::Points => row.pts.is_none(),
        SortKey::Rebounds => row.trb.is_none(),
        SortKey::Assists => row.ast.is_none(),
        SortKey::TrueShooting => row.ts_pct.is_none(),
    }
}

/// Headline numbers for a list of targets.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct TargetSummary {
    pub found: usize,
    pub average_age: Option<f64>,
    /// Free agents and uncontracted players, signable today.
    pub available: usize,
    /// Players in the struggling category.
    pub development: usize,
    pub by_category: BTreeMap<GLeagueCategory, usize>,
    pub by_status: BTreeMap<ContractStatus, usize>,
}

pub fn summarize(rows: &[&RankedPlayer]) -> TargetSummary {
    let ages: Vec<f64> = rows.iter().filter_map(|r| r.age).map(f64::from).collect();
    let mut summary = TargetSummary {
        found: rows.len(),
        average_age: (!ages.is_empty()).then(|| ages.iter().sum::<f64>() / ages.len() as f64),
        ..Default::default()
    };
    for r in rows {
        if r.contract_status.is_signable_now() {
            summary.available += 1;
        }
        if r.g_league_category == GLeagueCategory::Struggling {
            summary.development += 1;
        }
        *summary.by_category.entry(r.g_league_category).or_default() += 1;
        *summary.by_status.entry(r.contract_status).or_default() += 1;
    }
    summary
}

/// Distinct positions present, sorted.
pub fn positions(rows: &[RankedPlayer]) -> Vec<String> {
    let mut out: Vec<String> = rows.iter().filter_map(|r| r.pos.clone()).collect();
    out.sort_unstable();
    out.dedup();
    out
}

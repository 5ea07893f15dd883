//! Contracts, contract status and the stat-to-contract join row.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::player::PlayerSeasonStat;
use crate::data::table::{Cell, Field, Record};

/// Number of forward-looking salary columns.
pub const SALARY_YEARS: usize = 6;

/// One contract row. `salaries[0]` is season+1, `salaries[5]` season+6.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractRecord {
    pub player: String,
    pub team: Option<String>,
    pub salaries: [Option<f64>; SALARY_YEARS],
    pub guaranteed: Option<bool>,
    pub uncontracted: Option<bool>,
}

impl ContractRecord {
    /// Salary `years_out` seasons ahead (1-based). Null counts as zero.
    pub fn salary(&self, years_out: usize) -> f64 {
        years_out
            .checked_sub(1)
            .and_then(|i| self.salaries.get(i))
            .copied()
            .flatten()
            .unwrap_or(0.0)
    }
}

impl Record for ContractRecord {
    const SCHEMA: &'static [Field] = &[
        Field::text("player"),
        Field::text("team"),
        Field::float("salary_y1"),
        Field::float("salary_y2"),
        Field::float("salary_y3"),
        Field::float("salary_y4"),
        Field::float("salary_y5"),
        Field::float("salary_y6"),
        Field::bool("guaranteed"),
        Field::bool("uncontracted"),
    ];

    fn cells(&self) -> Vec<Cell> {
        let mut cells = vec![Cell::text(&self.player), Cell::opt_text(self.team.as_deref())];
        cells.extend(self.salaries.iter().map(|s| Cell::Float(*s)));
        cells.push(Cell::Bool(self.guaranteed));
        cells.push(Cell::Bool(self.uncontracted));
        cells
    }
}

/// Contract situation of a player, in classifier rule order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ContractStatus {
    #[serde(rename = "Free Agent / No Contract Data")]
    NoContractData,
    #[serde(rename = "Uncontracted")]
    Uncontracted,
    #[serde(rename = "Free Agent")]
    FreeAgent,
    #[serde(rename = "Expiring Contract")]
    Expiring,
    #[serde(rename = "1 Year Left")]
    OneYearLeft,
    #[serde(rename = "Multi-Year Contract")]
    MultiYear,
}

impl ContractStatus {
    pub const ALL: [ContractStatus; 6] = [
        ContractStatus::NoContractData,
        ContractStatus::Uncontracted,
        ContractStatus::FreeAgent,
        ContractStatus::Expiring,
        ContractStatus::OneYearLeft,
        ContractStatus::MultiYear,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ContractStatus::NoContractData => "Free Agent / No Contract Data",
            ContractStatus::Uncontracted => "Uncontracted",
            ContractStatus::FreeAgent => "Free Agent",
            ContractStatus::Expiring => "Expiring Contract",
            ContractStatus::OneYearLeft => "1 Year Left",
            ContractStatus::MultiYear => "Multi-Year Contract",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.label() == label)
    }

    /// Statuses that leave a player signable: the G-League eligibility set.
    pub fn is_available(self) -> bool {
        matches!(
            self,
            ContractStatus::NoContractData
                | ContractStatus::Uncontracted
                | ContractStatus::FreeAgent
                | ContractStatus::Expiring
        )
    }

    /// Signable today, without waiting for a contract to run out.
    pub fn is_signable_now(self) -> bool {
        matches!(
            self,
            ContractStatus::NoContractData | ContractStatus::Uncontracted | ContractStatus::FreeAgent
        )
    }
}

impl fmt::Display for ContractStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Which normalization level matched a stat row to its contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchLevel {
    /// Case-insensitive trimmed equality.
    Exact,
    /// Whitespace and period runs collapsed.
    Collapsed,
    /// Accents and punctuation removed.
    Folded,
}

impl MatchLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            MatchLevel::Exact => "exact",
            MatchLevel::Collapsed => "collapsed",
            MatchLevel::Folded => "folded",
        }
    }
}

/// A canonical stat row left-joined to at most one contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinedPlayer {
    pub stat: PlayerSeasonStat,
    pub contract: Option<ContractRecord>,
    pub match_level: Option<MatchLevel>,
    pub contract_status: ContractStatus,
}

impl Record for JoinedPlayer {
    const SCHEMA: &'static [Field] = &[
        Field::text("player"),
        Field::int("season"),
        Field::text("team"),
        Field::text("pos"),
        Field::int("age"),
        Field::int("g"),
        Field::float("pts"),
        Field::float("trb"),
        Field::float("ast"),
        Field::float("stl"),
        Field::float("blk"),
        Field::float("ts_pct"),
        Field::text("contract_player"),
        Field::text("contract_team"),
        Field::float("salary_y1"),
        Field::float("salary_y2"),
        Field::float("salary_y3"),
        Field::float("salary_y4"),
        Field::float("salary_y5"),
        Field::float("salary_y6"),
        Field::bool("guaranteed"),
        Field::bool("uncontracted"),
        Field::text("name_match"),
        Field::text("contract_status"),
    ];

    fn cells(&self) -> Vec<Cell> {
        let s = &self.stat;
        let mut cells = vec![
            Cell::text(&s.player),
            Cell::Int(Some(s.season.into())),
            Cell::opt_text(s.team.as_deref()),
            Cell::opt_text(s.pos.as_deref()),
            Cell::Int(s.age.map(i64::from)),
            Cell::Int(s.g),
            Cell::Float(s.pts),
            Cell::Float(s.trb),
            Cell::Float(s.ast),
            Cell::Float(s.stl),
            Cell::Float(s.blk),
            Cell::Float(s.ts_pct),
        ];
        let c = self.contract.as_ref();
        cells.push(Cell::opt_text(c.map(|c| c.player.as_str())));
        cells.push(Cell::opt_text(c.and_then(|c| c.team.as_deref())));
        for i in 0..SALARY_YEARS {
            cells.push(Cell::Float(c.and_then(|c| c.salaries[i])));
        }
        cells.push(Cell::Bool(c.and_then(|c| c.guaranteed)));
        cells.push(Cell::Bool(c.and_then(|c| c.uncontracted)));
        cells.push(Cell::opt_text(self.match_level.map(MatchLevel::as_str)));
        cells.push(Cell::text(self.contract_status.label()));
        cells
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_round_trip() {
        for status in ContractStatus::ALL {
            assert_eq!(ContractStatus::from_label(status.label()), Some(status));
        }
        assert_eq!(ContractStatus::from_label("Two-Way"), None);
    }

    #[test]
    fn serde_uses_display_labels() {
        let json = serde_json::to_string(&ContractStatus::OneYearLeft).unwrap();
        assert_eq!(json, "\"1 Year Left\"");
    }

    #[test]
    fn availability_set() {
        let available: Vec<_> = ContractStatus::ALL
            .into_iter()
            .filter(|s| s.is_available())
            .collect();
        assert_eq!(available.len(), 4);
        assert!(!ContractStatus::OneYearLeft.is_available());
        assert!(!ContractStatus::MultiYear.is_available());
    }

    #[test]
    fn salary_lookup_treats_null_as_zero() {
        let c = ContractRecord {
            player: "A".into(),
            team: None,
            salaries: [Some(1.0), None, Some(3.0), None, None, None],
            guaranteed: None,
            uncontracted: None,
        };
        assert_eq!(c.salary(1), 1.0);
        assert_eq!(c.salary(2), 0.0);
        assert_eq!(c.salary(3), 3.0);
        assert_eq!(c.salary(0), 0.0);
        assert_eq!(c.salary(7), 0.0);
    }
}

//! G-League category classifier. First match wins.

use crate::domain::{ContractStatus, GLeagueCategory, Percentiles};

/// Oldest age still considered a development target.
pub const MAX_TARGET_AGE: i32 = 28;
/// Struggling threshold, inclusive.
pub const STRUGGLING_MAX_PERCENTILE: u8 = 25;
/// Well-rounded band, both ends exclusive.
pub const WELL_ROUNDED_BAND: (u8, u8) = (25, 75);

pub fn classify(p: &Percentiles, status: ContractStatus, age: Option<i32>) -> GLeagueCategory {
    let eligible = status.is_available() && age.is_some_and(|a| a <= MAX_TARGET_AGE);
    if !eligible {
        return GLeagueCategory::NotTarget;
    }

    let struggling = [p.pts, p.trb, p.ast]
        .iter()
        .any(|&v| v <= STRUGGLING_MAX_PERCENTILE);
    if struggling {
        return GLeagueCategory::Struggling;
    }

    let (lo, hi) = WELL_ROUNDED_BAND;
    let well_rounded = [p.pts, p.trb, p.ast, p.ts]
        .iter()
        .all(|&v| v > lo && v < hi);
    if well_rounded {
        GLeagueCategory::WellRounded
    } else {
        GLeagueCategory::NotTarget
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pct(pts: u8, trb: u8, ast: u8, ts: u8) -> Percentiles {
        Percentiles { pts, trb, ast, stl: 50, blk: 50, ts }
    }

    #[test]
    fn young_low_scorer_free_agent_is_struggling() {
        let c = classify(&pct(10, 50, 50, 50), ContractStatus::FreeAgent, Some(24));
        assert_eq!(c, GLeagueCategory::Struggling);
    }

    #[test]
    fn all_average_expiring_is_well_rounded() {
        let c = classify(&pct(50, 50, 50, 50), ContractStatus::Expiring, Some(27));
        assert_eq!(c, GLeagueCategory::WellRounded);
    }

    #[test]
    fn boundary_25_is_struggling_not_well_rounded() {
        let c = classify(&pct(25, 25, 25, 25), ContractStatus::Uncontracted, Some(22));
        assert_eq!(c, GLeagueCategory::Struggling);
    }

    #[test]
    fn boundary_75_is_not_well_rounded() {
        let c = classify(&pct(50, 75, 50, 50), ContractStatus::FreeAgent, Some(22));
        assert_eq!(c, GLeagueCategory::NotTarget);
    }

    #[test]
    fn ts_boundary_only_affects_well_rounded() {
        let c = classify(&pct(50, 50, 50, 25), ContractStatus::FreeAgent, Some(22));
        assert_eq!(c, GLeagueCategory::NotTarget);
    }

    #[test]
    fn age_and_contract_gate_both_rules() {
        let p = pct(10, 50, 50, 50);
        assert_eq!(classify(&p, ContractStatus::FreeAgent, Some(29)), GLeagueCategory::NotTarget);
        assert_eq!(classify(&p, ContractStatus::FreeAgent, Some(28)), GLeagueCategory::Struggling);
        assert_eq!(classify(&p, ContractStatus::FreeAgent, None), GLeagueCategory::NotTarget);
        assert_eq!(classify(&p, ContractStatus::MultiYear, Some(22)), GLeagueCategory::NotTarget);
        assert_eq!(classify(&p, ContractStatus::OneYearLeft, Some(22)), GLeagueCategory::NotTarget);
    }
}

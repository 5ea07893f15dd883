//! Contract status classifier. First matching rule wins.

use crate::domain::{ContractRecord, ContractStatus};

/// Status of a player's contract, first match wins. Null salaries count as
/// zero; `y1`..`y3` are the salaries one to three seasons out.
///
/// 1. no record: `Free Agent / No Contract Data`
/// 2. uncontracted flag set: `Uncontracted`
/// 3. `y1` and `y2` both zero: `Free Agent`
/// 4. `y2` zero: `Expiring Contract`
/// 5. `y3` zero: `1 Year Left`
/// 6. otherwise `Multi-Year Contract`
///
/// Rule 5 looks one season further out than rule 4. Checked against `y2`
/// like rule 4, it could never match, so paid-through-`y2` contracts that
/// end before `y3` are labelled `1 Year Left` rather than
/// `Multi-Year Contract`. Neither label is G-League eligible, so the target
/// list is the same either way.
pub fn classify(contract: Option<&ContractRecord>) -> ContractStatus {
    let Some(c) = contract else {
        return ContractStatus::NoContractData;
    };
    if c.uncontracted == Some(true) {
        return ContractStatus::Uncontracted;
    }
    let (y1, y2, y3) = (c.salary(1), c.salary(2), c.salary(3));
    if y1 == 0.0 && y2 == 0.0 {
        ContractStatus::FreeAgent
    } else if y2 == 0.0 {
        ContractStatus::Expiring
    } else if y3 == 0.0 {
        ContractStatus::OneYearLeft
    } else {
        ContractStatus::MultiYear
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contract(salaries: [Option<f64>; 3], uncontracted: Option<bool>) -> ContractRecord {
        ContractRecord {
            player: "A".into(),
            team: Some("BOS".into()),
            salaries: [salaries[0], salaries[1], salaries[2], None, None, None],
            guaranteed: None,
            uncontracted,
        }
    }

    #[test]
    fn no_record_is_no_contract_data() {
        assert_eq!(classify(None), ContractStatus::NoContractData);
    }

    #[test]
    fn uncontracted_flag_wins_over_salaries() {
        let c = contract([Some(5.0), Some(5.0), Some(5.0)], Some(true));
        assert_eq!(classify(Some(&c)), ContractStatus::Uncontracted);
    }

    #[test]
    fn null_salaries_count_as_zero() {
        let c = contract([None, None, Some(5.0)], None);
        assert_eq!(classify(Some(&c)), ContractStatus::FreeAgent);
    }

    #[test]
    fn rule_order() {
        let cases = [
            ([Some(0.0), Some(0.0), None], ContractStatus::FreeAgent),
            ([Some(1.0), Some(0.0), None], ContractStatus::Expiring),
            ([Some(1.0), Some(1.0), None], ContractStatus::OneYearLeft),
            ([Some(1.0), Some(1.0), Some(0.0)], ContractStatus::OneYearLeft),
            ([Some(1.0), Some(1.0), Some(1.0)], ContractStatus::MultiYear),
            ([Some(0.0), Some(1.0), Some(1.0)], ContractStatus::MultiYear),
        ];
        for (salaries, expected) in cases {
            let c = contract(salaries, Some(false));
            assert_eq!(classify(Some(&c)), expected, "{salaries:?}");
        }
    }

    #[test]
    fn one_year_left_ends_before_third_season() {
        let ends = contract([Some(2.0), Some(2.0), Some(0.0)], None);
        assert_eq!(classify(Some(&ends)), ContractStatus::OneYearLeft);
        let runs_on = contract([Some(2.0), Some(2.0), Some(2.0)], None);
        assert_eq!(classify(Some(&runs_on)), ContractStatus::MultiYear);
        // no y2 salary is caught by the expiring rule before it
        let expiring = contract([Some(2.0), None, Some(0.0)], None);
        assert_eq!(classify(Some(&expiring)), ContractStatus::Expiring);
    }

    #[test]
    fn one_year_left_is_never_a_target_status() {
        let c = contract([Some(2.0), Some(2.0), Some(0.0)], None);
        assert!(!classify(Some(&c)).is_available());
    }
}

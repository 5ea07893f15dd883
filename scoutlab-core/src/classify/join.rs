//! Left join of canonical season lines to contracts by fuzzy player name.

use super::contract_status;
use super::names::NameIndex;
use crate::domain::{ContractRecord, JoinedPlayer, PlayerSeasonStat};

/// Every stat row appears exactly once in the output, in input order.
pub fn join_contracts(stats: &[PlayerSeasonStat], contracts: &[ContractRecord]) -> Vec<JoinedPlayer> {
    let index = NameIndex::build(contracts.iter().map(|c| c.player.as_str()));

    let joined: Vec<JoinedPlayer> = stats
        .iter()
        .map(|stat| {
            let hit = index.lookup(&stat.player);
            let contract = hit.and_then(|(i, _)| contracts.get(i)).cloned();
            JoinedPlayer {
                contract_status: contract_status::classify(contract.as_ref()),
                match_level: hit.map(|(_, level)| level),
                contract,
                stat: stat.clone(),
            }
        })
        .collect();

    let matched = joined.iter().filter(|j| j.contract.is_some()).count();
    tracing::debug!(
        players = joined.len(),
        matched,
        unmatched = joined.len() - matched,
        "joined contracts"
    );
    joined
}

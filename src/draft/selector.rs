//! Pattern-based filtering and set-membership over utxo lists.

use std::str::FromStr;

use super::DraftTransaction;
use super::Utxo;
use super::UtxoStrategy;

/// Matches utxos by exact txid and/or output index, with `*` as wildcard on
/// either part. Parses from `txid[:vout]` strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UtxoFilter {
    txid: Option<String>,
    vout: Option<u32>,
}

#[derive(Debug, thiserror::Error)]
pub enum ParseUtxoFilterError {
    #[error("invalid output index `{0}`")]
    Vout(String),
}

impl UtxoFilter {
    /// Matches every utxo.
    pub fn all() -> Self {
        UtxoFilter::default()
    }

    /// Build a filter from optional CLI arguments; an omitted or `*` part
    /// matches everything.
    pub fn new(txid: Option<&str>, vout: Option<u32>) -> Self {
        UtxoFilter {
            txid: txid.filter(|t| *t != "*").map(str::to_string),
            vout,
        }
    }

    /// Exact-outpoint filter for an existing utxo.
    pub fn for_utxo(utxo: &Utxo) -> Self {
        UtxoFilter {
            txid: Some(utxo.txhash.clone()),
            vout: Some(utxo.pt_idx),
        }
    }

    pub fn matches(&self, utxo: &Utxo) -> bool {
        self.txid.as_ref().map_or(true, |t| *t == utxo.txhash)
            && self.vout.map_or(true, |v| v == utxo.pt_idx)
    }

    /// Order-preserving subsequence of `utxos` matching this filter. No
    /// dedup; an absent match is an empty result, not an error.
    pub fn filter<'u>(&self, utxos: &'u [Utxo]) -> Vec<&'u Utxo> {
        utxos.iter().filter(|u| self.matches(u)).collect()
    }
}

impl FromStr for UtxoFilter {
    type Err = ParseUtxoFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (txid, vout) = match s.split_once(':') {
            Some((txid, "" | "*")) => (txid, None),
            Some((txid, vout)) => {
                let vout = vout
                    .parse::<u32>()
                    .map_err(|_| ParseUtxoFilterError::Vout(vout.to_string()))?;
                (txid, Some(vout))
            }
            None => (s, None),
        };
        Ok(UtxoFilter {
            txid: (txid != "*").then(|| txid.to_string()),
            vout,
        })
    }
}

impl DraftTransaction {
    /// Add `candidate` to the selected inputs unless an entry with the same
    /// outpoint is already present.
    pub fn select_utxo(&mut self, candidate: &Utxo) {
        let exists = self
            .used_utxos
            .iter()
            .any(|u| u.outpoint() == candidate.outpoint());
        if !exists {
            self.used_utxos.push(candidate.clone());
        }
    }

    /// Drop every selected input matching `filter`.
    pub fn deselect_utxos(&mut self, filter: &UtxoFilter) {
        self.used_utxos.retain(|u| !filter.matches(u));
    }

    /// Switching back to `default` leaves `used_utxos` in place; the engine
    /// ignores it under automatic selection.
    pub fn set_utxo_strategy(&mut self, strategy: UtxoStrategy) {
        self.utxo_strategy = strategy;
    }
}

#[cfg(test)]
mod tests {
    use serde_json::Map;

    use super::*;

    fn utxo(txhash: &str, pt_idx: u32) -> Utxo {
        Utxo {
            txhash: txhash.to_string(),
            pt_idx,
            satoshi: 50_000,
            address_type: "p2wsh".to_string(),
            block_height: 100,
            extra: Map::new(),
        }
    }

    fn sample() -> Vec<Utxo> {
        vec![utxo("aaaa", 0), utxo("aaaa", 1), utxo("bbbb", 0)]
    }

    #[test]
    fn wildcard_matches_all_in_order() {
        let utxos = sample();
        let matched = UtxoFilter::all().filter(&utxos);
        assert_eq!(utxos.iter().collect::<Vec<_>>(), matched);
    }

    #[test]
    fn exact_filter_matches_single_outpoint() {
        let utxos = sample();
        let filter: UtxoFilter = "aaaa:1".parse().unwrap();
        let matched = filter.filter(&utxos);
        assert_eq!(vec![&utxos[1]], matched);
    }

    #[test]
    fn txid_filter_matches_all_its_vouts() {
        let utxos = sample();
        for pattern in ["aaaa", "aaaa:*", "aaaa:"] {
            let filter: UtxoFilter = pattern.parse().unwrap();
            assert_eq!(vec![&utxos[0], &utxos[1]], filter.filter(&utxos));
        }
    }

    #[test]
    fn vout_only_filter_spans_transactions() {
        let utxos = sample();
        let filter: UtxoFilter = "*:0".parse().unwrap();
        assert_eq!(vec![&utxos[0], &utxos[2]], filter.filter(&utxos));
    }

    #[test]
    fn no_match_is_empty_not_an_error() {
        let utxos = sample();
        let filter: UtxoFilter = "cccc".parse().unwrap();
        assert!(filter.filter(&utxos).is_empty());
    }

    #[test]
    fn non_numeric_vout_is_a_parse_error() {
        assert!("aaaa:x".parse::<UtxoFilter>().is_err());
    }

    #[test]
    fn select_is_idempotent() {
        let mut draft = DraftTransaction::default();
        let candidate = utxo("aaaa", 0);
        draft.select_utxo(&candidate);
        draft.select_utxo(&candidate);
        assert_eq!(1, draft.used_utxos.len());
    }

    #[test]
    fn deselect_removes_all_matches() {
        let mut draft = DraftTransaction {
            used_utxos: sample(),
            ..Default::default()
        };
        draft.deselect_utxos(&"aaaa".parse().unwrap());
        assert_eq!(vec![utxo("bbbb", 0)], draft.used_utxos);
    }

    #[test]
    fn auto_strategy_leaves_selection_in_place() {
        let mut draft = DraftTransaction {
            used_utxos: sample(),
            utxo_strategy: UtxoStrategy::Manual,
            ..Default::default()
        };
        draft.set_utxo_strategy(UtxoStrategy::Default);
        assert_eq!(UtxoStrategy::Default, draft.utxo_strategy);
        assert_eq!(3, draft.used_utxos.len());
    }
}

//! Fixture builders

use cmap::{raw_triple, CmapManager, RawTriple};
use std::collections::BTreeSet;

pub fn raw(s: &str, r: &str, o: &str) -> RawTriple {
    raw_triple(s, r, o)
}

/// Manager built by inserting `triples` one at a time
pub fn manager_with(triples: &[(&str, &str, &str)]) -> CmapManager {
    let mut m = CmapManager::new();
    for (s, r, o) in triples {
        m.add_triple(&raw(s, r, o)).expect("fixture insert failed");
    }
    m
}

/// Triple values of a manager, order-insensitive
pub fn value_set(m: &CmapManager) -> BTreeSet<RawTriple> {
    m.triples().map(|t| t.value.clone()).collect()
}

/// Normalized, order-insensitive view of raw input
pub fn triple_set(raw: &[RawTriple]) -> BTreeSet<RawTriple> {
    raw.iter()
        .map(|t| {
            [
                t[0].to_lowercase(),
                t[1].to_lowercase(),
                t[2].to_lowercase(),
            ]
        })
        .collect()
}

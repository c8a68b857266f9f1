//! Fork/join topology derived from the triples sharing links

use crate::graph::{Cmap, Triple};

/// Other triples that share `triple`'s relation and source link (a fork)
pub fn source_siblings<'g>(graph: &'g Cmap, triple: &Triple) -> Vec<&'g Triple> {
    graph
        .triples()
        .filter(|t| {
            t.id != triple.id
                && t.config.rel_id == triple.config.rel_id
                && t.config.source_id == triple.config.source_id
        })
        .collect()
}

/// Other triples that share `triple`'s relation and target link (a join)
pub fn target_siblings<'g>(graph: &'g Cmap, triple: &Triple) -> Vec<&'g Triple> {
    graph
        .triples()
        .filter(|t| {
            t.id != triple.id
                && t.config.rel_id == triple.config.rel_id
                && t.config.target_id == triple.config.target_id
        })
        .collect()
}

/// Whether `triple` sits in a fork: same subject, relation and source link
/// as another triple.
pub fn in_fork(graph: &Cmap, triple: &Triple) -> bool {
    source_siblings(graph, triple)
        .iter()
        .any(|t| t.config.sub_id == triple.config.sub_id)
}

/// Whether `triple` sits in a join: same relation, object and target link as
/// another triple.
pub fn in_join(graph: &Cmap, triple: &Triple) -> bool {
    target_siblings(graph, triple)
        .iter()
        .any(|t| t.config.obj_id == triple.config.obj_id)
}

/// `(fork, join)` flags as the topology says they should be
pub fn derive_flags(graph: &Cmap, triple: &Triple) -> (bool, bool) {
    (in_fork(graph, triple), in_join(graph, triple))
}

/// Fork flag, trusting either the stored flag or the topology
pub fn is_fork(graph: &Cmap, triple: &Triple) -> bool {
    triple.config.fork || in_fork(graph, triple)
}

/// Join flag, trusting either the stored flag or the topology
pub fn is_join(graph: &Cmap, triple: &Triple) -> bool {
    triple.config.join || in_join(graph, triple)
}

//! Structural checks that must hold after every public operation

use cmap::planner::derive_flags;
use cmap::{Cmap, CmapManager, LinkType};

/// Panic with a description of the first broken invariant
pub fn assert_invariants(m: &CmapManager) {
    let graph = m.graph();
    if let Err(e) = graph.check_consistency() {
        panic!("consistency check failed: {e}");
    }

    for t in graph.triples() {
        let c = &t.config;
        let source = graph.link(&c.source_id).expect("source link");
        let target = graph.link(&c.target_id).expect("target link");
        assert_eq!(source.link_type, LinkType::Source, "triple {} source link type", t.id);
        assert_eq!(target.link_type, LinkType::Target, "triple {} target link type", t.id);
        assert_eq!(source.source, c.sub_id, "triple {} source link start", t.id);
        assert_eq!(source.target, c.rel_id, "triple {} source link end", t.id);
        assert_eq!(target.source, c.rel_id, "triple {} target link start", t.id);
        assert_eq!(target.target, c.obj_id, "triple {} target link end", t.id);
        assert!(graph.node(&c.sub_id).unwrap().is_concept(), "triple {} subject type", t.id);
        assert!(graph.node(&c.rel_id).unwrap().is_relation(), "triple {} relation type", t.id);
        assert!(graph.node(&c.obj_id).unwrap().is_concept(), "triple {} object type", t.id);

        let (fork, join) = derive_flags(graph, t);
        assert_eq!((c.fork, c.join), (fork, join), "triple {} flags disagree with topology", t.id);
    }
}

/// Owned copy of the graph for before/after comparisons
pub fn snapshot(m: &CmapManager) -> Cmap {
    m.graph().clone()
}

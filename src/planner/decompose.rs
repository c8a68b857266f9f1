//! Decomposition of a flat triple list into nodes, links and triples

use crate::config::CmapConfig;
use crate::graph::{
    normalize_triple, Cmap, IdAllocator, IdKind, Link, LinkId, LinkType, Node, NodeId, NodeType,
    RawTriple, Triple, TripleConfig,
};
use std::collections::HashMap;

/// How one triple is wired into the graph
#[derive(Debug, Clone)]
struct Wiring {
    rel: NodeId,
    source: LinkId,
    target: LinkId,
    fork: bool,
    join: bool,
}

/// Group indices of `items` by `key`, keeping first-appearance order
fn group_by<K: std::hash::Hash + Eq>(items: impl Iterator<Item = (usize, K)>) -> Vec<Vec<usize>> {
    let mut slots: HashMap<K, usize> = HashMap::new();
    let mut groups: Vec<Vec<usize>> = Vec::new();
    for (index, key) in items {
        match slots.get(&key) {
            Some(&slot) => groups[slot].push(index),
            None => {
                slots.insert(key, groups.len());
                groups.push(vec![index]);
            }
        }
    }
    groups
}

/// Build a complete concept map from raw triples.
///
/// Concepts are identified by normalized text. Triples sharing subject and
/// relation become a fork around one relation node; among the rest, triples
/// sharing relation and object become a join. Everything else gets a private
/// relation. Exact duplicate triples collapse to one.
pub fn decompose(raw: &[RawTriple], config: &CmapConfig) -> Cmap {
    let mut triples: Vec<RawTriple> = Vec::with_capacity(raw.len());
    for value in raw.iter().map(normalize_triple) {
        if !triples.contains(&value) {
            triples.push(value);
        }
    }

    let mut graph = Cmap::new();
    let mut ids = IdAllocator::new();

    let mut concepts: HashMap<&str, NodeId> = HashMap::new();
    for value in &triples {
        for text in [value[0].as_str(), value[2].as_str()] {
            if !concepts.contains_key(text) {
                concepts.insert(text, NodeId::from(ids.next(IdKind::Concept, &graph)));
            }
        }
    }

    let mut wiring: Vec<Option<Wiring>> = vec![None; triples.len()];

    let forks = group_by(
        triples
            .iter()
            .enumerate()
            .map(|(i, v)| (i, (v[0].as_str(), v[1].as_str()))),
    );
    for members in forks.into_iter().filter(|g| g.len() > 1) {
        let rel = NodeId::from(ids.next(IdKind::Relation, &graph));
        let source = LinkId::from(ids.next(IdKind::SourceLink, &graph));
        for i in members {
            wiring[i] = Some(Wiring {
                rel: rel.clone(),
                source: source.clone(),
                target: LinkId::from(ids.next(IdKind::TargetLink, &graph)),
                fork: true,
                join: false,
            });
        }
    }

    // joins are only looked for among triples no fork claimed
    let joins = group_by(
        triples
            .iter()
            .enumerate()
            .filter(|(i, _)| wiring[*i].is_none())
            .map(|(i, v)| (i, (v[1].as_str(), v[2].as_str()))),
    );
    for members in joins.into_iter().filter(|g| g.len() > 1) {
        let rel = NodeId::from(ids.next(IdKind::Relation, &graph));
        let target = LinkId::from(ids.next(IdKind::TargetLink, &graph));
        for i in members {
            wiring[i] = Some(Wiring {
                rel: rel.clone(),
                source: LinkId::from(ids.next(IdKind::SourceLink, &graph)),
                target: target.clone(),
                fork: false,
                join: true,
            });
        }
    }

    for (value, slot) in triples.iter().zip(wiring.iter_mut()) {
        if slot.is_none() {
            *slot = Some(Wiring {
                rel: NodeId::from(ids.next(IdKind::Relation, &graph)),
                source: LinkId::from(ids.next(IdKind::SourceLink, &graph)),
                target: LinkId::from(ids.next(IdKind::TargetLink, &graph)),
                fork: false,
                join: false,
            });
        }
        tracing::trace!(triple = ?value, "wired");
    }

    for (value, w) in triples.iter().zip(wiring.into_iter().flatten()) {
        let sub = concepts[value[0].as_str()].clone();
        let obj = concepts[value[2].as_str()].clone();

        for (id, node_type, text) in [
            (&sub, NodeType::Concept, &value[0]),
            (&w.rel, NodeType::Relation, &value[1]),
            (&obj, NodeType::Concept, &value[2]),
        ] {
            if !graph.nodes.contains_key(id) {
                graph.nodes.push_back(
                    Node::new(id.clone(), node_type, text).with_settings(config.node_settings.clone()),
                );
            }
        }
        for (id, link_type, from, to) in [
            (&w.source, LinkType::Source, &sub, &w.rel),
            (&w.target, LinkType::Target, &w.rel, &obj),
        ] {
            if !graph.links.contains_key(id) {
                graph.links.push_back(
                    Link::new(id.clone(), link_type, from.clone(), to.clone())
                        .with_settings(config.link_settings.clone()),
                );
            }
        }

        let mut triple_config = TripleConfig::new(sub, w.rel, obj, w.source, w.target);
        triple_config.fork = w.fork;
        triple_config.join = w.join;
        let id = ids.next(IdKind::Triple, &graph);
        graph.triples.push_back(Triple::new(id, value.clone(), triple_config));
    }

    tracing::debug!(
        nodes = graph.node_count(),
        links = graph.link_count(),
        triples = graph.triple_count(),
        "decomposed triples"
    );
    graph
}

/// Derive the triple set from nodes and links alone: every source link paired
/// with every target link leaving the same relation.
pub fn reconstruct(graph: &Cmap) -> Vec<RawTriple> {
    let mut out = Vec::new();
    for source in graph.links().filter(|l| l.link_type == LinkType::Source) {
        let (Some(sub), Some(rel)) = (graph.node(&source.source), graph.node(&source.target)) else {
            continue;
        };
        for target in graph.links_from(&rel.id, LinkType::Target) {
            if let Some(obj) = graph.node(&target.target) {
                out.push([sub.value.clone(), rel.value.clone(), obj.value.clone()]);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::raw_triple;

    fn rhyme() -> Vec<RawTriple> {
        vec![
            raw_triple("This", "or", "That"),
            raw_triple("This", "cannot", "Be"),
            raw_triple("Be", "rhymes with", "Bee"),
        ]
    }

    #[test]
    fn singletons_get_private_structure() {
        let graph = decompose(&rhyme(), &CmapConfig::default());
        assert_eq!(graph.node_count(), 7);
        assert_eq!(graph.link_count(), 6);
        assert_eq!(graph.triple_count(), 3);
        assert!(graph.triples().all(|t| !t.config.fork && !t.config.join));
        assert!(graph.check_consistency().is_ok());
    }

    #[test]
    fn shared_subject_and_relation_forks() {
        let raw = vec![raw_triple("this", "or", "that"), raw_triple("this", "or", "other")];
        let graph = decompose(&raw, &CmapConfig::default());
        assert_eq!(graph.node_count(), 4);
        assert_eq!(graph.link_count(), 3);
        let triples: Vec<_> = graph.triples().collect();
        assert!(triples.iter().all(|t| t.config.fork && !t.config.join));
        assert_eq!(triples[0].config.rel_id, triples[1].config.rel_id);
        assert_eq!(triples[0].config.source_id, triples[1].config.source_id);
        assert_ne!(triples[0].config.target_id, triples[1].config.target_id);
    }

    #[test]
    fn shared_relation_and_object_joins() {
        let raw = vec![raw_triple("a", "likes", "x"), raw_triple("b", "likes", "x")];
        let graph = decompose(&raw, &CmapConfig::default());
        assert_eq!(graph.node_count(), 4);
        assert_eq!(graph.link_count(), 3);
        let triples: Vec<_> = graph.triples().collect();
        assert!(triples.iter().all(|t| t.config.join && !t.config.fork));
        assert_eq!(triples[0].config.target_id, triples[1].config.target_id);
        assert_ne!(triples[0].config.source_id, triples[1].config.source_id);
    }

    #[test]
    fn fork_wins_over_join() {
        // (a likes x) is both a fork member with (a likes y) and a join
        // candidate with (b likes x); the fork claims it.
        let raw = vec![
            raw_triple("a", "likes", "x"),
            raw_triple("a", "likes", "y"),
            raw_triple("b", "likes", "x"),
        ];
        let graph = decompose(&raw, &CmapConfig::default());
        let forked = graph.triples().filter(|t| t.config.fork).count();
        let joined = graph.triples().filter(|t| t.config.join).count();
        assert_eq!(forked, 2);
        assert_eq!(joined, 0);
        assert_eq!(graph.nodes().filter(|n| n.is_relation()).count(), 2);
    }

    #[test]
    fn placeholder_relations_group_literally() {
        let raw = vec![raw_triple("a", "???", "x"), raw_triple("a", "???", "y")];
        let graph = decompose(&raw, &CmapConfig::default());
        assert!(graph.triples().all(|t| t.config.fork));
    }

    #[test]
    fn duplicates_collapse() {
        let raw = vec![raw_triple("a", "b", "c"), raw_triple("A", "B", "C")];
        let graph = decompose(&raw, &CmapConfig::default());
        assert_eq!(graph.triple_count(), 1);
    }

    #[test]
    fn reconstruct_round_trips_values() {
        let mut raw = rhyme();
        raw.push(raw_triple("this", "or", "other"));
        raw.push(raw_triple("bee", "rhymes with", "be"));
        let graph = decompose(&raw, &CmapConfig::default());

        let mut expected: Vec<RawTriple> = raw.iter().map(normalize_triple).collect();
        let mut rebuilt = reconstruct(&graph);
        expected.sort();
        rebuilt.sort();
        assert_eq!(rebuilt, expected);
    }
}

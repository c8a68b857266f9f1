//! Undo as an exact inverse
//!
//! Every public mutation is committed as one step. Undoing that step must
//! restore the previous map exactly, including entity order and settings.

mod common;

use cmap::{
    CmapManager, ConceptSimilarity, LinkTemplate, LinkType, NodeTemplate, NodeType, RelationRule,
    RelationSimilarity, RestatedTriple, Role, SimilarTriple, TripleValueEdit,
};
use common::init_tracing;
use common::fixtures::{manager_with, raw};
use common::invariants::{assert_invariants, snapshot};

/// The base map most scenarios start from: a fork, a join and a singleton
fn base() -> CmapManager {
    manager_with(&[
        ("cells", "contain", "dna"),
        ("cells", "contain", "water"),
        ("plants", "need", "light"),
        ("algae", "need", "light"),
        ("dna", "encodes", "proteins"),
    ])
}

/// Apply `op`, check it committed exactly one step, undo, compare
fn assert_undoes(name: &str, op: impl FnOnce(&mut CmapManager)) {
    init_tracing();
    let mut m = base();
    let before = snapshot(&m);
    let steps = m.log().len();

    op(&mut m);
    assert_invariants(&m);
    assert_eq!(m.log().len(), steps + 1, "{name} should commit one step");
    assert_ne!(snapshot(&m), before, "{name} changed nothing");

    m.undo().unwrap();
    assert_eq!(snapshot(&m), before, "{name} was not undone exactly");
    assert_invariants(&m);
}

fn concept(m: &CmapManager, text: &str) -> cmap::NodeId {
    m.find_concept_id(text).unwrap()
}

fn relation(m: &CmapManager, text: &str) -> cmap::NodeId {
    m.graph().find_node_by_value(text, NodeType::Relation).unwrap().id.clone()
}

#[test]
fn undo_text_insertions() {
    for (s, r, o) in [
        ("mice", "eat", "cheese"),
        ("cells", "contain", "lipids"),
        ("dna", "encodes", "rna"),
        ("ferns", "need", "light"),
        ("algae", "need", "water"),
        ("viruses", "contain", "dna"),
    ] {
        assert_undoes(&format!("add {s} {r} {o}"), |m| {
            m.add_triple(&raw(s, r, o)).unwrap();
        });
    }
}

#[test]
fn undo_text_removals() {
    for (s, r, o) in [
        ("cells", "contain", "water"),
        ("algae", "need", "light"),
        ("dna", "encodes", "proteins"),
    ] {
        assert_undoes(&format!("remove {s} {r} {o}"), |m| {
            m.remove_triple(&raw(s, r, o)).unwrap();
        });
    }
}

#[test]
fn undo_graph_edits() {
    assert_undoes("add node", |m| {
        m.add_node(&NodeTemplate::concept("ribosomes").at(3.0, 4.0)).unwrap();
    });
    assert_undoes("add link", |m| {
        let algae = concept(m, "algae");
        let contain = relation(m, "contain");
        m.add_link(&LinkTemplate::source(algae, contain)).unwrap();
    });
    assert_undoes("add node and link", |m| {
        let encodes = relation(m, "encodes");
        m.add_node_and_link(&encodes, &NodeTemplate::concept("enzymes")).unwrap();
    });
    assert_undoes("proposition from concepts", |m| {
        let (a, b) = (concept(m, "plants"), concept(m, "water"));
        m.add_proposition_from_concepts(&a, &b, Some((1.0, 1.0))).unwrap();
    });
    assert_undoes("proposition from single concept", |m| {
        let a = concept(m, "proteins");
        m.add_proposition_from_single_concept(&a, Some((5.0, 5.0))).unwrap();
    });
}

#[test]
fn undo_graph_removals() {
    assert_undoes("remove node", |m| {
        let light = concept(m, "light");
        m.remove_node_ordered(&light).unwrap();
    });
    assert_undoes("remove nodes", |m| {
        let ids = vec![concept(m, "cells"), concept(m, "proteins")];
        m.remove_nodes_ordered(&ids).unwrap();
    });
    assert_undoes("remove link", |m| {
        let link = m.find_link_by_value("cells", "contain", LinkType::Source).unwrap().id.clone();
        m.remove_link(&link).unwrap();
    });
    assert_undoes("remove link ordered", |m| {
        let link = m.find_link_by_value("need", "light", LinkType::Target).unwrap().id.clone();
        m.remove_link_ordered(&link).unwrap();
    });
}

#[test]
fn undo_value_updates() {
    assert_undoes("update node", |m| {
        let dna = concept(m, "dna");
        m.update_node_value(&dna, "Genome").unwrap();
    });
    assert_undoes("update triples", |m| {
        let id = m.find_triple_by_terms(&raw("plants", "need", "light")).unwrap().id.clone();
        m.update_triples_value(&[TripleValueEdit::new(id, raw("trees", "require", "sunlight"))])
            .unwrap();
    });
}

#[test]
fn undo_merges() {
    assert_undoes("merge concepts", |m| {
        let (target, source) = (concept(m, "plants"), concept(m, "algae"));
        m.merge_nodes(&target, &[source]).unwrap();
    });
    assert_undoes("merge relations", |m| {
        let (target, source) = (relation(m, "contain"), relation(m, "encodes"));
        m.merge_relation_nodes(&target, &[source]).unwrap();
    });
    assert_undoes("concept similarity", |m| {
        let triple = m.find_triple_by_terms(&raw("dna", "encodes", "proteins")).unwrap().id.clone();
        let signal = ConceptSimilarity {
            id: concept(m, "water"),
            triples: vec![SimilarTriple { triple_id: triple, role: Role::Object }],
        };
        m.merge_concepts_by_similarity(&signal).unwrap();
    });
    assert_undoes("relation similarity", |m| {
        let triple = m.find_triple_by_terms(&raw("dna", "encodes", "proteins")).unwrap().id.clone();
        let signal = RelationSimilarity {
            word: "codes for".into(),
            triples: vec![RestatedTriple {
                triple_id: triple,
                subject: "dna".into(),
                predicate: "specifies".into(),
                object: "proteins".into(),
            }],
        };
        m.merge_relations_by_similarity(&signal, RelationRule::SemanticSimilarity).unwrap();
    });
}

#[test]
fn undo_walks_back_to_empty() {
    init_tracing();
    let mut m = base();
    let steps = m.log().len();
    assert_eq!(steps, 5);

    for remaining in (0..steps).rev() {
        assert_eq!(m.undo().unwrap(), remaining > 0);
        assert_invariants(&m);
    }
    assert!(m.graph().is_empty());
    assert!(!m.undo().unwrap());
}

#[test]
fn failed_operations_leave_log_alone() {
    let mut m = base();
    let before = snapshot(&m);
    assert!(m.remove_triple(&raw("no", "such", "triple")).is_err());
    assert!(m.update_node_value(&"c-missing".into(), "x").is_err());
    assert!(m.merge_nodes(&"c-missing".into(), &[]).is_err());
    assert_eq!(snapshot(&m), before);
    assert_eq!(m.log().len(), 5);
}

#[test]
fn empty_steps_are_not_logged() {
    let mut m = base();
    m.add_triple(&raw("cells", "contain", "dna")).unwrap();
    let dna = concept(&m, "dna");
    m.update_node_value(&dna, "DNA").unwrap();
    assert_eq!(m.log().len(), 5);
}

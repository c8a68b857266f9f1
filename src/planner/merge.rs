//! Merging nodes: repoint, collapse duplicate links and triples to a fixed
//! point, then drop the merged-away node.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use super::builder::StepBuilder;
use super::insert::plan_triple_insertion;
use super::remove::plan_triple_removal;
use crate::action::{Action, LinkEndpoints};
use crate::config::CmapConfig;
use crate::error::{CmapError, CmapResult};
use crate::graph::{normalize_text, raw_triple, Cmap, LinkId, NodeId, NodeType, Role, TripleId};

/// One triple where a similar concept appears, and in which role
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimilarTriple {
    pub triple_id: TripleId,
    pub role: Role,
}

/// Concepts judged equivalent to the concept `id`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConceptSimilarity {
    pub id: NodeId,
    pub triples: Vec<SimilarTriple>,
}

/// A triple as an external reviewer restated it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestatedTriple {
    pub triple_id: TripleId,
    pub subject: String,
    pub predicate: String,
    pub object: String,
}

/// Relations judged equivalent to `word`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationSimilarity {
    pub word: String,
    pub triples: Vec<RestatedTriple>,
}

/// How a relation similarity rewrites the triples it lists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationRule {
    /// Keep subject and object, use the shared word as relation
    SemanticSimilarity,
    /// Replace the whole triple with the restatement
    Restatement,
}

fn require_type(graph: &Cmap, id: &NodeId, expected: NodeType) -> CmapResult<()> {
    let node = graph.require_node(id)?;
    if node.node_type != expected {
        return Err(CmapError::WrongNodeType {
            id: id.clone(),
            expected,
        });
    }
    Ok(())
}

/// Plan merging each of `sources` into `target`, all of one node type.
fn plan_merge(
    graph: &Cmap,
    config: &CmapConfig,
    target: &NodeId,
    sources: &[NodeId],
    node_type: NodeType,
) -> CmapResult<Vec<Action>> {
    require_type(graph, target, node_type)?;
    let mut seen = HashSet::new();
    let sources: Vec<&NodeId> = sources
        .iter()
        .filter(|s| *s != target && seen.insert(*s))
        .collect();
    for source in &sources {
        require_type(graph, source, node_type)?;
    }

    let mut b = StepBuilder::new(graph, config);
    for source in sources {
        merge_one(&mut b, target, source, node_type)?;
    }
    b.refresh_all_flags()?;
    Ok(b.finish())
}

/// Merge the concept nodes `sources` into `target`
pub fn plan_concept_merge(graph: &Cmap, config: &CmapConfig, target: &NodeId, sources: &[NodeId]) -> CmapResult<Vec<Action>> {
    plan_merge(graph, config, target, sources, NodeType::Concept)
}

/// Merge the relation nodes `sources` into `target`
pub fn plan_relation_merge(graph: &Cmap, config: &CmapConfig, target: &NodeId, sources: &[NodeId]) -> CmapResult<Vec<Action>> {
    plan_merge(graph, config, target, sources, NodeType::Relation)
}

fn merge_one(b: &mut StepBuilder<'_>, target: &NodeId, source: &NodeId, node_type: NodeType) -> CmapResult<()> {
    let repoint = |id: &NodeId| if id == source { target.clone() } else { id.clone() };

    let links: Vec<(LinkId, LinkEndpoints)> = b
        .graph()
        .links_touching(source)
        .into_iter()
        .map(|l| (l.id.clone(), LinkEndpoints::new(repoint(&l.source), repoint(&l.target))))
        .collect();
    for (id, ends) in links {
        b.update_link(&id, ends)?;
    }

    let triples: Vec<TripleId> = b
        .graph()
        .triples_referencing_node(source)
        .into_iter()
        .map(|t| t.id.clone())
        .collect();
    for id in &triples {
        b.update_triple(id, |c| match node_type {
            NodeType::Concept => {
                c.sub_id = repoint(&c.sub_id);
                c.obj_id = repoint(&c.obj_id);
            }
            NodeType::Relation => c.rel_id = repoint(&c.rel_id),
        })?;
    }

    let mut passes = 0;
    while dedupe_links(b)? | dedupe_triples(b)? {
        passes += 1;
    }
    b.remove_node(source)?;
    tracing::debug!(%source, %target, passes, "planned pairwise merge");
    Ok(())
}

/// Collapse links joining the same two nodes onto the earliest one.
/// Returns whether anything changed.
fn dedupe_links(b: &mut StepBuilder<'_>) -> CmapResult<bool> {
    let mut first: HashMap<(NodeId, NodeId), LinkId> = HashMap::new();
    let mut duplicates: Vec<(LinkId, LinkId)> = Vec::new();
    for link in b.graph().links() {
        let key = (link.source.clone(), link.target.clone());
        match first.get(&key) {
            Some(keep) => duplicates.push((link.id.clone(), keep.clone())),
            None => {
                first.insert(key, link.id.clone());
            }
        }
    }

    for (dup, keep) in &duplicates {
        let users: Vec<TripleId> = b
            .graph()
            .triples_using_link(dup)
            .into_iter()
            .map(|t| t.id.clone())
            .collect();
        for id in &users {
            b.update_triple(id, |c| {
                if &c.source_id == dup {
                    c.source_id = keep.clone();
                }
                if &c.target_id == dup {
                    c.target_id = keep.clone();
                }
            })?;
        }
        b.remove_link(dup)?;
    }
    Ok(!duplicates.is_empty())
}

/// Drop triples structurally identical to an earlier one.
/// Returns whether anything changed.
fn dedupe_triples(b: &mut StepBuilder<'_>) -> CmapResult<bool> {
    let mut seen = HashSet::new();
    let duplicates: Vec<TripleId> = b
        .graph()
        .triples()
        .filter(|t| !seen.insert(t.config.structure_key()))
        .map(|t| t.id.clone())
        .collect();
    for id in &duplicates {
        b.remove_triple(id)?;
    }
    Ok(!duplicates.is_empty())
}

/// Merge every concept the signal points at into the signal's concept
pub fn plan_concept_similarity(graph: &Cmap, config: &CmapConfig, signal: &ConceptSimilarity) -> CmapResult<Vec<Action>> {
    let mut sources = Vec::with_capacity(signal.triples.len());
    for similar in &signal.triples {
        let triple = graph.require_triple(&similar.triple_id)?;
        sources.push(triple.config.node(similar.role).clone());
    }
    plan_concept_merge(graph, config, &signal.id, &sources)
}

/// Re-state each listed triple whose relation text differs from the
/// reviewer's predicate: the old triple is removed and the replacement
/// inserted as a new one.
pub fn plan_relation_similarity(
    graph: &Cmap,
    config: &CmapConfig,
    signal: &RelationSimilarity,
    rule: RelationRule,
) -> CmapResult<Vec<Action>> {
    let mut b = StepBuilder::new(graph, config);
    for restated in &signal.triples {
        let triple = b.graph().require_triple(&restated.triple_id)?.clone();
        if triple.value[1] == normalize_text(&restated.predicate) {
            continue;
        }
        let replacement = match rule {
            RelationRule::SemanticSimilarity => {
                raw_triple(triple.value[0].clone(), signal.word.clone(), triple.value[2].clone())
            }
            RelationRule::Restatement => raw_triple(
                restated.subject.clone(),
                restated.predicate.clone(),
                restated.object.clone(),
            ),
        };

        let removal = plan_triple_removal(b.graph(), config, &triple.id)?;
        b.extend(removal.actions)?;
        let insertion = plan_triple_insertion(b.graph(), config, &replacement)?;
        b.extend(insertion.actions)?;
        tracing::debug!(old = %triple.sentence(), new = ?replacement, "restated triple");
    }
    Ok(b.finish())
}

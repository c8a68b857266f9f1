//! Removal planning: take triples, links and nodes out without leaving orphans

use std::collections::BTreeSet;

use super::builder::StepBuilder;
use super::topology;
use crate::action::Action;
use crate::config::CmapConfig;
use crate::error::CmapResult;
use crate::graph::{Cmap, LinkId, NodeId, TripleId};

/// Where the removed triple sat in the topology
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemovalKind {
    /// Shared its relation and source link with other objects
    ForkMember,
    /// Shared its relation and target link with other subjects
    JoinMember,
    Singleton,
}

#[derive(Debug, Clone)]
pub struct RemovalPlan {
    pub actions: Vec<Action>,
    pub kind: RemovalKind,
}

/// Plan the removal of one triple and everything only it was keeping alive.
pub fn plan_triple_removal(graph: &Cmap, config: &CmapConfig, id: &TripleId) -> CmapResult<RemovalPlan> {
    let triple = graph.require_triple(id)?.clone();
    let kind = if !topology::source_siblings(graph, &triple).is_empty() {
        RemovalKind::ForkMember
    } else if !topology::target_siblings(graph, &triple).is_empty() {
        RemovalKind::JoinMember
    } else {
        RemovalKind::Singleton
    };

    let mut b = StepBuilder::new(graph, config);
    b.remove_triple(&triple.id)?;
    let c = &triple.config;
    drop_unused_links(&mut b, [&c.source_id, &c.target_id])?;
    drop_unused_nodes(&mut b, [&c.rel_id, &c.sub_id, &c.obj_id])?;
    // clears the flag of a sibling left alone in its fork or join
    b.refresh_touched_flags()?;

    tracing::debug!(triple = %triple.sentence(), ?kind, "planned triple removal");
    Ok(RemovalPlan {
        actions: b.finish(),
        kind,
    })
}

/// Remove links no remaining triple is built on
fn drop_unused_links<'i>(b: &mut StepBuilder<'_>, ids: impl IntoIterator<Item = &'i LinkId>) -> CmapResult<()> {
    for id in ids {
        if b.graph().link(id).is_some() && b.graph().triples_using_link(id).is_empty() {
            b.remove_link(id)?;
        }
    }
    Ok(())
}

/// Remove nodes no remaining triple references and no link touches
fn drop_unused_nodes<'i>(b: &mut StepBuilder<'_>, ids: impl IntoIterator<Item = &'i NodeId>) -> CmapResult<()> {
    for id in ids {
        let g = b.graph();
        if g.node(id).is_some() && g.triples_referencing_node(id).is_empty() && g.links_touching(id).is_empty() {
            b.remove_node(id)?;
        }
    }
    Ok(())
}

/// Remove nodes together with every triple and link that references them:
/// triples first, then links, then the nodes.
pub fn plan_node_removal(graph: &Cmap, config: &CmapConfig, ids: &[NodeId]) -> CmapResult<Vec<Action>> {
    for id in ids {
        graph.require_node(id)?;
    }

    let mut b = StepBuilder::new(graph, config);
    let triples: Vec<TripleId> = graph
        .triples()
        .filter(|t| ids.iter().any(|id| t.config.references_node(id)))
        .map(|t| t.id.clone())
        .collect();
    for triple in &triples {
        b.remove_triple(triple)?;
    }

    let links: Vec<LinkId> = graph
        .links()
        .filter(|l| ids.iter().any(|id| l.touches(id)))
        .map(|l| l.id.clone())
        .collect();
    for link in &links {
        b.remove_link(link)?;
    }
    for id in ids {
        if b.graph().node(id).is_some() {
            b.remove_node(id)?;
        }
    }

    b.refresh_touched_flags()?;
    tracing::debug!(nodes = ids.len(), triples = triples.len(), links = links.len(), "planned node removal");
    Ok(b.finish())
}

/// Remove a link and the triples built on it, nothing else
pub fn plan_link_removal(graph: &Cmap, config: &CmapConfig, id: &LinkId) -> CmapResult<Vec<Action>> {
    graph.require_link(id)?;
    let mut b = StepBuilder::new(graph, config);
    let triples: Vec<TripleId> = graph.triples_using_link(id).into_iter().map(|t| t.id.clone()).collect();
    for triple in &triples {
        b.remove_triple(triple)?;
    }
    b.remove_link(id)?;
    b.refresh_touched_flags()?;
    Ok(b.finish())
}

/// Remove a link, the triples built on it, and whatever links and relation
/// nodes those triples leave unused. Surviving triples get their fork/join
/// flags re-derived.
pub fn plan_link_removal_ordered(graph: &Cmap, config: &CmapConfig, id: &LinkId) -> CmapResult<Vec<Action>> {
    graph.require_link(id)?;
    let mut b = StepBuilder::new(graph, config);

    let removed: Vec<_> = graph.triples_using_link(id).into_iter().cloned().collect();
    for triple in &removed {
        b.remove_triple(&triple.id)?;
    }
    b.remove_link(id)?;

    drop_unused_links(
        &mut b,
        removed.iter().flat_map(|t| [&t.config.source_id, &t.config.target_id]).filter(|l| *l != id),
    )?;
    let relations: BTreeSet<NodeId> = removed.iter().map(|t| t.config.rel_id.clone()).collect();
    drop_unused_nodes(&mut b, relations.iter())?;

    b.refresh_touched_flags()?;
    tracing::debug!(link = %id, triples = removed.len(), "planned ordered link removal");
    Ok(b.finish())
}

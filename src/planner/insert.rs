//! Incremental triple insertion: attach one new triple to existing structure

use super::builder::StepBuilder;
use super::topology;
use crate::action::Action;
use crate::config::CmapConfig;
use crate::error::{CmapError, CmapResult};
use crate::graph::{
    normalize_triple, Cmap, Link, LinkId, LinkType, NodeId, NodeType, PartialTripleConfig, RawTriple,
    Triple, TripleConfig,
};

/// Which attachment the planner chose for a new triple
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attachment {
    /// An identical triple already exists; nothing to do
    Existing,
    /// Added another object to a relation that already fans out
    ExtendFork,
    /// Subject and relation matched a join member: the join was split and
    /// a new fork built on a private relation
    SplitJoin,
    /// Turned a single triple into a two-object fork
    StartFork,
    /// Fed another subject into an existing join
    ExtendJoin,
    /// Relation and object matched a fork member, which cannot take a join
    /// partner; the triple got a private relation
    BesideFork,
    /// Turned a single triple into a two-subject join
    StartJoin,
    /// No connection point; fully independent structure
    Fresh,
}

/// Actions for one insertion plus the attachment that produced them
#[derive(Debug, Clone)]
pub struct InsertionPlan {
    pub actions: Vec<Action>,
    pub attachment: Attachment,
}

/// Links of `link_type` joining nodes valued `from` and `to` that realize at
/// least one triple
fn realized_links(graph: &Cmap, from: &str, to: &str, link_type: LinkType) -> Vec<Link> {
    graph
        .find_links_by_value(from, to, link_type)
        .into_iter()
        .filter(|l| !graph.triples_using_link(&l.id).is_empty())
        .cloned()
        .collect()
}

/// Existing concept with exactly this value, or a new one. Placeholder text
/// always yields a new node.
fn resolve_concept(b: &mut StepBuilder<'_>, text: &str) -> CmapResult<NodeId> {
    if !b.config().is_placeholder(text) {
        if let Some(node) = b.graph().find_node_by_value(text, NodeType::Concept) {
            return Ok(node.id.clone());
        }
    }
    Ok(b.add_node(NodeType::Concept, text, None)?.id)
}

/// Plan the insertion of `raw` (normalized first) into `graph`.
pub fn plan_triple_insertion(graph: &Cmap, config: &CmapConfig, raw: &RawTriple) -> CmapResult<InsertionPlan> {
    let value = normalize_triple(raw);
    if graph.find_triple_by_value(&value).is_some() {
        return Ok(InsertionPlan {
            actions: Vec::new(),
            attachment: Attachment::Existing,
        });
    }

    let [subject, relation, object] = &value;
    let open = |a: &str, b: &str| !config.is_placeholder(a) && !config.is_placeholder(b);

    let source_link = if open(subject, relation) {
        realized_links(graph, subject, relation, LinkType::Source).into_iter().next()
    } else {
        None
    };
    let target_links = if open(relation, object) {
        realized_links(graph, relation, object, LinkType::Target)
    } else {
        Vec::new()
    };

    let mut b = StepBuilder::new(graph, config);
    let attachment = if let Some(link) = source_link {
        attach_by_source(&mut b, &value, &link)?
    } else if !target_links.is_empty() {
        attach_by_target(&mut b, &value, &target_links)?
    } else {
        attach_fresh(&mut b, &value)?
    };
    b.refresh_touched_flags()?;

    tracing::debug!(triple = ?value, ?attachment, "planned triple insertion");
    Ok(InsertionPlan {
        actions: b.finish(),
        attachment,
    })
}

/// Subject and relation already realized by `link`
fn attach_by_source(b: &mut StepBuilder<'_>, value: &RawTriple, link: &Link) -> CmapResult<Attachment> {
    let siblings: Vec<Triple> = b
        .graph()
        .triples()
        .filter(|t| t.config.source_id == link.id)
        .cloned()
        .collect();
    let Some(sibling) = siblings.first().cloned() else {
        return attach_fresh(b, value);
    };
    let c = sibling.config.clone();
    let sub = link.source.clone();
    let obj = resolve_concept(b, &value[2])?;

    if siblings.len() > 1 {
        let target = b.add_link(LinkType::Target, &c.rel_id, &obj)?;
        b.add_triple(TripleConfig::new(sub, c.rel_id, obj, c.source_id, target.id).forked())?;
        return Ok(Attachment::ExtendFork);
    }

    if topology::is_join(b.graph(), &sibling) {
        // move the subject and both objects onto a private relation, leaving
        // the old relation to the remaining join members
        let rel = b.add_node(NodeType::Relation, &value[1], None)?;
        let source = b.add_link(LinkType::Source, &sub, &rel.id)?;
        let target = b.add_link(LinkType::Target, &rel.id, &obj)?;
        let old_target = b.add_link(LinkType::Target, &rel.id, &c.obj_id)?;
        b.add_triple(TripleConfig::new(sub, rel.id.clone(), obj, source.id.clone(), target.id).forked())?;

        b.remove_link(&c.source_id)?;
        b.update_triple(&sibling.id, |s| {
            s.rel_id = rel.id.clone();
            s.source_id = source.id.clone();
            s.target_id = old_target.id.clone();
            s.fork = true;
            s.join = false;
        })?;

        let remaining: Vec<Triple> = b
            .graph()
            .triples()
            .filter(|t| t.config.rel_id == c.rel_id)
            .cloned()
            .collect();
        match remaining.as_slice() {
            [] => {
                // the flag was stale: nothing else used the old relation
                b.remove_link(&c.target_id)?;
                if b.graph().links_touching(&c.rel_id).is_empty() {
                    b.remove_node(&c.rel_id)?;
                }
            }
            [last] => {
                b.update_triple(&last.id, |t| t.join = false)?;
            }
            _ => {}
        }
        return Ok(Attachment::SplitJoin);
    }

    let target = b.add_link(LinkType::Target, &c.rel_id, &obj)?;
    b.add_triple(TripleConfig::new(sub, c.rel_id, obj, c.source_id, target.id).forked())?;
    b.update_triple(&sibling.id, |s| {
        s.fork = true;
        s.join = false;
    })?;
    Ok(Attachment::StartFork)
}

/// Relation and object already realized by `links`
fn attach_by_target(b: &mut StepBuilder<'_>, value: &RawTriple, links: &[Link]) -> CmapResult<Attachment> {
    let members: Vec<Triple> = b
        .graph()
        .triples()
        .filter(|t| t.config.target_id == links[0].id)
        .cloned()
        .collect();
    let Some(sibling) = members.first().cloned() else {
        return attach_fresh(b, value);
    };

    let join_member = if links.len() > 1 {
        b.graph()
            .triples()
            .filter(|t| links.iter().any(|l| l.id == t.config.target_id))
            .find(|t| topology::is_join(b.graph(), t))
            .cloned()
    } else {
        None
    };
    let join_member = join_member.or_else(|| {
        topology::is_join(b.graph(), &sibling).then(|| sibling.clone())
    });

    if let Some(member) = join_member {
        let c = member.config;
        let sub = resolve_concept(b, &value[0])?;
        let source = b.add_link(LinkType::Source, &sub, &c.rel_id)?;
        b.add_triple(TripleConfig::new(sub, c.rel_id, c.obj_id, source.id, c.target_id).joined())?;
        return Ok(Attachment::ExtendJoin);
    }

    if topology::is_fork(b.graph(), &sibling) {
        let sub = resolve_concept(b, &value[0])?;
        let obj = sibling.config.obj_id.clone();
        let rel = b.add_node(NodeType::Relation, &value[1], None)?;
        let source = b.add_link(LinkType::Source, &sub, &rel.id)?;
        let target = b.add_link(LinkType::Target, &rel.id, &obj)?;
        b.add_triple(TripleConfig::new(sub, rel.id, obj, source.id, target.id))?;
        return Ok(Attachment::BesideFork);
    }

    let c = sibling.config.clone();
    let sub = resolve_concept(b, &value[0])?;
    let source = b.add_link(LinkType::Source, &sub, &c.rel_id)?;
    b.add_triple(TripleConfig::new(sub, c.rel_id, c.obj_id, source.id, c.target_id).joined())?;
    b.update_triple(&sibling.id, |s| {
        s.join = true;
        s.fork = false;
    })?;
    Ok(Attachment::StartJoin)
}

fn attach_fresh(b: &mut StepBuilder<'_>, value: &RawTriple) -> CmapResult<Attachment> {
    let sub = resolve_concept(b, &value[0])?;
    let obj = resolve_concept(b, &value[2])?;
    let rel = b.add_node(NodeType::Relation, &value[1], None)?;
    let source = b.add_link(LinkType::Source, &sub, &rel.id)?;
    let target = b.add_link(LinkType::Target, &rel.id, &obj)?;
    b.add_triple(TripleConfig::new(sub, rel.id, obj, source.id, target.id))?;
    Ok(Attachment::Fresh)
}

/// Plan a triple from caller-known ids, creating whatever `partial` leaves
/// out. The triple's value is read from the resolved nodes, so `raw` only
/// names the nodes that have to be created.
pub fn plan_triple_with_ids(
    graph: &Cmap,
    config: &CmapConfig,
    raw: &RawTriple,
    partial: &PartialTripleConfig,
) -> CmapResult<Vec<Action>> {
    let value = normalize_triple(raw);
    let mut b = StepBuilder::new(graph, config);

    let sub = known_or_new_node(&mut b, partial.sub_id.as_ref(), NodeType::Concept, &value[0])?;
    let obj = known_or_new_node(&mut b, partial.obj_id.as_ref(), NodeType::Concept, &value[2])?;
    let rel = known_or_new_node(&mut b, partial.rel_id.as_ref(), NodeType::Relation, &value[1])?;
    let source = known_or_new_link(&mut b, partial.source_id.as_ref(), LinkType::Source, &sub, &rel)?;
    let target = known_or_new_link(&mut b, partial.target_id.as_ref(), LinkType::Target, &rel, &obj)?;

    let id = b.add_triple(TripleConfig::new(sub, rel, obj, source, target))?;
    b.refresh_touched_flags()?;
    tracing::debug!(triple = %id, "planned triple from ids");
    Ok(b.finish())
}

fn known_or_new_node(
    b: &mut StepBuilder<'_>,
    id: Option<&NodeId>,
    node_type: NodeType,
    text: &str,
) -> CmapResult<NodeId> {
    match id {
        Some(id) => Ok(b.graph().require_node(id)?.id.clone()),
        None => Ok(b.add_node(node_type, text, None)?.id),
    }
}

/// A given link must already join `from` to `to`
fn known_or_new_link(
    b: &mut StepBuilder<'_>,
    id: Option<&LinkId>,
    link_type: LinkType,
    from: &NodeId,
    to: &NodeId,
) -> CmapResult<LinkId> {
    match id {
        Some(id) => {
            let existing = b.graph().require_link(id)?;
            if &existing.source != from || &existing.target != to {
                return Err(CmapError::LinkMismatch(id.clone()));
            }
            Ok(id.clone())
        }
        None => Ok(b.add_link(link_type, from, to)?.id),
    }
}

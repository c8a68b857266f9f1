//! Planners for edits made on the graph side: nodes, links, propositions and
//! value changes.

use super::builder::StepBuilder;
use crate::action::Action;
use crate::config::CmapConfig;
use crate::error::CmapResult;
use crate::graph::{
    normalize_text, normalize_triple, Cmap, Link, LinkTemplate, LinkType, Node, NodeId,
    NodeTemplate, NodeType, RawTriple, TripleConfig, TripleId,
};

/// Actions of one edit plus the entity it created
#[derive(Debug, Clone)]
pub struct EditPlan<T> {
    pub actions: Vec<Action>,
    pub created: T,
}

/// New value for every node of one triple
#[derive(Debug, Clone, PartialEq)]
pub struct TripleValueEdit {
    pub id: TripleId,
    pub value: RawTriple,
}

impl TripleValueEdit {
    pub fn new(id: impl Into<TripleId>, value: RawTriple) -> Self {
        Self { id: id.into(), value }
    }
}

pub fn plan_add_node(graph: &Cmap, config: &CmapConfig, template: &NodeTemplate) -> CmapResult<EditPlan<Node>> {
    let mut b = StepBuilder::new(graph, config);
    let node = b.add_node(template.node_type, &template.value, template.position)?;
    Ok(EditPlan {
        actions: b.finish(),
        created: node,
    })
}

/// Add a link and every triple it completes. A source link pairs with each
/// target link leaving its relation, a target link with each source link
/// entering its relation.
pub fn plan_add_link(graph: &Cmap, config: &CmapConfig, template: &LinkTemplate) -> CmapResult<EditPlan<Link>> {
    graph.require_node(&template.source)?;
    graph.require_node(&template.target)?;

    let mut b = StepBuilder::new(graph, config);
    let link = b.add_link(template.link_type, &template.source, &template.target)?;
    derive_triples(&mut b, &link)?;
    Ok(EditPlan {
        actions: b.finish(),
        created: link,
    })
}

fn derive_triples(b: &mut StepBuilder<'_>, link: &Link) -> CmapResult<()> {
    let configs: Vec<TripleConfig> = match link.link_type {
        LinkType::Source => b
            .graph()
            .links_from(&link.target, LinkType::Target)
            .into_iter()
            .map(|t| {
                TripleConfig::new(
                    link.source.clone(),
                    link.target.clone(),
                    t.target.clone(),
                    link.id.clone(),
                    t.id.clone(),
                )
            })
            .collect(),
        LinkType::Target => b
            .graph()
            .links_into(&link.source, LinkType::Source)
            .into_iter()
            .map(|s| {
                TripleConfig::new(
                    s.source.clone(),
                    link.source.clone(),
                    link.target.clone(),
                    s.id.clone(),
                    link.id.clone(),
                )
            })
            .collect(),
    };

    let mut added = Vec::with_capacity(configs.len());
    for config in configs {
        added.push(b.add_triple(config)?);
    }
    if !added.is_empty() {
        b.refresh_touched_flags()?;
        tracing::debug!(link = %link.id, triples = added.len(), "derived triples from new link");
    }
    Ok(())
}

/// Create a node wired to `existing`: a source link when `existing` is a
/// concept, a target link (completing triples) when it is a relation.
pub fn plan_add_node_and_link(
    graph: &Cmap,
    config: &CmapConfig,
    existing: &NodeId,
    template: &NodeTemplate,
) -> CmapResult<EditPlan<Node>> {
    let anchor = graph.require_node(existing)?;
    let link_type = if anchor.is_concept() {
        LinkType::Source
    } else {
        LinkType::Target
    };

    let mut b = StepBuilder::new(graph, config);
    let node = b.add_node(template.node_type, &template.value, template.position)?;
    let link = b.add_link(link_type, existing, &node.id)?;
    if link_type == LinkType::Target {
        derive_triples(&mut b, &link)?;
    }
    Ok(EditPlan {
        actions: b.finish(),
        created: node,
    })
}

/// Join two concepts through a new placeholder relation at `position`.
/// Returns the relation node.
pub fn plan_proposition_from_concepts(
    graph: &Cmap,
    config: &CmapConfig,
    subject: &NodeId,
    object: &NodeId,
    position: Option<(f64, f64)>,
) -> CmapResult<EditPlan<Node>> {
    graph.require_node(subject)?;
    graph.require_node(object)?;

    let mut b = StepBuilder::new(graph, config);
    let placeholder = config.placeholder.clone();
    let rel = b.add_node(NodeType::Relation, &placeholder, position)?;
    let source = b.add_link(LinkType::Source, subject, &rel.id)?;
    let target = b.add_link(LinkType::Target, &rel.id, object)?;
    b.add_triple(TripleConfig::new(
        subject.clone(),
        rel.id.clone(),
        object.clone(),
        source.id,
        target.id,
    ))?;
    Ok(EditPlan {
        actions: b.finish(),
        created: rel,
    })
}

/// Hang a new placeholder proposition off `subject`: a placeholder concept at
/// `position` and a placeholder relation halfway between the two. Returns the
/// new concept.
pub fn plan_proposition_from_single_concept(
    graph: &Cmap,
    config: &CmapConfig,
    subject: &NodeId,
    position: Option<(f64, f64)>,
) -> CmapResult<EditPlan<Node>> {
    let anchor = graph.require_node(subject)?;
    let midpoint = match (anchor.position(), position) {
        (Some((x1, y1)), Some((x2, y2))) => Some(((x1 + x2) / 2.0, (y1 + y2) / 2.0)),
        (None, p) => p,
        (Some(_), None) => None,
    };

    let mut b = StepBuilder::new(graph, config);
    let placeholder = config.placeholder.clone();
    let obj = b.add_node(NodeType::Concept, &placeholder, position)?;
    let rel = b.add_node(NodeType::Relation, &placeholder, midpoint)?;
    let source = b.add_link(LinkType::Source, subject, &rel.id)?;
    let target = b.add_link(LinkType::Target, &rel.id, &obj.id)?;
    b.add_triple(TripleConfig::new(
        subject.clone(),
        rel.id,
        obj.id.clone(),
        source.id,
        target.id,
    ))?;
    Ok(EditPlan {
        actions: b.finish(),
        created: obj,
    })
}

/// Change one node's text; every triple using the node follows.
pub fn plan_node_value_update(graph: &Cmap, config: &CmapConfig, id: &NodeId, text: &str) -> CmapResult<Vec<Action>> {
    graph.require_node(id)?;
    let mut b = StepBuilder::new(graph, config);
    b.update_node_value(id, normalize_text(text))?;
    Ok(b.finish())
}

/// Rewrite the three nodes behind each listed triple, fanning the new text out
/// to every other triple sharing those nodes.
pub fn plan_triples_value_update(
    graph: &Cmap,
    config: &CmapConfig,
    edits: &[TripleValueEdit],
) -> CmapResult<Vec<Action>> {
    let mut b = StepBuilder::new(graph, config);
    for edit in edits {
        let c = b.graph().require_triple(&edit.id)?.config.clone();
        let [s, r, o] = normalize_triple(&edit.value);
        b.update_node_value(&c.sub_id, s)?;
        b.update_node_value(&c.rel_id, r)?;
        b.update_node_value(&c.obj_id, o)?;
    }
    Ok(b.finish())
}

//! StepBuilder: plans a step against a scratch copy of the graph

use std::collections::BTreeSet;

use super::topology;
use crate::action::{apply, Action, LinkEndpoints};
use crate::config::CmapConfig;
use crate::error::CmapResult;
use crate::graph::{
    Cmap, IdAllocator, IdKind, Link, LinkId, LinkType, Node, NodeId, NodeType, RawTriple, Triple,
    TripleConfig, TripleId,
};

/// Accumulates the actions of one step.
///
/// Every pushed action is applied to a private copy of the graph right away,
/// so later planning decisions see earlier ones and update actions capture the
/// exact value they replace. The live graph is never touched.
pub struct StepBuilder<'a> {
    config: &'a CmapConfig,
    scratch: Cmap,
    ids: IdAllocator,
    actions: Vec<Action>,
}

impl<'a> StepBuilder<'a> {
    pub fn new(graph: &Cmap, config: &'a CmapConfig) -> Self {
        Self {
            config,
            scratch: graph.clone(),
            ids: IdAllocator::new(),
            actions: Vec::new(),
        }
    }

    /// The graph as it will look once the planned actions are applied
    pub fn graph(&self) -> &Cmap {
        &self.scratch
    }

    pub fn config(&self) -> &CmapConfig {
        self.config
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn finish(self) -> Vec<Action> {
        self.actions
    }

    pub fn next_id(&mut self, kind: IdKind) -> String {
        self.ids.next(kind, &self.scratch)
    }

    /// Build (but do not add) a node with a fresh id and the configured settings
    pub fn make_node(&mut self, node_type: NodeType, value: &str, position: Option<(f64, f64)>) -> Node {
        let kind = match node_type {
            NodeType::Concept => IdKind::Concept,
            NodeType::Relation => IdKind::Relation,
        };
        let mut node = Node::new(self.next_id(kind), node_type, value)
            .with_settings(self.config.node_settings.clone());
        if let Some((x, y)) = position {
            node = node.at(x, y);
        }
        node
    }

    /// Build (but do not add) a link with a fresh id and the configured settings
    pub fn make_link(&mut self, link_type: LinkType, source: &NodeId, target: &NodeId) -> Link {
        let kind = match link_type {
            LinkType::Source => IdKind::SourceLink,
            LinkType::Target => IdKind::TargetLink,
        };
        Link::new(self.next_id(kind), link_type, source.clone(), target.clone())
            .with_settings(self.config.link_settings.clone())
    }

    /// Apply `action` to the scratch graph and record it
    pub fn push(&mut self, action: Action) -> CmapResult<()> {
        let applied = apply(&mut self.scratch, action)?;
        self.actions.push(applied.action);
        Ok(())
    }

    /// Push every action of a sub-plan computed against `self.graph()`
    pub fn extend(&mut self, actions: Vec<Action>) -> CmapResult<()> {
        actions.into_iter().try_for_each(|a| self.push(a))
    }

    pub fn add_node(&mut self, node_type: NodeType, value: &str, position: Option<(f64, f64)>) -> CmapResult<Node> {
        let node = self.make_node(node_type, value, position);
        self.push(Action::AddNode(node.clone()))?;
        Ok(node)
    }

    pub fn add_link(&mut self, link_type: LinkType, source: &NodeId, target: &NodeId) -> CmapResult<Link> {
        let link = self.make_link(link_type, source, target);
        self.push(Action::AddLink(link.clone()))?;
        Ok(link)
    }

    /// Add a triple whose value is read from the nodes `config` points at
    pub fn add_triple(&mut self, config: TripleConfig) -> CmapResult<TripleId> {
        let value = self.value_of(&config)?;
        let triple = Triple::new(self.next_id(IdKind::Triple), value, config);
        let id = triple.id.clone();
        self.push(Action::AddTriple(triple))?;
        Ok(id)
    }

    fn value_of(&self, config: &TripleConfig) -> CmapResult<RawTriple> {
        Ok([
            self.scratch.require_node(&config.sub_id)?.value.clone(),
            self.scratch.require_node(&config.rel_id)?.value.clone(),
            self.scratch.require_node(&config.obj_id)?.value.clone(),
        ])
    }

    pub fn remove_node(&mut self, id: &NodeId) -> CmapResult<()> {
        let node = self.scratch.require_node(id)?.clone();
        self.push(Action::RemoveNode(node))
    }

    pub fn remove_link(&mut self, id: &LinkId) -> CmapResult<()> {
        let link = self.scratch.require_link(id)?.clone();
        self.push(Action::RemoveLink(link))
    }

    pub fn remove_triple(&mut self, id: &TripleId) -> CmapResult<()> {
        let triple = self.scratch.require_triple(id)?.clone();
        self.push(Action::RemoveTriple(triple))
    }

    /// Change a node's value; no action when it already holds `value`
    pub fn update_node_value(&mut self, id: &NodeId, value: String) -> CmapResult<()> {
        let old = self.scratch.require_node(id)?.value.clone();
        if old == value {
            return Ok(());
        }
        self.push(Action::UpdateNode {
            id: id.clone(),
            old,
            new: value,
        })
    }

    /// Repoint a link; no action when nothing changes
    pub fn update_link(&mut self, id: &LinkId, new: LinkEndpoints) -> CmapResult<()> {
        let old = LinkEndpoints::of(self.scratch.require_link(id)?);
        if old == new {
            return Ok(());
        }
        self.push(Action::UpdateLink {
            id: id.clone(),
            old,
            new,
        })
    }

    /// Edit a triple's config in place; no action when `edit` changes nothing
    pub fn update_triple(&mut self, id: &TripleId, edit: impl FnOnce(&mut TripleConfig)) -> CmapResult<()> {
        let old = self.scratch.require_triple(id)?.config.clone();
        let mut new = old.clone();
        edit(&mut new);
        if new == old {
            return Ok(());
        }
        self.push(Action::UpdateTriple {
            id: id.clone(),
            old,
            new,
        })
    }

    /// Re-derive fork/join flags from topology for each listed triple that
    /// still exists.
    pub fn refresh_flags<'i>(&mut self, ids: impl IntoIterator<Item = &'i TripleId>) -> CmapResult<()> {
        for id in ids {
            let Some(triple) = self.scratch.triple(id) else {
                continue;
            };
            let (fork, join) = topology::derive_flags(&self.scratch, triple);
            self.update_triple(id, |c| {
                c.fork = fork;
                c.join = join;
            })?;
        }
        Ok(())
    }

    /// Re-derive flags on every triple sharing a relation with a triple this
    /// step added, removed or rewired.
    pub fn refresh_touched_flags(&mut self) -> CmapResult<()> {
        let mut relations = BTreeSet::new();
        for action in &self.actions {
            match action {
                Action::AddTriple(t) | Action::RemoveTriple(t) => {
                    relations.insert(t.config.rel_id.clone());
                }
                Action::UpdateTriple { old, new, .. } => {
                    relations.insert(old.rel_id.clone());
                    relations.insert(new.rel_id.clone());
                }
                _ => {}
            }
        }
        let ids: Vec<TripleId> = self
            .scratch
            .triples()
            .filter(|t| relations.contains(&t.config.rel_id))
            .map(|t| t.id.clone())
            .collect();
        self.refresh_flags(ids.iter())
    }

    /// `refresh_flags` over every triple in the scratch graph
    pub fn refresh_all_flags(&mut self) -> CmapResult<()> {
        let ids: Vec<TripleId> = self.scratch.triples.keys().cloned().collect();
        self.refresh_flags(ids.iter())
    }
}

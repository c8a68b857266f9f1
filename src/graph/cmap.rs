//! Cmap: the node, link and triple collections of one concept map

use super::ids::{LinkId, NodeId, TripleId};
use super::link::{Link, LinkType};
use super::node::{Node, NodeType};
use super::store::Store;
use super::triple::{RawTriple, Triple};
use crate::error::{CmapError, CmapResult};
use serde::{Deserialize, Serialize};

/// The three owned collections of a concept map.
///
/// Nodes and links keep append order; triples are kept most-recent first when
/// added incrementally.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cmap {
    pub nodes: Store<Node>,
    pub links: Store<Link>,
    pub triples: Store<Triple>,
}

impl Cmap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether any node, link or triple uses `id`
    pub fn contains_id(&self, id: &str) -> bool {
        self.nodes.contains_key(&NodeId::from(id))
            || self.links.contains_key(&LinkId::from(id))
            || self.triples.contains_key(&TripleId::from(id))
    }

    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn link(&self, id: &LinkId) -> Option<&Link> {
        self.links.get(id)
    }

    pub fn triple(&self, id: &TripleId) -> Option<&Triple> {
        self.triples.get(id)
    }

    /// Node lookup that turns a miss into `NodeNotFound`
    pub fn require_node(&self, id: &NodeId) -> CmapResult<&Node> {
        self.node(id).ok_or_else(|| CmapError::NodeNotFound(id.clone()))
    }

    pub fn require_link(&self, id: &LinkId) -> CmapResult<&Link> {
        self.link(id).ok_or_else(|| CmapError::LinkNotFound(id.clone()))
    }

    pub fn require_triple(&self, id: &TripleId) -> CmapResult<&Triple> {
        self.triple(id).ok_or_else(|| CmapError::TripleNotFound(id.clone()))
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> + '_ {
        self.nodes.iter()
    }

    pub fn links(&self) -> impl Iterator<Item = &Link> + '_ {
        self.links.iter()
    }

    pub fn triples(&self) -> impl Iterator<Item = &Triple> + '_ {
        self.triples.iter()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    pub fn triple_count(&self) -> usize {
        self.triples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.links.is_empty() && self.triples.is_empty()
    }

    /// First node of `node_type` whose value equals `text` exactly.
    ///
    /// Several matches are possible when a graph was loaded with duplicate
    /// values; the first one in node order wins.
    pub fn find_node_by_value(&self, text: &str, node_type: NodeType) -> Option<&Node> {
        let mut matches = self
            .nodes()
            .filter(|n| n.node_type == node_type && n.value == text);
        let first = matches.next();
        if first.is_some() && matches.next().is_some() {
            tracing::debug!(value = text, %node_type, "ambiguous node value, using first match");
        }
        first
    }

    /// Like `find_node_by_value` but ignoring case
    pub fn find_node_by_value_ignore_case(&self, text: &str, node_type: NodeType) -> Option<&Node> {
        let wanted = text.to_lowercase();
        self.nodes()
            .filter(|n| n.node_type == node_type)
            .find(|n| n.value.to_lowercase() == wanted)
    }

    /// Links of `link_type` whose endpoint node values are `source` and `target`
    pub fn find_links_by_value(&self, source: &str, target: &str, link_type: LinkType) -> Vec<&Link> {
        self.links()
            .filter(|l| l.link_type == link_type)
            .filter(|l| {
                let s = self.node(&l.source).map(|n| n.value.as_str());
                let t = self.node(&l.target).map(|n| n.value.as_str());
                s == Some(source) && t == Some(target)
            })
            .collect()
    }

    pub fn find_triple_by_value(&self, value: &RawTriple) -> Option<&Triple> {
        self.triples().find(|t| t.has_value(value))
    }

    /// Triples realized through `link`
    pub fn triples_using_link(&self, link: &LinkId) -> Vec<&Triple> {
        self.triples()
            .filter(|t| t.config.references_link(link))
            .collect()
    }

    /// Triples with `node` in any position
    pub fn triples_referencing_node(&self, node: &NodeId) -> Vec<&Triple> {
        self.triples()
            .filter(|t| t.config.references_node(node))
            .collect()
    }

    /// Links touching `node` at either end
    pub fn links_touching(&self, node: &NodeId) -> Vec<&Link> {
        self.links().filter(|l| l.touches(node)).collect()
    }

    /// Outgoing links of `node` of the given type
    pub fn links_from(&self, node: &NodeId, link_type: LinkType) -> Vec<&Link> {
        self.links()
            .filter(|l| l.link_type == link_type && &l.source == node)
            .collect()
    }

    /// Incoming links of `node` of the given type
    pub fn links_into(&self, node: &NodeId, link_type: LinkType) -> Vec<&Link> {
        self.links()
            .filter(|l| l.link_type == link_type && &l.target == node)
            .collect()
    }

    /// Check that every triple's ids resolve, its source and target links
    /// join its nodes in order, and its value mirrors node values.
    pub fn check_consistency(&self) -> CmapResult<()> {
        for link in self.links() {
            for end in [&link.source, &link.target] {
                if !self.nodes.contains_key(end) {
                    return Err(CmapError::InvariantViolation(format!(
                        "link {} points at missing node {}",
                        link.id, end
                    )));
                }
            }
        }
        for triple in self.triples() {
            let c = &triple.config;
            let mut values: Vec<&str> = Vec::with_capacity(3);
            for id in [&c.sub_id, &c.rel_id, &c.obj_id] {
                let node = self.node(id).ok_or_else(|| {
                    CmapError::InvariantViolation(format!(
                        "triple {} references missing node {}",
                        triple.id, id
                    ))
                })?;
                values.push(node.value.as_str());
            }
            if values != triple.value.iter().map(String::as_str).collect::<Vec<_>>() {
                return Err(CmapError::InvariantViolation(format!(
                    "triple {} value {:?} does not match nodes {:?}",
                    triple.id, triple.value, values
                )));
            }
            let wiring = [
                (&c.source_id, LinkType::Source, &c.sub_id, &c.rel_id),
                (&c.target_id, LinkType::Target, &c.rel_id, &c.obj_id),
            ];
            for (id, link_type, from, to) in wiring {
                let link = self.link(id).ok_or_else(|| {
                    CmapError::InvariantViolation(format!(
                        "triple {} references missing link {}",
                        triple.id, id
                    ))
                })?;
                if link.link_type != link_type || &link.source != from || &link.target != to {
                    return Err(CmapError::InvariantViolation(format!(
                        "triple {} expects {} link {} from {} to {}",
                        triple.id, link_type, id, from, to
                    )));
                }
            }
        }
        Ok(())
    }
}

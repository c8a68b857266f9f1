//! Primitive graph actions

use crate::graph::{Link, LinkId, Node, NodeId, Triple, TripleConfig, TripleId};
use serde::{Deserialize, Serialize};

/// Both endpoints of a link, used by link updates
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkEndpoints {
    pub source: NodeId,
    pub target: NodeId,
}

impl LinkEndpoints {
    pub fn new(source: impl Into<NodeId>, target: impl Into<NodeId>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }

    pub fn of(link: &Link) -> Self {
        Self::new(link.source.clone(), link.target.clone())
    }
}

/// One reversible change to a `Cmap`.
///
/// Removals carry the whole entity and updates carry the previous value, so
/// every action can be undone exactly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", content = "payload", rename_all = "snake_case")]
pub enum Action {
    /// Append a node
    AddNode(Node),
    /// Append a link
    AddLink(Link),
    /// Prepend a triple
    AddTriple(Triple),
    RemoveNode(Node),
    RemoveLink(Link),
    RemoveTriple(Triple),
    /// Change a node's value; every triple naming the node follows
    UpdateNode { id: NodeId, old: String, new: String },
    /// Repoint a link's endpoints
    UpdateLink {
        id: LinkId,
        old: LinkEndpoints,
        new: LinkEndpoints,
    },
    /// Replace a triple's config; its value is re-read from the nodes
    UpdateTriple {
        id: TripleId,
        old: TripleConfig,
        new: TripleConfig,
    },
}

impl Action {
    /// Short tag for logging
    pub fn tag(&self) -> &'static str {
        match self {
            Action::AddNode(_) => "add node",
            Action::AddLink(_) => "add link",
            Action::AddTriple(_) => "add triple",
            Action::RemoveNode(_) => "remove node",
            Action::RemoveLink(_) => "remove link",
            Action::RemoveTriple(_) => "remove triple",
            Action::UpdateNode { .. } => "update node",
            Action::UpdateLink { .. } => "update link",
            Action::UpdateTriple { .. } => "update triple",
        }
    }

    /// Id of the entity the action touches
    pub fn target_id(&self) -> &str {
        match self {
            Action::AddNode(n) | Action::RemoveNode(n) => n.id.as_str(),
            Action::AddLink(l) | Action::RemoveLink(l) => l.id.as_str(),
            Action::AddTriple(t) | Action::RemoveTriple(t) => t.id.as_str(),
            Action::UpdateNode { id, .. } => id.as_str(),
            Action::UpdateLink { id, .. } => id.as_str(),
            Action::UpdateTriple { id, .. } => id.as_str(),
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.tag(), self.target_id())
    }
}

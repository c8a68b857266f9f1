//! Triple: the subject–relation–object view of a source/target link pair

use super::ids::{LinkId, NodeId, TripleId};
use super::node::normalize_text;
use serde::{Deserialize, Serialize};

/// A flat `[subject, relation, object]` proposition
pub type RawTriple = [String; 3];

/// Build a raw triple from anything string-like
pub fn raw_triple(subject: impl Into<String>, relation: impl Into<String>, object: impl Into<String>) -> RawTriple {
    [subject.into(), relation.into(), object.into()]
}

/// Normalize each term of a raw triple like node values are normalized
pub fn normalize_triple(raw: &RawTriple) -> RawTriple {
    [
        normalize_text(&raw[0]),
        normalize_text(&raw[1]),
        normalize_text(&raw[2]),
    ]
}

/// Position of a node within a triple
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Subject,
    Relation,
    Object,
}

impl Role {
    /// Index into `Triple::value`
    pub fn index(self) -> usize {
        match self {
            Role::Subject => 0,
            Role::Relation => 1,
            Role::Object => 2,
        }
    }
}

/// The node and link ids realizing a triple, plus topology flags
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripleConfig {
    pub sub_id: NodeId,
    pub rel_id: NodeId,
    pub obj_id: NodeId,
    /// subject -> relation link
    pub source_id: LinkId,
    /// relation -> object link
    pub target_id: LinkId,
    /// The relation and source link fan out to more than one object
    #[serde(default)]
    pub fork: bool,
    /// The relation and target link are fed by more than one subject
    #[serde(default)]
    pub join: bool,
    /// Composite-map presentation style
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    /// Composite-map agreement score
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agreement: Option<f64>,
}

impl TripleConfig {
    pub fn new(
        sub_id: NodeId,
        rel_id: NodeId,
        obj_id: NodeId,
        source_id: LinkId,
        target_id: LinkId,
    ) -> Self {
        Self {
            sub_id,
            rel_id,
            obj_id,
            source_id,
            target_id,
            fork: false,
            join: false,
            style: None,
            agreement: None,
        }
    }

    pub fn forked(mut self) -> Self {
        self.fork = true;
        self
    }

    pub fn joined(mut self) -> Self {
        self.join = true;
        self
    }

    /// Node id at `role`
    pub fn node(&self, role: Role) -> &NodeId {
        match role {
            Role::Subject => &self.sub_id,
            Role::Relation => &self.rel_id,
            Role::Object => &self.obj_id,
        }
    }

    /// Whether `node` appears in any position
    pub fn references_node(&self, node: &NodeId) -> bool {
        &self.sub_id == node || &self.rel_id == node || &self.obj_id == node
    }

    /// Whether `link` is the source or target link
    pub fn references_link(&self, link: &LinkId) -> bool {
        &self.source_id == link || &self.target_id == link
    }

    /// The five structural ids, used as the duplicate key during merges
    pub fn structure_key(&self) -> (NodeId, NodeId, NodeId, LinkId, LinkId) {
        (
            self.sub_id.clone(),
            self.rel_id.clone(),
            self.obj_id.clone(),
            self.source_id.clone(),
            self.target_id.clone(),
        )
    }
}

/// A proposition view over the graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Triple {
    pub id: TripleId,
    pub value: RawTriple,
    pub config: TripleConfig,
}

impl Triple {
    pub fn new(id: impl Into<TripleId>, value: RawTriple, config: TripleConfig) -> Self {
        Self {
            id: id.into(),
            value,
            config,
        }
    }

    /// Compare values term by term
    pub fn has_value(&self, value: &RawTriple) -> bool {
        self.value == *value
    }

    /// Value joined with single spaces, for logging
    pub fn sentence(&self) -> String {
        self.value.join(" ")
    }
}

/// Ids a caller already knows when adding a triple; missing parts are created.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PartialTripleConfig {
    pub sub_id: Option<NodeId>,
    pub rel_id: Option<NodeId>,
    pub obj_id: Option<NodeId>,
    pub source_id: Option<LinkId>,
    pub target_id: Option<LinkId>,
}

impl PartialTripleConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_subject(mut self, id: impl Into<NodeId>) -> Self {
        self.sub_id = Some(id.into());
        self
    }

    pub fn with_relation(mut self, id: impl Into<NodeId>) -> Self {
        self.rel_id = Some(id.into());
        self
    }

    pub fn with_object(mut self, id: impl Into<NodeId>) -> Self {
        self.obj_id = Some(id.into());
        self
    }

    pub fn with_source_link(mut self, id: impl Into<LinkId>) -> Self {
        self.source_id = Some(id.into());
        self
    }

    pub fn with_target_link(mut self, id: impl Into<LinkId>) -> Self {
        self.target_id = Some(id.into());
        self
    }
}

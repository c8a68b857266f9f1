//! Node representation in the concept map

use super::ids::NodeId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Typed property values held in a settings bag
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    String(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Array(Vec<PropertyValue>),
    Object(HashMap<String, PropertyValue>),
}

/// Opaque per-node / per-link presentation state owned by the caller.
///
/// The engine never interprets these values; it only guarantees they survive
/// structural edits.
pub type Settings = HashMap<String, PropertyValue>;

/// Default settings bag for nodes
pub fn default_node_settings() -> Settings {
    let mut settings = Settings::new();
    for key in [
        "dim",
        "superConcept-initial",
        "superConcept-select",
        "disconnectedNode",
        "missingText",
        "incompleteProps",
        "superConcept-map",
        "pronoun",
    ] {
        settings.insert(key.to_string(), PropertyValue::Bool(false));
    }
    settings.insert("SKEItemNumber".to_string(), PropertyValue::Array(Vec::new()));
    settings
}

/// Overwrite every key of `defaults` in `settings`, keeping any extra keys.
pub fn reset_settings(settings: &mut Settings, defaults: &Settings) {
    for (k, v) in defaults {
        settings.insert(k.clone(), v.clone());
    }
}

/// Normalize free text the way node values are stored: lower-case, runs of
/// whitespace collapsed to a single space, ends trimmed.
pub fn normalize_text(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Whether a node is a noun-phrase concept or a predicate relation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    Concept,
    Relation,
}

impl std::fmt::Display for NodeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NodeType::Concept => write!(f, "concept"),
            NodeType::Relation => write!(f, "relation"),
        }
    }
}

/// A concept or relation vertex
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(default = "default_node_settings")]
    pub settings: Settings,
}

impl Node {
    /// Create a node; `value` is normalized
    pub fn new(id: impl Into<NodeId>, node_type: NodeType, value: &str) -> Self {
        Self {
            id: id.into(),
            node_type,
            value: normalize_text(value),
            x: None,
            y: None,
            settings: default_node_settings(),
        }
    }

    /// Set the layout position
    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.x = Some(x);
        self.y = Some(y);
        self
    }

    /// Replace the settings bag
    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    pub fn is_concept(&self) -> bool {
        self.node_type == NodeType::Concept
    }

    pub fn is_relation(&self) -> bool {
        self.node_type == NodeType::Relation
    }

    pub fn position(&self) -> Option<(f64, f64)> {
        Some((self.x?, self.y?))
    }
}

impl From<&Node> for NodeId {
    fn from(node: &Node) -> Self {
        node.id.clone()
    }
}

/// Caller description of a node to create; the engine assigns the id.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeTemplate {
    pub node_type: NodeType,
    pub value: String,
    pub position: Option<(f64, f64)>,
}

impl NodeTemplate {
    pub fn new(node_type: NodeType, value: impl Into<String>) -> Self {
        Self {
            node_type,
            value: value.into(),
            position: None,
        }
    }

    pub fn concept(value: impl Into<String>) -> Self {
        Self::new(NodeType::Concept, value)
    }

    pub fn relation(value: impl Into<String>) -> Self {
        Self::new(NodeType::Relation, value)
    }

    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.position = Some((x, y));
        self
    }
}

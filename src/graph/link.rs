//! Typed links between concept and relation nodes

use super::ids::{LinkId, NodeId};
use super::node::{PropertyValue, Settings};
use serde::{Deserialize, Serialize};

/// Default settings bag for links
pub fn default_link_settings() -> Settings {
    ["dim", "superConcept-select", "undefinedNode"]
        .into_iter()
        .map(|key| (key.to_string(), PropertyValue::Bool(false)))
        .collect()
}

/// Direction class of a link.
///
/// A source link runs subject concept -> relation, a target link runs
/// relation -> object concept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkType {
    Source,
    Target,
}

impl std::fmt::Display for LinkType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LinkType::Source => write!(f, "source"),
            LinkType::Target => write!(f, "target"),
        }
    }
}

/// A directed link; endpoints are stored as ids only
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub id: LinkId,
    #[serde(rename = "type")]
    pub link_type: LinkType,
    pub source: NodeId,
    pub target: NodeId,
    #[serde(default = "default_link_settings")]
    pub settings: Settings,
}

impl Link {
    /// Create a link. Endpoints accept anything convertible to a `NodeId`,
    /// including `&Node`.
    pub fn new(
        id: impl Into<LinkId>,
        link_type: LinkType,
        source: impl Into<NodeId>,
        target: impl Into<NodeId>,
    ) -> Self {
        Self {
            id: id.into(),
            link_type,
            source: source.into(),
            target: target.into(),
            settings: default_link_settings(),
        }
    }

    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    /// Whether either endpoint is `node`
    pub fn touches(&self, node: &NodeId) -> bool {
        &self.source == node || &self.target == node
    }
}

/// Caller description of a link to create; the engine assigns the id.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkTemplate {
    pub link_type: LinkType,
    pub source: NodeId,
    pub target: NodeId,
}

impl LinkTemplate {
    pub fn new(link_type: LinkType, source: impl Into<NodeId>, target: impl Into<NodeId>) -> Self {
        Self {
            link_type,
            source: source.into(),
            target: target.into(),
        }
    }

    pub fn source(from: impl Into<NodeId>, to: impl Into<NodeId>) -> Self {
        Self::new(LinkType::Source, from, to)
    }

    pub fn target(from: impl Into<NodeId>, to: impl Into<NodeId>) -> Self {
        Self::new(LinkType::Target, from, to)
    }
}

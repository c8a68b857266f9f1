//! Find queries for locating nodes

use super::types::QueryResult;
use crate::graph::{normalize_text, Cmap, Node, NodeType, PropertyValue};

/// Query for finding nodes by various criteria
#[derive(Debug, Clone, Default)]
pub struct FindQuery {
    /// Filter by node type
    pub node_type: Option<NodeType>,
    /// Filter by exact (normalized) value
    pub value_equals: Option<String>,
    /// Filter by (normalized) substring of the value
    pub value_contains: Option<String>,
    /// Filter by settings key existence
    pub has_setting: Option<String>,
    /// Filter by settings key-value match
    pub setting_equals: Option<(String, PropertyValue)>,
    /// Only nodes no link touches
    pub disconnected: bool,
    /// Maximum number of results
    pub limit: Option<usize>,
    /// Number of results to skip
    pub offset: Option<usize>,
}

impl FindQuery {
    /// Create a new empty query (matches all nodes)
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_node_type(mut self, node_type: NodeType) -> Self {
        self.node_type = Some(node_type);
        self
    }

    pub fn with_value(mut self, value: &str) -> Self {
        self.value_equals = Some(normalize_text(value));
        self
    }

    pub fn with_value_containing(mut self, text: &str) -> Self {
        self.value_contains = Some(normalize_text(text));
        self
    }

    pub fn with_setting(mut self, key: impl Into<String>) -> Self {
        self.has_setting = Some(key.into());
        self
    }

    pub fn with_setting_value(mut self, key: impl Into<String>, value: PropertyValue) -> Self {
        self.setting_equals = Some((key.into(), value));
        self
    }

    pub fn disconnected(mut self) -> Self {
        self.disconnected = true;
        self
    }

    /// Limit results
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Skip results (for pagination)
    pub fn offset(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Execute the query against a map; results keep node order
    pub fn execute(&self, graph: &Cmap) -> QueryResult {
        let matching: Vec<&Node> = graph.nodes().filter(|node| self.matches(graph, node)).collect();
        let total_count = matching.len();
        let nodes = matching
            .into_iter()
            .skip(self.offset.unwrap_or(0))
            .take(self.limit.unwrap_or(usize::MAX))
            .cloned()
            .collect();
        QueryResult { nodes, total_count }
    }

    fn matches(&self, graph: &Cmap, node: &Node) -> bool {
        if let Some(expected) = self.node_type {
            if node.node_type != expected {
                return false;
            }
        }

        if let Some(ref value) = self.value_equals {
            if &node.value != value {
                return false;
            }
        }

        if let Some(ref text) = self.value_contains {
            if !node.value.contains(text.as_str()) {
                return false;
            }
        }

        if let Some(ref key) = self.has_setting {
            if !node.settings.contains_key(key) {
                return false;
            }
        }

        if let Some((ref key, ref expected_value)) = self.setting_equals {
            match node.settings.get(key) {
                Some(value) if value == expected_value => {}
                _ => return false,
            }
        }

        if self.disconnected && !graph.links_touching(&node.id).is_empty() {
            return false;
        }

        true
    }
}

//! Manager configuration, loadable from YAML

use crate::error::CmapResult;
use crate::graph::{default_link_settings, default_node_settings, Settings};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Text standing in for a concept or relation the user has not named yet
pub const DEFAULT_PLACEHOLDER: &str = "???";

/// Configuration for a `CmapManager`
///
/// ```yaml
/// placeholder: "???"
/// max_log_steps: 200
/// verify_consistency: true
/// node_settings:
///   dim: false
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CmapConfig {
    /// Unfinished-edit marker. Terms equal to it never act as connection
    /// points when inserting triples.
    pub placeholder: String,
    /// Settings bag given to new nodes and re-applied on load
    pub node_settings: Settings,
    /// Settings bag given to new links and re-applied on load
    pub link_settings: Settings,
    /// Bound on undo history (unbounded when absent)
    pub max_log_steps: Option<usize>,
    /// Check the triple/node consistency invariant on every commit
    pub verify_consistency: bool,
}

impl Default for CmapConfig {
    fn default() -> Self {
        Self {
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
            node_settings: default_node_settings(),
            link_settings: default_link_settings(),
            max_log_steps: None,
            verify_consistency: true,
        }
    }
}

impl CmapConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a YAML document; absent keys keep their defaults
    pub fn from_yaml_str(yaml: &str) -> CmapResult<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Read and parse a YAML file
    pub fn from_path(path: impl AsRef<Path>) -> CmapResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    pub fn with_max_log_steps(mut self, max: usize) -> Self {
        self.max_log_steps = Some(max);
        self
    }

    pub fn with_verification(mut self, verify: bool) -> Self {
        self.verify_consistency = verify;
        self
    }

    /// Whether `term` is the unfinished-edit marker
    pub fn is_placeholder(&self, term: &str) -> bool {
        term == self.placeholder
    }
}

//! cmap: Concept Map Triple/Graph Engine
//!
//! Keeps two views of a concept map in sync: a flat list of
//! subject-relation-object triples and the node/link graph that realizes them.
//!
//! # Core Concepts
//!
//! - **Nodes**: concepts (noun phrases) and relations (predicates)
//! - **Links**: source links (concept to relation) and target links (relation
//!   to concept)
//! - **Triples**: one source link and one target link sharing a relation.
//!   A relation fanning out to several objects is a *fork*; several subjects
//!   feeding one relation and object is a *join*.
//! - **Steps**: every edit is planned as a list of reversible actions and
//!   committed as one undoable step
//!
//! # Example
//!
//! ```
//! use cmap::{raw_triple, CmapManager};
//!
//! let mut map = CmapManager::new();
//! map.add_triple(&raw_triple("This", "or", "That")).unwrap();
//! map.add_triple(&raw_triple("This", "or", "Other")).unwrap();
//! assert!(map.triples().all(|t| t.config.fork));
//!
//! map.undo().unwrap();
//! assert_eq!(map.triples().count(), 1);
//! ```

pub mod action;
pub mod config;
mod error;
pub mod graph;
pub mod manager;
pub mod planner;
pub mod query;
pub mod registry;

pub use action::{Action, ActionLog};
pub use config::CmapConfig;
pub use error::{CmapError, CmapResult};
pub use graph::{
    raw_triple, Cmap, Link, LinkId, LinkTemplate, LinkType, Node, NodeId, NodeTemplate, NodeType,
    PartialTripleConfig, PropertyValue, RawTriple, Role, Settings, Triple, TripleConfig, TripleId,
};
pub use manager::{CmapManager, SuperConcept};
pub use planner::{
    Attachment, ConceptSimilarity, RelationRule, RelationSimilarity, RemovalKind, RestatedTriple,
    SimilarTriple, TripleValueEdit,
};
pub use query::{FindQuery, QueryResult};
pub use registry::{CmapRegistry, MapId};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

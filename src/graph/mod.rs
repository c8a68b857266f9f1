//! Core concept map data structures

mod cmap;
mod ids;
mod link;
mod node;
mod store;
mod triple;


pub use cmap::Cmap;
pub use ids::{IdAllocator, IdKind, LinkId, NodeId, TripleId};
pub(crate) use ids::string_id;
pub use link::{default_link_settings, Link, LinkTemplate, LinkType};
pub use node::{
    default_node_settings, normalize_text, reset_settings, Node, NodeTemplate, NodeType,
    PropertyValue, Settings,
};
pub use store::{Keyed, Store};
pub use triple::{
    normalize_triple, raw_triple, PartialTripleConfig, RawTriple, Role, Triple, TripleConfig,
};

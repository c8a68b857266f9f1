//! Identifiers for graph elements and the collision-free id allocator

use super::cmap::Cmap;
use std::collections::HashSet;
use uuid::Uuid;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create an id from an existing string
            pub fn from_string(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the inner string value
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }
    };
}

pub(crate) use string_id;

string_id!(
    /// Unique identifier for a concept or relation node
    NodeId
);
string_id!(
    /// Unique identifier for a source or target link
    LinkId
);
string_id!(
    /// Unique identifier for a triple
    TripleId
);

/// Readability prefix for generated ids. Carries no meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdKind {
    Concept,
    Relation,
    SourceLink,
    TargetLink,
    Triple,
}

impl IdKind {
    pub fn prefix(self) -> &'static str {
        match self {
            IdKind::Concept => "c",
            IdKind::Relation => "r",
            IdKind::SourceLink => "so",
            IdKind::TargetLink => "ta",
            IdKind::Triple => "t",
        }
    }
}

/// Hands out ids that are disjoint from every live node, link and triple id
/// and from every id it has already issued.
///
/// Nodes, links and triples share one id space, so a single allocator is
/// used for all three while a step is being planned.
#[derive(Debug, Clone, Default)]
pub struct IdAllocator {
    issued: HashSet<String>,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw a fresh id for `kind`, retrying until nothing in `graph` or in
    /// this allocator's history uses it.
    pub fn next(&mut self, kind: IdKind, graph: &Cmap) -> String {
        loop {
            let candidate = Self::candidate(kind);
            if !graph.contains_id(&candidate) && !self.issued.contains(&candidate) {
                self.issued.insert(candidate.clone());
                return candidate;
            }
        }
    }

    fn candidate(kind: IdKind) -> String {
        let raw = Uuid::new_v4().simple().to_string();
        format!("{}{}", kind.prefix(), &raw[..8])
    }

    /// Number of ids handed out so far
    pub fn issued_count(&self) -> usize {
        self.issued.len()
    }
}

//! Read-side queries over a concept map

mod find;
mod types;

pub use find::FindQuery;
pub use types::QueryResult;

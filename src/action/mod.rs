//! Reversible graph actions and the append-only log all mutation goes through

mod action;
mod apply;
mod log;

pub use action::{Action, LinkEndpoints};
pub use apply::{apply, revert, Applied};
pub use log::{ActionLog, Step};

//! The action log: one undoable step per graph operation

use super::action::Action;
use super::apply::{apply, revert, Applied};
use crate::error::{CmapError, CmapResult};
use crate::graph::Cmap;
use chrono::{DateTime, Utc};

/// One undoable batch of actions, applied atomically
#[derive(Debug, Clone)]
pub struct Step {
    applied: Vec<Applied>,
    /// When the step reached the live graph
    pub committed_at: DateTime<Utc>,
}

impl Step {
    /// Actions in application order
    pub fn actions(&self) -> impl Iterator<Item = &Action> + '_ {
        self.applied.iter().map(|a| &a.action)
    }

    pub fn len(&self) -> usize {
        self.applied.len()
    }

    pub fn is_empty(&self) -> bool {
        self.applied.is_empty()
    }
}

/// Append-only log of committed steps.
///
/// The only component that mutates a live `Cmap` after it has been loaded.
#[derive(Debug, Clone)]
pub struct ActionLog {
    steps: Vec<Step>,
    max_steps: Option<usize>,
    verify_consistency: bool,
}

impl Default for ActionLog {
    fn default() -> Self {
        Self::new()
    }
}

impl ActionLog {
    pub fn new() -> Self {
        Self {
            steps: Vec::new(),
            max_steps: None,
            verify_consistency: true,
        }
    }

    /// Keep at most `max` steps; older ones can no longer be undone
    pub fn with_max_steps(mut self, max: Option<usize>) -> Self {
        self.max_steps = max;
        self
    }

    /// Run the triple/node consistency check after every commit
    pub fn with_verification(mut self, verify: bool) -> Self {
        self.verify_consistency = verify;
        self
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn last(&self) -> Option<&Step> {
        self.steps.last()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn clear(&mut self) {
        self.steps.clear();
    }

    /// Apply `actions` to `graph` as one step and record it.
    ///
    /// All-or-nothing: the actions run against a copy which replaces `graph`
    /// only when every action applied and the result is consistent. An empty
    /// step changes nothing and is not recorded. Returns the number of actions
    /// applied.
    pub fn commit(&mut self, graph: &mut Cmap, actions: Vec<Action>) -> CmapResult<usize> {
        if actions.is_empty() {
            return Ok(0);
        }

        let mut scratch = graph.clone();
        let mut applied = Vec::with_capacity(actions.len());
        for action in actions {
            let description = action.to_string();
            match apply(&mut scratch, action) {
                Ok(a) => applied.push(a),
                Err(e) => {
                    tracing::warn!(action = %description, error = %e, "rejected step");
                    return Err(e);
                }
            }
        }
        if self.verify_consistency {
            if let Err(e) = scratch.check_consistency() {
                tracing::warn!(error = %e, "rejected inconsistent step");
                return Err(e);
            }
        }

        *graph = scratch;
        let count = applied.len();
        self.steps.push(Step {
            applied,
            committed_at: Utc::now(),
        });
        if let Some(max) = self.max_steps {
            if self.steps.len() > max {
                let excess = self.steps.len() - max;
                self.steps.drain(..excess);
            }
        }
        tracing::debug!(actions = count, steps = self.steps.len(), "committed step");
        Ok(count)
    }

    /// Revert the most recent step. Returns whether another undo is possible;
    /// `false` with nothing changed when the log is exhausted.
    pub fn undo(&mut self, graph: &mut Cmap) -> CmapResult<bool> {
        let Some(step) = self.steps.pop() else {
            return Ok(false);
        };

        let mut scratch = graph.clone();
        let reverted = step
            .applied
            .iter()
            .rev()
            .try_for_each(|applied| revert(&mut scratch, applied));
        if let Err(e) = reverted {
            self.steps.push(step);
            return Err(CmapError::InvariantViolation(format!("undo failed: {}", e)));
        }

        *graph = scratch;
        tracing::info!(actions = step.len(), remaining = self.steps.len(), "undid step");
        Ok(!self.steps.is_empty())
    }
}

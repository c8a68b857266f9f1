//! Planners turn a requested edit into the actions of one step.
//!
//! Every planner reads the graph it is given and returns actions; none of them
//! mutates live state. Each is built on [`StepBuilder`], which applies actions
//! to a scratch copy as they are planned.

mod builder;
mod decompose;
mod graph_edit;
mod insert;
mod merge;
mod remove;
mod topology;

pub use builder::StepBuilder;
pub use decompose::{decompose, reconstruct};
pub use graph_edit::{
    plan_add_link, plan_add_node, plan_add_node_and_link, plan_node_value_update,
    plan_proposition_from_concepts, plan_proposition_from_single_concept,
    plan_triples_value_update, EditPlan, TripleValueEdit,
};
pub use insert::{plan_triple_insertion, plan_triple_with_ids, Attachment, InsertionPlan};
pub use merge::{
    plan_concept_merge, plan_concept_similarity, plan_relation_merge, plan_relation_similarity,
    ConceptSimilarity, RelationRule, RelationSimilarity, RestatedTriple, SimilarTriple,
};
pub use remove::{
    plan_link_removal, plan_link_removal_ordered, plan_node_removal, plan_triple_removal,
    RemovalKind, RemovalPlan,
};
pub use topology::{derive_flags, in_fork, in_join};

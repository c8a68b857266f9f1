//! Applying actions to a live graph and reverting them

use super::action::{Action, LinkEndpoints};
use crate::error::{CmapError, CmapResult};
use crate::graph::{Cmap, NodeId, Role, Triple};

/// An action as it was actually applied.
///
/// `action` holds the live state captured at application time (the removed
/// entity, the value an update replaced) and `slot` the position a removed
/// entity occupied, so reverting restores ordering too.
#[derive(Debug, Clone, PartialEq)]
pub struct Applied {
    pub action: Action,
    pub slot: Option<usize>,
}

impl Applied {
    fn at(action: Action, slot: Option<usize>) -> Self {
        Self { action, slot }
    }
}

fn missing(what: &str, id: &str) -> CmapError {
    CmapError::InvariantViolation(format!("{} {} is not in the graph", what, id))
}

fn duplicate(what: &str, id: &str) -> CmapError {
    CmapError::InvariantViolation(format!("{} {} already exists", what, id))
}

/// Copy the values of `node` into every triple that names it
fn propagate_node_value(graph: &mut Cmap, node: &NodeId, value: &str) {
    for triple in graph.triples.values_mut() {
        for role in [Role::Subject, Role::Relation, Role::Object] {
            if triple.config.node(role) == node {
                triple.value[role.index()] = value.to_string();
            }
        }
    }
}

/// Re-read a triple's value from the nodes its config points at
fn resync_triple_value(graph: &Cmap, triple: &Triple) -> CmapResult<[String; 3]> {
    let read = |id: &NodeId| {
        graph
            .node(id)
            .map(|n| n.value.clone())
            .ok_or_else(|| missing("node", id.as_str()))
    };
    Ok([
        read(&triple.config.sub_id)?,
        read(&triple.config.rel_id)?,
        read(&triple.config.obj_id)?,
    ])
}

/// Apply one action. Referencing a missing id (or re-adding a live one) is an
/// invariant violation; the graph may be partially modified only by the
/// failing action itself, so callers apply steps to a scratch copy.
pub fn apply(graph: &mut Cmap, action: Action) -> CmapResult<Applied> {
    match action {
        Action::AddNode(node) => {
            let id = node.id.clone();
            if graph.contains_id(id.as_str()) || !graph.nodes.push_back(node.clone()) {
                return Err(duplicate("node", id.as_str()));
            }
            Ok(Applied::at(Action::AddNode(node), None))
        }
        Action::AddLink(link) => {
            if graph.contains_id(link.id.as_str()) {
                return Err(duplicate("link", link.id.as_str()));
            }
            for end in [&link.source, &link.target] {
                if graph.node(end).is_none() {
                    return Err(missing("link endpoint", end.as_str()));
                }
            }
            graph.links.push_back(link.clone());
            Ok(Applied::at(Action::AddLink(link), None))
        }
        Action::AddTriple(triple) => {
            if graph.contains_id(triple.id.as_str()) {
                return Err(duplicate("triple", triple.id.as_str()));
            }
            graph.triples.push_front(triple.clone());
            Ok(Applied::at(Action::AddTriple(triple), None))
        }
        Action::RemoveNode(node) => {
            let (slot, live) = graph
                .nodes
                .remove(&node.id)
                .ok_or_else(|| missing("node", node.id.as_str()))?;
            Ok(Applied::at(Action::RemoveNode(live), Some(slot)))
        }
        Action::RemoveLink(link) => {
            let (slot, live) = graph
                .links
                .remove(&link.id)
                .ok_or_else(|| missing("link", link.id.as_str()))?;
            Ok(Applied::at(Action::RemoveLink(live), Some(slot)))
        }
        Action::RemoveTriple(triple) => {
            let (slot, live) = graph
                .triples
                .remove(&triple.id)
                .ok_or_else(|| missing("triple", triple.id.as_str()))?;
            Ok(Applied::at(Action::RemoveTriple(live), Some(slot)))
        }
        Action::UpdateNode { id, new, .. } => {
            let node = graph
                .nodes
                .get_mut(&id)
                .ok_or_else(|| missing("node", id.as_str()))?;
            let old = std::mem::replace(&mut node.value, new.clone());
            propagate_node_value(graph, &id, &new);
            Ok(Applied::at(Action::UpdateNode { id, old, new }, None))
        }
        Action::UpdateLink { id, new, .. } => {
            for end in [&new.source, &new.target] {
                if graph.node(end).is_none() {
                    return Err(missing("link endpoint", end.as_str()));
                }
            }
            let link = graph
                .links
                .get_mut(&id)
                .ok_or_else(|| missing("link", id.as_str()))?;
            let old = LinkEndpoints::of(link);
            link.source = new.source.clone();
            link.target = new.target.clone();
            Ok(Applied::at(Action::UpdateLink { id, old, new }, None))
        }
        Action::UpdateTriple { id, new, .. } => {
            let mut triple = graph
                .triple(&id)
                .cloned()
                .ok_or_else(|| missing("triple", id.as_str()))?;
            let old = std::mem::replace(&mut triple.config, new.clone());
            triple.value = resync_triple_value(graph, &triple)?;
            if let Some(live) = graph.triples.get_mut(&id) {
                *live = triple;
            }
            Ok(Applied::at(Action::UpdateTriple { id, old, new }, None))
        }
    }
}

/// Undo one applied action
pub fn revert(graph: &mut Cmap, applied: &Applied) -> CmapResult<()> {
    let slot = applied.slot.unwrap_or(0);
    match &applied.action {
        Action::AddNode(node) => {
            graph
                .nodes
                .remove(&node.id)
                .ok_or_else(|| missing("node", node.id.as_str()))?;
        }
        Action::AddLink(link) => {
            graph
                .links
                .remove(&link.id)
                .ok_or_else(|| missing("link", link.id.as_str()))?;
        }
        Action::AddTriple(triple) => {
            graph
                .triples
                .remove(&triple.id)
                .ok_or_else(|| missing("triple", triple.id.as_str()))?;
        }
        Action::RemoveNode(node) => {
            if !graph.nodes.insert_at(slot, node.clone()) {
                return Err(duplicate("node", node.id.as_str()));
            }
        }
        Action::RemoveLink(link) => {
            if !graph.links.insert_at(slot, link.clone()) {
                return Err(duplicate("link", link.id.as_str()));
            }
        }
        Action::RemoveTriple(triple) => {
            if !graph.triples.insert_at(slot, triple.clone()) {
                return Err(duplicate("triple", triple.id.as_str()));
            }
        }
        Action::UpdateNode { id, old, new } => {
            apply(
                graph,
                Action::UpdateNode {
                    id: id.clone(),
                    old: new.clone(),
                    new: old.clone(),
                },
            )?;
        }
        Action::UpdateLink { id, old, new } => {
            apply(
                graph,
                Action::UpdateLink {
                    id: id.clone(),
                    old: new.clone(),
                    new: old.clone(),
                },
            )?;
        }
        Action::UpdateTriple { id, old, new } => {
            apply(
                graph,
                Action::UpdateTriple {
                    id: id.clone(),
                    old: new.clone(),
                    new: old.clone(),
                },
            )?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{raw_triple, Link, LinkType, Node, NodeType, TripleConfig};

    fn lawn() -> Vec<Action> {
        vec![
            Action::AddNode(Node::new("c1", NodeType::Concept, "john")),
            Action::AddNode(Node::new("r1", NodeType::Relation, "mows")),
            Action::AddNode(Node::new("c2", NodeType::Concept, "the lawn")),
            Action::AddLink(Link::new("so1", LinkType::Source, "c1", "r1")),
            Action::AddLink(Link::new("ta1", LinkType::Target, "r1", "c2")),
            Action::AddTriple(Triple::new(
                "t1",
                raw_triple("john", "mows", "the lawn"),
                TripleConfig::new("c1".into(), "r1".into(), "c2".into(), "so1".into(), "ta1".into()),
            )),
        ]
    }

    fn build() -> Cmap {
        let mut graph = Cmap::new();
        for action in lawn() {
            apply(&mut graph, action).unwrap();
        }
        graph
    }

    #[test]
    fn update_node_propagates_into_triples() {
        let mut graph = build();
        let applied = apply(
            &mut graph,
            Action::UpdateNode {
                id: "c1".into(),
                old: String::new(),
                new: "jane".into(),
            },
        )
        .unwrap();
        assert_eq!(graph.triple(&"t1".into()).unwrap().value[0], "jane");
        // the captured old value comes from the live node, not the request
        assert!(matches!(applied.action, Action::UpdateNode { ref old, .. } if old == "john"));

        revert(&mut graph, &applied).unwrap();
        assert_eq!(graph.triple(&"t1".into()).unwrap().value[0], "john");
        assert!(graph.check_consistency().is_ok());
    }

    #[test]
    fn removal_reverts_into_original_slot() {
        let mut graph = build();
        let before = graph.clone();
        let node = graph.node(&"r1".into()).cloned().unwrap();
        let applied = apply(&mut graph, Action::RemoveNode(node)).unwrap();
        assert_eq!(applied.slot, Some(1));
        revert(&mut graph, &applied).unwrap();
        assert_eq!(graph, before);
    }

    #[test]
    fn missing_ids_are_invariant_violations() {
        let mut graph = build();
        let ghost = Node::new("zz", NodeType::Concept, "ghost");
        assert!(matches!(
            apply(&mut graph, Action::RemoveNode(ghost)),
            Err(CmapError::InvariantViolation(_))
        ));
        let dangling = Link::new("so9", LinkType::Source, "zz", "r1");
        assert!(apply(&mut graph, Action::AddLink(dangling)).is_err());
    }

    #[test]
    fn update_triple_rereads_value() {
        let mut graph = build();
        apply(&mut graph, Action::AddNode(Node::new("r2", NodeType::Relation, "cuts"))).unwrap();
        let old = graph.triple(&"t1".into()).unwrap().config.clone();
        let mut new = old.clone();
        new.rel_id = "r2".into();
        apply(&mut graph, Action::UpdateTriple { id: "t1".into(), old, new }).unwrap();
        assert_eq!(graph.triple(&"t1".into()).unwrap().value[1], "cuts");
    }
}

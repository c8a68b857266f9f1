//! CmapManager: the public entry point for one concept map
//!
//! Every mutation is planned against the current graph, then committed as a
//! single undoable step through the action log. Planning failures leave the
//! map and its log untouched.

use crate::action::{Action, ActionLog};
use crate::config::CmapConfig;
use crate::error::{CmapError, CmapResult};
use crate::graph::{
    normalize_text, normalize_triple, reset_settings, Cmap, Link, LinkId, LinkTemplate, LinkType,
    Node, NodeId, NodeTemplate, NodeType, PartialTripleConfig, RawTriple, Settings, Triple, TripleId,
};
use crate::planner::{self, Attachment, ConceptSimilarity, RelationRule, RelationSimilarity, RemovalKind, StepBuilder, TripleValueEdit};
use crate::query::{FindQuery, QueryResult};
use serde::{Deserialize, Serialize};

/// The map's focus concept, held for the caller and never interpreted
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuperConcept {
    pub node_value: String,
    pub node_id: Option<NodeId>,
}

/// Owns one concept map and its undo history
#[derive(Debug, Clone, Default)]
pub struct CmapManager {
    graph: Cmap,
    log: ActionLog,
    config: CmapConfig,
    super_concept: SuperConcept,
}

impl CmapManager {
    pub fn new() -> Self {
        Self::with_config(CmapConfig::default())
    }

    pub fn with_config(config: CmapConfig) -> Self {
        let log = ActionLog::new()
            .with_max_steps(config.max_log_steps)
            .with_verification(config.verify_consistency);
        Self {
            graph: Cmap::new(),
            log,
            config,
            super_concept: SuperConcept::default(),
        }
    }

    pub fn config(&self) -> &CmapConfig {
        &self.config
    }

    // === Load ===

    /// Replace the whole map with the decomposition of `raw`. Clears the log.
    pub fn load_triples(&mut self, raw: &[RawTriple]) {
        self.graph = planner::decompose(raw, &self.config);
        self.log.clear();
        tracing::info!(
            nodes = self.graph.node_count(),
            links = self.graph.link_count(),
            triples = self.graph.triple_count(),
            "loaded triples"
        );
    }

    /// Replace the whole map with caller-supplied collections.
    ///
    /// Node values are normalized, the default settings keys are reset on
    /// every node and link, and triple values are re-read from their nodes.
    /// Ids must be unique across nodes, links and triples, every reference
    /// must resolve and every triple's links must join its nodes. Clears the
    /// log.
    pub fn load_graph(&mut self, nodes: Vec<Node>, links: Vec<Link>, triples: Vec<Triple>) -> CmapResult<()> {
        let mut graph = Cmap::new();
        for mut node in nodes {
            claim_id(&graph, node.id.as_str())?;
            node.value = normalize_text(&node.value);
            reset_settings(&mut node.settings, &self.config.node_settings);
            graph.nodes.push_back(node);
        }
        for mut link in links {
            claim_id(&graph, link.id.as_str())?;
            for end in [&link.source, &link.target] {
                graph.require_node(end)?;
            }
            reset_settings(&mut link.settings, &self.config.link_settings);
            graph.links.push_back(link);
        }
        for mut triple in triples {
            claim_id(&graph, triple.id.as_str())?;
            let c = &triple.config;
            triple.value = [
                graph.require_node(&c.sub_id)?.value.clone(),
                graph.require_node(&c.rel_id)?.value.clone(),
                graph.require_node(&c.obj_id)?.value.clone(),
            ];
            graph.require_link(&triple.config.source_id)?;
            graph.require_link(&triple.config.target_id)?;
            graph.triples.push_back(triple);
        }
        graph.check_consistency()?;

        self.graph = graph;
        self.log.clear();
        tracing::info!(
            nodes = self.graph.node_count(),
            links = self.graph.link_count(),
            triples = self.graph.triple_count(),
            "loaded graph"
        );
        Ok(())
    }

    /// Replace the map with bare nodes: values normalized, settings set to
    /// the defaults, no links or triples. Clears the log.
    pub fn set_nodes(&mut self, nodes: Vec<Node>) -> CmapResult<()> {
        let mut graph = Cmap::new();
        for mut node in nodes {
            claim_id(&graph, node.id.as_str())?;
            node.value = normalize_text(&node.value);
            node.settings = self.config.node_settings.clone();
            graph.nodes.push_back(node);
        }
        self.graph = graph;
        self.log.clear();
        tracing::info!(nodes = self.graph.node_count(), "set nodes");
        Ok(())
    }

    // === Text mutation ===

    /// Insert one triple, attaching it to existing structure where it can
    pub fn add_triple(&mut self, raw: &RawTriple) -> CmapResult<Attachment> {
        let plan = planner::plan_triple_insertion(&self.graph, &self.config, raw)?;
        self.commit(plan.actions)?;
        Ok(plan.attachment)
    }

    /// Insert several triples as one undoable step. Returns how many were new.
    pub fn add_triples(&mut self, raw: &[RawTriple]) -> CmapResult<usize> {
        let mut b = StepBuilder::new(&self.graph, &self.config);
        let mut added = 0;
        for value in raw {
            let plan = planner::plan_triple_insertion(b.graph(), &self.config, value)?;
            if plan.attachment != Attachment::Existing {
                added += 1;
            }
            b.extend(plan.actions)?;
        }
        let actions = b.finish();
        self.commit(actions)?;
        Ok(added)
    }

    /// Insert a triple reusing the ids in `partial`; missing parts are created
    pub fn add_triple_with_ids(&mut self, raw: &RawTriple, partial: &PartialTripleConfig) -> CmapResult<TripleId> {
        let actions = planner::plan_triple_with_ids(&self.graph, &self.config, raw, partial)?;
        let id = actions
            .iter()
            .find_map(|a| match a {
                Action::AddTriple(t) => Some(t.id.clone()),
                _ => None,
            })
            .ok_or_else(|| CmapError::InvariantViolation("triple plan added no triple".to_string()))?;
        self.commit(actions)?;
        Ok(id)
    }

    /// Remove the triple with this value (compared after normalization)
    pub fn remove_triple(&mut self, value: &RawTriple) -> CmapResult<RemovalKind> {
        let id = self
            .find_triple_by_terms(value)
            .map(|t| t.id.clone())
            .ok_or_else(|| CmapError::TripleValueNotFound(value.clone()))?;
        self.remove_triple_by_id(&id)
    }

    pub fn remove_triple_by_id(&mut self, id: &TripleId) -> CmapResult<RemovalKind> {
        let plan = planner::plan_triple_removal(&self.graph, &self.config, id)?;
        self.commit(plan.actions)?;
        Ok(plan.kind)
    }

    // === Graph mutation ===

    pub fn add_node(&mut self, template: &NodeTemplate) -> CmapResult<Node> {
        let plan = planner::plan_add_node(&self.graph, &self.config, template)?;
        self.commit(plan.actions)?;
        Ok(plan.created)
    }

    /// Add a link, deriving every triple it completes
    pub fn add_link(&mut self, template: &LinkTemplate) -> CmapResult<Link> {
        let plan = planner::plan_add_link(&self.graph, &self.config, template)?;
        self.commit(plan.actions)?;
        Ok(plan.created)
    }

    pub fn add_node_and_link(&mut self, existing: &NodeId, template: &NodeTemplate) -> CmapResult<Node> {
        let plan = planner::plan_add_node_and_link(&self.graph, &self.config, existing, template)?;
        self.commit(plan.actions)?;
        Ok(plan.created)
    }

    /// Connect two concepts through a placeholder relation; returns the relation
    pub fn add_proposition_from_concepts(
        &mut self,
        subject: &NodeId,
        object: &NodeId,
        position: Option<(f64, f64)>,
    ) -> CmapResult<Node> {
        let plan = planner::plan_proposition_from_concepts(&self.graph, &self.config, subject, object, position)?;
        self.commit(plan.actions)?;
        Ok(plan.created)
    }

    /// Hang a placeholder proposition off a concept; returns the new concept
    pub fn add_proposition_from_single_concept(
        &mut self,
        subject: &NodeId,
        position: Option<(f64, f64)>,
    ) -> CmapResult<Node> {
        let plan = planner::plan_proposition_from_single_concept(&self.graph, &self.config, subject, position)?;
        self.commit(plan.actions)?;
        Ok(plan.created)
    }

    pub fn remove_node_ordered(&mut self, id: &NodeId) -> CmapResult<()> {
        self.remove_nodes_ordered(std::slice::from_ref(id))
    }

    pub fn remove_nodes_ordered(&mut self, ids: &[NodeId]) -> CmapResult<()> {
        let actions = planner::plan_node_removal(&self.graph, &self.config, ids)?;
        self.commit(actions)?;
        Ok(())
    }

    pub fn remove_link(&mut self, id: &LinkId) -> CmapResult<()> {
        let actions = planner::plan_link_removal(&self.graph, &self.config, id)?;
        self.commit(actions)?;
        Ok(())
    }

    pub fn remove_link_ordered(&mut self, id: &LinkId) -> CmapResult<()> {
        let actions = planner::plan_link_removal_ordered(&self.graph, &self.config, id)?;
        self.commit(actions)?;
        Ok(())
    }

    // === Update ===

    pub fn update_node_value(&mut self, id: &NodeId, text: &str) -> CmapResult<()> {
        let actions = planner::plan_node_value_update(&self.graph, &self.config, id, text)?;
        self.commit(actions)?;
        Ok(())
    }

    pub fn update_triples_value(&mut self, edits: &[TripleValueEdit]) -> CmapResult<()> {
        let actions = planner::plan_triples_value_update(&self.graph, &self.config, edits)?;
        self.commit(actions)?;
        Ok(())
    }

    // === Settings ===

    /// Replace the settings bag of each listed node. Settings are caller
    /// state, so the change is not logged and undo leaves it alone. Fails
    /// without changing anything if any id is unknown.
    pub fn update_node_settings(&mut self, updates: &[(NodeId, Settings)]) -> CmapResult<()> {
        for (id, _) in updates {
            self.graph.require_node(id)?;
        }
        for (id, settings) in updates {
            if let Some(node) = self.graph.nodes.get_mut(id) {
                node.settings = settings.clone();
            }
        }
        Ok(())
    }

    /// Replace the settings bag of each listed link; unlogged like
    /// [`Self::update_node_settings`]
    pub fn update_link_settings(&mut self, updates: &[(LinkId, Settings)]) -> CmapResult<()> {
        for (id, _) in updates {
            self.graph.require_link(id)?;
        }
        for (id, settings) in updates {
            if let Some(link) = self.graph.links.get_mut(id) {
                link.settings = settings.clone();
            }
        }
        Ok(())
    }

    // === Merge ===

    pub fn merge_concepts_by_similarity(&mut self, signal: &ConceptSimilarity) -> CmapResult<()> {
        let actions = planner::plan_concept_similarity(&self.graph, &self.config, signal)?;
        let count = self.commit(actions)?;
        tracing::info!(target = %signal.id, actions = count, "merged similar concepts");
        Ok(())
    }

    pub fn merge_relations_by_similarity(&mut self, signal: &RelationSimilarity, rule: RelationRule) -> CmapResult<()> {
        let actions = planner::plan_relation_similarity(&self.graph, &self.config, signal, rule)?;
        let count = self.commit(actions)?;
        tracing::info!(word = %signal.word, ?rule, actions = count, "merged similar relations");
        Ok(())
    }

    /// Merge concept nodes `sources` into `target`
    pub fn merge_nodes(&mut self, target: &NodeId, sources: &[NodeId]) -> CmapResult<()> {
        let actions = planner::plan_concept_merge(&self.graph, &self.config, target, sources)?;
        let count = self.commit(actions)?;
        tracing::info!(%target, sources = sources.len(), actions = count, "merged concepts");
        Ok(())
    }

    /// Merge relation nodes `sources` into `target`
    pub fn merge_relation_nodes(&mut self, target: &NodeId, sources: &[NodeId]) -> CmapResult<()> {
        let actions = planner::plan_relation_merge(&self.graph, &self.config, target, sources)?;
        let count = self.commit(actions)?;
        tracing::info!(%target, sources = sources.len(), actions = count, "merged relations");
        Ok(())
    }

    // === Log ===

    /// Revert the last step; returns whether more steps remain
    pub fn undo(&mut self) -> CmapResult<bool> {
        self.log.undo(&mut self.graph)
    }

    /// Commit hand-built actions as one step
    pub fn commit(&mut self, actions: Vec<Action>) -> CmapResult<usize> {
        self.log.commit(&mut self.graph, actions)
    }

    pub fn log(&self) -> &ActionLog {
        &self.log
    }

    // === Query ===

    pub fn graph(&self) -> &Cmap {
        &self.graph
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> + '_ {
        self.graph.nodes()
    }

    pub fn links(&self) -> impl Iterator<Item = &Link> + '_ {
        self.graph.links()
    }

    /// Triples, most recently added first
    pub fn triples(&self) -> impl Iterator<Item = &Triple> + '_ {
        self.graph.triples()
    }

    /// Id of the concept with this text, ignoring case. Triple subjects are
    /// searched first, then objects, then concepts outside any triple.
    pub fn find_concept_id(&self, text: &str) -> Option<NodeId> {
        let wanted = normalize_text(text);
        let by_role = |index: usize| {
            self.graph
                .triples()
                .find(|t| t.value[index] == wanted)
                .map(|t| if index == 0 { t.config.sub_id.clone() } else { t.config.obj_id.clone() })
        };
        by_role(0).or_else(|| by_role(2)).or_else(|| {
            self.graph
                .find_node_by_value_ignore_case(&wanted, NodeType::Concept)
                .map(|n| n.id.clone())
        })
    }

    pub fn find_concept_node(&self, id: &NodeId) -> Option<&Node> {
        self.graph.node(id)
    }

    pub fn find_triple_by_terms(&self, terms: &RawTriple) -> Option<&Triple> {
        self.graph.find_triple_by_value(&normalize_triple(terms))
    }

    /// Links realizing triples whose terms match: subject and relation for a
    /// source link, relation and object for a target link. Link order.
    pub fn find_links_by_value(&self, from: &str, to: &str, link_type: LinkType) -> Vec<&Link> {
        let (from, to) = (normalize_text(from), normalize_text(to));
        let ids: Vec<&LinkId> = self
            .graph
            .triples()
            .filter_map(|t| match link_type {
                LinkType::Source if t.value[0] == from && t.value[1] == to => Some(&t.config.source_id),
                LinkType::Target if t.value[1] == from && t.value[2] == to => Some(&t.config.target_id),
                _ => None,
            })
            .collect();
        self.graph.links().filter(|l| ids.contains(&&l.id)).collect()
    }

    pub fn find_link_by_value(&self, from: &str, to: &str, link_type: LinkType) -> Option<&Link> {
        self.find_links_by_value(from, to, link_type).into_iter().next()
    }

    pub fn find_nodes(&self, query: &FindQuery) -> QueryResult {
        query.execute(&self.graph)
    }

    /// Rebuild the triple values implied by nodes and links alone
    pub fn reconstruct_triples(&self) -> Vec<RawTriple> {
        planner::reconstruct(&self.graph)
    }

    pub fn check_consistency(&self) -> CmapResult<()> {
        self.graph.check_consistency()
    }

    // === Super concept ===

    pub fn super_concept(&self) -> &SuperConcept {
        &self.super_concept
    }

    pub fn set_super_concept(&mut self, value: impl Into<String>, node_id: Option<NodeId>) {
        self.super_concept = SuperConcept {
            node_value: value.into(),
            node_id,
        };
    }
}

/// Fail if `id` is already taken by any node, link or triple
fn claim_id(graph: &Cmap, id: &str) -> CmapResult<()> {
    if graph.contains_id(id) {
        return Err(CmapError::DuplicateId(id.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{raw_triple, PropertyValue};

    fn manager_with(triples: &[(&str, &str, &str)]) -> CmapManager {
        let mut m = CmapManager::new();
        for (s, r, o) in triples {
            m.add_triple(&raw_triple(*s, *r, *o)).unwrap();
        }
        m
    }

    #[test]
    fn load_triples_clears_log() {
        let mut m = manager_with(&[("a", "b", "c")]);
        assert_eq!(m.log().len(), 1);
        m.load_triples(&[raw_triple("This", "or", "That")]);
        assert!(m.log().is_empty());
        assert_eq!(m.triples().count(), 1);
        assert!(!m.undo().unwrap());
    }

    #[test]
    fn add_triples_is_one_step() {
        let mut m = CmapManager::new();
        let added = m
            .add_triples(&[
                raw_triple("a", "likes", "x"),
                raw_triple("b", "likes", "x"),
                raw_triple("a", "likes", "x"),
            ])
            .unwrap();
        assert_eq!(added, 2);
        assert_eq!(m.log().len(), 1);
        assert!(m.triples().all(|t| t.config.join));

        m.undo().unwrap();
        assert!(m.graph().is_empty());
    }

    #[test]
    fn remove_unknown_value_is_not_found() {
        let mut m = manager_with(&[("a", "b", "c")]);
        let err = m.remove_triple(&raw_triple("x", "y", "z")).unwrap_err();
        assert!(matches!(err, CmapError::TripleValueNotFound(_)));
        assert_eq!(m.log().len(), 1);
    }

    #[test]
    fn remove_triple_matches_after_normalization() {
        let mut m = manager_with(&[("a", "b", "c")]);
        assert_eq!(m.remove_triple(&raw_triple(" A ", "B", "C")).unwrap(), RemovalKind::Singleton);
        assert!(m.graph().is_empty());
    }

    #[test]
    fn find_concept_id_ignores_case() {
        let m = manager_with(&[("Big Dog", "chases", "Cat")]);
        let dog = m.find_concept_id("BIG dog").unwrap();
        assert_eq!(m.find_concept_node(&dog).unwrap().value, "big dog");
        assert!(m.find_concept_id("cat").is_some());
        assert!(m.find_concept_id("chases").is_none());
    }

    #[test]
    fn find_links_by_value_follows_triples() {
        let m = manager_with(&[("a", "likes", "x"), ("a", "likes", "y")]);
        assert_eq!(m.find_links_by_value("a", "likes", LinkType::Source).len(), 1);
        assert_eq!(m.find_links_by_value("likes", "y", LinkType::Target).len(), 1);
        assert!(m.find_link_by_value("likes", "z", LinkType::Target).is_none());
    }

    #[test]
    fn load_graph_resyncs_and_resets() {
        let mut source = manager_with(&[("a", "likes", "x")]);
        source.update_node_value(&source.find_concept_id("a").unwrap(), "A  Cat").unwrap();

        let mut nodes: Vec<Node> = source.nodes().cloned().collect();
        for node in &mut nodes {
            node.settings.clear();
            node.value = node.value.to_uppercase();
        }
        let links: Vec<Link> = source.links().cloned().collect();
        let mut triples: Vec<Triple> = source.triples().cloned().collect();
        triples[0].value = raw_triple("stale", "stale", "stale");

        let mut m = CmapManager::new();
        m.load_graph(nodes, links, triples).unwrap();
        let t = m.triples().next().unwrap();
        assert_eq!(t.value, raw_triple("a cat", "likes", "x"));
        assert!(m.nodes().all(|n| n.settings == m.config().node_settings));
    }

    #[test]
    fn load_graph_rejects_dangling_links() {
        let mut m = CmapManager::new();
        let link = Link::new("so1", LinkType::Source, "c1", "r1");
        let err = m.load_graph(Vec::new(), vec![link], Vec::new()).unwrap_err();
        assert!(matches!(err, CmapError::NodeNotFound(_)));
    }

    #[test]
    fn load_graph_rejects_repeated_ids() {
        let mut m = manager_with(&[("a", "b", "c")]);
        let nodes = vec![
            Node::new("c1", NodeType::Concept, "one"),
            Node::new("c1", NodeType::Concept, "two"),
        ];
        let err = m.load_graph(nodes, Vec::new(), Vec::new()).unwrap_err();
        assert!(matches!(err, CmapError::DuplicateId(ref id) if id == "c1"));
        assert_eq!(m.triples().count(), 1);
        assert_eq!(m.log().len(), 1);
    }

    #[test]
    fn load_graph_rejects_ids_shared_across_kinds() {
        let mut m = CmapManager::new();
        let nodes = vec![
            Node::new("c1", NodeType::Concept, "one"),
            Node::new("c2", NodeType::Relation, "two"),
        ];
        let links = vec![Link::new("c2", LinkType::Source, "c1", "c2")];
        let err = m.load_graph(nodes, links, Vec::new()).unwrap_err();
        assert!(matches!(err, CmapError::DuplicateId(_)));
        assert!(m.graph().is_empty());
    }

    #[test]
    fn load_graph_rejects_miswired_triple() {
        let source = manager_with(&[("a", "likes", "x")]);
        let nodes: Vec<Node> = source.nodes().cloned().collect();
        let links: Vec<Link> = source.links().cloned().collect();
        let mut triples: Vec<Triple> = source.triples().cloned().collect();
        let c = &mut triples[0].config;
        std::mem::swap(&mut c.source_id, &mut c.target_id);

        let mut m = CmapManager::with_config(CmapConfig::default().with_verification(false));
        let err = m.load_graph(nodes, links, triples).unwrap_err();
        assert!(matches!(err, CmapError::InvariantViolation(_)));
        assert!(m.graph().is_empty());
    }

    #[test]
    fn set_nodes_replaces_map_with_bare_nodes() {
        let mut m = manager_with(&[("a", "likes", "x")]);
        let mut stray = Node::new("c9", NodeType::Concept, "  Loose   End ");
        stray.settings.insert("dim".into(), PropertyValue::Bool(true));
        m.set_nodes(vec![stray, Node::new("r9", NodeType::Relation, "Holds")]).unwrap();

        assert_eq!(m.graph().node_count(), 2);
        assert_eq!(m.graph().link_count(), 0);
        assert_eq!(m.triples().count(), 0);
        assert!(m.log().is_empty());
        let node = m.find_concept_node(&NodeId::from("c9")).unwrap();
        assert_eq!(node.value, "loose end");
        assert_eq!(node.settings, m.config().node_settings);
    }

    #[test]
    fn set_nodes_rejects_repeated_ids() {
        let mut m = manager_with(&[("a", "likes", "x")]);
        let nodes = vec![
            Node::new("c1", NodeType::Concept, "one"),
            Node::new("c1", NodeType::Concept, "two"),
        ];
        assert!(matches!(m.set_nodes(nodes), Err(CmapError::DuplicateId(_))));
        assert_eq!(m.triples().count(), 1);
    }

    #[test]
    fn settings_updates_are_unlogged() {
        let mut m = manager_with(&[("a", "likes", "x")]);
        let a = m.find_concept_id("a").unwrap();
        let link = m.links().next().unwrap().id.clone();

        let mut node_settings = m.find_concept_node(&a).unwrap().settings.clone();
        node_settings.insert("dim".into(), PropertyValue::Bool(true));
        m.update_node_settings(&[(a.clone(), node_settings.clone())]).unwrap();
        let mut link_settings = Settings::new();
        link_settings.insert("undefinedNode".into(), PropertyValue::Bool(true));
        m.update_link_settings(&[(link.clone(), link_settings.clone())]).unwrap();

        assert_eq!(m.log().len(), 1);
        assert_eq!(m.find_concept_node(&a).unwrap().settings, node_settings);
        assert_eq!(m.graph().link(&link).unwrap().settings, link_settings);

        m.add_triple(&raw_triple("a", "likes", "y")).unwrap();
        m.undo().unwrap();
        assert_eq!(m.find_concept_node(&a).unwrap().settings, node_settings);
    }

    #[test]
    fn settings_update_with_unknown_id_changes_nothing() {
        let mut m = manager_with(&[("a", "likes", "x")]);
        let a = m.find_concept_id("a").unwrap();
        let before = m.graph().clone();
        let mut dimmed = Settings::new();
        dimmed.insert("dim".into(), PropertyValue::Bool(true));

        let err = m
            .update_node_settings(&[(a, dimmed.clone()), (NodeId::from("c404"), dimmed)])
            .unwrap_err();
        assert!(matches!(err, CmapError::NodeNotFound(_)));
        assert_eq!(m.graph(), &before);
    }

    #[test]
    fn add_triple_with_ids_returns_new_id() {
        let mut m = manager_with(&[("a", "likes", "x")]);
        let a = m.find_concept_id("a").unwrap();
        let id = m
            .add_triple_with_ids(&raw_triple("", "likes", "y"), &PartialTripleConfig::new().with_subject(a))
            .unwrap();
        assert_eq!(m.graph().triple(&id).unwrap().value, raw_triple("a", "likes", "y"));
    }

    #[test]
    fn find_nodes_sees_updated_settings() {
        let mut m = manager_with(&[("a", "likes", "x"), ("b", "likes", "y")]);
        let b = m.find_concept_id("b").unwrap();
        let mut settings = m.find_concept_node(&b).unwrap().settings.clone();
        settings.insert("highlight".into(), PropertyValue::String("amber".into()));
        m.update_node_settings(&[(b.clone(), settings)]).unwrap();

        let found = m.find_nodes(&FindQuery::new().with_setting("highlight"));
        assert_eq!(found.ids(), vec![b.as_str()]);
        assert_eq!(m.find_nodes(&FindQuery::new().with_node_type(NodeType::Concept)).total_count, 4);
    }

    #[test]
    fn add_triple_with_ids_reuses_given_source_side() {
        let mut m = manager_with(&[("a", "likes", "x")]);
        let t = m.triples().next().unwrap().config.clone();
        let partial = PartialTripleConfig::new()
            .with_subject(t.sub_id.clone())
            .with_relation(t.rel_id.clone())
            .with_source_link(t.source_id.clone());
        let id = m.add_triple_with_ids(&raw_triple("", "", "Zebras"), &partial).unwrap();

        assert_eq!(m.graph().link_count(), 3);
        assert_eq!(m.graph().node_count(), 4);
        let added = m.graph().triple(&id).unwrap();
        assert_eq!(added.value, raw_triple("a", "likes", "zebras"));
        assert!(added.config.fork);
    }

    #[test]
    fn add_triple_with_ids_rejects_unjoined_link() {
        let mut m = manager_with(&[("a", "likes", "x"), ("b", "sees", "y")]);
        let y = m.find_concept_id("y").unwrap();
        let target = m.find_link_by_value("likes", "x", LinkType::Target).unwrap().id.clone();
        let a = m.find_concept_id("a").unwrap();
        let partial = PartialTripleConfig::new()
            .with_subject(a)
            .with_object(y)
            .with_target_link(target);
        let err = m.add_triple_with_ids(&raw_triple("", "likes", ""), &partial).unwrap_err();
        assert!(matches!(err, CmapError::LinkMismatch(_)));
        assert_eq!(m.log().len(), 2);
    }

    #[test]
    fn super_concept_is_passed_through() {
        let mut m = CmapManager::new();
        m.set_super_concept("Energy", Some(NodeId::from("c1")));
        assert_eq!(m.super_concept().node_value, "Energy");
        assert_eq!(m.super_concept().node_id.as_ref().map(NodeId::as_str), Some("c1"));
    }

    #[test]
    fn bounded_log_from_config() {
        let mut m = CmapManager::with_config(CmapConfig::default().with_max_log_steps(1));
        m.add_triple(&raw_triple("a", "b", "c")).unwrap();
        m.add_triple(&raw_triple("d", "e", "f")).unwrap();
        assert_eq!(m.log().len(), 1);
        assert!(!m.undo().unwrap());
        assert_eq!(m.triples().count(), 1);
    }
}

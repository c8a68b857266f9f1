//! CmapRegistry: many independent concept maps behind one handle

use crate::config::CmapConfig;
use crate::error::{CmapError, CmapResult};
use crate::graph::string_id;
use crate::manager::CmapManager;
use dashmap::DashMap;
use uuid::Uuid;

string_id!(
    /// Identifier for a concept map in a registry: a UUID or a
    /// caller-chosen name
    MapId
);

impl MapId {
    /// Random UUID-based id
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl Default for MapId {
    fn default() -> Self {
        Self::new()
    }
}

/// Holds one manager per map.
///
/// A manager is only ever mutated through `with_map_mut`, which holds the
/// map's shard lock for the duration of the closure, so each map sees at most
/// one mutation in flight. Reads hand out clones.
#[derive(Debug, Default)]
pub struct CmapRegistry {
    maps: DashMap<MapId, CmapManager>,
    config: CmapConfig,
}

impl CmapRegistry {
    pub fn new() -> Self {
        Self::with_config(CmapConfig::default())
    }

    /// Registry whose new maps start from `config`
    pub fn with_config(config: CmapConfig) -> Self {
        Self {
            maps: DashMap::new(),
            config,
        }
    }

    /// Create an empty map and return its id
    pub fn create(&self) -> MapId {
        let id = MapId::new();
        self.maps
            .insert(id.clone(), CmapManager::with_config(self.config.clone()));
        id
    }

    /// Insert or replace a manager
    pub fn insert(&self, id: MapId, manager: CmapManager) -> Option<CmapManager> {
        self.maps.insert(id, manager)
    }

    /// Snapshot of a map
    pub fn get(&self, id: &MapId) -> Option<CmapManager> {
        self.maps.get(id).map(|r| r.clone())
    }

    /// Run `f` with exclusive access to one map
    pub fn with_map_mut<T>(
        &self,
        id: &MapId,
        f: impl FnOnce(&mut CmapManager) -> CmapResult<T>,
    ) -> CmapResult<T> {
        let mut entry = self
            .maps
            .get_mut(id)
            .ok_or_else(|| CmapError::MapNotFound(id.clone()))?;
        f(entry.value_mut())
    }

    pub fn remove(&self, id: &MapId) -> Option<CmapManager> {
        self.maps.remove(id).map(|(_, m)| m)
    }

    pub fn list(&self) -> Vec<MapId> {
        self.maps.iter().map(|r| r.key().clone()).collect()
    }

    pub fn count(&self) -> usize {
        self.maps.len()
    }

    pub fn contains(&self, id: &MapId) -> bool {
        self.maps.contains_key(id)
    }
}

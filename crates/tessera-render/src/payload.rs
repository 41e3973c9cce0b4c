//! Backend-Private Payload Storage
//!
//! Side tables keyed by model, mesh and mesh-LOD identity. The active
//! backend owns its tables outright; geometry objects never hold backend
//! data, so a payload can never dangle past a backend switch — removing a
//! model sweeps all three granularities at once.

use ahash::AHashMap;

use crate::manager::ModelId;

/// Payloads swept out of the tables for one model
#[derive(Debug)]
pub struct RemovedPayloads<M, S, L> {
    /// The model-level payload, if one was allocated
    pub model: Option<M>,
    /// All mesh-level payloads of the model
    pub meshes: Vec<S>,
    /// All mesh-LOD-level payloads of the model
    pub lods: Vec<L>,
}

/// Three-level payload tables for one backend
#[derive(Debug)]
pub struct PayloadTables<M, S, L> {
    models: AHashMap<ModelId, M>,
    meshes: AHashMap<(ModelId, usize), S>,
    lods: AHashMap<(ModelId, usize, usize), L>,
}

impl<M, S, L> Default for PayloadTables<M, S, L> {
    fn default() -> Self {
        Self {
            models: AHashMap::new(),
            meshes: AHashMap::new(),
            lods: AHashMap::new(),
        }
    }
}

impl<M, S, L> PayloadTables<M, S, L> {
    /// Create empty tables
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the model-level payload
    pub fn insert_model(&mut self, id: ModelId, payload: M) {
        self.models.insert(id, payload);
    }

    /// Store one mesh-level payload
    pub fn insert_mesh(&mut self, id: ModelId, mesh: usize, payload: S) {
        self.meshes.insert((id, mesh), payload);
    }

    /// Store one mesh-LOD-level payload
    pub fn insert_lod(&mut self, id: ModelId, mesh: usize, tier: usize, payload: L) {
        self.lods.insert((id, mesh, tier), payload);
    }

    /// The model-level payload
    pub fn model(&self, id: ModelId) -> Option<&M> {
        self.models.get(&id)
    }

    /// Mutable model-level payload
    pub fn model_mut(&mut self, id: ModelId) -> Option<&mut M> {
        self.models.get_mut(&id)
    }

    /// One mesh-level payload
    pub fn mesh(&self, id: ModelId, mesh: usize) -> Option<&S> {
        self.meshes.get(&(id, mesh))
    }

    /// One mesh-LOD-level payload
    pub fn lod(&self, id: ModelId, mesh: usize, tier: usize) -> Option<&L> {
        self.lods.get(&(id, mesh, tier))
    }

    /// Mutable mesh-LOD-level payload
    pub fn lod_mut(&mut self, id: ModelId, mesh: usize, tier: usize) -> Option<&mut L> {
        self.lods.get_mut(&(id, mesh, tier))
    }

    /// Whether a model-level payload exists
    pub fn has_model(&self, id: ModelId) -> bool {
        self.models.contains_key(&id)
    }

    /// Remove every payload belonging to one model, returning them so the
    /// backend can release device resources they hold
    pub fn remove_model(&mut self, id: ModelId) -> RemovedPayloads<M, S, L> {
        let mesh_keys: Vec<_> = self
            .meshes
            .keys()
            .filter(|key| key.0 == id)
            .copied()
            .collect();
        let lod_keys: Vec<_> = self
            .lods
            .keys()
            .filter(|key| key.0 == id)
            .copied()
            .collect();
        RemovedPayloads {
            model: self.models.remove(&id),
            meshes: mesh_keys
                .into_iter()
                .filter_map(|key| self.meshes.remove(&key))
                .collect(),
            lods: lod_keys
                .into_iter()
                .filter_map(|key| self.lods.remove(&key))
                .collect(),
        }
    }

    /// Number of model-level payloads
    pub fn model_count(&self) -> usize {
        self.models.len()
    }

    /// Number of mesh-level payloads
    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    /// Number of mesh-LOD-level payloads
    pub fn lod_count(&self) -> usize {
        self.lods.len()
    }

    /// Whether all three tables are empty
    pub fn is_empty(&self) -> bool {
        self.models.is_empty() && self.meshes.is_empty() && self.lods.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(raw: u64) -> ModelId {
        ModelId::from_raw(raw)
    }

    #[test]
    fn test_insert_and_lookup() {
        let mut tables: PayloadTables<&str, u32, u32> = PayloadTables::new();
        tables.insert_model(id(1), "model");
        tables.insert_mesh(id(1), 0, 10);
        tables.insert_lod(id(1), 0, 1, 20);

        assert_eq!(tables.model(id(1)), Some(&"model"));
        assert_eq!(tables.mesh(id(1), 0), Some(&10));
        assert_eq!(tables.lod(id(1), 0, 1), Some(&20));
        assert_eq!(tables.lod(id(1), 0, 0), None);
        assert!(!tables.has_model(id(2)));
    }

    #[test]
    fn test_remove_model_sweeps_all_levels() {
        let mut tables: PayloadTables<(), (), u32> = PayloadTables::new();
        for model in 1..=2 {
            tables.insert_model(id(model), ());
            for mesh in 0..2 {
                tables.insert_mesh(id(model), mesh, ());
                for tier in 0..2 {
                    tables.insert_lod(id(model), mesh, tier, model as u32);
                }
            }
        }

        let removed = tables.remove_model(id(1));
        assert!(removed.model.is_some());
        assert_eq!(removed.meshes.len(), 2);
        assert_eq!(removed.lods.len(), 4);
        assert!(removed.lods.iter().all(|&v| v == 1));

        // The other model's payloads are untouched.
        assert_eq!(tables.model_count(), 1);
        assert_eq!(tables.mesh_count(), 2);
        assert_eq!(tables.lod_count(), 4);
        assert!(!tables.is_empty());
    }
}

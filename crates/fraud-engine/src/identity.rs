use crate::error::EngineError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Bidirectional mapping between external account identifiers and dense row
/// indices in the base feature matrix. Built once at load time from the node
/// table's row order and read-only afterwards; identifiers observed at
/// request time are never written back here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityIndex {
    id_to_index: HashMap<String, u32>,
    index_to_id: Vec<String>,
}

impl IdentityIndex {
    /// Build the index from identifiers in row order. Duplicate identifiers
    /// would alias two feature rows, so they are rejected.
    pub fn from_identifiers(ids: Vec<String>) -> Result<Self, EngineError> {
        let mut id_to_index = HashMap::with_capacity(ids.len());
        for (idx, id) in ids.iter().enumerate() {
            if id_to_index.insert(id.clone(), idx as u32).is_some() {
                return Err(EngineError::AssetCorrupt(format!(
                    "duplicate node identifier in node table: {id}"
                )));
            }
        }
        Ok(Self {
            id_to_index,
            index_to_id: ids,
        })
    }

    /// O(1) lookup of the dense row index for an external identifier.
    pub fn lookup(&self, identifier: &str) -> Option<u32> {
        self.id_to_index.get(identifier).copied()
    }

    /// Resolve a dense index back to its external identifier. Indices at or
    /// past the base population (request-appended rows) resolve to `None`.
    pub fn resolve(&self, index: u32) -> Option<&str> {
        self.index_to_id.get(index as usize).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.index_to_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index_to_id.is_empty()
    }
}

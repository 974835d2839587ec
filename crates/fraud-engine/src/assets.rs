use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::graph::BaseGraph;
use crate::model::SageModel;
use crate::persistence;
use std::sync::{Arc, Mutex, RwLock};

/// Everything a request needs, bundled into one immutable snapshot. Shared
/// via `Arc`; in-flight requests keep the snapshot they captured even while
/// a fresh one is being installed.
pub struct EngineAssets {
    pub graph: BaseGraph,
    pub model: SageModel,
}

impl EngineAssets {
    pub fn new(graph: BaseGraph, model: SageModel) -> Self {
        Self { graph, model }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetState {
    Uninitialized,
    Loading,
    Ready,
    Failed,
}

enum Slot {
    Uninitialized,
    Loading,
    Ready(Arc<EngineAssets>),
    Failed(String),
}

/// Owns the asset lifecycle: Uninitialized -> Loading -> Ready | Failed,
/// with re-attempts allowed from Failed. The load mutex guarantees exactly
/// one load executes; concurrent callers either wait on it or observe
/// `NotReady` via [`AssetStore::get`] and retry.
pub struct AssetStore {
    slot: RwLock<Slot>,
    load_guard: Mutex<()>,
    config: EngineConfig,
}

impl AssetStore {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            slot: RwLock::new(Slot::Uninitialized),
            load_guard: Mutex::new(()),
            config,
        }
    }

    /// Current Ready snapshot, or `NotReady` in every other state. Never
    /// blocks on a load in progress.
    pub fn get(&self) -> Result<Arc<EngineAssets>, EngineError> {
        match &*self.slot.read().unwrap() {
            Slot::Ready(assets) => Ok(assets.clone()),
            _ => Err(EngineError::NotReady),
        }
    }

    /// Load the persisted artifacts, or return the snapshot another caller
    /// just finished loading. Holding `load_guard` across the file reads is
    /// what serializes first-load attempts; `slot` itself is only locked
    /// for the state flips, so readers are never blocked behind disk IO.
    pub fn load(&self) -> Result<Arc<EngineAssets>, EngineError> {
        if let Ok(assets) = self.get() {
            return Ok(assets);
        }

        let _guard = self.load_guard.lock().unwrap();
        if let Ok(assets) = self.get() {
            return Ok(assets);
        }

        *self.slot.write().unwrap() = Slot::Loading;
        match persistence::load_assets(&self.config) {
            Ok(assets) => {
                let assets = Arc::new(assets);
                *self.slot.write().unwrap() = Slot::Ready(assets.clone());
                Ok(assets)
            }
            Err(err) => {
                tracing::warn!(error = %err, "asset load failed");
                *self.slot.write().unwrap() = Slot::Failed(err.to_string());
                Err(err)
            }
        }
    }

    /// Atomically swap in a refreshed snapshot (or seed one for tests).
    /// Requests started against the previous snapshot keep their `Arc`.
    pub fn install(&self, assets: EngineAssets) -> Arc<EngineAssets> {
        let assets = Arc::new(assets);
        *self.slot.write().unwrap() = Slot::Ready(assets.clone());
        assets
    }

    pub fn state(&self) -> AssetState {
        match &*self.slot.read().unwrap() {
            Slot::Uninitialized => AssetState::Uninitialized,
            Slot::Loading => AssetState::Loading,
            Slot::Ready(_) => AssetState::Ready,
            Slot::Failed(_) => AssetState::Failed,
        }
    }

    /// Last load failure, for health reporting.
    pub fn last_error(&self) -> Option<String> {
        match &*self.slot.read().unwrap() {
            Slot::Failed(detail) => Some(detail.clone()),
            _ => None,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}

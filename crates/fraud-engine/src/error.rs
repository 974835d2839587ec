use std::path::PathBuf;
use thiserror::Error;

/// Engine-level failures.
///
/// Load-time variants (`AssetMissing`, `AssetCorrupt`, `ShapeMismatch`)
/// describe the whole snapshot; the rest are per-request and never affect
/// other requests or the loaded assets.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("required asset missing: {}", .0.display())]
    AssetMissing(PathBuf),

    #[error("asset corrupt: {0}")]
    AssetCorrupt(String),

    /// Assets are not loaded (initial load pending, in progress, or failed).
    #[error("inference assets not ready")]
    NotReady,

    /// Weight shapes do not match the 5-feature / 2-class contract.
    #[error("model weights incompatible: {0}")]
    ShapeMismatch(String),

    #[error("invalid transaction amount: {0} (must be > 0)")]
    InvalidAmount(f64),
}

impl EngineError {
    /// True when retrying later could succeed without operator action.
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            EngineError::AssetMissing(_) | EngineError::AssetCorrupt(_) | EngineError::NotReady
        )
    }
}

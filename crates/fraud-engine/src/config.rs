use std::env;
use std::path::PathBuf;

pub const NODES_FILE: &str = "nodes.csv";
pub const GRAPH_FILE: &str = "processed_graph.bin";
pub const MODEL_FILE: &str = "mule_model.bin";

/// Locations of the persisted artifacts produced by the batch ETL.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Directory holding nodes.csv, processed_graph.bin and mule_model.bin.
    pub data_dir: PathBuf,
}

impl EngineConfig {
    /// Read configuration from the environment, falling back to the
    /// conventional `shared-data` directory next to the working directory.
    pub fn from_env() -> Self {
        let data_dir = env::var("SHARED_DATA_DIR").unwrap_or_else(|_| "shared-data".to_string());
        Self {
            data_dir: PathBuf::from(data_dir),
        }
    }

    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn nodes_path(&self) -> PathBuf {
        self.data_dir.join(NODES_FILE)
    }

    pub fn graph_path(&self) -> PathBuf {
        self.data_dir.join(GRAPH_FILE)
    }

    pub fn model_path(&self) -> PathBuf {
        self.data_dir.join(MODEL_FILE)
    }
}

use crate::assets::EngineAssets;
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::features::FEATURE_WIDTH;
use crate::graph::{BaseGraph, Edge, NodeProfile};
use crate::identity::IdentityIndex;
use crate::model::SageModel;
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Serialized base-graph artifact written by the batch ETL: the row-major
/// feature matrix, the directed edge index with amounts, and the training
/// labels (kept for shape validation; inference never reads them).
#[derive(Debug, Serialize, Deserialize)]
pub struct GraphSnapshot {
    pub num_nodes: usize,
    pub num_features: usize,
    pub features: Vec<f32>,
    /// (source index, target index, amount)
    pub edges: Vec<(u32, u32, f32)>,
    pub labels: Vec<u8>,
}

/// One SAGE convolution as flat row-major weight vectors with declared
/// dimensions, so shape validation happens before any matrix is built.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayerWeights {
    pub in_dim: usize,
    pub out_dim: usize,
    pub w_neigh: Vec<f32>,
    pub w_root: Vec<f32>,
    pub bias: Vec<f32>,
}

/// Trained model weight blob. The version string travels into every
/// analyze response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ModelWeights {
    pub version: String,
    pub conv1: LayerWeights,
    pub conv2: LayerWeights,
}

impl GraphSnapshot {
    pub fn save_to_file(&self, path: &Path) -> std::io::Result<()> {
        let data = bincode::serialize(self).map_err(std::io::Error::other)?;
        fs::write(path, data)
    }

    pub fn load_from_file(path: &Path) -> Result<Self, EngineError> {
        let data = fs::read(path)
            .map_err(|e| EngineError::AssetCorrupt(format!("{}: {e}", path.display())))?;
        bincode::deserialize(&data)
            .map_err(|e| EngineError::AssetCorrupt(format!("{}: {e}", path.display())))
    }
}

impl ModelWeights {
    pub fn save_to_file(&self, path: &Path) -> std::io::Result<()> {
        let data = bincode::serialize(self).map_err(std::io::Error::other)?;
        fs::write(path, data)
    }

    pub fn load_from_file(path: &Path) -> Result<Self, EngineError> {
        let data = fs::read(path)
            .map_err(|e| EngineError::AssetCorrupt(format!("{}: {e}", path.display())))?;
        bincode::deserialize(&data)
            .map_err(|e| EngineError::AssetCorrupt(format!("{}: {e}", path.display())))
    }
}

/// One row of the node table. Extra columns in the CSV are ignored; the
/// named ones are mandatory and fail the load when absent.
#[derive(Debug, Deserialize)]
struct NodeRecord {
    node_id: String,
    account_age_days: f32,
    balance: f32,
    in_out_ratio: f32,
    pagerank: f32,
    tx_velocity: f32,
    out_degree: u32,
    risk_ratio: f32,
}

fn read_node_table(path: &Path) -> Result<(Vec<String>, Vec<NodeProfile>), EngineError> {
    let mut reader = csv::Reader::from_path(path)
        .map_err(|e| EngineError::AssetCorrupt(format!("{}: {e}", path.display())))?;

    let mut ids = Vec::new();
    let mut profiles = Vec::new();
    for record in reader.deserialize() {
        let record: NodeRecord = record
            .map_err(|e| EngineError::AssetCorrupt(format!("{}: {e}", path.display())))?;
        ids.push(record.node_id);
        profiles.push(NodeProfile {
            account_age_days: record.account_age_days,
            balance: record.balance,
            in_out_ratio: record.in_out_ratio,
            pagerank: record.pagerank,
            tx_velocity: record.tx_velocity,
            out_degree: record.out_degree,
            risk_ratio: record.risk_ratio,
        });
    }
    Ok((ids, profiles))
}

/// Load and cross-validate the three persisted artifacts into one
/// immutable snapshot. Missing files surface as `AssetMissing`; anything
/// that decodes but disagrees with itself surfaces as `AssetCorrupt`.
pub fn load_assets(config: &EngineConfig) -> Result<EngineAssets, EngineError> {
    for path in [config.nodes_path(), config.graph_path(), config.model_path()] {
        if !path.exists() {
            return Err(EngineError::AssetMissing(path));
        }
    }

    let (ids, profiles) = read_node_table(&config.nodes_path())?;
    let snapshot = GraphSnapshot::load_from_file(&config.graph_path())?;

    if snapshot.num_features != FEATURE_WIDTH {
        return Err(EngineError::AssetCorrupt(format!(
            "graph snapshot is {} features wide, engine expects {}",
            snapshot.num_features, FEATURE_WIDTH
        )));
    }
    if snapshot.num_nodes != ids.len() {
        return Err(EngineError::AssetCorrupt(format!(
            "graph snapshot holds {} rows, node table holds {}",
            snapshot.num_nodes,
            ids.len()
        )));
    }
    if snapshot.labels.len() != snapshot.num_nodes {
        return Err(EngineError::AssetCorrupt(format!(
            "graph snapshot holds {} labels for {} rows",
            snapshot.labels.len(),
            snapshot.num_nodes
        )));
    }

    let features =
        Array2::from_shape_vec((snapshot.num_nodes, snapshot.num_features), snapshot.features)
            .map_err(|e| EngineError::AssetCorrupt(format!("feature matrix: {e}")))?;
    let edges = snapshot
        .edges
        .into_iter()
        .map(|(source, target, amount)| Edge {
            source,
            target,
            amount,
        })
        .collect();

    let graph = BaseGraph {
        features,
        edges,
        identity: IdentityIndex::from_identifiers(ids)?,
        profiles,
    };
    graph.validate()?;

    let weights = ModelWeights::load_from_file(&config.model_path())?;
    let model = SageModel::from_weights(&weights)?;

    tracing::info!(
        nodes = graph.num_nodes(),
        edges = graph.num_edges(),
        hidden = model.hidden_width(),
        version = model.version(),
        "assets loaded"
    );

    Ok(EngineAssets::new(graph, model))
}

#![allow(dead_code)]

use mulehunter_core::assets::{AssetStore, EngineAssets};
use mulehunter_core::config::EngineConfig;
use mulehunter_core::engine::FraudEngine;
use mulehunter_core::graph::{BaseGraph, Edge, NodeProfile};
use mulehunter_core::identity::IdentityIndex;
use mulehunter_core::model::SageModel;
use mulehunter_core::persistence::{LayerWeights, ModelWeights};
use ndarray::Array2;
use std::sync::Arc;

pub const HIDDEN: usize = 4;

pub fn profile(out_degree: u32) -> NodeProfile {
    NodeProfile {
        account_age_days: 120.0,
        balance: 5000.0,
        in_out_ratio: 0.8,
        pagerank: 0.3,
        tx_velocity: 4.0,
        out_degree,
        risk_ratio: 0.42,
    }
}

/// Base graph with arbitrary identifiers and edges; every node gets the
/// same default feature row and a profile whose out_degree matches its
/// actual outgoing edge count.
pub fn graph_with(ids: &[&str], edge_pairs: &[(u32, u32)]) -> BaseGraph {
    let n = ids.len();
    let mut rows = Vec::with_capacity(n * 5);
    for _ in 0..n {
        rows.extend_from_slice(&[100.0, 0.0, 1.0, 0.01, 2.0]);
    }
    let edges: Vec<Edge> = edge_pairs
        .iter()
        .map(|&(source, target)| Edge {
            source,
            target,
            amount: 10.0,
        })
        .collect();
    let profiles = (0..n)
        .map(|idx| profile(edges.iter().filter(|e| e.source as usize == idx).count() as u32))
        .collect();

    BaseGraph {
        features: Array2::from_shape_vec((n, 5), rows).unwrap(),
        edges,
        identity: IdentityIndex::from_identifiers(ids.iter().map(|s| s.to_string()).collect())
            .unwrap(),
        profiles,
    }
}

/// The two-node graph from the scoring scenario: accounts A and B with one
/// transaction A -> B.
pub fn base_graph() -> BaseGraph {
    graph_with(&["A", "B"], &[(0, 1)])
}

fn zero_layer(in_dim: usize, out_dim: usize) -> LayerWeights {
    LayerWeights {
        in_dim,
        out_dim,
        w_neigh: vec![0.0; in_dim * out_dim],
        w_root: vec![0.0; in_dim * out_dim],
        bias: vec![0.0; out_dim],
    }
}

/// All-zero weights except an output bias on the fraud class, so the
/// resulting probability is a known constant independent of the input.
pub fn weights_with_bias(fraud_bias: f32) -> ModelWeights {
    let mut conv2 = zero_layer(HIDDEN, 2);
    conv2.bias[1] = fraud_bias;
    ModelWeights {
        version: "test-v1".to_string(),
        conv1: zero_layer(5, HIDDEN),
        conv2,
    }
}

/// Deterministic non-trivial weights for exercising the full forward pass.
pub fn dense_weights() -> ModelWeights {
    let fill = |len: usize, scale: f32| -> Vec<f32> {
        (0..len).map(|i| ((i % 7) as f32 - 3.0) * scale).collect()
    };
    ModelWeights {
        version: "test-v1".to_string(),
        conv1: LayerWeights {
            in_dim: 5,
            out_dim: HIDDEN,
            w_neigh: fill(5 * HIDDEN, 0.05),
            w_root: fill(5 * HIDDEN, 0.03),
            bias: fill(HIDDEN, 0.1),
        },
        conv2: LayerWeights {
            in_dim: HIDDEN,
            out_dim: 2,
            w_neigh: fill(HIDDEN * 2, 0.07),
            w_root: fill(HIDDEN * 2, 0.04),
            bias: fill(2, 0.2),
        },
    }
}

/// Engine backed by an in-memory snapshot; nothing touches the filesystem.
pub fn engine_with(graph: BaseGraph, weights: &ModelWeights) -> FraudEngine {
    let store = Arc::new(AssetStore::new(EngineConfig::with_data_dir(
        "/nonexistent/mulehunter",
    )));
    store.install(EngineAssets::new(
        graph,
        SageModel::from_weights(weights).unwrap(),
    ));
    FraudEngine::new(store)
}

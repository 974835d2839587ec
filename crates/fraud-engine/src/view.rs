use crate::features::{self, FEATURE_WIDTH};
use crate::graph::{BaseGraph, Edge};
use ndarray::{aview1, Array2, Axis};

/// Request-scoped extension of the base graph: a fresh copy of the feature
/// matrix with 0-2 appended rows and the edge list with exactly one
/// appended edge. Built per call, dropped with the call, never merged back.
#[derive(Debug)]
pub struct RequestView {
    pub features: Array2<f32>,
    pub edges: Vec<Edge>,
    pub source_index: usize,
    pub target_index: usize,
    /// Whether the source resolved to a persisted row.
    pub source_known: bool,
}

/// Extend `base` with the transaction `source -> target` without touching
/// the shared snapshot.
///
/// Unresolved identifiers each get a cold-start row appended at `N + k`;
/// the same unseen identifier on both ends resolves to one appended row, so
/// distinct unknown accounts are never aliased onto a real node. A known
/// source has its copied row overwritten with a feature vector derived from
/// the live transaction, correcting the stale persisted profile. Self-loops
/// are accepted as-is: self-dealing is a fraud signal, not an input error.
pub fn extend(base: &BaseGraph, source_id: &str, target_id: &str, amount: f64) -> RequestView {
    let n = base.num_nodes();
    let mut appended: Vec<[f32; FEATURE_WIDTH]> = Vec::with_capacity(2);

    let known_source = base.identity.lookup(source_id);
    let source_index = match known_source {
        Some(idx) => idx as usize,
        None => {
            appended.push(features::build(None, amount));
            n
        }
    };

    let target_index = match base.identity.lookup(target_id) {
        Some(idx) => idx as usize,
        // Same unseen identifier on both ends shares the appended row.
        None if target_id == source_id => source_index,
        None => {
            appended.push(features::build(None, amount));
            n + appended.len() - 1
        }
    };

    let mut matrix = if appended.is_empty() {
        base.features.clone()
    } else {
        let flat: Vec<f32> = appended.iter().flatten().copied().collect();
        let extra = Array2::from_shape_vec((appended.len(), FEATURE_WIDTH), flat)
            .expect("appended rows match feature width");
        ndarray::concatenate(Axis(0), &[base.features.view(), extra.view()])
            .expect("base matrix matches feature width")
    };

    if let Some(idx) = known_source {
        let fresh = features::build(Some(&base.profiles[idx as usize]), amount);
        matrix.row_mut(idx as usize).assign(&aview1(&fresh));
    }

    let mut edges = Vec::with_capacity(base.edges.len() + 1);
    edges.extend_from_slice(&base.edges);
    edges.push(Edge {
        source: source_index as u32,
        target: target_index as u32,
        amount: amount as f32,
    });

    RequestView {
        features: matrix,
        edges,
        source_index,
        target_index,
        source_known: known_source.is_some(),
    }
}

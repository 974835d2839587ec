use crate::error::EngineError;
use crate::features::FEATURE_WIDTH;
use crate::graph::Edge;
use crate::persistence::{LayerWeights, ModelWeights};
use ndarray::{Array1, Array2};

/// Number of output classes; index [`FRAUD_CLASS`] is the fraud
/// probability. Fixed by the externally trained weights.
pub const OUT_CLASSES: usize = 2;
pub const FRAUD_CLASS: usize = 1;

/// Capability of producing a class-probability vector for one row of an
/// (extended) feature matrix. The output must be a valid distribution over
/// exactly two classes regardless of implementation.
pub trait ScoringEngine: Send + Sync {
    fn score(
        &self,
        features: &Array2<f32>,
        edges: &[Edge],
        row: usize,
    ) -> Result<[f32; OUT_CLASSES], EngineError>;
}

/// One GraphSAGE convolution: a root transform plus a transform of the
/// mean-aggregated in-neighbor features, with bias on the neighbor path.
struct SageLayer {
    w_neigh: Array2<f32>,
    w_root: Array2<f32>,
    bias: Array1<f32>,
}

impl SageLayer {
    fn from_weights(layer: &LayerWeights, name: &str) -> Result<Self, EngineError> {
        let expect = |len: usize, got: usize, what: &str| {
            if len == got {
                Ok(())
            } else {
                Err(EngineError::ShapeMismatch(format!(
                    "{name}.{what}: expected {len} values, blob holds {got}"
                )))
            }
        };
        expect(layer.out_dim * layer.in_dim, layer.w_neigh.len(), "w_neigh")?;
        expect(layer.out_dim * layer.in_dim, layer.w_root.len(), "w_root")?;
        expect(layer.out_dim, layer.bias.len(), "bias")?;

        let shape = (layer.out_dim, layer.in_dim);
        Ok(Self {
            w_neigh: Array2::from_shape_vec(shape, layer.w_neigh.clone())
                .map_err(|e| EngineError::ShapeMismatch(format!("{name}.w_neigh: {e}")))?,
            w_root: Array2::from_shape_vec(shape, layer.w_root.clone())
                .map_err(|e| EngineError::ShapeMismatch(format!("{name}.w_root: {e}")))?,
            bias: Array1::from_vec(layer.bias.clone()),
        })
    }

    /// x: (n, in_dim) -> (n, out_dim)
    fn forward(&self, x: &Array2<f32>, edges: &[Edge]) -> Array2<f32> {
        let agg = mean_in_neighbors(x, edges);
        let mut out = x.dot(&self.w_root.t()) + agg.dot(&self.w_neigh.t());
        out += &self.bias;
        out
    }
}

/// Mean of source-node features over incoming edges, per target node.
/// Nodes without in-edges aggregate to the zero vector.
fn mean_in_neighbors(x: &Array2<f32>, edges: &[Edge]) -> Array2<f32> {
    let n = x.nrows();
    let mut agg = Array2::<f32>::zeros(x.raw_dim());
    let mut counts = vec![0u32; n];
    for edge in edges {
        let (s, t) = (edge.source as usize, edge.target as usize);
        if s < n && t < n {
            agg.row_mut(t).scaled_add(1.0, &x.row(s));
            counts[t] += 1;
        }
    }
    for (t, &count) in counts.iter().enumerate() {
        if count > 1 {
            agg.row_mut(t).mapv_inplace(|v| v / count as f32);
        }
    }
    agg
}

/// Two-layer mean-aggregating GraphSAGE classifier with externally trained
/// weights: 5 input features, a fixed hidden width, 2 output classes.
pub struct SageModel {
    conv1: SageLayer,
    conv2: SageLayer,
    version: String,
}

impl SageModel {
    /// Validate the weight blob against the feature/class contract and
    /// materialize the layers. Any mismatch here condemns the whole
    /// snapshot, not just one request.
    pub fn from_weights(weights: &ModelWeights) -> Result<Self, EngineError> {
        if weights.conv1.in_dim != FEATURE_WIDTH {
            return Err(EngineError::ShapeMismatch(format!(
                "conv1 expects {} input features, blob declares {}",
                FEATURE_WIDTH, weights.conv1.in_dim
            )));
        }
        if weights.conv2.out_dim != OUT_CLASSES {
            return Err(EngineError::ShapeMismatch(format!(
                "conv2 must emit {} classes, blob declares {}",
                OUT_CLASSES, weights.conv2.out_dim
            )));
        }
        if weights.conv1.out_dim != weights.conv2.in_dim {
            return Err(EngineError::ShapeMismatch(format!(
                "hidden width disagreement: conv1 emits {}, conv2 expects {}",
                weights.conv1.out_dim, weights.conv2.in_dim
            )));
        }
        Ok(Self {
            conv1: SageLayer::from_weights(&weights.conv1, "conv1")?,
            conv2: SageLayer::from_weights(&weights.conv2, "conv2")?,
            version: weights.version.clone(),
        })
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn hidden_width(&self) -> usize {
        self.conv1.bias.len()
    }
}

impl ScoringEngine for SageModel {
    fn score(
        &self,
        features: &Array2<f32>,
        edges: &[Edge],
        row: usize,
    ) -> Result<[f32; OUT_CLASSES], EngineError> {
        if features.ncols() != FEATURE_WIDTH {
            return Err(EngineError::ShapeMismatch(format!(
                "feature matrix is {} wide, model expects {}",
                features.ncols(),
                FEATURE_WIDTH
            )));
        }
        if row >= features.nrows() {
            return Err(EngineError::ShapeMismatch(format!(
                "scored row {} outside {}-row matrix",
                row,
                features.nrows()
            )));
        }

        let mut hidden = self.conv1.forward(features, edges);
        hidden.mapv_inplace(|v| v.max(0.0));
        let logits = self.conv2.forward(&hidden, edges);

        // Softmax over the scored row only; shift by the max for stability.
        let out = logits.row(row);
        let max = out.fold(f32::NEG_INFINITY, |m, &v| m.max(v));
        let exp0 = (out[0] - max).exp();
        let exp1 = (out[1] - max).exp();
        let sum = exp0 + exp1;
        Ok([exp0 / sum, exp1 / sum])
    }
}

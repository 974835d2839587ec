pub mod graph {
    use crate::error::EngineError;
    use crate::identity::IdentityIndex;
    use ndarray::Array2;
    use serde::{Deserialize, Serialize};

    /// Directed payer -> payee link. The amount is carried for explanatory
    /// context only; it never enters the feature matrix directly.
    #[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
    pub struct Edge {
        pub source: u32,
        pub target: u32,
        pub amount: f32,
    }

    /// Per-account profile from the batch feature-engineering job. The
    /// column set is fixed and validated against the node table at load
    /// time rather than carried as a dynamic record.
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct NodeProfile {
        pub account_age_days: f32,
        pub balance: f32,
        pub in_out_ratio: f32,
        pub pagerank: f32,
        pub tx_velocity: f32,
        pub out_degree: u32,
        pub risk_ratio: f32,
    }

    /// Immutable base graph snapshot: N feature rows, the directed edge
    /// list, the identity index and the per-row profiles. Created once per
    /// load and shared read-only across requests; per-request extensions
    /// are private copies built by [`crate::view`].
    #[derive(Debug, Clone)]
    pub struct BaseGraph {
        pub features: Array2<f32>,
        pub edges: Vec<Edge>,
        pub identity: IdentityIndex,
        pub profiles: Vec<NodeProfile>,
    }

    impl BaseGraph {
        pub fn num_nodes(&self) -> usize {
            self.features.nrows()
        }

        pub fn num_edges(&self) -> usize {
            self.edges.len()
        }

        /// Structural invariants: every edge endpoint indexes a real row,
        /// and the matrix, identity index and profile table agree on N.
        pub fn validate(&self) -> Result<(), EngineError> {
            let n = self.num_nodes();
            if self.identity.len() != n {
                return Err(EngineError::AssetCorrupt(format!(
                    "identity index has {} entries for {} feature rows",
                    self.identity.len(),
                    n
                )));
            }
            if self.profiles.len() != n {
                return Err(EngineError::AssetCorrupt(format!(
                    "node table has {} profiles for {} feature rows",
                    self.profiles.len(),
                    n
                )));
            }
            if let Some(edge) = self
                .edges
                .iter()
                .find(|e| e.source as usize >= n || e.target as usize >= n)
            {
                return Err(EngineError::AssetCorrupt(format!(
                    "edge ({} -> {}) references a node outside the {}-row matrix",
                    edge.source, edge.target, n
                )));
            }
            Ok(())
        }
    }
}

pub mod assets;
pub mod config;
pub mod engine;
pub mod error;
pub mod explain;
pub mod features;
pub mod identity;
pub mod model;
pub mod persistence;
pub mod server;
pub mod stdio;
pub mod verdict;
pub mod view;

use crate::assets::AssetStore;
use crate::error::EngineError;
use crate::explain::{self, LINKED_LIMIT};
use crate::model::{ScoringEngine, FRAUD_CLASS};
use crate::verdict::{self, Verdict};
use crate::view;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Incoming transaction to score. The timestamp is informational only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    pub source_id: String,
    pub target_id: String,
    pub amount: f64,
    #[serde(default)]
    pub timestamp: String,
}

/// Risk assessment for the paying account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskReport {
    pub node_id: String,
    pub risk_score: f64,
    pub verdict: Verdict,
    pub out_degree: u32,
    pub risk_ratio: f64,
    pub linked_accounts: Vec<String>,
    pub population_size: String,
    pub model_version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReport {
    pub status: String,
    pub nodes_count: usize,
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Orchestrates one analyze call end to end: identity resolution, private
/// graph extension, scoring, thresholding and neighbor extraction. Holds
/// only an `Arc<AssetStore>`, so handlers clone it freely.
#[derive(Clone)]
pub struct FraudEngine {
    store: Arc<AssetStore>,
}

impl FraudEngine {
    pub fn new(store: Arc<AssetStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<AssetStore> {
        &self.store
    }

    /// Score one transaction. An unknown identifier is never an error here;
    /// only a bad amount or unusable assets fail the call, and neither
    /// outcome touches the shared snapshot.
    pub fn analyze(&self, request: &AnalyzeRequest) -> Result<RiskReport, EngineError> {
        if !(request.amount > 0.0) {
            return Err(EngineError::InvalidAmount(request.amount));
        }
        if !request.timestamp.is_empty()
            && chrono::DateTime::parse_from_rfc3339(&request.timestamp).is_err()
            && chrono::NaiveDate::parse_from_str(&request.timestamp, "%Y-%m-%d").is_err()
        {
            tracing::warn!(timestamp = %request.timestamp, "ignoring unparseable timestamp");
        }

        // Lazy recovery: if the startup load failed, the first request
        // re-attempts it instead of failing the service forever.
        let assets = match self.store.get() {
            Ok(assets) => assets,
            Err(EngineError::NotReady) => self.store.load()?,
            Err(err) => return Err(err),
        };
        let graph = &assets.graph;

        let view = view::extend(graph, &request.source_id, &request.target_id, request.amount);
        let probabilities =
            assets
                .model
                .score(&view.features, &view.edges, view.source_index)?;
        let fraud_probability = probabilities[FRAUD_CLASS];
        let verdict = verdict::classify(fraud_probability);

        let (out_degree, risk_ratio) = match graph.identity.lookup(&request.source_id) {
            Some(idx) => {
                let profile = &graph.profiles[idx as usize];
                (profile.out_degree + 1, profile.risk_ratio as f64)
            }
            // Cold start: the appended edge is the account's whole history.
            None => (1, 1.0),
        };

        let linked_accounts =
            explain::linked_accounts(&view.edges, view.source_index, &graph.identity, LINKED_LIMIT);

        let report = RiskReport {
            node_id: request.source_id.clone(),
            risk_score: round_to(fraud_probability as f64, 4),
            verdict,
            out_degree,
            risk_ratio: round_to(risk_ratio, 2),
            linked_accounts,
            population_size: format!("{} Nodes", graph.identity.len()),
            model_version: assets.model.version().to_string(),
        };
        tracing::info!(
            source = %report.node_id,
            target = %request.target_id,
            score = report.risk_score,
            verdict = %report.verdict,
            "transaction analyzed"
        );
        Ok(report)
    }

    pub fn health(&self) -> HealthReport {
        match self.store.get() {
            Ok(assets) => HealthReport {
                status: "HEALTHY".to_string(),
                nodes_count: assets.graph.identity.len(),
            },
            Err(_) => HealthReport {
                status: "INITIALIZING".to_string(),
                nodes_count: 0,
            },
        }
    }
}

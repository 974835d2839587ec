use crate::engine::{AnalyzeRequest, FraudEngine};
use crate::error::EngineError;
use tonic::{Request, Response, Status};

// Import the generated proto code
pub mod proto {
    tonic::include_proto!("mulehunter");
}

use proto::mule_hunter_server::MuleHunter;
use proto::{AnalyzeResponse, HealthRequest, HealthResponse};

pub struct MuleHunterService {
    engine: FraudEngine,
}

impl MuleHunterService {
    pub fn new(engine: FraudEngine) -> Self {
        Self { engine }
    }
}

fn status_from(err: EngineError) -> Status {
    match err {
        EngineError::InvalidAmount(_) => Status::invalid_argument(err.to_string()),
        EngineError::ShapeMismatch(_) => Status::internal(err.to_string()),
        _ if err.is_unavailable() => Status::unavailable(err.to_string()),
        _ => Status::internal(err.to_string()),
    }
}

#[tonic::async_trait]
impl MuleHunter for MuleHunterService {
    async fn analyze_transaction(
        &self,
        request: Request<proto::AnalyzeRequest>,
    ) -> Result<Response<AnalyzeResponse>, Status> {
        let req = request.into_inner();
        let report = self
            .engine
            .analyze(&AnalyzeRequest {
                source_id: req.source_id,
                target_id: req.target_id,
                amount: req.amount,
                timestamp: req.timestamp,
            })
            .map_err(status_from)?;

        Ok(Response::new(AnalyzeResponse {
            node_id: report.node_id,
            risk_score: report.risk_score,
            verdict: report.verdict.to_string(),
            out_degree: report.out_degree,
            risk_ratio: report.risk_ratio,
            linked_accounts: report.linked_accounts,
            population_size: report.population_size,
            model_version: report.model_version,
        }))
    }

    async fn health_check(
        &self,
        _request: Request<HealthRequest>,
    ) -> Result<Response<HealthResponse>, Status> {
        let health = self.engine.health();
        Ok(Response::new(HealthResponse {
            status: health.status,
            nodes_count: health.nodes_count as u32,
        }))
    }
}

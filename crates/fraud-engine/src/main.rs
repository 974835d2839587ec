use mulehunter_core::assets::AssetStore;
use mulehunter_core::config::EngineConfig;
use mulehunter_core::engine::FraudEngine;
use mulehunter_core::server::{proto::mule_hunter_server::MuleHunterServer, MuleHunterService};
use mulehunter_core::stdio::run_stdio;
use std::env;
use std::sync::Arc;
use tonic::transport::Server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let args: Vec<String> = env::args().collect();
    let is_stdio = args.contains(&"--stdio".to_string());

    let config = EngineConfig::from_env();
    let store = Arc::new(AssetStore::new(config));

    // Preload; a failed load leaves the service in limited mode and the
    // first request re-attempts.
    match store.load() {
        Ok(assets) => {
            tracing::info!(nodes = assets.graph.num_nodes(), "system ready");
        }
        Err(err) => {
            tracing::warn!(error = %err, "initial load failed, starting in limited mode");
        }
    }

    let engine = FraudEngine::new(store);

    if is_stdio {
        println!("🚀 Mule Hunter engine (stdio mode)...");
        run_stdio(engine).await?;
    } else {
        let addr = env::var("BIND_ADDR")
            .unwrap_or_else(|_| "[::1]:50051".to_string())
            .parse()?;
        println!("🚀 Mule Hunter engine listening on {}", addr);

        Server::builder()
            .add_service(MuleHunterServer::new(MuleHunterService::new(engine)))
            .serve(addr)
            .await?;
    }

    Ok(())
}

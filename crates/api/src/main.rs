use std::sync::Arc;

use anyhow::Result;
use api::{build_router, ApiState};
use axum::Router;
use common::{config::AppConfig, logging};
use gh_gateway::{ActivityAggregator, GithubGateway, ReqwestExecutor};
use local_status::FixedStatusSource;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    logging::init_logging("info");
    let config = AppConfig::load()?;

    let exec = Arc::new(ReqwestExecutor::new());
    let gateway = Arc::new(GithubGateway::from_config(exec, &config.github));
    let aggregator = ActivityAggregator::new(gateway.clone());
    let state = Arc::new(ApiState {
        gateway,
        aggregator,
        local: Arc::new(FixedStatusSource),
        local_paths: config.dashboard.local_paths.clone(),
    });
    let app: Router = build_router(state);

    let addr: std::net::SocketAddr = config.api.bind.parse()?;
    info!(authenticated = config.github.token.is_some(), "dashboard api listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

use anyhow::Result;
use solar_data_tool::{api, config::Config, state::AppState, telemetry};
use telemetry::init_tracing;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cfg = Config::load()?;
    let addr = cfg.server.socket_addr()?;

    if cfg.server.host == "0.0.0.0" {
        warn!(
            "binding to 0.0.0.0 - the forwarding service will be reachable from the network"
        );
    }

    info!(
        %addr,
        cors_origin = %cfg.server.cors_origin,
        upstream = %cfg.upstream.base_url,
        "starting solar data forwarding service"
    );

    let app = api::router(AppState::new(cfg)?)?;

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(telemetry::shutdown_signal())
        .await?;

    warn!("shutdown complete");
    Ok(())
}

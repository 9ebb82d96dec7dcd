use anyhow::Result;
use clap::Parser;
use solar_data_tool::{
    client::{ClientApp, ForwardingClient, MapViewConfig, Session, View},
    config::Config,
    telemetry,
};
use std::{process::ExitCode, sync::Arc};

/// Terminal front end: pick a point, edit the system size, print the estimate.
#[derive(Debug, Parser)]
#[command(name = "solar-client", version)]
struct Args {
    /// Latitude of the map click
    #[arg(long, allow_hyphen_values = true)]
    lat: f64,

    /// Longitude of the map click
    #[arg(long, allow_hyphen_values = true)]
    lon: f64,

    /// System size edits in kWp, applied in order after the click
    #[arg(long = "size")]
    sizes: Vec<String>,

    /// Target the production forwarding service
    #[arg(long)]
    production: bool,

    /// Forwarding service base URL, overriding configuration
    #[arg(long)]
    base_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    dotenvy::dotenv().ok();
    telemetry::init_cli_tracing();

    let args = Args::parse();
    let mut cfg = Config::load()?;
    if args.production {
        cfg.client.production = true;
    }

    let fetcher = match &args.base_url {
        Some(url) => ForwardingClient::with_base_url(url, cfg.client.timeout())?,
        None => ForwardingClient::new(&cfg.client)?,
    };
    let session = Session::new(
        MapViewConfig::denmark(),
        cfg.estimate.clone(),
        &cfg.client.default_size,
    );
    let app = ClientApp::new(session, Arc::new(fetcher));

    app.click_map(args.lat, args.lon).await?;
    for size in &args.sizes {
        app.edit_size(size).await;
    }

    let view = app.view();
    print!("{view}");
    if is_failure(&view) {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

fn is_failure(view: &View) -> bool {
    matches!(view, View::Error { .. })
}

#![allow(dead_code)]
use serde_json::{json, Value};
use solar_data_tool::{api, config::Config, state::AppState};
use std::collections::HashMap;
use wiremock::Request;

pub const PVCALC_PATH: &str = "/api/v5_2/PVcalc";

/// Starts the forwarding service on an ephemeral port and returns its base URL.
pub async fn spawn_service(upstream_base: &str, timeout_seconds: u64) -> String {
    let mut cfg = Config::default();
    cfg.upstream.base_url = format!("{upstream_base}{PVCALC_PATH}");
    cfg.upstream.timeout_seconds = timeout_seconds;

    let app = api::router(AppState::new(cfg).unwrap()).unwrap();
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

/// Base URL of a port nothing listens on.
pub fn closed_port_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

pub fn query_of(request: &Request) -> HashMap<String, String> {
    request.url.query_pairs().into_owned().collect()
}

pub fn pvcalc_body(yearly_kwh: f64) -> Value {
    let monthly: Vec<Value> = [
        189.03, 347.8, 772.45, 1056.2, 1232.67, 1203.5, 1199.11, 1022.3, 810.9, 540.2, 249.6,
        151.4,
    ]
    .iter()
    .enumerate()
    .map(|(i, e_m)| json!({ "month": i + 1, "E_m": e_m }))
    .collect();

    json!({
        "inputs": {
            "location": { "latitude": 56.0, "longitude": 10.0 },
            "mounting_system": {
                "fixed": {
                    "slope": { "value": 39, "optimal": true },
                    "azimuth": { "value": 1, "optimal": true }
                }
            }
        },
        "outputs": {
            "monthly": { "fixed": monthly },
            "totals": {
                "fixed": {
                    "E_d": 24.05,
                    "E_m": 731.26,
                    "E_y": yearly_kwh,
                    "l_aoi": -2.83,
                    "l_spec": 1.36,
                    "l_tg": -5.41,
                    "l_total": -19.88
                }
            }
        },
        "meta": {}
    })
}

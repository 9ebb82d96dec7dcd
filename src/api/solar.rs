//! Forwarding endpoint for PVGIS estimates

use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
};
use tracing::info;

use crate::{api::error::ApiError, state::AppState};

/// GET /api/solar-data - Relay the query string to PVGIS `PVcalc`
///
/// Parameters are passed through untouched, in order. A JSON success body is
/// returned byte for byte with status 200.
pub async fn get_solar_data(
    State(st): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<impl IntoResponse, ApiError> {
    info!(?params, upstream = st.upstream.base_url(), "received solar data request");
    let body = st.upstream.forward(&params).await?;
    Ok(([(header::CONTENT_TYPE, "application/json")], body))
}

use axum::extract::{Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use chrono::Utc;

use crate::olac::{OaiRequest, SourceArchive};
use crate::state::AppState;

/// GET /refdb_oai - OAI-PMH endpoint for the bibliography
pub async fn refdb_oai(State(state): State<AppState>, Query(req): Query<OaiRequest>) -> Response {
    let xml = SourceArchive::new(&state.catalog).respond(&req, Utc::now());

    ([(header::CONTENT_TYPE, "text/xml; charset=utf-8")], xml).into_response()
}

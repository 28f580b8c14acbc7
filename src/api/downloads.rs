use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::export::matrix;
use crate::state::AppState;

/// GET /download/matrix.csv - Language × feature value matrix
pub async fn matrix_csv(State(state): State<AppState>) -> Result<Response, (StatusCode, String)> {
    let data = matrix::matrix_csv(&state.catalog).map_err(|e| {
        tracing::error!("Failed to build matrix: {e:#}");
        (StatusCode::INTERNAL_SERVER_ERROR, format!("{e:#}"))
    })?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (header::CONTENT_DISPOSITION, "attachment; filename=\"wals-matrix.csv\""),
        ],
        data,
    )
        .into_response())
}

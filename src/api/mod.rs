pub mod blog;
pub mod downloads;
pub mod features;
pub mod languoids;
pub mod olac;

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};

/// `302 Found` to `location`.
pub(crate) fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_string())]).into_response()
}

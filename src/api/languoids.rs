use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::api::found;
use crate::models::{LanguoidQuery, LanguoidsResponse};
use crate::search::{LanguoidFormatter, ResolveResult, Resolver};
use crate::state::AppState;

/// GET /languoids - Languoid autocomplete.
///
/// `?id=w-eng` redirects to the languoid's page; `?q=text` returns up to
/// `languoid_limit` suggestions from language names, alternative
/// identifiers, genera and families, in that order.
pub async fn languoids(
    State(state): State<AppState>,
    Query(query): Query<LanguoidQuery>,
) -> Result<Response, (StatusCode, String)> {
    let result = Resolver::new(&*state.catalog, &LanguoidFormatter)
        .resolve(&query, state.config.languoid_limit);

    match result {
        Ok(ResolveResult::Redirect(languoid)) => Ok(found(&languoid.resource_path())),
        Ok(ResolveResult::List { results, more }) => Ok(Json(LanguoidsResponse {
            results,
            context: serde_json::Map::new(),
            more,
        })
        .into_response()),
        Err(e) if e.is_not_found() => Err((StatusCode::NOT_FOUND, e.to_string())),
        Err(e) => {
            tracing::error!("Languoid lookup for {query:?} failed: {e}");
            Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
        }
    }
}

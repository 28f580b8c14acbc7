use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::api::found;
use crate::feeds;
use crate::models::BlogFeedQuery;
use crate::state::AppState;

/// GET /blog?path=/feed/ - Proxy a blog feed, converted to Atom
pub async fn blog_feed(
    State(state): State<AppState>,
    Query(params): Query<BlogFeedQuery>,
) -> Result<Response, (StatusCode, String)> {
    let path = params
        .path
        .filter(|p| !p.is_empty())
        .ok_or_else(|| (StatusCode::NOT_FOUND, "Feed path is required".to_string()))?;

    // Only paths on the blog may be proxied
    if has_host(&path) {
        return Err((StatusCode::NOT_FOUND, "Feed path must not name a host".to_string()));
    }

    let url = state.blog.url(&path);
    let feed = feeds::fetch_atom(&state.http_client, &state.config.blog, &url)
        .await
        .map_err(|e| {
            tracing::warn!("Blog feed {url} unavailable: {e}");
            (StatusCode::NOT_FOUND, e.to_string())
        })?;

    Ok(([(header::CONTENT_TYPE, "application/atom+xml")], feed.to_xml()).into_response())
}

fn has_host(path: &str) -> bool {
    path.starts_with("//") || reqwest::Url::parse(path).is_ok()
}

/// POST /datapoint/{fid}/{lid} - Redirect to the blog discussion of a datapoint
pub async fn comment(
    State(state): State<AppState>,
    Path((feature_id, language_id)): Path<(String, String)>,
) -> Result<Response, (StatusCode, String)> {
    let language_id = language_id
        .strip_prefix("wals_code_")
        .unwrap_or(&language_id)
        .to_string();

    if state.catalog.value_set(&feature_id, &language_id).is_none() {
        return Err((
            StatusCode::NOT_FOUND,
            format!("No datapoint {feature_id}-{language_id}"),
        ));
    }

    let url = format!("{}#comment", state.blog.post_url(&feature_id, &language_id));
    Ok(found(&url))
}

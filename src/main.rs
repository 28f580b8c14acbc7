use axum::routing::{get, post};
use axum::Router;
use tracing_subscriber::EnvFilter;

use wals_web::api;
use wals_web::config::Config;
use wals_web::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env();
    tracing::info!("Data directory: {}", config.data_dir.display());
    tracing::info!("Blog host: {}", config.blog.host);

    let state = AppState::new(config.clone())?;

    let app = Router::new()
        .route("/languoids", get(api::languoids::languoids))
        .route("/feature-info/{id}", get(api::features::feature_info))
        .route("/languoid/genealogy", get(api::features::genealogy))
        .route("/blog", get(api::blog::blog_feed))
        .route("/datapoint/{fid}/{lid}", post(api::blog::comment))
        .route("/download/matrix.csv", get(api::downloads::matrix_csv))
        .route("/refdb_oai", get(api::olac::refdb_oai))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}

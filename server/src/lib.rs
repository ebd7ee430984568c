use std::sync::Arc;

use anyhow::Result;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use sift_core::persist::{load_index, IndexPaths};
use sift_core::{Document, Index, SearchError, SearchHit};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

#[derive(Deserialize)]
pub struct SearchParams {
    pub q: String,
    #[serde(default = "default_k")]
    pub k: usize,
}
fn default_k() -> usize {
    10
}

#[derive(Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub took_s: f64,
    pub total_hits: usize,
    pub results: Vec<SearchHit>,
}

#[derive(Clone)]
pub struct AppState {
    /// Built once at startup; read-only afterwards, shared across handlers.
    pub index: Arc<Index>,
}

pub fn build_app(index_dir: &str) -> Result<Router> {
    let (index, meta) = load_index(&IndexPaths::new(index_dir))?;
    tracing::info!(
        num_docs = meta.num_docs,
        created_at = %meta.created_at,
        "index loaded"
    );
    let state = AppState {
        index: Arc::new(index),
    };

    // CORS: read CORS_ALLOW_ORIGIN (comma-separated) or allow Any by default
    let cors = match std::env::var("CORS_ALLOW_ORIGIN") {
        Ok(val) => {
            let origins: Vec<_> = val.split(',').filter_map(|s| s.trim().parse().ok()).collect();
            if origins.is_empty() {
                CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
            } else {
                CorsLayer::new()
                    .allow_origin(AllowOrigin::list(origins))
                    .allow_methods(Any)
                    .allow_headers(Any)
            }
        }
        Err(_) => CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any),
    };

    let app = Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/search", get(search_handler))
        .route("/doc/:id", get(doc_handler))
        .with_state(state)
        .layer(cors);
    Ok(app)
}

pub async fn search_handler(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, (StatusCode, String)> {
    let start = std::time::Instant::now();
    let k = params.k.clamp(1, 100);

    // rank everything so total_hits reflects the full match count, then cut
    let mut results = match state.index.search(&params.q, None) {
        Ok(hits) => hits,
        Err(err @ SearchError::UnterminatedPhrase) => {
            return Err((StatusCode::BAD_REQUEST, err.to_string()))
        }
        Err(err) => return Err((StatusCode::INTERNAL_SERVER_ERROR, err.to_string())),
    };
    let total_hits = results.len();
    results.truncate(k);

    Ok(Json(SearchResponse {
        query: params.q,
        took_s: start.elapsed().as_secs_f64(),
        total_hits,
        results,
    }))
}

pub async fn doc_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Document>, (StatusCode, String)> {
    match state.index.store.get_by_id(&id) {
        Some((_, doc)) => Ok(Json(doc.clone())),
        None => Err((StatusCode::NOT_FOUND, format!("no document {id:?}"))),
    }
}

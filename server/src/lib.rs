use anyhow::Result;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use searchcore::query::QueryEngine;
use searchcore::tokenizer::query_terms;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

#[derive(Deserialize)]
pub struct SearchParams {
    pub q: String,
}

#[derive(Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub took_s: f64,
    pub total_hits: usize,
    pub results: Vec<SearchHit>,
}

#[derive(Serialize)]
pub struct SearchHit {
    pub document: String,
    pub rank: u64,
}

#[derive(Serialize)]
pub struct StatsResponse {
    pub shards: usize,
    pub documents: usize,
    pub words: usize,
}

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<QueryEngine>,
}

/// Load every shard and build the router. Shards are read once at startup;
/// the engine is shared read-only across all requests.
pub fn build_app(shard_dirs: &[PathBuf]) -> Result<Router> {
    let engine = Arc::new(QueryEngine::open(shard_dirs)?);
    let state = AppState { engine };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/search", get(search_handler))
        .route("/stats", get(stats_handler))
        .with_state(state)
        .layer(cors);
    Ok(app)
}

pub async fn search_handler(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> std::result::Result<Json<SearchResponse>, (StatusCode, String)> {
    let start = std::time::Instant::now();
    let words = query_terms(&params.q);
    if words.is_empty() {
        // A query that normalizes to nothing matches nothing.
        return Ok(Json(SearchResponse {
            query: params.q,
            took_s: start.elapsed().as_secs_f64(),
            total_hits: 0,
            results: vec![],
        }));
    }

    let results = state
        .engine
        .process_query(&words)
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    let total_hits = results.len();

    // Engine order is rank-ascending; respond best matches first.
    let results = results
        .into_iter()
        .rev()
        .map(|r| SearchHit {
            document: r.document,
            rank: r.rank,
        })
        .collect();

    Ok(Json(SearchResponse {
        query: params.q,
        took_s: start.elapsed().as_secs_f64(),
        total_hits,
        results,
    }))
}

pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let shards = state.engine.shards();
    Json(StatsResponse {
        shards: shards.len(),
        documents: shards.iter().map(|s| s.num_docs()).sum(),
        words: shards.iter().map(|s| s.num_words()).sum(),
    })
}

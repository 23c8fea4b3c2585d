use std::sync::Arc;
use axum::{routing::post, Router, Json};
use axum::extract::State;
use axum::http::StatusCode;
use tower_http::cors::{CorsLayer, Any};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use crate::catalog::{Lookup, MemoryCatalog};
use crate::clauses::{plan_injection, ListQueryContext, TaxonomyClause};
use crate::options::{assemble, FilterView};
use crate::settings::Settings;
use crate::sync;
use crate::taxonomy::FilterInstanceConfig;
use crate::tree::Block;

pub struct AppState {
    pub settings: Settings,
    pub catalog: MemoryCatalog,
}

#[derive(Deserialize)]
pub struct ClausesRequest {
    pub block: Block,
    #[serde(default)]
    pub query: String,
}

#[derive(Serialize)]
pub struct ClausesResponse {
    pub injected: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list_id: Option<String>,
    pub clauses: Vec<TaxonomyClause>,
}

#[derive(Deserialize)]
pub struct OptionsRequest {
    pub config: FilterInstanceConfig,
    pub query_id: u64,
    #[serde(default)]
    pub query: String,
}

#[derive(Serialize)]
pub struct OptionsResponse {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view: Option<FilterView>,
}

async fn clauses(State(state): State<Arc<AppState>>, Json(req): Json<ClausesRequest>) -> Json<ClausesResponse> {
    let settings = &state.settings;
    match plan_injection(&req.block, &req.query, &settings.list_prefix, &settings.filter_block) {
        Some(injection) => {
            info!(list=%injection.list_id, clauses=injection.clauses.len(), "clauses planned");
            Json(ClausesResponse { injected: true, list_id: Some(injection.list_id), clauses: injection.clauses })
        }
        None => {
            debug!("block does not take filter clauses");
            Json(ClausesResponse { injected: false, list_id: None, clauses: Vec::new() })
        }
    }
}

async fn options(State(state): State<Arc<AppState>>, Json(req): Json<OptionsRequest>) -> (StatusCode, Json<OptionsResponse>) {
    let settings = &state.settings;
    let list_id = sync::list_id(&settings.list_prefix, req.query_id);
    let context = ListQueryContext::from_query(&list_id, &req.query);
    match assemble(&req.config, &settings.list_prefix, &list_id, &state.catalog, &context.request_parameters) {
        Lookup::Ready(view) => {
            info!(list=%list_id, options=view.options.len(), "options assembled");
            (StatusCode::OK, Json(OptionsResponse { status: "ready".into(), view: Some(view) }))
        }
        Lookup::Pending => (StatusCode::ACCEPTED, Json(OptionsResponse { status: "pending".into(), view: None })),
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([axum::http::Method::POST])
        .allow_headers(Any);
    Router::new()
        .route("/v1/clauses", post(clauses))
        .route("/v1/options", post(options))
        .layer(cors)
        .with_state(state)
}

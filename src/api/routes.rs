use axum::{
    routing::{get, post},
    Router,
    extract::{Json, Query, State},
    response::IntoResponse,
};
use tower_http::cors::{CorsLayer, Any};

use crate::error::{Result, AppError};
use crate::api::models::{
    CalculationRequest, CalculationResponse, HealthStatus, PriceQuery, PriceSearchResponse,
    ServiceStatus, MIN_QUERY_CHARS,
};
use crate::calculations;
use crate::scraper::PriceLookup;
use crate::AppState;

pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .route("/api/v1/prices", get(prices_handler))
        .route("/api/v1/prices/", get(prices_handler))
        .route("/api/v1/prices/search", get(price_search_handler))
        .route("/calc/technical", post(calculation_handler))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(app_state)
}

async fn root_handler() -> Json<ServiceStatus> {
    Json(ServiceStatus {
        status: "online",
        service: "BuildCompare Data & AI Agent",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn health_handler() -> Json<HealthStatus> {
    Json(HealthStatus { status: "healthy" })
}

/// Merged quotes for `query` as a bare JSON array.
async fn prices_handler(
    State(state): State<AppState>,
    Query(params): Query<PriceQuery>,
) -> Result<impl IntoResponse> {
    let query = validate_query(params.query)?;
    let lookup = lookup_prices(&state, &query).await;
    Ok(Json(lookup.quotes.to_vec()))
}

/// Same lookup as [`prices_handler`], wrapped with the query, count and
/// whether the cache answered.
async fn price_search_handler(
    State(state): State<AppState>,
    Query(params): Query<PriceQuery>,
) -> Result<impl IntoResponse> {
    let query = validate_query(params.query)?;
    let lookup = lookup_prices(&state, &query).await;

    Ok(Json(PriceSearchResponse {
        count: lookup.quotes.len(),
        results: lookup.quotes.to_vec(),
        cached: lookup.cached,
        query,
    }))
}

async fn calculation_handler(Json(req): Json<CalculationRequest>) -> Result<Json<CalculationResponse>> {
    let results = calculations::estimate(req.calc_type, req.area, &req.variable)?;
    Ok(Json(CalculationResponse {
        calc_type: req.calc_type,
        input_area: req.area,
        results,
    }))
}

async fn lookup_prices(state: &AppState, query: &str) -> PriceLookup {
    tracing::info!(query, "processing price request");
    let start_time = std::time::Instant::now();

    let lookup = state.scraper.get_prices(query).await;

    tracing::info!(
        query,
        count = lookup.quotes.len(),
        cached = lookup.cached,
        elapsed = ?start_time.elapsed(),
        "price request completed"
    );
    lookup
}

fn validate_query(query: Option<String>) -> Result<String> {
    match query {
        Some(query) if query.chars().count() >= MIN_QUERY_CHARS => Ok(query),
        Some(_) => Err(AppError::Validation(format!(
            "Query must be at least {} characters",
            MIN_QUERY_CHARS
        ))),
        None => Err(AppError::Validation("Query string is required".to_string())),
    }
}

use axum::{
  Router, middleware,
  routing::{get, post},
};
use libnamepicker::prelude::*;
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::api::config::Config;

pub mod config;
pub mod dto;
pub mod errors;

pub mod handlers;
mod middlewares;

#[derive(Clone)]
pub struct AppState<S: Store, C: CandidateSource, G: Suggester> {
  pub config: Config,
  pub prometheus: Option<PrometheusHandle>,
  pub picker: Picker<S, C, G>,
}

pub fn router<S: Store, C: CandidateSource, G: Suggester>(state: AppState<S, C, G>) -> Router {
  Router::new()
    .route("/api/health", get(handlers::health))
    .route("/api/names", get(handlers::list_names).post(handlers::submit_name))
    .route("/api/votes", get(handlers::list_votes))
    .route("/api/vote", post(handlers::vote))
    .route("/api/matches", get(handlers::list_matches))
    .route("/api/seed", post(handlers::seed))
    .route("/api/ai/alternatives", post(handlers::alternatives))
    .route("/api/ai/similar-vibes", post(handlers::similar_vibes))
    .fallback(handlers::not_found)
    .layer(TimeoutLayer::new(state.config.request_timeout))
    .layer(middleware::from_fn(middlewares::metrics))
    .layer(TraceLayer::new_for_http().make_span_with(middlewares::create_request_span))
    // The routes below will not go through the observability middlewares above
    .route("/healthz", get(handlers::healthz))
    .route("/readyz", get(handlers::readyz))
    .route("/metrics", get(handlers::prometheus))
    .layer(middleware::from_fn(middlewares::logging::api_logger))
    .layer(middleware::from_fn(middlewares::request_id))
    .with_state(state)
}

use std::sync::Arc;

use crate::{
    config::Config,
    main_lib::AppState,
    models::{
        ChartSegment, NewProposalPayload, Proposal, ProposalSummary, ProposalTotals,
        ProposalUpdatePayload,
    },
};
use axum::{http::HeaderValue, routing::get, Json, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use utoipa::OpenApi;

pub mod health;
pub mod proposals;

#[derive(OpenApi)]
#[openapi(
    paths(
        health::healthz,
        health::readyz,
        proposals::list_proposals,
        proposals::get_summary,
        proposals::get_proposal,
        proposals::create_proposal,
        proposals::update_proposal,
        proposals::delete_proposal,
    ),
    components(schemas(
        Proposal,
        NewProposalPayload,
        ProposalUpdatePayload,
        ProposalSummary,
        ProposalTotals,
        ChartSegment
    )),
    tags((name = "commissions"))
)]
pub struct ApiDoc;

fn cors_layer(config: &Config) -> CorsLayer {
    if config.cors_allow.iter().any(|o| o == "*") {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }
    let origins = config
        .cors_allow
        .iter()
        .filter_map(|o| match o.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", o);
                None
            }
        })
        .collect::<Vec<_>>();
    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}

pub fn app_router(state: Arc<AppState>, config: &Config) -> Router {
    let openapi = ApiDoc::openapi();

    let api = Router::new()
        .merge(health::router())
        .merge(proposals::router());

    Router::new()
        .nest("/api", api)
        .route("/openapi.json", get(|| async { Json(openapi) }))
        .with_state(state)
        .layer(cors_layer(config))
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TimeoutLayer::new(config.request_timeout))
        .layer(TraceLayer::new_for_http())
}

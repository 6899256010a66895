use std::sync::Arc;

use crate::{
    error::ApiResult,
    main_lib::AppState,
    models::{NewProposalPayload, Proposal, ProposalSummary, ProposalUpdatePayload},
};
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    routing::get,
    Json, Router,
};
use commissions_core::errors::Error as CoreError;
use commissions_core::proposals::{NewProposal, ProposalUpdate};

#[utoipa::path(get, path = "/api/proposals", responses((status = 200, body = [Proposal])))]
pub async fn list_proposals(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Proposal>>> {
    let proposals = state.proposal_service.list_proposals()?;
    Ok(Json(proposals.into_iter().map(Proposal::from).collect()))
}

#[utoipa::path(get, path = "/api/proposals/summary", responses((status = 200, body = ProposalSummary)))]
pub async fn get_summary(State(state): State<Arc<AppState>>) -> ApiResult<Json<ProposalSummary>> {
    let summary = state.proposal_service.get_summary()?;
    Ok(Json(summary.into()))
}

#[utoipa::path(
    get,
    path = "/api/proposals/{id}",
    params(("id" = i32, Path, description = "Proposal id")),
    responses((status = 200, body = Proposal), (status = 400), (status = 404))
)]
pub async fn get_proposal(
    id: Result<Path<i32>, PathRejection>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Proposal>> {
    let Path(id) = id?;
    let proposal = state.proposal_service.get_proposal(id)?;
    Ok(Json(proposal.into()))
}

#[utoipa::path(
    post,
    path = "/api/proposals",
    request_body = NewProposalPayload,
    responses((status = 201, body = Proposal), (status = 400))
)]
pub async fn create_proposal(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<NewProposalPayload>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Proposal>)> {
    let Json(payload) = payload?;
    let new_proposal = NewProposal::try_from(payload).map_err(CoreError::from)?;
    let created = state.proposal_service.create_proposal(new_proposal).await?;
    tracing::info!("Created proposal {}", created.id());
    Ok((StatusCode::CREATED, Json(created.into())))
}

#[utoipa::path(
    patch,
    path = "/api/proposals/{id}",
    params(("id" = i32, Path, description = "Proposal id")),
    request_body = ProposalUpdatePayload,
    responses((status = 200, body = Proposal), (status = 400), (status = 404))
)]
pub async fn update_proposal(
    id: Result<Path<i32>, PathRejection>,
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ProposalUpdatePayload>, JsonRejection>,
) -> ApiResult<Json<Proposal>> {
    let Path(id) = id?;
    let Json(payload) = payload?;
    let updated = state
        .proposal_service
        .update_proposal(id, ProposalUpdate::from(payload))
        .await?;
    Ok(Json(updated.into()))
}

#[utoipa::path(
    delete,
    path = "/api/proposals/{id}",
    params(("id" = i32, Path, description = "Proposal id")),
    responses((status = 204), (status = 400), (status = 404))
)]
pub async fn delete_proposal(
    id: Result<Path<i32>, PathRejection>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<StatusCode> {
    let Path(id) = id?;
    state.proposal_service.delete_proposal(id).await?;
    tracing::info!("Deleted proposal {}", id);
    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/proposals", get(list_proposals).post(create_proposal))
        .route("/proposals/summary", get(get_summary))
        .route(
            "/proposals/{id}",
            get(get_proposal)
                .patch(update_proposal)
                .delete(delete_proposal),
        )
}

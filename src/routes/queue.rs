use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, patch},
};
use uuid::Uuid;

use crate::{
    dto::queue::{AdvanceStatusRequest, QueueList},
    error::AppResult,
    middleware::auth::AuthUser,
    models::Order,
    response::ApiResponse,
    services::queue_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_queue))
        .route("/{id}/status", patch(advance_status))
        .route("/{id}/payment", patch(record_payment))
}

#[utoipa::path(
    get,
    path = "/api/queue",
    responses(
        (status = 200, description = "Active pickup queue (staff only)", body = ApiResponse<QueueList>),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Queue"
)]
pub async fn list_queue(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<QueueList>>> {
    let resp = queue_service::list_queue(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/queue/{id}/status",
    params(
        ("id" = Uuid, Path, description = "Order ID")
    ),
    request_body = AdvanceStatusRequest,
    responses(
        (status = 200, description = "Advance order status", body = ApiResponse<Order>),
        (status = 400, description = "Unknown status"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found"),
        (status = 409, description = "Illegal transition"),
    ),
    security(("bearer_auth" = [])),
    tag = "Queue"
)]
pub async fn advance_status(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<AdvanceStatusRequest>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let resp = queue_service::advance_status(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/queue/{id}/payment",
    params(
        ("id" = Uuid, Path, description = "Order ID")
    ),
    responses(
        (status = 200, description = "Record cash collection", body = ApiResponse<Order>),
        (status = 400, description = "Already paid"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Queue"
)]
pub async fn record_payment(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let resp = queue_service::record_payment(&state, &user, id).await?;
    Ok(Json(resp))
}

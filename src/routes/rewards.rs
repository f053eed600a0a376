use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, patch, post},
};
use uuid::Uuid;

use crate::{
    dto::rewards::{CreateRewardRequest, PointsSummary, RewardList, UpdateRewardRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    models::Reward,
    response::ApiResponse,
    services::reward_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_rewards).post(create_reward))
        .route("/points", get(points_summary))
        .route("/{id}", patch(update_reward))
}

#[utoipa::path(
    get,
    path = "/api/rewards",
    responses(
        (status = 200, description = "Redeemable reward catalog", body = ApiResponse<RewardList>)
    ),
    security(("bearer_auth" = [])),
    tag = "Rewards"
)]
pub async fn list_rewards(
    State(state): State<AppState>,
    _user: AuthUser,
) -> AppResult<Json<ApiResponse<RewardList>>> {
    let resp = reward_service::list_rewards(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/rewards/points",
    responses(
        (status = 200, description = "Points balance with loyalty history", body = ApiResponse<PointsSummary>)
    ),
    security(("bearer_auth" = [])),
    tag = "Rewards"
)]
pub async fn points_summary(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<PointsSummary>>> {
    let resp = reward_service::points_summary(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/rewards",
    request_body = CreateRewardRequest,
    responses(
        (status = 201, description = "Create reward", body = ApiResponse<Reward>),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Rewards"
)]
pub async fn create_reward(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateRewardRequest>,
) -> AppResult<Json<ApiResponse<Reward>>> {
    let resp = reward_service::create_reward(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/rewards/{id}",
    params(
        ("id" = Uuid, Path, description = "Reward ID")
    ),
    request_body = UpdateRewardRequest,
    responses(
        (status = 200, description = "Update reward", body = ApiResponse<Reward>),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Rewards"
)]
pub async fn update_reward(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateRewardRequest>,
) -> AppResult<Json<ApiResponse<Reward>>> {
    let resp = reward_service::update_reward(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

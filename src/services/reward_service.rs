use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    domain::rewards::RewardEffect,
    dto::rewards::{CreateRewardRequest, PointsSummary, RewardList, UpdateRewardRequest},
    entity::{
        loyalty_entries::{Column as LoyaltyCol, Entity as LoyaltyEntries, Model as LoyaltyModel},
        rewards::{ActiveModel as RewardActive, Column as RewardCol, Entity as Rewards, Model as RewardModel},
        users::Entity as Users,
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::{LoyaltyEntry, Reward},
    response::{ApiResponse, Meta},
    state::AppState,
};

const CATEGORIES: [&str; 3] = ["drink", "food", "discount"];

pub async fn list_rewards(state: &AppState) -> AppResult<ApiResponse<RewardList>> {
    let items = Rewards::find()
        .filter(RewardCol::Available.eq(true))
        .order_by_asc(RewardCol::PointsCost)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(reward_from_entity)
        .collect();

    Ok(ApiResponse::success(
        "Rewards",
        RewardList { items },
        Some(Meta::empty()),
    ))
}

pub async fn create_reward(
    state: &AppState,
    user: &AuthUser,
    payload: CreateRewardRequest,
) -> AppResult<ApiResponse<Reward>> {
    ensure_admin(user)?;
    if payload.points_cost <= 0 {
        return Err(AppError::BadRequest("points_cost must be positive".into()));
    }
    if !CATEGORIES.contains(&payload.category.as_str()) {
        return Err(AppError::BadRequest(
            "category must be drink, food or discount".into(),
        ));
    }

    // The effect is pinned down here, once; checkout only ever evaluates it.
    let effect = payload
        .effect
        .unwrap_or_else(|| RewardEffect::infer(&payload.category, &payload.name));
    if effect == RewardEffect::Inert {
        tracing::warn!(name = %payload.name, "reward resolves to no effect on order totals");
    }
    let effect_json =
        serde_json::to_value(&effect).map_err(|e| AppError::Internal(anyhow::anyhow!(e)))?;

    let reward = RewardActive {
        id: Set(Uuid::new_v4()),
        name: Set(payload.name),
        description: Set(payload.description),
        points_cost: Set(payload.points_cost),
        category: Set(payload.category),
        effect: Set(effect_json),
        available: Set(true),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "reward_create",
        Some("rewards"),
        Some(serde_json::json!({ "reward_id": reward.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Reward created",
        reward_from_entity(reward),
        Some(Meta::empty()),
    ))
}

pub async fn update_reward(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateRewardRequest,
) -> AppResult<ApiResponse<Reward>> {
    ensure_admin(user)?;

    let existing = Rewards::find_by_id(id).one(&state.orm).await?;
    let existing = match existing {
        Some(r) => r,
        None => return Err(AppError::NotFound),
    };

    let mut active: RewardActive = existing.into();
    if let Some(name) = payload.name {
        active.name = Set(name);
    }
    if let Some(description) = payload.description {
        active.description = Set(Some(description));
    }
    if let Some(points_cost) = payload.points_cost {
        if points_cost <= 0 {
            return Err(AppError::BadRequest("points_cost must be positive".into()));
        }
        active.points_cost = Set(points_cost);
    }
    if let Some(available) = payload.available {
        active.available = Set(available);
    }
    if let Some(effect) = payload.effect {
        let effect_json =
            serde_json::to_value(&effect).map_err(|e| AppError::Internal(anyhow::anyhow!(e)))?;
        active.effect = Set(effect_json);
    }
    let reward = active.update(&state.orm).await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "reward_update",
        Some("rewards"),
        Some(serde_json::json!({ "reward_id": reward.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Reward updated",
        reward_from_entity(reward),
        Some(Meta::empty()),
    ))
}

/// Balance plus ledger for the signed-in customer.
pub async fn points_summary(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<PointsSummary>> {
    let account = Users::find_by_id(user.user_id).one(&state.orm).await?;
    let account = match account {
        Some(a) => a,
        None => return Err(AppError::NotFound),
    };

    let history = LoyaltyEntries::find()
        .filter(LoyaltyCol::UserId.eq(user.user_id))
        .order_by_desc(LoyaltyCol::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(loyalty_from_entity)
        .collect();

    Ok(ApiResponse::success(
        "Points",
        PointsSummary {
            points: account.points,
            history,
        },
        Some(Meta::empty()),
    ))
}

fn reward_from_entity(model: RewardModel) -> Reward {
    Reward {
        id: model.id,
        name: model.name,
        description: model.description,
        points_cost: model.points_cost,
        category: model.category,
        effect: model.effect,
        available: model.available,
        created_at: model.created_at.with_timezone(&Utc),
    }
}

fn loyalty_from_entity(model: LoyaltyModel) -> LoyaltyEntry {
    LoyaltyEntry {
        id: model.id,
        user_id: model.user_id,
        delta: model.delta,
        reason: model.reason,
        order_id: model.order_id,
        reward_id: model.reward_id,
        created_at: model.created_at.with_timezone(&Utc),
    }
}

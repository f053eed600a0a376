use chrono::Utc;
use sea_orm::sea_query::LockType;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
    TransactionTrait,
};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    domain::status::OrderStatus,
    dto::queue::{AdvanceStatusRequest, QueueEntry, QueueList},
    entity::orders::{ActiveModel as OrderActive, Column as OrderCol, Entity as Orders},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_staff},
    models::Order,
    response::{ApiResponse, Meta},
    services::order_service::order_from_entity,
    state::AppState,
};

/// Counter view: everything not yet served, oldest first.
pub async fn list_queue(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<QueueList>> {
    ensure_staff(user)?;

    let orders = Orders::find()
        .filter(OrderCol::Status.ne(OrderStatus::Completed.as_str()))
        .order_by_asc(OrderCol::CreatedAt)
        .all(&state.orm)
        .await?;

    let items = orders
        .into_iter()
        .enumerate()
        .map(|(idx, order)| QueueEntry {
            order: order_from_entity(order),
            position: idx as i64 + 1,
        })
        .collect();

    Ok(ApiResponse::success(
        "Queue",
        QueueList { items },
        Some(Meta::empty()),
    ))
}

/// Staff-driven lifecycle advancement. The status only ever moves one step
/// forward; completing an order is what shrinks the positions behind it.
pub async fn advance_status(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: AdvanceStatusRequest,
) -> AppResult<ApiResponse<Order>> {
    ensure_staff(user)?;
    let target: OrderStatus = payload.status.parse()?;
    if let Some(minutes) = payload.estimated_minutes {
        if minutes < 0 {
            return Err(AppError::BadRequest("estimated_minutes must not be negative".into()));
        }
    }

    let txn = state.orm.begin().await?;

    let order = Orders::find_by_id(id)
        .lock(LockType::Update)
        .one(&txn)
        .await?;
    let order = match order {
        Some(o) => o,
        None => return Err(AppError::NotFound),
    };

    let current: OrderStatus = order.status.parse()?;
    if !current.can_transition(target) {
        return Err(AppError::Conflict(format!(
            "cannot move order from {current} to {target}"
        )));
    }

    let mut active: OrderActive = order.into();
    active.status = Set(target.as_str().to_string());
    if let Some(minutes) = payload.estimated_minutes {
        active.estimated_minutes = Set(minutes);
    }
    active.updated_at = Set(Utc::now().into());
    let order = active.update(&txn).await?;

    txn.commit().await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "queue_status_advance",
        Some("orders"),
        Some(serde_json::json!({ "order_id": order.id, "status": order.status })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Order status updated",
        order_from_entity(order),
        Some(Meta::empty()),
    ))
}

/// Record that cash was collected at the counter.
pub async fn record_payment(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<Order>> {
    ensure_staff(user)?;

    let txn = state.orm.begin().await?;

    let order = Orders::find_by_id(id)
        .lock(LockType::Update)
        .one(&txn)
        .await?;
    let order = match order {
        Some(o) => o,
        None => return Err(AppError::NotFound),
    };

    if order.payment_status == "paid" {
        return Err(AppError::BadRequest("Order already paid".into()));
    }

    let mut active: OrderActive = order.into();
    active.payment_status = Set("paid".into());
    active.paid_at = Set(Some(Utc::now().into()));
    active.updated_at = Set(Utc::now().into());
    let order = active.update(&txn).await?;

    txn.commit().await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "payment_collected",
        Some("orders"),
        Some(serde_json::json!({ "order_id": order.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Payment recorded",
        order_from_entity(order),
        Some(Meta::empty()),
    ))
}

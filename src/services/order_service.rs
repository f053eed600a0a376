use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::LockType;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseTransaction, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    domain::rewards::{PricedLine, RewardEffect, compute_discount, subtotal, toppings_total},
    domain::status::{OrderStatus, position_display, presentation},
    dto::orders::{CheckoutRequest, OrderList, OrderWithItems},
    dto::queue::ActiveOrderView,
    entity::{
        cart_items::{Column as CartCol, Entity as CartItems},
        item_sizes::{Column as SizeCol, Entity as ItemSizes},
        loyalty_entries::ActiveModel as LoyaltyActive,
        menu_items::{Column as ItemCol, Entity as MenuItems},
        order_items::{ActiveModel as OrderItemActive, Column as OrderItemCol, Entity as OrderItems, Model as OrderItemModel},
        orders::{ActiveModel as OrderActive, Column as OrderCol, Entity as Orders, Model as OrderModel},
        rewards::{Column as RewardCol, Entity as Rewards},
        toppings::{Column as ToppingCol, Entity as Toppings},
        users::{ActiveModel as UserActive, Entity as Users},
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{Order, OrderItem},
    response::{ApiResponse, Meta},
    routes::params::{OrderListQuery, SortOrder},
    services::cart_service::decode_topping_ids,
    services::validation::{require_non_empty, validate_ph_mobile},
    state::AppState,
};

/// Points earned per centavo of the final total: one point per P50.
const CENTAVOS_PER_POINT: i64 = 5000;

// One priced-and-snapshotted cart line, ready for both discount evaluation
// and the immutable order_items insert.
struct CheckoutLine {
    menu_item_id: Uuid,
    priced: PricedLine,
    toppings_snapshot: serde_json::Value,
}

pub async fn checkout(
    state: &AppState,
    user: &AuthUser,
    payload: CheckoutRequest,
) -> AppResult<ApiResponse<OrderWithItems>> {
    if payload.payment_method != "gcash" && payload.payment_method != "cash" {
        return Err(AppError::Validation {
            field: "payment_method".into(),
            message: "payment method must be gcash or cash".into(),
        });
    }
    validate_ph_mobile("customer_phone", &payload.customer_phone)?;
    let payment_reference = match payload.payment_method.as_str() {
        "gcash" => Some(require_non_empty(
            "payment_reference",
            payload.payment_reference.as_deref(),
        )?),
        _ => None,
    };
    let idempotency_key = require_non_empty("idempotency_key", Some(&payload.idempotency_key))?;

    let txn = state.orm.begin().await?;

    // A resubmission after a transient failure must not create a second
    // order: the same key returns whatever the first attempt committed.
    let existing = Orders::find()
        .filter(
            Condition::all()
                .add(OrderCol::UserId.eq(user.user_id))
                .add(OrderCol::IdempotencyKey.eq(idempotency_key.clone())),
        )
        .one(&txn)
        .await?;
    if let Some(order) = existing {
        let items = load_order_items(&txn, order.id).await?;
        txn.commit().await?;
        return Ok(ApiResponse::success(
            "Order already placed",
            OrderWithItems {
                order: order_from_entity(order),
                items,
            },
            Some(Meta::empty()),
        ));
    }

    let lines = price_cart(&txn, user.user_id).await?;
    if lines.is_empty() {
        return Err(AppError::BadRequest("Cart is empty".into()));
    }
    let priced: Vec<PricedLine> = lines.iter().map(|l| l.priced.clone()).collect();

    // lock the user row so concurrent redemptions cannot double-spend points
    let account = Users::find_by_id(user.user_id)
        .lock(LockType::Update)
        .one(&txn)
        .await?;
    let account = match account {
        Some(a) => a,
        None => return Err(AppError::NotFound),
    };

    let mut redeemed_reward = None;
    let discount = match payload.reward_id {
        None => 0,
        Some(reward_id) => {
            let reward = Rewards::find()
                .filter(
                    Condition::all()
                        .add(RewardCol::Id.eq(reward_id))
                        .add(RewardCol::Available.eq(true)),
                )
                .one(&txn)
                .await?;
            let reward = match reward {
                Some(r) => r,
                None => {
                    return Err(AppError::Validation {
                        field: "reward_id".into(),
                        message: "reward is not available".into(),
                    });
                }
            };
            if account.points < reward.points_cost {
                return Err(AppError::Validation {
                    field: "reward_id".into(),
                    message: "not enough points for this reward".into(),
                });
            }
            let effect: RewardEffect = serde_json::from_value(reward.effect.clone())
                .map_err(|e| AppError::Internal(anyhow::anyhow!("bad reward effect: {e}")))?;
            let discount = compute_discount(&effect, &priced);
            redeemed_reward = Some(reward);
            discount
        }
    };

    let order_subtotal = subtotal(&priced);
    let order_toppings = toppings_total(&priced);
    let total_amount = order_subtotal + order_toppings - discount;
    let earned = total_amount / CENTAVOS_PER_POINT;

    let ahead = Orders::find()
        .filter(OrderCol::Status.ne(OrderStatus::Completed.as_str()))
        .count(&txn)
        .await? as i32;
    let estimated_minutes = 5 + 3 * ahead;

    let order_id = Uuid::new_v4();
    let (payment_status, paid_at) = match payload.payment_method.as_str() {
        "gcash" => ("paid", Some(Utc::now().into())),
        _ => ("pending", None),
    };

    let order = OrderActive {
        id: Set(order_id),
        user_id: Set(user.user_id),
        order_number: Set(build_order_number(order_id)),
        status: Set(OrderStatus::Waiting.as_str().to_string()),
        estimated_minutes: Set(estimated_minutes),
        subtotal: Set(order_subtotal),
        toppings_total: Set(order_toppings),
        discount: Set(discount),
        total_amount: Set(total_amount),
        payment_method: Set(payload.payment_method.clone()),
        payment_reference: Set(payment_reference),
        payment_status: Set(payment_status.to_string()),
        paid_at: Set(paid_at),
        reward_id: Set(redeemed_reward.as_ref().map(|r| r.id)),
        idempotency_key: Set(idempotency_key),
        customer_phone: Set(payload.customer_phone.clone()),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&txn)
    .await?;

    let mut order_items: Vec<OrderItem> = Vec::new();
    for line in &lines {
        let line_total = line.priced.unit_price * i64::from(line.priced.quantity)
            + line.priced.toppings_total;
        let item = OrderItemActive {
            id: Set(Uuid::new_v4()),
            order_id: Set(order.id),
            menu_item_id: Set(Some(line.menu_item_id)),
            product_name: Set(line.priced.product_name.clone()),
            category: Set(line.priced.category.clone()),
            size_name: Set(line.priced.size_name.clone()),
            quantity: Set(line.priced.quantity),
            unit_price: Set(line.priced.unit_price),
            toppings: Set(line.toppings_snapshot.clone()),
            toppings_total: Set(line.priced.toppings_total),
            line_total: Set(line_total),
            created_at: NotSet,
        }
        .insert(&txn)
        .await?;
        order_items.push(order_item_from_entity(item));
    }

    // Points movement commits or rolls back with the order itself: an order
    // can never land with a missing deduction, and a failed deduction never
    // leaves a placed order behind.
    let mut points = account.points;
    if let Some(reward) = &redeemed_reward {
        points -= reward.points_cost;
        LoyaltyActive {
            id: Set(Uuid::new_v4()),
            user_id: Set(user.user_id),
            delta: Set(-reward.points_cost),
            reason: Set("redeemed".into()),
            order_id: Set(Some(order.id)),
            reward_id: Set(Some(reward.id)),
            created_at: NotSet,
        }
        .insert(&txn)
        .await?;
    }
    if earned > 0 {
        points += earned;
        LoyaltyActive {
            id: Set(Uuid::new_v4()),
            user_id: Set(user.user_id),
            delta: Set(earned),
            reason: Set("earned".into()),
            order_id: Set(Some(order.id)),
            reward_id: Set(None),
            created_at: NotSet,
        }
        .insert(&txn)
        .await?;
    }
    if points != account.points {
        let mut active: UserActive = account.into();
        active.points = Set(points);
        active.update(&txn).await?;
    }

    CartItems::delete_many()
        .filter(CartCol::UserId.eq(user.user_id))
        .exec(&txn)
        .await?;

    txn.commit().await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "checkout",
        Some("orders"),
        Some(serde_json::json!({
            "order_id": order.id,
            "order_number": order.order_number,
            "total_amount": order.total_amount,
        })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Order placed",
        OrderWithItems {
            order: order_from_entity(order),
            items: order_items,
        },
        Some(Meta::empty()),
    ))
}

pub async fn list_orders(
    state: &AppState,
    user: &AuthUser,
    query: OrderListQuery,
) -> AppResult<ApiResponse<OrderList>> {
    let (page, limit, offset) = query.pagination.normalize();
    let mut condition = Condition::all().add(OrderCol::UserId.eq(user.user_id));
    if let Some(status) = query.status.as_ref().filter(|s| !s.is_empty()) {
        let status: OrderStatus = status.parse()?;
        condition = condition.add(OrderCol::Status.eq(status.as_str()));
    }

    let sort_order = query.sort_order.unwrap_or(SortOrder::Desc);

    let mut finder = Orders::find().filter(condition);
    finder = match sort_order {
        SortOrder::Asc => finder.order_by_asc(OrderCol::CreatedAt),
        SortOrder::Desc => finder.order_by_desc(OrderCol::CreatedAt),
    };

    let total = finder.clone().count(&state.orm).await? as i64;

    let orders = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(order_from_entity)
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success(
        "Ok",
        OrderList { items: orders },
        Some(meta),
    ))
}

pub async fn get_order(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<OrderWithItems>> {
    let order = Orders::find()
        .filter(
            Condition::all()
                .add(OrderCol::UserId.eq(user.user_id))
                .add(OrderCol::Id.eq(id)),
        )
        .one(&state.orm)
        .await?;
    let order = match order {
        Some(o) => o,
        None => return Err(AppError::NotFound),
    };

    let items = OrderItems::find()
        .filter(OrderItemCol::OrderId.eq(order.id))
        .all(&state.orm)
        .await?
        .into_iter()
        .map(order_item_from_entity)
        .collect();

    Ok(ApiResponse::success(
        "OK",
        OrderWithItems {
            order: order_from_entity(order),
            items,
        },
        Some(Meta::empty()),
    ))
}

/// The queue view for the order the customer is tracking: their most recent
/// order, with derived position and the fixed presentation bundle.
pub async fn active_order(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<ActiveOrderView>> {
    let order = Orders::find()
        .filter(OrderCol::UserId.eq(user.user_id))
        .order_by_desc(OrderCol::CreatedAt)
        .one(&state.orm)
        .await?;
    let order = match order {
        Some(o) => o,
        None => return Err(AppError::NotFound),
    };

    let status: OrderStatus = order.status.parse()?;

    // advisory rank; preceding completions shrink it on the next read
    let position = if status.is_terminal() {
        0
    } else {
        1 + Orders::find()
            .filter(
                Condition::all()
                    .add(OrderCol::Status.ne(OrderStatus::Completed.as_str()))
                    .add(OrderCol::CreatedAt.lt(order.created_at)),
            )
            .count(&state.orm)
            .await? as i64
    };

    let items = OrderItems::find()
        .filter(OrderItemCol::OrderId.eq(order.id))
        .all(&state.orm)
        .await?
        .into_iter()
        .map(order_item_from_entity)
        .collect();

    let bundle = presentation(status, order.estimated_minutes);
    let badge = position_display(status, position);

    Ok(ApiResponse::success(
        "OK",
        ActiveOrderView {
            order: order_from_entity(order),
            items,
            position,
            position_display: badge.into(),
            presentation: bundle.into(),
        },
        Some(Meta::empty()),
    ))
}

async fn price_cart(txn: &DatabaseTransaction, user_id: Uuid) -> AppResult<Vec<CheckoutLine>> {
    let rows = CartItems::find()
        .filter(CartCol::UserId.eq(user_id))
        .order_by_asc(CartCol::CreatedAt)
        .lock(LockType::Update)
        .all(txn)
        .await?;

    let mut lines = Vec::new();
    for row in rows {
        if row.quantity <= 0 {
            return Err(AppError::BadRequest("Cart has invalid quantity".into()));
        }

        let item = MenuItems::find()
            .filter(ItemCol::Id.eq(row.menu_item_id))
            .one(txn)
            .await?;
        let item = match item {
            Some(i) => i,
            None => return Err(AppError::BadRequest("menu item no longer exists".into())),
        };
        if !item.available {
            return Err(AppError::BadRequest(format!(
                "{} is not available right now",
                item.name
            )));
        }

        let size = match row.size_id {
            None => None,
            Some(size_id) => {
                let size = ItemSizes::find()
                    .filter(SizeCol::Id.eq(size_id))
                    .one(txn)
                    .await?;
                match size {
                    Some(s) => Some(s),
                    None => return Err(AppError::BadRequest("size no longer exists".into())),
                }
            }
        };

        let topping_ids = decode_topping_ids(&row.topping_ids);
        let toppings = if topping_ids.is_empty() {
            Vec::new()
        } else {
            let found = Toppings::find()
                .filter(ToppingCol::Id.is_in(topping_ids.clone()))
                .all(txn)
                .await?;
            if found.len() != topping_ids.len() {
                return Err(AppError::BadRequest("topping no longer exists".into()));
            }
            found
        };

        let unit_price = size.as_ref().map(|s| s.price).unwrap_or(item.base_price);
        let per_unit_toppings: i64 = toppings.iter().map(|t| t.price).sum();
        let toppings_snapshot: Vec<serde_json::Value> = toppings
            .iter()
            .map(|t| serde_json::json!({ "name": t.name, "price": t.price }))
            .collect();

        lines.push(CheckoutLine {
            menu_item_id: item.id,
            priced: PricedLine {
                product_name: item.name,
                category: item.category,
                size_name: size.map(|s| s.name),
                unit_price,
                quantity: row.quantity,
                toppings_total: per_unit_toppings * i64::from(row.quantity),
            },
            toppings_snapshot: serde_json::Value::Array(toppings_snapshot),
        });
    }

    Ok(lines)
}

async fn load_order_items(txn: &DatabaseTransaction, order_id: Uuid) -> AppResult<Vec<OrderItem>> {
    Ok(OrderItems::find()
        .filter(OrderItemCol::OrderId.eq(order_id))
        .all(txn)
        .await?
        .into_iter()
        .map(order_item_from_entity)
        .collect())
}

pub(crate) fn order_from_entity(model: OrderModel) -> Order {
    Order {
        id: model.id,
        user_id: model.user_id,
        order_number: model.order_number,
        status: model.status,
        estimated_minutes: model.estimated_minutes,
        subtotal: model.subtotal,
        toppings_total: model.toppings_total,
        discount: model.discount,
        total_amount: model.total_amount,
        payment_method: model.payment_method,
        payment_reference: model.payment_reference,
        payment_status: model.payment_status,
        paid_at: model.paid_at.map(|dt| dt.with_timezone(&Utc)),
        reward_id: model.reward_id,
        customer_phone: model.customer_phone,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    }
}

pub(crate) fn order_item_from_entity(model: OrderItemModel) -> OrderItem {
    OrderItem {
        id: model.id,
        order_id: model.order_id,
        product_name: model.product_name,
        category: model.category,
        size_name: model.size_name,
        quantity: model.quantity,
        unit_price: model.unit_price,
        toppings: model.toppings,
        toppings_total: model.toppings_total,
        line_total: model.line_total,
    }
}

fn build_order_number(order_id: Uuid) -> String {
    let date = Utc::now().format("%Y%m%d");
    let suffix = order_id.to_string();
    let short = &suffix[..8];
    format!("KPE-{}-{}", date, short)
}

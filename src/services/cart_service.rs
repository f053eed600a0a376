use std::collections::HashMap;

use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::cart::{AddToCartRequest, CartItemDto, CartList},
    entity::{
        cart_items::{ActiveModel as CartActive, Column as CartCol, Entity as CartItems},
        item_sizes::{Column as SizeCol, Entity as ItemSizes, Model as SizeModel},
        menu_items::{Column as ItemCol, Entity as MenuItems, Model as ItemModel},
        toppings::{Column as ToppingCol, Entity as Toppings, Model as ToppingModel},
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    response::{ApiResponse, Meta},
    services::menu_service::{item_from_entity, size_from_entity, topping_from_entity},
    state::AppState,
};

/// Topping uuids for one cart line, decoded from the json column.
pub(crate) fn decode_topping_ids(value: &serde_json::Value) -> Vec<Uuid> {
    serde_json::from_value(value.clone()).unwrap_or_default()
}

pub async fn list_cart(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<CartList>> {
    let rows = CartItems::find()
        .filter(CartCol::UserId.eq(user.user_id))
        .order_by_desc(CartCol::CreatedAt)
        .all(&state.orm)
        .await?;

    let item_ids: Vec<Uuid> = rows.iter().map(|r| r.menu_item_id).collect();
    let size_ids: Vec<Uuid> = rows.iter().filter_map(|r| r.size_id).collect();
    let topping_ids: Vec<Uuid> = rows
        .iter()
        .flat_map(|r| decode_topping_ids(&r.topping_ids))
        .collect();

    let menu_items = load_menu_items(state, item_ids).await?;
    let sizes = load_sizes(state, size_ids).await?;
    let toppings = load_toppings(state, topping_ids).await?;

    let mut items = Vec::new();
    let mut subtotal = 0_i64;
    let mut toppings_total = 0_i64;

    for row in rows {
        let item = match menu_items.get(&row.menu_item_id) {
            Some(item) => item.clone(),
            // menu item got deleted from under the cart; skip the stale line
            None => continue,
        };
        let size = row.size_id.and_then(|id| sizes.get(&id).cloned());
        let line_toppings: Vec<ToppingModel> = decode_topping_ids(&row.topping_ids)
            .into_iter()
            .filter_map(|id| toppings.get(&id).cloned())
            .collect();

        let unit_price = size.as_ref().map(|s| s.price).unwrap_or(item.base_price);
        let per_unit_toppings: i64 = line_toppings.iter().map(|t| t.price).sum();
        let line_toppings_total = per_unit_toppings * i64::from(row.quantity);
        let line_total = unit_price * i64::from(row.quantity) + line_toppings_total;

        subtotal += unit_price * i64::from(row.quantity);
        toppings_total += line_toppings_total;

        items.push(CartItemDto {
            id: row.id,
            item: item_from_entity(item),
            size: size.map(size_from_entity),
            quantity: row.quantity,
            toppings: line_toppings.into_iter().map(topping_from_entity).collect(),
            line_total,
        });
    }

    Ok(ApiResponse::success(
        "OK",
        CartList {
            items,
            subtotal,
            toppings_total,
        },
        Some(Meta::empty()),
    ))
}

pub async fn add_to_cart(
    state: &AppState,
    user: &AuthUser,
    payload: AddToCartRequest,
) -> AppResult<ApiResponse<serde_json::Value>> {
    if payload.quantity <= 0 {
        return Err(AppError::BadRequest(
            "quantity must be greater than 0".to_string(),
        ));
    }

    let item = MenuItems::find()
        .filter(
            Condition::all()
                .add(ItemCol::Id.eq(payload.menu_item_id))
                .add(ItemCol::Available.eq(true)),
        )
        .one(&state.orm)
        .await?;
    if item.is_none() {
        return Err(AppError::BadRequest("menu item not available".to_string()));
    }

    if let Some(size_id) = payload.size_id {
        let size = ItemSizes::find()
            .filter(
                Condition::all()
                    .add(SizeCol::Id.eq(size_id))
                    .add(SizeCol::MenuItemId.eq(payload.menu_item_id)),
            )
            .one(&state.orm)
            .await?;
        if size.is_none() {
            return Err(AppError::BadRequest("size does not belong to item".to_string()));
        }
    }

    if !payload.topping_ids.is_empty() {
        let found = Toppings::find()
            .filter(
                Condition::all()
                    .add(ToppingCol::Id.is_in(payload.topping_ids.clone()))
                    .add(ToppingCol::Available.eq(true)),
            )
            .all(&state.orm)
            .await?;
        if found.len() != payload.topping_ids.len() {
            return Err(AppError::BadRequest("topping not available".to_string()));
        }
    }

    let topping_ids_json = serde_json::to_value(&payload.topping_ids)
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e)))?;

    // same item + size already in the cart: replace quantity and toppings
    let exist = CartItems::find()
        .filter(
            Condition::all()
                .add(CartCol::UserId.eq(user.user_id))
                .add(CartCol::MenuItemId.eq(payload.menu_item_id))
                .add(match payload.size_id {
                    Some(size_id) => CartCol::SizeId.eq(size_id),
                    None => CartCol::SizeId.is_null(),
                }),
        )
        .one(&state.orm)
        .await?;

    if let Some(existing) = exist {
        let mut active: CartActive = existing.into();
        active.quantity = Set(payload.quantity);
        active.topping_ids = Set(topping_ids_json);
        active.update(&state.orm).await?;
    } else {
        CartActive {
            id: Set(Uuid::new_v4()),
            user_id: Set(user.user_id),
            menu_item_id: Set(payload.menu_item_id),
            size_id: Set(payload.size_id),
            quantity: Set(payload.quantity),
            topping_ids: Set(topping_ids_json),
            created_at: NotSet,
        }
        .insert(&state.orm)
        .await?;
    }

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "cart_update",
        Some("cart_items"),
        Some(serde_json::json!({
            "menu_item_id": payload.menu_item_id,
            "quantity": payload.quantity,
        })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success("OK", serde_json::json!({}), None))
}

pub async fn remove_from_cart(
    state: &AppState,
    user: &AuthUser,
    cart_item_id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let result = CartItems::delete_many()
        .filter(
            Condition::all()
                .add(CartCol::Id.eq(cart_item_id))
                .add(CartCol::UserId.eq(user.user_id)),
        )
        .exec(&state.orm)
        .await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "cart_remove",
        Some("cart_items"),
        Some(serde_json::json!({ "cart_item_id": cart_item_id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Removed from cart",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

async fn load_menu_items(state: &AppState, ids: Vec<Uuid>) -> AppResult<HashMap<Uuid, ItemModel>> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let models = MenuItems::find()
        .filter(ItemCol::Id.is_in(ids))
        .all(&state.orm)
        .await?;
    Ok(models.into_iter().map(|m| (m.id, m)).collect())
}

async fn load_sizes(state: &AppState, ids: Vec<Uuid>) -> AppResult<HashMap<Uuid, SizeModel>> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let models = ItemSizes::find()
        .filter(SizeCol::Id.is_in(ids))
        .all(&state.orm)
        .await?;
    Ok(models.into_iter().map(|m| (m.id, m)).collect())
}

async fn load_toppings(state: &AppState, ids: Vec<Uuid>) -> AppResult<HashMap<Uuid, ToppingModel>> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let models = Toppings::find()
        .filter(ToppingCol::Id.is_in(ids))
        .all(&state.orm)
        .await?;
    Ok(models.into_iter().map(|m| (m.id, m)).collect())
}

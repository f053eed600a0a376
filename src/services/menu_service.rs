use std::collections::HashMap;

use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::menu::{
        CreateMenuItemRequest, CreateToppingRequest, MenuItemWithSizes, MenuList, ToppingList,
        UpdateMenuItemRequest, UpdateToppingRequest,
    },
    entity::{
        item_sizes::{ActiveModel as SizeActive, Column as SizeCol, Entity as ItemSizes, Model as SizeModel},
        menu_items::{ActiveModel as ItemActive, Column as ItemCol, Entity as MenuItems, Model as ItemModel},
        toppings::{ActiveModel as ToppingActive, Column as ToppingCol, Entity as Toppings, Model as ToppingModel},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::{ItemSize, MenuItem, Topping},
    response::{ApiResponse, Meta},
    routes::params::MenuQuery,
    state::AppState,
};

pub async fn list_menu(state: &AppState, query: MenuQuery) -> AppResult<ApiResponse<MenuList>> {
    let (page, limit, offset) = query.pagination.normalize();

    let mut condition = Condition::all();
    if let Some(category) = query.category.as_ref().filter(|c| !c.is_empty()) {
        condition = condition.add(ItemCol::Category.eq(category.clone()));
    }
    if let Some(q) = query.q.as_ref().filter(|q| !q.is_empty()) {
        condition = condition.add(ItemCol::Name.contains(q.as_str()));
    }

    let finder = MenuItems::find()
        .filter(condition)
        .order_by_asc(ItemCol::Category)
        .order_by_asc(ItemCol::Name);

    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?;

    let ids: Vec<Uuid> = items.iter().map(|i| i.id).collect();
    let sizes = if ids.is_empty() {
        Vec::new()
    } else {
        ItemSizes::find()
            .filter(SizeCol::MenuItemId.is_in(ids))
            .order_by_asc(SizeCol::Price)
            .all(&state.orm)
            .await?
    };

    let mut sizes_by_item: HashMap<Uuid, Vec<ItemSize>> = HashMap::new();
    for size in sizes {
        sizes_by_item
            .entry(size.menu_item_id)
            .or_default()
            .push(size_from_entity(size));
    }

    let items = items
        .into_iter()
        .map(|item| MenuItemWithSizes {
            sizes: sizes_by_item.remove(&item.id).unwrap_or_default(),
            item: item_from_entity(item),
        })
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success("Menu", MenuList { items }, Some(meta)))
}

pub async fn get_menu_item(state: &AppState, id: Uuid) -> AppResult<ApiResponse<MenuItemWithSizes>> {
    let item = MenuItems::find_by_id(id).one(&state.orm).await?;
    let item = match item {
        Some(i) => i,
        None => return Err(AppError::NotFound),
    };

    let sizes = ItemSizes::find()
        .filter(SizeCol::MenuItemId.eq(item.id))
        .order_by_asc(SizeCol::Price)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(size_from_entity)
        .collect();

    Ok(ApiResponse::success(
        "OK",
        MenuItemWithSizes {
            item: item_from_entity(item),
            sizes,
        },
        Some(Meta::empty()),
    ))
}

pub async fn create_menu_item(
    state: &AppState,
    user: &AuthUser,
    payload: CreateMenuItemRequest,
) -> AppResult<ApiResponse<MenuItemWithSizes>> {
    ensure_admin(user)?;
    if payload.base_price < 0 {
        return Err(AppError::BadRequest("base_price must not be negative".into()));
    }

    let txn = state.orm.begin().await?;

    let item = ItemActive {
        id: Set(Uuid::new_v4()),
        name: Set(payload.name),
        description: Set(payload.description),
        category: Set(payload.category),
        base_price: Set(payload.base_price),
        available: Set(true),
        created_at: NotSet,
    }
    .insert(&txn)
    .await?;

    let mut sizes = Vec::new();
    for size in payload.sizes {
        let size = SizeActive {
            id: Set(Uuid::new_v4()),
            menu_item_id: Set(item.id),
            name: Set(size.name),
            price: Set(size.price),
        }
        .insert(&txn)
        .await?;
        sizes.push(size_from_entity(size));
    }

    txn.commit().await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "menu_item_create",
        Some("menu_items"),
        Some(serde_json::json!({ "menu_item_id": item.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Menu item created",
        MenuItemWithSizes {
            item: item_from_entity(item),
            sizes,
        },
        Some(Meta::empty()),
    ))
}

pub async fn update_menu_item(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateMenuItemRequest,
) -> AppResult<ApiResponse<MenuItemWithSizes>> {
    ensure_admin(user)?;

    let txn = state.orm.begin().await?;

    let existing = MenuItems::find_by_id(id).one(&txn).await?;
    let existing = match existing {
        Some(i) => i,
        None => return Err(AppError::NotFound),
    };

    let mut active: ItemActive = existing.into();
    if let Some(name) = payload.name {
        active.name = Set(name);
    }
    if let Some(description) = payload.description {
        active.description = Set(Some(description));
    }
    if let Some(category) = payload.category {
        active.category = Set(category);
    }
    if let Some(base_price) = payload.base_price {
        if base_price < 0 {
            return Err(AppError::BadRequest("base_price must not be negative".into()));
        }
        active.base_price = Set(base_price);
    }
    if let Some(available) = payload.available {
        active.available = Set(available);
    }
    let item = active.update(&txn).await?;

    if let Some(new_sizes) = payload.sizes {
        ItemSizes::delete_many()
            .filter(SizeCol::MenuItemId.eq(item.id))
            .exec(&txn)
            .await?;
        for size in new_sizes {
            SizeActive {
                id: Set(Uuid::new_v4()),
                menu_item_id: Set(item.id),
                name: Set(size.name),
                price: Set(size.price),
            }
            .insert(&txn)
            .await?;
        }
    }

    let sizes = ItemSizes::find()
        .filter(SizeCol::MenuItemId.eq(item.id))
        .order_by_asc(SizeCol::Price)
        .all(&txn)
        .await?
        .into_iter()
        .map(size_from_entity)
        .collect();

    txn.commit().await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "menu_item_update",
        Some("menu_items"),
        Some(serde_json::json!({ "menu_item_id": item.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Menu item updated",
        MenuItemWithSizes {
            item: item_from_entity(item),
            sizes,
        },
        Some(Meta::empty()),
    ))
}

pub async fn delete_menu_item(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;

    let result = MenuItems::delete_by_id(id).exec(&state.orm).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "menu_item_delete",
        Some("menu_items"),
        Some(serde_json::json!({ "menu_item_id": id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

pub async fn list_toppings(state: &AppState) -> AppResult<ApiResponse<ToppingList>> {
    let items = Toppings::find()
        .filter(ToppingCol::Available.eq(true))
        .order_by_asc(ToppingCol::Name)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(topping_from_entity)
        .collect();

    Ok(ApiResponse::success(
        "Toppings",
        ToppingList { items },
        Some(Meta::empty()),
    ))
}

pub async fn create_topping(
    state: &AppState,
    user: &AuthUser,
    payload: CreateToppingRequest,
) -> AppResult<ApiResponse<Topping>> {
    ensure_admin(user)?;
    if payload.price < 0 {
        return Err(AppError::BadRequest("price must not be negative".into()));
    }

    let topping = ToppingActive {
        id: Set(Uuid::new_v4()),
        name: Set(payload.name),
        price: Set(payload.price),
        available: Set(true),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "topping_create",
        Some("toppings"),
        Some(serde_json::json!({ "topping_id": topping.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Topping created",
        topping_from_entity(topping),
        Some(Meta::empty()),
    ))
}

pub async fn update_topping(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateToppingRequest,
) -> AppResult<ApiResponse<Topping>> {
    ensure_admin(user)?;

    let existing = Toppings::find_by_id(id).one(&state.orm).await?;
    let existing = match existing {
        Some(t) => t,
        None => return Err(AppError::NotFound),
    };

    let mut active: ToppingActive = existing.into();
    if let Some(name) = payload.name {
        active.name = Set(name);
    }
    if let Some(price) = payload.price {
        if price < 0 {
            return Err(AppError::BadRequest("price must not be negative".into()));
        }
        active.price = Set(price);
    }
    if let Some(available) = payload.available {
        active.available = Set(available);
    }
    let topping = active.update(&state.orm).await?;

    Ok(ApiResponse::success(
        "Topping updated",
        topping_from_entity(topping),
        Some(Meta::empty()),
    ))
}

pub(crate) fn item_from_entity(model: ItemModel) -> MenuItem {
    MenuItem {
        id: model.id,
        name: model.name,
        description: model.description,
        category: model.category,
        base_price: model.base_price,
        available: model.available,
        created_at: model.created_at.with_timezone(&chrono::Utc),
    }
}

pub(crate) fn size_from_entity(model: SizeModel) -> ItemSize {
    ItemSize {
        id: model.id,
        menu_item_id: model.menu_item_id,
        name: model.name,
        price: model.price,
    }
}

pub(crate) fn topping_from_entity(model: ToppingModel) -> Topping {
    Topping {
        id: model.id,
        name: model.name,
        price: model.price,
        available: model.available,
        created_at: model.created_at.with_timezone(&chrono::Utc),
    }
}

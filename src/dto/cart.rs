use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{ItemSize, MenuItem, Topping};

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddToCartRequest {
    pub menu_item_id: Uuid,
    pub size_id: Option<Uuid>,
    pub quantity: i32,
    #[serde(default)]
    pub topping_ids: Vec<Uuid>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartItemDto {
    pub id: Uuid,
    pub item: MenuItem,
    pub size: Option<ItemSize>,
    pub quantity: i32,
    pub toppings: Vec<Topping>,
    pub line_total: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartList {
    pub items: Vec<CartItemDto>,
    pub subtotal: i64,
    pub toppings_total: i64,
}

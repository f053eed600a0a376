use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{ItemSize, MenuItem, Topping};

#[derive(Debug, Deserialize, ToSchema)]
pub struct SizePayload {
    pub name: String,
    pub price: i64,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateMenuItemRequest {
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    pub base_price: i64,
    #[serde(default)]
    pub sizes: Vec<SizePayload>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateMenuItemRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub base_price: Option<i64>,
    pub available: Option<bool>,
    /// When present, replaces the item's size list.
    pub sizes: Option<Vec<SizePayload>>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateToppingRequest {
    pub name: String,
    pub price: i64,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateToppingRequest {
    pub name: Option<String>,
    pub price: Option<i64>,
    pub available: Option<bool>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MenuItemWithSizes {
    #[serde(flatten)]
    pub item: MenuItem,
    pub sizes: Vec<ItemSize>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MenuList {
    pub items: Vec<MenuItemWithSizes>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct ToppingList {
    #[schema(value_type = Vec<Topping>)]
    pub items: Vec<Topping>,
}

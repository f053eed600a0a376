use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Serialize, ToSchema, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub phone: Option<String>,
    pub role: String,
    pub points: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MenuItem {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    pub base_price: i64,
    pub available: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ItemSize {
    pub id: Uuid,
    pub menu_item_id: Uuid,
    pub name: String,
    pub price: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct Topping {
    pub id: Uuid,
    pub name: String,
    pub price: i64,
    pub available: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct Order {
    pub id: Uuid,
    pub user_id: Uuid,
    pub order_number: String,
    pub status: String,
    pub estimated_minutes: i32,
    pub subtotal: i64,
    pub toppings_total: i64,
    pub discount: i64,
    pub total_amount: i64,
    pub payment_method: String,
    pub payment_reference: Option<String>,
    pub payment_status: String,
    pub paid_at: Option<DateTime<Utc>>,
    pub reward_id: Option<Uuid>,
    pub customer_phone: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderItem {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_name: String,
    pub category: String,
    pub size_name: Option<String>,
    pub quantity: i32,
    pub unit_price: i64,
    /// Snapshot of `{name, price}` pairs taken when the order was placed.
    #[schema(value_type = Object)]
    pub toppings: Value,
    pub toppings_total: i64,
    pub line_total: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct Reward {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub points_cost: i64,
    pub category: String,
    /// Tagged effect resolved at catalog-load time.
    #[schema(value_type = Object)]
    pub effect: Value,
    pub available: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoyaltyEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub delta: i64,
    pub reason: String,
    pub order_id: Option<Uuid>,
    pub reward_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

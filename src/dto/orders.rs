use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{Order, OrderItem};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CheckoutRequest {
    /// `gcash` or `cash`.
    pub payment_method: String,
    /// Required for `gcash`: the manually entered reference number.
    pub payment_reference: Option<String>,
    pub customer_phone: String,
    pub reward_id: Option<Uuid>,
    /// Client-generated token; a resubmission with the same key returns the
    /// already-placed order instead of creating a duplicate.
    pub idempotency_key: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderWithItems {
    pub order: Order,
    pub items: Vec<OrderItem>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderList {
    pub items: Vec<Order>,
}

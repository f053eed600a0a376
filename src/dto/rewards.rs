use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::rewards::RewardEffect;
use crate::models::{LoyaltyEntry, Reward};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateRewardRequest {
    pub name: String,
    pub description: Option<String>,
    pub points_cost: i64,
    /// `drink`, `food` or `discount`.
    pub category: String,
    /// Explicit effect; inferred from category/name when omitted.
    #[schema(value_type = Option<Object>)]
    pub effect: Option<RewardEffect>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateRewardRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub points_cost: Option<i64>,
    pub available: Option<bool>,
    #[schema(value_type = Option<Object>)]
    pub effect: Option<RewardEffect>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct RewardList {
    #[schema(value_type = Vec<Reward>)]
    pub items: Vec<Reward>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PointsSummary {
    pub points: i64,
    pub history: Vec<LoyaltyEntry>,
}

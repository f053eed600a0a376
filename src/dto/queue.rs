use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::status::{PositionDisplay, StatusPresentation};
use crate::models::{Order, OrderItem};

#[derive(Debug, Deserialize, ToSchema)]
pub struct AdvanceStatusRequest {
    /// Target status; must be the current status' immediate successor.
    pub status: String,
    /// Optional staff re-estimate, minutes.
    pub estimated_minutes: Option<i32>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StatusBundle {
    pub badge: String,
    pub icon: String,
    pub step: u8,
    pub gradient: Vec<String>,
    pub message: String,
    pub celebrate: bool,
}

impl From<StatusPresentation> for StatusBundle {
    fn from(p: StatusPresentation) -> Self {
        Self {
            badge: p.badge.to_string(),
            icon: p.icon.to_string(),
            step: p.step,
            gradient: p.gradient.iter().map(|s| s.to_string()).collect(),
            message: p.message,
            celebrate: p.celebrate,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PositionBadge {
    pub label: String,
    pub value: String,
}

impl From<PositionDisplay> for PositionBadge {
    fn from(p: PositionDisplay) -> Self {
        Self {
            label: p.label.to_string(),
            value: p.value,
        }
    }
}

/// The customer-facing queue view for the order the client is tracking.
#[derive(Debug, Serialize, ToSchema)]
pub struct ActiveOrderView {
    pub order: Order,
    pub items: Vec<OrderItem>,
    /// Advisory rank among not-yet-completed orders.
    pub position: i64,
    pub position_display: PositionBadge,
    pub presentation: StatusBundle,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct QueueEntry {
    pub order: Order,
    pub position: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct QueueList {
    pub items: Vec<QueueEntry>,
}

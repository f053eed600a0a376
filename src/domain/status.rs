//! Pickup-queue order lifecycle.
//!
//! Orders move `waiting -> preparing -> ready -> completed`, one step at a
//! time, and never backwards. Only staff endpoints mutate the status; the
//! customer-facing queue view just renders whatever the record says.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown order status: {0}")]
pub struct UnknownStatus(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStatus {
    Waiting,
    Preparing,
    Ready,
    Completed,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Waiting => "waiting",
            OrderStatus::Preparing => "preparing",
            OrderStatus::Ready => "ready",
            OrderStatus::Completed => "completed",
        }
    }

    /// The single legal successor, if any.
    pub fn next(&self) -> Option<OrderStatus> {
        match self {
            OrderStatus::Waiting => Some(OrderStatus::Preparing),
            OrderStatus::Preparing => Some(OrderStatus::Ready),
            OrderStatus::Ready => Some(OrderStatus::Completed),
            OrderStatus::Completed => None,
        }
    }

    /// Transitions are one-directional and advance exactly one step.
    pub fn can_transition(&self, to: OrderStatus) -> bool {
        self.next() == Some(to)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Completed)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = UnknownStatus;

    // Anything outside the four states is rejected, never defaulted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "waiting" => Ok(OrderStatus::Waiting),
            "preparing" => Ok(OrderStatus::Preparing),
            "ready" => Ok(OrderStatus::Ready),
            "completed" => Ok(OrderStatus::Completed),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

/// Fixed presentation bundle for one status. The mapping from
/// `(status, estimated_minutes)` is pure and total over the four states;
/// nothing else affects it.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusPresentation {
    pub badge: &'static str,
    pub icon: &'static str,
    pub step: u8,
    pub gradient: [&'static str; 2],
    pub message: String,
    pub celebrate: bool,
}

pub fn presentation(status: OrderStatus, estimated_minutes: i32) -> StatusPresentation {
    match status {
        OrderStatus::Waiting => StatusPresentation {
            badge: "In Queue",
            icon: "hourglass",
            step: 1,
            gradient: ["#fbbf24", "#f59e0b"],
            message: format!("Estimated wait: ~{estimated_minutes} minutes"),
            celebrate: false,
        },
        OrderStatus::Preparing => StatusPresentation {
            badge: "Brewing",
            icon: "coffee",
            step: 2,
            gradient: ["#fb923c", "#ea580c"],
            message: format!("Ready in about: {estimated_minutes} minutes"),
            celebrate: false,
        },
        OrderStatus::Ready => StatusPresentation {
            badge: "Ready",
            icon: "bell",
            step: 3,
            gradient: ["#4ade80", "#16a34a"],
            message: "Please proceed to the counter.".to_string(),
            celebrate: false,
        },
        OrderStatus::Completed => StatusPresentation {
            badge: "Served",
            icon: "check",
            step: 4,
            gradient: ["#2dd4bf", "#0d9488"],
            message: "Thank you for your order!".to_string(),
            celebrate: true,
        },
    }
}

/// Queue position as shown to the customer. The position itself is read
/// verbatim from the record; the only derived logic is the substitution in
/// the terminal state.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionDisplay {
    pub label: &'static str,
    pub value: String,
}

pub fn position_display(status: OrderStatus, position: i64) -> PositionDisplay {
    if status.is_terminal() {
        PositionDisplay {
            label: "Enjoy!",
            value: "\u{2713}".to_string(),
        }
    } else {
        PositionDisplay {
            label: "Your Position",
            value: position.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_all_four_statuses() {
        for (s, expected) in [
            ("waiting", OrderStatus::Waiting),
            ("preparing", OrderStatus::Preparing),
            ("ready", OrderStatus::Ready),
            ("completed", OrderStatus::Completed),
        ] {
            assert_eq!(s.parse::<OrderStatus>().unwrap(), expected);
            assert_eq!(expected.as_str(), s);
        }
    }

    #[test]
    fn rejects_unknown_status() {
        let err = "delivered".parse::<OrderStatus>().unwrap_err();
        assert_eq!(err, UnknownStatus("delivered".into()));
        assert!("".parse::<OrderStatus>().is_err());
        assert!("Waiting".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn transitions_advance_one_step_forward_only() {
        assert!(OrderStatus::Waiting.can_transition(OrderStatus::Preparing));
        assert!(OrderStatus::Preparing.can_transition(OrderStatus::Ready));
        assert!(OrderStatus::Ready.can_transition(OrderStatus::Completed));

        // no regressions, no skips
        assert!(!OrderStatus::Preparing.can_transition(OrderStatus::Waiting));
        assert!(!OrderStatus::Waiting.can_transition(OrderStatus::Ready));
        assert!(!OrderStatus::Completed.can_transition(OrderStatus::Waiting));
        assert_eq!(OrderStatus::Completed.next(), None);
    }

    #[test]
    fn each_status_maps_to_exactly_one_bundle() {
        let bundles: Vec<StatusPresentation> = [
            OrderStatus::Waiting,
            OrderStatus::Preparing,
            OrderStatus::Ready,
            OrderStatus::Completed,
        ]
        .into_iter()
        .map(|s| presentation(s, 7))
        .collect();

        let steps: Vec<u8> = bundles.iter().map(|b| b.step).collect();
        assert_eq!(steps, vec![1, 2, 3, 4]);

        assert_eq!(bundles[0].message, "Estimated wait: ~7 minutes");
        assert_eq!(bundles[1].message, "Ready in about: 7 minutes");
        assert_eq!(bundles[2].message, "Please proceed to the counter.");
        assert_eq!(bundles[3].message, "Thank you for your order!");
        assert!(bundles[3].celebrate);
        assert!(bundles[..3].iter().all(|b| !b.celebrate));
    }

    #[test]
    fn terminal_states_ignore_estimated_time() {
        assert_eq!(
            presentation(OrderStatus::Ready, 3),
            presentation(OrderStatus::Ready, 99)
        );
        assert_eq!(
            presentation(OrderStatus::Completed, 0),
            presentation(OrderStatus::Completed, 42)
        );
    }

    #[test]
    fn position_shows_number_until_completed() {
        let shown = position_display(OrderStatus::Preparing, 3);
        assert_eq!(shown.label, "Your Position");
        assert_eq!(shown.value, "3");

        let done = position_display(OrderStatus::Completed, 3);
        assert_eq!(done.label, "Enjoy!");
        assert_eq!(done.value, "\u{2713}");
    }
}

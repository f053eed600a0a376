//! Reward effects and the checkout discount calculator.
//!
//! A reward's behavior is a tagged [`RewardEffect`], resolved once when the
//! catalog entry is created or seeded. Checkout never re-parses display names;
//! it only evaluates the stored effect against the priced cart lines.

use serde::{Deserialize, Serialize};

/// What redeeming a reward does to the order being placed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RewardEffect {
    /// Percentage off the whole order (subtotal plus toppings).
    PercentOff { percent: u32 },
    /// The first cart line with this size name is free (one unit).
    FreeSizedItem { size: String },
    /// The first cart line in this category, or whose name contains the
    /// hint, is free (one unit).
    FreeCategoryItem {
        category: String,
        name_contains: Option<String>,
    },
    /// No effect on the order total.
    Inert,
}

impl RewardEffect {
    /// Resolve an effect from legacy catalog text. Seed data and admin
    /// payloads without an explicit effect go through here once, at
    /// catalog-load time.
    pub fn infer(category: &str, name: &str) -> RewardEffect {
        match category {
            "discount" => match percent_in_name(name) {
                Some(percent) => RewardEffect::PercentOff { percent },
                None => RewardEffect::Inert,
            },
            "drink" if name.contains("Free Grande") => RewardEffect::FreeSizedItem {
                size: "Grande".to_string(),
            },
            "food" if name.contains("Rice Meal") => RewardEffect::FreeCategoryItem {
                category: "Meals".to_string(),
                name_contains: Some("Rice".to_string()),
            },
            _ => RewardEffect::Inert,
        }
    }
}

// Digits immediately preceding the first '%' in the name, e.g. "10% Off" -> 10.
fn percent_in_name(name: &str) -> Option<u32> {
    let percent_at = name.find('%')?;
    let digits: String = name[..percent_at]
        .chars()
        .rev()
        .take_while(|c| c.is_ascii_digit())
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    digits.parse().ok().filter(|p| *p > 0 && *p <= 100)
}

/// One cart line, priced and snapshotted for discount evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricedLine {
    pub product_name: String,
    pub category: String,
    pub size_name: Option<String>,
    pub unit_price: i64,
    pub quantity: i32,
    /// Topping charge for the whole line.
    pub toppings_total: i64,
}

pub fn subtotal(lines: &[PricedLine]) -> i64 {
    lines
        .iter()
        .map(|l| l.unit_price * i64::from(l.quantity))
        .sum()
}

pub fn toppings_total(lines: &[PricedLine]) -> i64 {
    lines.iter().map(|l| l.toppings_total).sum()
}

/// Monetary discount for the order. Deterministic and side-effect-free;
/// the result is always within `0 ..= subtotal + toppings_total`.
pub fn compute_discount(effect: &RewardEffect, lines: &[PricedLine]) -> i64 {
    let order_value = subtotal(lines) + toppings_total(lines);

    let raw = match effect {
        RewardEffect::PercentOff { percent } => order_value * i64::from(*percent) / 100,
        RewardEffect::FreeSizedItem { size } => lines
            .iter()
            .find(|l| l.size_name.as_deref() == Some(size.as_str()))
            .map(|l| l.unit_price)
            .unwrap_or(0),
        RewardEffect::FreeCategoryItem {
            category,
            name_contains,
        } => lines
            .iter()
            .find(|l| {
                l.category == *category
                    || name_contains
                        .as_deref()
                        .is_some_and(|hint| l.product_name.contains(hint))
            })
            .map(|l| l.unit_price)
            .unwrap_or(0),
        RewardEffect::Inert => 0,
    };

    raw.clamp(0, order_value)
}

/// `subtotal + toppings_total - discount`, never negative.
pub fn total_payable(lines: &[PricedLine], discount: i64) -> i64 {
    (subtotal(lines) + toppings_total(lines) - discount).max(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(name: &str, category: &str, size: Option<&str>, price: i64, qty: i32) -> PricedLine {
        PricedLine {
            product_name: name.to_string(),
            category: category.to_string(),
            size_name: size.map(str::to_string),
            unit_price: price,
            quantity: qty,
            toppings_total: 0,
        }
    }

    #[test]
    fn no_reward_means_no_discount() {
        // subtotal P150, toppings P20 -> discount 0, total P170
        let mut lines = vec![line("Latte", "Drinks", Some("Regular"), 15000, 1)];
        lines[0].toppings_total = 2000;

        let discount = compute_discount(&RewardEffect::Inert, &lines);
        assert_eq!(discount, 0);
        assert_eq!(total_payable(&lines, discount), 17000);
    }

    #[test]
    fn ten_percent_off_order_value() {
        // subtotal P200, no toppings -> discount P20.00, total P180.00
        let lines = vec![line("Americano", "Drinks", Some("Grande"), 20000, 1)];
        let effect = RewardEffect::PercentOff { percent: 10 };

        let discount = compute_discount(&effect, &lines);
        assert_eq!(discount, 2000);
        assert_eq!(total_payable(&lines, discount), 18000);
    }

    #[test]
    fn percent_off_includes_toppings() {
        let mut lines = vec![line("Mocha", "Drinks", None, 10000, 1)];
        lines[0].toppings_total = 5000;
        let effect = RewardEffect::PercentOff { percent: 10 };
        assert_eq!(compute_discount(&effect, &lines), 1500);
    }

    #[test]
    fn free_grande_discounts_only_the_grande_line() {
        // one Grande at P150 plus one Regular at P100 -> discount P150, total P100
        let lines = vec![
            line("Caramel Latte", "Drinks", Some("Grande"), 15000, 1),
            line("Americano", "Drinks", Some("Regular"), 10000, 1),
        ];
        let effect = RewardEffect::FreeSizedItem {
            size: "Grande".into(),
        };

        let discount = compute_discount(&effect, &lines);
        assert_eq!(discount, 15000);
        assert_eq!(total_payable(&lines, discount), 10000);
    }

    #[test]
    fn free_grande_without_grande_line_is_zero() {
        let lines = vec![line("Americano", "Drinks", Some("Regular"), 10000, 2)];
        let effect = RewardEffect::FreeSizedItem {
            size: "Grande".into(),
        };

        let discount = compute_discount(&effect, &lines);
        assert_eq!(discount, 0);
        assert_eq!(total_payable(&lines, discount), 20000);
    }

    #[test]
    fn free_category_item_matches_category_or_name_hint() {
        let effect = RewardEffect::FreeCategoryItem {
            category: "Meals".into(),
            name_contains: Some("Rice".into()),
        };

        let by_category = vec![
            line("Espresso", "Drinks", None, 12000, 1),
            line("Tapa Plate", "Meals", None, 18000, 1),
        ];
        assert_eq!(compute_discount(&effect, &by_category), 18000);

        let by_name = vec![line("Garlic Rice Bowl", "Specials", None, 9000, 1)];
        assert_eq!(compute_discount(&effect, &by_name), 9000);

        let no_match = vec![line("Espresso", "Drinks", None, 12000, 1)];
        assert_eq!(compute_discount(&effect, &no_match), 0);
    }

    #[test]
    fn discount_is_clamped_to_order_value() {
        // a free-item price above the remaining order value can never push
        // the total negative
        let lines = vec![line("Sample Sip", "Drinks", Some("Grande"), 15000, 1)];
        let effect = RewardEffect::PercentOff { percent: 100 };
        let discount = compute_discount(&effect, &lines);
        assert_eq!(discount, 15000);
        assert_eq!(total_payable(&lines, discount), 0);
    }

    #[test]
    fn discount_never_exceeds_bounds_across_combinations() {
        let effects = [
            RewardEffect::Inert,
            RewardEffect::PercentOff { percent: 10 },
            RewardEffect::PercentOff { percent: 100 },
            RewardEffect::FreeSizedItem {
                size: "Grande".into(),
            },
            RewardEffect::FreeCategoryItem {
                category: "Meals".into(),
                name_contains: None,
            },
        ];
        let carts = [
            vec![],
            vec![line("Latte", "Drinks", Some("Grande"), 15000, 2)],
            vec![
                line("Latte", "Drinks", Some("Grande"), 15000, 1),
                line("Rice Meal A", "Meals", None, 20000, 1),
            ],
        ];

        for effect in &effects {
            for cart in &carts {
                let bound = subtotal(cart) + toppings_total(cart);
                let d = compute_discount(effect, cart);
                assert!((0..=bound).contains(&d), "{effect:?} out of bounds");
                assert!(total_payable(cart, d) >= 0);
            }
        }
    }

    #[test]
    fn compute_discount_is_pure() {
        let lines = vec![line("Latte", "Drinks", Some("Grande"), 15000, 1)];
        let effect = RewardEffect::PercentOff { percent: 10 };
        let before = lines.clone();

        let first = compute_discount(&effect, &lines);
        let second = compute_discount(&effect, &lines);
        assert_eq!(first, second);
        assert_eq!(lines, before);
    }

    #[test]
    fn infers_effects_from_legacy_catalog_text() {
        assert_eq!(
            RewardEffect::infer("discount", "10% Off Your Order"),
            RewardEffect::PercentOff { percent: 10 }
        );
        assert_eq!(
            RewardEffect::infer("drink", "Free Grande Drink"),
            RewardEffect::FreeSizedItem {
                size: "Grande".into()
            }
        );
        assert_eq!(
            RewardEffect::infer("food", "Rice Meal Treat"),
            RewardEffect::FreeCategoryItem {
                category: "Meals".into(),
                name_contains: Some("Rice".into()),
            }
        );
        // unmatched catalog entries become explicitly inert
        assert_eq!(
            RewardEffect::infer("drink", "Birthday Frappe"),
            RewardEffect::Inert
        );
        assert_eq!(RewardEffect::infer("discount", "Weekend Off"), RewardEffect::Inert);
    }

    #[test]
    fn effect_round_trips_through_json() {
        let effect = RewardEffect::FreeCategoryItem {
            category: "Meals".into(),
            name_contains: Some("Rice".into()),
        };
        let value = serde_json::to_value(&effect).unwrap();
        assert_eq!(value["kind"], "free_category_item");
        let back: RewardEffect = serde_json::from_value(value).unwrap();
        assert_eq!(back, effect);
    }
}

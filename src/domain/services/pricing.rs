use chrono::NaiveDate;
use std::cmp::max;

use crate::domain::models::pricing::{Adjustment, PricingRule};

/// Runs the adjustment chain for a single day: base price × animal count,
/// then every applicable active rule in descending priority order, clamped
/// to zero at the end.
pub fn calculate_price(
    base_price_cents: i64,
    animal_count: i64,
    date: NaiveDate,
    rules: &[PricingRule],
) -> i64 {
    let mut total = base_price_cents * animal_count;

    let mut ordered: Vec<&PricingRule> = rules.iter().filter(|r| r.active).collect();
    ordered.sort_by(|a, b| b.priority.cmp(&a.priority).then(a.created_at.cmp(&b.created_at)));

    for rule in ordered {
        if !rule.applies(date, animal_count) {
            continue;
        }
        total = match rule.adjustment {
            Adjustment::PercentageDiscount(pct) => total - percent_of(total, pct),
            Adjustment::FixedDiscount(cents) => total - cents,
            Adjustment::Surcharge(cents) => total + cents,
        };
    }

    max(0, total)
}

/// Multi-day stays charge the start-date rate for every day: weekday-gated
/// rules are evaluated once against the start date, never per day, so a
/// customer sees one per-day price across the whole stay.
pub fn price_for_stay(
    base_price_cents: i64,
    animal_count: i64,
    start: NaiveDate,
    end: NaiveDate,
    rules: &[PricingRule],
) -> i64 {
    let days = (end - start).num_days() + 1;
    calculate_price(base_price_cents, animal_count, start, rules) * days
}

// Half-up integer rounding.
fn percent_of(total: i64, pct: i64) -> i64 {
    (total * pct + 50).div_euclid(100)
}

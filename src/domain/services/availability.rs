use chrono::NaiveDate;
use std::cmp::{max, min};
use std::collections::HashMap;

use crate::domain::models::booking::BookingSpan;
use crate::domain::models::capacity::{weekday_index, CapacityOverride, CapacityRule, DayAvailability};

/// Everything the resolver needs, loaded up front: the service's capacity
/// rules, the overrides touching it in the window (own + facility-wide), and
/// the active booking spans for the service and for the whole facility.
pub struct AvailabilityInputs<'a> {
    pub rules: &'a [CapacityRule],
    pub overrides: &'a [CapacityOverride],
    pub service_spans: &'a [BookingSpan],
    pub facility_spans: &'a [BookingSpan],
    pub facility_cap: i64,
}

pub fn resolve_range(
    service_type_id: &str,
    start: NaiveDate,
    end: NaiveDate,
    inputs: &AvailabilityInputs,
) -> Vec<DayAvailability> {
    let service_counts = animals_per_day(inputs.service_spans, start, end);
    let facility_counts = animals_per_day(inputs.facility_spans, start, end);

    let mut days = Vec::new();
    let mut date = start;
    while date <= end {
        let booked = service_counts.get(&date).copied().unwrap_or(0);
        let facility_booked = facility_counts.get(&date).copied().unwrap_or(0);
        days.push(resolve_day(service_type_id, date, inputs, booked, facility_booked));

        let Some(next) = date.succ_opt() else { break };
        date = next;
    }
    days
}

fn resolve_day(
    service_type_id: &str,
    date: NaiveDate,
    inputs: &AvailabilityInputs,
    booked: i64,
    facility_booked: i64,
) -> DayAvailability {
    // Capacity hierarchy: Service Override > Facility Override > Day Rule > Default Rule
    let override_rule = inputs
        .overrides
        .iter()
        .find(|o| o.date == date && o.service_type_id.as_deref() == Some(service_type_id))
        .or_else(|| inputs.overrides.iter().find(|o| o.date == date && o.service_type_id.is_none()));

    let total_capacity = match override_rule {
        Some(o) => match o.max_capacity {
            // Closure: the override blanks the day no matter what rules say.
            None => {
                return DayAvailability {
                    date,
                    available: false,
                    spots_remaining: 0,
                    total_capacity: 0,
                };
            }
            Some(cap) => cap as i64,
        },
        None => rule_capacity(inputs.rules, date),
    };

    let spots = max(0, total_capacity - booked);
    let facility_left = max(0, inputs.facility_cap - facility_booked);
    // Per-service capacity and the facility cap are independent ceilings;
    // both must leave room.
    let effective = min(spots, facility_left);

    DayAvailability {
        date,
        available: effective > 0,
        spots_remaining: effective,
        total_capacity,
    }
}

fn rule_capacity(rules: &[CapacityRule], date: NaiveDate) -> i64 {
    let dow = weekday_index(date);
    rules
        .iter()
        .find(|r| r.day_of_week == Some(dow))
        .or_else(|| rules.iter().find(|r| r.day_of_week.is_none()))
        .map(|r| r.max_capacity as i64)
        // No rule configured means the service is closed by default.
        .unwrap_or(0)
}

/// Expands every span across the days it covers, clipped to the window, so a
/// multi-day booking counts on each day it spans rather than its anchor only.
fn animals_per_day(spans: &[BookingSpan], start: NaiveDate, end: NaiveDate) -> HashMap<NaiveDate, i64> {
    let mut counts = HashMap::new();
    for span in spans {
        let mut day = max(span.span_start, start);
        let last = min(span.span_end, end);
        while day <= last {
            *counts.entry(day).or_insert(0) += span.animal_count;
            let Some(next) = day.succ_opt() else { break };
            day = next;
        }
    }
    counts
}

use std::collections::BTreeMap;

use chrono::Datelike;
use models::{AggregationOptions, MonthlyBucket, OrderRecord};

use crate::orders::{order_amount, resolve_order_date};

/// Series shown by the revenue chart before any order exists.
pub const PLACEHOLDER_MONTHS: [&str; 6] = ["Jan", "Feb", "Mar", "Apr", "May", "Jun"];

pub fn placeholder_series() -> Vec<MonthlyBucket> {
    PLACEHOLDER_MONTHS
        .iter()
        .map(|label| MonthlyBucket {
            month_key: String::new(),
            label: label.to_string(),
            revenue: 0.0,
            orders: 0,
        })
        .collect()
}

/// Monthly revenue for the chart, resolving dates against the current day.
pub fn bucket_by_month(orders: &[OrderRecord]) -> Vec<MonthlyBucket> {
    bucket_by_month_with(orders, &AggregationOptions::default())
}

/// Groups orders by calendar month, oldest first, keeping the most recent
/// `chart_window` months (`0` keeps all of them).
///
/// Built from scratch on every call so edits and deletions upstream can never
/// leave stale totals behind.
pub fn bucket_by_month_with(orders: &[OrderRecord], opts: &AggregationOptions) -> Vec<MonthlyBucket> {
    let mut months: BTreeMap<(i32, u32), MonthlyBucket> = BTreeMap::new();
    for order in orders {
        let Some(day) = resolve_order_date(order, opts).day() else {
            continue;
        };
        let bucket = months
            .entry((day.year(), day.month()))
            .or_insert_with(|| MonthlyBucket {
                month_key: format!("{:04}-{:02}", day.year(), day.month()),
                label: day.format("%b").to_string(),
                revenue: 0.0,
                orders: 0,
            });
        bucket.revenue += order_amount(order);
        bucket.orders += 1;
    }

    if months.is_empty() {
        return placeholder_series();
    }

    let skip = match opts.chart_window {
        0 => 0,
        window => months.len().saturating_sub(window),
    };
    months.into_values().skip(skip).collect()
}

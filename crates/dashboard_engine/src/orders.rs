use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use models::{AggregationOptions, DateFallback, OrderRecord};

/// Where an order lands on the calendar once the date policy is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedDate {
    Parsed(NaiveDate),
    /// No date on the record, or an unparseable one under `DateFallback::Now`.
    Today(NaiveDate),
    /// Unparseable under `DateFallback::Flag`.
    Unparsed,
}

impl ResolvedDate {
    pub fn day(self) -> Option<NaiveDate> {
        match self {
            ResolvedDate::Parsed(d) | ResolvedDate::Today(d) => Some(d),
            ResolvedDate::Unparsed => None,
        }
    }
}

/// Parses date strings in the formats the store has been seen to hold:
/// `YYYY-MM-DD`, `YYYY/MM/DD`, RFC 3339 and naive `YYYY-MM-DDTHH:MM:SS`.
pub fn parse_order_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(s, "%Y/%m/%d"))
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive()))
        .or_else(|| {
            NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|dt| dt.date())
        })
}

/// Same formats as [`parse_order_date`], keeping the time of day. Offsets are
/// normalised to UTC; date-only values fall at midnight.
pub fn parse_order_instant(raw: &str) -> Option<NaiveDateTime> {
    let s = raw.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(s, "%Y/%m/%d"))
        .ok()
        .map(|d| d.and_time(NaiveTime::MIN))
        .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.naive_utc()))
        .or_else(|| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f").ok())
}

pub fn resolve_order_date(order: &OrderRecord, opts: &AggregationOptions) -> ResolvedDate {
    let Some(raw) = order.date.as_deref() else {
        return ResolvedDate::Today(opts.today);
    };
    match parse_order_date(raw) {
        Some(day) => ResolvedDate::Parsed(day),
        None => match opts.date_fallback {
            DateFallback::Now => ResolvedDate::Today(opts.today),
            DateFallback::Flag => ResolvedDate::Unparsed,
        },
    }
}

/// Amount that counts toward revenue; non-finite values count as zero.
#[inline]
pub(crate) fn order_amount(order: &OrderRecord) -> f64 {
    if order.amount.is_finite() {
        order.amount
    } else {
        0.0
    }
}

/// Sum of all order amounts.
pub fn compute_total_revenue(orders: &[OrderRecord]) -> f64 {
    orders.iter().map(order_amount).sum()
}

/// Most recent first, resolving dates against the current day.
pub fn sort_orders_by_date_descending(orders: &[OrderRecord]) -> Vec<OrderRecord> {
    sort_orders_by_date_descending_with(orders, &AggregationOptions::default())
}

fn sort_key(order: &OrderRecord, opts: &AggregationOptions) -> Option<NaiveDateTime> {
    order
        .date
        .as_deref()
        .and_then(parse_order_instant)
        .or_else(|| {
            resolve_order_date(order, opts)
                .day()
                .map(|d| d.and_time(NaiveTime::MIN))
        })
}

/// Compares full timestamps. Stable: orders at the same instant keep their
/// input order. Orders whose date is flagged as unparsed go last.
pub fn sort_orders_by_date_descending_with(
    orders: &[OrderRecord],
    opts: &AggregationOptions,
) -> Vec<OrderRecord> {
    let mut keyed: Vec<(Option<NaiveDateTime>, &OrderRecord)> =
        orders.iter().map(|o| (sort_key(o, opts), o)).collect();
    keyed.sort_by(|a, b| b.0.cmp(&a.0));
    keyed.into_iter().map(|(_, o)| o.clone()).collect()
}

/// Ids of orders whose date cannot be parsed under `DateFallback::Flag`.
pub fn unparsed_order_ids(orders: &[OrderRecord], opts: &AggregationOptions) -> Vec<String> {
    orders
        .iter()
        .filter(|o| resolve_order_date(o, opts) == ResolvedDate::Unparsed)
        .map(|o| o.id.clone())
        .collect()
}

//! Order ledger aggregation for the admin dashboard and cart checkout.
//!
//! Everything except [`loader`] and [`write_dashboard_json`] is pure: given a
//! snapshot of records it returns the same figures every time, never fails,
//! and keeps no state between calls. The one exception is the
//! `metadata.generated_at` stamp that [`summarize`] takes from the clock.

pub mod dashboard;
pub mod error;
pub mod invoice;
pub mod live;
pub mod loader;
pub mod monthly;
pub mod orders;
pub mod projects;

pub use dashboard::{summarize, write_dashboard_json, DashboardInput};
pub use error::{EngineError, Result};
pub use invoice::{calculate_order_total, invoice_for_cart, parse_price};
pub use live::{CollectionSnapshot, LiveDashboard, SnapshotFeed, SnapshotHandler, SubscriptionId};
pub use monthly::{bucket_by_month, bucket_by_month_with, placeholder_series};
pub use orders::{
    compute_total_revenue, parse_order_date, parse_order_instant, resolve_order_date,
    sort_orders_by_date_descending, sort_orders_by_date_descending_with, unparsed_order_ids,
    ResolvedDate,
};
pub use projects::{count_active, count_unclassified, tally_by_status};

use std::fs;
use std::path::Path;

use chrono::Utc;
use models::{AggregationOptions, DashboardMetadata, DashboardSummary, OrderRecord, ProjectRecord};

use crate::error::Result;
use crate::monthly::bucket_by_month_with;
use crate::orders::{compute_total_revenue, sort_orders_by_date_descending_with, unparsed_order_ids};
use crate::projects::{count_active, count_unclassified, tally_by_status};

/// Latest snapshot of every collection the admin overview reads.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardInput {
    pub orders: Vec<OrderRecord>,
    pub projects: Vec<ProjectRecord>,
    pub product_count: usize,
    pub user_count: usize,
}

/// Computes every figure on the admin overview from one set of snapshots.
pub fn summarize(input: &DashboardInput, opts: &AggregationOptions) -> DashboardSummary {
    let status_tally = tally_by_status(&input.projects);
    let unclassified_project_count = count_unclassified(&input.projects);
    if unclassified_project_count > 0 {
        tracing::warn!(
            count = unclassified_project_count,
            "projects with unrecognised status left out of the status tally"
        );
    }

    let unparsed_dates = unparsed_order_ids(&input.orders, opts);
    if !unparsed_dates.is_empty() {
        tracing::warn!(
            count = unparsed_dates.len(),
            "orders with unparseable dates left out of the revenue series"
        );
    }

    let summary = DashboardSummary {
        metadata: DashboardMetadata {
            generated_at: Utc::now().to_rfc3339(),
            currency_symbol: opts.currency_symbol.clone(),
        },
        total_revenue: compute_total_revenue(&input.orders),
        monthly_series: bucket_by_month_with(&input.orders, opts),
        status_series: status_tally.series(),
        status_tally,
        active_project_count: count_active(&input.projects),
        unclassified_project_count,
        total_products: input.product_count,
        total_users: input.user_count,
        sorted_orders: sort_orders_by_date_descending_with(&input.orders, opts),
        unparsed_dates,
    };

    tracing::debug!(
        orders = input.orders.len(),
        projects = input.projects.len(),
        months = summary.monthly_series.len(),
        total_revenue = summary.total_revenue,
        "dashboard recomputed"
    );
    summary
}

/// Writes the summary as JSON, creating parent directories as needed.
pub fn write_dashboard_json(summary: &DashboardSummary, out_path: &Path, pretty: bool) -> Result<()> {
    if let Some(parent) = out_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }
    let json = if pretty {
        serde_json::to_string_pretty(summary)?
    } else {
        serde_json::to_string(summary)?
    };
    fs::write(out_path, json)?;
    Ok(())
}

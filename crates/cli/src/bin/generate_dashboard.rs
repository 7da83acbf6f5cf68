use anyhow::{Context, Result, anyhow};
use chrono::{NaiveDate, Utc};
use clap::Parser;
use dashboard_engine::{
    CollectionSnapshot, LiveDashboard, SnapshotFeed, loader, write_dashboard_json,
};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "generate-dashboard",
    about = "Build the admin dashboard summary from exported collection snapshots."
)]
struct Args {
    /// Orders collection (array of documents or object keyed by id)
    #[arg(long)]
    orders: PathBuf,

    /// Projects collection
    #[arg(long)]
    projects: Option<PathBuf>,

    /// Products collection (only counted)
    #[arg(long)]
    products: Option<PathBuf>,

    /// Users collection (only counted)
    #[arg(long)]
    users: Option<PathBuf>,

    /// Optional settings.json; falls back to ./settings.json, then defaults
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Output file
    #[arg(short, long, default_value = "dashboard/dashboard.json")]
    output: PathBuf,

    /// Reference day for missing or unreadable dates (YYYY-MM-DD), default today
    #[arg(long)]
    today: Option<String>,

    #[arg(long)]
    pretty: bool,
}

fn parse_today(raw: Option<&str>) -> Result<NaiveDate> {
    match raw {
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map_err(|e| anyhow!("invalid --today '{}': {}", s, e)),
        None => Ok(Utc::now().date_naive()),
    }
}

fn main() -> Result<()> {
    logger::init();
    let args = Args::parse();

    let settings = settings_loader::load_settings_with_fallback(args.settings.as_ref())?;
    let today = parse_today(args.today.as_deref())?;

    // Load every collection up front so a bad file fails before anything is published.
    let mut snapshots = vec![CollectionSnapshot::Orders(
        loader::load_orders(&args.orders)
            .with_context(|| format!("Loading orders from {}", args.orders.display()))?,
    )];
    if let Some(path) = &args.projects {
        let projects = loader::load_projects(path)
            .with_context(|| format!("Loading projects from {}", path.display()))?;
        snapshots.push(CollectionSnapshot::Projects(projects));
    }
    if let Some(path) = &args.products {
        let n = loader::load_collection_size(path)
            .with_context(|| format!("Loading products from {}", path.display()))?;
        snapshots.push(CollectionSnapshot::Products(n));
    }
    if let Some(path) = &args.users {
        let n = loader::load_collection_size(path)
            .with_context(|| format!("Loading users from {}", path.display()))?;
        snapshots.push(CollectionSnapshot::Users(n));
    }

    let mut dashboard = LiveDashboard::new(settings.aggregation_options(today));
    {
        let mut feed = SnapshotFeed::new();
        feed.subscribe(&mut dashboard);
        for snapshot in snapshots {
            feed.publish(snapshot);
        }
    }

    let summary = dashboard.latest();
    write_dashboard_json(summary, &args.output, args.pretty)
        .with_context(|| format!("Writing {}", args.output.display()))?;

    tracing::info!(
        output = %args.output.display(),
        total_revenue = summary.total_revenue,
        months = summary.monthly_series.len(),
        revision = dashboard.revision(),
        "dashboard written"
    );
    println!("Done. Generated at {}", summary.metadata.generated_at);
    Ok(())
}

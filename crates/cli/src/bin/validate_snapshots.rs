use anyhow::{Context, Result};
use clap::Parser;
use dashboard_engine::{loader, parse_order_date};
use models::{OrderStatus, ProjectStatus, lenient};
use serde_json::Value;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(
    name = "validate-snapshots",
    about = "Report records the dashboard would silently coerce, drop or misfile."
)]
struct Args {
    /// Orders collection file
    #[arg(long)]
    orders: PathBuf,

    /// Projects collection file
    #[arg(long)]
    projects: Option<PathBuf>,
}

#[derive(Default)]
struct Report {
    warnings: Vec<String>,
}

impl Report {
    fn warn(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }
    fn print(&self, file: &str) {
        for w in &self.warnings {
            println!("[WARN] {}: {}", file, w);
        }
    }
}

fn doc_label(i: usize, doc: &Value) -> String {
    match doc.get("id").and_then(Value::as_str) {
        Some(id) if !id.is_empty() => format!("[{}] '{}'", i, id),
        _ => format!("[{}]", i),
    }
}

fn validate_orders(docs: &[Value]) -> Report {
    let mut rep = Report::default();
    for (i, doc) in docs.iter().enumerate() {
        let label = doc_label(i, doc);

        let amount = doc
            .get("amount")
            .filter(|v| !v.is_null())
            .or_else(|| doc.get("total"));
        match amount {
            None | Some(Value::Null) => rep.warn(format!("order {} has no amount; counted as 0", label)),
            Some(v) if lenient::coerce_number(v).is_none() => rep.warn(format!(
                "order {} amount {} is not numeric; counted as 0",
                label, v
            )),
            Some(_) => {}
        }

        match lenient::coerce_date(doc.get("date")) {
            None => rep.warn(format!("order {} has no date; filed under today", label)),
            Some(raw) if parse_order_date(&raw).is_none() => rep.warn(format!(
                "order {} date '{}' cannot be parsed",
                label, raw
            )),
            Some(_) => {}
        }

        let status = lenient::coerce_text(doc.get("status"));
        if let OrderStatus::Other(s) = OrderStatus::from_label(&status) {
            rep.warn(format!("order {} has unknown status '{}'", label, s));
        }
    }
    rep
}

fn validate_projects(docs: &[Value]) -> Report {
    let mut rep = Report::default();
    for (i, doc) in docs.iter().enumerate() {
        let label = doc_label(i, doc);

        let status = lenient::coerce_text(doc.get("status"));
        if ProjectStatus::classify(&status).is_none() {
            rep.warn(format!(
                "project {} status '{}' is not one of Completed, In Progress, Pending, Delayed; left out of the status chart",
                label, status
            ));
        }

        if let Some(v) = doc.get("progress").filter(|v| !v.is_null()) {
            match lenient::coerce_number(v) {
                None => rep.warn(format!("project {} progress {} is not numeric", label, v)),
                Some(p) if !(0.0..=100.0).contains(&p) => rep.warn(format!(
                    "project {} progress {} outside 0..100; clamped",
                    label, p
                )),
                Some(_) => {}
            }
        }
    }
    rep
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_string()
}

fn main() -> Result<()> {
    logger::init();
    let args = Args::parse();

    let mut warning_count = 0;

    let docs = loader::read_documents(&args.orders)
        .with_context(|| format!("reading {}", args.orders.display()))?;
    let report = validate_orders(&docs);
    report.print(&file_name(&args.orders));
    warning_count += report.warnings.len();

    if let Some(path) = &args.projects {
        let docs = loader::read_documents(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let report = validate_projects(&docs);
        report.print(&file_name(path));
        warning_count += report.warnings.len();
    }

    if warning_count == 0 {
        println!("All snapshot records passed validation.");
    } else {
        println!("{} record(s) need review.", warning_count);
    }
    Ok(())
}

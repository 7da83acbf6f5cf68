use anyhow::{Context, Result};
use clap::Parser;
use dashboard_engine::invoice_for_cart;
use models::CartItem;
use std::{fs, path::PathBuf};

#[derive(Parser, Debug)]
#[command(name = "invoice", about = "Compute subtotal, shipping, tax and total for a cart.")]
struct Args {
    /// Cart JSON: array of {id, name, price, quantity}
    #[arg(short, long)]
    cart: PathBuf,

    /// Optional settings.json with shipping_fee / tax_rate
    #[arg(long)]
    settings: Option<PathBuf>,
}

fn read_cart(path: &PathBuf) -> Result<Vec<CartItem>> {
    let txt = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let items: Vec<CartItem> =
        serde_json::from_str(&txt).with_context(|| format!("parsing {}", path.display()))?;
    Ok(items)
}

fn main() -> Result<()> {
    logger::init();
    let args = Args::parse();

    let settings = settings_loader::load_settings_with_fallback(args.settings.as_ref())?;
    let items = read_cart(&args.cart)?;
    let invoice = invoice_for_cart(&items, &settings.invoice_policy());

    tracing::debug!(items = items.len(), total = invoice.total, "invoice computed");
    println!("{}", serde_json::to_string_pretty(&invoice)?);
    Ok(())
}

use std::sync::LazyLock;

use models::{CartItem, Invoice, InvoicePolicy};
use regex::Regex;

// Currency prefix (₹, Rs, Rs., INR) and grouping separators.
static PRICE_NOISE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*(?:₹|rs\.?|inr)|[,\s]").expect("valid price regex"));
static LEADING_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:\d+\.?\d*|\.\d+)").expect("valid number regex"));

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Reads a display price such as `₹50,000` or `Rs. 1,200.50 / ton`.
/// Only the leading number counts; text without one is worth zero.
pub fn parse_price(raw: &str) -> f64 {
    let cleaned = PRICE_NOISE.replace_all(raw, "");
    LEADING_NUMBER
        .find(&cleaned)
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .filter(|n| n.is_finite())
        .unwrap_or(0.0)
}

/// Sum of price × quantity over the cart.
pub fn calculate_order_total(items: &[CartItem]) -> f64 {
    items
        .iter()
        .map(|item| parse_price(&item.price) * f64::from(item.quantity.max(1)))
        .sum()
}

/// Subtotal, flat shipping, tax on the subtotal, and the amount to pay.
pub fn invoice_for_cart(items: &[CartItem], policy: &InvoicePolicy) -> Invoice {
    let subtotal = calculate_order_total(items);
    let shipping = policy.shipping_fee;
    let tax = subtotal * policy.tax_rate;
    Invoice {
        subtotal: round2(subtotal),
        shipping: round2(shipping),
        tax: round2(tax),
        total: round2(subtotal + shipping + tax),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(price: &str, quantity: u32) -> CartItem {
        CartItem {
            id: String::new(),
            name: String::new(),
            price: price.to_string(),
            quantity,
        }
    }

    #[test]
    fn test_parse_price_display_formats() {
        assert_eq!(parse_price("₹50,000"), 50000.0);
        assert_eq!(parse_price("₹ 1,20,000"), 120000.0);
        assert_eq!(parse_price("Rs. 1,200.50"), 1200.5);
        assert_eq!(parse_price("INR 300"), 300.0);
        assert_eq!(parse_price("750 / ton"), 750.0);
        assert_eq!(parse_price("42"), 42.0);
    }

    #[test]
    fn test_parse_price_without_number_is_zero() {
        assert_eq!(parse_price(""), 0.0);
        assert_eq!(parse_price("Contact for price"), 0.0);
        assert_eq!(parse_price("₹"), 0.0);
        assert_eq!(parse_price("-500"), 0.0);
        assert_eq!(parse_price("₹-1,200"), 0.0);
    }

    #[test]
    fn test_order_total_multiplies_quantity() {
        let cart = vec![item("₹50,000", 2), item("₹30,000", 1), item("n/a", 5)];
        assert_eq!(calculate_order_total(&cart), 130000.0);
    }

    #[test]
    fn test_zero_quantity_counts_once() {
        assert_eq!(calculate_order_total(&[item("₹100", 0)]), 100.0);
    }

    #[test]
    fn test_invoice_for_cart_default_policy() {
        let cart = vec![item("₹50,000", 2)];
        let invoice = invoice_for_cart(&cart, &InvoicePolicy::default());
        assert_eq!(invoice.subtotal, 100000.0);
        assert_eq!(invoice.shipping, 500.0);
        assert_eq!(invoice.tax, 18000.0);
        assert_eq!(invoice.total, 118500.0);
    }

    #[test]
    fn test_invoice_rounds_to_paise() {
        let cart = vec![item("333.33", 1)];
        let policy = InvoicePolicy {
            shipping_fee: 0.0,
            tax_rate: 0.18,
        };
        let invoice = invoice_for_cart(&cart, &policy);
        assert_eq!(invoice.tax, 60.0);
        assert_eq!(invoice.total, 393.33);
    }
}

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{AggregationOptions, DateFallback, InvoicePolicy};

pub(crate) const DEFAULT_CURRENCY_SYMBOL: &str = "₹";
pub(crate) const DEFAULT_CHART_WINDOW: usize = 6;
pub(crate) const DEFAULT_SHIPPING_FEE: f64 = 500.0;
pub(crate) const DEFAULT_TAX_RATE: f64 = 0.18;

/// Contents of `settings.json`. Every key is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
    #[serde(default = "default_chart_window")]
    pub chart_window: usize,
    #[serde(default = "default_shipping_fee")]
    pub shipping_fee: f64,
    #[serde(default = "default_tax_rate")]
    pub tax_rate: f64,
    #[serde(default)]
    pub unparsed_dates: DateFallback,
}

fn default_currency_symbol() -> String {
    DEFAULT_CURRENCY_SYMBOL.to_string()
}
fn default_chart_window() -> usize {
    DEFAULT_CHART_WINDOW
}
fn default_shipping_fee() -> f64 {
    DEFAULT_SHIPPING_FEE
}
fn default_tax_rate() -> f64 {
    DEFAULT_TAX_RATE
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            currency_symbol: default_currency_symbol(),
            chart_window: DEFAULT_CHART_WINDOW,
            shipping_fee: DEFAULT_SHIPPING_FEE,
            tax_rate: DEFAULT_TAX_RATE,
            unparsed_dates: DateFallback::default(),
        }
    }
}

impl Settings {
    pub fn aggregation_options(&self, today: NaiveDate) -> AggregationOptions {
        AggregationOptions {
            today,
            date_fallback: self.unparsed_dates,
            chart_window: self.chart_window,
            currency_symbol: self.currency_symbol.clone(),
        }
    }

    pub fn invoice_policy(&self) -> InvoicePolicy {
        InvoicePolicy {
            shipping_fee: self.shipping_fee,
            tax_rate: self.tax_rate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_settings_fill_defaults() {
        let settings: Settings =
            serde_json::from_str(r#"{"chart_window": 12, "unparsed_dates": "flag"}"#).unwrap();
        assert_eq!(settings.chart_window, 12);
        assert_eq!(settings.unparsed_dates, DateFallback::Flag);
        assert_eq!(settings.currency_symbol, "₹");
        assert_eq!(settings.shipping_fee, 500.0);
        assert_eq!(settings.tax_rate, 0.18);
    }

    #[test]
    fn test_empty_settings_equal_default() {
        let settings: Settings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_aggregation_options_from_settings() {
        let today = NaiveDate::from_ymd_opt(2025, 2, 14).unwrap();
        let settings = Settings {
            unparsed_dates: DateFallback::Flag,
            chart_window: 3,
            ..Settings::default()
        };
        let opts = settings.aggregation_options(today);
        assert_eq!(opts.today, today);
        assert_eq!(opts.chart_window, 3);
        assert_eq!(opts.date_fallback, DateFallback::Flag);
        assert_eq!(settings.invoice_policy(), InvoicePolicy::default());
    }
}

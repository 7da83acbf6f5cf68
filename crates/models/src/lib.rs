use std::fmt;

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

pub mod lenient;
mod settings;

pub use settings::Settings;

// Input records

/// Order lifecycle label as written by the storefront and the seeding scripts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum OrderStatus {
    #[default]
    Pending,
    Processing,
    InProgress,
    Completed,
    Delivered,
    /// Any other label, kept verbatim.
    Other(String),
}

impl OrderStatus {
    /// Case, spaces, underscores and hyphens are ignored; empty means `Pending`.
    pub fn from_label(s: &str) -> Self {
        let key: String = s
            .chars()
            .filter(|c| !matches!(c, ' ' | '_' | '-'))
            .collect::<String>()
            .to_ascii_lowercase();
        match key.as_str() {
            "" | "pending" => OrderStatus::Pending,
            "processing" => OrderStatus::Processing,
            "inprogress" => OrderStatus::InProgress,
            "completed" => OrderStatus::Completed,
            "delivered" => OrderStatus::Delivered,
            _ => OrderStatus::Other(s.trim().to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Processing => "Processing",
            OrderStatus::InProgress => "In Progress",
            OrderStatus::Completed => "Completed",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Other(label) => label,
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for OrderStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for OrderStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(OrderStatus::from_label(&lenient::coerce_text(value.as_ref())))
    }
}

/// Raw order document. Every field is optional because the store is schema-less.
#[derive(Debug, Default, Deserialize)]
struct OrderDocument {
    id: Option<Value>,
    product: Option<Value>,
    client: Option<Value>,
    amount: Option<Value>,
    total: Option<Value>,
    date: Option<Value>,
    status: Option<Value>,
}

/// One order as observed in a collection snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "OrderDocument")]
pub struct OrderRecord {
    pub id: String,
    pub product: String,
    pub client: String,
    /// Currency units. Read from `amount`, falling back to `total`.
    pub amount: f64,
    /// Raw date text; resolved against a reference day at computation time.
    pub date: Option<String>,
    pub status: OrderStatus,
}

impl From<OrderDocument> for OrderRecord {
    fn from(doc: OrderDocument) -> Self {
        let amount_field = match &doc.amount {
            Some(v) if !v.is_null() => Some(v),
            _ => doc.total.as_ref(),
        };
        OrderRecord {
            id: lenient::coerce_text(doc.id.as_ref()),
            product: lenient::coerce_text(doc.product.as_ref()),
            client: lenient::coerce_text(doc.client.as_ref()),
            amount: lenient::coerce_amount(amount_field),
            date: lenient::coerce_date(doc.date.as_ref()),
            status: OrderStatus::from_label(&lenient::coerce_text(doc.status.as_ref())),
        }
    }
}

impl OrderRecord {
    pub fn new(id: impl Into<String>, amount: f64, date: Option<&str>) -> Self {
        OrderRecord {
            id: id.into(),
            product: String::new(),
            client: String::new(),
            amount,
            date: date.map(str::to_string),
            status: OrderStatus::Pending,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectStatus {
    Completed,
    #[serde(rename = "In Progress")]
    InProgress,
    Pending,
    Delayed,
}

impl ProjectStatus {
    pub const ALL: [ProjectStatus; 4] = [
        ProjectStatus::Completed,
        ProjectStatus::InProgress,
        ProjectStatus::Pending,
        ProjectStatus::Delayed,
    ];

    /// Exact, case-sensitive match. An empty label is `Pending`; any other
    /// unrecognised label has no status.
    pub fn classify(raw: &str) -> Option<Self> {
        match raw {
            "" | "Pending" => Some(ProjectStatus::Pending),
            "Completed" => Some(ProjectStatus::Completed),
            "In Progress" | "InProgress" => Some(ProjectStatus::InProgress),
            "Delayed" => Some(ProjectStatus::Delayed),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ProjectStatus::Completed => "Completed",
            ProjectStatus::InProgress => "In Progress",
            ProjectStatus::Pending => "Pending",
            ProjectStatus::Delayed => "Delayed",
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ProjectDocument {
    id: Option<Value>,
    name: Option<Value>,
    client: Option<Value>,
    budget: Option<Value>,
    status: Option<Value>,
    progress: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ProjectDocument")]
pub struct ProjectRecord {
    pub id: String,
    pub name: String,
    pub client: String,
    pub budget: String,
    /// Raw status label, kept unclassified.
    pub status: String,
    pub progress: u8,
}

impl From<ProjectDocument> for ProjectRecord {
    fn from(doc: ProjectDocument) -> Self {
        ProjectRecord {
            id: lenient::coerce_text(doc.id.as_ref()),
            name: lenient::coerce_text(doc.name.as_ref()),
            client: lenient::coerce_text(doc.client.as_ref()),
            budget: lenient::coerce_text(doc.budget.as_ref()),
            status: lenient::coerce_text(doc.status.as_ref()),
            progress: lenient::coerce_percent(doc.progress.as_ref()),
        }
    }
}

impl ProjectRecord {
    pub fn new(id: impl Into<String>, name: impl Into<String>, status: impl Into<String>) -> Self {
        ProjectRecord {
            id: id.into(),
            name: name.into(),
            client: String::new(),
            budget: String::new(),
            status: status.into(),
            progress: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    #[serde(default, deserialize_with = "lenient::text")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: String,
    /// Display price, e.g. `₹50,000`.
    #[serde(default, deserialize_with = "lenient::text")]
    pub price: String,
    #[serde(default = "default_quantity", deserialize_with = "lenient::quantity")]
    pub quantity: u32,
}

fn default_quantity() -> u32 {
    1
}

// Derived values

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyBucket {
    /// `YYYY-MM`
    pub month_key: String,
    /// Short month name (`Jan`..`Dec`)
    pub label: String,
    pub revenue: f64,
    pub orders: usize,
}

/// Project counts for the four known statuses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusTally {
    #[serde(rename = "Completed")]
    pub completed: usize,
    #[serde(rename = "In Progress")]
    pub in_progress: usize,
    #[serde(rename = "Pending")]
    pub pending: usize,
    #[serde(rename = "Delayed")]
    pub delayed: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusSlice {
    pub name: String,
    pub value: usize,
}

impl StatusTally {
    pub fn get(&self, status: ProjectStatus) -> usize {
        match status {
            ProjectStatus::Completed => self.completed,
            ProjectStatus::InProgress => self.in_progress,
            ProjectStatus::Pending => self.pending,
            ProjectStatus::Delayed => self.delayed,
        }
    }

    pub fn increment(&mut self, status: ProjectStatus) {
        let slot = match status {
            ProjectStatus::Completed => &mut self.completed,
            ProjectStatus::InProgress => &mut self.in_progress,
            ProjectStatus::Pending => &mut self.pending,
            ProjectStatus::Delayed => &mut self.delayed,
        };
        *slot += 1;
    }

    pub fn total(&self) -> usize {
        self.completed + self.in_progress + self.pending + self.delayed
    }

    /// Pie chart data in the order Completed, In Progress, Pending, Delayed.
    pub fn series(&self) -> Vec<StatusSlice> {
        ProjectStatus::ALL
            .iter()
            .map(|s| StatusSlice {
                name: s.label().to_string(),
                value: self.get(*s),
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    pub subtotal: f64,
    pub shipping: f64,
    pub tax: f64,
    pub total: f64,
}

// Engine inputs

/// What to do with an order whose date cannot be parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateFallback {
    /// File it under the reference day, as the admin dashboard always has.
    #[default]
    Now,
    /// Leave it out of the monthly series and list it in `unparsed_dates`.
    Flag,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AggregationOptions {
    /// Stands in for "now" when a date is missing or unparseable.
    pub today: NaiveDate,
    pub date_fallback: DateFallback,
    /// Number of most recent months kept in the revenue series.
    pub chart_window: usize,
    pub currency_symbol: String,
}

impl AggregationOptions {
    pub fn new(today: NaiveDate) -> Self {
        AggregationOptions {
            today,
            date_fallback: DateFallback::Now,
            chart_window: settings::DEFAULT_CHART_WINDOW,
            currency_symbol: settings::DEFAULT_CURRENCY_SYMBOL.to_string(),
        }
    }

    pub fn with_date_fallback(mut self, fallback: DateFallback) -> Self {
        self.date_fallback = fallback;
        self
    }
}

impl Default for AggregationOptions {
    fn default() -> Self {
        AggregationOptions::new(Utc::now().date_naive())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InvoicePolicy {
    pub shipping_fee: f64,
    pub tax_rate: f64,
}

impl Default for InvoicePolicy {
    fn default() -> Self {
        InvoicePolicy {
            shipping_fee: settings::DEFAULT_SHIPPING_FEE,
            tax_rate: settings::DEFAULT_TAX_RATE,
        }
    }
}

// Output models

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardMetadata {
    pub generated_at: String,
    pub currency_symbol: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub metadata: DashboardMetadata,
    pub total_revenue: f64,
    pub monthly_series: Vec<MonthlyBucket>,
    pub status_tally: StatusTally,
    pub status_series: Vec<StatusSlice>,
    pub active_project_count: usize,
    pub unclassified_project_count: usize,
    pub total_products: usize,
    pub total_users: usize,
    pub sorted_orders: Vec<OrderRecord>,
    /// Ids of orders whose date could not be parsed (only with `DateFallback::Flag`).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unparsed_dates: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_order_status_from_label() {
        assert_eq!(OrderStatus::from_label("pending"), OrderStatus::Pending);
        assert_eq!(OrderStatus::from_label("Processing"), OrderStatus::Processing);
        assert_eq!(OrderStatus::from_label("In Progress"), OrderStatus::InProgress);
        assert_eq!(OrderStatus::from_label("in_progress"), OrderStatus::InProgress);
        assert_eq!(OrderStatus::from_label("DELIVERED"), OrderStatus::Delivered);
        assert_eq!(OrderStatus::from_label(""), OrderStatus::Pending);
        assert_eq!(
            OrderStatus::from_label("Refunded"),
            OrderStatus::Other("Refunded".to_string())
        );
    }

    #[test]
    fn test_order_record_lenient_fields() {
        let order: OrderRecord = serde_json::from_value(json!({
            "id": "o1",
            "amount": "not-a-number",
            "status": null
        }))
        .unwrap();
        assert_eq!(order.amount, 0.0);
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.date, None);
        assert_eq!(order.product, "");
    }

    #[test]
    fn test_order_record_reads_total_when_amount_missing() {
        let order: OrderRecord = serde_json::from_value(json!({
            "userId": "u1",
            "total": 4500,
            "status": "processing"
        }))
        .unwrap();
        assert_eq!(order.amount, 4500.0);
        assert_eq!(order.status, OrderStatus::Processing);

        let both: OrderRecord =
            serde_json::from_value(json!({"amount": 10, "total": 99})).unwrap();
        assert_eq!(both.amount, 10.0);
    }

    #[test]
    fn test_order_record_serializes_status_label() {
        let mut order = OrderRecord::new("o1", 250.0, Some("2024-05-02"));
        order.status = OrderStatus::InProgress;
        let value = serde_json::to_value(&order).unwrap();
        assert_eq!(value["status"], json!("In Progress"));
        assert_eq!(value["date"], json!("2024-05-02"));

        let back: OrderRecord = serde_json::from_value(value).unwrap();
        assert_eq!(back, order);
    }

    #[test]
    fn test_project_status_classify_is_case_sensitive() {
        assert_eq!(ProjectStatus::classify("InProgress"), Some(ProjectStatus::InProgress));
        assert_eq!(ProjectStatus::classify("In Progress"), Some(ProjectStatus::InProgress));
        assert_eq!(ProjectStatus::classify(""), Some(ProjectStatus::Pending));
        assert_eq!(ProjectStatus::classify("completed"), None);
        assert_eq!(ProjectStatus::classify("Bogus"), None);
    }

    #[test]
    fn test_project_record_lenient_fields() {
        let project: ProjectRecord = serde_json::from_value(json!({
            "name": "Mumbai Commercial Complex",
            "status": "In Progress",
            "progress": "130",
            "budget": 2500000
        }))
        .unwrap();
        assert_eq!(project.progress, 100);
        assert_eq!(project.budget, "2500000");
        assert_eq!(project.status, "In Progress");
        assert_eq!(project.id, "");
    }

    #[test]
    fn test_cart_item_defaults() {
        let item: CartItem =
            serde_json::from_value(json!({"name": "TMT Bars", "price": "₹30,000"})).unwrap();
        assert_eq!(item.quantity, 1);

        let zero: CartItem = serde_json::from_value(json!({"price": 500, "quantity": 0})).unwrap();
        assert_eq!(zero.quantity, 1);
        assert_eq!(zero.price, "500");
    }

    #[test]
    fn test_status_tally_series_order() {
        let mut tally = StatusTally::default();
        tally.increment(ProjectStatus::Delayed);
        tally.increment(ProjectStatus::InProgress);
        tally.increment(ProjectStatus::InProgress);

        let names: Vec<_> = tally.series().into_iter().map(|s| (s.name, s.value)).collect();
        assert_eq!(
            names,
            vec![
                ("Completed".to_string(), 0),
                ("In Progress".to_string(), 2),
                ("Pending".to_string(), 0),
                ("Delayed".to_string(), 1),
            ]
        );
        assert_eq!(tally.total(), 3);
    }

    #[test]
    fn test_status_tally_serializes_labels() {
        let tally = StatusTally {
            completed: 1,
            in_progress: 2,
            pending: 0,
            delayed: 0,
        };
        assert_eq!(
            serde_json::to_value(tally).unwrap(),
            json!({"Completed": 1, "In Progress": 2, "Pending": 0, "Delayed": 0})
        );
    }
}

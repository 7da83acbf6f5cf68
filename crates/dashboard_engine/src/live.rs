//! Live recomputation driven by collection snapshots.
//!
//! The document store pushes the complete contents of a collection whenever
//! anything in it changes. [`LiveDashboard`] keeps the last snapshot of each
//! collection and rebuilds the whole summary on every delivery; there is no
//! delta path, so an edited or deleted record can never leave a stale total.

use models::{AggregationOptions, DashboardSummary, OrderRecord, ProjectRecord};

use crate::dashboard::{summarize, DashboardInput};

/// Full contents of one collection at a point in time.
#[derive(Debug, Clone, PartialEq)]
pub enum CollectionSnapshot {
    Orders(Vec<OrderRecord>),
    Projects(Vec<ProjectRecord>),
    /// Only the size of these collections is shown.
    Products(usize),
    Users(usize),
}

impl CollectionSnapshot {
    pub fn collection(&self) -> &'static str {
        match self {
            CollectionSnapshot::Orders(_) => "orders",
            CollectionSnapshot::Projects(_) => "projects",
            CollectionSnapshot::Products(_) => "products",
            CollectionSnapshot::Users(_) => "users",
        }
    }

    pub fn len(&self) -> usize {
        match self {
            CollectionSnapshot::Orders(v) => v.len(),
            CollectionSnapshot::Projects(v) => v.len(),
            CollectionSnapshot::Products(n) | CollectionSnapshot::Users(n) => *n,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Callback registered with a snapshot source.
pub trait SnapshotHandler {
    fn on_snapshot(&mut self, snapshot: CollectionSnapshot);
}

impl<F> SnapshotHandler for F
where
    F: FnMut(CollectionSnapshot),
{
    fn on_snapshot(&mut self, snapshot: CollectionSnapshot) {
        self(snapshot)
    }
}

/// Dashboard state owned by the presentation layer. The latest delivery wins.
#[derive(Debug, Clone)]
pub struct LiveDashboard {
    input: DashboardInput,
    options: AggregationOptions,
    latest: DashboardSummary,
    revision: u64,
}

impl LiveDashboard {
    pub fn new(options: AggregationOptions) -> Self {
        let input = DashboardInput::default();
        let latest = summarize(&input, &options);
        LiveDashboard {
            input,
            options,
            latest,
            revision: 0,
        }
    }

    /// Replaces one collection and recomputes the summary from scratch.
    pub fn apply(&mut self, snapshot: CollectionSnapshot) -> &DashboardSummary {
        tracing::debug!(
            collection = snapshot.collection(),
            size = snapshot.len(),
            revision = self.revision + 1,
            "snapshot received"
        );
        match snapshot {
            CollectionSnapshot::Orders(orders) => self.input.orders = orders,
            CollectionSnapshot::Projects(projects) => self.input.projects = projects,
            CollectionSnapshot::Products(n) => self.input.product_count = n,
            CollectionSnapshot::Users(n) => self.input.user_count = n,
        }
        self.recompute()
    }

    /// Changes the aggregation options (e.g. a new reference day) and recomputes.
    pub fn set_options(&mut self, options: AggregationOptions) -> &DashboardSummary {
        self.options = options;
        self.recompute()
    }

    fn recompute(&mut self) -> &DashboardSummary {
        self.latest = summarize(&self.input, &self.options);
        self.revision += 1;
        &self.latest
    }

    pub fn latest(&self) -> &DashboardSummary {
        &self.latest
    }

    /// Number of recomputations so far.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn input(&self) -> &DashboardInput {
        &self.input
    }
}

impl SnapshotHandler for LiveDashboard {
    fn on_snapshot(&mut self, snapshot: CollectionSnapshot) {
        self.apply(snapshot);
    }
}

/// Handle returned by [`SnapshotFeed::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// In-process fan-out of snapshots to registered handlers, in registration
/// order. Delivery is synchronous.
#[derive(Default)]
pub struct SnapshotFeed<'a> {
    handlers: Vec<(SubscriptionId, &'a mut dyn SnapshotHandler)>,
    next_id: u64,
}

impl<'a> SnapshotFeed<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, handler: &'a mut dyn SnapshotHandler) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.handlers.push((id, handler));
        id
    }

    /// Returns false if the subscription was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.handlers.len();
        self.handlers.retain(|(sid, _)| *sid != id);
        self.handlers.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.handlers.len()
    }

    pub fn publish(&mut self, snapshot: CollectionSnapshot) {
        let Some(((_, last), rest)) = self.handlers.split_last_mut() else {
            tracing::debug!(collection = snapshot.collection(), "snapshot with no subscribers");
            return;
        };
        for (_, handler) in rest.iter_mut() {
            handler.on_snapshot(snapshot.clone());
        }
        last.on_snapshot(snapshot);
    }
}

use crate::table::MetricsTable;
use crate::StatisticsSource;
use core_types::{congestion_rate, AggregateRow, GroupKey, GroupedMetric, Grouping};
use records::AggregateStore;
use std::sync::Arc;

/// Serves metrics tables straight from pre-aggregated rows.
///
/// No accounting policy applies: the counts were fixed upstream. Rows are
/// filtered by jurisdiction and year and a totals row is synthesized the same
/// way as for event data.
#[derive(Debug)]
pub struct AggregateEngine {
    store: Arc<AggregateStore>,
    grouping: Grouping,
    min_year: i32,
}

impl AggregateEngine {
    pub fn new(store: Arc<AggregateStore>, grouping: Grouping) -> Self {
        Self {
            store,
            grouping,
            min_year: i32::MIN,
        }
    }

    pub fn with_min_year(mut self, min_year: i32) -> Self {
        self.min_year = min_year;
        self
    }

    pub fn store(&self) -> &AggregateStore {
        &self.store
    }

    pub fn grouping(&self) -> Grouping {
        self.grouping
    }

    pub fn compute(&self, jurisdiction: &str, year: i32) -> MetricsTable {
        let mut rows: Vec<GroupedMetric> = self
            .store
            .in_jurisdiction(jurisdiction)
            .filter(|row| row.year == year)
            .map(|row| self.metric(row))
            .collect();
        // Stable, so rows sharing a key keep their source order.
        rows.sort_by(|a, b| a.key.cmp(&b.key));

        tracing::debug!(jurisdiction, year, rows = rows.len(), "Served pre-aggregated table.");
        MetricsTable::from_rows(self.grouping, rows)
    }

    /// The stored rate is used as-is; a missing one is recomputed from the counts.
    fn metric(&self, row: &AggregateRow) -> GroupedMetric {
        GroupedMetric {
            key: GroupKey::for_aggregate(row, self.grouping),
            distributed: row.distributed,
            resolved: row.resolved,
            pending: row.pending,
            congestion_rate: row
                .congestion_rate
                .unwrap_or_else(|| congestion_rate(row.pending, row.resolved)),
        }
    }
}

impl StatisticsSource for AggregateEngine {
    fn available_jurisdictions(&self) -> Vec<String> {
        self.store.jurisdictions()
    }

    fn available_years(&self) -> Vec<i32> {
        self.store.years(self.min_year)
    }

    fn table(&self, jurisdiction: &str, year: i32) -> MetricsTable {
        self.compute(jurisdiction, year)
    }
}

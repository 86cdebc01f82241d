use crate::grouping::group_records;
use crate::table::MetricsTable;
use crate::StatisticsSource;
use core_types::{GroupedMetric, Grouping};
use policies::AccountingPolicy;
use records::RecordStore;
use std::sync::Arc;

/// Computes metrics tables from case records under one accounting policy.
///
/// The engine holds no per-query state; every call to [`compute`] reads the
/// shared store from scratch, so one instance can serve any number of queries.
///
/// [`compute`]: StatisticsEngine::compute
#[derive(Debug)]
pub struct StatisticsEngine {
    store: Arc<RecordStore>,
    policy: Box<dyn AccountingPolicy>,
    grouping: Grouping,
    min_year: i32,
}

impl StatisticsEngine {
    pub fn new(store: Arc<RecordStore>, policy: Box<dyn AccountingPolicy>) -> Self {
        Self {
            store,
            policy,
            grouping: Grouping::default(),
            min_year: i32::MIN,
        }
    }

    /// Sets the grouping used by [`StatisticsSource::table`].
    pub fn with_grouping(mut self, grouping: Grouping) -> Self {
        self.grouping = grouping;
        self
    }

    /// Years before `min_year` are not offered by `available_years`.
    pub fn with_min_year(mut self, min_year: i32) -> Self {
        self.min_year = min_year;
        self
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn policy(&self) -> &dyn AccountingPolicy {
        self.policy.as_ref()
    }

    /// The main entry point for computing a metrics table.
    ///
    /// # Arguments
    ///
    /// * `jurisdiction` - Exact jurisdiction name. Unknown names give an empty table.
    /// * `year` - The reference year.
    /// * `grouping` - Which key columns identify a row.
    ///
    /// # Returns
    ///
    /// One row per group with cases filed or resolved in `year`, ordered by
    /// the grouping's first column, followed by a totals row when there is at
    /// least one row.
    pub fn compute(&self, jurisdiction: &str, year: i32, grouping: Grouping) -> MetricsTable {
        let groups = group_records(
            self.store.in_jurisdiction(jurisdiction),
            self.policy(),
            grouping,
        );

        let rows: Vec<GroupedMetric> = groups
            .into_iter()
            .filter_map(|(key, members)| {
                let tally = self.policy.tally(&members, year);
                tally.has_flow().then(|| GroupedMetric::from_tally(key, tally))
            })
            .collect();

        tracing::debug!(
            jurisdiction,
            year,
            ?grouping,
            policy = ?self.policy.kind(),
            rows = rows.len(),
            "Computed metrics table."
        );
        MetricsTable::from_rows(grouping, rows)
    }
}

impl StatisticsSource for StatisticsEngine {
    fn available_jurisdictions(&self) -> Vec<String> {
        self.store.jurisdictions()
    }

    fn available_years(&self) -> Vec<i32> {
        self.store.years(self.min_year)
    }

    fn table(&self, jurisdiction: &str, year: i32) -> MetricsTable {
        self.compute(jurisdiction, year, self.grouping)
    }
}

use crate::totals::synthesize_total;
use core_types::{GroupedMetric, Grouping};
use serde::Serialize;

/// The result of one statistics query: ordered group rows plus their totals.
///
/// This struct is the final output of both engines and the data transfer
/// object handed to renderers. An empty table has no totals row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricsTable {
    grouping: Grouping,
    rows: Vec<GroupedMetric>,
    total: Option<GroupedMetric>,
}

impl MetricsTable {
    pub fn empty(grouping: Grouping) -> Self {
        Self {
            grouping,
            rows: Vec::new(),
            total: None,
        }
    }

    /// Wraps already-ordered rows and appends the synthesized totals row.
    pub fn from_rows(grouping: Grouping, rows: Vec<GroupedMetric>) -> Self {
        if rows.is_empty() {
            return Self::empty(grouping);
        }
        let total = synthesize_total(grouping, &rows);
        Self {
            grouping,
            rows,
            total: Some(total),
        }
    }

    pub fn grouping(&self) -> Grouping {
        self.grouping
    }

    /// The group rows, without the totals row.
    pub fn rows(&self) -> &[GroupedMetric] {
        &self.rows
    }

    pub fn total(&self) -> Option<&GroupedMetric> {
        self.total.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Group rows followed by the totals row, in display order.
    pub fn iter(&self) -> impl Iterator<Item = &GroupedMetric> {
        self.rows.iter().chain(self.total.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::{GroupKey, Tally, TOTAL_LABEL};

    fn metric(area: &str, resolved: u64, pending: u64) -> GroupedMetric {
        GroupedMetric::from_tally(
            GroupKey {
                case_area: Some(area.into()),
                jurisdiction: "X".into(),
                court_unit: None,
            },
            Tally { distributed: resolved + pending, resolved, pending },
        )
    }

    #[test]
    fn empty_rows_have_no_total() {
        let table = MetricsTable::from_rows(Grouping::AreaJurisdiction, Vec::new());
        assert!(table.is_empty());
        assert!(table.total().is_none());
        assert_eq!(table.iter().count(), 0);
    }

    #[test]
    fn total_comes_last() {
        let table = MetricsTable::from_rows(
            Grouping::AreaJurisdiction,
            vec![metric("civel", 3, 1), metric("criminal", 1, 1)],
        );
        let labels: Vec<&str> = table
            .iter()
            .map(|row| row.key.label(Grouping::AreaJurisdiction))
            .collect();
        assert_eq!(labels, ["civel", "criminal", TOTAL_LABEL]);
    }
}

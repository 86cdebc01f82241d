use core_types::{GroupKey, GroupedMetric, Grouping, Tally};

/// Builds the synthetic totals row for a set of group rows.
///
/// Counts are summed exactly. The rate is recomputed from the summed pending
/// and resolved counts; averaging per-row rates would give a ten-case group
/// the same weight as a ten-thousand-case one.
pub fn synthesize_total(grouping: Grouping, rows: &[GroupedMetric]) -> GroupedMetric {
    let sum = rows.iter().fold(Tally::default(), |acc, row| Tally {
        distributed: acc.distributed.saturating_add(row.distributed),
        resolved: acc.resolved.saturating_add(row.resolved),
        pending: acc.pending.saturating_add(row.pending),
    });
    GroupedMetric::from_tally(GroupKey::total(grouping), sum)
}

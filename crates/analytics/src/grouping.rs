use core_types::{CaseRecord, GroupKey, Grouping};
use policies::AccountingPolicy;
use std::collections::BTreeMap;

/// Buckets the records a policy admits by their group key.
///
/// The map is ordered by key, which gives ascending rows by the first
/// grouping column.
pub fn group_records<'a>(
    records: impl IntoIterator<Item = &'a CaseRecord>,
    policy: &dyn AccountingPolicy,
    grouping: Grouping,
) -> BTreeMap<GroupKey, Vec<&'a CaseRecord>> {
    let mut groups: BTreeMap<GroupKey, Vec<&'a CaseRecord>> = BTreeMap::new();
    for record in records.into_iter().filter(|record| policy.admits(record)) {
        groups
            .entry(GroupKey::for_record(record, grouping))
            .or_default()
            .push(record);
    }
    groups
}

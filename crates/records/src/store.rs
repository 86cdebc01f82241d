use core_types::{AggregateRow, CaseRecord};
use std::collections::{BTreeMap, BTreeSet, HashSet};

/// Jurisdiction names that exports use for "no value"; never offered as choices.
fn is_listed_jurisdiction(name: &str) -> bool {
    let trimmed = name.trim();
    !trimmed.is_empty() && !trimmed.eq_ignore_ascii_case("nan")
}

/// The in-memory table of case records.
///
/// Built once after loading and read-only afterwards. Records are indexed by
/// jurisdiction so per-jurisdiction queries do not scan the whole table.
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    records: Vec<CaseRecord>,
    by_jurisdiction: BTreeMap<String, Vec<usize>>,
}

impl RecordStore {
    /// Builds the store, keeping the first record of every repeated `case_id`.
    pub fn new(records: Vec<CaseRecord>) -> Self {
        let mut seen = HashSet::new();
        let mut duplicates = 0usize;
        let records: Vec<CaseRecord> = records
            .into_iter()
            .filter(|record| {
                let id = record.case_id().trim();
                if id.is_empty() || seen.insert(id.to_string()) {
                    true
                } else {
                    duplicates += 1;
                    false
                }
            })
            .collect();

        if duplicates > 0 {
            tracing::warn!(duplicates, "Dropped records with a repeated case id.");
        }

        let mut by_jurisdiction: BTreeMap<String, Vec<usize>> = BTreeMap::new();
        for (index, record) in records.iter().enumerate() {
            by_jurisdiction
                .entry(record.jurisdiction().to_string())
                .or_default()
                .push(index);
        }

        Self {
            records,
            by_jurisdiction,
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[CaseRecord] {
        &self.records
    }

    /// Records of one jurisdiction, by exact name. Unknown names yield nothing.
    pub fn in_jurisdiction<'a>(
        &'a self,
        jurisdiction: &str,
    ) -> impl Iterator<Item = &'a CaseRecord> + 'a {
        self.by_jurisdiction
            .get(jurisdiction)
            .map(Vec::as_slice)
            .unwrap_or_default()
            .iter()
            .map(move |&index| &self.records[index])
    }

    /// Sorted jurisdiction names, without blanks.
    pub fn jurisdictions(&self) -> Vec<String> {
        self.by_jurisdiction
            .keys()
            .filter(|name| is_listed_jurisdiction(name))
            .cloned()
            .collect()
    }

    /// Sorted years in which any dated case was filed or resolved, from `min_year` on.
    pub fn years(&self, min_year: i32) -> Vec<i32> {
        let years: BTreeSet<i32> = self
            .records
            .iter()
            .filter(|record| record.distribution_year().is_some())
            .flat_map(|record| [record.distribution_year(), record.resolution_year()])
            .flatten()
            .filter(|&year| year >= min_year)
            .collect();
        years.into_iter().collect()
    }

    /// Latest filing or resolution year among dated records.
    pub fn latest_year(&self) -> Option<i32> {
        self.years(i32::MIN).last().copied()
    }
}

/// The in-memory table of pre-aggregated rows.
#[derive(Debug, Clone, Default)]
pub struct AggregateStore {
    rows: Vec<AggregateRow>,
}

impl AggregateStore {
    pub fn new(rows: Vec<AggregateRow>) -> Self {
        Self { rows }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[AggregateRow] {
        &self.rows
    }

    pub fn in_jurisdiction<'a>(
        &'a self,
        jurisdiction: &'a str,
    ) -> impl Iterator<Item = &'a AggregateRow> + 'a {
        self.rows
            .iter()
            .filter(move |row| row.jurisdiction == jurisdiction)
    }

    pub fn jurisdictions(&self) -> Vec<String> {
        let names: BTreeSet<&str> = self
            .rows
            .iter()
            .map(|row| row.jurisdiction.as_str())
            .filter(|name| is_listed_jurisdiction(name))
            .collect();
        names.into_iter().map(String::from).collect()
    }

    pub fn years(&self, min_year: i32) -> Vec<i32> {
        let years: BTreeSet<i32> = self
            .rows
            .iter()
            .map(|row| row.year)
            .filter(|&year| year >= min_year)
            .collect();
        years.into_iter().collect()
    }

    pub fn latest_year(&self) -> Option<i32> {
        self.rows.iter().map(|row| row.year).max()
    }
}

use crate::enums::{Grouping, KeyColumn};
use crate::rate::congestion_rate;
use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Label written into the leading key column of the synthetic totals row.
pub const TOTAL_LABEL: &str = "TOTAL";

/// One docket case as it sits in the record store.
///
/// The year fields are derived from the dates when the record is built and
/// cannot drift from them afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseRecord {
    case_id: String,
    jurisdiction: String,
    court_unit: Option<String>,
    case_area: String,
    distribution_date: Option<NaiveDate>,
    resolution_date: Option<NaiveDate>,
    distribution_year: Option<i32>,
    resolution_year: Option<i32>,
}

impl CaseRecord {
    pub fn new(
        case_id: impl Into<String>,
        jurisdiction: impl Into<String>,
        case_area: impl Into<String>,
        distribution_date: Option<NaiveDate>,
        resolution_date: Option<NaiveDate>,
    ) -> Self {
        Self {
            case_id: case_id.into(),
            jurisdiction: jurisdiction.into(),
            court_unit: None,
            case_area: case_area.into(),
            distribution_date,
            resolution_date,
            distribution_year: distribution_date.map(|d| d.year()),
            resolution_year: resolution_date.map(|d| d.year()),
        }
    }

    pub fn with_court_unit(mut self, court_unit: impl Into<String>) -> Self {
        self.court_unit = Some(court_unit.into());
        self
    }

    pub fn case_id(&self) -> &str {
        &self.case_id
    }

    pub fn jurisdiction(&self) -> &str {
        &self.jurisdiction
    }

    pub fn court_unit(&self) -> Option<&str> {
        self.court_unit.as_deref()
    }

    pub fn case_area(&self) -> &str {
        &self.case_area
    }

    pub fn distribution_date(&self) -> Option<NaiveDate> {
        self.distribution_date
    }

    pub fn resolution_date(&self) -> Option<NaiveDate> {
        self.resolution_date
    }

    pub fn distribution_year(&self) -> Option<i32> {
        self.distribution_year
    }

    pub fn resolution_year(&self) -> Option<i32> {
        self.resolution_year
    }

    /// Whether the case was still open at data collection time.
    pub fn is_open(&self) -> bool {
        self.resolution_date.is_none()
    }
}

/// A row from a pre-aggregated source, already carrying its counts for one year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateRow {
    pub year: i32,
    pub jurisdiction: String,
    pub case_area: Option<String>,
    pub court_unit: Option<String>,
    pub distributed: u64,
    pub resolved: u64,
    pub pending: u64,
    /// `None` when the source cell was empty or unparseable.
    pub congestion_rate: Option<Decimal>,
}

impl AggregateRow {
    pub fn tally(&self) -> Tally {
        Tally {
            distributed: self.distributed,
            resolved: self.resolved,
            pending: self.pending,
        }
    }
}

/// The tuple of key columns identifying a group in a metrics table.
///
/// Columns that the active [`Grouping`] does not use are `None`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GroupKey {
    pub case_area: Option<String>,
    pub jurisdiction: String,
    pub court_unit: Option<String>,
}

impl GroupKey {
    pub fn for_record(record: &CaseRecord, grouping: Grouping) -> Self {
        Self::from_parts(
            Some(record.case_area()),
            record.jurisdiction(),
            record.court_unit(),
            grouping,
        )
    }

    pub fn for_aggregate(row: &AggregateRow, grouping: Grouping) -> Self {
        Self::from_parts(
            row.case_area.as_deref(),
            &row.jurisdiction,
            row.court_unit.as_deref(),
            grouping,
        )
    }

    fn from_parts(
        case_area: Option<&str>,
        jurisdiction: &str,
        court_unit: Option<&str>,
        grouping: Grouping,
    ) -> Self {
        let pick = |column: KeyColumn, value: Option<&str>| {
            grouping
                .includes(column)
                .then(|| value.unwrap_or_default().to_string())
        };
        Self {
            case_area: pick(KeyColumn::CaseArea, case_area),
            jurisdiction: jurisdiction.to_string(),
            court_unit: pick(KeyColumn::CourtUnit, court_unit),
        }
    }

    /// Key of the synthetic totals row: `TOTAL` in the leading column, the rest blank.
    pub fn total(grouping: Grouping) -> Self {
        let fill = |column: KeyColumn| {
            grouping.includes(column).then(|| {
                if grouping.leading() == column {
                    TOTAL_LABEL.to_string()
                } else {
                    String::new()
                }
            })
        };
        Self {
            case_area: fill(KeyColumn::CaseArea),
            jurisdiction: String::new(),
            court_unit: fill(KeyColumn::CourtUnit),
        }
    }

    pub fn value(&self, column: KeyColumn) -> Option<&str> {
        match column {
            KeyColumn::CaseArea => self.case_area.as_deref(),
            KeyColumn::Jurisdiction => Some(&self.jurisdiction),
            KeyColumn::CourtUnit => self.court_unit.as_deref(),
        }
    }

    /// The value of the grouping's leading column, used as a series label.
    pub fn label(&self, grouping: Grouping) -> &str {
        self.value(grouping.leading()).unwrap_or_default()
    }
}

/// Counts an accounting policy produced for one group and one year.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally {
    pub distributed: u64,
    /// Cases resolved within the reference year.
    pub resolved: u64,
    pub pending: u64,
}

impl Tally {
    pub fn congestion_rate(&self) -> Decimal {
        congestion_rate(self.pending, self.resolved)
    }

    pub fn is_empty(&self) -> bool {
        self.distributed == 0 && self.resolved == 0 && self.pending == 0
    }

    /// Something was filed or resolved this year; such groups get a table row.
    pub fn has_flow(&self) -> bool {
        self.distributed > 0 || self.resolved > 0
    }

    /// Something is either waiting or got resolved this year.
    pub fn has_activity(&self) -> bool {
        self.pending > 0 || self.resolved > 0
    }
}

/// One row of a metrics table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupedMetric {
    pub key: GroupKey,
    pub distributed: u64,
    pub resolved: u64,
    pub pending: u64,
    pub congestion_rate: Decimal,
}

impl GroupedMetric {
    pub fn from_tally(key: GroupKey, tally: Tally) -> Self {
        Self {
            key,
            distributed: tally.distributed,
            resolved: tally.resolved,
            pending: tally.pending,
            congestion_rate: tally.congestion_rate(),
        }
    }

    pub fn tally(&self) -> Tally {
        Tally {
            distributed: self.distributed,
            resolved: self.resolved,
            pending: self.pending,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y, m, d)
    }

    #[test]
    fn record_years_follow_dates() {
        let record = CaseRecord::new("1", "GOIANIRA", "civel", date(2021, 3, 4), None);
        assert_eq!(record.distribution_year(), Some(2021));
        assert_eq!(record.resolution_year(), None);
        assert!(record.is_open());

        let closed = CaseRecord::new("2", "GOIANIRA", "civel", None, date(2022, 1, 1));
        assert_eq!(closed.distribution_year(), None);
        assert_eq!(closed.resolution_year(), Some(2022));
    }

    #[test]
    fn group_key_keeps_only_grouping_columns() {
        let record = CaseRecord::new("1", "X", "criminal", date(2021, 1, 1), None)
            .with_court_unit("1a Vara");

        let key = GroupKey::for_record(&record, Grouping::AreaJurisdiction);
        assert_eq!(key.case_area.as_deref(), Some("criminal"));
        assert_eq!(key.court_unit, None);

        let key = GroupKey::for_record(&record, Grouping::AreaJurisdictionUnit);
        assert_eq!(key.court_unit.as_deref(), Some("1a Vara"));
        assert_eq!(key.label(Grouping::AreaJurisdictionUnit), "criminal");
    }

    #[test]
    fn total_key_labels_leading_column() {
        let key = GroupKey::total(Grouping::AreaJurisdictionUnit);
        assert_eq!(key.case_area.as_deref(), Some(TOTAL_LABEL));
        assert_eq!(key.jurisdiction, "");
        assert_eq!(key.court_unit.as_deref(), Some(""));

        let key = GroupKey::total(Grouping::UnitJurisdiction);
        assert_eq!(key.case_area, None);
        assert_eq!(key.court_unit.as_deref(), Some(TOTAL_LABEL));
    }

    #[test]
    fn activity_requires_pending_or_resolved() {
        let only_filed = Tally { distributed: 3, resolved: 0, pending: 0 };
        assert!(!only_filed.has_activity());
        assert!(!only_filed.is_empty());
        assert!(Tally { distributed: 0, resolved: 1, pending: 0 }.has_activity());
    }

    #[test]
    fn pending_alone_is_not_flow() {
        let backlog_only = Tally { distributed: 0, resolved: 0, pending: 7 };
        assert!(!backlog_only.has_flow());
        assert!(backlog_only.has_activity());
        assert!(Tally { distributed: 1, resolved: 0, pending: 0 }.has_flow());
    }
}

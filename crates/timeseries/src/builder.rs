use crate::error::SeriesError;
use crate::scope::{AreaFilter, SeriesScope};
use analytics::group_records;
use core_types::{congestion_rate, Tally};
use policies::AccountingPolicy;
use records::{AggregateStore, RecordStore};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::ops::RangeInclusive;

/// One point of a trend line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeriesPoint {
    pub year: i32,
    pub group: String,
    pub congestion_rate: Decimal,
    pub distributed: u64,
    pub resolved: u64,
    pub pending: u64,
}

/// Congestion-rate trend lines, ordered by group and then by year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeSeries {
    pub scope: SeriesScope,
    pub points: Vec<SeriesPoint>,
}

impl TimeSeries {
    /// Distinct line names, in order.
    pub fn groups(&self) -> Vec<&str> {
        let mut groups: Vec<&str> = self.points.iter().map(|p| p.group.as_str()).collect();
        groups.dedup();
        groups
    }

    pub fn years(&self) -> BTreeSet<i32> {
        self.points.iter().map(|p| p.year).collect()
    }

    pub fn line<'a>(&'a self, group: &'a str) -> impl Iterator<Item = &'a SeriesPoint> + 'a {
        self.points.iter().filter(move |p| p.group == group)
    }
}

/// Builds trend lines over a contiguous range of years.
///
/// A point is emitted for a group and year only when something was pending or
/// resolved; years with nothing but new filings, or nothing at all, leave a
/// gap rather than a zero.
#[derive(Debug, Clone, Default)]
pub struct SeriesBuilder {
    areas: AreaFilter,
}

impl SeriesBuilder {
    pub fn new(areas: AreaFilter) -> Self {
        Self { areas }
    }

    /// Trend lines from case records, counted by `policy`.
    pub fn from_events(
        &self,
        store: &RecordStore,
        policy: &dyn AccountingPolicy,
        scope: &SeriesScope,
        years: RangeInclusive<i32>,
    ) -> Result<TimeSeries, SeriesError> {
        check_range(&years)?;
        let grouping = scope.grouping();
        let records = store
            .in_jurisdiction(scope.jurisdiction())
            .filter(|record| scope.covers_record(record));

        let mut points = Vec::new();
        for (key, members) in group_records(records, policy, grouping) {
            let group = key.label(grouping);
            if !self.allows(scope, group) {
                continue;
            }
            for year in years.clone() {
                let tally = policy.tally(&members, year);
                if tally.has_activity() {
                    points.push(point(year, group, tally, tally.congestion_rate()));
                }
            }
        }
        self.finish(scope, points)
    }

    /// Trend lines from pre-aggregated rows.
    ///
    /// Rows sharing a group and year are summed; a lone row keeps its stored rate.
    pub fn from_aggregates(
        &self,
        store: &AggregateStore,
        scope: &SeriesScope,
        years: RangeInclusive<i32>,
    ) -> Result<TimeSeries, SeriesError> {
        check_range(&years)?;

        let mut cells: BTreeMap<(&str, i32), (Tally, Option<Decimal>, usize)> = BTreeMap::new();
        let rows = store
            .in_jurisdiction(scope.jurisdiction())
            .filter(|row| years.contains(&row.year) && scope.covers_row(row));
        for row in rows {
            let group = scope.row_group(row);
            if !self.allows(scope, group) {
                continue;
            }
            let (tally, rate, count) = cells.entry((group, row.year)).or_default();
            tally.distributed = tally.distributed.saturating_add(row.distributed);
            tally.resolved = tally.resolved.saturating_add(row.resolved);
            tally.pending = tally.pending.saturating_add(row.pending);
            *rate = row.congestion_rate;
            *count += 1;
        }

        let points = cells
            .into_iter()
            .filter(|(_, (tally, _, _))| tally.has_activity())
            .map(|((group, year), (tally, stored, count))| {
                let rate = match (count, stored) {
                    (1, Some(stored)) => stored,
                    _ => congestion_rate(tally.pending, tally.resolved),
                };
                point(year, group, tally, rate)
            })
            .collect();
        self.finish(scope, points)
    }

    fn allows(&self, scope: &SeriesScope, group: &str) -> bool {
        !scope.groups_by_area() || self.areas.allows(group)
    }

    fn finish(&self, scope: &SeriesScope, points: Vec<SeriesPoint>) -> Result<TimeSeries, SeriesError> {
        let found = points.iter().map(|p| p.year).collect::<BTreeSet<_>>().len();
        if found < 2 {
            tracing::debug!(?scope, found, "Not enough years for a trend.");
            return Err(SeriesError::InsufficientData { found });
        }
        tracing::debug!(?scope, points = points.len(), "Built time series.");
        Ok(TimeSeries {
            scope: scope.clone(),
            points,
        })
    }
}

/// From `start_year` through the latest observed year, if there is one at or after it.
pub fn default_range(start_year: i32, latest: Option<i32>) -> Option<RangeInclusive<i32>> {
    latest
        .filter(|&latest| latest >= start_year)
        .map(|latest| start_year..=latest)
}

fn check_range(years: &RangeInclusive<i32>) -> Result<(), SeriesError> {
    if years.start() > years.end() {
        return Err(SeriesError::InvalidRange {
            from: *years.start(),
            to: *years.end(),
        });
    }
    Ok(())
}

fn point(year: i32, group: &str, tally: Tally, congestion_rate: Decimal) -> SeriesPoint {
    SeriesPoint {
        year,
        group: group.to_string(),
        congestion_rate,
        distributed: tally.distributed,
        resolved: tally.resolved,
        pending: tally.pending,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use core_types::{AggregateRow, CaseRecord};
    use policies::AnnualFlow;
    use rust_decimal_macros::dec;

    fn case(id: &str, area: &str, filed: i32, resolved: Option<i32>) -> CaseRecord {
        CaseRecord::new(
            id,
            "X",
            area,
            NaiveDate::from_ymd_opt(filed, 5, 5),
            resolved.and_then(|y| NaiveDate::from_ymd_opt(y, 7, 7)),
        )
    }

    fn areas() -> SeriesScope {
        SeriesScope::Areas { jurisdiction: "X".into() }
    }

    #[test]
    fn quiet_years_leave_gaps() {
        // Activity only in 2021 and 2023.
        let store = RecordStore::new(vec![
            case("1", "civel", 2021, None),
            case("2", "civel", 2023, Some(2023)),
        ]);
        let series = SeriesBuilder::default()
            .from_events(&store, &AnnualFlow::default(), &areas(), 2020..=2023)
            .unwrap();

        let years: Vec<i32> = series.points.iter().map(|p| p.year).collect();
        assert_eq!(years, [2021, 2023]);
        assert_eq!(series.points[0].congestion_rate, dec!(100.00));
        assert_eq!(series.points[1].congestion_rate, Decimal::ZERO);
    }

    #[test]
    fn single_year_is_insufficient() {
        let store = RecordStore::new(vec![case("1", "civel", 2022, None)]);
        let result =
            SeriesBuilder::default().from_events(&store, &AnnualFlow::default(), &areas(), 2020..=2023);
        assert_eq!(result, Err(SeriesError::InsufficientData { found: 1 }));
    }

    #[test]
    fn inverted_range_is_rejected() {
        let result = SeriesBuilder::default().from_aggregates(
            &AggregateStore::empty(),
            &areas(),
            2023..=2020,
        );
        assert_eq!(result, Err(SeriesError::InvalidRange { from: 2023, to: 2020 }));
    }

    #[test]
    fn allow_list_limits_area_lines() {
        let store = RecordStore::new(vec![
            case("1", "civel", 2021, None),
            case("2", "civel", 2022, None),
            case("3", "execucao fiscal", 2021, None),
            case("4", "execucao fiscal", 2022, None),
        ]);
        let builder = SeriesBuilder::new(AreaFilter::new(&["CIVEL"]));
        let series = builder
            .from_events(&store, &AnnualFlow::default(), &areas(), 2021..=2022)
            .unwrap();
        assert_eq!(series.groups(), ["civel"]);
    }

    #[test]
    fn aggregates_keep_stored_rates_and_skip_inactive_rows() {
        let row = |year, pending, resolved, rate| AggregateRow {
            year,
            jurisdiction: "X".into(),
            case_area: Some("civel".into()),
            court_unit: None,
            distributed: 5,
            resolved,
            pending,
            congestion_rate: rate,
        };
        let store = AggregateStore::new(vec![
            row(2020, 1, 3, Some(dec!(26.1))),
            row(2021, 0, 0, None),
            row(2022, 2, 2, None),
        ]);
        let series = SeriesBuilder::default()
            .from_aggregates(&store, &areas(), 2020..=2022)
            .unwrap();

        let rates: Vec<(i32, Decimal)> = series
            .line("civel")
            .map(|p| (p.year, p.congestion_rate))
            .collect();
        assert_eq!(rates, [(2020, dec!(26.1)), (2022, dec!(50.00))]);
    }

    #[test]
    fn huge_aggregate_counts_saturate() {
        let row = |year, distributed| AggregateRow {
            year,
            jurisdiction: "X".into(),
            case_area: Some("civel".into()),
            court_unit: None,
            distributed,
            resolved: u64::MAX,
            pending: 1,
            congestion_rate: None,
        };
        let store = AggregateStore::new(vec![
            row(2020, u64::MAX),
            row(2020, u64::MAX),
            row(2021, 3),
        ]);
        let series = SeriesBuilder::default()
            .from_aggregates(&store, &areas(), 2020..=2021)
            .unwrap();

        assert_eq!(series.points[0].distributed, u64::MAX);
        assert_eq!(series.points[0].resolved, u64::MAX);
        assert_eq!(series.points[0].pending, 2);
    }

    #[test]
    fn default_range_runs_to_latest_year() {
        assert_eq!(default_range(2020, Some(2024)), Some(2020..=2024));
        assert_eq!(default_range(2020, Some(2019)), None);
        assert_eq!(default_range(2020, None), None);
    }
}

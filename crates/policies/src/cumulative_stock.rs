use crate::AccountingPolicy;
use chrono::NaiveDate;
use core_types::{congestion_rate, CaseRecord, PolicyKind, Tally};
use rust_decimal::Decimal;
use serde::Serialize;

/// True backlog: flows accumulated from a fixed reliability start date.
///
/// Cases filed before `window_start` are ignored entirely, because the
/// exports are not trusted to hold their resolutions.
#[derive(Debug, Clone, Copy)]
pub struct CumulativeStock {
    window_start: NaiveDate,
}

/// The full stock picture of one group at the end of a reference year.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StockPosition {
    pub distributed_to_date: u64,
    pub resolved_to_date: u64,
    pub distributed_in_year: u64,
    pub resolved_in_year: u64,
    /// `distributed_to_date - resolved_to_date`, clipped at zero.
    pub pending: u64,
}

impl StockPosition {
    pub fn congestion_rate(&self) -> Decimal {
        congestion_rate(self.pending, self.resolved_in_year)
    }
}

impl CumulativeStock {
    pub fn new(window_start: NaiveDate) -> Self {
        Self { window_start }
    }

    pub fn window_start(&self) -> NaiveDate {
        self.window_start
    }

    /// Computes the position for `year` from scratch.
    pub fn position(&self, records: &[&CaseRecord], year: i32) -> StockPosition {
        let mut position = StockPosition::default();
        for record in records.iter().filter(|record| self.admits(record)) {
            if let Some(filed) = record.distribution_year() {
                if filed <= year {
                    position.distributed_to_date += 1;
                }
                if filed == year {
                    position.distributed_in_year += 1;
                }
            }
            if let Some(resolved) = record.resolution_year() {
                if resolved <= year {
                    position.resolved_to_date += 1;
                }
                if resolved == year {
                    position.resolved_in_year += 1;
                }
            }
        }
        position.pending = position
            .distributed_to_date
            .saturating_sub(position.resolved_to_date);
        position
    }
}

impl AccountingPolicy for CumulativeStock {
    fn kind(&self) -> PolicyKind {
        PolicyKind::CumulativeStock
    }

    fn admits(&self, record: &CaseRecord) -> bool {
        record
            .distribution_date()
            .is_some_and(|filed| filed >= self.window_start)
    }

    fn tally(&self, records: &[&CaseRecord], year: i32) -> Tally {
        let position = self.position(records, year);
        Tally {
            distributed: position.distributed_in_year,
            resolved: position.resolved_in_year,
            pending: position.pending,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn window() -> CumulativeStock {
        CumulativeStock::new(NaiveDate::from_ymd_opt(2020, 1, 1).unwrap())
    }

    fn case(id: usize, filed: i32, resolved: Option<i32>) -> CaseRecord {
        CaseRecord::new(
            id.to_string(),
            "X",
            "civel",
            NaiveDate::from_ymd_opt(filed, 3, 1),
            resolved.and_then(|y| NaiveDate::from_ymd_opt(y, 9, 1)),
        )
    }

    /// 50 filed from 2020 on, 30 resolved by the end of 2022, 12 of them in 2022.
    fn scenario() -> Vec<CaseRecord> {
        let resolved_2022 = (0..12).map(|i| case(i, 2021, Some(2022)));
        let resolved_2021 = (12..30).map(|i| case(i, 2020, Some(2021)));
        let open = (30..50).map(|i| case(i, 2022, None));
        resolved_2022.chain(resolved_2021).chain(open).collect()
    }

    #[test]
    fn end_to_end_stock() {
        let records = scenario();
        let refs: Vec<&CaseRecord> = records.iter().collect();

        let position = window().position(&refs, 2022);
        assert_eq!(position.distributed_to_date, 50);
        assert_eq!(position.resolved_to_date, 30);
        assert_eq!(position.resolved_in_year, 12);
        assert_eq!(position.pending, 20);
        assert_eq!(position.congestion_rate(), dec!(62.50));

        let tally = window().tally(&refs, 2022);
        assert_eq!(tally.pending, 20);
        assert_eq!(tally.resolved, 12);
        assert_eq!(tally.congestion_rate(), dec!(62.50));
    }

    #[test]
    fn pending_clips_at_zero() {
        // Three filings; five resolutions, two of them on cases filed "after" they closed.
        let mut records: Vec<CaseRecord> = (0..3).map(|i| case(i, 2021, Some(2021))).collect();
        records.push(case(3, 2023, Some(2021)));
        records.push(case(4, 2023, Some(2021)));
        let refs: Vec<&CaseRecord> = records.iter().collect();

        let position = window().position(&refs, 2021);
        assert_eq!(position.distributed_to_date, 3);
        assert_eq!(position.resolved_to_date, 5);
        assert_eq!(position.pending, 0);
        assert_eq!(position.congestion_rate(), Decimal::ZERO);
    }

    #[test]
    fn filings_before_window_are_ignored() {
        let records = [case(1, 2019, None), case(2, 2019, Some(2021)), case(3, 2020, None)];
        let refs: Vec<&CaseRecord> = records.iter().collect();

        let tally = window().tally(&refs, 2021);
        assert_eq!(tally, Tally { distributed: 0, resolved: 0, pending: 1 });
    }

    #[test]
    fn each_year_is_independent() {
        let records = [case(1, 2020, Some(2021)), case(2, 2021, None)];
        let refs: Vec<&CaseRecord> = records.iter().collect();
        let policy = window();

        let later = policy.tally(&refs, 2022);
        let earlier = policy.tally(&refs, 2020);
        assert_eq!(earlier, Tally { distributed: 1, resolved: 0, pending: 1 });
        assert_eq!(later, Tally { distributed: 0, resolved: 0, pending: 1 });
        assert_eq!(policy.tally(&refs, 2022), later);
    }

    proptest! {
        #[test]
        fn pending_never_negative_and_rate_bounded(
            cases in prop::collection::vec((2018i32..2025, prop::option::of(2015i32..2026)), 0..60),
            year in 2018i32..2026,
        ) {
            let records: Vec<CaseRecord> = cases
                .iter()
                .enumerate()
                .map(|(i, (filed, resolved))| case(i, *filed, *resolved))
                .collect();
            let refs: Vec<&CaseRecord> = records.iter().collect();

            let position = window().position(&refs, year);
            prop_assert!(position.pending <= position.distributed_to_date);
            let rate = position.congestion_rate();
            prop_assert!(rate >= Decimal::ZERO && rate <= Decimal::ONE_HUNDRED);
        }
    }
}

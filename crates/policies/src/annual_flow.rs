use crate::AccountingPolicy;
use core_types::{CaseRecord, PendingBasis, PolicyKind, Tally};

/// Year-scoped snapshot: only events whose own year equals the reference year.
///
/// `pending` depends on the [`PendingBasis`]. With `OpenedInYear` a case filed
/// in an earlier year and still open is not pending, so older backlog is not
/// visible; `Backlog` counts it.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnnualFlow {
    basis: PendingBasis,
}

impl AnnualFlow {
    pub fn new(basis: PendingBasis) -> Self {
        Self { basis }
    }

    pub fn basis(&self) -> PendingBasis {
        self.basis
    }

    fn is_pending(&self, record: &CaseRecord, filed: i32, year: i32) -> bool {
        match self.basis {
            PendingBasis::OpenedInYear => filed == year && record.is_open(),
            PendingBasis::Backlog => {
                filed <= year && record.resolution_year().is_none_or(|resolved| resolved > year)
            }
        }
    }
}

impl AccountingPolicy for AnnualFlow {
    fn kind(&self) -> PolicyKind {
        PolicyKind::AnnualFlow
    }

    fn admits(&self, record: &CaseRecord) -> bool {
        record.distribution_date().is_some()
    }

    fn tally(&self, records: &[&CaseRecord], year: i32) -> Tally {
        let mut tally = Tally::default();
        for record in records {
            let Some(filed) = record.distribution_year() else {
                continue;
            };
            if filed == year {
                tally.distributed += 1;
            }
            if record.resolution_year() == Some(year) {
                tally.resolved += 1;
            }
            if self.is_pending(record, filed, year) {
                tally.pending += 1;
            }
        }
        tally
    }
}

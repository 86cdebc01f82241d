use core_types::{AggregateRow, CaseRecord, Grouping};
use serde::Serialize;

/// What a trend covers and which column names its lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "scope", rename_all = "snake_case")]
pub enum SeriesScope {
    /// One line per case area of a jurisdiction.
    Areas { jurisdiction: String },
    /// One line per court unit of a jurisdiction.
    Units { jurisdiction: String },
    /// One line per case area, restricted to a single court unit.
    UnitAreas {
        jurisdiction: String,
        court_unit: String,
    },
}

impl SeriesScope {
    pub fn jurisdiction(&self) -> &str {
        match self {
            Self::Areas { jurisdiction }
            | Self::Units { jurisdiction }
            | Self::UnitAreas { jurisdiction, .. } => jurisdiction,
        }
    }

    pub fn grouping(&self) -> Grouping {
        match self {
            Self::Units { .. } => Grouping::UnitJurisdiction,
            Self::Areas { .. } | Self::UnitAreas { .. } => Grouping::AreaJurisdiction,
        }
    }

    /// Whether the lines are case areas, so the area allow-list applies.
    pub fn groups_by_area(&self) -> bool {
        self.grouping() == Grouping::AreaJurisdiction
    }

    fn court_unit(&self) -> Option<&str> {
        match self {
            Self::UnitAreas { court_unit, .. } => Some(court_unit),
            _ => None,
        }
    }

    pub(crate) fn covers_record(&self, record: &CaseRecord) -> bool {
        self.court_unit()
            .is_none_or(|unit| record.court_unit() == Some(unit))
    }

    pub(crate) fn covers_row(&self, row: &AggregateRow) -> bool {
        self.court_unit()
            .is_none_or(|unit| row.court_unit.as_deref() == Some(unit))
    }

    /// The line name of an aggregate row under this scope.
    pub(crate) fn row_group<'a>(&self, row: &'a AggregateRow) -> &'a str {
        let value = if self.groups_by_area() {
            row.case_area.as_deref()
        } else {
            row.court_unit.as_deref()
        };
        value.unwrap_or_default()
    }
}

/// Case-area allow-list, matched ignoring case and runs of whitespace.
#[derive(Debug, Clone, Default)]
pub struct AreaFilter {
    allowed: Vec<String>,
}

pub fn normalize_area(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

impl AreaFilter {
    /// An empty list lets every area through.
    pub fn new<S: AsRef<str>>(areas: &[S]) -> Self {
        Self {
            allowed: areas.iter().map(|a| normalize_area(a.as_ref())).collect(),
        }
    }

    pub fn allows(&self, area: &str) -> bool {
        self.allowed.is_empty() || self.allowed.contains(&normalize_area(area))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_ignores_case_and_spacing() {
        let filter = AreaFilter::new(&["Juizado Especial Civel"]);
        assert!(filter.allows("  juizado   especial civel "));
        assert!(!filter.allows("juizado especial criminal"));
        assert!(AreaFilter::new::<&str>(&[]).allows("anything"));
    }

    #[test]
    fn unit_scope_groups_by_area_within_the_unit() {
        let scope = SeriesScope::UnitAreas {
            jurisdiction: "X".into(),
            court_unit: "1a Vara".into(),
        };
        assert_eq!(scope.grouping(), Grouping::AreaJurisdiction);
        let inside = CaseRecord::new("1", "X", "civel", None, None).with_court_unit("1a Vara");
        let outside = CaseRecord::new("2", "X", "civel", None, None).with_court_unit("2a Vara");
        assert!(scope.covers_record(&inside));
        assert!(!scope.covers_record(&outside));
    }
}

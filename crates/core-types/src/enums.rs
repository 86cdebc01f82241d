use serde::{Deserialize, Serialize};

/// Which accounting policy turns case events into counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "snake_case")]
pub enum PolicyKind {
    /// Only events whose own year equals the reference year.
    #[default]
    AnnualFlow,
    /// Flows accumulated from the reliability window start.
    CumulativeStock,
}

/// How the Annual-Flow policy defines "pending".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "snake_case")]
pub enum PendingBasis {
    /// Filed in the reference year and still open.
    #[default]
    OpenedInYear,
    /// Filed up to the reference year and not resolved by its end.
    Backlog,
}

/// One of the key columns a metrics row can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyColumn {
    CaseArea,
    Jurisdiction,
    CourtUnit,
}

/// The ordered tuple of columns rows are grouped by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "snake_case")]
pub enum Grouping {
    #[default]
    AreaJurisdiction,
    AreaJurisdictionUnit,
    /// Court unit first; used by pre-aggregated per-unit tables.
    UnitJurisdiction,
}

impl Grouping {
    /// The key columns in display order. The first one receives the `TOTAL` label.
    pub fn columns(&self) -> &'static [KeyColumn] {
        match self {
            Grouping::AreaJurisdiction => &[KeyColumn::CaseArea, KeyColumn::Jurisdiction],
            Grouping::AreaJurisdictionUnit => &[
                KeyColumn::CaseArea,
                KeyColumn::Jurisdiction,
                KeyColumn::CourtUnit,
            ],
            Grouping::UnitJurisdiction => &[KeyColumn::CourtUnit, KeyColumn::Jurisdiction],
        }
    }

    pub fn includes(&self, column: KeyColumn) -> bool {
        self.columns().contains(&column)
    }

    pub fn leading(&self) -> KeyColumn {
        self.columns()[0]
    }
}

use chrono::NaiveDate;
use core_types::{Grouping, PendingBasis, PolicyKind};
use serde::Deserialize;
use std::path::PathBuf;

/// The root configuration structure for the entire application.
///
/// Every section is optional in `config.toml`; omitted sections fall back to
/// the defaults below.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub data: DataSettings,
    pub engine: EngineSettings,
    pub series: SeriesSettings,
    pub logging: LoggingSettings,
}

/// Whether the sources hold one row per case or rows that are already aggregated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    #[default]
    Events,
    Aggregated,
}

/// Where the docket data lives and how its columns are named.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DataSettings {
    pub kind: SourceKind,
    /// CSV files, concatenated in order.
    pub sources: Vec<PathBuf>,
    /// A single ASCII character.
    pub delimiter: String,
    /// `chrono` formats tried in order when parsing date cells.
    pub date_formats: Vec<String>,
    pub schema: SchemaMapping,
    pub aggregate_schema: AggregateSchema,
}

impl DataSettings {
    pub fn delimiter_byte(&self) -> Option<u8> {
        match self.delimiter.as_bytes() {
            [byte] if byte.is_ascii() => Some(*byte),
            _ => None,
        }
    }
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            kind: SourceKind::Events,
            sources: vec![PathBuf::from("uploads/processos.csv")],
            delimiter: ",".to_string(),
            date_formats: vec![
                "%Y-%m-%d".to_string(),
                "%Y-%m-%d %H:%M:%S".to_string(),
                "%d/%m/%Y".to_string(),
                "%d/%m/%Y %H:%M:%S".to_string(),
            ],
            schema: SchemaMapping::default(),
            aggregate_schema: AggregateSchema::default(),
        }
    }
}

/// Header names of the per-case columns.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SchemaMapping {
    pub case_id: String,
    pub jurisdiction: String,
    /// Absent in sources that do not break cases down by registry.
    pub court_unit: Option<String>,
    pub case_area: String,
    pub distribution_date: String,
    pub resolution_date: String,
}

impl Default for SchemaMapping {
    fn default() -> Self {
        Self {
            case_id: "processo".to_string(),
            jurisdiction: "comarca".to_string(),
            court_unit: Some("serventia".to_string()),
            case_area: "nome_area_acao".to_string(),
            distribution_date: "data_distribuicao".to_string(),
            resolution_date: "data_baixa".to_string(),
        }
    }
}

/// Header names of a pre-aggregated table.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AggregateSchema {
    pub year: String,
    pub jurisdiction: String,
    pub case_area: Option<String>,
    pub court_unit: Option<String>,
    pub distributed: String,
    pub resolved: String,
    pub pending: String,
    pub congestion_rate: String,
}

impl Default for AggregateSchema {
    fn default() -> Self {
        Self {
            year: "ano_ref".to_string(),
            jurisdiction: "comarca".to_string(),
            case_area: Some("nome_area_acao".to_string()),
            court_unit: None,
            distributed: "Distribuidos_ano".to_string(),
            resolved: "Baixados_ano".to_string(),
            pending: "Pendentes_ano".to_string(),
            congestion_rate: "Taxa_Cong_anual (%)".to_string(),
        }
    }
}

impl AggregateSchema {
    /// The grouping implied by which key columns the table carries.
    pub fn grouping(&self) -> Grouping {
        match (&self.case_area, &self.court_unit) {
            (Some(_), Some(_)) => Grouping::AreaJurisdictionUnit,
            (Some(_), None) => Grouping::AreaJurisdiction,
            (None, _) => Grouping::UnitJurisdiction,
        }
    }
}

/// Parameters of the statistics engine.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    pub policy: PolicyKind,
    /// Only read by the Annual-Flow policy.
    pub pending_basis: PendingBasis,
    /// Cases filed before this date are ignored by the Cumulative-Stock policy.
    pub window_start: NaiveDate,
    /// Years below this are not offered as reference years.
    pub min_year: i32,
    pub grouping: Grouping,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            policy: PolicyKind::AnnualFlow,
            pending_basis: PendingBasis::OpenedInYear,
            window_start: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap_or_default(),
            min_year: 2020,
            grouping: Grouping::AreaJurisdiction,
        }
    }
}

/// Parameters of the trend series.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SeriesSettings {
    pub start_year: i32,
    /// Case areas plotted when grouping by area. Empty means every area.
    pub areas: Vec<String>,
}

impl Default for SeriesSettings {
    fn default() -> Self {
        Self {
            start_year: 2020,
            areas: [
                "civel",
                "criminal",
                "infancia e juventude civel",
                "infancia e juventude infracional",
                "juizado especial civel",
                "juizado especial criminal",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// An `EnvFilter` directive; `RUST_LOG` takes precedence.
    pub level: String,
    /// When set, logs are also written to a daily rolling file here.
    pub directory: Option<PathBuf>,
    pub file_prefix: String,
    pub ansi: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: None,
            file_prefix: "jurimetria.log".to_string(),
            ansi: true,
        }
    }
}

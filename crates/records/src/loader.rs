use crate::error::LoadError;
use crate::parse::{is_blank, parse_count, parse_date, parse_rate, parse_year};
use crate::store::{AggregateStore, RecordStore};
use configuration::{AggregateSchema, DataSettings, SchemaMapping, SourceKind};
use core_types::{AggregateRow, CaseRecord};
use csv::{ReaderBuilder, StringRecord};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Whatever the configured sources held, ready for querying.
#[derive(Debug, Clone)]
pub enum Dataset {
    Events(RecordStore),
    Aggregated(AggregateStore),
}

impl Dataset {
    /// A dataset with no rows, used when loading failed.
    pub fn empty(kind: SourceKind) -> Self {
        match kind {
            SourceKind::Events => Dataset::Events(RecordStore::empty()),
            SourceKind::Aggregated => Dataset::Aggregated(AggregateStore::empty()),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Dataset::Events(store) => store.len(),
            Dataset::Aggregated(store) => store.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Loads every configured source according to `settings.kind`.
pub fn load_dataset(settings: &DataSettings) -> Result<Dataset, LoadError> {
    match settings.kind {
        SourceKind::Events => load_events(settings).map(Dataset::Events),
        SourceKind::Aggregated => load_aggregates(settings).map(Dataset::Aggregated),
    }
}

/// Loads per-case records from every source into one store.
pub fn load_events(settings: &DataSettings) -> Result<RecordStore, LoadError> {
    let mut records = Vec::new();
    for path in &settings.sources {
        let reader = open_source(path)?;
        records.extend(read_events(reader, settings, path)?);
    }
    let store = RecordStore::new(records);
    tracing::info!(records = store.len(), sources = settings.sources.len(), "Docket records loaded.");
    Ok(store)
}

/// Loads pre-aggregated rows from every source into one store.
pub fn load_aggregates(settings: &DataSettings) -> Result<AggregateStore, LoadError> {
    let mut rows = Vec::new();
    for path in &settings.sources {
        let reader = open_source(path)?;
        rows.extend(read_aggregates(reader, settings, path)?);
    }
    let store = AggregateStore::new(rows);
    tracing::info!(rows = store.len(), sources = settings.sources.len(), "Aggregated rows loaded.");
    Ok(store)
}

fn delimiter(settings: &DataSettings) -> Result<u8, LoadError> {
    settings.delimiter_byte().ok_or_else(|| {
        LoadError::InvalidSettings(format!(
            "delimiter must be a single ASCII character, got '{}'",
            settings.delimiter
        ))
    })
}

fn reader_builder(settings: &DataSettings) -> Result<ReaderBuilder, LoadError> {
    let mut builder = ReaderBuilder::new();
    builder
        .delimiter(delimiter(settings)?)
        .has_headers(true)
        .flexible(true);
    Ok(builder)
}

fn open_source(path: &Path) -> Result<File, LoadError> {
    tracing::debug!(path = %path.display(), "Opening docket source.");
    File::open(path).map_err(|source| LoadError::Unreadable {
        path: path.to_path_buf(),
        source,
    })
}

/// Positions of configured columns inside one file's header row.
struct Header {
    names: Vec<String>,
}

impl Header {
    fn read<R: Read>(reader: &mut csv::Reader<R>, path: &Path) -> Result<Self, LoadError> {
        let headers = reader.headers().map_err(|source| LoadError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
        let names = headers
            .iter()
            .map(|name| name.trim_start_matches('\u{feff}').trim().to_ascii_lowercase())
            .collect();
        Ok(Self { names })
    }

    /// Exact match after trimming and ASCII case folding.
    fn find(&self, column: &str) -> Option<usize> {
        let wanted = column.trim().to_ascii_lowercase();
        self.names.iter().position(|name| *name == wanted)
    }
}

/// Resolves configured columns, collecting every missing required name so a
/// file fails once with the full list.
struct Resolver<'h> {
    header: &'h Header,
    missing: Vec<String>,
}

impl<'h> Resolver<'h> {
    fn new(header: &'h Header) -> Self {
        Self {
            header,
            missing: Vec::new(),
        }
    }

    fn required(&mut self, column: &str) -> Option<usize> {
        let index = self.header.find(column);
        if index.is_none() {
            self.missing.push(column.to_string());
        }
        index
    }

    fn optional(&self, column: Option<&String>, path: &Path) -> Option<usize> {
        let column = column?;
        let index = self.header.find(column);
        if index.is_none() {
            tracing::warn!(path = %path.display(), column = %column, "Optional column not found; treating as absent.");
        }
        index
    }

    fn into_error(self, path: &Path) -> LoadError {
        LoadError::MissingColumns {
            path: path.to_path_buf(),
            columns: self.missing,
        }
    }
}

struct EventColumns {
    case_id: usize,
    jurisdiction: usize,
    court_unit: Option<usize>,
    case_area: usize,
    distribution_date: usize,
    resolution_date: usize,
}

impl EventColumns {
    fn resolve(header: &Header, schema: &SchemaMapping, path: &Path) -> Result<Self, LoadError> {
        let mut resolver = Resolver::new(header);
        let case_id = resolver.required(&schema.case_id);
        let jurisdiction = resolver.required(&schema.jurisdiction);
        let court_unit = resolver.optional(schema.court_unit.as_ref(), path);
        let case_area = resolver.required(&schema.case_area);
        let distribution_date = resolver.required(&schema.distribution_date);
        let resolution_date = resolver.required(&schema.resolution_date);

        let (
            Some(case_id),
            Some(jurisdiction),
            Some(case_area),
            Some(distribution_date),
            Some(resolution_date),
        ) = (case_id, jurisdiction, case_area, distribution_date, resolution_date)
        else {
            return Err(resolver.into_error(path));
        };
        Ok(Self {
            case_id,
            jurisdiction,
            court_unit,
            case_area,
            distribution_date,
            resolution_date,
        })
    }
}

fn cell(row: &StringRecord, index: usize) -> &str {
    row.get(index).unwrap_or_default()
}

/// Reads per-case rows from any CSV reader.
///
/// Unparseable dates become absent and are counted in a single warning per
/// source; the row itself is kept.
pub fn read_events<R: Read>(
    reader: R,
    settings: &DataSettings,
    path: &Path,
) -> Result<Vec<CaseRecord>, LoadError> {
    let mut reader = reader_builder(settings)?.from_reader(reader);
    let header = Header::read(&mut reader, path)?;
    let columns = EventColumns::resolve(&header, &settings.schema, path)?;

    let mut records = Vec::new();
    let mut bad_distribution = 0usize;
    let mut bad_resolution = 0usize;

    for row in reader.records() {
        let row = row.map_err(|source| LoadError::Csv {
            path: path.to_path_buf(),
            source,
        })?;

        let raw_distribution = cell(&row, columns.distribution_date);
        let distribution_date = parse_date(raw_distribution, &settings.date_formats);
        if distribution_date.is_none() && !is_blank(raw_distribution) {
            bad_distribution += 1;
        }

        let raw_resolution = cell(&row, columns.resolution_date);
        let resolution_date = parse_date(raw_resolution, &settings.date_formats);
        if resolution_date.is_none() && !is_blank(raw_resolution) {
            bad_resolution += 1;
        }

        let mut record = CaseRecord::new(
            cell(&row, columns.case_id).trim(),
            cell(&row, columns.jurisdiction).trim(),
            cell(&row, columns.case_area).trim(),
            distribution_date,
            resolution_date,
        );
        if let Some(index) = columns.court_unit {
            let unit = cell(&row, index).trim();
            if !is_blank(unit) {
                record = record.with_court_unit(unit);
            }
        }
        records.push(record);
    }

    if bad_distribution > 0 || bad_resolution > 0 {
        tracing::warn!(
            path = %path.display(),
            bad_distribution,
            bad_resolution,
            "Unparseable dates were treated as absent."
        );
    }
    tracing::debug!(path = %path.display(), rows = records.len(), "Read docket source.");

    Ok(records)
}

struct AggregateColumns {
    year: usize,
    jurisdiction: usize,
    case_area: Option<usize>,
    court_unit: Option<usize>,
    distributed: usize,
    resolved: usize,
    pending: usize,
    congestion_rate: Option<usize>,
}

impl AggregateColumns {
    fn resolve(header: &Header, schema: &AggregateSchema, path: &Path) -> Result<Self, LoadError> {
        let mut resolver = Resolver::new(header);
        let year = resolver.required(&schema.year);
        let jurisdiction = resolver.required(&schema.jurisdiction);
        let case_area = resolver.optional(schema.case_area.as_ref(), path);
        let court_unit = resolver.optional(schema.court_unit.as_ref(), path);
        let distributed = resolver.required(&schema.distributed);
        let resolved = resolver.required(&schema.resolved);
        let pending = resolver.required(&schema.pending);
        let congestion_rate = resolver.optional(Some(&schema.congestion_rate), path);

        if case_area.is_none() && court_unit.is_none() {
            let wanted: Vec<String> = schema
                .case_area
                .iter()
                .chain(schema.court_unit.iter())
                .cloned()
                .collect();
            resolver.missing.push(wanted.join(" or "));
        }
        if !resolver.missing.is_empty() {
            return Err(resolver.into_error(path));
        }

        let (Some(year), Some(jurisdiction), Some(distributed), Some(resolved), Some(pending)) =
            (year, jurisdiction, distributed, resolved, pending)
        else {
            return Err(resolver.into_error(path));
        };
        Ok(Self {
            year,
            jurisdiction,
            case_area,
            court_unit,
            distributed,
            resolved,
            pending,
            congestion_rate,
        })
    }
}

/// Reads pre-aggregated rows from any CSV reader.
///
/// Rows without a parseable year are skipped; unparseable counts read as zero
/// and unparseable rates as absent.
pub fn read_aggregates<R: Read>(
    reader: R,
    settings: &DataSettings,
    path: &Path,
) -> Result<Vec<AggregateRow>, LoadError> {
    let mut reader = reader_builder(settings)?.from_reader(reader);
    let header = Header::read(&mut reader, path)?;
    let columns = AggregateColumns::resolve(&header, &settings.aggregate_schema, path)?;

    let optional_text = |row: &StringRecord, index: Option<usize>| {
        index
            .map(|index| cell(row, index).trim())
            .filter(|value| !is_blank(value))
            .map(String::from)
    };

    let mut rows = Vec::new();
    let mut skipped = 0usize;
    for row in reader.records() {
        let row = row.map_err(|source| LoadError::Csv {
            path: path.to_path_buf(),
            source,
        })?;

        let Some(year) = parse_year(cell(&row, columns.year)) else {
            skipped += 1;
            continue;
        };

        rows.push(AggregateRow {
            year,
            jurisdiction: cell(&row, columns.jurisdiction).trim().to_string(),
            case_area: optional_text(&row, columns.case_area),
            court_unit: optional_text(&row, columns.court_unit),
            distributed: parse_count(cell(&row, columns.distributed)).unwrap_or(0),
            resolved: parse_count(cell(&row, columns.resolved)).unwrap_or(0),
            pending: parse_count(cell(&row, columns.pending)).unwrap_or(0),
            congestion_rate: columns
                .congestion_rate
                .and_then(|index| parse_rate(cell(&row, index))),
        });
    }

    if skipped > 0 {
        tracing::warn!(path = %path.display(), skipped, "Rows without a valid year were skipped.");
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn settings() -> DataSettings {
        DataSettings::default()
    }

    #[test]
    fn reads_events_with_case_insensitive_headers() {
        let csv = "\
Processo,COMARCA,serventia,nome_area_acao,data_distribuicao,data_baixa
1,GOIANIRA,1a Vara,civel,2021-03-01,2021-09-10
2,GOIANIRA,,criminal,15/04/2021,null
3,GOIANIRA,1a Vara,civel,not a date,
";
        let records = read_events(csv.as_bytes(), &settings(), Path::new("mem.csv")).unwrap();
        assert_eq!(records.len(), 3);

        assert_eq!(records[0].court_unit(), Some("1a Vara"));
        assert_eq!(records[0].resolution_year(), Some(2021));

        assert_eq!(records[1].court_unit(), None);
        assert_eq!(records[1].distribution_date(), NaiveDate::from_ymd_opt(2021, 4, 15));
        assert!(records[1].is_open());

        assert_eq!(records[2].distribution_date(), None);
    }

    #[test]
    fn missing_columns_are_reported_together() {
        let csv = "processo,comarca\n1,X\n";
        let err = read_events(csv.as_bytes(), &settings(), Path::new("mem.csv")).unwrap_err();
        match err {
            LoadError::MissingColumns { columns, .. } => {
                assert_eq!(
                    columns,
                    ["nome_area_acao", "data_distribuicao", "data_baixa"]
                );
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn reads_aggregates_and_coerces_cells() {
        let csv = "\
ano_ref,comarca,nome_area_acao,Distribuidos_ano,Baixados_ano,Pendentes_ano,Taxa_Cong_anual (%)
2021.0,X,civel,10,6,4,40.0
2022,X,criminal,abc,2,1,
,X,civel,1,1,1,50
";
        let rows = read_aggregates(csv.as_bytes(), &settings(), Path::new("agg.csv")).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].year, 2021);
        assert_eq!(rows[0].congestion_rate, Some(dec!(40.0)));
        assert_eq!(rows[1].distributed, 0);
        assert_eq!(rows[1].congestion_rate, None);
        assert_eq!(rows[1].court_unit, None);
    }

    #[test]
    fn aggregate_files_report_every_missing_column() {
        let csv = "ano_ref,comarca,Baixados_ano\n2021,X,3\n";
        let err = read_aggregates(csv.as_bytes(), &settings(), Path::new("agg.csv")).unwrap_err();
        match err {
            LoadError::MissingColumns { columns, .. } => {
                assert_eq!(columns, ["Distribuidos_ano", "Pendentes_ano", "nome_area_acao"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn lone_missing_column_is_named() {
        let csv = "processo,comarca,nome_area_acao,data_distribuicao\n";
        let err = read_events(csv.as_bytes(), &settings(), Path::new("mem.csv")).unwrap_err();
        assert!(matches!(
            err,
            LoadError::MissingColumns { ref columns, .. } if columns == &["data_baixa"]
        ));
    }

    #[test]
    fn semicolon_delimiter() {
        let mut settings = settings();
        settings.delimiter = ";".to_string();
        let csv = "processo;comarca;nome_area_acao;data_distribuicao;data_baixa\n9;Y;civel;2020-01-02;\n";
        let records = read_events(csv.as_bytes(), &settings, Path::new("semi.csv")).unwrap();
        assert_eq!(records[0].jurisdiction(), "Y");
        assert_eq!(records[0].court_unit(), None);
    }
}

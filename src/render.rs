use analytics::MetricsTable;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, ContentArrangement, Table};
use core_types::{GroupedMetric, KeyColumn};
use rust_decimal::Decimal;
use timeseries::TimeSeries;

const COUNT_HEADERS: [&str; 4] = [
    "Distribuídos",
    "Baixados",
    "Pendentes",
    "Taxa de Congestionamento (%)",
];

fn column_header(column: KeyColumn) -> &'static str {
    match column {
        KeyColumn::CaseArea => "Área de Ação",
        KeyColumn::Jurisdiction => "Comarca",
        KeyColumn::CourtUnit => "Serventia",
    }
}

fn base_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn number(value: u64) -> Cell {
    Cell::new(value).set_alignment(CellAlignment::Right)
}

fn rate(value: Decimal) -> Cell {
    Cell::new(format!("{value:.2}")).set_alignment(CellAlignment::Right)
}

fn metric_cells(metric: &GroupedMetric, columns: &[KeyColumn]) -> Vec<Cell> {
    let mut cells: Vec<Cell> = columns
        .iter()
        .map(|&column| Cell::new(metric.key.value(column).unwrap_or_default()))
        .collect();
    cells.extend([
        number(metric.distributed),
        number(metric.resolved),
        number(metric.pending),
        rate(metric.congestion_rate),
    ]);
    cells
}

/// The metrics table with its totals row in bold.
pub fn metrics(table: &MetricsTable) -> Table {
    let columns = table.grouping().columns();
    let mut out = base_table();
    out.set_header(
        columns
            .iter()
            .map(|&column| column_header(column))
            .chain(COUNT_HEADERS),
    );
    for row in table.rows() {
        out.add_row(metric_cells(row, columns));
    }
    if let Some(total) = table.total() {
        out.add_row(
            metric_cells(total, columns)
                .into_iter()
                .map(|cell| cell.add_attribute(Attribute::Bold)),
        );
    }
    out
}

/// One row per series point.
pub fn series(series: &TimeSeries) -> Table {
    let leading = series.scope.grouping().leading();
    let mut out = base_table();
    out.set_header(
        [column_header(leading), "Ano"]
            .into_iter()
            .chain(COUNT_HEADERS),
    );
    for point in &series.points {
        out.add_row(vec![
            Cell::new(&point.group),
            Cell::new(point.year),
            number(point.distributed),
            number(point.resolved),
            number(point.pending),
            rate(point.congestion_rate),
        ]);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::{GroupKey, Grouping, Tally};

    #[test]
    fn renders_headers_rows_and_total() {
        let row = GroupedMetric::from_tally(
            GroupKey {
                case_area: Some("civel".into()),
                jurisdiction: "GOIANIRA".into(),
                court_unit: None,
            },
            Tally { distributed: 10, resolved: 6, pending: 4 },
        );
        let table = MetricsTable::from_rows(Grouping::AreaJurisdiction, vec![row]);
        let text = metrics(&table).to_string();

        assert!(text.contains("Área de Ação"));
        assert!(text.contains("Taxa de Congestionamento (%)"));
        assert!(text.contains("GOIANIRA"));
        assert!(text.contains("40.00"));
        assert!(text.contains("TOTAL"));
        assert!(!text.contains("Serventia"));
    }
}

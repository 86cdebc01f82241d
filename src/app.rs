use analytics::{AggregateEngine, MetricsTable, StatisticsEngine, StatisticsSource};
use configuration::Config;
use core_types::Grouping;
use policies::create_policy;
use records::Dataset;
use std::sync::Arc;
use timeseries::{default_range, AreaFilter, SeriesBuilder, SeriesError, SeriesScope, TimeSeries};

/// The engine matching the loaded dataset.
#[derive(Debug)]
pub enum Statistics {
    Events(StatisticsEngine),
    Aggregated(AggregateEngine),
}

/// Loaded data plus the configuration queries are answered under.
#[derive(Debug)]
pub struct App {
    config: Config,
    statistics: Statistics,
    series: SeriesBuilder,
}

impl App {
    pub fn new(config: Config, dataset: Dataset) -> Self {
        let min_year = config.engine.min_year;
        let statistics = match dataset {
            Dataset::Events(store) => Statistics::Events(
                StatisticsEngine::new(Arc::new(store), create_policy(&config.engine))
                    .with_grouping(config.engine.grouping)
                    .with_min_year(min_year),
            ),
            Dataset::Aggregated(store) => Statistics::Aggregated(
                AggregateEngine::new(Arc::new(store), config.data.aggregate_schema.grouping())
                    .with_min_year(min_year),
            ),
        };
        let series = SeriesBuilder::new(AreaFilter::new(&config.series.areas));
        Self {
            config,
            statistics,
            series,
        }
    }

    pub fn source(&self) -> &dyn StatisticsSource {
        match &self.statistics {
            Statistics::Events(engine) => engine,
            Statistics::Aggregated(engine) => engine,
        }
    }

    /// The requested jurisdiction if it exists, otherwise the first available one.
    pub fn resolve_jurisdiction(&self, requested: Option<&str>) -> Option<String> {
        let available = self.source().available_jurisdictions();
        if let Some(name) = requested {
            if available.iter().any(|j| j == name) {
                return Some(name.to_string());
            }
            tracing::warn!(requested = name, "Unknown jurisdiction, using the first available.");
        }
        available.into_iter().next()
    }

    /// The requested year, or the latest one available.
    pub fn resolve_year(&self, requested: Option<i32>) -> Option<i32> {
        requested.or_else(|| self.source().available_years().last().copied())
    }

    /// A metrics table. `grouping` only applies to event data; aggregated
    /// tables keep the grouping their columns define.
    pub fn table(&self, jurisdiction: &str, year: i32, grouping: Option<Grouping>) -> MetricsTable {
        match &self.statistics {
            Statistics::Events(engine) => engine.compute(
                jurisdiction,
                year,
                grouping.unwrap_or(self.config.engine.grouping),
            ),
            Statistics::Aggregated(engine) => {
                if grouping.is_some_and(|g| g != engine.grouping()) {
                    tracing::warn!(
                        grouping = ?engine.grouping(),
                        "Aggregated data keeps the grouping of its columns."
                    );
                }
                engine.compute(jurisdiction, year)
            }
        }
    }

    /// A trend from `from` (default: configured start year) through `to`
    /// (default: latest year in the data).
    pub fn series(
        &self,
        scope: &SeriesScope,
        from: Option<i32>,
        to: Option<i32>,
    ) -> Result<TimeSeries, SeriesError> {
        let start = from.unwrap_or(self.config.series.start_year);
        let years = match to {
            Some(end) => start..=end,
            None => default_range(start, self.latest_year())
                .ok_or(SeriesError::InsufficientData { found: 0 })?,
        };
        match &self.statistics {
            Statistics::Events(engine) => {
                self.series
                    .from_events(engine.store(), engine.policy(), scope, years)
            }
            Statistics::Aggregated(engine) => {
                self.series.from_aggregates(engine.store(), scope, years)
            }
        }
    }

    fn latest_year(&self) -> Option<i32> {
        match &self.statistics {
            Statistics::Events(engine) => engine.store().latest_year(),
            Statistics::Aggregated(engine) => engine.store().latest_year(),
        }
    }
}

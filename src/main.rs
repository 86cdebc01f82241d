mod app;
mod render;

use app::App;
use clap::{Args, Parser, Subcommand, ValueEnum};
use configuration::{init_logging, load_config, SourceKind};
use core_types::{Grouping, PendingBasis, PolicyKind};
use records::{load_dataset, Dataset};
use std::path::PathBuf;
use timeseries::SeriesScope;

/// The main entry point for the Jurimetria docket statistics tool.
fn main() -> anyhow::Result<()> {
    // .env may carry JURIMETRIA__* overrides; it is optional.
    dotenvy::dotenv().ok();

    // Parse command-line arguments
    let cli = Cli::parse();

    let mut config = load_config(cli.config.as_deref())?;
    cli.overrides.apply(&mut config);

    // Keep the guard alive so the file writer flushes on exit.
    let _log_guard = init_logging(&config.logging)?;

    let dataset = match load_dataset(&config.data) {
        Ok(dataset) => dataset,
        Err(e) => {
            // Queries still answer, with empty results.
            tracing::error!(error = %e, "Failed to load docket data.");
            Dataset::empty(config.data.kind)
        }
    };
    let app = App::new(config, dataset);

    // Execute the appropriate command
    match cli.command {
        Commands::Jurisdictions => {
            for name in app.source().available_jurisdictions() {
                println!("{name}");
            }
        }
        Commands::Years => {
            for year in app.source().available_years() {
                println!("{year}");
            }
        }
        Commands::Stats(args) => handle_stats(&app, args)?,
        Commands::Series(args) => handle_series(&app, args)?,
    }
    Ok(())
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Docket congestion statistics for court jurisdictions.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file. Defaults to ./config.toml when present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(flatten)]
    overrides: Overrides,

    #[command(subcommand)]
    command: Commands,
}

/// Command-line overrides applied on top of the configuration file.
#[derive(Args)]
struct Overrides {
    /// Data source file; repeat for several. Replaces the configured sources.
    #[arg(long = "data", global = true)]
    sources: Vec<PathBuf>,

    /// Whether the sources hold one row per case or pre-aggregated rows.
    #[arg(long, global = true, value_enum)]
    source_kind: Option<SourceKind>,

    #[arg(long, global = true, value_enum)]
    policy: Option<PolicyKind>,

    /// Definition of "pending" under the annual-flow policy.
    #[arg(long, global = true, value_enum)]
    pending_basis: Option<PendingBasis>,
}

impl Overrides {
    fn apply(self, config: &mut configuration::Config) {
        if !self.sources.is_empty() {
            config.data.sources = self.sources;
        }
        if let Some(kind) = self.source_kind {
            config.data.kind = kind;
        }
        if let Some(policy) = self.policy {
            config.engine.policy = policy;
        }
        if let Some(basis) = self.pending_basis {
            config.engine.pending_basis = basis;
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// List the jurisdictions present in the data.
    Jurisdictions,
    /// List the reference years present in the data.
    Years,
    /// Print the metrics table of one jurisdiction and year.
    Stats(StatsArgs),
    /// Print the congestion-rate trend of one jurisdiction.
    Series(SeriesArgs),
}

#[derive(Clone, Copy, Default, ValueEnum)]
enum OutputFormat {
    #[default]
    Table,
    Json,
}

#[derive(Parser)]
struct StatsArgs {
    /// Defaults to the first jurisdiction in the data.
    #[arg(long)]
    jurisdiction: Option<String>,

    /// Defaults to the latest year in the data.
    #[arg(long)]
    year: Option<i32>,

    #[arg(long, value_enum)]
    grouping: Option<Grouping>,

    #[arg(long, value_enum, default_value_t)]
    format: OutputFormat,
}

#[derive(Parser)]
struct SeriesArgs {
    /// Defaults to the first jurisdiction in the data.
    #[arg(long)]
    jurisdiction: Option<String>,

    /// Restrict the trend to one court unit, one line per case area.
    #[arg(long, conflicts_with = "by_unit")]
    unit: Option<String>,

    /// One line per court unit instead of per case area.
    #[arg(long)]
    by_unit: bool,

    /// First year. Defaults to the configured series start year.
    #[arg(long)]
    from: Option<i32>,

    /// Last year. Defaults to the latest year in the data.
    #[arg(long)]
    to: Option<i32>,

    #[arg(long, value_enum, default_value_t)]
    format: OutputFormat,
}

// ==============================================================================
// Command Logic
// ==============================================================================

fn handle_stats(app: &App, args: StatsArgs) -> anyhow::Result<()> {
    let Some(jurisdiction) = app.resolve_jurisdiction(args.jurisdiction.as_deref()) else {
        println!("No data available.");
        return Ok(());
    };
    let Some(year) = app.resolve_year(args.year) else {
        println!("No reference years available for {jurisdiction}.");
        return Ok(());
    };

    let table = app.table(&jurisdiction, year, args.grouping);
    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&table)?),
        OutputFormat::Table if table.is_empty() => {
            println!("No activity for {jurisdiction} in {year}.");
        }
        OutputFormat::Table => {
            println!("{jurisdiction} - {year}");
            println!("{}", render::metrics(&table));
        }
    }
    Ok(())
}

fn handle_series(app: &App, args: SeriesArgs) -> anyhow::Result<()> {
    let Some(jurisdiction) = app.resolve_jurisdiction(args.jurisdiction.as_deref()) else {
        println!("No data available.");
        return Ok(());
    };
    let scope = match (args.unit, args.by_unit) {
        (Some(court_unit), _) => SeriesScope::UnitAreas {
            jurisdiction,
            court_unit,
        },
        (None, true) => SeriesScope::Units { jurisdiction },
        (None, false) => SeriesScope::Areas { jurisdiction },
    };

    match app.series(&scope, args.from, args.to) {
        Ok(series) => match args.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&series)?),
            OutputFormat::Table => println!("{}", render::series(&series)),
        },
        // Not a failure: the presentation layer just has no trend to show.
        Err(e @ timeseries::SeriesError::InsufficientData { .. }) => println!("{e}"),
        Err(e) => return Err(e.into()),
    }
    Ok(())
}

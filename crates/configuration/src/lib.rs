use crate::error::ConfigError;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod logging;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use logging::init_logging;
pub use settings::{
    AggregateSchema, Config, DataSettings, EngineSettings, LoggingSettings, SchemaMapping,
    SeriesSettings, SourceKind,
};

/// Default file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

/// Prefix of environment variables overriding file values, e.g.
/// `JURIMETRIA__ENGINE__POLICY=cumulative_stock`.
pub const ENV_PREFIX: &str = "JURIMETRIA";

/// Loads and validates the application configuration.
///
/// With no explicit path, `config.toml` is read if it exists and the built-in
/// defaults are used otherwise. An explicit path must exist. Environment
/// variables prefixed with `JURIMETRIA__` override file values.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let file = match path {
        Some(path) => config::File::from(path).required(true),
        None => config::File::with_name(DEFAULT_CONFIG_FILE).required(false),
    };

    let builder = config::Config::builder()
        .add_source(file)
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("data.sources")
                .with_list_parse_key("data.date_formats")
                .with_list_parse_key("series.areas"),
        )
        .build()?;

    // Attempt to deserialize the entire configuration into our `Config` struct
    let config = builder.try_deserialize::<Config>()?;
    config.validate()?;

    Ok(config)
}

impl Config {
    /// Rejects settings the loaders and engines cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let data = &self.data;
        if data.sources.is_empty() {
            return Err(ConfigError::ValidationError(
                "data.sources must list at least one file".to_string(),
            ));
        }
        if data.delimiter_byte().is_none() {
            return Err(ConfigError::ValidationError(format!(
                "data.delimiter must be a single ASCII character, got '{}'",
                data.delimiter
            )));
        }
        if data.date_formats.is_empty() {
            return Err(ConfigError::ValidationError(
                "data.date_formats must not be empty".to_string(),
            ));
        }

        let schema = &data.schema;
        let columns = [
            ("data.schema.case_id", Some(&schema.case_id)),
            ("data.schema.jurisdiction", Some(&schema.jurisdiction)),
            ("data.schema.court_unit", schema.court_unit.as_ref()),
            ("data.schema.case_area", Some(&schema.case_area)),
            ("data.schema.distribution_date", Some(&schema.distribution_date)),
            ("data.schema.resolution_date", Some(&schema.resolution_date)),
        ];
        ensure_named(&columns)?;

        let aggregate = &data.aggregate_schema;
        let columns = [
            ("data.aggregate_schema.year", Some(&aggregate.year)),
            ("data.aggregate_schema.jurisdiction", Some(&aggregate.jurisdiction)),
            ("data.aggregate_schema.case_area", aggregate.case_area.as_ref()),
            ("data.aggregate_schema.court_unit", aggregate.court_unit.as_ref()),
            ("data.aggregate_schema.distributed", Some(&aggregate.distributed)),
            ("data.aggregate_schema.resolved", Some(&aggregate.resolved)),
            ("data.aggregate_schema.pending", Some(&aggregate.pending)),
            ("data.aggregate_schema.congestion_rate", Some(&aggregate.congestion_rate)),
        ];
        ensure_named(&columns)?;
        if aggregate.case_area.is_none() && aggregate.court_unit.is_none() {
            return Err(ConfigError::ValidationError(
                "data.aggregate_schema needs a case_area or a court_unit column".to_string(),
            ));
        }

        Ok(())
    }
}

fn ensure_named(columns: &[(&str, Option<&String>)]) -> Result<(), ConfigError> {
    for (key, name) in columns {
        if let Some(name) = name {
            if name.trim().is_empty() {
                return Err(ConfigError::ValidationError(format!("{key} must not be blank")));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::{Grouping, PendingBasis, PolicyKind};
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .expect("temp file");
        file.write_all(contents.as_bytes()).expect("write config");
        file
    }

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.engine.policy, PolicyKind::AnnualFlow);
        assert_eq!(config.engine.min_year, 2020);
        assert_eq!(config.series.areas.len(), 6);
    }

    #[test]
    fn reads_partial_file_over_defaults() {
        let file = write_config(
            r#"
            [engine]
            policy = "cumulative_stock"
            pending_basis = "backlog"
            window_start = "2019-01-01"
            grouping = "area_jurisdiction_unit"

            [series]
            areas = []
            "#,
        );

        let config = load_config(Some(file.path())).expect("config loads");
        assert_eq!(config.engine.policy, PolicyKind::CumulativeStock);
        assert_eq!(config.engine.pending_basis, PendingBasis::Backlog);
        assert_eq!(config.engine.grouping, Grouping::AreaJurisdictionUnit);
        assert_eq!(
            config.engine.window_start,
            chrono::NaiveDate::from_ymd_opt(2019, 1, 1).unwrap()
        );
        assert!(config.series.areas.is_empty());
        assert_eq!(config.data.schema.jurisdiction, "comarca");
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let result = load_config(Some(Path::new("/definitely/not/here.toml")));
        assert!(matches!(result, Err(ConfigError::LoadError(_))));
    }

    #[test]
    fn rejects_multi_character_delimiter() {
        let mut config = Config::default();
        config.data.delimiter = ";;".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn rejects_blank_column_names() {
        let mut config = Config::default();
        config.data.schema.case_area = "  ".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn aggregate_schema_needs_a_group_column() {
        let mut config = Config::default();
        config.data.aggregate_schema.case_area = None;
        config.data.aggregate_schema.court_unit = None;
        assert!(config.validate().is_err());
    }

    #[test]
    fn aggregate_grouping_follows_key_columns() {
        let mut schema = Config::default().data.aggregate_schema;
        assert_eq!(schema.grouping(), Grouping::AreaJurisdiction);
        schema.court_unit = Some("serventia".to_string());
        assert_eq!(schema.grouping(), Grouping::AreaJurisdictionUnit);
        schema.case_area = None;
        assert_eq!(schema.grouping(), Grouping::UnitJurisdiction);
    }
}

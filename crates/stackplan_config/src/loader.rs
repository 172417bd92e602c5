//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::RunConfig;
use std::path::Path;

/// Name of the configuration file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "stackplan.toml";

/// Loads and validates a configuration file.
pub fn load_config(path: &Path) -> Result<RunConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    load_config_from_str(&content)
}

/// Loads `<dir>/stackplan.toml` if it exists, otherwise returns the defaults.
pub fn load_or_default(dir: &Path) -> Result<RunConfig, ConfigError> {
    let path = dir.join(CONFIG_FILE_NAME);
    if path.is_file() {
        load_config(&path)
    } else {
        Ok(RunConfig::default())
    }
}

/// Parses and validates a configuration from a string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_config_from_str(content: &str) -> Result<RunConfig, ConfigError> {
    let config: RunConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Checks that every value is usable by the placer and annealer.
pub fn validate_config(config: &RunConfig) -> Result<(), ConfigError> {
    let invalid = |msg: &str| Err(ConfigError::ValidationError(msg.to_string()));

    let anneal = &config.anneal;
    if !(anneal.cooling_rate > 0.0 && anneal.cooling_rate < 1.0) {
        return invalid("anneal.cooling_rate must be in (0, 1)");
    }
    if !(anneal.initial_temperature > 0.0) {
        return invalid("anneal.initial_temperature must be positive");
    }
    if !(anneal.min_temperature >= 0.0) {
        return invalid("anneal.min_temperature must not be negative");
    }
    if anneal.max_placement_attempts_per_move == 0 {
        return invalid("anneal.max_placement_attempts_per_move must be at least 1");
    }

    if config.sample.layers == 0 {
        return invalid("sample.layers must be at least 1");
    }
    if config.sample.floorplan_size == 0 {
        return invalid("sample.floorplan_size must be at least 1");
    }

    let energy = &config.energy;
    if !(energy.area_weight >= 0.0 && energy.wire_weight >= 0.0) {
        return invalid("energy weights must not be negative");
    }

    if config.output.results_csv.is_empty() {
        return invalid("output.results_csv must not be empty");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config = load_config_from_str("").unwrap();
        assert_eq!(config, RunConfig::default());
    }

    #[test]
    fn parse_full_config() {
        let toml = r#"
[sample]
num_blocks = 8
layers = 2
connections_per_block = 2
floorplan_size = 60

[anneal]
initial_temperature = 500.0
cooling_rate = 0.01
min_temperature = 0.5
max_iterations = 2000
max_placement_attempts_per_move = 50

[energy]
area_weight = 2.0
wire_weight = 0.5

[output]
results_csv = "runs.csv"
image_dir = "out/images"
seed = 42
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.sample.num_blocks, 8);
        assert_eq!(config.sample.floorplan_size, 60);
        assert_eq!(config.anneal.max_iterations, 2000);
        assert_eq!(config.anneal.max_placement_attempts_per_move, 50);
        assert_eq!(config.energy.area_weight, 2.0);
        assert_eq!(config.output.results_csv, "runs.csv");
        assert_eq!(config.output.seed, Some(42));
    }

    #[test]
    fn partial_section_keeps_other_defaults() {
        let config = load_config_from_str("[anneal]\ncooling_rate = 0.05\n").unwrap();
        assert_eq!(config.anneal.cooling_rate, 0.05);
        assert_eq!(config.anneal.initial_temperature, 1000.0);
        assert_eq!(config.sample.num_blocks, 20);
    }

    #[test]
    fn cooling_rate_out_of_range_errors() {
        for rate in ["0.0", "1.0", "-0.2"] {
            let toml = format!("[anneal]\ncooling_rate = {rate}\n");
            let err = load_config_from_str(&toml).unwrap_err();
            assert!(matches!(err, ConfigError::ValidationError(_)));
        }
    }

    #[test]
    fn zero_layers_errors() {
        let err = load_config_from_str("[sample]\nlayers = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn zero_attempts_errors() {
        let err =
            load_config_from_str("[anneal]\nmax_placement_attempts_per_move = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn negative_weight_errors() {
        let err = load_config_from_str("[energy]\nwire_weight = -1.0\n").unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn invalid_toml_errors() {
        let err = load_config_from_str("this is not valid toml {{{}}}").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn io_error_from_missing_file() {
        let err = load_config(Path::new("/nonexistent/dir/stackplan.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::IoError(_)));
    }

    #[test]
    fn load_or_default_without_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_or_default(dir.path()).unwrap();
        assert_eq!(config, RunConfig::default());
    }

    #[test]
    fn load_or_default_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "[sample]\nlayers = 5\n").unwrap();
        let config = load_or_default(dir.path()).unwrap();
        assert_eq!(config.sample.layers, 5);
    }
}

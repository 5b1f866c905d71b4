//! Loading of world parameters from an optional TOML file.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use ascii_city_world::WorldConfig;
use thiserror::Error;

/// Failures raised while reading a configuration file.
#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config file {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The file is not a valid world configuration.
    #[error("failed to parse config file {}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Reads a world configuration; fields missing from the file keep their defaults.
pub(crate) fn load_file(path: &Path) -> Result<WorldConfig, ConfigError> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse(&text, path)
}

fn parse(text: &str, path: &Path) -> Result<WorldConfig, ConfigError> {
    toml::from_str(text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let config = parse(
            "starting_cash = 250.0\nseeded_houses = 4\n",
            Path::new("city.toml"),
        )
        .expect("valid config");

        assert_eq!(config.starting_cash, 250.0);
        assert_eq!(config.seeded_houses, 4);
        assert_eq!(config.rng_seed, WorldConfig::default().rng_seed);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let error = parse("wave_count = 3\n", Path::new("city.toml"))
            .expect_err("unknown field must fail");

        assert!(matches!(error, ConfigError::Parse { .. }));
        assert_eq!(error.to_string(), "failed to parse config file city.toml");
    }

    #[test]
    fn missing_file_reports_path() {
        let error = load_file(Path::new("/nonexistent/ascii-city.toml"))
            .expect_err("missing file must fail");

        assert!(matches!(error, ConfigError::Read { .. }));
        assert!(error.to_string().contains("/nonexistent/ascii-city.toml"));
    }
}

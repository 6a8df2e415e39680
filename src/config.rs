use crate::integrate::DiscreteIntegral;

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_FUNCTION: &str = "x / (1 + (x^2))";
pub const DEFAULT_INTERVALS: usize = 1000;
pub const DEFAULT_INITIAL_X: f64 = -5.0;
pub const DEFAULT_END_X: f64 = 5.0;
pub const DEFAULT_OUTPUT: &str = "output.png";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("intervals must be positive")]
    NoIntervals,
}

/// Everything one run of the integrator needs. Fields missing from a config
/// file keep their defaults.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IntegralConfig {
    pub function: String,
    pub intervals: usize,
    pub initial_x: f64,
    pub end_x: f64,
    /// Where the chart is written.
    pub output: PathBuf,
}

impl Default for IntegralConfig {
    fn default() -> Self {
        Self {
            function: DEFAULT_FUNCTION.to_string(),
            intervals: DEFAULT_INTERVALS,
            initial_x: DEFAULT_INITIAL_X,
            end_x: DEFAULT_END_X,
            output: PathBuf::from(DEFAULT_OUTPUT),
        }
    }
}

impl IntegralConfig {
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(input)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let input = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&input)
    }

    /// The integrator itself accepts zero intervals; a run configured that
    /// way is rejected here.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.intervals == 0 {
            return Err(ConfigError::NoIntervals);
        }
        Ok(())
    }

    pub fn to_integral(&self) -> DiscreteIntegral {
        DiscreteIntegral::new(
            self.function.clone(),
            self.intervals,
            self.initial_x,
            self.end_x,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_is_the_default_run() {
        let config = IntegralConfig::from_toml_str("").unwrap();
        assert_eq!(config, IntegralConfig::default());
        assert_eq!(config.function, "x / (1 + (x^2))");
        assert_eq!(config.intervals, 1000);
        assert_eq!(config.initial_x, -5.0);
        assert_eq!(config.end_x, 5.0);
        assert_eq!(config.output, PathBuf::from("output.png"));
    }

    #[test]
    fn overrides() {
        let config = IntegralConfig::from_toml_str(
            r#"
            function = "sin(x)"
            intervals = 64
            initial_x = 0.0
            output = "sine.png"
            "#,
        )
        .unwrap();
        assert_eq!(config.function, "sin(x)");
        assert_eq!(config.intervals, 64);
        assert_eq!(config.initial_x, 0.0);
        assert_eq!(config.end_x, 5.0);
        assert_eq!(config.output, PathBuf::from("sine.png"));
        config.validate().unwrap();

        let integral = config.to_integral();
        assert_eq!(integral.function(), "sin(x)");
        assert_eq!(integral.intervals(), 64);
        assert_eq!(integral.initial_x(), 0.0);
        assert_eq!(integral.end_x(), 5.0);
    }

    #[test]
    fn rejects_bad_files() {
        assert!(matches!(
            IntegralConfig::from_toml_str("intervals = -3"),
            Err(ConfigError::Toml(_))
        ));
        assert!(matches!(
            IntegralConfig::from_toml_str("step = 0.1"),
            Err(ConfigError::Toml(_))
        ));
        assert!(matches!(
            IntegralConfig::from_toml_str("intervals = 0").unwrap().validate(),
            Err(ConfigError::NoIntervals)
        ));
        assert!(matches!(
            IntegralConfig::from_file("does/not/exist.toml"),
            Err(ConfigError::Read { .. })
        ));
    }
}

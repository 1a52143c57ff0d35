//! CLI command implementations for Ecosim.

pub(crate) mod run;
pub(crate) mod watch;

mod output;

use clap::{Args, ValueEnum};
use ecosim::{ConfigError, GridError, SimConfig, SimError};
use env_logger::{Builder, Env};
use log::LevelFilter;
use std::error::Error;
use std::fmt;
use std::path::PathBuf;

/// Output format for the `run` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    /// A glyph frame and summary line per turn.
    Text,
    /// One JSON turn report per line.
    Json,
}

/// Options shared by every command that builds an ecosystem.
#[derive(Args, Debug, Clone, Default)]
pub(crate) struct SimArgs {
    /// JSON config file (flags below override it)
    #[arg(short, long)]
    pub(crate) config: Option<PathBuf>,

    /// Grid height (default: 5)
    #[arg(long)]
    pub(crate) rows: Option<u16>,

    /// Grid width (default: 12)
    #[arg(long)]
    pub(crate) cols: Option<u16>,

    /// Random seed (default: random)
    #[arg(short, long)]
    pub(crate) seed: Option<u64>,

    /// Place an entity before populate, e.g. `herbivore@1,1` (repeatable)
    #[arg(long = "spawn", value_name = "KIND@ROW,COL")]
    pub(crate) spawns: Vec<String>,
}

impl SimArgs {
    /// Load the config file (or defaults) and apply flag overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be loaded or the result is
    /// invalid.
    pub(crate) fn build_config(&self) -> Result<SimConfig, CliError> {
        let mut config = match &self.config {
            Some(path) => SimConfig::load(path)?,
            None => SimConfig::default(),
        };

        if let Some(rows) = self.rows {
            config.rows = rows;
        }
        if let Some(cols) = self.cols {
            config.cols = cols;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        config.spawns.extend(self.spawns.iter().cloned());

        config.validate()?;
        Ok(config)
    }
}

/// Initialize the global logger from `RUST_LOG`, falling back to
/// `default_level` (or debug when `verbose`).
pub(crate) fn init_logging(verbose: bool, default_level: LevelFilter) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        default_level
    };

    let env = Env::default().default_filter_or(level.to_string());
    let mut builder = Builder::from_env(env);

    // Only fails if a logger is already set
    let _ = builder.try_init();
}

/// CLI error type.
#[derive(Debug)]
pub(crate) struct CliError {
    message: String,
}

impl CliError {
    /// Create a new CLI error.
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for CliError {}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        Self::new(e.to_string())
    }
}

impl From<GridError> for CliError {
    fn from(e: GridError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<SimError> for CliError {
    fn from(e: SimError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::new(format!("JSON serialization failed: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_flags_override_defaults() {
        let args = SimArgs {
            rows: Some(8),
            seed: Some(3),
            spawns: vec!["predator@0,0".to_string()],
            ..SimArgs::default()
        };
        let config = args.build_config().unwrap();
        assert_eq!((config.rows, config.cols), (8, 12));
        assert_eq!(config.seed, Some(3));
        assert_eq!(config.spawns, vec!["predator@0,0".to_string()]);
    }

    #[test]
    fn test_flags_override_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "rows": 4, "cols": 4, "seed": 1 }}"#).unwrap();

        let args = SimArgs {
            config: Some(file.path().to_path_buf()),
            cols: Some(9),
            ..SimArgs::default()
        };
        let config = args.build_config().unwrap();
        assert_eq!((config.rows, config.cols), (4, 9));
        assert_eq!(config.seed, Some(1));
    }

    #[test]
    fn test_invalid_override_rejected() {
        let args = SimArgs {
            cols: Some(0),
            ..SimArgs::default()
        };
        let err = args.build_config().unwrap_err();
        assert!(err.to_string().contains("1x1"));
    }

    #[test]
    fn test_error_conversions_keep_message() {
        let err = CliError::from(GridError::InvalidEntity("ghost".to_string()));
        assert!(err.to_string().contains("ghost"));
    }
}

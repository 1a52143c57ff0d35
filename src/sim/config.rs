//! Simulation configuration.

use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, GridError, GridResult, KeyDefect};
use crate::world::{Cell, Grid, Kind, Profile, Profiles};

/// Fraction of the grid each kind covers after populate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Densities {
    /// Plant density (default: 0.20).
    pub plant: f64,
    /// Rock density (default: 0.09).
    pub rock: f64,
    /// Tree density (default: 0.09).
    pub tree: f64,
    /// Herbivore density (default: 0.08).
    pub herbivore: f64,
    /// Predator density (default: 0.02).
    pub predator: f64,
}

impl Densities {
    /// All densities zero: populate places nothing.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            plant: 0.0,
            rock: 0.0,
            tree: 0.0,
            herbivore: 0.0,
            predator: 0.0,
        }
    }

    /// Density for a kind.
    #[must_use]
    pub const fn get(&self, kind: Kind) -> f64 {
        match kind {
            Kind::Plant => self.plant,
            Kind::Rock => self.rock,
            Kind::Tree => self.tree,
            Kind::Herbivore => self.herbivore,
            Kind::Predator => self.predator,
        }
    }
}

impl Default for Densities {
    fn default() -> Self {
        Self {
            plant: 0.20,
            rock: 0.09,
            tree: 0.09,
            herbivore: 0.08,
            predator: 0.02,
        }
    }
}

/// One restore action: replenish `kind` at `coefficient` of the grid area.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RestoreRule {
    /// Kind to replenish.
    pub kind: Kind,
    /// Fraction of the grid area to place each turn, rounded up.
    pub coefficient: f64,
}

impl RestoreRule {
    /// Create a new restore rule.
    #[must_use]
    pub const fn new(kind: Kind, coefficient: f64) -> Self {
        Self { kind, coefficient }
    }
}

/// Configuration for a simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Grid height (default: 5).
    pub rows: u16,
    /// Grid width (default: 12).
    pub cols: u16,
    /// RNG seed. A random seed is drawn when absent.
    pub seed: Option<u64>,
    /// Pause between turns in milliseconds (default: 2000).
    pub turn_delay_ms: u64,
    /// Stop after this many turns. Runs until stopped when absent.
    pub max_turns: Option<u64>,
    /// Populate densities.
    pub densities: Densities,
    /// Restore actions, run in order every turn.
    pub restore: Vec<RestoreRule>,
    /// Creature stat ranges.
    pub creatures: Profiles,
    /// Entities placed before populate, as `kind@row,col`.
    pub spawns: Vec<String>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            rows: 5,
            cols: 12,
            seed: None,
            turn_delay_ms: 2000,
            max_turns: None,
            densities: Densities::default(),
            restore: vec![
                RestoreRule::new(Kind::Plant, 0.04),
                RestoreRule::new(Kind::Herbivore, 0.01),
            ],
            creatures: Profiles::default(),
            spawns: Vec::new(),
        }
    }
}

impl SimConfig {
    /// A config that populates and restores nothing, for hand-built
    /// scenarios.
    #[must_use]
    pub fn empty(rows: u16, cols: u16) -> Self {
        Self {
            rows,
            cols,
            seed: Some(0),
            turn_delay_ms: 0,
            densities: Densities::none(),
            restore: Vec::new(),
            ..Self::default()
        }
    }

    /// Load a config from a JSON file. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or fails
    /// [`validate`](Self::validate).
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Inter-turn delay.
    #[must_use]
    pub const fn turn_delay(&self) -> Duration {
        Duration::from_millis(self.turn_delay_ms)
    }

    /// Check that the simulation can run with these values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rows == 0 || self.cols == 0 {
            return Err(ConfigError::Invalid(format!(
                "grid must be at least 1x1, got {}x{}",
                self.rows, self.cols
            )));
        }

        for kind in Kind::ALL {
            check_fraction(&format!("{kind} density"), self.densities.get(kind))?;
        }
        for rule in &self.restore {
            check_fraction(&format!("{} restore coefficient", rule.kind), rule.coefficient)?;
        }

        check_profile("herbivore", &self.creatures.herbivore, false)?;
        check_profile("predator", &self.creatures.predator, true)?;

        for spawn in &self.spawns {
            spawn
                .parse::<Spawn>()
                .map_err(|e| ConfigError::Invalid(format!("spawn `{spawn}`: {e}")))?;
        }

        Ok(())
    }
}

fn check_fraction(what: &str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::Invalid(format!("{what} must be within [0, 1], got {value}")))
    }
}

fn check_profile(what: &str, profile: &Profile, attacks: bool) -> Result<(), ConfigError> {
    let mut ranges = vec![("health", profile.health), ("speed", profile.speed)];
    if attacks {
        ranges.push(("attack_power", profile.attack_power));
    }

    for (name, range) in ranges {
        if range.min > range.max {
            return Err(ConfigError::Invalid(format!(
                "{what} {name} range is inverted ({}..={})",
                range.min, range.max
            )));
        }
        if range.min < 1 {
            return Err(ConfigError::Invalid(format!(
                "{what} {name} must be at least 1, got {}",
                range.min
            )));
        }
    }

    Ok(())
}

/// An explicit placement, written `kind@row,col`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Spawn {
    /// What to place.
    pub kind: Kind,
    /// Raw cell key, validated against a grid by [`resolve`](Self::resolve).
    pub key: String,
}

impl Spawn {
    /// Validate the key against a grid.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::InvalidKey`] or [`GridError::OutOfRange`].
    pub fn resolve(&self, grid: &Grid) -> GridResult<Cell> {
        grid.parse_key(&self.key)
    }
}

impl FromStr for Spawn {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((label, key)) = s.split_once('@') else {
            return Err(GridError::InvalidKey {
                key: s.to_string(),
                defect: KeyDefect::NotAPair,
            });
        };

        Ok(Self {
            kind: label.parse()?,
            key: key.trim().to_string(),
        })
    }
}

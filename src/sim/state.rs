//! Ecosystem state: the grid, its RNG, and the turn counter.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::error::{ConfigError, GridResult, SimError};
use crate::sim::{Action, Census, SimConfig, Spawn, TurnReport};
use crate::world::{check_clean, Entity, Grid, Kind, Profiles};

/// A running simulation.
///
/// All randomness comes from one seeded [`ChaCha8Rng`], so two ecosystems
/// built from the same config and seed evolve identically.
#[derive(Debug)]
pub struct Ecosystem {
    pub(crate) grid: Grid,
    pub(crate) rng: ChaCha8Rng,
    pub(crate) config: SimConfig,
    seed: u64,
    turn: u64,
    pipeline: Vec<Action>,
    populated: bool,
}

impl Ecosystem {
    /// Build an ecosystem from a config and place its explicit spawns.
    ///
    /// The grid starts otherwise empty; call [`populate`](Self::populate)
    /// before the first turn to fill it.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Config`] if the config fails validation and
    /// [`SimError::Grid`] if a spawn is off the grid or collides with
    /// another.
    pub fn new(config: SimConfig) -> Result<Self, SimError> {
        config.validate()?;

        let grid = Grid::new(config.rows, config.cols).ok_or_else(|| {
            ConfigError::Invalid(format!(
                "grid must be at least 1x1, got {}x{}",
                config.rows, config.cols
            ))
        })?;
        let seed = config.seed.unwrap_or_else(rand::random);

        let mut pipeline = vec![Action::MoveAll, Action::Clean];
        pipeline.extend(config.restore.iter().copied().map(Action::Restore));

        let mut eco = Self {
            grid,
            rng: ChaCha8Rng::seed_from_u64(seed),
            config,
            seed,
            turn: 0,
            pipeline,
            populated: false,
        };

        let spawns = eco.config.spawns.clone();
        for text in &spawns {
            let spawn: Spawn = text.parse()?;
            let cell = spawn.resolve(&eco.grid)?;
            let entity = Entity::spawn(spawn.kind, &mut eco.rng, &eco.config.creatures);
            eco.grid.place(cell, entity)?;
            log::debug!("spawned {} at {cell}", spawn.kind);
        }

        log::info!(
            "ecosystem {}x{} ready (seed {seed}, {} restore rule(s))",
            eco.grid.rows(),
            eco.grid.cols(),
            eco.config.restore.len()
        );
        Ok(eco)
    }

    /// Fill the grid to the configured densities. Only the first call has
    /// any effect. Returns the number of entities placed.
    ///
    /// # Errors
    ///
    /// Propagates grid errors, which indicate a broken invariant.
    pub fn populate(&mut self) -> GridResult<usize> {
        if self.populated {
            return Ok(0);
        }
        self.populated = true;

        let before = self.grid.len();
        let mut report = TurnReport::new(0);
        Action::Populate.execute(self, &mut report)?;
        let placed = self.grid.len() - before;

        log::info!("populated {placed} entities");
        Ok(placed)
    }

    /// Run one turn: every entity steps, the dead are removed, then each
    /// restore rule runs in order.
    ///
    /// # Errors
    ///
    /// Propagates grid errors, which indicate a broken invariant.
    pub fn step(&mut self) -> GridResult<TurnReport> {
        self.turn += 1;
        let mut report = TurnReport::new(self.turn);

        let pipeline = self.pipeline.clone();
        for action in pipeline {
            log::trace!("turn {}: {}", self.turn, action.name());
            action.execute(self, &mut report)?;
        }

        report.census = Census::take(&self.grid);

        if cfg!(debug_assertions) {
            for violation in check_clean(&self.grid) {
                log::error!("turn {}: {violation}", self.turn);
            }
        }

        log::debug!(
            "turn {}: {} meals, {} attacks ({} kills), {} moves, {} removed, {} restored",
            report.turn,
            report.meals,
            report.attacks,
            report.kills,
            report.moves,
            report.removed,
            report.restored
        );
        Ok(report)
    }

    /// The grid.
    #[must_use]
    pub const fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Mutable access to the grid, for hand-built scenarios.
    pub const fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    /// Turns completed so far.
    #[must_use]
    pub const fn turn(&self) -> u64 {
        self.turn
    }

    /// Seed the RNG was built from.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// The config this ecosystem was built from.
    #[must_use]
    pub const fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Creature stat ranges used for populate and restore.
    #[must_use]
    pub const fn profiles(&self) -> &Profiles {
        &self.config.creatures
    }

    /// Whether [`populate`](Self::populate) has run.
    #[must_use]
    pub const fn is_populated(&self) -> bool {
        self.populated
    }

    /// Current entity counts.
    #[must_use]
    pub fn census(&self) -> Census {
        Census::take(&self.grid)
    }

    /// Whether any live creature remains.
    #[must_use]
    pub fn has_creatures(&self) -> bool {
        self.grid
            .iter()
            .any(|(_, e)| e.is_alive() && matches!(e.kind(), Kind::Herbivore | Kind::Predator))
    }
}

//! Entity variants, capabilities and the kind registry.

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::GridError;
use crate::world::{Cell, GridId};

/// Glyph rendered for a cell that holds no entity.
pub const EMPTY_GLYPH: &str = "⬛";

/// Identifier minted by the grid when an entity is placed.
///
/// Relocation keeps the id, so it tracks one entity across a whole run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub(crate) u64);

impl EntityId {
    /// Id carried by an entity that has never been placed.
    pub const UNPLACED: Self = Self(0);

    /// Raw numeric value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// The two entity families.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Family {
    /// Immobile scenery; never takes a turn step.
    Terrain,
    /// Acts every turn while alive.
    Creature,
}

/// Capabilities attached per kind, independent of the family split.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Can be eaten by some creature.
    Edible,
}

/// Every concrete entity variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    /// Grass-like plant. Food for herbivores.
    #[serde(alias = "grass")]
    Plant,
    /// Rock. Blocks movement.
    Rock,
    /// Tree. Blocks movement.
    Tree,
    /// Plant eater. Food for predators.
    Herbivore,
    /// Hunts herbivores.
    Predator,
}

impl Kind {
    /// All kinds, in populate order.
    pub const ALL: [Self; 5] = [
        Self::Plant,
        Self::Rock,
        Self::Tree,
        Self::Herbivore,
        Self::Predator,
    ];

    /// Which family this kind belongs to.
    #[must_use]
    pub const fn family(self) -> Family {
        match self {
            Self::Plant | Self::Rock | Self::Tree => Family::Terrain,
            Self::Herbivore | Self::Predator => Family::Creature,
        }
    }

    /// Capabilities carried by this kind.
    #[must_use]
    pub const fn capabilities(self) -> &'static [Capability] {
        match self {
            Self::Plant | Self::Herbivore => &[Capability::Edible],
            Self::Rock | Self::Tree | Self::Predator => &[],
        }
    }

    /// Whether this kind carries a capability.
    #[must_use]
    pub fn has(self, capability: Capability) -> bool {
        self.capabilities().contains(&capability)
    }

    /// Whether some creature eats this kind.
    #[must_use]
    pub fn is_edible(self) -> bool {
        self.has(Capability::Edible)
    }

    /// The kind a creature of this kind forages for.
    #[must_use]
    pub const fn food(self) -> Option<Self> {
        match self {
            Self::Herbivore => Some(Self::Plant),
            Self::Predator => Some(Self::Herbivore),
            Self::Plant | Self::Rock | Self::Tree => None,
        }
    }

    /// Terminal glyph for this kind.
    #[must_use]
    pub const fn glyph(self) -> &'static str {
        match self {
            Self::Plant => "🌾",
            Self::Rock => "⛰️",
            Self::Tree => "🌱",
            Self::Herbivore => "🐇",
            Self::Predator => "🐺",
        }
    }

    /// Lowercase label used by the registry and in reports.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Plant => "plant",
            Self::Rock => "rock",
            Self::Tree => "tree",
            Self::Herbivore => "herbivore",
            Self::Predator => "predator",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Kind {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "plant" | "grass" => Ok(Self::Plant),
            "rock" => Ok(Self::Rock),
            "tree" => Ok(Self::Tree),
            "herbivore" => Ok(Self::Herbivore),
            "predator" => Ok(Self::Predator),
            _ => Err(GridError::InvalidEntity(s.to_string())),
        }
    }
}

/// Inclusive range a creature stat is sampled from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatRange {
    /// Smallest value.
    pub min: i32,
    /// Largest value.
    pub max: i32,
}

impl StatRange {
    /// Create a new range.
    #[must_use]
    pub const fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }

    /// Range that always yields `value`.
    #[must_use]
    pub const fn fixed(value: i32) -> Self {
        Self::new(value, value)
    }

    /// Draw a value uniformly from the range.
    pub fn sample<R: Rng + ?Sized>(self, rng: &mut R) -> i32 {
        if self.max <= self.min {
            return self.min;
        }
        rng.gen_range(self.min..=self.max)
    }
}

/// Stat ranges for one creature kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Starting health.
    pub health: StatRange,
    /// Cells travelled per turn.
    pub speed: StatRange,
    /// Damage per attack. Ignored for creatures that do not attack.
    #[serde(default = "no_attack")]
    pub attack_power: StatRange,
}

const fn no_attack() -> StatRange {
    StatRange::fixed(0)
}

/// Stat ranges for every creature kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Profiles {
    /// Herbivore stats.
    pub herbivore: Profile,
    /// Predator stats.
    pub predator: Profile,
}

impl Default for Profiles {
    fn default() -> Self {
        Self {
            herbivore: Profile {
                health: StatRange::new(2, 5),
                speed: StatRange::new(3, 7),
                attack_power: no_attack(),
            },
            predator: Profile {
                health: StatRange::new(4, 8),
                speed: StatRange::new(5, 11),
                attack_power: StatRange::new(4, 6),
            },
        }
    }
}

/// Mutable state shared by every creature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Creature {
    /// Remaining vitality. Reaching zero kills the creature.
    pub health: i32,
    /// Maximum cells travelled in one turn.
    pub speed: u32,
    /// What the creature forages for.
    pub food: Kind,
}

/// Variant-specific payload of an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Body {
    /// A plant.
    Plant,
    /// A rock.
    Rock,
    /// A tree.
    Tree,
    /// A herbivore.
    Herbivore(Creature),
    /// A predator.
    Predator {
        /// Shared creature state.
        creature: Creature,
        /// Health removed from prey per attack.
        attack_power: i32,
    },
}

/// Where an entity currently lives.
///
/// A non-owning handle: the grid owns the entity, this only lets the entity
/// answer "where am I".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    /// Grid the entity was placed on.
    pub grid: GridId,
    /// Cell it occupies.
    pub cell: Cell,
}

/// Anything that can occupy a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Entity {
    id: EntityId,
    body: Body,
    alive: bool,
    location: Option<Location>,
}

impl Entity {
    fn new(body: Body, alive: bool) -> Self {
        Self {
            id: EntityId::UNPLACED,
            body,
            alive,
            location: None,
        }
    }

    /// A fresh plant.
    #[must_use]
    pub fn plant() -> Self {
        Self::new(Body::Plant, true)
    }

    /// A fresh rock.
    #[must_use]
    pub fn rock() -> Self {
        Self::new(Body::Rock, true)
    }

    /// A fresh tree.
    #[must_use]
    pub fn tree() -> Self {
        Self::new(Body::Tree, true)
    }

    /// A herbivore with the given stats.
    #[must_use]
    pub fn herbivore(health: i32, speed: u32) -> Self {
        let creature = Creature {
            health,
            speed,
            food: Kind::Plant,
        };
        Self::new(Body::Herbivore(creature), health > 0)
    }

    /// A predator with the given stats.
    #[must_use]
    pub fn predator(health: i32, speed: u32, attack_power: i32) -> Self {
        let creature = Creature {
            health,
            speed,
            food: Kind::Herbivore,
        };
        Self::new(
            Body::Predator {
                creature,
                attack_power,
            },
            health > 0,
        )
    }

    /// Build an entity of the given kind, sampling creature stats.
    #[must_use]
    pub fn spawn<R: Rng + ?Sized>(kind: Kind, rng: &mut R, profiles: &Profiles) -> Self {
        match kind {
            Kind::Plant => Self::plant(),
            Kind::Rock => Self::rock(),
            Kind::Tree => Self::tree(),
            Kind::Herbivore => {
                let p = profiles.herbivore;
                Self::herbivore(p.health.sample(rng), p.speed.sample(rng).unsigned_abs())
            }
            Kind::Predator => {
                let p = profiles.predator;
                Self::predator(
                    p.health.sample(rng),
                    p.speed.sample(rng).unsigned_abs(),
                    p.attack_power.sample(rng),
                )
            }
        }
    }

    /// Id minted at placement, or [`EntityId::UNPLACED`].
    #[must_use]
    pub const fn id(&self) -> EntityId {
        self.id
    }

    /// Variant payload.
    #[must_use]
    pub const fn body(&self) -> &Body {
        &self.body
    }

    /// Concrete kind.
    #[must_use]
    pub const fn kind(&self) -> Kind {
        match self.body {
            Body::Plant => Kind::Plant,
            Body::Rock => Kind::Rock,
            Body::Tree => Kind::Tree,
            Body::Herbivore(_) => Kind::Herbivore,
            Body::Predator { .. } => Kind::Predator,
        }
    }

    /// Family of the concrete kind.
    #[must_use]
    pub const fn family(&self) -> Family {
        self.kind().family()
    }

    /// Whether the entity is still alive. Once false it stays false.
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        self.alive
    }

    /// Whether something eats this entity.
    #[must_use]
    pub fn is_edible(&self) -> bool {
        self.kind().is_edible()
    }

    /// Terminal glyph.
    #[must_use]
    pub const fn glyph(&self) -> &'static str {
        self.kind().glyph()
    }

    /// Where the entity is, if it has been placed.
    #[must_use]
    pub const fn location(&self) -> Option<Location> {
        self.location
    }

    /// Current cell, if placed.
    #[must_use]
    pub fn cell(&self) -> Option<Cell> {
        self.location.map(|loc| loc.cell)
    }

    /// Creature state, `None` for terrain.
    #[must_use]
    pub const fn creature(&self) -> Option<&Creature> {
        match &self.body {
            Body::Herbivore(creature) | Body::Predator { creature, .. } => Some(creature),
            Body::Plant | Body::Rock | Body::Tree => None,
        }
    }

    /// Remaining health, `None` for terrain.
    #[must_use]
    pub fn health(&self) -> Option<i32> {
        self.creature().map(|c| c.health)
    }

    /// Cells per turn; terrain never moves.
    #[must_use]
    pub fn speed(&self) -> u32 {
        self.creature().map_or(0, |c| c.speed)
    }

    /// Food kind, `None` for terrain.
    #[must_use]
    pub fn food(&self) -> Option<Kind> {
        self.creature().map(|c| c.food)
    }

    /// Attack power, `None` for anything but predators.
    #[must_use]
    pub const fn attack_power(&self) -> Option<i32> {
        match self.body {
            Body::Predator { attack_power, .. } => Some(attack_power),
            _ => None,
        }
    }

    /// Mark the entity dead.
    pub fn kill(&mut self) {
        self.alive = false;
    }

    /// Remove `amount` health from a creature, killing it at zero or below.
    ///
    /// Terrain has no vitality and ignores wounds. Returns whether this
    /// wound killed the entity.
    pub fn wound(&mut self, amount: i32) -> bool {
        let creature = match &mut self.body {
            Body::Herbivore(creature) | Body::Predator { creature, .. } => creature,
            Body::Plant | Body::Rock | Body::Tree => return false,
        };

        creature.health = creature.health.saturating_sub(amount);
        if creature.health <= 0 && self.alive {
            self.alive = false;
            return true;
        }
        false
    }

    pub(crate) fn set_id(&mut self, id: EntityId) {
        self.id = id;
    }

    pub(crate) fn set_location(&mut self, location: Option<Location>) {
        self.location = location;
    }
}

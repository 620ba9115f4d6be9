#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Grid Defence combat engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters and systems submit
//! [`Command`] values describing desired mutations, the world executes those
//! commands via its `apply` entry point, and then broadcasts [`Event`] values
//! for collaborators to react to deterministically. Systems consume immutable
//! snapshot views and respond exclusively with new command batches.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Grid Defence.";

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Configures the world's tile grid using the provided dimensions.
    ConfigureTileGrid {
        /// Number of tile columns laid out in the grid.
        columns: TileCoord,
        /// Number of tile rows laid out in the grid.
        rows: TileCoord,
        /// Length of each square tile measured in world units.
        tile_length: f32,
    },
    /// Replaces the simulation-speed multiplier applied to all timing.
    SetGameSpeed {
        /// Multiplier the world should activate.
        speed: GameSpeed,
    },
    /// Advances the simulation clock to the provided timestamp.
    Tick {
        /// Monotonic timestamp supplied by the external clock.
        now: Timestamp,
    },
    /// Requests placement of a tower anchored at the provided tile.
    PlaceTower {
        /// Type of tower to construct at the anchor tile.
        kind: TowerKind,
        /// Tile that anchors the tower's footprint.
        cell: TileCell,
    },
    /// Requests removal of an existing tower from the world.
    RemoveTower {
        /// Identifier of the tower targeted for removal.
        tower: TowerId,
    },
    /// Requests that an enemy enter the world at the provided position.
    SpawnEnemy {
        /// World-space position the enemy occupies on arrival.
        position: WorldPoint,
        /// Health the enemy carries on arrival.
        health: Health,
    },
    /// Requests removal of an enemy from the world.
    DespawnEnemy {
        /// Identifier of the enemy to remove.
        enemy: EnemyId,
    },
    /// Publishes a fresh position for an enemy driven by external movement.
    MoveEnemy {
        /// Identifier of the enemy that moved.
        enemy: EnemyId,
        /// World-space position the enemy now occupies.
        position: WorldPoint,
    },
    /// Replaces a tower's target handle with the provided selection.
    AssignTarget {
        /// Identifier of the tower whose target is replaced.
        tower: TowerId,
        /// Enemy selected for the tower, or `None` to clear the handle.
        target: Option<EnemyId>,
    },
    /// Replaces a tower's strategy genome wholesale.
    UpdateStrategy {
        /// Identifier of the tower whose genome is replaced.
        tower: TowerId,
        /// Candidate genome supplied through the strategy update channel.
        genome: StrategyGenome,
    },
    /// Requests that a resolved shot be applied against a target.
    FireShot {
        /// Identifier of the tower that fired.
        tower: TowerId,
        /// Identifier of the enemy the shot was aimed at.
        target: EnemyId,
        /// Resolved outcome of the shot.
        impact: ShotImpact,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Timestamp the clock advanced to.
        now: Timestamp,
    },
    /// Confirms that a tower was placed into the world.
    TowerPlaced {
        /// Identifier assigned to the tower by the world.
        tower: TowerId,
        /// Type of tower that was placed.
        kind: TowerKind,
        /// Tile that anchors the tower.
        cell: TileCell,
    },
    /// Reports that a tower placement request was rejected.
    TowerPlacementRejected {
        /// Type of tower requested for placement.
        kind: TowerKind,
        /// Anchor tile provided in the placement request.
        cell: TileCell,
        /// Specific reason the placement failed.
        reason: PlacementError,
    },
    /// Confirms that a tower was removed from the world.
    TowerRemoved {
        /// Identifier of the tower that was removed.
        tower: TowerId,
        /// Tile previously anchoring the tower.
        cell: TileCell,
    },
    /// Reports that a tower removal request was rejected.
    TowerRemovalRejected {
        /// Identifier of the tower targeted for removal.
        tower: TowerId,
        /// Specific reason the removal failed.
        reason: RemovalError,
    },
    /// Confirms that an enemy entered the world.
    EnemySpawned {
        /// Identifier assigned to the enemy by the world.
        enemy: EnemyId,
        /// World-space position the enemy occupies.
        position: WorldPoint,
        /// Health the enemy carries.
        health: Health,
    },
    /// Confirms that an enemy left the world.
    EnemyDespawned {
        /// Identifier of the enemy that was removed.
        enemy: EnemyId,
    },
    /// Confirms that a tower's strategy genome was replaced.
    StrategyUpdated {
        /// Identifier of the tower whose genome changed.
        tower: TowerId,
        /// Genome now active on the tower.
        genome: StrategyGenome,
    },
    /// Reports that a strategy update was rejected and the previous genome
    /// retained.
    StrategyRejected {
        /// Identifier of the tower whose update failed.
        tower: TowerId,
        /// Specific reason the candidate genome was rejected.
        reason: GenomeError,
    },
    /// Announces that a tower discharged a shot.
    ///
    /// Emitted exactly once per fire transition, for misses as well as hits,
    /// so the external audio and animation sinks can react to every
    /// discharge.
    ShotFired {
        /// Identifier of the tower that fired.
        tower: TowerId,
        /// Identifier of the enemy the shot was aimed at.
        target: EnemyId,
        /// Resolved outcome of the shot.
        impact: ShotImpact,
    },
}

/// Unique identifier assigned to a tower.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TowerId(u32);

impl TowerId {
    /// Creates a new tower identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new enemy identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Index within the tile grid measured in whole tiles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileCoord(u32);

impl TileCoord {
    /// Creates a new tile coordinate wrapper.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the underlying tile index.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Location of a single tile expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileCell {
    column: u32,
    row: u32,
}

impl TileCell {
    /// Creates a new tile cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Continuous world-space center of the cell for the given tile length.
    #[must_use]
    pub fn center(&self, tile_length: f32) -> WorldPoint {
        WorldPoint::new(
            (self.column as f32 + 0.5) * tile_length,
            (self.row as f32 + 0.5) * tile_length,
        )
    }
}

/// Continuous position expressed in world units.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorldPoint {
    x: f32,
    y: f32,
}

impl WorldPoint {
    /// Creates a new world-space point.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Horizontal component of the point.
    #[must_use]
    pub const fn x(&self) -> f32 {
        self.x
    }

    /// Vertical component of the point.
    #[must_use]
    pub const fn y(&self) -> f32 {
        self.y
    }
}

/// Monotonic timestamp measured in milliseconds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(u64);

impl Timestamp {
    /// Creates a timestamp from a millisecond reading of the external clock.
    #[must_use]
    pub const fn from_millis(value: u64) -> Self {
        Self(value)
    }

    /// Retrieves the millisecond reading backing the timestamp.
    #[must_use]
    pub const fn as_millis(&self) -> u64 {
        self.0
    }

    /// Milliseconds elapsed since `earlier`, saturating at zero.
    #[must_use]
    pub const fn saturating_since(&self, earlier: Timestamp) -> u64 {
        self.0.saturating_sub(earlier.0)
    }
}

/// Simulation-speed multiplier applied to all cooldown and idle timing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GameSpeed(f32);

impl GameSpeed {
    /// Real-time simulation speed.
    pub const NORMAL: GameSpeed = GameSpeed(1.0);

    /// Creates a speed multiplier, rejecting non-finite or non-positive
    /// values.
    #[must_use]
    pub fn new(value: f32) -> Option<Self> {
        if value.is_finite() && value > 0.0 {
            Some(Self(value))
        } else {
            None
        }
    }

    /// Retrieves the raw multiplier.
    #[must_use]
    pub const fn get(&self) -> f32 {
        self.0
    }
}

impl Default for GameSpeed {
    fn default() -> Self {
        Self::NORMAL
    }
}

/// Enemy health pool.
///
/// Damage application never clamps: health may go negative, and death
/// handling remains the responsibility of the external enemy collaborator.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Health(f32);

impl Health {
    /// Creates a health pool holding the provided amount.
    #[must_use]
    pub const fn new(value: f32) -> Self {
        Self(value)
    }

    /// Retrieves the current amount, which may be negative.
    #[must_use]
    pub const fn get(&self) -> f32 {
        self.0
    }

    /// Returns the pool reduced by the provided damage, without clamping.
    #[must_use]
    pub fn damaged_by(self, amount: f32) -> Self {
        Self(self.0 - amount)
    }
}

/// Resolved outcome of a single shot.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ShotImpact {
    /// The accuracy roll failed; no damage is applied.
    Miss,
    /// The accuracy roll succeeded and damage is applied to the target.
    Hit {
        /// Effective damage subtracted from the target's health.
        damage: f32,
        /// Indicates whether the critical roll doubled the base damage.
        critical: bool,
    },
}

/// Types of towers that can be constructed in the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TowerKind {
    /// Balanced tower with middling bounds in every dimension.
    Basic,
    /// Fast-cycling tower trading damage for a short cooldown ceiling.
    Rapid,
    /// Long-range tower with heavy damage and a sluggish cooldown floor.
    Siege,
}

impl TowerKind {
    /// Every constructible tower kind in declaration order.
    pub const ALL: [TowerKind; 3] = [TowerKind::Basic, TowerKind::Rapid, TowerKind::Siege];

    /// Returns the immutable strategy bounds configured for the kind.
    ///
    /// Bounds are compile-time configuration: looked up once per decision,
    /// never mutated at runtime.
    #[must_use]
    pub const fn strategy_bounds(self) -> StrategyBounds {
        match self {
            Self::Basic => StrategyBounds::new(
                FieldBound::new(400.0, 2_000.0),
                FieldBound::new(40.0, 120.0),
                FieldBound::new(5.0, 20.0),
                0.25,
            ),
            Self::Rapid => StrategyBounds::new(
                FieldBound::new(150.0, 900.0),
                FieldBound::new(30.0, 90.0),
                FieldBound::new(2.0, 8.0),
                0.35,
            ),
            Self::Siege => StrategyBounds::new(
                FieldBound::new(1_200.0, 4_000.0),
                FieldBound::new(60.0, 200.0),
                FieldBound::new(15.0, 60.0),
                0.5,
            ),
        }
    }
}

/// Inclusive numeric interval that bounds a single genome field.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FieldBound {
    min: f32,
    max: f32,
}

impl FieldBound {
    /// Creates a new inclusive bound.
    #[must_use]
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Smallest admissible value.
    #[must_use]
    pub const fn min(&self) -> f32 {
        self.min
    }

    /// Largest admissible value.
    #[must_use]
    pub const fn max(&self) -> f32 {
        self.max
    }

    /// Width of the interval.
    #[must_use]
    pub fn span(&self) -> f32 {
        self.max - self.min
    }

    /// Reports whether the value lies within the inclusive interval.
    #[must_use]
    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }

    /// Clamps the value into the inclusive interval.
    #[must_use]
    pub fn clamp(&self, value: f32) -> f32 {
        value.clamp(self.min, self.max)
    }
}

/// Accuracy interval shared by every tower kind.
///
/// The lower bound carries the original tuning floor so a pessimal genome
/// still lands the occasional shot.
pub const ACCURACY_BOUND: FieldBound = FieldBound::new(0.01, 1.0);

/// Bounds the five strategy genome fields are drawn from for one tower kind.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct StrategyBounds {
    cooldown_ms: FieldBound,
    range: FieldBound,
    damage: FieldBound,
    crit_cap: f32,
}

impl StrategyBounds {
    /// Creates a bounds table entry from per-field intervals.
    #[must_use]
    pub const fn new(
        cooldown_ms: FieldBound,
        range: FieldBound,
        damage: FieldBound,
        crit_cap: f32,
    ) -> Self {
        Self {
            cooldown_ms,
            range,
            damage,
            crit_cap,
        }
    }

    /// Accuracy interval, fixed across kinds.
    #[must_use]
    pub const fn accuracy(&self) -> FieldBound {
        ACCURACY_BOUND
    }

    /// Cooldown interval in milliseconds.
    #[must_use]
    pub const fn cooldown_ms(&self) -> FieldBound {
        self.cooldown_ms
    }

    /// Targeting range interval in world units.
    #[must_use]
    pub const fn range(&self) -> FieldBound {
        self.range
    }

    /// Damage interval per landed shot.
    #[must_use]
    pub const fn damage(&self) -> FieldBound {
        self.damage
    }

    /// Critical-chance interval from zero to the kind's cap.
    #[must_use]
    pub const fn crit_chance(&self) -> FieldBound {
        FieldBound::new(0.0, self.crit_cap)
    }

    /// Returns the interval bounding the provided genome field.
    #[must_use]
    pub const fn field(&self, field: GenomeField) -> FieldBound {
        match field {
            GenomeField::Accuracy => ACCURACY_BOUND,
            GenomeField::Cooldown => self.cooldown_ms,
            GenomeField::Range => self.range,
            GenomeField::Damage => self.damage,
            GenomeField::CritChance => FieldBound::new(0.0, self.crit_cap),
        }
    }
}

/// Names of the five tunable genome fields, in canonical tuple order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GenomeField {
    /// Probability that a fired shot lands.
    Accuracy,
    /// Minimum time between shots, in milliseconds.
    Cooldown,
    /// Targeting radius in world units.
    Range,
    /// Base damage per landed shot.
    Damage,
    /// Probability that a landed shot deals double damage.
    CritChance,
}

impl GenomeField {
    /// Canonical field order used by 5-tuple exchange:
    /// accuracy, cooldown, range, damage, crit chance.
    pub const ORDER: [GenomeField; 5] = [
        GenomeField::Accuracy,
        GenomeField::Cooldown,
        GenomeField::Range,
        GenomeField::Damage,
        GenomeField::CritChance,
    ];

    /// Lower-case field name used in diagnostics and share codes.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Accuracy => "accuracy",
            Self::Cooldown => "cooldown",
            Self::Range => "range",
            Self::Damage => "damage",
            Self::CritChance => "crit_chance",
        }
    }
}

impl std::fmt::Display for GenomeField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Reasons a candidate strategy genome may be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum GenomeError {
    /// A field value was NaN or infinite.
    #[error("genome field {field} is not finite")]
    NotFinite {
        /// Field that carried the non-finite value.
        field: GenomeField,
    },
    /// A field value fell outside the bounds declared for the tower kind.
    #[error("genome field {field} = {value} outside [{min}, {max}]")]
    OutOfBounds {
        /// Field that violated its bound.
        field: GenomeField,
        /// Offending value.
        value: f32,
        /// Smallest admissible value.
        min: f32,
        /// Largest admissible value.
        max: f32,
    },
}

/// The five tunable combat statistics governing a tower's behavior.
///
/// A genome is always replaced wholesale; no field-level mutation is exposed,
/// so a reader sampling a tower mid-update never observes a mix of old and
/// new values.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct StrategyGenome {
    accuracy: f32,
    cooldown_ms: f32,
    range: f32,
    damage: f32,
    crit_chance: f32,
}

impl StrategyGenome {
    /// Constructs the pessimal genome for a tower kind: minimum accuracy,
    /// range and damage, zero critical chance, and the **maximum** cooldown,
    /// since a larger cooldown is worse.
    #[must_use]
    pub const fn worst(kind: TowerKind) -> Self {
        let bounds = kind.strategy_bounds();
        Self {
            accuracy: ACCURACY_BOUND.min(),
            cooldown_ms: bounds.cooldown_ms().max(),
            range: bounds.range().min(),
            damage: bounds.damage().min(),
            crit_chance: 0.0,
        }
    }

    /// Validated construction from the canonical 5-tuple
    /// (accuracy, cooldown, range, damage, crit chance).
    ///
    /// This is the strategy update channel's entry point: any non-finite or
    /// out-of-bound field rejects the whole tuple and the caller retains its
    /// previous genome.
    pub fn from_values(kind: TowerKind, values: [f32; 5]) -> Result<Self, GenomeError> {
        let bounds = kind.strategy_bounds();
        for (field, value) in GenomeField::ORDER.into_iter().zip(values) {
            if !value.is_finite() {
                return Err(GenomeError::NotFinite { field });
            }
            let bound = bounds.field(field);
            if !bound.contains(value) {
                return Err(GenomeError::OutOfBounds {
                    field,
                    value,
                    min: bound.min(),
                    max: bound.max(),
                });
            }
        }

        let [accuracy, cooldown_ms, range, damage, crit_chance] = values;
        Ok(Self {
            accuracy,
            cooldown_ms,
            range,
            damage,
            crit_chance,
        })
    }

    /// Exports the genome as the canonical 5-tuple, inverse of
    /// [`StrategyGenome::from_values`].
    #[must_use]
    pub const fn to_values(&self) -> [f32; 5] {
        [
            self.accuracy,
            self.cooldown_ms,
            self.range,
            self.damage,
            self.crit_chance,
        ]
    }

    /// Probability in `[0, 1]` that a fired shot lands.
    #[must_use]
    pub const fn accuracy(&self) -> f32 {
        self.accuracy
    }

    /// Minimum time between shots, in milliseconds.
    #[must_use]
    pub const fn cooldown_ms(&self) -> f32 {
        self.cooldown_ms
    }

    /// Live targeting radius in world units.
    #[must_use]
    pub const fn range(&self) -> f32 {
        self.range
    }

    /// Base damage per landed shot.
    #[must_use]
    pub const fn damage(&self) -> f32 {
        self.damage
    }

    /// Probability in `[0, cap]` that a landed shot deals double damage.
    #[must_use]
    pub const fn crit_chance(&self) -> f32 {
        self.crit_chance
    }
}

/// Reasons a tower placement request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlacementError {
    /// The requested tile lies beyond the configured grid bounds.
    OutOfBounds,
    /// The requested tile already hosts a tower.
    Occupied,
}

/// Reasons a tower removal request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RemovalError {
    /// No tower with the provided identifier exists.
    MissingTower,
}

/// Immutable representation of a single tower's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerSnapshot {
    /// Identifier allocated to the tower by the world.
    pub id: TowerId,
    /// Kind of tower that was constructed.
    pub kind: TowerKind,
    /// Upgrade level, starting at one.
    pub upgrade_level: u8,
    /// Tile anchoring the tower.
    pub cell: TileCell,
    /// Continuous center of the tower derived from its anchor tile.
    pub center: WorldPoint,
    /// Facing angle in degrees, screen-space Y-down convention.
    pub angle_degrees: f32,
    /// Non-owning handle to the currently selected enemy, if any.
    pub target: Option<EnemyId>,
    /// Timestamp of the last resolved shot; `None` until the first fire.
    pub last_shot: Option<Timestamp>,
    /// Transient flag driving the external shot animation.
    pub is_shooting: bool,
    /// Strategy genome currently governing the tower.
    pub genome: StrategyGenome,
}

impl TowerSnapshot {
    /// Reports whether the tower's cooldown has elapsed at `now`.
    ///
    /// The elapsed wall time is compressed by the game-speed multiplier, so
    /// a doubled speed halves the effective cooldown. Towers that never
    /// fired are always ready.
    #[must_use]
    pub fn cooldown_ready(&self, now: Timestamp, speed: GameSpeed) -> bool {
        match self.last_shot {
            None => true,
            Some(last) => {
                let elapsed = now.saturating_since(last) as f32;
                elapsed * speed.get() >= self.genome.cooldown_ms()
            }
        }
    }
}

/// Read-only snapshot describing all towers placed within the grid.
#[derive(Clone, Debug, Default)]
pub struct TowerView {
    snapshots: Vec<TowerSnapshot>,
}

impl TowerView {
    /// Creates a new tower view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<TowerSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured tower snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &TowerSnapshot> {
        self.snapshots.iter()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<TowerSnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a single enemy's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemySnapshot {
    /// Identifier allocated to the enemy by the world.
    pub id: EnemyId,
    /// World-space position the enemy occupies.
    pub position: WorldPoint,
    /// Remaining health, possibly negative.
    pub health: Health,
}

/// Read-only snapshot describing all enemies within the grid.
///
/// Iteration order is ascending by identifier; systems rely on this as the
/// stable within-tick order the targeting tie-break is defined against.
#[derive(Clone, Debug, Default)]
pub struct EnemyView {
    snapshots: Vec<EnemySnapshot>,
}

impl EnemyView {
    /// Creates a new enemy view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<EnemySnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured enemy snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &EnemySnapshot> {
        self.snapshots.iter()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<EnemySnapshot> {
        self.snapshots
    }
}

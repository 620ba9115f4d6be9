#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Grid Defence.
//!
//! The world owns the tile grid, the tower registry with its combat state,
//! the enemy roster, the simulation clock and the game-speed scalar. All
//! mutation flows through [`apply`]; read access flows through [`query`].

use glam::Vec2;
use grid_defence_core::{
    Command, Event, GameSpeed, PlacementError, RemovalError, StrategyGenome, TileCell, TileCoord,
    Timestamp, WELCOME_BANNER,
};

mod enemies;
mod towers;

use enemies::EnemyRoster;
use towers::TowerRegistry;

const DEFAULT_GRID_COLUMNS: TileCoord = TileCoord::new(10);
const DEFAULT_GRID_ROWS: TileCoord = TileCoord::new(10);
const DEFAULT_TILE_LENGTH: f32 = 100.0;

/// Describes the discrete tile layout of the world.
#[derive(Debug)]
pub struct TileGrid {
    columns: TileCoord,
    rows: TileCoord,
    tile_length: f32,
}

impl TileGrid {
    const fn new(columns: TileCoord, rows: TileCoord, tile_length: f32) -> Self {
        Self {
            columns,
            rows,
            tile_length,
        }
    }

    /// Number of columns contained in the grid.
    #[must_use]
    pub const fn columns(&self) -> TileCoord {
        self.columns
    }

    /// Number of rows contained in the grid.
    #[must_use]
    pub const fn rows(&self) -> TileCoord {
        self.rows
    }

    /// Side length of a single square tile expressed in world units.
    #[must_use]
    pub const fn tile_length(&self) -> f32 {
        self.tile_length
    }

    fn contains(&self, cell: TileCell) -> bool {
        cell.column() < self.columns.get() && cell.row() < self.rows.get()
    }
}

/// Represents the authoritative Grid Defence world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    tile_grid: TileGrid,
    towers: TowerRegistry,
    enemies: EnemyRoster,
    now: Timestamp,
    game_speed: GameSpeed,
}

impl World {
    /// Creates a new Grid Defence world ready for simulation.
    #[must_use]
    pub fn new() -> Self {
        Self {
            banner: WELCOME_BANNER,
            tile_grid: TileGrid::new(DEFAULT_GRID_COLUMNS, DEFAULT_GRID_ROWS, DEFAULT_TILE_LENGTH),
            towers: TowerRegistry::new(),
            enemies: EnemyRoster::new(),
            now: Timestamp::from_millis(0),
            game_speed: GameSpeed::NORMAL,
        }
    }

    /// Drops a tower's target handle when the enemy despawned or drifted
    /// outside the genome's live range. Keeps selection handles from ever
    /// dangling across ticks.
    fn revalidate_targets(&mut self) {
        let enemies = &self.enemies;
        for tower in self.towers.iter_mut() {
            let Some(target) = tower.target else {
                continue;
            };

            let keep = enemies.get(target).map_or(false, |enemy| {
                let tower_center = Vec2::new(tower.center.x(), tower.center.y());
                let enemy_position = Vec2::new(enemy.position.x(), enemy.position.y());
                tower_center.distance(enemy_position) < tower.genome.range()
            });

            if !keep {
                tower.target = None;
            }
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::ConfigureTileGrid {
            columns,
            rows,
            tile_length,
        } => {
            world.tile_grid = TileGrid::new(columns, rows, tile_length);
            world.towers.clear();
            world.enemies.clear();
        }
        Command::SetGameSpeed { speed } => {
            world.game_speed = speed;
        }
        Command::Tick { now } => {
            world.now = now;
            for tower in world.towers.iter_mut() {
                tower.is_shooting = false;
            }
            world.revalidate_targets();
            out_events.push(Event::TimeAdvanced { now });
        }
        Command::PlaceTower { kind, cell } => {
            if !world.tile_grid.contains(cell) {
                out_events.push(Event::TowerPlacementRejected {
                    kind,
                    cell,
                    reason: PlacementError::OutOfBounds,
                });
                return;
            }
            if world.towers.tower_at(cell).is_some() {
                out_events.push(Event::TowerPlacementRejected {
                    kind,
                    cell,
                    reason: PlacementError::Occupied,
                });
                return;
            }

            let tower = world
                .towers
                .place(kind, cell, world.tile_grid.tile_length());
            out_events.push(Event::TowerPlaced { tower, kind, cell });
        }
        Command::RemoveTower { tower } => match world.towers.remove(tower) {
            Some(state) => out_events.push(Event::TowerRemoved {
                tower,
                cell: state.cell,
            }),
            None => out_events.push(Event::TowerRemovalRejected {
                tower,
                reason: RemovalError::MissingTower,
            }),
        },
        Command::SpawnEnemy { position, health } => {
            let enemy = world.enemies.spawn(position, health);
            out_events.push(Event::EnemySpawned {
                enemy,
                position,
                health,
            });
        }
        Command::DespawnEnemy { enemy } => {
            if world.enemies.despawn(enemy) {
                for tower in world.towers.iter_mut() {
                    if tower.target == Some(enemy) {
                        tower.target = None;
                    }
                }
                out_events.push(Event::EnemyDespawned { enemy });
            }
        }
        Command::MoveEnemy { enemy, position } => {
            if let Some(state) = world.enemies.get_mut(enemy) {
                state.position = position;
            }
        }
        Command::AssignTarget { tower, target } => {
            let resolved = target.filter(|enemy| world.enemies.get(*enemy).is_some());
            if let Some(state) = world.towers.get_mut(tower) {
                state.target = resolved;
            }
        }
        Command::UpdateStrategy { tower, genome } => {
            let Some(state) = world.towers.get_mut(tower) else {
                return;
            };

            // Re-validate against the owning tower's bounds: a genome bred
            // for one kind must not leak onto another.
            match StrategyGenome::from_values(state.kind, genome.to_values()) {
                Ok(validated) => {
                    state.genome = validated;
                    out_events.push(Event::StrategyUpdated {
                        tower,
                        genome: validated,
                    });
                }
                Err(reason) => {
                    out_events.push(Event::StrategyRejected { tower, reason });
                }
            }
        }
        Command::FireShot {
            tower,
            target,
            impact,
        } => {
            let now = world.now;
            let Some(enemy) = world.enemies.get(target).copied() else {
                return;
            };
            let Some(state) = world.towers.get_mut(tower) else {
                return;
            };

            let dx = enemy.position.x() - state.center.x();
            let dy = enemy.position.y() - state.center.y();
            // Screen-space Y grows downward; negate the vertical offset so
            // the reported angle follows mathematical convention.
            state.angle_degrees = (-dy).atan2(dx).to_degrees();
            state.last_shot = Some(now);
            state.is_shooting = true;

            if let grid_defence_core::ShotImpact::Hit { damage, .. } = impact {
                if let Some(enemy_state) = world.enemies.get_mut(target) {
                    enemy_state.health = enemy_state.health.damaged_by(damage);
                }
            }

            out_events.push(Event::ShotFired {
                tower,
                target,
                impact,
            });
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::World;
    use grid_defence_core::{
        EnemySnapshot, EnemyView, GameSpeed, TileCell, Timestamp, TowerId, TowerSnapshot, TowerView,
    };

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Provides read-only access to the world's tile grid definition.
    #[must_use]
    pub fn tile_grid(world: &World) -> &super::TileGrid {
        &world.tile_grid
    }

    /// Timestamp the simulation clock last advanced to.
    #[must_use]
    pub fn current_time(world: &World) -> Timestamp {
        world.now
    }

    /// Simulation-speed multiplier currently in effect.
    #[must_use]
    pub fn game_speed(world: &World) -> GameSpeed {
        world.game_speed
    }

    /// Returns the tower anchored at the provided tile, if any.
    #[must_use]
    pub fn tower_at(world: &World, cell: TileCell) -> Option<TowerId> {
        world.towers.tower_at(cell)
    }

    /// Captures a read-only view of the towers placed within the grid.
    #[must_use]
    pub fn tower_view(world: &World) -> TowerView {
        let snapshots: Vec<TowerSnapshot> = world
            .towers
            .iter()
            .map(|tower| TowerSnapshot {
                id: tower.id,
                kind: tower.kind,
                upgrade_level: tower.upgrade_level,
                cell: tower.cell,
                center: tower.center,
                angle_degrees: tower.angle_degrees,
                target: tower.target,
                last_shot: tower.last_shot,
                is_shooting: tower.is_shooting,
                genome: tower.genome,
            })
            .collect();
        TowerView::from_snapshots(snapshots)
    }

    /// Captures a read-only view of the enemies inhabiting the grid.
    #[must_use]
    pub fn enemy_view(world: &World) -> EnemyView {
        let snapshots: Vec<EnemySnapshot> = world
            .enemies
            .iter()
            .map(|enemy| EnemySnapshot {
                id: enemy.id,
                position: enemy.position,
                health: enemy.health,
            })
            .collect();
        EnemyView::from_snapshots(snapshots)
    }
}

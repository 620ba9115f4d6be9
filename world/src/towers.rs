//! Authoritative tower state management utilities.

use std::collections::BTreeMap;

use grid_defence_core::{
    EnemyId, StrategyGenome, TileCell, Timestamp, TowerId, TowerKind, WorldPoint,
};

/// Mutable state of a tower stored inside the world.
#[derive(Clone, Debug)]
pub(crate) struct TowerState {
    /// Identifier allocated by the world for the tower.
    pub(crate) id: TowerId,
    /// Kind of tower that was constructed.
    pub(crate) kind: TowerKind,
    /// Upgrade level, starting at one.
    pub(crate) upgrade_level: u8,
    /// Tile anchoring the tower.
    pub(crate) cell: TileCell,
    /// Continuous center derived from the anchor tile.
    pub(crate) center: WorldPoint,
    /// Facing angle in degrees, recomputed toward the target on each fire.
    pub(crate) angle_degrees: f32,
    /// Non-owning handle to the currently selected enemy.
    pub(crate) target: Option<EnemyId>,
    /// Timestamp of the last resolved shot; `None` until the first fire.
    pub(crate) last_shot: Option<Timestamp>,
    /// Transient one-tick flag driving the external shot animation.
    pub(crate) is_shooting: bool,
    /// Strategy genome currently governing the tower.
    pub(crate) genome: StrategyGenome,
}

impl TowerState {
    /// Creates a freshly placed tower carrying the pessimal genome.
    pub(crate) fn placed(id: TowerId, kind: TowerKind, cell: TileCell, tile_length: f32) -> Self {
        Self {
            id,
            kind,
            upgrade_level: 1,
            cell,
            center: cell.center(tile_length),
            angle_degrees: 0.0,
            target: None,
            last_shot: None,
            is_shooting: false,
            genome: StrategyGenome::worst(kind),
        }
    }
}

/// Registry that stores towers and manages identifier allocation.
#[derive(Debug)]
pub(crate) struct TowerRegistry {
    entries: BTreeMap<TowerId, TowerState>,
    next_tower_id: TowerId,
}

impl TowerRegistry {
    /// Creates an empty tower registry with a reset identifier counter.
    pub(crate) fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            next_tower_id: TowerId::new(0),
        }
    }

    /// Inserts a new tower at the provided tile and returns its identifier.
    pub(crate) fn place(&mut self, kind: TowerKind, cell: TileCell, tile_length: f32) -> TowerId {
        let id = self.next_tower_id;
        self.next_tower_id = TowerId::new(id.get().wrapping_add(1));
        let _ = self
            .entries
            .insert(id, TowerState::placed(id, kind, cell, tile_length));
        id
    }

    /// Removes the tower, returning its final state when it existed.
    pub(crate) fn remove(&mut self, tower: TowerId) -> Option<TowerState> {
        self.entries.remove(&tower)
    }

    /// Looks up a tower for mutation.
    pub(crate) fn get_mut(&mut self, tower: TowerId) -> Option<&mut TowerState> {
        self.entries.get_mut(&tower)
    }

    /// Iterates towers in ascending identifier order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = &TowerState> {
        self.entries.values()
    }

    /// Iterates towers for mutation in ascending identifier order.
    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut TowerState> {
        self.entries.values_mut()
    }

    /// Returns the tower anchored at the provided tile, if any.
    pub(crate) fn tower_at(&self, cell: TileCell) -> Option<TowerId> {
        self.entries
            .values()
            .find(|state| state.cell == cell)
            .map(|state| state.id)
    }

    /// Drops every tower and resets identifier allocation.
    pub(crate) fn clear(&mut self) {
        self.entries.clear();
        self.next_tower_id = TowerId::new(0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_starts_empty_with_zero_identifier() {
        let registry = TowerRegistry::new();
        assert!(registry.entries.is_empty());
        assert_eq!(registry.next_tower_id.get(), 0);
    }

    #[test]
    fn placed_tower_carries_worst_genome_and_derived_center() {
        let state = TowerState::placed(TowerId::new(3), TowerKind::Basic, TileCell::new(1, 2), 100.0);
        assert_eq!(state.genome, StrategyGenome::worst(TowerKind::Basic));
        assert_eq!(state.center, WorldPoint::new(150.0, 250.0));
        assert_eq!(state.upgrade_level, 1);
        assert!(state.last_shot.is_none());
        assert!(state.target.is_none());
        assert!(!state.is_shooting);
    }

    #[test]
    fn place_allocates_ascending_identifiers() {
        let mut registry = TowerRegistry::new();
        let first = registry.place(TowerKind::Basic, TileCell::new(0, 0), 100.0);
        let second = registry.place(TowerKind::Rapid, TileCell::new(1, 0), 100.0);
        assert_eq!(first.get(), 0);
        assert_eq!(second.get(), 1);
        assert_eq!(registry.tower_at(TileCell::new(1, 0)), Some(second));
    }
}

//! Authoritative enemy roster management utilities.
//!
//! The world stores only the abstract enemy representation the combat core
//! consumes: a position and a mutable health pool. Spawning, movement and
//! death handling are driven externally through commands.

use std::collections::BTreeMap;

use grid_defence_core::{EnemyId, Health, WorldPoint};

/// Mutable state of an enemy stored inside the world.
#[derive(Clone, Copy, Debug)]
pub(crate) struct EnemyState {
    /// Identifier allocated by the world for the enemy.
    pub(crate) id: EnemyId,
    /// World-space position the enemy occupies.
    pub(crate) position: WorldPoint,
    /// Remaining health, possibly negative.
    pub(crate) health: Health,
}

/// Roster that stores enemies and manages identifier allocation.
#[derive(Debug)]
pub(crate) struct EnemyRoster {
    entries: BTreeMap<EnemyId, EnemyState>,
    next_enemy_id: EnemyId,
}

impl EnemyRoster {
    /// Creates an empty roster with a reset identifier counter.
    pub(crate) fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            next_enemy_id: EnemyId::new(0),
        }
    }

    /// Inserts a new enemy and returns its identifier.
    pub(crate) fn spawn(&mut self, position: WorldPoint, health: Health) -> EnemyId {
        let id = self.next_enemy_id;
        self.next_enemy_id = EnemyId::new(id.get().wrapping_add(1));
        let _ = self.entries.insert(
            id,
            EnemyState {
                id,
                position,
                health,
            },
        );
        id
    }

    /// Removes the enemy, reporting whether it existed.
    pub(crate) fn despawn(&mut self, enemy: EnemyId) -> bool {
        self.entries.remove(&enemy).is_some()
    }

    /// Looks up an enemy for inspection.
    pub(crate) fn get(&self, enemy: EnemyId) -> Option<&EnemyState> {
        self.entries.get(&enemy)
    }

    /// Looks up an enemy for mutation.
    pub(crate) fn get_mut(&mut self, enemy: EnemyId) -> Option<&mut EnemyState> {
        self.entries.get_mut(&enemy)
    }

    /// Iterates enemies in ascending identifier order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = &EnemyState> {
        self.entries.values()
    }

    /// Drops every enemy and resets identifier allocation.
    pub(crate) fn clear(&mut self) {
        self.entries.clear();
        self.next_enemy_id = EnemyId::new(0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawn_allocates_ascending_identifiers() {
        let mut roster = EnemyRoster::new();
        let first = roster.spawn(WorldPoint::new(0.0, 0.0), Health::new(3.0));
        let second = roster.spawn(WorldPoint::new(1.0, 1.0), Health::new(5.0));
        assert_eq!(first.get(), 0);
        assert_eq!(second.get(), 1);
        assert!(roster.despawn(first));
        assert!(!roster.despawn(first));
    }
}

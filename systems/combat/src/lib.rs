#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that resolves shots for towers whose cooldown has elapsed.
//!
//! Randomness is confined to this system: hit and critical rolls draw from a
//! seed-derived [`ChaCha8Rng`], so replaying the same command script with the
//! same seed reproduces every impact exactly. The world applies the resolved
//! outcomes without touching an RNG itself.

use grid_defence_core::{Command, GameSpeed, ShotImpact, StrategyGenome, Timestamp, TowerView};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use sha2::{Digest, Sha256};

/// Label mixed into the seed derivation for the shot-resolution stream.
const RNG_STREAM_SHOTS: &str = "combat.shots";

/// Shot resolution system owning the hit and critical RNG stream.
#[derive(Clone, Debug)]
pub struct Combat {
    rng: ChaCha8Rng,
}

impl Combat {
    /// Creates a combat system whose RNG stream is derived from the global
    /// seed, so distinct consumers of the same seed stay decorrelated.
    #[must_use]
    pub fn new(global_seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::from_seed(derive_stream_seed(global_seed, RNG_STREAM_SHOTS)),
        }
    }

    /// Emits `Command::FireShot` entries for every tower that is ready.
    ///
    /// A tower fires when it holds a target handle and its cooldown has
    /// elapsed under the active game speed. One command is emitted per fire
    /// transition whether the accuracy roll lands or not; the world stamps
    /// `last_shot` either way, so a miss still starts the next cooldown.
    pub fn handle(
        &mut self,
        towers: &TowerView,
        now: Timestamp,
        game_speed: GameSpeed,
        out: &mut Vec<Command>,
    ) {
        for tower in towers.iter() {
            let Some(target) = tower.target else {
                continue;
            };
            if !tower.cooldown_ready(now, game_speed) {
                continue;
            }

            let impact = resolve_shot(&mut self.rng, &tower.genome);
            out.push(Command::FireShot {
                tower: tower.id,
                target,
                impact,
            });
        }
    }
}

/// Rolls a single shot outcome for the provided genome.
///
/// The critical roll draws only after the accuracy roll lands, matching the
/// two-stage resolution order: a miss consumes exactly one draw.
fn resolve_shot(rng: &mut ChaCha8Rng, genome: &StrategyGenome) -> ShotImpact {
    let hit_roll: f32 = rng.gen();
    if hit_roll > genome.accuracy() {
        return ShotImpact::Miss;
    }

    let crit_roll: f32 = rng.gen();
    let critical = crit_roll <= genome.crit_chance();
    let damage = if critical {
        genome.damage() * 2.0
    } else {
        genome.damage()
    };

    ShotImpact::Hit { damage, critical }
}

fn derive_stream_seed(global_seed: u64, label: &str) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(global_seed.to_le_bytes());
    hasher.update(label.as_bytes());
    hasher.finalize().into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use grid_defence_core::{EnemyId, TileCell, TowerId, TowerKind, TowerSnapshot, WorldPoint};

    fn genome(kind: TowerKind, values: [f32; 5]) -> StrategyGenome {
        StrategyGenome::from_values(kind, values).expect("genome within bounds")
    }

    fn tower(
        id: u32,
        target: Option<EnemyId>,
        last_shot: Option<Timestamp>,
        genome: StrategyGenome,
    ) -> TowerSnapshot {
        TowerSnapshot {
            id: TowerId::new(id),
            kind: TowerKind::Basic,
            upgrade_level: 1,
            cell: TileCell::new(0, 0),
            center: WorldPoint::new(0.0, 0.0),
            angle_degrees: 0.0,
            target,
            last_shot,
            is_shooting: false,
            genome,
        }
    }

    fn sniper_genome() -> StrategyGenome {
        genome(TowerKind::Basic, [1.0, 1_000.0, 50.0, 10.0, 0.0])
    }

    #[test]
    fn never_fired_tower_fires_immediately() {
        let towers = TowerView::from_snapshots(vec![tower(
            0,
            Some(EnemyId::new(0)),
            None,
            sniper_genome(),
        )]);
        let mut combat = Combat::new(7);
        let mut out = Vec::new();
        combat.handle(&towers, Timestamp::from_millis(0), GameSpeed::NORMAL, &mut out);
        assert_eq!(out.len(), 1);
        assert!(matches!(
            out[0],
            Command::FireShot {
                tower,
                target,
                ..
            } if tower == TowerId::new(0) && target == EnemyId::new(0)
        ));
    }

    #[test]
    fn cooling_tower_holds_fire() {
        let towers = TowerView::from_snapshots(vec![tower(
            0,
            Some(EnemyId::new(0)),
            Some(Timestamp::from_millis(0)),
            sniper_genome(),
        )]);
        let mut combat = Combat::new(7);
        let mut out = Vec::new();
        combat.handle(
            &towers,
            Timestamp::from_millis(500),
            GameSpeed::NORMAL,
            &mut out,
        );
        assert!(out.is_empty());

        combat.handle(
            &towers,
            Timestamp::from_millis(1_000),
            GameSpeed::NORMAL,
            &mut out,
        );
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn doubled_game_speed_halves_the_wait() {
        let towers = TowerView::from_snapshots(vec![tower(
            0,
            Some(EnemyId::new(0)),
            Some(Timestamp::from_millis(0)),
            sniper_genome(),
        )]);
        let doubled = GameSpeed::new(2.0).expect("valid speed");
        let mut combat = Combat::new(7);
        let mut out = Vec::new();
        combat.handle(&towers, Timestamp::from_millis(500), doubled, &mut out);
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn tower_without_target_never_fires() {
        let towers = TowerView::from_snapshots(vec![tower(0, None, None, sniper_genome())]);
        let mut combat = Combat::new(7);
        let mut out = Vec::new();
        combat.handle(&towers, Timestamp::from_millis(0), GameSpeed::NORMAL, &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn full_accuracy_always_lands() {
        let genome = sniper_genome();
        let mut rng = ChaCha8Rng::from_seed(derive_stream_seed(11, RNG_STREAM_SHOTS));
        for _ in 0..1_000 {
            match resolve_shot(&mut rng, &genome) {
                ShotImpact::Hit { damage, critical } => {
                    assert_eq!(damage, 10.0);
                    assert!(!critical);
                }
                ShotImpact::Miss => panic!("accuracy 1.0 must never miss"),
            }
        }
    }

    #[test]
    fn hit_rate_tracks_accuracy() {
        let genome = genome(TowerKind::Basic, [0.3, 1_000.0, 50.0, 10.0, 0.0]);
        let mut rng = ChaCha8Rng::from_seed(derive_stream_seed(13, RNG_STREAM_SHOTS));
        let draws = 100_000;
        let mut hits = 0u32;
        for _ in 0..draws {
            if matches!(resolve_shot(&mut rng, &genome), ShotImpact::Hit { .. }) {
                hits += 1;
            }
        }
        let rate = f64::from(hits) / f64::from(draws);
        assert!((rate - 0.3).abs() < 0.01, "observed hit rate {rate}");
    }

    #[test]
    fn critical_hits_double_base_damage() {
        let genome = genome(TowerKind::Siege, [1.0, 2_000.0, 100.0, 20.0, 0.5]);
        let mut rng = ChaCha8Rng::from_seed(derive_stream_seed(17, RNG_STREAM_SHOTS));
        let mut saw_critical = false;
        let mut saw_plain = false;
        for _ in 0..1_000 {
            match resolve_shot(&mut rng, &genome) {
                ShotImpact::Hit { damage, critical } => {
                    if critical {
                        assert_eq!(damage, 40.0);
                        saw_critical = true;
                    } else {
                        assert_eq!(damage, 20.0);
                        saw_plain = true;
                    }
                }
                ShotImpact::Miss => panic!("accuracy 1.0 must never miss"),
            }
        }
        assert!(saw_critical && saw_plain);
    }

    #[test]
    fn same_seed_reproduces_the_impact_stream() {
        let towers = TowerView::from_snapshots(vec![tower(
            0,
            Some(EnemyId::new(0)),
            None,
            genome(TowerKind::Basic, [0.5, 400.0, 50.0, 10.0, 0.2]),
        )]);

        let run = |seed: u64| -> Vec<Command> {
            let mut combat = Combat::new(seed);
            let mut out = Vec::new();
            for step in 0..50u64 {
                combat.handle(
                    &towers,
                    Timestamp::from_millis(step * 400),
                    GameSpeed::NORMAL,
                    &mut out,
                );
            }
            out
        };

        assert_eq!(run(23), run(23));
    }
}

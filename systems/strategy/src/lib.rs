#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Genetic optimizer that evolves strategy genomes against a fitness score.
//!
//! The optimizer is generic over a [`FitnessFunction`]; the provided
//! [`ScenarioFitness`] replays a scripted defence scenario through the world,
//! targeting, and combat systems and scores the resulting performance. Every
//! draw comes from seed-derived generators, so a fixed seed reproduces the
//! whole evolution run.

use grid_defence_core::{
    Command, Event, GenomeField, Health, ShotImpact, StrategyGenome, TileCell, TileCoord,
    Timestamp, TowerId, TowerKind, WorldPoint,
};
use grid_defence_system_combat::Combat;
use grid_defence_system_targeting::Targeting;
use grid_defence_world::{self as world, query, World};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Label mixed into the seed derivation for the evolution stream.
const RNG_STREAM_EVOLUTION: &str = "strategy.evolution";
/// Label mixed into the per-candidate replay seed derivation.
const RNG_STREAM_CANDIDATE: &str = "strategy.candidate";

/// Tuning knobs governing a single optimization run.
#[derive(Clone, Copy, Debug)]
pub struct OptimizerConfig {
    /// Number of candidate genomes per generation.
    pub population_size: usize,
    /// Upper bound on evolved generations.
    pub generations: u32,
    /// Number of candidates entering each selection tournament.
    pub tournament_size: usize,
    /// Per-field probability that mutation perturbs a child.
    pub mutation_rate: f32,
    /// Perturbation magnitude as a fraction of the field's bound width.
    pub mutation_scale: f32,
    /// Consecutive generations without improvement before an early stop.
    pub plateau_window: u32,
    /// Seed every random draw in the run derives from.
    pub seed: u64,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            population_size: 40,
            generations: 60,
            tournament_size: 4,
            mutation_rate: 0.2,
            mutation_scale: 0.25,
            plateau_window: 12,
            seed: 0,
        }
    }
}

/// Reasons an optimization run cannot produce a solution.
///
/// Callers retain whatever genome was previously active when a run fails.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum OptimizeError {
    /// The configured population size was zero.
    #[error("population size must be at least one")]
    EmptyPopulation,
    /// The configured generation count was zero.
    #[error("generation count must be at least one")]
    ZeroGenerations,
    /// Every evaluated candidate scored a non-finite fitness.
    #[error("no candidate produced a finite fitness")]
    NoFiniteFitness,
}

/// Outcome of a completed optimization run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BestSolution {
    /// Highest-scoring genome observed across the run.
    pub genome: StrategyGenome,
    /// Fitness the winning genome scored.
    pub fitness: f32,
    /// Number of generations actually evolved before termination.
    pub generations_run: u32,
}

/// Pluggable scoring hook the optimizer maximizes.
pub trait FitnessFunction {
    /// Scores a candidate genome; non-finite scores disqualify the candidate.
    fn evaluate(&mut self, genome: &StrategyGenome) -> f32;
}

/// Evolves strategy genomes for one tower kind within its bounds table.
#[derive(Clone, Copy, Debug, Default)]
pub struct GeneticOptimizer {
    config: OptimizerConfig,
}

impl GeneticOptimizer {
    /// Creates an optimizer with the provided configuration.
    #[must_use]
    pub const fn new(config: OptimizerConfig) -> Self {
        Self { config }
    }

    /// Runs the evolution loop and returns the best genome found.
    ///
    /// Every candidate ever constructed lies within the kind's bounds:
    /// initialization samples inside each field interval, crossover only
    /// exchanges already-admissible values, and mutation clamps back into
    /// the interval after perturbing.
    pub fn optimize(
        &self,
        kind: TowerKind,
        fitness: &mut dyn FitnessFunction,
    ) -> Result<BestSolution, OptimizeError> {
        if self.config.population_size == 0 {
            return Err(OptimizeError::EmptyPopulation);
        }
        if self.config.generations == 0 {
            return Err(OptimizeError::ZeroGenerations);
        }

        let mut rng =
            ChaCha8Rng::from_seed(derive_stream_seed(self.config.seed, RNG_STREAM_EVOLUTION));
        let tournament_size = self.config.tournament_size.max(1);

        let mut population: Vec<StrategyGenome> = (0..self.config.population_size)
            .map(|_| random_genome(kind, &mut rng))
            .collect();

        let mut best: Option<(StrategyGenome, f32)> = None;
        let mut stale_generations = 0u32;
        let mut generations_run = 0u32;

        for generation in 0..self.config.generations {
            let scores: Vec<f32> = population
                .iter()
                .map(|genome| {
                    let score = fitness.evaluate(genome);
                    if score.is_finite() {
                        score
                    } else {
                        warn!(generation, %score, "discarding non-finite fitness");
                        f32::NEG_INFINITY
                    }
                })
                .collect();
            generations_run = generation + 1;

            let mut improved = false;
            for (genome, &score) in population.iter().zip(&scores) {
                if score.is_finite() && best.map_or(true, |(_, held)| score > held) {
                    best = Some((*genome, score));
                    improved = true;
                }
            }

            let Some((_, best_fitness)) = best else {
                return Err(OptimizeError::NoFiniteFitness);
            };
            debug!(generation, best_fitness, "generation evaluated");

            if improved {
                stale_generations = 0;
            } else {
                stale_generations += 1;
                if self.config.plateau_window > 0
                    && stale_generations >= self.config.plateau_window
                {
                    debug!(generation, "fitness plateau reached, stopping early");
                    break;
                }
            }

            if generation + 1 == self.config.generations {
                break;
            }

            let mut next = Vec::with_capacity(population.len());
            let (elite, _) = best.expect("best is set once a finite score exists");
            next.push(elite);
            while next.len() < population.len() {
                let parent_a = tournament_pick(&population, &scores, tournament_size, &mut rng);
                let parent_b = tournament_pick(&population, &scores, tournament_size, &mut rng);
                let child = crossover(kind, parent_a, parent_b, &mut rng);
                next.push(self.mutate(kind, child, &mut rng));
            }
            population = next;
        }

        let (genome, fitness) = best.expect("loop ran at least one generation");
        info!(fitness, generations_run, "optimization finished");
        Ok(BestSolution {
            genome,
            fitness,
            generations_run,
        })
    }

    fn mutate(&self, kind: TowerKind, genome: StrategyGenome, rng: &mut ChaCha8Rng) -> StrategyGenome {
        let bounds = kind.strategy_bounds();
        let mut values = genome.to_values();
        for (field, value) in GenomeField::ORDER.into_iter().zip(values.iter_mut()) {
            if rng.gen::<f32>() >= self.config.mutation_rate {
                continue;
            }
            let bound = bounds.field(field);
            let perturbation = rng.gen_range(-1.0..=1.0_f32) * self.config.mutation_scale;
            *value = bound.clamp(*value + perturbation * bound.span());
        }
        StrategyGenome::from_values(kind, values).expect("clamped fields lie within bounds")
    }
}

/// Samples a uniform genome inside the kind's bounds table.
fn random_genome(kind: TowerKind, rng: &mut ChaCha8Rng) -> StrategyGenome {
    let bounds = kind.strategy_bounds();
    let mut values = [0.0f32; 5];
    for (field, value) in GenomeField::ORDER.into_iter().zip(values.iter_mut()) {
        let bound = bounds.field(field);
        *value = rng.gen_range(bound.min()..=bound.max());
    }
    StrategyGenome::from_values(kind, values).expect("sampled fields lie within bounds")
}

/// Picks the fittest of `size` uniformly drawn candidates.
fn tournament_pick<'a>(
    population: &'a [StrategyGenome],
    scores: &[f32],
    size: usize,
    rng: &mut ChaCha8Rng,
) -> &'a StrategyGenome {
    let mut winner = rng.gen_range(0..population.len());
    for _ in 1..size {
        let challenger = rng.gen_range(0..population.len());
        if scores[challenger] > scores[winner] {
            winner = challenger;
        }
    }
    &population[winner]
}

/// Uniform crossover: each field is inherited from either parent with equal
/// probability.
fn crossover(
    kind: TowerKind,
    parent_a: &StrategyGenome,
    parent_b: &StrategyGenome,
    rng: &mut ChaCha8Rng,
) -> StrategyGenome {
    let a = parent_a.to_values();
    let b = parent_b.to_values();
    let mut values = [0.0f32; 5];
    for index in 0..values.len() {
        values[index] = if rng.gen_bool(0.5) { a[index] } else { b[index] };
    }
    StrategyGenome::from_values(kind, values).expect("inherited fields lie within bounds")
}

fn derive_stream_seed(global_seed: u64, label: &str) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(global_seed.to_le_bytes());
    hasher.update(label.as_bytes());
    hasher.finalize().into()
}

/// Derives the replay seed for one candidate genome, so two candidates never
/// share a combat RNG stream.
fn derive_candidate_seed(global_seed: u64, genome: &StrategyGenome) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update(global_seed.to_le_bytes());
    hasher.update(RNG_STREAM_CANDIDATE.as_bytes());
    for value in genome.to_values() {
        hasher.update(value.to_le_bytes());
    }
    let digest = hasher.finalize();
    let bytes: [u8; 8] = digest[0..8].try_into().expect("sha256 digest slice length");
    u64::from_le_bytes(bytes)
}

/// One scripted enemy arrival inside a [`Scenario`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScenarioSpawn {
    /// Simulation time the enemy enters the world.
    pub at: Timestamp,
    /// World-space position the enemy holds for the whole replay.
    pub position: WorldPoint,
    /// Health the enemy arrives with.
    pub health: Health,
}

/// Fixed defence scenario a candidate genome is scored against.
#[derive(Clone, Debug)]
pub struct Scenario {
    /// Number of tile columns in the replay grid.
    pub columns: TileCoord,
    /// Number of tile rows in the replay grid.
    pub rows: TileCoord,
    /// Length of each square tile in world units.
    pub tile_length: f32,
    /// Tile anchoring the single evaluated tower.
    pub tower_cell: TileCell,
    /// Scripted enemy arrivals, ordered by time.
    pub spawns: Vec<ScenarioSpawn>,
    /// Total replay duration in milliseconds.
    pub duration_ms: u64,
    /// Pipeline step interval in milliseconds.
    pub step_ms: u64,
}

impl Scenario {
    /// A short skirmish: a ring of enemies closing on a central tower.
    #[must_use]
    pub fn skirmish() -> Self {
        let spawns = vec![
            ScenarioSpawn {
                at: Timestamp::from_millis(0),
                position: WorldPoint::new(45.0, 25.0),
                health: Health::new(30.0),
            },
            ScenarioSpawn {
                at: Timestamp::from_millis(0),
                position: WorldPoint::new(25.0, 55.0),
                health: Health::new(30.0),
            },
            ScenarioSpawn {
                at: Timestamp::from_millis(2_000),
                position: WorldPoint::new(5.0, 25.0),
                health: Health::new(45.0),
            },
            ScenarioSpawn {
                at: Timestamp::from_millis(4_000),
                position: WorldPoint::new(25.0, 0.0),
                health: Health::new(60.0),
            },
        ];
        Self {
            columns: TileCoord::new(6),
            rows: TileCoord::new(6),
            tile_length: 10.0,
            tower_cell: TileCell::new(2, 2),
            spawns,
            duration_ms: 12_000,
            step_ms: 100,
        }
    }
}

/// Weights combining a [`PerformanceRecord`] into a scalar fitness.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FitnessWeights {
    /// Reward per point of damage dealt.
    pub damage: f32,
    /// Reward per enemy destroyed.
    pub kill: f32,
    /// Reward (usually negative) per shot discharged.
    pub shot: f32,
}

impl Default for FitnessWeights {
    fn default() -> Self {
        Self {
            damage: 1.0,
            kill: 25.0,
            shot: -0.5,
        }
    }
}

/// Aggregate combat statistics collected over one scenario replay.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PerformanceRecord {
    /// Total damage applied across all landed shots.
    pub damage_dealt: f32,
    /// Number of enemies reduced to zero or below.
    pub kills: u32,
    /// Number of shots discharged, misses included.
    pub shots_fired: u32,
}

impl PerformanceRecord {
    /// Collapses the record into a scalar using the provided weights.
    #[must_use]
    pub fn score(&self, weights: &FitnessWeights) -> f32 {
        self.damage_dealt * weights.damage
            + self.kills as f32 * weights.kill
            + self.shots_fired as f32 * weights.shot
    }
}

/// Scores genomes by replaying a fixed [`Scenario`] through the world,
/// targeting, and combat systems.
#[derive(Clone, Debug)]
pub struct ScenarioFitness {
    kind: TowerKind,
    scenario: Scenario,
    weights: FitnessWeights,
    seed: u64,
}

impl ScenarioFitness {
    /// Creates a replay-backed fitness function for one tower kind.
    #[must_use]
    pub fn new(kind: TowerKind, scenario: Scenario, weights: FitnessWeights, seed: u64) -> Self {
        Self {
            kind,
            scenario,
            weights,
            seed,
        }
    }

    /// Replays the scenario under the candidate genome and collects the raw
    /// performance statistics.
    #[must_use]
    pub fn replay(&self, genome: &StrategyGenome) -> PerformanceRecord {
        let mut world = World::new();
        let targeting = Targeting::new();
        let mut combat = Combat::new(derive_candidate_seed(self.seed, genome));
        let mut events = Vec::new();

        world::apply(
            &mut world,
            Command::ConfigureTileGrid {
                columns: self.scenario.columns,
                rows: self.scenario.rows,
                tile_length: self.scenario.tile_length,
            },
            &mut events,
        );
        world::apply(
            &mut world,
            Command::PlaceTower {
                kind: self.kind,
                cell: self.scenario.tower_cell,
            },
            &mut events,
        );
        let tower = TowerId::new(0);
        world::apply(
            &mut world,
            Command::UpdateStrategy {
                tower,
                genome: *genome,
            },
            &mut events,
        );

        let mut record = PerformanceRecord::default();
        let mut pending = self.scenario.spawns.clone();
        let mut now_ms = 0u64;

        while now_ms <= self.scenario.duration_ms {
            let now = Timestamp::from_millis(now_ms);
            pending.retain(|spawn| {
                if spawn.at <= now {
                    world::apply(
                        &mut world,
                        Command::SpawnEnemy {
                            position: spawn.position,
                            health: spawn.health,
                        },
                        &mut events,
                    );
                    false
                } else {
                    true
                }
            });

            world::apply(&mut world, Command::Tick { now }, &mut events);

            let towers = query::tower_view(&world);
            let enemies = query::enemy_view(&world);
            let speed = query::game_speed(&world);

            let mut commands = Vec::new();
            targeting.handle(&towers, &enemies, now, speed, &mut commands);
            for command in commands.drain(..) {
                world::apply(&mut world, command, &mut events);
            }

            let towers = query::tower_view(&world);
            combat.handle(&towers, now, speed, &mut commands);
            for command in commands {
                world::apply(&mut world, command, &mut events);
            }

            for event in events.drain(..) {
                if let Event::ShotFired { impact, .. } = event {
                    record.shots_fired += 1;
                    if let ShotImpact::Hit { damage, .. } = impact {
                        record.damage_dealt += damage;
                    }
                }
            }

            // The replay owns enemy lifecycle: destroyed enemies leave the
            // field so surviving ones can be engaged.
            let dead: Vec<_> = query::enemy_view(&world)
                .into_vec()
                .into_iter()
                .filter(|enemy| enemy.health.get() <= 0.0)
                .map(|enemy| enemy.id)
                .collect();
            for enemy in dead {
                world::apply(&mut world, Command::DespawnEnemy { enemy }, &mut events);
                record.kills += 1;
            }
            events.clear();

            now_ms += self.scenario.step_ms;
        }

        record
    }
}

impl FitnessFunction for ScenarioFitness {
    fn evaluate(&mut self, genome: &StrategyGenome) -> f32 {
        self.replay(genome).score(&self.weights)
    }
}

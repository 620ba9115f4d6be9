#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs, tunes, and inspects defence strategies.

mod strategy_transfer;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use grid_defence_core::{
    Command as WorldCommand, Event, GameSpeed, ShotImpact, StrategyGenome, Timestamp, TowerId,
    TowerKind,
};
use grid_defence_system_combat::Combat;
use grid_defence_system_strategy::{
    FitnessWeights, GeneticOptimizer, OptimizerConfig, PerformanceRecord, Scenario,
    ScenarioFitness,
};
use grid_defence_system_targeting::Targeting;
use grid_defence_world::{self as world, query, World};
use tracing_subscriber::EnvFilter;

use crate::strategy_transfer::{kind_label, StrategyShareCode, SHARE_HEADER};

#[derive(Parser)]
#[command(name = "grid-defence", about = "Grid Defence strategy toolbench")]
struct Cli {
    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Subcommand)]
enum CliCommand {
    /// Replays the scripted skirmish, printing every shot and a scoreboard.
    Run {
        /// Tower kind to field when no share code is provided.
        #[arg(long, value_enum, default_value_t = KindArg::Basic)]
        kind: KindArg,
        /// Seed for the combat RNG stream.
        #[arg(long, default_value_t = 0)]
        seed: u64,
        /// Simulation-speed multiplier.
        #[arg(long, default_value_t = 1.0)]
        speed: f32,
        /// Tuned strategy share code to field instead of the factory genome.
        #[arg(long)]
        code: Option<String>,
    },
    /// Evolves a strategy genome for a tower kind and prints its share code.
    Tune {
        /// Tower kind whose bounds the evolution searches within.
        #[arg(long, value_enum, default_value_t = KindArg::Basic)]
        kind: KindArg,
        /// Seed for the evolution and replay RNG streams.
        #[arg(long, default_value_t = 0)]
        seed: u64,
        /// Candidate genomes per generation.
        #[arg(long)]
        population: Option<usize>,
        /// Upper bound on evolved generations.
        #[arg(long)]
        generations: Option<u32>,
    },
    /// Decodes a strategy share code and prints the genome.
    Inspect {
        /// Share code produced by `tune`.
        code: String,
    },
}

/// Tower kinds as accepted on the command line.
#[derive(Clone, Copy, Debug, ValueEnum)]
enum KindArg {
    Basic,
    Rapid,
    Siege,
}

impl From<KindArg> for TowerKind {
    fn from(value: KindArg) -> Self {
        match value {
            KindArg::Basic => TowerKind::Basic,
            KindArg::Rapid => TowerKind::Rapid,
            KindArg::Siege => TowerKind::Siege,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    match Cli::parse().command {
        CliCommand::Run {
            kind,
            seed,
            speed,
            code,
        } => {
            let speed = GameSpeed::new(speed)
                .ok_or_else(|| anyhow!("game speed must be finite and positive"))?;
            let (kind, genome) = match code {
                Some(code) => {
                    let share =
                        StrategyShareCode::decode(&code).context("could not read share code")?;
                    (share.kind, share.genome)
                }
                None => (kind.into(), StrategyGenome::worst(kind.into())),
            };
            run_scenario(kind, genome, seed, speed)
        }
        CliCommand::Tune {
            kind,
            seed,
            population,
            generations,
        } => tune(kind.into(), seed, population, generations),
        CliCommand::Inspect { code } => inspect(&code),
    }
}

/// Drives the world, targeting, and combat systems through the skirmish
/// scenario, narrating every discharge.
fn run_scenario(
    kind: TowerKind,
    genome: StrategyGenome,
    seed: u64,
    speed: GameSpeed,
) -> Result<()> {
    let scenario = Scenario::skirmish();
    let mut world = World::new();
    let targeting = Targeting::new();
    let mut combat = Combat::new(seed);
    let mut events = Vec::new();

    println!("{}", query::welcome_banner(&world));
    world::apply(
        &mut world,
        WorldCommand::ConfigureTileGrid {
            columns: scenario.columns,
            rows: scenario.rows,
            tile_length: scenario.tile_length,
        },
        &mut events,
    );
    world::apply(&mut world, WorldCommand::SetGameSpeed { speed }, &mut events);
    world::apply(
        &mut world,
        WorldCommand::PlaceTower {
            kind,
            cell: scenario.tower_cell,
        },
        &mut events,
    );
    world::apply(
        &mut world,
        WorldCommand::UpdateStrategy {
            tower: TowerId::new(0),
            genome,
        },
        &mut events,
    );
    events.clear();

    println!("fielding a {} tower", kind_label(kind));
    print_genome(&genome);

    let mut record = PerformanceRecord::default();
    let mut pending = scenario.spawns.clone();
    let mut now_ms = 0u64;

    while now_ms <= scenario.duration_ms {
        let now = Timestamp::from_millis(now_ms);
        pending.retain(|spawn| {
            if spawn.at <= now {
                world::apply(
                    &mut world,
                    WorldCommand::SpawnEnemy {
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

        world::apply(&mut world, WorldCommand::Tick { now }, &mut events);

        let towers = query::tower_view(&world);
        let enemies = query::enemy_view(&world);

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
            if let Event::ShotFired {
                tower,
                target,
                impact,
            } = event
            {
                record.shots_fired += 1;
                match impact {
                    ShotImpact::Hit { damage, critical } => {
                        record.damage_dealt += damage;
                        let suffix = if critical { " (critical)" } else { "" };
                        println!(
                            "[{now_ms:>6} ms] tower {} hit enemy {} for {damage}{suffix}",
                            tower.get(),
                            target.get()
                        );
                    }
                    ShotImpact::Miss => {
                        println!(
                            "[{now_ms:>6} ms] tower {} missed enemy {}",
                            tower.get(),
                            target.get()
                        );
                    }
                }
            }
        }

        let dead: Vec<_> = query::enemy_view(&world)
            .into_vec()
            .into_iter()
            .filter(|enemy| enemy.health.get() <= 0.0)
            .map(|enemy| enemy.id)
            .collect();
        for enemy in dead {
            world::apply(&mut world, WorldCommand::DespawnEnemy { enemy }, &mut events);
            record.kills += 1;
            println!("[{now_ms:>6} ms] enemy {} destroyed", enemy.get());
        }
        events.clear();

        now_ms += scenario.step_ms;
    }

    println!();
    println!("shots fired:  {}", record.shots_fired);
    println!("damage dealt: {}", record.damage_dealt);
    println!("kills:        {}", record.kills);
    println!("score:        {}", record.score(&FitnessWeights::default()));
    Ok(())
}

fn tune(
    kind: TowerKind,
    seed: u64,
    population: Option<usize>,
    generations: Option<u32>,
) -> Result<()> {
    let mut config = OptimizerConfig {
        seed,
        ..OptimizerConfig::default()
    };
    if let Some(population) = population {
        config.population_size = population;
    }
    if let Some(generations) = generations {
        config.generations = generations;
    }

    let optimizer = GeneticOptimizer::new(config);
    let mut fitness = ScenarioFitness::new(
        kind,
        Scenario::skirmish(),
        FitnessWeights::default(),
        seed,
    );
    let best = optimizer
        .optimize(kind, &mut fitness)
        .context("optimization failed")?;

    println!(
        "best {} genome after {} generations (fitness {}):",
        kind_label(kind),
        best.generations_run,
        best.fitness
    );
    print_genome(&best.genome);
    let share = StrategyShareCode {
        kind,
        genome: best.genome,
    };
    println!("share code: {}", share.encode());
    Ok(())
}

fn inspect(code: &str) -> Result<()> {
    let share = StrategyShareCode::decode(code)
        .with_context(|| format!("expected a {SHARE_HEADER}:<kind>:<payload> share code"))?;
    println!("{} genome:", kind_label(share.kind));
    print_genome(&share.genome);
    Ok(())
}

fn print_genome(genome: &StrategyGenome) {
    println!("  accuracy:    {}", genome.accuracy());
    println!("  cooldown:    {} ms", genome.cooldown_ms());
    println!("  range:       {}", genome.range());
    println!("  damage:      {}", genome.damage());
    println!("  crit chance: {}", genome.crit_chance());
}

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use wildmere::{
    autopilot::Autopilot, config::ConfigLoader, engine::SimEvent, player::CharClass,
    snapshot::SnapshotWriter, Game,
};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ClassArg {
    Warrior,
    Mage,
    Archer,
    Paladin,
}

impl From<ClassArg> for CharClass {
    fn from(arg: ClassArg) -> Self {
        match arg {
            ClassArg::Warrior => CharClass::Warrior,
            ClassArg::Mage => CharClass::Mage,
            ClassArg::Archer => CharClass::Archer,
            ClassArg::Paladin => CharClass::Paladin,
        }
    }
}

#[derive(Debug, Parser)]
#[command(author, version, about = "Wildmere headless survival runner")]
struct Cli {
    /// Path to the scenario YAML file
    #[arg(long, default_value = "scenarios/meadow.yaml")]
    scenario: PathBuf,

    /// Number of ticks to simulate
    #[arg(long, default_value_t = 6000)]
    ticks: u64,

    /// Seconds of game time per tick
    #[arg(long, default_value_t = 0.1)]
    dt: f32,

    /// Override the scenario seed
    #[arg(long)]
    seed: Option<u64>,

    #[arg(long, value_enum, default_value_t = ClassArg::Warrior)]
    class: ClassArg,

    /// Override snapshot interval in ticks
    #[arg(long)]
    snapshot_interval: Option<u64>,

    /// Directory for snapshots
    #[arg(long)]
    snapshot_dir: Option<PathBuf>,

    /// Log filter, e.g. "info" or "wildmere=debug". RUST_LOG wins when set.
    #[arg(long)]
    log_level: Option<String>,
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = ConfigLoader::new(".").load(&cli.scenario)?;
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }
    init_tracing(cli.log_level.as_deref().unwrap_or(&config.logging.level));

    let interval = cli
        .snapshot_interval
        .unwrap_or(config.snapshot.interval_ticks);
    let dir = cli
        .snapshot_dir
        .unwrap_or_else(|| PathBuf::from(&config.snapshot.output_dir));
    let snapshots = (interval > 0).then(|| SnapshotWriter::new(dir, interval));

    let seed = config.seed;
    let name = config.name.clone();
    let mut game = Game::with_snapshots(config, cli.class.into(), snapshots)?;
    let mut pilot = Autopilot::new(seed);
    info!(scenario = %name, seed, ticks = cli.ticks, "starting run");

    let mut kills = 0usize;
    let mut died_at = None;
    for _ in 0..cli.ticks {
        pilot.act(&mut game, cli.dt);
        let report = game.update(cli.dt)?;
        kills += report.kills().count();
        if report.events.contains(&SimEvent::PlayerDied) {
            warn!(tick = report.tick, "player died");
            died_at = Some(report.tick);
            break;
        }
    }

    let world = game.world();
    let player = game.player();
    println!(
        "Scenario '{}' ran {} ticks: day {}, {:?} {:?}",
        name,
        game.tick_count(),
        world.environment.day_count,
        world.environment.season,
        world.environment.weather
    );
    println!(
        "Player {:?}: health {:.1}, hunger {:.1}, sanity {:.1}, temperature {:.1}",
        player.class,
        player.health.current,
        player.hunger.current,
        player.sanity.current,
        player.temperature.current
    );
    println!(
        "Kills {}, gathers {}, crafts {}, meals {}, research {}",
        kills, pilot.stats.gathers, pilot.stats.crafts, pilot.stats.meals, player.research_points
    );
    if let Some(tick) = died_at {
        println!("The player died on tick {tick}.");
    }
    Ok(())
}

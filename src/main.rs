use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use seg_snake::game::{
    Arena, FreeMotion, GameConfig, GridMotion, HighScoreStore, JsonFileStore, MemoryStore, MovementModel,
};
use seg_snake::modes::HumanMode;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "seg_snake")]
#[command(version, about = "Segmented-body snake in the terminal")]
struct Cli {
    /// Game variant
    #[arg(long, value_enum, default_value = "cube")]
    variant: Variant,

    /// Arena size (grid cells, or world units for free roam)
    #[arg(long, value_parser = parse_size)]
    size: Option<f32>,

    /// Seed for reproducible spawns
    #[arg(long)]
    seed: Option<u64>,

    /// High score file
    #[arg(long, default_value = "seg_snake_scores.json")]
    scores: PathBuf,

    /// Keep the high score in memory only
    #[arg(long)]
    no_persist: bool,

    /// Write logs to this file (the terminal is owned by the game)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Variant {
    /// 2D grid in a walled square
    Classic,
    /// 3D grid in a walled cube
    Cube,
    /// Free movement on an open plane with power-ups
    FreeRoam,
    /// Free roam with static obstacles
    Obstacles,
}

impl Variant {
    fn config(self) -> GameConfig {
        match self {
            Variant::Classic => GameConfig::classic(),
            Variant::Cube => GameConfig::cube(),
            Variant::FreeRoam => GameConfig::free_roam(),
            Variant::Obstacles => GameConfig::obstacles(),
        }
    }
}

fn parse_size(value: &str) -> Result<f32> {
    let size: f32 = value
        .parse()
        .with_context(|| format!("invalid arena size {:?}", value))?;
    Arena::check_size(size)
}

fn init_logging(path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(path) = &cli.log_file {
        init_logging(path)?;
    }

    // Create game configuration from CLI arguments
    let mut config = cli.variant.config();
    if let Some(size) = cli.size {
        config = config.with_size(size);
    }
    if let Some(seed) = cli.seed {
        config = config.with_seed(seed);
    }

    let store: Box<dyn HighScoreStore> = if cli.no_persist {
        Box::new(MemoryStore::new())
    } else {
        Box::new(JsonFileStore::new(&cli.scores))
    };

    info!(variant = ?cli.variant, arena = ?config.arena, "starting");

    // Dispatch on the movement model
    match config.model {
        MovementModel::Grid => HumanMode::<GridMotion>::new(config, store).run().await?,
        MovementModel::Continuous => HumanMode::<FreeMotion>::new(config, store).run().await?,
    }

    Ok(())
}

//! Arena - Development Tools

use std::path::PathBuf;

use arena_core::map_generation::MapConfig;
use arena_core::settings::ArenaSettings;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "arena-tools")]
#[command(about = "Development tools for the arena map generator")]
struct Cli {
    /// Log at debug level regardless of RUST_LOG
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a map and print it
    Generate {
        /// Map width (odd, at least 3)
        #[arg(long, default_value_t = 15)]
        width: u32,
        /// Map height (odd, at least 3)
        #[arg(long, default_value_t = 15)]
        height: u32,
        /// Obstacle ratio in [0, 1]
        #[arg(long, default_value_t = 0.1)]
        ratio: f64,
        /// RNG seed
        #[arg(long, default_value_t = 12345)]
        seed: u64,
        /// Also write the world as a RON snapshot
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Play rounds headlessly and print a summary
    Simulate {
        /// Number of rounds
        #[arg(long, default_value_t = 100)]
        rounds: u64,
        /// Number of avatars
        #[arg(long, default_value_t = 4)]
        avatars: usize,
        /// Override the seed from the settings
        #[arg(long)]
        seed: Option<u64>,
        /// RON settings file (defaults used when absent)
        #[arg(long)]
        settings: Option<PathBuf>,
        /// Print the summary as RON
        #[arg(long = "ron")]
        as_ron: bool,
    },
    /// Validate a settings file or every .ron file in a directory
    Validate {
        /// Path to a settings file or a directory of them
        path: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(filter)
        .init();

    if let Err(e) = run(cli.command) {
        tracing::error!("{e}");
        std::process::exit(1);
    }
}

fn run(command: Commands) -> arena_tools::error::Result<()> {
    match command {
        Commands::Generate {
            width,
            height,
            ratio,
            seed,
            output,
        } => {
            let settings = ArenaSettings::default()
                .with_seed(seed)
                .with_map(MapConfig::new(width, height, ratio));
            let preview = arena_tools::generate::preview_map(&settings)?;
            println!("{preview}");
            if let Some(path) = output {
                arena_tools::generate::write_snapshot(&preview.world, &path)?;
            }
        }
        Commands::Simulate {
            rounds,
            avatars,
            seed,
            settings,
            as_ron,
        } => {
            let mut loaded = match settings {
                Some(path) => arena_tools::validate::validate_settings_file(&path)?,
                None => ArenaSettings::default(),
            };
            if let Some(seed) = seed {
                loaded.seed = seed;
            }

            tracing::info!("Simulating {rounds} rounds with {avatars} avatars");
            let summary = arena_tools::simulate::run_simulation(&loaded, rounds, avatars)?;
            if as_ron {
                let text = ron::ser::to_string_pretty(&summary, ron::ser::PrettyConfig::default())
                    .map_err(|e| arena_tools::error::ToolError::Snapshot(e.to_string()))?;
                println!("{text}");
            } else {
                println!("{summary}");
            }
        }
        Commands::Validate { path } => {
            tracing::info!("Validating: {}", path.display());
            if path.is_dir() {
                let count = arena_tools::validate::validate_data_directory(&path)?;
                tracing::info!("Validation passed ({count} files)");
            } else {
                arena_tools::validate::validate_settings_file(&path)?;
                tracing::info!("Validation passed");
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_requires_a_path() {
        assert!(Cli::try_parse_from(["arena-tools", "validate"]).is_err());

        let cli = Cli::try_parse_from(["arena-tools", "validate", "arena.ron"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Validate { path } if path == PathBuf::from("arena.ron")
        ));
    }

    #[test]
    fn test_verbose_is_global() {
        let cli = Cli::try_parse_from(["arena-tools", "generate", "--seed", "3", "-v"]).unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Generate { seed: 3, .. }));
    }
}

//! Sonora CLI - Sound Synthesis and Listening Quizzes
//!
//! Command-line interface for the Sonora synthesizer.

use std::io;

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Env;
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;

use sonora::cli::commands;
use sonora::cli::{Cli, Commands};
use sonora::SonoraConfig;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logger
    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_level)).init();

    info!("Sonora v{}", env!("CARGO_PKG_VERSION"));

    let config = SonoraConfig::resolve(cli.config.as_deref()).context("loading configuration")?;

    match cli.command {
        Some(cmd) => handle_command(cmd, &config),
        None => {
            println!("Sonora v{}", env!("CARGO_PKG_VERSION"));
            println!("Use --help for available commands");
            Ok(())
        }
    }
}

fn handle_command(cmd: Commands, config: &SonoraConfig) -> Result<()> {
    match cmd {
        Commands::Render {
            wave,
            output,
            bit_depth,
            sample_rate,
        } => commands::render_wav(config, &wave.params(), &output, bit_depth, sample_rate)
            .with_context(|| format!("rendering {}", output.display())),
        Commands::Plot {
            wave,
            points,
            grid,
            format,
            output,
        } => {
            let out = commands::plot_output(output.as_deref())?;
            commands::plot_series(config, &wave.params(), points, grid, format, out)
                .context("writing plot series")
        }
        Commands::AnatomyQuiz { rounds, seed } => {
            let mut rng = seeded_rng(seed);
            commands::anatomy_quiz(rounds, &mut rng, io::stdin().lock(), io::stdout())?;
            Ok(())
        }
        Commands::SoundQuiz {
            rounds,
            seed,
            clips_dir,
            categories,
        } => {
            let mut rng = seeded_rng(seed);
            commands::sound_quiz(
                config,
                rounds,
                &categories,
                &clips_dir,
                &mut rng,
                io::stdin().lock(),
                io::stdout(),
            )
            .with_context(|| format!("running sound quiz in {}", clips_dir.display()))?;
            Ok(())
        }
        Commands::PrintConfig => Ok(commands::print_config(config, io::stdout())?),
    }
}

fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

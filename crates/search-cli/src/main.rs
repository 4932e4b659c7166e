use std::fs::File;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};

use search_cli::config::{SearchConfig, SelectionStrategy};
use search_cli::logging::init_logging;
use search_cli::play::run_interactive;
use search_cli::simulate::run_simulation;
use search_core::AppInfo;

/// Bayesian search game: find the lost glasses by searching two areas per round.
#[derive(Debug, Parser)]
#[command(name = "bayes-search", author, version, about = "Bayesian search game")]
struct Cli {
    /// Path to a YAML configuration file (defaults to the built-in floor plan).
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Override the RNG seed.
    #[arg(long, value_name = "SEED", global = true)]
    seed: Option<u64>,

    /// Exit after validating the configuration.
    #[arg(long, global = true)]
    validate_only: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Play interactively on stdin/stdout (default).
    Play,
    /// Run many sessions with a scripted choice of areas and summarize them.
    Simulate {
        /// Override the number of sessions to play.
        #[arg(long, value_name = "COUNT")]
        sessions: Option<usize>,

        /// Override the round limit per session.
        #[arg(long, value_name = "ROUNDS")]
        max_rounds: Option<u32>,

        /// Override how area pairs are chosen.
        #[arg(long, value_enum)]
        strategy: Option<SelectionStrategy>,

        /// Write one JSON row per session to this file.
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = match cli.config.as_ref() {
        Some(path) => SearchConfig::from_path(path)?,
        None => SearchConfig::default(),
    };

    if let Some(seed) = cli.seed {
        config.seed = Some(seed);
    }

    let command = cli.command.unwrap_or(Command::Play);
    if let Command::Simulate {
        sessions,
        max_rounds,
        strategy,
        ..
    } = &command
    {
        if let Some(sessions) = *sessions {
            config.simulation.sessions = sessions;
        }
        if let Some(max_rounds) = *max_rounds {
            config.simulation.max_rounds = max_rounds;
        }
        if let Some(strategy) = *strategy {
            config.simulation.strategy = strategy;
        }
    }

    config.validate()?;

    if cli.validate_only {
        println!(
            "Configuration '{}' is valid ({} areas).",
            config.run_id,
            config.areas.len()
        );
        return Ok(());
    }

    let _logging_guard = init_logging(&config)?;

    match command {
        Command::Play => {
            println!(
                "{} v{}: {}",
                AppInfo::name(),
                AppInfo::version(),
                AppInfo::codename()
            );
            let stdin = io::stdin();
            let mut stdout = io::stdout();
            run_interactive(&config, stdin.lock(), &mut stdout)?;
        }
        Command::Simulate { output, .. } => simulate(&config, output.as_deref())?,
    }

    Ok(())
}

fn simulate(config: &SearchConfig, output: Option<&Path>) -> anyhow::Result<()> {
    println!(
        "Simulating {} sessions of '{}' ({:?}, up to {} rounds each)",
        config.simulation.sessions,
        config.run_id,
        config.simulation.strategy,
        config.simulation.max_rounds
    );

    let summary = match output {
        Some(path) => {
            let file =
                File::create(path).with_context(|| format!("creating {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            run_simulation(config, Some(&mut writer))?
        }
        None => run_simulation(config, None)?,
    };

    println!("Seed: {}", summary.master_seed);
    println!("Found: {} / {}", summary.found, summary.sessions);
    match (
        summary.mean_rounds_to_find,
        summary.rounds_confidence_interval,
    ) {
        (Some(mean), Some((low, high))) => {
            println!("Mean rounds to find: {mean:.2} (95% CI {low:.2}..{high:.2})")
        }
        (Some(mean), None) => println!("Mean rounds to find: {mean:.2}"),
        _ => println!("Mean rounds to find: n/a"),
    }
    if let (Some(rate), Some(effectiveness)) = (
        summary.detection_rate,
        summary.mean_target_area_effectiveness,
    ) {
        println!(
            "Detection rate in target area: {rate:.3} over {} searches (mean effectiveness {effectiveness:.3})",
            summary.target_area_searches
        );
    }
    if let Some(path) = output {
        println!("Session rows: {}", path.display());
    }

    Ok(())
}

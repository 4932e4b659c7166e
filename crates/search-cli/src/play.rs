//! Interactive text front end over any line-oriented input and output.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use rand::SeedableRng;
use rand::rngs::StdRng;
use search_core::{
    BeliefState, EffectivenessSource, RoundEffectiveness, RoundReport, SearchError, SearchResult,
    SearchSession,
};
use tracing::{Level, event};

use crate::config::SearchConfig;
use crate::menu::{Menu, MenuChoice};

const RULE_WIDTH: usize = 65;

/// Totals over one interactive run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlaySummary {
    pub sessions: usize,
    pub rounds: u32,
    pub found: usize,
    /// Sessions lost to a degenerate belief.
    pub abandoned: usize,
}

/// Runs games until the player quits or the input ends.
///
/// Finding the target, "Start Over" and a degenerate belief all discard the
/// session and begin a new one in place.
pub fn run_interactive<I, O>(config: &SearchConfig, input: I, output: &mut O) -> Result<PlaySummary>
where
    I: BufRead,
    O: Write,
{
    let effectiveness = config.effectiveness_source()?;
    play_with(config, effectiveness, input, output)
}

fn play_with<S, I, O>(
    config: &SearchConfig,
    effectiveness: S,
    input: I,
    output: &mut O,
) -> Result<PlaySummary>
where
    S: EffectivenessSource,
    I: BufRead,
    O: Write,
{
    let menu = Menu::new(config.areas.len());
    let rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut session = SearchSession::new(config.session_config()?, effectiveness, rng)?;
    let mut summary = PlaySummary {
        sessions: 1,
        ..PlaySummary::default()
    };
    write_intro(config, session.belief(), output)?;

    let mut lines = input.lines();
    loop {
        write!(output, "{}", menu.render(session.round() + 1))?;
        write!(output, "Choice: ")?;
        output.flush()?;

        let Some(line) = lines.next() else {
            writeln!(output)?;
            break;
        };
        let line = line.context("reading menu choice")?;

        match menu.parse(&line) {
            None => {
                writeln!(output, "\nSorry, but that is not a valid choice")?;
            }
            Some(MenuChoice::Quit) => {
                session.terminate();
                break;
            }
            Some(MenuChoice::StartOver) => {
                session = session.restart()?;
                summary.sessions += 1;
                write_intro(config, session.belief(), output)?;
            }
            Some(MenuChoice::Search(first, second)) => {
                let report = match session.submit_area_pair(first, second) {
                    Ok(report) => report,
                    Err(err @ SearchError::InvalidAreaSelection { .. }) => {
                        writeln!(output, "\n{err}")?;
                        continue;
                    }
                    Err(err @ SearchError::DegenerateBelief { .. }) => {
                        writeln!(output, "\n{err}\nThe search cannot continue; starting over.")?;
                        summary.rounds += 1;
                        summary.abandoned += 1;
                        session = session.restart()?;
                        summary.sessions += 1;
                        write_intro(config, session.belief(), output)?;
                        continue;
                    }
                    Err(err) => return Err(err).context("search round failed"),
                };
                summary.rounds += 1;
                write_round(config, &report, output)?;

                if report.is_found() {
                    summary.found += 1;
                    session = session.restart()?;
                    summary.sessions += 1;
                    write_intro(config, session.belief(), output)?;
                }
            }
        }
    }

    event!(
        target: "search_cli::play",
        Level::INFO,
        sessions = summary.sessions,
        rounds = summary.rounds,
        found = summary.found,
        abandoned = summary.abandoned,
        "interactive run finished"
    );
    Ok(summary)
}

fn write_intro<O: Write>(config: &SearchConfig, belief: &BeliefState, output: &mut O) -> Result<()> {
    let [x, y] = config.last_known;
    writeln!(output, "{}", "-".repeat(RULE_WIDTH))?;
    writeln!(output, "Last known position: ({x}, {y})")?;
    writeln!(output, "\nInitial Target (P) Probabilities:")?;
    writeln!(output, "{}", format_labeled("P", belief.probabilities()))?;
    Ok(())
}

fn write_round<O: Write>(config: &SearchConfig, report: &RoundReport, output: &mut O) -> Result<()> {
    let n = report.round;
    for (index, outcome) in report.outcomes.iter().enumerate() {
        let text = match outcome.result() {
            SearchResult::Found => format!("Found in Area {}", outcome.area()),
            SearchResult::NotFound => SearchResult::NotFound.to_string(),
        };
        writeln!(output, "Search {n} Results {} = {text}", index + 1)?;
    }
    writeln!(output, "Search {n} Effectiveness (E):")?;
    writeln!(output, "{}", format_effectiveness(&report.effectiveness))?;

    if let Some(target) = report.found {
        let area = config
            .area(target.area.get())
            .context("found area missing from configuration")?;
        let (gx, gy) = area.to_global(target.cell);
        writeln!(
            output,
            "Target found in Area {} at local {} (map position ({gx}, {gy}))",
            target.area, target.cell
        )?;
    } else if let Some(belief) = report.belief.as_ref() {
        writeln!(output, "New Target Probabilities (P) for search {}", n + 1)?;
        writeln!(output, "{}", format_labeled("P", belief.probabilities()))?;
    }
    Ok(())
}

fn format_effectiveness(effectiveness: &RoundEffectiveness) -> String {
    format_labeled("E", effectiveness.values())
}

fn format_labeled(label: &str, values: &[f64]) -> String {
    values
        .iter()
        .enumerate()
        .map(|(index, value)| format!("{label}{} = {value:.3}", index + 1))
        .collect::<Vec<_>>()
        .join(", ")
}

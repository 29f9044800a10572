//! Tabletop - Main Binary
//!
//! Plays session scripts against a table and prints the resulting views

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tabletop_rs::{
    config::{GridSize, TableConfig},
    game::{IntentDispatcher, OutputFormat, TableView, Tabletop, TurnPhase, VerbosityLevel},
    script::{ScriptRunner, SessionScript},
    Result,
};

#[derive(Parser)]
#[command(name = "tabletop")]
#[command(about = "Tabletop - virtual card table state engine", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a session script against a fresh table
    Run {
        /// Session script file
        #[arg(value_name = "SCRIPT")]
        script: PathBuf,

        /// Table configuration (JSON)
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Verbosity level for table output (0=silent, 1=minimal, 2=normal, 3=verbose)
        #[arg(long, short = 'v')]
        verbosity: Option<VerbosityLevel>,

        /// Print views and log lines as JSON
        #[arg(long)]
        json: bool,

        /// Stop at the first refused intent
        #[arg(long)]
        strict: bool,

        /// Verify table invariants after the run
        #[arg(long)]
        check: bool,

        /// Let the script drop cards into opponent zones
        #[arg(long)]
        allow_opponent_zones: bool,

        /// Battlefield grid rows
        #[arg(long, value_name = "N")]
        battlefield_rows: Option<u8>,

        /// Battlefield grid columns
        #[arg(long, value_name = "N")]
        battlefield_cols: Option<u8>,

        /// Lands grid columns
        #[arg(long, value_name = "N")]
        lands_cols: Option<u8>,
    },

    /// Print the turn phase cycle
    Phases {
        /// Number of full turns to print
        #[arg(long, default_value_t = 1)]
        cycles: usize,
    },
}

struct RunOptions {
    script: PathBuf,
    config: Option<PathBuf>,
    verbosity: Option<VerbosityLevel>,
    json: bool,
    strict: bool,
    check: bool,
    allow_opponent_zones: bool,
    battlefield_rows: Option<u8>,
    battlefield_cols: Option<u8>,
    lands_cols: Option<u8>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            script,
            config,
            verbosity,
            json,
            strict,
            check,
            allow_opponent_zones,
            battlefield_rows,
            battlefield_cols,
            lands_cols,
        } => run_script(RunOptions {
            script,
            config,
            verbosity,
            json,
            strict,
            check,
            allow_opponent_zones,
            battlefield_rows,
            battlefield_cols,
            lands_cols,
        })?,
        Commands::Phases { cycles } => print_phases(cycles),
    }

    Ok(())
}

/// Config file first, then command-line overrides on top
fn build_config(options: &RunOptions) -> Result<TableConfig> {
    let mut config = match &options.config {
        Some(path) => TableConfig::load_from_file(path)?,
        None => TableConfig::default(),
    };

    if let Some(verbosity) = options.verbosity {
        config.verbosity = verbosity;
    }
    if options.allow_opponent_zones {
        config.allow_opponent_zones = true;
    }
    config.battlefield = GridSize::new(
        options.battlefield_rows.unwrap_or(config.battlefield.rows),
        options.battlefield_cols.unwrap_or(config.battlefield.cols),
    );
    if let Some(cols) = options.lands_cols {
        config.lands = GridSize::new(config.lands.rows, cols);
    }
    Ok(config)
}

fn run_script(options: RunOptions) -> Result<()> {
    let config = build_config(&options)?;
    let script = SessionScript::load_from_file(&options.script)?;

    let mut table = Tabletop::new(config.clone());
    if options.json {
        table.logger.set_output_format(OutputFormat::Json);
    }

    let dispatcher = IntentDispatcher::from_config(&config);
    let mut runner = ScriptRunner::new(table, dispatcher).with_strict(options.strict);
    let summary = runner.run(&script)?;
    let table = runner.into_table();

    let mut views = summary.views;
    if views.is_empty() {
        views.push(TableView::capture(&table));
    }

    for view in &views {
        if options.json {
            println!("{}", view.to_json()?);
        } else {
            println!("{view}");
        }
    }

    if options.check {
        table.check_invariants()?;
        if !options.json {
            println!("Invariants hold for {} cards", table.registry().len());
        }
    }
    Ok(())
}

fn print_phases(cycles: usize) {
    let mut phase = TurnPhase::START;
    for turn in 1..=cycles {
        println!("Turn {turn}");
        loop {
            println!("  {phase}");
            phase.advance_step();
            if phase.is_turn_start() {
                break;
            }
        }
    }
}

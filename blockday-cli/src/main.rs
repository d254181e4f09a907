use anyhow::{Context, Result, bail};
use blockday_core::time::parse_clock;
use blockday_core::{EnergyLevels, EnergyProfile};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod config;
mod plan;
mod render;
mod state;

use plan::PlanFile;
use render::{PlanOutput, render_profile, render_text};

#[derive(Parser, Debug)]
#[command(name = "blockday", version, about = "Place tasks and events into 15-minute slots")]
struct Cli {
    /// Path to config file (default: ~/.blockday/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log placement decisions to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Schedule a plan file and print the result
    Plan {
        /// Plan file (TOML): date range, preferences, events, tasks
        #[arg(long)]
        file: PathBuf,

        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,

        /// Skip the per-day slot grid
        #[arg(long)]
        no_grid: bool,

        /// Override the chunk size for chunkable tasks (minutes)
        #[arg(long)]
        chunk_minutes: Option<u32>,
    },

    /// Show the energy profile derived from preferences
    Energy {
        /// 6 coarse or 24 hourly values, comma separated
        #[arg(long, value_delimiter = ',')]
        levels: Vec<i32>,

        #[arg(long, default_value = "00:00")]
        sleep_start: String,

        #[arg(long, default_value = "07:30")]
        sleep_end: String,
    },

    /// Config file helpers
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write a default ~/.blockday/config.toml
    Init,
    /// Print the effective config
    Show,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Plan {
            file,
            json,
            no_grid,
            chunk_minutes,
        } => {
            let mut cfg = config::load_config(cli.config.as_deref())?;
            if let Some(m) = chunk_minutes {
                cfg.engine.chunk_minutes = m;
            }
            let json = json || cfg.output.json;
            let grid = cfg.output.grid && !no_grid;
            run_plan(&file, cfg.engine, json, grid)?;
        }

        Command::Energy {
            levels,
            sleep_start,
            sleep_end,
        } => {
            if levels.is_empty() {
                bail!("pass --levels with 6 or 24 comma-separated values");
            }
            let levels = EnergyLevels::try_from(levels)?;
            let profile = EnergyProfile::build(
                &levels,
                parse_clock(&sleep_start)?,
                parse_clock(&sleep_end)?,
            );
            print!("{}", render_profile(&profile));
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
            ConfigCommand::Show => {
                let cfg = config::load_config(cli.config.as_deref())?;
                print!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
            }
        },
    }

    Ok(())
}

fn run_plan(
    file: &std::path::Path,
    engine_cfg: blockday_core::EngineConfig,
    json: bool,
    grid: bool,
) -> Result<()> {
    let plan = PlanFile::load(file)?;
    info!(
        path = %file.display(),
        start = %plan.start_date,
        end = %plan.end_date,
        events = plan.events.len(),
        tasks = plan.tasks.len(),
        "loaded plan"
    );
    let profile = plan.profile();
    let mut engine = plan.build_engine(&profile, engine_cfg)?;

    let report = engine.run();
    let failed = report.failed().count();
    if failed > 0 {
        warn!(failed, total = report.outcomes.len(), "some tasks could not be placed");
    }
    let schedule = engine.into_schedule();

    if json {
        let out = PlanOutput {
            report: &report,
            events: &schedule.events,
            days: grid.then_some(&schedule.days),
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        print!("{}", render_text(&schedule, &report, grid));
    }

    Ok(())
}

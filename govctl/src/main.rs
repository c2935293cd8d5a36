//! alb-govctl: operator tool for the distributor governance controller.

mod script;

use std::path::PathBuf;

use alb_governance::{ActionId, ControllerConfig};
use alb_utils::{init_logging, LogFormat};
use clap::Parser;

use crate::script::Script;

#[derive(Parser)]
#[command(
    name = "alb-govctl",
    about = "Inspect and dry-run the timelocked distributor governance controller"
)]
struct Cli {
    /// Path to a TOML controller configuration (delay and bounds).
    #[arg(long, global = true, env = "ALB_GOV_CONFIG")]
    config: Option<PathBuf>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, global = true, default_value = "warn", env = "ALB_LOG_LEVEL")]
    log_level: String,

    /// Log format: "human" or "json". Logs go to stderr.
    #[arg(long, global = true, default_value = "human", env = "ALB_LOG_FORMAT")]
    log_format: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// List the timelocked action identifiers and their ordinals.
    Actions,

    /// Print the effective configuration as TOML.
    Config,

    /// Replay a scenario script against an in-memory distributor.
    Simulate {
        /// Scenario file (TOML).
        script: PathBuf,

        /// Emit one JSON object per step plus a final state object.
        #[arg(long)]
        json: bool,
    },
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<ControllerConfig> {
    match path {
        Some(path) => {
            let config = ControllerConfig::from_toml_file(path)?;
            tracing::info!("Loaded config from {}", path.display());
            Ok(config)
        }
        None => Ok(ControllerConfig::default()),
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let format: LogFormat = cli.log_format.parse()?;
    init_logging(format, &cli.log_level)?;

    let config = load_config(cli.config.as_ref())?;

    match cli.command {
        Command::Actions => {
            for action in ActionId::ALL {
                println!("{:>2}  {}", action.index(), action);
            }
        }
        Command::Config => {
            print!("{}", config.to_toml_string()?);
        }
        Command::Simulate { script, json } => {
            let replay = Script::from_file(&script)?.replay(&config);
            if json {
                for step in &replay.steps {
                    println!("{}", serde_json::to_string(step)?);
                }
                println!("{}", serde_json::to_string(&replay.final_state)?);
            } else {
                for step in &replay.steps {
                    println!("{step}");
                }
                let state = &replay.final_state;
                println!(
                    "final: owner={} engine_owner={} delay={}s emission_rate={} total_alloc={} pools={}",
                    state.controller_owner,
                    state.engine_owner,
                    state.delay_secs,
                    state.emission_rate,
                    state.total_alloc_point,
                    state.pools.len(),
                );
            }
            let mismatches = replay.mismatches();
            if mismatches > 0 {
                anyhow::bail!("{mismatches} step(s) did not match their expected outcome");
            }
        }
    }
    Ok(())
}

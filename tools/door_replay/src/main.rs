mod logging;
mod replay;
mod trace;

use std::{
    fs::File,
    io::{self, BufReader, Write},
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use clap::Parser;
use door_config_compiler::{parse_config_file, validate_config};
use garage_door_monitor::{door::state_label, DoorConfig, DoorState};
use logging::Logger;
use replay::{door_config_from_file, final_state_warning, replay, StatusMode};

#[derive(Debug, Parser)]
#[command(name = "door_replay")]
#[command(about = "Replays a recorded accelerometer trace through the door monitor")]
struct Cli {
    /// CSV trace of `accel,ms,x,y,z,valid` rows.
    trace: PathBuf,
    /// Door config TOML; defaults to the config compiled into the monitor.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long, value_enum, default_value_t = StatusMode::Changes)]
    status: StatusMode,
    /// File of state tags the replay must visit, in order.
    #[arg(long)]
    expect: Option<PathBuf>,
    /// Append JSON log records here (overrides DOOR_REPLAY_LOG_JSON_PATH).
    #[arg(long = "log-json")]
    log_json: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("error: {err:?}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut logger = Logger::from_args(cli.log_json.clone())?;

    let config = load_config(cli.config.as_deref())?;
    let samples = trace::parse_trace(BufReader::new(open(&cli.trace)?))
        .with_context(|| format!("failed to parse {}", cli.trace.display()))?;
    if samples.is_empty() {
        logger.warn(format!("{} has no samples", cli.trace.display()));
    }
    logger.info(format!(
        "replaying {} samples from {}",
        samples.len(),
        cli.trace.display()
    ));

    let outcome = replay(&samples, config, cli.status);
    for change in &outcome.changes {
        logger.transition(change);
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for line in &outcome.lines {
        serde_json::to_writer(&mut out, line)?;
        writeln!(out)?;
    }
    out.flush()?;

    if let Some(warning) = outcome.visited.last().copied().and_then(final_state_warning) {
        logger.warn(warning);
    }

    if let Some(expect_path) = &cli.expect {
        let expected = trace::parse_expected_states(BufReader::new(open(expect_path)?))
            .with_context(|| format!("failed to parse {}", expect_path.display()))?;
        if outcome.visited != expected {
            logger.warn(format!("expected states: {}", join_labels(&expected)));
            logger.warn(format!("actual states:   {}", join_labels(&outcome.visited)));
            bail!("state sequence mismatch");
        }
        logger.info(format!("state sequence matches {}", expect_path.display()));
    }

    Ok(())
}

fn open(path: &Path) -> Result<File> {
    File::open(path).with_context(|| format!("failed to open {}", path.display()))
}

fn load_config(path: Option<&Path>) -> Result<DoorConfig> {
    let Some(path) = path else {
        return Ok(DoorConfig::default());
    };
    let file = parse_config_file(path)?;
    validate_config(&file)?;
    Ok(door_config_from_file(&file))
}

fn join_labels(states: &[DoorState]) -> String {
    states
        .iter()
        .map(|state| state_label(*state))
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(feature = "mimalloc-global")]
#[global_allocator]
static GLOBAL_ALLOCATOR: mimalloc::MiMalloc = mimalloc::MiMalloc;

use std::io::BufRead;
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossbeam_channel::{Sender, unbounded};
use torus_life::life::{Command, Event, Params};
use torus_life::{PgmIo, run};

/// Run Game of Life on a wrapping grid loaded from `<images>/<W>x<H>.pgm`.
///
/// While running, type a key and press enter: `p` pause/resume, `s` save a
/// snapshot, `q` save and quit.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Grid width in cells.
    #[arg(long, default_value_t = 512)]
    width: usize,
    /// Grid height in cells.
    #[arg(long, default_value_t = 512)]
    height: usize,
    /// Number of generations to run.
    #[arg(long, default_value_t = 10_000_000_000)]
    turns: u64,
    /// Worker count (defaults to the number of logical CPUs).
    #[arg(short = 't', long)]
    threads: Option<usize>,
    /// Milliseconds between alive-cell reports.
    #[arg(long = "sample-ms", default_value_t = 2_000)]
    sample_ms: u64,
    /// Directory holding the input images.
    #[arg(long, default_value = "images")]
    images: PathBuf,
    /// Directory receiving snapshots.
    #[arg(long, default_value = "out")]
    out: PathBuf,
    /// Also print every flipped cell.
    #[arg(long)]
    flips: bool,
}

fn spawn_keyboard(commands: Sender<Command>) -> Result<()> {
    thread::Builder::new()
        .name("keyboard".into())
        .spawn(move || {
            let stdin = std::io::stdin();
            for line in stdin.lock().lines() {
                let Ok(line) = line else { break };
                for key in line.chars() {
                    match Command::from_key(key) {
                        Some(command) => {
                            if commands.send(command).is_err() {
                                return;
                            }
                        }
                        None if key.is_whitespace() => {}
                        None => log::debug!("ignoring key {key:?}"),
                    }
                }
            }
        })
        .context("failed to spawn keyboard reader")?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut params = Params::new(args.width, args.height)
        .turns(args.turns)
        .sample_interval(Duration::from_millis(args.sample_ms));
    if let Some(n) = args.threads {
        params = params.thread_count(n);
    }
    params.validate().context("invalid arguments")?;

    let io = PgmIo::new(&args.images, &args.out).context("failed to prepare image directories")?;
    let (event_tx, event_rx) = unbounded();
    let (command_tx, command_rx) = unbounded();
    spawn_keyboard(command_tx)?;

    let engine = thread::Builder::new()
        .name("distributor".into())
        .spawn(move || run(params, io, event_tx, command_rx))
        .context("failed to spawn distributor")?;

    for event in event_rx {
        match event {
            Event::CellFlipped { .. } if !args.flips => {}
            other => println!("{other}"),
        }
    }

    match engine.join() {
        Ok(result) => result.context("simulation failed"),
        Err(_) => anyhow::bail!("distributor thread panicked"),
    }
}

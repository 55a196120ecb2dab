//! Worker-count sweep for the distributor.
//!
//! Seeds a random soup, then runs the same number of turns with 1..=16
//! workers and reports wall time. Every run must end with the same alive
//! set; a mismatch aborts the sweep. Use with `--release`.

#[cfg(feature = "mimalloc-global")]
#[global_allocator]
static GLOBAL_ALLOCATOR: mimalloc::MiMalloc = mimalloc::MiMalloc;

use rand::RngCore;
use rand::SeedableRng;
use std::env;
use std::thread;
use std::time::Instant;
use torus_life::life::{ALIVE, Cell, DEAD, Event, Params};
use torus_life::{MemoryIo, run};

#[derive(Clone, Debug)]
struct BenchConfig {
    size: usize,
    turns: u64,
    density: f64,
    seed: u64,
    max_threads: usize,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            size: 512,
            turns: 100,
            density: 0.42,
            seed: 0x5EED_1234_ABCD_EF01,
            max_threads: 16,
        }
    }
}

fn parse_args() -> BenchConfig {
    let mut cfg = BenchConfig::default();
    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--size" => {
                if let Some(v) = args.next() {
                    cfg.size = v.parse().expect("--size expects usize");
                }
            }
            "--turns" => {
                if let Some(v) = args.next() {
                    cfg.turns = v.parse().expect("--turns expects u64");
                }
            }
            "--density" => {
                if let Some(v) = args.next() {
                    cfg.density = v.parse().expect("--density expects f64");
                }
            }
            "--max-threads" => {
                if let Some(v) = args.next() {
                    cfg.max_threads = v.parse().expect("--max-threads expects usize");
                }
            }
            "--seed" => {
                if let Some(v) = args.next() {
                    cfg.seed = if let Some(hex) = v.strip_prefix("0x") {
                        u64::from_str_radix(hex, 16).expect("--seed hex parse failed")
                    } else {
                        v.parse().expect("--seed expects u64")
                    };
                }
            }
            other => panic!("unknown arg: {other}"),
        }
    }
    cfg
}

fn seed_raster(size: usize, density: f64, seed: u64) -> Vec<u8> {
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    let threshold = (u64::MAX as f64 * density) as u64;
    (0..size * size)
        .map(|_| if rng.next_u64() <= threshold { ALIVE } else { DEAD })
        .collect()
}

fn run_once(cfg: &BenchConfig, raster: &[u8], threads: usize) -> (f64, usize, Vec<Cell>) {
    let params = Params::new(cfg.size, cfg.size)
        .turns(cfg.turns)
        .thread_count(threads);
    let io = MemoryIo::new().with_input(params.input_label(), raster.to_vec());
    let (tx, rx) = crossbeam_channel::unbounded();

    let drain = thread::spawn(move || {
        let mut events = 0usize;
        let mut alive = Vec::new();
        for event in rx {
            events += 1;
            if let Event::FinalTurnComplete { alive: cells, .. } = event {
                alive = cells;
            }
        }
        (events, alive)
    });

    let start = Instant::now();
    run(params, io, tx, crossbeam_channel::never()).expect("benchmark run failed");
    let (events, alive) = drain.join().expect("event drain panicked");
    let total_ms = start.elapsed().as_secs_f64() * 1000.0;
    (total_ms, events, alive)
}

fn main() {
    let cfg = parse_args();
    let raster = seed_raster(cfg.size, cfg.density, cfg.seed);

    println!(
        "{:<14} {:>8} {:>12} {:>10} {:>12}",
        "Grid", "Workers", "Total(ms)", "Avg(ms)", "Events"
    );
    println!("{}", "-".repeat(60));

    let mut reference: Option<Vec<Cell>> = None;
    for threads in 1..=cfg.max_threads.max(1) {
        let (total_ms, events, alive) = run_once(&cfg, &raster, threads);
        match &reference {
            Some(expected) => assert_eq!(
                &alive, expected,
                "alive set with {threads} workers differs from 1 worker"
            ),
            None => reference = Some(alive),
        }
        println!(
            "{:<14} {:>8} {:>12.1} {:>10.4} {:>12}",
            format!("{}x{}x{}", cfg.size, cfg.size, cfg.turns),
            threads,
            total_ms,
            total_ms / cfg.turns.max(1) as f64,
            events
        );
    }
}

use std::collections::HashSet;
use std::time::Duration;

use crossbeam_channel::{never, unbounded};
use rand::{Rng, SeedableRng};
use torus_life::MemoryIo;
use torus_life::life::{Cell, Event, Grid, Params, State, run};

fn soup(width: usize, height: usize, density: f64, seed: u64) -> Grid {
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    let mut grid = Grid::new(width, height);
    for y in 0..height {
        for x in 0..width {
            if rng.random::<f64>() < density {
                grid.set(x, y, true);
            }
        }
    }
    grid
}

fn step_naive(cells: &HashSet<(usize, usize)>, width: usize, height: usize) -> HashSet<(usize, usize)> {
    let mut next = HashSet::new();
    for y in 0..height {
        for x in 0..width {
            let mut neighbors = 0;
            for dy in [height - 1, 0, 1] {
                for dx in [width - 1, 0, 1] {
                    if dx == 0 && dy == 0 {
                        continue;
                    }
                    if cells.contains(&((x + dx) % width, (y + dy) % height)) {
                        neighbors += 1;
                    }
                }
            }
            let alive = cells.contains(&(x, y));
            let next_alive = if alive {
                neighbors == 2 || neighbors == 3
            } else {
                neighbors == 3
            };
            if next_alive {
                next.insert((x, y));
            }
        }
    }
    next
}

fn live_set(grid: &Grid) -> HashSet<(usize, usize)> {
    grid.alive_cells().into_iter().map(|c| (c.x, c.y)).collect()
}

fn run_collect(params: Params, initial: &Grid) -> (Vec<Event>, MemoryIo) {
    let mut io = MemoryIo::new().with_input(params.input_label(), initial.as_bytes().to_vec());
    let (tx, rx) = unbounded();
    run(params, &mut io, tx, never()).expect("run failed");
    (rx.iter().collect(), io)
}

fn final_alive(events: &[Event]) -> Vec<Cell> {
    events
        .iter()
        .find_map(|e| match e {
            Event::FinalTurnComplete { alive, .. } => Some(alive.clone()),
            _ => None,
        })
        .expect("no FinalTurnComplete event")
}

#[test]
fn zero_turns_returns_input_cells_in_row_major_order() {
    let initial = soup(16, 16, 0.4, 0x16);
    for threads in [1, 4, 16] {
        let (events, _) = run_collect(Params::new(16, 16).thread_count(threads), &initial);
        assert_eq!(final_alive(&events), initial.alive_cells());
        assert!(!events.iter().any(|e| matches!(e, Event::TurnComplete { .. })));
    }
}

#[test]
fn matches_naive_on_random_soup() {
    let (width, height) = (21, 13);
    let initial = soup(width, height, 0.35, 0xBADC0FFEE);
    let mut naive = live_set(&initial);
    for turns in 0..10u64 {
        let (events, _) = run_collect(
            Params::new(width, height).turns(turns).thread_count(3),
            &initial,
        );
        let got: HashSet<_> = final_alive(&events).into_iter().map(|c| (c.x, c.y)).collect();
        assert_eq!(got, naive, "mismatch after {turns} turns");
        naive = step_naive(&naive, width, height);
    }
}

#[test]
fn thread_count_does_not_change_outcome() {
    let initial = soup(64, 64, 0.3, 0xD37E_A515);
    let (reference, _) = run_collect(Params::new(64, 64).turns(40).thread_count(1), &initial);
    let reference = final_alive(&reference);
    assert!(!reference.is_empty());

    // 7 leaves a remainder, 100 exceeds the height and leaves empty bands.
    for threads in [2, 7, 16, 100] {
        let (events, _) = run_collect(Params::new(64, 64).turns(40).thread_count(threads), &initial);
        assert_eq!(final_alive(&events), reference, "{threads} workers diverged");
    }
}

#[test]
fn turn_and_flip_events_are_complete_and_ordered() {
    let turns = 20;
    let initial = soup(32, 24, 0.3, 0xE7E7);
    let (events, _) = run_collect(Params::new(32, 24).turns(turns).thread_count(5), &initial);

    let completed: Vec<u64> = events
        .iter()
        .filter_map(|e| match e {
            Event::TurnComplete { turn } => Some(*turn),
            _ => None,
        })
        .collect();
    assert_eq!(completed, (1..=turns).collect::<Vec<_>>());

    // Flips for turn t all arrive after TurnComplete(t-1) and before TurnComplete(t).
    let mut last_complete = 0;
    let mut replay = initial.clone();
    for event in &events {
        match event {
            Event::TurnComplete { turn } => last_complete = *turn,
            Event::CellFlipped { turn, cell } => {
                assert!((1..=turns).contains(turn));
                assert_eq!(*turn, last_complete + 1);
                let alive = replay.get(cell.x, cell.y);
                replay.set(cell.x, cell.y, !alive);
            }
            _ => {}
        }
    }
    assert_eq!(replay.alive_cells(), final_alive(&events));
}

#[test]
fn run_ends_with_final_save_final_state_and_quitting() {
    let initial = soup(16, 16, 0.3, 0x51);
    let (events, io) = run_collect(Params::new(16, 16).turns(5).thread_count(2), &initial);

    let tail = &events[events.len() - 3..];
    assert_eq!(
        tail[0],
        Event::ImageOutputComplete { turn: 5, label: "16x16x5".into() }
    );
    assert!(matches!(tail[1], Event::FinalTurnComplete { turn: 5, .. }));
    assert_eq!(tail[2], Event::StateChange { turn: 5, state: State::Quitting });

    let snapshot = io.output("16x16x5").expect("final snapshot");
    let saved = Grid::from_raster(16, 16, &snapshot.raster);
    assert_eq!(saved.alive_cells(), final_alive(&events));
}

#[test]
fn three_by_three_triple_fills_the_torus() {
    let initial = Grid::with_alive(3, 3, [Cell::new(0, 1), Cell::new(1, 1), Cell::new(2, 1)]);
    let (events, _) = run_collect(Params::new(3, 3).turns(1).thread_count(1), &initial);
    assert_eq!(final_alive(&events).len(), 9);
}

#[test]
fn empty_grid_stays_empty() {
    let initial = Grid::new(16, 16);
    assert!(initial.is_empty());
    let (events, io) = run_collect(Params::new(16, 16).turns(25).thread_count(4), &initial);
    assert!(final_alive(&events).is_empty());
    let snapshot = io.output("16x16x25").expect("final snapshot");
    assert!(Grid::from_raster(16, 16, &snapshot.raster).is_empty());
    assert!(!events.iter().any(|e| matches!(e, Event::CellFlipped { .. })));
}

#[test]
fn blinker_oscillates_across_the_wrap() {
    // Vertical blinker centred on (0, 0), straddling the top/bottom edge.
    let initial = Grid::with_alive(6, 6, [Cell::new(0, 5), Cell::new(0, 0), Cell::new(0, 1)]);

    let (events, _) = run_collect(Params::new(6, 6).turns(1).thread_count(2), &initial);
    assert_eq!(
        final_alive(&events),
        vec![Cell::new(0, 0), Cell::new(1, 0), Cell::new(5, 0)]
    );

    let (events, _) = run_collect(Params::new(6, 6).turns(2).thread_count(2), &initial);
    assert_eq!(final_alive(&events), initial.alive_cells());
}

#[test]
fn glider_returns_home_after_crossing_the_torus() {
    // Moves one cell down-right every 4 turns.
    let glider = [Cell::new(1, 0), Cell::new(2, 1), Cell::new(0, 2), Cell::new(1, 2), Cell::new(2, 2)];
    let initial = Grid::with_alive(8, 8, glider);

    let (events, _) = run_collect(Params::new(8, 8).turns(4).thread_count(3), &initial);
    let shifted = Grid::with_alive(8, 8, glider.map(|c| Cell::new(c.x + 1, c.y + 1)));
    assert_eq!(final_alive(&events), shifted.alive_cells());

    let (events, _) = run_collect(Params::new(8, 8).turns(32).thread_count(3), &initial);
    assert_eq!(final_alive(&events), initial.alive_cells());
}

#[test]
fn sampled_counts_match_the_reported_generation() {
    let (width, height, turns) = (48, 48, 300);
    let initial = soup(width, height, 0.35, 0x5A3F);

    let mut populations = vec![initial.count_alive()];
    let mut naive = live_set(&initial);
    for _ in 0..turns {
        naive = step_naive(&naive, width, height);
        populations.push(naive.len());
    }

    let params = Params::new(width, height)
        .turns(turns)
        .thread_count(4)
        .sample_interval(Duration::from_millis(1));
    let (events, _) = run_collect(params, &initial);

    let mut last_turn_seen = 0;
    for event in &events {
        match event {
            Event::TurnComplete { turn } => last_turn_seen = *turn,
            Event::AliveCellsCount { turn, count } => {
                assert!(*turn > 0, "count reported before the first turn");
                assert!(*turn <= turns);
                assert_eq!(*count, populations[*turn as usize], "torn count at turn {turn}");
                // The sampler can only see published generations.
                assert!(*turn <= last_turn_seen + 1);
            }
            _ => {}
        }
    }

    let final_pos = events
        .iter()
        .position(|e| matches!(e, Event::FinalTurnComplete { .. }))
        .unwrap();
    assert!(
        !events[final_pos..]
            .iter()
            .any(|e| matches!(e, Event::AliveCellsCount { .. })),
        "sampler emitted after the final state"
    );
}

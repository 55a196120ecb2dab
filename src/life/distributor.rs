//! Generation coordinator.
//!
//! Drives a run through `Loading -> Running <-> Paused / Saving ->
//! Finalizing -> Closed`. Each generation takes the world's write lock,
//! hands every worker a disjoint band of the next buffer inside one rayon
//! scope (the scope end is the barrier), flips the buffers and only then
//! releases the lock and reports `TurnComplete`.

use std::panic::{self, AssertUnwindSafe};
use std::thread;
use std::time::Duration;

use crossbeam_channel::{Receiver, Sender};

use super::config::Params;
use super::control::{Command, ControlLoop};
use super::error::GolError;
use super::event::{Event, State};
use super::grid::Grid;
use super::partition::{Band, bands};
use super::sampler::Sampler;
use super::worker;
use super::world::{SharedWorld, World};
use crate::io::{ImageIo, IoError};

const IDLE_POLL_INTERVAL: Duration = Duration::from_millis(1);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Loading,
    Running,
    Paused,
    Saving,
    Finalizing,
    Closed,
}

/// What the run loop should do after handling a command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// Run a full simulation, blocking until the event stream has been closed.
///
/// Initial state is requested from `io` under `params.input_label()`.
/// Events go to `events`; the channel is closed (all senders dropped) when
/// this returns, successfully or not. `control` may be
/// [`crossbeam_channel::never`] for unattended runs.
pub fn run<I: ImageIo>(
    params: Params,
    io: I,
    events: Sender<Event>,
    control: Receiver<Command>,
) -> Result<(), GolError> {
    params.validate()?;
    let threads = params.resolved_threads();
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .thread_name(|i| format!("gol-worker-{i}"))
        .build()?;

    log::info!(
        "starting {}x{} for {} turns on {threads} workers",
        params.width,
        params.height,
        params.turns
    );

    Distributor {
        params,
        threads,
        io,
        events,
        control: ControlLoop::new(control),
        pool,
        phase: Phase::Loading,
    }
    .run()
}

struct Distributor<I> {
    params: Params,
    threads: usize,
    io: I,
    events: Sender<Event>,
    control: ControlLoop,
    pool: rayon::ThreadPool,
    phase: Phase,
}

impl<I: ImageIo> Distributor<I> {
    fn run(mut self) -> Result<(), GolError> {
        let world = SharedWorld::new(self.load()?);

        if self.params.turns > 0 {
            self.enter(Phase::Running);
            let sampler = Sampler::spawn(
                world.clone(),
                self.params.sample_interval,
                self.events.clone(),
            )?;
            let flow = self.execute(&world);
            // Joined before any terminal event, so no count can trail them.
            sampler.stop();
            if flow? == Flow::Continue {
                self.save(&world)?;
            }
        } else {
            self.save(&world)?;
        }

        self.finalize(&world);
        self.close(&world)
    }

    fn enter(&mut self, phase: Phase) {
        log::debug!("{:?} -> {:?}", self.phase, phase);
        self.phase = phase;
    }

    fn emit(&self, event: Event) {
        log::trace!("{event}");
        // A dropped receiver only means nobody is watching any more.
        let _ = self.events.send(event);
    }

    fn load(&mut self) -> Result<World, GolError> {
        let (width, height) = (self.params.width, self.params.height);
        let label = self.params.input_label();
        let raster = self.io.request_input(&label, width, height)?;
        if raster.len() != width * height {
            return Err(IoError::Truncated {
                label,
                expected: width * height,
                found: raster.len(),
            }
            .into());
        }

        let grid = Grid::from_raster(width, height, &raster);
        log::info!("loaded {label} with {} alive cells", grid.count_alive());
        Ok(World::new(grid))
    }

    /// Execute the remaining turns, handling commands between generations.
    fn execute(&mut self, world: &SharedWorld) -> Result<Flow, GolError> {
        loop {
            let completed = world.read().turn();
            if completed >= self.params.turns {
                break;
            }
            while let Some(command) = self.control.poll() {
                if self.handle(command, world)? == Flow::Quit {
                    return Ok(Flow::Quit);
                }
            }
            self.step(world)?;
        }
        Ok(Flow::Continue)
    }

    fn handle(&mut self, command: Command, world: &SharedWorld) -> Result<Flow, GolError> {
        log::debug!("command {command:?} in {:?}", self.phase);
        match command {
            Command::Save => {
                self.save(world)?;
                self.enter(Phase::Running);
                Ok(Flow::Continue)
            }
            Command::Quit => {
                self.save(world)?;
                Ok(Flow::Quit)
            }
            Command::Pause => self.pause(world),
            Command::Resume => Ok(Flow::Continue),
        }
    }

    /// Block on the control channel until told to resume or quit.
    fn pause(&mut self, world: &SharedWorld) -> Result<Flow, GolError> {
        let turn = world.read().turn();
        self.enter(Phase::Paused);
        log::info!("paused at turn {turn}");
        self.emit(Event::StateChange {
            turn,
            state: State::Paused,
        });

        loop {
            match self.control.wait() {
                Some(Command::Save) => {
                    self.save(world)?;
                    self.enter(Phase::Paused);
                }
                Some(Command::Quit) => {
                    self.save(world)?;
                    return Ok(Flow::Quit);
                }
                // Nobody is left to resume us, so carry on.
                Some(Command::Pause | Command::Resume) | None => break,
            }
        }

        self.enter(Phase::Running);
        log::info!("resuming at turn {turn}");
        self.emit(Event::StateChange {
            turn,
            state: State::Executing,
        });
        Ok(Flow::Continue)
    }

    /// Compute one generation across all workers and publish it.
    fn step(&mut self, world: &SharedWorld) -> Result<(), GolError> {
        self.step_with(world, |current, band, out, turn, events| {
            worker::advance_band(current, band, out, turn, events);
        })
    }

    /// Run `advance` once per band inside the pool, then flip. Nothing is
    /// published if any band panics.
    fn step_with<F>(&mut self, world: &SharedWorld, advance: F) -> Result<(), GolError>
    where
        F: Fn(&Grid, Band, &mut [u8], u64, &Sender<Event>) + Sync,
    {
        let mut guard = world.write();
        let turn = guard.turn() + 1;
        let (current, next) = guard.split();
        let width = current.width();
        let height = current.height();
        let threads = self.threads;
        let events = &self.events;
        let advance = &advance;

        let dispatched = panic::catch_unwind(AssertUnwindSafe(|| {
            self.pool.scope(|scope| {
                let mut rest = next.as_bytes_mut();
                for band in bands(height, threads) {
                    let (out, tail) = std::mem::take(&mut rest).split_at_mut(band.len() * width);
                    rest = tail;
                    let events = events.clone();
                    scope.spawn(move |_| {
                        advance(current, band, out, turn, &events);
                    });
                }
            });
        }));
        if dispatched.is_err() {
            // The half-written next buffer is never published.
            return Err(GolError::WorkerPanicked { turn });
        }

        guard.flip();
        drop(guard);

        log::debug!("turn {turn} complete");
        self.emit(Event::TurnComplete { turn });
        Ok(())
    }

    fn save(&mut self, world: &SharedWorld) -> Result<(), GolError> {
        self.enter(Phase::Saving);
        let guard = world.read();
        let turn = guard.turn();
        let grid = guard.current();
        let label = self.params.output_label(turn);
        self.io
            .request_output(&label, grid.width(), grid.height(), grid.as_bytes())?;
        drop(guard);

        log::info!("saved snapshot {label}");
        self.emit(Event::ImageOutputComplete { turn, label });
        Ok(())
    }

    fn finalize(&mut self, world: &SharedWorld) {
        self.enter(Phase::Finalizing);
        let guard = world.read();
        let turn = guard.turn();
        let alive = guard.current().alive_cells();
        drop(guard);

        log::info!("finished at turn {turn} with {} alive cells", alive.len());
        self.emit(Event::FinalTurnComplete { turn, alive });
    }

    fn close(mut self, world: &SharedWorld) -> Result<(), GolError> {
        self.enter(Phase::Closed);
        // Outstanding writes must land (or fail) before we report quitting.
        while !self.io.query_idle()? {
            thread::sleep(IDLE_POLL_INTERVAL);
        }

        let turn = world.read().turn();
        self.emit(Event::StateChange {
            turn,
            state: State::Quitting,
        });
        drop(self.events);
        Ok(())
    }
}

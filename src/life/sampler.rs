//! Periodic alive-cell reporter.
//!
//! Runs on its own thread, independent of the generation barrier. Each tick
//! takes the read side of the world lock, which the distributor only holds
//! for writing during a dispatch window, so counts always describe a whole
//! published generation.

use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{Receiver, Sender, bounded, select, tick};

use super::error::GolError;
use super::event::Event;
use super::world::{SharedWorld, World};

/// Count for the current generation, or `None` before the first turn has
/// completed.
pub fn sample(world: &World) -> Option<Event> {
    let turn = world.turn();
    (turn > 0).then(|| Event::AliveCellsCount {
        turn,
        count: world.current().count_alive(),
    })
}

/// Handle to a running sampler thread. Dropping it stops and joins the thread.
pub struct Sampler {
    stop: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl Sampler {
    pub fn spawn(
        world: SharedWorld,
        interval: Duration,
        events: Sender<Event>,
    ) -> Result<Self, GolError> {
        let (stop_tx, stop_rx) = bounded(1);
        let handle = thread::Builder::new()
            .name("gol-sampler".into())
            .spawn(move || sample_loop(&world, interval, &stop_rx, &events))
            .map_err(GolError::Spawn)?;
        Ok(Self {
            stop: Some(stop_tx),
            handle: Some(handle),
        })
    }

    /// Stop ticking and wait for the thread, so it can emit nothing afterwards.
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        // Disconnecting the stop channel wakes the select below.
        self.stop.take();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::error!("sampler thread panicked");
            }
        }
    }
}

impl Drop for Sampler {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn sample_loop(world: &SharedWorld, interval: Duration, stop: &Receiver<()>, events: &Sender<Event>) {
    let ticker = tick(interval);
    loop {
        select! {
            recv(ticker) -> _ => {
                let event = sample(&world.read());
                if let Some(event) = event {
                    log::trace!("{event}");
                    if events.send(event).is_err() {
                        break;
                    }
                }
            }
            recv(stop) -> _ => break,
        }
    }
    log::debug!("sampler stopped");
}

//! Parallel Game of Life engine on a torus.

mod config;
mod control;
mod distributor;
mod error;
mod event;
mod grid;
mod partition;
mod sampler;
mod worker;
mod world;

pub use config::{DEFAULT_SAMPLE_INTERVAL, Params};
pub use control::{Command, ControlLoop};
pub use distributor::run;
pub use error::{ConfigError, GolError};
pub use event::{Event, State};
pub use grid::{ALIVE, Cell, DEAD, Grid};
pub use partition::{Band, Bands, bands};
pub use sampler::{Sampler, sample};
pub use worker::{advance_band, next_state};
pub use world::{SharedWorld, World};

//! Conway's Game of Life (B3/S23) on a wrapping bitmap, parallelised across
//! row bands, with streamed progress events and interactive control.

pub mod io;
pub mod life;
pub use io::{ImageIo, IoError, MemoryIo, PgmIo};
pub use life::{Cell, Command, Event, GolError, Params, State, run};

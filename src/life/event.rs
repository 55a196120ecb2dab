//! Events streamed to the observer.

use std::fmt;

use super::grid::Cell;

/// Run state reported through [`Event::StateChange`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum State {
    Paused,
    Executing,
    Quitting,
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            State::Paused => write!(f, "Paused"),
            State::Executing => write!(f, "Executing"),
            State::Quitting => write!(f, "Quitting"),
        }
    }
}

/// Every event carries the number of completed turns at the time it was
/// produced. `CellFlipped` carries the turn it belongs to, i.e. the
/// generation being computed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    CellFlipped { turn: u64, cell: Cell },
    TurnComplete { turn: u64 },
    AliveCellsCount { turn: u64, count: usize },
    ImageOutputComplete { turn: u64, label: String },
    FinalTurnComplete { turn: u64, alive: Vec<Cell> },
    StateChange { turn: u64, state: State },
}

impl Event {
    pub fn turn(&self) -> u64 {
        match *self {
            Event::CellFlipped { turn, .. }
            | Event::TurnComplete { turn }
            | Event::AliveCellsCount { turn, .. }
            | Event::ImageOutputComplete { turn, .. }
            | Event::FinalTurnComplete { turn, .. }
            | Event::StateChange { turn, .. } => turn,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Completed Turns {:<8}", self.turn())?;
        match self {
            Event::CellFlipped { cell, .. } => write!(f, "Cell Flipped ({},{})", cell.x, cell.y),
            Event::TurnComplete { .. } => write!(f, "Turn Complete"),
            Event::AliveCellsCount { count, .. } => write!(f, "Alive Cells {count}"),
            Event::ImageOutputComplete { label, .. } => write!(f, "File {label} Output Done"),
            Event::FinalTurnComplete { alive, .. } => {
                write!(f, "Final Turn Complete, {} Alive", alive.len())
            }
            Event::StateChange { state, .. } => write!(f, "{state}"),
        }
    }
}

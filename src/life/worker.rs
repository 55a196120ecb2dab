//! Band worker for the B3/S23 rule.
//!
//! Reads the current grid, writes the next-generation bytes for its own rows
//! into a slice that nobody else holds, and reports every cell whose state
//! changed.

use crossbeam_channel::Sender;

use super::event::Event;
use super::grid::{ALIVE, Cell, DEAD, Grid, neighbors_in_rows};
use super::partition::Band;

/// `RULE[alive][neighbors]` is the next state.
const RULE: [[bool; 9]; 2] = build_rule();

const fn build_rule() -> [[bool; 9]; 2] {
    let mut table = [[false; 9]; 2];
    let mut n = 0;
    while n <= 8 {
        table[0][n] = n == 3;
        table[1][n] = n == 2 || n == 3;
        n += 1;
    }
    table
}

/// Next state of a cell with `neighbors` live neighbors.
#[inline(always)]
pub fn next_state(alive: bool, neighbors: u8) -> bool {
    RULE[alive as usize][neighbors as usize]
}

/// Compute rows `band` of the next generation into `out`.
///
/// `out` holds exactly the band's rows, row-major. Each changed cell is
/// reported as a `CellFlipped` carrying `turn`, the generation being
/// produced. Returns the number of flips.
pub fn advance_band(
    current: &Grid,
    band: Band,
    out: &mut [u8],
    turn: u64,
    events: &Sender<Event>,
) -> usize {
    let width = current.width();
    assert_eq!(
        out.len(),
        band.len() * width,
        "output slice does not match band {band:?}"
    );
    assert!(band.end <= current.height(), "band {band:?} outside grid");

    let mut flips = 0;
    for (y, out_row) in band.rows().zip(out.chunks_exact_mut(width.max(1))) {
        let above = current.row(current.row_above(y));
        let row = current.row(y);
        let below = current.row(current.row_below(y));

        for (x, slot) in out_row.iter_mut().enumerate() {
            let alive = row[x] != DEAD;
            let next = next_state(alive, neighbors_in_rows(above, row, below, x));
            *slot = if next { ALIVE } else { DEAD };

            if next != alive {
                flips += 1;
                // A closed sink only means nobody is watching.
                let _ = events.send(Event::CellFlipped {
                    turn,
                    cell: Cell::new(x, y),
                });
            }
        }
    }
    flips
}

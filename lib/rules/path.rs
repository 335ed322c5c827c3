use crate::chess::{Board, Delta, OutOfBounds, Square};

/// Whether some square strictly between `origin` and `origin + delta` is occupied.
///
/// Only meaningful for deltas along ranks, files and diagonals.
pub fn blocked(board: &Board, origin: Square, delta: Delta) -> Result<bool, OutOfBounds> {
    let step = delta.step();

    for n in 1..delta.distance() as i8 {
        if board.is_occupied(origin.offset(step.times(n))?) {
            return Ok(true);
        }
    }

    Ok(false)
}

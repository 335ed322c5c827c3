use crate::chess::{Board, Color, Piece, Square};
use crate::rules::{blocked, pattern_valid};
use derive_more::{Display, Error};

/// The side not to move is in check, so its king could be captured.
#[derive(Debug, Display, Copy, Clone, Eq, PartialEq, Hash, Error)]
#[display(fmt = "the {_0} king is in check while its opponent is to move")]
pub struct IllegalPosition(#[error(not(source))] pub Color);

/// Whether `piece` attacks `target` on this board.
///
/// Castling never attacks.
pub fn attacks(board: &Board, piece: &Piece, target: Square) -> bool {
    let origin = match piece.square() {
        Some(sq) => sq,
        None => return false,
    };

    let delta = target - origin;

    pattern_valid(piece, delta, board.is_occupied(target))
        && (piece.role().jumps() || blocked(board, origin, delta) == Ok(false))
}

/// Whether the king of the given [`Color`] is attacked by any enemy piece.
pub fn king_in_check(board: &Board, side: Color) -> bool {
    let king = match board[board.king(side)].square() {
        Some(sq) => sq,
        None => return false,
    };

    board.pieces(!side).any(|(_, p)| attacks(board, p, king))
}

/// Rejects positions that could not have been reached with `turn` to move.
pub fn validate_position(board: &Board, turn: Color) -> Result<(), IllegalPosition> {
    if king_in_check(board, !turn) {
        Err(IllegalPosition(!turn))
    } else {
        Ok(())
    }
}

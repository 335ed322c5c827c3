use crate::chess::{Board, PieceId, PieceNotOnBoard, Square};
use crate::rules::king_in_check;
use std::ops::Deref;

/// A move applied to the board in place, reverted when dropped.
///
/// The captured piece, if any, is taken off the board for as long as this guard lives.
#[derive(Debug)]
pub struct Hypothetical<'a> {
    board: &'a mut Board,
    mover: PieceId,
    origin: Square,
    target: Square,
    captured: Option<PieceId>,
}

impl<'a> Hypothetical<'a> {
    /// Moves `mover` to `target`, capturing whatever stands there.
    pub fn new(
        board: &'a mut Board,
        mover: PieceId,
        target: Square,
    ) -> Result<Self, PieceNotOnBoard> {
        let origin = board.whereabouts(mover)?;
        let captured = board[target].filter(|&id| id != mover);

        if let Some(victim) = captured {
            board.lift(victim);
        }

        board.lift(mover);
        board.put(mover, target);

        Ok(Hypothetical {
            board,
            mover,
            origin,
            target,
            captured,
        })
    }
}

impl<'a> Deref for Hypothetical<'a> {
    type Target = Board;

    fn deref(&self) -> &Self::Target {
        self.board
    }
}

impl<'a> Drop for Hypothetical<'a> {
    fn drop(&mut self) {
        self.board.lift(self.mover);
        self.board.put(self.mover, self.origin);

        if let Some(victim) = self.captured {
            self.board.put(victim, self.target);
        }
    }
}

/// Whether moving `mover` to `target` would leave its own king in check.
///
/// The board is left exactly as it was found.
pub fn leaves_king_in_check(
    board: &mut Board,
    mover: PieceId,
    target: Square,
) -> Result<bool, PieceNotOnBoard> {
    let side = board[mover].color();
    let hypothetical = Hypothetical::new(board, mover, target)?;
    Ok(king_in_check(&hypothetical, side))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chess::Color;
    use test_strategy::proptest;

    fn sq(s: &str) -> Square {
        s.parse().unwrap()
    }

    #[proptest]
    fn board_is_restored_after_hypothetical_move(id: PieceId, target: Square) {
        let mut b: Board = "r3k2r/pppq1ppp/2n5/3Pp3/8/2N5/PPP2PPP/R3K2R".parse().unwrap();
        let before = b.clone();

        match Hypothetical::new(&mut b, id, target) {
            Err(e) => assert_eq!(e, PieceNotOnBoard(id)),
            Ok(h) => {
                assert_eq!(h[target], Some(id));
                assert!(h.is_consistent());
            }
        }

        assert_eq!(b, before);
    }

    #[test]
    fn pinned_piece_may_not_leave_the_line() {
        let mut b: Board = "4k3/4r3/8/8/8/8/4B3/4K3".parse().unwrap();
        let bishop = b[sq("e2")].unwrap();
        assert_eq!(leaves_king_in_check(&mut b, bishop, sq("d3")), Ok(true));
    }

    #[test]
    fn capturing_the_checker_resolves_check() {
        let mut b: Board = "4k3/8/8/8/8/8/4r3/4K3".parse().unwrap();
        let king = b.king(Color::White);
        assert_eq!(leaves_king_in_check(&mut b, king, sq("e2")), Ok(false));
        assert_eq!(leaves_king_in_check(&mut b, king, sq("d2")), Ok(true));
        assert!(b.is_consistent());
    }

    #[test]
    fn captured_piece_cannot_be_moved() {
        let mut b = Board::default();
        let queen = b[sq("d1")].unwrap();
        let pawn = b[sq("d7")].unwrap();
        b.relocate(queen, sq("d7")).unwrap();

        assert_eq!(
            leaves_king_in_check(&mut b, pawn, sq("d6")),
            Err(PieceNotOnBoard(pawn))
        );
    }
}

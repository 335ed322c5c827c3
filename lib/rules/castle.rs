use crate::chess::{Board, PieceId, PieceNotOnBoard, Role, Square};
use crate::rules::{king_in_check, leaves_king_in_check};
use derive_more::Display;

/// A castling move validated against a specific board.
///
/// Only valid until the board changes.
#[derive(Debug, Display, Copy, Clone, Eq, PartialEq, Hash)]
#[display(fmt = "{king}{king_to}+{rook}{rook_to}")]
pub struct Castle {
    /// The castling king.
    pub king: PieceId,
    /// The partner rook.
    pub rook: PieceId,
    /// Where the king lands.
    pub king_to: Square,
    /// Where the rook lands, next to the king on the side it came from.
    pub rook_to: Square,
}

impl Castle {
    /// Validates castling by moving `king` two files towards `target`.
    ///
    /// Returns `None` if the move is not a castle or the king would start from, cross, or
    /// land on an attacked square.
    pub fn validate(
        board: &mut Board,
        king: PieceId,
        target: Square,
    ) -> Result<Option<Self>, PieceNotOnBoard> {
        let piece = board[king];
        let origin = board.whereabouts(king)?;
        let delta = target - origin;

        if piece.role() != Role::King
            || !piece.first_move()
            || delta.rows != 0
            || delta.cols.abs() != 2
            || board.is_occupied(target)
        {
            return Ok(None);
        }

        let step = delta.step();

        // The first piece found towards the edge must be an unmoved rook in the corner.
        let mut corner = origin;
        let rook = loop {
            corner = match corner.offset(step) {
                Ok(sq) => sq,
                Err(_) => return Ok(None),
            };

            if let Some(id) = board[corner] {
                break id;
            }
        };

        let partner = board[rook];
        if partner.role() != Role::Rook
            || partner.color() != piece.color()
            || !partner.first_move()
            || corner.offset(step).is_ok()
        {
            return Ok(None);
        }

        let rook_to = match origin.offset(step) {
            Ok(sq) => sq,
            Err(_) => return Ok(None),
        };

        if king_in_check(board, piece.color())
            || leaves_king_in_check(board, king, rook_to)?
            || leaves_king_in_check(board, king, target)?
        {
            return Ok(None);
        }

        Ok(Some(Castle {
            king,
            rook,
            king_to: target,
            rook_to,
        }))
    }

    /// Relocates the king and then the rook.
    ///
    /// Nothing changes if either piece is not on the board.
    pub fn execute(&self, board: &mut Board) -> Result<(), PieceNotOnBoard> {
        board.whereabouts(self.rook)?;
        board.relocate(self.king, self.king_to)?;
        board.relocate(self.rook, self.rook_to)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chess::{Color, Delta};
    use test_strategy::proptest;

    fn sq(s: &str) -> Square {
        s.parse().unwrap()
    }

    fn castle(fen: &str, king: &str, target: &str) -> Option<Castle> {
        let mut b: Board = fen.parse().unwrap();
        let before = b.clone();
        let id = b[sq(king)].unwrap();
        let castle = Castle::validate(&mut b, id, sq(target)).unwrap();
        assert_eq!(b, before);
        castle
    }

    #[proptest]
    fn castling_is_illegal_from_the_starting_position(c: Color, #[strategy(-1i8..=1)] side: i8) {
        let mut b = Board::default();
        let king = b.king(c);
        let origin = b.whereabouts(king).unwrap();
        let target = origin.offset(Delta::new(0, 2 * side)).unwrap();
        assert_eq!(Castle::validate(&mut b, king, target), Ok(None));
    }

    #[test]
    fn king_castles_on_either_side_with_a_clear_path() {
        let fen = "r3k2r/8/8/8/8/8/8/R3K2R";

        let c = castle(fen, "e1", "g1").unwrap();
        assert_eq!((c.king_to, c.rook_to), (sq("g1"), sq("f1")));

        let c = castle(fen, "e1", "c1").unwrap();
        assert_eq!((c.king_to, c.rook_to), (sq("c1"), sq("d1")));

        let c = castle(fen, "e8", "g8").unwrap();
        assert_eq!((c.king_to, c.rook_to), (sq("g8"), sq("f8")));
    }

    #[test]
    fn every_square_between_king_and_rook_must_be_empty() {
        assert_eq!(castle("4k3/8/8/8/8/8/8/RN2K3", "e1", "c1"), None);
    }

    #[test]
    fn rook_must_not_have_moved() {
        let mut b: Board = "4k3/8/8/8/8/8/8/4K2R".parse().unwrap();
        let rook = b[sq("h1")].unwrap();
        b.relocate(rook, sq("h2")).unwrap();
        b.relocate(rook, sq("h1")).unwrap();

        let king = b.king(Color::White);
        assert_eq!(Castle::validate(&mut b, king, sq("g1")), Ok(None));
    }

    #[test]
    fn partner_must_be_a_rook_of_the_same_color() {
        assert_eq!(castle("4k3/8/8/8/8/8/8/4K2r", "e1", "g1"), None);
        assert_eq!(castle("4k3/8/8/8/8/8/8/4K2B", "e1", "g1"), None);
    }

    #[test]
    fn king_may_not_castle_out_of_through_or_into_check() {
        assert_eq!(castle("4r1k1/8/8/8/8/8/8/4K2R", "e1", "g1"), None);
        assert_eq!(castle("5rk1/8/8/8/8/8/8/4K2R", "e1", "g1"), None);
        assert_eq!(castle("6rk/8/8/8/8/8/8/4K2R", "e1", "g1"), None);
        assert!(castle("7k/8/8/8/8/8/8/4K2R", "e1", "g1").is_some());
    }

    #[test]
    fn executing_a_castle_moves_both_pieces() {
        let mut b: Board = "4k3/8/8/8/8/8/8/R3K3".parse().unwrap();
        let king = b.king(Color::White);
        let c = Castle::validate(&mut b, king, sq("c1")).unwrap().unwrap();

        assert_eq!(c.execute(&mut b), Ok(()));
        assert_eq!(b[sq("c1")], Some(c.king));
        assert_eq!(b[sq("d1")], Some(c.rook));
        assert_eq!(b[sq("a1")], None);
        assert!(!b[c.king].first_move());
        assert!(!b[c.rook].first_move());
        assert!(b.is_consistent());
    }
}

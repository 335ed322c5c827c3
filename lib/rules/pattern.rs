use crate::chess::{Delta, Piece, Role};

/// Whether the geometry of `piece` allows it to move by `delta`.
///
/// Blocking and king safety are not considered. `occupied` tells whether the destination
/// holds a piece, which only matters to pawns.
pub fn pattern_valid(piece: &Piece, delta: Delta, occupied: bool) -> bool {
    if delta.is_zero() {
        return false;
    }

    let (rows, cols) = (delta.rows.unsigned_abs(), delta.cols.unsigned_abs());
    let straight = (rows == 0) != (cols == 0);
    let diagonal = rows == cols;

    match piece.role() {
        Role::Rook => straight,
        Role::Knight => matches!((rows, cols), (1, 2) | (2, 1)),
        Role::Bishop => diagonal,
        Role::Queen => straight || diagonal,
        Role::King => rows <= 1 && cols <= 1,
        Role::Pawn => match (delta.rows * piece.color().forward(), cols) {
            (1, 1) => occupied,
            (1, 0) => !occupied,
            (2, 0) => piece.first_move() && !occupied,
            _ => false,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chess::{Color, Square};
    use test_strategy::proptest;

    fn piece(c: Color, r: Role) -> Piece {
        Piece::new(c, r, None)
    }

    #[proptest]
    fn zero_delta_is_never_valid(c: Color, r: Role, occupied: bool) {
        assert!(!pattern_valid(&piece(c, r), Delta::new(0, 0), occupied));
    }

    #[proptest]
    fn rooks_move_along_ranks_and_files(c: Color, d: Delta, occupied: bool) {
        let expected = !d.is_zero() && (d.rows == 0 || d.cols == 0);
        assert_eq!(pattern_valid(&piece(c, Role::Rook), d, occupied), expected);
    }

    #[proptest]
    fn bishops_move_along_diagonals(c: Color, d: Delta, occupied: bool) {
        let expected = !d.is_zero() && d.rows.abs() == d.cols.abs();
        assert_eq!(pattern_valid(&piece(c, Role::Bishop), d, occupied), expected);
    }

    #[proptest]
    fn queens_move_like_rooks_or_bishops(c: Color, d: Delta, occupied: bool) {
        let rook = pattern_valid(&piece(c, Role::Rook), d, occupied);
        let bishop = pattern_valid(&piece(c, Role::Bishop), d, occupied);
        assert_eq!(pattern_valid(&piece(c, Role::Queen), d, occupied), rook || bishop);
    }

    #[proptest]
    fn kings_move_a_single_step(c: Color, d: Delta, occupied: bool) {
        assert_eq!(
            pattern_valid(&piece(c, Role::King), d, occupied),
            d.distance() == 1
        );
    }

    #[proptest]
    fn knights_move_in_an_l_shape(c: Color, d: Delta, occupied: bool) {
        let expected = d.rows.abs() * d.cols.abs() == 2;
        assert_eq!(pattern_valid(&piece(c, Role::Knight), d, occupied), expected);
    }

    #[proptest]
    fn pawns_never_move_backwards(c: Color, d: Delta, occupied: bool) {
        if d.rows * c.forward() <= 0 {
            assert!(!pattern_valid(&piece(c, Role::Pawn), d, occupied));
        }
    }

    #[proptest]
    fn pawns_capture_diagonally_only(c: Color, #[strategy(-1i8..=1)] cols: i8) {
        let pawn = piece(c, Role::Pawn);
        let d = Delta::new(c.forward(), cols);
        assert_eq!(pattern_valid(&pawn, d, true), cols != 0);
        assert_eq!(pattern_valid(&pawn, d, false), cols == 0);
    }

    #[proptest]
    fn pawns_double_step_on_first_move_only(c: Color) {
        let mut pawn = Piece::new(c, Role::Pawn, Square::new(c.pawn_row(), 0).ok());
        let d = Delta::new(2 * c.forward(), 0);

        assert!(pattern_valid(&pawn, d, false));
        assert!(!pattern_valid(&pawn, d, true));

        pawn.set_first_move(false);
        assert!(!pattern_valid(&pawn, d, false));
    }
}

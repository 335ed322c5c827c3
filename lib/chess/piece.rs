use crate::chess::{Color, Role, Square};
use derive_more::{Display, Error};

/// Identifies one of the 32 slots in the [`Board`][`crate::chess::Board`]'s roster.
///
/// Slots `0..16` belong to white and `16..32` to black.
#[derive(Debug, Display, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
#[display(fmt = "#{_0}")]
pub struct PieceId(#[cfg_attr(test, strategy(0u8..32))] u8);

impl PieceId {
    /// The number of slots each side owns.
    pub const PER_SIDE: u8 = 16;

    /// The slot of the king, relative to its side.
    pub const KING_SLOT: u8 = 4;

    /// Constructs [`PieceId`] from its index in the roster.
    pub fn new(index: u8) -> Option<Self> {
        (index < 2 * Self::PER_SIDE).then_some(PieceId(index))
    }

    /// Constructs [`PieceId`] from a side and a slot relative to that side.
    ///
    /// # Panics
    ///
    /// Panics if `slot` is not in the range `(0..16)`.
    pub fn of(side: Color, slot: u8) -> Self {
        assert!(slot < Self::PER_SIDE, "slot {slot} out of range");
        PieceId(side as u8 * Self::PER_SIDE + slot)
    }

    /// This piece's index in the roster.
    #[inline(always)]
    pub fn index(&self) -> usize {
        self.0.into()
    }

    /// This piece's slot relative to its side.
    #[inline(always)]
    pub fn slot(&self) -> usize {
        (self.0 % Self::PER_SIDE).into()
    }

    /// The side that owns this slot.
    #[inline(always)]
    pub fn color(&self) -> Color {
        if self.0 < Self::PER_SIDE {
            Color::White
        } else {
            Color::Black
        }
    }

    /// An iterator over the slots of one side.
    pub fn iter(side: Color) -> impl DoubleEndedIterator<Item = Self> + ExactSizeIterator {
        (0..Self::PER_SIDE).map(move |slot| PieceId::of(side, slot))
    }

    /// An iterator over every slot in the roster.
    pub fn all() -> impl DoubleEndedIterator<Item = Self> + ExactSizeIterator {
        (0..2 * Self::PER_SIDE).map(PieceId)
    }
}

/// A captured piece was asked to move.
#[derive(Debug, Display, Copy, Clone, Eq, PartialEq, Hash, Error)]
#[display(fmt = "piece `{_0}` is not on the board")]
pub struct PieceNotOnBoard(#[error(not(source))] pub PieceId);

/// A chess piece and its whereabouts.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Piece {
    color: Color,
    role: Role,
    square: Option<Square>,
    first_move: bool,
}

impl Piece {
    /// Constructs a [`Piece`] that has not moved yet.
    pub fn new(color: Color, role: Role, square: Option<Square>) -> Self {
        Piece {
            color,
            role,
            square,
            first_move: true,
        }
    }

    /// This piece's [`Color`].
    #[inline(always)]
    pub fn color(&self) -> Color {
        self.color
    }

    /// This piece's [`Role`].
    #[inline(always)]
    pub fn role(&self) -> Role {
        self.role
    }

    /// The [`Square`] this piece stands on, or `None` if it was captured.
    #[inline(always)]
    pub fn square(&self) -> Option<Square> {
        self.square
    }

    /// Whether this piece has yet to make its first move.
    ///
    /// Only meaningful for pawns, rooks and kings.
    #[inline(always)]
    pub fn first_move(&self) -> bool {
        self.first_move
    }

    pub(crate) fn set_square(&mut self, square: Option<Square>) {
        self.square = square;
    }

    pub(crate) fn set_role(&mut self, role: Role) {
        self.role = role;
    }

    pub(crate) fn set_first_move(&mut self, first_move: bool) {
        self.first_move = first_move;
    }

    /// The algebraic letter of this piece, upper case for white.
    pub fn letter(&self) -> char {
        let c = match self.role {
            Role::Pawn => 'p',
            Role::Knight => 'n',
            Role::Bishop => 'b',
            Role::Rook => 'r',
            Role::Queen => 'q',
            Role::King => 'k',
        };

        match self.color {
            Color::White => c.to_ascii_uppercase(),
            Color::Black => c,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_strategy::proptest;

    #[proptest]
    fn piece_id_is_owned_by_one_side(id: PieceId) {
        assert_eq!(PieceId::of(id.color(), id.slot() as u8), id);
    }

    #[proptest]
    fn piece_id_can_be_constructed_from_index(id: PieceId) {
        assert_eq!(PieceId::new(id.index() as u8), Some(id));
    }

    #[proptest]
    fn piece_id_out_of_range_is_rejected(#[strategy(32u8..)] i: u8) {
        assert_eq!(PieceId::new(i), None);
    }

    #[proptest]
    #[should_panic]
    fn piece_id_panics_if_slot_out_of_range(c: Color, #[strategy(16u8..)] slot: u8) {
        PieceId::of(c, slot);
    }

    #[proptest]
    fn iter_returns_the_sixteen_slots_of_a_side(c: Color) {
        assert_eq!(PieceId::iter(c).len(), 16);
        assert!(PieceId::iter(c).all(|id| id.color() == c));
    }

    #[proptest]
    fn new_piece_has_not_moved(c: Color, r: Role, sq: Option<Square>) {
        let p = Piece::new(c, r, sq);
        assert!(p.first_move());
        assert_eq!((p.color(), p.role(), p.square()), (c, r, sq));
    }

    #[test]
    fn letter_is_upper_case_for_white() {
        assert_eq!(Piece::new(Color::White, Role::Knight, None).letter(), 'N');
        assert_eq!(Piece::new(Color::Black, Role::Queen, None).letter(), 'q');
    }
}

use crate::chess::{Color, Piece, PieceId, PieceNotOnBoard, Role, Square};
use derive_more::{Display, Error};
use std::ops::Index;
use std::{fmt, str::FromStr};

/// The 8x8 grid of squares and the roster of 32 pieces.
///
/// Every occupied square refers to exactly one piece in the roster, and that piece
/// refers back to the same square.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Board {
    squares: [[Option<PieceId>; 8]; 8],
    pieces: [Piece; 32],
    kings: [PieceId; 2],
}

impl Default for Board {
    fn default() -> Self {
        use Role::*;
        const BACK: [Role; 8] = [Rook, Knight, Bishop, Queen, King, Bishop, Knight, Rook];

        let mut board = Board::empty();

        for side in [Color::White, Color::Black] {
            for (col, role) in (0u8..).zip(BACK) {
                let id = PieceId::of(side, col);
                board.spawn(id, Piece::new(side, role, square(side.back_row(), col)));
            }

            for col in 0..8 {
                let id = PieceId::of(side, 8 + col);
                board.spawn(id, Piece::new(side, Pawn, square(side.pawn_row(), col)));
            }
        }

        board
    }
}

fn square(row: u8, col: u8) -> Option<Square> {
    Square::new(row, col).ok()
}

impl Board {
    /// A board with both kings in their slots but off the grid and every other slot vacant.
    fn empty() -> Self {
        let pieces = std::array::from_fn(|i| {
            let side = if i < PieceId::PER_SIDE as usize {
                Color::White
            } else {
                Color::Black
            };

            match (i % PieceId::PER_SIDE as usize) as u8 {
                PieceId::KING_SLOT => Piece::new(side, Role::King, None),
                _ => Piece::new(side, Role::Pawn, None),
            }
        });

        Board {
            squares: Default::default(),
            pieces,
            kings: [
                PieceId::of(Color::White, PieceId::KING_SLOT),
                PieceId::of(Color::Black, PieceId::KING_SLOT),
            ],
        }
    }

    fn spawn(&mut self, id: PieceId, piece: Piece) {
        if let Some(sq) = piece.square() {
            self.squares[sq.row() as usize][sq.col() as usize] = Some(id);
        }

        self.pieces[id.index()] = piece;
    }

    /// The king of the given [`Color`].
    #[inline(always)]
    pub fn king(&self, side: Color) -> PieceId {
        self.kings[side as usize]
    }

    /// Whether some piece stands on the given [`Square`].
    #[inline(always)]
    pub fn is_occupied(&self, sq: Square) -> bool {
        self[sq].is_some()
    }

    /// The [`Piece`] standing on the given [`Square`], if any.
    pub fn piece_on(&self, sq: Square) -> Option<&Piece> {
        self[sq].map(|id| &self[id])
    }

    /// The [`Color`] of the piece standing on the given [`Square`], if any.
    pub fn color_on(&self, sq: Square) -> Option<Color> {
        self.piece_on(sq).map(Piece::color)
    }

    /// The [`Square`] a piece stands on.
    pub fn whereabouts(&self, id: PieceId) -> Result<Square, PieceNotOnBoard> {
        self[id].square().ok_or(PieceNotOnBoard(id))
    }

    /// An iterator over the pieces of one side that are still on the board.
    pub fn pieces(&self, side: Color) -> impl Iterator<Item = (PieceId, &Piece)> + '_ {
        PieceId::iter(side)
            .map(|id| (id, &self[id]))
            .filter(|(_, p)| p.square().is_some())
    }

    /// Takes a piece off the grid, returning the square it stood on.
    ///
    /// The piece keeps every other attribute and may be put back with [`Board::put`].
    pub(crate) fn lift(&mut self, id: PieceId) -> Option<Square> {
        let sq = self.pieces[id.index()].square()?;
        self.squares[sq.row() as usize][sq.col() as usize] = None;
        self.pieces[id.index()].set_square(None);
        Some(sq)
    }

    /// Puts a piece on an empty square.
    pub(crate) fn put(&mut self, id: PieceId, sq: Square) {
        debug_assert!(self[id].square().is_none());
        debug_assert!(self[sq].is_none());
        self.squares[sq.row() as usize][sq.col() as usize] = Some(id);
        self.pieces[id.index()].set_square(Some(sq));
    }

    /// Moves a piece to the given square, capturing whatever stands there.
    ///
    /// Returns the captured piece, if any. Nothing changes if the piece is not on the board.
    pub fn relocate(
        &mut self,
        id: PieceId,
        to: Square,
    ) -> Result<Option<PieceId>, PieceNotOnBoard> {
        let from = self.whereabouts(id)?;

        if from == to {
            return Ok(None);
        }

        let captured = self[to];
        if let Some(victim) = captured {
            self.lift(victim);
        }

        self.lift(id);
        self.put(id, to);
        self.pieces[id.index()].set_first_move(false);

        Ok(captured)
    }

    /// Changes a pawn into the given [`Role`].
    ///
    /// Kings are never affected.
    pub(crate) fn promote(&mut self, id: PieceId, role: Role) {
        debug_assert_ne!(role, Role::King);
        if self[id].role() == Role::Pawn {
            self.pieces[id.index()].set_role(role);
        }
    }

    /// Whether the grid and the roster agree on where every piece stands.
    pub fn is_consistent(&self) -> bool {
        let grid = Square::iter().all(|sq| match self[sq] {
            None => true,
            Some(id) => self[id].square() == Some(sq),
        });

        let roster = PieceId::all().all(|id| match self[id].square() {
            None => true,
            Some(sq) => self[sq] == Some(id),
        });

        let kings = [Color::White, Color::Black].into_iter().all(|c| {
            let k = &self[self.king(c)];
            k.role() == Role::King && k.color() == c
        });

        grid && roster && kings
    }
}

impl Index<Square> for Board {
    type Output = Option<PieceId>;

    #[inline(always)]
    fn index(&self, sq: Square) -> &Self::Output {
        &self.squares[sq.row() as usize][sq.col() as usize]
    }
}

impl Index<PieceId> for Board {
    type Output = Piece;

    #[inline(always)]
    fn index(&self, id: PieceId) -> &Self::Output {
        &self.pieces[id.index()]
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const FILES: &str = "     a   b   c   d   e   f   g   h";
        const RULE: &str = "   +---+---+---+---+---+---+---+---+";

        writeln!(f, "{FILES}")?;
        writeln!(f, "{RULE}")?;

        for row in 0..8u8 {
            write!(f, " {} |", 8 - row)?;

            for col in 0..8u8 {
                match square(row, col).and_then(|sq| self.piece_on(sq)) {
                    Some(p) => write!(f, " {} |", p.letter())?,
                    None => write!(f, "   |")?,
                }
            }

            writeln!(f, " {}", 8 - row)?;
            writeln!(f, "{RULE}")?;
        }

        write!(f, "{FILES}")
    }
}

/// The reason why parsing [`Board`] failed.
#[derive(Debug, Display, Clone, Eq, PartialEq, Error)]
pub enum ParseBoardError {
    #[display(fmt = "syntax error at the piece placement")]
    InvalidPlacement,
    #[display(fmt = "the {_0} side has no king")]
    MissingKing(#[error(not(source))] Color),
    #[display(fmt = "the {_0} side has multiple kings")]
    TooManyKings(#[error(not(source))] Color),
    #[display(fmt = "the {_0} side has more than 16 pieces")]
    TooManyPieces(#[error(not(source))] Color),
}

/// Parses the piece placement field of the FEN notation.
impl FromStr for Board {
    type Err = ParseBoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        use ParseBoardError::*;

        let rows: Vec<&str> = s.split('/').collect();
        if rows.len() != 8 {
            return Err(InvalidPlacement);
        }

        let mut found: Vec<(Square, Color, Role)> = Vec::with_capacity(64);
        for (row, text) in (0u8..).zip(rows) {
            let mut col = 0u8;

            for c in text.chars() {
                if let Some(n) = c.to_digit(10).filter(|n| (1..=8).contains(n)) {
                    col += n as u8;
                    if col > 8 {
                        return Err(InvalidPlacement);
                    }

                    continue;
                }

                let color = if c.is_ascii_uppercase() {
                    Color::White
                } else {
                    Color::Black
                };

                let role: Role = c
                    .to_ascii_lowercase()
                    .to_string()
                    .parse()
                    .map_err(|_| InvalidPlacement)?;

                let sq = Square::new(row, col).map_err(|_| InvalidPlacement)?;
                found.push((sq, color, role));
                col += 1;
            }

            if col != 8 {
                return Err(InvalidPlacement);
            }
        }

        let mut board = Board::empty();

        for side in [Color::White, Color::Black] {
            let mut own: Vec<&(Square, Color, Role)> =
                found.iter().filter(|(_, c, _)| *c == side).collect();

            // Rank by rank from this side's own back rank, files a..h.
            own.sort_by_key(|(sq, _, _)| {
                let depth = (sq.row() as i8 - side.back_row() as i8).unsigned_abs();
                (depth, sq.col())
            });

            let (kings, others): (Vec<&(Square, Color, Role)>, Vec<_>) =
                own.into_iter().partition(|(_, _, r)| *r == Role::King);

            let king = match kings.as_slice() {
                [] => return Err(MissingKing(side)),
                [k] => **k,
                _ => return Err(TooManyKings(side)),
            };

            if others.len() >= PieceId::PER_SIDE as usize {
                return Err(TooManyPieces(side));
            }

            let slots = (0..PieceId::PER_SIDE).filter(|&s| s != PieceId::KING_SLOT);
            let placements = std::iter::once((PieceId::KING_SLOT, king))
                .chain(slots.zip(others.into_iter().copied()));

            for (slot, (sq, color, role)) in placements {
                let mut piece = Piece::new(color, role, Some(sq));

                let home = match role {
                    Role::Pawn => sq.row() == color.pawn_row(),
                    Role::King => sq.row() == color.back_row() && sq.col() == 4,
                    Role::Rook => sq.row() == color.back_row() && (sq.col() == 0 || sq.col() == 7),
                    _ => true,
                };

                piece.set_first_move(home);
                board.spawn(PieceId::of(side, slot), piece);
            }
        }

        Ok(board)
    }
}

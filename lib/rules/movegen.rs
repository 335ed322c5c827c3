use crate::chess::{Board, Color, PieceId, PieceNotOnBoard, Role, Square};
use crate::rules::{blocked, leaves_king_in_check, pattern_valid, Castle};
use arrayvec::ArrayVec;
use tracing::instrument;

/// The verdict on moving a piece to a square.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Legality {
    Illegal,
    Normal,
    Castle(Castle),
}

impl Legality {
    /// Whether the move may be played.
    #[inline(always)]
    pub fn is_legal(&self) -> bool {
        !matches!(self, Legality::Illegal)
    }
}

/// Decides whether `mover` may move to `target` with `side` to move.
///
/// Fails only if `mover` is not on the board; the board is left unchanged either way.
pub fn legality(
    board: &mut Board,
    mover: PieceId,
    target: Square,
    side: Color,
) -> Result<Legality, PieceNotOnBoard> {
    let piece = board[mover];
    let origin = board.whereabouts(mover)?;

    if piece.color() != side || board.color_on(target) == Some(side) {
        return Ok(Legality::Illegal);
    }

    if let Some(castle) = Castle::validate(board, mover, target)? {
        return Ok(Legality::Castle(castle));
    }

    let delta = target - origin;

    if !pattern_valid(&piece, delta, board.is_occupied(target)) {
        return Ok(Legality::Illegal);
    }

    if !piece.role().jumps() && blocked(board, origin, delta) != Ok(false) {
        return Ok(Legality::Illegal);
    }

    if leaves_king_in_check(board, mover, target)? {
        return Ok(Legality::Illegal);
    }

    Ok(Legality::Normal)
}

/// Whether `mover` may move to `target` with `side` to move.
///
/// A piece that is not on the board has no legal moves.
pub fn is_legal(board: &mut Board, mover: PieceId, target: Square, side: Color) -> bool {
    matches!(legality(board, mover, target, side), Ok(l) if l.is_legal())
}

/// Whether moving `mover` to `target` is a pawn reaching its last rank.
pub fn is_promotion(board: &Board, mover: PieceId, target: Square) -> bool {
    let piece = &board[mover];
    piece.role() == Role::Pawn && target.row() == piece.color().promotion_row()
}

/// The legal moves of one side, piece by piece, for a single ply.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct MoveTable {
    side: Color,
    // A queen reaches at most 27 squares.
    targets: [ArrayVec<Square, 27>; 16],
    castles: ArrayVec<Castle, 2>,
}

impl MoveTable {
    /// Enumerates the legal moves of every piece of `side`.
    ///
    /// The board is left unchanged.
    #[instrument(level = "trace", skip(board))]
    pub fn generate(board: &mut Board, side: Color) -> Self {
        let mut table = MoveTable {
            side,
            targets: Default::default(),
            castles: ArrayVec::new(),
        };

        for (id, targets) in PieceId::iter(side).zip(&mut table.targets) {
            if board[id].square().is_none() {
                continue;
            }

            for sq in Square::iter() {
                match legality(board, id, sq, side) {
                    Ok(Legality::Normal) => targets.push(sq),
                    Ok(Legality::Castle(castle)) => {
                        targets.push(sq);
                        table.castles.push(castle);
                    }
                    Ok(Legality::Illegal) | Err(_) => {}
                }
            }
        }

        table
    }

    /// The side these moves belong to.
    #[inline(always)]
    pub fn side(&self) -> Color {
        self.side
    }

    /// The squares a piece may move to.
    pub fn targets(&self, id: PieceId) -> &[Square] {
        if id.color() == self.side {
            &self.targets[id.slot()]
        } else {
            &[]
        }
    }

    /// Whether moving a piece to a square is legal.
    pub fn contains(&self, id: PieceId, sq: Square) -> bool {
        self.targets(id).contains(&sq)
    }

    /// The castle that moves this king to this square, if any.
    pub fn castle(&self, king: PieceId, sq: Square) -> Option<Castle> {
        self.castles
            .iter()
            .find(|c| c.king == king && c.king_to == sq)
            .copied()
    }

    /// Whether this side has no legal moves at all.
    pub fn is_empty(&self) -> bool {
        self.targets.iter().all(ArrayVec::is_empty)
    }

    /// The number of legal moves, counting each pawn promotion once.
    pub fn len(&self) -> usize {
        self.targets.iter().map(ArrayVec::len).sum()
    }

    /// An iterator over every legal move.
    pub fn iter(&self) -> impl Iterator<Item = (PieceId, Square)> + '_ {
        PieceId::iter(self.side)
            .zip(&self.targets)
            .flat_map(|(id, targets)| targets.iter().map(move |&sq| (id, sq)))
    }
}

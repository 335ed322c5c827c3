use crate::chess::{Board, Color, PieceId, PieceNotOnBoard, Promotion, Square};
use crate::rules::{is_promotion, MoveTable};
use rayon::prelude::*;

/// Plays a move from `table` on `board`, completing castles and promotions.
///
/// Returns the captured piece, if any.
pub fn play(
    board: &mut Board,
    table: &MoveTable,
    mover: PieceId,
    target: Square,
    promotion: Option<Promotion>,
) -> Result<Option<PieceId>, PieceNotOnBoard> {
    if let Some(castle) = table.castle(mover, target) {
        castle.execute(board)?;
        return Ok(None);
    }

    board.whereabouts(mover)?;

    if let Some(p) = promotion.filter(|_| is_promotion(board, mover, target)) {
        board.promote(mover, p.into());
    }

    board.relocate(mover, target)
}

/// Counts the leaf nodes of the tree of legal moves `depth` plies deep.
///
/// Every promotion counts as four distinct moves.
pub fn perft(board: &Board, side: Color, depth: u8) -> usize {
    if depth == 0 {
        return 1;
    }

    let mut board = board.clone();
    let table = MoveTable::generate(&mut board, side);

    let expand = |(id, sq): (PieceId, Square)| -> usize {
        let promotions: &[Option<Promotion>] = if is_promotion(&board, id, sq) {
            &[
                Some(Promotion::Knight),
                Some(Promotion::Bishop),
                Some(Promotion::Rook),
                Some(Promotion::Queen),
            ]
        } else {
            &[None]
        };

        if depth == 1 {
            return promotions.len();
        }

        promotions
            .iter()
            .map(|&p| {
                let mut next = board.clone();
                match play(&mut next, &table, id, sq, p) {
                    Ok(_) => perft(&next, !side, depth - 1),
                    Err(_) => 0,
                }
            })
            .sum()
    };

    if depth > 2 {
        table.iter().par_bridge().map(expand).sum()
    } else {
        table.iter().map(expand).sum()
    }
}

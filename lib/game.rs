use crate::chess::{Board, Color, Outcome, PieceId, Promotion, Square};
use crate::rules::{is_promotion, king_in_check, play, validate_position};
use crate::rules::{IllegalPosition, MoveTable};
use derive_more::{Display, Error};
use tracing::{debug, info, instrument, warn};

/// The phases of a game.
#[derive(Debug, Display, Copy, Clone, Eq, PartialEq, Hash)]
pub enum State {
    #[display(fmt = "awaiting selection")]
    AwaitingSelection,
    #[display(fmt = "awaiting a destination for piece `{_0}`")]
    AwaitingDestination(PieceId),
    #[display(fmt = "awaiting the promotion of piece `{pawn}` on `{target}`")]
    AwaitingPromotion { pawn: PieceId, target: Square },
    #[display(fmt = "game over, {_0}")]
    GameOver(Outcome),
}

/// The actions that drive a [`Game`].
#[derive(Debug, Display, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Action {
    #[display(fmt = "select a piece")]
    Select,
    #[display(fmt = "move a piece")]
    Move,
    #[display(fmt = "choose a promotion")]
    Promote,
    #[display(fmt = "flag a player")]
    Flag,
}

/// An [`Action`] was requested in a [`State`] that does not permit it.
#[derive(Debug, Display, Copy, Clone, Eq, PartialEq, Hash, Error)]
#[display(fmt = "cannot {action} while {state}")]
pub struct InvalidTransition {
    pub action: Action,
    pub state: State,
}

/// The result of asking a piece to move.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum MoveOutcome {
    /// The move is not legal, the selection was dropped.
    Rejected,
    /// The move was played and the turn passed.
    Moved {
        captured: Option<PieceId>,
        was_castle: bool,
    },
    /// A pawn reached its last rank and waits for [`Game::choose_promotion`].
    PromotionPending,
}

/// A game of chess between two players.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Game {
    board: Board,
    turn: Color,
    state: State,
    moves: MoveTable,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    /// A game from the standard starting position with white to move.
    pub fn new() -> Self {
        Self::start(Board::default(), Color::White)
    }

    /// A game from an arbitrary position.
    ///
    /// Fails if the side not to move is in check. The game is over right away if `turn` has
    /// no legal moves.
    pub fn from_board(board: Board, turn: Color) -> Result<Self, IllegalPosition> {
        validate_position(&board, turn)?;
        Ok(Self::start(board, turn))
    }

    fn start(mut board: Board, turn: Color) -> Self {
        let moves = MoveTable::generate(&mut board, turn);
        let mut game = Game {
            board,
            turn,
            state: State::AwaitingSelection,
            moves,
        };

        game.conclude();
        game
    }

    /// The current position.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// The current phase.
    pub fn state(&self) -> State {
        self.state
    }

    /// The side to move.
    pub fn side_to_move(&self) -> Color {
        self.turn
    }

    /// The legal moves of the side to move.
    pub fn moves(&self) -> &MoveTable {
        &self.moves
    }

    /// The squares a piece may move to this ply.
    pub fn legal_targets(&self, id: PieceId) -> &[Square] {
        self.moves.targets(id)
    }

    /// Whether the side to move is in check.
    pub fn is_check(&self) -> bool {
        king_in_check(&self.board, self.turn)
    }

    /// Whether the game has ended.
    pub fn is_game_over(&self) -> bool {
        self.outcome().is_some()
    }

    /// The [`Outcome`] of the game, if it has ended.
    pub fn outcome(&self) -> Option<Outcome> {
        match self.state {
            State::GameOver(o) => Some(o),
            _ => None,
        }
    }

    /// Selects a piece of the side to move.
    ///
    /// Returns whether the selection was accepted.
    #[instrument(level = "debug", skip(self), err)]
    pub fn select(&mut self, id: PieceId) -> Result<bool, InvalidTransition> {
        match self.state {
            State::AwaitingSelection | State::AwaitingDestination(_) => {}
            state => return Err(self.invalid(Action::Select, state)),
        }

        let accepted = id.color() == self.turn && self.board[id].square().is_some();

        if accepted {
            self.state = State::AwaitingDestination(id);
        } else {
            warn!(%id, "ignored selection of a piece that cannot move");
        }

        Ok(accepted)
    }

    /// Moves a piece of the side to move.
    ///
    /// Once a piece is selected, only that piece may move. Illegal moves drop the selection
    /// and leave the turn unchanged.
    #[instrument(level = "debug", skip(self), err)]
    pub fn attempt_move(
        &mut self,
        id: PieceId,
        target: Square,
    ) -> Result<MoveOutcome, InvalidTransition> {
        match self.state {
            State::AwaitingSelection => {}
            State::AwaitingDestination(selected) if selected == id => {}
            state => return Err(self.invalid(Action::Move, state)),
        }

        if !self.moves.contains(id, target) {
            warn!(%id, %target, "rejected illegal move");
            self.state = State::AwaitingSelection;
            return Ok(MoveOutcome::Rejected);
        }

        if is_promotion(&self.board, id, target) {
            debug!(%id, %target, "awaiting promotion");
            self.state = State::AwaitingPromotion { pawn: id, target };
            return Ok(MoveOutcome::PromotionPending);
        }

        Ok(self.complete(id, target, None))
    }

    /// Completes a pending promotion.
    #[instrument(level = "debug", skip(self), err)]
    pub fn choose_promotion(
        &mut self,
        promotion: Promotion,
    ) -> Result<MoveOutcome, InvalidTransition> {
        match self.state {
            State::AwaitingPromotion { pawn, target } => {
                Ok(self.complete(pawn, target, Some(promotion)))
            }
            state => Err(self.invalid(Action::Promote, state)),
        }
    }

    /// Ends the game because `loser` ran out of time.
    #[instrument(level = "debug", skip(self), err)]
    pub fn flag(&mut self, loser: Color) -> Result<Outcome, InvalidTransition> {
        match self.state {
            State::GameOver(_) => Err(self.invalid(Action::Flag, self.state)),
            _ => {
                let outcome = Outcome::LossOnTime(loser);
                info!(%outcome, "game over");
                self.state = State::GameOver(outcome);
                Ok(outcome)
            }
        }
    }

    /// Starts over from the standard starting position.
    pub fn restart(&mut self) {
        info!("restarting the game");
        *self = Game::new();
    }

    fn invalid(&self, action: Action, state: State) -> InvalidTransition {
        let error = InvalidTransition { action, state };
        warn!(%error);
        error
    }

    fn complete(
        &mut self,
        id: PieceId,
        target: Square,
        promotion: Option<Promotion>,
    ) -> MoveOutcome {
        let was_castle = self.moves.castle(id, target).is_some();
        let origin = self.board[id].square();

        let captured = match play(&mut self.board, &self.moves, id, target, promotion) {
            Ok(captured) => captured,
            Err(e) => {
                warn!(%e, "rejected move");
                self.state = State::AwaitingSelection;
                return MoveOutcome::Rejected;
            }
        };

        info!(
            side = %self.turn,
            piece = %self.board[id].letter(),
            from = ?origin,
            to = %target,
            captured = ?captured,
            was_castle,
            "moved"
        );

        self.turn = !self.turn;
        self.moves = MoveTable::generate(&mut self.board, self.turn);
        self.state = State::AwaitingSelection;
        self.conclude();

        MoveOutcome::Moved {
            captured,
            was_castle,
        }
    }

    fn conclude(&mut self) {
        if !self.moves.is_empty() {
            return;
        }

        let outcome = if self.is_check() {
            Outcome::Checkmate(!self.turn)
        } else {
            Outcome::Stalemate
        };

        info!(%outcome, "game over");
        self.state = State::GameOver(outcome);
    }
}

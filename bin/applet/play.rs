use crate::io::Io;
use anyhow::Error as Anyhow;
use clap::Parser;
use lib::chess::{Board, Color, Promotion, Square};
use lib::clock::{Clock, TimeControl};
use lib::game::{Game, InvalidTransition, MoveOutcome};
use lib::rules::IllegalPosition;
use std::io::{stdin, stdout, ErrorKind, Read, Write};
use std::time::Duration;
use tracing::{info, instrument};

/// A game between two players sharing the terminal.
#[derive(Debug, Parser)]
#[clap(disable_help_flag = true, disable_version_flag = true)]
pub struct Play {
    /// How much time each player has for the whole game.
    #[clap(short, long, default_value_t)]
    time_control: TimeControl,

    /// Play without clocks.
    #[clap(short, long)]
    untimed: bool,

    /// The starting piece placement in FEN notation.
    #[clap(short, long)]
    placement: Option<Board>,

    /// The side that moves first.
    #[clap(short, long, default_value_t = Color::White)]
    side: Color,
}

impl Default for Play {
    fn default() -> Self {
        Play {
            time_control: TimeControl::default(),
            untimed: false,
            placement: None,
            side: Color::White,
        }
    }
}

/// Commands typed by the players.
#[derive(Debug, Parser)]
#[clap(
    name = "",
    multicall = true,
    arg_required_else_help = true,
    disable_help_flag = true,
    disable_version_flag = true
)]
enum Cmd {
    /// Show the squares a piece can move to.
    Select { square: Square },

    /// Move the piece standing on one square to another.
    #[clap(after_help = "EXAMPLE:\n    move e2 e4")]
    Move { from: Square, to: Square },

    /// Choose the piece a pawn is promoted to, one of `q`, `r`, `b` or `n`.
    Promote { piece: Promotion },

    /// Show the board.
    Board,

    /// Start over from the standard position.
    Restart,

    /// Leave the game.
    Quit,
}

impl Play {
    #[instrument(level = "trace", skip(self), err)]
    pub fn execute(self) -> Result<(), Anyhow> {
        let mut io = Io::new(stdout(), stdin());
        let game = self.run(&mut io)?;

        if let Some(outcome) = game.outcome() {
            info!(%outcome, "game ended");
        }

        Ok(())
    }

    fn start(&self) -> Result<(Game, Option<Clock>), IllegalPosition> {
        let game = match &self.placement {
            Some(board) => Game::from_board(board.clone(), self.side)?,
            None => Game::new(),
        };

        let mut clock = (!self.untimed).then(|| Clock::new(self.time_control));
        if let Some(c) = clock.as_mut() {
            if c.running() != game.side_to_move() {
                c.switch();
            }
        }

        Ok((game, clock))
    }

    /// Plays until the input is exhausted or a player quits.
    fn run<W: Write, R: Read>(&self, io: &mut Io<W, R>) -> Result<Game, Anyhow> {
        let (mut game, mut clock) = self.start()?;
        io.send(game.board())?;

        loop {
            referee(&mut game, clock.as_ref())?;

            match game.outcome() {
                Some(outcome) => io.send(format_args!("game over, {outcome}"))?,
                None => io.send(status(&game, clock.as_ref()))?,
            }

            io.prompt("> ")?;
            let line = match io.recv() {
                Ok(line) => line,
                Err(e) if e.kind() == ErrorKind::UnexpectedEof => break,
                Err(e) => return Err(e.into()),
            };

            if line.trim().is_empty() {
                continue;
            }

            let cmd = match Cmd::try_parse_from(line.split_whitespace()) {
                Ok(cmd) => cmd,
                Err(e) => {
                    io.send(e)?;
                    continue;
                }
            };

            // Time spent typing counts.
            if referee(&mut game, clock.as_ref())? {
                continue;
            }

            let result = match cmd {
                Cmd::Quit => break,

                Cmd::Board => {
                    io.send(game.board())?;
                    continue;
                }

                Cmd::Restart => {
                    game.restart();
                    clock = (!self.untimed).then(|| Clock::new(self.time_control));
                    io.send(game.board())?;
                    continue;
                }

                Cmd::Select { square } => {
                    select(io, &mut game, square)?;
                    continue;
                }

                Cmd::Move { from, to } => {
                    let id = match game.board()[from] {
                        Some(id) => id,
                        None => {
                            io.send(format_args!("there is no piece on {from}"))?;
                            continue;
                        }
                    };

                    match game.select(id) {
                        Ok(true) => game.attempt_move(id, to),
                        Ok(false) => Ok(MoveOutcome::Rejected),
                        Err(e) => Err(e),
                    }
                }

                Cmd::Promote { piece } => game.choose_promotion(piece),
            };

            match result {
                Err(e) => io.send(e)?,
                Ok(MoveOutcome::Rejected) => io.send("illegal move")?,
                Ok(MoveOutcome::PromotionPending) => {
                    io.send("choose a promotion: promote <q|r|b|n>")?
                }
                Ok(MoveOutcome::Moved { .. }) => {
                    if let Some(c) = clock.as_mut() {
                        c.switch();
                    }

                    io.send(game.board())?;
                }
            }
        }

        Ok(game)
    }
}

/// Ends the game if the player to move ran out of time, returning whether it did.
fn referee(game: &mut Game, clock: Option<&Clock>) -> Result<bool, InvalidTransition> {
    match clock.and_then(Clock::flagged) {
        Some(loser) if !game.is_game_over() => {
            game.flag(loser)?;
            Ok(true)
        }

        _ => Ok(false),
    }
}

fn select<W: Write, R: Read>(
    io: &mut Io<W, R>,
    game: &mut Game,
    square: Square,
) -> Result<(), Anyhow> {
    let id = match game.board()[square] {
        Some(id) => id,
        None => return Ok(io.send(format_args!("there is no piece on {square}"))?),
    };

    match game.select(id) {
        Err(e) => io.send(e)?,
        Ok(false) => io.send(format_args!("the piece on {square} belongs to the opponent"))?,
        Ok(true) => match game.legal_targets(id) {
            [] => io.send(format_args!("the piece on {square} cannot move"))?,
            targets => {
                let targets: Vec<_> = targets.iter().map(Square::to_string).collect();
                io.send(format_args!("{square}: {}", targets.join(" ")))?
            }
        },
    }

    Ok(())
}

fn status(game: &Game, clock: Option<&Clock>) -> String {
    let mut status = format!("{} to move", game.side_to_move());

    if game.is_check() {
        status.push_str(", check");
    }

    if let Some(c) = clock {
        status.push_str(&format!(
            " [white {} | black {}]",
            minutes(c.remaining(Color::White)),
            minutes(c.remaining(Color::Black))
        ));
    }

    status
}

fn minutes(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{}:{:02}", secs / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lib::chess::Outcome;
    use std::str;

    fn play(args: &[&str], input: &str) -> (Game, String) {
        let play = Play::try_parse_from([&["play"][..], args].concat()).unwrap();
        let mut output = Vec::new();
        let mut io = Io::new(&mut output, input.as_bytes());
        let game = play.run(&mut io).unwrap();
        drop(io);
        (game, str::from_utf8(&output).unwrap().to_string())
    }

    #[test]
    fn players_can_checkmate() {
        let moves = ["e2 e4", "e7 e5", "f1 c4", "b8 c6", "d1 h5", "g8 f6", "h5 f7"];
        let input: String = moves.iter().map(|m| format!("move {m}\n")).collect();
        let (game, output) = play(&["--untimed"], &input);
        assert_eq!(game.outcome(), Some(Outcome::Checkmate(Color::White)));
        assert!(output.contains("game over, checkmate by the white player"));
    }

    #[test]
    fn illegal_moves_are_reported() {
        let (game, output) = play(&["--untimed"], "move e2 e5\nmove e4 e5\n");
        assert_eq!(game.side_to_move(), Color::White);
        assert!(output.contains("illegal move"));
        assert!(output.contains("there is no piece on e4"));
    }

    #[test]
    fn unknown_commands_do_not_end_the_game() {
        let (game, output) = play(&["--untimed"], "castle\n\nmove e2 e4\n");
        assert_eq!(game.side_to_move(), Color::Black);
        assert!(output.contains("black to move"));
    }

    #[test]
    fn selecting_lists_legal_targets() {
        let (_, output) = play(&["--untimed"], "select g1\nselect g8\n");
        assert!(output.contains("g1: f3 h3"));
        assert!(output.contains("the piece on g8 belongs to the opponent"));
    }

    #[test]
    fn promotion_is_chosen_by_the_player() {
        let args = ["--untimed", "--placement", "1n5k/P7/8/8/8/8/8/K7"];
        let (game, output) = play(&args, "move a7 b8\npromote n\n");
        assert!(output.contains("choose a promotion"));
        let b8 = game.board().piece_on("b8".parse().unwrap());
        assert_eq!(b8.map(|p| p.letter()), Some('N'));
    }

    #[test]
    fn placement_with_the_waiting_king_in_check_is_refused() {
        let args = ["play", "--untimed", "--placement", "4k3/8/8/8/8/8/8/4RK2"];
        let play = Play::try_parse_from(args).unwrap();
        let mut output = Vec::new();
        let mut io = Io::new(&mut output, "move e1 e8\n".as_bytes());

        let error = play.run(&mut io).unwrap_err();
        assert_eq!(
            error.downcast_ref::<IllegalPosition>(),
            Some(&IllegalPosition(Color::Black))
        );
    }

    #[test]
    fn player_without_time_loses() {
        let (game, output) = play(&["--time-control", "(limit: \"0s\")"], "move e2 e4\n");
        assert_eq!(game.outcome(), Some(Outcome::LossOnTime(Color::White)));
        assert!(output.contains("white player lost on time"));
    }

    #[test]
    fn restart_sets_up_a_new_game() {
        let (game, _) = play(&["--untimed"], "move e2 e4\nrestart\n");
        assert_eq!(game, Game::new());
    }

    #[test]
    fn quitting_ends_the_session() {
        let (game, _) = play(&["--untimed"], "quit\nmove e2 e4\n");
        assert_eq!(game, Game::new());
    }

    #[test]
    fn clocks_are_shown_in_timed_games() {
        let (_, output) = play(&[], "");
        assert!(output.contains("white to move [white "));
        assert!(output.contains(" | black 10:00]"));
    }
}

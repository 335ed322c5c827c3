use crate::chess::Color;
use derive_more::Display;

/// How a game between two players ended.
///
/// Games only end on the board or on the clock; draws by agreement, repetition or
/// insufficient material are left to the players.
#[derive(Debug, Display, Copy, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
pub enum Outcome {
    /// The side to move has no legal moves and is in check; holds the winner.
    #[display(fmt = "checkmate by the {_0} player")]
    Checkmate(Color),

    /// A clock ran out; holds the side that was flagged.
    #[display(fmt = "{_0} player lost on time")]
    LossOnTime(Color),

    /// The side to move has no legal moves but is not in check.
    #[display(fmt = "stalemate")]
    Stalemate,
}

impl Outcome {
    /// Whether neither player won, which only happens on stalemate.
    pub fn is_draw(&self) -> bool {
        !self.is_decisive()
    }

    /// Whether one of the players won, on the board or on the clock.
    pub fn is_decisive(&self) -> bool {
        matches!(self, Outcome::Checkmate(_) | Outcome::LossOnTime(_))
    }

    /// The winner, which for a loss on time is the flagged side's opponent.
    pub fn winner(&self) -> Option<Color> {
        match *self {
            Outcome::Checkmate(c) => Some(c),
            Outcome::LossOnTime(c) => Some(!c),
            Outcome::Stalemate => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_strategy::proptest;

    #[proptest]
    fn outcome_is_either_draw_or_decisive(o: Outcome) {
        assert_ne!(o.is_draw(), o.is_decisive());
    }

    #[proptest]
    fn neither_side_wins_if_draw(#[filter(#o.is_draw())] o: Outcome) {
        assert_eq!(o.winner(), None);
    }

    #[proptest]
    fn one_side_wins_if_decisive(#[filter(#o.is_decisive())] o: Outcome) {
        assert_ne!(o.winner(), None);
    }

    #[proptest]
    fn side_that_checkmates_wins(c: Color) {
        assert_eq!(Outcome::Checkmate(c).winner(), Some(c));
    }

    #[test]
    fn only_stalemate_is_a_draw() {
        assert!(Outcome::Stalemate.is_draw());
        assert!(!Outcome::Checkmate(Color::Black).is_draw());
        assert!(!Outcome::LossOnTime(Color::White).is_draw());
    }

    #[proptest]
    fn side_that_runs_out_of_time_loses(c: Color) {
        assert_eq!(Outcome::LossOnTime(c).winner(), Some(!c));
    }
}

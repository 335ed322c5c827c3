use derive_more::{Constructor, Display, Error};
use std::ops::Sub;
use std::{fmt, str::FromStr};

/// A coordinate computed outside of the 8x8 grid.
#[derive(Debug, Display, Copy, Clone, Eq, PartialEq, Hash, Error)]
#[display(fmt = "coordinates ({row}, {col}) are outside of the board")]
pub struct OutOfBounds {
    pub row: i16,
    pub col: i16,
}

/// The displacement between two [`Square`]s.
#[derive(Debug, Display, Copy, Clone, Eq, PartialEq, Hash, Constructor)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
#[display(fmt = "({rows:+}, {cols:+})")]
pub struct Delta {
    #[cfg_attr(test, strategy(-7i8..=7))]
    pub rows: i8,
    #[cfg_attr(test, strategy(-7i8..=7))]
    pub cols: i8,
}

impl Delta {
    /// Whether this delta stays in place.
    #[inline(always)]
    pub fn is_zero(&self) -> bool {
        self.rows == 0 && self.cols == 0
    }

    /// The number of king steps it takes to cover this delta.
    #[inline(always)]
    pub fn distance(&self) -> u8 {
        self.rows.unsigned_abs().max(self.cols.unsigned_abs())
    }

    /// The unit step towards the destination.
    ///
    /// Only meaningful along ranks, files and diagonals.
    #[inline(always)]
    pub fn step(&self) -> Delta {
        Delta::new(self.rows.signum(), self.cols.signum())
    }

    /// This delta scaled by `n`.
    #[inline(always)]
    pub fn times(&self, n: i8) -> Delta {
        Delta::new(self.rows * n, self.cols * n)
    }
}

/// A square on the chess board.
///
/// Row 0 is the 8th rank and column 0 is the a-file.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
pub struct Square {
    #[cfg_attr(test, strategy(0u8..8))]
    row: u8,
    #[cfg_attr(test, strategy(0u8..8))]
    col: u8,
}

impl Square {
    /// Constructs [`Square`] from a pair of row and column.
    pub fn new(row: u8, col: u8) -> Result<Self, OutOfBounds> {
        if row < 8 && col < 8 {
            Ok(Square { row, col })
        } else {
            Err(OutOfBounds {
                row: row.into(),
                col: col.into(),
            })
        }
    }

    /// This square's row.
    #[inline(always)]
    pub fn row(&self) -> u8 {
        self.row
    }

    /// This square's column.
    #[inline(always)]
    pub fn col(&self) -> u8 {
        self.col
    }

    /// The square displaced by [`Delta`], if it lies on the board.
    pub fn offset(&self, d: Delta) -> Result<Self, OutOfBounds> {
        let row = i16::from(self.row) + i16::from(d.rows);
        let col = i16::from(self.col) + i16::from(d.cols);

        match (u8::try_from(row), u8::try_from(col)) {
            (Ok(r), Ok(c)) if r < 8 && c < 8 => Ok(Square { row: r, col: c }),
            _ => Err(OutOfBounds { row, col }),
        }
    }

    /// An iterator over all squares, row by row.
    pub fn iter() -> impl DoubleEndedIterator<Item = Self> + ExactSizeIterator {
        (0u8..64).map(|i| Square {
            row: i / 8,
            col: i % 8,
        })
    }
}

impl Sub for Square {
    type Output = Delta;

    #[inline(always)]
    fn sub(self, rhs: Self) -> Self::Output {
        Delta::new(
            self.row as i8 - rhs.row as i8,
            self.col as i8 - rhs.col as i8,
        )
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", char::from(b'a' + self.col), 8 - self.row)
    }
}

/// The reason why parsing [`Square`] failed.
#[derive(Debug, Display, Clone, Eq, PartialEq, Error)]
pub enum ParseSquareError {
    #[display(fmt = "failed to parse square, expected file in the range `(a..=h)`")]
    InvalidFile,
    #[display(fmt = "failed to parse square, expected rank in the range `(1..=8)`")]
    InvalidRank,
    #[display(fmt = "failed to parse square, expected exactly two characters")]
    InvalidLength,
}

impl FromStr for Square {
    type Err = ParseSquareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();

        let (file, rank) = match (chars.next(), chars.next(), chars.next()) {
            (Some(f), Some(r), None) => (f, r),
            _ => return Err(ParseSquareError::InvalidLength),
        };

        let col = match file {
            'a'..='h' => file as u8 - b'a',
            _ => return Err(ParseSquareError::InvalidFile),
        };

        let row = match rank {
            '1'..='8' => b'8' - rank as u8,
            _ => return Err(ParseSquareError::InvalidRank),
        };

        Ok(Square { row, col })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_strategy::proptest;

    #[proptest]
    fn new_constructs_square_from_pair_of_row_and_column(sq: Square) {
        assert_eq!(Square::new(sq.row(), sq.col()), Ok(sq));
    }

    #[proptest]
    fn new_fails_outside_of_the_board(#[strategy(8u8..)] row: u8, col: u8) {
        assert!(Square::new(row, col).is_err());
        assert!(Square::new(col, row).is_err());
    }

    #[proptest]
    fn subtracting_squares_returns_delta(a: Square, b: Square) {
        assert_eq!(b.offset(a - b), Ok(a));
        assert_eq!(a.offset(b - a), Ok(b));
    }

    #[proptest]
    fn offset_fails_if_square_leaves_the_board(sq: Square, d: Delta) {
        let row = sq.row() as i16 + d.rows as i16;
        let col = sq.col() as i16 + d.cols as i16;

        if (0..8).contains(&row) && (0..8).contains(&col) {
            assert!(sq.offset(d).is_ok());
        } else {
            assert_eq!(sq.offset(d), Err(OutOfBounds { row, col }));
        }
    }

    #[proptest]
    fn step_has_unit_distance(#[filter(!#d.is_zero())] d: Delta) {
        assert_eq!(d.step().distance(), 1);
    }

    #[test]
    fn iter_visits_all_squares_once() {
        let squares: Vec<_> = Square::iter().collect();
        assert_eq!(squares.len(), 64);
        assert!(squares.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn row_zero_is_the_eighth_rank() {
        assert_eq!(Square::new(0, 0).map(|s| s.to_string()), Ok("a8".into()));
        assert_eq!(Square::new(7, 4).map(|s| s.to_string()), Ok("e1".into()));
    }

    #[proptest]
    fn parsing_printed_square_is_an_identity(sq: Square) {
        assert_eq!(sq.to_string().parse(), Ok(sq));
    }

    #[proptest]
    fn parsing_square_fails_if_file_invalid(
        #[filter(!('a'..='h').contains(&#c))] c: char,
        #[strategy(1u8..=8)] r: u8,
    ) {
        assert_eq!(
            format!("{c}{r}").parse::<Square>(),
            Err(ParseSquareError::InvalidFile)
        );
    }

    #[proptest]
    fn parsing_square_fails_if_rank_invalid(
        #[strategy("[a-h]")] f: String,
        #[filter(!('1'..='8').contains(&#c))] c: char,
    ) {
        assert_eq!(
            format!("{f}{c}").parse::<Square>(),
            Err(ParseSquareError::InvalidRank)
        );
    }

    #[proptest]
    fn parsing_square_fails_if_length_not_two(#[filter(#s.chars().count() != 2)] s: String) {
        assert_eq!(s.parse::<Square>(), Err(ParseSquareError::InvalidLength));
    }
}

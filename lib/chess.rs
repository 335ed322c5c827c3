mod board;
mod color;
mod outcome;
mod piece;
mod promotion;
mod role;
mod square;

pub use board::*;
pub use color::*;
pub use outcome::*;
pub use piece::*;
pub use promotion::*;
pub use role::*;
pub use square::*;

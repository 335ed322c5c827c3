mod castle;
mod check;
mod hypothetical;
mod movegen;
mod path;
mod pattern;
mod perft;

pub use castle::*;
pub use check::*;
pub use hypothetical::*;
pub use movegen::*;
pub use path::*;
pub use pattern::*;
pub use perft::*;

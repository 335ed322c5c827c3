/// Chess domain types.
pub mod chess;
/// Player clocks and time control.
pub mod clock;
/// The turn and game-state machine.
pub mod game;
/// The rules engine.
pub mod rules;

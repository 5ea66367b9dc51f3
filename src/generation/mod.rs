//! Turn driving: completion round-trips and tool execution.

pub mod turn;

pub use turn::{TurnDriver, TurnEvent, TurnOutcome};

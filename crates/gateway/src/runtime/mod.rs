//! Chat runtime: per-session locking, the model half of a turn, and the
//! policy that turns a model outcome into a stored reply.

pub mod reply;
pub mod session_gate;
pub mod turn;

pub use reply::{settle, TurnReply};
pub use turn::{run_turn, PendingTurn, TurnInput};

//! Prompt assembly.
//!
//! Turns a system instruction block, a session transcript, and the new
//! user message into the single text prompt sent to the model.

pub mod builder;
pub mod injection;
pub mod report;

pub use builder::{PromptBuilder, DEFAULT_SYSTEM_PROMPT};
pub use report::PromptReport;

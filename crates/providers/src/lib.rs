pub mod google;
pub mod registry;
pub mod traits;
pub mod util;

// Re-exports for convenience.
pub use registry::build_provider;
pub use traits::{apology_text, Completion, CompletionRequest, LlmProvider, Usage};

//! Prompt Template System
//!
//! Template loading chain:
//! 1. `{prompts-dir}/{name}.pmt` (configured override)
//! 2. Embedded fallback in code
//!
//! Templates use Handlebars syntax for variable substitution; the rule corpus
//! is sent as-is.

pub mod embedded;
mod loader;

pub use loader::{PromptLoader, TEMPLATE_NAMES};

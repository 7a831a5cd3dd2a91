//! Prompt System - Embedded system instructions with file overrides
//!
//! The drafting and critique instructions ship embedded in the binary and can
//! be overridden per deployment by dropping markdown files into the user
//! config directory.

mod embedded;
mod store;

pub use embedded::{GENERATE, REFLECT, get_embedded};
pub use store::PromptStore;

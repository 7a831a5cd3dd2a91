//! Embedded system instructions
//!
//! The drafting and critique instructions are compiled into the binary from
//! the prompts/ directory, so the tool works without any configuration files.

/// System instruction for the drafting agent
pub const GENERATE: &str = include_str!("../../prompts/generate.md");

/// System instruction for the critic
pub const REFLECT: &str = include_str!("../../prompts/reflect.md");

/// Look up an embedded instruction by name
pub fn get_embedded(name: &str) -> Option<&'static str> {
    match name {
        "generate" => Some(GENERATE),
        "reflect" => Some(REFLECT),
        _ => None,
    }
}

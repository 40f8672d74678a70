//! Embedded prompts
//!
//! These are compiled into the binary from .pmt files at build time.

use tracing::debug;

/// Degree-progress rule corpus, sent verbatim
pub const RULES: &str = include_str!("../../prompts/rules.pmt");

/// Student context message
pub const CONTEXT: &str = include_str!("../../prompts/context.pmt");

/// Plan request naming the expected JSON shape
pub const REQUEST: &str = include_str!("../../prompts/request.pmt");

/// Get the embedded prompt by name
pub fn get_embedded(name: &str) -> Option<&'static str> {
    debug!(%name, "get_embedded: called");
    match name {
        "rules" => Some(RULES),
        "context" => Some(CONTEXT),
        "request" => Some(REQUEST),
        _ => {
            debug!("get_embedded: no match found");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_embedded_rules() {
        let rules = get_embedded("rules").unwrap();
        assert!(rules.starts_with("Rules:"));
        assert!(rules.contains("Minimum of 72 credits"));
        assert!(rules.contains("ELE 699"));
        assert!(rules.contains("Only 8 credits of Doctoral Dissertation"));
    }

    #[test]
    fn test_get_embedded_templates() {
        assert!(get_embedded("context").unwrap().contains("{{completed_credits}}"));
        assert!(get_embedded("request").unwrap().contains("{{target_credits}}"));
    }

    #[test]
    fn test_get_embedded_unknown() {
        assert!(get_embedded("unknown-template").is_none());
    }
}

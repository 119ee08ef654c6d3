//! rusniff-rules: Style sniff implementations for rusniff
//!
//! Available sniffs:
//! - alphabetical_imports: `use` statements sorted per import context
//! - array_declaration: array literal spacing, alignment and key consistency
//! - blank_lines: cap on consecutive blank lines (fixable)
//! - class_declaration: class-like opening brace placement
//! - operator_spacing: operator whitespace with unary disambiguation
//! - scope_padding: blank lines framing named scope bodies
//! - trailing_comment: `} // name` comments closing scopes
//!
//! The engine entry point is [`analyze`]: one finalized token stream in,
//! position-ordered diagnostics out. Sniff selection and options come from a
//! [`SniffConfig`], optionally loaded from a YAML ruleset file.

pub mod alphabetical_imports;
pub mod array_declaration;
pub mod blank_lines;
pub mod class_declaration;
pub mod config;
pub mod logging;
pub mod operator_spacing;
pub mod registry;
pub mod scope_padding;
pub mod trailing_comment;

pub use config::{
    ArrayOptions, BlankLineOptions, ConfigError, SniffConfig, TrailingCommentOptions,
};
pub use registry::{FileState, ImportContext, Sniff, SniffRegistry};

use rusniff_core::{Diagnostic, TokenStream};

/// Run the configured sniffs over one token stream.
///
/// Pure apart from the optional debug log: all recoverable conditions are
/// reported as diagnostics, never as errors, so callers always get the
/// complete list for the file.
pub fn analyze(stream: &TokenStream, config: &SniffConfig) -> Vec<Diagnostic> {
    let registry = SniffRegistry::new();

    logging::log_check_start(
        stream.len(),
        config.enabled_sniffs(&registry.all_names()).len(),
    );

    let collection = registry.check_stream(stream, config);

    logging::log_check_complete(collection.error_count(), collection.warning_count());

    collection.into_diagnostics()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusniff_core::testkit::lex;

    #[test]
    fn test_analyze_returns_ordered_diagnostics() {
        let stream = lex("$a = [1, 2];").unwrap();
        let diagnostics = analyze(&stream, &SniffConfig::default());

        assert!(!diagnostics.is_empty());
        let indices: Vec<usize> = diagnostics.iter().map(|d| d.token_index).collect();
        let mut sorted = indices.clone();
        sorted.sort_unstable();
        assert_eq!(indices, sorted);
    }

    #[test]
    fn test_analyze_clean_source() {
        let stream = lex("$a = [ 1, 2 ];").unwrap();
        assert!(analyze(&stream, &SniffConfig::default()).is_empty());
    }
}

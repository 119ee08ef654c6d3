//! Sniff trait and registry
//!
//! Sniffs are pure analyzers registered against trigger token kinds; the
//! registry walks one finalized stream, dispatches matching tokens to the
//! enabled sniffs, and collects their diagnostics in token order.

use crate::config::SniffConfig;
use rusniff_core::{Diagnostic, DiagnosticCollection, TokenKind, TokenStream};
use std::collections::{HashMap, HashSet};

/// Ordering contexts tracked by the alphabetical-imports sniff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImportContext {
    /// Top-level `use` imports.
    Namespace,
    /// Trait `use` statements inside a class/trait body.
    Trait,
}

/// Per-file accumulator state.
///
/// Created fresh by [`SniffRegistry::check_stream`] for every stream, so
/// sniffs that carry state across trigger tokens (alphabetical import
/// ordering) stay safe when files are processed on parallel workers. Never
/// ambient, never shared between files.
#[derive(Debug, Default)]
pub struct FileState {
    /// Last-seen import name per ordering context.
    pub import_order: HashMap<ImportContext, String>,
}

/// A style rule that inspects tokens around a trigger point and emits
/// diagnostics
pub trait Sniff: Send + Sync {
    /// The unique identifier for this sniff (e.g. "array_declaration")
    fn name(&self) -> &'static str;

    /// A short description of what this sniff checks
    fn description(&self) -> &'static str;

    /// Token kinds this sniff wants to be dispatched on
    fn kinds(&self) -> &'static [TokenKind];

    /// Inspect the stream around one trigger token and report violations
    fn check(
        &self,
        stream: &TokenStream,
        index: usize,
        config: &SniffConfig,
        state: &mut FileState,
    ) -> Vec<Diagnostic>;
}

/// Registry of all available sniffs
pub struct SniffRegistry {
    sniffs: Vec<Box<dyn Sniff>>,
}

impl SniffRegistry {
    /// Create a new registry with all built-in sniffs
    pub fn new() -> Self {
        let mut registry = Self { sniffs: Vec::new() };

        registry.register(Box::new(crate::alphabetical_imports::AlphabeticalImportsSniff));
        registry.register(Box::new(crate::array_declaration::ArrayDeclarationSniff));
        registry.register(Box::new(crate::blank_lines::BlankLinesSniff));
        registry.register(Box::new(crate::class_declaration::ClassDeclarationSniff));
        registry.register(Box::new(crate::operator_spacing::OperatorSpacingSniff));
        registry.register(Box::new(crate::scope_padding::ScopePaddingSniff));
        registry.register(Box::new(crate::trailing_comment::TrailingCommentSniff));

        registry
    }

    /// Register a new sniff
    pub fn register(&mut self, sniff: Box<dyn Sniff>) {
        self.sniffs.push(sniff);
    }

    /// Get all sniff names
    pub fn all_names(&self) -> Vec<&'static str> {
        self.sniffs.iter().map(|s| s.name()).collect()
    }

    /// Get all sniffs with their descriptions (for listings)
    pub fn list_sniffs(&self) -> Vec<(&'static str, &'static str)> {
        self.sniffs
            .iter()
            .map(|s| (s.name(), s.description()))
            .collect()
    }

    /// Get sniffs filtered by enabled names
    pub fn get_enabled(&self, enabled: &HashSet<String>) -> Vec<&dyn Sniff> {
        self.sniffs
            .iter()
            .filter(|s| enabled.contains(s.name()))
            .map(|s| s.as_ref())
            .collect()
    }

    /// Run the enabled sniffs over one stream and collect diagnostics in
    /// token order.
    pub fn check_stream(&self, stream: &TokenStream, config: &SniffConfig) -> DiagnosticCollection {
        let enabled = config.enabled_sniffs(&self.all_names());
        let sniffs = self.get_enabled(&enabled);
        let mut state = FileState::default();
        let mut collection = DiagnosticCollection::new();

        for index in 0..stream.len() {
            let kind = stream.kind(index);
            for sniff in &sniffs {
                if sniff.kinds().contains(&kind) {
                    collection.extend(sniff.check(stream, index, config, &mut state));
                }
            }
        }

        collection.sort();
        collection
    }
}

impl Default for SniffRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SniffConfig;
    use rusniff_core::testkit::lex;

    #[test]
    fn test_all_builtins_registered() {
        let registry = SniffRegistry::new();
        let names = registry.all_names();
        assert!(names.contains(&"array_declaration"));
        assert!(names.contains(&"operator_spacing"));
        assert!(names.contains(&"trailing_comment"));
        assert_eq!(names.len(), 7);
    }

    #[test]
    fn test_disabled_sniffs_do_not_run() {
        let stream = lex("$a = [1, 2];").unwrap();
        let registry = SniffRegistry::new();

        let mut config = SniffConfig::default();
        config.sniffs = Some(vec!["trailing_comment".to_string()]);
        let collection = registry.check_stream(&stream, &config);
        assert!(collection.is_empty());

        let collection = registry.check_stream(&stream, &SniffConfig::default());
        assert!(!collection.is_empty());
    }

    #[test]
    fn test_diagnostics_sorted_by_token_index() {
        let stream = lex("$a=[1,2];").unwrap();
        let registry = SniffRegistry::new();
        let collection = registry.check_stream(&stream, &SniffConfig::default());

        let indices: Vec<usize> = collection
            .diagnostics()
            .iter()
            .map(|d| d.token_index)
            .collect();
        let mut sorted = indices.clone();
        sorted.sort_unstable();
        assert_eq!(indices, sorted);
    }
}

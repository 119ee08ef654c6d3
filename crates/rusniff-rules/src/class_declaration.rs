//! class_declaration: brace placement for class-like declarations
//!
//! The opening brace belongs on the declaration line, separated by exactly
//! one space. A declaration with no discoverable brace body is a likely
//! upstream parse problem, surfaced as a warning rather than a style error.

use crate::config::SniffConfig;
use crate::registry::{FileState, Sniff};
use rusniff_core::{Diagnostic, FixAction, TokenKind, TokenStream};

const TRIGGER_KINDS: &[TokenKind] = &[TokenKind::Class, TokenKind::Interface, TokenKind::Trait];

const WHITESPACE: &[TokenKind] = &[TokenKind::Whitespace, TokenKind::Newline];

pub struct ClassDeclarationSniff;

impl Sniff for ClassDeclarationSniff {
    fn name(&self) -> &'static str {
        "class_declaration"
    }

    fn description(&self) -> &'static str {
        "Opening brace placement of class/interface/trait declarations"
    }

    fn kinds(&self) -> &'static [TokenKind] {
        TRIGGER_KINDS
    }

    fn check(
        &self,
        stream: &TokenStream,
        index: usize,
        _config: &SniffConfig,
        _state: &mut FileState,
    ) -> Vec<Diagnostic> {
        let mut out = Vec::new();

        let Some(scope) = stream.scope_of(index) else {
            out.push(Diagnostic::warning(
                "class.missing_brace",
                format!(
                    "Possible parse error: {} missing opening or closing brace",
                    stream.text(index)
                ),
                index,
            ));
            return out;
        };

        let brace = scope.opener;
        let Some(last_content) = stream.find_previous(WHITESPACE, brace - 1, None, true) else {
            return out;
        };

        if stream.line(last_content) != stream.line(brace) {
            out.push(Diagnostic::error(
                "class.open_brace_new_line",
                format!(
                    "Opening brace of a {} must be on the same line as the definition",
                    stream.text(index)
                ),
                brace,
            ));
            return out;
        }

        if stream.kind(brace - 1) == TokenKind::Whitespace {
            let spaces = stream.text(brace - 1).len();
            if spaces != 1 {
                out.push(
                    Diagnostic::error(
                        "class.space_before_brace",
                        format!("Expected 1 space before opening brace; {} found", spaces),
                        brace,
                    )
                    .with_fix(FixAction::ReplaceTokenText {
                        index: brace - 1,
                        text: " ".into(),
                    }),
                );
            }
        } else {
            out.push(
                Diagnostic::error(
                    "class.no_space_before_brace",
                    "No whitespace before opening curly brace",
                    brace,
                )
                .with_fix(FixAction::InsertBefore {
                    index: brace,
                    text: " ".into(),
                }),
            );
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusniff_core::testkit::lex;

    fn check(source: &str) -> Vec<Diagnostic> {
        let stream = lex(source).unwrap();
        let config = SniffConfig::default();
        let mut state = FileState::default();
        let mut out = Vec::new();
        for i in 0..stream.len() {
            if TRIGGER_KINDS.contains(&stream.kind(i)) {
                out.extend(ClassDeclarationSniff.check(&stream, i, &config, &mut state));
            }
        }
        out
    }

    fn codes(diags: &[Diagnostic]) -> Vec<&'static str> {
        diags.iter().map(|d| d.code).collect()
    }

    #[test]
    fn test_well_formed_class() {
        assert!(check("class Foo {\n}\n").is_empty());
    }

    #[test]
    fn test_brace_on_next_line() {
        let diags = check("class Foo\n{\n}\n");
        assert_eq!(codes(&diags), vec!["class.open_brace_new_line"]);
    }

    #[test]
    fn test_two_spaces_before_brace() {
        let diags = check("interface Foo  {\n}\n");
        assert_eq!(codes(&diags), vec!["class.space_before_brace"]);
        assert!(diags[0].message.contains("2 found"));
        assert!(diags[0].is_fixable());
    }

    #[test]
    fn test_no_space_before_brace() {
        let diags = check("trait Foo{\n}\n");
        assert_eq!(codes(&diags), vec!["class.no_space_before_brace"]);
    }

    #[test]
    fn test_missing_brace_is_warning() {
        let stream = lex("interface Foo extends Bar").unwrap();
        let idx = (0..stream.len())
            .find(|&i| stream.kind(i) == TokenKind::Interface)
            .unwrap();
        let mut state = FileState::default();
        let diags = ClassDeclarationSniff.check(&stream, idx, &SniffConfig::default(), &mut state);
        assert_eq!(codes(&diags), vec!["class.missing_brace"]);
        assert_eq!(diags[0].severity, rusniff_core::Severity::Warning);
    }
}

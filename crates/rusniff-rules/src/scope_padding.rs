//! scope_padding: blank lines framing named scope bodies
//!
//! Multi-line function/class/interface/trait bodies open with a line break
//! plus one genuinely empty line, and keep one genuinely empty line above the
//! closing brace. A comment occupying the line directly above the closer,
//! itself preceded by a line break, satisfies the closing rule. Single-line
//! functions must be empty.

use crate::config::SniffConfig;
use crate::registry::{FileState, Sniff};
use rusniff_core::{Diagnostic, TokenKind, TokenStream};

const TRIGGER_KINDS: &[TokenKind] = &[
    TokenKind::Function,
    TokenKind::Class,
    TokenKind::Interface,
    TokenKind::Trait,
];

pub struct ScopePaddingSniff;

impl Sniff for ScopePaddingSniff {
    fn name(&self) -> &'static str {
        "scope_padding"
    }

    fn description(&self) -> &'static str {
        "Blank lines after scope opening braces and before closing braces"
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
            return out;
        };

        // closures keep their own shape
        if stream.kind(index) == TokenKind::Function && scope.introducer_name.is_none() {
            return out;
        }

        let opener = scope.opener;
        let closer = scope.closer;

        if stream.line(opener) == stream.line(closer) {
            if stream.kind(index) == TokenKind::Function && opener + 1 != closer {
                out.push(Diagnostic::error(
                    "scope.non_empty_single_line",
                    "Single line function not empty",
                    index,
                ));
            }
            return out;
        }

        if stream.kind(opener + 1) != TokenKind::Newline {
            out.push(Diagnostic::error(
                "scope.newline_after_open",
                "Newline not found immediately after opening curly bracket",
                opener,
            ));
        }
        if opener + 2 >= stream.len() || stream.kind(opener + 2) != TokenKind::Newline {
            out.push(Diagnostic::error(
                "scope.blank_line_after_open",
                "Empty line not found immediately after the opening curly bracket",
                opener,
            ));
        }

        self.check_before_closer(stream, opener, closer, &mut out);
        out
    }
}

impl ScopePaddingSniff {
    /// Walk back from the closer: only whitespace may share its line, and the
    /// line above must be genuinely empty (or a comment preceded by a line
    /// break).
    fn check_before_closer(
        &self,
        stream: &TokenStream,
        opener: usize,
        closer: usize,
        out: &mut Vec<Diagnostic>,
    ) {
        let mut i = closer;
        let mut flagged = false;
        let mut line_end = None;

        while i > 0 {
            i -= 1;
            if i == opener {
                break;
            }
            match stream.kind(i) {
                TokenKind::Newline => {
                    line_end = Some(i);
                    break;
                }
                TokenKind::Whitespace => continue,
                _ => {
                    if !flagged {
                        out.push(Diagnostic::error(
                            "scope.non_whitespace_before_close",
                            "Non-whitespace found before closing curly brace",
                            i,
                        ));
                        flagged = true;
                    }
                }
            }
        }

        let Some(line_end) = line_end else {
            out.push(self.missing_blank_line(closer));
            return;
        };
        if line_end == 0 {
            out.push(self.missing_blank_line(closer));
            return;
        }

        let before = line_end - 1;
        match stream.kind(before) {
            TokenKind::Newline => {}
            kind if kind.is_comment() => {
                // comment occupying the line above; fine when the comment
                // itself starts on a fresh line
                let mut p = before;
                let mut ok = false;
                while p > 0 {
                    p -= 1;
                    match stream.kind(p) {
                        TokenKind::Whitespace => continue,
                        TokenKind::Newline => {
                            ok = true;
                            break;
                        }
                        _ => break,
                    }
                }
                if !ok {
                    out.push(self.missing_blank_line(closer));
                }
            }
            _ => out.push(self.missing_blank_line(closer)),
        }
    }

    fn missing_blank_line(&self, closer: usize) -> Diagnostic {
        Diagnostic::error(
            "scope.blank_line_before_close",
            "No empty newline found above closing curly brace",
            closer,
        )
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
                out.extend(ScopePaddingSniff.check(&stream, i, &config, &mut state));
            }
        }
        out
    }

    fn codes(diags: &[Diagnostic]) -> Vec<&'static str> {
        diags.iter().map(|d| d.code).collect()
    }

    #[test]
    fn test_well_padded_function() {
        let source = "function foo() {\n\n$a = 1;\n\n} // foo\n";
        assert!(check(source).is_empty());
    }

    #[test]
    fn test_empty_single_line_function() {
        assert!(check("function foo() {}\n").is_empty());
    }

    #[test]
    fn test_non_empty_single_line_function() {
        let diags = check("function foo() { return 1; }\n");
        assert_eq!(codes(&diags), vec!["scope.non_empty_single_line"]);
    }

    #[test]
    fn test_missing_blank_line_after_open() {
        let diags = check("function foo() {\n$a = 1;\n\n} // foo\n");
        assert_eq!(codes(&diags), vec!["scope.blank_line_after_open"]);
    }

    #[test]
    fn test_statement_glued_to_open() {
        let diags = check("function foo() { $a = 1;\n\n} // foo\n");
        assert_eq!(
            codes(&diags),
            vec!["scope.newline_after_open", "scope.blank_line_after_open"]
        );
    }

    #[test]
    fn test_missing_blank_line_before_close() {
        let diags = check("function foo() {\n\n$a = 1;\n} // foo\n");
        assert_eq!(codes(&diags), vec!["scope.blank_line_before_close"]);
    }

    #[test]
    fn test_whitespace_only_line_is_not_blank() {
        let diags = check("function foo() {\n\n$a = 1;\n  \n} // foo\n");
        assert_eq!(codes(&diags), vec!["scope.blank_line_before_close"]);
    }

    #[test]
    fn test_comment_above_closer_satisfies() {
        let source = "function foo() {\n\n$a = 1;\n// cleanup\n} // foo\n";
        assert!(check(source).is_empty());
    }

    #[test]
    fn test_indented_comment_above_closer_satisfies() {
        let source = "function foo() {\n\n$a = 1;\n  // cleanup\n} // foo\n";
        assert!(check(source).is_empty());
    }

    #[test]
    fn test_statement_before_closer_flagged() {
        // the line above the closer's own line is empty, so only the
        // non-whitespace violation fires
        let diags = check("function foo() {\n\n$a = 1; } // foo\n");
        assert_eq!(codes(&diags), vec!["scope.non_whitespace_before_close"]);
    }

    #[test]
    fn test_class_body_padding() {
        let source = "class Foo {\n\npublic $bar = 1;\n\n} // Foo\n";
        assert!(check(source).is_empty());
    }

    #[test]
    fn test_closures_exempt() {
        let source = "$f = function () {\nreturn 1;\n}; // handler\n";
        assert!(check(source).is_empty());
    }
}

//! trailing_comment: comments closing a brace-delimited scope
//!
//! Function/class-like scopes must end with `} // <declared-name>`; control
//! structures spanning enough lines must end with `} // <keyword>
//! <description>`. Single-line scopes and unassigned closures are exempt;
//! assigned closures need their terminating semicolon before the comment is
//! even considered.

use crate::config::SniffConfig;
use crate::registry::{FileState, Sniff};
use rusniff_core::{Diagnostic, TokenKind, TokenStream};

const TRIGGER_KINDS: &[TokenKind] = &[
    TokenKind::Function,
    TokenKind::Class,
    TokenKind::Interface,
    TokenKind::Trait,
    TokenKind::If,
    TokenKind::Else,
    TokenKind::ElseIf,
    TokenKind::For,
    TokenKind::Foreach,
    TokenKind::While,
    TokenKind::Do,
    TokenKind::Try,
    TokenKind::Catch,
    TokenKind::Finally,
    TokenKind::Switch,
];

const TRIVIA: &[TokenKind] = &[
    TokenKind::Whitespace,
    TokenKind::Newline,
    TokenKind::LineComment,
    TokenKind::BlockComment,
    TokenKind::DocComment,
];

/// Scope kinds whose trailing description may be empty.
const DESCRIPTION_NOT_REQUIRED: &[TokenKind] = &[TokenKind::Try, TokenKind::Else];

fn scope_label(kind: TokenKind) -> Option<&'static str> {
    Some(match kind {
        TokenKind::Function => "function",
        TokenKind::Class => "class",
        TokenKind::Interface => "interface",
        TokenKind::Trait => "trait",
        TokenKind::While => "while",
        TokenKind::For => "for",
        TokenKind::Foreach => "foreach",
        TokenKind::If => "if",
        TokenKind::Else => "else",
        TokenKind::ElseIf => "elseif",
        TokenKind::Do => "do",
        TokenKind::Try => "try",
        TokenKind::Catch => "catch",
        TokenKind::Switch => "switch",
        _ => return None,
    })
}

pub struct TrailingCommentSniff;

impl Sniff for TrailingCommentSniff {
    fn name(&self) -> &'static str {
        "trailing_comment"
    }

    fn description(&self) -> &'static str {
        "Trailing comments after scope-closing braces"
    }

    fn kinds(&self) -> &'static [TokenKind] {
        TRIGGER_KINDS
    }

    fn check(
        &self,
        stream: &TokenStream,
        index: usize,
        config: &SniffConfig,
        _state: &mut FileState,
    ) -> Vec<Diagnostic> {
        let mut out = Vec::new();

        // inline scopes and interface-style declarations have no brace body
        let Some(scope) = stream.scope_of(index) else {
            return out;
        };
        if scope.is_single_line {
            return out;
        }

        let closer = scope.closer;
        let is_closure =
            stream.kind(index) == TokenKind::Function && scope.introducer_name.is_none();
        let assigned = is_closure && is_assigned_closure(stream, index);
        if is_closure && !assigned {
            return out;
        }

        let next = closer + 1;
        if next >= stream.len() {
            return out;
        }

        // comment glued to the brace
        if stream.kind(next).is_comment() {
            out.push(Diagnostic::error(
                "comment.missing_whitespace",
                "Single space required between closing curly brace & trailing comment",
                closer,
            ));
            return out;
        }

        // bare line break: the comment is missing entirely; whether that is
        // an error depends on the scope's size and kind
        if stream.kind(next) == TokenKind::Newline {
            let lines = stream
                .line(closer)
                .saturating_sub(stream.line(scope.opener))
                .saturating_sub(1);
            let min = config.trailing_comment.min_lines_required;

            if lines >= min {
                out.push(Diagnostic::error(
                    "comment.missing_trailing",
                    format!(
                        "Missing required trailing comment for scope >= {} lines; found {} lines",
                        min, lines
                    ),
                    closer,
                ));
            } else if stream.kind(index).is_named_scope() && !is_closure {
                let label = scope_label(stream.kind(index)).unwrap_or("scope");
                out.push(Diagnostic::error(
                    "comment.missing_trailing",
                    format!("Missing required trailing comment for {}", label),
                    closer,
                ));
            }
            return out;
        }

        if stream.kind(next) == TokenKind::Whitespace {
            let run_end = stream
                .find_next(&[TokenKind::Whitespace], next, None, true)
                .unwrap_or(stream.len());
            let amount = stream.count_intervening_whitespace(closer, run_end);
            if amount > 1 {
                out.push(Diagnostic::error(
                    "comment.too_much_whitespace",
                    "Too much whitespace detected after curly brace",
                    closer,
                ));
                return out;
            }
        }

        let mut comment_ptr = closer + 2;

        // assigned closures must terminate before the comment
        if assigned {
            if stream.kind(next) != TokenKind::Semicolon {
                out.push(Diagnostic::error(
                    "comment.closure_semicolon",
                    "Semicolon not found after anonymous function assignment",
                    next,
                ));
                return out;
            }
            comment_ptr += 1;
        }

        if comment_ptr >= stream.len() || !stream.kind(comment_ptr).is_comment() {
            out.push(Diagnostic::error(
                "comment.trailing_not_found",
                "Trailing comment not found after closing curly",
                closer,
            ));
            return out;
        }

        // exactly one space between the slashes and the text
        let content = stream.text(comment_ptr).trim_start_matches('/');
        let chars: Vec<char> = content.chars().collect();
        if chars.len() < 2 || chars[0] != ' ' || chars[1] == ' ' {
            out.push(Diagnostic::error(
                "comment.bad_format",
                "Trailing comment formatted incorrectly; // <comment>",
                closer,
            ));
            return out;
        }

        self.check_content(stream, index, closer, comment_ptr, is_closure, &mut out);
        out
    }
}

impl TrailingCommentSniff {
    fn check_content(
        &self,
        stream: &TokenStream,
        introducer: usize,
        closer: usize,
        comment_ptr: usize,
        is_closure: bool,
        out: &mut Vec<Diagnostic>,
    ) {
        let kind = stream.kind(introducer);
        let Some(label) = scope_label(kind) else {
            return;
        };
        if is_closure {
            return;
        }

        let actual = stream.text(comment_ptr).trim().to_string();

        if kind.is_named_scope() {
            let Some(declared) = stream.declaration_name(introducer) else {
                return;
            };
            let expected = format!("// {}", declared);
            if actual != expected {
                out.push(Diagnostic::error(
                    "comment.invalid_name_trailing",
                    format!(
                        "Trailing comment for {} \"{}\" incorrect; expected \"{}\", found \"{}\"",
                        label, declared, expected, actual
                    ),
                    closer,
                ));
            }
            return;
        }

        let expected = format!("// {}", label);
        let structure_error = || {
            Diagnostic::error(
                "comment.invalid_trailing",
                format!(
                    "Control structure trailing comment not structured properly; expected \"{} <description>\", found \"{}\"",
                    expected, actual
                ),
                closer,
            )
        };

        if !actual.starts_with(&expected) {
            out.push(structure_error());
            return;
        }

        if actual.len() <= expected.len() && !DESCRIPTION_NOT_REQUIRED.contains(&kind) {
            out.push(structure_error());
            return;
        }

        if actual.contains('$') {
            out.push(Diagnostic::error(
                "comment.variable_in_trailing",
                "No PHP variable-like names in trailing comments",
                closer,
            ));
        }
    }
}

fn is_assigned_closure(stream: &TokenStream, introducer: usize) -> bool {
    if introducer == 0 {
        return false;
    }
    stream
        .find_previous(TRIVIA, introducer - 1, None, true)
        .map(|i| stream.kind(i).is_assignment())
        .unwrap_or(false)
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
                out.extend(TrailingCommentSniff.check(&stream, i, &config, &mut state));
            }
        }
        out
    }

    fn codes(diags: &[Diagnostic]) -> Vec<&'static str> {
        diags.iter().map(|d| d.code).collect()
    }

    #[test]
    fn test_function_with_correct_trailing_comment() {
        assert!(check("function foo() {\n$a = 1;\n} // foo\n").is_empty());
    }

    #[test]
    fn test_function_with_wrong_name() {
        let diags = check("function foo() {\n$a = 1;\n} // bar\n");
        assert_eq!(codes(&diags), vec!["comment.invalid_name_trailing"]);
        assert!(diags[0].message.contains("// foo"));
        assert!(diags[0].message.contains("// bar"));
    }

    #[test]
    fn test_function_missing_comment() {
        let diags = check("function foo() {\n$a = 1;\n}\n");
        assert_eq!(codes(&diags), vec!["comment.missing_trailing"]);
        assert!(diags[0].message.contains("function"));
    }

    #[test]
    fn test_single_line_scope_exempt() {
        assert!(check("function foo() { return 1; }\n").is_empty());
    }

    #[test]
    fn test_short_control_scope_tolerated() {
        assert!(check("if ( $a ) {\nf();\n}\n").is_empty());
    }

    #[test]
    fn test_long_control_scope_requires_comment() {
        let source = "if ( $a ) {\nf();\ng();\nh();\ni();\n}\n";
        let diags = check(source);
        assert_eq!(codes(&diags), vec!["comment.missing_trailing"]);
        assert!(diags[0].message.contains("found 4 lines"));
    }

    #[test]
    fn test_while_requires_description() {
        let diags = check("while ( $a ) {\nf();\n} // while\n");
        assert_eq!(codes(&diags), vec!["comment.invalid_trailing"]);
    }

    #[test]
    fn test_while_with_description_passes() {
        assert!(check("while ( $a ) {\nf();\n} // while items remain\n").is_empty());
    }

    #[test]
    fn test_try_description_exempt() {
        assert!(check("try {\nf();\n} // try\n").is_empty());
    }

    #[test]
    fn test_comment_glued_to_brace() {
        let diags = check("function foo() {\n$a = 1;\n}// foo\n");
        assert_eq!(codes(&diags), vec!["comment.missing_whitespace"]);
    }

    #[test]
    fn test_too_much_whitespace_before_comment() {
        let diags = check("function foo() {\n$a = 1;\n}   // foo\n");
        assert_eq!(codes(&diags), vec!["comment.too_much_whitespace"]);
    }

    #[test]
    fn test_comment_format_two_leading_spaces() {
        let diags = check("function foo() {\n$a = 1;\n} //  foo\n");
        assert_eq!(codes(&diags), vec!["comment.bad_format"]);
    }

    #[test]
    fn test_variable_in_description_rejected() {
        let diags = check("while ( $a ) {\nf();\n} // while $a is set\n");
        assert_eq!(codes(&diags), vec!["comment.variable_in_trailing"]);
    }

    #[test]
    fn test_unassigned_closure_exempt() {
        assert!(check("f( function () {\nreturn 1;\n} );\n").is_empty());
    }

    #[test]
    fn test_assigned_closure_needs_semicolon() {
        let diags = check("$f = function () {\nreturn 1;\n} // done\n");
        assert_eq!(codes(&diags), vec!["comment.closure_semicolon"]);
    }

    #[test]
    fn test_assigned_closure_with_semicolon_and_comment() {
        assert!(check("$f = function () {\nreturn 1;\n}; // handler\n").is_empty());
    }
}

//! array_declaration: structural formatting of array literals
//!
//! Single-line literals get bracket padding and comma/arrow spacing checks;
//! multi-line literals additionally get closer placement, entry alignment
//! against `indent × element_indent_level`, and key/value mode consistency.
//! Mixing keyed and bare entries in one literal aborts the entry-level checks
//! for that literal only; the outer bracket checks always run first.

use crate::config::SniffConfig;
use crate::registry::{FileState, Sniff};
use rusniff_core::{Diagnostic, FixAction, TokenKind, TokenStream};

const TRIGGER_KINDS: &[TokenKind] = &[TokenKind::Array, TokenKind::OpenShortArray];

const WHITESPACE: &[TokenKind] = &[TokenKind::Whitespace, TokenKind::Newline];

const TRIVIA: &[TokenKind] = &[
    TokenKind::Whitespace,
    TokenKind::Newline,
    TokenKind::LineComment,
    TokenKind::BlockComment,
    TokenKind::DocComment,
];

/// One entry of a literal under analysis. Derived per invocation and
/// discarded with it; only the positions the active checks consume are kept.
struct ArrayEntry {
    /// First token of the key, for keyed entries.
    key: Option<usize>,
    /// First token of the value; `None` for malformed entries.
    value: Option<usize>,
}

pub struct ArrayDeclarationSniff;

impl Sniff for ArrayDeclarationSniff {
    fn name(&self) -> &'static str {
        "array_declaration"
    }

    fn description(&self) -> &'static str {
        "Array literal spacing, alignment and key/value consistency"
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
        let is_short = stream.kind(index) == TokenKind::OpenShortArray;

        if !is_short {
            let text = stream.text(index);
            if text != text.to_lowercase() {
                out.push(
                    Diagnostic::error(
                        "array.keyword_not_lower_case",
                        format!(
                            "Array keyword should be lower case; expected \"array\" but found \"{}\"",
                            text
                        ),
                        index,
                    )
                    .with_fix(FixAction::ReplaceTokenText {
                        index,
                        text: text.to_lowercase(),
                    }),
                );
            }
        }

        // resolve the bracket pair holding the values
        let start = if is_short {
            index
        } else {
            let Some(next) = stream.find_next(TRIVIA, index + 1, None, true) else {
                return out;
            };
            if stream.kind(next) != TokenKind::OpenParenthesis {
                // `array` used as a type hint, not a literal
                return out;
            }
            next
        };
        let Some(end) = stream.skip_bracketed(start) else {
            return out;
        };

        if !is_short && start != index + 1 {
            let mut diag = Diagnostic::error(
                "array.space_after_keyword",
                "There must be no space between the Array keyword and the opening parenthesis",
                index,
            );
            if start == index + 2 && stream.kind(index + 1) == TokenKind::Whitespace {
                diag = diag.with_fix(FixAction::ReplaceTokenText {
                    index: index + 1,
                    text: String::new(),
                });
            }
            out.push(diag);
        }

        // empty arrays: brackets must be adjacent, and nothing else applies
        let first_content = stream.find_next(WHITESPACE, start + 1, Some(end + 1), true);
        if first_content == Some(end) {
            if end != start + 1 {
                let mut diag = Diagnostic::error(
                    "array.space_in_empty",
                    "Empty array declaration must have no spaces",
                    index,
                );
                if end == start + 2 && stream.kind(start + 1) == TokenKind::Whitespace {
                    diag = diag.with_fix(FixAction::ReplaceTokenText {
                        index: start + 1,
                        text: String::new(),
                    });
                }
                out.push(diag);
            }
            return out;
        }

        if stream.line(start) == stream.line(end) {
            self.check_single_line(stream, index, start, end, config, &mut out);
        } else {
            self.check_multi_line(stream, index, start, end, config, &mut out);
        }

        out
    }
}

impl ArrayDeclarationSniff {
    fn check_single_line(
        &self,
        stream: &TokenStream,
        trigger: usize,
        start: usize,
        end: usize,
        config: &SniffConfig,
        out: &mut Vec<Diagnostic>,
    ) {
        // exactly one space just inside each bracket
        if !(stream.kind(start + 1) == TokenKind::Whitespace && stream.text(start + 1) == " ") {
            let fix = if stream.kind(start + 1) == TokenKind::Whitespace {
                FixAction::ReplaceTokenText {
                    index: start + 1,
                    text: " ".into(),
                }
            } else {
                FixAction::InsertBefore {
                    index: start + 1,
                    text: " ".into(),
                }
            };
            out.push(
                Diagnostic::error(
                    "array.space_after_open",
                    "Expected exactly 1 space after array open",
                    trigger,
                )
                .with_fix(fix),
            );
        }
        if !(stream.kind(end - 1) == TokenKind::Whitespace && stream.text(end - 1) == " ") {
            let fix = if stream.kind(end - 1) == TokenKind::Whitespace {
                FixAction::ReplaceTokenText {
                    index: end - 1,
                    text: " ".into(),
                }
            } else {
                FixAction::InsertBefore {
                    index: end,
                    text: " ".into(),
                }
            };
            out.push(
                Diagnostic::error(
                    "array.space_before_close",
                    "Expected exactly 1 space before array close",
                    end - 1,
                )
                .with_fix(fix),
            );
        }

        // count values; a comma with nothing but the closer behind it is
        // a trailing comma, which single-line arrays must not have
        let mut commas = Vec::new();
        let mut i = start + 1;
        while i < end {
            if stream.kind(i) == TokenKind::OpenParenthesis {
                // skip bracketed statements, like function calls
                i = stream.skip_bracketed(i).unwrap_or(end) + 1;
                continue;
            }
            if stream.kind(i) == TokenKind::Comma {
                match stream.find_next(WHITESPACE, i + 1, Some(end), true) {
                    Some(_) => commas.push(i),
                    None => out.push(
                        Diagnostic::error(
                            "array.comma_after_last",
                            "Comma not allowed after last value in single-line array declaration",
                            i,
                        )
                        .with_fix(FixAction::ReplaceTokenText {
                            index: i,
                            text: String::new(),
                        }),
                    ),
                }
            }
            i += 1;
        }

        // double arrow padding
        let mut arrow = start;
        while let Some(a) = stream.find_next(&[TokenKind::DoubleArrow], arrow + 1, Some(end), false)
        {
            if !stream.kind(a - 1).is_whitespace() {
                out.push(
                    Diagnostic::error(
                        "array.no_space_before_double_arrow",
                        format!(
                            "Expected at least 1 space between \"{}\" and double arrow; 0 found",
                            stream.text(a - 1)
                        ),
                        a,
                    )
                    .with_fix(FixAction::InsertBefore {
                        index: a,
                        text: " ".into(),
                    }),
                );
            }
            if !stream.kind(a + 1).is_whitespace() {
                out.push(
                    Diagnostic::error(
                        "array.no_space_after_double_arrow",
                        format!(
                            "Expected at least 1 space between double arrow and \"{}\"; 0 found",
                            stream.text(a + 1)
                        ),
                        a,
                    )
                    .with_fix(FixAction::InsertBefore {
                        index: a + 1,
                        text: " ".into(),
                    }),
                );
            }
            arrow = a;
        }

        if !commas.is_empty() {
            for &comma in &commas {
                if stream.kind(comma + 1) != TokenKind::Whitespace {
                    out.push(
                        Diagnostic::error(
                            "array.no_space_after_comma",
                            format!(
                                "Expected at least 1 space between comma and \"{}\"; 0 found",
                                stream.text(comma + 1)
                            ),
                            comma,
                        )
                        .with_fix(FixAction::InsertBefore {
                            index: comma + 1,
                            text: " ".into(),
                        }),
                    );
                }
                if stream.kind(comma - 1) == TokenKind::Whitespace {
                    out.push(
                        Diagnostic::error(
                            "array.space_before_comma",
                            format!(
                                "Expected 0 spaces between \"{}\" and comma; {} found",
                                stream.text(comma.saturating_sub(2)),
                                stream.text(comma - 1).len()
                            ),
                            comma,
                        )
                        .with_fix(FixAction::ReplaceTokenText {
                            index: comma - 1,
                            text: String::new(),
                        }),
                    );
                }
            }

            // policy-gated: multiple values normally belong on multiple
            // lines unless the literal sits inside a call or condition
            if config.array.flag_single_line_multi_value {
                let cond = stream.find_previous(
                    &[TokenKind::OpenParenthesis, TokenKind::Semicolon],
                    trigger.saturating_sub(1),
                    None,
                    false,
                );
                let inside_same_line = cond
                    .map(|c| stream.line(c) == stream.line(trigger))
                    .unwrap_or(false);
                if !inside_same_line {
                    out.push(Diagnostic::warning(
                        "array.single_line_multi_value",
                        "Array with multiple values should be declared over multiple lines",
                        trigger,
                    ));
                }
            }
        }
    }

    fn check_multi_line(
        &self,
        stream: &TokenStream,
        trigger: usize,
        start: usize,
        end: usize,
        config: &SniffConfig,
        out: &mut Vec<Diagnostic>,
    ) {
        let indent_ptr = stream.first_on_line(trigger);
        let indent_start = stream.column(indent_ptr);
        let indent_spaces = config.array.indent_spaces();

        // closer on its own line, aligned under the declaration
        if let Some(last_content) = stream.find_previous(WHITESPACE, end - 1, Some(start), true) {
            if stream.line(last_content) == stream.line(end) {
                out.push(Diagnostic::error(
                    "array.close_brace_new_line",
                    "Closer of array declaration must be on a new line",
                    end,
                ));
            } else if stream.column(end) != indent_start {
                out.push(Diagnostic::error(
                    "array.close_brace_not_aligned",
                    format!(
                        "Closer of array not aligned correctly; expected {} space(s) but found {}",
                        indent_start,
                        stream.column(end)
                    ),
                    end,
                ));
            }
        }

        let Some(entries) = self.collect_entries(stream, start, end, out) else {
            // mixed key/value modes: entry-level checks aborted
            return;
        };
        let key_used = entries.iter().any(|e| e.key.is_some());

        // value-only literals: column alignment of each value
        if !key_used {
            for entry in &entries {
                let Some(value) = entry.value else { continue };
                if value > 0 && stream.kind(value - 1).is_whitespace() {
                    let expected = indent_start + indent_spaces;
                    let found = stream.column(value);
                    if found != expected {
                        out.push(Diagnostic::error(
                            "array.value_not_aligned",
                            format!(
                                "Array value not aligned correctly; expected {} spaces but found {}",
                                expected, found
                            ),
                            value,
                        ));
                    }
                }
            }
        }

        let num_values = entries.len();
        let indices_start = indent_start + indent_spaces;

        for entry in &entries {
            let Some(key) = entry.key else {
                // value-only entry
                if let Some(value) = entry.value {
                    if stream.line(value) == stream.line(trigger) && num_values > 1 {
                        out.push(Diagnostic::error(
                            "array.first_value_no_newline",
                            "The first value in a multi-value array must be on a new line",
                            trigger,
                        ));
                    }
                }
                continue;
            };

            if stream.line(key) == stream.line(trigger) {
                out.push(Diagnostic::error(
                    "array.first_index_no_newline",
                    "The first index in a multi-value array must be on a new line",
                    trigger,
                ));
                continue;
            }

            if stream.column(key) != indices_start {
                out.push(Diagnostic::error(
                    "array.key_not_aligned",
                    format!(
                        "Array key not aligned correctly; expected {} spaces but found {}",
                        indices_start,
                        stream.column(key)
                    ),
                    key,
                ));
                continue;
            }

            // each keyed line must not pad the comma ending it
            let Some(value) = entry.value else { continue };
            if matches!(
                stream.kind(value),
                TokenKind::Array | TokenKind::OpenShortArray
            ) {
                // nested literals get their own sniff invocation
                continue;
            }
            let mut i = value + 1;
            let mut next_comma = None;
            while i < end {
                if stream.kind(i) == TokenKind::OpenParenthesis {
                    i = stream.skip_bracketed(i).unwrap_or(end) + 1;
                    continue;
                }
                if stream.kind(i) == TokenKind::Comma {
                    next_comma = Some(i);
                    break;
                }
                i += 1;
            }
            if let Some(comma) = next_comma {
                if stream.kind(comma - 1) == TokenKind::Whitespace {
                    out.push(
                        Diagnostic::error(
                            "array.space_before_comma",
                            format!(
                                "Expected 0 spaces between \"{}\" and comma; {} found",
                                stream.text(comma.saturating_sub(2)),
                                stream.text(comma - 1).len()
                            ),
                            comma,
                        )
                        .with_fix(FixAction::ReplaceTokenText {
                            index: comma - 1,
                            text: String::new(),
                        }),
                    );
                }
            }
        }
    }

    /// Scan the top level of a multi-line literal and build its entry list.
    ///
    /// Returns `None` when keyed and bare entries are mixed; the mode
    /// violation is reported and the caller skips all entry-level checks for
    /// this literal.
    fn collect_entries(
        &self,
        stream: &TokenStream,
        start: usize,
        end: usize,
        out: &mut Vec<Diagnostic>,
    ) -> Option<Vec<ArrayEntry>> {
        const SCAN: &[TokenKind] = &[
            TokenKind::DoubleArrow,
            TokenKind::Comma,
            TokenKind::Array,
            TokenKind::OpenShortArray,
        ];

        let inner_depth = stream.nesting_depth(start) + 1;
        let mut entries = Vec::new();
        let mut cursor = start;
        let mut last_comma = start;
        let mut key_used = false;
        let mut single_used = false;
        let mut last_was_comma = false;

        while let Some(found) = stream.find_next(SCAN, cursor + 1, Some(end), false) {
            cursor = found;
            match stream.kind(found) {
                TokenKind::Array | TokenKind::OpenShortArray => {
                    // let the nested literal's own invocation handle it
                    let opener = if stream.kind(found) == TokenKind::OpenShortArray {
                        Some(found)
                    } else {
                        stream
                            .find_next(TRIVIA, found + 1, Some(end), true)
                            .filter(|&n| stream.kind(n) == TokenKind::OpenParenthesis)
                    };
                    if let Some(closer) = opener.and_then(|o| stream.skip_bracketed(o)) {
                        cursor = closer;
                    }
                }
                TokenKind::Comma => {
                    last_comma = found;
                    if stream.nesting_depth(found) > inner_depth {
                        // argument separator of a nested call
                        continue;
                    }

                    if key_used && last_was_comma {
                        out.push(Diagnostic::error(
                            "array.no_key_specified",
                            "No key specified for array entry; first entry specifies key",
                            found,
                        ));
                        return None;
                    }

                    if !key_used {
                        if stream.kind(found - 1) == TokenKind::Whitespace {
                            out.push(
                                Diagnostic::error(
                                    "array.space_before_comma",
                                    format!(
                                        "Expected 0 spaces between \"{}\" and comma; {} found",
                                        stream.text(found.saturating_sub(2)),
                                        stream.text(found - 1).len()
                                    ),
                                    found,
                                )
                                .with_fix(FixAction::ReplaceTokenText {
                                    index: found - 1,
                                    text: String::new(),
                                }),
                            );
                        }

                        // the value anchor is the first token on the comma's line
                        let mut back = stream
                            .find_previous(TRIVIA, found - 1, None, true)
                            .unwrap_or(start);
                        while back > start && stream.line(back) == stream.line(found) {
                            back -= 1;
                        }
                        let value = stream.find_next(WHITESPACE, back + 1, Some(found), true);
                        entries.push(ArrayEntry { key: None, value });
                        single_used = true;
                    }

                    last_was_comma = true;
                }
                TokenKind::DoubleArrow => {
                    if single_used {
                        out.push(Diagnostic::error(
                            "array.key_specified",
                            "Key specified for array entry; first entry has no key",
                            found,
                        ));
                        return None;
                    }
                    key_used = true;
                    last_was_comma = false;

                    let key = stream.find_next(TRIVIA, last_comma + 1, Some(end), true);
                    let value = stream.find_next(WHITESPACE, found + 1, Some(end), true);
                    entries.push(ArrayEntry { key, value });
                }
                _ => unreachable!("scan set is closed"),
            }
        }

        Some(entries)
    }
}

//! blank_lines: cap on consecutive blank lines
//!
//! Runs once per file (triggered by the open tag) and scans the whole stream.
//! A blank line is a newline token starting its own line; runs longer than
//! the configured limit are reported, one diagnostic per excess line so each
//! carries its own single-token deletion fix.

use crate::config::SniffConfig;
use crate::registry::{FileState, Sniff};
use rusniff_core::{Diagnostic, FixAction, TokenKind, TokenStream};

const TRIGGER_KINDS: &[TokenKind] = &[TokenKind::OpenTag];

pub struct BlankLinesSniff;

impl Sniff for BlankLinesSniff {
    fn name(&self) -> &'static str {
        "blank_lines"
    }

    fn description(&self) -> &'static str {
        "Limit consecutive blank lines"
    }

    fn kinds(&self) -> &'static [TokenKind] {
        TRIGGER_KINDS
    }

    fn check(
        &self,
        stream: &TokenStream,
        _index: usize,
        config: &SniffConfig,
        _state: &mut FileState,
    ) -> Vec<Diagnostic> {
        let limit = config.blank_lines.max_consecutive as usize;
        let mut out = Vec::new();

        let mut i = 0;
        while i < stream.len() {
            if !is_blank_line(stream, i) {
                i += 1;
                continue;
            }

            let run_start = i;
            let mut run_end = i;
            while run_end + 1 < stream.len() && is_blank_line(stream, run_end + 1) {
                run_end += 1;
            }

            for excess in (run_start + limit)..=run_end {
                out.push(
                    Diagnostic::error(
                        "format.max_blank_lines",
                        format!(
                            "More than {} consecutive blank lines are not allowed",
                            limit
                        ),
                        excess,
                    )
                    .with_fix(FixAction::ReplaceTokenText {
                        index: excess,
                        text: String::new(),
                    }),
                );
            }

            i = run_end + 1;
        }

        out
    }
}

/// A newline starting at column 1 terminates a line holding nothing at all.
fn is_blank_line(stream: &TokenStream, index: usize) -> bool {
    stream.kind(index) == TokenKind::Newline && stream.column(index) == 1
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
                out.extend(BlankLinesSniff.check(&stream, i, &config, &mut state));
            }
        }
        out
    }

    #[test]
    fn test_two_blank_lines_allowed() {
        assert!(check("<?php\n$a = 1;\n\n\n$b = 2;\n").is_empty());
    }

    #[test]
    fn test_three_blank_lines_flagged() {
        let diags = check("<?php\n$a = 1;\n\n\n\n$b = 2;\n");
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].code, "format.max_blank_lines");
        assert!(diags[0].is_fixable());
    }

    #[test]
    fn test_each_excess_line_carries_a_fix() {
        let diags = check("<?php\n$a = 1;\n\n\n\n\n$b = 2;\n");
        assert_eq!(diags.len(), 2);
        let targets: Vec<usize> = diags.iter().map(|d| d.fix.as_ref().unwrap().index()).collect();
        assert_ne!(targets[0], targets[1]);
    }

    #[test]
    fn test_whitespace_on_line_is_not_blank() {
        // a line holding spaces is not a blank line for this rule
        assert!(check("<?php\n$a = 1;\n\n  \n\n$b = 2;\n").is_empty());
    }

    #[test]
    fn test_custom_limit() {
        let stream = lex("<?php\n$a = 1;\n\n\n$b = 2;\n").unwrap();
        let mut config = SniffConfig::default();
        config.blank_lines.max_consecutive = 1;
        let mut state = FileState::default();
        let diags = BlankLinesSniff.check(&stream, 0, &config, &mut state);
        assert_eq!(diags.len(), 1);
    }
}

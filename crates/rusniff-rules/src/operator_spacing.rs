//! operator_spacing: whitespace around binary operators, with unary
//! disambiguation
//!
//! Minus, ampersand, boolean-not and `=` are lexically ambiguous: the same
//! token is spaced differently depending on whether it is used as a binary
//! operator, a unary operator or a reference marker. The classifier decides
//! from the nearest qualifying token behind the operator; anything it cannot
//! claim falls through to the generic rule (whitespace required on both
//! sides).

use crate::config::SniffConfig;
use crate::registry::{FileState, Sniff};
use rusniff_core::{Diagnostic, FixAction, TokenKind, TokenStream};

/// Outcome of classifying a potentially-unary operator token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOutcome {
    /// Spacing handled under the unary rules.
    HandledAsUnary,
    /// Spacing handled (or waived) under the reference rules.
    HandledAsReference,
    /// Not unary here; apply the generic binary rule.
    NotUnary,
}

/// Tokens whose presence immediately behind a `-` marks it as unary.
const UNARY_INDICATORS: &[TokenKind] = &[
    // comparisons
    TokenKind::EqualsEquals,
    TokenKind::BangEquals,
    TokenKind::EqualsEqualsEquals,
    TokenKind::BangEqualsEquals,
    TokenKind::LessThan,
    TokenKind::GreaterThan,
    TokenKind::LessThanEquals,
    TokenKind::GreaterThanEquals,
    TokenKind::Spaceship,
    // assignments
    TokenKind::Equals,
    TokenKind::PlusEquals,
    TokenKind::MinusEquals,
    TokenKind::StarEquals,
    TokenKind::SlashEquals,
    TokenKind::PercentEquals,
    TokenKind::StarStarEquals,
    TokenKind::DotEquals,
    TokenKind::AmpersandEquals,
    TokenKind::PipeEquals,
    TokenKind::CaretEquals,
    TokenKind::ShiftLeftEquals,
    TokenKind::ShiftRightEquals,
    TokenKind::CoalesceEquals,
    // structural positions where only a value can follow
    TokenKind::Colon,
    TokenKind::Comma,
    TokenKind::Question,
    TokenKind::OpenParenthesis,
    TokenKind::OpenSquareBracket,
    TokenKind::OpenShortArray,
    TokenKind::OpenTag,
    TokenKind::Return,
];

/// Tokens that end a value expression; a `-` right after one is arithmetic.
const VALUE_END: &[TokenKind] = &[
    TokenKind::CloseParenthesis,
    TokenKind::CloseSquareBracket,
    TokenKind::CloseShortArray,
    TokenKind::Variable,
    TokenKind::IntLiteral,
    TokenKind::FloatLiteral,
    TokenKind::Identifier,
];

/// Context tokens marking an ampersand as a reference operator.
const REFERENCE_CONTEXT: &[TokenKind] = &[
    TokenKind::Equals,
    TokenKind::Comma,
    TokenKind::DoubleArrow,
    TokenKind::OpenParenthesis,
    TokenKind::As,
];

const TRIGGER_KINDS: &[TokenKind] = &[
    // assignments
    TokenKind::Equals,
    TokenKind::PlusEquals,
    TokenKind::MinusEquals,
    TokenKind::StarEquals,
    TokenKind::SlashEquals,
    TokenKind::PercentEquals,
    TokenKind::StarStarEquals,
    TokenKind::DotEquals,
    TokenKind::AmpersandEquals,
    TokenKind::PipeEquals,
    TokenKind::CaretEquals,
    TokenKind::ShiftLeftEquals,
    TokenKind::ShiftRightEquals,
    TokenKind::CoalesceEquals,
    // comparisons
    TokenKind::EqualsEquals,
    TokenKind::BangEquals,
    TokenKind::EqualsEqualsEquals,
    TokenKind::BangEqualsEquals,
    TokenKind::LessThan,
    TokenKind::GreaterThan,
    TokenKind::LessThanEquals,
    TokenKind::GreaterThanEquals,
    TokenKind::Spaceship,
    // arithmetic / bitwise / coalesce / concat
    TokenKind::Plus,
    TokenKind::Minus,
    TokenKind::Star,
    TokenKind::Slash,
    TokenKind::Percent,
    TokenKind::StarStar,
    TokenKind::Dot,
    TokenKind::Ampersand,
    TokenKind::Pipe,
    TokenKind::Caret,
    TokenKind::ShiftLeft,
    TokenKind::ShiftRight,
    TokenKind::QuestionQuestion,
    // unary-capable extras
    TokenKind::Bang,
];

pub struct OperatorSpacingSniff;

impl Sniff for OperatorSpacingSniff {
    fn name(&self) -> &'static str {
        "operator_spacing"
    }

    fn description(&self) -> &'static str {
        "Whitespace around operators, with unary/reference disambiguation"
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

        if matches!(
            stream.kind(index),
            TokenKind::Equals | TokenKind::Ampersand | TokenKind::Minus | TokenKind::Bang
        ) && classify_unary(stream, index, &mut out) != UnaryOutcome::NotUnary
        {
            return out;
        }

        // generic rule: whitespace on both sides
        let text = stream.text(index);
        if index == 0 || !stream.kind(index - 1).is_whitespace() {
            let mut diag = Diagnostic::error(
                "operator.padding",
                format!("\"{}\" operator requires whitespace before it", text),
                index,
            );
            diag = diag.with_fix(FixAction::InsertBefore {
                index,
                text: " ".into(),
            });
            out.push(diag);
        }
        if index + 1 >= stream.len() || !stream.kind(index + 1).is_whitespace() {
            let mut diag = Diagnostic::error(
                "operator.padding",
                format!("\"{}\" operator requires whitespace after it", text),
                index,
            );
            if index + 1 < stream.len() {
                diag = diag.with_fix(FixAction::InsertBefore {
                    index: index + 1,
                    text: " ".into(),
                });
            }
            out.push(diag);
        }

        out
    }
}

/// Classify a potentially-unary operator and emit its spacing diagnostics.
///
/// Returns [`UnaryOutcome::NotUnary`] when the token is not used in a
/// unary/reference position — including when no qualifying context token can
/// be found at all (malformed partial source): the caller then applies the
/// generic binary rule instead of failing.
pub fn classify_unary(
    stream: &TokenStream,
    index: usize,
    out: &mut Vec<Diagnostic>,
) -> UnaryOutcome {
    match stream.kind(index) {
        TokenKind::Equals => {
            // reference assignment `=&`: neither token gets the generic rule
            if index + 1 < stream.len() && stream.kind(index + 1) == TokenKind::Ampersand {
                UnaryOutcome::HandledAsReference
            } else {
                UnaryOutcome::NotUnary
            }
        }
        TokenKind::Ampersand => classify_ampersand(stream, index, out),
        TokenKind::Minus => classify_minus(stream, index, out),
        TokenKind::Bang => classify_not(stream, index, out),
        _ => UnaryOutcome::NotUnary,
    }
}

fn classify_ampersand(
    stream: &TokenStream,
    index: usize,
    out: &mut Vec<Diagnostic>,
) -> UnaryOutcome {
    let Some(context) = stream.find_previous_local(REFERENCE_CONTEXT, index) else {
        return UnaryOutcome::NotUnary;
    };
    if stream.line(context) != stream.line(index) {
        return UnaryOutcome::NotUnary;
    }

    match stream.kind(context) {
        // right-hand side of `=&`: no spacing constraint enforced
        TokenKind::Equals => {}
        _ => {
            if index == 0 || stream.kind(index - 1) != TokenKind::Whitespace {
                out.push(
                    Diagnostic::error(
                        "operator.ampersand_spacing",
                        "Ampersand requires whitespace before it",
                        index,
                    )
                    .with_fix(FixAction::InsertBefore {
                        index,
                        text: " ".into(),
                    }),
                );
            }
        }
    }

    UnaryOutcome::HandledAsReference
}

fn classify_minus(stream: &TokenStream, index: usize, out: &mut Vec<Diagnostic>) -> UnaryOutcome {
    if index == 0 {
        return UnaryOutcome::NotUnary;
    }

    // two races backwards; the nearer qualifying token wins
    let indicator = stream.find_previous_local(UNARY_INDICATORS, index - 1);
    let value_end = stream.find_previous_local(VALUE_END, index - 1);

    match (indicator, value_end) {
        (Some(ind), Some(val)) if val > ind => return UnaryOutcome::NotUnary,
        (Some(_), _) => {}
        _ => return UnaryOutcome::NotUnary,
    }

    if !stream.kind(index - 1).is_whitespace() {
        out.push(
            Diagnostic::error(
                "operator.minus_spacing",
                "'-' requires whitespace before it",
                index,
            )
            .with_fix(FixAction::InsertBefore {
                index,
                text: " ".into(),
            }),
        );
    }
    if index + 1 < stream.len() && stream.kind(index + 1) == TokenKind::Whitespace {
        out.push(
            Diagnostic::error(
                "operator.minus_spacing",
                "'-' as unary should not have whitespace after it",
                index,
            )
            .with_fix(FixAction::ReplaceTokenText {
                index: index + 1,
                text: String::new(),
            }),
        );
    }

    UnaryOutcome::HandledAsUnary
}

fn classify_not(stream: &TokenStream, index: usize, out: &mut Vec<Diagnostic>) -> UnaryOutcome {
    let before_ok = index > 0
        && (stream.kind(index - 1).is_whitespace() || stream.kind(index - 1) == TokenKind::Bang);
    if !before_ok {
        out.push(
            Diagnostic::error(
                "operator.boolean_not_spacing",
                "Boolean Not should have whitespace before it",
                index,
            )
            .with_fix(FixAction::InsertBefore {
                index,
                text: " ".into(),
            }),
        );
    }
    if index + 1 < stream.len() && stream.kind(index + 1) == TokenKind::Whitespace {
        out.push(
            Diagnostic::error(
                "operator.boolean_not_spacing",
                "Boolean Not should not have whitespace after it",
                index,
            )
            .with_fix(FixAction::ReplaceTokenText {
                index: index + 1,
                text: String::new(),
            }),
        );
    }

    UnaryOutcome::HandledAsUnary
}

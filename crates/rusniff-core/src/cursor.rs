//! Cursor primitives over the token stream
//!
//! Named scan operations replace raw `index + 1` / `index - 1` arithmetic:
//! running off either end of the stream is `None`, never a panic. None of
//! these skip bracketed regions implicitly — callers jump over sub-regions
//! explicitly with [`TokenStream::skip_bracketed`].

use crate::stream::TokenStream;
use crate::token::TokenKind;

impl TokenStream {
    /// First token at or after `from` whose kind is in `kinds` (or, with
    /// `negate`, the first whose kind is not). `until` is exclusive.
    pub fn find_next(
        &self,
        kinds: &[TokenKind],
        from: usize,
        until: Option<usize>,
        negate: bool,
    ) -> Option<usize> {
        let end = until.unwrap_or(self.len()).min(self.len());
        (from..end).find(|&i| kinds.contains(&self.kind(i)) != negate)
    }

    /// Backward counterpart of [`find_next`](Self::find_next). Scans from
    /// `from` down to `until` (exclusive; stream start when `None`).
    pub fn find_previous(
        &self,
        kinds: &[TokenKind],
        from: usize,
        until: Option<usize>,
        negate: bool,
    ) -> Option<usize> {
        if self.is_empty() {
            return None;
        }
        let from = from.min(self.len() - 1);
        let mut i = from;
        loop {
            if let Some(limit) = until {
                if i <= limit {
                    return None;
                }
            }
            if kinds.contains(&self.kind(i)) != negate {
                return Some(i);
            }
            if i == 0 {
                return None;
            }
            i -= 1;
        }
    }

    /// Backward scan bounded by the current statement: gives up at a
    /// semicolon, brace or open tag instead of crossing into earlier
    /// statements.
    pub fn find_previous_local(&self, kinds: &[TokenKind], from: usize) -> Option<usize> {
        if self.is_empty() {
            return None;
        }
        let mut i = from.min(self.len() - 1);
        loop {
            let kind = self.kind(i);
            if kinds.contains(&kind) {
                return Some(i);
            }
            if matches!(
                kind,
                TokenKind::Semicolon
                    | TokenKind::OpenBrace
                    | TokenKind::CloseBrace
                    | TokenKind::OpenTag
            ) {
                return None;
            }
            if i == 0 {
                return None;
            }
            i -= 1;
        }
    }

    /// Index of the matching closer for a bracket opener, O(1).
    pub fn skip_bracketed(&self, open: usize) -> Option<usize> {
        if self.kind(open).is_opener() {
            self.matched_pair(open)
        } else {
            None
        }
    }

    /// First non-trivia token on the line containing `index`.
    pub fn first_on_line(&self, index: usize) -> usize {
        let line = self.line(index);
        let mut first = index;
        let mut i = index;
        while i > 0 {
            i -= 1;
            if self.line(i) != line || self.kind(i) == TokenKind::Newline {
                break;
            }
            if !self.kind(i).is_trivia() {
                first = i;
            }
        }
        first
    }

    /// Space/tab characters strictly between two indices; line breaks do not
    /// count.
    pub fn count_intervening_whitespace(&self, a: usize, b: usize) -> usize {
        if b <= a + 1 {
            return 0;
        }
        (a + 1..b.min(self.len()))
            .filter(|&i| self.kind(i) == TokenKind::Whitespace)
            .map(|i| self.text(i).len())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::lex;

    #[test]
    fn test_find_next_and_negate() {
        let stream = lex("$a = 1;").unwrap();
        let eq = stream
            .find_next(&[TokenKind::Equals], 0, None, false)
            .unwrap();
        assert_eq!(stream.kind(eq), TokenKind::Equals);

        // first non-trivia after the '='
        let value = stream
            .find_next(
                &[TokenKind::Whitespace, TokenKind::Newline],
                eq + 1,
                None,
                true,
            )
            .unwrap();
        assert_eq!(stream.kind(value), TokenKind::IntLiteral);
    }

    #[test]
    fn test_find_next_until_is_exclusive() {
        let stream = lex("[ 1, 2 ]").unwrap();
        let close = stream.len() - 1;
        assert_eq!(
            stream.find_next(&[TokenKind::CloseShortArray], 0, Some(close), false),
            None
        );
    }

    #[test]
    fn test_find_previous_stops_at_start() {
        let stream = lex("1 + 2").unwrap();
        assert_eq!(stream.find_previous(&[TokenKind::Comma], 4, None, false), None);
    }

    #[test]
    fn test_find_previous_local_stops_at_semicolon() {
        let stream = lex("$a = 1; $b - 2;").unwrap();
        let minus = stream
            .find_next(&[TokenKind::Minus], 0, None, false)
            .unwrap();
        // the '=' belongs to the previous statement
        assert_eq!(
            stream.find_previous_local(&[TokenKind::Equals], minus - 1),
            None
        );
    }

    #[test]
    fn test_skip_bracketed() {
        let stream = lex("f( 1, g( 2 ), 3 )").unwrap();
        let outer_open = stream
            .find_next(&[TokenKind::OpenParenthesis], 0, None, false)
            .unwrap();
        let close = stream.skip_bracketed(outer_open).unwrap();
        assert_eq!(stream.kind(close), TokenKind::CloseParenthesis);
        assert_eq!(close, stream.len() - 1);
    }

    #[test]
    fn test_first_on_line() {
        let stream = lex("$a = [\n    1,\n];").unwrap();
        let one = stream
            .find_next(&[TokenKind::IntLiteral], 0, None, false)
            .unwrap();
        assert_eq!(stream.first_on_line(one), one);

        let open = stream
            .find_next(&[TokenKind::OpenShortArray], 0, None, false)
            .unwrap();
        assert_eq!(stream.kind(stream.first_on_line(open)), TokenKind::Variable);
    }

    #[test]
    fn test_count_intervening_whitespace() {
        let stream = lex("$a   // done").unwrap();
        let comment = stream
            .find_next(&[TokenKind::LineComment], 0, None, false)
            .unwrap();
        assert_eq!(stream.count_intervening_whitespace(0, comment), 3);
    }
}

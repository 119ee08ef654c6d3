//! Finalized token stream with bracket links and scope attribution
//!
//! `TokenStream::new` is the trust boundary between the host tokenizer and
//! the sniffs: it verifies the matched-bracket invariant and precomputes the
//! derived metadata everything downstream relies on — opener/closer links,
//! nesting depth, and the map from `{`..`}` pairs to the keyword that
//! introduced them.

use crate::token::{Token, TokenKind};
use thiserror::Error;

/// Violations of the host tokenizer's input contract.
///
/// These are fatal for the whole pass: a stream with broken bracket links
/// cannot be analyzed, so construction fails instead of producing diagnostics.
#[derive(Error, Debug)]
pub enum StreamError {
    #[error("Unmatched {kind:?} opener at token {index}")]
    UnmatchedOpener { index: usize, kind: TokenKind },

    #[error("Unmatched {kind:?} closer at token {index}")]
    UnmatchedCloser { index: usize, kind: TokenKind },

    #[error("Bracket mismatch: {open_kind:?} at token {open_index} closed by {close_kind:?} at token {close_index}")]
    MismatchedPair {
        open_index: usize,
        open_kind: TokenKind,
        close_index: usize,
        close_kind: TokenKind,
    },
}

/// A brace-delimited scope body attributed to its introducer keyword.
#[derive(Debug, Clone)]
pub struct ScopeBlock {
    /// Index of the `{` token.
    pub opener: usize,
    /// Index of the matching `}` token.
    pub closer: usize,
    /// Index of the introducing keyword (`function`, `while`, ...).
    pub introducer: usize,
    pub introducer_kind: TokenKind,
    /// Declared name, for function/class/interface/trait scopes with one.
    pub introducer_name: Option<String>,
    /// Opener and closer on the introducer's line.
    pub is_single_line: bool,
}

#[derive(Debug, Clone, Copy)]
struct ScopeEntry {
    introducer: usize,
    opener: usize,
    closer: usize,
}

/// An ordered, immutable token sequence with O(1) random access and
/// precomputed structural metadata. The single source of truth for one
/// analysis pass; sniffs hold indices into it, never token copies.
#[derive(Debug)]
pub struct TokenStream {
    tokens: Vec<Token>,
    /// Matching partner per index, for bracket-family tokens.
    pairs: Vec<Option<usize>>,
    /// Number of enclosing bracket pairs per index.
    depth: Vec<u32>,
    scopes: Vec<ScopeEntry>,
}

impl TokenStream {
    /// Finalize a host-provided token sequence.
    ///
    /// Fails with [`StreamError`] when the bracket invariant does not hold;
    /// there is no recovery path, per the input contract.
    pub fn new(tokens: Vec<Token>) -> Result<Self, StreamError> {
        let (pairs, depth) = match_brackets(&tokens)?;
        let scopes = resolve_scopes(&tokens, &pairs);
        Ok(Self {
            tokens,
            pairs,
            depth,
            scopes,
        })
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    pub fn kind(&self, index: usize) -> TokenKind {
        self.tokens[index].kind
    }

    pub fn text(&self, index: usize) -> &str {
        &self.tokens[index].text
    }

    pub fn line(&self, index: usize) -> u32 {
        self.tokens[index].line
    }

    pub fn column(&self, index: usize) -> u32 {
        self.tokens[index].column
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// The matching bracket partner, if `index` is a bracket-family token.
    pub fn matched_pair(&self, index: usize) -> Option<usize> {
        self.pairs.get(index).copied().flatten()
    }

    /// Number of bracket pairs enclosing this token.
    pub fn nesting_depth(&self, index: usize) -> u32 {
        self.depth[index]
    }

    /// The scope whose introducer keyword sits at `index`.
    pub fn scope_of(&self, index: usize) -> Option<ScopeBlock> {
        let entry = self.scopes.iter().find(|s| s.introducer == index)?;
        let kind = self.kind(entry.introducer);
        Some(ScopeBlock {
            opener: entry.opener,
            closer: entry.closer,
            introducer: entry.introducer,
            introducer_kind: kind,
            introducer_name: if kind.is_named_scope() {
                self.declaration_name(entry.introducer)
            } else {
                None
            },
            is_single_line: self.line(entry.closer) == self.line(entry.introducer),
        })
    }

    /// Whether any enclosing scope of `index` is introduced by one of `kinds`.
    pub fn has_condition(&self, index: usize, kinds: &[TokenKind]) -> bool {
        self.scopes.iter().any(|s| {
            s.opener < index && index < s.closer && kinds.contains(&self.kind(s.introducer))
        })
    }

    /// Declared identifier of a function/class/interface/trait introducer.
    ///
    /// Skips a by-reference `&` after `function`. Anonymous declarations
    /// yield `None`.
    pub fn declaration_name(&self, introducer: usize) -> Option<String> {
        let mut i = introducer + 1;
        while i < self.len() {
            let kind = self.kind(i);
            if kind.is_trivia() || kind == TokenKind::Ampersand {
                i += 1;
                continue;
            }
            return if kind == TokenKind::Identifier {
                Some(self.text(i).to_string())
            } else {
                None
            };
        }
        None
    }
}

fn match_brackets(tokens: &[Token]) -> Result<(Vec<Option<usize>>, Vec<u32>), StreamError> {
    let mut pairs: Vec<Option<usize>> = vec![None; tokens.len()];
    let mut depth: Vec<u32> = vec![0; tokens.len()];
    let mut stack: Vec<usize> = Vec::new();

    for (i, token) in tokens.iter().enumerate() {
        if token.kind.is_opener() {
            depth[i] = stack.len() as u32;
            stack.push(i);
        } else if token.kind.is_closer() {
            let open = stack.pop().ok_or(StreamError::UnmatchedCloser {
                index: i,
                kind: token.kind,
            })?;
            let expected = tokens[open].kind.complement();
            if expected != Some(token.kind) {
                return Err(StreamError::MismatchedPair {
                    open_index: open,
                    open_kind: tokens[open].kind,
                    close_index: i,
                    close_kind: token.kind,
                });
            }
            pairs[open] = Some(i);
            pairs[i] = Some(open);
            depth[i] = stack.len() as u32;
        } else {
            depth[i] = stack.len() as u32;
        }
    }

    if let Some(open) = stack.pop() {
        return Err(StreamError::UnmatchedOpener {
            index: open,
            kind: tokens[open].kind,
        });
    }

    Ok((pairs, depth))
}

/// Walk backwards from each `{` to the keyword that owns it.
///
/// The walk skips trivia, jumps over parenthesized groups via the matched
/// links, and steps across the tokens that legally sit between a scope
/// keyword and its brace: names, extends/implements lists, closure `use`
/// imports, return types. Braces with no recognizable introducer (bare
/// blocks, match arms) are simply not scopes.
fn resolve_scopes(tokens: &[Token], pairs: &[Option<usize>]) -> Vec<ScopeEntry> {
    let mut scopes = Vec::new();

    for (opener, token) in tokens.iter().enumerate() {
        if token.kind != TokenKind::OpenBrace {
            continue;
        }
        let Some(closer) = pairs[opener] else { continue };
        if let Some(introducer) = find_introducer(tokens, pairs, opener) {
            scopes.push(ScopeEntry {
                introducer,
                opener,
                closer,
            });
        }
    }

    scopes
}

fn find_introducer(tokens: &[Token], pairs: &[Option<usize>], opener: usize) -> Option<usize> {
    let mut i = opener;
    while i > 0 {
        i -= 1;
        let kind = tokens[i].kind;
        if kind.is_trivia() {
            continue;
        }
        if kind == TokenKind::CloseParenthesis {
            i = pairs[i]?;
            continue;
        }
        if kind.is_scope_introducer() {
            return Some(i);
        }
        match kind {
            TokenKind::Identifier
            | TokenKind::Variable
            | TokenKind::Colon
            | TokenKind::Question
            | TokenKind::NsSeparator
            | TokenKind::Comma
            | TokenKind::Extends
            | TokenKind::Implements
            | TokenKind::Use
            | TokenKind::Ampersand
            | TokenKind::Pipe
            | TokenKind::Array
            | TokenKind::Static => continue,
            _ => return None,
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::lex;

    #[test]
    fn test_bracket_links_symmetric() {
        let stream = lex("f( [ 1, 2 ] );").unwrap();
        for i in 0..stream.len() {
            if let Some(j) = stream.matched_pair(i) {
                assert_eq!(stream.matched_pair(j), Some(i));
            }
        }
    }

    #[test]
    fn test_nesting_depth() {
        let stream = lex("f(g(1));").unwrap();
        let inner = (0..stream.len())
            .find(|&i| stream.kind(i) == TokenKind::IntLiteral)
            .unwrap();
        assert_eq!(stream.nesting_depth(inner), 2);
    }

    #[test]
    fn test_unbalanced_stream_is_fatal() {
        let result = lex("f( [ 1 );");
        assert!(matches!(result, Err(StreamError::MismatchedPair { .. })));

        let result = lex("( ( )");
        assert!(matches!(result, Err(StreamError::UnmatchedOpener { .. })));
    }

    #[test]
    fn test_function_scope_resolution() {
        let stream = lex("function foo( $a ) {\nreturn $a;\n}\n").unwrap();
        let introducer = (0..stream.len())
            .find(|&i| stream.kind(i) == TokenKind::Function)
            .unwrap();
        let scope = stream.scope_of(introducer).unwrap();
        assert_eq!(stream.kind(scope.opener), TokenKind::OpenBrace);
        assert_eq!(stream.kind(scope.closer), TokenKind::CloseBrace);
        assert_eq!(scope.introducer_name.as_deref(), Some("foo"));
        assert!(!scope.is_single_line);
    }

    #[test]
    fn test_class_with_extends_resolves() {
        let stream = lex("class Foo extends Bar implements Baz, Qux {\n}\n").unwrap();
        let introducer = (0..stream.len())
            .find(|&i| stream.kind(i) == TokenKind::Class)
            .unwrap();
        let scope = stream.scope_of(introducer).unwrap();
        assert_eq!(scope.introducer_name.as_deref(), Some("Foo"));
    }

    #[test]
    fn test_closure_with_use_resolves_to_function() {
        let stream = lex("$f = function ( $a ) use ( $b ) {\nreturn $a;\n};\n").unwrap();
        let introducer = (0..stream.len())
            .find(|&i| stream.kind(i) == TokenKind::Function)
            .unwrap();
        let scope = stream.scope_of(introducer).unwrap();
        assert_eq!(scope.introducer_name, None);
    }

    #[test]
    fn test_bare_block_is_not_a_scope() {
        let stream = lex("$a = 1;\n{\n$b = 2;\n}\n").unwrap();
        let brace = (0..stream.len())
            .find(|&i| stream.kind(i) == TokenKind::OpenBrace)
            .unwrap();
        assert!(!(0..stream.len()).any(|i| {
            stream
                .scope_of(i)
                .map(|s| s.opener == brace)
                .unwrap_or(false)
        }));
    }

    #[test]
    fn test_has_condition_inside_class() {
        let stream = lex("class Foo {\nuse SomeTrait;\n}\n").unwrap();
        let use_tok = (0..stream.len())
            .find(|&i| stream.kind(i) == TokenKind::Use)
            .unwrap();
        assert!(stream.has_condition(use_tok, &[TokenKind::Class, TokenKind::Trait]));
        assert!(!stream.has_condition(use_tok, &[TokenKind::Function]));
    }
}

//! Fixture scanner for tests
//!
//! Turns PHP-ish snippets into finalized [`TokenStream`]s so tests don't have
//! to assemble token vectors by hand. This is fixture plumbing, not a PHP
//! tokenizer: it understands exactly the vocabulary in [`TokenKind`], resolves
//! keywords from identifiers, and disambiguates `[` between subscript and
//! short-array form from the preceding significant token. Production input
//! always comes from the host tokenizer.

use crate::stream::{StreamError, TokenStream};
use crate::token::{Token, TokenKind};

/// Scan a snippet and finalize it into a stream.
pub fn lex(source: &str) -> Result<TokenStream, StreamError> {
    TokenStream::new(scan(source))
}

/// Operator table, longest lexeme first.
const OPERATORS: &[(&str, TokenKind)] = &[
    ("?->", TokenKind::NullsafeArrow),
    ("===", TokenKind::EqualsEqualsEquals),
    ("!==", TokenKind::BangEqualsEquals),
    ("<=>", TokenKind::Spaceship),
    ("**=", TokenKind::StarStarEquals),
    ("<<=", TokenKind::ShiftLeftEquals),
    (">>=", TokenKind::ShiftRightEquals),
    ("??=", TokenKind::CoalesceEquals),
    ("...", TokenKind::Ellipsis),
    ("?>", TokenKind::CloseTag),
    ("==", TokenKind::EqualsEquals),
    ("!=", TokenKind::BangEquals),
    ("<=", TokenKind::LessThanEquals),
    (">=", TokenKind::GreaterThanEquals),
    ("=>", TokenKind::DoubleArrow),
    ("->", TokenKind::Arrow),
    ("::", TokenKind::DoubleColon),
    ("++", TokenKind::Increment),
    ("--", TokenKind::Decrement),
    ("+=", TokenKind::PlusEquals),
    ("-=", TokenKind::MinusEquals),
    ("*=", TokenKind::StarEquals),
    ("/=", TokenKind::SlashEquals),
    ("%=", TokenKind::PercentEquals),
    (".=", TokenKind::DotEquals),
    ("&=", TokenKind::AmpersandEquals),
    ("|=", TokenKind::PipeEquals),
    ("^=", TokenKind::CaretEquals),
    ("**", TokenKind::StarStar),
    ("&&", TokenKind::AmpersandAmpersand),
    ("||", TokenKind::PipePipe),
    ("??", TokenKind::QuestionQuestion),
    ("<<", TokenKind::ShiftLeft),
    (">>", TokenKind::ShiftRight),
    ("+", TokenKind::Plus),
    ("-", TokenKind::Minus),
    ("*", TokenKind::Star),
    ("/", TokenKind::Slash),
    ("%", TokenKind::Percent),
    (".", TokenKind::Dot),
    ("=", TokenKind::Equals),
    ("<", TokenKind::LessThan),
    (">", TokenKind::GreaterThan),
    ("!", TokenKind::Bang),
    ("&", TokenKind::Ampersand),
    ("|", TokenKind::Pipe),
    ("^", TokenKind::Caret),
    ("~", TokenKind::Tilde),
    ("?", TokenKind::Question),
    (":", TokenKind::Colon),
    ("@", TokenKind::At),
    ("\\", TokenKind::NsSeparator),
    ("(", TokenKind::OpenParenthesis),
    (")", TokenKind::CloseParenthesis),
    ("{", TokenKind::OpenBrace),
    ("}", TokenKind::CloseBrace),
    (",", TokenKind::Comma),
    (";", TokenKind::Semicolon),
    ("$", TokenKind::Dollar),
];

fn keyword(ident: &str) -> Option<TokenKind> {
    Some(match ident.to_ascii_lowercase().as_str() {
        "abstract" => TokenKind::Abstract,
        "array" => TokenKind::Array,
        "as" => TokenKind::As,
        "break" => TokenKind::Break,
        "case" => TokenKind::Case,
        "catch" => TokenKind::Catch,
        "class" => TokenKind::Class,
        "const" => TokenKind::Const,
        "continue" => TokenKind::Continue,
        "default" => TokenKind::Default,
        "do" => TokenKind::Do,
        "echo" => TokenKind::Echo,
        "else" => TokenKind::Else,
        "elseif" => TokenKind::ElseIf,
        "extends" => TokenKind::Extends,
        "final" => TokenKind::Final,
        "finally" => TokenKind::Finally,
        "for" => TokenKind::For,
        "foreach" => TokenKind::Foreach,
        "function" => TokenKind::Function,
        "global" => TokenKind::Global,
        "if" => TokenKind::If,
        "implements" => TokenKind::Implements,
        "instanceof" => TokenKind::Instanceof,
        "interface" => TokenKind::Interface,
        "list" => TokenKind::List,
        "namespace" => TokenKind::Namespace,
        "new" => TokenKind::New,
        "print" => TokenKind::Print,
        "private" => TokenKind::Private,
        "protected" => TokenKind::Protected,
        "public" => TokenKind::Public,
        "return" => TokenKind::Return,
        "static" => TokenKind::Static,
        "switch" => TokenKind::Switch,
        "throw" => TokenKind::Throw,
        "trait" => TokenKind::Trait,
        "try" => TokenKind::Try,
        "use" => TokenKind::Use,
        "while" => TokenKind::While,
        "true" => TokenKind::True,
        "false" => TokenKind::False,
        "null" => TokenKind::Null,
        "and" => TokenKind::And,
        "or" => TokenKind::Or,
        "xor" => TokenKind::Xor,
        _ => return None,
    })
}

/// Kinds after which a `[` is a subscript rather than a short-array opener.
fn ends_value(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Variable
            | TokenKind::Identifier
            | TokenKind::CloseParenthesis
            | TokenKind::CloseSquareBracket
            | TokenKind::CloseShortArray
            | TokenKind::SingleQuotedString
            | TokenKind::DoubleQuotedString
    )
}

struct Scanner<'a> {
    chars: Vec<char>,
    source: &'a str,
    pos: usize,
    line: u32,
    column: u32,
    tokens: Vec<Token>,
    /// Pending square-bracket kinds, so `]` closes what its `[` opened.
    squares: Vec<TokenKind>,
}

fn scan(source: &str) -> Vec<Token> {
    let mut scanner = Scanner {
        chars: source.chars().collect(),
        source,
        pos: 0,
        line: 1,
        column: 1,
        tokens: Vec::new(),
        squares: Vec::new(),
    };
    scanner.run();
    scanner.tokens
}

impl Scanner<'_> {
    fn run(&mut self) {
        while self.pos < self.chars.len() {
            let c = self.chars[self.pos];
            match c {
                '\n' => {
                    self.emit(TokenKind::Newline, 1);
                }
                ' ' | '\t' | '\r' => {
                    let len = self.run_len(|c| matches!(c, ' ' | '\t' | '\r'));
                    self.emit(TokenKind::Whitespace, len);
                }
                '/' if self.peek(1) == Some('/') => {
                    let len = self.run_len(|c| c != '\n');
                    self.emit(TokenKind::LineComment, len);
                }
                '#' => {
                    let len = self.run_len(|c| c != '\n');
                    self.emit(TokenKind::LineComment, len);
                }
                '/' if self.peek(1) == Some('*') => {
                    let doc = self.peek(2) == Some('*') && self.peek(3) != Some('/');
                    let len = self.block_comment_len();
                    self.emit(
                        if doc {
                            TokenKind::DocComment
                        } else {
                            TokenKind::BlockComment
                        },
                        len,
                    );
                }
                '<' if self.lookahead("<?php") => {
                    self.emit(TokenKind::OpenTag, 5);
                }
                '\'' | '"' => {
                    let len = self.string_len(c);
                    self.emit(
                        if c == '\'' {
                            TokenKind::SingleQuotedString
                        } else {
                            TokenKind::DoubleQuotedString
                        },
                        len,
                    );
                }
                '$' if self.peek(1).map(is_ident_start).unwrap_or(false) => {
                    let mut len = 1;
                    while self.peek(len).map(is_ident_char).unwrap_or(false) {
                        len += 1;
                    }
                    self.emit(TokenKind::Variable, len);
                }
                '0'..='9' => {
                    let mut len = self.run_len(|c| c.is_ascii_digit() || c == '_');
                    let mut kind = TokenKind::IntLiteral;
                    if self.peek(len) == Some('.')
                        && self.peek(len + 1).map(|c| c.is_ascii_digit()).unwrap_or(false)
                    {
                        len += 1;
                        while self.peek(len).map(|c| c.is_ascii_digit()).unwrap_or(false) {
                            len += 1;
                        }
                        kind = TokenKind::FloatLiteral;
                    }
                    self.emit(kind, len);
                }
                '[' => {
                    let kind = match self.last_significant() {
                        Some(prev) if ends_value(prev) => TokenKind::OpenSquareBracket,
                        _ => TokenKind::OpenShortArray,
                    };
                    self.squares.push(kind);
                    self.emit(kind, 1);
                }
                ']' => {
                    let kind = match self.squares.pop() {
                        Some(TokenKind::OpenSquareBracket) => TokenKind::CloseSquareBracket,
                        _ => TokenKind::CloseShortArray,
                    };
                    self.emit(kind, 1);
                }
                c if is_ident_start(c) => {
                    let len = self.run_len(is_ident_char);
                    let text: String = self.chars[self.pos..self.pos + len].iter().collect();
                    let kind = keyword(&text).unwrap_or(TokenKind::Identifier);
                    self.emit(kind, len);
                }
                _ => {
                    let rest: String = self.chars[self.pos..].iter().collect();
                    let matched = OPERATORS
                        .iter()
                        .find(|(lexeme, _)| rest.starts_with(lexeme));
                    match matched {
                        Some((lexeme, kind)) => self.emit(*kind, lexeme.chars().count()),
                        None => panic!(
                            "testkit: unexpected character {c:?} in fixture {:?}",
                            self.source
                        ),
                    }
                }
            }
        }
    }

    fn peek(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn lookahead(&self, expected: &str) -> bool {
        expected
            .chars()
            .enumerate()
            .all(|(i, c)| self.peek(i) == Some(c))
    }

    fn run_len(&self, accept: impl Fn(char) -> bool) -> usize {
        let mut len = 0;
        while self.peek(len).map(&accept).unwrap_or(false) {
            len += 1;
        }
        len
    }

    fn block_comment_len(&self) -> usize {
        let mut len = 2;
        loop {
            match (self.peek(len), self.peek(len + 1)) {
                (Some('*'), Some('/')) => return len + 2,
                (Some(_), _) => len += 1,
                (None, _) => return len,
            }
        }
    }

    fn string_len(&self, quote: char) -> usize {
        let mut len = 1;
        loop {
            match self.peek(len) {
                Some('\\') => len += 2,
                Some(c) if c == quote => return len + 1,
                Some(_) => len += 1,
                None => return len,
            }
        }
    }

    fn last_significant(&self) -> Option<TokenKind> {
        self.tokens
            .iter()
            .rev()
            .find(|t| !t.kind.is_trivia())
            .map(|t| t.kind)
    }

    fn emit(&mut self, kind: TokenKind, len: usize) {
        let text: String = self.chars[self.pos..self.pos + len].iter().collect();
        self.tokens
            .push(Token::new(kind, text.clone(), self.line, self.column));
        for c in text.chars() {
            if c == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
        self.pos += len;
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

//! rusniff-core: Token stream model and diagnostics for rusniff
//!
//! This crate provides:
//! - `Token` / `TokenKind`: the closed token vocabulary consumed from the host tokenizer
//! - `TokenStream`: finalized stream with bracket links, nesting depth and scope attribution
//! - Cursor primitives: `find_next`, `find_previous`, `skip_bracketed`, `first_on_line`
//! - `Diagnostic` / `FixAction`: structured sniff output
//! - `apply_fix_actions()`: render the source text with all fixes applied
//!
//! The `testkit` feature adds a fixture scanner for building streams from
//! PHP-ish snippets in tests.

mod cursor;
mod diagnostic;
mod fix;
mod stream;
mod token;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;

pub use diagnostic::{Diagnostic, DiagnosticCollection, FixAction, Severity};
pub use fix::{apply_fix_actions, FixError};
pub use stream::{ScopeBlock, StreamError, TokenStream};
pub use token::{Token, TokenKind};

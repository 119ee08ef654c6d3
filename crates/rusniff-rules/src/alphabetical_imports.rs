//! alphabetical_imports: `use` statements in alphabetical order
//!
//! Namespace imports and trait uses are ordered independently; the last-seen
//! name per context lives in the per-file [`FileState`], so parallel file
//! processing never shares an accumulator. Closure `use (...)` clauses are
//! not imports and are skipped.

use crate::config::SniffConfig;
use crate::registry::{FileState, ImportContext, Sniff};
use rusniff_core::{Diagnostic, TokenKind, TokenStream};

const TRIGGER_KINDS: &[TokenKind] = &[TokenKind::Use];

const TRIVIA: &[TokenKind] = &[
    TokenKind::Whitespace,
    TokenKind::Newline,
    TokenKind::LineComment,
    TokenKind::BlockComment,
    TokenKind::DocComment,
];

pub struct AlphabeticalImportsSniff;

impl Sniff for AlphabeticalImportsSniff {
    fn name(&self) -> &'static str {
        "alphabetical_imports"
    }

    fn description(&self) -> &'static str {
        "Use statements sorted alphabetically per import context"
    }

    fn kinds(&self) -> &'static [TokenKind] {
        TRIGGER_KINDS
    }

    fn check(
        &self,
        stream: &TokenStream,
        index: usize,
        _config: &SniffConfig,
        state: &mut FileState,
    ) -> Vec<Diagnostic> {
        let mut out = Vec::new();

        let Some(name_start) = stream.find_next(TRIVIA, index + 1, None, true) else {
            return out;
        };
        // closure use clause, not an import
        if stream.kind(name_start) == TokenKind::OpenParenthesis {
            return out;
        }

        let context = if stream.has_condition(index, &[TokenKind::Class, TokenKind::Trait]) {
            ImportContext::Trait
        } else {
            ImportContext::Namespace
        };

        let name = qualified_name(stream, name_start);
        if name.is_empty() {
            return out;
        }

        let last = state.import_order.entry(context).or_default();
        if last.to_lowercase() > name.to_lowercase() {
            out.push(Diagnostic::error(
                "import.not_alphabetical",
                format!("{} is not in alphabetical order", name),
                name_start,
            ));
        } else {
            *last = name;
        }

        out
    }
}

/// Collect the imported name starting at `name_start`, namespace separators
/// included.
fn qualified_name(stream: &TokenStream, name_start: usize) -> String {
    let mut name = String::from(stream.text(name_start));
    let mut i = name_start + 1;
    while i < stream.len()
        && matches!(
            stream.kind(i),
            TokenKind::NsSeparator | TokenKind::Identifier | TokenKind::Whitespace
        )
    {
        name.push_str(stream.text(i));
        i += 1;
    }
    name.trim().to_string()
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
                out.extend(AlphabeticalImportsSniff.check(&stream, i, &config, &mut state));
            }
        }
        out
    }

    #[test]
    fn test_sorted_imports_pass() {
        let source = "use App\\Alpha;\nuse App\\Beta;\nuse Zed;\n";
        assert!(check(source).is_empty());
    }

    #[test]
    fn test_unsorted_import_flagged() {
        let source = "use App\\Beta;\nuse App\\Alpha;\n";
        let diags = check(source);
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].code, "import.not_alphabetical");
        assert!(diags[0].message.contains("App\\Alpha"));
    }

    #[test]
    fn test_comparison_is_case_insensitive() {
        let source = "use alpha;\nuse Beta;\n";
        assert!(check(source).is_empty());
    }

    #[test]
    fn test_trait_uses_ordered_independently() {
        let source = "use Zed;\nclass Foo {\nuse Alpha;\nuse Beta;\n}\n";
        assert!(check(source).is_empty());

        let source = "use Alpha;\nclass Foo {\nuse Zed;\nuse Beta;\n}\n";
        let diags = check(source);
        assert_eq!(diags.len(), 1);
        assert!(diags[0].message.contains("Beta"));
    }

    #[test]
    fn test_closure_use_skipped() {
        let source = "use Beta;\n$f = function () use ( $a ) {\nreturn $a;\n};\nuse Alpha;\n";
        let diags = check(source);
        // only the second import is out of order; the closure use is ignored
        assert_eq!(diags.len(), 1);
        assert!(diags[0].message.contains("Alpha"));
    }

    #[test]
    fn test_state_is_per_file() {
        let stream = lex("use Beta;\n").unwrap();
        let config = SniffConfig::default();
        let use_tok = 0;

        // two fresh states simulate two files; neither sees the other's names
        let mut first = FileState::default();
        assert!(AlphabeticalImportsSniff
            .check(&stream, use_tok, &config, &mut first)
            .is_empty());

        let mut second = FileState::default();
        assert!(AlphabeticalImportsSniff
            .check(&stream, use_tok, &config, &mut second)
            .is_empty());
    }
}

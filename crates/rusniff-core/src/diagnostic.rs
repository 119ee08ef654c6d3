//! Diagnostic and fix-action types
//!
//! Sniffs never mutate the token stream; they describe violations as
//! `Diagnostic` values, optionally carrying one of the two fix primitives
//! the external fixer understands.

/// Severity level for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Error - must be fixed
    Error,
    /// Warning - should be reviewed
    Warning,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// The two textual patch primitives delegated to the fixer collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FixAction {
    /// Replace the text of the token at `index` (empty text deletes it).
    ReplaceTokenText { index: usize, text: String },
    /// Insert text immediately before the token at `index`.
    InsertBefore { index: usize, text: String },
}

impl FixAction {
    pub fn index(&self) -> usize {
        match self {
            FixAction::ReplaceTokenText { index, .. } => *index,
            FixAction::InsertBefore { index, .. } => *index,
        }
    }
}

/// A single style violation found by a sniff
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// The sniff check that fired (e.g. "array.space_before_comma")
    pub code: &'static str,
    /// Severity level
    pub severity: Severity,
    /// Human-readable message
    pub message: String,
    /// Token the violation is anchored to
    pub token_index: usize,
    /// Mechanical fix, when one is unambiguous
    pub fix: Option<FixAction>,
}

impl Diagnostic {
    /// Create a new error diagnostic
    pub fn error(code: &'static str, message: impl Into<String>, token_index: usize) -> Self {
        Self {
            code,
            severity: Severity::Error,
            message: message.into(),
            token_index,
            fix: None,
        }
    }

    /// Create a new warning diagnostic
    pub fn warning(code: &'static str, message: impl Into<String>, token_index: usize) -> Self {
        Self {
            code,
            severity: Severity::Warning,
            message: message.into(),
            token_index,
            fix: None,
        }
    }

    /// Attach a fix action
    pub fn with_fix(mut self, fix: FixAction) -> Self {
        self.fix = Some(fix);
        self
    }

    pub fn is_fixable(&self) -> bool {
        self.fix.is_some()
    }
}

/// Per-file collection of diagnostics, ordered by token position
#[derive(Debug, Default)]
pub struct DiagnosticCollection {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn extend(&mut self, diagnostics: impl IntoIterator<Item = Diagnostic>) {
        self.diagnostics.extend(diagnostics);
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .count()
    }

    pub fn warning_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
            .count()
    }

    /// All fix actions carried by fixable diagnostics, in token order.
    pub fn fix_actions(&self) -> Vec<FixAction> {
        let mut actions: Vec<FixAction> = self
            .diagnostics
            .iter()
            .filter_map(|d| d.fix.clone())
            .collect();
        actions.sort_by_key(|a| a.index());
        actions
    }

    /// Sort diagnostics by anchor token index.
    pub fn sort(&mut self) {
        self.diagnostics.sort_by_key(|d| d.token_index);
    }
}

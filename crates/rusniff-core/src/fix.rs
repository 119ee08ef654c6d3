//! Applying fix actions to a token stream
//!
//! Detection and mutation are decoupled: sniffs emit [`FixAction`] values and
//! this module renders the patched source text. The caller re-tokenizes the
//! result and re-runs analysis to verify convergence.

use crate::diagnostic::FixAction;
use crate::stream::TokenStream;
use thiserror::Error;

/// Errors that can occur during fix application
#[derive(Error, Debug)]
pub enum FixError {
    #[error("Conflicting fix actions target token {0}")]
    ConflictingActions(usize),

    #[error("Fix action targets token {index} but the stream has {len} tokens")]
    IndexOutOfBounds { index: usize, len: usize },
}

/// Apply fix actions to a token stream and render the resulting source.
///
/// Validates every action first: indices must be in bounds, and no two
/// actions may target the same token (one sniff pass never needs to patch a
/// token twice; a collision means two fixes disagree and neither can be
/// trusted).
pub fn apply_fix_actions(stream: &TokenStream, actions: &[FixAction]) -> Result<String, FixError> {
    let len = stream.len();
    let mut replacements: Vec<Option<&str>> = vec![None; len];
    let mut insertions: Vec<Option<&str>> = vec![None; len];

    for action in actions {
        let index = action.index();
        if index >= len {
            return Err(FixError::IndexOutOfBounds { index, len });
        }
        let slot = match action {
            FixAction::ReplaceTokenText { .. } => &mut replacements[index],
            FixAction::InsertBefore { .. } => &mut insertions[index],
        };
        if slot.is_some() {
            return Err(FixError::ConflictingActions(index));
        }
        *slot = Some(match action {
            FixAction::ReplaceTokenText { text, .. } => text.as_str(),
            FixAction::InsertBefore { text, .. } => text.as_str(),
        });
    }

    let mut output = String::new();
    for i in 0..len {
        if let Some(text) = insertions[i] {
            output.push_str(text);
        }
        match replacements[i] {
            Some(text) => output.push_str(text),
            None => output.push_str(stream.text(i)),
        }
    }

    Ok(output)
}

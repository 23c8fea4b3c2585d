use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::taxonomy::{IdHasher, NameField, TermId, TermRecord};

/// What a multi-value term field hands back on change: tokens that are
/// already bound to a term, mixed with free text the user typed.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TermToken {
    Known { id: TermId, value: String },
    Text(String),
}

impl TermToken {
    pub fn value(&self) -> &str {
        match self {
            TermToken::Known { value, .. } => value,
            TermToken::Text(text) => text,
        }
    }
}

impl From<&str> for TermToken {
    fn from(text: &str) -> Self {
        TermToken::Text(text.to_string())
    }
}

/// Maps a token to a term id.
///
/// Bound tokens keep their id. Free text first looks for a case sensitive
/// match on `field`, then falls back to a case insensitive one. When several
/// terms share the same lower-cased label the first one in catalog order
/// wins.
pub fn resolve(terms: &[TermRecord], token: &TermToken, field: NameField) -> Option<TermId> {
    let text = match token {
        TermToken::Known { id, .. } => return Some(*id),
        TermToken::Text(text) => text,
    };
    if let Some(term) = terms.iter().find(|t| field.of(t) == text) {
        return Some(term.id);
    }
    let lowered = text.to_lowercase();
    terms
        .iter()
        .find(|t| field.of(t).to_lowercase() == lowered)
        .map(|t| t.id)
}

/// Resolves every token, keeping first-seen order and dropping both
/// duplicates and tokens that match nothing.
pub fn resolve_all(terms: &[TermRecord], tokens: &[TermToken], field: NameField) -> Vec<TermId> {
    let mut seen = HashSet::<TermId, IdHasher>::default();
    let mut resolved = Vec::new();
    for token in tokens {
        match resolve(terms, token, field) {
            Some(id) => {
                if seen.insert(id) {
                    resolved.push(id);
                }
            }
            None => debug!(token=%token.value(), "unresolved term token dropped"),
        }
    }
    resolved
}

/// The inverse direction: configured ids shown back as bound tokens.
/// Ids that no longer exist in `terms` are left out.
pub fn known_tokens(terms: &[TermRecord], ids: &[TermId], field: NameField) -> Vec<TermToken> {
    let tokens: Vec<TermToken> = ids
        .iter()
        .filter_map(|id| terms.iter().find(|t| t.id == *id))
        .map(|t| TermToken::Known { id: t.id, value: field.of(t).to_string() })
        .collect();
    if tokens.len() < ids.len() {
        debug!(configured = ids.len(), kept = tokens.len(), "stale term ids dropped");
    }
    tokens
}

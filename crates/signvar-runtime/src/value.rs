#![forbid(unsafe_code)]

//! Formatted values and the declared-reference diff.
//!
//! A [`FormattedValue`] is a format string resolved against one owning entry:
//! every `%name%` reference becomes the [`EntryId`] that entry should read.
//! [`detect_changes`] compares the declared sets of two values; applying its
//! result is the only way graph edges are added or removed.

use signvar_text::{FormatToken, placeholder, tokenize};
use smallvec::SmallVec;

use crate::entry::EntryId;

/// One resolved piece of a format string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Raw text, escape codes included.
    Literal(String),
    /// The displayed text of another entry.
    Variable(EntryId),
}

/// A format string plus its resolved tokens.
///
/// # Invariants
///
/// 1. `declared` is exactly the deduplicated set of [`Token::Variable`]
///    targets, in first-appearance order.
/// 2. `format` is never rewritten; only `tokens` change when a referenced
///    variable disappears, and the value is then marked detached.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormattedValue {
    format: String,
    tokens: SmallVec<[Token; 4]>,
    declared: SmallVec<[EntryId; 4]>,
    detached: bool,
}

impl FormattedValue {
    /// Parse `format`, resolving each referenced name with `resolve`.
    ///
    /// Names that do not resolve stay as their literal `%name%` placeholder.
    pub fn build<F>(format: &str, mut resolve: F) -> Self
    where
        F: FnMut(&str) -> Option<EntryId>,
    {
        let mut value = Self {
            format: format.to_owned(),
            ..Self::default()
        };
        for token in tokenize(format) {
            match token {
                FormatToken::Literal(text) => value.push_literal(&text),
                FormatToken::Variable(name) => match resolve(&name) {
                    Some(id) => {
                        value.tokens.push(Token::Variable(id));
                        if !value.declared.contains(&id) {
                            value.declared.push(id);
                        }
                    }
                    None => value.push_literal(&placeholder(&name)),
                },
            }
        }
        value
    }

    /// The same format resolved for another owner.
    ///
    /// Values without references are plain text and are cloned as-is.
    pub fn reresolve<F>(&self, resolve: F) -> Self
    where
        F: FnMut(&str) -> Option<EntryId>,
    {
        if self.declared.is_empty() {
            return self.clone();
        }
        Self::build(&self.format, resolve)
    }

    #[inline]
    #[must_use]
    pub fn format(&self) -> &str {
        &self.format
    }

    #[inline]
    #[must_use]
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    #[inline]
    #[must_use]
    pub fn declared(&self) -> &[EntryId] {
        &self.declared
    }

    /// Whether a referenced variable was removed since this value was built.
    #[inline]
    #[must_use]
    pub fn is_detached(&self) -> bool {
        self.detached
    }

    /// Replace every reference to `target` with `literal`.
    pub fn detach(&mut self, target: EntryId, literal: &str) {
        if !self.declared.contains(&target) {
            return;
        }
        self.detached = true;
        let tokens = std::mem::take(&mut self.tokens);
        for token in tokens {
            match token {
                Token::Variable(id) if id == target => self.push_literal(literal),
                Token::Literal(text) => self.push_literal(&text),
                other => self.tokens.push(other),
            }
        }
        self.declared.retain(|id| *id != target);
    }

    fn push_literal(&mut self, text: &str) {
        if let Some(Token::Literal(last)) = self.tokens.last_mut() {
            last.push_str(text);
        } else {
            self.tokens.push(Token::Literal(text.to_owned()));
        }
    }
}

/// Entries gained and lost between two declared sets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormatChanges {
    pub declared: SmallVec<[EntryId; 4]>,
    pub undeclared: SmallVec<[EntryId; 4]>,
}

impl FormatChanges {
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.declared.is_empty() && self.undeclared.is_empty()
    }
}

/// Diff two deduplicated declared sets.
///
/// Order does not matter; a shared prefix is skipped without lookups.
#[must_use]
pub fn detect_changes(old: &[EntryId], new: &[EntryId]) -> FormatChanges {
    let common = old.iter().zip(new).take_while(|(a, b)| a == b).count();
    let (old, new) = (&old[common..], &new[common..]);
    FormatChanges {
        declared: new.iter().filter(|id| !old.contains(id)).copied().collect(),
        undeclared: old.iter().filter(|id| !new.contains(id)).copied().collect(),
    }
}

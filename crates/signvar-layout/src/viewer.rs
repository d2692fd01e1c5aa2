#![forbid(unsafe_code)]

//! Viewer selection for line updates.

use std::collections::BTreeSet;

/// Which viewers receive a line update. Names arrive already normalised.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ViewerFilter {
    #[default]
    All,
    Only(BTreeSet<String>),
    Except(BTreeSet<String>),
}

impl ViewerFilter {
    /// Filter selecting exactly one viewer.
    #[must_use]
    pub fn only(viewer: &str) -> Self {
        Self::Only(BTreeSet::from([viewer.to_owned()]))
    }

    /// Filter selecting everyone but `viewers`. An empty set selects all.
    #[must_use]
    pub fn except<I, S>(viewers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let set: BTreeSet<String> = viewers.into_iter().map(Into::into).collect();
        if set.is_empty() {
            Self::All
        } else {
            Self::Except(set)
        }
    }

    #[must_use]
    pub fn matches(&self, viewer: &str) -> bool {
        match self {
            Self::All => true,
            Self::Only(set) => set.contains(viewer),
            Self::Except(set) => !set.contains(viewer),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_matches_everyone() {
        assert!(ViewerFilter::All.matches("alice"));
    }

    #[test]
    fn only_and_except_are_complements() {
        let only = ViewerFilter::only("alice");
        let except = ViewerFilter::except(["alice"]);
        for name in ["alice", "bob"] {
            assert_ne!(only.matches(name), except.matches(name));
        }
    }

    #[test]
    fn empty_except_is_all() {
        assert_eq!(ViewerFilter::except(Vec::<String>::new()), ViewerFilter::All);
    }
}

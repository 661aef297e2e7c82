//! Row-level differences between two membership sets.
//!
//! Transitions touch at most a couple of members, so repositories write only
//! the rows that changed instead of rewriting a whole set.

use crate::domain::{MemberSet, UserId};

#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct MembershipDiff {
    /// Members present after but not before, in their new order.
    pub added: Vec<UserId>,
    /// Members present before but not after.
    pub removed: Vec<UserId>,
}

impl MembershipDiff {
    pub fn between(before: &MemberSet, after: &MemberSet) -> Self {
        Self {
            added: after.iter().filter(|id| !before.contains(id)).copied().collect(),
            removed: before.iter().filter(|id| !after.contains(id)).copied().collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

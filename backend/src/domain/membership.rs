//! Insertion-ordered membership sets.
//!
//! Every engagement counter in the system is the cardinality of one of these
//! sets, so a count can never drift from the members it describes.

use serde::{Deserialize, Serialize};

use super::UserId;

/// Ordered set of user identifiers.
///
/// Membership is unique; iteration yields members in the order they were
/// first inserted. Serialises as a plain JSON array.
///
/// # Examples
/// ```
/// use vidshare::domain::{MemberSet, UserId};
///
/// let mut set = MemberSet::default();
/// let id = UserId::random();
/// assert!(set.insert(id));
/// assert!(!set.insert(id));
/// assert_eq!(set.len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<UserId>", into = "Vec<UserId>")]
pub struct MemberSet {
    members: Vec<UserId>,
}

impl MemberSet {
    /// Add `id`, returning `true` when it was not already present.
    pub fn insert(&mut self, id: UserId) -> bool {
        if self.contains(&id) {
            return false;
        }
        self.members.push(id);
        true
    }

    /// Remove `id`, returning `true` when it was present.
    pub fn remove(&mut self, id: &UserId) -> bool {
        let before = self.members.len();
        self.members.retain(|member| member != id);
        before != self.members.len()
    }

    pub fn contains(&self, id: &UserId) -> bool {
        self.members.contains(id)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &UserId> {
        self.members.iter()
    }

    /// Cardinality as a wire-friendly counter.
    pub fn count(&self) -> u64 {
        u64::try_from(self.members.len()).unwrap_or(u64::MAX)
    }

    /// Members as an ordered slice.
    pub fn as_slice(&self) -> &[UserId] {
        &self.members
    }
}

impl From<Vec<UserId>> for MemberSet {
    fn from(value: Vec<UserId>) -> Self {
        value.into_iter().collect()
    }
}

impl From<MemberSet> for Vec<UserId> {
    fn from(value: MemberSet) -> Self {
        value.members
    }
}

impl FromIterator<UserId> for MemberSet {
    fn from_iter<I: IntoIterator<Item = UserId>>(iter: I) -> Self {
        let mut set = Self::default();
        for id in iter {
            set.insert(id);
        }
        set
    }
}

impl<'a> IntoIterator for &'a MemberSet {
    type Item = &'a UserId;
    type IntoIter = std::slice::Iter<'a, UserId>;

    fn into_iter(self) -> Self::IntoIter {
        self.members.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn ids() -> [UserId; 3] {
        [UserId::random(), UserId::random(), UserId::random()]
    }

    #[rstest]
    fn preserves_insertion_order(ids: [UserId; 3]) {
        let set: MemberSet = [ids[2], ids[0], ids[1]].into_iter().collect();
        let order: Vec<_> = set.iter().copied().collect();
        assert_eq!(order, vec![ids[2], ids[0], ids[1]]);
    }

    #[rstest]
    fn collapses_duplicates_on_construction(ids: [UserId; 3]) {
        let set = MemberSet::from(vec![ids[0], ids[1], ids[0]]);
        assert_eq!(set.as_slice(), &[ids[0], ids[1]]);
    }

    #[rstest]
    fn remove_reports_presence(ids: [UserId; 3]) {
        let mut set = MemberSet::from(vec![ids[0]]);
        assert!(set.remove(&ids[0]));
        assert!(!set.remove(&ids[0]));
        assert!(set.is_empty());
    }

    #[rstest]
    fn remove_keeps_remaining_order(ids: [UserId; 3]) {
        let mut set = MemberSet::from(ids.to_vec());
        set.remove(&ids[1]);
        assert_eq!(set.as_slice(), &[ids[0], ids[2]]);
        assert_eq!(set.count(), 2);
    }

    #[rstest]
    fn serialises_as_array(ids: [UserId; 3]) {
        let set = MemberSet::from(vec![ids[0]]);
        let json = serde_json::to_value(&set).expect("serialise");
        assert_eq!(json, serde_json::json!([ids[0].to_string()]));
    }
}

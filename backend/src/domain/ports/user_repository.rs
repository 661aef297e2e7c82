//! Port for user and channel persistence.
//!
//! Subscription bookkeeping mutates two user aggregates. Each call to
//! [`UserRepository::apply`] is atomic for one aggregate only; callers
//! sequence the authoritative write (the channel's `subscribed_by`) before
//! the derived one (the subscriber's `subscribed_channels`).

use async_trait::async_trait;

use crate::domain::{
    ChannelMutation, ChannelMutationOutcome, MemberSet, SubscriptionError, User, UserId,
};

use super::define_port_error;

define_port_error! {
    /// Errors raised by user repository adapters.
    pub enum UserRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "user repository query failed: {message}",
        /// The domain refused the membership change.
        Rejected { reason: SubscriptionError } =>
            "subscription change rejected: {reason}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError>;

    /// Fetch several users, returned in the order of `ids`.
    ///
    /// Unknown identifiers are skipped.
    async fn find_many(&self, ids: &[UserId]) -> Result<Vec<User>, UserRepositoryError>;

    /// List every user.
    async fn list_all(&self) -> Result<Vec<User>, UserRepositoryError>;

    /// Store a newly registered user.
    async fn insert(&self, user: &User) -> Result<(), UserRepositoryError>;

    /// Atomically apply a membership change to one user.
    ///
    /// Returns `None` when the user does not exist and
    /// [`UserRepositoryError::Rejected`] when the transition is refused.
    async fn apply(
        &self,
        id: &UserId,
        mutation: ChannelMutation,
    ) -> Result<Option<ChannelMutationOutcome>, UserRepositoryError>;

    /// Overwrite a user's derived `subscribed_channels` index.
    ///
    /// Returns `false` when the user does not exist.
    async fn replace_subscribed_channels(
        &self,
        id: &UserId,
        channels: &MemberSet,
    ) -> Result<bool, UserRepositoryError>;
}

/// Fixture implementation that stores nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureUserRepository;

#[async_trait]
impl UserRepository for FixtureUserRepository {
    async fn find_by_id(&self, _id: &UserId) -> Result<Option<User>, UserRepositoryError> {
        Ok(None)
    }

    async fn find_many(&self, _ids: &[UserId]) -> Result<Vec<User>, UserRepositoryError> {
        Ok(Vec::new())
    }

    async fn list_all(&self) -> Result<Vec<User>, UserRepositoryError> {
        Ok(Vec::new())
    }

    async fn insert(&self, _user: &User) -> Result<(), UserRepositoryError> {
        Ok(())
    }

    async fn apply(
        &self,
        _id: &UserId,
        _mutation: ChannelMutation,
    ) -> Result<Option<ChannelMutationOutcome>, UserRepositoryError> {
        Ok(None)
    }

    async fn replace_subscribed_channels(
        &self,
        _id: &UserId,
        _channels: &MemberSet,
    ) -> Result<bool, UserRepositoryError> {
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fixture_finds_nothing() {
        let repo = FixtureUserRepository;
        let users = repo
            .find_many(&[UserId::random()])
            .await
            .expect("fixture lookup succeeds");
        assert!(users.is_empty());
    }

    #[test]
    fn rejected_error_carries_reason() {
        let err = UserRepositoryError::rejected(SubscriptionError::AlreadySubscribed);
        assert_eq!(
            err.to_string(),
            "subscription change rejected: Already a subscriber"
        );
    }
}

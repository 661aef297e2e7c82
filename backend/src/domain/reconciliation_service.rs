//! Subscription reconciliation.
//!
//! Rebuilds each user's `subscribed_channels` from the `subscribed_by` sets
//! of every channel. The pass reads a snapshot of all users and then
//! overwrites indexes one by one, so it should run while subscription traffic
//! is quiesced.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::domain::ports::{ReconciliationReport, SubscriptionMaintenance, UserRepository};
use crate::domain::repository_error_mapping::map_user_repository_error;
use crate::domain::{Error, MemberSet, User, UserId};

/// Maintenance service backed by a user repository.
#[derive(Clone)]
pub struct ReconciliationService<U> {
    users: Arc<U>,
}

impl<U> ReconciliationService<U> {
    pub fn new(users: Arc<U>) -> Self {
        Self { users }
    }
}

/// Channels each user should follow, in channel listing order.
fn expected_follows(users: &[User]) -> HashMap<UserId, Vec<UserId>> {
    let mut expected: HashMap<UserId, Vec<UserId>> = HashMap::new();
    for channel in users {
        for subscriber in channel.subscribed_by() {
            expected.entry(*subscriber).or_default().push(channel.id());
        }
    }
    expected
}

/// Keep surviving entries in stored order and append missing ones.
fn rebuild(current: &MemberSet, expected: &[UserId]) -> (MemberSet, usize, usize) {
    let wanted: HashSet<&UserId> = expected.iter().collect();
    let mut rebuilt: MemberSet = current.iter().filter(|id| wanted.contains(id)).copied().collect();
    let removed = current.len() - rebuilt.len();
    let mut added = 0;
    for id in expected {
        if rebuilt.insert(*id) {
            added += 1;
        }
    }
    (rebuilt, added, removed)
}

#[async_trait]
impl<U> SubscriptionMaintenance for ReconciliationService<U>
where
    U: UserRepository,
{
    async fn reconcile_subscriptions(&self) -> Result<ReconciliationReport, Error> {
        let users = self
            .users
            .list_all()
            .await
            .map_err(map_user_repository_error)?;
        let expected = expected_follows(&users);

        let mut report = ReconciliationReport {
            users_scanned: users.len(),
            ..ReconciliationReport::default()
        };
        for user in &users {
            let wanted = expected.get(&user.id()).map(Vec::as_slice).unwrap_or_default();
            let (rebuilt, added, removed) = rebuild(user.subscribed_channels(), wanted);
            if added == 0 && removed == 0 {
                continue;
            }

            let written = self
                .users
                .replace_subscribed_channels(&user.id(), &rebuilt)
                .await
                .map_err(map_user_repository_error)?;
            if !written {
                warn!(user_id = %user.id(), "user disappeared during reconciliation");
                continue;
            }
            info!(user_id = %user.id(), added, removed, "subscribed channels repaired");
            report.users_repaired += 1;
            report.channels_added += added;
            report.channels_removed += removed;
        }

        info!(
            users_scanned = report.users_scanned,
            users_repaired = report.users_repaired,
            channels_added = report.channels_added,
            channels_removed = report.channels_removed,
            "subscription reconciliation finished"
        );
        Ok(report)
    }
}

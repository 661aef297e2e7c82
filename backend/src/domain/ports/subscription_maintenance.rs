//! Driving port for subscription reconciliation.
//!
//! A subscription touches two aggregates. When the second write fails the
//! subscriber's `subscribed_channels` index disagrees with the channel's
//! authoritative `subscribed_by`. Reconciliation rebuilds every index from
//! the authoritative side.

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::Error;

/// Summary of a reconciliation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconciliationReport {
    pub users_scanned: usize,
    pub users_repaired: usize,
    pub channels_added: usize,
    pub channels_removed: usize,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubscriptionMaintenance: Send + Sync {
    /// Rebuild every user's followed channels from channel subscriber sets.
    ///
    /// Surviving entries keep their stored order; missing ones are appended.
    async fn reconcile_subscriptions(&self) -> Result<ReconciliationReport, Error>;
}

/// Fixture maintenance that finds nothing to repair.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureSubscriptionMaintenance;

#[async_trait]
impl SubscriptionMaintenance for FixtureSubscriptionMaintenance {
    async fn reconcile_subscriptions(&self) -> Result<ReconciliationReport, Error> {
        Ok(ReconciliationReport::default())
    }
}

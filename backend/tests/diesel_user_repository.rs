//! Integration tests for `DieselUserRepository` against embedded PostgreSQL.
//!
//! Covers the subscription round trip through the domain service, the stored
//! order of followed channels, rejected membership changes, and the
//! reconciliation write used to repair a half-applied subscription.

use std::sync::Arc;

use pg_embedded_setup_unpriv::TestCluster;
use rstest::{fixture, rstest};
use tokio::runtime::Runtime;
use vidshare::domain::ports::{
    SubscriptionCommand, SubscriptionMaintenance, SubscriptionRequest, SubscriptionStatus,
    UserRepository, UserRepositoryError,
};
use vidshare::domain::{
    ChannelMutation, ErrorCode, MemberSet, ReconciliationService, SubscriptionError,
    SubscriptionService, User, UserId,
};
use vidshare::outbound::persistence::{DbPool, DieselUserRepository, PoolConfig};

#[allow(dead_code, reason = "Shared fixtures serve several integration suites.")]
#[path = "support/fixtures.rs"]
mod fixtures;

#[path = "support/pg_embed.rs"]
mod pg_embed;

use fixtures::user;
use pg_embed::{handle_cluster_setup_failure, prepare_database, test_cluster};

const TEST_DB: &str = "vidshare_user_repository_test";

struct TestContext {
    runtime: Runtime,
    _cluster: TestCluster,
    repository: DieselUserRepository,
}

impl TestContext {
    fn seed(&self, name: &str) -> User {
        let seeded = user(name);
        self.runtime
            .block_on(self.repository.insert(&seeded))
            .expect("insert user");
        seeded
    }

    fn reload(&self, id: UserId) -> User {
        self.runtime
            .block_on(self.repository.find_by_id(&id))
            .expect("fetch succeeds")
            .expect("user exists")
    }

    fn apply(
        &self,
        id: UserId,
        mutation: ChannelMutation,
    ) -> Result<Option<vidshare::domain::ChannelMutationOutcome>, UserRepositoryError> {
        self.runtime.block_on(self.repository.apply(&id, mutation))
    }
}

fn setup_context() -> Result<TestContext, String> {
    let runtime = Runtime::new().map_err(|err| err.to_string())?;
    let cluster = test_cluster()?;
    let database_url = prepare_database(&runtime, &cluster, TEST_DB)?;

    let config = PoolConfig::new(&database_url).with_max_size(2);
    let pool = runtime
        .block_on(DbPool::new(config))
        .map_err(|err| err.to_string())?;

    Ok(TestContext {
        runtime,
        _cluster: cluster,
        repository: DieselUserRepository::new(pool),
    })
}

#[fixture]
fn repo_context() -> Option<TestContext> {
    match setup_context() {
        Ok(ctx) => Some(ctx),
        Err(reason) => handle_cluster_setup_failure(reason),
    }
}

#[rstest]
fn subscribe_then_unsubscribe_restores_both_users(repo_context: Option<TestContext>) {
    let Some(ctx) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: subscribe_then_unsubscribe_restores_both_users skipped");
        return;
    };
    let follower = ctx.seed("Follower");
    let channel = ctx.seed("Channel");
    let service = SubscriptionService::new(Arc::new(ctx.repository.clone()));
    let request = SubscriptionRequest {
        subscriber: follower.id(),
        channel: channel.id(),
    };

    let subscribed = ctx
        .runtime
        .block_on(service.subscribe(request))
        .expect("subscribe succeeds");
    assert_eq!(subscribed.status, SubscriptionStatus::Subscribed);
    assert_eq!(subscribed.channel_subscribers, 1);
    assert_eq!(
        ctx.reload(channel.id()).subscribed_by().as_slice(),
        &[follower.id()]
    );
    assert_eq!(
        ctx.reload(follower.id()).subscribed_channels().as_slice(),
        &[channel.id()]
    );

    let repeat = ctx
        .runtime
        .block_on(service.subscribe(request))
        .expect_err("second subscribe conflicts");
    assert_eq!(repeat.code(), ErrorCode::Conflict);
    assert_eq!(ctx.reload(channel.id()).subscribers(), 1);

    let unsubscribed = ctx
        .runtime
        .block_on(service.unsubscribe(request))
        .expect("unsubscribe succeeds");
    assert_eq!(unsubscribed.status, SubscriptionStatus::Unsubscribed);
    assert_eq!(unsubscribed.channel_subscribers, 0);
    assert!(ctx.reload(channel.id()).subscribed_by().is_empty());
    assert!(ctx.reload(follower.id()).subscribed_channels().is_empty());
}

#[rstest]
fn followed_channels_keep_subscription_order(repo_context: Option<TestContext>) {
    let Some(ctx) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: followed_channels_keep_subscription_order skipped");
        return;
    };
    let follower = ctx.seed("Orderly");
    let channels: Vec<UserId> = ["Alpha", "Bravo", "Charlie"]
        .into_iter()
        .map(|name| ctx.seed(name).id())
        .collect();

    for channel in &channels {
        ctx.apply(follower.id(), ChannelMutation::FollowChannel(*channel))
            .expect("follow succeeds");
    }
    ctx.apply(follower.id(), ChannelMutation::UnfollowChannel(channels[0]))
        .expect("unfollow succeeds");
    ctx.apply(follower.id(), ChannelMutation::FollowChannel(channels[0]))
        .expect("follow succeeds");

    assert_eq!(
        ctx.reload(follower.id()).subscribed_channels().as_slice(),
        &[channels[1], channels[2], channels[0]]
    );
}

#[rstest]
fn duplicate_subscriber_is_rejected(repo_context: Option<TestContext>) {
    let Some(ctx) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: duplicate_subscriber_is_rejected skipped");
        return;
    };
    let follower = ctx.seed("Eager");
    let channel = ctx.seed("Target");

    ctx.apply(channel.id(), ChannelMutation::AddSubscriber(follower.id()))
        .expect("first add succeeds");
    let err = ctx
        .apply(channel.id(), ChannelMutation::AddSubscriber(follower.id()))
        .expect_err("second add is rejected");

    assert!(matches!(
        err,
        UserRepositoryError::Rejected {
            reason: SubscriptionError::AlreadySubscribed
        }
    ));
    assert_eq!(ctx.reload(channel.id()).subscribers(), 1);
}

#[rstest]
fn replacing_followed_channels_rewrites_the_index(repo_context: Option<TestContext>) {
    let Some(ctx) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: replacing_followed_channels_rewrites_the_index skipped");
        return;
    };
    let follower = ctx.seed("Rebuilt");
    let first = ctx.seed("First Channel").id();
    let second = ctx.seed("Second Channel").id();
    ctx.apply(follower.id(), ChannelMutation::FollowChannel(first))
        .expect("follow succeeds");

    let replacement = MemberSet::from(vec![second, first]);
    let replaced = ctx
        .runtime
        .block_on(
            ctx.repository
                .replace_subscribed_channels(&follower.id(), &replacement),
        )
        .expect("replace succeeds");
    assert!(replaced);
    assert_eq!(
        ctx.reload(follower.id()).subscribed_channels().as_slice(),
        &[second, first]
    );

    let missing = ctx
        .runtime
        .block_on(
            ctx.repository
                .replace_subscribed_channels(&UserId::random(), &replacement),
        )
        .expect("replace succeeds");
    assert!(!missing);
}

#[rstest]
fn find_many_preserves_request_order(repo_context: Option<TestContext>) {
    let Some(ctx) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: find_many_preserves_request_order skipped");
        return;
    };
    let ids: Vec<UserId> = ["North", "South", "East"]
        .into_iter()
        .map(|name| ctx.seed(name).id())
        .collect();
    let requested = [ids[2], ids[0], ids[1]];

    let found = ctx
        .runtime
        .block_on(ctx.repository.find_many(&requested))
        .expect("lookup succeeds");
    let found_ids: Vec<UserId> = found.iter().map(User::id).collect();
    assert_eq!(found_ids, requested);
}

#[rstest]
fn reconciliation_repairs_a_half_applied_subscription(repo_context: Option<TestContext>) {
    let Some(ctx) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: reconciliation_repairs_a_half_applied_subscription skipped");
        return;
    };
    let follower = ctx.seed("Drifted");
    let channel = ctx.seed("Authority");
    ctx.apply(channel.id(), ChannelMutation::AddSubscriber(follower.id()))
        .expect("channel side written");

    let service = ReconciliationService::new(Arc::new(ctx.repository.clone()));
    let report = ctx
        .runtime
        .block_on(service.reconcile_subscriptions())
        .expect("reconciliation succeeds");

    assert_eq!(report.users_repaired, 1);
    assert_eq!(report.channels_added, 1);
    assert_eq!(
        ctx.reload(follower.id()).subscribed_channels().as_slice(),
        &[channel.id()]
    );
}

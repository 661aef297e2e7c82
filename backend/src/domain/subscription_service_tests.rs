//! Tests for the subscription service.

use super::*;
use crate::domain::ports::MockUserRepository;
use crate::domain::{ChannelName, EmailAddress, ErrorCode, MutationEffect, User, UserProfile};
use chrono::Utc;
use mockall::predicate::eq;
use rstest::{fixture, rstest};

fn user(name: &str) -> User {
    User::register(
        UserId::random(),
        UserProfile {
            channel_name: ChannelName::new(name).expect("valid name"),
            email: EmailAddress::new("someone@example.com").expect("valid email"),
            phone: None,
            logo: None,
        },
        Utc::now(),
    )
}

struct Pair {
    fan: User,
    channel: User,
}

impl Pair {
    fn request(&self) -> SubscriptionRequest {
        SubscriptionRequest {
            subscriber: self.fan.id(),
            channel: self.channel.id(),
        }
    }
}

#[fixture]
fn pair() -> Pair {
    Pair {
        fan: user("Fan"),
        channel: user("Channel"),
    }
}

fn applied(
    mut user: User,
    mutation: ChannelMutation,
) -> Result<Option<ChannelMutationOutcome>, UserRepositoryError> {
    let effect = user.apply(mutation).map_err(UserRepositoryError::rejected)?;
    Ok(Some(ChannelMutationOutcome { user, effect }))
}

fn expect_fan_lookup(repo: &mut MockUserRepository, fan: &User) {
    let found = fan.clone();
    repo.expect_find_by_id()
        .with(eq(fan.id()))
        .returning(move |_| Ok(Some(found.clone())));
}

#[rstest]
#[tokio::test]
async fn self_subscription_is_invalid(pair: Pair) {
    let repo = MockUserRepository::new();
    let service = SubscriptionService::new(Arc::new(repo));

    let error = service
        .subscribe(SubscriptionRequest {
            subscriber: pair.fan.id(),
            channel: pair.fan.id(),
        })
        .await
        .expect_err("self subscription fails");

    assert_eq!(error.code(), ErrorCode::InvalidRequest);
    assert_eq!(error.message(), "You cannot subscribe to your own channel");
}

#[rstest]
#[tokio::test]
async fn unknown_subscriber_is_not_found(pair: Pair) {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_id().returning(|_| Ok(None));
    repo.expect_apply().never();

    let error = SubscriptionService::new(Arc::new(repo))
        .subscribe(pair.request())
        .await
        .expect_err("missing subscriber");

    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn unknown_channel_is_not_found(pair: Pair) {
    let mut repo = MockUserRepository::new();
    expect_fan_lookup(&mut repo, &pair.fan);
    repo.expect_apply().times(1).returning(|_, _| Ok(None));

    let error = SubscriptionService::new(Arc::new(repo))
        .subscribe(pair.request())
        .await
        .expect_err("missing channel");

    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn subscribe_writes_channel_then_subscriber(pair: Pair) {
    let mut repo = MockUserRepository::new();
    let mut seq = mockall::Sequence::new();
    expect_fan_lookup(&mut repo, &pair.fan);

    let channel = pair.channel.clone();
    repo.expect_apply()
        .with(
            eq(pair.channel.id()),
            eq(ChannelMutation::AddSubscriber(pair.fan.id())),
        )
        .times(1)
        .in_sequence(&mut seq)
        .returning(move |_, mutation| applied(channel.clone(), mutation));
    let fan = pair.fan.clone();
    repo.expect_apply()
        .with(
            eq(pair.fan.id()),
            eq(ChannelMutation::FollowChannel(pair.channel.id())),
        )
        .times(1)
        .in_sequence(&mut seq)
        .returning(move |_, mutation| applied(fan.clone(), mutation));

    let response = SubscriptionService::new(Arc::new(repo))
        .subscribe(pair.request())
        .await
        .expect("subscribe succeeds");

    assert_eq!(response.status, SubscriptionStatus::Subscribed);
    assert_eq!(response.status.label(), "Subscribed");
    assert_eq!(response.channel_subscribers, 1);
}

#[rstest]
#[tokio::test]
async fn repeated_subscription_conflicts(pair: Pair) {
    let mut repo = MockUserRepository::new();
    expect_fan_lookup(&mut repo, &pair.fan);
    repo.expect_apply()
        .times(1)
        .returning(|_, _| Err(UserRepositoryError::rejected(SubscriptionError::AlreadySubscribed)));

    let error = SubscriptionService::new(Arc::new(repo))
        .subscribe(pair.request())
        .await
        .expect_err("duplicate subscription");

    assert_eq!(error.code(), ErrorCode::Conflict);
    assert_eq!(error.message(), "Already a subscriber");
}

#[rstest]
#[tokio::test]
async fn derived_write_failure_surfaces_persistence_error(pair: Pair) {
    let mut repo = MockUserRepository::new();
    expect_fan_lookup(&mut repo, &pair.fan);
    let channel = pair.channel.clone();
    let channel_id = pair.channel.id();
    repo.expect_apply()
        .returning(move |id, mutation| {
            if *id == channel_id {
                applied(channel.clone(), mutation)
            } else {
                Err(UserRepositoryError::connection("connection reset"))
            }
        });

    let error = SubscriptionService::new(Arc::new(repo))
        .subscribe(pair.request())
        .await
        .expect_err("second write fails");

    assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
}

#[rstest]
#[tokio::test]
async fn unsubscribe_from_self_only_touches_caller(pair: Pair) {
    let mut repo = MockUserRepository::new();
    let fan = pair.fan.clone();
    repo.expect_find_by_id().never();
    repo.expect_apply()
        .with(
            eq(pair.fan.id()),
            eq(ChannelMutation::UnfollowChannel(pair.fan.id())),
        )
        .times(1)
        .returning(move |_, _| {
            Ok(Some(ChannelMutationOutcome {
                user: fan.clone(),
                effect: MutationEffect::Unchanged,
            }))
        });

    let response = SubscriptionService::new(Arc::new(repo))
        .unsubscribe(SubscriptionRequest {
            subscriber: pair.fan.id(),
            channel: pair.fan.id(),
        })
        .await
        .expect("self unsubscribe succeeds");

    assert_eq!(response.status, SubscriptionStatus::SelfSubscriptionRemoved);
    assert_eq!(
        response.status.label(),
        "Self-subscription removed successfully"
    );
}

#[rstest]
#[tokio::test]
async fn unsubscribe_without_subscription_conflicts(pair: Pair) {
    let mut repo = MockUserRepository::new();
    expect_fan_lookup(&mut repo, &pair.fan);
    let channel = pair.channel.clone();
    repo.expect_apply()
        .times(1)
        .returning(move |_, mutation| applied(channel.clone(), mutation));

    let error = SubscriptionService::new(Arc::new(repo))
        .unsubscribe(pair.request())
        .await
        .expect_err("not subscribed");

    assert_eq!(error.code(), ErrorCode::Conflict);
    assert_eq!(error.message(), "You are not a subscriber");
}

#[rstest]
#[tokio::test]
async fn unsubscribe_reports_remaining_subscribers(pair: Pair) {
    let mut repo = MockUserRepository::new();
    expect_fan_lookup(&mut repo, &pair.fan);
    let mut channel = pair.channel.clone();
    channel
        .apply(ChannelMutation::AddSubscriber(pair.fan.id()))
        .expect("seed subscription");
    let mut fan = pair.fan.clone();
    fan.apply(ChannelMutation::FollowChannel(pair.channel.id()))
        .expect("seed follow");
    let channel_id = pair.channel.id();
    repo.expect_apply().times(2).returning(move |id, mutation| {
        if *id == channel_id {
            applied(channel.clone(), mutation)
        } else {
            applied(fan.clone(), mutation)
        }
    });

    let response = SubscriptionService::new(Arc::new(repo))
        .unsubscribe(pair.request())
        .await
        .expect("unsubscribe succeeds");

    assert_eq!(response.status.label(), "Unsubscribed successfully");
    assert_eq!(response.channel_subscribers, 0);
}

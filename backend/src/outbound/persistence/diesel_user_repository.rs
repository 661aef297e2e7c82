//! PostgreSQL-backed `UserRepository`.
//!
//! `channel_subscribers` holds the authoritative subscriber sets and
//! `subscribed_channels` the derived follow lists. Both keep insertion order
//! through their `seq` identity column.

use std::collections::HashMap;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::Error as DieselError;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection as _, AsyncPgConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::{UserRepository, UserRepositoryError};
use crate::domain::{
    ChannelMutation, ChannelMutationOutcome, ChannelName, EmailAddress, MediaReference, MemberSet,
    SubscriptionError, User, UserId, UserParts, UserProfile,
};

use super::diesel_basic_error_mapping::{map_diesel_error, map_pool_error};
use super::membership_diff::MembershipDiff;
use super::models::{ChannelSubscriberRow, NewUserRow, SubscribedChannelRow, UserRow};
use super::pool::DbPool;
use super::schema::{channel_subscribers, subscribed_channels, users};

/// Diesel-backed implementation of the user repository port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug)]
enum StoreError {
    Diesel(DieselError),
    Corrupt(String),
    Rejected(SubscriptionError),
}

impl From<DieselError> for StoreError {
    fn from(value: DieselError) -> Self {
        Self::Diesel(value)
    }
}

impl From<StoreError> for UserRepositoryError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::Diesel(err) => map_diesel_error(
                err,
                UserRepositoryError::query,
                UserRepositoryError::connection,
            ),
            StoreError::Corrupt(message) => UserRepositoryError::query(message),
            StoreError::Rejected(reason) => UserRepositoryError::rejected(reason),
        }
    }
}

#[derive(Default)]
struct Memberships {
    subscribed_by: Vec<UserId>,
    subscribed_channels: Vec<UserId>,
}

fn row_to_user(row: UserRow, memberships: Memberships) -> Result<User, StoreError> {
    let UserRow {
        id,
        channel_name,
        email,
        phone,
        logo_url,
        logo_storage_id,
        created_at,
    } = row;
    let corrupt = |err: crate::domain::UserValidationError| {
        StoreError::Corrupt(format!("user {id} failed validation: {err}"))
    };
    let logo = match (logo_url, logo_storage_id) {
        (Some(url), Some(storage_id)) => Some(MediaReference::new(url, storage_id)),
        (None, None) => None,
        _ => {
            return Err(StoreError::Corrupt(format!(
                "user {id} has a partial logo reference"
            )));
        }
    };

    Ok(User::from_parts(UserParts {
        id: UserId::from_uuid(id),
        profile: UserProfile {
            channel_name: ChannelName::new(channel_name).map_err(corrupt)?,
            email: EmailAddress::new(email).map_err(corrupt)?,
            phone,
            logo,
        },
        subscribed_by: memberships.subscribed_by,
        subscribed_channels: memberships.subscribed_channels,
        created_at,
    }))
}

/// Attach membership rows to user rows, preserving the order of `rows`.
async fn hydrate(
    conn: &mut AsyncPgConnection,
    rows: Vec<UserRow>,
) -> Result<Vec<User>, StoreError> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }
    let ids: Vec<Uuid> = rows.iter().map(|row| row.id).collect();

    let subscribers: Vec<ChannelSubscriberRow> = channel_subscribers::table
        .filter(channel_subscribers::channel_id.eq_any(&ids))
        .order(channel_subscribers::seq.asc())
        .select(ChannelSubscriberRow::as_select())
        .load(conn)
        .await?;
    let follows: Vec<SubscribedChannelRow> = subscribed_channels::table
        .filter(subscribed_channels::user_id.eq_any(&ids))
        .order(subscribed_channels::seq.asc())
        .select(SubscribedChannelRow::as_select())
        .load(conn)
        .await?;

    let mut memberships: HashMap<Uuid, Memberships> = HashMap::new();
    for row in subscribers {
        memberships
            .entry(row.channel_id)
            .or_default()
            .subscribed_by
            .push(UserId::from_uuid(row.subscriber_id));
    }
    for row in follows {
        memberships
            .entry(row.user_id)
            .or_default()
            .subscribed_channels
            .push(UserId::from_uuid(row.channel_id));
    }

    rows.into_iter()
        .map(|row| {
            let found = memberships.remove(&row.id).unwrap_or_default();
            row_to_user(row, found)
        })
        .collect()
}

async fn lock_user(conn: &mut AsyncPgConnection, id: Uuid) -> Result<Option<User>, StoreError> {
    let locked: Option<UserRow> = users::table
        .filter(users::id.eq(id))
        .for_update()
        .select(UserRow::as_select())
        .first(conn)
        .await
        .optional()?;
    match locked {
        Some(row) => Ok(hydrate(conn, vec![row]).await?.pop()),
        None => Ok(None),
    }
}

async fn write_subscribers(
    conn: &mut AsyncPgConnection,
    channel_id: Uuid,
    diff: &MembershipDiff,
) -> Result<(), DieselError> {
    if diff.is_empty() {
        return Ok(());
    }
    if !diff.removed.is_empty() {
        let removed: Vec<Uuid> = diff.removed.iter().map(|id| *id.as_uuid()).collect();
        diesel::delete(
            channel_subscribers::table
                .filter(channel_subscribers::channel_id.eq(channel_id))
                .filter(channel_subscribers::subscriber_id.eq_any(&removed)),
        )
        .execute(conn)
        .await?;
    }
    if !diff.added.is_empty() {
        let rows: Vec<ChannelSubscriberRow> = diff
            .added
            .iter()
            .map(|id| ChannelSubscriberRow {
                channel_id,
                subscriber_id: *id.as_uuid(),
            })
            .collect();
        diesel::insert_into(channel_subscribers::table)
            .values(&rows)
            .execute(conn)
            .await?;
    }
    Ok(())
}

async fn write_follows(
    conn: &mut AsyncPgConnection,
    user_id: Uuid,
    diff: &MembershipDiff,
) -> Result<(), DieselError> {
    if diff.is_empty() {
        return Ok(());
    }
    if !diff.removed.is_empty() {
        let removed: Vec<Uuid> = diff.removed.iter().map(|id| *id.as_uuid()).collect();
        diesel::delete(
            subscribed_channels::table
                .filter(subscribed_channels::user_id.eq(user_id))
                .filter(subscribed_channels::channel_id.eq_any(&removed)),
        )
        .execute(conn)
        .await?;
    }
    if !diff.added.is_empty() {
        let rows: Vec<SubscribedChannelRow> = diff
            .added
            .iter()
            .map(|id| SubscribedChannelRow {
                user_id,
                channel_id: *id.as_uuid(),
            })
            .collect();
        diesel::insert_into(subscribed_channels::table)
            .values(&rows)
            .execute(conn)
            .await?;
    }
    Ok(())
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError> {
        let mut found = self.find_many(std::slice::from_ref(id)).await?;
        Ok(found.pop())
    }

    async fn find_many(&self, ids: &[UserId]) -> Result<Vec<User>, UserRepositoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, UserRepositoryError::connection))?;

        let wanted: Vec<Uuid> = ids.iter().map(|id| *id.as_uuid()).collect();
        let rows: Vec<UserRow> = users::table
            .filter(users::id.eq_any(&wanted))
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(StoreError::from)?;

        let mut by_id: HashMap<UserId, User> = hydrate(&mut conn, rows)
            .await?
            .into_iter()
            .map(|user| (user.id(), user))
            .collect();
        Ok(ids.iter().filter_map(|id| by_id.remove(id)).collect())
    }

    async fn list_all(&self) -> Result<Vec<User>, UserRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, UserRepositoryError::connection))?;

        let rows: Vec<UserRow> = users::table
            .order((users::created_at.asc(), users::id.asc()))
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(StoreError::from)?;
        Ok(hydrate(&mut conn, rows).await?)
    }

    async fn insert(&self, user: &User) -> Result<(), UserRepositoryError> {
        let profile = user.profile();
        let row = NewUserRow {
            id: *user.id().as_uuid(),
            channel_name: profile.channel_name.as_ref(),
            email: profile.email.as_ref(),
            phone: profile.phone.as_deref(),
            logo_url: profile.logo.as_ref().map(|logo| logo.url.as_str()),
            logo_storage_id: profile.logo.as_ref().map(|logo| logo.storage_id.as_str()),
            created_at: user.created_at(),
        };
        let user_id = row.id;
        let subscribers = MembershipDiff::between(&MemberSet::default(), user.subscribed_by());
        let follows = MembershipDiff::between(&MemberSet::default(), user.subscribed_channels());

        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, UserRepositoryError::connection))?;

        conn.transaction::<_, StoreError, _>(|conn| {
            async move {
                diesel::insert_into(users::table)
                    .values(&row)
                    .execute(conn)
                    .await?;
                write_subscribers(conn, user_id, &subscribers).await?;
                write_follows(conn, user_id, &follows).await?;
                Ok(())
            }
            .scope_boxed()
        })
        .await?;
        Ok(())
    }

    async fn apply(
        &self,
        id: &UserId,
        mutation: ChannelMutation,
    ) -> Result<Option<ChannelMutationOutcome>, UserRepositoryError> {
        let user_id = *id.as_uuid();
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, UserRepositoryError::connection))?;

        let outcome = conn
            .transaction::<_, StoreError, _>(|conn| {
                async move {
                    let Some(mut user) = lock_user(conn, user_id).await? else {
                        return Ok(None);
                    };
                    let before = user.clone();
                    let effect = user.apply(mutation).map_err(StoreError::Rejected)?;

                    let subscribers =
                        MembershipDiff::between(before.subscribed_by(), user.subscribed_by());
                    let follows = MembershipDiff::between(
                        before.subscribed_channels(),
                        user.subscribed_channels(),
                    );
                    write_subscribers(conn, user_id, &subscribers).await?;
                    write_follows(conn, user_id, &follows).await?;
                    Ok(Some(ChannelMutationOutcome { user, effect }))
                }
                .scope_boxed()
            })
            .await?;
        Ok(outcome)
    }

    async fn replace_subscribed_channels(
        &self,
        id: &UserId,
        channels: &MemberSet,
    ) -> Result<bool, UserRepositoryError> {
        let user_id = *id.as_uuid();
        let rows: Vec<SubscribedChannelRow> = channels
            .iter()
            .map(|channel| SubscribedChannelRow {
                user_id,
                channel_id: *channel.as_uuid(),
            })
            .collect();
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, UserRepositoryError::connection))?;

        let replaced = conn
            .transaction::<_, StoreError, _>(|conn| {
                async move {
                    let locked: Option<Uuid> = users::table
                        .filter(users::id.eq(user_id))
                        .for_update()
                        .select(users::id)
                        .first(conn)
                        .await
                        .optional()?;
                    if locked.is_none() {
                        return Ok(false);
                    }
                    diesel::delete(
                        subscribed_channels::table.filter(subscribed_channels::user_id.eq(user_id)),
                    )
                    .execute(conn)
                    .await?;
                    if !rows.is_empty() {
                        diesel::insert_into(subscribed_channels::table)
                            .values(&rows)
                            .execute(conn)
                            .await?;
                    }
                    Ok(true)
                }
                .scope_boxed()
            })
            .await?;
        Ok(replaced)
    }
}

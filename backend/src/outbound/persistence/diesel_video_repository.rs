//! PostgreSQL-backed `VideoRepository`.
//!
//! Membership sets live in `video_reactions` and `video_views`; counts are
//! never stored. `apply` locks the video row with `SELECT ... FOR UPDATE`,
//! rehydrates the aggregate, runs the pure transition, and writes only the
//! membership rows that changed, all inside one transaction.

use std::collections::HashMap;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::Error as DieselError;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection as _, AsyncPgConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::{VideoRepository, VideoRepositoryError};
use crate::domain::{
    MediaReference, UserId, Video, VideoDetails, VideoId, VideoMutation, VideoMutationOutcome,
    VideoParts,
};

use super::diesel_basic_error_mapping::{map_diesel_error, map_pool_error};
use super::membership_diff::MembershipDiff;
use super::models::{
    NewReactionRow, NewVideoRow, NewViewRow, REACTION_DISLIKE, REACTION_LIKE, ReactionRow,
    VideoRow, ViewRow,
};
use super::pool::DbPool;
use super::schema::{video_reactions, video_views, videos};

/// Diesel-backed implementation of the video repository port.
#[derive(Clone)]
pub struct DieselVideoRepository {
    pool: DbPool,
}

impl DieselVideoRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Failures raised inside a repository transaction.
#[derive(Debug)]
enum StoreError {
    Diesel(DieselError),
    Corrupt(String),
}

impl From<DieselError> for StoreError {
    fn from(value: DieselError) -> Self {
        Self::Diesel(value)
    }
}

impl From<StoreError> for VideoRepositoryError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::Diesel(err) => map_diesel_error(
                err,
                VideoRepositoryError::query,
                VideoRepositoryError::connection,
            ),
            StoreError::Corrupt(message) => VideoRepositoryError::query(message),
        }
    }
}

#[derive(Default)]
struct Members {
    liked: Vec<UserId>,
    disliked: Vec<UserId>,
    viewed: Vec<UserId>,
}

fn row_to_video(row: VideoRow, members: Members) -> Result<Video, StoreError> {
    let VideoRow {
        id,
        owner_id,
        title,
        description,
        category,
        tags,
        duration_secs,
        video_url,
        video_storage_id,
        thumbnail_url,
        thumbnail_storage_id,
        created_at,
    } = row;
    let duration_secs = duration_secs
        .map(u32::try_from)
        .transpose()
        .map_err(|_| StoreError::Corrupt(format!("video {id} has a negative duration")))?;

    Video::from_parts(VideoParts {
        id: VideoId::from_uuid(id),
        owner: UserId::from_uuid(owner_id),
        details: VideoDetails {
            title,
            description,
            category,
            tags,
            duration_secs,
        },
        video: MediaReference::new(video_url, video_storage_id),
        thumbnail: MediaReference::new(thumbnail_url, thumbnail_storage_id),
        liked_by: members.liked,
        disliked_by: members.disliked,
        viewed_by: members.viewed,
        created_at,
    })
    .map_err(|err| StoreError::Corrupt(format!("video {id} failed validation: {err}")))
}

/// Attach membership rows to video rows, preserving the order of `rows`.
async fn hydrate(
    conn: &mut AsyncPgConnection,
    rows: Vec<VideoRow>,
) -> Result<Vec<Video>, StoreError> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }
    let ids: Vec<Uuid> = rows.iter().map(|row| row.id).collect();

    let reactions: Vec<ReactionRow> = video_reactions::table
        .filter(video_reactions::video_id.eq_any(&ids))
        .order(video_reactions::seq.asc())
        .select(ReactionRow::as_select())
        .load(conn)
        .await?;
    let views: Vec<ViewRow> = video_views::table
        .filter(video_views::video_id.eq_any(&ids))
        .order(video_views::seq.asc())
        .select(ViewRow::as_select())
        .load(conn)
        .await?;

    let mut members: HashMap<Uuid, Members> = HashMap::new();
    for reaction in reactions {
        let entry = members.entry(reaction.video_id).or_default();
        let user = UserId::from_uuid(reaction.user_id);
        match reaction.kind.as_str() {
            REACTION_LIKE => entry.liked.push(user),
            REACTION_DISLIKE => entry.disliked.push(user),
            other => {
                return Err(StoreError::Corrupt(format!(
                    "unknown reaction kind {other:?} on video {}",
                    reaction.video_id
                )));
            }
        }
    }
    for view in views {
        members
            .entry(view.video_id)
            .or_default()
            .viewed
            .push(UserId::from_uuid(view.user_id));
    }

    rows.into_iter()
        .map(|row| {
            let found = members.remove(&row.id).unwrap_or_default();
            row_to_video(row, found)
        })
        .collect()
}

fn uuids(ids: &[UserId]) -> Vec<Uuid> {
    ids.iter().map(|id| *id.as_uuid()).collect()
}

/// Persist the membership rows that differ between `before` and `after`.
async fn write_engagement_diff(
    conn: &mut AsyncPgConnection,
    before: &Video,
    after: &Video,
) -> Result<(), DieselError> {
    let video_id = *after.id().as_uuid();
    let liked = MembershipDiff::between(before.liked_by(), after.liked_by());
    let disliked = MembershipDiff::between(before.disliked_by(), after.disliked_by());
    let viewed = MembershipDiff::between(before.viewed_by(), after.viewed_by());

    let cleared: Vec<Uuid> = uuids(&liked.removed)
        .into_iter()
        .chain(uuids(&disliked.removed))
        .collect();
    if !cleared.is_empty() {
        diesel::delete(
            video_reactions::table
                .filter(video_reactions::video_id.eq(video_id))
                .filter(video_reactions::user_id.eq_any(&cleared)),
        )
        .execute(conn)
        .await?;
    }

    let reactions: Vec<NewReactionRow<'_>> = liked
        .added
        .iter()
        .map(|id| (id, REACTION_LIKE))
        .chain(disliked.added.iter().map(|id| (id, REACTION_DISLIKE)))
        .map(|(id, kind)| NewReactionRow {
            video_id,
            user_id: *id.as_uuid(),
            kind,
        })
        .collect();
    if !reactions.is_empty() {
        diesel::insert_into(video_reactions::table)
            .values(&reactions)
            .execute(conn)
            .await?;
    }

    if !viewed.added.is_empty() {
        let views: Vec<NewViewRow> = viewed
            .added
            .iter()
            .map(|id| NewViewRow {
                video_id,
                user_id: *id.as_uuid(),
            })
            .collect();
        diesel::insert_into(video_views::table)
            .values(&views)
            .on_conflict_do_nothing()
            .execute(conn)
            .await?;
    }
    Ok(())
}

fn new_video_row(video: &Video) -> Result<NewVideoRow<'_>, VideoRepositoryError> {
    let details = video.details();
    let duration_secs = details
        .duration_secs
        .map(i32::try_from)
        .transpose()
        .map_err(|_| VideoRepositoryError::query("video duration exceeds storage range"))?;
    Ok(NewVideoRow {
        id: *video.id().as_uuid(),
        owner_id: *video.owner().as_uuid(),
        title: &details.title,
        description: &details.description,
        category: &details.category,
        tags: &details.tags,
        duration_secs,
        video_url: &video.video().url,
        video_storage_id: &video.video().storage_id,
        thumbnail_url: &video.thumbnail().url,
        thumbnail_storage_id: &video.thumbnail().storage_id,
        created_at: video.created_at(),
    })
}

#[async_trait]
impl VideoRepository for DieselVideoRepository {
    async fn find_by_id(&self, id: &VideoId) -> Result<Option<Video>, VideoRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, VideoRepositoryError::connection))?;

        let rows: Vec<VideoRow> = videos::table
            .filter(videos::id.eq(id.as_uuid()))
            .select(VideoRow::as_select())
            .load(&mut conn)
            .await
            .map_err(StoreError::from)?;
        let mut found = hydrate(&mut conn, rows).await?;
        Ok(found.pop())
    }

    async fn list_all(&self) -> Result<Vec<Video>, VideoRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, VideoRepositoryError::connection))?;

        let rows: Vec<VideoRow> = videos::table
            .order((videos::created_at.desc(), videos::id.asc()))
            .select(VideoRow::as_select())
            .load(&mut conn)
            .await
            .map_err(StoreError::from)?;
        Ok(hydrate(&mut conn, rows).await?)
    }

    async fn list_by_owner(&self, owner: &UserId) -> Result<Vec<Video>, VideoRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, VideoRepositoryError::connection))?;

        let rows: Vec<VideoRow> = videos::table
            .filter(videos::owner_id.eq(owner.as_uuid()))
            .order((videos::created_at.desc(), videos::id.asc()))
            .select(VideoRow::as_select())
            .load(&mut conn)
            .await
            .map_err(StoreError::from)?;
        Ok(hydrate(&mut conn, rows).await?)
    }

    async fn insert(&self, video: &Video) -> Result<(), VideoRepositoryError> {
        let row = new_video_row(video)?;
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, VideoRepositoryError::connection))?;

        diesel::insert_into(videos::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| VideoRepositoryError::from(StoreError::from(err)))
    }

    async fn delete(&self, id: &VideoId) -> Result<bool, VideoRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, VideoRepositoryError::connection))?;

        let deleted = diesel::delete(videos::table.filter(videos::id.eq(id.as_uuid())))
            .execute(&mut conn)
            .await
            .map_err(StoreError::from)?;
        Ok(deleted > 0)
    }

    async fn apply(
        &self,
        id: &VideoId,
        mutation: VideoMutation,
    ) -> Result<Option<VideoMutationOutcome>, VideoRepositoryError> {
        let video_id = *id.as_uuid();
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, VideoRepositoryError::connection))?;

        let outcome = conn
            .transaction::<_, StoreError, _>(|conn| {
                async move {
                    let locked: Option<VideoRow> = videos::table
                        .filter(videos::id.eq(video_id))
                        .for_update()
                        .select(VideoRow::as_select())
                        .first(conn)
                        .await
                        .optional()?;
                    let Some(row) = locked else {
                        return Ok(None);
                    };

                    let mut video = hydrate(conn, vec![row]).await?.pop().ok_or_else(|| {
                        StoreError::Corrupt(format!("video {video_id} vanished while locked"))
                    })?;
                    let before = video.clone();
                    let status = video.apply(mutation);
                    if status.changed_state() {
                        write_engagement_diff(conn, &before, &video).await?;
                    }
                    Ok(Some(VideoMutationOutcome { video, status }))
                }
                .scope_boxed()
            })
            .await?;
        Ok(outcome)
    }
}

//! Internal Diesel row structs.
//!
//! These types never leave the persistence layer.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{
    channel_subscribers, subscribed_channels, users, video_reactions, video_views, videos,
};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub channel_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub logo_url: Option<String>,
    pub logo_storage_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub channel_name: &'a str,
    pub email: &'a str,
    pub phone: Option<&'a str>,
    pub logo_url: Option<&'a str>,
    pub logo_storage_id: Option<&'a str>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = videos)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct VideoRow {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub description: String,
    pub category: String,
    pub tags: Vec<String>,
    pub duration_secs: Option<i32>,
    pub video_url: String,
    pub video_storage_id: String,
    pub thumbnail_url: String,
    pub thumbnail_storage_id: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = videos)]
pub(crate) struct NewVideoRow<'a> {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: &'a str,
    pub description: &'a str,
    pub category: &'a str,
    pub tags: &'a [String],
    pub duration_secs: Option<i32>,
    pub video_url: &'a str,
    pub video_storage_id: &'a str,
    pub thumbnail_url: &'a str,
    pub thumbnail_storage_id: &'a str,
    pub created_at: DateTime<Utc>,
}

/// Reaction kinds as stored in `video_reactions.kind`.
pub(crate) const REACTION_LIKE: &str = "like";
pub(crate) const REACTION_DISLIKE: &str = "dislike";

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = video_reactions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ReactionRow {
    pub video_id: Uuid,
    pub user_id: Uuid,
    pub kind: String,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = video_reactions)]
pub(crate) struct NewReactionRow<'a> {
    pub video_id: Uuid,
    pub user_id: Uuid,
    pub kind: &'a str,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = video_views)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ViewRow {
    pub video_id: Uuid,
    pub user_id: Uuid,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = video_views)]
pub(crate) struct NewViewRow {
    pub video_id: Uuid,
    pub user_id: Uuid,
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = channel_subscribers)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ChannelSubscriberRow {
    pub channel_id: Uuid,
    pub subscriber_id: Uuid,
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = subscribed_channels)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct SubscribedChannelRow {
    pub user_id: Uuid,
    pub channel_id: Uuid,
}

//! Diesel table definitions.
//!
//! Keep in sync with `backend/migrations`. Membership tables carry a `seq`
//! identity column that records insertion order.

diesel::table! {
    /// Registered users; each user is also a channel.
    users (id) {
        id -> Uuid,
        channel_name -> Varchar,
        email -> Varchar,
        phone -> Nullable<Varchar>,
        logo_url -> Nullable<Text>,
        logo_storage_id -> Nullable<Text>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Published videos and their media references.
    videos (id) {
        id -> Uuid,
        owner_id -> Uuid,
        title -> Varchar,
        description -> Text,
        category -> Varchar,
        tags -> Array<Text>,
        duration_secs -> Nullable<Int4>,
        video_url -> Text,
        video_storage_id -> Text,
        thumbnail_url -> Text,
        thumbnail_storage_id -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// One row per (video, user) reaction; `kind` is `like` or `dislike`.
    video_reactions (video_id, user_id) {
        video_id -> Uuid,
        user_id -> Uuid,
        kind -> Varchar,
        seq -> Int8,
    }
}

diesel::table! {
    /// One row per (video, user) counted view.
    video_views (video_id, user_id) {
        video_id -> Uuid,
        user_id -> Uuid,
        seq -> Int8,
    }
}

diesel::table! {
    /// Authoritative subscription side: who subscribes to `channel_id`.
    channel_subscribers (channel_id, subscriber_id) {
        channel_id -> Uuid,
        subscriber_id -> Uuid,
        seq -> Int8,
    }
}

diesel::table! {
    /// Derived index: channels followed by `user_id`, in subscription order.
    subscribed_channels (user_id, channel_id) {
        user_id -> Uuid,
        channel_id -> Uuid,
        seq -> Int8,
    }
}

diesel::joinable!(videos -> users (owner_id));
diesel::joinable!(video_reactions -> videos (video_id));
diesel::joinable!(video_views -> videos (video_id));

diesel::allow_tables_to_appear_in_same_query!(
    users,
    videos,
    video_reactions,
    video_views,
    channel_subscribers,
    subscribed_channels,
);

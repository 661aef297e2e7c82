//! Tests for the video catalogue service.

use super::*;
use crate::domain::ports::{
    MediaStorageError, MockMediaStorage, MockUserRepository, MockVideoRepository,
};
use crate::domain::{
    ChannelName, EmailAddress, ErrorCode, MediaUpload, User, UserProfile, VideoDetails,
};
use chrono::{DateTime, TimeZone, Utc};
use mockable::MockClock;
use mockall::predicate::{always, eq};
use rstest::{fixture, rstest};

struct Mocks {
    videos: MockVideoRepository,
    users: MockUserRepository,
    media: MockMediaStorage,
}

#[fixture]
fn mocks() -> Mocks {
    Mocks {
        videos: MockVideoRepository::new(),
        users: MockUserRepository::new(),
        media: MockMediaStorage::new(),
    }
}

#[fixture]
fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 14, 9, 26, 53)
        .single()
        .expect("valid timestamp")
}

fn service(
    mocks: Mocks,
    now: DateTime<Utc>,
) -> VideoCatalogueService<MockVideoRepository, MockUserRepository, MockMediaStorage> {
    let mut clock = MockClock::new();
    clock.expect_utc().return_const(now);
    VideoCatalogueService::new(
        Arc::new(mocks.videos),
        Arc::new(mocks.users),
        Arc::new(mocks.media),
        Arc::new(clock),
    )
}

fn owner() -> User {
    User::register(
        UserId::random(),
        UserProfile {
            channel_name: ChannelName::new("Owner").expect("valid name"),
            email: EmailAddress::new("owner@example.com").expect("valid email"),
            phone: None,
            logo: None,
        },
        Utc::now(),
    )
}

fn upload(kind: MediaKind, name: &str) -> MediaUpload {
    MediaUpload {
        kind,
        file_name: name.into(),
        content_type: "application/octet-stream".into(),
        bytes: vec![1, 2, 3],
    }
}

fn publish_request(owner: UserId) -> PublishVideoRequest {
    PublishVideoRequest {
        owner,
        details: VideoDetails {
            title: "Launch".into(),
            ..VideoDetails::default()
        },
        video: upload(MediaKind::Video, "launch.mp4"),
        thumbnail: upload(MediaKind::Thumbnail, "launch.png"),
    }
}

fn stored_video(owner: UserId) -> Video {
    Video::publish(
        VideoId::random(),
        owner,
        VideoDetails {
            title: "Stored".into(),
            ..VideoDetails::default()
        },
        MediaReference::new("https://cdn.example/v", "videos/v"),
        MediaReference::new("https://cdn.example/t", "thumbnails/t"),
        Utc::now(),
    )
    .expect("valid video")
}

#[rstest]
#[tokio::test]
async fn publish_stores_record_with_clock_timestamp(mut mocks: Mocks, now: DateTime<Utc>) {
    let owner = owner();
    let owner_id = owner.id();
    mocks
        .users
        .expect_find_by_id()
        .returning(move |_| Ok(Some(owner.clone())));
    mocks.media.expect_upload().times(2).returning(|upload| {
        Ok(MediaReference::new(
            format!("https://cdn.example/{}", upload.file_name),
            upload.file_name,
        ))
    });
    mocks
        .videos
        .expect_insert()
        .withf(move |video| video.created_at() == now && video.owner() == owner_id)
        .times(1)
        .returning(|_| Ok(()));

    let view = service(mocks, now)
        .publish_video(publish_request(owner_id))
        .await
        .expect("publish succeeds");

    assert_eq!(view.video_url, "https://cdn.example/launch.mp4");
    assert_eq!(view.thumbnail_url, "https://cdn.example/launch.png");
    assert_eq!(view.likes, 0);
}

#[rstest]
#[tokio::test]
async fn failed_thumbnail_upload_removes_video_asset(mut mocks: Mocks, now: DateTime<Utc>) {
    let owner = owner();
    let owner_id = owner.id();
    mocks
        .users
        .expect_find_by_id()
        .returning(move |_| Ok(Some(owner.clone())));
    mocks.media.expect_upload().returning(|upload| match upload.kind {
        MediaKind::Video => Ok(MediaReference::new("https://cdn.example/v", "videos/v")),
        _ => Err(MediaStorageError::unavailable("bucket offline")),
    });
    mocks
        .media
        .expect_delete()
        .withf(|reference, kind| reference.storage_id == "videos/v" && *kind == MediaKind::Video)
        .times(1)
        .returning(|_, _| Ok(true));
    mocks.videos.expect_insert().never();

    let error = service(mocks, now)
        .publish_video(publish_request(owner_id))
        .await
        .expect_err("thumbnail failure aborts publish");

    assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
}

#[rstest]
#[tokio::test]
async fn delete_by_non_owner_is_forbidden(mut mocks: Mocks, now: DateTime<Utc>) {
    let video = stored_video(UserId::random());
    let video_id = video.id();
    mocks
        .videos
        .expect_find_by_id()
        .returning(move |_| Ok(Some(video.clone())));
    mocks.media.expect_delete().never();
    mocks.videos.expect_delete().never();

    let error = service(mocks, now)
        .delete_video(DeleteVideoRequest {
            video_id,
            actor: UserId::random(),
        })
        .await
        .expect_err("stranger cannot delete");

    assert_eq!(error.code(), ErrorCode::Forbidden);
}

#[rstest]
#[tokio::test]
async fn delete_by_owner_removes_assets_then_record(mut mocks: Mocks, now: DateTime<Utc>) {
    let owner_id = UserId::random();
    let video = stored_video(owner_id);
    let video_id = video.id();
    let mut seq = mockall::Sequence::new();
    mocks
        .videos
        .expect_find_by_id()
        .returning(move |_| Ok(Some(video.clone())));
    mocks
        .media
        .expect_delete()
        .with(always(), eq(MediaKind::Thumbnail))
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _| Ok(true));
    mocks
        .media
        .expect_delete()
        .with(always(), eq(MediaKind::Video))
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _| Ok(true));
    mocks
        .videos
        .expect_delete()
        .with(eq(video_id))
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_| Ok(true));

    service(mocks, now)
        .delete_video(DeleteVideoRequest {
            video_id,
            actor: owner_id,
        })
        .await
        .expect("owner deletes video");
}

#[rstest]
#[tokio::test]
async fn get_video_includes_owner_summary(mut mocks: Mocks, now: DateTime<Utc>) {
    let owner = owner();
    let video = stored_video(owner.id());
    let video_id = video.id();
    mocks
        .videos
        .expect_find_by_id()
        .returning(move |_| Ok(Some(video.clone())));
    mocks
        .users
        .expect_find_by_id()
        .returning(move |_| Ok(Some(owner.clone())));

    let found = service(mocks, now)
        .get_video(video_id)
        .await
        .expect("video exists");

    assert_eq!(found.video.id, video_id);
    let summary = found.owner.expect("owner summary present");
    assert_eq!(summary.channel_name, "Owner");
}

#[rstest]
#[tokio::test]
async fn get_missing_video_is_not_found(mut mocks: Mocks, now: DateTime<Utc>) {
    mocks.videos.expect_find_by_id().returning(|_| Ok(None));

    let error = service(mocks, now)
        .get_video(VideoId::random())
        .await
        .expect_err("missing video");
    assert_eq!(error.code(), ErrorCode::NotFound);
}

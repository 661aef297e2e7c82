//! Reaction and view transitions on the video aggregate.

use super::*;
use rstest::{fixture, rstest};

#[fixture]
fn video() -> Video {
    let details = VideoDetails {
        title: "  Rust in ten minutes ".into(),
        description: "quick tour".into(),
        category: "education".into(),
        tags: vec!["rust".into()],
        duration_secs: Some(600),
    };
    Video::publish(
        VideoId::random(),
        UserId::random(),
        details,
        MediaReference::new("https://cdn.example/v.mp4", "videos/v"),
        MediaReference::new("https://cdn.example/t.png", "thumbnails/t"),
        Utc::now(),
    )
    .expect("fixture video is valid")
}

#[rstest]
fn publish_trims_title(video: Video) {
    assert_eq!(video.details().title, "Rust in ten minutes");
    assert_eq!((video.likes(), video.dislikes(), video.views()), (0, 0, 0));
}

#[rstest]
fn publish_rejects_blank_title() {
    let media = MediaReference::new("u", "s");
    let result = Video::publish(
        VideoId::random(),
        UserId::random(),
        VideoDetails {
            title: "   ".into(),
            ..VideoDetails::default()
        },
        media.clone(),
        media,
        Utc::now(),
    );
    assert_eq!(result, Err(VideoValidationError::EmptyTitle));
}

#[rstest]
#[case(1, Reaction::Liked)]
#[case(2, Reaction::None)]
#[case(3, Reaction::Liked)]
#[case(4, Reaction::None)]
fn like_parity_decides_membership(
    mut video: Video,
    #[case] presses: usize,
    #[case] expected: Reaction,
) {
    let actor = UserId::random();
    for _ in 0..presses {
        video.toggle_like(actor);
    }
    assert_eq!(video.reaction_of(&actor), expected);
    assert_eq!(video.likes(), u64::from(expected == Reaction::Liked));
}

#[rstest]
fn like_then_dislike_swaps_reaction(mut video: Video) {
    let actor = UserId::random();
    assert_eq!(video.toggle_like(actor), EngagementStatus::Liked);
    assert_eq!(video.toggle_dislike(actor), EngagementStatus::Disliked);

    assert!(video.disliked_by().contains(&actor));
    assert!(!video.liked_by().contains(&actor));
    assert_eq!((video.likes(), video.dislikes()), (0, 1));
}

#[rstest]
fn dislike_like_like_walkthrough(mut video: Video) {
    let actor = UserId::random();

    assert_eq!(video.toggle_dislike(actor), EngagementStatus::Disliked);
    assert_eq!(video.disliked_by().as_slice(), &[actor]);

    assert_eq!(video.toggle_like(actor), EngagementStatus::Liked);
    assert_eq!(video.liked_by().as_slice(), &[actor]);
    assert!(video.disliked_by().is_empty());

    assert_eq!(video.toggle_like(actor), EngagementStatus::LikeRemoved);
    assert!(video.liked_by().is_empty());
    assert_eq!((video.likes(), video.dislikes()), (0, 0));
}

#[rstest]
fn dislike_toggles_off(mut video: Video) {
    let actor = UserId::random();
    video.toggle_dislike(actor);
    assert_eq!(video.toggle_dislike(actor), EngagementStatus::DislikeRemoved);
    assert_eq!(video.reaction_of(&actor), Reaction::None);
}

#[rstest]
fn reactions_from_different_actors_accumulate(mut video: Video) {
    let (x, y) = (UserId::random(), UserId::random());
    video.toggle_like(x);
    video.toggle_like(y);
    assert_eq!(video.likes(), 2);
    assert_eq!(video.liked_by().as_slice(), &[x, y]);
}

#[rstest]
fn register_view_is_idempotent_per_actor(mut video: Video) {
    let actor = UserId::random();
    assert_eq!(video.register_view(actor), EngagementStatus::ViewIncreased);
    let after_first = video.clone();

    assert_eq!(video.register_view(actor), EngagementStatus::AlreadyViewed);
    assert_eq!(video, after_first);
    assert_eq!(video.views(), 1);
}

#[rstest]
fn apply_dispatches_mutations(mut video: Video) {
    let actor = UserId::random();
    let status = video.apply(VideoMutation::RegisterView { actor });
    assert_eq!(status.label(), "View Increased");
    let status = video.apply(VideoMutation::ToggleDislike { actor });
    assert_eq!(status.label(), "disliked");
}

#[rstest]
fn from_parts_rejects_conflicting_reactions(video: Video) {
    let actor = UserId::random();
    let parts = VideoParts {
        id: video.id(),
        owner: video.owner(),
        details: video.details().clone(),
        video: video.video().clone(),
        thumbnail: video.thumbnail().clone(),
        liked_by: vec![actor],
        disliked_by: vec![actor],
        viewed_by: Vec::new(),
        created_at: video.created_at(),
    };
    assert_eq!(
        Video::from_parts(parts),
        Err(VideoValidationError::ConflictingReaction { user: actor })
    );
}

#[rstest]
fn already_viewed_reports_no_change() {
    assert!(!EngagementStatus::AlreadyViewed.changed_state());
    assert!(EngagementStatus::LikeRemoved.changed_state());
}

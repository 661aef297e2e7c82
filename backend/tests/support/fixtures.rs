//! Seed data, signed tokens, and application wiring shared by the
//! integration suites.

use std::sync::Arc;

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};
use chrono::{Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use mockable::DefaultClock;
use vidshare::Trace;
use vidshare::domain::ports::FixtureMediaStorage;
use vidshare::domain::{
    ChannelName, EmailAddress, MediaReference, User, UserId, UserProfile, Video, VideoDetails,
    VideoId,
};
use vidshare::inbound::http::configure_api;
use vidshare::inbound::http::state::HttpState;
use vidshare::outbound::auth::{JwtCredentialVerifier, TokenClaims};
use vidshare::outbound::memory::{InMemoryUserRepository, InMemoryVideoRepository};

pub(crate) const SECRET: &[u8] = b"integration-secret-integration-secret";

pub(crate) fn user(name: &str) -> User {
    let profile = UserProfile {
        channel_name: ChannelName::new(name).expect("channel name"),
        email: EmailAddress::new(format!("{}@example.com", name.to_lowercase()))
            .expect("email"),
        phone: None,
        logo: None,
    };
    User::register(UserId::random(), profile, Utc::now())
}

pub(crate) fn video(owner: UserId, title: &str) -> Video {
    let id = VideoId::random();
    Video::publish(
        id,
        owner,
        VideoDetails {
            title: title.into(),
            ..VideoDetails::default()
        },
        MediaReference::new(format!("/media/videos/{id}.mp4"), format!("videos/{id}.mp4")),
        MediaReference::new(
            format!("/media/thumbnails/{id}.png"),
            format!("thumbnails/{id}.png"),
        ),
        Utc::now(),
    )
    .expect("valid video")
}

/// Sign an access token for `user` with the shared test secret.
pub(crate) fn token_for(user: &User) -> String {
    let claims = TokenClaims {
        id: user.id().to_string(),
        channel_name: user.channel_name().as_ref().to_owned(),
        logo_id: None,
        exp: (Utc::now() + Duration::hours(1)).timestamp(),
    };
    encode(&Header::default(), &claims, &EncodingKey::from_secret(SECRET)).expect("token encodes")
}

pub(crate) fn bearer(user: &User) -> (&'static str, String) {
    ("Authorization", format!("Bearer {}", token_for(user)))
}

/// Stores plus handler state wired through the real domain services.
pub(crate) struct Backend {
    pub(crate) videos: Arc<InMemoryVideoRepository>,
    pub(crate) users: Arc<InMemoryUserRepository>,
    pub(crate) state: HttpState,
}

pub(crate) fn backend(users: Vec<User>, videos: Vec<Video>) -> Backend {
    let videos = Arc::new(InMemoryVideoRepository::with_videos(videos));
    let users = Arc::new(InMemoryUserRepository::with_users(users));
    let state = HttpState::from_adapters(
        videos.clone(),
        users.clone(),
        Arc::new(FixtureMediaStorage),
        Arc::new(JwtCredentialVerifier::from_secret(SECRET)),
        Arc::new(DefaultClock),
    );
    Backend {
        videos,
        users,
        state,
    }
}

pub(crate) fn app(
    state: HttpState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .wrap(Trace)
        .service(web::scope("/api/v1").configure(configure_api))
}

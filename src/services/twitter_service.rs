//! Social binding orchestration: OAuth flow bookkeeping, binding storage and
//! cached engagement verification.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info};

use crate::config::Config;
use crate::db_persistence::{DbError, DbPersistence};
use crate::models::application::Application;
use crate::models::engagement_cache::EngagementKind;
use crate::models::user_twitter::{TwitterToken, TwitterUserInfo, UserTwitter};
use crate::services::session_store::{OAuthSession, SessionStore};
use crate::twitter_api::{
    ListEndpoint, OAuth2Client, TwitterApiClient, TwitterApiError, OAUTH_SCOPES,
};

#[derive(Debug, Error)]
pub enum TwitterError {
    #[error("Twitter binding not found for user {0}")]
    BindingNotFound(String),
    #[error("Session not found or expired")]
    SessionNotFoundOrExpired,
    #[error("Callback does not belong to the calling application")]
    ApplicationMismatch,
    #[error("Malformed callback state: {0}")]
    MalformedState(String),
    #[error("Application not found: {0}")]
    ApplicationNotFound(String),
    #[error(transparent)]
    Api(#[from] TwitterApiError),
    #[error(transparent)]
    Database(#[from] DbError),
}

pub type TwitterResult<T> = Result<T, TwitterError>;

/// The four engagement questions the service can answer. Each maps onto one
/// list endpoint and caches under like or retweet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngagementCheck {
    /// Is the bound account among the likers of the tweet?
    UserInTweetLikers,
    /// Is the bound account among the retweeters of the tweet?
    UserInTweetRetweeters,
    /// Is the tweet in the bound account's liked feed?
    TweetInUserLikes,
    /// Is a retweet of the tweet on the bound account's timeline?
    TweetInUserTimeline,
}

impl EngagementCheck {
    fn endpoint(self) -> ListEndpoint {
        match self {
            EngagementCheck::UserInTweetLikers => ListEndpoint::TweetLikingUsers,
            EngagementCheck::UserInTweetRetweeters => ListEndpoint::TweetRetweetingUsers,
            EngagementCheck::TweetInUserLikes => ListEndpoint::UserLikedTweets,
            EngagementCheck::TweetInUserTimeline => ListEndpoint::UserTweets,
        }
    }

    pub fn kind(self) -> EngagementKind {
        match self {
            EngagementCheck::UserInTweetLikers | EngagementCheck::TweetInUserLikes => {
                EngagementKind::Like
            }
            EngagementCheck::UserInTweetRetweeters | EngagementCheck::TweetInUserTimeline => {
                EngagementKind::Retweet
            }
        }
    }

    /// Which id the walked list belongs to and which one is searched for.
    fn subject_and_target<'a>(
        self,
        twitter_id: &'a str,
        tweet_id: &'a str,
    ) -> (&'a str, &'a str) {
        match self {
            EngagementCheck::UserInTweetLikers | EngagementCheck::UserInTweetRetweeters => {
                (tweet_id, twitter_id)
            }
            EngagementCheck::TweetInUserLikes | EngagementCheck::TweetInUserTimeline => {
                (twitter_id, tweet_id)
            }
        }
    }
}

pub struct TwitterService {
    db: Arc<DbPersistence>,
    sessions: Arc<SessionStore>,
    config: Arc<Config>,
    api: TwitterApiClient,
}

impl TwitterService {
    pub fn new(db: Arc<DbPersistence>, sessions: Arc<SessionStore>, config: Arc<Config>) -> Self {
        let api = TwitterApiClient::new(&config.twitter.api_base_url);
        Self {
            db,
            sessions,
            config,
            api,
        }
    }

    fn callback_state(application: &Application, user_key: &str) -> String {
        format!("{}_{}", application.id, user_key)
    }

    /// Splits a callback state back into its tenant and user. The tenant is
    /// re-resolved from the database so a stale id fails loudly.
    async fn parse_callback_state(&self, state: &str) -> TwitterResult<(Application, String)> {
        let (application_id, user_key) = state
            .split_once('_')
            .ok_or_else(|| TwitterError::MalformedState(state.to_string()))?;
        let application_id: i32 = application_id
            .parse()
            .map_err(|_| TwitterError::MalformedState(state.to_string()))?;

        let application = self
            .db
            .applications
            .find_by_id(application_id)
            .await?
            .ok_or_else(|| TwitterError::ApplicationNotFound(application_id.to_string()))?;

        Ok((application, user_key.to_string()))
    }

    /// Starts an OAuth flow for a user and returns the authorize URL to
    /// redirect them to.
    pub fn get_user_auth_url(
        &self,
        application: &Application,
        user_key: &str,
        callback: &str,
    ) -> TwitterResult<String> {
        let state = Self::callback_state(application, user_key);
        let client = OAuth2Client::new(&self.config.twitter, application, callback);
        let (auth_url, verifier) = client.generate_auth_url(&state)?;

        self.sessions.put(
            &state,
            OAuthSession {
                client,
                verifier,
                callback: callback.to_string(),
            },
        );
        debug!(state = %state, "stored oauth session");

        Ok(auth_url)
    }

    /// Finishes an OAuth flow. The session is consumed whether or not the
    /// exchange succeeds, so a replayed callback cannot redeem the code
    /// twice.
    pub async fn bind_callback(
        &self,
        calling_application: &Application,
        state: &str,
        code: &str,
    ) -> TwitterResult<UserTwitter> {
        let (application, user_key) = self.parse_callback_state(state).await?;
        if application.id != calling_application.id {
            return Err(TwitterError::ApplicationMismatch);
        }

        let session = self
            .sessions
            .take(state)
            .ok_or(TwitterError::SessionNotFoundOrExpired)?;

        let token = session.client.exchange_code(code, &session.verifier).await?;
        let info = self.api.lookup_me(&token.access_token).await?;
        info!(user_key = %user_key, twitter_id = %info.id, "binding twitter account");

        let scopes = OAUTH_SCOPES.iter().map(|s| s.to_string()).collect();
        let binding = UserTwitter::new(
            application.id,
            &user_key,
            &info,
            token,
            scopes,
            &session.callback,
        );

        Ok(self.db.twitters.upsert(&binding).await?)
    }

    /// Answers an engagement question with the id of the cache row backing a
    /// positive verdict, or -1 for a negative one.
    pub async fn check_engagement(
        &self,
        application: &Application,
        user_key: &str,
        tweet_id: &str,
        check: EngagementCheck,
    ) -> TwitterResult<i64> {
        let binding = self
            .db
            .twitters
            .find_by_user(application.id, user_key)
            .await?
            .ok_or_else(|| TwitterError::BindingNotFound(user_key.to_string()))?;

        let kind = check.kind();
        let fake = application.fake_verify;

        let result = if fake {
            true
        } else {
            if let Some(entry) = self
                .db
                .engagement_cache
                .find(&binding.twitter_id, tweet_id, kind)
                .await?
            {
                // A fresh row is served as-is; reads never extend the TTL
                if !entry.expired() {
                    return Ok(if entry.result { entry.id } else { -1 });
                }
            }

            let access_token = self.fresh_access_token(application, &binding).await?;
            let (subject, target) = check.subject_and_target(&binding.twitter_id, tweet_id);
            self.api
                .search_list(&access_token, check.endpoint(), subject, target)
                .await?
        };

        let entry = self
            .db
            .engagement_cache
            .upsert(&binding.twitter_id, tweet_id, kind, result, fake)
            .await?;

        Ok(if result { entry.id } else { -1 })
    }

    /// Returns a usable access token for a binding, refreshing and
    /// persisting it first when the stored one is past its expiry.
    async fn fresh_access_token(
        &self,
        application: &Application,
        binding: &UserTwitter,
    ) -> TwitterResult<String> {
        if !binding.token.expired() {
            return Ok(binding.token.access_token.clone());
        }

        let Some(refresh_token) = binding.token.refresh_token.as_deref() else {
            // Nothing to refresh with; let the API reject the stale token
            return Ok(binding.token.access_token.clone());
        };

        let client = OAuth2Client::new(&self.config.twitter, application, &binding.callback_url);
        let token: TwitterToken = client.refresh_token(refresh_token).await?;
        self.db
            .twitters
            .update_token(binding.application_id, &binding.user_key, &token)
            .await?;
        debug!(user_key = %binding.user_key, "refreshed twitter token");

        Ok(token.access_token)
    }

    pub async fn get_user_twitter_info(
        &self,
        application_id: i32,
        user_key: &str,
    ) -> TwitterResult<Option<TwitterUserInfo>> {
        let binding = self.db.twitters.find_by_user(application_id, user_key).await?;
        Ok(binding.map(|b| b.user_info()))
    }

    pub async fn destroy_twitter(&self, application_id: i32, user_key: &str) -> TwitterResult<()> {
        Ok(self.db.twitters.delete_by_user(application_id, user_key).await?)
    }

    pub async fn destroy_all_twitter(&self, application_id: i32) -> TwitterResult<()> {
        Ok(self.db.twitters.delete_all(application_id).await?)
    }
}

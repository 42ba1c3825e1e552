//! Thin client for the X v2 REST API: profile lookup and the bounded
//! membership search used by engagement verification.

use serde::Deserialize;

use crate::models::user_twitter::TwitterUserInfo;
use crate::twitter_api::oauth::status_text;
use crate::twitter_api::TwitterApiError;

/// Items requested per page.
pub const SEARCH_PAGE_SIZE: u32 = 100;

/// Hard bound on pages fetched per check. A miss within the bound is
/// reported as "not engaged", never as an error.
pub const MAX_SEARCH_DEPTH: u32 = 5;

/// The four list endpoints a membership search can run against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListEndpoint {
    /// Accounts that liked a tweet; subject is the tweet id.
    TweetLikingUsers,
    /// Accounts that retweeted a tweet; subject is the tweet id.
    TweetRetweetingUsers,
    /// Tweets an account liked; subject is the account id.
    UserLikedTweets,
    /// An account's own timeline; subject is the account id. Retweets are
    /// detected through `referenced_tweets`.
    UserTweets,
}

#[derive(Debug, Deserialize)]
struct ReferencedTweet {
    #[serde(rename = "type")]
    kind: String,
    id: String,
}

#[derive(Debug, Deserialize)]
struct ListItem {
    id: String,
    #[serde(default)]
    referenced_tweets: Option<Vec<ReferencedTweet>>,
}

#[derive(Debug, Deserialize)]
struct ListMeta {
    next_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ListResponse {
    data: Option<Vec<ListItem>>,
    meta: Option<ListMeta>,
}

#[derive(Debug, Deserialize)]
struct UserResponse {
    data: TwitterUserInfo,
}

#[derive(Debug, Clone)]
pub struct TwitterApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl TwitterApiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Fetches the profile of the account the token belongs to.
    pub async fn lookup_me(&self, access_token: &str) -> Result<TwitterUserInfo, TwitterApiError> {
        let url = format!("{}/2/users/me", self.base_url);
        let response = self
            .http
            .get(&url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| TwitterApiError::ExternalService(e.to_string()))?;

        if !response.status().is_success() {
            return Err(TwitterApiError::ExternalService(status_text(
                response.status(),
            )));
        }

        let user: UserResponse = response
            .json()
            .await
            .map_err(|e| TwitterApiError::ExternalService(e.to_string()))?;
        Ok(user.data)
    }

    /// Walks a list endpoint page by page looking for `target_id`, following
    /// `next_token` cursors for at most [`MAX_SEARCH_DEPTH`] pages. Ids are
    /// compared case-insensitively. Running out of pages or depth yields
    /// `false`.
    pub async fn search_list(
        &self,
        access_token: &str,
        endpoint: ListEndpoint,
        subject_id: &str,
        target_id: &str,
    ) -> Result<bool, TwitterApiError> {
        let target = target_id.to_lowercase();
        let mut page_token: Option<String> = None;

        for _ in 0..MAX_SEARCH_DEPTH {
            let page = self
                .fetch_page(access_token, endpoint, subject_id, page_token.as_deref())
                .await?;

            let items = page.data.unwrap_or_default();
            if items.is_empty() {
                return Ok(false);
            }

            let found = match endpoint {
                ListEndpoint::UserTweets => items.iter().any(|item| {
                    item.referenced_tweets.iter().flatten().any(|referenced| {
                        referenced.kind == "retweeted" && referenced.id.to_lowercase() == target
                    })
                }),
                _ => items.iter().any(|item| item.id.to_lowercase() == target),
            };
            if found {
                return Ok(true);
            }

            match page.meta.and_then(|meta| meta.next_token) {
                Some(next) => page_token = Some(next),
                None => return Ok(false),
            }
        }

        Ok(false)
    }

    fn endpoint_url(&self, endpoint: ListEndpoint, subject_id: &str) -> String {
        match endpoint {
            ListEndpoint::TweetLikingUsers => {
                format!("{}/2/tweets/{}/liking_users", self.base_url, subject_id)
            }
            ListEndpoint::TweetRetweetingUsers => {
                format!("{}/2/tweets/{}/retweeted_by", self.base_url, subject_id)
            }
            ListEndpoint::UserLikedTweets => {
                format!("{}/2/users/{}/liked_tweets", self.base_url, subject_id)
            }
            ListEndpoint::UserTweets => {
                format!("{}/2/users/{}/tweets", self.base_url, subject_id)
            }
        }
    }

    async fn fetch_page(
        &self,
        access_token: &str,
        endpoint: ListEndpoint,
        subject_id: &str,
        page_token: Option<&str>,
    ) -> Result<ListResponse, TwitterApiError> {
        let mut request = self
            .http
            .get(self.endpoint_url(endpoint, subject_id))
            .bearer_auth(access_token)
            .query(&[("max_results", SEARCH_PAGE_SIZE.to_string())]);

        if endpoint == ListEndpoint::UserTweets {
            request = request.query(&[
                ("exclude", "replies"),
                ("tweet.fields", "referenced_tweets"),
            ]);
        }
        if let Some(token) = page_token {
            request = request.query(&[("pagination_token", token)]);
        }

        let response = request
            .send()
            .await
            .map_err(|e| TwitterApiError::ExternalService(e.to_string()))?;

        if !response.status().is_success() {
            return Err(TwitterApiError::ExternalService(status_text(
                response.status(),
            )));
        }

        response
            .json()
            .await
            .map_err(|e| TwitterApiError::ExternalService(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_lookup_me() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/2/users/me"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": { "id": "12345", "name": "Some User", "username": "someuser" }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = TwitterApiClient::new(&server.uri());
        let info = client.lookup_me("token").await.unwrap();
        assert_eq!(info.id, "12345");
        assert_eq!(info.username, "someuser");
    }

    #[tokio::test]
    async fn test_search_finds_target_case_insensitively() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/2/tweets/999/liking_users"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [
                    { "id": "1" },
                    { "id": "ABC42" }
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = TwitterApiClient::new(&server.uri());
        let found = client
            .search_list("token", ListEndpoint::TweetLikingUsers, "999", "abc42")
            .await
            .unwrap();
        assert!(found);
    }

    #[tokio::test]
    async fn test_search_stops_at_depth_bound() {
        let server = MockServer::start().await;
        // Every page advertises another page; the search must give up after
        // exactly MAX_SEARCH_DEPTH fetches and report a miss.
        Mock::given(method("GET"))
            .and(path("/2/tweets/999/retweeted_by"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{ "id": "not-the-one" }],
                "meta": { "next_token": "cursor" }
            })))
            .expect(MAX_SEARCH_DEPTH as u64)
            .mount(&server)
            .await;

        let client = TwitterApiClient::new(&server.uri());
        let found = client
            .search_list("token", ListEndpoint::TweetRetweetingUsers, "999", "42")
            .await
            .unwrap();
        assert!(!found);
    }

    #[tokio::test]
    async fn test_search_follows_cursor_to_hit() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/2/users/77/liked_tweets"))
            .and(query_param("pagination_token", "page2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{ "id": "888" }]
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/2/users/77/liked_tweets"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{ "id": "111" }],
                "meta": { "next_token": "page2" }
            })))
            .mount(&server)
            .await;

        let client = TwitterApiClient::new(&server.uri());
        let found = client
            .search_list("token", ListEndpoint::UserLikedTweets, "77", "888")
            .await
            .unwrap();
        assert!(found);
    }

    #[tokio::test]
    async fn test_timeline_matches_referenced_retweets_only() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/2/users/77/tweets"))
            .and(query_param("tweet.fields", "referenced_tweets"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [
                    { "id": "555", "referenced_tweets": [{ "type": "quoted", "id": "888" }] },
                    { "id": "556", "referenced_tweets": [{ "type": "retweeted", "id": "888" }] }
                ]
            })))
            .mount(&server)
            .await;

        let client = TwitterApiClient::new(&server.uri());
        let found = client
            .search_list("token", ListEndpoint::UserTweets, "77", "888")
            .await
            .unwrap();
        assert!(found);

        // A quote alone is not a retweet
        let quoted_only = client
            .search_list("token", ListEndpoint::UserTweets, "77", "999")
            .await
            .unwrap();
        assert!(!quoted_only);
    }

    #[tokio::test]
    async fn test_empty_page_is_a_miss() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/2/tweets/999/liking_users"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "meta": { "result_count": 0 }
            })))
            .mount(&server)
            .await;

        let client = TwitterApiClient::new(&server.uri());
        let found = client
            .search_list("token", ListEndpoint::TweetLikingUsers, "999", "42")
            .await
            .unwrap();
        assert!(!found);
    }

    #[tokio::test]
    async fn test_upstream_rejection_surfaces_status_text() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/2/tweets/999/liking_users"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;

        let client = TwitterApiClient::new(&server.uri());
        let err = client
            .search_list("token", ListEndpoint::TweetLikingUsers, "999", "42")
            .await
            .unwrap_err();
        assert!(
            matches!(err, TwitterApiError::ExternalService(ref text) if text == "Too Many Requests")
        );
    }
}

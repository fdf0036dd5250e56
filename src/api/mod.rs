//! FreeFeed API client.
//!
//! Thin wrapper over `reqwest` that builds upstream URLs and forwards the
//! caller's `Authorization` header verbatim.

pub mod coerce;
pub mod models;

use anyhow::{Context, Result};
use reqwest::header::{HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::{Client, Response};
use tracing::debug;
use url::Url;

use crate::config::Config;
use crate::constants::USER_AGENT;

pub use models::{RawAttachment, RawComment, RawFeed, RawPage, RawPost, RawUser, WhoAmI};

/// Which slice of a user's activity a user timeline shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserTimeline {
    Posts,
    Comments,
    Likes,
}

/// Client for the upstream API.
#[derive(Clone)]
pub struct FeedApi {
    http: Client,
    base: Url,
}

impl FeedApi {
    /// Create a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the API host is not a valid base URL or the HTTP
    /// client cannot be built.
    pub fn new(config: &Config) -> Result<Self> {
        let base = Url::parse(&config.api_host)
            .with_context(|| format!("Invalid API host: {}", config.api_host))?;
        if base.cannot_be_a_base() {
            anyhow::bail!("API host cannot be used as a base URL: {base}");
        }

        let http = Client::builder()
            .timeout(config.upstream_timeout)
            .user_agent(USER_AGENT)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { http, base })
    }

    /// `GET /v2/users/whoami`
    #[must_use]
    pub fn whoami_url(&self) -> Url {
        self.endpoint(&["v2", "users", "whoami"])
    }

    /// `GET /v2/timelines/home`
    #[must_use]
    pub fn home_url(&self, offset: u64) -> Url {
        let mut url = self.endpoint(&["v2", "timelines", "home"]);
        url.query_pairs_mut()
            .append_pair("offset", &offset.to_string());
        url
    }

    /// `GET /v2/search`
    #[must_use]
    pub fn search_url(&self, query: &str, offset: u64) -> Url {
        let mut url = self.endpoint(&["v2", "search"]);
        url.query_pairs_mut()
            .append_pair("qs", query)
            .append_pair("offset", &offset.to_string());
        url
    }

    /// `GET /v2/timelines/filter/discussions`, including the viewer's own posts.
    #[must_use]
    pub fn discussions_url(&self, offset: u64) -> Url {
        let mut url = self.endpoint(&["v2", "timelines", "filter", "discussions"]);
        url.query_pairs_mut()
            .append_pair("with-my-posts", "yes")
            .append_pair("offset", &offset.to_string());
        url
    }

    /// `GET /v2/timelines/filter/directs`
    #[must_use]
    pub fn directs_url(&self, offset: u64) -> Url {
        let mut url = self.endpoint(&["v2", "timelines", "filter", "directs"]);
        url.query_pairs_mut()
            .append_pair("offset", &offset.to_string());
        url
    }

    /// `GET /v2/timelines/:username[/comments|/likes]`
    #[must_use]
    pub fn user_timeline_url(&self, username: &str, timeline: UserTimeline, offset: u64) -> Url {
        let mut url = match timeline {
            UserTimeline::Posts => self.endpoint(&["v2", "timelines", username]),
            UserTimeline::Comments => self.endpoint(&["v2", "timelines", username, "comments"]),
            UserTimeline::Likes => self.endpoint(&["v2", "timelines", username, "likes"]),
        };
        url.query_pairs_mut()
            .append_pair("offset", &offset.to_string());
        url
    }

    /// `GET /v2/posts/:id` with every comment expanded.
    #[must_use]
    pub fn post_url(&self, post_id: &str, max_likes: Option<&str>) -> Url {
        let mut url = self.endpoint(&["v2", "posts", post_id]);
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("maxComments", "all");
            if let Some(max_likes) = max_likes {
                query.append_pair("maxLikes", max_likes);
            }
        }
        url
    }

    /// Issue a GET, forwarding the inbound auth header when present.
    ///
    /// Non-success statuses are returned as-is; only transport failures are
    /// errors.
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be sent or times out.
    pub async fn get(&self, url: &Url, auth: Option<&HeaderValue>) -> reqwest::Result<Response> {
        debug!(url = %url, authenticated = auth.is_some(), "Fetching upstream");

        let mut request = self.http.get(url.clone()).header(ACCEPT, "application/json");
        if let Some(auth) = auth {
            request = request.header(AUTHORIZATION, auth.clone());
        }
        request.send().await
    }

    /// Append path segments (percent-encoded) to the base URL.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}

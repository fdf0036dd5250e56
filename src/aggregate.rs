//! Page aggregation: fetch the viewer and the page, normalize, and apply the
//! fallback policy when the page fetch fails.

use indexmap::IndexMap;
use reqwest::header::HeaderValue;
use reqwest::{Response, StatusCode};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};
use url::Url;

use crate::api::models::{ErrorBody, RawFeed, RawPage, WhoAmI};
use crate::api::FeedApi;
use crate::format::{
    add_subscription_info_to_users, format_user, key_by_id, key_by_id_and_map,
    pick_required_users, Attachment, Comment, Post, PostEntry, UnavailablePost, User,
};

#[derive(Debug, Error)]
pub enum AggregateError {
    /// The page fetch failed and there is no single entity to degrade.
    #[error("{message}")]
    Upstream { status: StatusCode, message: String },
    #[error("upstream request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("failed to decode {what} response: {source}")]
    Decode {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// What a page is about; decides how a failed page fetch is handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageScope {
    /// Home, search, discussions, directs. Failures are fatal.
    Timeline,
    /// A user's posts, comments or likes. The user gets the fuller projection.
    User { username: String },
    /// A single post. Failures become an error entry for the post.
    Post { post_id: String },
    /// Only the viewer; no page is fetched.
    ViewerOnly,
}

impl PageScope {
    /// Username of the page subject, if any.
    #[must_use]
    pub fn chosen_one(&self) -> Option<&str> {
        match self {
            Self::User { username } => Some(username),
            _ => None,
        }
    }
}

/// One inbound page request.
#[derive(Debug, Clone)]
pub struct PageRequest {
    page_url: Option<Url>,
    auth: Option<HeaderValue>,
    scope: PageScope,
}

impl PageRequest {
    #[must_use]
    pub fn timeline(url: Url) -> Self {
        Self::new(Some(url), PageScope::Timeline)
    }

    #[must_use]
    pub fn user(url: Url, username: impl Into<String>) -> Self {
        Self::new(
            Some(url),
            PageScope::User {
                username: username.into(),
            },
        )
    }

    #[must_use]
    pub fn post(url: Url, post_id: impl Into<String>) -> Self {
        Self::new(
            Some(url),
            PageScope::Post {
                post_id: post_id.into(),
            },
        )
    }

    #[must_use]
    pub fn viewer_only() -> Self {
        Self::new(None, PageScope::ViewerOnly)
    }

    /// Forward this `Authorization` header value upstream.
    #[must_use]
    pub fn with_auth(mut self, auth: Option<HeaderValue>) -> Self {
        self.auth = auth;
        self
    }

    #[must_use]
    pub fn scope(&self) -> &PageScope {
        &self.scope
    }

    fn new(page_url: Option<Url>, scope: PageScope) -> Self {
        Self {
            page_url,
            auth: None,
            scope,
        }
    }
}

/// Normalized response for one page.
///
/// Collections are `None` when the upstream payload did not include them.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Envelope {
    pub me: Option<User>,
    pub attachments: Option<IndexMap<String, Attachment>>,
    pub comments: Option<IndexMap<String, Comment>>,
    pub feeds: Option<IndexMap<String, RawFeed>>,
    pub posts: Option<IndexMap<String, PostEntry>>,
    pub users: IndexMap<String, User>,
}

impl Envelope {
    /// Envelope with empty collections and only the viewer (if any) in `users`.
    fn viewer_only(me: Option<User>) -> Self {
        let users = me
            .iter()
            .map(|me| (me.id.clone(), me.clone()))
            .collect();
        Self {
            me,
            attachments: Some(IndexMap::new()),
            comments: Some(IndexMap::new()),
            feeds: Some(IndexMap::new()),
            posts: Some(IndexMap::new()),
            users,
        }
    }
}

enum PageOutcome {
    Loaded(RawPage),
    Failed { status: StatusCode, message: String },
}

/// Fetch the viewer and the page concurrently and build the envelope.
///
/// # Errors
///
/// Returns an error when either request fails at the transport level, when a
/// successful response cannot be decoded, or when a timeline page fails
/// upstream.
pub async fn load_and_format(
    api: &FeedApi,
    request: &PageRequest,
) -> Result<Envelope, AggregateError> {
    let auth = request.auth.as_ref();
    let whoami_url = api.whoami_url();

    let (viewer_response, page_response) = tokio::join!(api.get(&whoami_url, auth), async {
        match &request.page_url {
            Some(url) => Some(api.get(url, auth).await),
            None => None,
        }
    });
    let viewer_response = viewer_response?;
    let page_response = page_response.transpose()?;

    let (viewer, page) = tokio::join!(read_viewer(viewer_response), read_page(page_response));
    let viewer = viewer?;
    let me = format_user(viewer.users.as_ref(), false);

    match page? {
        PageOutcome::Loaded(page) => Ok(assemble(&page, &request.scope, &viewer, me)),
        PageOutcome::Failed { status, message } => fallback(&request.scope, me, status, message),
    }
}

fn assemble(page: &RawPage, scope: &PageScope, viewer: &WhoAmI, me: Option<User>) -> Envelope {
    let attachments = key_by_id_and_map(page.attachments.as_deref(), Attachment::from);
    let comments = key_by_id_and_map(page.comments.as_deref(), Comment::from);
    let feeds = key_by_id(page.subscriptions.as_deref());
    let posts = key_by_id_and_map(page.posts.as_deref(), |post| {
        PostEntry::Post(Post::from(post))
    });

    let mut users = pick_required_users(page, scope.chosen_one());
    if let Some(me) = &me {
        users
            .entry(me.id.clone())
            .or_insert_with(|| me.clone());
        add_subscription_info_to_users(&mut users, viewer);
    }

    Envelope {
        me,
        attachments,
        comments,
        feeds,
        posts,
        users,
    }
}

fn fallback(
    scope: &PageScope,
    me: Option<User>,
    status: StatusCode,
    message: String,
) -> Result<Envelope, AggregateError> {
    match scope {
        PageScope::User { username } => {
            info!(username = %username, status = %status, message = %message, "User page unavailable, returning viewer only");
            Ok(Envelope::viewer_only(me))
        }
        PageScope::ViewerOnly => Ok(Envelope::viewer_only(me)),
        PageScope::Post { post_id } => {
            info!(post_id = %post_id, status = %status, message = %message, "Post unavailable, returning error entry");
            let mut envelope = Envelope::viewer_only(me);
            let entry = PostEntry::Unavailable(UnavailablePost {
                error_code: status.as_u16(),
                error_message: message,
            });
            envelope
                .posts
                .get_or_insert_with(IndexMap::new)
                .insert(post_id.clone(), entry);
            Ok(envelope)
        }
        PageScope::Timeline => {
            warn!(status = %status, message = %message, "Timeline fetch failed");
            Err(AggregateError::Upstream { status, message })
        }
    }
}

/// Decode the whoami response. Anything but a success means an anonymous viewer.
async fn read_viewer(response: Response) -> Result<WhoAmI, AggregateError> {
    let status = response.status();
    if !status.is_success() {
        debug!(status = %status, "Viewer not authenticated");
        return Ok(WhoAmI::default());
    }

    let body = response.bytes().await?;
    serde_json::from_slice(&body).map_err(|source| AggregateError::Decode {
        what: "whoami",
        source,
    })
}

/// Decode the page response. A skipped page fetch counts as an empty page.
async fn read_page(response: Option<Response>) -> Result<PageOutcome, AggregateError> {
    let Some(response) = response else {
        return Ok(PageOutcome::Loaded(RawPage::default()));
    };

    let status = response.status();
    let body = response.bytes().await?;

    if status.is_success() {
        let page = serde_json::from_slice(&body).map_err(|source| AggregateError::Decode {
            what: "page",
            source,
        })?;
        return Ok(PageOutcome::Loaded(page));
    }

    let message = serde_json::from_slice::<ErrorBody>(&body)
        .ok()
        .and_then(|body| body.err)
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("Upstream request failed")
                .to_string()
        });
    Ok(PageOutcome::Failed { status, message })
}

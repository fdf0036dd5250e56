use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use super::AppState;
use crate::aggregate::{load_and_format, AggregateError, Envelope, PageRequest};
use crate::api::UserTimeline;

/// Create the router with all routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/homepage", get(home_page))
        .route("/searchpage", get(search_page))
        .route("/discussionspage", get(discussions_page))
        .route("/directspage", get(directs_page))
        .route("/userpage/:username", get(user_page))
        .route("/usercommentspage/:username", get(user_comments_page))
        .route("/userlikespage/:username", get(user_likes_page))
        .route("/postpage/:post_id", get(post_page))
        .route("/mepage", get(me_page))
        .route("/healthz", get(health))
}

/// Error returned to the client when a page cannot be built.
#[derive(Debug)]
pub enum ApiError {
    BadGateway(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::BadGateway(message) => {
                (StatusCode::BAD_GATEWAY, Json(ErrorResponse { message })).into_response()
            }
        }
    }
}

impl From<AggregateError> for ApiError {
    fn from(err: AggregateError) -> Self {
        match &err {
            AggregateError::Upstream { status, .. } => {
                tracing::warn!(status = %status, "Upstream page failure: {err}");
            }
            AggregateError::Transport(_) | AggregateError::Decode { .. } => {
                tracing::error!("Failed to load page: {err}");
            }
        }
        Self::BadGateway(err.to_string())
    }
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    message: String,
}

#[derive(Debug, Deserialize)]
pub struct PageParams {
    offset: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    q: Option<String>,
    offset: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PostParams {
    #[serde(rename = "maxLikes")]
    max_likes: Option<String>,
}

type PageResult = Result<Json<Envelope>, ApiError>;

async fn home_page(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<PageParams>,
) -> PageResult {
    let url = state.api.home_url(parse_offset(params.offset.as_deref()));
    render(&state, PageRequest::timeline(url), &headers).await
}

async fn search_page(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<SearchParams>,
) -> PageResult {
    let query = params.q.unwrap_or_default();
    let url = state
        .api
        .search_url(&query, parse_offset(params.offset.as_deref()));
    render(&state, PageRequest::timeline(url), &headers).await
}

async fn discussions_page(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<PageParams>,
) -> PageResult {
    let url = state
        .api
        .discussions_url(parse_offset(params.offset.as_deref()));
    render(&state, PageRequest::timeline(url), &headers).await
}

async fn directs_page(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<PageParams>,
) -> PageResult {
    let url = state.api.directs_url(parse_offset(params.offset.as_deref()));
    render(&state, PageRequest::timeline(url), &headers).await
}

async fn user_page(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(username): Path<String>,
    Query(params): Query<PageParams>,
) -> PageResult {
    user_timeline(&state, &headers, username, UserTimeline::Posts, &params).await
}

async fn user_comments_page(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(username): Path<String>,
    Query(params): Query<PageParams>,
) -> PageResult {
    user_timeline(&state, &headers, username, UserTimeline::Comments, &params).await
}

async fn user_likes_page(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(username): Path<String>,
    Query(params): Query<PageParams>,
) -> PageResult {
    user_timeline(&state, &headers, username, UserTimeline::Likes, &params).await
}

async fn post_page(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(post_id): Path<String>,
    Query(params): Query<PostParams>,
) -> PageResult {
    let url = state.api.post_url(&post_id, params.max_likes.as_deref());
    render(&state, PageRequest::post(url, post_id), &headers).await
}

async fn me_page(State(state): State<AppState>, headers: HeaderMap) -> PageResult {
    render(&state, PageRequest::viewer_only(), &headers).await
}

async fn health() -> &'static str {
    "OK"
}

async fn user_timeline(
    state: &AppState,
    headers: &HeaderMap,
    username: String,
    timeline: UserTimeline,
    params: &PageParams,
) -> PageResult {
    let url = state.api.user_timeline_url(
        &username,
        timeline,
        parse_offset(params.offset.as_deref()),
    );
    render(state, PageRequest::user(url, username), headers).await
}

async fn render(state: &AppState, request: PageRequest, headers: &HeaderMap) -> PageResult {
    let request = request.with_auth(forwarded_auth(headers));
    let envelope = load_and_format(&state.api, &request).await?;
    Ok(Json(envelope))
}

/// The inbound `Authorization` header, forwarded upstream as-is.
fn forwarded_auth(headers: &HeaderMap) -> Option<HeaderValue> {
    headers.get(header::AUTHORIZATION).cloned()
}

/// Lenient paging offset: missing or non-numeric means the first page.
fn parse_offset(raw: Option<&str>) -> u64 {
    raw.and_then(|s| s.trim().parse().ok()).unwrap_or(0)
}

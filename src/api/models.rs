//! Raw payloads as returned by the FreeFeed API.
//!
//! Field names follow the upstream camelCase JSON. Loosely typed values are
//! coerced on the way in (see [`super::coerce`]); anything the aggregator
//! does not read is ignored, except on feeds which are passed through.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::coerce;

/// Account type of a user record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    #[default]
    User,
    Group,
    /// Any type this service does not know about.
    #[serde(other)]
    Unknown,
}

/// A user or group record.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawUser {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default, rename = "type", deserialize_with = "coerce::null_as_default")]
    pub kind: AccountType,
    #[serde(default)]
    pub screen_name: Option<String>,
    #[serde(default)]
    pub profile_picture_large_url: Option<String>,
    #[serde(default, deserialize_with = "coerce::truthy")]
    pub is_gone: bool,
    #[serde(default, deserialize_with = "coerce::flag")]
    pub is_private: bool,
    #[serde(default, deserialize_with = "coerce::flag")]
    pub is_protected: bool,
    #[serde(default, deserialize_with = "coerce::flag")]
    pub is_restricted: bool,
    #[serde(default, deserialize_with = "coerce::null_as_default")]
    pub administrators: Vec<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Stat name to value; values are usually numeric strings.
    #[serde(default)]
    pub statistics: Option<Map<String, Value>>,
}

/// A subscription/timeline record ("feed").
///
/// Only `id` and the owning `user` are read; every other field is kept
/// verbatim so the record can be handed to the client unchanged.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RawFeed {
    #[serde(default)]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPost {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub short_id: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub created_by: Option<String>,
    #[serde(default, deserialize_with = "coerce::number")]
    pub created_at: i64,
    #[serde(default, deserialize_with = "coerce::null_as_default")]
    pub posted_to: Vec<String>,
    #[serde(default, deserialize_with = "coerce::null_as_default")]
    pub attachments: Vec<String>,
    #[serde(default, deserialize_with = "coerce::null_as_default")]
    pub likes: Vec<String>,
    #[serde(default, deserialize_with = "coerce::number")]
    pub omitted_likes: i64,
    #[serde(default, deserialize_with = "coerce::null_as_default")]
    pub comments: Vec<String>,
    #[serde(default, deserialize_with = "coerce::number")]
    pub omitted_comments: i64,
    #[serde(default, deserialize_with = "coerce::number")]
    pub omitted_comment_likes: i64,
    #[serde(default, deserialize_with = "coerce::flag")]
    pub comments_disabled: bool,
    #[serde(default, deserialize_with = "coerce::number")]
    pub backlinks_count: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawComment {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub created_by: Option<String>,
    #[serde(default, deserialize_with = "coerce::number")]
    pub created_at: i64,
    #[serde(default, deserialize_with = "coerce::number")]
    pub seq_number: i64,
    /// Non-zero when the comment is hidden (deleted, banned author, ...).
    #[serde(default, deserialize_with = "coerce::number")]
    pub hide_type: i64,
    #[serde(default, deserialize_with = "coerce::number")]
    pub likes: i64,
    #[serde(default, deserialize_with = "coerce::truthy")]
    pub has_own_like: bool,
}

/// One size variant of an image attachment.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImageSize {
    #[serde(default, deserialize_with = "coerce::optional_number")]
    pub w: Option<i64>,
    #[serde(default, deserialize_with = "coerce::optional_number")]
    pub h: Option<i64>,
    #[serde(default)]
    pub url: Option<String>,
}

/// Size variants: `t` thumbnail, `t2` double-resolution thumbnail, `o` original.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImageSizes {
    #[serde(default)]
    pub t: Option<ImageSize>,
    #[serde(default)]
    pub t2: Option<ImageSize>,
    #[serde(default)]
    pub o: Option<ImageSize>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawAttachment {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub media_type: Option<String>,
    #[serde(default)]
    pub file_name: Option<String>,
    /// Kept verbatim; the API sends it as a string or a number.
    #[serde(default)]
    pub file_size: Option<Value>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    #[serde(default, deserialize_with = "coerce::null_as_default")]
    pub image_sizes: ImageSizes,
}

impl RawAttachment {
    #[must_use]
    pub fn is_image(&self) -> bool {
        self.media_type.as_deref() == Some("image")
    }
}

/// Single-post pages return one record where timelines return a list.
///
/// `Many` is tried first: the record structs would also accept a JSON array.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    Many(Vec<T>),
    One(Box<T>),
}

impl<T> OneOrMany<T> {
    #[must_use]
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Self::One(item) => vec![*item],
            Self::Many(items) => items,
        }
    }
}

/// Page payload: a timeline, search result or single post.
///
/// A collection missing from the payload stays `None` so the envelope can
/// report it as absent rather than empty.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawPage {
    #[serde(default)]
    pub attachments: Option<Vec<RawAttachment>>,
    #[serde(default)]
    pub comments: Option<Vec<RawComment>>,
    #[serde(default)]
    pub subscriptions: Option<Vec<RawFeed>>,
    #[serde(default, deserialize_with = "posts")]
    pub posts: Option<Vec<RawPost>>,
    #[serde(default)]
    pub users: Option<Vec<RawUser>>,
    #[serde(default)]
    pub subscribers: Option<Vec<RawUser>>,
}

fn posts<'de, D>(deserializer: D) -> Result<Option<Vec<RawPost>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<OneOrMany<RawPost>>::deserialize(deserializer)?.map(OneOrMany::into_vec))
}

/// Payload of `GET /v2/users/whoami`.
///
/// `users` is the viewer's own record and is absent for anonymous requests.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WhoAmI {
    #[serde(default)]
    pub users: Option<RawUser>,
    #[serde(default, deserialize_with = "coerce::null_as_default")]
    pub subscriptions: Vec<RawFeed>,
}

/// Error body of a failed API call.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub err: Option<String>,
}

use serde::Serialize;

use crate::api::models::RawPost;

/// Normalized post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    pub short_id: Option<String>,
    pub body: Option<String>,
    pub author_id: Option<String>,
    pub created_at: i64,
    pub recipient_feed_ids: Vec<String>,
    pub attachment_ids: Vec<String>,
    pub liker_ids: Vec<String>,
    pub omitted_likes: i64,
    pub comment_ids: Vec<String>,
    pub omitted_comments: i64,
    pub omitted_comment_likes: i64,
    pub are_comments_disabled: bool,
    pub backlinks_count: i64,
}

impl From<&RawPost> for Post {
    fn from(post: &RawPost) -> Self {
        Self {
            id: post.id.clone(),
            short_id: post.short_id.clone(),
            body: post.body.clone(),
            author_id: post.created_by.clone(),
            created_at: post.created_at,
            recipient_feed_ids: post.posted_to.clone(),
            attachment_ids: post.attachments.clone(),
            liker_ids: post.likes.clone(),
            omitted_likes: post.omitted_likes,
            comment_ids: post.comments.clone(),
            omitted_comments: post.omitted_comments,
            omitted_comment_likes: post.omitted_comment_likes,
            are_comments_disabled: post.comments_disabled,
            backlinks_count: post.backlinks_count,
        }
    }
}

/// Stand-in for a post the upstream refused to return.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnavailablePost {
    pub error_code: u16,
    pub error_message: String,
}

/// Value of the envelope's `posts` mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PostEntry {
    Post(Post),
    Unavailable(UnavailablePost),
}

impl PostEntry {
    #[must_use]
    pub fn as_post(&self) -> Option<&Post> {
        match self {
            Self::Post(post) => Some(post),
            Self::Unavailable(_) => None,
        }
    }
}

/// Format a raw post; `None` in, `None` out.
#[must_use]
pub fn format_post(post: Option<&RawPost>) -> Option<Post> {
    post.map(Post::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_format_post() {
        let raw: RawPost = serde_json::from_value(json!({
            "id": "p1",
            "shortId": "abc123",
            "body": "Hello",
            "createdBy": "u1",
            "createdAt": "1700000000000",
            "postedTo": ["f1"],
            "attachments": ["a1"],
            "likes": ["u2", "u3"],
            "omittedLikes": 5,
            "comments": ["c1"],
            "omittedComments": "2",
            "omittedCommentLikes": "1",
            "commentsDisabled": "1",
            "backlinksCount": 4
        }))
        .unwrap();

        assert_eq!(
            serde_json::to_value(format_post(Some(&raw)).unwrap()).unwrap(),
            json!({
                "id": "p1",
                "shortId": "abc123",
                "body": "Hello",
                "authorId": "u1",
                "createdAt": 1_700_000_000_000_i64,
                "recipientFeedIds": ["f1"],
                "attachmentIds": ["a1"],
                "likerIds": ["u2", "u3"],
                "omittedLikes": 5,
                "commentIds": ["c1"],
                "omittedComments": 2,
                "omittedCommentLikes": 1,
                "areCommentsDisabled": true,
                "backlinksCount": 4
            })
        );
    }

    #[test]
    fn test_comments_enabled_unless_one() {
        let raw: RawPost =
            serde_json::from_value(json!({ "id": "p1", "commentsDisabled": "0" })).unwrap();
        assert!(!Post::from(&raw).are_comments_disabled);
    }

    #[test]
    fn test_none_is_none() {
        assert_eq!(format_post(None), None);
    }

    #[test]
    fn test_unavailable_entry_shape() {
        let entry = PostEntry::Unavailable(UnavailablePost {
            error_code: 404,
            error_message: "Not found".to_string(),
        });
        assert_eq!(
            serde_json::to_value(&entry).unwrap(),
            json!({ "errorCode": 404, "errorMessage": "Not found" })
        );
        assert!(entry.as_post().is_none());
    }
}

//! Normalization of raw API records into client-facing shapes.

mod attachment;
mod comment;
mod keying;
mod post;
mod user;
mod users;

pub use attachment::{format_attachment, Attachment, ImageDetails};
pub use comment::{format_comment, Comment};
pub use keying::{key_by_id, key_by_id_and_map, Identified};
pub use post::{format_post, Post, PostEntry, UnavailablePost};
pub use user::{format_user, User};
pub use users::{add_subscription_info_to_users, pick_required_users};

//! Selecting and annotating the users a page needs.

use std::collections::HashSet;

use indexmap::IndexMap;
use tracing::debug;

use super::user::User;
use crate::api::models::{RawPage, WhoAmI};

/// A required user id before and after lookup.
#[derive(Debug, Clone, PartialEq)]
enum Candidate {
    Unresolved,
    Resolved(User),
}

/// Pick the users referenced by a page and format them.
///
/// Ids are collected from comment authors, feed owners, post authors and
/// likers, then resolved against `users` and finally `subscribers`. The page
/// subject (`chosen_one`) is always included with the fuller projection when
/// it appears in `users`, even if nothing on the page references it.
///
/// Ids that neither collection can resolve are dropped.
#[must_use]
pub fn pick_required_users(page: &RawPage, chosen_one: Option<&str>) -> IndexMap<String, User> {
    let mut required: IndexMap<String, Candidate> = IndexMap::new();
    let mut require = |id: &str| {
        if !id.is_empty() {
            required.entry(id.to_string()).or_insert(Candidate::Unresolved);
        }
    };

    for comment in page.comments.iter().flatten() {
        require(comment.created_by.as_deref().unwrap_or_default());
    }
    for feed in page.subscriptions.iter().flatten() {
        require(feed.user.as_deref().unwrap_or_default());
    }
    for post in page.posts.iter().flatten() {
        require(post.created_by.as_deref().unwrap_or_default());
        for liker in &post.likes {
            require(liker);
        }
    }

    for user in page.users.iter().flatten() {
        if let Some(candidate) = required.get_mut(&user.id) {
            *candidate = Candidate::Resolved(User::from_raw(user, false));
        }
        if chosen_one.is_some() && user.username.as_deref() == chosen_one {
            required.insert(user.id.clone(), Candidate::Resolved(User::from_raw(user, true)));
        }
    }

    for user in page.subscribers.iter().flatten() {
        if let Some(candidate) = required.get_mut(&user.id) {
            if matches!(candidate, Candidate::Unresolved) {
                *candidate = Candidate::Resolved(User::from_raw(user, false));
            }
        }
    }

    required
        .into_iter()
        .filter_map(|(id, candidate)| match candidate {
            Candidate::Resolved(user) => Some((id, user)),
            Candidate::Unresolved => {
                debug!(user_id = %id, "Referenced user not present in payload, dropping");
                None
            }
        })
        .collect()
}

/// Mark every user the viewer is subscribed to.
///
/// Only existing entries are touched; ids that are not in `users` are ignored.
pub fn add_subscription_info_to_users(users: &mut IndexMap<String, User>, viewer: &WhoAmI) {
    let subscribed: HashSet<&str> = viewer
        .subscriptions
        .iter()
        .filter_map(|s| s.user.as_deref())
        .collect();

    for (id, user) in users.iter_mut() {
        if subscribed.contains(id.as_str()) {
            user.am_i_subscribed = Some(true);
        }
    }
}

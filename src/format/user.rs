use serde::Serialize;
use serde_json::{Map, Number};

use crate::api::coerce::number_value;
use crate::api::models::{AccountType, RawUser};

/// Normalized user or group.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub username: Option<String>,
    #[serde(rename = "type")]
    pub kind: AccountType,
    pub display_name: Option<String>,
    pub userpic_url: Option<String>,
    pub is_gone: bool,
    pub is_private: bool,
    pub is_protected: bool,
    /// Groups only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub administrators: Option<Vec<String>>,
    /// Groups only, and only when the group is restricted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_restricted: Option<bool>,
    /// Fuller projection only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Fuller projection only. Values the API sent as non-numbers are `null`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statistics: Option<Map<String, serde_json::Value>>,
    #[serde(rename = "amISubscribed", skip_serializing_if = "Option::is_none")]
    pub am_i_subscribed: Option<bool>,
}

impl User {
    /// Standard projection, or the fuller one (with description and statistics).
    #[must_use]
    pub fn from_raw(user: &RawUser, fuller: bool) -> Self {
        let is_group = user.kind == AccountType::Group;

        let mut formatted = Self {
            id: user.id.clone(),
            username: user.username.clone(),
            kind: user.kind,
            display_name: user.screen_name.clone(),
            userpic_url: user.profile_picture_large_url.clone(),
            is_gone: user.is_gone,
            is_private: user.is_private,
            is_protected: user.is_protected,
            administrators: is_group.then(|| user.administrators.clone()),
            is_restricted: (is_group && user.is_restricted).then_some(true),
            description: None,
            statistics: None,
            am_i_subscribed: None,
        };

        if fuller {
            formatted.description.clone_from(&user.description);
            formatted.statistics = Some(
                user.statistics
                    .iter()
                    .flatten()
                    .map(|(name, value)| {
                        let value = number_value(value)
                            .map_or(serde_json::Value::Null, serde_json::Value::Number);
                        (name.clone(), value)
                    })
                    .collect(),
            );
        }

        formatted
    }

    /// Whether this record carries the fuller projection.
    #[must_use]
    pub fn is_fuller(&self) -> bool {
        self.statistics.is_some()
    }

    /// Numeric statistic by name, if present and numeric.
    #[must_use]
    pub fn statistic(&self, name: &str) -> Option<&Number> {
        self.statistics.as_ref()?.get(name)?.as_number()
    }
}

/// Format a raw user; `None` in, `None` out.
#[must_use]
pub fn format_user(user: Option<&RawUser>, fuller: bool) -> Option<User> {
    user.map(|u| User::from_raw(u, fuller))
}

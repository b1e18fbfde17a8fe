use notedesk_core::{FollowStatus, FollowerPage, FollowerRecord};
use serde_json::Value;

use super::{field, timestamp};

/// Message type of a "started following you" notification.
pub const FOLLOW_MESSAGE: &str = "follow/you";

/// Decodes the `data` of a `you/connections` response.
///
/// Only `follow/you` messages are kept; other connection notifications are
/// dropped.
pub fn parse_followers(data: &Value) -> FollowerPage {
    let followers = data
        .get("message_list")
        .and_then(Value::as_array)
        .map(|messages| {
            messages
                .iter()
                .filter(|m| m.get("type").and_then(Value::as_str) == Some(FOLLOW_MESSAGE))
                .map(parse_message)
                .collect()
        })
        .unwrap_or_default();

    FollowerPage {
        followers,
        has_more: data.get("has_more").and_then(Value::as_bool).unwrap_or(false),
        cursor: field(data, "cursor"),
    }
}

fn parse_message(message: &Value) -> FollowerRecord {
    let user = message.get("user").unwrap_or(&Value::Null);

    FollowerRecord {
        user_id: field(user, "userid"),
        nickname: field(user, "nickname"),
        avatar: field(user, "images"),
        follow_status: FollowStatus::from_platform(&field(user, "fstatus")),
        followed_at: message.get("time").and_then(timestamp),
    }
}

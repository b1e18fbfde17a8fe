use notedesk_core::{NoteSummary, SelfInfo};
use serde_json::Value;

use super::{count, field, object_or_encoded, timestamp};

/// Notes decoded from a `user_posted` page, plus the xsec tokens they carried.
#[derive(Debug, Clone, Default)]
pub struct ParsedNotes {
    pub notes: Vec<NoteSummary>,
    pub tokens: Vec<(String, String)>,
    pub has_more: bool,
    pub cursor: String,
}

/// Decodes the `data` of a `user_posted` response.
///
/// Entries without a note id are skipped.
pub fn parse_user_notes(data: &Value) -> ParsedNotes {
    let mut parsed = ParsedNotes {
        has_more: data.get("has_more").and_then(Value::as_bool).unwrap_or(false),
        cursor: field(data, "cursor"),
        ..ParsedNotes::default()
    };

    let Some(entries) = data.get("notes").and_then(Value::as_array) else {
        return parsed;
    };

    for entry in entries {
        let note_id = field(entry, "note_id");
        if note_id.is_empty() {
            continue;
        }

        let token = field(entry, "xsec_token");
        if !token.is_empty() {
            parsed.tokens.push((note_id.clone(), token));
        }

        let interact = object_or_encoded(entry.get("interact_info"));
        let mut title = field(entry, "display_title");
        if title.is_empty() {
            title = field(entry, "title");
        }
        if title.is_empty() {
            title = "Untitled".to_string();
        }

        parsed.notes.push(NoteSummary {
            note_id,
            title,
            desc: field(entry, "desc"),
            cover: cover_url(entry.get("cover").unwrap_or(&Value::Null)),
            likes: interact.get("liked_count").map(count).unwrap_or_default(),
            time: entry.get("time").and_then(timestamp),
        });
    }

    parsed
}

/// First `info_list` url, else `url_default`, else `url`.
fn cover_url(cover: &Value) -> String {
    let from_list = cover
        .get("info_list")
        .and_then(Value::as_array)
        .and_then(|list| list.first())
        .map(|info| field(info, "url"))
        .filter(|url| !url.is_empty());

    from_list
        .or_else(|| Some(field(cover, "url_default")).filter(|url| !url.is_empty()))
        .unwrap_or_else(|| field(cover, "url"))
}

/// Decodes the `data` of a `user/me` response.
pub fn parse_self_info(data: &Value) -> SelfInfo {
    let mut avatar = field(data, "images");
    if avatar.is_empty() {
        avatar = field(data, "imageb");
    }

    SelfInfo {
        user_id: field(data, "user_id"),
        nickname: field(data, "nickname"),
        avatar,
    }
}

use notedesk_core::{Comment, InteractStats, NoteDetail};
use serde_json::Value;

use super::{count, field, object_or_encoded, timestamp};

/// Image scene holding the full-size watermarked rendition.
const DEFAULT_SCENE: &str = "WB_DFT";

/// Decodes the `data` of a `feed` response.
///
/// Returns the first item's note card, or `None` when the platform returned
/// no items (deleted, private or unknown note).
pub fn parse_feed(data: &Value) -> Option<&Value> {
    data.get("items")
        .and_then(Value::as_array)
        .and_then(|items| items.first())
        .and_then(|item| item.get("note_card"))
        .filter(|card| card.is_object())
}

/// Decodes a note card into a detail record without comments.
pub fn parse_note_card(note_id: &str, card: &Value) -> NoteDetail {
    let interact = object_or_encoded(card.get("interact_info"));
    let stat = |key: &str| interact.get(key).map(count).unwrap_or_default();

    let mut title = field(card, "title");
    if title.is_empty() {
        title = "Untitled".to_string();
    }

    let images = card
        .get("image_list")
        .and_then(Value::as_array)
        .map(|list| list.iter().filter_map(image_url).collect())
        .unwrap_or_default();

    NoteDetail {
        note_id: note_id.to_string(),
        title,
        desc: field(card, "desc"),
        stats: InteractStats {
            likes: stat("liked_count"),
            comments: stat("comment_count"),
            collects: stat("collected_count"),
            shares: stat("share_count"),
        },
        time: card.get("time").and_then(timestamp),
        images,
        comments: Vec::new(),
    }
}

/// Picks the `WB_DFT` rendition, else the first listed url, else `url_default`.
fn image_url(image: &Value) -> Option<String> {
    let infos = image.get("info_list").and_then(Value::as_array);

    let by_scene = infos.and_then(|list| {
        list.iter()
            .find(|info| info.get("image_scene").and_then(Value::as_str) == Some(DEFAULT_SCENE))
            .map(|info| field(info, "url"))
    });
    let first = || infos.and_then(|list| list.first()).map(|info| field(info, "url"));

    [by_scene, first(), Some(field(image, "url_default")), Some(field(image, "url"))]
        .into_iter()
        .flatten()
        .find(|url| !url.is_empty())
}

/// Decodes the `data` of a `comment/page` response.
pub fn parse_comments(data: &Value) -> Vec<Comment> {
    let Some(entries) = data.get("comments").and_then(Value::as_array) else {
        return Vec::new();
    };

    entries
        .iter()
        .map(|entry| {
            let user = entry.get("user_info").unwrap_or(&Value::Null);
            let mut avatar = field(user, "image");
            if avatar.is_empty() {
                avatar = field(user, "images");
            }

            Comment {
                comment_id: field(entry, "id"),
                content: field(entry, "content"),
                user_id: field(user, "user_id"),
                nickname: field(user, "nickname"),
                avatar,
                likes: entry.get("like_count").map(count).unwrap_or_default(),
                time: entry.get("create_time").and_then(timestamp),
                sub_comments: entry.get("sub_comment_count").map(count).unwrap_or_default(),
            }
        })
        .collect()
}

//! Normalization tests against captured platform payloads.

use notedesk_client::UpstreamError;
use notedesk_client::notedesk_core::FollowStatus;
use notedesk_client::parse::{
    parse_comments, parse_feed, parse_followers, parse_note_card, parse_self_info,
    parse_user_notes, unwrap_envelope,
};
use serde_json::{Value, json};

fn user_posted_response() -> Value {
    json!({
        "success": true,
        "code": 0,
        "msg": "成功",
        "data": {
            "cursor": "64f1c2",
            "has_more": true,
            "notes": [
                {
                    "note_id": "64f1c2a0000000001f03a1b2",
                    "display_title": "Weekend hike",
                    "type": "normal",
                    "xsec_token": "ABtoken1",
                    "cover": {
                        "url_default": "https://sns-webpic/default.jpg",
                        "info_list": [
                            {"image_scene": "WB_PRV", "url": "https://sns-webpic/prv.jpg"},
                            {"image_scene": "WB_DFT", "url": "https://sns-webpic/dft.jpg"}
                        ]
                    },
                    "interact_info": {"liked": false, "liked_count": "1.5万"}
                },
                {
                    "note_id": "64f1c2a0000000001f03a1b3",
                    "display_title": "",
                    "cover": {"url_default": "https://sns-webpic/only-default.jpg"},
                    "interact_info": "{\"liked_count\": 42}"
                }
            ]
        }
    })
}

#[test]
fn test_user_notes_normalized() {
    let data = unwrap_envelope(user_posted_response()).unwrap();
    let parsed = parse_user_notes(&data);

    assert_eq!(parsed.notes.len(), 2);
    assert!(parsed.has_more);
    assert_eq!(parsed.cursor, "64f1c2");

    let first = &parsed.notes[0];
    assert_eq!(first.title, "Weekend hike");
    assert_eq!(first.cover, "https://sns-webpic/prv.jpg");
    assert_eq!(first.likes, 15_000);

    let second = &parsed.notes[1];
    assert_eq!(second.title, "Untitled");
    assert_eq!(second.cover, "https://sns-webpic/only-default.jpg");
    assert_eq!(second.likes, 42);
}

#[test]
fn test_user_notes_collect_tokens() {
    let data = unwrap_envelope(user_posted_response()).unwrap();
    let parsed = parse_user_notes(&data);

    assert_eq!(
        parsed.tokens,
        vec![(
            "64f1c2a0000000001f03a1b2".to_string(),
            "ABtoken1".to_string()
        )]
    );
}

#[test]
fn test_self_info() {
    let data = unwrap_envelope(json!({
        "success": true,
        "data": {"user_id": "5f00aa", "nickname": "Desk Owner", "images": "https://avatar/1.jpg", "guest": false}
    }))
    .unwrap();

    let info = parse_self_info(&data);
    assert_eq!(info.user_id(), Some("5f00aa"));
    assert_eq!(info.nickname, "Desk Owner");
    assert_eq!(info.avatar, "https://avatar/1.jpg");
}

#[test]
fn test_followers_keep_only_follow_messages() {
    let data = json!({
        "has_more": false,
        "cursor": "",
        "message_list": [
            {
                "type": "follow/you",
                "time": 1_700_000_000,
                "user": {"userid": "u1", "nickname": "Alice", "images": "https://a", "fstatus": "fans"}
            },
            {
                "type": "like/note",
                "time": 1_700_000_100,
                "user": {"userid": "u2", "nickname": "Bob"}
            },
            {
                "type": "follow/you",
                "time": 1_700_000_200,
                "user": {"userid": "u3", "nickname": "Carol", "fstatus": "both"}
            },
            {
                "type": "follow/you",
                "user": {"userid": "u4", "nickname": "Dan", "fstatus": "none"}
            }
        ]
    });

    let page = parse_followers(&data);
    let ids: Vec<_> = page.followers.iter().map(|f| f.user_id.as_str()).collect();

    assert_eq!(ids, vec!["u1", "u3", "u4"]);
    assert_eq!(page.followers[0].follow_status, FollowStatus::Fan);
    assert_eq!(page.followers[0].followed_at, Some(1_700_000_000));
    assert_eq!(page.followers[1].follow_status, FollowStatus::Mutual);
    assert_eq!(page.followers[2].follow_status, FollowStatus::None);
    assert!(page.followers[2].followed_at.is_none());
    assert_eq!(page.mutuals().count(), 1);
}

#[test]
fn test_feed_note_card() {
    let data = json!({
        "items": [{
            "id": "n1",
            "model_type": "note",
            "note_card": {
                "note_id": "n1",
                "title": "Ramen guide",
                "desc": "Five shops",
                "time": 1_700_000_000_000_i64,
                "xsec_token": "CARDtoken",
                "interact_info": {
                    "liked_count": "120",
                    "comment_count": "8",
                    "collected_count": "1.1万",
                    "share_count": 3
                },
                "image_list": [
                    {
                        "url_default": "https://img/1-default",
                        "info_list": [
                            {"image_scene": "WB_PRV", "url": "https://img/1-prv"},
                            {"image_scene": "WB_DFT", "url": "https://img/1-dft"}
                        ]
                    },
                    {"url_default": "https://img/2-default"}
                ]
            }
        }]
    });

    let card = parse_feed(&data).expect("note card");
    let detail = parse_note_card("n1", card);

    assert_eq!(detail.title, "Ramen guide");
    assert_eq!(detail.desc, "Five shops");
    assert_eq!(detail.time, Some(1_700_000_000_000));
    assert_eq!(detail.stats.likes, 120);
    assert_eq!(detail.stats.comments, 8);
    assert_eq!(detail.stats.collects, 11_000);
    assert_eq!(detail.stats.shares, 3);
    assert_eq!(detail.images, vec!["https://img/1-dft", "https://img/2-default"]);
    assert_eq!(detail.cover(), Some("https://img/1-dft"));
    assert!(detail.comments.is_empty());
}

#[test]
fn test_comments_page() {
    let data = json!({
        "cursor": "c2",
        "has_more": true,
        "comments": [
            {
                "id": "c1",
                "content": "Looks great",
                "create_time": 1_700_000_000_000_i64,
                "like_count": "7",
                "sub_comment_count": "2",
                "user_info": {"user_id": "u1", "nickname": "Alice", "image": "https://a"}
            },
            {
                "id": "c2",
                "content": "",
                "like_count": 0
            }
        ]
    });

    let comments = parse_comments(&data);

    assert_eq!(comments.len(), 2);
    assert_eq!(comments[0].comment_id, "c1");
    assert_eq!(comments[0].nickname, "Alice");
    assert_eq!(comments[0].avatar, "https://a");
    assert_eq!(comments[0].likes, 7);
    assert_eq!(comments[0].sub_comments, 2);
    assert_eq!(comments[1].user_id, "");
    assert!(comments[1].time.is_none());
}

#[test]
fn test_expired_session_envelope() {
    let err = unwrap_envelope(json!({"success": false, "code": -100, "msg": "登录已过期"})).unwrap_err();

    assert!(matches!(err, UpstreamError::SessionExpired));
    assert!(err.is_auth_failure());
}

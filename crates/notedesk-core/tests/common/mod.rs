#![allow(dead_code)]
use notedesk_core::{Comment, FollowStatus, FollowerRecord, NoteDetail, NoteSummary};

/// Builds a note summary fixture.
pub fn summary(id: &str, likes: u64) -> NoteSummary {
    NoteSummary {
        note_id: id.to_string(),
        title: format!("Note {id}"),
        desc: String::new(),
        cover: format!("https://img.example/{id}.jpg"),
        likes,
        time: Some(1_700_000_000_000),
    }
}

/// Builds a follower fixture.
pub fn follower(id: &str, status: FollowStatus) -> FollowerRecord {
    FollowerRecord {
        user_id: id.to_string(),
        nickname: format!("user-{id}"),
        avatar: String::new(),
        follow_status: status,
        followed_at: Some(1_700_000_000),
    }
}

/// Builds a detail fixture with one comment.
pub fn detail(id: &str) -> NoteDetail {
    let mut detail = NoteDetail::new(id, format!("Note {id}"));
    detail.images = vec![format!("https://img.example/{id}/1.jpg")];
    detail.comments = vec![Comment {
        comment_id: "c1".into(),
        content: "nice".into(),
        user_id: "u1".into(),
        nickname: "someone".into(),
        avatar: String::new(),
        likes: 3,
        time: None,
        sub_comments: 0,
    }];
    detail
}

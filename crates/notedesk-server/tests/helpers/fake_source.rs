//! In-memory note source with call counters.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use notedesk_client::{NoteSource, SourceFactory, UpstreamError};
use notedesk_core::{
    FollowStatus, FollowerPage, FollowerRecord, NoteDetail, NoteSummary, PublishRequest,
    PublishedNote, SelfInfo,
};
use parking_lot::Mutex;

pub fn note(id: &str) -> NoteSummary {
    NoteSummary {
        note_id: id.to_string(),
        title: format!("Note {id}"),
        desc: String::new(),
        cover: String::new(),
        likes: 3,
        time: None,
    }
}

pub fn detail(id: &str) -> NoteDetail {
    NoteDetail::new(id, format!("Note {id}"))
}

/// A note source answering from memory.
///
/// Every call waits `delay` first (tokio time, so paused clocks apply).
#[derive(Default)]
pub struct FakeSource {
    pub self_info_calls: AtomicUsize,
    pub content_calls: AtomicUsize,
    pub follower_calls: AtomicUsize,
    pub detail_calls: AtomicUsize,
    pub publish_calls: AtomicUsize,

    pub fail_content: AtomicBool,
    pub panic_content: AtomicBool,
    pub fail_self_info: AtomicBool,

    delay: Mutex<Duration>,
    notes: Mutex<Vec<NoteSummary>>,
    details: Mutex<HashMap<String, NoteDetail>>,
    last_publish: Mutex<Option<PublishRequest>>,
    auth_hook: Mutex<Option<Box<dyn FnOnce() + Send>>>,
}

impl FakeSource {
    pub fn new() -> Arc<Self> {
        let source = Self::default();
        *source.notes.lock() = vec![note("n1"), note("n2")];
        source
            .details
            .lock()
            .insert("item-42".to_string(), detail("item-42"));
        Arc::new(source)
    }

    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock() = delay;
    }

    pub fn set_notes(&self, notes: Vec<NoteSummary>) {
        *self.notes.lock() = notes;
    }

    pub fn insert_detail(&self, detail: NoteDetail) {
        self.details.lock().insert(detail.note_id.clone(), detail);
    }

    pub fn last_publish(&self) -> Option<PublishRequest> {
        self.last_publish.lock().clone()
    }

    /// Runs `hook` inside the next `is_authenticated` check, once.
    pub fn on_next_auth_check(&self, hook: impl FnOnce() + Send + 'static) {
        *self.auth_hook.lock() = Some(Box::new(hook));
    }

    pub fn calls(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }

    async fn wait(&self) {
        let delay = *self.delay.lock();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl NoteSource for FakeSource {
    async fn self_info(&self) -> Result<SelfInfo, UpstreamError> {
        self.self_info_calls.fetch_add(1, Ordering::SeqCst);
        self.wait().await;
        if self.fail_self_info.load(Ordering::SeqCst) {
            return Err(UpstreamError::SessionExpired);
        }
        Ok(SelfInfo {
            user_id: "u-1".to_string(),
            nickname: "Tester".to_string(),
            avatar: String::new(),
        })
    }

    async fn fetch_content_list(&self, _user_id: &str) -> Result<Vec<NoteSummary>, UpstreamError> {
        self.content_calls.fetch_add(1, Ordering::SeqCst);
        self.wait().await;
        if self.panic_content.load(Ordering::SeqCst) {
            panic!("content list exploded");
        }
        if self.fail_content.load(Ordering::SeqCst) {
            return Err(UpstreamError::Status {
                status: 503,
                body: "unavailable".to_string(),
            });
        }
        Ok(self.notes.lock().clone())
    }

    async fn fetch_follower_list(&self) -> Result<FollowerPage, UpstreamError> {
        self.follower_calls.fetch_add(1, Ordering::SeqCst);
        self.wait().await;
        Ok(FollowerPage {
            followers: vec![FollowerRecord {
                user_id: "f-1".to_string(),
                nickname: "Fan".to_string(),
                avatar: String::new(),
                follow_status: FollowStatus::Fan,
                followed_at: None,
            }],
            has_more: false,
            cursor: String::new(),
        })
    }

    async fn fetch_item_detail(&self, note_id: &str) -> Result<Option<NoteDetail>, UpstreamError> {
        self.detail_calls.fetch_add(1, Ordering::SeqCst);
        self.wait().await;
        Ok(self.details.lock().get(note_id).cloned())
    }

    async fn publish_image_note(
        &self,
        request: &PublishRequest,
    ) -> Result<PublishedNote, UpstreamError> {
        self.publish_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_publish.lock() = Some(request.clone());
        Ok(PublishedNote {
            note_id: "published-1".to_string(),
        })
    }

    fn is_authenticated(&self) -> bool {
        let hook = self.auth_hook.lock().take();
        if let Some(hook) = hook {
            hook();
        }
        true
    }

    fn name(&self) -> &'static str {
        "fake"
    }
}

/// Hands out the same [`FakeSource`] for every cookie.
pub struct FakeFactory {
    pub source: Arc<FakeSource>,
    pub cookies: Mutex<Vec<String>>,
}

impl FakeFactory {
    pub fn new(source: Arc<FakeSource>) -> Arc<Self> {
        Arc::new(Self {
            source,
            cookies: Mutex::new(Vec::new()),
        })
    }
}

impl SourceFactory for FakeFactory {
    fn connect(&self, cookie: &str) -> Result<Arc<dyn NoteSource>, UpstreamError> {
        self.cookies.lock().push(cookie.to_string());
        Ok(self.source.clone())
    }
}

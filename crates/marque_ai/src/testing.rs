//! Scripted in-memory backend for tests

use std::collections::VecDeque;
use std::future::{ready, Future};
use std::sync::Arc;

use marque_image::ImagePayload;
use parking_lot::Mutex;

use crate::backend::{BackendReply, BackendRequest, GenerativeBackend};
use crate::error::{BridgeError, Result};

#[derive(Default)]
struct Script {
    replies: VecDeque<Result<BackendReply>>,
    requests: Vec<BackendRequest>,
}

/// Replays queued replies in order and records every request
///
/// Clones share the same script, so a test can keep one handle for
/// assertions while the bridge owns another. An exhausted script answers
/// with a transient error.
#[derive(Clone, Default)]
pub struct ScriptedBackend {
    script: Arc<Mutex<Script>>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, reply: Result<BackendReply>) -> &Self {
        self.script.lock().replies.push_back(reply);
        self
    }

    pub fn push_image(&self, image: ImagePayload) -> &Self {
        self.push(Ok(BackendReply::image(image)))
    }

    pub fn push_text(&self, text: impl Into<String>) -> &Self {
        self.push(Ok(BackendReply::text(text)))
    }

    pub fn push_error(&self, error: BridgeError) -> &Self {
        self.push(Err(error))
    }

    /// Requests received so far
    pub fn requests(&self) -> Vec<BackendRequest> {
        self.script.lock().requests.clone()
    }

    pub fn request_count(&self) -> usize {
        self.script.lock().requests.len()
    }

    /// Replies not yet consumed
    pub fn remaining(&self) -> usize {
        self.script.lock().replies.len()
    }
}

impl GenerativeBackend for ScriptedBackend {
    fn generate(&self, request: BackendRequest) -> impl Future<Output = Result<BackendReply>> + Send {
        let mut script = self.script.lock();
        script.requests.push(request);
        let reply = script
            .replies
            .pop_front()
            .unwrap_or_else(|| Err(BridgeError::transient("script exhausted")));
        ready(reply)
    }
}

/// Distinct tiny payload for assertions; `tag` becomes the only byte
pub fn sample_image(tag: u8) -> ImagePayload {
    ImagePayload::new(vec![tag], "image/png").expect("image/png is a valid mime type")
}

//! In-memory platform and renderer used by the application tests

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use crate::domain::{
    required_names, Attachment, ChannelId, EndpointId, GlyphTable, GuildId, MessageId,
    OutgoingMessage, PersonaEndpoint, PlatformError, PostedMessage, ReferenceToken, RelayError,
    UserId, UserProfile,
};
use crate::ports::{ChatPlatform, GlyphImageRenderer, ImageRequest};

pub(crate) fn full_reference() -> Vec<ReferenceToken> {
    required_names()
        .enumerate()
        .map(|(i, (_, name))| {
            let token = format!("<:{name}:{}>", 1000 + i);
            ReferenceToken::new(name, token)
        })
        .collect()
}

pub(crate) fn full_table() -> GlyphTable {
    GlyphTable::build(&full_reference()).unwrap()
}

/// Counting stand-in for a chat platform
///
/// Endpoints live in `remote`; executing one that is no longer there
/// reports `NotFound`, like a webhook deleted from the channel settings.
pub(crate) struct MockPlatform {
    next_id: AtomicU64,
    pub creates: AtomicUsize,
    pub lists: AtomicUsize,
    pub executes: AtomicUsize,
    pub user_fetches: AtomicUsize,
    pub remote: Mutex<Vec<PersonaEndpoint>>,
    pub reference: Mutex<Vec<ReferenceToken>>,
    pub list_error: Mutex<Option<PlatformError>>,
    pub create_error: Mutex<Option<PlatformError>>,
    pub delete_error: Mutex<Option<PlatformError>>,
    pub direct_error: Mutex<Option<PlatformError>>,
    pub execute_errors: Mutex<VecDeque<PlatformError>>,
    pub executed: Mutex<Vec<(PersonaEndpoint, OutgoingMessage)>>,
    pub direct: Mutex<Vec<(ChannelId, OutgoingMessage)>>,
    pub deleted: Mutex<Vec<MessageId>>,
    create_delay: Duration,
}

impl Default for MockPlatform {
    fn default() -> Self {
        Self {
            next_id: AtomicU64::new(100),
            creates: AtomicUsize::new(0),
            lists: AtomicUsize::new(0),
            executes: AtomicUsize::new(0),
            user_fetches: AtomicUsize::new(0),
            remote: Mutex::new(Vec::new()),
            reference: Mutex::new(full_reference()),
            list_error: Mutex::new(None),
            create_error: Mutex::new(None),
            delete_error: Mutex::new(None),
            direct_error: Mutex::new(None),
            execute_errors: Mutex::new(VecDeque::new()),
            executed: Mutex::new(Vec::new()),
            direct: Mutex::new(Vec::new()),
            deleted: Mutex::new(Vec::new()),
            create_delay: Duration::from_millis(5),
        }
    }
}

impl MockPlatform {
    pub fn with_remote(self, endpoints: Vec<PersonaEndpoint>) -> Self {
        *self.remote.lock().unwrap() = endpoints;
        self
    }

    pub fn fail_list(&self, error: PlatformError) {
        *self.list_error.lock().unwrap() = Some(error);
    }

    pub fn fail_create(&self, error: PlatformError) {
        *self.create_error.lock().unwrap() = Some(error);
    }

    pub fn fail_delete(&self, error: PlatformError) {
        *self.delete_error.lock().unwrap() = Some(error);
    }

    pub fn fail_execute(&self, error: PlatformError) {
        self.execute_errors.lock().unwrap().push_back(error);
    }

    /// Remove every endpoint remotely, behind the cache's back
    pub fn wipe_remote(&self) {
        self.remote.lock().unwrap().clear();
    }

    pub fn creates(&self) -> usize {
        self.creates.load(Ordering::SeqCst)
    }

    pub fn executes(&self) -> usize {
        self.executes.load(Ordering::SeqCst)
    }

    pub fn lists(&self) -> usize {
        self.lists.load(Ordering::SeqCst)
    }

    pub fn endpoint(id: u64, channel_id: u64, name: &str) -> PersonaEndpoint {
        PersonaEndpoint::new(
            EndpointId(id),
            ChannelId(channel_id),
            name,
            format!("https://hooks.test/{id}/token"),
        )
    }
}

#[async_trait]
impl ChatPlatform for MockPlatform {
    async fn list_endpoints(
        &self,
        channel_id: ChannelId,
    ) -> Result<Vec<PersonaEndpoint>, PlatformError> {
        self.lists.fetch_add(1, Ordering::SeqCst);
        if let Some(error) = self.list_error.lock().unwrap().clone() {
            return Err(error);
        }
        Ok(self
            .remote
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.channel_id == channel_id)
            .cloned()
            .collect())
    }

    async fn create_endpoint(
        &self,
        channel_id: ChannelId,
        name: &str,
    ) -> Result<PersonaEndpoint, PlatformError> {
        // Widen the window in which concurrent callers could race
        tokio::time::sleep(self.create_delay).await;
        if let Some(error) = self.create_error.lock().unwrap().clone() {
            return Err(error);
        }
        self.creates.fetch_add(1, Ordering::SeqCst);
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let endpoint = Self::endpoint(id, channel_id.get(), name);
        self.remote.lock().unwrap().push(endpoint.clone());
        Ok(endpoint)
    }

    async fn execute_endpoint(
        &self,
        endpoint: &PersonaEndpoint,
        message: &OutgoingMessage,
    ) -> Result<PostedMessage, PlatformError> {
        self.executes.fetch_add(1, Ordering::SeqCst);
        if let Some(error) = self.execute_errors.lock().unwrap().pop_front() {
            return Err(error);
        }
        if !self.remote.lock().unwrap().iter().any(|e| e.id == endpoint.id) {
            return Err(PlatformError::NotFound(format!("webhook {}", endpoint.id)));
        }
        let mut executed = self.executed.lock().unwrap();
        executed.push((endpoint.clone(), message.clone()));
        Ok(PostedMessage {
            id: MessageId(5000 + executed.len() as u64),
            channel_id: endpoint.channel_id,
        })
    }

    async fn create_message(
        &self,
        channel_id: ChannelId,
        message: &OutgoingMessage,
    ) -> Result<PostedMessage, PlatformError> {
        if let Some(error) = self.direct_error.lock().unwrap().clone() {
            return Err(error);
        }
        let mut direct = self.direct.lock().unwrap();
        direct.push((channel_id, message.clone()));
        Ok(PostedMessage {
            id: MessageId(9000 + direct.len() as u64),
            channel_id,
        })
    }

    async fn delete_message(
        &self,
        _channel_id: ChannelId,
        message_id: MessageId,
    ) -> Result<(), PlatformError> {
        if let Some(error) = self.delete_error.lock().unwrap().clone() {
            return Err(error);
        }
        self.deleted.lock().unwrap().push(message_id);
        Ok(())
    }

    async fn fetch_user(&self, user_id: UserId) -> Result<UserProfile, PlatformError> {
        self.user_fetches.fetch_add(1, Ordering::SeqCst);
        Ok(UserProfile {
            id: user_id,
            username: format!("user-{user_id}"),
            avatar_url: Some(format!("https://cdn.test/avatars/{user_id}.png")),
        })
    }

    async fn fetch_reference_tokens(
        &self,
        _source: GuildId,
    ) -> Result<Vec<ReferenceToken>, PlatformError> {
        Ok(self.reference.lock().unwrap().clone())
    }
}

/// Renderer that records requests and returns the lines as bytes
#[derive(Default)]
pub(crate) struct MockRenderer {
    pub requests: Mutex<Vec<ImageRequest>>,
}

#[async_trait]
impl GlyphImageRenderer for MockRenderer {
    async fn render(&self, request: &ImageRequest) -> Result<Attachment, RelayError> {
        self.requests.lock().unwrap().push(request.clone());
        Ok(Attachment::new(
            "mdj.png",
            request.lines.join("\n").into_bytes(),
        ))
    }
}

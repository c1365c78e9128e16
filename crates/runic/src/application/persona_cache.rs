//! Persona Endpoint Cache
//!
//! Keeps one impersonation endpoint per channel. Endpoints are created on
//! first use, adopted when one with the persona name already exists
//! (e.g. after a restart), and recreated when the platform reports that
//! the cached one was deleted.
//!
//! Each channel has its own async mutex, held across that channel's
//! remote calls, so concurrent first uses create exactly one endpoint
//! while other channels proceed in parallel.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::domain::{
    persona_name, ChannelId, Identity, OutgoingMessage, PersonaEndpoint, PlatformError,
    PostedMessage, RelayError, RenderedPayload,
};
use crate::ports::ChatPlatform;

type Slot = Arc<Mutex<Option<PersonaEndpoint>>>;

pub struct PersonaCache<P: ChatPlatform> {
    platform: Arc<P>,
    slots: Mutex<HashMap<ChannelId, Slot>>,
}

impl<P: ChatPlatform> PersonaCache<P> {
    pub fn new(platform: Arc<P>) -> Self {
        Self {
            platform,
            slots: Mutex::new(HashMap::new()),
        }
    }

    /// Per-channel slot; the map lock is only held for the lookup
    async fn slot(&self, channel_id: ChannelId) -> Slot {
        let mut slots = self.slots.lock().await;
        slots.entry(channel_id).or_default().clone()
    }

    /// The endpoint currently cached for a channel, if any
    pub async fn cached(&self, channel_id: ChannelId) -> Option<PersonaEndpoint> {
        let slot = self.slots.lock().await.get(&channel_id).cloned()?;
        let entry = slot.lock().await;
        entry.clone()
    }

    /// Get the channel's endpoint, adopting or creating it on first use
    ///
    /// Returns `Ok(None)` when the channel cannot hold endpoints at all.
    pub async fn get_or_create(
        &self,
        channel_id: ChannelId,
    ) -> Result<Option<PersonaEndpoint>, PlatformError> {
        let slot = self.slot(channel_id).await;
        let mut entry = slot.lock().await;

        if let Some(endpoint) = entry.as_ref() {
            return Ok(Some(endpoint.clone()));
        }

        let existing = match self.platform.list_endpoints(channel_id).await {
            Ok(endpoints) => endpoints,
            Err(PlatformError::NotFound(reason) | PlatformError::Unsupported(reason)) => {
                info!(
                    channel_id = %channel_id,
                    reason = %reason,
                    "Channel cannot hold persona endpoints"
                );
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        let endpoint = match existing
            .into_iter()
            .find(|endpoint| endpoint.is_persona_for(channel_id))
        {
            Some(endpoint) => {
                info!(channel_id = %channel_id, endpoint_id = %endpoint.id, "Persona endpoint found, reusing");
                endpoint
            }
            None => {
                info!(channel_id = %channel_id, "No persona endpoint found, creating");
                self.platform
                    .create_endpoint(channel_id, &persona_name(channel_id))
                    .await?
            }
        };

        *entry = Some(endpoint.clone());
        Ok(Some(endpoint))
    }

    /// Replace a stale endpoint with a fresh one
    ///
    /// If another task already replaced it, the newer endpoint is returned
    /// instead of creating yet another one.
    async fn recreate(&self, stale: &PersonaEndpoint) -> Result<PersonaEndpoint, PlatformError> {
        let channel_id = stale.channel_id;
        let slot = self.slot(channel_id).await;
        let mut entry = slot.lock().await;

        if let Some(current) = entry.as_ref().filter(|current| current.id != stale.id) {
            debug!(channel_id = %channel_id, endpoint_id = %current.id, "Persona endpoint already replaced");
            return Ok(current.clone());
        }

        *entry = None;
        let fresh = self
            .platform
            .create_endpoint(channel_id, &persona_name(channel_id))
            .await?;
        *entry = Some(fresh.clone());
        Ok(fresh)
    }

    async fn resolve_identity(&self, identity: Identity) -> Result<Identity, RelayError> {
        match identity.user_id {
            Some(user_id) if identity.needs_lookup() => {
                let profile = self.platform.fetch_user(user_id).await?;
                Ok(identity.resolve_with(profile))
            }
            _ => Ok(identity),
        }
    }

    /// Publish a payload in a channel under someone else's identity
    ///
    /// Returns `Ok(None)` when impersonation is not possible in this
    /// channel (unsupported or forbidden); the caller is expected to post
    /// the payload itself.
    pub async fn publish_via(
        &self,
        channel_id: ChannelId,
        payload: &RenderedPayload,
        identity: Identity,
    ) -> Result<Option<PostedMessage>, RelayError> {
        let identity = self.resolve_identity(identity).await?;
        let message = OutgoingMessage::from_payload(payload).with_identity(&identity);

        match self.execute(channel_id, &message).await {
            Err(RelayError::Platform(PlatformError::Forbidden(reason))) => {
                warn!(
                    channel_id = %channel_id,
                    reason = %reason,
                    "Insufficient permissions for persona endpoints"
                );
                Ok(None)
            }
            result => result,
        }
    }

    async fn execute(
        &self,
        channel_id: ChannelId,
        message: &OutgoingMessage,
    ) -> Result<Option<PostedMessage>, RelayError> {
        let Some(endpoint) = self.get_or_create(channel_id).await? else {
            return Ok(None);
        };

        match self.platform.execute_endpoint(&endpoint, message).await {
            Ok(posted) => Ok(Some(posted)),
            Err(PlatformError::NotFound(_)) => {
                info!(
                    channel_id = %channel_id,
                    endpoint_id = %endpoint.id,
                    "Previously known persona endpoint was deleted, recreating"
                );
                let fresh = self.recreate(&endpoint).await?;
                match self.platform.execute_endpoint(&fresh, message).await {
                    Ok(posted) => Ok(Some(posted)),
                    Err(PlatformError::NotFound(_)) => {
                        Err(RelayError::EndpointVanished { channel_id })
                    }
                    Err(e) => Err(e.into()),
                }
            }
            Err(e) => Err(e.into()),
        }
    }
}

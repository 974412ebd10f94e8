use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use reqwest::{
    header::{HeaderValue, CONTENT_TYPE},
    Client, StatusCode,
};
use shared::{
    error::PanelError,
    protocol::{ActionRequest, ChannelEnvelope, RunActionPayload, RUN_ACTION_EVENT, RUN_ACTION_PATH},
};
use tokio::sync::mpsc;
use tracing::{info, warn};
use url::Url;

use crate::config::{Settings, Transport};

/// Transport seam for the action cycle. Both strategies return a uniform
/// `Result` so the caller's recovery logic is written once.
#[async_trait]
pub trait ActionDispatcher: Send + Sync {
    async fn send(&self, query: &str) -> Result<(), PanelError>;
}

impl std::fmt::Debug for dyn ActionDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("dyn ActionDispatcher")
    }
}

/// Persistent bidirectional message channel to the backend. The emit is
/// accepted-into-channel, not delivered-to-backend; a closed channel is the
/// observable failure.
#[async_trait]
pub trait MessageChannel: Send + Sync {
    async fn emit(&self, envelope: ChannelEnvelope) -> Result<(), PanelError>;
}

pub struct MissingMessageChannel;

#[async_trait]
impl MessageChannel for MissingMessageChannel {
    async fn emit(&self, _envelope: ChannelEnvelope) -> Result<(), PanelError> {
        Err(PanelError::ChannelClosed)
    }
}

/// In-process channel endpoint backed by an unbounded sender; the embedding
/// shell owns the receiving half and forwards envelopes over its socket.
pub struct LocalMessageChannel {
    tx: mpsc::UnboundedSender<ChannelEnvelope>,
}

impl LocalMessageChannel {
    pub fn new(tx: mpsc::UnboundedSender<ChannelEnvelope>) -> Self {
        Self { tx }
    }
}

#[async_trait]
impl MessageChannel for LocalMessageChannel {
    async fn emit(&self, envelope: ChannelEnvelope) -> Result<(), PanelError> {
        self.tx.send(envelope).map_err(|_| PanelError::ChannelClosed)
    }
}

/// Channel strategy: emits a `run-action` event carrying `{"data": query}`.
pub struct ChannelActionDispatcher {
    channel: Arc<dyn MessageChannel>,
}

impl ChannelActionDispatcher {
    pub fn new(channel: Arc<dyn MessageChannel>) -> Self {
        Self { channel }
    }
}

#[async_trait]
impl ActionDispatcher for ChannelActionDispatcher {
    async fn send(&self, query: &str) -> Result<(), PanelError> {
        let payload = serde_json::to_value(RunActionPayload {
            data: query.to_string(),
        })
        .map_err(|err| PanelError::Network(format!("payload encoding failed: {err}")))?;

        self.channel
            .emit(ChannelEnvelope {
                event: RUN_ACTION_EVENT.to_string(),
                payload,
            })
            .await?;
        info!("dispatch: run-action event accepted by channel");
        Ok(())
    }
}

/// HTTP strategy: `POST <base>/runAction` with a JSON body. Status 200 is
/// the only success status.
pub struct HttpActionDispatcher {
    http: Client,
    endpoint: Url,
}

impl HttpActionDispatcher {
    pub fn new(base_url: &str, request_timeout: Duration) -> Result<Self, PanelError> {
        let endpoint = Url::parse(base_url)
            .and_then(|base| base.join(RUN_ACTION_PATH))
            .map_err(|err| PanelError::Network(format!("invalid action endpoint {base_url}: {err}")))?;
        let http = Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|err| PanelError::Network(err.to_string()))?;
        Ok(Self { http, endpoint })
    }
}

#[async_trait]
impl ActionDispatcher for HttpActionDispatcher {
    async fn send(&self, query: &str) -> Result<(), PanelError> {
        let body = serde_json::to_vec(&ActionRequest {
            query: query.to_string(),
        })
        .map_err(|err| PanelError::Network(format!("payload encoding failed: {err}")))?;

        let response = self
            .http
            .post(self.endpoint.clone())
            .header(
                CONTENT_TYPE,
                HeaderValue::from_static("application/json; charset=utf-8"),
            )
            .body(body)
            .send()
            .await
            .map_err(|err| {
                if err.is_timeout() {
                    PanelError::Timeout
                } else {
                    PanelError::Network(err.to_string())
                }
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            warn!(
                status = status.as_u16(),
                "dispatch: backend rejected action request"
            );
            return Err(PanelError::Server {
                status: status.as_u16(),
            });
        }
        info!("dispatch: action request accepted");
        Ok(())
    }
}

/// Builds the configured transport strategy. The channel endpoint is owned
/// by the embedding shell, so it is injected rather than constructed here.
pub fn dispatcher_from_settings(
    settings: &Settings,
    channel: Arc<dyn MessageChannel>,
) -> Result<Arc<dyn ActionDispatcher>, PanelError> {
    match settings.transport {
        Transport::Channel => Ok(Arc::new(ChannelActionDispatcher::new(channel))),
        Transport::Http => Ok(Arc::new(HttpActionDispatcher::new(
            &settings.action_endpoint,
            Duration::from_secs(settings.request_timeout_seconds),
        )?)),
    }
}

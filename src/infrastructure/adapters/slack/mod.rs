//! Slack adapter
//!
//! Events arrive over the RTM websocket; replies and the user directory go
//! through the Web API.

use async_trait::async_trait;
use futures_util::{FutureExt, StreamExt};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

use crate::application::errors::BotError;
use crate::domain::entities::{BackendUser, InboundEvent};
use crate::domain::traits::ChatBackend;

/// Slack Web API base URL
pub const API_BASE: &str = "https://slack.com/api";

/// `users.list` page size
const USERS_PAGE_LIMIT: u32 = 200;

type RtmStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// One live RTM connection
struct RtmSession {
    /// The bot's own user id, as reported by `rtm.connect`
    self_id: String,
    stream: RtmStream,
}

/// A frame received over the RTM websocket
#[derive(Debug, Clone, Deserialize)]
struct RtmFrame {
    #[serde(rename = "type")]
    frame_type: Option<String>,
    subtype: Option<String>,
    user: Option<String>,
    text: Option<String>,
    channel: Option<String>,
}

/// Slack bot adapter
pub struct SlackAdapter {
    token: String,
    api_base: String,
    client: Client,
    session: Option<RtmSession>,
}

impl SlackAdapter {
    pub fn with_api_base(token: impl Into<String>, api_base: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            api_base: api_base.into().trim_end_matches('/').to_string(),
            client: Client::new(),
            session: None,
        }
    }

    /// Get the API URL for a method
    fn api_url(&self, method: &str) -> String {
        format!("{}/{}", self.api_base, method)
    }

    #[cfg(test)]
    pub fn is_connected(&self) -> bool {
        self.session.is_some()
    }

    /// Call `rtm.connect`, returning the websocket URL and the bot's user id.
    ///
    /// `Ok(None)` means Slack refused the token.
    async fn rtm_connect(&self) -> Result<Option<(String, String)>, BotError> {
        #[derive(Deserialize)]
        struct Response {
            ok: bool,
            error: Option<String>,
            url: Option<String>,
            #[serde(rename = "self")]
            me: Option<SelfInfo>,
        }

        #[derive(Deserialize)]
        struct SelfInfo {
            id: String,
        }

        let response = self.client
            .post(self.api_url("rtm.connect"))
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| BotError::Network(e.to_string()))?;

        let data: Response = response
            .json()
            .await
            .map_err(|e| BotError::Parse(e.to_string()))?;

        if !data.ok {
            tracing::warn!("rtm.connect refused: {}", data.error.as_deref().unwrap_or("unknown"));
            return Ok(None);
        }

        match (data.url, data.me) {
            (Some(url), Some(me)) => Ok(Some((url, me.id))),
            _ => Err(BotError::Parse("rtm.connect response missing url or self".to_string())),
        }
    }
}

/// Turn one RTM text frame into an inbound event.
///
/// Only user messages are kept. The bot's own messages are dropped so its
/// replies never trigger commands.
fn decode_frame(payload: &str, self_id: &str) -> Result<Option<InboundEvent>, BotError> {
    let frame: RtmFrame = serde_json::from_str(payload)
        .map_err(|e| BotError::Parse(format!("Invalid RTM frame: {}", e)))?;

    if frame.frame_type.as_deref() != Some("message") || frame.subtype.is_some() {
        return Ok(None);
    }
    if frame.user.as_deref() == Some(self_id) {
        return Ok(None);
    }

    Ok(Some(InboundEvent::new(frame.text, frame.channel)))
}

#[async_trait]
impl ChatBackend for SlackAdapter {
    fn name(&self) -> &str {
        "slack"
    }

    async fn connect(&mut self) -> Result<bool, BotError> {
        self.disconnect().await;

        let Some((url, self_id)) = self.rtm_connect().await? else {
            return Ok(false);
        };

        let (stream, _) = tokio_tungstenite::connect_async(url.as_str())
            .await
            .map_err(|e| BotError::Network(format!("RTM websocket: {}", e)))?;

        tracing::info!("Connected to Slack RTM as {}", self_id);
        self.session = Some(RtmSession { self_id, stream });
        Ok(true)
    }

    async fn read_events(&mut self) -> Result<Vec<InboundEvent>, BotError> {
        let session = self.session
            .as_mut()
            .ok_or_else(|| BotError::Network("Not connected to Slack RTM".to_string()))?;

        let mut events = Vec::new();
        // Take only what is already buffered; the supervisor paces the reads.
        while let Some(frame) = session.stream.next().now_or_never() {
            match frame {
                Some(Ok(WsMessage::Text(payload))) => {
                    if let Some(event) = decode_frame(&payload, &session.self_id)? {
                        events.push(event);
                    }
                }
                Some(Ok(WsMessage::Close(reason))) => {
                    return Err(BotError::Network(format!("RTM connection closed: {:?}", reason)));
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(BotError::Network(e.to_string())),
                None => return Err(BotError::Network("RTM stream ended".to_string())),
            }
        }

        Ok(events)
    }

    async fn post_message(&self, channel: &str, text: &str) -> Result<(), BotError> {
        #[derive(Serialize)]
        struct PostMessageRequest<'a> {
            channel: &'a str,
            text: &'a str,
            as_user: bool,
        }

        #[derive(Deserialize)]
        struct Response {
            ok: bool,
            error: Option<String>,
        }

        if text.is_empty() {
            tracing::debug!("Not posting empty reply to {}", channel);
            return Ok(());
        }

        let request = PostMessageRequest {
            channel,
            text,
            as_user: true,
        };

        let response = self.client
            .post(self.api_url("chat.postMessage"))
            .bearer_auth(&self.token)
            .json(&request)
            .send()
            .await
            .map_err(|e| BotError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(BotError::Network(format!("Slack API error: {}", response.status())));
        }

        let data: Response = response
            .json()
            .await
            .map_err(|e| BotError::Parse(e.to_string()))?;

        if !data.ok {
            return Err(BotError::Network(format!(
                "chat.postMessage failed: {}",
                data.error.as_deref().unwrap_or("unknown")
            )));
        }

        Ok(())
    }

    async fn list_users(&self) -> Result<Vec<BackendUser>, BotError> {
        #[derive(Deserialize)]
        struct Response {
            ok: bool,
            error: Option<String>,
            #[serde(default)]
            members: Vec<Member>,
            response_metadata: Option<Metadata>,
        }

        #[derive(Deserialize)]
        struct Member {
            id: String,
            name: Option<String>,
        }

        #[derive(Deserialize)]
        struct Metadata {
            next_cursor: Option<String>,
        }

        let mut users = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let mut query = vec![("limit", USERS_PAGE_LIMIT.to_string())];
            if let Some(c) = &cursor {
                query.push(("cursor", c.clone()));
            }

            let response = self.client
                .get(self.api_url("users.list"))
                .bearer_auth(&self.token)
                .query(&query)
                .send()
                .await
                .map_err(|e| BotError::Network(e.to_string()))?;

            let data: Response = response
                .json()
                .await
                .map_err(|e| BotError::Parse(e.to_string()))?;

            if !data.ok {
                return Err(BotError::Auth(format!(
                    "users.list failed: {}",
                    data.error.as_deref().unwrap_or("unknown")
                )));
            }

            users.extend(
                data.members
                    .into_iter()
                    .filter_map(|m| m.name.map(|name| BackendUser::new(m.id, name))),
            );

            cursor = data
                .response_metadata
                .and_then(|m| m.next_cursor)
                .filter(|c| !c.is_empty());
            if cursor.is_none() {
                break;
            }
        }

        Ok(users)
    }

    async fn disconnect(&mut self) {
        if let Some(mut session) = self.session.take() {
            if let Err(e) = session.stream.close(None).await {
                tracing::debug!("Error closing RTM websocket: {}", e);
            }
        }
    }
}

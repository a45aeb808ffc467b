use anyhow::{bail, Context, Result};
use futures::stream::{SplitSink, StreamExt};
use futures::SinkExt;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, error, info, warn};

use super::messages::{ClientContentMessage, ServerMessage, SetupMessage};

/// Connection to a remote live generation session
///
/// Implementations push every inbound event onto `inbound` in arrival order.
/// Dropping the sender (stream end, close frame) tells the turn loop the
/// session is gone.
#[async_trait::async_trait]
pub trait LiveTransport: Send {
    /// Open the session and send the setup frame
    async fn connect(
        &mut self,
        setup: &SetupMessage,
        inbound: mpsc::UnboundedSender<ServerMessage>,
    ) -> Result<()>;

    /// Send the conversation context that starts a turn
    async fn send_content(&mut self, content: &ClientContentMessage) -> Result<()>;

    /// Close the session
    async fn close(&mut self) -> Result<()>;

    /// Transport name for logging
    fn name(&self) -> &str;
}

/// Creates a fresh transport per conversation
pub trait TransportFactory: Send + Sync {
    fn create(&self) -> Box<dyn LiveTransport>;
}

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// WebSocket transport speaking JSON frames
pub struct WebSocketTransport {
    endpoint: String,
    api_key: Option<String>,
    writer: Option<SplitSink<WsStream, Message>>,
    reader_task: Option<JoinHandle<()>>,
}

impl WebSocketTransport {
    pub fn new(endpoint: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key,
            writer: None,
            reader_task: None,
        }
    }

    fn url(&self) -> String {
        match self.api_key.as_deref().filter(|k| !k.is_empty()) {
            Some(key) => {
                let separator = if self.endpoint.contains('?') { '&' } else { '?' };
                format!("{}{}key={}", self.endpoint, separator, key)
            }
            None => self.endpoint.clone(),
        }
    }

    async fn send_json<T: serde::Serialize>(&mut self, value: &T) -> Result<()> {
        let payload = serde_json::to_string(value)?;

        let Some(writer) = self.writer.as_mut() else {
            bail!("Live session is not connected");
        };

        writer
            .send(Message::Text(payload))
            .await
            .context("Failed to send live frame")?;

        Ok(())
    }
}

#[async_trait::async_trait]
impl LiveTransport for WebSocketTransport {
    async fn connect(
        &mut self,
        setup: &SetupMessage,
        inbound: mpsc::UnboundedSender<ServerMessage>,
    ) -> Result<()> {
        if self.writer.is_some() {
            bail!("Already connected");
        }

        // Never log the URL itself, it carries the key
        info!("Connecting to live endpoint {}", self.endpoint);

        let (stream, _response) = connect_async(self.url())
            .await
            .context("Failed to connect to live endpoint")?;

        let (writer, mut reader) = stream.split();
        self.writer = Some(writer);

        self.send_json(setup)
            .await
            .context("Failed to send setup message")?;

        let reader_task = tokio::spawn(async move {
            debug!("Live reader task started");

            while let Some(frame) = reader.next().await {
                let payload = match frame {
                    Ok(Message::Text(text)) => text.into_bytes(),
                    Ok(Message::Binary(bytes)) => bytes,
                    Ok(Message::Close(frame)) => {
                        info!("Live session closed by server: {:?}", frame);
                        break;
                    }
                    Ok(_) => continue,
                    Err(e) => {
                        error!("Live stream error: {}", e);
                        break;
                    }
                };

                match serde_json::from_slice::<ServerMessage>(&payload) {
                    Ok(msg) => {
                        if inbound.send(msg).is_err() {
                            debug!("Turn consumer dropped, stopping reader");
                            break;
                        }
                    }
                    Err(e) => {
                        warn!("Failed to parse live message: {}", e);
                    }
                }
            }

            debug!("Live reader task stopped");
        });

        self.reader_task = Some(reader_task);

        info!("Connected to live endpoint");

        Ok(())
    }

    async fn send_content(&mut self, content: &ClientContentMessage) -> Result<()> {
        self.send_json(content).await
    }

    async fn close(&mut self) -> Result<()> {
        if let Some(mut writer) = self.writer.take() {
            info!("Closing live session");
            if let Err(e) = writer.send(Message::Close(None)).await {
                debug!("Close frame not delivered: {}", e);
            }
            if let Err(e) = writer.close().await {
                debug!("Live writer close failed: {}", e);
            }
        }

        if let Some(task) = self.reader_task.take() {
            task.abort();
        }

        Ok(())
    }

    fn name(&self) -> &str {
        "websocket"
    }
}

impl Drop for WebSocketTransport {
    fn drop(&mut self) {
        if let Some(task) = self.reader_task.take() {
            task.abort();
        }
    }
}

/// Builds a `WebSocketTransport` for each conversation
pub struct WebSocketFactory {
    endpoint: String,
    api_key: Option<String>,
}

impl WebSocketFactory {
    pub fn new(endpoint: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key,
        }
    }
}

impl TransportFactory for WebSocketFactory {
    fn create(&self) -> Box<dyn LiveTransport> {
        Box::new(WebSocketTransport::new(
            self.endpoint.clone(),
            self.api_key.clone(),
        ))
    }
}

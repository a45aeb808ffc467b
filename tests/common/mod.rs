// Shared test doubles for the live transport and audio sink

#![allow(dead_code)]

use aki_backend::audio::{AudioSink, ContainerArtifact};
use aki_backend::live::{
    ClientContentMessage, LiveTransport, ServerMessage, SetupMessage, TransportFactory,
};
use anyhow::{bail, Result};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;

/// Replays a fixed script of server messages once the context is sent
#[derive(Clone, Default)]
pub struct ScriptedTransport {
    pub script: Vec<(Duration, ServerMessage)>,
    /// Drop the inbound sender after the script (simulates a server hangup)
    pub hang_up_after_script: bool,
    pub fail_connect: bool,
    pub setup: Arc<Mutex<Option<SetupMessage>>>,
    pub sent: Arc<Mutex<Vec<ClientContentMessage>>>,
    pub closed: Arc<AtomicBool>,
    inbound: Option<mpsc::UnboundedSender<ServerMessage>>,
}

impl ScriptedTransport {
    pub fn new(messages: Vec<ServerMessage>) -> Self {
        Self::with_delays(messages.into_iter().map(|m| (Duration::ZERO, m)).collect())
    }

    pub fn with_delays(script: Vec<(Duration, ServerMessage)>) -> Self {
        Self {
            script,
            ..Self::default()
        }
    }
}

#[async_trait::async_trait]
impl LiveTransport for ScriptedTransport {
    async fn connect(
        &mut self,
        setup: &SetupMessage,
        inbound: mpsc::UnboundedSender<ServerMessage>,
    ) -> Result<()> {
        if self.fail_connect {
            bail!("connection refused");
        }
        *self.setup.lock().unwrap() = Some(setup.clone());
        self.inbound = Some(inbound);
        Ok(())
    }

    async fn send_content(&mut self, content: &ClientContentMessage) -> Result<()> {
        self.sent.lock().unwrap().push(content.clone());

        let Some(inbound) = self.inbound.clone() else {
            bail!("not connected");
        };
        if self.hang_up_after_script {
            self.inbound = None;
        }

        let script = self.script.clone();
        tokio::spawn(async move {
            for (delay, message) in script {
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                if inbound.send(message).is_err() {
                    break;
                }
            }
        });

        Ok(())
    }

    async fn close(&mut self) -> Result<()> {
        self.inbound = None;
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

/// Hands out clones of one scripted transport
pub struct ScriptedFactory {
    pub transport: ScriptedTransport,
}

impl TransportFactory for ScriptedFactory {
    fn create(&self) -> Box<dyn LiveTransport> {
        Box::new(self.transport.clone())
    }
}

/// Records every emitted artifact and the session that produced it
#[derive(Default)]
pub struct RecordingSink {
    pub artifacts: Mutex<Vec<ContainerArtifact>>,
    pub sessions: Mutex<Vec<String>>,
}

#[async_trait::async_trait]
impl AudioSink for RecordingSink {
    async fn emit(&self, session_id: &str, artifact: &ContainerArtifact) -> Result<()> {
        self.artifacts.lock().unwrap().push(artifact.clone());
        self.sessions.lock().unwrap().push(session_id.to_string());
        Ok(())
    }

    fn name(&self) -> &str {
        "recording"
    }
}

/// Always fails, counting attempts
#[derive(Default)]
pub struct FailingSink {
    pub attempts: AtomicUsize,
}

#[async_trait::async_trait]
impl AudioSink for FailingSink {
    async fn emit(&self, _session_id: &str, _artifact: &ContainerArtifact) -> Result<()> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        bail!("disk full")
    }

    fn name(&self) -> &str {
        "failing"
    }
}

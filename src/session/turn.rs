use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::router::TurnRouter;
use crate::error::TurnError;
use crate::live::ServerMessage;

/// Turn loop states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnState {
    /// Queue empty, suspended on the channel
    Waiting,
    /// Routing the oldest queued message
    Processing,
    /// Turn-complete observed
    Done,
}

/// Drive one turn: pull messages in FIFO order, route each one, and stop
/// right after the first message flagged `turnComplete`.
///
/// Returns how many messages were consumed. Messages queued behind the
/// turn-complete marker are left in `inbound`.
pub async fn run_turn(
    inbound: &mut mpsc::UnboundedReceiver<ServerMessage>,
    router: &mut TurnRouter,
    timeout: Duration,
    cancel: &CancellationToken,
) -> Result<usize, TurnError> {
    let deadline = tokio::time::sleep(timeout);
    tokio::pin!(deadline);

    let mut consumed = 0;
    let mut state = TurnState::Waiting;

    loop {
        debug!("Turn loop {:?} ({} consumed)", state, consumed);

        let message = tokio::select! {
            biased;

            _ = cancel.cancelled() => return Err(TurnError::Cancelled),
            _ = &mut deadline => return Err(TurnError::Timeout(timeout)),
            message = inbound.recv() => match message {
                Some(message) => message,
                None => return Err(TurnError::StreamClosed),
            },
        };

        state = TurnState::Processing;
        consumed += 1;

        let routed = router.route(&message).await;
        debug!("Turn loop {:?}: message {} routed as {:?}", state, consumed, routed);

        if message.is_turn_complete() {
            state = TurnState::Done;
            debug!("Turn loop {:?} after {} messages", state, consumed);
            return Ok(consumed);
        }

        state = TurnState::Waiting;
    }
}

//! Exchange-delta subscription engine.
//!
//! A subscription runs as one spawned task that owns its [`HubTransport`]
//! and moves through [`SubscriptionState`]:
//!
//! ```text
//! Disconnected -> Connecting -> Subscribing -> Streaming -> Terminating -> Disconnected
//!                      |             |              |
//!                      +-------------+--------------+-> Terminating -> Failed
//! ```
//!
//! Updates and errors are delivered on two bounded channels. The task is the
//! only producer on both, so a slow consumer slows the task down instead of
//! losing messages. When the task ends it closes the transport and drops its
//! senders, which ends every consumer loop.

use std::future::Future;
use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, trace, warn};

use crate::error::BittrexError;
use crate::ws::client::WsConfig;
use crate::ws::messages::{ExchangeState, HubMessage, QUERY_METHOD, SUBSCRIBE_METHOD, UPDATE_METHOD};
use crate::ws::transport::HubTransport;

/// Lifecycle of a subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubscriptionState {
    /// Not connected. Initial state, and final state after cancellation.
    Disconnected,
    /// Establishing the connection.
    Connecting,
    /// Subscribing to deltas and querying the snapshot.
    Subscribing,
    /// Relaying deltas.
    Streaming,
    /// Closing the connection.
    Terminating,
    /// Ended by an error, reported on the error channel.
    Failed,
}

/// One item from either channel of a subscription.
#[derive(Debug)]
pub enum SubscriptionEvent {
    Update(ExchangeState),
    Error(BittrexError),
}

/// Control side of a running subscription.
///
/// Dropping the handle cancels the subscription.
#[derive(Debug)]
#[must_use = "dropping the handle cancels the subscription"]
pub struct SubscriptionHandle {
    cancel: Option<oneshot::Sender<()>>,
    state: watch::Receiver<SubscriptionState>,
    task: Option<JoinHandle<()>>,
}

impl SubscriptionHandle {
    /// Current state.
    pub fn state(&self) -> SubscriptionState {
        *self.state.borrow()
    }

    /// Receiver notified on every state transition.
    pub fn state_changes(&self) -> watch::Receiver<SubscriptionState> {
        self.state.clone()
    }

    /// Ask the subscription to stop.
    ///
    /// Returns immediately. Both channels close once the connection is shut
    /// down, which takes at most the configured close grace period.
    pub fn cancel(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            let _ = cancel.send(());
        }
    }

    /// Wait until the subscription task has finished.
    pub async fn closed(&mut self) {
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                warn!("Subscription task ended abnormally: {}", e);
            }
        }
    }
}

/// A running exchange-delta subscription.
///
/// The first update is the snapshot (`initial == true`); deltas follow in
/// arrival order. Undecodable pushes are reported as
/// [`BittrexError::MessageDecode`] without ending the stream; any other error
/// is the last item on the error channel before both channels close.
///
/// Both channels are bounded. Consume them together with [`recv`](Self::recv)
/// or from separate tasks after [`split`](Self::split).
#[derive(Debug)]
pub struct ExchangeSubscription {
    updates: mpsc::Receiver<ExchangeState>,
    errors: mpsc::Receiver<BittrexError>,
    handle: SubscriptionHandle,
}

impl ExchangeSubscription {
    /// Start a subscription task on the current tokio runtime.
    pub fn spawn<T: HubTransport>(transport: T, market: Option<String>, config: &WsConfig) -> Self {
        let capacity = config.channel_capacity.max(1);
        let (updates_tx, updates) = mpsc::channel(capacity);
        let (errors_tx, errors) = mpsc::channel(capacity);
        let (cancel_tx, cancel) = oneshot::channel();
        let (state_tx, state) = watch::channel(SubscriptionState::Disconnected);

        let engine = Engine {
            transport,
            market,
            hub: config.hub.clone(),
            connect_timeout: config.connect_timeout,
            call_timeout: config.call_timeout,
            close_grace: config.close_grace,
            updates: updates_tx,
            errors: errors_tx,
            state: state_tx,
            cancel,
        };
        let task = tokio::spawn(engine.run());

        Self {
            updates,
            errors,
            handle: SubscriptionHandle {
                cancel: Some(cancel_tx),
                state,
                task: Some(task),
            },
        }
    }

    /// Next update, or `None` once the subscription has ended.
    pub async fn next_update(&mut self) -> Option<ExchangeState> {
        self.updates.recv().await
    }

    /// Next error, or `None` once the subscription has ended.
    pub async fn next_error(&mut self) -> Option<BittrexError> {
        self.errors.recv().await
    }

    /// Next item from either channel, or `None` once both are closed.
    ///
    /// Pending updates are returned before pending errors.
    pub async fn recv(&mut self) -> Option<SubscriptionEvent> {
        tokio::select! {
            biased;
            Some(update) = self.updates.recv() => Some(SubscriptionEvent::Update(update)),
            Some(error) = self.errors.recv() => Some(SubscriptionEvent::Error(error)),
            else => None,
        }
    }

    /// Current state.
    pub fn state(&self) -> SubscriptionState {
        self.handle.state()
    }

    /// Receiver notified on every state transition.
    pub fn state_changes(&self) -> watch::Receiver<SubscriptionState> {
        self.handle.state_changes()
    }

    /// Ask the subscription to stop. See [`SubscriptionHandle::cancel`].
    pub fn cancel(&mut self) {
        self.handle.cancel();
    }

    /// Wait until the subscription task has finished.
    pub async fn closed(&mut self) {
        self.handle.closed().await;
    }

    /// Split into an update stream, an error stream and the control handle.
    ///
    /// The handle owns the subscription task. Keep it alive as long as the
    /// streams are consumed: dropping it (including binding it to `_`)
    /// cancels the subscription and both streams end.
    pub fn split(
        self,
    ) -> (
        ReceiverStream<ExchangeState>,
        ReceiverStream<BittrexError>,
        SubscriptionHandle,
    ) {
        (
            ReceiverStream::new(self.updates),
            ReceiverStream::new(self.errors),
            self.handle,
        )
    }
}

/// How the engine left its main loop.
enum Exit {
    Cancelled,
    Failed(BittrexError),
}

/// Outcome of one bounded, cancellable step.
enum Phase<O> {
    Done(O),
    Cancelled,
    TimedOut,
    Failed(BittrexError),
}

async fn phase<F, O>(cancel: &mut oneshot::Receiver<()>, limit: Duration, step: F) -> Phase<O>
where
    F: Future<Output = Result<O, BittrexError>>,
{
    tokio::select! {
        biased;
        _ = cancel => Phase::Cancelled,
        result = tokio::time::timeout(limit, step) => match result {
            Ok(Ok(value)) => Phase::Done(value),
            Ok(Err(e)) => Phase::Failed(e),
            Err(_) => Phase::TimedOut,
        },
    }
}

struct Engine<T> {
    transport: T,
    market: Option<String>,
    hub: String,
    connect_timeout: Duration,
    call_timeout: Duration,
    close_grace: Duration,
    updates: mpsc::Sender<ExchangeState>,
    errors: mpsc::Sender<BittrexError>,
    state: watch::Sender<SubscriptionState>,
    cancel: oneshot::Receiver<()>,
}

impl<T> Engine<T> {
    fn set_state(&self, state: SubscriptionState) {
        let previous = self.state.send_replace(state);
        if previous != state {
            debug!(market = ?self.market, "Subscription state {:?} -> {:?}", previous, state);
        }
    }

    fn is_update(&self, message: &HubMessage) -> bool {
        message.hub.eq_ignore_ascii_case(&self.hub) && message.method.eq_ignore_ascii_case(UPDATE_METHOD)
    }

    fn accepts(&self, update: &ExchangeState) -> bool {
        match &self.market {
            None => true,
            Some(market) => update.market_name.as_deref() == Some(market.as_str()),
        }
    }
}

impl<T: HubTransport> Engine<T> {
    async fn run(mut self) {
        let exit = self.drive().await;
        self.set_state(SubscriptionState::Terminating);

        let failed = match exit {
            Exit::Cancelled => {
                debug!(market = ?self.market, "Subscription cancelled");
                false
            }
            Exit::Failed(error) => {
                warn!(market = ?self.market, "Subscription failed: {}", error);
                if tokio::time::timeout(self.close_grace, self.errors.send(error))
                    .await
                    .is_err()
                {
                    debug!("Terminal error not consumed within the close grace period");
                }
                true
            }
        };

        match tokio::time::timeout(self.close_grace, self.transport.close()).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => debug!("Error while closing push connection: {}", e),
            Err(_) => warn!("Push connection not closed within {:?}", self.close_grace),
        }

        self.set_state(if failed {
            SubscriptionState::Failed
        } else {
            SubscriptionState::Disconnected
        });
    }

    async fn drive(&mut self) -> Exit {
        self.set_state(SubscriptionState::Connecting);
        match phase(&mut self.cancel, self.connect_timeout, self.transport.connect()).await {
            Phase::Done(()) => {}
            Phase::Cancelled => return Exit::Cancelled,
            Phase::TimedOut => return Exit::Failed(BittrexError::ConnectTimeout(self.connect_timeout)),
            Phase::Failed(e @ BittrexError::ConnectFailed(_)) => return Exit::Failed(e),
            Phase::Failed(e) => return Exit::Failed(BittrexError::ConnectFailed(e.to_string())),
        }

        self.set_state(SubscriptionState::Subscribing);
        let args: Vec<Value> = self.market.iter().cloned().map(Value::String).collect();

        match phase(
            &mut self.cancel,
            self.call_timeout,
            self.transport.invoke(SUBSCRIBE_METHOD, args.clone()),
        )
        .await
        {
            Phase::Done(Value::Bool(false)) => {
                return Exit::Failed(BittrexError::SubscribeError("hub refused the subscription".to_string()));
            }
            Phase::Done(_) => {}
            Phase::Cancelled => return Exit::Cancelled,
            Phase::TimedOut => {
                return Exit::Failed(BittrexError::SubscribeError(format!(
                    "no reply within {:?}",
                    self.call_timeout
                )));
            }
            Phase::Failed(e) => return Exit::Failed(BittrexError::SubscribeError(e.to_string())),
        }

        let snapshot = match phase(
            &mut self.cancel,
            self.call_timeout,
            self.transport.invoke(QUERY_METHOD, args),
        )
        .await
        {
            Phase::Done(value) => value,
            Phase::Cancelled => return Exit::Cancelled,
            Phase::TimedOut => {
                return Exit::Failed(BittrexError::QueryError(format!(
                    "no reply within {:?}",
                    self.call_timeout
                )));
            }
            Phase::Failed(e) => return Exit::Failed(BittrexError::QueryError(e.to_string())),
        };

        let mut snapshot = match ExchangeState::deserialize(&snapshot) {
            Ok(state) => state,
            Err(e) => {
                return Exit::Failed(BittrexError::QueryError(format!("malformed snapshot: {e}")));
            }
        };
        snapshot.initial = true;
        if snapshot.market_name.is_none() {
            snapshot.market_name = self.market.clone();
        }

        self.set_state(SubscriptionState::Streaming);
        if !self.deliver(snapshot).await {
            return Exit::Cancelled;
        }

        loop {
            let event = tokio::select! {
                biased;
                _ = &mut self.cancel => return Exit::Cancelled,
                event = self.transport.next_event() => event,
            };

            let message = match event {
                Ok(Some(message)) => message,
                Ok(None) => {
                    return Exit::Failed(BittrexError::RemoteDisconnect {
                        reason: "connection closed by remote host".to_string(),
                    });
                }
                Err(e @ BittrexError::RemoteDisconnect { .. }) => return Exit::Failed(e),
                Err(e) => {
                    return Exit::Failed(BittrexError::RemoteDisconnect { reason: e.to_string() });
                }
            };

            if !self.is_update(&message) {
                trace!(hub = %message.hub, method = %message.method, "Ignoring hub message");
                continue;
            }

            for arg in &message.args {
                match ExchangeState::deserialize(arg) {
                    Ok(update) if self.accepts(&update) => {
                        if !self.deliver(update).await {
                            return Exit::Cancelled;
                        }
                    }
                    Ok(update) => {
                        trace!(market = ?update.market_name, "Dropping update for another market");
                    }
                    Err(e) => {
                        let error = BittrexError::MessageDecode {
                            hub: message.hub.clone(),
                            method: message.method.clone(),
                            payload: arg.to_string(),
                            reason: e.to_string(),
                        };
                        debug!("{}", error);
                        if !self.report(error).await {
                            return Exit::Cancelled;
                        }
                    }
                }
            }
        }
    }

    /// Send an update. Returns `false` if the subscription was cancelled
    /// or the update receiver is gone.
    async fn deliver(&mut self, update: ExchangeState) -> bool {
        tokio::select! {
            biased;
            _ = &mut self.cancel => false,
            sent = self.updates.send(update) => sent.is_ok(),
        }
    }

    /// Send a non-fatal error. Returns `false` if the subscription was cancelled.
    async fn report(&mut self, error: BittrexError) -> bool {
        tokio::select! {
            biased;
            _ = &mut self.cancel => false,
            _ = self.errors.send(error) => true,
        }
    }
}

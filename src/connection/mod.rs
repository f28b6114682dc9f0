//! Per-connection inbound driver.
//!
//! [`InboundConnection`] owns everything one connection direction needs: the
//! registered consumer, the assembler or dispatcher matching its mode, and
//! the [`ConnectionTerminator`]. Fragments are handled strictly one at a
//! time; the consumer call for a fragment is awaited before the next one is
//! read, which is the only backpressure this layer applies.
//!
//! ```text
//! Idle -> Receiving -> Idle                 (message delivered)
//!                   -> Closing -> Closed    (size or protocol violation)
//! ```

mod id;

use futures::{Stream, StreamExt};
use log::{debug, warn};
use tokio::task::JoinHandle;
use tracing::Instrument;

pub use self::id::ConnectionId;
use crate::{
    assembler::{AssemblyOutcome, MessageAssembler},
    consumer::{Consumer, PartialMessageConsumer, Registration, WholeMessageConsumer},
    dispatcher::StreamingDispatcher,
    error::{InboundError, ReceiveError},
    payload::Fragment,
    terminator::{CloseOutcome, CloseTransport, ConnectionTerminator, ViolationSignal},
};

/// Receive state of one connection direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InboundState {
    /// Waiting for the first fragment of the next message.
    Idle,
    /// Part of a message has been received.
    Receiving,
    /// A violation was detected and the close handshake is in progress.
    ///
    /// Handling moves on to [`InboundState::Closed`] within the same call,
    /// so this is only observed when the handling future is dropped midway.
    /// Fragments are refused here just as in `Closed`.
    Closing,
    /// The connection is closed; fragments are refused.
    Closed,
}

/// What happened to a fragment handed to [`InboundConnection::handle_fragment`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FragmentOutcome {
    /// Buffered; the whole message is not complete yet.
    Buffered,
    /// Completed a message that was delivered to the whole-message consumer.
    Delivered,
    /// Forwarded to the partial consumer.
    Forwarded {
        /// Final flag of the forwarded fragment.
        is_final: bool,
    },
    /// Withheld; the connection was closed as a result.
    Violated(CloseOutcome),
}

impl FragmentOutcome {
    /// Returns `true` when the fragment brought its message to a successful
    /// end.
    #[must_use]
    pub const fn completes_message(self) -> bool {
        matches!(self, Self::Delivered | Self::Forwarded { is_final: true })
    }
}

/// Counters reported when an inbound connection finishes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InboundSummary {
    /// Logical messages that reached a successful terminal state.
    pub messages_completed: u64,
    /// Fragments forwarded to a partial consumer.
    pub fragments_forwarded: u64,
    /// Outcome of the close handshake, if one was performed.
    pub close: Option<CloseOutcome>,
}

enum Receiver {
    Buffered {
        assembler: MessageAssembler,
        consumer: Box<dyn WholeMessageConsumer>,
    },
    Streaming {
        dispatcher: StreamingDispatcher,
        consumer: Box<dyn PartialMessageConsumer>,
    },
}

impl Receiver {
    fn terminate(&mut self) {
        match self {
            Self::Buffered { assembler, .. } => assembler.terminate(),
            Self::Streaming { dispatcher, .. } => dispatcher.terminate(),
        }
    }
}

/// Inbound side of a single WebSocket connection.
pub struct InboundConnection<T> {
    connection_id: ConnectionId,
    receiver: Receiver,
    terminator: ConnectionTerminator<T>,
    state: InboundState,
    send_close_reason: bool,
    summary: InboundSummary,
}

impl<T: CloseTransport> InboundConnection<T> {
    /// Create an idle connection delivering to `registration`'s consumer and
    /// closing through `transport`.
    #[must_use]
    pub fn new(connection_id: ConnectionId, registration: Registration, transport: T) -> Self {
        let (consumer, limit, send_close_reason) = registration.into_parts();
        let receiver = match consumer {
            Consumer::Whole(consumer) => Receiver::Buffered {
                assembler: MessageAssembler::new(limit),
                consumer,
            },
            Consumer::Partial(consumer) => Receiver::Streaming {
                dispatcher: StreamingDispatcher::new(limit),
                consumer,
            },
        };
        Self {
            connection_id,
            receiver,
            terminator: ConnectionTerminator::new(connection_id, transport),
            state: InboundState::Idle,
            send_close_reason,
            summary: InboundSummary::default(),
        }
    }

    /// Identifier of this connection.
    #[must_use]
    pub const fn connection_id(&self) -> ConnectionId { self.connection_id }

    /// Current receive state.
    #[must_use]
    pub const fn state(&self) -> InboundState { self.state }

    /// Counters gathered so far.
    #[must_use]
    pub const fn summary(&self) -> InboundSummary { self.summary }

    /// Borrow the transport.
    #[must_use]
    pub fn transport(&self) -> &T { self.terminator.transport() }

    /// Consume the connection and return the transport.
    #[must_use]
    pub fn into_transport(self) -> T { self.terminator.into_transport() }

    /// Process the next inbound fragment.
    ///
    /// Completed messages and forwarded fragments are handed to the consumer
    /// before this returns. A violation closes the connection and is
    /// reported as [`FragmentOutcome::Violated`]; it never reaches the
    /// consumer.
    ///
    /// # Errors
    ///
    /// Returns [`InboundError::Closed`] when the connection is already closing
    /// or closed.
    pub async fn handle_fragment(
        &mut self,
        fragment: Fragment,
    ) -> Result<FragmentOutcome, InboundError> {
        if matches!(self.state, InboundState::Closing | InboundState::Closed) {
            return Err(InboundError::Closed {
                connection_id: self.connection_id,
            });
        }
        self.state = InboundState::Receiving;

        let received = match &mut self.receiver {
            Receiver::Buffered {
                assembler,
                consumer,
            } => match assembler.accept(fragment) {
                Ok(AssemblyOutcome::Pending) => Ok(FragmentOutcome::Buffered),
                Ok(AssemblyOutcome::Complete(message)) => {
                    (**consumer).on_message(message).await;
                    crate::metrics::inc_messages_delivered();
                    Ok(FragmentOutcome::Delivered)
                }
                Err(err) => Err(err),
            },
            Receiver::Streaming {
                dispatcher,
                consumer,
            } => match dispatcher.accept(fragment) {
                Ok(fragment) => {
                    let (chunk, is_final) = fragment.into_parts();
                    (**consumer).on_fragment(chunk, is_final).await;
                    crate::metrics::inc_fragments_forwarded();
                    self.summary.fragments_forwarded += 1;
                    Ok(FragmentOutcome::Forwarded { is_final })
                }
                Err(err) => Err(err),
            },
        };

        match received {
            Ok(outcome) => {
                if outcome.completes_message() {
                    self.summary.messages_completed += 1;
                    self.state = InboundState::Idle;
                }
                Ok(outcome)
            }
            Err(err) => self.reject(&err).await,
        }
    }

    /// Close the connection in response to an externally raised violation.
    ///
    /// Only the first signal produces a close frame; later ones return
    /// [`CloseOutcome::AlreadyClosed`].
    pub async fn signal_violation(&mut self, signal: ViolationSignal) -> CloseOutcome {
        self.close(signal).await
    }

    /// Drive the connection from a stream of fragments until the stream ends
    /// or the connection closes.
    pub async fn run<S>(mut self, fragments: S) -> InboundSummary
    where
        S: Stream<Item = Fragment>,
    {
        futures::pin_mut!(fragments);
        while let Some(fragment) = fragments.next().await {
            match self.handle_fragment(fragment).await {
                Ok(FragmentOutcome::Violated(_)) => break,
                Ok(_) => {}
                Err(err) => {
                    debug!("stopping inbound processing: {err}");
                    break;
                }
            }
        }

        if self.state == InboundState::Receiving {
            debug!(
                "fragment stream ended mid-message: connection_id={}",
                self.connection_id
            );
            self.receiver.terminate();
        }
        self.summary
    }

    async fn reject(&mut self, err: &ReceiveError) -> Result<FragmentOutcome, InboundError> {
        let Some(signal) = err.violation_signal() else {
            self.state = InboundState::Closed;
            return Err(InboundError::Closed {
                connection_id: self.connection_id,
            });
        };

        warn!(
            "inbound message rejected: connection_id={}, error={err}",
            self.connection_id
        );
        if matches!(err, ReceiveError::TooLarge(_)) {
            crate::metrics::inc_size_violations();
        }

        let signal = if self.send_close_reason {
            signal
        } else {
            signal.without_reason()
        };
        Ok(FragmentOutcome::Violated(self.close(signal).await))
    }

    async fn close(&mut self, signal: ViolationSignal) -> CloseOutcome {
        if self.terminator.is_open() {
            self.state = InboundState::Closing;
        }
        self.receiver.terminate();
        let outcome = self.terminator.terminate(signal).await;
        self.state = InboundState::Closed;
        if outcome != CloseOutcome::AlreadyClosed {
            self.summary.close = Some(outcome);
        }
        outcome
    }
}

/// Run one inbound connection on its own tokio task.
///
/// Connections share nothing but their read-only registration settings, so
/// any number may be spawned and processed in parallel.
pub fn spawn_inbound<S, T>(
    connection_id: ConnectionId,
    registration: Registration,
    transport: T,
    fragments: S,
) -> JoinHandle<InboundSummary>
where
    S: Stream<Item = Fragment> + Send + 'static,
    T: CloseTransport + 'static,
{
    let span = tracing::info_span!("inbound", connection_id = connection_id.as_u64());
    tokio::spawn(
        async move {
            let summary = InboundConnection::new(connection_id, registration, transport)
                .run(fragments)
                .await;
            tracing::debug!(
                messages = summary.messages_completed,
                fragments = summary.fragments_forwarded,
                close = ?summary.close,
                "inbound connection finished"
            );
            summary
        }
        .instrument(span),
    )
}

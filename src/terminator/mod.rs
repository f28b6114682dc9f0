//! Close handshake issued when an inbound message breaks its size limit.
//!
//! [`ConnectionTerminator`] consumes a [`ViolationSignal`], writes a close
//! frame through the [`CloseTransport`] and shuts the transport down. A
//! connection is closed at most once: signals arriving while the connection
//! is closing or closed are ignored.
//!
//! Transport failures during the handshake are logged and otherwise
//! absorbed. The connection is considered closed either way and the write is
//! never retried.

mod close;

use std::io;

use async_trait::async_trait;
use log::{debug, info, warn};

pub use self::close::{CloseCode, CloseFrame, MAX_CLOSE_REASON_LEN};
use crate::{connection::ConnectionId, error::SizeExceeded};

/// Request to close a connection with a given status.
///
/// Produced once per offending message and consumed by
/// [`ConnectionTerminator::terminate`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ViolationSignal {
    code: CloseCode,
    reason: Option<String>,
}

impl ViolationSignal {
    /// Create a signal carrying `code` and an optional reason.
    #[must_use]
    pub fn new(code: CloseCode, reason: Option<String>) -> Self { Self { code, reason } }

    /// Signal a "message too big" closure.
    #[must_use]
    pub fn message_too_big(reason: Option<String>) -> Self {
        Self::new(CloseCode::MessageTooBig, reason)
    }

    /// Status code to send.
    #[must_use]
    pub const fn code(&self) -> CloseCode { self.code }

    /// Reason text, if any.
    #[must_use]
    pub fn reason(&self) -> Option<&str> { self.reason.as_deref() }

    /// Drop the reason text, keeping only the status code.
    #[must_use]
    pub fn without_reason(self) -> Self {
        Self {
            reason: None,
            ..self
        }
    }

    fn into_frame(self) -> CloseFrame { CloseFrame::new(self.code, self.reason.unwrap_or_default()) }
}

impl From<SizeExceeded> for ViolationSignal {
    fn from(err: SizeExceeded) -> Self { Self::message_too_big(Some(err.to_string())) }
}

/// Write side of a connection able to perform the close handshake.
///
/// The frame layer implements this for its socket type. `send_close` writes
/// a close control frame; `shutdown` tears down the underlying transport.
#[async_trait]
pub trait CloseTransport: Send {
    /// Write a close control frame to the peer.
    async fn send_close(&mut self, frame: CloseFrame) -> io::Result<()>;

    /// Shut down the transport after the close frame was written.
    async fn shutdown(&mut self) -> io::Result<()>;
}

#[async_trait]
impl<T: CloseTransport + ?Sized> CloseTransport for Box<T> {
    async fn send_close(&mut self, frame: CloseFrame) -> io::Result<()> {
        (**self).send_close(frame).await
    }

    async fn shutdown(&mut self) -> io::Result<()> { (**self).shutdown().await }
}

/// Close state of one connection direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CloseState {
    /// No close has been initiated.
    Open,
    /// The close frame is being written.
    ///
    /// [`ConnectionTerminator::terminate`] leaves this state before it
    /// returns, so it is only observable when that future is dropped before
    /// completion. A terminator left here never sends another close frame.
    Closing,
    /// The handshake finished or failed; the connection is gone.
    Closed,
}

/// Result of a [`ConnectionTerminator::terminate`] call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CloseOutcome {
    /// The close frame was written and the transport shut down.
    Closed(CloseCode),
    /// The handshake could not be completed; the connection is closed
    /// locally anyway.
    TransportFailed(CloseCode),
    /// The connection was already closing; nothing was sent.
    AlreadyClosed,
}

/// Performs the close handshake for one connection, at most once.
#[derive(Debug)]
pub struct ConnectionTerminator<T> {
    connection_id: ConnectionId,
    transport: T,
    state: CloseState,
}

impl<T: CloseTransport> ConnectionTerminator<T> {
    /// Wrap `transport` for the connection identified by `connection_id`.
    #[must_use]
    pub fn new(connection_id: ConnectionId, transport: T) -> Self {
        Self {
            connection_id,
            transport,
            state: CloseState::Open,
        }
    }

    /// Current close state.
    #[must_use]
    pub const fn state(&self) -> CloseState { self.state }

    /// Returns `true` while no close has been initiated.
    #[must_use]
    pub const fn is_open(&self) -> bool { matches!(self.state, CloseState::Open) }

    /// Borrow the wrapped transport.
    #[must_use]
    pub fn transport(&self) -> &T { &self.transport }

    /// Consume the terminator and return the transport.
    #[must_use]
    pub fn into_transport(self) -> T { self.transport }

    /// Close the connection in response to `signal`.
    ///
    /// The first call writes the close frame and shuts the transport down;
    /// later calls return [`CloseOutcome::AlreadyClosed`] without touching
    /// the transport.
    pub async fn terminate(&mut self, signal: ViolationSignal) -> CloseOutcome {
        if !self.is_open() {
            debug!(
                "ignoring close request on closing connection: connection_id={}, code={}",
                self.connection_id,
                signal.code()
            );
            return CloseOutcome::AlreadyClosed;
        }

        self.state = CloseState::Closing;
        let code = signal.code();
        info!(
            "closing connection: connection_id={}, code={code}, reason={:?}",
            self.connection_id,
            signal.reason()
        );

        // Shut down even when the close frame could not be written.
        let sent = self.transport.send_close(signal.into_frame()).await;
        let shut = self.transport.shutdown().await;
        let result = sent.and(shut);
        self.state = CloseState::Closed;
        crate::metrics::inc_closes(code);

        match result {
            Ok(()) => CloseOutcome::Closed(code),
            Err(err) => {
                warn!(
                    "close handshake failed: connection_id={}, code={code}, error={err}",
                    self.connection_id
                );
                CloseOutcome::TransportFailed(code)
            }
        }
    }
}

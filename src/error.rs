//! Error types for inbound message-size enforcement.
//!
//! [`SizeExceeded`] and [`ReceiveError`] never reach application consumers;
//! the connection driver turns them into a close handshake. [`InboundError`]
//! is what the frame feeder sees once a connection has been terminated.

use thiserror::Error;

use crate::{
    connection::ConnectionId,
    payload::PayloadKind,
    terminator::{CloseCode, ViolationSignal},
};

/// A message grew beyond its configured size limit.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
#[error("message size {attempted} exceeds limit of {limit}")]
pub struct SizeExceeded {
    /// Running total that triggered the guard. Saturates at `usize::MAX`.
    pub attempted: usize,
    /// Configured size cap.
    pub limit: usize,
}

/// Errors produced when a fragment is offered to an assembler or dispatcher.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ReceiveError {
    /// The message would exceed its size limit.
    #[error(transparent)]
    TooLarge(#[from] SizeExceeded),

    /// A continuation fragment changed the payload kind mid-message.
    #[error("fragment kind {found:?} does not match message kind {expected:?}")]
    KindMismatch {
        /// Kind established by the first fragment.
        expected: PayloadKind,
        /// Kind carried by the offending fragment.
        found: PayloadKind,
    },

    /// The receiver was terminated and refuses further fragments.
    #[error("receiver terminated")]
    Terminated,
}

impl ReceiveError {
    /// Convert the error into the signal handed to the connection terminator.
    ///
    /// Returns `None` for [`ReceiveError::Terminated`], which is reported to
    /// the feeder instead of producing another close attempt.
    #[must_use]
    pub fn violation_signal(&self) -> Option<ViolationSignal> {
        match self {
            Self::TooLarge(err) => Some(ViolationSignal::from(*err)),
            Self::KindMismatch { .. } => Some(ViolationSignal::new(
                CloseCode::ProtocolError,
                Some(self.to_string()),
            )),
            Self::Terminated => None,
        }
    }
}

/// Errors returned to the frame feeder by an inbound connection.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum InboundError {
    /// The connection is closing or closed and accepts no more fragments.
    #[error("connection {connection_id} is closed")]
    Closed {
        /// Connection that refused the fragment.
        connection_id: ConnectionId,
    },
}

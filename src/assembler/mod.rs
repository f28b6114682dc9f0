//! Buffered assembly for whole-message consumers.
//!
//! [`MessageAssembler`] collects fragments of one logical message into an
//! in-flight buffer and yields the complete value once the final fragment
//! arrives. Every fragment passes the [size guard](crate::guard) before it
//! is buffered, so an oversized message is dropped as soon as the running
//! total crosses the limit rather than at completion.
//!
//! WebSocket delivers messages strictly in order, so at most one message is
//! in flight at a time.

use bytes::{Bytes, BytesMut};

use crate::{
    error::ReceiveError,
    guard::check_fragment,
    limit::MessageSizeLimit,
    payload::{Fragment, Payload, PayloadKind},
};

#[derive(Debug)]
enum Buffer {
    Text(String),
    Binary(BytesMut),
}

/// Message assembly in progress.
#[derive(Debug)]
struct InFlightMessage {
    buffer: Buffer,
    size: usize,
}

impl InFlightMessage {
    fn new(kind: PayloadKind) -> Self {
        let buffer = match kind {
            PayloadKind::Text => Buffer::Text(String::new()),
            PayloadKind::Binary => Buffer::Binary(BytesMut::new()),
        };
        Self { buffer, size: 0 }
    }

    fn kind(&self) -> PayloadKind {
        match self.buffer {
            Buffer::Text(_) => PayloadKind::Text,
            Buffer::Binary(_) => PayloadKind::Binary,
        }
    }

    /// Append a chunk whose kind has already been checked.
    fn push(&mut self, chunk: Payload, new_size: usize) {
        match (&mut self.buffer, chunk) {
            (Buffer::Text(buf), Payload::Text(text)) => buf.push_str(&text),
            (Buffer::Binary(buf), Payload::Binary(bytes)) => buf.extend_from_slice(&bytes),
            _ => return,
        }
        self.size = new_size;
    }

    fn into_payload(self) -> Payload {
        match self.buffer {
            Buffer::Text(text) => Payload::Text(text),
            Buffer::Binary(bytes) => Payload::Binary(Bytes::from(bytes)),
        }
    }
}

/// Result of offering a fragment to a [`MessageAssembler`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AssemblyOutcome {
    /// The fragment was buffered; more fragments are expected.
    Pending,
    /// The final fragment arrived and the message is complete.
    Complete(Payload),
}

/// Buffers the fragments of one logical message under a size limit.
///
/// # Examples
///
/// ```
/// use wslimit::{
///     Fragment,
///     MessageSizeLimit,
///     Payload,
///     assembler::{AssemblyOutcome, MessageAssembler},
/// };
///
/// let mut assembler = MessageAssembler::new(MessageSizeLimit::bounded(10));
/// assert_eq!(
///     assembler.accept(Fragment::text("hello", false)),
///     Ok(AssemblyOutcome::Pending)
/// );
/// assert_eq!(
///     assembler.accept(Fragment::text("world", true)),
///     Ok(AssemblyOutcome::Complete(Payload::from("helloworld")))
/// );
/// ```
#[derive(Debug)]
pub struct MessageAssembler {
    limit: MessageSizeLimit,
    in_flight: Option<InFlightMessage>,
    terminated: bool,
}

impl MessageAssembler {
    /// Create an idle assembler enforcing `limit`.
    #[must_use]
    pub fn new(limit: MessageSizeLimit) -> Self {
        Self {
            limit,
            in_flight: None,
            terminated: false,
        }
    }

    /// Configured size limit.
    #[must_use]
    pub const fn limit(&self) -> MessageSizeLimit { self.limit }

    /// Offer the next fragment of the current message.
    ///
    /// Returns [`AssemblyOutcome::Complete`] exactly once per accepted
    /// message, when its final fragment arrives.
    ///
    /// # Errors
    ///
    /// Returns [`ReceiveError::TooLarge`] when the fragment would push the
    /// message past the limit and [`ReceiveError::KindMismatch`] when a
    /// continuation changes payload kind. Either error discards the in-flight
    /// message and terminates the assembler. Once terminated, every call
    /// returns [`ReceiveError::Terminated`].
    pub fn accept(&mut self, fragment: Fragment) -> Result<AssemblyOutcome, ReceiveError> {
        if self.terminated {
            return Err(ReceiveError::Terminated);
        }

        let (chunk, is_final) = fragment.into_parts();
        let current = self.in_flight.as_ref().map_or(0, |message| message.size);
        let new_size = match check_fragment(current, chunk.size(), self.limit) {
            Ok(size) => size,
            Err(err) => {
                self.terminate();
                return Err(err.into());
            }
        };

        let message = self
            .in_flight
            .get_or_insert_with(|| InFlightMessage::new(chunk.kind()));
        if message.kind() != chunk.kind() {
            let err = ReceiveError::KindMismatch {
                expected: message.kind(),
                found: chunk.kind(),
            };
            self.terminate();
            return Err(err);
        }
        message.push(chunk, new_size);

        if !is_final {
            return Ok(AssemblyOutcome::Pending);
        }

        Ok(self
            .in_flight
            .take()
            .map_or(AssemblyOutcome::Pending, |message| {
                AssemblyOutcome::Complete(message.into_payload())
            }))
    }

    /// Discard any in-flight message and refuse further fragments.
    pub fn terminate(&mut self) {
        self.in_flight = None;
        self.terminated = true;
    }

    /// Returns `true` once the assembler refuses fragments.
    #[must_use]
    pub const fn is_terminated(&self) -> bool { self.terminated }

    /// Returns `true` while a message is partially buffered.
    #[must_use]
    pub const fn is_receiving(&self) -> bool { self.in_flight.is_some() }

    /// Units buffered for the in-flight message.
    #[must_use]
    pub fn buffered_size(&self) -> usize { self.in_flight.as_ref().map_or(0, |m| m.size) }
}

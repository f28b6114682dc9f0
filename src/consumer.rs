//! Application-facing consumer registrations.
//!
//! An endpoint registers exactly one consumer per connection, either a
//! whole-message consumer fed one complete [`Payload`] per logical message, or
//! a partial consumer fed every fragment as it arrives together with its
//! final flag. Both shapes share the same size limit semantics.
//!
//! Closures returning futures implement both consumer traits, so simple
//! handlers need no wrapper type:
//!
//! ```
//! use wslimit::{MessageSizeLimit, Payload, Registration};
//!
//! let registration = Registration::whole(MessageSizeLimit::bounded(5), |message: Payload| async move {
//!     println!("received {message:?}");
//! });
//! assert_eq!(registration.limit(), MessageSizeLimit::bounded(5));
//! ```

use std::{fmt, future::Future};

use async_trait::async_trait;

use crate::{limit::MessageSizeLimit, payload::Payload};

/// Consumer invoked once per complete logical message.
#[async_trait]
pub trait WholeMessageConsumer: Send {
    /// Handle a fully assembled message.
    async fn on_message(&mut self, message: Payload);
}

/// Consumer invoked once per fragment.
///
/// Chunks delivered before a size violation are never retracted; the only
/// signal of a violation is the connection closing.
#[async_trait]
pub trait PartialMessageConsumer: Send {
    /// Handle one fragment; `is_final` marks the last chunk of the message.
    async fn on_fragment(&mut self, chunk: Payload, is_final: bool);
}

#[async_trait]
impl<F, Fut> WholeMessageConsumer for F
where
    F: FnMut(Payload) -> Fut + Send,
    Fut: Future<Output = ()> + Send + 'static,
{
    async fn on_message(&mut self, message: Payload) { (self)(message).await; }
}

#[async_trait]
impl<F, Fut> PartialMessageConsumer for F
where
    F: FnMut(Payload, bool) -> Fut + Send,
    Fut: Future<Output = ()> + Send + 'static,
{
    async fn on_fragment(&mut self, chunk: Payload, is_final: bool) {
        (self)(chunk, is_final).await;
    }
}

/// The consumption mode chosen by an endpoint.
pub enum Consumer {
    /// Buffer fragments and deliver complete messages.
    Whole(Box<dyn WholeMessageConsumer>),
    /// Forward each fragment as it arrives.
    Partial(Box<dyn PartialMessageConsumer>),
}

impl fmt::Debug for Consumer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Whole(_) => f.write_str("Consumer::Whole"),
            Self::Partial(_) => f.write_str("Consumer::Partial"),
        }
    }
}

/// A consumer together with the size limit it was registered with.
#[derive(Debug)]
pub struct Registration {
    consumer: Consumer,
    limit: MessageSizeLimit,
    send_close_reason: bool,
}

impl Registration {
    /// Register a whole-message consumer.
    #[must_use]
    pub fn whole<C>(limit: MessageSizeLimit, consumer: C) -> Self
    where
        C: WholeMessageConsumer + 'static,
    {
        Self::new(Consumer::Whole(Box::new(consumer)), limit)
    }

    /// Register a partial consumer.
    #[must_use]
    pub fn partial<C>(limit: MessageSizeLimit, consumer: C) -> Self
    where
        C: PartialMessageConsumer + 'static,
    {
        Self::new(Consumer::Partial(Box::new(consumer)), limit)
    }

    /// Register an already boxed consumer.
    #[must_use]
    pub fn new(consumer: Consumer, limit: MessageSizeLimit) -> Self {
        Self {
            consumer,
            limit,
            send_close_reason: true,
        }
    }

    /// Choose whether close frames carry a human-readable reason.
    #[must_use]
    pub fn with_close_reason(mut self, send: bool) -> Self {
        self.send_close_reason = send;
        self
    }

    /// Configured size limit.
    #[must_use]
    pub const fn limit(&self) -> MessageSizeLimit { self.limit }

    /// Whether close frames carry a reason.
    #[must_use]
    pub const fn sends_close_reason(&self) -> bool { self.send_close_reason }

    /// Split into the consumer and its settings.
    #[must_use]
    pub fn into_parts(self) -> (Consumer, MessageSizeLimit, bool) {
        (self.consumer, self.limit, self.send_close_reason)
    }
}

//! Endpoint configuration.
//!
//! [`InboundConfig`] is the serde-loadable form of the settings an endpoint
//! applies to every connection. It is read-only once registrations are built
//! from it, so one value can be shared across any number of connections.

use serde::{Deserialize, Serialize};

use crate::{
    consumer::{PartialMessageConsumer, Registration, WholeMessageConsumer},
    limit::MessageSizeLimit,
};

/// Size-limit settings for an endpoint.
///
/// Missing fields fall back to [`InboundConfig::default`]: no size limit and
/// close frames that carry a reason.
///
/// ```
/// use wslimit::{InboundConfig, MessageSizeLimit};
///
/// let config = InboundConfig::default().with_max_message_size(MessageSizeLimit::bounded(64));
/// assert_eq!(config.max_message_size, MessageSizeLimit::bounded(64));
/// assert!(config.send_close_reason);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InboundConfig {
    /// Ceiling applied to each logical message.
    pub max_message_size: MessageSizeLimit,
    /// Whether close frames include a human-readable reason.
    pub send_close_reason: bool,
}

impl Default for InboundConfig {
    fn default() -> Self {
        Self {
            max_message_size: MessageSizeLimit::UNBOUNDED,
            send_close_reason: true,
        }
    }
}

impl InboundConfig {
    /// Replace the message size limit.
    #[must_use]
    pub fn with_max_message_size(mut self, limit: MessageSizeLimit) -> Self {
        self.max_message_size = limit;
        self
    }

    /// Build a whole-message registration using these settings.
    #[must_use]
    pub fn whole<C>(&self, consumer: C) -> Registration
    where
        C: WholeMessageConsumer + 'static,
    {
        Registration::whole(self.max_message_size, consumer).with_close_reason(self.send_close_reason)
    }

    /// Build a partial-message registration using these settings.
    #[must_use]
    pub fn partial<C>(&self, consumer: C) -> Registration
    where
        C: PartialMessageConsumer + 'static,
    {
        Registration::partial(self.max_message_size, consumer)
            .with_close_reason(self.send_close_reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_unbounded_with_reason() {
        let config = InboundConfig::default();
        assert!(config.max_message_size.is_unbounded());
        assert!(config.send_close_reason);
    }
}

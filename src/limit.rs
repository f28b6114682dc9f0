//! Per-registration ceiling on the size of a logical message.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Maximum size of a single logical message.
///
/// Sizes are measured in payload units: bytes for binary messages and
/// characters for text messages. The limit is inclusive, so a message whose
/// size equals the limit is accepted.
///
/// `MessageSizeLimit` deserialises from either an integer or `null`, the
/// latter meaning unbounded.
///
/// # Examples
///
/// ```
/// use wslimit::MessageSizeLimit;
///
/// let limit = MessageSizeLimit::bounded(5);
/// assert!(limit.permits(5));
/// assert!(!limit.permits(6));
/// assert!(MessageSizeLimit::UNBOUNDED.permits(usize::MAX));
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageSizeLimit(Option<usize>);

impl MessageSizeLimit {
    /// A limit that accepts messages of any size.
    pub const UNBOUNDED: Self = Self(None);

    /// Create a limit of `max` units.
    #[must_use]
    pub const fn bounded(max: usize) -> Self { Self(Some(max)) }

    /// Return the configured ceiling, or `None` when unbounded.
    #[must_use]
    pub const fn get(self) -> Option<usize> { self.0 }

    /// Returns `true` when no ceiling is configured.
    #[must_use]
    pub const fn is_unbounded(self) -> bool { self.0.is_none() }

    /// Returns `true` when a message of `size` units fits within the limit.
    #[must_use]
    pub const fn permits(self, size: usize) -> bool {
        match self.0 {
            Some(max) => size <= max,
            None => true,
        }
    }
}

impl From<Option<usize>> for MessageSizeLimit {
    fn from(value: Option<usize>) -> Self { Self(value) }
}

impl From<usize> for MessageSizeLimit {
    fn from(value: usize) -> Self { Self::bounded(value) }
}

impl fmt::Display for MessageSizeLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(max) => write!(f, "{max}"),
            None => f.write_str("unbounded"),
        }
    }
}

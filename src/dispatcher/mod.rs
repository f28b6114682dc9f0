//! Pass-through dispatch for partial-message consumers.
//!
//! [`StreamingDispatcher`] never buffers payload data. It only tracks the
//! running size of the current logical message so every fragment can be
//! checked against the limit before it is forwarded. Fragments forwarded
//! before a violation stay delivered; the overflowing fragment and anything
//! after it are withheld.

use crate::{
    error::ReceiveError,
    guard::check_fragment,
    limit::MessageSizeLimit,
    payload::{Fragment, PayloadKind},
};

/// Tracks the running size of a streamed message under a size limit.
///
/// # Examples
///
/// ```
/// use wslimit::{Fragment, MessageSizeLimit, dispatcher::StreamingDispatcher};
///
/// let mut dispatcher = StreamingDispatcher::new(MessageSizeLimit::bounded(4));
/// let forwarded = dispatcher
///     .accept(Fragment::text("ab", false))
///     .expect("fits");
/// assert_eq!(forwarded.payload().as_text(), Some("ab"));
/// assert!(dispatcher.accept(Fragment::text("cde", true)).is_err());
/// ```
#[derive(Debug)]
pub struct StreamingDispatcher {
    limit: MessageSizeLimit,
    accumulated: usize,
    kind: Option<PayloadKind>,
    terminated: bool,
}

impl StreamingDispatcher {
    /// Create a dispatcher enforcing `limit`.
    #[must_use]
    pub fn new(limit: MessageSizeLimit) -> Self {
        Self {
            limit,
            accumulated: 0,
            kind: None,
            terminated: false,
        }
    }

    /// Configured size limit.
    #[must_use]
    pub const fn limit(&self) -> MessageSizeLimit { self.limit }

    /// Check a fragment and hand it back for forwarding.
    ///
    /// After a final fragment is accepted the running size resets for the
    /// next message.
    ///
    /// # Errors
    ///
    /// Returns [`ReceiveError::TooLarge`] or [`ReceiveError::KindMismatch`]
    /// and terminates the dispatcher when the fragment must be withheld.
    /// Once terminated, every call returns [`ReceiveError::Terminated`].
    pub fn accept(&mut self, fragment: Fragment) -> Result<Fragment, ReceiveError> {
        if self.terminated {
            return Err(ReceiveError::Terminated);
        }

        let total = match check_fragment(self.accumulated, fragment.size(), self.limit) {
            Ok(total) => total,
            Err(err) => {
                self.terminate();
                return Err(err.into());
            }
        };

        let found = fragment.payload().kind();
        if let Some(expected) = self.kind
            && expected != found
        {
            self.terminate();
            return Err(ReceiveError::KindMismatch { expected, found });
        }
        self.accumulated = total;

        if fragment.is_final() {
            self.accumulated = 0;
            self.kind = None;
        } else {
            self.kind = Some(found);
        }
        Ok(fragment)
    }

    /// Drop the running size and refuse further fragments.
    pub fn terminate(&mut self) {
        self.accumulated = 0;
        self.kind = None;
        self.terminated = true;
    }

    /// Returns `true` once the dispatcher refuses fragments.
    #[must_use]
    pub const fn is_terminated(&self) -> bool { self.terminated }

    /// Units forwarded so far for the current message.
    #[must_use]
    pub const fn accumulated(&self) -> usize { self.accumulated }
}

//! Fragment and payload types fed in from the frame layer.
//!
//! A [`Fragment`] is one frame's contribution to a logical message. Its
//! [`Payload`] is either text or binary; the frame layer is expected to hand
//! over text chunks that are already valid UTF-8.

use bytes::Bytes;

/// Kind of data carried by a logical message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PayloadKind {
    /// UTF-8 text, measured in characters.
    Text,
    /// Raw bytes, measured in bytes.
    Binary,
}

/// A chunk of message data, or a fully assembled message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Payload {
    /// Text data.
    Text(String),
    /// Binary data.
    Binary(Bytes),
}

impl Payload {
    /// Kind of data held by this payload.
    #[must_use]
    pub const fn kind(&self) -> PayloadKind {
        match self {
            Self::Text(_) => PayloadKind::Text,
            Self::Binary(_) => PayloadKind::Binary,
        }
    }

    /// Size of the payload in units counted against a [`MessageSizeLimit`].
    ///
    /// Text is counted in characters, binary data in bytes.
    ///
    /// ```
    /// use wslimit::Payload;
    ///
    /// assert_eq!(Payload::from("héllo").size(), 5);
    /// assert_eq!(Payload::from(vec![0_u8; 3]).size(), 3);
    /// ```
    ///
    /// [`MessageSizeLimit`]: crate::MessageSizeLimit
    #[must_use]
    pub fn size(&self) -> usize {
        match self {
            Self::Text(text) => text.chars().count(),
            Self::Binary(bytes) => bytes.len(),
        }
    }

    /// Returns `true` when the payload holds no data.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(text) => text.is_empty(),
            Self::Binary(bytes) => bytes.is_empty(),
        }
    }

    /// Borrow the text content, if this is a text payload.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Binary(_) => None,
        }
    }

    /// Borrow the binary content, if this is a binary payload.
    #[must_use]
    pub fn as_binary(&self) -> Option<&[u8]> {
        match self {
            Self::Binary(bytes) => Some(bytes),
            Self::Text(_) => None,
        }
    }
}

impl From<&str> for Payload {
    fn from(value: &str) -> Self { Self::Text(value.to_owned()) }
}

impl From<String> for Payload {
    fn from(value: String) -> Self { Self::Text(value) }
}

impl From<Bytes> for Payload {
    fn from(value: Bytes) -> Self { Self::Binary(value) }
}

impl From<Vec<u8>> for Payload {
    fn from(value: Vec<u8>) -> Self { Self::Binary(Bytes::from(value)) }
}

impl From<&[u8]> for Payload {
    fn from(value: &[u8]) -> Self { Self::Binary(Bytes::copy_from_slice(value)) }
}

/// One frame's payload plus the flag marking the last fragment of a message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Fragment {
    payload: Payload,
    is_final: bool,
}

impl Fragment {
    /// Create a fragment from any payload-like value.
    #[must_use]
    pub fn new(payload: impl Into<Payload>, is_final: bool) -> Self {
        Self {
            payload: payload.into(),
            is_final,
        }
    }

    /// Create a text fragment.
    #[must_use]
    pub fn text(text: impl Into<String>, is_final: bool) -> Self {
        Self::new(Payload::Text(text.into()), is_final)
    }

    /// Create a binary fragment.
    #[must_use]
    pub fn binary(bytes: impl Into<Bytes>, is_final: bool) -> Self {
        Self::new(Payload::Binary(bytes.into()), is_final)
    }

    /// Borrow the payload chunk.
    #[must_use]
    pub fn payload(&self) -> &Payload { &self.payload }

    /// Whether this fragment completes its logical message.
    #[must_use]
    pub const fn is_final(&self) -> bool { self.is_final }

    /// Size of the payload chunk in limit units.
    #[must_use]
    pub fn size(&self) -> usize { self.payload.size() }

    /// Consume the fragment, returning the payload and final flag.
    #[must_use]
    pub fn into_parts(self) -> (Payload, bool) { (self.payload, self.is_final) }
}

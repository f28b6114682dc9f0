//! Close codes and close-frame payloads.

use std::fmt;

use bytes::{BufMut, Bytes, BytesMut};

/// Longest reason a close frame may carry: a control frame payload is capped
/// at 125 bytes, two of which hold the status code.
pub const MAX_CLOSE_REASON_LEN: usize = 123;

/// Status codes from the WebSocket close-code registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum CloseCode {
    /// Normal closure (1000).
    Normal = 1000,
    /// Endpoint going away (1001).
    GoingAway = 1001,
    /// Protocol error (1002).
    ProtocolError = 1002,
    /// Unsupported data (1003).
    Unsupported = 1003,
    /// Invalid frame payload data (1007).
    InvalidPayload = 1007,
    /// Policy violation (1008).
    PolicyViolation = 1008,
    /// Message too big (1009).
    MessageTooBig = 1009,
    /// Mandatory extension missing (1010).
    MandatoryExtension = 1010,
    /// Internal server error (1011).
    InternalError = 1011,
}

impl CloseCode {
    /// Numeric status code as sent on the wire.
    #[must_use]
    pub const fn as_u16(self) -> u16 { self as u16 }

    /// Look up a code by its numeric value.
    #[must_use]
    pub const fn from_u16(code: u16) -> Option<Self> {
        Some(match code {
            1000 => Self::Normal,
            1001 => Self::GoingAway,
            1002 => Self::ProtocolError,
            1003 => Self::Unsupported,
            1007 => Self::InvalidPayload,
            1008 => Self::PolicyViolation,
            1009 => Self::MessageTooBig,
            1010 => Self::MandatoryExtension,
            1011 => Self::InternalError,
            _ => return None,
        })
    }
}

impl From<CloseCode> for u16 {
    fn from(code: CloseCode) -> Self { code.as_u16() }
}

impl fmt::Display for CloseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:?})", self.as_u16(), self)
    }
}

/// Payload of a close control frame.
///
/// The reason is truncated on a character boundary so the encoded frame
/// never exceeds the control-frame payload cap.
///
/// ```
/// use wslimit::terminator::{CloseCode, CloseFrame};
///
/// let frame = CloseFrame::new(CloseCode::MessageTooBig, "too big");
/// assert_eq!(&frame.encode()[..], b"\x03\xf1too big");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CloseFrame {
    code: CloseCode,
    reason: String,
}

impl CloseFrame {
    /// Build a close frame, truncating `reason` to [`MAX_CLOSE_REASON_LEN`]
    /// bytes.
    #[must_use]
    pub fn new(code: CloseCode, reason: impl Into<String>) -> Self {
        let mut reason = reason.into();
        truncate_on_char_boundary(&mut reason, MAX_CLOSE_REASON_LEN);
        Self { code, reason }
    }

    /// Status code carried by the frame.
    #[must_use]
    pub const fn code(&self) -> CloseCode { self.code }

    /// Reason text, possibly empty.
    #[must_use]
    pub fn reason(&self) -> &str { &self.reason }

    /// Encode as a big-endian status code followed by the UTF-8 reason.
    #[must_use]
    pub fn encode(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(2 + self.reason.len());
        buf.put_u16(self.code.as_u16());
        buf.put_slice(self.reason.as_bytes());
        buf.freeze()
    }
}

fn truncate_on_char_boundary(text: &mut String, max: usize) {
    if text.len() <= max {
        return;
    }
    let mut end = max;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    text.truncate(end);
}

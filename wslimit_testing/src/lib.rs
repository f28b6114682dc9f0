//! Test doubles for exercising `wslimit` connections in memory.
//!
//! [`RecordingTransport`] captures close frames instead of writing them to a
//! socket; the recording consumers keep what an endpoint was handed so tests
//! can assert on deliveries.
//!
//! ```rust
//! use wslimit::{ConnectionId, InboundConnection, MessageSizeLimit, Registration};
//! use wslimit_testing::{RecordingTransport, RecordingWholeConsumer, fragment_stream, text_fragments};
//!
//! # async fn example() {
//! let consumer = RecordingWholeConsumer::new();
//! let transport = RecordingTransport::new();
//! let registration = Registration::whole(MessageSizeLimit::bounded(5), consumer.clone());
//! InboundConnection::new(ConnectionId::new(1), registration, transport.clone())
//!     .run(fragment_stream(text_fragments("TEST1", 2)))
//!     .await;
//! assert_eq!(consumer.texts(), ["TEST1"]);
//! assert!(transport.close_codes().is_empty());
//! # }
//! ```

pub mod consumers;
pub mod fragments;
pub mod logging;
pub mod transport;

pub use consumers::{RecordingPartialConsumer, RecordingWholeConsumer};
pub use fragments::{
    PullLog,
    binary_fragments,
    fragment_stream,
    text_fragments,
    timed_fragment_stream,
};
pub use logging::{LoggerHandle, logger};
pub use transport::RecordingTransport;

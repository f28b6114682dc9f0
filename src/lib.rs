#![doc(html_root_url = "https://docs.rs/wslimit/latest")]
//! Public API for the `wslimit` library.
//!
//! This crate enforces a maximum size on inbound WebSocket messages. Frames
//! arrive from the frame layer as [`Fragment`]s; each one is checked by the
//! [size guard](guard) and then either buffered for a whole-message
//! consumer or forwarded to a partial consumer. A message that outgrows its
//! limit is never delivered: the connection is closed with status 1009
//! ("message too big") instead.

pub mod assembler;
pub mod config;
pub mod connection;
pub mod consumer;
pub mod dispatcher;
pub mod error;
pub mod guard;
pub mod limit;
pub mod metrics;
pub mod payload;
pub mod terminator;

pub use config::InboundConfig;
pub use connection::{
    ConnectionId,
    FragmentOutcome,
    InboundConnection,
    InboundState,
    InboundSummary,
    spawn_inbound,
};
pub use consumer::{Consumer, PartialMessageConsumer, Registration, WholeMessageConsumer};
pub use error::{InboundError, ReceiveError, SizeExceeded};
pub use limit::MessageSizeLimit;
pub use payload::{Fragment, Payload, PayloadKind};
pub use terminator::{CloseCode, CloseFrame, CloseOutcome, CloseTransport, ViolationSignal};

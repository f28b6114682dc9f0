//! In-memory close transport that records the handshake.

use std::{
    io,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use async_trait::async_trait;
use wslimit::terminator::{CloseFrame, CloseTransport};

#[derive(Debug, Default)]
struct TransportLog {
    frames: Vec<CloseFrame>,
    shutdowns: usize,
}

/// Close transport that keeps every close frame it is asked to send.
///
/// Clones share the same log, so keep one clone for assertions and hand the
/// other to the connection under test.
#[derive(Clone, Debug, Default)]
pub struct RecordingTransport {
    log: Arc<Mutex<TransportLog>>,
    fail_writes: bool,
}

impl RecordingTransport {
    /// Create a transport whose writes succeed.
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Create a transport whose peer is already gone: every close write
    /// fails with `BrokenPipe`.
    #[must_use]
    pub fn disconnected() -> Self {
        Self {
            fail_writes: true,
            ..Self::default()
        }
    }

    fn log(&self) -> MutexGuard<'_, TransportLog> {
        self.log.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Close frames written so far.
    #[must_use]
    pub fn close_frames(&self) -> Vec<CloseFrame> { self.log().frames.clone() }

    /// Numeric status codes of the close frames written so far.
    #[must_use]
    pub fn close_codes(&self) -> Vec<u16> {
        self.log().frames.iter().map(|f| f.code().as_u16()).collect()
    }

    /// Number of times the transport was shut down.
    #[must_use]
    pub fn shutdowns(&self) -> usize { self.log().shutdowns }
}

#[async_trait]
impl CloseTransport for RecordingTransport {
    async fn send_close(&mut self, frame: CloseFrame) -> io::Result<()> {
        if self.fail_writes {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "peer disconnected"));
        }
        self.log().frames.push(frame);
        Ok(())
    }

    async fn shutdown(&mut self) -> io::Result<()> {
        self.log().shutdowns += 1;
        Ok(())
    }
}

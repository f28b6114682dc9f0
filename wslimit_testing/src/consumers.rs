//! Consumers that record what they receive.

use std::{
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use async_trait::async_trait;
use tokio::time::Instant;
use wslimit::{PartialMessageConsumer, Payload, WholeMessageConsumer};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Whole-message consumer storing every delivered message.
///
/// Clones share storage. An optional delay makes each delivery slow, which
/// lets tests observe that the next fragment waits for it.
#[derive(Clone, Debug, Default)]
pub struct RecordingWholeConsumer {
    messages: Arc<Mutex<Vec<Payload>>>,
    finished: Arc<Mutex<Vec<Instant>>>,
    delay: Option<Duration>,
}

impl RecordingWholeConsumer {
    /// Create a consumer that records immediately.
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Sleep for `delay` before recording each message.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Messages delivered so far.
    #[must_use]
    pub fn messages(&self) -> Vec<Payload> { lock(&self.messages).clone() }

    /// Instants at which each `on_message` call returned, in delivery order.
    #[must_use]
    pub fn finished_at(&self) -> Vec<Instant> { lock(&self.finished).clone() }

    /// Text messages delivered so far; binary messages are skipped.
    #[must_use]
    pub fn texts(&self) -> Vec<String> {
        lock(&self.messages)
            .iter()
            .filter_map(|m| m.as_text().map(str::to_owned))
            .collect()
    }
}

#[async_trait]
impl WholeMessageConsumer for RecordingWholeConsumer {
    async fn on_message(&mut self, message: Payload) {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        lock(&self.messages).push(message);
        lock(&self.finished).push(Instant::now());
    }
}

/// Partial consumer storing every forwarded chunk with its final flag.
#[derive(Clone, Debug, Default)]
pub struct RecordingPartialConsumer {
    chunks: Arc<Mutex<Vec<(Payload, bool)>>>,
}

impl RecordingPartialConsumer {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Chunks forwarded so far, with their final flags.
    #[must_use]
    pub fn chunks(&self) -> Vec<(Payload, bool)> { lock(&self.chunks).clone() }

    /// Concatenation of all text chunks forwarded so far.
    #[must_use]
    pub fn joined_text(&self) -> String {
        lock(&self.chunks)
            .iter()
            .filter_map(|(chunk, _)| chunk.as_text())
            .collect()
    }
}

#[async_trait]
impl PartialMessageConsumer for RecordingPartialConsumer {
    async fn on_fragment(&mut self, chunk: Payload, is_final: bool) {
        lock(&self.chunks).push((chunk, is_final));
    }
}

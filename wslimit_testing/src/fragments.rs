//! Builders for fragment sequences.

use std::sync::{Arc, Mutex, PoisonError};

use futures::{Stream, StreamExt, stream};
use tokio::time::Instant;
use wslimit::Fragment;

/// Split `text` into text fragments of at most `chunk_chars` characters.
///
/// The last fragment is flagged final. Empty text yields a single empty
/// final fragment.
///
/// # Panics
///
/// Panics if `chunk_chars` is zero.
#[must_use]
pub fn text_fragments(text: &str, chunk_chars: usize) -> Vec<Fragment> {
    assert!(chunk_chars > 0, "chunk size must be non-zero");
    let chars: Vec<char> = text.chars().collect();
    if chars.is_empty() {
        return vec![Fragment::text("", true)];
    }
    let count = chars.len().div_ceil(chunk_chars);
    chars
        .chunks(chunk_chars)
        .enumerate()
        .map(|(i, chunk)| Fragment::text(chunk.iter().collect::<String>(), i + 1 == count))
        .collect()
}

/// Split `bytes` into binary fragments of at most `chunk_len` bytes.
///
/// # Panics
///
/// Panics if `chunk_len` is zero.
#[must_use]
pub fn binary_fragments(bytes: &[u8], chunk_len: usize) -> Vec<Fragment> {
    assert!(chunk_len > 0, "chunk size must be non-zero");
    if bytes.is_empty() {
        return vec![Fragment::binary(Vec::new(), true)];
    }
    let count = bytes.len().div_ceil(chunk_len);
    bytes
        .chunks(chunk_len)
        .enumerate()
        .map(|(i, chunk)| Fragment::binary(chunk.to_vec(), i + 1 == count))
        .collect()
}

/// Turn a fragment sequence into the stream consumed by
/// [`InboundConnection::run`](wslimit::InboundConnection::run).
pub fn fragment_stream(fragments: Vec<Fragment>) -> impl Stream<Item = Fragment> + Send + 'static {
    stream::iter(fragments)
}

/// Instants at which fragments were pulled from a [`timed_fragment_stream`].
#[derive(Clone, Debug, Default)]
pub struct PullLog(Arc<Mutex<Vec<Instant>>>);

impl PullLog {
    /// Pull instants so far, one per fragment read.
    #[must_use]
    pub fn instants(&self) -> Vec<Instant> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

/// Like [`fragment_stream`], but records the instant each fragment is read.
pub fn timed_fragment_stream(
    fragments: Vec<Fragment>,
) -> (impl Stream<Item = Fragment> + Send + 'static, PullLog) {
    let log = PullLog::default();
    let sink = Arc::clone(&log.0);
    let stream = stream::iter(fragments).map(move |fragment| {
        sink.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Instant::now());
        fragment
    });
    (stream, log)
}

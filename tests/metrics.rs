#![cfg(feature = "metrics")]
//! Tests for `wslimit` metrics helpers.
//!
//! Counters are checked with `metrics_util::debugging::DebuggingRecorder`
//! installed as a thread-local recorder around a current-thread runtime.

use metrics_util::{
    CompositeKey,
    debugging::{DebugValue, DebuggingRecorder, Snapshotter},
};
use wslimit::{ConnectionId, InboundConnection, MessageSizeLimit, Registration};
use wslimit_testing::{RecordingTransport, RecordingWholeConsumer, fragment_stream, text_fragments};

fn debugging_recorder_setup() -> (Snapshotter, DebuggingRecorder) {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();
    (snapshotter, recorder)
}

fn counter_value<U, D>(metrics: &[(CompositeKey, U, D, DebugValue)], name: &str) -> u64 {
    metrics
        .iter()
        .filter(|(key, _, _, _)| key.key().name() == name)
        .map(|(_, _, _, value)| match value {
            DebugValue::Counter(c) => *c,
            _ => 0,
        })
        .sum()
}

#[test]
fn delivery_and_violation_are_counted() {
    let (snapshotter, recorder) = debugging_recorder_setup();
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("failed to build test runtime");

    metrics::with_local_recorder(&recorder, || {
        rt.block_on(async {
            let mut fragments = text_fragments("TEST1", 5);
            fragments.extend(text_fragments("LONG--", 6));
            InboundConnection::new(
                ConnectionId::new(1),
                Registration::whole(MessageSizeLimit::bounded(5), RecordingWholeConsumer::new()),
                RecordingTransport::new(),
            )
            .run(fragment_stream(fragments))
            .await;
        });
    });

    // Snapshots drain counters, so every lookup reads the same one.
    let metrics = snapshotter.snapshot().into_vec();
    assert_eq!(counter_value(&metrics, wslimit::metrics::MESSAGES_DELIVERED), 1);
    assert_eq!(counter_value(&metrics, wslimit::metrics::SIZE_VIOLATIONS), 1);
    assert_eq!(counter_value(&metrics, wslimit::metrics::CLOSES_TOTAL), 1);
}

#[test]
fn close_counter_is_labelled_with_code() {
    let (snapshotter, recorder) = debugging_recorder_setup();
    metrics::with_local_recorder(&recorder, || {
        wslimit::metrics::inc_closes(wslimit::CloseCode::MessageTooBig);
    });

    let found = snapshotter.snapshot().into_vec().iter().any(|(k, _, _, v)| {
        k.key().name() == wslimit::metrics::CLOSES_TOTAL
            && k.key()
                .labels()
                .any(|l| l.key() == "code" && l.value() == "1009")
            && matches!(v, DebugValue::Counter(c) if *c == 1)
    });
    assert!(found, "close metric not recorded");
}

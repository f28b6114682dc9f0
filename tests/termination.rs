//! Close handshake behaviour seen from the transport and the logs.
//!
//! Every test here shares the global log capture, so they run serially.

use rstest::rstest;
use serial_test::serial;
use wslimit::{
    CloseCode,
    CloseOutcome,
    ConnectionId,
    Fragment,
    FragmentOutcome,
    InboundConnection,
    InboundError,
    InboundState,
    MessageSizeLimit,
    Registration,
    ViolationSignal,
};
use wslimit_testing::{LoggerHandle, RecordingTransport, RecordingWholeConsumer, logger};

fn connection(
    transport: RecordingTransport,
) -> (InboundConnection<RecordingTransport>, RecordingWholeConsumer) {
    let consumer = RecordingWholeConsumer::new();
    let registration = Registration::whole(MessageSizeLimit::bounded(5), consumer.clone());
    (
        InboundConnection::new(ConnectionId::new(9), registration, transport),
        consumer,
    )
}

#[serial(logger)]
#[tokio::test]
async fn second_violation_sends_no_additional_close_frame() {
    let transport = RecordingTransport::new();
    let (mut conn, _) = connection(transport.clone());

    conn.handle_fragment(Fragment::text("LONG--", true))
        .await
        .expect("open");
    let again = conn
        .signal_violation(ViolationSignal::message_too_big(None))
        .await;

    assert_eq!(again, CloseOutcome::AlreadyClosed);
    assert_eq!(transport.close_codes(), [1009]);
    assert_eq!(transport.shutdowns(), 1);
}

#[serial(logger)]
#[tokio::test]
async fn closed_connection_fails_fast() {
    let transport = RecordingTransport::new();
    let (mut conn, consumer) = connection(transport.clone());

    conn.handle_fragment(Fragment::text("LONG", false))
        .await
        .expect("open");
    conn.handle_fragment(Fragment::text("--", true))
        .await
        .expect("open");

    let err = conn
        .handle_fragment(Fragment::text("ok", true))
        .await
        .expect_err("fragments after close are refused");
    assert!(matches!(err, InboundError::Closed { .. }));
    assert_eq!(conn.state(), InboundState::Closed);
    assert!(consumer.messages().is_empty());
}

#[rstest]
#[serial(logger)]
#[tokio::test]
async fn transport_failure_closes_locally_and_logs(mut logger: LoggerHandle) {
    let transport = RecordingTransport::disconnected();
    let (mut conn, _) = connection(transport.clone());

    let outcome = conn
        .handle_fragment(Fragment::text("LONG--", true))
        .await
        .expect("open");

    assert_eq!(
        outcome,
        FragmentOutcome::Violated(CloseOutcome::TransportFailed(CloseCode::MessageTooBig))
    );
    assert_eq!(conn.state(), InboundState::Closed);
    assert!(transport.close_frames().is_empty());
    assert_eq!(transport.shutdowns(), 1);
    let warnings = logger.take_matching(log::Level::Warn, "close handshake failed");
    assert_eq!(warnings.len(), 1, "expected one warning, got {warnings:?}");
}

#[rstest]
#[serial(logger)]
#[tokio::test]
async fn violation_is_logged_once(mut logger: LoggerHandle) {
    let transport = RecordingTransport::new();
    let (mut conn, _) = connection(transport);

    conn.handle_fragment(Fragment::text("LONG--", true))
        .await
        .expect("open");
    conn.signal_violation(ViolationSignal::message_too_big(None))
        .await;

    let rejected = logger.take_matching(log::Level::Warn, "inbound message rejected");
    assert_eq!(rejected.len(), 1);
}

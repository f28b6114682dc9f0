//! End-to-end size enforcement through `InboundConnection::run`.
//!
//! Mirrors an endpoint registered with a five-character limit: a message of
//! exactly five characters is delivered, six characters closes the
//! connection with 1009 and delivers nothing.

use rstest::rstest;
use wslimit::{
    CloseCode,
    CloseOutcome,
    ConnectionId,
    Fragment,
    InboundConnection,
    InboundSummary,
    MessageSizeLimit,
    Payload,
    Registration,
};
use wslimit_testing::{
    RecordingPartialConsumer,
    RecordingTransport,
    RecordingWholeConsumer,
    binary_fragments,
    fragment_stream,
    text_fragments,
};

const LIMIT: MessageSizeLimit = MessageSizeLimit::bounded(5);
const TOO_BIG: u16 = 1009;

async fn run_whole(
    limit: MessageSizeLimit,
    fragments: Vec<Fragment>,
) -> (RecordingWholeConsumer, RecordingTransport, InboundSummary) {
    let consumer = RecordingWholeConsumer::new();
    let transport = RecordingTransport::new();
    let summary = InboundConnection::new(
        ConnectionId::new(1),
        Registration::whole(limit, consumer.clone()),
        transport.clone(),
    )
    .run(fragment_stream(fragments))
    .await;
    (consumer, transport, summary)
}

async fn run_partial(
    limit: MessageSizeLimit,
    fragments: Vec<Fragment>,
) -> (RecordingPartialConsumer, RecordingTransport, InboundSummary) {
    let consumer = RecordingPartialConsumer::new();
    let transport = RecordingTransport::new();
    let summary = InboundConnection::new(
        ConnectionId::new(2),
        Registration::partial(limit, consumer.clone()),
        transport.clone(),
    )
    .run(fragment_stream(fragments))
    .await;
    (consumer, transport, summary)
}

#[rstest]
#[case::single_frame(5)]
#[case::split(2)]
#[case::per_char(1)]
#[tokio::test]
async fn whole_message_at_limit_is_delivered(#[case] chunk: usize) {
    let (consumer, transport, summary) = run_whole(LIMIT, text_fragments("TEST1", chunk)).await;

    assert_eq!(consumer.texts(), ["TEST1"]);
    assert!(transport.close_codes().is_empty());
    assert_eq!(summary.close, None);
}

#[rstest]
#[case::single_frame(6)]
#[case::split(3)]
#[case::per_char(1)]
#[tokio::test]
async fn whole_message_over_limit_closes_with_1009(#[case] chunk: usize) {
    let (consumer, transport, summary) = run_whole(LIMIT, text_fragments("LONG--", chunk)).await;

    assert!(consumer.messages().is_empty());
    assert_eq!(transport.close_codes(), [TOO_BIG]);
    assert_eq!(transport.shutdowns(), 1);
    assert_eq!(
        summary.close,
        Some(CloseOutcome::Closed(CloseCode::MessageTooBig))
    );
}

#[tokio::test]
async fn partial_message_at_limit_is_forwarded() {
    let (consumer, transport, _) = run_partial(LIMIT, vec![Fragment::text("TEST1", false)]).await;

    assert_eq!(
        consumer.chunks(),
        vec![(Payload::from("TEST1"), false)]
    );
    assert!(transport.close_codes().is_empty());
}

#[tokio::test]
async fn partial_message_over_limit_closes_with_1009() {
    let (consumer, transport, _) = run_partial(LIMIT, vec![Fragment::text("LONG--", false)]).await;

    assert!(consumer.chunks().is_empty());
    assert_eq!(transport.close_codes(), [TOO_BIG]);
}

#[tokio::test]
async fn partial_chunks_before_overflow_are_not_retracted() {
    let fragments = vec![
        Fragment::text("LO", false),
        Fragment::text("NG", false),
        Fragment::text("--", false),
        Fragment::text("!", true),
    ];
    let (consumer, transport, summary) = run_partial(LIMIT, fragments).await;

    assert_eq!(consumer.joined_text(), "LONG");
    assert_eq!(consumer.chunks().len(), 2);
    assert_eq!(transport.close_codes(), [TOO_BIG]);
    assert_eq!(summary.fragments_forwarded, 2);
}

#[tokio::test]
async fn fragments_after_violation_are_not_processed() {
    let mut fragments = text_fragments("LONG--", 6);
    fragments.extend(text_fragments("ok", 2));
    let (consumer, transport, summary) = run_whole(LIMIT, fragments).await;

    assert!(consumer.messages().is_empty());
    assert_eq!(transport.close_codes(), [TOO_BIG]);
    assert_eq!(summary.messages_completed, 0);
}

#[tokio::test]
async fn messages_before_violation_are_delivered() {
    let mut fragments = text_fragments("one", 2);
    fragments.extend(text_fragments("two", 1));
    fragments.extend(text_fragments("toolong", 3));
    let (consumer, transport, summary) = run_whole(LIMIT, fragments).await;

    assert_eq!(consumer.texts(), ["one", "two"]);
    assert_eq!(transport.close_codes(), [TOO_BIG]);
    assert_eq!(summary.messages_completed, 2);
}

#[rstest]
#[case::whole(true)]
#[case::partial(false)]
#[tokio::test]
async fn unbounded_limit_accepts_any_size(#[case] whole: bool) {
    let data = vec![0xAB_u8; 256 * 1024];
    let fragments = binary_fragments(&data, 4096);

    let closes = if whole {
        let (consumer, transport, _) = run_whole(MessageSizeLimit::UNBOUNDED, fragments).await;
        assert_eq!(consumer.messages(), vec![Payload::from(data)]);
        transport.close_codes()
    } else {
        let (consumer, transport, _) = run_partial(MessageSizeLimit::UNBOUNDED, fragments).await;
        assert_eq!(consumer.chunks().len(), 64);
        transport.close_codes()
    };
    assert!(closes.is_empty());
}

#[tokio::test]
async fn close_reason_describes_the_violation() {
    let (_, transport, _) = run_whole(LIMIT, text_fragments("LONG--", 6)).await;

    let frames = transport.close_frames();
    assert_eq!(frames.len(), 1);
    assert_eq!(frames[0].reason(), "message size 6 exceeds limit of 5");
}

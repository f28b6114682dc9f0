//! Loading endpoint settings through serde.

use rstest::rstest;
use wslimit::{InboundConfig, MessageSizeLimit};

#[rstest]
#[case::bounded(r#"{"max_message_size": 5}"#, MessageSizeLimit::bounded(5), true)]
#[case::explicit_unbounded(r#"{"max_message_size": null}"#, MessageSizeLimit::UNBOUNDED, true)]
#[case::defaults(r"{}", MessageSizeLimit::UNBOUNDED, true)]
#[case::no_reason(
    r#"{"max_message_size": 0, "send_close_reason": false}"#,
    MessageSizeLimit::bounded(0),
    false
)]
fn config_deserialises(
    #[case] json: &str,
    #[case] limit: MessageSizeLimit,
    #[case] send_close_reason: bool,
) {
    let config: InboundConfig = serde_json::from_str(json).expect("valid config");
    assert_eq!(config.max_message_size, limit);
    assert_eq!(config.send_close_reason, send_close_reason);
}

#[test]
fn registration_inherits_config() {
    let config = InboundConfig {
        max_message_size: MessageSizeLimit::bounded(7),
        send_close_reason: false,
    };
    let registration = config.whole(|_m: wslimit::Payload| async {});
    assert_eq!(registration.limit(), MessageSizeLimit::bounded(7));
    assert!(!registration.sends_close_reason());
}

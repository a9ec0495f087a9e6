use super::CommandRequest;
use super::CommandTarget;
use super::Direction;
use super::ThreadMessage;
use super::ThreadResponse;

#[test]
fn it_builds_get_commands_with_fresh_ids() {
    let first = CommandRequest::get(CommandTarget::Crm, "/contacts?$skip=0&$take=10");
    let second = CommandRequest::get(CommandTarget::Crm, "/contacts?$skip=0&$take=10");

    assert_eq!(first.method, "get");
    assert_eq!(first.to, "postmaster@crm.msging.net");
    assert_eq!(first.uri, "/contacts?$skip=0&$take=10");
    assert_ne!(first.id, second.id);
}

#[test]
fn it_addresses_both_targets() {
    assert_eq!(CommandTarget::Desk.address(), "postmaster@desk.msging.net");
    assert_eq!(CommandTarget::Crm.address(), "postmaster@crm.msging.net");
}

#[test]
fn it_parses_both_thread_response_shapes() {
    let enveloped = r#"{"resource": {"items": [{"direction": "sent", "content": "oi", "timestamp": "2024-02-01T12:00:00Z"}]}}"#;
    let bare = r#"{"items": [{"direction": "received", "content": "tudo bem?", "timestamp": "2024-02-01T12:01:00Z"}]}"#;

    let first: ThreadResponse = serde_json::from_str(enveloped).unwrap();
    let second: ThreadResponse = serde_json::from_str(bare).unwrap();

    assert_eq!(first.into_items()[0].direction, Direction::Sent);
    assert_eq!(second.into_items()[0].content, "tudo bem?");
}

#[test]
fn it_converts_thread_messages_to_mirror_records() {
    let message = ThreadMessage {
        direction: Direction::Received,
        content: "oi".to_string(),
        timestamp: "2024-02-01T12:00:00Z".to_string(),
    };

    let mirror = message.into_mirror("a@b.com").unwrap();
    assert_eq!(mirror.contact_id, "a@b.com");
    assert_eq!(mirror.timestamp, 1706788800000);
    assert_eq!(mirror.direction, Direction::Received);
}

#[test]
fn it_rejects_malformed_thread_timestamps() {
    let message = ThreadMessage {
        direction: Direction::Received,
        content: "oi".to_string(),
        timestamp: "yesterday".to_string(),
    };

    assert!(message.into_mirror("a@b.com").is_err());
}

use chrono::Utc;

use super::Direction;
use super::MirrorMessage;

#[test]
fn it_stamps_new_messages_with_the_current_time() {
    let before = Utc::now().timestamp_millis();
    let message = MirrorMessage::new("a@b.com", "hi", Direction::Sent);
    let after = Utc::now().timestamp_millis();

    assert!(message.timestamp >= before);
    assert!(message.timestamp <= after);
    assert_eq!(message.direction, Direction::Sent);
}

#[test]
fn it_validates_messages() {
    assert!(MirrorMessage::new("a@b.com", "hi", Direction::Sent)
        .validate()
        .is_ok());
    assert!(MirrorMessage::new("a@b.com", "", Direction::Sent)
        .validate()
        .is_err());
    assert!(MirrorMessage::new("not-an-email", "hi", Direction::Received)
        .validate()
        .is_err());
}

#[test]
fn it_serializes_with_the_wire_field_names() {
    let message = MirrorMessage {
        contact_id: "a@b.com".to_string(),
        message: "hi".to_string(),
        timestamp: 1700000000000,
        direction: Direction::Received,
    };

    let json = serde_json::to_value(&message).unwrap();
    assert_eq!(json["contactId"], "a@b.com");
    assert_eq!(json["direction"], "received");
}

use naval_duel::core::{Cell, ShotOutcome};
use naval_duel::protocol::{decode, encode, Message, MAX_MESSAGE_SIZE};

#[test]
fn hit_message_wire_format() {
    let msg = Message::hit(Cell::new(3, 4).unwrap(), ShotOutcome::HitAndSunk);
    let line = encode(&msg).unwrap();
    assert_eq!(
        std::str::from_utf8(&line).unwrap(),
        "{\"type\":\"hit\",\"attributes\":{\"x\":3,\"y\":4,\"hit\":2}}\n"
    );
}

#[test]
fn unknown_type_is_rejected() {
    assert!(decode(br#"{"type":"surrender","attributes":{}}"#).is_err());
    assert!(decode(br#"{"type":"shot"}"#).is_err());
    assert!(decode(b"not json at all").is_err());
}

#[test]
fn unknown_outcome_code_is_rejected() {
    let msg = decode(br#"{"type":"hit","attributes":{"x":1,"y":1,"hit":7}}"#).unwrap();
    assert!(msg.outcome().is_err());
    let msg = decode(br#"{"type":"shot","attributes":{"x":1,"y":1}}"#).unwrap();
    assert!(msg.outcome().is_err());
}

#[test]
fn oversize_line_is_rejected() {
    let mut line = br#"{"type":"shot","attributes":{"x":1,"y":1}}"#.to_vec();
    line.resize(MAX_MESSAGE_SIZE + 1, b' ');
    let err = decode(&line).unwrap_err();
    assert!(err.to_string().contains("too large"));
}

#[test]
fn trailing_newline_is_optional() {
    let with = decode(b"{\"type\":\"shot\",\"attributes\":{\"x\":0,\"y\":9}}\r\n").unwrap();
    let without = decode(b"{\"type\":\"shot\",\"attributes\":{\"x\":0,\"y\":9}}").unwrap();
    assert_eq!(with, without);
    assert_eq!(with.cell().unwrap(), Cell::new(0, 9).unwrap());
}

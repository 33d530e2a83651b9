use chainlens_lsp::{
    MAX_CONTENT_LENGTH, TransportError, read_message, spawn_reader, write_message,
};
use serde_json::json;
use std::io::{BufReader, Cursor};

#[test]
fn test_write_then_read_frames() {
    let mut buf = Vec::new();
    write_message(&mut buf, &json!({ "jsonrpc": "2.0", "method": "a" })).unwrap();
    write_message(&mut buf, &json!({ "jsonrpc": "2.0", "id": 1, "result": "é" })).unwrap();

    let text = String::from_utf8(buf.clone()).unwrap();
    assert!(text.starts_with("Content-Length: "));

    let mut reader = BufReader::new(Cursor::new(buf));
    let first = read_message(&mut reader).unwrap().unwrap();
    assert_eq!(first["method"], "a");
    let second = read_message(&mut reader).unwrap().unwrap();
    assert_eq!(second["result"], "é");
    assert!(read_message(&mut reader).unwrap().is_none());
}

#[test]
fn test_headers_are_case_insensitive_and_extra_headers_ignored() {
    let body = r#"{"jsonrpc":"2.0","method":"exit"}"#;
    let frame = format!(
        "content-length: {}\r\nContent-Type: application/vscode-jsonrpc; charset=utf-8\r\n\r\n{body}",
        body.len()
    );
    let mut reader = BufReader::new(Cursor::new(frame.into_bytes()));
    let msg = read_message(&mut reader).unwrap().unwrap();
    assert_eq!(msg["method"], "exit");
}

#[test]
fn test_header_errors() {
    let mut reader = BufReader::new(Cursor::new(b"Content-Type: x\r\n\r\n{}".to_vec()));
    assert!(matches!(
        read_message(&mut reader),
        Err(TransportError::MissingContentLength)
    ));

    let mut reader = BufReader::new(Cursor::new(b"Content-Length: ten\r\n\r\n{}".to_vec()));
    assert!(matches!(
        read_message(&mut reader),
        Err(TransportError::InvalidContentLength(_))
    ));
}

#[test]
fn test_reader_thread_survives_bad_json() {
    let mut input = b"Content-Length: 5\r\n\r\n{nope".to_vec();
    write_message(&mut input, &json!({ "jsonrpc": "2.0", "method": "exit" })).unwrap();

    let messages: Vec<_> = spawn_reader(Cursor::new(input)).into_iter().collect();
    assert_eq!(messages.len(), 2);
    assert!(matches!(&messages[0], Err(err) if err.is_recoverable()));
    assert_eq!(messages[1].as_ref().unwrap()["method"], "exit");
}

#[test]
fn test_reader_thread_stops_on_truncated_body() {
    let input = b"Content-Length: 50\r\n\r\n{}".to_vec();
    let messages: Vec<_> = spawn_reader(Cursor::new(input)).into_iter().collect();
    assert_eq!(messages.len(), 1);
    assert!(matches!(&messages[0], Err(TransportError::Io(_))));
}

#[test]
fn test_oversized_content_length_is_rejected() {
    let frame = format!("Content-Length: {}\r\n\r\n{{}}", u64::MAX);
    let mut reader = BufReader::new(Cursor::new(frame.into_bytes()));
    assert!(matches!(
        read_message(&mut reader),
        Err(TransportError::InvalidContentLength(_))
    ));

    let frame = format!("Content-Length: {}\r\n\r\n{{}}", MAX_CONTENT_LENGTH + 1);
    let messages: Vec<_> = spawn_reader(Cursor::new(frame.into_bytes()))
        .into_iter()
        .collect();
    assert_eq!(messages.len(), 1);
    assert!(matches!(
        &messages[0],
        Err(TransportError::InvalidContentLength(_))
    ));
}

use docserve::http::error::ServeError;
use docserve::http::response::{HTML_CONTENT_TYPE, Response, StatusCode};
use docserve::http::writer::ResponseWriter;

#[test]
fn test_status_code_as_u16() {
    assert_eq!(StatusCode::Ok.as_u16(), 200);
    assert_eq!(StatusCode::BadRequest.as_u16(), 400);
    assert_eq!(StatusCode::Forbidden.as_u16(), 403);
    assert_eq!(StatusCode::NotFound.as_u16(), 404);
    assert_eq!(StatusCode::MethodNotAllowed.as_u16(), 405);
    assert_eq!(StatusCode::InternalServerError.as_u16(), 500);
}

#[test]
fn test_status_code_reason_phrase() {
    assert_eq!(StatusCode::Ok.reason_phrase(), "OK");
    assert_eq!(StatusCode::BadRequest.reason_phrase(), "Bad Request");
    assert_eq!(StatusCode::Forbidden.reason_phrase(), "Forbidden");
    assert_eq!(StatusCode::NotFound.reason_phrase(), "Not Found");
    assert_eq!(
        StatusCode::MethodNotAllowed.reason_phrase(),
        "Method Not Allowed"
    );
    assert_eq!(
        StatusCode::InternalServerError.reason_phrase(),
        "Internal Server Error"
    );
}

#[test]
fn test_writer_frames_headers_in_order() {
    let response = Response::ok("text/css; charset=UTF-8", b"body{}".to_vec());
    let writer = ResponseWriter::new(&response);

    assert_eq!(
        writer.pending(),
        b"HTTP/1.1 200 OK\r\n\
          Content-Type: text/css; charset=UTF-8\r\n\
          Content-Length: 6\r\n\
          Connection: close\r\n\
          \r\n\
          body{}"
    );
}

#[test]
fn test_content_length_counts_bytes_not_chars() {
    let response = Response::ok("text/html; charset=UTF-8", "héllo ✓".as_bytes().to_vec());
    let text = String::from_utf8(ResponseWriter::new(&response).pending().to_vec()).unwrap();

    assert!(text.contains("Content-Length: 10\r\n"));
}

#[test]
fn test_empty_body_has_zero_length() {
    let response = Response::ok("application/javascript; charset=UTF-8", Vec::new());
    let text = String::from_utf8(ResponseWriter::new(&response).pending().to_vec()).unwrap();

    assert!(text.contains("Content-Length: 0\r\n"));
    assert!(text.ends_with("Connection: close\r\n\r\n"));
}

#[tokio::test]
async fn test_write_to_stream_sends_everything() {
    let response = Response::error(StatusCode::NotFound, "gone");
    let mut writer = ResponseWriter::new(&response);
    let expected = writer.pending().to_vec();

    let mut out: Vec<u8> = Vec::new();
    writer.write_to_stream(&mut out).await.unwrap();

    assert_eq!(out, expected);
    assert!(writer.pending().is_empty());
}

#[test]
fn test_error_page_contains_code_and_reason() {
    let response = Response::error(StatusCode::MethodNotAllowed, "nope");
    let body = String::from_utf8(response.body.clone()).unwrap();

    assert_eq!(response.status, StatusCode::MethodNotAllowed);
    assert_eq!(response.content_type, HTML_CONTENT_TYPE);
    assert!(body.contains("<title>405 Method Not Allowed</title>"));
    assert!(body.contains("<h1>405 Method Not Allowed</h1>"));
    assert!(body.contains("<p>nope</p>"));
}

#[test]
fn test_error_page_escapes_message() {
    let response = Response::error(StatusCode::NotFound, "<script>alert('x')</script>");
    let body = String::from_utf8(response.body).unwrap();

    assert!(!body.contains("<script>"));
    assert!(body.contains("&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt;"));
}

#[test]
fn test_serve_error_status_mapping() {
    let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
    let cases = [
        (ServeError::MalformedRequest, StatusCode::BadRequest),
        (ServeError::BadDecoding, StatusCode::BadRequest),
        (ServeError::MethodNotAllowed("POST".into()), StatusCode::MethodNotAllowed),
        (ServeError::PathTraversal, StatusCode::Forbidden),
        (ServeError::OutsideRoot, StatusCode::Forbidden),
        (ServeError::DisallowedExtension("txt".into()), StatusCode::Forbidden),
        (ServeError::NotFound("/x.html".into()), StatusCode::NotFound),
        (ServeError::Io(io), StatusCode::InternalServerError),
    ];

    for (err, status) in cases {
        assert_eq!(err.status(), status, "{}", err);
    }
}

#[test]
fn test_io_error_details_are_not_shown() {
    let err = ServeError::Io(std::io::Error::other("disk on fire at /srv/secret"));

    assert!(!err.message().contains("/srv/secret"));
}

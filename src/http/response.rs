use std::fmt;

/// Content type of every generated error page.
pub const HTML_CONTENT_TYPE: &str = "text/html; charset=UTF-8";

/// HTTP status codes the server can produce.
///
/// - `Ok` (200): File served
/// - `BadRequest` (400): Malformed request line or bad percent-encoding
/// - `Forbidden` (403): Traversal attempt, outside the root, or disallowed extension
/// - `NotFound` (404): No such file
/// - `MethodNotAllowed` (405): Anything other than GET
/// - `InternalServerError` (500): Unexpected fault
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// 200 OK
    Ok,
    /// 400 Bad Request
    BadRequest,
    /// 403 Forbidden
    Forbidden,
    /// 404 Not Found
    NotFound,
    /// 405 Method Not Allowed
    MethodNotAllowed,
    /// 500 Internal Server Error
    InternalServerError,
}

impl StatusCode {
    /// Returns the numeric HTTP status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use docserve::http::response::StatusCode;
    /// assert_eq!(StatusCode::Ok.as_u16(), 200);
    /// assert_eq!(StatusCode::Forbidden.as_u16(), 403);
    /// ```
    pub fn as_u16(&self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::BadRequest => 400,
            StatusCode::Forbidden => 403,
            StatusCode::NotFound => 404,
            StatusCode::MethodNotAllowed => 405,
            StatusCode::InternalServerError => 500,
        }
    }

    /// Returns the standard HTTP reason phrase for this status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use docserve::http::response::StatusCode;
    /// assert_eq!(StatusCode::Ok.reason_phrase(), "OK");
    /// assert_eq!(StatusCode::NotFound.reason_phrase(), "Not Found");
    /// ```
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::BadRequest => "Bad Request",
            StatusCode::Forbidden => "Forbidden",
            StatusCode::NotFound => "Not Found",
            StatusCode::MethodNotAllowed => "Method Not Allowed",
            StatusCode::InternalServerError => "Internal Server Error",
        }
    }
}

/// A complete response ready to be framed onto the wire.
///
/// There is deliberately no header map: the writer always emits exactly
/// `Content-Type`, `Content-Length` (taken from `body`) and `Connection: close`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// The HTTP status code
    pub status: StatusCode,
    /// Value of the Content-Type header
    pub content_type: String,
    /// Response body as bytes
    pub body: Vec<u8>,
}

impl Response {
    pub fn new(
        status: StatusCode,
        content_type: impl Into<String>,
        body: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            status,
            content_type: content_type.into(),
            body: body.into(),
        }
    }

    /// Creates a 200 OK response carrying file content.
    pub fn ok(content_type: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        Self::new(StatusCode::Ok, content_type, body)
    }

    /// Renders the HTML error page for `status`.
    ///
    /// `message` is escaped before it is embedded, so it may carry text
    /// taken from the request.
    pub fn error(status: StatusCode, message: &str) -> Self {
        let code = status.as_u16();
        let reason = status.reason_phrase();
        let body = format!(
            "<!DOCTYPE html>\n\
             <html>\n\
             <head><title>{code} {reason}</title></head>\n\
             <body>\n\
             <h1>{code} {reason}</h1>\n\
             <p>{message}</p>\n\
             </body>\n\
             </html>\n",
            code = code,
            reason = reason,
            message = HtmlEscaped(message),
        );

        Self::new(status, HTML_CONTENT_TYPE, body)
    }
}

/// Display adapter that escapes HTML special characters.
pub struct HtmlEscaped<'a>(pub &'a str);

impl fmt::Display for HtmlEscaped<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in self.0.chars() {
            match c {
                '&' => f.write_str("&amp;")?,
                '<' => f.write_str("&lt;")?,
                '>' => f.write_str("&gt;")?,
                '"' => f.write_str("&quot;")?,
                '\'' => f.write_str("&#39;")?,
                _ => write!(f, "{}", c)?,
            }
        }
        Ok(())
    }
}

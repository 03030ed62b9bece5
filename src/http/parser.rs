use std::fmt;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::http::request::Request;

#[derive(Debug)]
pub enum ParseError {
    /// Stream closed before a request line arrived, or the first line was blank
    EmptyRequest,
    /// Request line did not split into at least three fields
    InvalidRequestLine,
    /// Request line was not valid UTF-8
    InvalidEncoding,
    /// The stream itself failed; no response should be attempted
    Io(std::io::Error),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::EmptyRequest => f.write_str("empty request"),
            ParseError::InvalidRequestLine => f.write_str("malformed request line"),
            ParseError::InvalidEncoding => f.write_str("request line is not valid UTF-8"),
            ParseError::Io(e) => write!(f, "read failed: {}", e),
        }
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ParseError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ParseError {
    fn from(e: std::io::Error) -> Self {
        ParseError::Io(e)
    }
}

/// Reads one request off the stream.
///
/// The first line is the request line. Every following line up to the first
/// blank one (or end of stream) is a header line and is discarded unread.
/// No body is consumed.
pub async fn read_request<R>(reader: &mut R) -> Result<Request, ParseError>
where
    R: AsyncBufRead + Unpin,
{
    let Some(line) = read_line(reader).await? else {
        return Err(ParseError::EmptyRequest);
    };

    // Drain headers before judging the request line so an early rejection
    // still leaves the socket's receive buffer empty when we close.
    drain_headers(reader).await?;

    if line.is_empty() {
        return Err(ParseError::EmptyRequest);
    }

    let line = String::from_utf8(line).map_err(|_| ParseError::InvalidEncoding)?;
    parse_request_line(&line)
}

/// Splits a request line on single spaces into method, target and version.
///
/// Consecutive spaces produce empty fields, same as any other split, so
/// `"GET  /"` has three fields with an empty target.
pub fn parse_request_line(line: &str) -> Result<Request, ParseError> {
    let parts: Vec<&str> = line.split(' ').collect();

    if parts.len() < 3 {
        return Err(ParseError::InvalidRequestLine);
    }

    Ok(Request {
        method: parts[0].to_string(),
        target: parts[1].to_string(),
        version: parts[2].to_string(),
    })
}

async fn drain_headers<R>(reader: &mut R) -> Result<(), ParseError>
where
    R: AsyncBufRead + Unpin,
{
    while let Some(header) = read_line(reader).await? {
        if header.is_empty() {
            break;
        }
    }
    Ok(())
}

/// Reads bytes up to `\n`, returning them without the terminator and any
/// trailing `\r`. `None` means the stream was already at EOF.
async fn read_line<R>(reader: &mut R) -> Result<Option<Vec<u8>>, ParseError>
where
    R: AsyncBufRead + Unpin,
{
    let mut buf = Vec::new();
    let n = reader.read_until(b'\n', &mut buf).await?;

    if n == 0 {
        return Ok(None);
    }

    if buf.last() == Some(&b'\n') {
        buf.pop();
    }
    if buf.last() == Some(&b'\r') {
        buf.pop();
    }

    Ok(Some(buf))
}

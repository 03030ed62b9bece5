//! Failure taxonomy for a single request.
//!
//! Every variant maps to exactly one status code and one user-facing
//! message. The message is plain text; [`Response::error`] escapes it.
//!
//! [`Response::error`]: crate::http::response::Response::error

use std::fmt;

use crate::files::resolver::ResolveError;
use crate::http::parser::ParseError;
use crate::http::response::StatusCode;

#[derive(Debug)]
pub enum ServeError {
    /// Empty, non-UTF-8, or short request line
    MalformedRequest,
    /// Invalid percent-encoding in the target
    BadDecoding,
    /// Method other than GET
    MethodNotAllowed(String),
    /// Decoded target contained `..`
    PathTraversal,
    /// Canonical path fell outside the document root, or could not be resolved
    OutsideRoot,
    /// Extension not on the allow-list; holds the extension (possibly empty)
    DisallowedExtension(String),
    /// Holds the missing path, relative to the document root
    NotFound(String),
    /// Reading the file failed for a reason other than absence
    Io(std::io::Error),
}

impl ServeError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServeError::MalformedRequest | ServeError::BadDecoding => StatusCode::BadRequest,
            ServeError::MethodNotAllowed(_) => StatusCode::MethodNotAllowed,
            ServeError::PathTraversal
            | ServeError::OutsideRoot
            | ServeError::DisallowedExtension(_) => StatusCode::Forbidden,
            ServeError::NotFound(_) => StatusCode::NotFound,
            ServeError::Io(_) => StatusCode::InternalServerError,
        }
    }

    /// Text shown on the error page. Never includes I/O error details, and
    /// never echoes a path that was rejected for escaping the root.
    pub fn message(&self) -> String {
        match self {
            ServeError::MalformedRequest => {
                "The request line could not be understood.".to_string()
            }
            ServeError::BadDecoding => {
                "The requested path is not correctly URL-encoded.".to_string()
            }
            ServeError::MethodNotAllowed(method) => {
                format!("The method {} is not supported. Only GET is allowed.", method)
            }
            ServeError::PathTraversal | ServeError::OutsideRoot => {
                "Access to the requested resource is forbidden.".to_string()
            }
            ServeError::DisallowedExtension(ext) if ext.is_empty() => {
                "Files without an extension are not served.".to_string()
            }
            ServeError::DisallowedExtension(ext) => {
                format!("Files of type .{} are not served.", ext)
            }
            ServeError::NotFound(path) => {
                format!("The requested file {} was not found on this server.", path)
            }
            ServeError::Io(_) => "The server could not read the requested file.".to_string(),
        }
    }
}

impl fmt::Display for ServeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServeError::MalformedRequest => f.write_str("malformed request"),
            ServeError::BadDecoding => f.write_str("bad percent-encoding"),
            ServeError::MethodNotAllowed(m) => write!(f, "method not allowed: {}", m),
            ServeError::PathTraversal => f.write_str("path traversal attempt"),
            ServeError::OutsideRoot => f.write_str("path outside document root"),
            ServeError::DisallowedExtension(ext) => write!(f, "disallowed extension: {:?}", ext),
            ServeError::NotFound(path) => write!(f, "not found: {}", path),
            ServeError::Io(e) => write!(f, "I/O failure: {}", e),
        }
    }
}

impl std::error::Error for ServeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ServeError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ResolveError> for ServeError {
    fn from(e: ResolveError) -> Self {
        match e {
            ResolveError::BadDecoding => ServeError::BadDecoding,
            ResolveError::Traversal => ServeError::PathTraversal,
            ResolveError::OutsideRoot | ResolveError::Unresolvable(_) => ServeError::OutsideRoot,
        }
    }
}

/// Only for parse failures that still deserve a response. `ParseError::Io`
/// is handled by the connection before it gets here.
impl From<ParseError> for ServeError {
    fn from(e: ParseError) -> Self {
        match e {
            ParseError::Io(e) => ServeError::Io(e),
            _ => ServeError::MalformedRequest,
        }
    }
}

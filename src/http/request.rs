/// A parsed HTTP request line.
///
/// Headers are consumed off the wire but never stored, and no body is read,
/// so the request line is all a request carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// The method exactly as sent (e.g. "GET", "get", "POST")
    pub method: String,
    /// The raw request target, query string and percent-encoding intact
    pub target: String,
    /// The declared HTTP version. Kept for logging, never validated.
    pub version: String,
}

impl Request {
    /// Returns true when the method is GET, compared case-insensitively.
    ///
    /// # Example
    ///
    /// ```
    /// # use docserve::http::request::Request;
    /// let req = Request {
    ///     method: "get".to_string(),
    ///     target: "/".to_string(),
    ///     version: "HTTP/1.1".to_string(),
    /// };
    /// assert!(req.is_get());
    /// ```
    pub fn is_get(&self) -> bool {
        self.method.eq_ignore_ascii_case("GET")
    }
}

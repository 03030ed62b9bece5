//! HTTP protocol implementation.
//!
//! A deliberately small subset of HTTP/1.1: one GET request per connection,
//! headers read and ignored, no request body, and every response closes the
//! connection.
//!
//! - **`connection`**: The per-connection state machine
//! - **`parser`**: Reads the request line and drains header lines
//! - **`request`**: The parsed request line
//! - **`response`**: Status codes, responses and the HTML error page
//! - **`writer`**: Frames a response onto the stream
//! - **`error`**: Request failures and their status codes
//!
//! # Connection State Machine
//!
//! ```text
//!        ┌─────────────┐
//!        │   Reading   │ ← Request line, then headers up to the blank line
//!        └──────┬──────┘
//!               │ Request parsed
//!               ▼
//!        ┌──────────────────┐
//!        │   Validating     │ ← GET only, decode target, sandbox to the root
//!        └──────┬───────────┘
//!               │ Canonical path
//!               ▼
//!        ┌──────────────────┐
//!        │   Resolving      │ ← Extension allow-list, existence, read file
//!        └──────┬───────────┘
//!               │ Response ready (or error page from any earlier state)
//!               ▼
//!        ┌──────────────────┐
//!        │   Responding     │ ← Send response
//!        └──────┬───────────┘
//!               ▼
//!        ┌──────────────────┐
//!        │     Closed       │
//!        └──────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use docserve::http::connection::Connection;
//! use tokio::net::TcpListener;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let site = Arc::new(site);
//!     let listener = TcpListener::bind("127.0.0.1:8080").await?;
//!
//!     loop {
//!         let (socket, _addr) = listener.accept().await?;
//!         let site = site.clone();
//!         tokio::spawn(async move {
//!             let mut conn = Connection::new(socket, site);
//!             if let Err(e) = conn.run().await {
//!                 eprintln!("Connection error: {}", e);
//!             }
//!         });
//!     }
//! }
//! ```

pub mod connection;
pub mod error;
pub mod parser;
pub mod request;
pub mod response;
pub mod writer;

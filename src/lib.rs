//! docserve - sandboxed static file server
//!
//! Serves `.html`, `.css` and `.js` files from a single document root over a
//! small subset of HTTP/1.1.

pub mod config;
pub mod files;
pub mod http;
pub mod server;

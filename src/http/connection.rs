use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, info, warn};

use crate::files::Site;
use crate::http::error::ServeError;
use crate::http::parser::{ParseError, read_request};
use crate::http::request::Request;
use crate::http::response::Response;
use crate::http::writer::ResponseWriter;

/// One request, one response, then close.
pub struct Connection<S> {
    stream: BufReader<S>,
    site: Arc<Site>,
    state: ConnectionState,
}

pub enum ConnectionState {
    Reading,
    Validating(Request),
    Resolving(Request, PathBuf),
    Responding(ResponseWriter),
    Closed,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S, site: Arc<Site>) -> Self {
        Self {
            stream: BufReader::new(stream),
            site,
            state: ConnectionState::Reading,
        }
    }

    /// Drives the connection to `Closed`.
    ///
    /// An `Err` means the stream itself failed while reading or writing. No
    /// further response is attempted; dropping the connection closes it.
    pub async fn run(&mut self) -> anyhow::Result<()> {
        loop {
            match std::mem::replace(&mut self.state, ConnectionState::Closed) {
                ConnectionState::Reading => {
                    self.state = match read_request(&mut self.stream).await {
                        Ok(req) => ConnectionState::Validating(req),
                        Err(ParseError::Io(e)) => {
                            return Err(anyhow::Error::new(e).context("reading request"));
                        }
                        Err(e) => Self::fail(None, ServeError::from(e)),
                    };
                }

                ConnectionState::Validating(req) => {
                    self.state = match self.validate(&req).await {
                        Ok(path) => ConnectionState::Resolving(req, path),
                        Err(e) => Self::fail(Some(&req), e),
                    };
                }

                ConnectionState::Resolving(req, path) => {
                    self.state = match self.load(&path).await {
                        Ok(response) => {
                            info!(
                                method = %req.method,
                                target = %req.target,
                                status = response.status.as_u16(),
                                bytes = response.body.len(),
                                "served"
                            );
                            ConnectionState::Responding(ResponseWriter::new(&response))
                        }
                        Err(e) => Self::fail(Some(&req), e),
                    };
                }

                ConnectionState::Responding(mut writer) => {
                    writer.write_to_stream(&mut self.stream).await?;
                    self.state = ConnectionState::Closed;
                }

                ConnectionState::Closed => {
                    // Best effort; the socket is released on drop either way.
                    if let Err(e) = self.stream.shutdown().await {
                        debug!(error = %e, "shutdown failed");
                    }
                    break;
                }
            }
        }

        Ok(())
    }

    async fn validate(&self, req: &Request) -> Result<PathBuf, ServeError> {
        if !req.is_get() {
            return Err(ServeError::MethodNotAllowed(req.method.clone()));
        }

        self.site.resolve(&req.target).await
    }

    async fn load(&self, path: &Path) -> Result<Response, ServeError> {
        let file = self.site.classify(path)?;
        let body = self.site.read(&file).await?;
        Ok(Response::ok(file.content_type, body))
    }

    fn fail(req: Option<&Request>, err: ServeError) -> ConnectionState {
        let status = err.status();
        match req {
            Some(req) => warn!(
                method = %req.method,
                target = %req.target,
                status = status.as_u16(),
                error = %err,
                "request failed"
            ),
            None => warn!(status = status.as_u16(), error = %err, "request failed"),
        }

        let response = Response::error(status, &err.message());
        ConnectionState::Responding(ResponseWriter::new(&response))
    }
}

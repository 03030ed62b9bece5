use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{Instrument, info, info_span};

use crate::config::Config;
use crate::files::Site;
use crate::http::connection::Connection;

pub async fn run(cfg: &Config) -> anyhow::Result<()> {
    let site = Site::from_config(&cfg.static_files)?;
    info!("Document root {}", site.root().display());

    let listener = TcpListener::bind(&cfg.server.listen_addr)
        .await
        .with_context(|| format!("binding {}", cfg.server.listen_addr))?;
    info!("Listening on {}", cfg.server.listen_addr);

    serve(listener, Arc::new(site)).await
}

/// Accepts forever, spawning one task per connection with no upper bound.
///
/// Only an `accept` failure ends the loop, and it is returned to the caller.
/// Connection tasks have no timeouts: a client that never finishes its
/// request keeps its task alive.
pub async fn serve(listener: TcpListener, site: Arc<Site>) -> anyhow::Result<()> {
    loop {
        let (socket, peer) = listener.accept().await.context("accepting connection")?;
        info!("Accepted connection from {}", peer);

        let site = Arc::clone(&site);
        tokio::spawn(
            async move {
                let mut conn = Connection::new(socket, site);
                if let Err(e) = conn.run().await {
                    tracing::error!("Connection error: {:#}", e);
                }
            }
            .instrument(info_span!("conn", %peer)),
        );
    }
}

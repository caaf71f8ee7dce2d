//! HTTP surface: serves the chat page and a small JSON API, one chat
//! session per client.

pub mod http;
pub mod routes;
pub mod sessions;

use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::core::config::Config;
use crate::core::providers::{choose_default_provider, fallback_default_provider};
use crate::provider::{ProviderKind, ProviderSet};
use http::{read_request, write_response, HttpResponse, RequestError};
use sessions::SessionRegistry;

const READ_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerOptions {
    pub host: String,
    pub port: u16,
    pub provider_override: Option<String>,
}

/// Run the server until Ctrl+C.
pub async fn serve(
    options: ServerOptions,
    config: Config,
    providers: ProviderSet,
) -> Result<(), Box<dyn Error>> {
    let provider = session_provider(&providers, &config, options.provider_override.as_deref());
    let registry = Arc::new(SessionRegistry::new(providers, provider, config));

    let listener = TcpListener::bind((options.host.as_str(), options.port)).await?;
    let address = listener.local_addr()?;
    info!(%address, provider = %provider, "chat server listening");
    println!("🌐 Chat server running at http://{address}/ (Ctrl+C to stop)");

    let shutdown = CancellationToken::new();
    let signal_token = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            signal_token.cancel();
        }
    });

    accept_loop(listener, registry, shutdown).await;
    info!("chat server stopped");
    Ok(())
}

async fn accept_loop(
    listener: TcpListener,
    registry: Arc<SessionRegistry>,
    shutdown: CancellationToken,
) {
    loop {
        let accepted = tokio::select! {
            _ = shutdown.cancelled() => break,
            accepted = listener.accept() => accepted,
        };
        match accepted {
            Ok((stream, peer)) => {
                let registry = Arc::clone(&registry);
                tokio::spawn(async move {
                    debug!(%peer, "connection accepted");
                    if let Err(err) = handle_connection(stream, &registry).await {
                        debug!(%peer, error = %err, "connection ended with an error");
                    }
                });
            }
            Err(err) => warn!(error = %err, "failed to accept connection"),
        }
    }
}

/// Serve one request on `stream`, then close it.
pub async fn handle_connection<S>(mut stream: S, registry: &SessionRegistry) -> std::io::Result<()>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let response = match tokio::time::timeout(READ_TIMEOUT, read_request(&mut stream)).await {
        Err(_) => {
            debug!("timed out waiting for a request");
            return Ok(());
        }
        Ok(Err(RequestError::Closed)) => return Ok(()),
        Ok(Err(RequestError::Io(err))) => return Err(err),
        Ok(Err(RequestError::TooLarge)) => HttpResponse::error(413, "Request too large"),
        Ok(Err(err @ RequestError::Malformed(_))) => {
            debug!(error = %err, "rejecting request");
            HttpResponse::error(400, "Bad request")
        }
        Ok(Ok(request)) => {
            debug!(method = %request.method, path = %request.path, "request");
            routes::handle(registry, request).await
        }
    };
    write_response(&mut stream, &response).await
}

/// Provider new HTTP sessions start on. The server must come up even when the
/// override or the keys are missing, so bad choices are logged and skipped.
fn session_provider(
    providers: &ProviderSet,
    config: &Config,
    provider_override: Option<&str>,
) -> ProviderKind {
    match choose_default_provider(providers, config, provider_override) {
        Ok(kind) => kind,
        Err(err) => {
            if !providers.is_empty() {
                warn!(error = %err, "ignoring provider override");
            }
            fallback_default_provider(providers, config)
        }
    }
}

// SPDX-FileCopyrightText: 2026 WebSage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `websage serve` command implementation.
//!
//! Starts the HTTP gateway over the configured backend and serves until
//! SIGINT or SIGTERM.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use websage_config::WebsageConfig;
use websage_core::{AnalysisBackend, WebsageError};
use websage_gateway::{GatewayState, ServerConfig};

/// Runs the `websage serve` command.
pub async fn run_serve(
    config: &WebsageConfig,
    backend: Arc<dyn AnalysisBackend>,
) -> Result<(), WebsageError> {
    info!(backend = %config.backend.base_url, "starting websage serve");
    if !backend.is_configured() {
        warn!("backend.shared_secret is not set; protected routes will answer 500");
    }

    let server = ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
    };
    let shutdown = install_signal_handler();

    websage_gateway::start_server(&server, GatewayState::new(backend), shutdown).await?;

    info!("websage serve shutdown complete");
    Ok(())
}

/// Installs signal handlers for SIGTERM and SIGINT.
///
/// Returns a [`CancellationToken`] that is cancelled when either signal is received.
fn install_signal_handler() -> CancellationToken {
    let token = CancellationToken::new();
    let token_clone = token.clone();

    tokio::spawn(async move {
        let ctrl_c = tokio::signal::ctrl_c();

        #[cfg(unix)]
        {
            use tokio::signal::unix::{SignalKind, signal};
            match signal(SignalKind::terminate()) {
                Ok(mut sigterm) => {
                    tokio::select! {
                        _ = ctrl_c => {
                            info!("received SIGINT (Ctrl+C), initiating shutdown");
                        }
                        _ = sigterm.recv() => {
                            info!("received SIGTERM, initiating shutdown");
                        }
                    }
                }
                Err(e) => {
                    warn!(error = %e, "failed to install SIGTERM handler, only Ctrl+C will stop the server");
                    let _ = ctrl_c.await;
                    info!("received SIGINT (Ctrl+C), initiating shutdown");
                }
            }
        }

        #[cfg(not(unix))]
        {
            let _ = ctrl_c.await;
            info!("received Ctrl+C, initiating shutdown");
        }

        token_clone.cancel();
        debug!("shutdown signal handler completed");
    });

    token
}

/// Initialises the global tracing subscriber. `RUST_LOG` overrides `level`.
///
/// Logs go to stderr so command output on stdout stays machine-readable.
pub fn init_tracing(level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .init();
}

fn default_filter(level: &str) -> String {
    format!("websage={level},websage_proxy={level},websage_session={level},websage_gateway={level},tower_http={level},warn")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_filter_parses() {
        let directive = default_filter("debug");
        assert!(directive.starts_with("websage=debug"));
        assert!(tracing_subscriber::EnvFilter::try_new(directive).is_ok());
    }
}

use tokio::net::TcpListener;

use crate::config::ServerConfig;
use crate::controller::ResourceController;
use crate::error::{ServerError, ServerResult};
use crate::router::build_router;

/// The postboard HTTP server.
pub struct PostboardServer {
    config: ServerConfig,
    controller: ResourceController,
}

impl PostboardServer {
    pub fn new(config: ServerConfig, controller: ResourceController) -> Self {
        Self { config, controller }
    }

    /// A server over fresh in-memory stores.
    pub fn in_memory(config: ServerConfig) -> Self {
        Self::new(config, ResourceController::in_memory())
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn controller(&self) -> &ResourceController {
        &self.controller
    }

    /// Build the router (useful for testing).
    pub fn router(&self) -> axum::Router {
        build_router(self.controller.clone(), &self.config)
    }

    /// Start serving requests.
    pub async fn serve(self) -> ServerResult<()> {
        let app = self.router();
        let listener = TcpListener::bind(&self.config.bind_addr).await?;
        tracing::info!("postboard listening on {}", self.config.bind_addr);
        axum::serve(listener, app)
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_construction() {
        let server = PostboardServer::in_memory(ServerConfig::default());
        assert_eq!(server.config().bind_addr, "127.0.0.1:3000".parse().unwrap());
    }

    #[test]
    fn router_builds_with_and_without_cors() {
        let server = PostboardServer::in_memory(ServerConfig::default());
        let _router = server.router();

        let config = ServerConfig { cors_permissive: false, ..ServerConfig::default() };
        let _router = PostboardServer::in_memory(config).router();
    }

    #[tokio::test]
    async fn serve_accepts_connections() {
        let addr = TcpListener::bind("127.0.0.1:0").await.unwrap().local_addr().unwrap();
        let config = ServerConfig { bind_addr: addr, ..ServerConfig::default() };
        let handle = tokio::spawn(PostboardServer::in_memory(config).serve());

        let mut connected = false;
        for _ in 0..50 {
            if tokio::net::TcpStream::connect(addr).await.is_ok() {
                connected = true;
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        }
        assert!(connected, "no listener on {addr}");
        assert!(!handle.is_finished());
        handle.abort();
    }

    #[tokio::test]
    async fn serve_on_taken_address_is_io_error() {
        let taken = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let config = ServerConfig { bind_addr: taken.local_addr().unwrap(), ..ServerConfig::default() };
        let err = PostboardServer::in_memory(config).serve().await.unwrap_err();
        assert!(matches!(err, ServerError::Io(_)));
    }
}

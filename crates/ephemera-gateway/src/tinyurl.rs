use crate::error::{GatewayError, Result};
use crate::gateway::Gateway;
use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};
use url::Url;

/// The public TinyURL creation endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://tinyurl.com/api-create.php";

/// Gateway backed by TinyURL's plain-text creation API.
///
/// `GET <endpoint>?url=<long url>` answers with the short URL as the body on
/// success, or an error text otherwise.
#[derive(Debug, Clone)]
pub struct TinyUrlGateway {
    client: Client,
    endpoint: Url,
}

impl TinyUrlGateway {
    /// Creates a gateway pointed at [`DEFAULT_ENDPOINT`].
    pub fn new() -> Self {
        let endpoint = Url::parse(DEFAULT_ENDPOINT).expect("default endpoint is a valid url");
        Self::with_endpoint(endpoint)
    }

    pub fn with_endpoint(endpoint: Url) -> Self {
        Self::with_client(Client::new(), endpoint)
    }

    pub fn with_client(client: Client, endpoint: Url) -> Self {
        Self { client, endpoint }
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn request_url(&self, long_url: &str) -> Url {
        let mut request = self.endpoint.clone();
        request.query_pairs_mut().append_pair("url", long_url);
        request
    }
}

impl Default for TinyUrlGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Gateway for TinyUrlGateway {
    async fn shorten(&self, long_url: &str) -> Result<String> {
        let request = self.request_url(long_url);
        debug!(endpoint = %self.endpoint, long_url, "requesting short url");

        let response = self
            .client
            .get(request)
            .send()
            .await
            .map_err(|e| GatewayError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| GatewayError::Network(e.to_string()))?;

        if !status.is_success() {
            warn!(%status, body = %body, "gateway rejected request");
            return Err(GatewayError::rejected(body));
        }

        let short = body.trim();
        if short.is_empty() {
            warn!(%status, "gateway answered with an empty body");
            return Err(GatewayError::rejected(""));
        }

        Ok(short.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FALLBACK_MESSAGE;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Serves exactly one canned HTTP response and hands back the request head.
    async fn serve_once(status: &'static str, body: &'static str) -> (Url, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 4096];
            let mut head = Vec::new();
            loop {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                head.extend_from_slice(&buf[..n]);
                if head.windows(4).any(|w| w == b"\r\n\r\n") {
                    break;
                }
            }
            let response = format!(
                "HTTP/1.1 {status}\r\ncontent-type: text/plain\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
            String::from_utf8_lossy(&head).into_owned()
        });

        let endpoint = Url::parse(&format!("http://{addr}/api-create.php")).unwrap();
        (endpoint, handle)
    }

    fn target() -> &'static str {
        "https://example.com/a path?x=1&y=2"
    }

    #[tokio::test]
    async fn success_returns_trimmed_body() {
        let (endpoint, server) = serve_once("200 OK", "https://tinyurl.com/abc123\n").await;
        let gateway = TinyUrlGateway::with_endpoint(endpoint);

        let short = gateway.shorten(target()).await.unwrap();
        assert_eq!(short, "https://tinyurl.com/abc123");

        let head = server.await.unwrap();
        let request_line = head.lines().next().unwrap();
        assert!(request_line.starts_with("GET /api-create.php?url=https%3A%2F%2Fexample.com"));
    }

    #[tokio::test]
    async fn sends_the_long_url_unnormalised() {
        let (endpoint, server) = serve_once("200 OK", "https://tinyurl.com/xyz").await;
        let gateway = TinyUrlGateway::with_endpoint(endpoint);

        gateway.shorten("https://Example.COM").await.unwrap();

        let head = server.await.unwrap();
        let request_line = head.lines().next().unwrap();
        assert_eq!(
            request_line,
            "GET /api-create.php?url=https%3A%2F%2FExample.COM HTTP/1.1"
        );
    }

    #[tokio::test]
    async fn error_status_surfaces_body_verbatim() {
        let (endpoint, _server) = serve_once("400 Bad Request", "Error: URL is not valid").await;
        let gateway = TinyUrlGateway::with_endpoint(endpoint);

        let err = gateway.shorten(target()).await.unwrap_err();
        assert_eq!(err, GatewayError::Rejected("Error: URL is not valid".to_string()));
    }

    #[tokio::test]
    async fn error_status_without_body_uses_fallback() {
        let (endpoint, _server) = serve_once("500 Internal Server Error", "").await;
        let gateway = TinyUrlGateway::with_endpoint(endpoint);

        let err = gateway.shorten(target()).await.unwrap_err();
        assert_eq!(err.to_string(), FALLBACK_MESSAGE);
    }

    #[tokio::test]
    async fn empty_success_body_is_a_rejection() {
        let (endpoint, _server) = serve_once("200 OK", "  ").await;
        let gateway = TinyUrlGateway::with_endpoint(endpoint);

        let err = gateway.shorten(target()).await.unwrap_err();
        assert_eq!(err, GatewayError::Rejected(FALLBACK_MESSAGE.to_string()));
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_a_network_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let endpoint = Url::parse(&format!("http://{addr}/api-create.php")).unwrap();
        let gateway = TinyUrlGateway::with_endpoint(endpoint);

        let err = gateway.shorten(target()).await.unwrap_err();
        assert!(matches!(err, GatewayError::Network(_)));
    }

    #[test]
    fn default_endpoint() {
        let gateway = TinyUrlGateway::default();
        assert_eq!(gateway.endpoint().as_str(), DEFAULT_ENDPOINT);
    }
}

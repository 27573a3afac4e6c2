use crate::error::Result;
use crate::gateway::Gateway;
use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};

/// An offline gateway that hands out sequential aliases.
///
/// Aliases look like `<base>/<prefix>000000`, `<base>/<prefix>000001`, ...
/// and are unique within one instance. Useful without network access and in
/// tests.
#[derive(Debug)]
pub struct SeqGateway {
    counter: AtomicU64,
    base_url: String,
    prefix: String,
}

impl Clone for SeqGateway {
    fn clone(&self) -> Self {
        Self {
            counter: AtomicU64::new(self.counter.load(Ordering::SeqCst)),
            base_url: self.base_url.clone(),
            prefix: self.prefix.clone(),
        }
    }
}

impl SeqGateway {
    pub fn new(base_url: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self::with_offset(base_url, prefix, 0)
    }

    /// Starts counting from `offset` instead of zero.
    pub fn with_offset(base_url: impl Into<String>, prefix: impl Into<String>, offset: u64) -> Self {
        let base_url = base_url.into();
        Self {
            counter: AtomicU64::new(offset),
            base_url: base_url.trim_end_matches('/').to_string(),
            prefix: prefix.into(),
        }
    }

    fn next_alias(&self) -> String {
        let count = self.counter.fetch_add(1, Ordering::SeqCst);
        format!("{}/{}{:06}", self.base_url, self.prefix, count)
    }
}

#[async_trait]
impl Gateway for SeqGateway {
    async fn shorten(&self, _long_url: &str) -> Result<String> {
        Ok(self.next_alias())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target() -> &'static str {
        "https://example.com/some/long/path"
    }

    #[tokio::test]
    async fn produces_sequential_aliases() {
        let gateway = SeqGateway::new("https://eph.local/", "wh");

        assert_eq!(gateway.shorten(target()).await.unwrap(), "https://eph.local/wh000000");
        assert_eq!(gateway.shorten(target()).await.unwrap(), "https://eph.local/wh000001");
        assert_eq!(gateway.shorten(target()).await.unwrap(), "https://eph.local/wh000002");
    }

    #[tokio::test]
    async fn with_offset() {
        let gateway = SeqGateway::with_offset("https://eph.local", "x", 1000);
        assert_eq!(gateway.shorten(target()).await.unwrap(), "https://eph.local/x001000");
    }

    #[tokio::test]
    async fn clone_preserves_counter_state() {
        let gateway = SeqGateway::new("https://eph.local", "wh");
        gateway.shorten(target()).await.unwrap();
        gateway.shorten(target()).await.unwrap();

        let cloned = gateway.clone();

        assert_eq!(gateway.shorten(target()).await.unwrap(), "https://eph.local/wh000002");
        assert_eq!(cloned.shorten(target()).await.unwrap(), "https://eph.local/wh000002");
    }

    #[test]
    fn gateway_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SeqGateway>();
    }
}

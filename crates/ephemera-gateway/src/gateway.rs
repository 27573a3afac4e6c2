use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

#[async_trait]
pub trait Gateway: Send + Sync + 'static {
    /// Asks the service for a short alias of `long_url` and returns it.
    ///
    /// `long_url` is passed exactly as the user entered it, so the alias
    /// points at the same text the tracker stores.
    async fn shorten(&self, long_url: &str) -> Result<String>;
}

#[async_trait]
impl<T: Gateway + ?Sized> Gateway for Arc<T> {
    async fn shorten(&self, long_url: &str) -> Result<String> {
        (**self).shorten(long_url).await
    }
}

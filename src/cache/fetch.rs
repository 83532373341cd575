//! Byte fetchers for remote resources.
//!
//! Fetches run off the loader's context and report through a one-shot callback that may fire on
//! any thread.

use std::time::Duration;

use crate::foundation::error::{SvgaError, SvgaResult};

/// One-shot completion for a fetch.
pub type FetchCallback = Box<dyn FnOnce(SvgaResult<Vec<u8>>) + Send + 'static>;

/// Downloads the bytes behind a URL.
pub trait Fetch: Send + Sync {
    /// Start fetching `url`; `done` fires exactly once.
    fn fetch(&self, url: &str, done: FetchCallback);
}

/// Fetcher used when the crate is built without networking.
#[derive(Clone, Copy, Debug, Default)]
pub struct OfflineFetcher;

impl Fetch for OfflineFetcher {
    fn fetch(&self, url: &str, done: FetchCallback) {
        done(Err(SvgaError::network(format!(
            "networking disabled, cannot fetch '{url}'"
        ))));
    }
}

/// HTTP fetcher backed by `reqwest` on a private multi-threaded `tokio` runtime.
#[cfg(feature = "network")]
pub struct HttpFetcher {
    runtime: tokio::runtime::Runtime,
    client: reqwest::Client,
}

#[cfg(feature = "network")]
impl HttpFetcher {
    /// Build a fetcher whose requests time out after `timeout`.
    pub fn new(timeout: Duration) -> SvgaResult<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("svga-fetch")
            .enable_all()
            .build()
            .map_err(|e| SvgaError::io("create fetch runtime", e))?;
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SvgaError::network(format!("create http client: {e}")))?;
        Ok(Self { runtime, client })
    }
}

#[cfg(feature = "network")]
impl Fetch for HttpFetcher {
    fn fetch(&self, url: &str, done: FetchCallback) {
        let client = self.client.clone();
        let url = url.to_string();
        self.runtime.spawn(async move {
            done(download(&client, &url).await);
        });
    }
}

#[cfg(feature = "network")]
async fn download(client: &reqwest::Client, url: &str) -> SvgaResult<Vec<u8>> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| SvgaError::network(format!("GET '{url}': {e}")))?;
    let status = response.status();
    if !status.is_success() {
        return Err(SvgaError::network(format!("GET '{url}': HTTP {status}")));
    }
    let bytes = response
        .bytes()
        .await
        .map_err(|e| SvgaError::network(format!("read body of '{url}': {e}")))?;
    tracing::debug!(url, bytes = bytes.len(), "downloaded");
    Ok(bytes.to_vec())
}

/// Default fetcher for this build: HTTP when the `network` feature is on, offline otherwise.
pub fn default_fetcher(timeout: Duration) -> SvgaResult<Box<dyn Fetch>> {
    #[cfg(feature = "network")]
    {
        Ok(Box::new(HttpFetcher::new(timeout)?))
    }
    #[cfg(not(feature = "network"))]
    {
        let _ = timeout;
        Ok(Box::new(OfflineFetcher))
    }
}

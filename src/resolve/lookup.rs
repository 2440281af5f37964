//! External tile service addressed by canonical color keys

use crate::color::ColorKey;
use crate::io::configuration::LOOKUP_TIMEOUT_SECS;
use crate::io::error::{Result, invalid_input, lookup_failure};
use reqwest::{Client, Url};
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// Opaque renderable tile data returned by the tile service
///
/// Usually a markup fragment or an image reference. Cloning shares the
/// underlying text.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TilePayload(Arc<str>);

impl TilePayload {
    /// Wrap payload text
    pub fn new(text: impl Into<Arc<str>>) -> Self {
        Self(text.into())
    }

    /// Payload text
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TilePayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Resolves one color key to renderable tile data
///
/// Implementations must behave as a pure function of the key: the result
/// for a key is cached for the lifetime of the owning mosaic.
pub trait TileLookup: Send + Sync + 'static {
    /// Fetch the tile for `key`
    fn lookup(&self, key: &ColorKey) -> impl Future<Output = Result<TilePayload>> + Send;
}

/// Tile service reached over HTTP with `GET <base>/color/<hex>`
#[derive(Clone, Debug)]
pub struct HttpTileLookup {
    client: Client,
    base_url: Url,
}

impl HttpTileLookup {
    /// Create a lookup against the service rooted at `base_url`
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the URL cannot be parsed or the HTTP client
    /// cannot be built
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(LOOKUP_TIMEOUT_SECS))
            .build()
            .map_err(|e| invalid_input("server", &base_url, &e))?;
        Self::with_client(client, base_url)
    }

    /// Create a lookup that sends requests through an existing client
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the URL cannot be parsed or cannot be a base
    pub fn with_client(client: Client, base_url: &str) -> Result<Self> {
        let mut url = Url::parse(base_url).map_err(|e| invalid_input("server", &base_url, &e))?;
        if url.cannot_be_a_base() {
            return Err(invalid_input(
                "server",
                &base_url,
                &"URL cannot serve as a base for tile requests",
            ));
        }
        // Url::join replaces the last path segment unless the path ends in '/'
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        Ok(Self {
            client,
            base_url: url,
        })
    }

    /// Service root all tile requests are resolved against
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Request URL for one color key
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the key does not form a valid URL path
    pub fn tile_url(&self, key: &ColorKey) -> Result<Url> {
        self.base_url
            .join(&format!("color/{key}"))
            .map_err(|e| invalid_input("color", key, &e))
    }
}

impl TileLookup for HttpTileLookup {
    async fn lookup(&self, key: &ColorKey) -> Result<TilePayload> {
        let url = self.tile_url(key)?;
        log::debug!("Requesting tile {url}");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| lookup_failure(key, &e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(lookup_failure(key, &format!("HTTP {status}")));
        }

        let body = response.text().await.map_err(|e| lookup_failure(key, &e))?;
        Ok(TilePayload::new(body))
    }
}

impl<T: TileLookup> TileLookup for Arc<T> {
    fn lookup(&self, key: &ColorKey) -> impl Future<Output = Result<TilePayload>> + Send {
        (**self).lookup(key)
    }
}

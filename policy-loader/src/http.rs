//! Remote schema loader over HTTP/HTTPS.

use std::{fmt, time::Duration};

use async_trait::async_trait;
use hyper::body::to_bytes;
use hyper::client::HttpConnector;
use hyper::header::{ACCEPT, USER_AGENT};
use hyper::{Body, Client, Request};
use hyper_rustls::{HttpsConnector, HttpsConnectorBuilder};
use rustls::{ClientConfig, OwnedTrustAnchor, RootCertStore};
use tokio::time::timeout;
use tracing::debug;
use webpki_roots::TLS_SERVER_ROOTS;

use crate::decode::decode_payload;
use crate::source::{SchemaSource, SourceLocation};
use crate::traits::{LoaderError, LoaderResult, SchemaLoader};

const DEFAULT_USER_AGENT: &str = concat!("policy-maker/", env!("CARGO_PKG_VERSION"));

/// Configuration for the [`HttpLoader`].
#[derive(Clone, Debug, Default)]
pub struct HttpConfig {
    timeout: Option<Duration>,
}

impl HttpConfig {
    /// Creates a configuration with no transport timeout.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bounds each request by `timeout`; expiry is reported as a fetch error.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Returns the configured timeout, if any.
    #[must_use]
    pub const fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

type SchemaClient = Client<HttpsConnector<HttpConnector>, Body>;

/// Loader that performs a single `GET` per call.
pub struct HttpLoader {
    client: SchemaClient,
    timeout: Option<Duration>,
}

impl fmt::Debug for HttpLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpLoader")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl HttpLoader {
    /// Constructs a loader from the supplied configuration.
    ///
    /// # Errors
    ///
    /// Returns [`LoaderError::Configuration`] if the HTTP client cannot be
    /// constructed.
    #[allow(clippy::needless_pass_by_value)]
    pub fn new(config: HttpConfig) -> LoaderResult<Self> {
        Ok(Self {
            client: Self::client()?,
            timeout: config.timeout,
        })
    }

    /// Client for both `http://` and `https://` schema hosts, trusting the
    /// webpki roots.
    fn client() -> LoaderResult<SchemaClient> {
        let mut roots = RootCertStore::empty();
        roots.add_trust_anchors(TLS_SERVER_ROOTS.iter().map(|anchor| {
            OwnedTrustAnchor::from_subject_spki_name_constraints(
                anchor.subject,
                anchor.spki,
                anchor.name_constraints,
            )
        }));

        let tls = ClientConfig::builder()
            .with_safe_default_cipher_suites()
            .with_safe_default_kx_groups()
            .with_safe_default_protocol_versions()
            .map_err(|err| LoaderError::configuration(format!("TLS setup failed: {err}")))?
            .with_root_certificates(roots)
            .with_no_client_auth();

        let connector = HttpsConnectorBuilder::new()
            .with_tls_config(tls)
            .https_or_http()
            .enable_http1()
            .build();
        Ok(Client::builder().build(connector))
    }
}

#[async_trait]
impl SchemaLoader for HttpLoader {
    async fn load(&self, source: &SchemaSource) -> LoaderResult<String> {
        let SourceLocation::Url(uri) = source.location() else {
            return Err(LoaderError::configuration(format!(
                "HTTP loader cannot read local path {source}"
            )));
        };
        let location = uri.to_string();

        let req = Request::get(uri.clone())
            .header(ACCEPT, "application/json, text/plain, */*")
            .header(USER_AGENT, DEFAULT_USER_AGENT)
            .body(Body::empty())
            .map_err(|err| {
                LoaderError::configuration(format!("failed to build schema request: {err}"))
            })?;

        debug!(%location, "fetching schema");
        let pending = self.client.request(req);
        let response = match self.timeout {
            Some(limit) => timeout(limit, pending)
                .await
                .map_err(|_| LoaderError::fetch(&location, "request timed out"))?,
            None => pending.await,
        }
        .map_err(|err| LoaderError::fetch(&location, format!("request failed: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LoaderError::fetch(&location, format!("HTTP status {status}")));
        }

        let body = to_bytes(response.into_body())
            .await
            .map_err(|err| LoaderError::fetch(&location, format!("failed to read body: {err}")))?;
        debug!(%location, bytes = body.len(), "schema fetched");

        decode_payload(&location, body, source.encoding())
    }
}

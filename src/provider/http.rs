//! HTTP provider client.
//!
//! # Responsibilities
//! - Expand the endpoint template for a query
//! - Issue exactly one GET, bounded by the race deadline
//! - Map status, transport and decode failures to [`LookupError`]

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use crate::config::ProviderConfig;
use crate::observability::metrics;
use crate::provider::adapters::ProviderKind;
use crate::provider::types::{LookupError, LookupQuery, LookupRecord};
use crate::provider::LookupProvider;

/// Replace `{cep}` and `{cep_hyphenated}` in an endpoint template.
pub fn expand_endpoint(template: &str, digits: &str, hyphenated: &str) -> String {
    template
        .replace("{cep_hyphenated}", hyphenated)
        .replace("{cep}", digits)
}

/// A provider backed by a JSON-over-HTTP endpoint.
#[derive(Debug, Clone)]
pub struct HttpProvider {
    name: String,
    kind: ProviderKind,
    endpoint: String,
    /// Provider's own ceiling; the race deadline still wins when shorter.
    timeout: Option<Duration>,
    client: Client,
}

impl HttpProvider {
    pub fn new(config: &ProviderConfig) -> Self {
        Self::with_client(config, Client::new())
    }

    /// Build a provider that shares an existing connection pool.
    pub fn with_client(config: &ProviderConfig, client: Client) -> Self {
        Self {
            name: config.name.clone(),
            kind: config.kind,
            endpoint: config.endpoint().to_string(),
            timeout: config.timeout_ms.map(Duration::from_millis),
            client,
        }
    }

    pub fn kind(&self) -> ProviderKind {
        self.kind
    }

    /// Resolve the request URL for a query.
    ///
    /// Templates with a CEP placeholder only accept well-formed CEPs; any
    /// other query would be rewritten into a different identifier.
    pub fn url_for(&self, query: &LookupQuery) -> Result<Url, LookupError> {
        let addresses_cep =
            self.endpoint.contains("{cep}") || self.endpoint.contains("{cep_hyphenated}");
        if addresses_cep && LookupQuery::parse(query.as_str()).is_err() {
            return Err(LookupError::InvalidQuery {
                provider: self.name.clone(),
                query: query.to_string(),
            });
        }

        let expanded = expand_endpoint(&self.endpoint, &query.digits(), &query.hyphenated());
        Url::parse(&expanded).map_err(|e| LookupError::InvalidEndpoint {
            provider: self.name.clone(),
            reason: format!("'{}': {}", expanded, e),
        })
    }

    /// Effective network timeout for a lookup under the given deadline.
    pub fn effective_timeout(&self, deadline: Duration) -> Duration {
        match self.timeout {
            Some(own) => own.min(deadline),
            None => deadline,
        }
    }

    async fn fetch(&self, url: Url, timeout: Duration) -> Result<LookupRecord, LookupError> {
        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|source| self.transport(source))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::Status {
                provider: self.name.clone(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(|source| self.transport(source))?;
        self.kind.decode(&self.name, &body)
    }

    fn transport(&self, source: reqwest::Error) -> LookupError {
        LookupError::Transport {
            provider: self.name.clone(),
            source,
        }
    }
}

#[async_trait]
impl LookupProvider for HttpProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn lookup(
        &self,
        query: &LookupQuery,
        deadline: Duration,
    ) -> Result<LookupRecord, LookupError> {
        let url = self.url_for(query)?;
        let timeout = self.effective_timeout(deadline);
        let start = Instant::now();

        tracing::debug!(
            provider = %self.name,
            url = %url,
            timeout_ms = timeout.as_millis() as u64,
            "Sending lookup request"
        );

        let result = self.fetch(url, timeout).await;
        let elapsed = start.elapsed();

        match &result {
            Ok(_) => tracing::debug!(
                provider = %self.name,
                elapsed_ms = elapsed.as_millis() as u64,
                "Lookup succeeded"
            ),
            Err(e) => tracing::warn!(
                provider = %self.name,
                elapsed_ms = elapsed.as_millis() as u64,
                error = %e,
                "Lookup failed"
            ),
        }

        metrics::record_lookup(&self.name, result.as_ref().err(), elapsed);
        result
    }
}

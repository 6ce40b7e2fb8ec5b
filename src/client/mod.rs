//! SafeNest API client.
//!
//! Provides the main client interface for interacting with the SafeNest API.

use secrecy::ExposeSecret;
use std::sync::Arc;
use std::time::Duration;

use crate::auth::{ApiKeyAuth, AuthProvider};
use crate::config::{SafeNestConfig, SafeNestConfigBuilder};
use crate::errors::{SafeNestError, SafeNestResult};
use crate::executor::RequestExecutor;
use crate::metadata::{ClientMetadata, MetadataState, RateLimitSnapshot, UsageSnapshot};
use crate::observability::{ClientMetrics, MetricsSnapshot};
use crate::resilience::{RetryConfig, RetryPolicy};
use crate::services::{
    AccountService, AnalysisService, GuidanceService, ReportsService, SafetyService, ServiceContext,
};
use crate::transport::{HttpTransport, HttpTransportImpl};

/// The main SafeNest client.
///
/// Cloning is cheap; clones share the connection pool, metrics and
/// response metadata.
///
/// # Example
///
/// ```rust,no_run
/// use safenest_client::{DetectBullyingInput, SafeNestClient};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = SafeNestClient::builder()
///         .api_key("sn_your_api_key")
///         .build()?;
///
///     let result = client
///         .safety()
///         .detect_bullying(DetectBullyingInput::new("nobody likes you"))
///         .await?;
///     println!("bullying: {} ({})", result.is_bullying, result.severity());
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct SafeNestClient {
    config: Arc<SafeNestConfig>,
    safety: SafetyService,
    analysis: AnalysisService,
    guidance: GuidanceService,
    reports: ReportsService,
    account: AccountService,
    metadata: Arc<MetadataState>,
    metrics: Arc<ClientMetrics>,
}

impl SafeNestClient {
    /// Creates a new client builder.
    pub fn builder() -> SafeNestClientBuilder {
        SafeNestClientBuilder::new()
    }

    /// Creates a client from environment variables.
    ///
    /// See [`SafeNestConfig::from_env`] for the variables read.
    pub fn from_env() -> SafeNestResult<Self> {
        SafeNestClientBuilder::from_config(SafeNestConfig::from_env()?).build()
    }

    /// Creates a client from an API key.
    pub fn from_api_key(api_key: impl Into<String>) -> SafeNestResult<Self> {
        SafeNestClientBuilder::new().api_key(api_key).build()
    }

    /// Returns the safety detection service.
    pub fn safety(&self) -> &SafetyService {
        &self.safety
    }

    /// Returns the emotion analysis service.
    pub fn analysis(&self) -> &AnalysisService {
        &self.analysis
    }

    /// Returns the guidance service.
    pub fn guidance(&self) -> &GuidanceService {
        &self.guidance
    }

    /// Returns the incident report service.
    pub fn reports(&self) -> &ReportsService {
        &self.reports
    }

    /// Returns the account data service.
    pub fn account(&self) -> &AccountService {
        &self.account
    }

    /// Returns the configuration.
    pub fn config(&self) -> &SafeNestConfig {
        &self.config
    }

    /// Returns a snapshot of the client's request metrics.
    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Returns all metadata observed from the most recent responses.
    pub fn metadata(&self) -> Arc<ClientMetadata> {
        self.metadata.snapshot()
    }

    /// Last complete usage snapshot reported by the API.
    pub fn usage(&self) -> Option<UsageSnapshot> {
        self.metadata.snapshot().usage
    }

    /// Last complete rate-limit snapshot reported by the API.
    pub fn rate_limit(&self) -> Option<RateLimitSnapshot> {
        self.metadata.snapshot().rate_limit
    }

    /// Usage warning carried by the most recent response.
    pub fn usage_warning(&self) -> Option<String> {
        self.metadata.snapshot().usage_warning.clone()
    }

    /// Request id of the most recent response.
    pub fn last_request_id(&self) -> Option<String> {
        self.metadata.snapshot().last_request_id.clone()
    }

    /// Round-trip time of the most recent exchange.
    pub fn last_latency(&self) -> Option<Duration> {
        self.metadata.snapshot().last_latency
    }
}

impl std::fmt::Debug for SafeNestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SafeNestClient")
            .field("config", &self.config)
            .finish()
    }
}

/// Builder for [`SafeNestClient`].
#[derive(Default)]
pub struct SafeNestClientBuilder {
    config_builder: SafeNestConfigBuilder,
    transport: Option<Arc<dyn HttpTransport>>,
    auth: Option<Arc<dyn AuthProvider>>,
}

impl SafeNestClientBuilder {
    /// Creates a new client builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder from an existing configuration.
    pub fn from_config(config: SafeNestConfig) -> Self {
        let mut config_builder = SafeNestConfigBuilder::new()
            .api_key(config.api_key().expose_secret().clone())
            .base_url(config.base_url)
            .timeout(config.timeout)
            .max_retries(config.max_retries)
            .retry_delay(config.retry_delay);
        for (name, value) in config.custom_headers {
            config_builder = config_builder.header(name, value);
        }

        Self {
            config_builder,
            transport: None,
            auth: None,
        }
    }

    /// Sets the API key.
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.config_builder = self.config_builder.api_key(api_key);
        self
    }

    /// Sets the base URL.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config_builder = self.config_builder.base_url(base_url);
        self
    }

    /// Sets the per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config_builder = self.config_builder.timeout(timeout);
        self
    }

    /// Sets the maximum number of retries.
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.config_builder = self.config_builder.max_retries(retries);
        self
    }

    /// Sets the base delay for exponential backoff.
    pub fn retry_delay(mut self, delay: Duration) -> Self {
        self.config_builder = self.config_builder.retry_delay(delay);
        self
    }

    /// Adds a header sent with every request.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.config_builder = self.config_builder.header(name, value);
        self
    }

    /// Sets a custom transport.
    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Sets a custom auth provider.
    pub fn auth(mut self, auth: Arc<dyn AuthProvider>) -> Self {
        self.auth = Some(auth);
        self
    }

    /// Builds the client.
    pub fn build(self) -> SafeNestResult<SafeNestClient> {
        let config = self.config_builder.build()?;

        let transport: Arc<dyn HttpTransport> = match self.transport {
            Some(t) => t,
            None => Arc::new(
                HttpTransportImpl::new(&config.base_url, config.timeout)
                    .map_err(|e| SafeNestError::configuration(e.to_string()))?,
            ),
        };

        let auth: Arc<dyn AuthProvider> = match self.auth {
            Some(a) => a,
            None => Arc::new(ApiKeyAuth::new(config.api_key().clone())),
        };
        auth.validate()?;

        let metadata = Arc::new(MetadataState::new());
        let metrics = Arc::new(ClientMetrics::new());

        let retry = RetryPolicy::new(
            RetryConfig::new()
                .max_retries(config.max_retries)
                .base_delay(config.retry_delay),
        )
        .with_metrics(Arc::clone(&metrics));

        let executor = RequestExecutor::new(
            transport,
            auth,
            config.timeout,
            Arc::clone(&metadata),
            Arc::clone(&metrics),
        )
        .with_headers(config.custom_headers.clone());

        let ctx = ServiceContext::new(Arc::new(executor), Arc::new(retry));

        tracing::debug!(
            base_url = %config.base_url,
            timeout_ms = config.timeout.as_millis() as u64,
            max_retries = config.max_retries,
            "SafeNest client created"
        );

        Ok(SafeNestClient {
            config: Arc::new(config),
            safety: SafetyService::new(ctx.clone()),
            analysis: AnalysisService::new(ctx.clone()),
            guidance: GuidanceService::new(ctx.clone()),
            reports: ReportsService::new(ctx.clone()),
            account: AccountService::new(ctx),
            metadata,
            metrics,
        })
    }
}

impl std::fmt::Debug for SafeNestClientBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SafeNestClientBuilder")
            .field("custom_transport", &self.transport.is_some())
            .field("custom_auth", &self.auth.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;
    use crate::mocks::{fixtures, MockAuth, MockResponse, MockTransport};
    use crate::types::DetectBullyingInput;

    const KEY: &str = "sn_test_key_1234";

    fn client_with(transport: Arc<MockTransport>) -> SafeNestClient {
        SafeNestClient::builder()
            .api_key(KEY)
            .retry_delay(Duration::from_millis(1))
            .transport(transport)
            .build()
            .unwrap()
    }

    #[test]
    fn test_builder_requires_api_key() {
        let err = SafeNestClient::builder().build().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn test_from_api_key_rejects_short_key() {
        let err = SafeNestClient::from_api_key("short").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn test_from_config_preserves_settings() {
        let config = SafeNestConfig::builder()
            .api_key(KEY)
            .base_url("http://localhost:8080/")
            .timeout(Duration::from_secs(5))
            .max_retries(1)
            .header("X-Tenant", "acme")
            .build()
            .unwrap();

        let client = SafeNestClientBuilder::from_config(config)
            .transport(Arc::new(MockTransport::new()))
            .build()
            .unwrap();

        assert_eq!(client.config().base_url, "http://localhost:8080");
        assert_eq!(client.config().timeout, Duration::from_secs(5));
        assert_eq!(client.config().max_retries, 1);
        assert_eq!(
            client.config().custom_headers,
            vec![("X-Tenant".to_string(), "acme".to_string())]
        );
    }

    #[test]
    fn test_debug_redacts_key() {
        let client = client_with(Arc::new(MockTransport::new()));
        let debug = format!("{:?}", client);
        assert!(!debug.contains(KEY));
    }

    #[tokio::test]
    async fn test_request_carries_auth_and_custom_headers() {
        let transport = Arc::new(MockTransport::new());
        transport.queue_json(&fixtures::bullying(0.1, false));

        let client = SafeNestClient::builder()
            .api_key(KEY)
            .header("X-Tenant", "acme")
            .transport(transport.clone())
            .build()
            .unwrap();

        client
            .safety()
            .detect_bullying(DetectBullyingInput::new("hello"))
            .await
            .unwrap();

        let request = transport.last_request().unwrap();
        assert_eq!(request.header("Authorization"), Some(format!("Bearer {KEY}").as_str()));
        assert_eq!(request.header("X-Tenant"), Some("acme"));
        assert_eq!(request.header("Accept"), Some("application/json"));
    }

    #[tokio::test]
    async fn test_custom_auth_provider_is_used() {
        let transport = Arc::new(MockTransport::new());
        transport.queue_json(&fixtures::bullying(0.1, false));

        let client = SafeNestClient::builder()
            .api_key(KEY)
            .auth(Arc::new(MockAuth::new("mock-token")))
            .transport(transport.clone())
            .build()
            .unwrap();

        client
            .safety()
            .detect_bullying(DetectBullyingInput::new("hello"))
            .await
            .unwrap();

        let request = transport.last_request().unwrap();
        assert_eq!(request.header("Authorization"), Some("Bearer mock-token"));
    }

    #[tokio::test]
    async fn test_metadata_and_metrics_exposed() {
        let transport = Arc::new(MockTransport::new());
        transport.queue(
            MockResponse::json(&fixtures::bullying(0.8, true))
                .with_header("X-Request-Id", "req_42")
                .with_header("X-Monthly-Limit", "1000")
                .with_header("X-Monthly-Used", "10")
                .with_header("X-Monthly-Remaining", "990")
                .with_header("X-Usage-Warning", "Approaching limit"),
        );
        let client = client_with(transport);

        let result = client
            .safety()
            .detect_bullying(DetectBullyingInput::new("you are awful"))
            .await
            .unwrap();

        assert!(result.is_bullying);
        assert_eq!(client.last_request_id().as_deref(), Some("req_42"));
        assert_eq!(
            client.usage(),
            Some(UsageSnapshot {
                limit: 1000,
                used: 10,
                remaining: 990
            })
        );
        assert_eq!(client.usage_warning().as_deref(), Some("Approaching limit"));
        assert!(client.last_latency().is_some());
        assert_eq!(client.rate_limit(), None);

        let metrics = client.metrics();
        assert_eq!(metrics.requests, 1);
        assert_eq!(metrics.successes, 1);
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let transport = Arc::new(MockTransport::new());
        transport.queue(MockResponse::json(&fixtures::bullying(0.1, false)).with_header("X-Request-Id", "req_1"));
        let client = client_with(transport);
        let clone = client.clone();

        clone
            .safety()
            .detect_bullying(DetectBullyingInput::new("hi"))
            .await
            .unwrap();

        assert_eq!(client.last_request_id().as_deref(), Some("req_1"));
        assert_eq!(client.metrics().requests, 1);
    }

    #[tokio::test]
    async fn test_server_errors_retried_up_to_budget() {
        let transport = Arc::new(MockTransport::new());
        for _ in 0..4 {
            transport.queue_error(503, "unavailable");
        }
        let client = client_with(transport.clone());

        let err = client
            .safety()
            .detect_bullying(DetectBullyingInput::new("hi"))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Server);
        assert_eq!(transport.request_count(), 4);
        assert_eq!(client.metrics().retries, 3);
    }
}

//! Service implementations for the SafeNest API.
//!
//! Each service is a cheap handle over the client's shared request
//! pipeline. `with_cancellation` returns a handle whose calls all observe
//! the given token.

mod account;
mod analysis;
mod guidance;
mod reports;
mod safety;

pub use account::AccountService;
pub use analysis::AnalysisService;
pub use guidance::GuidanceService;
pub use reports::ReportsService;
pub use safety::SafetyService;

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::errors::{ErrorKind, SafeNestError, SafeNestResult};
use crate::executor::{RequestDescriptor, RequestExecutor};
use crate::resilience::RetryPolicy;
use crate::transport::HttpResponse;

/// Pipeline shared by every service of a client.
#[derive(Clone)]
pub(crate) struct ServiceContext {
    executor: Arc<RequestExecutor>,
    retry: Arc<RetryPolicy>,
    cancel: CancellationToken,
}

impl ServiceContext {
    pub(crate) fn new(executor: Arc<RequestExecutor>, retry: Arc<RetryPolicy>) -> Self {
        Self {
            executor,
            retry,
            cancel: CancellationToken::new(),
        }
    }

    pub(crate) fn with_cancellation(&self, cancel: CancellationToken) -> Self {
        Self {
            executor: Arc::clone(&self.executor),
            retry: Arc::clone(&self.retry),
            cancel,
        }
    }

    /// Runs a request through the retry loop and decodes the 2xx body.
    pub(crate) async fn call<T: DeserializeOwned>(&self, descriptor: RequestDescriptor) -> SafeNestResult<T> {
        let executor = &self.executor;
        let cancel = &self.cancel;
        let descriptor = &descriptor;

        let response = self
            .retry
            .run(cancel, move |_| executor.execute(descriptor, cancel))
            .await?;

        decode(&response)
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("retry", &self.retry.config())
            .field("cancelled", &self.cancel.is_cancelled())
            .finish()
    }
}

fn decode<T: DeserializeOwned>(response: &HttpResponse) -> SafeNestResult<T> {
    response.json().map_err(|e| {
        SafeNestError::new(ErrorKind::Generic, "Failed to parse API response")
            .with_status(response.status)
            .with_details(serde_json::json!({ "cause": e.to_string() }))
    })
}

/// `{"sender", "text"}` message shape used by emotions and reports.
#[derive(Debug, Serialize)]
struct SenderMessage<'a> {
    sender: &'a str,
    text: &'a str,
}

//! Account data management service.

use tokio_util::sync::CancellationToken;
use tracing::instrument;

use super::ServiceContext;
use crate::errors::SafeNestResult;
use crate::executor::RequestDescriptor;
use crate::types::{AccountDeletionResult, AccountExportResult};

const DATA_PATH: &str = "/api/v1/account/data";
const EXPORT_PATH: &str = "/api/v1/account/export";

/// Erasure and export of the account's stored data.
#[derive(Debug, Clone)]
pub struct AccountService {
    ctx: ServiceContext,
}

impl AccountService {
    pub(crate) fn new(ctx: ServiceContext) -> Self {
        Self { ctx }
    }

    /// Returns a handle whose calls observe `cancel`.
    pub fn with_cancellation(&self, cancel: CancellationToken) -> Self {
        Self::new(self.ctx.with_cancellation(cancel))
    }

    /// Deletes all data stored for the account.
    #[instrument(skip(self))]
    pub async fn delete_data(&self) -> SafeNestResult<AccountDeletionResult> {
        self.ctx.call(RequestDescriptor::delete(DATA_PATH)).await
    }

    /// Exports all data stored for the account.
    #[instrument(skip(self))]
    pub async fn export_data(&self) -> SafeNestResult<AccountExportResult> {
        self.ctx.call(RequestDescriptor::get(EXPORT_PATH)).await
    }
}

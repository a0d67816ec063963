use std::{future::Future, panic::AssertUnwindSafe, sync::Arc};

use async_trait::async_trait;
use futures::FutureExt;

use crate::{
    domain::validation::{Payload, Schema},
    entities::identity::{CallContext, Identity},
    envelope::Envelope,
    errors::AppError,
};

/// Resolves the caller of an operation from its call context.
///
/// `Ok(None)` means "nobody is signed in"; `Err` means the lookup itself failed.
#[async_trait]
pub trait IdentityResolver: Send + Sync {
    async fn resolve(&self, ctx: &CallContext) -> Result<Option<Identity>, AppError>;
}

/// Authenticate, then validate, then execute. Every outcome is an [`Envelope`].
#[derive(Clone)]
pub struct Gate {
    resolver: Arc<dyn IdentityResolver>,
}

impl Gate {
    pub fn new(resolver: Arc<dyn IdentityResolver>) -> Self {
        Gate { resolver }
    }

    pub async fn run_protected<T, R, F, Fut>(
        &self,
        ctx: &CallContext,
        payload: Payload,
        operation: F,
    ) -> Envelope<R>
    where
        T: Schema,
        F: FnOnce(T, Identity) -> Fut,
        Fut: Future<Output = Result<R, AppError>>,
    {
        let identity = match self.resolver.resolve(ctx).await {
            Ok(Some(identity)) => identity,
            Ok(None) => {
                tracing::debug!("Rejected unauthenticated call");
                return Envelope::failure(AppError::unauthorized());
            }
            Err(e) => return Envelope::failure(e),
        };

        let input = match T::parse(payload) {
            Ok(input) => input,
            Err(details) => {
                tracing::debug!(fields = details.len(), "Rejected invalid payload");
                return Envelope::failure(AppError::ValidationError(details));
            }
        };

        match AssertUnwindSafe(operation(input, identity)).catch_unwind().await {
            Ok(result) => Envelope::from_result(result),
            Err(panic) => {
                let cause = panic
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| panic.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "operation panicked".to_string());
                Envelope::failure(AppError::InternalError(cause))
            }
        }
    }
}

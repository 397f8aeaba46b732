//! # Fetch outcome contract and request scopes
//!
//! Every fetcher in this crate is an `async fn` returning
//! `Result<T, FetchError>`. Views that prefer the callback style hand the result
//! to [`deliver`] (or await through [`observe`]) with a [`FetchObserver`], which
//! receives exactly one of:
//!
//! - success: `on_error_flag(false)` then `on_success(data)`
//! - failure: `on_error_flag(true)` then `on_error_message(description)`
//!
//! [`FetchState`] is a ready-made observer holding the data, the error flag and
//! the error message, the usual component-local state for a fetch.
//!
//! ## Cancellation
//!
//! A [`RequestScope`] is passed to every fetch. When the owning view goes away it
//! calls [`cancel`](RequestScope::cancel); in-flight requests then resolve to
//! [`FetchError::Cancelled`], fetchers skip any mirror writes, and results are
//! dropped without invoking callbacks.

use std::future::Future;

use tokio_util::sync::CancellationToken;

use crate::error::FetchError;

/// Receives the outcome of one fetch.
pub trait FetchObserver<T> {
    fn on_success(&mut self, data: T);
    fn on_error_flag(&mut self, error: bool);
    fn on_error_message(&mut self, message: String);
}

/// Route a fetch result to `observer`. Cancelled results are dropped.
pub fn deliver<T>(result: Result<T, FetchError>, observer: &mut impl FetchObserver<T>) {
    match result {
        Ok(data) => {
            observer.on_error_flag(false);
            observer.on_success(data);
        }
        Err(FetchError::Cancelled) => {
            tracing::debug!("Dropping result of cancelled request");
        }
        Err(e) => {
            observer.on_error_flag(true);
            observer.on_error_message(e.to_string());
        }
    }
}

/// Await `request` and deliver its outcome unless `scope` was cancelled.
pub async fn observe<T, F>(scope: &RequestScope, request: F, observer: &mut impl FetchObserver<T>)
where
    F: Future<Output = Result<T, FetchError>>,
{
    let result = scope.run(request).await;
    if scope.is_cancelled() {
        return;
    }
    deliver(result, observer);
}

/// Component-local state of one fetch.
#[derive(Clone, Debug, PartialEq)]
pub struct FetchState<T> {
    pub data: Option<T>,
    pub error: bool,
    pub error_message: String,
}

impl<T> Default for FetchState<T> {
    fn default() -> Self {
        Self {
            data: None,
            error: false,
            error_message: String::new(),
        }
    }
}

impl<T> FetchObserver<T> for FetchState<T> {
    fn on_success(&mut self, data: T) {
        self.data = Some(data);
        self.error_message.clear();
    }

    fn on_error_flag(&mut self, error: bool) {
        self.error = error;
    }

    fn on_error_message(&mut self, message: String) {
        self.error_message = message;
    }
}

/// Lifetime of the view that issued a request.
#[derive(Clone, Debug, Default)]
pub struct RequestScope {
    token: CancellationToken,
}

impl RequestScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// A scope cancelled together with this one, but cancellable on its own.
    pub fn child(&self) -> Self {
        Self {
            token: self.token.child_token(),
        }
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Race `request` against cancellation of this scope.
    pub async fn run<T, F>(&self, request: F) -> Result<T, FetchError>
    where
        F: Future<Output = Result<T, FetchError>>,
    {
        if self.is_cancelled() {
            return Err(FetchError::Cancelled);
        }
        tokio::select! {
            biased;
            _ = self.token.cancelled() => Err(FetchError::Cancelled),
            result = request => result,
        }
    }

    /// `Err(Cancelled)` once the scope is cancelled; fetchers call this before
    /// applying a result to shared state.
    pub fn ensure_active(&self) -> Result<(), FetchError> {
        if self.is_cancelled() {
            Err(FetchError::Cancelled)
        } else {
            Ok(())
        }
    }
}

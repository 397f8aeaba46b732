//! # Authenticated session
//!
//! A session is either [`SessionState::Anonymous`] or
//! [`SessionState::Authenticated`]. It moves to Authenticated on a successful
//! login (or register followed by login) and back to Anonymous on logout.
//!
//! The token and the owning user id are persisted as two independent durable
//! values through [`store::SessionStore`] and restored at start-up. The client
//! performs no expiry or revocation check: a token the server no longer accepts
//! is only discovered when an authenticated request fails with
//! [`FetchError::is_unauthorized`], and it is up to the caller to
//! [`logout`](Session::logout) at that point.

use std::sync::{Arc, PoisonError, RwLock};

use serde::Deserialize;
use store::{Credentials, DurableStorage, NewUser, SessionRecord, SessionStore};

use crate::client::ApiClient;
use crate::error::FetchError;
use crate::fetch::RequestScope;
use crate::image::ImageUpload;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum SessionState {
    #[default]
    Anonymous,
    Authenticated { token: String, user_id: u32 },
}

/// Shared view of the current session state, read by [`ApiClient`] on every
/// request.
#[derive(Clone, Debug, Default)]
pub struct SessionHandle(Arc<RwLock<SessionState>>);

impl SessionHandle {
    pub fn state(&self) -> SessionState {
        self.0.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn token(&self) -> Option<String> {
        match &*self.0.read().unwrap_or_else(PoisonError::into_inner) {
            SessionState::Authenticated { token, .. } => Some(token.clone()),
            SessionState::Anonymous => None,
        }
    }

    pub fn user_id(&self) -> Option<u32> {
        match &*self.0.read().unwrap_or_else(PoisonError::into_inner) {
            SessionState::Authenticated { user_id, .. } => Some(*user_id),
            SessionState::Anonymous => None,
        }
    }

    fn set(&self, state: SessionState) {
        *self.0.write().unwrap_or_else(PoisonError::into_inner) = state;
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub user_id: u32,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub user_id: u32,
    pub token: String,
}

/// Session state machine with durable persistence.
#[derive(Clone, Debug)]
pub struct Session<S> {
    handle: SessionHandle,
    store: SessionStore<S>,
}

impl<S: DurableStorage> Session<S> {
    /// Restore the session persisted in `storage`. Both the token and a readable
    /// user id must be present to start Authenticated.
    pub fn restore(storage: S) -> Self {
        let store = SessionStore::new(storage);
        let state = match store.load() {
            SessionRecord {
                token: Some(token),
                user_id: Some(user_id),
            } => SessionState::Authenticated { token, user_id },
            _ => SessionState::Anonymous,
        };

        let handle = SessionHandle::default();
        handle.set(state);
        Self { handle, store }
    }

    pub fn handle(&self) -> SessionHandle {
        self.handle.clone()
    }

    pub fn state(&self) -> SessionState {
        self.handle.state()
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.state(), SessionState::Authenticated { .. })
    }

    pub fn token(&self) -> Option<String> {
        self.handle.token()
    }

    pub fn user_id(&self) -> Option<u32> {
        self.handle.user_id()
    }

    fn sign_in(&self, login: &LoginResponse) -> Result<(), FetchError> {
        self.store.save(&login.token, login.user_id)?;
        self.handle.set(SessionState::Authenticated {
            token: login.token.clone(),
            user_id: login.user_id,
        });
        tracing::info!("Signed in as user {}", login.user_id);
        Ok(())
    }

    /// `POST /users/login`; on success the session becomes Authenticated.
    pub async fn login(
        &self,
        client: &ApiClient,
        credentials: &Credentials,
        scope: &RequestScope,
    ) -> Result<LoginResponse, FetchError> {
        let login = client.login(credentials, scope).await?;
        scope.ensure_active()?;
        self.sign_in(&login)?;
        Ok(login)
    }

    /// Register a new account and log straight into it.
    pub async fn register(
        &self,
        client: &ApiClient,
        new_user: &NewUser,
        scope: &RequestScope,
    ) -> Result<LoginResponse, FetchError> {
        client.register(new_user, scope).await?;
        let credentials = Credentials {
            email: new_user.email.clone(),
            password: new_user.password.clone(),
        };
        self.login(client, &credentials, scope).await
    }

    /// Register, log in, then upload a profile image for the new account.
    /// If the upload fails the session stays Authenticated and the upload
    /// error is returned.
    pub async fn register_with_image(
        &self,
        client: &ApiClient,
        new_user: &NewUser,
        image: &ImageUpload,
        scope: &RequestScope,
    ) -> Result<LoginResponse, FetchError> {
        let login = self.register(client, new_user, scope).await?;
        client.set_user_image(login.user_id, image, scope).await?;
        Ok(login)
    }

    /// `POST /users/logout`, then become Anonymous regardless of the server's
    /// answer. The server error, if any, is still returned.
    pub async fn logout(&self, client: &ApiClient, scope: &RequestScope) -> Result<(), FetchError> {
        let remote = client.logout(scope).await;

        self.handle.set(SessionState::Anonymous);
        self.store.clear()?;
        tracing::info!("Signed out");

        remote
    }
}

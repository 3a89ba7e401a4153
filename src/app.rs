//! Application bootstrap and shared context.
//!
//! DESIGN
//! ======
//! [`App`] owns one of everything: the session cell, the API client, the
//! session store, the router and the resolved locale. Construction restores
//! any persisted session before the first navigation, so guards see the
//! restored identity from the start.

#[cfg(test)]
#[path = "app_test.rs"]
mod app_test;

use std::sync::Arc;

use crate::config::{ClientConfig, ConfigError};
use crate::net::api::ApiClient;
use crate::net::transport::{HttpTransport, ReqwestTransport, TransportError};
use crate::router::{Navigator, Resolved, Router, RouterError};
use crate::state::auth::{LoginOutcome, SessionStore};
use crate::state::persistence::{FilePersistence, SessionPersistence};
use crate::state::session::SessionCell;
use crate::util::locale::{self, Locale};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("http client setup failed: {0}")]
    Transport(#[from] TransportError),
}

pub struct App {
    locale: Locale,
    preferences: Arc<dyn SessionPersistence>,
    api: ApiClient,
    store: SessionStore,
    router: Router,
}

impl App {
    /// Build the production context: file-backed storage under the config's
    /// state dir and a reqwest transport against its API URL.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Transport`] if the HTTP client cannot be built.
    pub fn from_config(config: &ClientConfig) -> Result<Self, AppError> {
        let transport = ReqwestTransport::new(&config.api_url, config.timeouts)?;
        let session_store = FilePersistence::open(config.session_file());
        let preferences = FilePersistence::open(config.preferences_file());
        tracing::debug!(api_url = %config.api_url, state_dir = %config.state_dir.display(), "bootstrapping client");
        Ok(Self::from_parts(Arc::new(transport), Arc::new(session_store), Arc::new(preferences)))
    }

    /// Wire the context from injected parts and restore the persisted session.
    #[must_use]
    pub fn from_parts(
        transport: Arc<dyn HttpTransport>,
        session_store: Arc<dyn SessionPersistence>,
        preferences: Arc<dyn SessionPersistence>,
    ) -> Self {
        let locale = locale::current(preferences.as_ref());
        let (navigator, pending) = Navigator::channel();
        let session = Arc::new(SessionCell::new(session_store));
        let api = ApiClient::new(transport, session.clone(), navigator.clone());
        let store = SessionStore::new(session.clone(), api.clone(), navigator);
        let router = Router::new(session, pending);

        let authenticated = store.restore();
        tracing::info!(%locale, authenticated, "client ready");
        Self { locale, preferences, api, store, router }
    }

    #[must_use]
    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn set_locale(&mut self, locale: Locale) {
        locale::set_locale(self.preferences.as_ref(), locale);
        self.locale = locale;
    }

    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    #[must_use]
    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    #[must_use]
    pub fn router(&self) -> &Router {
        &self.router
    }

    /// Navigate to an app-relative path, applying any queued requests first.
    ///
    /// # Errors
    ///
    /// See [`Router::navigate`].
    pub fn navigate(&mut self, raw: &str) -> Result<Resolved, RouterError> {
        self.router.process_pending()?;
        self.router.navigate(raw)
    }

    /// Log in, then land on the remembered redirect target or the role's home.
    /// A failed login leaves the router where it was.
    ///
    /// # Errors
    ///
    /// Only routing errors; login failures are reported in the outcome.
    pub async fn login(&mut self, email: &str, password: &str) -> Result<(LoginOutcome, Option<Resolved>), RouterError> {
        let outcome = self.store.login(email, password).await;
        let landing = match &outcome {
            LoginOutcome::Success { role, .. } => Some(self.router.after_login(*role)?),
            LoginOutcome::Failure { .. } => None,
        };
        Ok((outcome, landing))
    }

    /// Log out and follow the resulting navigation to the login view.
    ///
    /// # Errors
    ///
    /// See [`Router::process_pending`].
    pub fn logout(&mut self) -> Result<Option<Resolved>, RouterError> {
        self.store.logout();
        self.router.process_pending()
    }

    /// Apply navigations queued by the store or API client, such as the
    /// forced logout after a rejected token.
    ///
    /// # Errors
    ///
    /// See [`Router::process_pending`].
    pub fn sync(&mut self) -> Result<Option<Resolved>, RouterError> {
        self.router.process_pending()
    }
}

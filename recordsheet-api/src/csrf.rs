use secrecy::{ExposeSecret, SecretString};
use std::sync::{Arc, PoisonError, RwLock};

/// Supplies the anti-forgery token. Consulted once per request.
pub trait CsrfTokenSource: Send + Sync {
    fn csrf_token(&self) -> Option<SecretString>;
}

/// For read-only sessions; state-changing requests fail with
/// [`crate::ApiError::MissingCsrfToken`].
pub struct NoCsrfToken;

impl CsrfTokenSource for NoCsrfToken {
    fn csrf_token(&self) -> Option<SecretString> {
        None
    }
}

pub struct StaticCsrfToken(SecretString);

impl StaticCsrfToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(SecretString::from(token.into()))
    }
}

impl CsrfTokenSource for StaticCsrfToken {
    fn csrf_token(&self) -> Option<SecretString> {
        Some(SecretString::from(self.0.expose_secret().to_string()))
    }
}

/// A token that can be rotated while clients hold on to it.
#[derive(Clone)]
pub struct SharedCsrfToken {
    inner: Arc<RwLock<SecretString>>,
}

impl SharedCsrfToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(SecretString::from(token.into()))),
        }
    }

    pub fn rotate(&self, token: impl Into<String>) {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        *guard = SecretString::from(token.into());
    }
}

impl CsrfTokenSource for SharedCsrfToken {
    fn csrf_token(&self) -> Option<SecretString> {
        let guard = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        Some(SecretString::from(guard.expose_secret().to_string()))
    }
}

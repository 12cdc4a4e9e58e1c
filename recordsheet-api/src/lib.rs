pub mod csrf;
pub mod endpoints;
mod error;
mod json;
mod macros;
pub mod repositories;
mod request;

pub use crate::csrf::{CsrfTokenSource, NoCsrfToken, SharedCsrfToken, StaticCsrfToken};
pub use crate::error::{ApiError, ErrorResponse};
pub use crate::json::clean_json;
pub use crate::request::{ApiRequest, RequestData};
pub use reqwest::{Method, StatusCode};

use endpoints::templates::GetTemplate;
use repositories::*;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;

/// Header carrying the anti-forgery token on every state-changing request.
pub const CSRF_HEADER: &str = "X-csrf-token";

const JSON_MIME: &str = "application/json";
const HTML_MIME: &str = "text/html";

pub struct Client {
    http: reqwest::Client,
    base_url: String,
    csrf: Arc<dyn CsrfTokenSource>,
}

impl Client {
    /// `server_url` is the scheme and authority, `app_root` the path prefix the
    /// application is mounted under (may be empty).
    pub fn new(server_url: &str, app_root: &str) -> Self {
        let base_url = format!(
            "{}/{}",
            server_url.trim_end_matches('/'),
            app_root.trim_matches('/')
        );

        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            csrf: Arc::new(NoCsrfToken),
        }
    }

    pub fn with_csrf_token<S>(mut self, source: S) -> Self
    where
        S: CsrfTokenSource + 'static,
    {
        self.csrf = Arc::new(source);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn send<R>(&self, request: R) -> Result<R::Response, ApiError>
    where
        R: ApiRequest,
        R::Response: DeserializeOwned,
    {
        let body = self
            .execute(R::METHOD, &request.endpoint(), request.data(), JSON_MIME)
            .await?;
        serde_json::from_str(&body).map_err(From::from)
    }

    /// Fetch a raw markup fragment. The body is returned untouched.
    pub async fn fetch_template(&self, request: GetTemplate) -> Result<String, ApiError> {
        self.execute(
            Method::GET,
            &request.endpoint(),
            RequestData::<&()>::Empty,
            HTML_MIME,
        )
        .await
    }

    async fn execute<D>(
        &self,
        method: Method,
        endpoint: &str,
        data: RequestData<&D>,
        accept: &'static str,
    ) -> Result<String, ApiError>
    where
        D: Serialize + ?Sized,
    {
        let url = format!("{}{}", self.base_url, endpoint);
        tracing::debug!("{} {}", method, url);

        let mut builder = self.http.request(method.clone(), &url).header(ACCEPT, accept);

        // Re-read on every request so a rotated token is picked up.
        if method != Method::GET {
            let token = self.csrf.csrf_token().ok_or(ApiError::MissingCsrfToken)?;
            builder = builder.header(CSRF_HEADER, token.expose_secret());
        }

        match data {
            RequestData::Empty => {}
            RequestData::Query(query) => {
                builder = builder.query(query);
            }
            RequestData::Json(payload) => {
                let body = clean_json(payload)?;
                builder = builder
                    .header(CONTENT_TYPE, JSON_MIME)
                    .body(body.to_string());
            }
        }

        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if status != StatusCode::OK {
            let err = ApiError::from_response(status, &body);
            tracing::debug!("{} {} rejected: {}", method, url, err);
            return Err(err);
        }

        Ok(body)
    }
}

pub struct Request;

impl Request {
    pub fn accounts() -> AccountRepository {
        AccountRepository::new()
    }

    pub fn journal() -> JournalRepository {
        JournalRepository::new()
    }

    pub fn templates() -> TemplateRepository {
        TemplateRepository::new()
    }
}

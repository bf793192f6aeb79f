//! REST client for the Car Mart backend
//!
//! Calls are plain request/response: no retry, no backoff and no request
//! de-duplication. Every operation accepts an optional [`ScopeHandle`] so a
//! view can discard responses that arrive after it closed.

pub mod auth;
pub mod envelope;
pub mod favorites;
pub mod upload;

pub use auth::{Credentials, Registration};
pub use envelope::{ApiEnvelope, ListPage, UploadedImage};
pub use upload::UploadFile;

use crate::config::ClientConfig;
use crate::core::cancel::{ScopeHandle, run_scoped};
use crate::core::entity::Listing;
use crate::core::error::{MarketError, Result};
use crate::core::query::ListQuery;
use crate::core::session::SessionStore;
use envelope::ErrorBody;
use reqwest::{Method, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;

/// Whether a call needs the session token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Auth {
    /// Send the token when there is one
    Optional,
    /// Fail locally with `Unauthenticated` when there is no token
    Required,
}

/// Typed client for the marketplace API
///
/// Cloning is cheap: clones share the HTTP connection pool and the session.
///
/// # Example
/// ```rust,ignore
/// let session = SessionStore::in_memory();
/// let client = MarketClient::new(ClientConfig::default(), session)?;
///
/// let query = ListQuery::new(filters).with_page(1, 12);
/// let page = client.list::<Vehicle>(&query, None).await?;
/// println!("{} of {:?} vehicles", page.len(), page.total);
/// ```
#[derive(Clone)]
pub struct MarketClient {
    http: reqwest::Client,
    base: Url,
    session: SessionStore,
    config: Arc<ClientConfig>,
}

impl MarketClient {
    pub fn new(config: ClientConfig, session: SessionStore) -> Result<Self> {
        config.validate()?;
        let base = config.api_base()?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| MarketError::Config(format!("cannot build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base,
            session,
            config: Arc::new(config),
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    /// URL of an endpoint below the API base; segments are percent-encoded
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| MarketError::Config(format!("base_url '{}' cannot be a base", self.base)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Start a request, attaching the bearer token per `auth`
    pub(crate) fn request(&self, method: Method, url: Url, auth: Auth) -> Result<RequestBuilder> {
        let token = self.session.token();
        if auth == Auth::Required && token.is_none() {
            tracing::debug!(%url, "refusing authenticated call without a session");
            return Err(MarketError::Unauthenticated);
        }

        let mut builder = self.http.request(method, url);
        if let Some(token) = token {
            builder = builder.bearer_auth(token);
        }
        Ok(builder)
    }

    /// Send a request and unwrap the response envelope
    pub(crate) async fn execute<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<ApiEnvelope<T>> {
        let request = request.build()?;
        let method = request.method().clone();
        let endpoint = request
            .url()
            .path()
            .strip_prefix(self.base.path().trim_end_matches('/'))
            .unwrap_or(request.url().path())
            .to_string();

        tracing::debug!(%method, endpoint = %endpoint, "sending request");
        let response = match self.http.execute(request).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(%method, endpoint = %endpoint, error = %e, "request failed");
                return Err(e.into());
            }
        };
        let status = response.status();
        let body = response.bytes().await?;
        tracing::debug!(%method, endpoint = %endpoint, status = status.as_u16(), "response received");

        if !status.is_success() {
            let message = serde_json::from_slice::<ErrorBody>(&body)
                .ok()
                .and_then(ErrorBody::into_message);
            let err = MarketError::api(status, message);
            tracing::warn!(%method, endpoint = %endpoint, status = status.as_u16(), error = %err, "request rejected");
            return Err(err);
        }

        let value: Value =
            serde_json::from_slice(&body).map_err(|e| MarketError::decode(&endpoint, e))?;
        ApiEnvelope::from_value(&endpoint, value).inspect_err(|e| {
            tracing::warn!(%method, endpoint = %endpoint, error = %e, "unusable response");
        })
    }

    /// Fetch one page of listings
    ///
    /// Every non-empty filter becomes a query parameter; lists are comma-joined.
    pub async fn list<T: Listing>(
        &self,
        query: &ListQuery,
        scope: Option<&ScopeHandle>,
    ) -> Result<ListPage<T>> {
        run_scoped(scope, async {
            let mut url = self.endpoint(&[T::resource_name()])?;
            let params = query.to_params();
            if !params.is_empty() {
                url.query_pairs_mut().extend_pairs(params);
            }
            let request = self.request(Method::GET, url, Auth::Optional)?;
            let envelope = self.execute::<Vec<T>>(request).await?;
            let page = ListPage::from_envelope(T::resource_name(), envelope)?;
            tracing::debug!(
                resource = T::resource_name(),
                items = page.len(),
                total = ?page.total,
                "listings fetched"
            );
            Ok(page)
        })
        .await
    }

    /// Fetch a single listing by id
    pub async fn get<T: Listing>(&self, id: &str, scope: Option<&ScopeHandle>) -> Result<T> {
        run_scoped(scope, async {
            let url = self.endpoint(&[T::resource_name(), id])?;
            let request = self.request(Method::GET, url, Auth::Optional)?;
            self.execute::<T>(request)
                .await?
                .into_data(T::resource_name())
        })
        .await
    }
}

impl std::fmt::Debug for MarketClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MarketClient")
            .field("base", &self.base.as_str())
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

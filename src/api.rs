//! API client.
//!
//! Every endpoint goes through [`ApiClient::call`]: validate the payload,
//! build the query string, pick the scope-specific path, attach the bearer
//! token, send once, decode. Per-resource wrappers live in the submodules.

use crate::error::{ApiError, ApiResult};
use crate::request::{HttpClient, HttpRequest, HttpResponse};
use crate::session::SessionController;
use dinawin_shared::ApiRequest;
use serde::de::DeserializeOwned;

mod account;
mod admissions;
mod product_requests;
mod receptions;
mod reports;

#[cfg(test)]
mod tests;

pub const DEFAULT_BASE_URL: &str = "/proxy";

const HEADER_AUTHORIZATION: &str = "Authorization";
const HEADER_ACCEPT: &str = "Accept";
const HEADER_CONTENT_TYPE: &str = "Content-Type";

// =========================================================
// Configuration
// =========================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Proxy prefix in front of every resource path, without trailing slash.
    pub base_url: String,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Uses `value` when it is set and non-blank, the default otherwise.
    pub fn from_option(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(url) if !url.is_empty() => Self::new(url),
            _ => Self::default(),
        }
    }

    pub fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

// =========================================================
// Client
// =========================================================

#[derive(Debug, Clone)]
pub struct ApiClient<C> {
    config: ClientConfig,
    transport: C,
    session: SessionController,
}

impl<C: HttpClient> ApiClient<C> {
    pub fn new(config: ClientConfig, transport: C, session: SessionController) -> Self {
        Self {
            config,
            transport,
            session,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn session(&self) -> &SessionController {
        &self.session
    }

    #[cfg(test)]
    pub(crate) fn transport(&self) -> &C {
        &self.transport
    }

    /// Turns an endpoint request into a transport request without sending it.
    pub fn build<R: ApiRequest>(&self, request: &R) -> ApiResult<HttpRequest> {
        self.build_with_token(request, self.session.token().as_deref())
    }

    fn build_with_token<R: ApiRequest>(
        &self,
        request: &R,
        token: Option<&str>,
    ) -> ApiResult<HttpRequest> {
        request.validate()?;

        let path = request.path(self.session.scope());
        let url = request.query()?.append_to(&self.config.url(path));

        let body = request.body().map_err(ApiError::Encode)?;
        body.check()?;

        let mut http = HttpRequest::new(&url, R::METHOD).with_header(HEADER_ACCEPT, "application/json");
        if let Some(content_type) = body.content_type() {
            http = http.with_header(HEADER_CONTENT_TYPE, content_type);
        }
        if let Some(encoded) = body.encode().map_err(ApiError::Encode)? {
            http = http.with_body(encoded);
        }
        if let Some(token) = token {
            http = http.with_header(HEADER_AUTHORIZATION, &format!("Bearer {}", token));
        }
        Ok(http)
    }

    /// Sends one request and decodes its payload.
    pub async fn call<R: ApiRequest>(&self, request: &R) -> ApiResult<R::Response> {
        // Only the session that owned this token may be expired by its 401.
        let sent_token = self.session.token();
        let http = self.build_with_token(request, sent_token.as_deref())?;
        let method = http.method;
        let url = http.url.clone();
        log::debug!("api: {} {}", method, url);

        let response = self.transport.send(http).await.map_err(|e| {
            log::warn!("api: {} {} failed: {}", method, url, e);
            ApiError::from(e)
        })?;

        self.check_status::<R>(response, &url, sent_token.as_deref())
            .and_then(|body| decode(&body))
    }

    fn check_status<R: ApiRequest>(
        &self,
        response: HttpResponse,
        url: &str,
        sent_token: Option<&str>,
    ) -> ApiResult<String> {
        if response.is_success() {
            return Ok(response.body);
        }
        log::warn!("api: {} {} -> {}", R::METHOD, url, response.status);
        if response.status == 401 {
            if R::REQUIRES_AUTH {
                if let Some(token) = sent_token {
                    self.session.expire_if_token(token);
                }
            }
            return Err(ApiError::Unauthorized {
                body: response.body,
            });
        }
        Err(ApiError::Status {
            status: response.status,
            body: response.body,
        })
    }
}

/// Decodes a response payload. An empty body is read as JSON `null`, which
/// `()` and `Option<T>` accept.
pub fn decode<T: DeserializeOwned>(body: &str) -> ApiResult<T> {
    let text = if body.trim().is_empty() { "null" } else { body };
    serde_json::from_str(text).map_err(|source| ApiError::Decode {
        source,
        body: body.to_string(),
    })
}

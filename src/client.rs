use reqwest::{Method, RequestBuilder, Response, Url};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::{error::SessionError, store::SharedStore};

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// HTTP client for the backing API that attaches the stored bearer credential
/// to every outgoing request.
///
/// All requests funnel through [`ApiClient::dispatch`], which reads the
/// credential store immediately before transmission (never earlier, never
/// from a cache), so a login or logout completed before a request is built
/// is always reflected in its headers. The pipeline performs no retry, token
/// refresh, or redirect-on-401; response errors are mapped and handed back to
/// the caller as-is.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base: Url,
    store: SharedStore,
}

impl ApiClient {
    pub fn new(mut base: Url, store: SharedStore) -> Self {
        // Url::join replaces the last path segment unless the base ends in a
        // slash, which would silently drop the `/api` prefix.
        if !base.path().ends_with('/') {
            base.set_path(&format!("{}/", base.path()));
        }

        Self {
            http: reqwest::Client::new(),
            base,
            store,
        }
    }

    pub(crate) fn store(&self) -> &SharedStore {
        &self.store
    }

    fn builder(&self, method: Method, path: &str) -> RequestBuilder {
        let url = self
            .base
            .join(path.trim_start_matches('/'))
            .expect("relative API path");
        self.http.request(method, url)
    }

    // The single point through which every request leaves the process. The
    // store read happens here, right before the send.
    async fn dispatch(&self, builder: RequestBuilder) -> Result<Response, SessionError> {
        let builder = match self.store.get() {
            Some(credential) => builder.bearer_auth(credential.0),
            None => builder,
        };

        let response = builder.send().await?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response
            .json::<ErrorBody>()
            .await
            .ok()
            .map(|body| body.message);

        Err(SessionError::Rejected { status, message })
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, SessionError> {
        let response = self.dispatch(self.builder(Method::GET, path)).await?;
        Ok(response.json().await?)
    }

    pub async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, SessionError> {
        let response = self
            .dispatch(self.builder(Method::POST, path).json(body))
            .await?;
        Ok(response.json().await?)
    }

    /// POST where the caller only cares about success, not the response body.
    pub async fn post(&self, path: &str, body: &impl Serialize) -> Result<(), SessionError> {
        self.dispatch(self.builder(Method::POST, path).json(body))
            .await?;
        Ok(())
    }

    pub async fn put_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, SessionError> {
        let response = self
            .dispatch(self.builder(Method::PUT, path).json(body))
            .await?;
        Ok(response.json().await?)
    }

    pub async fn delete(&self, path: &str) -> Result<(), SessionError> {
        self.dispatch(self.builder(Method::DELETE, path)).await?;
        Ok(())
    }
}

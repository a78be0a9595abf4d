//! Thin HTTP client for the Wisecamp REST API.
//!
//! `ApiClient` attaches `Authorization: Bearer <token>` to every request while a
//! token is set, parses every response into the schemas in `crate::models`, and
//! reacts to any 401 by tearing the session down: durable storage and the token
//! are cleared and the registered `UnauthorizedHandler` runs (the app root uses
//! it to reset the session store and navigate to the login view).

mod endpoints;

use std::sync::{Arc, PoisonError, RwLock};

use log::{debug, error, warn};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::Config;
use crate::error::AppError;
use crate::models::ApiErrorBody;
use crate::storage::SessionStorage;

/// Global reaction to an HTTP 401 from any endpoint.
pub trait UnauthorizedHandler: Send + Sync {
    fn on_unauthorized(&self);
}

pub struct ApiClient {
    http: reqwest::Client,
    config: Config,
    token: RwLock<Option<String>>,
    storage: Arc<dyn SessionStorage>,
    unauthorized: RwLock<Option<Arc<dyn UnauthorizedHandler>>>,
}

impl ApiClient {
    pub fn new(config: &Config, storage: Arc<dyn SessionStorage>) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            config: config.clone(),
            token: RwLock::new(None),
            storage,
            unauthorized: RwLock::new(None),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.config.api_base_url
    }

    pub fn set_unauthorized_handler(&self, handler: Arc<dyn UnauthorizedHandler>) {
        *self
            .unauthorized
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(handler);
    }

    /// Attaches `token` to every subsequent request.
    pub fn set_auth_token(&self, token: &str) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = Some(token.to_string());
    }

    pub fn clear_auth_token(&self) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    pub fn auth_token(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn handle_unauthorized(&self) {
        warn!("API answered 401; clearing the stored session");
        self.clear_auth_token();
        if let Err(e) = self.storage.clear_session() {
            error!("Failed to clear stored session after 401: {}", e);
        }
        let handler = self
            .unauthorized
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        if let Some(handler) = handler {
            handler.on_unauthorized();
        }
    }

    async fn send<B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<reqwest::Response, AppError>
    where
        B: Serialize + ?Sized,
    {
        let url = self.config.endpoint(path);
        debug!("{} {}", method, url);

        let mut request = self.http.request(method.clone(), &url);
        if let Some(token) = self.auth_token() {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ApiErrorBody>(&text)
            .ok()
            .and_then(|body| body.text().map(str::to_string))
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("Request failed")
                    .to_string()
            });
        warn!("{} {} failed with {}: {}", method, url, status, message);

        if status == StatusCode::UNAUTHORIZED {
            self.handle_unauthorized();
        }
        Err(AppError::from_status(status.as_u16(), message))
    }

    async fn parse<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, AppError> {
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, AppError> {
        let response = self.send::<()>(Method::GET, path, None).await?;
        Self::parse(response).await
    }

    pub(crate) async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, AppError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.send(Method::POST, path, Some(body)).await?;
        Self::parse(response).await
    }

    pub(crate) async fn put<B, T>(&self, path: &str, body: &B) -> Result<T, AppError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.send(Method::PUT, path, Some(body)).await?;
        Self::parse(response).await
    }

    /// Sends a request whose response body, if any, is ignored.
    pub(crate) async fn execute<B>(&self, method: Method, path: &str, body: Option<&B>) -> Result<(), AppError>
    where
        B: Serialize + ?Sized,
    {
        self.send(method, path, body).await.map(|_| ())
    }
}

//! REST access to the external cart service.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use shared::{
    domain::{Cart, Product, ProductId, UserId},
    error::ApiError,
    protocol::{AddToCartRequest, HealthResponse, UpdateCartItemRequest},
};
use url::Url;

use crate::error::ClientError;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080/api/v1";

#[async_trait]
pub trait StorefrontApi: Send + Sync {
    async fn list_products(&self) -> Result<Vec<Product>, ClientError>;
    async fn fetch_cart(&self, user_id: &UserId) -> Result<Cart, ClientError>;
    async fn add_to_cart(&self, request: &AddToCartRequest) -> Result<(), ClientError>;
    async fn update_cart_item(
        &self,
        user_id: &UserId,
        request: &UpdateCartItemRequest,
    ) -> Result<(), ClientError>;
    async fn remove_cart_item(
        &self,
        user_id: &UserId,
        product_id: &ProductId,
    ) -> Result<(), ClientError>;
    async fn clear_cart(&self, user_id: &UserId) -> Result<(), ClientError>;
    async fn health(&self) -> Result<HealthResponse, ClientError>;
}

pub struct MissingStorefrontApi;

#[async_trait]
impl StorefrontApi for MissingStorefrontApi {
    async fn list_products(&self) -> Result<Vec<Product>, ClientError> {
        Err(ClientError::Unavailable("no product service configured".into()))
    }

    async fn fetch_cart(&self, user_id: &UserId) -> Result<Cart, ClientError> {
        Err(ClientError::Unavailable(format!(
            "no cart service configured for user {user_id}"
        )))
    }

    async fn add_to_cart(&self, request: &AddToCartRequest) -> Result<(), ClientError> {
        Err(ClientError::Unavailable(format!(
            "no cart service configured for user {}",
            request.user_id
        )))
    }

    async fn update_cart_item(
        &self,
        user_id: &UserId,
        _request: &UpdateCartItemRequest,
    ) -> Result<(), ClientError> {
        Err(ClientError::Unavailable(format!(
            "no cart service configured for user {user_id}"
        )))
    }

    async fn remove_cart_item(
        &self,
        user_id: &UserId,
        _product_id: &ProductId,
    ) -> Result<(), ClientError> {
        Err(ClientError::Unavailable(format!(
            "no cart service configured for user {user_id}"
        )))
    }

    async fn clear_cart(&self, user_id: &UserId) -> Result<(), ClientError> {
        Err(ClientError::Unavailable(format!(
            "no cart service configured for user {user_id}"
        )))
    }

    async fn health(&self) -> Result<HealthResponse, ClientError> {
        Err(ClientError::Unavailable("no service configured".into()))
    }
}

pub struct HttpStorefrontApi {
    http: Client,
    base_url: Url,
}

impl HttpStorefrontApi {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ClientError::Build)?;
        Self::with_client(http, base_url)
    }

    fn with_client(http: Client, base_url: &str) -> Result<Self, ClientError> {
        Ok(Self {
            http,
            base_url: parse_base_url(base_url)?,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// `/health` lives at the service root, outside the versioned prefix.
    fn health_endpoint(&self) -> Url {
        let mut url = self.base_url.clone();
        url.set_path("/health");
        url.set_query(None);
        url
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ClientError> {
        let response = self
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(|source| transport(&url, source))?;
        let response = check_status(&url, response).await?;
        response.json().await.map_err(|source| ClientError::Decode {
            endpoint: url.to_string(),
            source,
        })
    }
}

#[async_trait]
impl StorefrontApi for HttpStorefrontApi {
    async fn list_products(&self) -> Result<Vec<Product>, ClientError> {
        self.get_json(self.endpoint(&["products"])).await
    }

    async fn fetch_cart(&self, user_id: &UserId) -> Result<Cart, ClientError> {
        self.get_json(self.endpoint(&["cart", user_id.as_str()])).await
    }

    async fn add_to_cart(&self, request: &AddToCartRequest) -> Result<(), ClientError> {
        let url = self.endpoint(&["cart"]);
        let response = self
            .http
            .post(url.clone())
            .json(request)
            .send()
            .await
            .map_err(|source| transport(&url, source))?;
        check_status(&url, response).await?;
        Ok(())
    }

    async fn update_cart_item(
        &self,
        user_id: &UserId,
        request: &UpdateCartItemRequest,
    ) -> Result<(), ClientError> {
        let url = self.endpoint(&["cart", user_id.as_str()]);
        let response = self
            .http
            .put(url.clone())
            .json(request)
            .send()
            .await
            .map_err(|source| transport(&url, source))?;
        check_status(&url, response).await?;
        Ok(())
    }

    async fn remove_cart_item(
        &self,
        user_id: &UserId,
        product_id: &ProductId,
    ) -> Result<(), ClientError> {
        let url = self.endpoint(&["cart", user_id.as_str(), product_id.as_str()]);
        let response = self
            .http
            .delete(url.clone())
            .send()
            .await
            .map_err(|source| transport(&url, source))?;
        check_status(&url, response).await?;
        Ok(())
    }

    async fn clear_cart(&self, user_id: &UserId) -> Result<(), ClientError> {
        let url = self.endpoint(&["cart", user_id.as_str()]);
        let response = self
            .http
            .delete(url.clone())
            .send()
            .await
            .map_err(|source| transport(&url, source))?;
        check_status(&url, response).await?;
        Ok(())
    }

    async fn health(&self) -> Result<HealthResponse, ClientError> {
        self.get_json(self.health_endpoint()).await
    }
}

pub fn parse_base_url(raw: &str) -> Result<Url, ClientError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let url = Url::parse(trimmed).map_err(|err| ClientError::InvalidUrl {
        url: raw.to_string(),
        reason: err.to_string(),
    })?;
    if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
        return Err(ClientError::InvalidUrl {
            url: raw.to_string(),
            reason: "expected an http(s) base url".into(),
        });
    }
    Ok(url)
}

fn transport(url: &Url, source: reqwest::Error) -> ClientError {
    ClientError::Transport {
        endpoint: url.to_string(),
        source,
    }
}

async fn check_status(url: &Url, response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = match ApiError::from_body(&body) {
        Some(detail) => detail.error,
        None => status
            .canonical_reason()
            .unwrap_or("unexpected status")
            .to_string(),
    };
    Err(ClientError::Status {
        endpoint: url.to_string(),
        status: status.as_u16(),
        message,
    })
}

#[cfg(test)]
#[path = "tests/api_tests.rs"]
mod tests;

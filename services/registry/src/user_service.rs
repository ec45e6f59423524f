//! HTTP client for the registry API
//!
//! One method per backend operation. Each call is a single request: no
//! retries, no caching, reqwest's default timeouts.

use common::config::ApiConfig;
use common::models::{AddressId, AddressPayload, User, UserId, UserRegistration, UserUpdate};
use reqwest::{
    Client, RequestBuilder,
    header::{CONTENT_TYPE, HeaderMap, HeaderValue},
};
use serde::de::DeserializeOwned;
use tracing::{debug, error};

use crate::error::{ServiceError, ServiceResult};

/// Registry API client
#[derive(Clone, Debug)]
pub struct UserService {
    client: Client,
    base_url: String,
}

impl UserService {
    /// Create a client for the configured API root
    pub fn new(config: &ApiConfig) -> ServiceResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder().default_headers(headers).build()?;
        Ok(Self::with_client(client, &config.base_url))
    }

    /// Wrap an already configured reqwest client
    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Get all users
    pub async fn get_all_users(&self) -> ServiceResult<Vec<User>> {
        let request = self.client.get(self.url("/users"));
        self.fetch(request)
            .await
            .inspect_err(|e| error!("Error fetching users: {}", e))
    }

    /// Get a user by ID, with addresses
    pub async fn get_user_by_id(&self, id: UserId) -> ServiceResult<User> {
        let request = self.client.get(self.url(&format!("/users/{id}")));
        self.fetch(request)
            .await
            .inspect_err(|e| error!("Error fetching user {}: {}", id, e))
    }

    /// Register a new user
    pub async fn create_user(&self, registration: &UserRegistration) -> ServiceResult<User> {
        let request = self.client.post(self.url("/register-user")).json(registration);
        self.fetch(request)
            .await
            .inspect_err(|e| error!("Error creating user: {}", e))
    }

    /// Replace a user's fields
    pub async fn update_user(&self, id: UserId, update: &UserUpdate) -> ServiceResult<User> {
        let request = self.client.put(self.url(&format!("/users/{id}"))).json(update);
        self.fetch(request)
            .await
            .inspect_err(|e| error!("Error updating user {}: {}", id, e))
    }

    /// Delete a user and its addresses. Any response body is ignored.
    pub async fn delete_user(&self, id: UserId) -> ServiceResult<()> {
        let request = self.client.delete(self.url(&format!("/users/{id}")));
        self.execute(request)
            .await
            .map(|_| ())
            .inspect_err(|e| error!("Error deleting user {}: {}", id, e))
    }

    /// Add an address to a user
    ///
    /// Returns the updated user when the registry sends it back, `None` for
    /// an empty 2xx body.
    pub async fn add_address(
        &self,
        user_id: UserId,
        address: &AddressPayload,
    ) -> ServiceResult<Option<User>> {
        let request = self
            .client
            .post(self.url(&format!("/users/{user_id}/addresses")))
            .json(address);
        self.fetch_optional(request)
            .await
            .inspect_err(|e| error!("Error adding address to user {}: {}", user_id, e))
    }

    /// Update one of a user's addresses, returning the user if sent back
    pub async fn update_address(
        &self,
        user_id: UserId,
        address_id: AddressId,
        address: &AddressPayload,
    ) -> ServiceResult<Option<User>> {
        let request = self
            .client
            .put(self.url(&format!("/users/{user_id}/addresses/{address_id}")))
            .json(address);
        self.fetch_optional(request)
            .await
            .inspect_err(|e| error!("Error updating address {}: {}", address_id, e))
    }

    /// Delete one of a user's addresses. Any response body is ignored.
    pub async fn delete_address(&self, user_id: UserId, address_id: AddressId) -> ServiceResult<()> {
        let request = self
            .client
            .delete(self.url(&format!("/users/{user_id}/addresses/{address_id}")));
        self.execute(request)
            .await
            .map(|_| ())
            .inspect_err(|e| error!("Error deleting address {}: {}", address_id, e))
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn fetch<T: DeserializeOwned>(&self, request: RequestBuilder) -> ServiceResult<T> {
        let body = self.execute(request).await?;
        serde_json::from_str(&body).map_err(ServiceError::Decode)
    }

    /// Like `fetch`, but an empty 2xx body decodes to `None`
    async fn fetch_optional<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> ServiceResult<Option<T>> {
        let body = self.execute(request).await?;
        if body.trim().is_empty() {
            return Ok(None);
        }
        serde_json::from_str(&body)
            .map(Some)
            .map_err(ServiceError::Decode)
    }

    /// Send the request and return the body of a 2xx response
    async fn execute(&self, request: RequestBuilder) -> ServiceResult<String> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;
        debug!("{} {}", status, response_summary(&body));

        if status.is_success() {
            Ok(body)
        } else {
            Err(ServiceError::from_response(status, &body))
        }
    }
}

fn response_summary(body: &str) -> &str {
    match body.char_indices().nth(120) {
        Some((index, _)) => &body[..index],
        None => body,
    }
}

//! Podcheck HTTP client implementation.

use reqwest::Client;
use std::time::Duration;

use podcheck_core::{ItemKind, ValidationStatus};

use crate::error::ClientError;
use crate::types::{
    ApiErrorResponse, CreateItemRequest, DeleteItemResponse, ItemResponse, KarmaHistoryResponse,
    KarmaResponse, SetStatusRequest, SubmitVoteRequest, UserVotesResponse, VoteCountsResponse,
    VoteResponse,
};

/// Podcheck API client.
///
/// User-facing calls take the user's JWT per call; moderation calls use the
/// moderator key configured on the client.
#[derive(Debug, Clone)]
pub struct PodcheckClient {
    client: Client,
    base_url: String,
    moderator_key: Option<String>,
}

impl PodcheckClient {
    /// Create a new podcheck client.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Base URL of the podcheck service (e.g., `"http://podcheck:8080"`)
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_options(base_url, ClientOptions::default())
    }

    /// Create a new podcheck client with custom options.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be built (should not happen with
    /// default settings).
    #[must_use]
    pub fn with_options(base_url: impl Into<String>, options: ClientOptions) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(options.timeout_seconds))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            moderator_key: options.moderator_key,
        }
    }

    /// Submit a fact check or comment.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn create_item(
        &self,
        user_jwt: &str,
        kind: ItemKind,
    ) -> Result<ItemResponse, ClientError> {
        let url = format!("{}/v1/items", self.base_url);
        let request = CreateItemRequest { kind };

        let response = self
            .client
            .post(&url)
            .header("authorization", format!("Bearer {user_jwt}"))
            .json(&request)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Get an item with its counters.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn get_item(
        &self,
        user_jwt: &str,
        item_id: &str,
    ) -> Result<ItemResponse, ClientError> {
        let url = format!("{}/v1/items/{item_id}", self.base_url);

        let response = self
            .client
            .get(&url)
            .header("authorization", format!("Bearer {user_jwt}"))
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Submit, change, or clear a vote on an item.
    ///
    /// A `value` of 0 clears the vote. Re-submitting the current value is a
    /// server-side no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn submit_vote(
        &self,
        user_jwt: &str,
        item_id: &str,
        value: i8,
    ) -> Result<VoteResponse, ClientError> {
        let url = format!("{}/v1/items/{item_id}/vote", self.base_url);
        let request = SubmitVoteRequest { value };

        let response = self
            .client
            .post(&url)
            .header("authorization", format!("Bearer {user_jwt}"))
            .json(&request)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Get an item's vote counts.
    ///
    /// With `recount` set, the service recomputes the counters from the vote
    /// records instead of reading the denormalized aggregate.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn get_vote_counts(
        &self,
        user_jwt: &str,
        item_id: &str,
        recount: bool,
    ) -> Result<VoteCountsResponse, ClientError> {
        let url = format!(
            "{}/v1/items/{item_id}/votes?recount={recount}",
            self.base_url
        );

        let response = self
            .client
            .get(&url)
            .header("authorization", format!("Bearer {user_jwt}"))
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Get the caller's votes across a batch of items.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn get_user_votes(
        &self,
        user_jwt: &str,
        item_ids: &[&str],
    ) -> Result<UserVotesResponse, ClientError> {
        let url = format!("{}/v1/votes?items={}", self.base_url, item_ids.join(","));

        let response = self
            .client
            .get(&url)
            .header("authorization", format!("Bearer {user_jwt}"))
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Get the caller's karma total.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn get_karma(&self, user_jwt: &str) -> Result<KarmaResponse, ClientError> {
        let url = format!("{}/v1/karma/me", self.base_url);

        let response = self
            .client
            .get(&url)
            .header("authorization", format!("Bearer {user_jwt}"))
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Get the caller's karma history, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server returns an error.
    pub async fn get_karma_history(
        &self,
        user_jwt: &str,
    ) -> Result<KarmaHistoryResponse, ClientError> {
        let url = format!("{}/v1/karma/me/history", self.base_url);

        let response = self
            .client
            .get(&url)
            .header("authorization", format!("Bearer {user_jwt}"))
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Set a fact check's validation status (moderation).
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Configuration` if no moderator key is
    /// configured, or an error if the request fails.
    pub async fn set_validation_status(
        &self,
        item_id: &str,
        status: ValidationStatus,
    ) -> Result<ItemResponse, ClientError> {
        let url = format!("{}/v1/items/{item_id}/status", self.base_url);
        let request = SetStatusRequest { status };

        let response = self
            .client
            .post(&url)
            .header("x-moderator-key", self.moderator_key()?)
            .json(&request)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Delete an item and its votes (moderation).
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Configuration` if no moderator key is
    /// configured, or an error if the request fails.
    pub async fn delete_item(&self, item_id: &str) -> Result<DeleteItemResponse, ClientError> {
        let url = format!("{}/v1/items/{item_id}", self.base_url);

        let response = self
            .client
            .delete(&url)
            .header("x-moderator-key", self.moderator_key()?)
            .send()
            .await?;

        self.handle_response(response).await
    }

    fn moderator_key(&self) -> Result<&str, ClientError> {
        self.moderator_key
            .as_deref()
            .ok_or_else(|| ClientError::Configuration("moderator key not configured".into()))
    }

    /// Handle API response and convert errors.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = response.status();

        if status.is_success() {
            return Ok(response.json().await?);
        }

        // Try to parse error response
        let error_body: Result<ApiErrorResponse, _> = response.json().await;

        match error_body {
            Ok(api_error) => {
                let code = api_error.error.code.as_str();
                let message = api_error.error.message;

                // Map specific error codes to typed errors
                match code {
                    "not_found" if message.contains("item") => {
                        Err(ClientError::ItemNotFound { message })
                    }
                    "conflict" => Err(ClientError::Conflict { message }),
                    _ => Err(ClientError::Api {
                        code: code.to_string(),
                        message,
                        status: status.as_u16(),
                    }),
                }
            }
            Err(_) => Err(ClientError::Api {
                code: "unknown".to_string(),
                message: format!("HTTP {status}"),
                status: status.as_u16(),
            }),
        }
    }
}

/// Client options for customization.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Request timeout in seconds (default: 30).
    pub timeout_seconds: u64,
    /// Moderator API key for moderation calls.
    pub moderator_key: Option<String>,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
            moderator_key: None,
        }
    }
}

impl ClientOptions {
    /// Create options with a moderator key.
    #[must_use]
    pub fn with_moderator_key(key: impl Into<String>) -> Self {
        Self {
            moderator_key: Some(key.into()),
            ..Self::default()
        }
    }
}

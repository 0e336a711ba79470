//! User API endpoints
//!
//! Typed calls for the endpoints the pages use:
//! - `POST /login/auth`
//! - `POST /users`
//! - `GET /users`
//! - `GET /users/{id}`
//! - `PUT /users/{id}`

use super::client::{ApiClient, ApiResponse, RequestOptions};
use super::dto::{AuthResponse, LoginRequest, RegisterRequest, UpdateUserRequest, User, ValidateResponse};
use super::error::ApiResult;

impl ApiClient {
    /// Authenticate with username and password
    pub async fn login(&self, request: &LoginRequest) -> ApiResult<AuthResponse> {
        self.post("/login/auth", request, &RequestOptions::new()).await
    }

    /// Create an account
    pub async fn register(&self, request: &RegisterRequest) -> ApiResult<AuthResponse> {
        self.post("/users", request, &RequestOptions::new()).await
    }

    /// List all users
    pub async fn list_users(&self, token: &str) -> ApiResult<Vec<User>> {
        let users: Option<Vec<User>> = self.get("/users", &RequestOptions::bearer(token)).await?;
        Ok(users.unwrap_or_default())
    }

    /// Fetch one user. A `null` body yields `None`.
    pub async fn fetch_user(&self, id: i64, token: &str) -> ApiResult<Option<User>> {
        self.get(&format!("/users/{}", id), &RequestOptions::bearer(token))
            .await
    }

    /// Update username and/or birthday
    pub async fn update_user(
        &self,
        id: i64,
        request: &UpdateUserRequest,
        token: &str,
    ) -> ApiResult<ApiResponse> {
        self.put(&format!("/users/{}", id), request, &RequestOptions::bearer(token))
            .await
    }

    /// Ask a dedicated endpoint which user a token belongs to
    pub async fn validate_token(&self, path: &str, token: &str) -> ApiResult<ValidateResponse> {
        self.get(path, &RequestOptions::bearer(token)).await
    }

    /// Tell the server the session ends
    pub async fn logout(&self, path: &str, token: &str) -> ApiResult<()> {
        self.send(
            reqwest::Method::POST,
            path,
            None::<&()>,
            &RequestOptions::bearer(token),
        )
        .await?
        .error_for_status()?;
        Ok(())
    }
}

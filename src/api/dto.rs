//! Data Transfer Objects
//!
//! Request and response types for the user API endpoints.
//! These types are serialized/deserialized to/from JSON.

use serde::{Deserialize, Serialize};

// ============================================
// USER
// ============================================

/// A user record as returned by `GET /users/{id}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub username: String,
    /// Free-text status, e.g. "ONLINE"
    #[serde(default)]
    pub status: String,
    /// Creation timestamp as sent by the server
    #[serde(default)]
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birthday: Option<String>,
    /// Session token embedded in the record
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

// ============================================
// AUTH DTOs
// ============================================

/// `POST /login/auth` body
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// `POST /users` body
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub username: String,
    pub name: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birthday: Option<String>,
}

/// Login and registration response.
///
/// Both fields are optional so a response lacking them can be detected
/// instead of failing to decode.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthResponse {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub token: Option<String>,
}

/// Response of the dedicated session validation endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct ValidateResponse {
    pub id: i64,
}

// ============================================
// UPDATE DTOs
// ============================================

/// `PUT /users/{id}` body.
///
/// `birthday` is always sent: a date as `YYYY-MM-DD`, or `null` to clear it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpdateUserRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    pub birthday: Option<String>,
}

/// JSON body a `PUT /users/{id}` may answer with instead of 204
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

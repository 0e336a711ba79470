//! User REST API
//!
//! Client side of the remote user service.
//!
//! # Endpoints
//!
//! - `POST /login/auth` - Authenticate, returns `{id, token}`
//! - `POST /users` - Register, returns `{id, token}`
//! - `GET /users` - List users
//! - `GET /users/{id}` - Fetch a user record (includes its token)
//! - `PUT /users/{id}` - Update username/birthday, `204` or JSON `{status, message}`
//!
//! Every call sends `Content-Type: application/json`; authenticated calls
//! send the raw token as `Authorization`.

pub mod client;
pub mod dto;
pub mod error;
mod users;

pub use client::{ApiClient, ApiResponse, ClientConfig, RequestOptions};
pub use dto::{
    AuthResponse, LoginRequest, RegisterRequest, UpdateResponse, UpdateUserRequest, User,
    ValidateResponse,
};
pub use error::{ApiError, ApiResult};

//! # Userdesk
//!
//! Client for a remote user service: login, registration, user list,
//! profile view and profile edit, with the session kept in a local
//! key-value store.
//!
//! ## Modules
//!
//! - [`domain`]: API base URL per environment
//! - [`api`]: HTTP client wrapper and typed endpoints
//! - [`session`]: local store, typed session accessor, session validation
//! - [`pages`]: page controllers and navigation
//! - [`render`]: terminal rendering
//! - [`config`]: TOML + environment configuration
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use userdesk::pages::{self, login::LoginForm, Route};
//! use userdesk::{ApiClient, ClientConfig, PageContext, SessionContext};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let api = ApiClient::new(ClientConfig::default())?;
//!     let ctx = PageContext::new(api, SessionContext::in_memory());
//!
//!     let outcome = pages::login::submit(&ctx, &LoginForm::new("alice", "pw")).await;
//!     if outcome.destination() == Some(Route::Users) {
//!         let visit = pages::visit(&ctx, Route::Users).await?;
//!         println!("{}", userdesk::render::render_visit(&visit));
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod domain;
pub mod pages;
pub mod render;
pub mod session;

use std::sync::Arc;

pub use api::{ApiClient, ApiError, ApiResult, ClientConfig, RequestOptions, User};
pub use config::{Config, ConfigError};
pub use domain::Environment;
pub use pages::{Outcome, PageContext, PageError, Route};
pub use session::{
    EmbeddedTokenValidator, EndpointValidator, LocalStore, Session, SessionContext,
    SessionValidator,
};

/// Wire a page context from configuration: API client, file-backed
/// session and the configured session validator.
pub fn context_from_config(config: &Config) -> ApiResult<PageContext> {
    let api = ApiClient::new(ClientConfig {
        base_url: config.api.base_url(),
        request_timeout_ms: config.api.timeout_secs.saturating_mul(1000),
    })?;
    let session = SessionContext::new(LocalStore::file(config.session.resolved_path()));

    let mut ctx = PageContext::new(api, session);
    if let Some(path) = config.api.validate_path.as_deref() {
        ctx = ctx.with_validator(Arc::new(EndpointValidator::new(path)));
    }
    if let Some(path) = config.api.logout_path.as_deref() {
        ctx = ctx.with_logout_path(path);
    }

    tracing::debug!(base_url = %ctx.api.base_url(), validator = ctx.validator.name(), "Page context ready");
    Ok(ctx)
}

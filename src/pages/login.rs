//! Login page
//!
//! Username and password against `POST /login/auth`; the returned token and
//! id become the session.

use super::forms::required;
use super::{Mount, Outcome, PageContext, PageError, Route};
use crate::api::LoginRequest;

/// Login form fields
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

impl LoginForm {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn validate(&self) -> Result<LoginRequest, super::ValidationError> {
        Ok(LoginRequest {
            username: required("username", &self.username)?,
            password: required("password", &self.password)?,
        })
    }
}

/// An established session goes straight to its profile, no network involved
pub fn mount(ctx: &PageContext) -> Mount<()> {
    match ctx.session.get_session().and_then(|s| s.user_id) {
        Some(id) => Mount::Redirect(Route::User(id)),
        None => Mount::Ready(()),
    }
}

/// Authenticate and persist the session. Returns the next route.
pub async fn authenticate(ctx: &PageContext, form: &LoginForm) -> Result<Route, PageError> {
    let request = form.validate()?;
    let response = ctx.api.login(&request).await?;

    if let Some(token) = response.token.as_deref().filter(|t| !t.trim().is_empty()) {
        ctx.session.set_token(token)?;
    }
    if let Some(id) = response.id {
        ctx.session.set_user_id(id)?;
    }

    tracing::info!(username = %request.username, user_id = ?response.id, "Logged in");
    Ok(Route::Users)
}

/// Submit handler: failures keep the user on the page with a notice
pub async fn submit(ctx: &PageContext, form: &LoginForm) -> Outcome {
    match authenticate(ctx, form).await {
        Ok(route) => Outcome::navigate(route),
        Err(PageError::Validation(e)) => Outcome::stay(e.to_string()),
        Err(e) => {
            tracing::error!(error = %e, "Login failed");
            Outcome::stay(format!("Something went wrong during the login:\n{}", e))
        }
    }
}

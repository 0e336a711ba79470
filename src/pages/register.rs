//! Registration page
//!
//! Creates the account with `POST /users` and logs straight in: the response
//! must carry a token and an id, otherwise nothing is persisted.

use super::forms::{format_birthday, required};
use super::{Outcome, PageContext, PageError, Route, ValidationError};
use crate::api::RegisterRequest;
use crate::session::normalize_token;

/// Registration form fields
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisterForm {
    pub username: String,
    pub name: String,
    pub password: String,
    /// Optional, `YYYY-MM-DD`
    pub birthday: Option<String>,
}

impl RegisterForm {
    pub fn validate(&self) -> Result<RegisterRequest, ValidationError> {
        Ok(RegisterRequest {
            username: required("username", &self.username)?,
            name: required("name", &self.name)?,
            password: required("password", &self.password)?,
            birthday: format_birthday(self.birthday.as_deref())?,
        })
    }
}

/// Create the account and establish its session. Returns the new profile route.
pub async fn register(ctx: &PageContext, form: &RegisterForm) -> Result<Route, PageError> {
    let request = form.validate()?;
    let response = ctx.api.register(&request).await?;

    let token = response
        .token
        .as_deref()
        .map(normalize_token)
        .filter(|t| !t.is_empty())
        .ok_or(PageError::MissingToken)?;
    let id = response.id.ok_or(PageError::MissingUserId)?;

    ctx.session.set_session(&token, id)?;

    tracing::info!(username = %request.username, user_id = id, "Registered");
    Ok(Route::User(id))
}

/// Submit handler: failures keep the user on the page with a notice
pub async fn submit(ctx: &PageContext, form: &RegisterForm) -> Outcome {
    match register(ctx, form).await {
        Ok(route) => Outcome::navigate(route),
        Err(PageError::Validation(e)) => Outcome::stay(e.to_string()),
        Err(e) => {
            tracing::error!(error = %e, "Registration failed");
            Outcome::stay(format!(
                "Something went wrong during the registration:\n{}",
                e
            ))
        }
    }
}

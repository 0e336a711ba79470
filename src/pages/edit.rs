//! Profile edit page
//!
//! Only the owner of a profile gets the form. Saving sends `PUT /users/{id}`
//! with the username and a `YYYY-MM-DD` (or `null`) birthday.
//!
//! The server has answered a successful update in more than one way. A
//! 2xx answer counts as saved when it is:
//! - `204 No Content`
//! - JSON `{"status": "success"}`
//!
//! Any other 2xx is a rejection: a JSON `message` is shown as is, other JSON
//! reads "Could not update profile" and a non-JSON body reads "Unexpected
//! response from server".

use super::forms::{display_birthday, format_birthday, optional};
use super::{Mount, Outcome, PageContext, PageError, Route};
use crate::api::{ApiError, ApiResponse, UpdateResponse, UpdateUserRequest, User};
use crate::session::Validation;
use reqwest::StatusCode;

/// Notice shown after a successful save
pub const UPDATED_NOTICE: &str = "Profile updated successfully!";

/// Notice for a JSON answer without a usable message
pub const UPDATE_FAILED_NOTICE: &str = "Could not update profile";

/// Notice for an answer that is not JSON at all
pub const UNEXPECTED_RESPONSE_NOTICE: &str = "Unexpected response from server";

/// Edit form fields
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditForm {
    pub username: Option<String>,
    /// Date string; blank clears the birthday
    pub birthday: Option<String>,
}

impl EditForm {
    /// Form pre-filled from the current record
    pub fn from_user(user: &User) -> Self {
        Self {
            username: Some(user.username.clone()),
            birthday: user.birthday.as_deref().map(display_birthday),
        }
    }

    pub fn to_request(&self) -> Result<UpdateUserRequest, super::ValidationError> {
        Ok(UpdateUserRequest {
            username: optional(self.username.as_deref()),
            birthday: format_birthday(self.birthday.as_deref())?,
        })
    }
}

/// The edit page once mounted
#[derive(Debug, Clone, PartialEq)]
pub enum EditView {
    NotFound,
    Ready { user: User, form: EditForm },
}

/// How the server answered an update
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    Updated,
    Rejected(String),
}

/// Gate on the session; a record whose token does not validate sends the
/// user back to login
pub async fn mount(ctx: &PageContext, id: i64) -> Mount<EditView> {
    let token = match ctx.require_token() {
        Ok(token) => token,
        Err(route) => return Mount::Redirect(route),
    };

    let user = match ctx.api.fetch_user(id, &token).await {
        Ok(Some(user)) => user,
        Ok(None) => return Mount::Ready(EditView::NotFound),
        Err(e) => {
            tracing::warn!(user_id = id, error = %e, "Error fetching user data");
            return Mount::Ready(EditView::NotFound);
        }
    };

    match ensure_owner(ctx, &token, &user).await {
        Ok(_) => {
            let form = EditForm::from_user(&user);
            Mount::Ready(EditView::Ready { user, form })
        }
        Err(e) => {
            tracing::warn!(user_id = id, error = %e, "Edit page refused");
            Mount::Redirect(Route::Login)
        }
    }
}

/// The validated owner id of `user`, or [`PageError::StaleSession`]
pub async fn ensure_owner(ctx: &PageContext, token: &str, user: &User) -> Result<i64, PageError> {
    match ctx.validator.validate(&ctx.api, token, user).await? {
        Validation::Valid(id) => Ok(id),
        Validation::Invalid => Err(PageError::StaleSession),
    }
}

/// Interpret a 2xx answer to the update
pub fn interpret_update(response: &ApiResponse) -> UpdateOutcome {
    if response.status == StatusCode::NO_CONTENT {
        return UpdateOutcome::Updated;
    }

    let Some(body) = response.json_value() else {
        return UpdateOutcome::Rejected(UNEXPECTED_RESPONSE_NOTICE.to_string());
    };
    let parsed: UpdateResponse = serde_json::from_value(body).unwrap_or_default();

    let success = parsed
        .status
        .as_deref()
        .map(|s| s.eq_ignore_ascii_case("success"))
        .unwrap_or(false);
    if success {
        return UpdateOutcome::Updated;
    }

    match parsed.message {
        Some(message) if !message.trim().is_empty() => UpdateOutcome::Rejected(message),
        _ => UpdateOutcome::Rejected(UPDATE_FAILED_NOTICE.to_string()),
    }
}

/// Best message for a failed update
fn failure_message(err: &PageError) -> String {
    match err {
        PageError::Api(ApiError::Status {
            message: Some(message),
            ..
        }) => message.clone(),
        PageError::Api(ApiError::Status {
            json_body: true, ..
        }) => UPDATE_FAILED_NOTICE.to_string(),
        PageError::Api(ApiError::Status {
            json_body: false, ..
        }) => UNEXPECTED_RESPONSE_NOTICE.to_string(),
        other => {
            let message = other.to_string();
            if message.is_empty() {
                "Unexpected error occurred while trying to update profile.".to_string()
            } else {
                message
            }
        }
    }
}

/// Send the update with the session token
pub async fn save(ctx: &PageContext, id: i64, form: &EditForm) -> Result<UpdateOutcome, PageError> {
    let token = ctx.session.token().ok_or(PageError::NotLoggedIn)?;
    let request = form.to_request()?;

    tracing::debug!(user_id = id, ?request, "Updating profile");
    let response = ctx.api.update_user(id, &request, &token).await?;

    Ok(interpret_update(&response))
}

/// Submit handler
pub async fn submit(ctx: &PageContext, id: i64, form: &EditForm) -> Outcome {
    match save(ctx, id, form).await {
        Ok(UpdateOutcome::Updated) => {
            tracing::info!(user_id = id, "Profile updated");
            Outcome::Navigate {
                to: Route::User(id),
                notice: Some(UPDATED_NOTICE.to_string()),
            }
        }
        Ok(UpdateOutcome::Rejected(message)) => {
            tracing::error!(user_id = id, %message, "Profile update rejected");
            Outcome::stay(message)
        }
        Err(PageError::NotLoggedIn) => Outcome::navigate(Route::Login),
        Err(e) => {
            tracing::error!(user_id = id, error = %e, "Profile update failed");
            Outcome::stay(failure_message(&e))
        }
    }
}

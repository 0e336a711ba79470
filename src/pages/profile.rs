//! Profile page
//!
//! Shows one user. Edit and logout are offered only when the local session
//! validates against the fetched record.

use super::{Action, Mount, PageContext, Route};
use crate::api::User;

/// Render state of the profile page
#[derive(Debug, Clone, PartialEq)]
pub enum ProfileState {
    /// Fetch still in flight
    Loading,
    /// Fetch failed or returned nothing
    NotFound,
    Loaded {
        user: User,
        /// Local session owns this profile
        is_edit: bool,
    },
}

/// The profile page for one user id
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileView {
    pub id: i64,
    pub state: ProfileState,
}

impl ProfileView {
    /// View before the fetch resolves
    pub fn loading(id: i64) -> Self {
        Self {
            id,
            state: ProfileState::Loading,
        }
    }

    pub fn user(&self) -> Option<&User> {
        match &self.state {
            ProfileState::Loaded { user, .. } => Some(user),
            _ => None,
        }
    }

    pub fn is_edit(&self) -> bool {
        matches!(self.state, ProfileState::Loaded { is_edit: true, .. })
    }

    /// Actions offered in the current state
    pub fn actions(&self) -> Vec<Action> {
        let mut actions = Vec::new();
        if let ProfileState::Loaded { is_edit, .. } = self.state {
            actions.push(Action::Navigate {
                label: "Back",
                to: Route::Users,
            });
            if is_edit {
                actions.push(Action::Navigate {
                    label: "Edit",
                    to: Route::EditUser(self.id),
                });
                actions.push(Action::Logout);
            }
        }
        actions
    }
}

/// Gate on the session, fetch the user and decide whether it can be edited
pub async fn load(ctx: &PageContext, id: i64) -> Mount<ProfileView> {
    let token = match ctx.require_token() {
        Ok(token) => token,
        Err(route) => return Mount::Redirect(route),
    };

    let user = match ctx.api.fetch_user(id, &token).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            tracing::warn!(user_id = id, "User not found");
            return Mount::Ready(ProfileView {
                id,
                state: ProfileState::NotFound,
            });
        }
        Err(e) => {
            tracing::warn!(user_id = id, error = %e, "Error fetching user data");
            return Mount::Ready(ProfileView {
                id,
                state: ProfileState::NotFound,
            });
        }
    };

    let is_edit = match ctx.validator.validate(&ctx.api, &token, &user).await {
        Ok(validation) => validation.is_valid(),
        Err(e) => {
            tracing::warn!(user_id = id, validator = ctx.validator.name(), error = %e, "Session validation failed");
            false
        }
    };

    Mount::Ready(ProfileView {
        id,
        state: ProfileState::Loaded { user, is_edit },
    })
}

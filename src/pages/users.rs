//! User list page

use super::{Mount, PageContext, PageError};
use crate::api::User;

/// Users shown on `/users`
#[derive(Debug, Clone, PartialEq)]
pub struct UsersView {
    pub users: Vec<User>,
}

/// Gate on the session, then fetch all users
pub async fn mount(ctx: &PageContext) -> Result<Mount<UsersView>, PageError> {
    let token = match ctx.require_token() {
        Ok(token) => token,
        Err(route) => return Ok(Mount::Redirect(route)),
    };

    let users = ctx.api.list_users(&token).await?;
    tracing::debug!(count = users.len(), "Fetched users");

    Ok(Mount::Ready(UsersView { users }))
}

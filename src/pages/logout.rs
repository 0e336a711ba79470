//! Logout action

use super::{Outcome, PageContext, Route};

/// Clear the session and go to login. When a logout endpoint is configured
/// the server is told first; its failure does not block the logout.
pub async fn logout(ctx: &PageContext) -> Outcome {
    if let (Some(path), Some(token)) = (ctx.logout_path.as_deref(), ctx.session.token()) {
        if let Err(e) = ctx.api.logout(path, &token).await {
            tracing::warn!(error = %e, "Server logout failed, clearing local session anyway");
        }
    }

    match ctx.session.clear_session() {
        Ok(()) => Outcome::navigate(Route::Login),
        Err(e) => {
            tracing::error!(error = %e, "Failed to clear session");
            Outcome::stay(format!("Could not log out:\n{}", e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ApiClient, ClientConfig};
    use crate::session::SessionContext;

    #[tokio::test]
    async fn test_logout_clears_session() {
        let api = ApiClient::new(ClientConfig::default()).unwrap();
        let ctx = PageContext::new(api, SessionContext::in_memory());
        ctx.session.set_session("tok-1", 1).unwrap();

        let out = logout(&ctx).await;
        assert_eq!(out, Outcome::navigate(Route::Login));
        assert!(ctx.session.get_session().is_none());
        assert!(ctx.session.user_id().is_none());
    }
}

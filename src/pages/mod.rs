//! Page Controllers
//!
//! Each page mounts (possibly redirecting), takes a form on submit, talks to
//! the API through [`PageContext`] and answers with an [`Outcome`]: where to
//! go next, and an optional blocking notice for the user.
//!
//! - [`login`]: `/login`
//! - [`register`]: `/register`
//! - [`users`]: `/users`
//! - [`profile`]: `/users/{id}`
//! - [`edit`]: `/users/{id}/edit`
//! - [`logout`]: clears the session

pub mod edit;
pub mod forms;
pub mod login;
pub mod logout;
pub mod profile;
pub mod register;
pub mod users;

use std::fmt;
use std::sync::Arc;
use thiserror::Error;

use crate::api::{ApiClient, ApiError};
use crate::session::{
    EmbeddedTokenValidator, SessionContext, SessionValidator, StoreError,
};

pub use forms::ValidationError;

/// Redirects followed by [`visit`] before giving up
pub const MAX_REDIRECTS: usize = 5;

// ============================================
// ROUTES
// ============================================

/// Client-side routes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Home,
    Login,
    Register,
    Users,
    User(i64),
    EditUser(i64),
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Login => "/login".to_string(),
            Route::Register => "/register".to_string(),
            Route::Users => "/users".to_string(),
            Route::User(id) => format!("/users/{}", id),
            Route::EditUser(id) => format!("/users/{}/edit", id),
        }
    }

    /// Parse a path such as `/users/3/edit`
    pub fn parse(path: &str) -> Option<Route> {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            [] => Some(Route::Home),
            ["login"] => Some(Route::Login),
            ["register"] => Some(Route::Register),
            ["users"] => Some(Route::Users),
            ["users", id] => id.parse().ok().map(Route::User),
            ["users", id, "edit"] => id.parse().ok().map(Route::EditUser),
            _ => None,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

// ============================================
// OUTCOMES
// ============================================

/// Result of a page mount
#[derive(Debug, Clone, PartialEq)]
pub enum Mount<T> {
    /// Leave this page before doing anything else
    Redirect(Route),
    /// Page is ready to show
    Ready(T),
}

/// Result of a submit or action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Go to another page, optionally after a notice
    Navigate { to: Route, notice: Option<String> },
    /// Remain on the page and show a blocking notice
    Stay { notice: String },
}

impl Outcome {
    pub fn navigate(to: Route) -> Self {
        Outcome::Navigate { to, notice: None }
    }

    pub fn stay(notice: impl Into<String>) -> Self {
        Outcome::Stay {
            notice: notice.into(),
        }
    }

    pub fn notice(&self) -> Option<&str> {
        match self {
            Outcome::Navigate { notice, .. } => notice.as_deref(),
            Outcome::Stay { notice } => Some(notice),
        }
    }

    pub fn destination(&self) -> Option<Route> {
        match self {
            Outcome::Navigate { to, .. } => Some(*to),
            Outcome::Stay { .. } => None,
        }
    }
}

/// Something the user can do from a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Navigate { label: &'static str, to: Route },
    Logout,
}

/// Actions offered on the home page
pub fn home_actions() -> Vec<Action> {
    vec![Action::Navigate {
        label: "Go to login",
        to: Route::Login,
    }]
}

// ============================================
// ERRORS
// ============================================

/// Errors surfaced by page controllers
#[derive(Error, Debug)]
pub enum PageError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Could not store session: {0}")]
    Store(#[from] StoreError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Registration answered without a session token
    #[error("Registration response did not include a session token")]
    MissingToken,

    /// Registration answered without a user id
    #[error("Registration response did not include a user id")]
    MissingUserId,

    /// No token in the local store
    #[error("Not logged in")]
    NotLoggedIn,

    /// Local token does not belong to the record
    #[error("Session is no longer valid")]
    StaleSession,

    #[error("Too many redirects, last route {0}")]
    RedirectLoop(Route),
}

// ============================================
// CONTEXT
// ============================================

/// Everything a page needs: API client, session and validator
#[derive(Clone)]
pub struct PageContext {
    pub api: ApiClient,
    pub session: SessionContext,
    pub validator: Arc<dyn SessionValidator>,
    /// Server path notified on logout, if any
    pub logout_path: Option<String>,
}

impl PageContext {
    pub fn new(api: ApiClient, session: SessionContext) -> Self {
        Self {
            api,
            session,
            validator: Arc::new(EmbeddedTokenValidator),
            logout_path: None,
        }
    }

    /// Builder method: use another session validator
    pub fn with_validator(mut self, validator: Arc<dyn SessionValidator>) -> Self {
        self.validator = validator;
        self
    }

    /// Builder method: notify the server on logout
    pub fn with_logout_path(mut self, path: impl Into<String>) -> Self {
        self.logout_path = Some(path.into());
        self
    }

    /// Session gate: the stored token, or the login route
    pub fn require_token(&self) -> Result<String, Route> {
        match self.session.token() {
            Some(token) => Ok(token),
            None => {
                tracing::info!("No session token, redirecting to login");
                Err(Route::Login)
            }
        }
    }
}

impl fmt::Debug for PageContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageContext")
            .field("api", &self.api)
            .field("session", &self.session)
            .field("validator", &self.validator.name())
            .field("logout_path", &self.logout_path)
            .finish()
    }
}

// ============================================
// NAVIGATION
// ============================================

/// What a route shows once mounted
#[derive(Debug, Clone, PartialEq)]
pub enum Screen {
    Home(Vec<Action>),
    Login,
    Register,
    Users(users::UsersView),
    Profile(profile::ProfileView),
    Edit(edit::EditView),
}

/// A mounted route
#[derive(Debug, Clone, PartialEq)]
pub struct Visit {
    /// Route actually shown, after redirects
    pub route: Route,
    pub screen: Screen,
}

/// Mount a route, following redirects
pub async fn visit(ctx: &PageContext, route: Route) -> Result<Visit, PageError> {
    let mut current = route;

    for _ in 0..=MAX_REDIRECTS {
        let mounted = match current {
            Route::Home => Mount::Ready(Screen::Home(home_actions())),
            Route::Login => login::mount(ctx).map(|_| Screen::Login),
            Route::Register => Mount::Ready(Screen::Register),
            Route::Users => users::mount(ctx).await?.map(Screen::Users),
            Route::User(id) => profile::load(ctx, id).await.map(Screen::Profile),
            Route::EditUser(id) => edit::mount(ctx, id).await.map(Screen::Edit),
        };

        match mounted {
            Mount::Ready(screen) => {
                return Ok(Visit {
                    route: current,
                    screen,
                })
            }
            Mount::Redirect(next) => {
                tracing::info!(from = %current, to = %next, "Redirect");
                current = next;
            }
        }
    }

    Err(PageError::RedirectLoop(current))
}

impl<T> Mount<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Mount<U> {
        match self {
            Mount::Redirect(route) => Mount::Redirect(route),
            Mount::Ready(value) => Mount::Ready(f(value)),
        }
    }
}

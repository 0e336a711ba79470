mod common;

use userdesk::pages::register::{self, RegisterForm};
use userdesk::pages::{self, Outcome, PageError, Route, Screen};
use userdesk::render;

fn form(username: &str, birthday: Option<&str>) -> RegisterForm {
    RegisterForm {
        username: username.to_string(),
        name: "Carol Example".to_string(),
        password: "secret".to_string(),
        birthday: birthday.map(str::to_string),
    }
}

#[tokio::test]
async fn test_register_establishes_session() {
    let (state, base) = common::spawn_server().await;
    state.add_user(1, "alice", "pw", "tok-1");
    let ctx = common::context(&base);

    let outcome = register::submit(&ctx, &form("carol", Some("1991-11-05"))).await;
    assert_eq!(outcome, Outcome::navigate(Route::User(2)));

    let session = ctx.session.get_session().unwrap();
    assert_eq!(session.token, "tok-2");
    assert_eq!(session.user_id, Some(2));

    let visit = pages::visit(&ctx, Route::User(2)).await.unwrap();
    let text = render::render_visit(&visit);
    assert!(text.contains("Name: Carol Example"));
    assert!(text.contains("Birthday: 1991-11-05"));
    assert!(matches!(visit.screen, Screen::Profile(ref v) if v.is_edit()));
}

#[tokio::test]
async fn test_missing_token_persists_nothing() {
    let (state, base) = common::spawn_server().await;
    state.set_register_returns_token(false);
    let ctx = common::context(&base);

    let err = register::register(&ctx, &form("dave", None)).await.unwrap_err();
    assert!(matches!(err, PageError::MissingToken));
    assert!(ctx.session.token().is_none());
    assert!(ctx.session.user_id().is_none());

    let outcome = register::submit(&ctx, &form("erin", None)).await;
    let notice = outcome.notice().unwrap();
    assert!(notice.starts_with("Something went wrong during the registration:\n"));
    assert!(ctx.session.get_session().is_none());
    assert!(ctx.session.user_id().is_none());
}

#[tokio::test]
async fn test_duplicate_username_shows_server_message() {
    let (state, base) = common::spawn_server().await;
    state.add_user(1, "alice", "pw", "tok-1");
    let ctx = common::context(&base);

    let outcome = register::submit(&ctx, &form("alice", None)).await;
    assert_eq!(
        outcome,
        Outcome::stay("Something went wrong during the registration:\nUsername already exists")
    );
    assert!(ctx.session.get_session().is_none());
}

#[tokio::test]
async fn test_invalid_form_makes_no_request() {
    let (state, base) = common::spawn_server().await;
    let ctx = common::context(&base);

    let mut bad = form("frank", None);
    bad.password = String::new();
    let outcome = register::submit(&ctx, &bad).await;
    assert_eq!(outcome, Outcome::stay("Please input your password!"));
    assert_eq!(state.request_count(), 0);
}

mod common;

use userdesk::pages::login::{self, LoginForm};
use userdesk::pages::profile::ProfileState;
use userdesk::pages::{self, Action, Mount, Outcome, Route, Screen};
use userdesk::session::{TOKEN_KEY, USER_ID_KEY};

#[tokio::test]
async fn test_login_persists_session_and_shows_edit() {
    let (state, base) = common::spawn_server().await;
    state.add_user(1, "alice", "pw", "tok-1");
    let ctx = common::context(&base);

    let outcome = login::submit(&ctx, &LoginForm::new("alice", "pw")).await;
    assert_eq!(outcome, Outcome::navigate(Route::Users));

    assert_eq!(ctx.session.token().as_deref(), Some("tok-1"));
    assert_eq!(ctx.session.user_id(), Some(1));
    assert_eq!(ctx.session.store().get_raw(TOKEN_KEY).as_deref(), Some("\"tok-1\""));
    assert_eq!(ctx.session.store().get_raw(USER_ID_KEY).as_deref(), Some("1"));

    let visit = pages::visit(&ctx, Route::User(1)).await.unwrap();
    assert_eq!(visit.route, Route::User(1));
    let Screen::Profile(view) = visit.screen else {
        panic!("expected profile screen");
    };
    assert!(view.is_edit());
    assert!(view.actions().contains(&Action::Navigate {
        label: "Edit",
        to: Route::EditUser(1),
    }));
    assert_eq!(state.last_authorization().as_deref(), Some("tok-1"));
}

#[tokio::test]
async fn test_login_lands_on_user_list() {
    let (state, base) = common::spawn_server().await;
    state.add_user(1, "alice", "pw", "tok-1");
    state.add_user(2, "bob", "pw2", "tok-2");
    let ctx = common::context(&base);

    let outcome = login::submit(&ctx, &LoginForm::new("alice", "pw")).await;
    let to = outcome.destination().unwrap();

    let visit = pages::visit(&ctx, to).await.unwrap();
    let Screen::Users(view) = visit.screen else {
        panic!("expected user list");
    };
    let names: Vec<&str> = view.users.iter().map(|u| u.username.as_str()).collect();
    assert_eq!(names, vec!["alice", "bob"]);
}

#[tokio::test]
async fn test_bad_credentials_stay_on_page() {
    let (state, base) = common::spawn_server().await;
    state.add_user(1, "alice", "pw", "tok-1");
    let ctx = common::context(&base);

    let outcome = login::submit(&ctx, &LoginForm::new("alice", "wrong")).await;
    assert_eq!(
        outcome,
        Outcome::stay("Something went wrong during the login:\nInvalid username or password")
    );
    assert!(ctx.session.get_session().is_none());
    assert!(ctx.session.user_id().is_none());
}

#[tokio::test]
async fn test_existing_session_redirects_without_network() {
    let (state, base) = common::spawn_server().await;
    state.add_user(1, "alice", "pw", "tok-1");
    let ctx = common::context(&base);
    ctx.session.set_session("tok-1", 1).unwrap();

    assert_eq!(login::mount(&ctx), Mount::Redirect(Route::User(1)));
    assert_eq!(state.request_count(), 0);

    let visit = pages::visit(&ctx, Route::Login).await.unwrap();
    assert_eq!(visit.route, Route::User(1));
    assert!(matches!(
        visit.screen,
        Screen::Profile(ref v) if matches!(v.state, ProfileState::Loaded { is_edit: true, .. })
    ));
}

//! Terminal rendering of pages and outcomes

use std::fmt::Write;

use crate::pages::edit::EditView;
use crate::pages::profile::{ProfileState, ProfileView};
use crate::pages::users::UsersView;
use crate::pages::{Action, Outcome, Screen, Visit};

/// Render a mounted route
pub fn render_visit(visit: &Visit) -> String {
    match &visit.screen {
        Screen::Home(actions) => render_actions(actions),
        Screen::Login => "Login\n  userdesk login -u <username> -p <password>\n  Not registered yet? userdesk register\n".to_string(),
        Screen::Register => "Register\n  userdesk register -u <username> -n <name> -p <password> [-b YYYY-MM-DD]\n  Already registered? userdesk login\n".to_string(),
        Screen::Users(view) => render_users(view),
        Screen::Profile(view) => render_profile(view),
        Screen::Edit(view) => render_edit(view),
    }
}

pub fn render_users(view: &UsersView) -> String {
    let mut out = String::from("Users:\n");
    if view.users.is_empty() {
        out.push_str("  (none)\n");
    }
    for user in &view.users {
        let _ = writeln!(out, "  {:>4}  {:<20} {}", user.id, user.username, user.status);
    }
    out
}

pub fn render_profile(view: &ProfileView) -> String {
    match &view.state {
        ProfileState::Loading => "Loading...\n".to_string(),
        ProfileState::NotFound => "User not found.\n".to_string(),
        ProfileState::Loaded { user, .. } => {
            let mut out = String::from("Profile:\n");
            let _ = writeln!(out, "  Name: {}", user.name);
            let _ = writeln!(out, "  Username: {}", user.username);
            let _ = writeln!(out, "  Status: {}", user.status);
            let _ = writeln!(out, "  Created: {}", user.date);
            if let Some(birthday) = user.birthday.as_deref().filter(|b| !b.is_empty()) {
                let _ = writeln!(out, "  Birthday: {}", birthday);
            }
            out.push_str(&render_actions(&view.actions()));
            out
        }
    }
}

pub fn render_edit(view: &EditView) -> String {
    match view {
        EditView::NotFound => "User not found.\n".to_string(),
        EditView::Ready { user, form } => {
            let mut out = format!("Edit profile of {}:\n", user.name);
            let _ = writeln!(out, "  Username: {}", form.username.as_deref().unwrap_or(""));
            let _ = writeln!(out, "  Birthday: {}", form.birthday.as_deref().unwrap_or(""));
            let _ = writeln!(
                out,
                "  Save with: userdesk edit {} [-u <username>] [-b YYYY-MM-DD | --clear-birthday]",
                user.id
            );
            out
        }
    }
}

pub fn render_actions(actions: &[Action]) -> String {
    let mut out = String::new();
    for action in actions {
        match action {
            Action::Navigate { label, to } => {
                let _ = writeln!(out, "  [{}] {}", label, to);
            }
            Action::Logout => out.push_str("  [Logout] userdesk logout\n"),
        }
    }
    out
}

/// Notice lines start with `!`, navigation with `→`
pub fn render_outcome(outcome: &Outcome) -> String {
    let mut out = String::new();
    if let Some(notice) = outcome.notice() {
        for line in notice.lines() {
            let _ = writeln!(out, "! {}", line);
        }
    }
    if let Some(to) = outcome.destination() {
        let _ = writeln!(out, "→ {}", to);
    }
    out
}

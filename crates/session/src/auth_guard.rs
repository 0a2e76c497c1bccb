//! Content gating by session state
//!
//! Article bodies and comment threads are only shown to logged-in readers;
//! guests see the excerpt and a prompt to log in.

use crate::auth::SessionState;
use inkpost_core::Comment;

/// What a reader may see of gated content
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// The session is still being confirmed
    Loading,
    /// Everything is visible
    Full,
    /// Only public parts are visible; show the prompt
    LoginRequired(LoginPrompt),
}

/// Call to action shown in place of gated content
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoginPrompt {
    pub title: &'static str,
    pub message: &'static str,
    pub action: &'static str,
}

pub const ARTICLE_PROMPT: LoginPrompt = LoginPrompt {
    title: "Login Required",
    message: "Please log in to read the full article and access all content.",
    action: "Login",
};

pub const COMMENTS_PROMPT: LoginPrompt = LoginPrompt {
    title: "Join the Conversation",
    message: "Log in to read and participate in the discussion with other readers.",
    action: "Login to Comment",
};

fn gate(state: &SessionState, prompt: LoginPrompt) -> Access {
    if state.user.is_some() {
        Access::Full
    } else if state.loading {
        Access::Loading
    } else {
        Access::LoginRequired(prompt)
    }
}

/// Access to a full article body
pub fn article_access(state: &SessionState) -> Access {
    gate(state, ARTICLE_PROMPT)
}

/// Access to reading and posting comments
pub fn comment_access(state: &SessionState) -> Access {
    gate(state, COMMENTS_PROMPT)
}

/// Only the author may edit or delete a comment
pub fn can_modify_comment(state: &SessionState, comment: &Comment) -> bool {
    state
        .user
        .as_ref()
        .is_some_and(|user| comment.is_authored_by(user))
}

/// Navigation entries for the current reader
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavMenu {
    /// Login and signup links
    Guest,
    /// Account menu; unverified members are nudged to verify
    Member { name: String, verified: bool },
    /// Account menu plus post management
    Admin { name: String },
}

pub fn nav_menu(state: &SessionState) -> NavMenu {
    match &state.user {
        None => NavMenu::Guest,
        Some(user) if user.is_admin() => NavMenu::Admin {
            name: user.name.clone(),
        },
        Some(user) => NavMenu::Member {
            name: user.name.clone(),
            verified: user.is_verified,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use inkpost_core::User;
    use inkpost_core::types::ADMIN_ROLE;

    fn user(id: &str, role: &str) -> User {
        User {
            id: id.into(),
            name: "A".into(),
            email: "a@x.com".into(),
            role: role.into(),
            is_verified: false,
        }
    }

    fn logged_in(user: User) -> SessionState {
        SessionState {
            user: Some(user),
            ..SessionState::default()
        }
    }

    #[test]
    fn test_guest_sees_prompt() {
        let state = SessionState::default();
        assert_eq!(article_access(&state), Access::LoginRequired(ARTICLE_PROMPT));
        assert_eq!(comment_access(&state), Access::LoginRequired(COMMENTS_PROMPT));
        assert_eq!(nav_menu(&state), NavMenu::Guest);
    }

    #[test]
    fn test_loading_without_user() {
        let state = SessionState {
            loading: true,
            ..SessionState::default()
        };
        assert_eq!(article_access(&state), Access::Loading);

        let mut state = logged_in(user("u1", "reader"));
        state.loading = true;
        assert_eq!(article_access(&state), Access::Full);
    }

    #[test]
    fn test_menu_by_role() {
        assert_eq!(
            nav_menu(&logged_in(user("u1", "reader"))),
            NavMenu::Member {
                name: "A".into(),
                verified: false
            }
        );
        assert_eq!(
            nav_menu(&logged_in(user("u1", ADMIN_ROLE))),
            NavMenu::Admin { name: "A".into() }
        );
    }

    #[test]
    fn test_only_author_modifies_comment() {
        let comment = Comment {
            id: "c1".into(),
            content: "Nice".into(),
            author: user("u1", "reader"),
            post_id: "p1".into(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        assert!(can_modify_comment(&logged_in(user("u1", "reader")), &comment));
        assert!(!can_modify_comment(&logged_in(user("u2", "reader")), &comment));
        assert!(!can_modify_comment(&SessionState::default(), &comment));
    }
}

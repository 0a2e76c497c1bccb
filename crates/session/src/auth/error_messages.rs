//! User-facing error messages

use inkpost_http::{ClientError, ErrorKind};

pub const SIGNUP_FAILED: &str = "Signup failed";
pub const LOGIN_FAILED: &str = "Login failed";
pub const FETCH_USER_FAILED: &str = "Failed to fetch user";
pub const FORGOT_PASSWORD_FAILED: &str = "Forgot password failed";
pub const RESET_PASSWORD_FAILED: &str = "Reset password failed";
pub const VERIFY_EMAIL_FAILED: &str = "Email verification failed";
pub const SESSION_EXPIRED: &str = "Your session has expired. Please log in again.";

pub const FETCH_POSTS_FAILED: &str = "Failed to fetch posts";
pub const FETCH_POST_FAILED: &str = "Failed to fetch post";
pub const CREATE_POST_FAILED: &str = "Failed to create post";
pub const UPDATE_POST_FAILED: &str = "Failed to update post";
pub const DELETE_POST_FAILED: &str = "Failed to delete post";

pub const FETCH_COMMENTS_FAILED: &str = "Failed to fetch comments";
pub const CREATE_COMMENT_FAILED: &str = "Failed to create comment";
pub const UPDATE_COMMENT_FAILED: &str = "Failed to update comment";
pub const DELETE_COMMENT_FAILED: &str = "Failed to delete comment";

pub const SUBSCRIBE_FAILED: &str = "Failed to subscribe to newsletter";
pub const FETCH_SUBSCRIBERS_FAILED: &str = "Failed to fetch subscribers";
pub const SEND_CONTACT_FAILED: &str = "Failed to send email";

/// Convert a client error into the message shown to the user
///
/// The API writes its own rejection messages for people, so those are passed
/// through. Transport failures and bare status reasons get the operation's
/// fallback instead.
pub fn get_user_friendly_error(error: &ClientError, fallback: &str) -> String {
    match error.kind() {
        ErrorKind::Network => fallback.to_string(),
        _ => error
            .server_message()
            .filter(|message| !message.trim().is_empty())
            .unwrap_or(fallback)
            .to_string(),
    }
}

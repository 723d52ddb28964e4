//! User accounts, password hashing and cookie based sessions.

mod cookie;
mod log_in;
mod middleware;
mod password;
mod register_user;
mod session;
mod token;
mod user;

pub use cookie::{
    COOKIE_TOKEN, DEFAULT_COOKIE_DURATION, invalidate_auth_cookie, set_auth_cookie,
};
pub use log_in::{post_log_in, post_log_out};
pub use middleware::auth_guard;
pub use password::{PasswordHash, ValidatedPassword};
pub use register_user::{get_registration_enabled, register_user};
pub use session::{get_is_admin, get_logged_in, get_user_info, get_users, require_admin};
pub(crate) use token::Token;
pub use user::{
    User, UserID, UserInfo, UserType, count_users, create_user, create_user_table,
    get_all_users, get_user_by_id, get_user_by_username, update_password,
};

#[cfg(test)]
pub use middleware::AuthState;

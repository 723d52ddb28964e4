//! Defines the token stored in the auth cookie.

use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

use crate::auth::UserID;

/// A token for authorization and authentication.
///
/// The expiry is stored as a unix timestamp so that it survives the round
/// trip through the cookie regardless of the time of day.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Token {
    /// The user the token authenticates.
    pub user_id: UserID,

    /// When the token stops being valid.
    #[serde(with = "time::serde::timestamp")]
    pub expires_at: OffsetDateTime,
}

impl Token {
    /// Create a token for `user_id` that expires `duration` from now.
    pub fn new(user_id: UserID, duration: Duration) -> Self {
        Self {
            user_id,
            expires_at: OffsetDateTime::now_utc() + duration,
        }
    }

    /// Whether the token expired before `now`.
    pub fn is_expired_at(&self, now: OffsetDateTime) -> bool {
        self.expires_at <= now
    }
}

#[cfg(test)]
mod tests {
    use time::{Duration, OffsetDateTime, UtcOffset, macros::datetime};

    use crate::auth::{UserID, token::Token};

    #[test]
    fn serialise_token() {
        let token = Token {
            user_id: UserID::new(1),
            expires_at: datetime!(2025-12-21 00:00:00).assume_offset(UtcOffset::UTC),
        };

        let got = serde_json::to_string(&token).unwrap();

        assert_eq!(got, r#"{"user_id":1,"expires_at":1766275200}"#);
    }

    #[test]
    fn deserialise_token() {
        let want = Token {
            user_id: UserID::new(1),
            expires_at: datetime!(2025-12-21 00:00:00).assume_offset(UtcOffset::UTC),
        };

        let got: Token = serde_json::from_str(r#"{"user_id":1,"expires_at":1766275200}"#).unwrap();

        assert_eq!(got, want);
    }

    #[test]
    fn new_token_is_not_expired() {
        let token = Token::new(UserID::new(1), Duration::minutes(5));

        assert!(!token.is_expired_at(OffsetDateTime::now_utc()));
        assert!(token.is_expired_at(OffsetDateTime::now_utc() + Duration::minutes(6)));
    }
}

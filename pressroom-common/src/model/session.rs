//! Bearer tokens handed out by the identity service and the sessions they resolve to.
//!
//! A token reads `<user id>:<core>:<salt>` with core and salt base64 encoded. Only the argon2
//! hash of the core is stored, so a leaked sessions table does not leak usable tokens.

use crate::{
    model::{Id, user::UserMarker},
    util::PositiveDuration,
};
use argon2::{Argon2, Params};
use base64::{DecodeError, Engine, display::Base64Display, prelude::BASE64_STANDARD};
use std::{
    fmt::{Debug, Formatter},
    num::ParseIntError,
    str::FromStr,
};
use thiserror::Error;
use time::OffsetDateTime;

pub const AUTH_TOKEN_CORE_LEN: usize = 24;
pub const AUTH_TOKEN_SALT_LEN: usize = 18;
pub const AUTH_TOKEN_HASH_LEN: usize = Params::DEFAULT_OUTPUT_LEN;

#[derive(Clone, Eq, PartialEq, Debug, Error)]
#[error("Hashing auth token failed: {0}")]
pub struct AuthTokenHashError(argon2::Error);

#[derive(Clone, Eq, PartialEq, Debug, Error)]
pub enum AuthTokenDecodeError {
    #[error("Not enough parts separated by ':'")]
    NotEnoughParts,
    #[error("Invalid user id: {0}")]
    InvalidUserId(ParseIntError),
    #[error("Decoding base64 failed: {0}")]
    Decode(#[from] DecodeError),
    #[error("The length of the core part is incorrect")]
    InvalidCoreLength,
    #[error("The length of the salt part is incorrect")]
    InvalidSaltLength,
}

#[derive(Clone, Eq, PartialEq, Hash)]
pub struct AuthToken {
    pub user_id: Id<UserMarker>,
    pub core: [u8; AUTH_TOKEN_CORE_LEN],
    pub salt: [u8; AUTH_TOKEN_SALT_LEN],
}

#[derive(Clone, Eq, PartialEq, Hash)]
pub struct AuthTokenHash(pub Box<[u8; AUTH_TOKEN_HASH_LEN]>);

/// A stored login of a user.
#[derive(Clone, Eq, PartialEq, Debug, Hash)]
pub struct Session {
    pub user: Id<UserMarker>,
    pub token_hash: AuthTokenHash,
    pub created_at: OffsetDateTime,
    pub expires_after: Option<PositiveDuration>,
}

impl Session {
    /// Sessions without an expiry, or whose expiry lies beyond the representable range, never
    /// expire.
    #[must_use]
    pub fn is_expired_at(&self, now: OffsetDateTime) -> bool {
        self.expires_after
            .and_then(|expires_after| self.created_at.checked_add(expires_after.get()))
            .is_some_and(|expires_at| expires_at < now)
    }
}

impl AuthToken {
    #[must_use]
    pub fn generate_random(user_id: Id<UserMarker>) -> Self {
        Self {
            user_id,
            core: rand::random(),
            salt: rand::random(),
        }
    }

    #[must_use]
    pub fn as_token_str(&self) -> String {
        let user_id = self.user_id;
        let encoded_core = Base64Display::new(&self.core, &BASE64_STANDARD);
        let encoded_salt = Base64Display::new(&self.salt, &BASE64_STANDARD);

        format!("{user_id}:{encoded_core}:{encoded_salt}")
    }

    pub fn hash(&self) -> Result<AuthTokenHash, AuthTokenHashError> {
        let mut hash = Box::new([0; AUTH_TOKEN_HASH_LEN]);
        Argon2::default()
            .hash_password_into(&self.core, &self.salt, &mut *hash)
            .map_err(AuthTokenHashError)?;

        Ok(AuthTokenHash(hash))
    }
}

impl FromStr for AuthToken {
    type Err = AuthTokenDecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(3, ':');

        let user_id_part = parts.next().ok_or(Self::Err::NotEnoughParts)?;
        let core_part = parts.next().ok_or(Self::Err::NotEnoughParts)?;
        let salt_part = parts.next().ok_or(Self::Err::NotEnoughParts)?;

        let user_id = i64::from_str(user_id_part)
            .map_err(Self::Err::InvalidUserId)?
            .into();
        let core = BASE64_STANDARD
            .decode(core_part)?
            .try_into()
            .map_err(|_| Self::Err::InvalidCoreLength)?;
        let salt = BASE64_STANDARD
            .decode(salt_part)?
            .try_into()
            .map_err(|_| Self::Err::InvalidSaltLength)?;

        Ok(Self {
            user_id,
            core,
            salt,
        })
    }
}

impl Debug for AuthToken {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthToken")
            .field("user_id", &self.user_id)
            .field("core", &"[redacted]")
            .field("salt", &"[redacted]")
            .finish()
    }
}

impl Debug for AuthTokenHash {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("AuthTokenHash").field(&"[redacted]").finish()
    }
}

#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash, Error)]
#[error("The auth token hash had an invalid length")]
pub struct InvalidAuthTokenHashError;

impl TryFrom<Vec<u8>> for AuthTokenHash {
    type Error = InvalidAuthTokenHashError;

    fn try_from(value: Vec<u8>) -> Result<Self, Self::Error> {
        let hash: [u8; AUTH_TOKEN_HASH_LEN] =
            value.try_into().map_err(|_| InvalidAuthTokenHashError)?;

        Ok(Self(Box::new(hash)))
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        model::{
            Id,
            session::{AuthToken, AuthTokenDecodeError, AuthTokenHash, Session},
        },
        util::PositiveDuration,
    };
    use std::str::FromStr;
    use time::{Duration, macros::datetime};

    #[test]
    fn token_string_parses_back() {
        let token = AuthToken::generate_random(Id::new(17));
        let parsed = AuthToken::from_str(&token.as_token_str()).unwrap();

        assert_eq!(parsed, token);
        assert_eq!(parsed.hash().unwrap(), token.hash().unwrap());
    }

    #[test]
    fn malformed_tokens() {
        assert_eq!(
            AuthToken::from_str("17:abc"),
            Err(AuthTokenDecodeError::NotEnoughParts)
        );
        assert!(matches!(
            AuthToken::from_str("seventeen:a:b"),
            Err(AuthTokenDecodeError::InvalidUserId(_))
        ));
        assert_eq!(
            AuthToken::from_str("17:AAAA:AAAA"),
            Err(AuthTokenDecodeError::InvalidCoreLength)
        );
    }

    #[test]
    fn debug_redacts_secrets() {
        let token = AuthToken::generate_random(Id::new(1));
        let debug = format!("{token:?}");

        assert!(debug.contains("[redacted]"));
        assert!(!debug.contains(&format!("{:?}", token.core)));
    }

    #[test]
    fn hash_length_is_checked() {
        assert!(AuthTokenHash::try_from(vec![0; 3]).is_err());
        assert!(AuthTokenHash::try_from(vec![0; 32]).is_ok());
    }

    #[test]
    fn session_expiry() {
        let token_hash = AuthToken::generate_random(Id::new(1)).hash().unwrap();
        let created_at = datetime!(2025-06-01 12:00 UTC);
        let mut session = Session {
            user: Id::new(1),
            token_hash,
            created_at,
            expires_after: None,
        };

        assert!(!session.is_expired_at(created_at + Duration::days(10_000)));

        session.expires_after = PositiveDuration::new(Duration::hours(1));
        assert!(!session.is_expired_at(created_at + Duration::minutes(59)));
        assert!(session.is_expired_at(created_at + Duration::minutes(61)));
    }

    #[test]
    fn session_expiring_out_of_range_never_expires() {
        let token_hash = AuthToken::generate_random(Id::new(1)).hash().unwrap();
        let created_at = datetime!(2025-06-01 12:00 UTC);
        let session = Session {
            user: Id::new(1),
            token_hash,
            created_at,
            expires_after: PositiveDuration::new(Duration::seconds(i64::MAX)),
        };

        assert!(session.expires_after.is_some());
        assert!(!session.is_expired_at(created_at + Duration::days(10_000)));
    }
}

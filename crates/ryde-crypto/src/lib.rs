//! Ryde credential helpers
//!
//! Password hashing is bcrypt with a fixed cost shared by riders and captains.
//! Tokens are HS256 JWTs signed with a secret the caller passes in explicitly;
//! nothing here reads the process environment.

pub mod password;
pub mod token;

pub use password::{CryptoError, SALT_ROUNDS, compare_password, hash_password};
pub use token::{
    CAPTAIN_TOKEN_TTL_SECS, TokenConfig, TokenError, USER_TOKEN_TTL_SECS, decode_captain_token,
    decode_user_token, generate_captain_token, generate_user_token,
};

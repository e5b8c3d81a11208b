//! Password hashing: PBKDF2-HMAC-SHA256 in PHC string form.
//!
//! Stored form: `$pbkdf2-sha256$i=<rounds>,l=32$<salt>$<hash>`. The round
//! count travels with the hash, so raising it later leaves existing accounts
//! verifiable.

use password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use pbkdf2::{Params, Pbkdf2};
use rand::Rng;

pub use password_hash::Error as HashError;

const DEFAULT_ROUNDS: u32 = 600_000;
const OUTPUT_LEN: usize = 32;
const SALT_LEN: usize = 16;

/// Hash `password` with a fresh random salt.
///
/// # Errors
///
/// Returns `HashError` if the hasher rejects its parameters.
pub fn hash_password(password: &str) -> Result<String, HashError> {
    hash_with_rounds(password, DEFAULT_ROUNDS)
}

pub(crate) fn hash_with_rounds(password: &str, rounds: u32) -> Result<String, HashError> {
    let salt_bytes: [u8; SALT_LEN] = rand::rng().random();
    let salt = SaltString::encode_b64(&salt_bytes)?;
    let params = Params { rounds, output_length: OUTPUT_LEN };
    // No algorithm id selects pbkdf2-sha256.
    let hash = Pbkdf2.hash_password_customized(password.as_bytes(), None, None, params, &salt)?;
    Ok(hash.to_string())
}

/// Check `password` against a stored hash. Malformed hashes never verify.
#[must_use]
pub fn verify_password(password: &str, stored: &str) -> bool {
    PasswordHash::new(stored).is_ok_and(|parsed| Pbkdf2.verify_password(password.as_bytes(), &parsed).is_ok())
}

#[cfg(test)]
#[path = "password_test.rs"]
mod tests;

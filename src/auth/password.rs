use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};
use rand::{Rng, distributions::Alphanumeric, thread_rng};

use crate::error::AppError;

pub const MIN_PASSWORD_LEN: usize = 8;
const RANDOM_PASSWORD_LEN: usize = 32;

pub fn hash_password(password: &str) -> Result<String, AppError> {
    if password.len() < MIN_PASSWORD_LEN {
        return Err(AppError::bad_request("Password too short"));
    }

    let salt = SaltString::generate(&mut thread_rng());
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|err| AppError::internal(format!("Password hashing failed: {err}")))?
        .to_string();
    Ok(hash)
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    let parsed = PasswordHash::new(hash)
        .map_err(|err| AppError::internal(format!("Invalid password hash: {err}")))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// Hash of a throwaway secret nobody knows; locks the account until a reset.
pub fn scrambled_password_hash() -> Result<String, AppError> {
    let secret: String = thread_rng()
        .sample_iter(&Alphanumeric)
        .take(RANDOM_PASSWORD_LEN)
        .map(char::from)
        .collect();
    hash_password(&secret)
}

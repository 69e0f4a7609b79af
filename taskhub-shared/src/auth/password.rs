/// Password hashing and verification
///
/// Passwords are stored as `salt$digest`, where `salt` is 16 random bytes
/// hex-encoded and `digest` is `hex(sha256(password + salt))`. The salt is
/// generated freshly per hash, so hashing the same password twice yields
/// different stored strings that both verify.
///
/// Verification is three-valued internally: a stored hash that does not
/// split into the two expected parts is a [`PasswordCheck::MalformedHash`],
/// which callers collapse to "incorrect password" at the public boundary
/// (after logging) rather than surfacing an error to the requester.
///
/// # Example
///
/// ```
/// use taskhub_shared::auth::password::{check_password, hash_password, PasswordCheck};
///
/// let hash = hash_password("super_secret");
/// assert_eq!(check_password("super_secret", &hash), PasswordCheck::Match);
/// assert_eq!(check_password("wrong", &hash), PasswordCheck::Mismatch);
/// assert_eq!(check_password("super_secret", "garbage"), PasswordCheck::MalformedHash);
/// ```
use rand::RngCore;
use sha2::{Digest, Sha256};

/// Number of random salt bytes (hex-encoded to twice this length)
const SALT_BYTES: usize = 16;

/// Outcome of a password check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordCheck {
    /// Password matches the stored hash
    Match,

    /// Password does not match
    Mismatch,

    /// Stored hash is empty or not in `salt$digest` form
    MalformedHash,
}

impl PasswordCheck {
    /// Collapses the three-way outcome to the public boolean
    pub fn is_match(&self) -> bool {
        matches!(self, PasswordCheck::Match)
    }
}

/// Hashes a password with a freshly generated random salt
///
/// Returns the `salt$digest` string to be stored.
pub fn hash_password(password: &str) -> String {
    let mut salt_bytes = [0u8; SALT_BYTES];
    rand::rngs::OsRng.fill_bytes(&mut salt_bytes);
    let salt = hex::encode(salt_bytes);

    let digest = digest_with_salt(password, &salt);
    format!("{}${}", salt, digest)
}

/// Checks a plaintext password against a stored `salt$digest` hash
///
/// The digest comparison always walks every byte, so the result does not
/// leak how far a mismatching digest agreed with the stored one.
pub fn check_password(password: &str, stored: &str) -> PasswordCheck {
    let Some((salt, stored_digest)) = stored.split_once('$') else {
        return PasswordCheck::MalformedHash;
    };
    if salt.is_empty() || stored_digest.is_empty() {
        return PasswordCheck::MalformedHash;
    }

    let candidate = digest_with_salt(password, salt);
    if constant_time_eq(candidate.as_bytes(), stored_digest.as_bytes()) {
        PasswordCheck::Match
    } else {
        PasswordCheck::Mismatch
    }
}

/// Derives `hex(sha256(password + salt))`
fn digest_with_salt(password: &str, salt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    hasher.update(salt.as_bytes());
    hex::encode(hasher.finalize())
}

/// Byte-wise comparison without early exit
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}

/// Authentication and authorization for TaskHub
///
/// # Modules
///
/// - [`password`]: salted SHA-256 password hashing and verification
/// - [`session`]: signed session tokens and the session cookie format
/// - [`authorization`]: the owner-or-admin access gate for tasks
///
/// # Example
///
/// ```
/// use taskhub_shared::auth::password::{check_password, hash_password, PasswordCheck};
///
/// let hash = hash_password("secret1");
/// assert_eq!(check_password("secret1", &hash), PasswordCheck::Match);
/// assert_eq!(check_password("wrong", &hash), PasswordCheck::Mismatch);
/// ```
pub mod authorization;
pub mod password;
pub mod session;

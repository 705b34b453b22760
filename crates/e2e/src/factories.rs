//! Test data factories

use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};

const EMAIL_DOMAINS: &[&str] = &["example.com", "example.org", "example.net"];
const PASSWORD_LENGTH: usize = 20;
const USERNAME_LENGTH: usize = 10;

/// A user generated for one test run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub email: String,
    pub username: String,
}

impl User {
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = email.into();
        self
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = username.into();
        self
    }
}

/// Build a user with a random, run-unique email and username
pub fn build_user() -> User {
    let mut rng = rand::thread_rng();
    let local: String = random_alphanumeric(&mut rng, 8).to_lowercase();
    let domain = EMAIL_DOMAINS[rng.gen_range(0..EMAIL_DOMAINS.len())];

    User {
        email: format!("{}.{}@{}", local, rng.gen_range(100..10_000), domain),
        username: random_alphanumeric(&mut rng, USERNAME_LENGTH),
    }
}

pub fn build_password() -> String {
    random_alphanumeric(&mut rand::thread_rng(), PASSWORD_LENGTH)
}

fn random_alphanumeric<R: Rng>(rng: &mut R, len: usize) -> String {
    rng.sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_user_shape() {
        let user = build_user();

        assert_eq!(user.username.len(), USERNAME_LENGTH);
        assert!(user.username.chars().all(|c| c.is_ascii_alphanumeric()));

        let (local, domain) = user.email.split_once('@').unwrap();
        assert!(!local.is_empty());
        assert!(EMAIL_DOMAINS.contains(&domain));
    }

    #[test]
    fn test_users_are_distinct() {
        assert_ne!(build_user(), build_user());
    }

    #[test]
    fn test_overrides() {
        let user = build_user()
            .with_email("alice@example.com")
            .with_username("alice123");
        assert_eq!(user.email, "alice@example.com");
        assert_eq!(user.username, "alice123");
    }

    #[test]
    fn test_password_length() {
        assert_eq!(build_password().len(), PASSWORD_LENGTH);
    }
}

//! Initial secret generation for newly provisioned accounts.

use std::fmt;

use rand::Rng;

const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789!@#$%&*";

/// A one-time password set on account creation.
///
/// Never logged: `Debug` and `Display` print a placeholder.
#[derive(Clone, PartialEq, Eq)]
pub struct InitialSecret(String);

impl InitialSecret {
    pub fn new(value: String) -> Self {
        Self(value)
    }

    /// The raw secret, for handing to the access system.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for InitialSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("InitialSecret(***)")
    }
}

impl fmt::Display for InitialSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("***")
    }
}

/// Generate a random secret of the given length using alphanumeric chars + symbols.
pub fn generate_initial_secret(length: usize) -> InitialSecret {
    let mut rng = rand::thread_rng();
    let value = (0..length)
        .map(|_| {
            let idx = rng.gen_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect();
    InitialSecret(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secret_correct_length() {
        for len in [12, 16, 24, 64] {
            let secret = generate_initial_secret(len);
            assert_eq!(secret.expose().len(), len);
        }
    }

    #[test]
    fn secret_contains_valid_chars() {
        let secret = generate_initial_secret(200);
        for c in secret.expose().chars() {
            assert!(
                CHARSET.contains(&(c as u8)),
                "invalid character in secret: {c}"
            );
        }
    }

    #[test]
    fn secrets_are_not_reused() {
        let a = generate_initial_secret(24);
        let b = generate_initial_secret(24);
        assert_ne!(a, b);
    }

    #[test]
    fn secret_is_redacted_in_output() {
        let secret = InitialSecret::new("correct-horse".into());
        assert_eq!(format!("{secret}"), "***");
        assert_eq!(format!("{secret:?}"), "InitialSecret(***)");
    }
}

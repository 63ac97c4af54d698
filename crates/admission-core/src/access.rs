//! Shared-password gate in front of every desk command.
//!
//! There is a single secret for all staff and no per-user identity or session expiry. That
//! is a known weakness; the verifier trait is the seam where real authentication plugs in.

use tracing::warn;

use crate::config::AccessConfig;

/// Decides whether an access attempt may proceed.
pub trait CredentialVerifier: Send + Sync {
    fn verify_credentials(&self, input: &str) -> bool;
}

/// Compares input against one configured secret. With no secret configured nothing passes.
#[derive(Clone, Default)]
pub struct SharedSecretVerifier {
    secret: Option<String>,
}

impl SharedSecretVerifier {
    pub fn new(secret: Option<String>) -> Self {
        Self {
            secret: secret.filter(|value| !value.is_empty()),
        }
    }

    pub fn from_config(config: &AccessConfig) -> Self {
        Self::new(config.password.clone())
    }

    pub fn is_configured(&self) -> bool {
        self.secret.is_some()
    }
}

impl CredentialVerifier for SharedSecretVerifier {
    fn verify_credentials(&self, input: &str) -> bool {
        let Some(secret) = self.secret.as_deref() else {
            warn!("access attempted but no shared password is configured");
            return false;
        };
        constant_time_eq(secret.as_bytes(), input.as_bytes())
    }
}

fn constant_time_eq(left: &[u8], right: &[u8]) -> bool {
    if left.len() != right.len() {
        return false;
    }
    left.iter()
        .zip(right)
        .fold(0u8, |acc, (a, b)| acc | (a ^ b))
        == 0
}

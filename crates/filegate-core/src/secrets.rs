//! Secret resolution
//!
//! Credentials for the reputation service (host and API key) come from a
//! secret store, resolved once at startup. Resolution failure is fatal and
//! must abort before any network call is made.

use async_trait::async_trait;

#[derive(Debug, thiserror::Error)]
pub enum SecretError {
    #[error("secret unavailable: {0}")]
    Unavailable(String),
}

/// Boundary to whatever holds credentials (cloud secret manager, env, ...).
#[async_trait]
pub trait SecretStore: Send + Sync {
    async fn resolve(&self, name: &str) -> Result<String, SecretError>;
}

/// Environment-backed secret store.
///
/// A secret name maps to an environment variable: uppercased, `-` replaced by
/// `_`. With a project scope, `{PROJECT}_{NAME}` is tried first and the
/// unscoped name is the fallback.
#[derive(Debug, Clone, Default)]
pub struct EnvSecretStore {
    project_id: Option<String>,
}

impl EnvSecretStore {
    pub fn new() -> Self {
        EnvSecretStore { project_id: None }
    }

    pub fn scoped(project_id: impl Into<String>) -> Self {
        EnvSecretStore {
            project_id: Some(project_id.into()),
        }
    }

    fn env_name(name: &str) -> String {
        name.to_uppercase().replace('-', "_")
    }
}

#[async_trait]
impl SecretStore for EnvSecretStore {
    async fn resolve(&self, name: &str) -> Result<String, SecretError> {
        let plain = Self::env_name(name);

        if let Some(ref project) = self.project_id {
            let scoped = format!("{}_{}", Self::env_name(project), plain);
            if let Ok(value) = std::env::var(&scoped) {
                if !value.is_empty() {
                    return Ok(value);
                }
            }
        }

        match std::env::var(&plain) {
            Ok(value) if !value.is_empty() => Ok(value),
            _ => Err(SecretError::Unavailable(name.to_string())),
        }
    }
}

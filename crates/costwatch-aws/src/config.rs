//! Cost Explorer client configuration
//!
//! Credentials come from the process environment. The region is fixed to
//! `us-east-1`, where the Cost Explorer endpoint lives, unless a caller
//! overrides it explicitly.

use costwatch_core::error::{CostwatchError, Result};
use std::env;
use std::fmt;

/// Environment variable holding the access key id
pub const ACCESS_KEY_ID_VAR: &str = "ACCESS_KEY_ID";
/// Environment variable holding the secret access key
pub const SECRET_ACCESS_KEY_VAR: &str = "SECRET_ACCESS_KEY";
/// Optional environment variable holding a session token
pub const SESSION_TOKEN_VAR: &str = "SESSION_TOKEN";

/// Every variable `from_env` reads
pub const CREDENTIAL_VARS: [&str; 3] = [ACCESS_KEY_ID_VAR, SECRET_ACCESS_KEY_VAR, SESSION_TOKEN_VAR];

/// Region of the Cost Explorer endpoint
pub const DEFAULT_REGION: &str = "us-east-1";

/// Static credentials and region for the Cost Explorer client
#[derive(Clone, PartialEq, Eq)]
pub struct AwsConfig {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: Option<String>,
    pub region: String,
}

impl AwsConfig {
    /// Create a configuration for the default region.
    ///
    /// # Errors
    ///
    /// Returns `CostwatchError::Config` if either credential is empty.
    pub fn new(
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
    ) -> Result<Self> {
        let access_key_id = access_key_id.into();
        let secret_access_key = secret_access_key.into();

        if access_key_id.trim().is_empty() {
            return Err(CostwatchError::Config(format!("{ACCESS_KEY_ID_VAR} is empty")));
        }
        if secret_access_key.trim().is_empty() {
            return Err(CostwatchError::Config(format!("{SECRET_ACCESS_KEY_VAR} is empty")));
        }

        Ok(Self {
            access_key_id,
            secret_access_key,
            session_token: None,
            region: DEFAULT_REGION.to_string(),
        })
    }

    /// Build a configuration from optional credential values, as collected
    /// from flags or the environment. An empty session token counts as absent.
    pub fn from_credentials(
        access_key_id: Option<String>,
        secret_access_key: Option<String>,
        session_token: Option<String>,
    ) -> Result<Self> {
        let access_key_id = access_key_id.ok_or_else(|| not_set(ACCESS_KEY_ID_VAR))?;
        let secret_access_key = secret_access_key.ok_or_else(|| not_set(SECRET_ACCESS_KEY_VAR))?;
        let session_token = session_token.filter(|t| !t.is_empty());

        Ok(Self::new(access_key_id, secret_access_key)?.with_session_token(session_token))
    }

    /// Read credentials from `ACCESS_KEY_ID`, `SECRET_ACCESS_KEY` and the
    /// optional `SESSION_TOKEN`
    pub fn from_env() -> Result<Self> {
        Self::from_credentials(
            env::var(ACCESS_KEY_ID_VAR).ok(),
            env::var(SECRET_ACCESS_KEY_VAR).ok(),
            env::var(SESSION_TOKEN_VAR).ok(),
        )
    }

    /// Attach a session token for temporary credentials
    pub fn with_session_token(mut self, token: Option<String>) -> Self {
        self.session_token = token;
        self
    }

    /// Override the region
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }
}

// Keep the secret out of logs.
impl fmt::Debug for AwsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AwsConfig")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"***")
            .field("session_token", &self.session_token.as_ref().map(|_| "***"))
            .field("region", &self.region)
            .finish()
    }
}

fn not_set(key: &str) -> CostwatchError {
    CostwatchError::Config(format!("{key} is not set"))
}

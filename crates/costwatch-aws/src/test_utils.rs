//! Shared test utilities for unit tests
//!
//! Tests that read credentials from the process environment must hold
//! [`ENV_MUTEX`] while they run, and restore whatever they touched through an
//! [`EnvVarGuard`].

use once_cell::sync::Lazy;
use std::env;

// Serializes environment variable modifications across tests
pub static ENV_MUTEX: Lazy<tokio::sync::Mutex<()>> = Lazy::new(|| tokio::sync::Mutex::new(()));

/// RAII guard restoring environment variables on drop
pub struct EnvVarGuard {
    saved: Vec<(String, Option<String>)>,
}

impl EnvVarGuard {
    pub fn new() -> Self {
        Self { saved: Vec::new() }
    }

    /// Set a variable, remembering its previous value
    pub fn set(&mut self, key: &str, value: &str) {
        self.saved.push((key.to_string(), env::var(key).ok()));
        // set_var is unsafe since Rust 1.82; callers hold ENV_MUTEX
        unsafe {
            env::set_var(key, value);
        }
    }

    /// Remove a variable, remembering its previous value
    pub fn remove(&mut self, key: &str) {
        self.saved.push((key.to_string(), env::var(key).ok()));
        unsafe {
            env::remove_var(key);
        }
    }

    /// Start from an environment with no billing credentials at all
    pub fn without_credentials() -> Self {
        let mut guard = Self::new();
        for key in crate::config::CREDENTIAL_VARS {
            guard.remove(key);
        }
        guard
    }
}

impl Drop for EnvVarGuard {
    fn drop(&mut self) {
        for (key, value) in self.saved.iter().rev() {
            unsafe {
                match value {
                    Some(v) => env::set_var(key, v),
                    None => env::remove_var(key),
                }
            }
        }
    }
}

impl Default for EnvVarGuard {
    fn default() -> Self {
        Self::new()
    }
}

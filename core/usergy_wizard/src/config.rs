//! Wizard configuration loaded from environment variables.

use std::time::Duration;

use crate::errors::{Result, WizardError};
use crate::navigator::Gating;

#[derive(Debug, Clone)]
pub struct WizardConfig {
    /// Project store base URL used by [`crate::gateway::HttpGateway`]
    pub store_url: String,
    /// Upper bound on any single gateway call
    pub request_timeout: Duration,
    /// Navigator variant
    pub gating: Gating,
}

impl Default for WizardConfig {
    fn default() -> Self {
        Self {
            store_url: "http://localhost:3002".to_string(),
            request_timeout: Duration::from_secs(30),
            gating: Gating::RequireVisited,
        }
    }
}

impl WizardConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();

        let request_timeout = match lookup("WIZARD_REQUEST_TIMEOUT_SECS") {
            Some(v) => match v.parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    return Err(WizardError::Config(
                        "Invalid WIZARD_REQUEST_TIMEOUT_SECS".to_string(),
                    ))
                }
            },
            None => defaults.request_timeout,
        };

        let gating = match lookup("WIZARD_GATED_NAVIGATION").as_deref() {
            None | Some("true") | Some("1") => Gating::RequireVisited,
            Some("false") | Some("0") => Gating::Free,
            Some(_) => {
                return Err(WizardError::Config(
                    "Invalid WIZARD_GATED_NAVIGATION".to_string(),
                ))
            }
        };

        Ok(WizardConfig {
            store_url: lookup("PROJECT_STORE_URL").unwrap_or(defaults.store_url),
            request_timeout,
            gating,
        })
    }
}

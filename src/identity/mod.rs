//! # Identity Providers
//!
//! Resolve who the current user is. Sign-in, sign-up and session refresh
//! belong to the external identity service; providers here only read a
//! resolved identity and hand it to the chat room.

pub mod http;

use std::fmt;

use async_trait::async_trait;
use log::warn;

use crate::core::config::ResolvedConfig;
use crate::core::message::Identity;

pub use http::HttpIdentityProvider;

/// Errors that can occur while resolving the current identity.
#[derive(Debug)]
pub enum IdentityError {
    /// Provider misconfigured (bad URL, missing token).
    Config(String),
    /// Network-level failure (timeout, DNS, connection refused).
    Network(String),
    /// The identity service answered with an error status.
    Api { status: u16, message: String },
    /// The response body was not a user profile.
    Parse(String),
}

impl fmt::Display for IdentityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdentityError::Config(msg) => write!(f, "config error: {msg}"),
            IdentityError::Network(msg) => write!(f, "network error: {msg}"),
            IdentityError::Api { status, message } => {
                write!(f, "API error (HTTP {status}): {message}")
            }
            IdentityError::Parse(msg) => write!(f, "parse error: {msg}"),
        }
    }
}

impl std::error::Error for IdentityError {}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    fn name(&self) -> &str;

    /// The signed-in user, or `None` when nobody is signed in.
    async fn current_identity(&self) -> Result<Option<Identity>, IdentityError>;
}

/// Identity fixed at startup from config or command-line flags.
pub struct StaticIdentityProvider {
    identity: Identity,
}

impl StaticIdentityProvider {
    pub fn new(identity: Identity) -> Self {
        Self { identity }
    }
}

#[async_trait]
impl IdentityProvider for StaticIdentityProvider {
    fn name(&self) -> &str {
        "static"
    }

    async fn current_identity(&self) -> Result<Option<Identity>, IdentityError> {
        Ok(Some(self.identity.clone()))
    }
}

/// Identity built from the configured uid and photo URL.
pub fn configured_identity(config: &ResolvedConfig) -> Identity {
    let avatar_url = (!config.photo_url.is_empty()).then(|| config.photo_url.clone());
    Identity::new(config.uid.clone(), avatar_url)
}

/// Pick a provider: HTTP when a profile endpoint is configured, static otherwise.
///
/// An endpoint starting with `/` is resolved against `api_domain`. A token
/// without an endpoint is ignored: the profile route differs per backend and
/// is never guessed.
pub fn build_provider(config: &ResolvedConfig) -> Box<dyn IdentityProvider> {
    let Some(endpoint) = config.identity_endpoint.as_deref() else {
        if config.access_token.is_some() {
            warn!("Access token set but no identity endpoint configured, using static identity");
        }
        return Box::new(StaticIdentityProvider::new(configured_identity(config)));
    };
    let endpoint = if endpoint.starts_with('/') {
        format!("{}{}", config.api_domain.trim_end_matches('/'), endpoint)
    } else {
        endpoint.to_string()
    };
    Box::new(HttpIdentityProvider::new(
        endpoint,
        config.access_token.clone(),
        Some(config.website_domain.clone()),
    ))
}

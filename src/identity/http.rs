//! Identity read from the external backend's user-profile endpoint.
//!
//! The access token is issued and refreshed elsewhere; this provider only
//! presents it. A 401/403 answer means "not signed in" and resolves to `None`.

use async_trait::async_trait;
use log::{debug, info, warn};
use reqwest::StatusCode;
use serde::Deserialize;

use super::{IdentityError, IdentityProvider};
use crate::core::message::Identity;

// ============================================================================
// Profile Response Types
// ============================================================================

/// Response envelope used by the backend (`{"data": ...}`).
#[derive(Deserialize, Debug)]
struct ProfileEnvelope {
    data: Profile,
}

#[derive(Deserialize, Debug)]
struct Profile {
    id: String,
    #[serde(default)]
    first_name: Option<String>,
    #[serde(default)]
    last_name: Option<String>,
    #[serde(default)]
    photo_url: Option<String>,
}

impl Profile {
    fn into_identity(self) -> Identity {
        let name = [self.first_name, self.last_name]
            .into_iter()
            .flatten()
            .filter(|part| !part.trim().is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        Identity {
            uid: self.id,
            avatar_url: self.photo_url.filter(|url| !url.is_empty()),
            display_name: (!name.is_empty()).then_some(name),
        }
    }
}

// ============================================================================
// Provider Implementation
// ============================================================================

pub struct HttpIdentityProvider {
    endpoint: String,
    access_token: Option<String>,
    origin: Option<String>,
    client: reqwest::Client,
}

impl HttpIdentityProvider {
    pub fn new(endpoint: String, access_token: Option<String>, origin: Option<String>) -> Self {
        Self {
            endpoint,
            access_token,
            origin,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl IdentityProvider for HttpIdentityProvider {
    fn name(&self) -> &str {
        "http"
    }

    async fn current_identity(&self) -> Result<Option<Identity>, IdentityError> {
        let Some(token) = self.access_token.as_deref() else {
            return Err(IdentityError::Config(
                "no access token (set CHATROOM_ACCESS_TOKEN)".into(),
            ));
        };

        debug!("Fetching identity from {}", self.endpoint);
        let mut request = self.client.get(&self.endpoint).bearer_auth(token);
        if let Some(origin) = &self.origin {
            request = request.header(reqwest::header::ORIGIN, origin);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_builder() {
                IdentityError::Config(e.to_string())
            } else {
                IdentityError::Network(e.to_string())
            }
        })?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            info!("Identity service reports no session (HTTP {})", status.as_u16());
            return Ok(None);
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            warn!("Identity request failed: HTTP {} {}", status.as_u16(), message);
            return Err(IdentityError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| IdentityError::Network(e.to_string()))?;
        let envelope: ProfileEnvelope =
            serde_json::from_str(&body).map_err(|e| IdentityError::Parse(e.to_string()))?;

        let identity = envelope.data.into_identity();
        info!("Resolved identity {}", identity.uid);
        Ok(Some(identity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_joins_name_parts() {
        let profile: ProfileEnvelope = serde_json::from_str(
            r#"{"data": {"id": "u-1", "first_name": "Ada", "last_name": "Lovelace"}}"#,
        )
        .unwrap();
        let identity = profile.data.into_identity();
        assert_eq!(identity.uid, "u-1");
        assert_eq!(identity.display_name.as_deref(), Some("Ada Lovelace"));
        assert_eq!(identity.avatar_url, None);
    }

    #[test]
    fn profile_without_names_has_no_display_name() {
        let profile: ProfileEnvelope =
            serde_json::from_str(r#"{"data": {"id": "u-2", "photo_url": ""}}"#).unwrap();
        let identity = profile.data.into_identity();
        assert_eq!(identity.display_name, None);
        assert_eq!(identity.avatar_url, None);
        assert_eq!(identity.label(), "u-2");
    }

    #[tokio::test]
    async fn missing_token_is_a_config_error() {
        let provider = HttpIdentityProvider::new("http://localhost:9/me".into(), None, None);
        let result = provider.current_identity().await;
        assert!(matches!(result, Err(IdentityError::Config(_))));
    }
}

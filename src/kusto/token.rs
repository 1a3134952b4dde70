//! Azure AD client-credentials token acquisition.

use crate::error::KustoError;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::debug;

/// Service principal credential exchanging a client secret for access tokens.
pub struct ClientSecretCredential {
    authority_host: String,
    tenant_id: String,
    client_id: String,
    client_secret: SecretString,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Deserialize)]
struct TokenErrorResponse {
    error: String,
    #[serde(default)]
    error_description: Option<String>,
}

impl ClientSecretCredential {
    pub fn new(
        authority_host: impl Into<String>,
        tenant_id: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: SecretString,
    ) -> Self {
        Self {
            authority_host: authority_host.into(),
            tenant_id: tenant_id.into(),
            client_id: client_id.into(),
            client_secret,
        }
    }

    /// OAuth2 v2.0 token endpoint for the tenant.
    pub fn token_url(&self) -> String {
        format!(
            "{}/{}/oauth2/v2.0/token",
            self.authority_host.trim_end_matches('/'),
            self.tenant_id
        )
    }

    /// Scope granting access to the given Kusto cluster.
    pub fn scope_for(cluster_url: &str) -> String {
        format!("{}/.default", cluster_url.trim_end_matches('/'))
    }

    /// Request an access token for `scope`.
    pub async fn get_token(&self, client: &Client, scope: &str) -> Result<SecretString, KustoError> {
        debug!(tenant_id = %self.tenant_id, client_id = %self.client_id, "Requesting Azure AD token");

        let form = [
            ("grant_type", "client_credentials"),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.expose_secret()),
            ("scope", scope),
        ];

        let resp = client
            .post(self.token_url())
            .form(&form)
            .send()
            .await
            .map_err(|e| KustoError::connection(format!("token request failed: {e}")))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| KustoError::connection(format!("failed to read token response: {e}")))?;

        if !status.is_success() {
            let message = serde_json::from_str::<TokenErrorResponse>(&body)
                .map(|e| match e.error_description {
                    Some(desc) => format!("{}: {}", e.error, desc),
                    None => e.error,
                })
                .unwrap_or_else(|_| format!("token endpoint returned HTTP {}", status.as_u16()));
            return Err(KustoError::auth(message));
        }

        let token: TokenResponse = serde_json::from_str(&body)
            .map_err(|e| KustoError::decode(format!("invalid token response: {e}")))?;
        Ok(SecretString::from(token.access_token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_url() {
        let credential = ClientSecretCredential::new(
            "https://login.microsoftonline.com/",
            "my-tenant",
            "my-client",
            SecretString::from("secret".to_string()),
        );
        assert_eq!(
            credential.token_url(),
            "https://login.microsoftonline.com/my-tenant/oauth2/v2.0/token"
        );
    }

    #[test]
    fn test_scope_for_cluster() {
        assert_eq!(
            ClientSecretCredential::scope_for("https://help.kusto.windows.net/"),
            "https://help.kusto.windows.net/.default"
        );
    }
}
